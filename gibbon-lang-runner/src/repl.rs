use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use gibbon_lang_interpreter::environment::Environment;

use crate::session::{self, Outcome};

const PROMPT: &str = ">> ";

pub fn start() -> Result<(), ReadlineError> {
    let mut environment = Environment::new();

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(PROMPT);

        let content = match readline {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                continue; // Clear line
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                line
            }
        };

        match session::evaluate(&content, &mut environment) {
            Outcome::Empty => {}
            Outcome::Value(text) => println!("{}", text),
            Outcome::Error(message) => println!("{}", message),
        }
    }
    Ok(())
}
