use gibbon_lang_interpreter::environment::Environment;

use crate::session::{self, Outcome};

/// One-shot execution of a whole source file.
pub fn execute(source: &str) {
    let mut env = Environment::new();
    match session::evaluate(source, &mut env) {
        Outcome::Empty => {}
        Outcome::Value(text) => println!("{}", text),
        Outcome::Error(message) => eprintln!("{}", message),
    }
}
