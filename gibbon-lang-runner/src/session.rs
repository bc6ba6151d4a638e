use gibbon_lang_core::lexer::Tokenizer;
use gibbon_lang_core::parser::Parser;
use gibbon_lang_interpreter::environment::Environment;
use gibbon_lang_interpreter::evaluator;
use gibbon_lang_interpreter::object::Object;

/// What a single piece of source produced, ready for printing.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The program evaluated to `null`; nothing to show.
    Empty,
    Value(String),
    Error(String),
}

/// Runs `source` against `env`. Bindings made here stay visible to later
/// calls with the same environment.
pub fn evaluate(source: &str, env: &mut Environment) -> Outcome {
    let tokenizer = Tokenizer::new(source);
    let mut parser = Parser::new(tokenizer);

    let program = match parser.parse_program() {
        Ok(program) => program,
        Err(error) => return Outcome::Error(error.to_string()),
    };

    match evaluator::eval_program(&program, env) {
        Err(error) => Outcome::Error(format!("ERROR: {}", error)),
        Ok(object) => match object.as_ref() {
            Object::Null => Outcome::Empty,
            _ => Outcome::Value(object.to_string()),
        },
    }
}
