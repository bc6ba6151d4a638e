use gc::Gc;

use crate::object::{BuiltinFunction, EvaluationError, Object, QuickReturn};

fn wrong_number_of_arguments(got: usize, want: usize) -> QuickReturn {
    QuickReturn::Error(EvaluationError::WrongNumberOfArguments { got, want })
}

fn expect_array<'a>(
    name: &'static str,
    argument: &'a Gc<Object>,
) -> Result<&'a Vec<Gc<Object>>, QuickReturn> {
    match argument.as_ref() {
        Object::Array(array) => Ok(array),
        _ => Err(QuickReturn::Error(EvaluationError::ArgumentMustBeArray {
            name,
            got: argument.kind(),
        })),
    }
}

fn builtin_len(args: Vec<Gc<Object>>) -> Result<Gc<Object>, QuickReturn> {
    if args.len() != 1 {
        return Err(wrong_number_of_arguments(args.len(), 1));
    }
    match args[0].as_ref() {
        // UTF-16 code units, the same unit the hash-key string hash counts.
        Object::String(value) => Ok(Object::integer(value.encode_utf16().count() as i64)),
        _ => Err(QuickReturn::Error(EvaluationError::UnsupportedArgument {
            name: "len",
            got: args[0].kind(),
        })),
    }
}

fn builtin_first(args: Vec<Gc<Object>>) -> Result<Gc<Object>, QuickReturn> {
    if args.len() != 1 {
        return Err(wrong_number_of_arguments(args.len(), 1));
    }
    let array = expect_array("first", &args[0])?;
    Ok(array.first().cloned().unwrap_or_else(Object::null))
}

fn builtin_last(args: Vec<Gc<Object>>) -> Result<Gc<Object>, QuickReturn> {
    if args.len() != 1 {
        return Err(wrong_number_of_arguments(args.len(), 1));
    }
    let array = expect_array("last", &args[0])?;
    Ok(array.last().cloned().unwrap_or_else(Object::null))
}

fn builtin_rest(args: Vec<Gc<Object>>) -> Result<Gc<Object>, QuickReturn> {
    if args.len() != 1 {
        return Err(wrong_number_of_arguments(args.len(), 1));
    }
    let array = expect_array("rest", &args[0])?;
    if array.is_empty() {
        return Ok(Object::null());
    }
    Ok(Object::array(array[1..].to_vec()))
}

fn builtin_push(args: Vec<Gc<Object>>) -> Result<Gc<Object>, QuickReturn> {
    if args.len() != 2 {
        return Err(wrong_number_of_arguments(args.len(), 2));
    }
    let array = expect_array("push", &args[0])?;
    let mut new_array = array.clone();
    new_array.push(args[1].clone());
    Ok(Object::array(new_array))
}

fn builtin_puts(args: Vec<Gc<Object>>) -> Result<Gc<Object>, QuickReturn> {
    for argument in args {
        println!("{}", argument);
    }
    Ok(Object::null())
}

pub fn lookup(name: &str) -> Option<BuiltinFunction> {
    match name {
        "len" => Some(BuiltinFunction { func: builtin_len }),
        "first" => Some(BuiltinFunction {
            func: builtin_first,
        }),
        "last" => Some(BuiltinFunction { func: builtin_last }),
        "rest" => Some(BuiltinFunction { func: builtin_rest }),
        "push" => Some(BuiltinFunction { func: builtin_push }),
        "puts" => Some(BuiltinFunction { func: builtin_puts }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectKind;

    #[test]
    fn test_len() {
        assert_eq!(
            builtin_len(vec![]),
            Err(QuickReturn::Error(
                EvaluationError::WrongNumberOfArguments { got: 0, want: 1 }
            ))
        );

        let too_many = builtin_len(vec![
            Object::string("one".to_owned()),
            Object::string("two".to_owned()),
        ]);
        assert_eq!(
            too_many,
            Err(QuickReturn::Error(
                EvaluationError::WrongNumberOfArguments { got: 2, want: 1 }
            ))
        );

        assert_eq!(
            builtin_len(vec![Object::string(String::new())]),
            Ok(Object::integer(0))
        );
        assert_eq!(
            builtin_len(vec![Object::string("hello".to_owned())]),
            Ok(Object::integer(5))
        );

        // code units, not bytes: "é" is one unit, "𝄞" needs a surrogate pair
        assert_eq!(
            builtin_len(vec![Object::string("caf\u{e9}".to_owned())]),
            Ok(Object::integer(4))
        );
        assert_eq!(
            builtin_len(vec![Object::string("\u{1d11e}".to_owned())]),
            Ok(Object::integer(2))
        );

        let wrong_type = builtin_len(vec![Object::integer(1)]);
        assert_eq!(
            wrong_type,
            Err(QuickReturn::Error(EvaluationError::UnsupportedArgument {
                name: "len",
                got: ObjectKind::Integer,
            }))
        );
    }

    #[test]
    fn test_first_and_last() {
        let array = Object::array(vec![Object::integer(1), Object::integer(2)]);

        assert_eq!(builtin_first(vec![array.clone()]), Ok(Object::integer(1)));
        assert_eq!(builtin_last(vec![array]), Ok(Object::integer(2)));

        let empty = Object::array(vec![]);
        assert_eq!(builtin_first(vec![empty.clone()]), Ok(Object::null()));
        assert_eq!(builtin_last(vec![empty]), Ok(Object::null()));

        assert_eq!(
            builtin_first(vec![Object::integer(1)]),
            Err(QuickReturn::Error(EvaluationError::ArgumentMustBeArray {
                name: "first",
                got: ObjectKind::Integer,
            }))
        );
    }

    #[test]
    fn test_rest() {
        let array = Object::array(vec![
            Object::integer(1),
            Object::integer(2),
            Object::integer(3),
        ]);

        assert_eq!(
            builtin_rest(vec![array]),
            Ok(Object::array(vec![
                Object::integer(2),
                Object::integer(3)
            ]))
        );
        assert_eq!(
            builtin_rest(vec![Object::array(vec![])]),
            Ok(Object::null())
        );
    }

    #[test]
    fn test_push_leaves_the_input_untouched() {
        let original = Object::array(vec![Object::integer(1)]);

        let pushed = builtin_push(vec![original.clone(), Object::integer(2)]);

        assert_eq!(
            pushed,
            Ok(Object::array(vec![
                Object::integer(1),
                Object::integer(2)
            ]))
        );
        assert_eq!(original, Object::array(vec![Object::integer(1)]));
    }

    #[test]
    fn test_push_onto_empty_array() {
        let pushed = builtin_push(vec![Object::array(vec![]), Object::integer(1)]);

        assert_eq!(pushed, Ok(Object::array(vec![Object::integer(1)])));
    }

    #[test]
    fn test_lookup_knows_exactly_the_builtin_names() {
        for name in ["len", "first", "last", "rest", "push", "puts"] {
            assert!(lookup(name).is_some());
        }
        assert!(lookup("map").is_none());
    }
}
