use std::collections::HashMap;

use gc::Gc;
use gibbon_lang_core::ast;
use gibbon_lang_core::ast::Expression;

use crate::environment::Environment;
use crate::object::{EvaluationError, HashKey, Object, QuickReturn};

pub fn eval_program(
    program: &ast::Program,
    environment: &mut Environment,
) -> Result<Gc<Object>, EvaluationError> {
    let mut output = Object::null();
    for statement in &program.statements {
        let result = eval_statement(statement, environment);

        match result {
            Err(QuickReturn::Return(value)) => return Ok(value),
            Err(QuickReturn::Error(error)) => return Err(error),
            Ok(object) => output = object,
        };
    }
    Ok(output)
}

fn eval_statement(
    statement: &ast::Statement,
    environment: &mut Environment,
) -> Result<Gc<Object>, QuickReturn> {
    match statement {
        ast::Statement::Expression(expression) => eval_expression(expression, environment),
        ast::Statement::Return(statement) => eval_return_statement(statement, environment),
        ast::Statement::Let(statement) => eval_let_statement(statement, environment),
    }
}

fn eval_let_statement(
    statement: &ast::LetStatement,
    environment: &mut Environment,
) -> Result<Gc<Object>, QuickReturn> {
    let value = eval_expression(&statement.value, environment)?;
    environment.set(&statement.identifier.name, value);
    Ok(Object::null())
}

fn eval_return_statement(
    statement: &ast::ReturnStatement,
    environment: &mut Environment,
) -> Result<Gc<Object>, QuickReturn> {
    let value = eval_expression(&statement.value, environment)?;
    Err(QuickReturn::Return(value))
}

fn eval_expression(
    expression: &Expression,
    environment: &mut Environment,
) -> Result<Gc<Object>, QuickReturn> {
    match expression {
        Expression::IntegerLiteral(value) => Ok(Object::integer(*value)),
        Expression::BooleanLiteral(value) => Ok(Object::boolean(*value)),
        Expression::StringLiteral(value) => Ok(Object::string(value.clone())),
        Expression::ArrayLiteral(array) => Ok(Object::array(
            array
                .iter()
                .map(|expression| eval_expression(expression, environment))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        Expression::HashLiteral(literal) => eval_hash_literal(literal, environment),
        Expression::Identifier(identifier) => environment
            .get(&identifier.name)
            .or_else(|| crate::builtins::lookup(&identifier.name).map(Object::builtin_function))
            .ok_or_else(|| {
                QuickReturn::Error(EvaluationError::IdentifierNotFound(identifier.name.clone()))
            }),
        Expression::PrefixOperation(kind, expression) => {
            let right = eval_expression(expression, environment);
            eval_prefix_operation(kind, right)
        }
        Expression::InfixOperation(kind, left, right) => {
            let left = eval_expression(left, environment);
            let right = eval_expression(right, environment);
            eval_infix_operation(kind, left, right)
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, environment)?;
            if is_truthy(&condition) {
                eval_block_statement(consequence, environment)
            } else if let Some(alternative) = alternative {
                eval_block_statement(alternative, environment)
            } else {
                Ok(Object::null())
            }
        }
        Expression::FunctionLiteral { parameters, body } => Ok(Object::function(
            parameters.clone(),
            body.clone(),
            environment.clone(),
        )),
        Expression::CallExpression {
            function,
            arguments,
        } => {
            let function = eval_expression(function, environment)?;
            let arguments = eval_expressions(arguments, environment)?;
            match function.as_ref() {
                Object::Function(function) => apply_function(function, arguments),
                Object::BuiltinFunction(builtin) => (builtin.func)(arguments),
                _ => Err(QuickReturn::Error(EvaluationError::NotAFunction(
                    function.kind(),
                ))),
            }
        }
        Expression::IndexExpression { left, index } => {
            let left = eval_expression(left, environment)?;
            let index = eval_expression(index, environment)?;
            eval_index_expression(left, index)
        }
    }
}

/// Only `false` and `null` are falsy; every other value, the integer zero
/// included, is truthy.
fn is_truthy(object: &Object) -> bool {
    !matches!(object, Object::Boolean(false) | Object::Null)
}

fn eval_hash_literal(
    literal: &[(Expression, Expression)],
    environment: &mut Environment,
) -> Result<Gc<Object>, QuickReturn> {
    let mut hashmap = HashMap::new();
    for (key, value) in literal {
        let key = eval_expression(key, environment)?;
        let hashed_key = HashKey::from_object(&key).map_err(QuickReturn::Error)?;
        let value = eval_expression(value, environment)?;
        hashmap.insert(hashed_key, (key, value));
    }
    Ok(Object::hash(hashmap))
}

fn eval_expressions(
    arguments: &Vec<Expression>,
    environment: &mut Environment,
) -> Result<Vec<Gc<Object>>, QuickReturn> {
    let mut result = Vec::new();
    for argument in arguments {
        result.push(eval_expression(argument, environment)?);
    }
    Ok(result)
}

// Arguments are bound positionally; the call itself checks no arity.
// Surplus arguments are dropped and missing parameters are left unbound,
// surfacing later, if at all, as an unknown identifier.
fn apply_function(
    function: &crate::object::Function,
    arguments: Vec<Gc<Object>>,
) -> Result<Gc<Object>, QuickReturn> {
    let mut environment = Environment::new_enclosed(&function.env);
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        environment.set(&parameter.name, argument);
    }
    match eval_block_statement(&function.body, &mut environment) {
        Ok(object) => Ok(object),
        Err(QuickReturn::Return(value)) => Ok(value),
        Err(QuickReturn::Error(error)) => Err(QuickReturn::Error(error)),
    }
}

fn eval_block_statement(
    block: &ast::BlockStatement,
    environment: &mut Environment,
) -> Result<Gc<Object>, QuickReturn> {
    let mut result = Object::null();
    for statement in &block.statements {
        result = eval_statement(statement, environment)?;
    }
    Ok(result)
}

fn eval_prefix_operation(
    kind: &ast::PrefixOperationKind,
    right: Result<Gc<Object>, QuickReturn>,
) -> Result<Gc<Object>, QuickReturn> {
    let right = right?;
    match kind {
        ast::PrefixOperationKind::Bang => Ok(Object::boolean(!is_truthy(&right))),
        ast::PrefixOperationKind::Minus => match right.as_ref() {
            Object::Integer(value) => Ok(Object::integer(value.wrapping_neg())),
            _ => Err(QuickReturn::Error(EvaluationError::UnknownPrefixOperator {
                operation: kind.clone(),
                right: right.kind(),
            })),
        },
    }
}

fn eval_infix_operation(
    kind: &ast::InfixOperationKind,
    left: Result<Gc<Object>, QuickReturn>,
    right: Result<Gc<Object>, QuickReturn>,
) -> Result<Gc<Object>, QuickReturn> {
    use ast::InfixOperationKind;
    let left = left?;
    let right = right?;
    match (left.as_ref(), right.as_ref()) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_operation(kind, *left, *right)
        }
        (Object::String(left), Object::String(right)) => {
            eval_string_infix_operation(kind, left, right)
        }
        // Everything else compares by identity; the singletons for `true`,
        // `false` and `null` make this value-correct for them.
        _ => match kind {
            InfixOperationKind::Equal => Ok(Object::boolean(Gc::ptr_eq(&left, &right))),
            InfixOperationKind::NotEqual => Ok(Object::boolean(!Gc::ptr_eq(&left, &right))),
            _ if left.kind() != right.kind() => {
                Err(QuickReturn::Error(EvaluationError::TypeMismatch {
                    left: left.kind(),
                    operation: kind.clone(),
                    right: right.kind(),
                }))
            }
            _ => Err(QuickReturn::Error(EvaluationError::UnknownInfixOperator {
                left: left.kind(),
                operation: kind.clone(),
                right: right.kind(),
            })),
        },
    }
}

fn eval_integer_infix_operation(
    kind: &ast::InfixOperationKind,
    left: i64,
    right: i64,
) -> Result<Gc<Object>, QuickReturn> {
    use ast::InfixOperationKind::*;
    match kind {
        Plus => Ok(Object::integer(left.wrapping_add(right))),
        Minus => Ok(Object::integer(left.wrapping_sub(right))),
        Multiply => Ok(Object::integer(left.wrapping_mul(right))),
        Divide => {
            if right == 0 {
                Err(QuickReturn::Error(EvaluationError::DivisionByZero))
            } else {
                Ok(Object::integer(left.wrapping_div(right)))
            }
        }
        LessThan => Ok(Object::boolean(left < right)),
        GreaterThan => Ok(Object::boolean(left > right)),
        Equal => Ok(Object::boolean(left == right)),
        NotEqual => Ok(Object::boolean(left != right)),
    }
}

fn eval_string_infix_operation(
    kind: &ast::InfixOperationKind,
    left: &str,
    right: &str,
) -> Result<Gc<Object>, QuickReturn> {
    match kind {
        ast::InfixOperationKind::Plus => Ok(Object::string(format!("{}{}", left, right))),
        _ => Err(QuickReturn::Error(EvaluationError::UnknownInfixOperator {
            left: crate::object::ObjectKind::String,
            operation: kind.clone(),
            right: crate::object::ObjectKind::String,
        })),
    }
}

fn eval_index_expression(
    left: Gc<Object>,
    index: Gc<Object>,
) -> Result<Gc<Object>, QuickReturn> {
    match (left.as_ref(), index.as_ref()) {
        (Object::Array(array), Object::Integer(index)) => Ok(usize::try_from(*index)
            .ok()
            .and_then(|idx| array.get(idx))
            .cloned()
            .unwrap_or_else(Object::null)),
        (Object::Hash(hash), _) => {
            let hashed_index = HashKey::from_object(&index).map_err(QuickReturn::Error)?;
            Ok(hash
                .get(&hashed_index)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(Object::null))
        }
        _ => Err(QuickReturn::Error(EvaluationError::IndexNotSupported(
            left.kind(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use gc::Gc;
    use gibbon_lang_core::lexer::Tokenizer;
    use gibbon_lang_core::parser::Parser;

    use crate::environment::Environment;
    use crate::object::{EvaluationError, Object};

    fn evaluate(input: &str) -> Result<Gc<Object>, EvaluationError> {
        let tokenizer = Tokenizer::new(input);
        let mut parser = Parser::new(tokenizer);
        let ast = parser.parse_program().unwrap();
        super::eval_program(&ast, &mut Environment::new())
    }

    fn test_evaluation(inputs: Vec<(&str, Result<Gc<Object>, EvaluationError>)>) {
        for (input, output) in inputs {
            assert_eq!(evaluate(input), output, "input: {}", input);
        }
    }

    fn test_error_messages(inputs: Vec<(&str, &str)>) {
        for (input, message) in inputs {
            let error = evaluate(input).expect_err("evaluation should fail");
            assert_eq!(error.to_string(), message, "input: {}", input);
        }
    }

    #[test]
    fn test_literals() {
        let inputs = vec![
            ("5;", Ok(Object::integer(5))),
            ("true;", Ok(Object::boolean(true))),
            ("false;", Ok(Object::boolean(false))),
            ("\"hello\";", Ok(Object::string("hello".to_owned()))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_prefix_operations() {
        let inputs = vec![
            ("--5;", Ok(Object::integer(5))),
            ("-10;", Ok(Object::integer(-10))),
            ("!true;", Ok(Object::boolean(false))),
            ("!false;", Ok(Object::boolean(true))),
            // zero is truthy
            ("!0;", Ok(Object::boolean(false))),
            ("!5;", Ok(Object::boolean(false))),
            ("!!true;", Ok(Object::boolean(true))),
            ("!!5;", Ok(Object::boolean(true))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_integer_arithmetic() {
        let inputs = vec![
            ("1 + 2 * 3", Ok(Object::integer(7))),
            ("(1 + 2) * 3", Ok(Object::integer(9))),
            ("(5 + 5) * 2", Ok(Object::integer(20))),
            ("5 + 5 + 5 + 5 - 10", Ok(Object::integer(10))),
            ("2 * 2 * 2 * 2 * 2", Ok(Object::integer(32))),
            ("50 / 2 * 2 + 10", Ok(Object::integer(60))),
            // integer division truncates
            ("7 / 2", Ok(Object::integer(3))),
            ("3 * (3 * 3) + 10", Ok(Object::integer(37))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_integer_arithmetic_edges() {
        let inputs = vec![
            // overflow wraps rather than faulting the host
            (
                "9223372036854775807 + 1",
                Ok(Object::integer(i64::MIN)),
            ),
            (
                "-9223372036854775807 - 2",
                Ok(Object::integer(i64::MAX)),
            ),
            (
                "9223372036854775807 * 2",
                Ok(Object::integer(-2)),
            ),
            ("5 / 0", Err(EvaluationError::DivisionByZero)),
            ("0 / 5", Ok(Object::integer(0))),
            (
                "-(9223372036854775807 + 1)",
                Ok(Object::integer(i64::MIN)),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_comparison_operators() {
        let inputs = vec![
            ("1 < 2", Ok(Object::boolean(true))),
            ("1 > 2", Ok(Object::boolean(false))),
            ("1 == 1", Ok(Object::boolean(true))),
            ("1 != 1", Ok(Object::boolean(false))),
            ("true == true", Ok(Object::boolean(true))),
            ("false == false", Ok(Object::boolean(true))),
            ("true != false", Ok(Object::boolean(true))),
            ("(1 < 2) == true", Ok(Object::boolean(true))),
            ("(1 > 2) == true", Ok(Object::boolean(false))),
            // mixed types fall back to identity comparison
            ("5 == true", Ok(Object::boolean(false))),
            ("5 != true", Ok(Object::boolean(true))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_if_expressions() {
        let inputs = vec![
            ("if (true) { 10 }", Ok(Object::integer(10))),
            ("if (false) { 10 }", Ok(Object::null())),
            ("if (1) { 10 }", Ok(Object::integer(10))),
            ("if (1 < 2) { 10 }", Ok(Object::integer(10))),
            ("if (1 > 2) { 10 }", Ok(Object::null())),
            ("if (1 > 2) { 10 } else { 20 }", Ok(Object::integer(20))),
            ("if (1 < 2) { 10 } else { 20 }", Ok(Object::integer(10))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_return_statements() {
        let inputs = vec![
            ("return 10;", Ok(Object::integer(10))),
            ("return 10; 9;", Ok(Object::integer(10))),
            ("return 2 * 5; 9;", Ok(Object::integer(10))),
            ("9; return 2 * 5; 9;", Ok(Object::integer(10))),
            (
                "if (10 > 1) { if (10 > 1) { return 10; }; return 1; }",
                Ok(Object::integer(10)),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_let_statements() {
        let inputs = vec![
            ("let a = 5; a;", Ok(Object::integer(5))),
            ("let a = 5 * 5; a;", Ok(Object::integer(25))),
            ("let a = 5; let b = a; b;", Ok(Object::integer(5))),
            (
                "let a = 5; let b = a; let c = a + b + 5; c;",
                Ok(Object::integer(15)),
            ),
            // a binding is not an expression; the statement itself is null
            ("let a = 5;", Ok(Object::null())),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_error_reporting() {
        let inputs = vec![
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "5; true + false; 5",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            (
                "if (10 > 1) { true + false; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            (
                "\"Hello\" - \"World\"",
                "unknown operator: STRING - STRING",
            ),
            ("foobar", "identifier not found: foobar"),
            ("5(3)", "not a function: INTEGER"),
            (
                "{\"name\": \"value\"}[fn(x) { x }];",
                "unusable as hash key: FUNCTION",
            ),
            ("{fn(x) { x }: 1}", "unusable as hash key: FUNCTION"),
            ("[1, 2][\"a\"]", "index operator not supported: ARRAY"),
            ("true[0]", "index operator not supported: BOOLEAN"),
        ];

        test_error_messages(inputs);
    }

    #[test]
    fn test_string_operations() {
        let inputs = vec![
            (
                "\"Hello\" + \" \" + \"World\"",
                Ok(Object::string("Hello World".to_owned())),
            ),
            ("len(\"four\")", Ok(Object::integer(4))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_function_application() {
        let inputs = vec![
            (
                "let identity = fn(x) { x }; identity(5)",
                Ok(Object::integer(5)),
            ),
            (
                "let identity = fn(x) { return x; }; identity(5)",
                Ok(Object::integer(5)),
            ),
            (
                "let double = fn(x) { x * 2 }; double(5)",
                Ok(Object::integer(10)),
            ),
            (
                "let add = fn(x, y) { x + y }; add(5, 5)",
                Ok(Object::integer(10)),
            ),
            (
                "let add = fn(x, y) { x + y }; add(5 + 5, add(5, 5))",
                Ok(Object::integer(20)),
            ),
            ("fn(x) { x }(5)", Ok(Object::integer(5))),
            (
                "let factorial = fn(n) {
                    if (n < 2) { 1 }
                    else { factorial(n - 1) * n }
                };
                factorial(3)",
                Ok(Object::integer(6)),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_calls_are_not_arity_checked() {
        let inputs = vec![
            // surplus arguments are dropped
            (
                "let identity = fn(x) { x }; identity(5, 6)",
                Ok(Object::integer(5)),
            ),
            // a parameter never bound surfaces as an unknown identifier
            (
                "let add = fn(x, y) { x + y }; add(1)",
                Err(EvaluationError::IdentifierNotFound("y".into())),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_closures() {
        let inputs = vec![
            (
                "let newAdder = fn(x) { fn(y) { x + y } };
                let addTwo = newAdder(2);
                addTwo(3);",
                Ok(Object::integer(5)),
            ),
            (
                "let counter = fn(x) { fn() { x + 1 } };
                counter(1)();",
                Ok(Object::integer(2)),
            ),
            (
                "let fa = fn() {
                    let x = 5;
                    let fb = fn() { x };
                    fb
                };
                let temp = fa();
                temp()",
                Ok(Object::integer(5)),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_array_literals_and_indexing() {
        let inputs = vec![
            (
                "[1, 2 * 2, 3 + 3]",
                Ok(Object::array(vec![
                    Object::integer(1),
                    Object::integer(4),
                    Object::integer(6),
                ])),
            ),
            ("[1, 2, 3][0]", Ok(Object::integer(1))),
            ("[1, 2, 3][2]", Ok(Object::integer(3))),
            ("let i = 0; [1][i];", Ok(Object::integer(1))),
            // out of range yields null, never an error
            ("[1, 2, 3][3]", Ok(Object::null())),
            ("[1, 2, 3][-1]", Ok(Object::null())),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_hash_literals_and_indexing() {
        let inputs = vec![
            ("{\"one\": 1}[\"one\"]", Ok(Object::integer(1))),
            ("{\"one\": 1}[\"two\"]", Ok(Object::null())),
            ("{1: \"one\"}[1]", Ok(Object::string("one".to_owned()))),
            ("{true: 5}[true]", Ok(Object::integer(5))),
            ("{false: 5}[false]", Ok(Object::integer(5))),
            (
                "let key = \"one\"; {\"one\": 5 * 5}[key]",
                Ok(Object::integer(25)),
            ),
            ("{}[\"missing\"]", Ok(Object::null())),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_builtins_through_the_evaluator() {
        let inputs = vec![
            ("len(\"\")", Ok(Object::integer(0))),
            ("len(\"hello world\")", Ok(Object::integer(11))),
            (
                "len(1)",
                Err(EvaluationError::UnsupportedArgument {
                    name: "len",
                    got: crate::object::ObjectKind::Integer,
                }),
            ),
            (
                "len(\"one\", \"two\")",
                Err(EvaluationError::WrongNumberOfArguments { got: 2, want: 1 }),
            ),
            ("first([1, 2, 3])", Ok(Object::integer(1))),
            ("last([1, 2, 3])", Ok(Object::integer(3))),
            (
                "rest([1, 2, 3])",
                Ok(Object::array(vec![
                    Object::integer(2),
                    Object::integer(3),
                ])),
            ),
            (
                "push([1], 2)",
                Ok(Object::array(vec![
                    Object::integer(1),
                    Object::integer(2),
                ])),
            ),
            // a `let` binding shadows a builtin
            ("let len = fn(x) { 42 }; len(\"hi\")", Ok(Object::integer(42))),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_evaluation_is_idempotent_across_fresh_environments() {
        let input = "let apply = fn(f, x) { f(x) };
            apply(fn(x) { x * 3 }, [1, 2, 3][1] + len(\"ab\"))";

        let tokenizer = Tokenizer::new(input);
        let mut parser = Parser::new(tokenizer);
        let ast = parser.parse_program().unwrap();

        let first = super::eval_program(&ast, &mut Environment::new());
        let second = super::eval_program(&ast, &mut Environment::new());

        assert_eq!(first, Ok(Object::integer(12)));
        assert_eq!(first, second);
    }
}
