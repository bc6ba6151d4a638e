use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use gc::{Finalize, Gc, Trace};
use gibbon_lang_core::ast;
use thiserror::Error;

use crate::environment::Environment;

#[derive(Debug, PartialEq, Clone, Trace, Finalize)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Vec<Gc<Object>>),
    Hash(HashMap<HashKey, (Gc<Object>, Gc<Object>)>),
    Function(Function),
    BuiltinFunction(BuiltinFunction),
    Null,
}

thread_local! {
    static NULL: Gc<Object> = Gc::new(Object::Null);
    static TRUE: Gc<Object> = Gc::new(Object::Boolean(true));
    static FALSE: Gc<Object> = Gc::new(Object::Boolean(false));
}

impl Object {
    pub fn null() -> Gc<Object> {
        NULL.with(|x| x.clone())
    }
    pub fn boolean(value: bool) -> Gc<Object> {
        if value {
            TRUE.with(|x| x.clone())
        } else {
            FALSE.with(|x| x.clone())
        }
    }
    pub fn integer(value: i64) -> Gc<Object> {
        Gc::new(Object::Integer(value))
    }
    pub fn string(value: String) -> Gc<Object> {
        Gc::new(Object::String(value))
    }
    pub fn array(array: Vec<Gc<Object>>) -> Gc<Object> {
        Gc::new(Object::Array(array))
    }
    pub fn hash(hash: HashMap<HashKey, (Gc<Object>, Gc<Object>)>) -> Gc<Object> {
        Gc::new(Object::Hash(hash))
    }
    pub fn function(
        parameters: Vec<ast::Identifier>,
        body: ast::BlockStatement,
        env: Environment,
    ) -> Gc<Object> {
        Gc::new(Object::Function(Function {
            parameters,
            body,
            env,
        }))
    }
    pub fn builtin_function(func: BuiltinFunction) -> Gc<Object> {
        Gc::new(Object::BuiltinFunction(func))
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Integer(_) => ObjectKind::Integer,
            Object::Boolean(_) => ObjectKind::Boolean,
            Object::String(_) => ObjectKind::String,
            Object::Array(_) => ObjectKind::Array,
            Object::Hash(_) => ObjectKind::Hash,
            Object::Function(_) => ObjectKind::Function,
            Object::BuiltinFunction(_) => ObjectKind::Builtin,
            Object::Null => ObjectKind::Null,
        }
    }
}

/// Type tag of a runtime value, displayed in error messages.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Trace, Finalize)]
pub enum ObjectKind {
    Integer,
    Boolean,
    String,
    Array,
    Hash,
    Function,
    Builtin,
    Null,
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectKind::Integer => "INTEGER",
            ObjectKind::Boolean => "BOOLEAN",
            ObjectKind::String => "STRING",
            ObjectKind::Array => "ARRAY",
            ObjectKind::Hash => "HASH",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Builtin => "BUILTIN",
            ObjectKind::Null => "NULL",
        };
        write!(f, "{}", name)
    }
}

/// Key of a hash entry: the value's type tag plus a numeric hash. Two
/// hashable objects address the same entry iff both components match.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Trace, Finalize)]
pub struct HashKey {
    pub kind: ObjectKind,
    pub value: u64,
}

impl HashKey {
    pub fn from_object(object: &Gc<Object>) -> Result<Self, EvaluationError> {
        match object.as_ref() {
            Object::Integer(value) => Ok(HashKey {
                kind: ObjectKind::Integer,
                value: *value as u64,
            }),
            Object::Boolean(value) => Ok(HashKey {
                kind: ObjectKind::Boolean,
                value: u64::from(*value),
            }),
            Object::String(value) => Ok(HashKey {
                kind: ObjectKind::String,
                value: hash_string(value),
            }),
            _ => Err(EvaluationError::UnusableAsHashKey(object.kind())),
        }
    }
}

// DJB2 over UTF-16 code units: seed 5381, hash = hash * 33 + unit, every
// step constrained to 32-bit signed arithmetic, the final value
// reinterpreted as unsigned.
fn hash_string(text: &str) -> u64 {
    let mut hash: i32 = 5381;
    for unit in text.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(i32::from(unit));
    }
    u64::from(hash as u32)
}

#[derive(Clone, Trace, Finalize)]
pub struct Function {
    #[unsafe_ignore_trace]
    pub parameters: Vec<ast::Identifier>,
    #[unsafe_ignore_trace]
    pub body: ast::BlockStatement,
    pub env: Environment,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters
            && self.body == other.body
            && self.env.ptr_eq(&other.env)
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("ptr", &(self as *const Function as usize))
            .finish()
    }
}

#[derive(Clone, Trace, Finalize)]
pub struct BuiltinFunction {
    pub func: fn(Vec<Gc<Object>>) -> Result<Gc<Object>, QuickReturn>,
}

impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        self.func as usize == other.func as usize
    }
}

impl std::fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("ptr", &(self as *const BuiltinFunction))
            .finish()
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::Array(array) => {
                write!(f, "[")?;
                for (i, element) in array.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Object::Hash(hash) => {
                write!(f, "{{")?;
                for (i, (key, value)) in hash.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Object::Function(function) => {
                write!(
                    f,
                    "fn({}) {}",
                    function
                        .parameters
                        .iter()
                        .map(|id| id.name.as_ref())
                        .collect::<Vec<&str>>()
                        .join(", "),
                    function.body
                )
            }
            Object::BuiltinFunction(_) => write!(f, "builtin function"),
        }
    }
}

/// Result channel of a single evaluation step. `Return` carries a value up
/// to the enclosing function call or program; `Error` propagates unchanged
/// to the boundary.
#[derive(Debug, PartialEq)]
pub enum QuickReturn {
    Return(Gc<Object>),
    Error(EvaluationError),
}

#[derive(Debug, PartialEq, Error)]
pub enum EvaluationError {
    #[error("type mismatch: {left} {} {right}", .operation.symbol())]
    TypeMismatch {
        left: ObjectKind,
        operation: ast::InfixOperationKind,
        right: ObjectKind,
    },
    #[error("unknown operator: {left} {} {right}", .operation.symbol())]
    UnknownInfixOperator {
        left: ObjectKind,
        operation: ast::InfixOperationKind,
        right: ObjectKind,
    },
    #[error("unknown operator: {}{right}", .operation.symbol())]
    UnknownPrefixOperator {
        operation: ast::PrefixOperationKind,
        right: ObjectKind,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("identifier not found: {0}")]
    IdentifierNotFound(Rc<str>),
    #[error("not a function: {0}")]
    NotAFunction(ObjectKind),
    #[error("index operator not supported: {0}")]
    IndexNotSupported(ObjectKind),
    #[error("unusable as hash key: {0}")]
    UnusableAsHashKey(ObjectKind),
    #[error("wrong number of arguments. got={got}, want={want}")]
    WrongNumberOfArguments { got: usize, want: usize },
    #[error("argument to `{name}` not supported, got {got}")]
    UnsupportedArgument {
        name: &'static str,
        got: ObjectKind,
    },
    #[error("argument to `{name}` must be ARRAY, got {got}")]
    ArgumentMustBeArray {
        name: &'static str,
        got: ObjectKind,
    },
}
