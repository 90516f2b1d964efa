use std::fmt;
use std::rc::Rc;

use crate::ast::{List, Value};
use crate::atoms::{special_forms, Atom, Primitive};
use crate::errors::EvalResult;
use crate::foreign::{ForeignConstructor, ForeignFunction};
use crate::runtime::eval::eval_args;
use crate::runtime::{Function, Macro, Scope};

/// Everything that can sit at the head of an application.
///
/// All variants share one contract: [`Callable::apply`] receives the caller's
/// scope and the raw, unevaluated argument forms, and decides for itself
/// whether and how to evaluate them.
#[derive(Clone)]
pub enum Callable {
    Primitive(Rc<Primitive>),
    Function(Rc<Function>),
    Macro(Rc<Macro>),
    Foreign(Rc<ForeignFunction>),
    Constructor(Rc<ForeignConstructor>),
}

impl Callable {
    /// Applies the callable to raw argument forms.
    pub fn apply(&self, scope: &Scope, args: &List) -> EvalResult {
        match self {
            Callable::Primitive(primitive) => primitive.apply(scope, args),
            Callable::Function(function) => function.apply(scope, args),
            Callable::Macro(mac) => mac.apply(scope, args),
            Callable::Foreign(function) => function.call(&eval_args(args, scope)?),
            Callable::Constructor(constructor) => constructor.construct(scope, &eval_args(args, scope)?),
        }
    }

    /// Applies the callable to values that have already been evaluated.
    ///
    /// Callables that would otherwise evaluate their operands receive each
    /// value quoted, so it evaluates back to itself.
    pub fn invoke(&self, scope: &Scope, args: Vec<Value>) -> EvalResult {
        match self {
            Callable::Primitive(primitive) => primitive.call(scope, &args),
            Callable::Function(function) => function.invoke(args),
            Callable::Macro(mac) => mac.apply(scope, &quote_all(args)),
            Callable::Foreign(function) => function.call(&args),
            Callable::Constructor(constructor) => constructor.construct(scope, &args),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Callable::Primitive(primitive) if primitive.is_special_form() => {
                format!("special form {}", primitive.name)
            }
            Callable::Primitive(primitive) => format!("primitive {}", primitive.name),
            Callable::Function(_) => "function".to_string(),
            Callable::Macro(_) => "macro".to_string(),
            Callable::Foreign(function) => format!("host function {}", function.name()),
            Callable::Constructor(constructor) => format!("host type {}", constructor.name()),
        }
    }

    /// True when both values are the same callable instance.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Primitive(a), Callable::Primitive(b)) => Rc::ptr_eq(a, b),
            (Callable::Function(a), Callable::Function(b)) => Rc::ptr_eq(a, b),
            (Callable::Macro(a), Callable::Macro(b)) => Rc::ptr_eq(a, b),
            (Callable::Foreign(a), Callable::Foreign(b)) => Rc::ptr_eq(a, b),
            (Callable::Constructor(a), Callable::Constructor(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Wraps symbols and lists in a quotation so re-evaluating them is the
/// identity. Other values already evaluate to themselves.
pub(crate) fn quote_all(args: impl IntoIterator<Item = Value>) -> List {
    args.into_iter()
        .map(|arg| match arg {
            Value::Symbol(_) | Value::List(_) => {
                let quote = Primitive::new("quote", Atom::SpecialForm(special_forms::ATOM_QUOTE));
                Value::list([Value::Callable(Callable::Primitive(Rc::new(quote))), arg])
            }
            other => other,
        })
        .collect()
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.describe())
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Callable(Callable::Function(Rc::new(function)))
    }
}

impl From<Macro> for Value {
    fn from(mac: Macro) -> Self {
        Value::Callable(Callable::Macro(Rc::new(mac)))
    }
}

impl From<ForeignFunction> for Value {
    fn from(function: ForeignFunction) -> Self {
        Value::Callable(Callable::Foreign(Rc::new(function)))
    }
}

impl From<ForeignConstructor> for Value {
    fn from(constructor: ForeignConstructor) -> Self {
        Value::Callable(Callable::Constructor(Rc::new(constructor)))
    }
}
