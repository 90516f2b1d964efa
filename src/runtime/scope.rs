use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::{Symbol, Value};
use crate::foreign::HostRegistry;
use crate::runtime::config::{Budget, EvalConfig};

/// State shared by every frame of one scope tree.
#[derive(Debug)]
pub(crate) struct Runtime {
    pub(crate) host: HostRegistry,
    pub(crate) budget: Budget,
}

struct Frame {
    bindings: RefCell<HashMap<Symbol, Value>>,
    parent: Option<Scope>,
    runtime: Rc<Runtime>,
}

/// A binding frame linked to an optional parent.
///
/// Scopes are shared handles: cloning a `Scope` yields another reference to
/// the same frame, and closures keep the frames they captured alive. Reads
/// walk toward the root; writes follow either the nearest-holder rule
/// ([`Scope::define`]) or stay local ([`Scope::let_local`]).
#[derive(Clone)]
pub struct Scope(Rc<Frame>);

impl Scope {
    /// An empty root frame with the given host bindings and limits.
    pub fn new(host: HostRegistry, config: EvalConfig) -> Self {
        let runtime = Rc::new(Runtime {
            host,
            budget: Budget::new(config),
        });
        Scope(Rc::new(Frame {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
            runtime,
        }))
    }

    /// An empty frame whose parent is `self`.
    pub fn child(&self) -> Scope {
        Scope(Rc::new(Frame {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(self.clone()),
            runtime: Rc::clone(&self.0.runtime),
        }))
    }

    /// An empty root frame that shares this tree's host and budget.
    pub fn detached(&self) -> Scope {
        Scope(Rc::new(Frame {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
            runtime: Rc::clone(&self.0.runtime),
        }))
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.0.parent.as_ref()
    }

    /// Resolves `name` through this frame and its ancestors.
    pub fn lookup(&self, name: Symbol) -> Option<Value> {
        let mut frame = Some(self);
        while let Some(scope) = frame {
            if let Some(value) = scope.0.bindings.borrow().get(&name) {
                return Some(value.clone());
            }
            frame = scope.parent();
        }
        None
    }

    /// Reads a binding by name; unbound names read as nil.
    pub fn get(&self, name: &str) -> Value {
        self.lookup(Symbol::new(name)).unwrap_or_default()
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.lookup(name).is_some()
    }

    pub fn contains_local(&self, name: Symbol) -> bool {
        self.0.bindings.borrow().contains_key(&name)
    }

    /// Assigns into the nearest frame that already binds `name`, or binds it
    /// locally when no frame does.
    pub fn define(&self, name: Symbol, value: Value) {
        let mut frame = Some(self);
        while let Some(scope) = frame {
            if let Some(slot) = scope.0.bindings.borrow_mut().get_mut(&name) {
                *slot = value;
                return;
            }
            frame = scope.parent();
        }
        self.let_local(name, value);
    }

    /// Binds `name` in this frame only, shadowing any outer binding.
    pub fn let_local(&self, name: Symbol, value: Value) {
        self.0.bindings.borrow_mut().insert(name, value);
    }

    /// Removes every binding in this frame.
    ///
    /// Closures defined in a frame hold the frame itself, so a frame that
    /// binds one is only freed once its bindings are cleared.
    pub fn clear(&self) {
        let bindings = std::mem::take(&mut *self.0.bindings.borrow_mut());
        // Values may drop other frames; release the borrow first.
        drop(bindings);
    }

    /// Names bound directly in this frame.
    pub fn local_names(&self) -> Vec<Symbol> {
        self.0.bindings.borrow().keys().copied().collect()
    }

    pub fn host(&self) -> &HostRegistry {
        &self.0.runtime.host
    }

    pub fn config(&self) -> &EvalConfig {
        self.0.runtime.budget.config()
    }

    pub(crate) fn budget(&self) -> &Budget {
        &self.0.runtime.budget
    }

    /// True when both handles refer to the same frame.
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::new(HostRegistry::new(), EvalConfig::default())
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth = 0;
        let mut frame = self.parent();
        while let Some(scope) = frame {
            depth += 1;
            frame = scope.parent();
        }
        f.debug_struct("Scope")
            .field("locals", &self.0.bindings.borrow().len())
            .field("depth", &depth)
            .finish()
    }
}
