//! Ribs: the transient lexical scopes pushed while walking bodies.

use crate::def::{Namespace, PerNs};
use crate::module::{ModuleId, ModuleTree};
use fxhash::FxHashMap;
use quill_syntax::NodeId;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RibKind {
    /// The program root
    Root,
    /// The members of a module-owning item (mod, struct, enum, trait, impl)
    Item,
    /// A function body; locals of enclosing functions are not visible through it
    Func,
    /// A lambda body; enclosing locals stay visible
    Lambda,
    Block,
    Loop,
    MatchArm,
    /// The initializer of a constant
    Const,
}

impl RibKind {
    /// Whether local variables bound outside this rib are hidden inside it.
    pub fn hides_outer_locals(self) -> bool {
        matches!(self, RibKind::Item | RibKind::Func | RibKind::Const)
    }
}

/// One lexical scope: optionally bound to a module, plus the locals it introduced.
#[derive(Debug, Clone)]
pub struct Rib {
    pub kind: RibKind,
    pub module: Option<ModuleId>,
    locals: PerNs<FxHashMap<String, NodeId>>,
}

impl Rib {
    pub fn new(kind: RibKind, module: Option<ModuleId>) -> Self {
        Self { kind, module, locals: PerNs::default() }
    }

    /// Binds a local, returning the node it shadows in this same rib.
    pub fn define(&mut self, ns: Namespace, name: &str, node: NodeId) -> Option<NodeId> {
        self.locals.get_mut(ns).insert(name.to_string(), node)
    }

    pub fn find(&self, ns: Namespace, name: &str) -> Option<NodeId> {
        self.locals.get(ns).get(name).copied()
    }
}

/// The stack of ribs currently in scope, innermost last.
#[derive(Debug)]
pub struct RibStack {
    ribs: Vec<Rib>,
}

impl RibStack {
    /// A stack holding only the root rib.
    pub fn new() -> Self {
        Self { ribs: vec![Rib::new(RibKind::Root, Some(ModuleId::ROOT))] }
    }

    pub fn push(&mut self, rib: Rib) {
        self.ribs.push(rib);
    }

    pub fn pop(&mut self) -> Rib {
        if self.ribs.len() <= 1 {
            crate::bug!("popped the root rib");
        }
        match self.ribs.pop() {
            Some(rib) => rib,
            None => crate::bug!("rib stack is empty"),
        }
    }

    pub fn depth(&self) -> usize {
        self.ribs.len()
    }

    pub fn current_mut(&mut self) -> &mut Rib {
        match self.ribs.last_mut() {
            Some(rib) => rib,
            None => crate::bug!("rib stack is empty"),
        }
    }

    /// Ribs from innermost to outermost.
    pub fn iter_rev(&self) -> impl Iterator<Item = &Rib> {
        self.ribs.iter().rev()
    }

    /// The innermost module any rib is bound to.
    pub fn nearest_module(&self) -> ModuleId {
        self.iter_rev().find_map(|rib| rib.module).unwrap_or(ModuleId::ROOT)
    }

    /// A readable listing of the stack, outermost first.
    pub fn dump(&self, modules: &ModuleTree) -> String {
        let mut out = String::new();
        for (depth, rib) in self.ribs.iter().enumerate() {
            let _ = write!(out, "{:indent$}[{}] {:?}", "", depth, rib.kind, indent = depth * 2);
            if let Some(module) = rib.module {
                let _ = write!(out, " module {:?}", modules.get(module).kind());
            }
            for ns in Namespace::ALL {
                let mut names: Vec<&str> = rib.locals.get(ns).keys().map(String::as_str).collect();
                if names.is_empty() {
                    continue;
                }
                names.sort_unstable();
                let _ = write!(out, " {}: {}", ns, names.join(", "));
            }
            out.push('\n');
        }
        out
    }
}

impl Default for RibStack {
    fn default() -> Self {
        Self::new()
    }
}
