use crate::def::DefId;
use fxhash::FxHashMap;
use quill_syntax::NodeId;

/// What a path-shaped node refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Res {
    Def(DefId),
    /// A local variable, identified by the pattern node that binds it
    Local(NodeId),
    /// The leading segments name the type `base`; the last `unresolved`
    /// segments are associated items left for type checking (`Vec::new`)
    TypeRelative { base: DefId, unresolved: usize },
    /// Resolution failed; a diagnostic was reported for this node
    Error,
}

impl Res {
    pub fn def_id(self) -> Option<DefId> {
        match self {
            Res::Def(def_id) => Some(def_id),
            Res::Local(_) | Res::TypeRelative { .. } | Res::Error => None,
        }
    }

    pub fn is_error(self) -> bool {
        self == Res::Error
    }
}

/// Results of name resolution, keyed by the node of each path, lifetime use,
/// `self` value or struct shorthand field.
#[derive(Debug, Default, Clone)]
pub struct Resolutions {
    map: FxHashMap<NodeId, Res>,
}

impl Resolutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, node: NodeId, res: Res) {
        if let Some(prev) = self.map.insert(node, res) {
            crate::bug!("{} resolved twice ({:?}, then {:?})", node, prev, res);
        }
    }

    pub fn get(&self, node: NodeId) -> Option<Res> {
        self.map.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// All resolutions, ordered by node.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Res)> {
        let mut entries: Vec<_> = self.map.iter().map(|(node, res)| (*node, *res)).collect();
        entries.sort_by_key(|(node, _)| *node);
        entries.into_iter()
    }
}
