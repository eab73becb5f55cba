use crate::def_table::DefTable;
use crate::module::ModuleTree;
use crate::resolutions::Resolutions;
use quill_source::SessionConfig;

/// Everything the front-end passes of one compilation share.
///
/// The builder writes the definition table and module tree; the name
/// resolver reads them and fills in the resolutions.
#[derive(Debug)]
pub struct Session {
    pub(crate) config: SessionConfig,
    pub(crate) def_table: DefTable,
    pub(crate) modules: ModuleTree,
    pub(crate) resolutions: Resolutions,
    pub(crate) tree_built: bool,
    pub(crate) names_resolved: bool,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            def_table: DefTable::new(),
            modules: ModuleTree::new(),
            resolutions: Resolutions::new(),
            tree_built: false,
            names_resolved: false,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn def_table(&self) -> &DefTable {
        &self.def_table
    }

    pub fn modules(&self) -> &ModuleTree {
        &self.modules
    }

    pub fn resolutions(&self) -> &Resolutions {
        &self.resolutions
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
