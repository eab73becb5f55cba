//! Name resolution for the quill compiler.
//!
//! Resolution runs in two passes over a parsed [`Program`]:
//!
//! 1. [`build_module_tree`] defines every named item in the [`DefTable`],
//!    arranges scopes into a [`ModuleTree`] and then resolves `use`
//!    declarations.
//! 2. [`resolve_names`] walks every body and records, for each path-shaped
//!    node, what it refers to in the session's [`Resolutions`].
//!
//! Both passes collect [`ResolutionError`]s instead of stopping at the first
//! problem. Broken internal invariants are not diagnostics: they abort with an
//! internal compiler error.

/// Aborts on a broken internal invariant, logging it first.
macro_rules! bug {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        ::log::error!("internal compiler error: {}", message);
        panic!("internal compiler error: {}", message)
    }};
}
pub(crate) use bug;

mod builder;
mod def;
mod def_table;
mod error;
mod imports;
mod module;
mod printer;
mod resolutions;
mod resolver;
mod rib;
mod session;

pub use builder::ModuleTreeBuilder;
pub use def::{Def, DefId, DefIndex, DefKind, FosId, Namespace, PerNs, Vis};
pub use def_table::{DefTable, Fos, FosRedefs};
pub use error::ResolutionError;
pub use imports::{ImportDirective, ImportKind, ImportResolver};
pub use module::{Module, ModuleId, ModuleKind, ModuleTree, NameBinding};
pub use printer::ModulePrinter;
pub use resolutions::{Res, Resolutions};
pub use resolver::NameResolver;
pub use rib::{Rib, RibKind, RibStack};
pub use session::Session;

use quill_source::QuillError;
use quill_syntax::Program;

/// Runs the first pass: defines every item of `program`, builds the module
/// tree and resolves imports.
pub fn build_module_tree(sess: &mut Session, program: &Program) -> Vec<ResolutionError> {
    if sess.tree_built {
        bug!("`build_module_tree` ran twice on one session");
    }
    log::debug!("building the module tree");
    let (imports, mut diagnostics) = ModuleTreeBuilder::new(&mut sess.def_table, &mut sess.modules).build(program);
    let import_diagnostics =
        ImportResolver::new(&mut sess.def_table, &mut sess.modules, &sess.config, imports).resolve();
    diagnostics.extend(import_diagnostics);
    sess.tree_built = true;

    if sess.config.print_module_tree {
        log::info!("module tree:\n{}", ModulePrinter::new(&sess.def_table, &sess.modules).print());
    }
    diagnostics
}

/// Runs the second pass over the same `program`. The module tree must have
/// been built on `sess` first.
pub fn resolve_names(sess: &mut Session, program: &Program) -> Vec<ResolutionError> {
    if !sess.tree_built {
        bug!("`resolve_names` ran before `build_module_tree`");
    }
    if sess.names_resolved {
        bug!("`resolve_names` ran twice on one session");
    }
    log::debug!("resolving names");
    let (resolutions, diagnostics) = NameResolver::new(&sess.def_table, &sess.modules, &sess.config).resolve(program);
    sess.resolutions = resolutions;
    sess.names_resolved = true;
    diagnostics
}

/// Whether any diagnostic is an error rather than a warning.
pub fn has_errors(diagnostics: &[ResolutionError]) -> bool {
    diagnostics.iter().any(|diagnostic| diagnostic.is_error())
}
