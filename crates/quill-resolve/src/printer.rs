//! Textual dump of the module tree, for debugging and snapshot tests.

use crate::def::{DefId, Namespace};
use crate::def_table::DefTable;
use crate::module::{ModuleId, ModuleKind, ModuleTree, NameBinding};
use std::fmt::Write;

/// Renders a module tree as an indented outline:
///
/// ```text
/// root
///   value: main()
///   type: a
///   mod a #1
///     type: Foo
///     struct Foo #2
///   func main #3
/// ```
pub struct ModulePrinter<'a> {
    defs: &'a DefTable,
    modules: &'a ModuleTree,
    out: String,
}

impl<'a> ModulePrinter<'a> {
    pub fn new(defs: &'a DefTable, modules: &'a ModuleTree) -> Self {
        Self { defs, modules, out: String::new() }
    }

    pub fn print(mut self) -> String {
        self.print_module(ModuleId::ROOT, 0);
        self.out
    }

    fn print_module(&mut self, id: ModuleId, depth: usize) {
        let modules = self.modules;
        let module = modules.get(id);
        let header = match module.kind() {
            ModuleKind::Def(DefId::ROOT) => "root".to_string(),
            ModuleKind::Def(def_id) => {
                let def = self.defs.def(def_id);
                format!("{} {} {}", def.kind.keyword(), def.ident, def_id)
            }
            ModuleKind::Block(node) => format!("block {}", node),
        };
        self.line(depth, &header);

        for ns in Namespace::ALL {
            let entries: Vec<String> = module
                .bindings(ns)
                .into_iter()
                .flat_map(|(name, binding)| self.entries(name, binding))
                .collect();
            if !entries.is_empty() {
                self.line(depth + 1, &format!("{}: {}", ns, entries.join(", ")));
            }
        }

        let children: Vec<ModuleId> = module.children().collect();
        for child in children {
            self.print_module(child, depth + 1);
        }
    }

    fn entries(&self, name: &str, binding: NameBinding) -> Vec<String> {
        match binding {
            NameBinding::Def(_) => vec![name.to_string()],
            NameBinding::Import(_) => vec![format!("use {}", name)],
            NameBinding::Fos(fos) => self
                .defs
                .fos(fos)
                .iter()
                .map(|(suffix, def_id)| match self.defs.import_target(def_id) {
                    Some(_) => format!("use {}{}", name, suffix),
                    None => format!("{}{}", name, suffix),
                })
                .collect(),
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        let _ = writeln!(self.out, "{:indent$}{}", "", text, indent = depth * 2);
    }
}
