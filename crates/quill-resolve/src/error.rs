use crate::def::Namespace;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Diagnostics produced while building the module tree and resolving names.
///
/// Resolution never stops at the first problem: every diagnostic is collected
/// and the failing node is recorded as an error resolution.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// A name was defined twice in the same scope and namespace, or a function
    /// overload repeats an existing label suffix.
    #[error("Cannot redefine `{name}`: it is already defined as {previous_kind}")]
    #[diagnostic(code(quill_resolve::redefinition))]
    Redefinition {
        name: String,
        #[label("redefined here")]
        span: SourceSpan,
        #[label("previous definition here")]
        previous_span: SourceSpan,
        /// Description of the earlier definition, e.g. "a struct"
        previous_kind: String,
    },

    /// A name could not be found in the namespace it was used in.
    #[error("Cannot find {namespace} `{name}` in this scope")]
    #[diagnostic(code(quill_resolve::unresolved_name))]
    UnresolvedName {
        name: String,
        namespace: Namespace,
        #[label("not found")]
        span: SourceSpan,
        /// Names with the same spelling found in other namespaces
        alternatives: Vec<String>,
        #[help]
        help: Option<String>,
    },

    /// An invocation's argument labels match none of the overloads of a function.
    #[error("No overload `{name}{suffix}` exists")]
    #[diagnostic(code(quill_resolve::overload_suffix_mismatch))]
    OverloadSuffixMismatch {
        name: String,
        suffix: String,
        #[label("called here")]
        span: SourceSpan,
        available: Vec<String>,
        #[help]
        help: Option<String>,
    },

    /// An overloaded function was named without arguments to pick an overload.
    #[error("`{name}` has several overloads and cannot be used without argument labels")]
    #[diagnostic(code(quill_resolve::ambiguous_overload))]
    AmbiguousOverload {
        name: String,
        #[label("ambiguous reference")]
        span: SourceSpan,
        available: Vec<String>,
        #[help]
        help: Option<String>,
    },

    /// Import aliases form a chain that leads back to itself.
    #[error("Import cycle detected while resolving `{name}`")]
    #[diagnostic(code(quill_resolve::import_cycle))]
    ImportCycle {
        name: String,
        #[label("this import depends on itself")]
        span: SourceSpan,
        #[help]
        cycle: String,
    },

    /// A `use` path names nothing.
    #[error("Unresolved import `{path}`")]
    #[diagnostic(code(quill_resolve::unresolved_import))]
    UnresolvedImport {
        path: String,
        #[label("no such item")]
        span: SourceSpan,
        #[help]
        reason: Option<String>,
    },

    /// `Self` used where no struct, enum, trait or impl encloses it.
    #[error("`{keyword}` is only available inside struct, enum, trait and impl items")]
    #[diagnostic(code(quill_resolve::self_outside_item))]
    SelfOutsideItem {
        keyword: String,
        #[label("used here")]
        span: SourceSpan,
    },

    /// A path reached an item that is not `pub` from outside the module that defines it.
    #[error("`{name}` is private to module `{module}`")]
    #[diagnostic(code(quill_resolve::private_item_access), severity(Warning))]
    PrivateItemAccess {
        name: String,
        module: String,
        #[label("accessed here")]
        span: SourceSpan,
    },
}

impl ResolutionError {
    /// The primary span of the diagnostic.
    pub fn span(&self) -> SourceSpan {
        match self {
            ResolutionError::Redefinition { span, .. }
            | ResolutionError::UnresolvedName { span, .. }
            | ResolutionError::OverloadSuffixMismatch { span, .. }
            | ResolutionError::AmbiguousOverload { span, .. }
            | ResolutionError::ImportCycle { span, .. }
            | ResolutionError::UnresolvedImport { span, .. }
            | ResolutionError::SelfOutsideItem { span, .. }
            | ResolutionError::PrivateItemAccess { span, .. } => *span,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, ResolutionError::PrivateItemAccess { .. })
    }
}

/// Formats a list of names as "`a`, `b`".
pub(crate) fn list_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|name| format!("`{}`", name.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
