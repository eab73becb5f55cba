/// A source file handed to the front-end.
///
/// The filesystem walker that discovers files is external; the front-end only needs the
/// location (for messages) and the text (for rendering labels).
///
/// # Example
///
/// ```rust
/// use quill_source::SourceFile;
///
/// let file = SourceFile::new("src/main.ql", "func main() {}");
/// assert_eq!(file.location(), "src/main.ql");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    /// Path to the source file as the user wrote it
    location: String,

    /// Contents of the source file
    contents: String,
}

impl SourceFile {
    pub fn new(location: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            contents: contents.into(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}
