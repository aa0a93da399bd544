use std::io;
use std::path::Path;

/// Abstraction over the word-list storage backing a [`super::LexiconCache`].
///
/// The cache only needs "give me the raw contents at this path"; keeping that
/// behind a trait lets tests count and fake file reads without touching disk.
pub trait LexiconSource: Send + Sync {
    /// Read the entire word-list file at `path`.
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads word lists from the local filesystem.
#[derive(Debug, Default)]
pub struct FsLexiconSource;

impl LexiconSource for FsLexiconSource {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}
