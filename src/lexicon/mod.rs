//! Word-list ("lexicon") loading and caching.
//!
//! Each placeholder key maps to a word-list file located by interpolating the
//! key into a path template (e.g. `lists/default_{}s.txt` + key `name` ->
//! `lists/default_names.txt`). Files are plain text, one candidate value per
//! line. Lines are trimmed, blanks dropped, and duplicates collapsed before
//! the list is frozen for the lifetime of the cache.
//!
//! The cache is populated lazily on first use of a key and never evicted or
//! refreshed; the backing files are assumed static for the duration of a run.

mod source;

pub use source::{FsLexiconSource, LexiconSource};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::{DashMap, Entry};
use rand::seq::IndexedRandom;
use rand::Rng;
use thiserror::Error;

/// Lexicon-specific error type
#[derive(Debug, Error)]
pub enum LexiconError {
    /// The word-list file for a key does not exist or cannot be read.
    #[error("word list for key '{key}' not readable at {}: {source}", path.display())]
    Missing {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The word-list file exists but yields zero usable candidates after
    /// trimming and blank-line filtering.
    #[error("word list for key '{key}' at {} has no usable entries", path.display())]
    Empty { key: String, path: PathBuf },
}

/// Result type for lexicon operations
pub type LexiconResult<T> = Result<T, LexiconError>;

/// Lazy per-run cache mapping placeholder keys to their candidate values.
///
/// The "check cache, else load" sequence goes through the map's entry API, so
/// concurrent callers asking for the same unseen key cannot race duplicate
/// file loads.
pub struct LexiconCache {
    path_template: String,
    source: Arc<dyn LexiconSource>,
    entries: DashMap<String, Arc<Vec<String>>>,
}

impl LexiconCache {
    /// Create a cache reading word lists from the filesystem.
    ///
    /// `path_template` must contain a `{}` marker where the key name is
    /// interpolated.
    pub fn new(path_template: impl Into<String>) -> Self {
        Self::with_source(path_template, Arc::new(FsLexiconSource))
    }

    /// Create a cache with a custom word-list source.
    pub fn with_source(path_template: impl Into<String>, source: Arc<dyn LexiconSource>) -> Self {
        Self {
            path_template: path_template.into(),
            source,
            entries: DashMap::new(),
        }
    }

    /// Resolve the word-list location for a key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        PathBuf::from(self.path_template.replacen("{}", key, 1))
    }

    /// Load the word list for `key` if it is not cached yet. Idempotent;
    /// failures are only possible on the first load of a given key.
    pub fn ensure_loaded(&self, key: &str) -> LexiconResult<()> {
        self.values_for(key).map(|_| ())
    }

    /// The candidate values for `key`, loading them on first use.
    ///
    /// The returned sequence is non-empty, deduplicated, and fixed in order
    /// for the lifetime of the cache.
    pub fn values_for(&self, key: &str) -> LexiconResult<Arc<Vec<String>>> {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(slot) => Ok(slot.get().clone()),
            Entry::Vacant(slot) => {
                let path = self.path_for(key);
                let values = Arc::new(load_word_list(self.source.as_ref(), key, &path)?);
                tracing::debug!(key = %key, path = %path.display(), count = values.len(), "Lexicon loaded");
                slot.insert(values.clone());
                Ok(values)
            }
        }
    }

    /// Draw one value for `key` uniformly at random.
    pub fn draw<R: Rng + ?Sized>(&self, key: &str, rng: &mut R) -> LexiconResult<String> {
        let values = self.values_for(key)?;
        let value = values.choose(rng).ok_or_else(|| LexiconError::Empty {
            key: key.to_string(),
            path: self.path_for(key),
        })?;
        Ok(value.clone())
    }

    /// Whether the lexicon for `key` has already been loaded.
    pub fn is_warm(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of loaded lexicons.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no lexicon has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn load_word_list(source: &dyn LexiconSource, key: &str, path: &Path) -> LexiconResult<Vec<String>> {
    let raw = source.read(path).map_err(|e| LexiconError::Missing {
        key: key.to_string(),
        path: path.to_path_buf(),
        source: e,
    })?;

    // Set semantics: trim, drop blanks, collapse duplicates. BTreeSet fixes
    // an order so repeated indexing stays stable once loaded.
    let unique: BTreeSet<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if unique.is_empty() {
        return Err(LexiconError::Empty {
            key: key.to_string(),
            path: path.to_path_buf(),
        });
    }

    Ok(unique.into_iter().map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// In-memory source that counts reads per path.
    struct CountingSource {
        files: Vec<(PathBuf, String)>,
        reads: AtomicUsize,
    }

    impl CountingSource {
        fn new(files: Vec<(&str, &str)>) -> Self {
            Self {
                files: files
                    .into_iter()
                    .map(|(p, c)| (PathBuf::from(p), c.to_string()))
                    .collect(),
                reads: AtomicUsize::new(0),
            }
        }

        fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl LexiconSource for CountingSource {
        fn read(&self, path: &Path) -> io::Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.files
                .iter()
                .find(|(p, _)| p == path)
                .map(|(_, c)| c.clone())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such word list"))
        }
    }

    fn cache_with(files: Vec<(&str, &str)>) -> (LexiconCache, Arc<CountingSource>) {
        let source = Arc::new(CountingSource::new(files));
        let cache = LexiconCache::with_source("lists/default_{}s.txt", source.clone());
        (cache, source)
    }

    #[test]
    fn test_path_interpolation() {
        let cache = LexiconCache::new("lists/default_{}s.txt");
        assert_eq!(
            cache.path_for("name"),
            PathBuf::from("lists/default_names.txt")
        );
    }

    #[test]
    fn test_duplicate_lines_collapse() {
        let (cache, _) = cache_with(vec![("lists/default_names.txt", "Alice\nAlice\nBob\n")]);

        let values = cache.values_for("name").unwrap();
        assert_eq!(values.len(), 2);
        assert!(values.contains(&"Alice".to_string()));
        assert!(values.contains(&"Bob".to_string()));
    }

    #[test]
    fn test_lines_are_trimmed() {
        let (cache, _) = cache_with(vec![("lists/default_names.txt", "  Alice  \nBob\n Alice\n")]);

        let values = cache.values_for("name").unwrap();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_blank_only_file_is_empty_lexicon() {
        let (cache, _) = cache_with(vec![("lists/default_names.txt", "\n   \n\t\n")]);

        assert!(matches!(
            cache.values_for("name"),
            Err(LexiconError::Empty { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let (cache, _) = cache_with(vec![]);

        assert!(matches!(
            cache.values_for("place"),
            Err(LexiconError::Missing { .. })
        ));
    }

    #[test]
    fn test_second_lookup_is_cache_hit() {
        let (cache, source) = cache_with(vec![("lists/default_names.txt", "Alice\nBob\n")]);

        cache.ensure_loaded("name").unwrap();
        cache.ensure_loaded("name").unwrap();
        let _ = cache.values_for("name").unwrap();

        assert_eq!(source.read_count(), 1);
        assert!(cache.is_warm("name"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_load_does_not_poison_cache() {
        let (cache, _) = cache_with(vec![("lists/default_names.txt", "Alice\n")]);

        assert!(cache.values_for("place").is_err());
        assert!(!cache.is_warm("place"));

        // Other keys still load fine.
        assert_eq!(cache.values_for("name").unwrap().len(), 1);
    }

    #[test]
    fn test_draw_stays_within_lexicon() {
        let (cache, _) = cache_with(vec![("lists/default_names.txt", "Alice\nBob\nCarol\n")]);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let value = cache.draw("name", &mut rng).unwrap();
            assert!(["Alice", "Bob", "Carol"].contains(&value.as_str()));
        }
    }

    #[test]
    fn test_every_value_reachable() {
        let (cache, _) = cache_with(vec![("lists/default_names.txt", "Alice\nBob\nCarol\n")]);

        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            seen.insert(cache.draw("name", &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }
}
