//! Template-driven random text substitution.
//!
//! This module provides:
//! - Placeholder key discovery without a predeclared schema
//! - Lazy per-key lexicon loading through a [`LexiconCache`]
//! - A substitution engine that draws one random value per key and renders
//!   the template in a single pass
//!
//! # Example
//!
//! ```ignore
//! let lexicons = Arc::new(LexiconCache::new("lists/default_{}s.txt"));
//! let engine = ContentEngine::new(lexicons);
//!
//! // Repeated occurrences of a key share one draw per call.
//! let post = engine.process("Hello {name}, welcome to {place}")?;
//! ```

mod parser;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use rand::Rng;
use thiserror::Error;

use crate::lexicon::{LexiconCache, LexiconError};

use parser::Segment;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The placeholder syntax is malformed (unbalanced delimiters, invalid
    /// key characters).
    #[error("template syntax error: {0}")]
    Syntax(String),

    /// A required lexicon could not be loaded or had no usable values.
    #[error(transparent)]
    Lexicon(#[from] LexiconError),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Substitution engine: discovers placeholder keys, warms the lexicon cache,
/// and replaces every placeholder with a randomly drawn value.
///
/// All occurrences of one key within a single `process` call resolve to the
/// same drawn value; draws are independent across keys and across calls.
pub struct ContentEngine {
    lexicons: Arc<LexiconCache>,
}

impl ContentEngine {
    /// Create an engine over the given lexicon cache.
    pub fn new(lexicons: Arc<LexiconCache>) -> Self {
        Self { lexicons }
    }

    /// The lexicon cache backing this engine.
    pub fn lexicons(&self) -> &Arc<LexiconCache> {
        &self.lexicons
    }

    /// Discover the exact set of placeholder keys `text` references.
    ///
    /// Escaped delimiters (`{{`, `}}`) are literal text and never produce a
    /// key. A template without placeholders yields an empty set.
    pub fn discover_keys(&self, text: &str) -> TemplateResult<BTreeSet<String>> {
        let segments = parser::parse(text)?;
        Ok(parser::keys_of(&segments)
            .into_iter()
            .map(str::to_owned)
            .collect())
    }

    /// Substitute every placeholder in `text`, drawing values from the
    /// process-wide RNG.
    pub fn process(&self, text: &str) -> TemplateResult<String> {
        self.process_with_rng(text, &mut rand::rng())
    }

    /// Substitute every placeholder in `text` using the supplied RNG.
    ///
    /// Either every key resolves and the fully rendered string is returned,
    /// or an error is raised before any output is produced. A failure for one
    /// key leaves lexicons already loaded for other keys intact.
    pub fn process_with_rng<R: Rng + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> TemplateResult<String> {
        let segments = parser::parse(text)?;

        let mut chosen: HashMap<&str, String> = HashMap::new();
        for key in parser::keys_of(&segments) {
            let value = self.lexicons.draw(key, rng)?;
            chosen.insert(key, value);
        }

        Ok(render(&segments, &chosen))
    }
}

fn render(segments: &[Segment], chosen: &HashMap<&str, String>) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            // Every key was drawn above; an unknown key here is unreachable.
            Segment::Key(key) => out.push_str(
                chosen
                    .get(key.as_str())
                    .map(String::as_str)
                    .unwrap_or_default(),
            ),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;
    use std::path::{Path, PathBuf};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::lexicon::LexiconSource;

    struct MapSource(Vec<(PathBuf, String)>);

    impl LexiconSource for MapSource {
        fn read(&self, path: &Path) -> io::Result<String> {
            self.0
                .iter()
                .find(|(p, _)| p == path)
                .map(|(_, c)| c.clone())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such word list"))
        }
    }

    fn engine_with(files: Vec<(&str, &str)>) -> ContentEngine {
        let source = Arc::new(MapSource(
            files
                .into_iter()
                .map(|(p, c)| (PathBuf::from(p), c.to_string()))
                .collect(),
        ));
        ContentEngine::new(Arc::new(LexiconCache::with_source(
            "lists/default_{}s.txt",
            source,
        )))
    }

    #[test]
    fn test_no_placeholders_is_identity() {
        let engine = engine_with(vec![]);
        let text = "Nothing to see here.";
        assert_eq!(engine.process(text).unwrap(), text);
    }

    #[test]
    fn test_discover_keys() {
        let engine = engine_with(vec![]);
        let keys = engine
            .discover_keys("Hello {name}, welcome to {place}")
            .unwrap();
        assert_eq!(
            keys.into_iter().collect::<Vec<_>>(),
            vec!["name".to_string(), "place".to_string()]
        );
    }

    #[test]
    fn test_substitution_draws_from_lexicons() {
        let engine = engine_with(vec![
            ("lists/default_names.txt", "Sam\nAlex\n"),
            ("lists/default_places.txt", "Leicester\n"),
        ]);

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let out = engine
                .process_with_rng("Hello {name}, welcome to {place}", &mut rng)
                .unwrap();
            assert!(
                out == "Hello Sam, welcome to Leicester"
                    || out == "Hello Alex, welcome to Leicester",
                "unexpected output: {out}"
            );
        }
    }

    #[test]
    fn test_repeated_key_shares_one_draw() {
        let engine = engine_with(vec![("lists/default_names.txt", "Sam\nAlex\nJo\nKim\n")]);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let out = engine
                .process_with_rng("{name} says hi to {name} and {name}", &mut rng)
                .unwrap();
            let first = out.split(' ').next().unwrap().to_string();
            assert_eq!(out, format!("{first} says hi to {first} and {first}"));
        }
    }

    #[test]
    fn test_every_candidate_reachable() {
        let engine = engine_with(vec![("lists/default_names.txt", "Sam\nAlex\nJo\n")]);

        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            seen.insert(engine.process_with_rng("{name}", &mut rng).unwrap());
        }
        assert_eq!(
            seen.into_iter().collect::<Vec<_>>(),
            vec!["Alex".to_string(), "Jo".to_string(), "Sam".to_string()]
        );
    }

    #[test]
    fn test_escaped_braces_render_literally() {
        let engine = engine_with(vec![("lists/default_keys.txt", "value\n")]);

        let out = engine.process("{{literal}} and {key}").unwrap();
        assert_eq!(out, "{literal} and value");
    }

    #[test]
    fn test_missing_lexicon_propagates() {
        let engine = engine_with(vec![]);
        assert!(matches!(
            engine.process("Hello {nobody}"),
            Err(TemplateError::Lexicon(LexiconError::Missing { .. }))
        ));
    }

    #[test]
    fn test_empty_lexicon_propagates() {
        let engine = engine_with(vec![("lists/default_names.txt", "\n  \n")]);
        assert!(matches!(
            engine.process("Hello {name}"),
            Err(TemplateError::Lexicon(LexiconError::Empty { .. }))
        ));
    }

    #[test]
    fn test_failure_leaves_other_lexicons_usable() {
        let engine = engine_with(vec![("lists/default_names.txt", "Sam\n")]);

        assert!(engine.process("{name} visits {place}").is_err());
        assert_eq!(engine.process("{name}").unwrap(), "Sam");
    }

    #[test]
    fn test_syntax_error_is_distinct() {
        let engine = engine_with(vec![]);
        assert!(matches!(
            engine.process("broken {name"),
            Err(TemplateError::Syntax(_))
        ));
    }
}
