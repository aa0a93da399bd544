//! Random post generation.
//!
//! Picks a random template line from the default-posts file and runs it
//! through the substitution engine. The template file is read once per
//! `generate` call; individual lines keep their relative weighting (the file
//! is a pick list, not a lexicon, so duplicates are allowed to bias choice).

mod names;

pub use names::NameGenerator;

use std::path::{Path, PathBuf};

use rand::seq::IndexedRandom;
use rand::Rng;
use thiserror::Error;

use crate::template::{ContentEngine, TemplateError};

/// Generator-specific error type
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("cannot read post templates at {}: {source}", path.display())]
    TemplateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("post template file {} has no usable entries", path.display())]
    NoTemplates { path: PathBuf },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Result type for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Generates synthetic posts from a file of post templates.
pub struct PostGenerator {
    engine: ContentEngine,
    templates_path: PathBuf,
}

impl PostGenerator {
    pub fn new(engine: ContentEngine, templates_path: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            templates_path: templates_path.into(),
        }
    }

    /// The substitution engine backing this generator.
    pub fn engine(&self) -> &ContentEngine {
        &self.engine
    }

    /// Generate `count` posts using the process-wide RNG.
    pub fn generate(&self, count: usize) -> GeneratorResult<Vec<String>> {
        self.generate_with_rng(count, &mut rand::rng())
    }

    /// Generate `count` posts using the supplied RNG.
    ///
    /// Fails on the first template whose lexicons cannot be honored; no
    /// partial batch is returned.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> GeneratorResult<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let templates = read_templates(&self.templates_path)?;

        let mut posts = Vec::with_capacity(count);
        for _ in 0..count {
            let template = templates.choose(rng).ok_or_else(|| {
                GeneratorError::NoTemplates {
                    path: self.templates_path.clone(),
                }
            })?;
            posts.push(self.engine.process_with_rng(template, rng)?);
        }

        tracing::debug!(count = posts.len(), "Generated random posts");
        Ok(posts)
    }
}

fn read_templates(path: &Path) -> GeneratorResult<Vec<String>> {
    let raw = std::fs::read_to_string(path).map_err(|e| GeneratorError::TemplateFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let templates: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();

    if templates.is_empty() {
        return Err(GeneratorError::NoTemplates {
            path: path.to_path_buf(),
        });
    }

    Ok(templates)
}
