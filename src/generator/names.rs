//! Synthetic account-name generation.

use std::sync::Arc;

use rand::Rng;

use crate::lexicon::{LexiconCache, LexiconResult};

/// Lexicon key for first names (`lists/default_names.txt` under the default
/// path template).
const FIRST_NAME_KEY: &str = "name";

/// Lexicon key for surnames.
const SURNAME_KEY: &str = "surname";

/// Samples "first surname" full names from the name lexicons.
pub struct NameGenerator {
    lexicons: Arc<LexiconCache>,
}

impl NameGenerator {
    pub fn new(lexicons: Arc<LexiconCache>) -> Self {
        Self { lexicons }
    }

    /// Generate `count` full names using the process-wide RNG.
    pub fn generate(&self, count: usize) -> LexiconResult<Vec<String>> {
        self.generate_with_rng(count, &mut rand::rng())
    }

    /// Generate `count` full names using the supplied RNG.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> LexiconResult<Vec<String>> {
        (0..count).map(|_| self.full_name(rng)).collect()
    }

    fn full_name<R: Rng + ?Sized>(&self, rng: &mut R) -> LexiconResult<String> {
        let first = self.lexicons.draw(FIRST_NAME_KEY, rng)?;
        let surname = self.lexicons.draw(SURNAME_KEY, rng)?;
        Ok(format!("{first} {surname}"))
    }
}
