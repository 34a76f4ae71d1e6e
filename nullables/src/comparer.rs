//! Nullable face-comparison collaborator.

use std::sync::Mutex;

use vita_verification::{Comparison, SimilarityComparer, SimilarityError};

/// A scripted comparer: returns queued outcomes in order, then falls back
/// to a fixed default. Records every call for assertions.
pub struct NullComparer {
    script: Mutex<Vec<Comparison>>,
    default: Comparison,
    calls: Mutex<u32>,
}

impl NullComparer {
    /// Always return `outcome`.
    pub fn fixed(outcome: Comparison) -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            default: outcome,
            calls: Mutex::new(0),
        }
    }

    /// Return the scripted outcomes front-to-back, then `default`.
    pub fn scripted(outcomes: Vec<Comparison>, default: Comparison) -> Self {
        let mut script = outcomes;
        script.reverse();
        Self {
            script: Mutex::new(script),
            default,
            calls: Mutex::new(0),
        }
    }

    /// How many comparisons have been requested.
    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl SimilarityComparer for NullComparer {
    fn compare(&self, _reference: &[u8], _probe: &[u8]) -> Result<Comparison, SimilarityError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.script.lock().unwrap().pop().unwrap_or(self.default))
    }
}
