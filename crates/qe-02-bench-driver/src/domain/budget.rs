//! Iteration budget: how many more pairs may be issued.

use serde::Serialize;

/// Remaining pair issuances, or unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IterationBudget {
    remaining: Option<u64>,
}

impl IterationBudget {
    /// A negative count means unlimited.
    #[must_use]
    pub fn from_iter_count(iter: i64) -> Self {
        Self {
            remaining: u64::try_from(iter).ok(),
        }
    }

    #[must_use]
    pub fn limited(pairs: u64) -> Self {
        Self {
            remaining: Some(pairs),
        }
    }

    #[must_use]
    pub fn unlimited() -> Self {
        Self { remaining: None }
    }

    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        self.remaining.is_none()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    #[must_use]
    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    /// Consume one issuance. Returns `false` if none was left.
    pub fn take(&mut self) -> bool {
        match self.remaining.as_mut() {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }
}
