//! Entropy provider abstraction
//!
//! This module provides an [`EntropySource`] trait that abstracts over the
//! randomness used to mint session tokens, allowing production code to use the
//! operating system RNG while tests can use deterministic or failing sources.
//!
//! # Example
//!
//! ```
//! use todolist::{EntropySource, OsEntropy};
//!
//! let mut buf = [0u8; 16];
//! OsEntropy.fill(&mut buf).unwrap();
//! ```

use std::fmt::Debug;

use rand::{RngCore, rngs::OsRng};

use crate::session::SessionError;

#[cfg(any(test, feature = "testing"))]
use std::sync::Mutex;

/// A source of unguessable bytes.
///
/// Failure is surfaced to the caller, which must refuse to create the session.
/// There is no fallback to a weaker generator.
pub trait EntropySource: Send + Sync + Debug {
    /// Fill `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), SessionError>;
}

/// Production entropy backed by the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), SessionError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| SessionError::TokenGeneration {
                reason: e.to_string(),
            })
    }
}

/// Deterministic entropy for tests.
///
/// Every call fills the buffer with a counter value that increments per call,
/// so consecutive tokens differ but are predictable.
#[cfg(any(test, feature = "testing"))]
pub struct FixedEntropy {
    next: Mutex<u8>,
}

#[cfg(any(test, feature = "testing"))]
impl FixedEntropy {
    /// Create a source whose first fill uses `seed`.
    pub fn new(seed: u8) -> Self {
        Self {
            next: Mutex::new(seed),
        }
    }

    /// Restart the sequence so the next fill uses `seed`.
    pub fn reseed(&self, seed: u8) {
        *self.next.lock().unwrap() = seed;
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for FixedEntropy {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(any(test, feature = "testing"))]
impl Debug for FixedEntropy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let next = *self.next.lock().unwrap();
        f.debug_struct("FixedEntropy").field("next", &next).finish()
    }
}

#[cfg(any(test, feature = "testing"))]
impl EntropySource for FixedEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), SessionError> {
        let mut next = self.next.lock().unwrap();
        buf.fill(*next);
        *next = next.wrapping_add(1);
        Ok(())
    }
}

/// Entropy source that always fails, for exercising the refusal path.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEntropy;

#[cfg(any(test, feature = "testing"))]
impl EntropySource for FailingEntropy {
    fn fill(&self, _buf: &mut [u8]) -> Result<(), SessionError> {
        Err(SessionError::TokenGeneration {
            reason: "entropy source unavailable".to_string(),
        })
    }
}
