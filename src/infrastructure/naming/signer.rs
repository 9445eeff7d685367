use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

pub const SIGNATURE_PREFIX: &str = "cdn-";
pub const SUFFIX_LEN: usize = 7;

/// Source of the random suffix mixed into signed filenames.
pub trait RandomSource: Send + Sync {
    /// `len` characters drawn uniformly from `[a-zA-Z0-9]`.
    fn alphanumeric(&self, len: usize) -> String;
}

/// Thread-local CSPRNG backed source used by the running server.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn alphanumeric(&self, len: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}

/// Produces stored filenames of the form
/// `cdn-<unix seconds><7 random alphanumerics>-<original>`.
///
/// Names are unique only with high probability. Two uploads signed in the
/// same second that draw the same suffix get the same name, and the second
/// write replaces the first.
#[derive(Debug, Clone, Default)]
pub struct FilenameSigner<R: RandomSource> {
    source: R,
}

impl<R: RandomSource> FilenameSigner<R> {
    pub fn new(source: R) -> Self {
        FilenameSigner { source }
    }

    pub fn sign(&self, original: &str) -> String {
        self.sign_at(original, Utc::now().timestamp())
    }

    pub fn sign_at(&self, original: &str, timestamp: i64) -> String {
        format!(
            "{}{}{}-{}",
            SIGNATURE_PREFIX,
            timestamp,
            self.source.alphanumeric(SUFFIX_LEN),
            original
        )
    }
}
