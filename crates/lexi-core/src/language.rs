use lexi_types::LookupResult;

use crate::error::LookupError;

/// Lexical lookup service
#[async_trait::async_trait]
pub trait Dictionary: Send + Sync {
    /// Sense groups of the first entry for `word`.
    ///
    /// Any failure, including an empty entry list, is an error; callers treat
    /// all of them as "not found".
    async fn lookup(&self, word: &str) -> Result<LookupResult, LookupError>;
}
