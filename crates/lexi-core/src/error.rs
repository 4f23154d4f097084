/// Failure of a lexical lookup. Every variant is presented as "not found".
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("No entry for {0:?}")]
    NotFound(String),

    #[error("Lookup service returned HTTP {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode lookup response: {0}")]
    Decode(String),

    #[error("Invalid lookup URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Auth service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode auth response: {0}")]
    Decode(String),
}
