use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("scope definition failed: {0}")]
    Scope(String),

    #[error("research planning failed: {0}")]
    Planning(String),

    #[error("research task '{task}' failed: {message}")]
    Research { task: String, message: String },

    #[error("editorial stage failed: {0}")]
    Editorial(String),

    #[error("competitor analysis failed: {0}")]
    CompetitorAnalysis(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl Error {
    pub fn scope(message: impl Into<String>) -> Self {
        Self::Scope(message.into())
    }

    pub fn planning(message: impl Into<String>) -> Self {
        Self::Planning(message.into())
    }

    pub fn research(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Research {
            task: task.into(),
            message: message.into(),
        }
    }

    pub fn editorial(message: impl Into<String>) -> Self {
        Self::Editorial(message.into())
    }

    pub fn competitor_analysis(message: impl Into<String>) -> Self {
        Self::CompetitorAnalysis(message.into())
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit(message.into())
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether a research attempt that hit this error may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Provider(_) | Error::RateLimit(_) | Error::Timeout(_)
        )
    }

    /// Whether this error aborts the whole workflow when it crosses a
    /// stage boundary (as opposed to a per-task research failure, which
    /// is isolated to its task).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Scope(_) | Error::Planning(_) | Error::Editorial(_) | Error::Config(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
