use thiserror::Error;

/// Unified result type for the workbench crate.
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Errors surfaced by the panels and the terminal runtime.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Programming or configuration mistake (unknown category, bad range).
    /// Never reachable through the key bindings.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("`{field}` must not be blank")]
    EmptyInput { field: &'static str },
    #[error("layout tree is empty")]
    EmptyLayout,
    #[error("zone `{0}` not found")]
    ZoneNotFound(String),
    #[error("terminal backend error: {0}")]
    Backend(String),
    #[error("logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),
    #[error("config parse error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ForgeError {
    pub fn unknown_category(key: &str) -> Self {
        Self::Configuration(format!("category `{key}` not found in template store"))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
