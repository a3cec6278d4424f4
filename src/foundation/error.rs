/// Convenience result type used across lcdcanvas.
pub type ThemeResult<T> = Result<T, ThemeError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ThemeError {
    /// Reading or fetching source bytes failed.
    #[error("io error: {0}")]
    Io(String),

    /// An animated image decoded to zero frames.
    #[error("empty animation: no frames decoded")]
    EmptyAnimation,

    /// Image bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A scene document failed validation at load time.
    #[error("invalid scene: {0}")]
    InvalidScene(String),

    /// Rasterizing the scene failed.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThemeError {
    /// Build a [`ThemeError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`ThemeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ThemeError::InvalidScene`] value.
    pub fn invalid_scene(msg: impl Into<String>) -> Self {
        Self::InvalidScene(msg.into())
    }

    /// Build a [`ThemeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ThemeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<std::io::Error> for ThemeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
