pub type FramerResult<T> = Result<T, FramerError>;

#[derive(thiserror::Error, Debug)]
pub enum FramerError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("surface error ({width}x{height}): {reason}")]
    Surface {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("encode error: {0}")]
    Encode(String),

    #[error("share error: {0}")]
    Share(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn surface(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::Surface {
            width,
            height,
            reason: reason.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn share(msg: impl Into<String>) -> Self {
        Self::Share(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
