use crate::technology::Technology;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
#[uniffi::export(Display)]
pub enum TagError {
    #[error("unable to connect to {0}")]
    Connect(Technology),

    #[error("tag was lost while reading")]
    TagLost,

    #[error("technology {0} is not supported by this tag")]
    Unsupported(Technology),

    #[error("io error: {0}")]
    Io(String),

    #[error("asked for {expected} but the platform returned {actual}")]
    UnexpectedReadout {
        expected: Technology,
        actual: Technology,
    },

    #[error("unexpected callback error: {0}")]
    UnexpectedCallback(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for TagError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedCallback(error.reason)
    }
}

/// A single field that came back but could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{field} should be {expected} bytes, got {actual}")]
    Length {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field} value {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },
}
