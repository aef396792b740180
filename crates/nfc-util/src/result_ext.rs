use std::fmt::Display;

pub trait ResultExt<T, InitialError> {
    /// Map an error to a string-based error variant
    ///
    /// # Example
    /// ```rust
    /// use nfc_util::result_ext::ResultExt;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// enum ReadError {
    ///     #[error("io error: {0}")]
    ///     Io(String),
    /// }
    ///
    /// fn read_dump() -> Result<String, ReadError> {
    ///     std::fs::read_to_string("tag_dump.bin").map_err_str(ReadError::Io)
    /// }
    /// ```
    fn map_err_str<FinalError, F>(self, f: F) -> Result<T, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError;

    /// Absorb the error, logging it at warn level with some context
    ///
    /// Used where a failure should only drop one field or one entry
    /// instead of failing the whole result
    fn ok_or_warn(self, context: &str) -> Option<T>
    where
        InitialError: Display;
}

impl<Type, InitialError> ResultExt<Type, InitialError> for Result<Type, InitialError> {
    fn map_err_str<FinalError, F>(self, f: F) -> Result<Type, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError,
    {
        self.map_err(|e| f(e.to_string()))
    }

    fn ok_or_warn(self, context: &str) -> Option<Type>
    where
        InitialError: Display,
    {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!("{context}: {error}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    enum ReadError {
        #[error("read failed: {0}")]
        Read(String),
    }

    #[test]
    fn map_err_str_uses_display() {
        let result: Result<(), std::fmt::Error> = Err(std::fmt::Error);
        let mapped = result.map_err_str(ReadError::Read);
        assert_eq!(mapped, Err(ReadError::Read("an error occurred when formatting an argument".into())));
    }

    #[test]
    fn ok_or_warn_drops_error() {
        let ok: Result<u8, ReadError> = Ok(7);
        assert_eq!(ok.ok_or_warn("reading sak"), Some(7));

        let err: Result<u8, ReadError> = Err(ReadError::Read("tag lost".into()));
        assert_eq!(err.ok_or_warn("reading sak"), None);
    }
}
