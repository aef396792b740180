#[derive(Debug, Clone, PartialEq, Eq, uniffi::Error, thiserror::Error)]
pub enum ResumeError {
    /// The first chunk of the new read is not the same as the one in the old read
    #[error("first chunk does not match, a different tag was presented")]
    BlocksDoNotMatch,

    #[error("the reader had already parsed the message")]
    AlreadyParsed,

    /// The bytes passed in need to be at least one full read (PAGES_PER_READ * BYTES_PER_PAGE)
    #[error("chunk size mismatch, expected {expected}, got {actual}")]
    BlockSizeMismatch { expected: u16, actual: u16 },

    #[error("unable to get first chunk hash")]
    UnableToGetFirstBlockHash,
}
