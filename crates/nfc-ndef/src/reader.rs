//! Reads an ndef message out of type 2 tag memory that arrives a few pages at a time

use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use winnow::error::ErrMode;

use crate::{
    message::NdefMessage,
    message_info::MessageInfo,
    parser::{self, parse_message_info, stream::StreamExt as _},
    resume::ResumeError,
};

/// Number of pages returned by one READ command
pub const PAGES_PER_READ: u16 = 4;

/// Number of bytes per page of tag memory
pub const BYTES_PER_PAGE: u16 = 4;

#[derive(Debug, PartialEq, Eq, thiserror::Error, uniffi::Error)]
pub enum NdefReaderError {
    #[error("error parsing the tlv area: {0}")]
    ParsingError(String),

    #[error("not enough data to parse, need at least enough to find the ndef tlv")]
    NotEnoughData,

    #[error("terminator tlv found before any ndef message")]
    NoNdefMessage,

    #[error("trying to parse a message that has already been parsed")]
    AlreadyParsed,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum ParseResult {
    /// The whole ndef message was read
    Complete(MessageInfo, NdefMessage),

    /// Need more data to parse the message
    Incomplete(ParsingMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ParsingMessage {
    pub message_info: MessageInfo,

    /// Bytes still missing from the ndef message
    pub needed: u16,

    /// Message bytes read so far, pass them back with the next chunk appended
    pub left_over_bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum ParserState {
    #[default]
    NotStarted,
    Parsing(ParsingContext),
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsingContext {
    message_info: MessageInfo,
    first_block_hash: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NdefReader {
    state: ParserState,
}

impl NdefReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the message if all of it is there, if not hand back what was read so far
    ///
    /// The first call takes the data area from its first page, later calls take
    /// the returned left over bytes with the next chunk appended
    pub fn parse(&mut self, data: Vec<u8>) -> Result<ParseResult, NdefReaderError> {
        let (message_info, data) = match &self.state {
            ParserState::NotStarted => {
                let mut stream = parser::stream::new(&data);
                let message_info = match parse_message_info(&mut stream) {
                    Ok(Some(message_info)) => message_info,
                    Ok(None) => return Err(NdefReaderError::NoNdefMessage),
                    Err(ErrMode::Incomplete(_)) => return Err(NdefReaderError::NotEnoughData),
                    Err(error) => return Err(NdefReaderError::ParsingError(error.to_string())),
                };

                let message_bytes = stream.to_vec();
                self.state = ParserState::Parsing(ParsingContext {
                    message_info,
                    first_block_hash: get_first_block_hash(&data),
                });

                (message_info, message_bytes)
            }

            ParserState::Parsing(context) => (context.message_info, data),

            ParserState::Complete => return Err(NdefReaderError::AlreadyParsed),
        };

        let ndef_length = message_info.ndef_length as usize;

        // need more data to parse the message
        if data.len() < ndef_length {
            debug!("have {} of {ndef_length} message bytes, continuing", data.len());

            return Ok(ParseResult::Incomplete(ParsingMessage {
                message_info,
                needed: (ndef_length - data.len()) as u16,
                left_over_bytes: data,
            }));
        }

        debug!("enough data to parse message, parsing");
        let message = parser::parse_ndef_message(&data[..ndef_length]);
        self.state = ParserState::Complete;

        Ok(ParseResult::Complete(message_info, message))
    }

    /// Check that a fresh read is from the same tag as the partially parsed message
    pub fn is_resumeable(&self, data: &[u8]) -> Result<(), ResumeError> {
        let expected_bytes = BYTES_PER_PAGE * PAGES_PER_READ;
        let data_len = data.len().min(u16::MAX as usize) as u16;

        if data_len < expected_bytes {
            return Err(ResumeError::BlockSizeMismatch {
                expected: expected_bytes,
                actual: data_len,
            });
        }

        let parsing_state = match &self.state {
            ParserState::Parsing(parsing_state) => parsing_state,
            ParserState::Complete => return Err(ResumeError::AlreadyParsed),
            ParserState::NotStarted => {
                warn!("resuming on a message that has not been parsed, starting from the beginning");
                return Ok(());
            }
        };

        let Some(first_block_hash) = &get_first_block_hash(data) else {
            return Err(ResumeError::UnableToGetFirstBlockHash);
        };

        let Some(existing_first_block_hash) = &parsing_state.first_block_hash else {
            return Err(ResumeError::UnableToGetFirstBlockHash);
        };

        // reading a different tag
        if first_block_hash != existing_first_block_hash {
            return Err(ResumeError::BlocksDoNotMatch);
        }

        Ok(())
    }

    pub fn is_started(&self) -> bool {
        matches!(self.state, ParserState::Parsing(_))
    }

    /// Get the message info, if we have that info
    pub fn message_info(&self) -> Option<&MessageInfo> {
        match &self.state {
            ParserState::Parsing(parsing_state) => Some(&parsing_state.message_info),
            ParserState::Complete | ParserState::NotStarted => None,
        }
    }
}

fn get_first_block_hash(data: &[u8]) -> Option<String> {
    let hash_bytes_length = (BYTES_PER_PAGE * PAGES_PER_READ) as usize;
    if data.len() < hash_bytes_length {
        return None;
    }

    let hash = Sha256::digest(&data[..hash_bytes_length]);
    Some(hex::encode(hash))
}
