pub mod stream;

use stream::{Stream, StreamExt as _};
use tracing::{debug, warn};
use winnow::{
    ModalResult, Parser,
    binary::{
        Endianness, be_u8, be_u16,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    error::{ContextError, ErrMode},
    token::{any, take},
};

use crate::{
    decode::{NdefError, decode_payload},
    header::NdefHeader,
    message::NdefMessage,
    message_info::MessageInfo,
    ndef_type::NdefType,
    record::{NdefRecord, RawNdefRecord},
};

/// TLV block tags found in type 2 tag memory
pub mod tlv {
    pub const NULL: u8 = 0x00;
    pub const LOCK_CONTROL: u8 = 0x01;
    pub const MEMORY_CONTROL: u8 = 0x02;
    pub const NDEF_MESSAGE: u8 = 0x03;
    pub const PROPRIETARY: u8 = 0xFD;
    pub const TERMINATOR: u8 = 0xFE;
}

/// A record cut out of the byte stream, payload not decoded yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedRecord {
    pub header: NdefHeader,
    pub type_: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

/// Parse a complete ndef message
///
/// Never fails, records that can't be decoded become unknown records in place,
/// and bytes that can't be framed end the message as one trailing unknown record
pub fn parse_ndef_message(data: &[u8]) -> NdefMessage {
    let mut input = stream::new(data);
    let (framed, remainder) = frame_records(&mut input);

    let mut records = assemble_chunks(framed);

    if let Some((error, remainder)) = remainder {
        warn!("unable to frame {} trailing bytes: {error}", remainder.len());
        records.push(NdefRecord {
            header: NdefHeader::synthesize(NdefType::Unknown, &[], None, remainder.len(), 0, 1),
            type_: vec![],
            id: None,
            payload: NdefError::Malformed(error).into_payload(remainder),
        });
    }

    NdefMessage::new(records)
}

/// Decode records the platform already framed
pub fn decode_raw_records(raw: Vec<RawNdefRecord>) -> NdefMessage {
    let count = raw.len();

    let framed = raw
        .into_iter()
        .enumerate()
        .map(|(position, record)| {
            let header = NdefHeader::synthesize(
                record.type_name_format(),
                &record.type_,
                record.id(),
                record.payload.len(),
                position,
                count,
            );

            let id = record.id().map(<[u8]>::to_vec);
            FramedRecord {
                header,
                type_: record.type_,
                id,
                payload: record.payload,
            }
        })
        .collect();

    NdefMessage::new(assemble_chunks(framed))
}

/// Frame records until the message end flag, stopping at the first record that
/// can't be framed and handing back the bytes from that point on
fn frame_records(input: &mut Stream<'_>) -> (Vec<FramedRecord>, Option<(String, Vec<u8>)>) {
    let mut records = Vec::new();

    while !input.is_empty() {
        let start = *input;
        match parse_framed_record.parse_next(input) {
            Ok(record) => {
                let message_end = record.header.message_end;
                records.push(record);

                if message_end {
                    break;
                }
            }

            Err(error) => {
                let reason = match error {
                    ErrMode::Incomplete(needed) => format!("truncated record, {needed:?}"),
                    error => format!("{error}"),
                };

                return (records, Some((reason, start.to_vec())));
            }
        }
    }

    if !input.is_empty() {
        debug!("ignoring {} bytes after message end", input.len());
    }

    (records, None)
}

/// Join chunked records into one record, and decode every record's payload
fn assemble_chunks(framed: Vec<FramedRecord>) -> Vec<NdefRecord> {
    let mut records = Vec::with_capacity(framed.len());
    let mut chunk: Option<FramedRecord> = None;

    for record in framed {
        let is_continuation = record.header.type_name_format == NdefType::Unchanged;

        match (chunk.take(), is_continuation) {
            (Some(mut started), true) => {
                started.payload.extend_from_slice(&record.payload);
                started.header.message_end = record.header.message_end;

                if record.header.chunked {
                    chunk = Some(started);
                    continue;
                }

                started.header.chunked = false;
                started.header.payload_length = started.payload.len() as u32;
                started.header.short_record = started.payload.len() <= u8::MAX as usize;
                records.push(decode_framed(started));
            }

            (Some(broken), false) => {
                records.push(unknown_framed(broken, NdefError::UnterminatedChunk));
                start_or_push(record, &mut chunk, &mut records);
            }

            (None, true) => records.push(unknown_framed(record, NdefError::OrphanChunk)),

            (None, false) => start_or_push(record, &mut chunk, &mut records),
        }
    }

    if let Some(broken) = chunk {
        records.push(unknown_framed(broken, NdefError::UnterminatedChunk));
    }

    records
}

fn start_or_push(
    record: FramedRecord,
    chunk: &mut Option<FramedRecord>,
    records: &mut Vec<NdefRecord>,
) {
    if record.header.chunked {
        *chunk = Some(record);
    } else {
        records.push(decode_framed(record));
    }
}

fn decode_framed(record: FramedRecord) -> NdefRecord {
    let payload = decode_payload(record.header.type_name_format, &record.type_, record.payload);

    NdefRecord {
        header: record.header,
        type_: record.type_,
        id: record.id,
        payload,
    }
}

fn unknown_framed(record: FramedRecord, error: NdefError) -> NdefRecord {
    warn!("record decoded as unknown: {error}");

    NdefRecord {
        header: record.header,
        type_: record.type_,
        id: record.id,
        payload: error.into_payload(record.payload),
    }
}

pub fn parse_framed_record(input: &mut Stream<'_>) -> ModalResult<FramedRecord> {
    let header = parse_header.parse_next(input)?;
    let type_ = parse_type(input, header.type_length)?;
    let id = parse_id(input, header.id_length)?;
    let payload = parse_payload(input, header.payload_length)?;

    Ok(FramedRecord {
        header,
        type_,
        id,
        payload,
    })
}

/// Walk the tlv blocks at the start of the tag's data area up to the ndef message tlv
///
/// Returns `None` when a terminator tlv comes before any ndef message
pub fn parse_message_info(input: &mut Stream<'_>) -> ModalResult<Option<MessageInfo>> {
    let mut header_length: u16 = 0;

    loop {
        let tag = be_u8.parse_next(input)?;
        header_length = grow_header(header_length, 1)?;

        match tag {
            tlv::NULL => continue,

            tlv::LOCK_CONTROL | tlv::MEMORY_CONTROL | tlv::PROPRIETARY => {
                let (length, length_size) = parse_tlv_length(input)?;
                take(length as usize).void().parse_next(input)?;
                header_length = grow_header(header_length, length_size)?;
                header_length = grow_header(header_length, length)?;
            }

            tlv::NDEF_MESSAGE => {
                let (length, length_size) = parse_tlv_length(input)?;
                header_length = grow_header(header_length, length_size)?;

                // the whole message must stay addressable
                grow_header(header_length, length)?;
                return Ok(Some(MessageInfo::new(header_length, length)));
            }

            tlv::TERMINATOR => return Ok(None),

            other => {
                debug!("unknown tlv tag {other:#04x}");
                return Err(ErrMode::Cut(ContextError::new()));
            }
        }
    }
}

fn grow_header(header_length: u16, by: u16) -> ModalResult<u16> {
    header_length.checked_add(by).ok_or_else(|| {
        debug!("tlv area longer than {} bytes", u16::MAX);
        ErrMode::Cut(ContextError::new())
    })
}

// one byte, or 0xFF followed by a big endian u16
fn parse_tlv_length(input: &mut Stream<'_>) -> ModalResult<(u16, u16)> {
    let length_indicator = be_u8.parse_next(input)?;

    if length_indicator == 0xFF {
        Ok((be_u16.parse_next(input)?, 3))
    } else {
        Ok((length_indicator as u16, 1))
    }
}

// private
fn parse_header_byte(input: &mut Stream<'_>) -> ModalResult<(bool, bool, bool, bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bits(3_u8),
    ))
    .parse_next(input)
}

fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, type_name_format) =
        parse_header_byte(input)?;

    let type_length = winnow::binary::u8.parse_next(input)?;

    let payload_length = if short_record {
        any.map(|x: u8| x as u32).parse_next(input)?
    } else {
        winnow::binary::u32(Endianness::Big).parse_next(input)?
    };

    let id_length = if has_id_length {
        Some(any.parse_next(input)?)
    } else {
        None
    };

    Ok(NdefHeader {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
        type_name_format: NdefType::from_bits(type_name_format),
        type_length,
        payload_length,
        id_length,
    })
}

fn parse_type(input: &mut Stream<'_>, type_length: u8) -> ModalResult<Vec<u8>> {
    take(type_length as usize)
        .map(|s: &[u8]| s.to_vec())
        .parse_next(input)
}

fn parse_id(input: &mut Stream<'_>, id_length: Option<u8>) -> ModalResult<Option<Vec<u8>>> {
    if let Some(id_len) = id_length {
        take(id_len as usize)
            .map(|s: &[u8]| Some(s.to_vec()))
            .parse_next(input)
    } else {
        Ok(None)
    }
}

fn parse_payload(input: &mut Stream<'_>, payload_length: u32) -> ModalResult<Vec<u8>> {
    take(payload_length as usize)
        .map(|s: &[u8]| s.to_vec())
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use winnow::error::Needed;

    use super::*;
    use crate::payload::{NdefPayload, TextPayloadFormat};

    // MB ME SR, well known "U", "http://hello"
    const URI_RECORD: [u8; 10] = [0xD1, 0x01, 0x06, 0x55, 0x03, 0x68, 0x65, 0x6C, 0x6C, 0x6F];

    fn short_record(flags: u8, type_: &[u8], payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![flags | 0x10, type_.len() as u8, payload.len() as u8];
        bytes.extend_from_slice(type_);
        bytes.extend_from_slice(payload);
        bytes
    }

    fn text_record(flags: u8, text: &str) -> Vec<u8> {
        let mut payload = vec![0x02, b'e', b'n'];
        payload.extend_from_slice(text.as_bytes());
        short_record(flags | 0x01, b"T", &payload)
    }

    #[test]
    fn known_header_parse() {
        let mut header_bytes = stream::new(&[0xD1, 0x01, 0x0D, 0x55, 0x02]);
        let header: NdefHeader = parse_header(&mut header_bytes).unwrap();

        assert!(header.message_begin);
        assert!(header.message_end);
        assert!(!header.chunked);
        assert!(header.short_record);
        assert!(!header.has_id_length);
        assert_eq!(header.type_name_format, NdefType::WellKnown);
        assert_eq!(header.type_length, 1);
        assert_eq!(header.payload_length, 13);
    }

    #[test]
    fn long_record_header_with_id() {
        // MB ME IL, mime, type length 2, payload length 300, id length 1
        let mut header_bytes = stream::new(&[0xCA, 0x02, 0x00, 0x00, 0x01, 0x2C, 0x01]);
        let header = parse_header(&mut header_bytes).unwrap();

        assert!(!header.short_record);
        assert!(header.has_id_length);
        assert_eq!(header.type_name_format, NdefType::Mime);
        assert_eq!(header.payload_length, 300);
        assert_eq!(header.id_length, Some(1));
    }

    #[test]
    fn single_uri_record() {
        let message = parse_ndef_message(&URI_RECORD);

        assert_eq!(message.len(), 1);
        assert_eq!(message.records[0].type_, b"U");
        assert_eq!(message.records[0].payload, NdefPayload::Uri("http://hello".into()));
    }

    #[test]
    fn records_keep_their_order() {
        let mut bytes = text_record(0x80, "first");
        bytes.extend(short_record(0x02, b"text/plain", b"second"));
        bytes.extend(short_record(0x04, b"example.com:t", &[0x01]));
        bytes.extend(text_record(0x40, "fourth"));

        let message = parse_ndef_message(&bytes);
        assert_eq!(message.len(), 4);

        let NdefPayload::Text(first) = &message.records[0].payload else { panic!("not text") };
        assert_eq!(first.text, "first");
        assert_eq!(first.format, TextPayloadFormat::Utf8);
        assert!(matches!(message.records[1].payload, NdefPayload::Mime(_)));
        assert!(matches!(message.records[2].payload, NdefPayload::External(_)));

        let texts: Vec<&str> = message.texts().collect();
        assert_eq!(texts, vec!["first", "second", "fourth"]);
    }

    #[test]
    fn one_malformed_record_among_valid_ones() {
        let mut bytes = text_record(0x80, "one");
        // uri record with a prefix code past the end of the table
        bytes.extend(short_record(0x01, b"U", &[0x7F, b'x']));
        bytes.extend(text_record(0x00, "two"));
        bytes.extend(text_record(0x40, "three"));

        let message = parse_ndef_message(&bytes);

        assert_eq!(message.len(), 4);
        assert_eq!(message.unknown_count(), 1);
        assert!(message.records[1].payload.is_unknown());

        let texts: Vec<&str> = message.texts().collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn truncated_tail_becomes_unknown() {
        let mut bytes = text_record(0x80, "kept");
        let mut cut = text_record(0x40, "cut off");
        cut.truncate(5);
        bytes.extend(&cut);

        let message = parse_ndef_message(&bytes);

        assert_eq!(message.len(), 2);
        assert_eq!(message.records[0].payload.as_text(), Some("kept"));

        let NdefPayload::Unknown(unknown) = &message.records[1].payload else {
            panic!("expected unknown record")
        };
        assert_eq!(unknown.data, cut);
        assert!(unknown.reason.starts_with("unable to frame record"));
    }

    #[test]
    fn partial_stream_reports_incomplete() {
        let mut input = stream::new(&URI_RECORD[..6]);
        let result = parse_framed_record(&mut input);

        assert!(matches!(result, Err(ErrMode::Incomplete(Needed::Size(_)))));
    }

    #[test]
    fn bytes_after_message_end_are_ignored() {
        let mut bytes = URI_RECORD.to_vec();
        bytes.extend([0xFE, 0x00, 0x00]);

        let message = parse_ndef_message(&bytes);
        assert_eq!(message.len(), 1);
        assert_eq!(message.unknown_count(), 0);
    }

    #[test]
    fn chunked_record_is_reassembled() {
        // first chunk: MB CF, mime text/plain
        let mut bytes = short_record(0x80 | 0x20 | 0x02, b"text/plain", b"hello ");
        // middle chunk: CF, unchanged, no type
        bytes.extend(short_record(0x20 | 0x06, b"", b"chunked "));
        // last chunk: ME, unchanged
        bytes.extend(short_record(0x40 | 0x06, b"", b"world"));

        let message = parse_ndef_message(&bytes);
        assert_eq!(message.len(), 1);

        let record = &message.records[0];
        assert!(!record.header.chunked);
        assert!(record.header.message_end);
        assert_eq!(record.header.payload_length, 19);
        assert_eq!(record.payload.as_text(), Some("hello chunked world"));
    }

    #[test]
    fn broken_chunk_sequences() {
        // chunk never terminated before the message ends
        let mut bytes = short_record(0x80 | 0x20 | 0x02, b"text/plain", b"abc");
        bytes.extend(short_record(0x40 | 0x20 | 0x06, b"", b"def"));
        let message = parse_ndef_message(&bytes);
        assert_eq!(message.len(), 1);
        assert!(message.records[0].payload.is_unknown());

        // continuation without a start
        let mut bytes = short_record(0x80 | 0x06, b"", b"abc");
        bytes.extend(URI_RECORD.map(|b| if b == 0xD1 { 0x51 } else { b }));
        let message = parse_ndef_message(&bytes);
        assert_eq!(message.len(), 2);
        assert!(message.records[0].payload.is_unknown());
        assert_eq!(message.records[1].payload, NdefPayload::Uri("http://hello".into()));
    }

    #[test]
    fn raw_records_from_platform() {
        let raw = vec![
            RawNdefRecord {
                tnf: 0x01,
                type_: b"U".to_vec(),
                id: vec![],
                payload: vec![0x04, b'a', b'.', b'b'],
            },
            RawNdefRecord {
                tnf: 0x01,
                type_: b"U".to_vec(),
                id: b"id".to_vec(),
                payload: vec![0x99],
            },
            RawNdefRecord {
                tnf: 0x02,
                type_: b"text/plain".to_vec(),
                id: vec![],
                payload: b"plain".to_vec(),
            },
        ];

        let message = decode_raw_records(raw);
        assert_eq!(message.len(), 3);

        let first = &message.records[0];
        assert!(first.header.message_begin);
        assert!(!first.header.message_end);
        assert_eq!(first.id, None);
        assert_eq!(first.payload, NdefPayload::Uri("https://a.b".into()));

        let second = &message.records[1];
        assert_eq!(second.id.as_deref(), Some(&b"id"[..]));
        assert!(second.payload.is_unknown());

        let third = &message.records[2];
        assert!(third.header.message_end);
        assert_eq!(third.payload.as_text(), Some("plain"));
    }

    #[test]
    fn message_info_skips_leading_tlvs() {
        // null, lock control (3 bytes), ndef tlv with 10 bytes
        let mut bytes = vec![0x00, 0x01, 0x03, 0xA0, 0x10, 0x44, 0x03, 0x0A];
        bytes.extend(URI_RECORD);

        let mut input = stream::new(&bytes);
        let info = parse_message_info(&mut input).unwrap().unwrap();

        assert_eq!(info.header_length, 8);
        assert_eq!(info.ndef_length, 10);
        assert_eq!(info.full_message_length, 18);
        assert_eq!(input.to_vec(), URI_RECORD.to_vec());
    }

    #[test]
    fn message_info_long_length_and_terminator() {
        let mut input = stream::new(&[0x03, 0xFF, 0x01, 0x2C]);
        let info = parse_message_info(&mut input).unwrap().unwrap();
        assert_eq!(info.header_length, 4);
        assert_eq!(info.ndef_length, 300);

        let mut input = stream::new(&[0x00, 0xFE, 0x00]);
        assert_eq!(parse_message_info(&mut input).unwrap(), None);

        let mut input = stream::new(&[0x00, 0x00]);
        assert!(matches!(parse_message_info(&mut input), Err(ErrMode::Incomplete(_))));

        let mut input = stream::new(&[0x42, 0x00]);
        assert!(matches!(parse_message_info(&mut input), Err(ErrMode::Cut(_))));
    }

    #[test]
    fn oversized_tlv_area_is_rejected() {
        // proprietary tlv filling the whole u16 range, then an empty ndef tlv
        let mut bytes = vec![0xFD, 0xFF, 0xFF, 0xFF];
        bytes.extend(vec![0x00; 0xFFFF]);
        bytes.extend([0x03, 0x00, 0xFE]);

        let mut input = stream::new(&bytes);
        assert!(matches!(parse_message_info(&mut input), Err(ErrMode::Cut(_))));

        let mut reader = crate::reader::NdefReader::new();
        assert!(matches!(
            reader.parse(bytes),
            Err(crate::reader::NdefReaderError::ParsingError(_))
        ));
    }

    #[test]
    fn ndef_length_past_addressable_area_is_rejected() {
        let mut bytes = vec![0x00; 0xFFF0];
        bytes.extend([0x03, 0xFF, 0x00, 0x20]);

        let mut input = stream::new(&bytes);
        assert!(matches!(parse_message_info(&mut input), Err(ErrMode::Cut(_))));
    }
}
