//! Program-image loader for SREC (Motorola S-record) files.
//!
//! The image populates the backing memory before reset is released. Data
//! records (`S1`/`S2`/`S3`, with 16/24/32-bit addresses) write their payload
//! bytes at their absolute addresses; the header (`S0`) and count
//! (`S5`/`S6`) records are ignored; a termination record (`S7`/`S8`/`S9`)
//! ends the load. Every record is validated — type, hex digits, byte count,
//! ones'-complement checksum — and violations abort the run with the
//! offending line number.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::HarnessError;
use crate::mem::MemoryDevice;

/// One parsed S-record.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Record {
    /// Payload bytes at an absolute address.
    Data { addr: u32, bytes: Vec<u8> },
    /// Header, count, or other record carrying no memory payload.
    Meta,
    /// End-of-image record; its start-address payload is not used here.
    Termination,
}

/// Address field width in bytes for each record type digit.
fn addr_len(kind: char) -> Option<usize> {
    match kind {
        '0' | '1' | '5' | '9' => Some(2),
        '2' | '6' | '8' => Some(3),
        '3' | '7' => Some(4),
        _ => None,
    }
}

/// Decodes an even-length hex string into bytes.
fn decode_hex(s: &str, line: usize) -> Result<Vec<u8>, HarnessError> {
    if s.len() % 2 != 0 {
        return Err(HarnessError::ImageFormat {
            line,
            reason: format!("odd number of hex digits ({})", s.len()),
        });
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| HarnessError::ImageFormat {
                line,
                reason: format!("invalid hex digits '{}'", &s[i..i + 2]),
            })
        })
        .collect()
}

/// Parses one S-record line; `line` is 1-based for diagnostics.
fn parse_record(text: &str, line: usize) -> Result<Record, HarnessError> {
    let malformed = |reason: String| HarnessError::ImageFormat { line, reason };

    let mut chars = text.chars();
    if chars.next() != Some('S') {
        return Err(malformed("record does not start with 'S'".into()));
    }
    let kind = chars
        .next()
        .ok_or_else(|| malformed("record truncated after 'S'".into()))?;
    let Some(addr_bytes) = addr_len(kind) else {
        return Err(malformed(format!("unknown record type 'S{kind}'")));
    };

    let fields = decode_hex(&text[2..], line)?;
    let (count, rest) = fields
        .split_first()
        .ok_or_else(|| malformed("record missing byte count".into()))?;
    if usize::from(*count) != rest.len() {
        return Err(malformed(format!(
            "byte count {} does not match {} remaining bytes",
            count,
            rest.len()
        )));
    }
    if rest.len() < addr_bytes + 1 {
        return Err(malformed("record too short for address and checksum".into()));
    }

    let sum = fields[..fields.len() - 1]
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_add(*b));
    let expected = !sum;
    let found = fields[fields.len() - 1];
    if expected != found {
        return Err(malformed(format!(
            "checksum mismatch: computed {expected:#04x}, record has {found:#04x}"
        )));
    }

    match kind {
        '1' | '2' | '3' => {
            let addr = rest[..addr_bytes]
                .iter()
                .fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
            let bytes = rest[addr_bytes..rest.len() - 1].to_vec();
            Ok(Record::Data { addr, bytes })
        }
        '7' | '8' | '9' => Ok(Record::Termination),
        _ => Ok(Record::Meta),
    }
}

/// Loads SREC text into `mem`, returning the number of bytes written.
///
/// # Errors
///
/// Returns [`HarnessError::ImageFormat`] for malformed records and
/// [`HarnessError::AddressOutOfRange`] when a record targets memory outside
/// the backing region.
pub fn load_str(mem: &mut MemoryDevice, text: &str) -> Result<usize, HarnessError> {
    let mut loaded = 0;
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match parse_record(line, index + 1)? {
            Record::Data { addr, bytes } => {
                for (i, byte) in bytes.iter().enumerate() {
                    mem.write_byte(addr.wrapping_add(i as u32), *byte)?;
                }
                loaded += bytes.len();
            }
            Record::Meta => {}
            Record::Termination => break,
        }
    }
    Ok(loaded)
}

/// Loads an SREC file into `mem`, returning the number of bytes written.
///
/// # Errors
///
/// As [`load_str`], plus I/O failures reading `path`.
pub fn load_file(mem: &mut MemoryDevice, path: impl AsRef<Path>) -> Result<usize, HarnessError> {
    let text = fs::read_to_string(path.as_ref())?;
    let loaded = load_str(mem, &text)?;
    debug!("loaded {loaded} bytes from {}", path.as_ref().display());
    Ok(loaded)
}
