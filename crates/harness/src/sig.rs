//! Signature dump and golden-reference verification.
//!
//! The signature region is a half-open word-aligned address range whose
//! final contents encode test-relevant state. Each 4-byte word is rendered
//! most-significant byte first as 8 lowercase hex characters plus a newline,
//! so the little-endian word `0xDEADBEEF` stored as bytes `EF BE AD DE`
//! dumps as `deadbeef`. Verification parses the same format back and
//! compares byte-for-byte, accumulating a boolean AND across all words.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::common::HarnessError;
use crate::mem::MemoryDevice;

/// Reads the four bytes of the word at `addr`, lowest-addressed first.
fn word_bytes(mem: &MemoryDevice, addr: u32) -> Result<[u8; 4], HarnessError> {
    Ok([
        mem.read_byte(addr)?,
        mem.read_byte(addr + 1)?,
        mem.read_byte(addr + 2)?,
        mem.read_byte(addr + 3)?,
    ])
}

/// Writes the signature region `[start, end)` to `path`, one word per line.
///
/// # Errors
///
/// Returns an error when the region falls outside backing memory or the
/// file cannot be written.
pub fn dump(
    mem: &MemoryDevice,
    start: u32,
    end: u32,
    path: impl AsRef<Path>,
) -> Result<(), HarnessError> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut addr = start;
    while addr < end {
        let b = word_bytes(mem, addr)?;
        writeln!(out, "{:02x}{:02x}{:02x}{:02x}", b[3], b[2], b[1], b[0])?;
        addr += 4;
    }
    out.flush()?;
    Ok(())
}

/// Parses one 8-digit reference line into bytes, highest-addressed first.
fn parse_reference_line(text: &str, line: usize) -> Result<[u8; 4], HarnessError> {
    let malformed = |reason: String| HarnessError::SignatureFormat { line, reason };

    let text = text.trim_end();
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed(format!(
            "expected 8 hex digits, got '{text}'"
        )));
    }
    let mut bytes = [0u8; 4];
    for (i, chunk) in bytes.iter_mut().enumerate() {
        *chunk = u8::from_str_radix(&text[i * 2..i * 2 + 2], 16)
            .map_err(|e| malformed(format!("invalid hex: {e}")))?;
    }
    Ok(bytes)
}

/// Verifies the signature region `[start, end)` against the reference file
/// at `path`, returning whether every word matched.
///
/// Prints one diagnostic line per word (suppressed by `quiet`) and a
/// mismatch notice per differing word (never suppressed). A reference file
/// with fewer lines than the region has words is a configuration fault.
///
/// # Errors
///
/// Returns an error when the reference file is missing or malformed, or the
/// region falls outside backing memory.
pub fn verify(
    mem: &MemoryDevice,
    start: u32,
    end: u32,
    path: impl AsRef<Path>,
    quiet: bool,
) -> Result<bool, HarnessError> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.lines();

    if !quiet {
        println!("[*] Address    Reference    Dut");
    }

    let mut result = true;
    let mut addr = start;
    let mut line_no = 0;
    while addr < end {
        line_no += 1;
        let line = lines.next().ok_or_else(|| HarnessError::SignatureFormat {
            line: line_no,
            reason: "reference file shorter than signature region".into(),
        })?;
        // Reference lines are MSB first: sig[3] sig[2] sig[1] sig[0].
        let sig = parse_reference_line(line, line_no)?;
        let dut = word_bytes(mem, addr)?;

        if !quiet {
            println!(
                "[*] {addr:08x}   {:02x} {:02x} {:02x} {:02x}  {:02x} {:02x} {:02x} {:02x}",
                sig[0], sig[1], sig[2], sig[3], dut[3], dut[2], dut[1], dut[0]
            );
        }

        let matched = sig[0] == dut[3] && sig[1] == dut[2] && sig[2] == dut[1] && sig[3] == dut[0];
        if !matched {
            println!("[!] signature mismatch at {addr:08x}");
            result = false;
        }
        addr += 4;
    }

    Ok(result)
}
