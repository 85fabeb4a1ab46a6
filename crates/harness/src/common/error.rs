//! Harness error definitions.
//!
//! Everything that can abort a run funnels into [`HarnessError`]. These are
//! configuration faults in the taxonomy of the harness: malformed input
//! files, out-of-range memory accesses, bad option values, and I/O failures
//! around artifact files. Conditions the simulated model reports on its own
//! signals (bus errors, traps) are observed data, never `HarnessError`s, and
//! test verdicts travel through [`Verdict`](crate::sim::runner::Verdict)
//! rather than `Err`.

use thiserror::Error;

/// Fatal harness errors; each aborts the run with a diagnostic.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A memory access fell outside the configured backing region.
    ///
    /// Raised by the memory device on behalf of the bus agent or the
    /// signature reader. This is a harness configuration fault (wrong base,
    /// wrong size, wrong signature range), not a condition the model under
    /// test can report.
    #[error("memory access out of range: {addr:#010x} not in [{base:#010x}, {base:#010x}+{size:#x})")]
    AddressOutOfRange {
        /// The faulting byte address.
        addr: u32,
        /// Base address of the backing region.
        base: u32,
        /// Size of the backing region in bytes.
        size: u32,
    },

    /// A program-image record failed to parse or checksum.
    #[error("malformed image record at line {line}: {reason}")]
    ImageFormat {
        /// 1-based line number in the image file.
        line: usize,
        /// What was wrong with the record.
        reason: String,
    },

    /// A signature reference line failed to parse.
    #[error("malformed signature reference at line {line}: {reason}")]
    SignatureFormat {
        /// 1-based line number in the reference file.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// The run configuration is inconsistent or unusable.
    #[error("invalid configuration: {reason}")]
    Config {
        /// Human-readable description of the inconsistency.
        reason: String,
    },

    /// An artifact file could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Shorthand for a [`HarnessError::Config`] with a formatted reason.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
