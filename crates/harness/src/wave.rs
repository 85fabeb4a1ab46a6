//! Waveform tracing in VCD format.
//!
//! Records the harness-visible wires of the model interface — clock, reset,
//! the memory handshake, and the retirement port — one sample per simulation
//! tick, emitting only the wires that changed. The writer is generic over
//! any byte sink; runs use a buffered file, tests an in-memory vector.
//!
//! File I/O happens only at header time, per-sample buffered writes, and the
//! final flush; the tracer never reads.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::model::DutModel;

/// Traced wires: name and width in bits, in declaration order.
const SIGNALS: [(&str, u8); 13] = [
    ("clk", 1),
    ("resetn", 1),
    ("mem_req", 1),
    ("mem_gnt", 1),
    ("mem_wen", 1),
    ("mem_error", 1),
    ("mem_strb", 4),
    ("mem_addr", 32),
    ("mem_wdata", 32),
    ("mem_rdata", 32),
    ("retire_valid", 1),
    ("retire_pc", 32),
    ("retire_instr", 32),
];

/// Captures the current value of every traced wire.
fn capture<M: DutModel>(model: &M) -> [u64; SIGNALS.len()] {
    [
        u64::from(model.clk()),
        u64::from(model.resetn()),
        u64::from(model.mem_req()),
        u64::from(model.mem_gnt()),
        u64::from(model.mem_wen()),
        u64::from(model.mem_error()),
        u64::from(model.mem_strb() & 0xF),
        u64::from(model.mem_addr()),
        u64::from(model.mem_wdata()),
        u64::from(model.mem_rdata()),
        u64::from(model.retire_valid()),
        u64::from(model.retire_pc()),
        u64::from(model.retire_instr()),
    ]
}

/// Short VCD identifier code for the signal at `index`.
fn id_code(index: usize) -> char {
    (b'!' + index as u8) as char
}

/// Change-only VCD writer for the harness-visible model interface.
#[derive(Debug)]
pub struct VcdTracer<W: Write> {
    out: W,
    prev: Option<[u64; SIGNALS.len()]>,
}

impl VcdTracer<BufWriter<File>> {
    /// Opens `path` for writing and emits the VCD header.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be created or written.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> VcdTracer<W> {
    /// Wraps a byte sink and emits the VCD header and variable definitions.
    ///
    /// # Errors
    ///
    /// Returns an error when the header cannot be written.
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "$timescale 1ns $end")?;
        writeln!(out, "$scope module testbench $end")?;
        for (index, (name, width)) in SIGNALS.iter().enumerate() {
            writeln!(out, "$var wire {width} {} {name} $end", id_code(index))?;
        }
        writeln!(out, "$upscope $end")?;
        writeln!(out, "$enddefinitions $end")?;
        Ok(Self { out, prev: None })
    }

    /// Writes one value in VCD notation.
    fn write_value(&mut self, index: usize, value: u64) -> io::Result<()> {
        if SIGNALS[index].1 == 1 {
            writeln!(self.out, "{value}{}", id_code(index))
        } else {
            writeln!(self.out, "b{value:b} {}", id_code(index))
        }
    }

    /// Records the wire state at simulation tick `time`.
    ///
    /// The first sample dumps every wire; later samples emit only changes.
    ///
    /// # Errors
    ///
    /// Returns an error when the sink cannot be written.
    pub fn sample<M: DutModel>(&mut self, time: u64, model: &M) -> io::Result<()> {
        let frame = capture(model);
        match self.prev {
            None => {
                writeln!(self.out, "#{time}")?;
                writeln!(self.out, "$dumpvars")?;
                for (index, value) in frame.iter().enumerate() {
                    self.write_value(index, *value)?;
                }
                writeln!(self.out, "$end")?;
            }
            Some(prev) => {
                if prev != frame {
                    writeln!(self.out, "#{time}")?;
                    for (index, value) in frame.iter().enumerate() {
                        if prev[index] != *value {
                            self.write_value(index, *value)?;
                        }
                    }
                }
            }
        }
        self.prev = Some(frame);
        Ok(())
    }

    /// Flushes and closes the trace.
    ///
    /// # Errors
    ///
    /// Returns an error when the final flush fails.
    pub fn finish(mut self) -> io::Result<()> {
        self.out.flush()
    }
}
