//! Cycle-accurate verification harness for CPU cores.
//!
//! This crate drives a simulated CPU core through a compliance or unit test
//! and produces a deterministic verdict. It provides:
//! 1. **Driver:** Clock-stepped simulation with strict sub-cycle evaluation
//!    ordering and retirement-trace capture.
//! 2. **Bus agent:** A request/grant SRAM protocol agent with byte-strobe
//!    writes and seeded, tunable backpressure and error injection.
//! 3. **Memory:** A bounds-checked backing memory populated from SREC images.
//! 4. **Artifacts:** VCD waveforms and memory-signature dump/verify against
//!    a golden reference.
//! 5. **Orchestration:** Reset sequencing, the run-until-marker-or-timeout
//!    loop, exit-code mapping, and a clap front end.
//!
//! The simulated model is opaque to the harness: anything implementing
//! [`DutModel`] (typically a thin adapter over a generated model) can be
//! driven. A model crate's `main` is one line:
//! `std::process::exit(coretb_core::sim::run_main(model))`.
//!
//! # Examples
//!
//! Driving a model by hand (a do-nothing model here; a real one wraps
//! generated simulation code):
//!
//! ```
//! use coretb_core::{Config, DutDriver, DutModel, MemoryDevice};
//!
//! #[derive(Default)]
//! struct IdleModel {
//!     clk: bool,
//!     resetn: bool,
//!     gnt: bool,
//!     rdata: u32,
//!     err: bool,
//! }
//!
//! impl DutModel for IdleModel {
//!     fn set_clk(&mut self, level: bool) { self.clk = level; }
//!     fn clk(&self) -> bool { self.clk }
//!     fn set_resetn(&mut self, level: bool) { self.resetn = level; }
//!     fn resetn(&self) -> bool { self.resetn }
//!     fn mem_req(&self) -> bool { false }
//!     fn mem_wen(&self) -> bool { false }
//!     fn mem_strb(&self) -> u8 { 0 }
//!     fn mem_addr(&self) -> u32 { 0 }
//!     fn mem_wdata(&self) -> u32 { 0 }
//!     fn set_mem_gnt(&mut self, level: bool) { self.gnt = level; }
//!     fn mem_gnt(&self) -> bool { self.gnt }
//!     fn set_mem_rdata(&mut self, data: u32) { self.rdata = data; }
//!     fn mem_rdata(&self) -> u32 { self.rdata }
//!     fn set_mem_error(&mut self, level: bool) { self.err = level; }
//!     fn mem_error(&self) -> bool { self.err }
//!     fn retire_valid(&self) -> bool { false }
//!     fn retire_pc(&self) -> u32 { 0 }
//!     fn retire_instr(&self) -> u32 { 0 }
//!     fn eval(&mut self) {}
//! }
//!
//! let config = Config::default();
//! let mem = MemoryDevice::new(0x8000_0000, 0x4000);
//! let mut driver = DutDriver::new(IdleModel::default(), mem, &config).unwrap();
//!
//! driver.set_reset();
//! driver.step_clk().unwrap();
//! driver.clear_reset();
//! driver.step_clk().unwrap();
//! driver.step_clk().unwrap();
//!
//! // Three clock periods at the default sub-cycle resolution.
//! assert_eq!(driver.sim_time(), 30);
//! assert!(driver.pop_trace().is_none());
//! ```

/// Bus agent for the model's external memory interface.
pub mod bus;
/// Common types (errors, seeded randomness).
pub mod common;
/// Run configuration (defaults, hierarchical structures, validation).
pub mod config;
/// Clock-stepped driver and retirement-trace events.
pub mod driver;
/// Bounds-checked backing memory.
pub mod mem;
/// Signal-level model boundary trait.
pub mod model;
/// Signature dump and golden-reference verification.
pub mod sig;
/// Orchestration: test loop, verdicts, CLI entry points.
pub mod sim;
/// SREC program-image loading.
pub mod srec;
/// VCD waveform tracing.
pub mod wave;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Clock-stepped driver; owns the model, bus agent, and backing memory.
pub use crate::driver::DutDriver;
/// Backing memory device.
pub use crate::mem::MemoryDevice;
/// Boundary trait implemented by model adapters.
pub use crate::model::DutModel;
/// Test orchestrator and run verdicts.
pub use crate::sim::runner::{TestRunner, Verdict};
