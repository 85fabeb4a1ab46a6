//! Clock-stepped simulation driver.
//!
//! Owns the model, the bus agent, and the backing memory, and advances
//! simulated time in controlled sub-cycle increments:
//! 1. **Clocking:** one `step_clk` call is exactly one clock period, split
//!    into `evals_per_clock` evaluation ticks; the clock is low for the first
//!    half-period and rises at the midpoint tick.
//! 2. **Edge hook:** at the rising tick, the bus agent samples the interface
//!    and the retirement port is checked — both *before* that tick's
//!    evaluations, so they observe the settled pre-edge wire state.
//! 3. **Settle-drive-settle:** every tick evaluates the model, drives the
//!    agent's outputs, and evaluates again. The agent's response is a
//!    function of the first evaluation's outputs, and the model's
//!    combinational logic must settle against the driven response; skipping
//!    either evaluation produces stale bus data.
//! 4. **Tracing:** with a waveform configured, the wire state is dumped at
//!    each new tick value; the trace is closed exactly once on every exit
//!    path (`finish_wave` normally, `Drop` as the backstop).
//!
//! A driver is single-use: one instance drives one run.

use std::collections::VecDeque;
use std::fs::File;
use std::io::BufWriter;

use tracing::debug;

use crate::bus::SramAgent;
use crate::common::HarnessError;
use crate::config::Config;
use crate::mem::MemoryDevice;
use crate::model::DutModel;
use crate::wave::VcdTracer;

/// One retired instruction, as observed on the model's retirement port.
///
/// Events are produced at rising clock edges and consumed by the test loop
/// in strict FIFO order, exactly once each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    /// Program counter of the retired instruction.
    pub program_counter: u32,
    /// Encoding of the retired instruction.
    pub instruction_word: u32,
}

/// Clock-stepped driver owning the model, bus agent, and backing memory.
pub struct DutDriver<M: DutModel> {
    model: M,
    agent: SramAgent,
    mem: MemoryDevice,
    trace: VecDeque<TraceEvent>,
    wave: Option<VcdTracer<BufWriter<File>>>,
    sim_time: u64,
    evals_per_clock: u32,
}

impl<M: DutModel> DutDriver<M> {
    /// Wires a driver around `model` and `mem`, opening the waveform file
    /// immediately when one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid or the waveform
    /// file cannot be created.
    pub fn new(model: M, mem: MemoryDevice, config: &Config) -> Result<Self, HarnessError> {
        config.validate()?;
        let wave = match &config.output.wave_path {
            Some(path) => Some(VcdTracer::create(path)?),
            None => None,
        };
        Ok(Self {
            model,
            agent: SramAgent::new(&config.bus),
            mem,
            trace: VecDeque::new(),
            wave,
            sim_time: 0,
            evals_per_clock: config.test.evals_per_clock,
        })
    }

    /// Asserts reset on the model and the bus agent. Idempotent.
    pub fn set_reset(&mut self) {
        debug!("reset asserted");
        self.model.set_resetn(false);
        self.model.set_clk(false);
        self.agent.set_reset();
    }

    /// Releases reset on the model and the bus agent. Idempotent.
    pub fn clear_reset(&mut self) {
        debug!(sim_time = self.sim_time, "reset released");
        self.model.set_resetn(true);
        self.agent.clear_reset();
    }

    /// Advances simulated time by exactly one clock period.
    ///
    /// # Errors
    ///
    /// Propagates out-of-range memory accesses from the bus agent and I/O
    /// failures from the waveform writer.
    pub fn step_clk(&mut self) -> Result<(), HarnessError> {
        let half = self.evals_per_clock / 2;
        for tick in 0..self.evals_per_clock {
            if tick == 0 {
                self.model.set_clk(false);
            } else if tick == half {
                self.model.set_clk(true);
                self.on_posedge()?;
            }

            self.model.eval();
            self.agent.drive(&mut self.model);
            self.model.eval();

            self.sim_time += 1;
            if let Some(wave) = self.wave.as_mut() {
                wave.sample(self.sim_time, &self.model)?;
            }
        }
        Ok(())
    }

    /// Rising-edge work: bus agent sampling, then retirement capture.
    fn on_posedge(&mut self) -> Result<(), HarnessError> {
        self.agent.on_posedge(&self.model, &mut self.mem)?;
        if self.model.retire_valid() {
            self.trace.push_back(TraceEvent {
                program_counter: self.model.retire_pc(),
                instruction_word: self.model.retire_instr(),
            });
        }
        Ok(())
    }

    /// Current simulated time in ticks.
    ///
    /// Timeouts compared against this value must be scaled by
    /// `evals_per_clock` when given in clock cycles.
    pub fn sim_time(&self) -> u64 {
        self.sim_time
    }

    /// Removes and returns the oldest pending retirement event.
    pub fn pop_trace(&mut self) -> Option<TraceEvent> {
        self.trace.pop_front()
    }

    /// Whether any retirement events are pending.
    pub fn trace_pending(&self) -> bool {
        !self.trace.is_empty()
    }

    /// Shared access to the backing memory.
    pub fn mem(&self) -> &MemoryDevice {
        &self.mem
    }

    /// Mutable access to the backing memory.
    pub fn mem_mut(&mut self) -> &mut MemoryDevice {
        &mut self.mem
    }

    /// Shared access to the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Flushes and closes the waveform trace, if one is open.
    ///
    /// Safe to call when tracing is disabled or already finished; the trace
    /// is closed at most once.
    ///
    /// # Errors
    ///
    /// Returns the flush failure, if any.
    pub fn finish_wave(&mut self) -> Result<(), HarnessError> {
        if let Some(wave) = self.wave.take() {
            wave.finish()?;
        }
        Ok(())
    }
}

impl<M: DutModel> Drop for DutDriver<M> {
    /// Closes the waveform trace on abnormal exit paths.
    fn drop(&mut self) {
        if let Some(wave) = self.wave.take() {
            let _ = wave.finish();
        }
    }
}
