//! Top-level test orchestration.
//!
//! One [`TestRunner`] owns one run end to end: build the backing memory,
//! load the program image, wire the driver, sequence reset, then step the
//! clock until a retirement-trace marker or the tick timeout, and finally
//! produce the artifacts and the verdict. Verdicts are normal run outcomes
//! carried by [`Verdict`], never errors; `Err` is reserved for harness
//! configuration faults.

use tracing::debug;

use crate::common::HarnessError;
use crate::config::Config;
use crate::driver::DutDriver;
use crate::mem::MemoryDevice;
use crate::model::DutModel;
use crate::{sig, srec};

/// Final outcome of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The pass marker was retired (and the signature matched, if checked).
    Pass,
    /// The tick timeout elapsed; takes precedence over any marker seen in
    /// the same run.
    Timeout,
    /// The fail marker was retired.
    Fail,
    /// Signature verification failed, even if the pass marker was reached.
    SignatureMismatch,
}

impl Verdict {
    /// Process exit code for this verdict.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Pass => 0,
            Self::Timeout => 1,
            Self::Fail => 2,
            Self::SignatureMismatch => 3,
        }
    }

    /// One-line console summary in the harness output style.
    pub fn summary(self) -> &'static str {
        match self {
            Self::Pass => "[*] TEST PASS",
            Self::Timeout => "[!] TIMEOUT",
            Self::Fail => "[!] TEST FAIL",
            Self::SignatureMismatch => "[!] SIG FAIL",
        }
    }
}

/// Orchestrates one verification run over a model.
pub struct TestRunner<M: DutModel> {
    driver: DutDriver<M>,
    config: Config,
}

impl<M: DutModel> TestRunner<M> {
    /// Builds the run: backing memory, optional image load, driver wiring.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid configuration, a malformed or
    /// out-of-range program image, or a waveform file that cannot be
    /// created.
    pub fn new(model: M, config: Config) -> Result<Self, HarnessError> {
        config.validate()?;

        let mut mem = MemoryDevice::new(config.memory.base, config.memory.size);
        if let Some(path) = &config.memory.image {
            let loaded = srec::load_file(&mut mem, path)?;
            if !config.output.quiet {
                println!("[*] Loaded {loaded} bytes from {path}");
            }
        }

        let driver = DutDriver::new(model, mem, &config)?;
        Ok(Self { driver, config })
    }

    /// Executes the run to completion and returns the verdict.
    ///
    /// Reset is held for the configured number of cycles, then the loop
    /// steps one clock at a time, draining at most one trace event per
    /// cycle and comparing its program counter against the pass and fail
    /// markers. The loop ends on the first marker hit or when the tick
    /// timeout elapses; the timeout wins the final decision either way.
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range bus accesses, artifact I/O
    /// failures, or a malformed signature reference. The waveform trace is
    /// still closed on these paths.
    pub fn run(&mut self) -> Result<Verdict, HarnessError> {
        let pass_address = self.config.test.pass_address;
        let fail_address = self.config.test.fail_address;
        let timeout_ticks = self.config.timeout_ticks();

        self.driver.set_reset();
        for _ in 0..self.config.test.reset_cycles {
            self.driver.step_clk()?;
        }
        self.driver.clear_reset();

        let mut finish = false;
        let mut passed = true;
        while self.driver.sim_time() < timeout_ticks && !finish {
            self.driver.step_clk()?;

            if let Some(event) = self.driver.pop_trace() {
                if event.program_counter == pass_address {
                    debug!(pc = event.program_counter, "pass marker retired");
                    passed = true;
                    finish = true;
                } else if event.program_counter == fail_address {
                    debug!(pc = event.program_counter, "fail marker retired");
                    passed = false;
                    finish = true;
                }
            }
        }

        self.driver.finish_wave()?;

        if let Some(path) = &self.config.output.sig_dump {
            sig::dump(
                self.driver.mem(),
                self.config.output.sig_start,
                self.config.output.sig_end,
                path,
            )?;
            if !self.config.output.quiet {
                println!("[*] Signature dumped to {path}");
            }
        }

        let mut sig_ok = true;
        if let Some(path) = &self.config.output.sig_verify {
            sig_ok = sig::verify(
                self.driver.mem(),
                self.config.output.sig_start,
                self.config.output.sig_end,
                path,
                self.config.output.quiet,
            )?;
            passed &= sig_ok;
        }

        let verdict = if self.driver.sim_time() >= timeout_ticks {
            Verdict::Timeout
        } else if passed {
            Verdict::Pass
        } else if !sig_ok {
            Verdict::SignatureMismatch
        } else {
            Verdict::Fail
        };
        Ok(verdict)
    }

    /// Shared access to the driver.
    pub fn driver(&self) -> &DutDriver<M> {
        &self.driver
    }

    /// Mutable access to the driver.
    pub fn driver_mut(&mut self) -> &mut DutDriver<M> {
        &mut self.driver
    }
}
