//! Configuration for a verification run.
//!
//! This module defines all configuration structures used to parameterize a
//! run. It provides:
//! 1. **Defaults:** Baseline constants (memory map, timeout, reset length,
//!    sub-cycle resolution) matching the stock testbench setup.
//! 2. **Structures:** Hierarchical config for the test loop, backing memory,
//!    bus randomization, and output artifacts.
//! 3. **Validation:** A single `validate()` pass that rejects unusable
//!    combinations before any simulation state is built.
//!
//! Configuration is supplied as JSON (CLI `--config`, overridable per flag)
//! or built with `Config::default()` and adjusted field by field.

use serde::Deserialize;

use crate::common::{Chance, HarnessError};

/// Default configuration constants for the harness.
mod defaults {
    /// Base address of the backing memory region.
    pub const MEM_BASE: u32 = 0x8000_0000;

    /// Size of the backing memory region in bytes (16 KiB).
    pub const MEM_SIZE: u32 = 8192 * 2;

    /// Pass-marker program counter; a retiring instruction at this address
    /// ends the run as a pass.
    pub const PASS_ADDRESS: u32 = 0;

    /// Fail-marker program counter.
    pub const FAIL_ADDRESS: u32 = 0xFFFF_FFFF;

    /// Run length limit in clock cycles before the timeout verdict.
    pub const TIMEOUT_CYCLES: u64 = 1000;

    /// Clock cycles to hold the model in reset before the run proper;
    /// enough for the reset network to settle.
    pub const RESET_CYCLES: u32 = 5;

    /// Model evaluations per clock period. One tick per evaluation; the
    /// clock rises at the midpoint tick.
    pub const EVALS_PER_CLOCK: u32 = 10;

    /// Default bus randomization seed.
    pub const SEED: u64 = 123_456_789;
}

/// Root configuration for one verification run.
///
/// # Examples
///
/// Deserializing from JSON (any omitted field keeps its default):
///
/// ```
/// use coretb_core::Config;
///
/// let json = r#"{
///     "test": { "pass_address": 2147483664, "timeout_cycles": 500 },
///     "bus":  { "grant_chance": { "num": 1, "den": 2 }, "seed": 7 }
/// }"#;
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.test.timeout_cycles, 500);
/// assert_eq!(config.memory.size, 16384);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Test-loop settings (markers, timeout, reset, clocking).
    #[serde(default)]
    pub test: TestConfig,
    /// Backing memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Bus randomization settings.
    #[serde(default)]
    pub bus: BusConfig,
    /// Artifact and console-output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Rejects configurations that cannot produce a meaningful run.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when the sub-cycle resolution is too
    /// coarse, a chance ratio has a zero denominator, or the signature range
    /// is unaligned or inverted.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.test.evals_per_clock < 2 {
            return Err(HarnessError::config(format!(
                "evals_per_clock must be at least 2 (one per half-period), got {}",
                self.test.evals_per_clock
            )));
        }
        if self.bus.grant_chance.den == 0 || self.bus.error_chance.den == 0 {
            return Err(HarnessError::config("chance denominator must be nonzero"));
        }
        let (start, end) = (self.output.sig_start, self.output.sig_end);
        if start % 4 != 0 || end % 4 != 0 {
            return Err(HarnessError::config(format!(
                "signature range [{start:#010x}, {end:#010x}) is not word aligned"
            )));
        }
        if start > end {
            return Err(HarnessError::config(format!(
                "signature range [{start:#010x}, {end:#010x}) is inverted"
            )));
        }
        Ok(())
    }

    /// Timeout expressed in simulation ticks rather than clock cycles.
    pub fn timeout_ticks(&self) -> u64 {
        self.test
            .timeout_cycles
            .saturating_mul(u64::from(self.test.evals_per_clock))
    }
}

/// Test-loop settings: markers, timeout, reset sequencing, clocking.
#[derive(Debug, Clone, Deserialize)]
pub struct TestConfig {
    /// Program counter that marks the test as passed.
    #[serde(default = "TestConfig::default_pass_address")]
    pub pass_address: u32,

    /// Program counter that marks the test as failed.
    #[serde(default = "TestConfig::default_fail_address")]
    pub fail_address: u32,

    /// Run length limit in clock cycles.
    #[serde(default = "TestConfig::default_timeout_cycles")]
    pub timeout_cycles: u64,

    /// Clock cycles spent in reset before the run proper.
    #[serde(default = "TestConfig::default_reset_cycles")]
    pub reset_cycles: u32,

    /// Model evaluations per clock period; minimum 2.
    #[serde(default = "TestConfig::default_evals_per_clock")]
    pub evals_per_clock: u32,
}

impl TestConfig {
    /// Returns the default pass-marker address.
    fn default_pass_address() -> u32 {
        defaults::PASS_ADDRESS
    }

    /// Returns the default fail-marker address.
    fn default_fail_address() -> u32 {
        defaults::FAIL_ADDRESS
    }

    /// Returns the default timeout in cycles.
    fn default_timeout_cycles() -> u64 {
        defaults::TIMEOUT_CYCLES
    }

    /// Returns the default reset hold length in cycles.
    fn default_reset_cycles() -> u32 {
        defaults::RESET_CYCLES
    }

    /// Returns the default sub-cycle resolution.
    fn default_evals_per_clock() -> u32 {
        defaults::EVALS_PER_CLOCK
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            pass_address: defaults::PASS_ADDRESS,
            fail_address: defaults::FAIL_ADDRESS,
            timeout_cycles: defaults::TIMEOUT_CYCLES,
            reset_cycles: defaults::RESET_CYCLES,
            evals_per_clock: defaults::EVALS_PER_CLOCK,
        }
    }
}

/// Backing memory settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Base address of the backing region.
    #[serde(default = "MemoryConfig::default_base")]
    pub base: u32,

    /// Size of the backing region in bytes.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: u32,

    /// Program image (SREC) loaded before reset release; none loads nothing.
    #[serde(default)]
    pub image: Option<String>,

    /// Base address of the register-state region reported by some compliance
    /// suites. Recorded for tooling; the harness itself does not consume it.
    #[serde(default)]
    pub reg_addr: u32,
}

impl MemoryConfig {
    /// Returns the default region base address.
    fn default_base() -> u32 {
        defaults::MEM_BASE
    }

    /// Returns the default region size.
    fn default_size() -> u32 {
        defaults::MEM_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: defaults::MEM_BASE,
            size: defaults::MEM_SIZE,
            image: None,
            reg_addr: 0,
        }
    }
}

/// Bus randomization settings.
///
/// Both chances are independent per-cycle trials; certain ratios bypass the
/// generator entirely, so functional (always-grant, never-error) runs do not
/// depend on the seed.
#[derive(Debug, Clone, Deserialize)]
pub struct BusConfig {
    /// Chance that a pending request is granted in a given cycle.
    #[serde(default = "BusConfig::default_grant_chance")]
    pub grant_chance: Chance,

    /// Chance that a granted transaction is flagged with a bus error.
    #[serde(default = "BusConfig::default_error_chance")]
    pub error_chance: Chance,

    /// Seed for the stimulus generator; a fixed seed replays bit-identically.
    #[serde(default = "BusConfig::default_seed")]
    pub seed: u64,
}

impl BusConfig {
    /// Returns the default grant chance (always grant).
    fn default_grant_chance() -> Chance {
        Chance::always()
    }

    /// Returns the default error chance (never inject).
    fn default_error_chance() -> Chance {
        Chance::never()
    }

    /// Returns the default stimulus seed.
    fn default_seed() -> u64 {
        defaults::SEED
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            grant_chance: Chance::always(),
            error_chance: Chance::never(),
            seed: defaults::SEED,
        }
    }
}

/// Artifact and console-output settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Waveform output path; tracing is enabled when set.
    #[serde(default)]
    pub wave_path: Option<String>,

    /// Signature region start (inclusive, word aligned).
    #[serde(default)]
    pub sig_start: u32,

    /// Signature region end (exclusive, word aligned).
    #[serde(default)]
    pub sig_end: u32,

    /// Signature dump path; dumping is enabled when set.
    #[serde(default)]
    pub sig_dump: Option<String>,

    /// Signature reference path; verification is enabled when set.
    #[serde(default)]
    pub sig_verify: Option<String>,

    /// Suppresses informational console output.
    #[serde(default)]
    pub quiet: bool,
}
