//! Command-line front end.
//!
//! A model-owning crate provides `main` and hands its generated model to
//! [`run_main`]; everything else — option parsing, JSON config loading with
//! per-flag overrides, console summary, exit-code mapping — lives here.
//! Address-valued options accept `0x` hex or decimal, matching the original
//! plusarg convention.

use std::fs;
use std::str::FromStr;

use clap::Parser;

use crate::common::{Chance, HarnessError};
use crate::config::Config;
use crate::model::DutModel;
use crate::sim::runner::TestRunner;

/// Parses a 32-bit address with automatic radix (`0x` prefix for hex).
fn parse_auto_u32(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("bad address '{s}': {e}"))
}

/// Parses an `X/Y` chance ratio.
fn parse_chance(s: &str) -> Result<Chance, String> {
    Chance::from_str(s)
}

/// Command-line options for a verification run.
#[derive(Parser, Debug)]
#[command(
    name = "coretb",
    version,
    about = "Cycle-accurate CPU core verification harness",
    long_about = "Drives a simulated CPU core through reset and clocked execution, services \
its memory bus, and reports a pass/fail/timeout verdict.\n\nExit codes: 0 pass, 1 timeout, \
2 fail, 3 signature mismatch."
)]
pub struct HarnessArgs {
    /// JSON configuration file; the flags below override its fields.
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// SREC program image loaded into memory before reset release.
    #[arg(long, value_name = "FILE")]
    pub image: Option<String>,

    /// VCD waveform output path; enables tracing.
    #[arg(long, value_name = "FILE")]
    pub waves: Option<String>,

    /// Timeout in clock cycles.
    #[arg(long, value_name = "CYCLES")]
    pub timeout: Option<u64>,

    /// Pass-marker program counter (hex or decimal).
    #[arg(long, value_parser = parse_auto_u32, value_name = "ADDR")]
    pub pass_addr: Option<u32>,

    /// Fail-marker program counter (hex or decimal).
    #[arg(long, value_parser = parse_auto_u32, value_name = "ADDR")]
    pub fail_addr: Option<u32>,

    /// Signature region start, inclusive and word aligned.
    #[arg(long, value_parser = parse_auto_u32, value_name = "ADDR")]
    pub sig_start: Option<u32>,

    /// Signature region end, exclusive and word aligned.
    #[arg(long, value_parser = parse_auto_u32, value_name = "ADDR")]
    pub sig_end: Option<u32>,

    /// Signature dump path; enables dumping.
    #[arg(long, value_name = "FILE")]
    pub sig_dump: Option<String>,

    /// Signature reference path; enables verification.
    #[arg(long, value_name = "FILE")]
    pub sig_verify: Option<String>,

    /// Register-state base address recorded for compliance tooling.
    #[arg(long, value_parser = parse_auto_u32, value_name = "ADDR")]
    pub reg_addr: Option<u32>,

    /// Per-cycle grant chance as X/Y; 1/1 grants every request.
    #[arg(long, value_parser = parse_chance, value_name = "X/Y")]
    pub grant_chance: Option<Chance>,

    /// Per-transaction error-injection chance as X/Y.
    #[arg(long, value_parser = parse_chance, value_name = "X/Y")]
    pub error_chance: Option<Chance>,

    /// Bus randomization seed.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Suppress informational output.
    #[arg(short, long)]
    pub quiet: bool,
}

impl HarnessArgs {
    /// Assembles the run configuration: JSON config file first (when given),
    /// then per-flag overrides, then validation.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file cannot be read or parsed, or
    /// the resulting configuration is invalid.
    pub fn into_config(self) -> Result<Config, HarnessError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)?;
                serde_json::from_str(&text).map_err(|e| {
                    HarnessError::config(format!("config file '{path}': {e}"))
                })?
            }
            None => Config::default(),
        };

        if let Some(v) = self.image {
            config.memory.image = Some(v);
        }
        if let Some(v) = self.waves {
            config.output.wave_path = Some(v);
        }
        if let Some(v) = self.timeout {
            config.test.timeout_cycles = v;
        }
        if let Some(v) = self.pass_addr {
            config.test.pass_address = v;
        }
        if let Some(v) = self.fail_addr {
            config.test.fail_address = v;
        }
        if let Some(v) = self.sig_start {
            config.output.sig_start = v;
        }
        if let Some(v) = self.sig_end {
            config.output.sig_end = v;
        }
        if let Some(v) = self.sig_dump {
            config.output.sig_dump = Some(v);
        }
        if let Some(v) = self.sig_verify {
            config.output.sig_verify = Some(v);
        }
        if let Some(v) = self.reg_addr {
            config.memory.reg_addr = v;
        }
        if let Some(v) = self.grant_chance {
            config.bus.grant_chance = v;
        }
        if let Some(v) = self.error_chance {
            config.bus.error_chance = v;
        }
        if let Some(v) = self.seed {
            config.bus.seed = v;
        }
        config.output.quiet |= self.quiet;

        config.validate()?;
        Ok(config)
    }
}

/// Runs a fully assembled configuration against `model`, printing the
/// summary and returning the process exit code.
pub fn run_with_config<M: DutModel>(model: M, config: Config) -> i32 {
    let quiet = config.output.quiet;
    if !quiet {
        println!("[*] Pass address: {:#010x}", config.test.pass_address);
        println!("[*] Fail address: {:#010x}", config.test.fail_address);
        println!(
            "[*] Timeout:      {} cycles ({} ticks)",
            config.test.timeout_cycles,
            config.timeout_ticks()
        );
        if let Some(path) = &config.output.wave_path {
            println!("[*] Dumping waves to {path}");
        }
        if config.output.sig_verify.is_some() || config.output.sig_dump.is_some() {
            println!(
                "[*] Signature:    [{:#010x}, {:#010x})",
                config.output.sig_start, config.output.sig_end
            );
        }
    }

    let mut runner = match TestRunner::new(model, config) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("[!] FATAL: {e}");
            return 1;
        }
    };
    match runner.run() {
        Ok(verdict) => {
            println!("{}", verdict.summary());
            verdict.exit_code()
        }
        Err(e) => {
            eprintln!("[!] FATAL: {e}");
            1
        }
    }
}

/// Runs parsed arguments against `model`, returning the process exit code.
pub fn run_with_args<M: DutModel>(model: M, args: HarnessArgs) -> i32 {
    match args.into_config() {
        Ok(config) => run_with_config(model, config),
        Err(e) => {
            eprintln!("[!] FATAL: {e}");
            1
        }
    }
}

/// Full process entry point: parses `std::env::args`, initializes logging,
/// and runs `model`. Call from the model crate's `main` and pass the result
/// to `std::process::exit`.
pub fn run_main<M: DutModel>(model: M) -> i32 {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    run_with_args(model, HarnessArgs::parse())
}
