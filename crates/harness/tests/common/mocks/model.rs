//! Signal-level model mocks.
//!
//! `MockDut` behaves like a tiny synchronous core at the wire level without
//! any instruction semantics: it plays back a script of bus transactions and
//! retirement events, observing the real handshake rules (request held until
//! granted, dropped combinationally once grant is seen, state advanced on
//! rising clock edges). `WireHarness` is the opposite extreme — a plain
//! bundle of wires a test pokes directly when it wants full control of a
//! single edge.

use std::collections::VecDeque;

use coretb_core::DutModel;

/// One scripted step for [`MockDut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    /// Issue a read transaction and capture the returned data.
    Read {
        /// Transaction byte address.
        addr: u32,
        /// Byte strobe presented with the request.
        strb: u8,
    },
    /// Issue a write transaction.
    Write {
        /// Transaction byte address.
        addr: u32,
        /// Little-endian write data.
        data: u32,
        /// Byte strobe selecting the lanes to commit.
        strb: u8,
    },
    /// Retire one instruction for a single cycle.
    Retire {
        /// Program counter to report.
        pc: u32,
        /// Instruction word to report.
        instr: u32,
    },
    /// Sit idle for the given number of cycles.
    Idle {
        /// Idle cycle count.
        cycles: u32,
    },
}

/// Scripted signal-level model.
///
/// State advances only at rising clock edges detected inside `eval`, the way
/// a generated synchronous model behaves; the request wire is combinational
/// (`pending && !gnt`), so a granted transaction deasserts its request
/// within the same cycle once the agent's drive settles.
#[derive(Debug, Default)]
pub struct MockDut {
    script: VecDeque<BusOp>,

    clk: bool,
    prev_clk: bool,
    resetn: bool,

    gnt_in: bool,
    rdata_in: u32,
    err_in: bool,

    pending: bool,
    req: bool,
    wen: bool,
    strb: u8,
    addr: u32,
    wdata: u32,

    trs_valid: bool,
    trs_pc: u32,
    trs_instr: u32,

    idle_left: u32,

    /// Read data captured at each completed read transaction.
    pub reads: Vec<u32>,
    /// Completed transactions that carried an injected bus error.
    pub errors_seen: u32,
    /// Total `eval` calls, for checking the sub-cycle discipline.
    pub eval_count: u64,
    /// Evaluations during which grant was observed high.
    pub gnt_observed: u64,
}

impl MockDut {
    /// Creates a mock that plays `script` from the first post-reset edge.
    pub fn new(script: Vec<BusOp>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Whether the script has fully played out.
    pub fn done(&self) -> bool {
        !self.pending && self.idle_left == 0 && self.script.is_empty()
    }
}

impl DutModel for MockDut {
    fn set_clk(&mut self, level: bool) {
        self.clk = level;
    }
    fn clk(&self) -> bool {
        self.clk
    }
    fn set_resetn(&mut self, level: bool) {
        self.resetn = level;
    }
    fn resetn(&self) -> bool {
        self.resetn
    }

    fn mem_req(&self) -> bool {
        self.req
    }
    fn mem_wen(&self) -> bool {
        self.wen
    }
    fn mem_strb(&self) -> u8 {
        self.strb
    }
    fn mem_addr(&self) -> u32 {
        self.addr
    }
    fn mem_wdata(&self) -> u32 {
        self.wdata
    }

    fn set_mem_gnt(&mut self, level: bool) {
        self.gnt_in = level;
    }
    fn mem_gnt(&self) -> bool {
        self.gnt_in
    }
    fn set_mem_rdata(&mut self, data: u32) {
        self.rdata_in = data;
    }
    fn mem_rdata(&self) -> u32 {
        self.rdata_in
    }
    fn set_mem_error(&mut self, level: bool) {
        self.err_in = level;
    }
    fn mem_error(&self) -> bool {
        self.err_in
    }

    fn retire_valid(&self) -> bool {
        self.trs_valid
    }
    fn retire_pc(&self) -> u32 {
        self.trs_pc
    }
    fn retire_instr(&self) -> u32 {
        self.trs_instr
    }

    fn eval(&mut self) {
        self.eval_count += 1;
        if self.gnt_in {
            self.gnt_observed += 1;
        }

        let rising = self.clk && !self.prev_clk;
        self.prev_clk = self.clk;

        if !self.resetn {
            self.req = false;
            self.trs_valid = false;
            return;
        }

        if rising {
            self.trs_valid = false;

            if self.pending && self.gnt_in {
                if !self.wen {
                    self.reads.push(self.rdata_in);
                }
                if self.err_in {
                    self.errors_seen += 1;
                }
                self.pending = false;
            }

            if !self.pending {
                if self.idle_left > 0 {
                    self.idle_left -= 1;
                } else {
                    match self.script.pop_front() {
                        Some(BusOp::Read { addr, strb }) => {
                            self.pending = true;
                            self.wen = false;
                            self.addr = addr;
                            self.strb = strb;
                        }
                        Some(BusOp::Write { addr, data, strb }) => {
                            self.pending = true;
                            self.wen = true;
                            self.addr = addr;
                            self.wdata = data;
                            self.strb = strb;
                        }
                        Some(BusOp::Retire { pc, instr }) => {
                            self.trs_valid = true;
                            self.trs_pc = pc;
                            self.trs_instr = instr;
                        }
                        Some(BusOp::Idle { cycles }) => {
                            self.idle_left = cycles;
                        }
                        None => {}
                    }
                }
            }
        }

        // Combinational handshake: drop the request once grant is seen.
        self.req = self.pending && !self.gnt_in;
    }
}

/// A plain bundle of interface wires with a no-op `eval`.
///
/// Tests drive the output-side fields directly and inspect what the agent
/// drove back; nothing changes unless the test changes it.
#[derive(Debug, Default)]
pub struct WireHarness {
    /// Clock wire.
    pub clk: bool,
    /// Active-low reset wire.
    pub resetn: bool,
    /// Memory request wire.
    pub req: bool,
    /// Write-enable wire.
    pub wen: bool,
    /// Byte-strobe wires.
    pub strb: u8,
    /// Address wires.
    pub addr: u32,
    /// Write-data wires.
    pub wdata: u32,
    /// Grant wire, driven by the agent.
    pub gnt: bool,
    /// Read-data wires, driven by the agent.
    pub rdata: u32,
    /// Error wire, driven by the agent.
    pub error: bool,
    /// Retirement valid wire.
    pub retire_valid: bool,
    /// Retirement program counter.
    pub retire_pc: u32,
    /// Retirement instruction word.
    pub retire_instr: u32,
    /// Total `eval` calls.
    pub eval_count: u64,
}

impl DutModel for WireHarness {
    fn set_clk(&mut self, level: bool) {
        self.clk = level;
    }
    fn clk(&self) -> bool {
        self.clk
    }
    fn set_resetn(&mut self, level: bool) {
        self.resetn = level;
    }
    fn resetn(&self) -> bool {
        self.resetn
    }

    fn mem_req(&self) -> bool {
        self.req
    }
    fn mem_wen(&self) -> bool {
        self.wen
    }
    fn mem_strb(&self) -> u8 {
        self.strb
    }
    fn mem_addr(&self) -> u32 {
        self.addr
    }
    fn mem_wdata(&self) -> u32 {
        self.wdata
    }

    fn set_mem_gnt(&mut self, level: bool) {
        self.gnt = level;
    }
    fn mem_gnt(&self) -> bool {
        self.gnt
    }
    fn set_mem_rdata(&mut self, data: u32) {
        self.rdata = data;
    }
    fn mem_rdata(&self) -> u32 {
        self.rdata
    }
    fn set_mem_error(&mut self, level: bool) {
        self.error = level;
    }
    fn mem_error(&self) -> bool {
        self.error
    }

    fn retire_valid(&self) -> bool {
        self.retire_valid
    }
    fn retire_pc(&self) -> u32 {
        self.retire_pc
    }
    fn retire_instr(&self) -> u32 {
        self.retire_instr
    }

    fn eval(&mut self) {
        self.eval_count += 1;
    }
}
