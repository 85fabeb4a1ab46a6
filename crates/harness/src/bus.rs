//! Memory-bus agent for the model's external SRAM interface.
//!
//! The agent services the request/grant handshake at each rising clock edge,
//! against the backing [`MemoryDevice`]:
//! 1. **Sampling:** request, write-enable, byte strobe, address, and write
//!    data are sampled at the edge.
//! 2. **Grant decision:** unconditional by default; with a configured grant
//!    chance, each cycle runs one seeded trial, so backpressure can span any
//!    number of cycles for one request.
//! 3. **Data phase:** strobed byte-lane writes, or a four-byte little-endian
//!    read; an independent error-chance trial may flag the transaction
//!    instead, skipping the access.
//! 4. **Quiescence:** without a grant, the grant wire is driven low and the
//!    read-data/error wires hold their previous values.
//!
//! The agent itself never fails: protocol violations on the model side are
//! the model's to report, and the only error that can surface here is an
//! out-of-range access against the backing memory, which is a harness
//! configuration fault.

use tracing::debug;

use crate::common::{Chance, HarnessError, XorShift64};
use crate::config::BusConfig;
use crate::mem::MemoryDevice;
use crate::model::DutModel;

/// Bus agent servicing a single-outstanding request/grant SRAM interface.
#[derive(Debug)]
pub struct SramAgent {
    grant_chance: Chance,
    error_chance: Chance,
    rng: XorShift64,
    in_reset: bool,
    // Driven output state; quiescent values persist between grants.
    gnt: bool,
    err: bool,
    rdata: u32,
}

impl SramAgent {
    /// Creates an agent with the given randomization settings.
    pub fn new(config: &BusConfig) -> Self {
        Self {
            grant_chance: config.grant_chance,
            error_chance: config.error_chance,
            rng: XorShift64::new(config.seed),
            in_reset: false,
            gnt: false,
            err: false,
            rdata: 0,
        }
    }

    /// Puts the agent in reset: grant is driven low unconditionally and no
    /// memory accesses are performed. Idempotent.
    pub fn set_reset(&mut self) {
        self.in_reset = true;
        self.gnt = false;
    }

    /// Releases the agent from reset. Idempotent.
    pub fn clear_reset(&mut self) {
        self.in_reset = false;
    }

    /// Samples the model's memory interface at a rising clock edge and
    /// services at most one transaction against `mem`.
    ///
    /// The computed grant/error/read-data values are not applied to the
    /// model here; [`drive`](Self::drive) propagates them every tick so the
    /// model can settle combinational logic against them.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::AddressOutOfRange`] when a granted access
    /// falls outside the backing region.
    pub fn on_posedge<M: DutModel>(
        &mut self,
        model: &M,
        mem: &mut MemoryDevice,
    ) -> Result<(), HarnessError> {
        if self.in_reset || !model.mem_req() {
            self.gnt = false;
            return Ok(());
        }
        if !self.grant_chance.roll(&mut self.rng) {
            self.gnt = false;
            return Ok(());
        }
        self.gnt = true;
        self.err = self.error_chance.roll(&mut self.rng);

        let addr = model.mem_addr();
        let strb = model.mem_strb();

        if self.err {
            // Faulted transaction: no access, read data is don't-care.
            debug!("bus error injected at {addr:#010x}");
            return Ok(());
        }

        if model.mem_wen() {
            let data = model.mem_wdata().to_le_bytes();
            for (lane, byte) in data.iter().enumerate() {
                if strb & (1 << lane) != 0 {
                    mem.write_byte(addr.wrapping_add(lane as u32), *byte)?;
                }
            }
            debug!(
                "granted write addr={addr:#010x} strb={strb:04b} wdata={:#010x}",
                model.mem_wdata()
            );
        } else {
            // Reads return all four lanes; the strobe masks interpretation
            // on the model side, not storage.
            let mut bytes = [0u8; 4];
            for (lane, byte) in bytes.iter_mut().enumerate() {
                *byte = mem.read_byte(addr.wrapping_add(lane as u32))?;
            }
            self.rdata = u32::from_le_bytes(bytes);
            debug!("granted read addr={addr:#010x} rdata={:#010x}", self.rdata);
        }
        Ok(())
    }

    /// Applies the agent's current output state to the model's input wires.
    pub fn drive<M: DutModel>(&self, model: &mut M) {
        model.set_mem_gnt(self.gnt);
        model.set_mem_error(self.err);
        model.set_mem_rdata(self.rdata);
    }

    /// Whether the agent granted a transaction at the last sampled edge.
    pub fn granted(&self) -> bool {
        self.gnt
    }
}
