//! VCD Tracer Tests.
//!
//! Verifies the header layout, the initial full dump, and change-only
//! emission afterwards, using an in-memory byte sink.

use coretb_core::wave::VcdTracer;

use crate::common::mocks::model::WireHarness;

// ══════════════════════════════════════════════════════════
// 1. Header
// ══════════════════════════════════════════════════════════

#[test]
fn header_declares_every_interface_wire() {
    let mut out = Vec::new();
    let tracer = VcdTracer::new(&mut out).unwrap();
    tracer.finish().unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("$timescale 1ns $end"));
    assert!(text.contains("$scope module testbench $end"));
    for name in [
        "clk",
        "resetn",
        "mem_req",
        "mem_gnt",
        "mem_wen",
        "mem_error",
        "mem_strb",
        "mem_addr",
        "mem_wdata",
        "mem_rdata",
        "retire_valid",
        "retire_pc",
        "retire_instr",
    ] {
        assert!(text.contains(&format!(" {name} $end")), "missing wire {name}");
    }
    assert!(text.contains("$enddefinitions $end"));
}

// ══════════════════════════════════════════════════════════
// 2. Initial dump and change-only emission
// ══════════════════════════════════════════════════════════

#[test]
fn first_sample_dumps_every_wire() {
    let mut out = Vec::new();
    let mut tracer = VcdTracer::new(&mut out).unwrap();
    let wires = WireHarness {
        addr: 0x8000_0000,
        ..WireHarness::default()
    };

    tracer.sample(1, &wires).unwrap();
    tracer.finish().unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("#1\n$dumpvars"));
    // clk is id '!', addr is id '('.
    assert!(text.contains("0!"));
    assert!(text.contains("b10000000000000000000000000000000 ("));
}

#[test]
fn later_samples_emit_only_changes() {
    let mut out = Vec::new();
    let mut tracer = VcdTracer::new(&mut out).unwrap();
    let mut wires = WireHarness::default();

    tracer.sample(1, &wires).unwrap();
    // Unchanged state: nothing new may be emitted for tick 2.
    tracer.sample(2, &wires).unwrap();

    wires.clk = true;
    tracer.sample(3, &wires).unwrap();
    tracer.finish().unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("#2"), "unchanged sample must emit nothing");
    let tail = text.split("#3").nth(1).unwrap_or("");
    assert_eq!(tail.trim(), "1!", "only the clock change is emitted at #3");
}
