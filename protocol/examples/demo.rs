//! Walkthrough of the value-transfer lifecycle.
//!
//! Builds a transfer, derives its content-addressed identity, persists it
//! to a temporary object store, evicts the in-memory copy, and rehydrates
//! it from disk — the same path a transfer takes through a running node.
//!
//! Run with:
//!   cargo run --example demo

use aurum_protocol::storage::ObjectStore;
use aurum_protocol::transfer::{
    Address, Color, ColoredBalance, Inputs, Output, OutputReference, Outputs, Transfer,
    TransferId,
};

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

fn step(n: usize, title: &str) {
    println!("\n{BOLD}{CYAN}[{n}]{RESET} {BOLD}{title}{RESET}");
}

fn main() {
    println!("{BOLD}aurum value-transfer demo{RESET}");

    step(1, "Build a transfer");
    // Consume output 0 of a (made-up) prior transfer and deposit 100 native
    // tokens plus 5 colored tokens across two addresses.
    let funding = TransferId::from([0x11u8; 32]);
    let inputs = Inputs::new([OutputReference::new(funding, 0)]).expect("single reference");
    let outputs = Outputs::new([
        Output::new(
            Address::from([0xAAu8; 32]),
            [ColoredBalance::new(Color::NATIVE, 100)],
        )
        .expect("valid output"),
        Output::new(
            Address::from([0xBBu8; 32]),
            [ColoredBalance::new(Color::from([0x07u8; 32]), 5)],
        )
        .expect("valid output"),
    ])
    .expect("distinct addresses");
    let transfer = Transfer::new(inputs, outputs);
    println!("    {transfer}");

    step(2, "Derive identity and canonical bytes");
    let id = transfer.id();
    let bytes = transfer.bytes();
    println!("    id     {GREEN}{id}{RESET}");
    println!("    bytes  {} bytes {DIM}(BLAKE2b-256 preimage){RESET}", bytes.len());

    step(3, "Persist to the object store");
    let store = ObjectStore::<Transfer>::temporary().expect("temporary store");
    store.store(&transfer).expect("store transfer");
    println!("    stored under key {GREEN}{id}{RESET}");

    step(4, "Rehydrate from persisted bytes");
    let loaded = store
        .load(id.as_bytes())
        .expect("load transfer")
        .expect("transfer is present");
    println!("    {loaded}");

    assert_eq!(loaded.id(), id);
    assert_eq!(loaded.bytes(), bytes);
    println!("\n{GREEN}{BOLD}identity and bytes match — roundtrip complete{RESET}");
}
