// Sayaç CRM - app/mod.rs
//
// Application layer: record store, intake wizard, notes scratchpad.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod intake;
pub mod notes;
pub mod store;
