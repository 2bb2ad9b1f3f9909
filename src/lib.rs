// Sayaç CRM - lib.rs
//
// Library entry point, exposing the intake, classification, storage, filter,
// and export layers for integration testing and for any front end.
//
// The command-line front end lives in `main.rs` / `cli.rs` and is not part of
// the library surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
