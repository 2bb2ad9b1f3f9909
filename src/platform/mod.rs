// Sayaç CRM - platform/mod.rs
//
// Platform abstraction layer: directories, config.toml, file-backed storage.
// Dependencies: util layer, app::store (for the StorageBackend trait).

pub mod config;
pub mod storage;
