// Sayaç CRM - core/mod.rs
//
// Core business logic layer: data model, classification, questionnaire,
// filtering, export, and display formatting.
// Must NOT depend on: app or platform layers.

pub mod derive;
pub mod export;
pub mod filter;
pub mod format;
pub mod model;
pub mod questionnaire;
