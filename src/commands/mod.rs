//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `generate.rs` — the generate-terraform pipeline.
//! - `inventory.rs` — list-services/list-policies/describe-policy.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*` and the catalog.
//! - Keep behavior and output schema stable.

pub mod generate;
pub mod inventory;

pub use generate::handle_generate;
pub use inventory::handle_inventory;
