//! Service layer containing the selection/rendering pipeline.
//!
//! ## Service map
//! - `selection.rs` — service scope resolution + parameter-mode selection.
//! - `render.rs` — Terraform template rendering (two variants).
//! - `compliance.rs` — compliance rows, markdown/CSV summaries.
//! - `config.rs` — exclusion config defaults + TOML file loading.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized (summary file writes
//!   live in `compliance.rs` and nowhere else).
//! - Keep command handlers thin; delegate to services.

pub mod compliance;
pub mod config;
pub mod output;
pub mod render;
pub mod selection;
