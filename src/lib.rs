//! Library crate root re-exporting launcher and chronicle modules.

#[path = "lib/mod.rs"]
pub mod lib_mod;
pub use lib_mod as lib;
pub mod chronicle;
pub mod cli;
pub mod config;
pub mod launcher;
