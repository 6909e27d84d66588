//! Space Invaders combat core.
//!
//! The library owns the simulation only: entities, firing rules, collision
//! resolution and the per-frame tick.  Windowing, input polling, audio and
//! drawing belong to the host (see `src/main.rs` for the terminal host).

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod simulation;

pub use error::{Error, Result};
