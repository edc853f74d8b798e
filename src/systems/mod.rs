//! Engine systems.
//!
//! Submodules overview
//! - [`arena`] – agent spawning, state-intent application and message upkeep
//! - [`choreography`] – tick the active choreography and publish its progress
//! - [`snapshot`] – capture the tick snapshot and refresh game info
//! - [`time`] – update simulation time and delta

pub mod arena;
pub mod choreography;
pub mod snapshot;
pub mod time;
