//! ECS resources made available to systems.
//!
//! Overview
//! - `arena` – headless stand-in for the simulated world
//! - `choreography` – the choreography driven by the schedule
//! - `gameconfig` – session settings loaded from `config.ini`
//! - `gameinfo` – running per-tick game info derived from snapshots
//! - `snapshot` – read-only world state for the current tick
//! - `worldsignals` – flags and values shared across systems
//! - `worldtime` – simulation time and delta
pub mod arena;
pub mod choreography;
pub mod gameconfig;
pub mod gameinfo;
pub mod snapshot;
pub mod worldsignals;
pub mod worldtime;
