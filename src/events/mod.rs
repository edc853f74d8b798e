//! Messages exchanged across systems.
//!
//! Submodules:
//! - [`stateintent`] – world-state writes requested by choreography steps
pub mod stateintent;
