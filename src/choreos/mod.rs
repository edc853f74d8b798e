//! Built-in choreographies.
//!
//! Each submodule defines one [`Routine`](crate::choreography::Routine).
//! [`create`] looks a routine up by its registry name and wraps it in a
//! [`Choreography`] configured from [`ChoreoConfig`].
//!
//! - [`bird_flap`] – eight drones replay a recorded wing flap
//! - [`hack_patterns`] – forty-eight drones hold grids and spin them

pub mod bird_flap;
pub mod hack_patterns;

use log::info;

use crate::choreography::Choreography;
use crate::choreography::error::{ChoreographyError, Result};
use crate::resources::gameconfig::ChoreoConfig;

use bird_flap::BirdFlap;
use hack_patterns::HackPatterns;

/// Registry names accepted by [`create`].
pub const NAMES: [&str; 2] = ["bird_flap", "hack_patterns"];

/// Build the choreography registered as `name`.
pub fn create(name: &str, config: &ChoreoConfig) -> Result<Choreography> {
    let choreography = match name {
        "bird_flap" => Choreography::new(BirdFlap::load(&config.keyframes, config.dt())?),
        "hack_patterns" => Choreography::new(HackPatterns::new(config.hack_subgroups, config.dt())),
        other => return Err(ChoreographyError::UnknownChoreography(other.to_string())),
    };
    info!(
        "Created choreography '{}' for {} bots",
        choreography.name(),
        choreography.num_bots()
    );
    Ok(choreography)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_name_is_rejected() {
        let config = ChoreoConfig::new();
        assert_eq!(
            create("moonwalk", &config).err(),
            Some(ChoreographyError::UnknownChoreography("moonwalk".into()))
        );
    }

    #[test]
    fn test_hack_patterns_needs_no_assets() {
        let choreo = create("hack_patterns", &ChoreoConfig::new()).unwrap();
        assert_eq!(choreo.name(), "hack_patterns");
        assert_eq!(choreo.num_bots(), hack_patterns::HACK_BOTS);
    }

    #[test]
    fn test_bird_flap_reports_missing_keyframes() {
        let mut config = ChoreoConfig::new();
        config.keyframes = "/nonexistent/wing_flap.csv".into();
        assert!(matches!(
            create("bird_flap", &config),
            Err(ChoreographyError::Io(_))
        ));
    }

    #[test]
    fn test_every_registered_name_resolves() {
        let mut config = ChoreoConfig::new();
        config.keyframes = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/wing_flap.csv").into();
        for name in NAMES {
            assert_eq!(create(name, &config).unwrap().name(), name);
        }
    }
}
