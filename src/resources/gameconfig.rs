//! Choreography configuration resource.
//!
//! Manages session settings loaded from an INI configuration file. Provides
//! defaults for a safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! tick_rate = 60
//! max_seconds = 60
//! spawn_interval = 0.05
//! spawn_jitter = 0.02
//! seed = 7
//!
//! [choreography]
//! name = hack_patterns
//! keyframes = assets/wing_flap.csv
//! hack_subgroups = 1
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_TICK_RATE: u32 = 60;
const DEFAULT_MAX_SECONDS: f32 = 60.0;
const DEFAULT_SPAWN_INTERVAL: f32 = 0.05;
const DEFAULT_SPAWN_JITTER: f32 = 0.02;
const DEFAULT_SEED: u64 = 7;
const DEFAULT_CHOREOGRAPHY: &str = "hack_patterns";
const DEFAULT_KEYFRAMES: &str = "assets/wing_flap.csv";
const DEFAULT_HACK_SUBGROUPS: usize = 1;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Session configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ChoreoConfig {
    /// Fixed ticks per second. Also the finite-difference step of routines.
    pub tick_rate: u32,
    /// The headless runner stops after this many simulated seconds.
    pub max_seconds: f32,
    /// Seconds between consecutive agent spawns in the arena.
    pub spawn_interval: f32,
    /// Upper bound of the random extra delay added to each spawn.
    pub spawn_jitter: f32,
    /// Seed for the spawn jitter.
    pub seed: u64,
    /// Registry name of the choreography to run.
    pub choreography: String,
    /// Keyframe table used by routines that play back recordings.
    pub keyframes: PathBuf,
    /// Number of sub-groups the hack pattern splits its roster into.
    pub hack_subgroups: usize,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for ChoreoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ChoreoConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            max_seconds: DEFAULT_MAX_SECONDS,
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            spawn_jitter: DEFAULT_SPAWN_JITTER,
            seed: DEFAULT_SEED,
            choreography: DEFAULT_CHOREOGRAPHY.to_string(),
            keyframes: PathBuf::from(DEFAULT_KEYFRAMES),
            hack_subgroups: DEFAULT_HACK_SUBGROUPS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Length of one tick in seconds.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config);

        info!(
            "Loaded config: {} Hz, max {}s, spawn every {}s (+{}s jitter, seed {}), choreography '{}'",
            self.tick_rate,
            self.max_seconds,
            self.spawn_interval,
            self.spawn_jitter,
            self.seed,
            self.choreography
        );

        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        // [simulation] section
        if let Some(rate) = config.getuint("simulation", "tick_rate").ok().flatten() {
            self.tick_rate = (rate as u32).max(1);
        }
        if let Some(secs) = config.getfloat("simulation", "max_seconds").ok().flatten() {
            self.max_seconds = secs as f32;
        }
        if let Some(interval) = config.getfloat("simulation", "spawn_interval").ok().flatten() {
            self.spawn_interval = interval as f32;
        }
        if let Some(jitter) = config.getfloat("simulation", "spawn_jitter").ok().flatten() {
            self.spawn_jitter = jitter as f32;
        }
        if let Some(seed) = config.getuint("simulation", "seed").ok().flatten() {
            self.seed = seed;
        }

        // [choreography] section
        if let Some(name) = config.get("choreography", "name") {
            self.choreography = name;
        }
        if let Some(path) = config.get("choreography", "keyframes") {
            self.keyframes = PathBuf::from(path);
        }
        if let Some(groups) = config.getuint("choreography", "hack_subgroups").ok().flatten() {
            self.hack_subgroups = (groups as usize).max(1);
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [simulation] section
        config.set("simulation", "tick_rate", Some(self.tick_rate.to_string()));
        config.set("simulation", "max_seconds", Some(self.max_seconds.to_string()));
        config.set("simulation", "spawn_interval", Some(self.spawn_interval.to_string()));
        config.set("simulation", "spawn_jitter", Some(self.spawn_jitter.to_string()));
        config.set("simulation", "seed", Some(self.seed.to_string()));

        // [choreography] section
        config.set("choreography", "name", Some(self.choreography.clone()));
        config.set(
            "choreography",
            "keyframes",
            Some(self.keyframes.display().to_string()),
        );
        config.set(
            "choreography",
            "hack_subgroups",
            Some(self.hack_subgroups.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChoreoConfig::new();
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.choreography, "hack_patterns");
        assert!((config.dt() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_from_str_overrides_present_keys_only() {
        let mut config = ChoreoConfig::new();
        config
            .load_from_str(
                "[simulation]\ntick_rate = 120\nseed = 99\n\n[choreography]\nname = bird_flap\n",
            )
            .unwrap();
        assert_eq!(config.tick_rate, 120);
        assert_eq!(config.seed, 99);
        assert_eq!(config.choreography, "bird_flap");
        assert_eq!(config.keyframes, PathBuf::from(DEFAULT_KEYFRAMES));
        assert_eq!(config.hack_subgroups, 1);
    }

    #[test]
    fn test_zero_tick_rate_is_clamped() {
        let mut config = ChoreoConfig::new();
        config.load_from_str("[simulation]\ntick_rate = 0\n").unwrap();
        assert_eq!(config.tick_rate, 1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut config = ChoreoConfig::with_path("/nonexistent/swarmchoreo.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config, ChoreoConfig::with_path("/nonexistent/swarmchoreo.ini"));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let path = std::env::temp_dir().join(format!("swarmchoreo_cfg_{}.ini", std::process::id()));
        let mut saved = ChoreoConfig::with_path(&path);
        saved.choreography = "bird_flap".into();
        saved.hack_subgroups = 3;
        saved.save_to_file().unwrap();

        let mut loaded = ChoreoConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.choreography, "bird_flap");
        assert_eq!(loaded.hack_subgroups, 3);
    }
}
