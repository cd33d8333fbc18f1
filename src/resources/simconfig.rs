//! Simulation configuration resource.
//!
//! Tunables for movement, combat, economy and spawning, loaded from an INI
//! file. Every key has a safe default so a missing or partial file still
//! yields a playable battle.
//!
//! # Configuration File Format
//!
//! ```ini
//! [movement]
//! spacing = 2.5
//! stop_distance = 15
//! speed_scale = 60
//!
//! [combat]
//! delay = 2.0
//! envelope_x = 20
//! envelope_y = 4
//! envelope_z = 4
//!
//! [economy]
//! money = 50
//! player_base_hp = 100000
//! enemy_base_hp = 100000
//!
//! [spawn]
//! cap = 2
//! retry_min = 1
//! retry_max = 3
//! next_min = 5
//! next_max = 10
//! speed_jitter = 0.2
//! kind = basic
//! player_offset = -6,0,0
//! enemy_offset = -6,0,0
//!
//! [bases]
//! player = -10.71,5,63.65
//! enemy = 81.35,5,-23.63
//!
//! [time]
//! max_delta = 0
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use glam::Vec3;
use log::info;
use std::path::PathBuf;

use crate::components::faction::Faction;
use crate::error::SimError;

/// Default safe values for startup
const DEFAULT_SPACING: f32 = 2.5;
const DEFAULT_STOP_DISTANCE: f32 = 15.0;
const DEFAULT_SPEED_SCALE: f32 = 60.0;
const DEFAULT_COMBAT_DELAY: f32 = 2.0;
const DEFAULT_ENVELOPE: Vec3 = Vec3::new(20.0, 4.0, 4.0);
const DEFAULT_MONEY: u32 = 50;
const DEFAULT_BASE_HP: i32 = 100_000;
const DEFAULT_SPAWN_CAP: usize = 2;
const DEFAULT_RETRY_MIN: f32 = 1.0;
const DEFAULT_RETRY_MAX: f32 = 3.0;
const DEFAULT_NEXT_MIN: f32 = 5.0;
const DEFAULT_NEXT_MAX: f32 = 10.0;
const DEFAULT_SPEED_JITTER: f32 = 0.2;
const DEFAULT_ENEMY_KIND: &str = "basic";
const DEFAULT_SPAWN_OFFSET: Vec3 = Vec3::new(-6.0, 0.0, 0.0);
const DEFAULT_PLAYER_BASE: Vec3 = Vec3::new(-10.71, 5.0, 63.65);
const DEFAULT_ENEMY_BASE: Vec3 = Vec3::new(81.35, 5.0, -23.63);
const DEFAULT_CONFIG_PATH: &str = "./lanesiege.ini";

#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    /// Minimum gap to the unit ahead before a queued unit may advance.
    pub spacing: f32,
    /// Distance to the target base at which units stop and attack it.
    pub stop_distance: f32,
    /// Step multiplier: a unit moves `speed * delta * speed_scale` per tick.
    pub speed_scale: f32,
    /// Seconds between damage exchanges of an engaged pair.
    pub combat_delay: f32,
    /// Size of the fighting envelope used for engagement detection.
    pub envelope: Vec3,
    pub starting_money: u32,
    pub player_base_hp: i32,
    pub enemy_base_hp: i32,
    /// Maximum live enemies at the moment the scheduler spawns.
    pub spawn_cap: usize,
    /// Re-arm window (seconds) when the cap blocked a spawn.
    pub retry_min: f32,
    pub retry_max: f32,
    /// Re-arm window (seconds) after a successful spawn.
    pub next_min: f32,
    pub next_max: f32,
    /// Upper bound of the random speed bonus given to each spawned unit.
    pub speed_jitter: f32,
    /// Archetype the scheduler spawns.
    pub enemy_kind: String,
    pub player_spawn_offset: Vec3,
    pub enemy_spawn_offset: Vec3,
    pub player_base_position: Vec3,
    pub enemy_base_position: Vec3,
    /// Upper bound on a frame delta. Zero or less disables clamping.
    pub max_delta: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            stop_distance: DEFAULT_STOP_DISTANCE,
            speed_scale: DEFAULT_SPEED_SCALE,
            combat_delay: DEFAULT_COMBAT_DELAY,
            envelope: DEFAULT_ENVELOPE,
            starting_money: DEFAULT_MONEY,
            player_base_hp: DEFAULT_BASE_HP,
            enemy_base_hp: DEFAULT_BASE_HP,
            spawn_cap: DEFAULT_SPAWN_CAP,
            retry_min: DEFAULT_RETRY_MIN,
            retry_max: DEFAULT_RETRY_MAX,
            next_min: DEFAULT_NEXT_MIN,
            next_max: DEFAULT_NEXT_MAX,
            speed_jitter: DEFAULT_SPEED_JITTER,
            enemy_kind: DEFAULT_ENEMY_KIND.to_string(),
            player_spawn_offset: DEFAULT_SPAWN_OFFSET,
            enemy_spawn_offset: DEFAULT_SPAWN_OFFSET,
            player_base_position: DEFAULT_PLAYER_BASE,
            enemy_base_position: DEFAULT_ENEMY_BASE,
            max_delta: 0.0,
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

    /// Offset from the faction's base at which its units appear.
    pub fn spawn_offset(&self, faction: Faction) -> Vec3 {
        match faction {
            Faction::Player => self.player_spawn_offset,
            Faction::Enemy => self.enemy_spawn_offset,
        }
    }

    pub fn base_position(&self, faction: Faction) -> Vec3 {
        match faction {
            Faction::Player => self.player_base_position,
            Faction::Enemy => self.enemy_base_position,
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), SimError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| SimError::Config(format!("failed to load config file: {}", e)))?;
        self.apply(&config)?;
        info!(
            "Loaded config from {:?}: spacing={}, stop={}, delay={}, cap={}, money={}",
            self.config_path,
            self.spacing,
            self.stop_distance,
            self.combat_delay,
            self.spawn_cap,
            self.starting_money
        );
        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), SimError> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| SimError::Config(format!("failed to parse config: {}", e)))?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<(), SimError> {
        let float = |section: &str, key: &str| -> Result<Option<f32>, SimError> {
            config
                .getfloat(section, key)
                .map(|v| v.map(|f| f as f32))
                .map_err(|e| SimError::Config(format!("[{}] {}: {}", section, key, e)))
        };
        let uint = |section: &str, key: &str| -> Result<Option<u64>, SimError> {
            config
                .getuint(section, key)
                .map_err(|e| SimError::Config(format!("[{}] {}: {}", section, key, e)))
        };
        let narrow = |section: &str, key: &str| -> SimError {
            SimError::Config(format!("[{}] {}: out of range", section, key))
        };
        let u32_value = |section: &str, key: &str| -> Result<Option<u32>, SimError> {
            uint(section, key)?
                .map(|v| u32::try_from(v).map_err(|_| narrow(section, key)))
                .transpose()
        };
        let i32_value = |section: &str, key: &str| -> Result<Option<i32>, SimError> {
            uint(section, key)?
                .map(|v| i32::try_from(v).map_err(|_| narrow(section, key)))
                .transpose()
        };
        let usize_value = |section: &str, key: &str| -> Result<Option<usize>, SimError> {
            uint(section, key)?
                .map(|v| usize::try_from(v).map_err(|_| narrow(section, key)))
                .transpose()
        };
        let vec3 = |section: &str, key: &str| -> Result<Option<Vec3>, SimError> {
            match config.get(section, key) {
                Some(raw) => parse_vec3(&raw)
                    .map(Some)
                    .ok_or_else(|| SimError::Config(format!("[{}] {}: bad vector '{}'", section, key, raw))),
                None => Ok(None),
            }
        };

        // [movement] section
        if let Some(v) = float("movement", "spacing")? {
            self.spacing = v;
        }
        if let Some(v) = float("movement", "stop_distance")? {
            self.stop_distance = v;
        }
        if let Some(v) = float("movement", "speed_scale")? {
            self.speed_scale = v;
        }

        // [combat] section
        if let Some(v) = float("combat", "delay")? {
            self.combat_delay = v;
        }
        if let Some(v) = float("combat", "envelope_x")? {
            self.envelope.x = v;
        }
        if let Some(v) = float("combat", "envelope_y")? {
            self.envelope.y = v;
        }
        if let Some(v) = float("combat", "envelope_z")? {
            self.envelope.z = v;
        }

        // [economy] section
        if let Some(v) = u32_value("economy", "money")? {
            self.starting_money = v;
        }
        if let Some(v) = i32_value("economy", "player_base_hp")? {
            self.player_base_hp = v;
        }
        if let Some(v) = i32_value("economy", "enemy_base_hp")? {
            self.enemy_base_hp = v;
        }

        // [spawn] section
        if let Some(v) = usize_value("spawn", "cap")? {
            self.spawn_cap = v;
        }
        if let Some(v) = float("spawn", "retry_min")? {
            self.retry_min = v;
        }
        if let Some(v) = float("spawn", "retry_max")? {
            self.retry_max = v;
        }
        if let Some(v) = float("spawn", "next_min")? {
            self.next_min = v;
        }
        if let Some(v) = float("spawn", "next_max")? {
            self.next_max = v;
        }
        if let Some(v) = float("spawn", "speed_jitter")? {
            self.speed_jitter = v;
        }
        if let Some(kind) = config.get("spawn", "kind") {
            self.enemy_kind = kind;
        }
        if let Some(v) = vec3("spawn", "player_offset")? {
            self.player_spawn_offset = v;
        }
        if let Some(v) = vec3("spawn", "enemy_offset")? {
            self.enemy_spawn_offset = v;
        }

        // [bases] section
        if let Some(v) = vec3("bases", "player")? {
            self.player_base_position = v;
        }
        if let Some(v) = vec3("bases", "enemy")? {
            self.enemy_base_position = v;
        }

        // [time] section
        if let Some(v) = float("time", "max_delta")? {
            self.max_delta = v;
        }

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), SimError> {
        let mut config = Ini::new();

        config.set("movement", "spacing", Some(self.spacing.to_string()));
        config.set("movement", "stop_distance", Some(self.stop_distance.to_string()));
        config.set("movement", "speed_scale", Some(self.speed_scale.to_string()));

        config.set("combat", "delay", Some(self.combat_delay.to_string()));
        config.set("combat", "envelope_x", Some(self.envelope.x.to_string()));
        config.set("combat", "envelope_y", Some(self.envelope.y.to_string()));
        config.set("combat", "envelope_z", Some(self.envelope.z.to_string()));

        config.set("economy", "money", Some(self.starting_money.to_string()));
        config.set("economy", "player_base_hp", Some(self.player_base_hp.to_string()));
        config.set("economy", "enemy_base_hp", Some(self.enemy_base_hp.to_string()));

        config.set("spawn", "cap", Some(self.spawn_cap.to_string()));
        config.set("spawn", "retry_min", Some(self.retry_min.to_string()));
        config.set("spawn", "retry_max", Some(self.retry_max.to_string()));
        config.set("spawn", "next_min", Some(self.next_min.to_string()));
        config.set("spawn", "next_max", Some(self.next_max.to_string()));
        config.set("spawn", "speed_jitter", Some(self.speed_jitter.to_string()));
        config.set("spawn", "kind", Some(self.enemy_kind.clone()));
        config.set("spawn", "player_offset", Some(format_vec3(self.player_spawn_offset)));
        config.set("spawn", "enemy_offset", Some(format_vec3(self.enemy_spawn_offset)));

        config.set("bases", "player", Some(format_vec3(self.player_base_position)));
        config.set("bases", "enemy", Some(format_vec3(self.enemy_base_position)));

        config.set("time", "max_delta", Some(self.max_delta.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| SimError::Config(format!("failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

/// Parse `"x,y,z"` into a vector.
fn parse_vec3(raw: &str) -> Option<Vec3> {
    let mut parts = raw.split(',').map(|p| p.trim().parse::<f32>());
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;
    let z = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Vec3::new(x, y, z))
}

fn format_vec3(v: Vec3) -> String {
    format!("{},{},{}", v.x, v.y, v.z)
}
