//! Game configuration
//!
//! Every field has a default, so an empty TOML file (or none at all) yields the
//! stock arcade tuning.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

use crate::error::{GameError, Result};

/// Top-level configuration for a game session
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub enemy: EnemyConfig,
    pub enemy_laser: EnemyLaserConfig,
    pub spaceship: SpaceshipConfig,
    pub laser: LaserConfig,
    pub barrier: BarrierConfig,
    pub assets: AssetPaths,
}

/// Frame buffer dimensions in pixels
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 240,
        }
    }
}

/// A uniform random interval, in seconds, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct IntervalConfig {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl IntervalConfig {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_secs <= self.min_secs {
            return Duration::from_secs_f64(self.min_secs);
        }
        Duration::from_secs_f64(rng.random_range(self.min_secs..=self.max_secs))
    }

    pub fn min(&self) -> Duration {
        Duration::from_secs_f64(self.min_secs)
    }

    pub fn max(&self) -> Duration {
        Duration::from_secs_f64(self.max_secs)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub size: u32,
    pub health: i32,
    /// Pixels per frame
    pub speed: i32,
    pub hitbox_scale: f32,
    pub direction_change: IntervalConfig,
    /// Delay before the very first volley
    pub first_laser_interval: IntervalConfig,
    pub laser_interval: IntervalConfig,
    pub max_volley: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: 50,
            health: 20,
            speed: 2,
            hitbox_scale: 0.8,
            direction_change: IntervalConfig::new(1.0, 3.0),
            first_laser_interval: IntervalConfig::new(1.0, 2.0),
            laser_interval: IntervalConfig::new(1.0, 3.0),
            max_volley: 2,
        }
    }
}

/// Falling enemy laser tuning
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EnemyLaserConfig {
    /// Pixels per frame, downward
    pub speed: i32,
    pub damage: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for EnemyLaserConfig {
    fn default() -> Self {
        Self {
            speed: 5,
            damage: 1,
            width: 10,
            height: 20,
        }
    }
}

/// Player laser tuning
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LaserConfig {
    /// Pixels per frame, upward
    pub speed: i32,
    pub damage: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for LaserConfig {
    fn default() -> Self {
        Self {
            speed: 10,
            damage: 1,
            width: 6,
            height: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SpaceshipConfig {
    pub size: u32,
    /// Pixels per frame
    pub speed: i32,
    pub health: i32,
    /// Frames between shots
    pub laser_cooldown: u32,
    pub hitbox_scale: f32,
}

impl Default for SpaceshipConfig {
    fn default() -> Self {
        Self {
            size: 40,
            speed: 9,
            health: 3,
            laser_cooldown: 3,
            hitbox_scale: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct BarrierConfig {
    pub uses: u32,
    pub duration_secs: f64,
}

impl BarrierConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs)
    }
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            uses: 2,
            duration_secs: 4.0,
        }
    }
}

/// PNG asset locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub enemy: PathBuf,
    pub enemy_laser: PathBuf,
    pub spaceship: PathBuf,
    pub laser: PathBuf,
    pub life: PathBuf,
    pub barrier_icon: PathBuf,
    /// Optional laser sound; the game runs silent without it
    pub laser_sound: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            enemy: "assets/Enemy.png".into(),
            enemy_laser: "assets/Laser_Enemy.png".into(),
            spaceship: "assets/Me.png".into(),
            laser: "assets/Laser.png".into(),
            life: "assets/Life.png".into(),
            barrier_icon: "assets/Barrier.png".into(),
            laser_sound: "assets/sounds/laser.wav".into(),
        }
    }
}

impl GameConfig {
    /// Reads and validates a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading config from {}", path.display());
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(GameError::InvalidConfig("screen must not be empty".into()));
        }
        if self.enemy.size == 0 || self.spaceship.size == 0 {
            return Err(GameError::InvalidConfig("sprite size must be non-zero".into()));
        }
        let screen = self.screen;
        if screen.width < self.enemy.size
            || screen.width < self.spaceship.size
            || screen.height < self.spaceship.size
        {
            return Err(GameError::InvalidConfig(format!(
                "screen {}x{} is too small for the sprites",
                screen.width, screen.height
            )));
        }
        if self.enemy.max_volley == 0 {
            return Err(GameError::InvalidConfig("enemy.max_volley must be at least 1".into()));
        }
        for (name, scale) in [
            ("enemy.hitbox_scale", self.enemy.hitbox_scale),
            ("spaceship.hitbox_scale", self.spaceship.hitbox_scale),
        ] {
            if !(scale > 0.0 && scale <= 1.0) {
                return Err(GameError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {scale}"
                )));
            }
        }
        for (name, interval) in [
            ("enemy.direction_change", self.enemy.direction_change),
            ("enemy.first_laser_interval", self.enemy.first_laser_interval),
            ("enemy.laser_interval", self.enemy.laser_interval),
        ] {
            check_seconds(name, interval.min_secs)?;
            check_seconds(name, interval.max_secs)?;
            if interval.min_secs > interval.max_secs {
                return Err(GameError::InvalidConfig(format!(
                    "{name} must satisfy min_secs <= max_secs"
                )));
            }
        }
        check_seconds("barrier.duration_secs", self.barrier.duration_secs)?;
        Ok(())
    }
}

/// Longest timer a config may ask for
const MAX_TIMER_SECS: f64 = 3600.0;

/// Timer lengths must convert to a `Duration` and be sampleable
fn check_seconds(name: &str, secs: f64) -> Result<()> {
    if secs.is_finite() && (0.0..=MAX_TIMER_SECS).contains(&secs) {
        Ok(())
    } else {
        Err(GameError::InvalidConfig(format!(
            "{name} must be between 0 and {MAX_TIMER_SECS} seconds, got {secs}"
        )))
    }
}
