use std::path::Path;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::config::GameConfig;
use crate::error::{GameError, Result};

pub const LIFE_ICON_SIZE: u32 = 30;
pub const BARRIER_ICON_SIZE: u32 = 16;

/// An RGBA image shared between every entity that draws it
///
/// Cloning is cheap: lasers spawned every volley reuse the pixels loaded once
/// at startup.
#[derive(Debug, Clone)]
pub struct Sprite {
    image: Arc<RgbaImage>,
}

impl Sprite {
    /// Loads an image file and resizes it to `width`x`height`
    pub fn load(path: impl AsRef<Path>, width: u32, height: u32) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| GameError::AssetLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        log::debug!(
            "Loaded {} ({}x{}) as {}x{}",
            path.display(),
            image.width(),
            image.height(),
            width,
            height
        );
        Ok(Self::from_image(imageops::resize(
            &image,
            width,
            height,
            FilterType::Triangle,
        )))
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    /// Flat colored rectangle, used when no artwork is available
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::from_image(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Alpha-blends the sprite onto `frame` with its top-left corner at `(x, y)`.
    /// Parts falling outside the frame are clipped.
    pub fn paste_onto(&self, frame: &mut RgbaImage, x: i32, y: i32) {
        imageops::overlay(frame, self.image.as_ref(), i64::from(x), i64::from(y));
    }
}

/// Every sprite the entities need, loaded once per session
#[derive(Debug, Clone)]
pub struct Assets {
    pub enemy: Sprite,
    pub enemy_laser: Sprite,
    pub spaceship: Sprite,
    pub laser: Sprite,
    pub life: Sprite,
    pub barrier_icon: Sprite,
}

impl Assets {
    /// Loads and resizes all images named in `config.assets`, failing on the first unreadable one
    pub fn load(config: &GameConfig) -> Result<Self> {
        let paths = &config.assets;
        let assets = Self {
            enemy: Sprite::load(&paths.enemy, config.enemy.size, config.enemy.size)?,
            enemy_laser: Sprite::load(
                &paths.enemy_laser,
                config.enemy_laser.width,
                config.enemy_laser.height,
            )?,
            spaceship: Sprite::load(
                &paths.spaceship,
                config.spaceship.size,
                config.spaceship.size,
            )?,
            laser: Sprite::load(&paths.laser, config.laser.width, config.laser.height)?,
            life: Sprite::load(&paths.life, LIFE_ICON_SIZE, LIFE_ICON_SIZE)?,
            barrier_icon: Sprite::load(&paths.barrier_icon, BARRIER_ICON_SIZE, BARRIER_ICON_SIZE)?,
        };
        log::info!("Loaded sprite assets");
        Ok(assets)
    }

    /// Flat colored stand-ins with the configured dimensions
    pub fn placeholder(config: &GameConfig) -> Self {
        Self {
            enemy: Sprite::solid(config.enemy.size, config.enemy.size, [220, 40, 40, 255]),
            enemy_laser: Sprite::solid(
                config.enemy_laser.width,
                config.enemy_laser.height,
                [255, 0, 255, 255],
            ),
            spaceship: Sprite::solid(
                config.spaceship.size,
                config.spaceship.size,
                [40, 200, 80, 255],
            ),
            laser: Sprite::solid(config.laser.width, config.laser.height, [255, 220, 0, 255]),
            life: Sprite::solid(LIFE_ICON_SIZE, LIFE_ICON_SIZE, [255, 80, 80, 255]),
            barrier_icon: Sprite::solid(BARRIER_ICON_SIZE, BARRIER_ICON_SIZE, [0, 200, 255, 255]),
        }
    }
}
