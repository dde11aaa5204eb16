use image::RgbaImage;

use crate::config::{EnemyLaserConfig, LaserConfig};
use crate::hitbox::Hitbox;
use crate::sprite::Sprite;

/// A laser fired by an enemy, falling straight down
#[derive(Debug, Clone)]
pub struct EnemyLaser {
    /// Horizontal centre of the beam
    pub x: i32,
    /// Top edge of the beam
    pub y: i32,
    pub speed: i32,
    pub damage: i32,
    sprite: Sprite,
}

impl EnemyLaser {
    pub fn new(x: i32, y: i32, config: &EnemyLaserConfig, sprite: Sprite) -> Self {
        Self {
            x,
            y,
            speed: config.speed,
            damage: config.damage,
            sprite,
        }
    }

    pub fn move_step(&mut self) {
        self.y += self.speed;
    }

    pub fn draw(&self, frame: &mut RgbaImage) {
        self.sprite.paste_onto(frame, self.left(), self.y);
    }

    pub fn is_off_screen(&self, screen_height: i32) -> bool {
        self.y > screen_height
    }

    pub fn bounds(&self) -> Hitbox {
        Hitbox::from_rect(
            self.left(),
            self.y,
            self.sprite.width(),
            self.sprite.height(),
        )
    }

    fn left(&self) -> i32 {
        self.x - self.sprite.width() as i32 / 2
    }
}

/// A laser fired by the player, flying straight up
#[derive(Debug, Clone)]
pub struct Laser {
    /// Horizontal centre of the beam
    pub x: i32,
    /// Top edge of the beam
    pub y: i32,
    pub speed: i32,
    pub damage: i32,
    sprite: Sprite,
}

impl Laser {
    pub fn new(x: i32, y: i32, config: &LaserConfig, sprite: Sprite) -> Self {
        Self {
            x,
            y,
            speed: config.speed,
            damage: config.damage,
            sprite,
        }
    }

    pub fn move_step(&mut self) {
        self.y -= self.speed;
    }

    pub fn draw(&self, frame: &mut RgbaImage) {
        self.sprite.paste_onto(frame, self.left(), self.y);
    }

    /// True once the beam has fully left the top of the screen or sits below its bottom
    pub fn is_off_screen(&self, screen_height: i32) -> bool {
        self.y + (self.sprite.height() as i32) < 0 || self.y > screen_height
    }

    pub fn bounds(&self) -> Hitbox {
        Hitbox::from_rect(
            self.left(),
            self.y,
            self.sprite.width(),
            self.sprite.height(),
        )
    }

    fn left(&self) -> i32 {
        self.x - self.sprite.width() as i32 / 2
    }
}
