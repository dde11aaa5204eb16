use std::time::Duration;

use image::RgbaImage;
use rand::Rng;

use super::projectile::EnemyLaser;
use crate::config::{EnemyConfig, EnemyLaserConfig};
use crate::hitbox::{Hitbox, HitboxShape};
use crate::sprite::{Assets, Sprite};

/// Horizontal patrol direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    pub fn sign(&self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// An enemy ship patrolling horizontally near the top of the screen
#[derive(Debug, Clone)]
pub struct Enemy {
    pub x: i32,
    /// Fixed at spawn; enemies never descend
    pub y: i32,
    pub size: u32,
    pub health: i32,
    pub speed: i32,
    pub direction: Direction,
    screen_width: i32,
    config: EnemyConfig,
    /// Time since the last direction change
    direction_timer: Duration,
    next_direction_change: Duration,
    /// Time since the last volley
    laser_timer: Duration,
    next_laser_interval: Duration,
    lasers: Vec<EnemyLaser>,
    laser_config: EnemyLaserConfig,
    hitbox: HitboxShape,
    sprite: Sprite,
    laser_sprite: Sprite,
}

impl Enemy {
    /// Spawns an enemy centred at the top of a `screen_width` wide screen
    pub fn new<R: Rng + ?Sized>(
        screen_width: u32,
        config: &EnemyConfig,
        laser_config: &EnemyLaserConfig,
        assets: &Assets,
        rng: &mut R,
    ) -> Self {
        let size = config.size as i32;
        let screen_width = screen_width as i32;

        Self {
            x: (screen_width - size) / 2,
            y: 60 - size,
            size: config.size,
            health: config.health,
            speed: config.speed,
            direction: Direction::random(rng),
            screen_width,
            config: *config,
            direction_timer: Duration::ZERO,
            next_direction_change: config.direction_change.sample(rng),
            laser_timer: Duration::ZERO,
            next_laser_interval: config.first_laser_interval.sample(rng),
            lasers: Vec::new(),
            laser_config: *laser_config,
            hitbox: HitboxShape::new(config.size, config.hitbox_scale),
            sprite: assets.enemy.clone(),
            laser_sprite: assets.enemy_laser.clone(),
        }
    }

    /// Patrols one step, changing direction whenever the current random interval has elapsed.
    /// Destroyed enemies stay put.
    pub fn move_step<R: Rng + ?Sized>(&mut self, dt: Duration, rng: &mut R) {
        if self.is_destroyed() {
            return;
        }

        self.direction_timer += dt;
        if self.direction_timer >= self.next_direction_change {
            self.direction = Direction::random(rng);
            self.direction_timer = Duration::ZERO;
            self.next_direction_change = self.config.direction_change.sample(rng);
            log::debug!(
                "Enemy turns {:?}, next turn in {:?}",
                self.direction,
                self.next_direction_change
            );
        }

        let max_x = self.screen_width - self.size as i32;
        self.x = (self.x + self.direction.sign() * self.speed).min(max_x).max(0);
    }

    /// Fires a volley of lasers once the current random interval has elapsed.
    /// Returns how many lasers were spawned.
    pub fn shoot<R: Rng + ?Sized>(&mut self, dt: Duration, rng: &mut R) -> usize {
        if self.is_destroyed() {
            return 0;
        }

        self.laser_timer += dt;
        if self.laser_timer < self.next_laser_interval {
            return 0;
        }
        self.laser_timer = Duration::ZERO;
        self.next_laser_interval = self.config.laser_interval.sample(rng);

        let size = self.size as i32;
        let spread = size / 4;
        let count = rng.random_range(1..=self.config.max_volley) as usize;
        for _ in 0..count {
            let jitter = rng.random_range(-spread..=spread);
            self.lasers.push(EnemyLaser::new(
                self.x + size / 2 + jitter,
                self.y + size,
                &self.laser_config,
                self.laser_sprite.clone(),
            ));
        }
        log::debug!("Enemy fired {count} laser(s)");
        count
    }

    /// Health is not clamped and may drop below zero
    pub fn take_damage(&mut self, damage: i32) {
        let was_destroyed = self.is_destroyed();
        self.health -= damage;
        if !was_destroyed && self.is_destroyed() {
            log::info!("Enemy destroyed");
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    /// Destroyed and every laser it fired has left the screen
    pub fn is_spent(&self) -> bool {
        self.is_destroyed() && self.lasers.is_empty()
    }

    /// Advances owned lasers and drops the ones below the screen.
    /// Lasers keep flying after the enemy is destroyed.
    pub fn update_lasers(&mut self, screen_height: i32) {
        for laser in &mut self.lasers {
            laser.move_step();
        }
        self.lasers.retain(|laser| !laser.is_off_screen(screen_height));
    }

    pub fn lasers(&self) -> &[EnemyLaser] {
        &self.lasers
    }

    /// Removes a laser that hit something, or returns `None` for an index past the end
    pub fn take_laser(&mut self, index: usize) -> Option<EnemyLaser> {
        (index < self.lasers.len()).then(|| self.lasers.remove(index))
    }

    pub fn draw(&self, frame: &mut RgbaImage) {
        if !self.is_destroyed() {
            self.sprite.paste_onto(frame, self.x, self.y);
        }
        for laser in &self.lasers {
            laser.draw(frame);
        }
    }

    pub fn hitbox(&self) -> Hitbox {
        self.hitbox.at(self.x, self.y)
    }
}
