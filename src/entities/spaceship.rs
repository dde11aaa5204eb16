use std::time::Duration;

use image::RgbaImage;

use super::barrier::Barrier;
use super::projectile::Laser;
use crate::canvas::{self, HUD_WHITE};
use crate::config::{BarrierConfig, LaserConfig, SpaceshipConfig};
use crate::hitbox::{Hitbox, HitboxShape};
use crate::sprite::{Assets, Sprite};

/// Input signals sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buttons {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire
    pub a: bool,
    pub barrier: bool,
}

impl Buttons {
    /// Builds button state from named flags. Unknown names are ignored and
    /// missing ones read as released.
    pub fn from_flags<'a, I>(flags: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut buttons = Self::default();
        for (name, pressed) in flags {
            match name {
                "left" => buttons.left = pressed,
                "right" => buttons.right = pressed,
                "up" => buttons.up = pressed,
                "down" => buttons.down = pressed,
                "a" => buttons.a = pressed,
                "barrier" => buttons.barrier = pressed,
                _ => {}
            }
        }
        buttons
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Spaceship {
    pub x: i32,
    pub y: i32,
    pub size: u32,
    pub health: i32,
    pub speed: i32,
    screen_width: i32,
    screen_height: i32,
    lasers: Vec<Laser>,
    laser_config: LaserConfig,
    /// Frames between shots
    laser_cooldown: u32,
    /// Frames left before the next shot is allowed
    laser_timer: u32,
    barrier: Barrier,
    hitbox: HitboxShape,
    sprite: Sprite,
    life_icon: Sprite,
    laser_sprite: Sprite,
}

impl Spaceship {
    pub fn new(
        screen_width: u32,
        screen_height: u32,
        config: &SpaceshipConfig,
        laser_config: &LaserConfig,
        barrier_config: &BarrierConfig,
        assets: &Assets,
    ) -> Self {
        let screen_width = screen_width as i32;
        let screen_height = screen_height as i32;
        let size = config.size as i32;

        // Spawn right of centre near the bottom, pulled back inside on small screens
        Self {
            x: (screen_width / 2).min(screen_width - size).max(0),
            y: (screen_height - 40).min(screen_height - size).max(0),
            size: config.size,
            health: config.health,
            speed: config.speed,
            screen_width,
            screen_height,
            lasers: Vec::new(),
            laser_config: *laser_config,
            laser_cooldown: config.laser_cooldown,
            laser_timer: 0,
            barrier: Barrier::new(barrier_config, assets.barrier_icon.clone()),
            hitbox: HitboxShape::new(config.size, config.hitbox_scale),
            sprite: assets.spaceship.clone(),
            life_icon: assets.life.clone(),
            laser_sprite: assets.laser.clone(),
        }
    }

    /// Applies one frame of input: movement, firing, shield, then the cooldown tick
    pub fn move_step(&mut self, buttons: &Buttons) {
        let max_x = self.screen_width - self.size as i32;
        let max_y = self.screen_height - self.size as i32;

        if buttons.left && self.x > 0 {
            self.x = (self.x - self.speed).max(0);
        }
        if buttons.right && self.x < max_x {
            self.x = (self.x + self.speed).min(max_x);
        }
        if buttons.up && self.y > 0 {
            self.y = (self.y - self.speed).max(0);
        }
        if buttons.down && self.y < max_y {
            self.y = (self.y + self.speed).min(max_y);
        }

        if buttons.a {
            self.shoot();
        }

        if buttons.barrier {
            self.activate_barrier();
        }

        if self.laser_timer > 0 {
            self.laser_timer -= 1;
        }
    }

    /// Fires a laser from the ship's nose if the cooldown has run out
    pub fn shoot(&mut self) -> bool {
        if self.laser_timer != 0 {
            return false;
        }
        self.lasers.push(Laser::new(
            self.x + self.size as i32 / 2,
            self.y,
            &self.laser_config,
            self.laser_sprite.clone(),
        ));
        self.laser_timer = self.laser_cooldown;
        true
    }

    pub fn activate_barrier(&mut self) -> bool {
        self.barrier.activate()
    }

    /// Advances every laser and drops the ones that left the screen
    pub fn update_lasers(&mut self) {
        for laser in &mut self.lasers {
            laser.move_step();
        }
        let screen_height = self.screen_height;
        self.lasers.retain(|laser| !laser.is_off_screen(screen_height));
    }

    /// Lets the shield expire once its time is up
    pub fn update_barrier(&mut self, dt: Duration) {
        self.barrier.deactivate(dt);
    }

    /// Loses one health point unless shielded or already destroyed
    pub fn take_damage(&mut self) {
        if !self.barrier.is_active() && self.health > 0 {
            self.health -= 1;
            log::info!("Spaceship hit, {} health left", self.health);
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    pub fn hitbox(&self) -> Hitbox {
        self.hitbox.at(self.x, self.y)
    }

    pub fn barrier(&self) -> &Barrier {
        &self.barrier
    }

    pub fn laser_timer(&self) -> u32 {
        self.laser_timer
    }

    pub fn lasers(&self) -> &[Laser] {
        &self.lasers
    }

    /// Removes a laser that hit something, or returns `None` for an index past the end
    pub fn take_laser(&mut self, index: usize) -> Option<Laser> {
        (index < self.lasers.len()).then(|| self.lasers.remove(index))
    }

    /// Ship, shield, lasers and the health / shield HUD in the bottom-right corner
    pub fn draw(&self, frame: &mut RgbaImage) {
        self.sprite.paste_onto(frame, self.x, self.y);
        self.barrier.draw_effect(frame, self.x, self.y, self.size);

        for laser in &self.lasers {
            laser.draw(frame);
        }

        let life_x = self.screen_width - 45;
        let life_y = self.screen_height - 35;
        self.life_icon.paste_onto(frame, life_x, life_y);
        canvas::draw_text(
            frame,
            &format!(" {}", self.health),
            life_x + 25,
            life_y + 10,
            HUD_WHITE,
        );

        self.barrier
            .draw_icon(frame, self.screen_width - 38, self.screen_height - 45);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use image::Rgba;

    fn ship() -> Spaceship {
        let config = GameConfig::default();
        let assets = Assets::placeholder(&config);
        Spaceship::new(
            config.screen.width,
            config.screen.height,
            &config.spaceship,
            &config.laser,
            &config.barrier,
            &assets,
        )
    }

    fn press(f: impl FnOnce(&mut Buttons)) -> Buttons {
        let mut buttons = Buttons::default();
        f(&mut buttons);
        buttons
    }

    #[test]
    fn test_spaceship_new() {
        let ship = ship();
        assert_eq!(ship.x, 120);
        assert_eq!(ship.y, 200);
        assert_eq!(ship.health, 3);
        assert_eq!(ship.speed, 9);
        assert_eq!(ship.laser_timer(), 0);
        assert!(ship.lasers().is_empty());
        assert!(!ship.barrier().is_active());
        assert_eq!(ship.barrier().uses_remaining(), 2);
    }

    #[test]
    fn test_buttons_from_flags() {
        let buttons = Buttons::from_flags([
            ("left", true),
            ("right", false),
            ("up", true),
            ("down", false),
            ("barrier", true),
        ]);
        assert!(buttons.left);
        assert!(buttons.up);
        assert!(buttons.barrier);
        // Missing "a" reads as released
        assert!(!buttons.a);

        let buttons = Buttons::from_flags([("turbo", true), ("a", true)]);
        assert_eq!(
            buttons,
            Buttons {
                a: true,
                ..Buttons::default()
            }
        );
    }

    #[test]
    fn test_spaceship_movement() {
        let mut ship = ship();
        ship.move_step(&press(|b| b.left = true));
        assert_eq!(ship.x, 111);
        ship.move_step(&press(|b| b.right = true));
        assert_eq!(ship.x, 120);
        ship.move_step(&press(|b| b.up = true));
        assert_eq!(ship.y, 191);
        ship.move_step(&press(|b| b.down = true));
        assert_eq!(ship.y, 200);
    }

    #[test]
    fn test_spaceship_movement_clamped() {
        let mut ship = ship();
        ship.x = 5;
        ship.move_step(&press(|b| b.left = true));
        assert_eq!(ship.x, 0);

        ship.x = 195;
        ship.move_step(&press(|b| b.right = true));
        assert_eq!(ship.x, 200);

        ship.y = 4;
        ship.move_step(&press(|b| b.up = true));
        assert_eq!(ship.y, 0);

        ship.y = 199;
        ship.move_step(&press(|b| b.down = true));
        assert_eq!(ship.y, 200);
        ship.move_step(&press(|b| b.down = true));
        assert_eq!(ship.y, 200);
    }

    #[test]
    fn test_spaceship_shoot_from_centre() {
        let mut ship = ship();
        assert!(ship.shoot());
        assert_eq!(ship.lasers().len(), 1);
        assert_eq!(ship.lasers()[0].x, 140);
        assert_eq!(ship.lasers()[0].y, 200);
        assert_eq!(ship.laser_timer(), 3);
    }

    #[test]
    fn test_spaceship_cooldown_blocks_shot() {
        let mut ship = ship();
        ship.shoot();
        assert!(!ship.shoot());
        assert_eq!(ship.lasers().len(), 1);
        assert_eq!(ship.laser_timer(), 3);
    }

    #[test]
    fn test_spaceship_cooldown_counts_frames() {
        let mut ship = ship();
        ship.shoot();
        let idle = Buttons::default();
        for expected in [2, 1, 0, 0] {
            ship.move_step(&idle);
            assert_eq!(ship.laser_timer(), expected);
        }
        assert!(ship.shoot());
    }

    #[test]
    fn test_spaceship_holding_fire_shoots_every_third_frame() {
        let mut ship = ship();
        let fire = press(|b| b.a = true);
        let counts: Vec<usize> = (0..7)
            .map(|_| {
                ship.move_step(&fire);
                ship.lasers().len()
            })
            .collect();
        assert_eq!(counts, vec![1, 1, 1, 2, 2, 2, 3]);
    }

    #[test]
    fn test_spaceship_barrier_button() {
        let mut ship = ship();
        let shield = press(|b| b.barrier = true);
        for _ in 0..10 {
            ship.move_step(&shield);
        }
        assert!(ship.barrier().is_active());
        assert_eq!(ship.barrier().uses_remaining(), 1);
    }

    #[test]
    fn test_spaceship_update_barrier_expires_shield() {
        let mut ship = ship();
        ship.activate_barrier();
        ship.update_barrier(Duration::from_secs(2));
        assert!(ship.barrier().is_active());
        ship.update_barrier(Duration::from_secs(2));
        assert!(!ship.barrier().is_active());
    }

    #[test]
    fn test_spaceship_update_lasers() {
        let mut ship = ship();
        ship.shoot();
        ship.update_lasers();
        assert_eq!(ship.lasers()[0].y, 190);

        for _ in 0..30 {
            ship.update_lasers();
        }
        assert!(ship.lasers().is_empty());
    }

    #[test]
    fn test_spaceship_take_damage_sequence() {
        let mut ship = ship();
        let mut seen = Vec::new();
        for _ in 0..3 {
            assert!(!ship.is_destroyed());
            ship.take_damage();
            seen.push(ship.health);
        }
        assert_eq!(seen, vec![2, 1, 0]);
        assert!(ship.is_destroyed());

        ship.take_damage();
        assert_eq!(ship.health, 0);
    }

    #[test]
    fn test_spaceship_shield_blocks_damage() {
        let mut ship = ship();
        ship.activate_barrier();
        ship.take_damage();
        assert_eq!(ship.health, 3);

        ship.update_barrier(Duration::from_secs(4));
        ship.take_damage();
        assert_eq!(ship.health, 2);
    }

    #[test]
    fn test_spaceship_spawn_inside_narrow_screen() {
        let mut config = GameConfig::default();
        config.screen.width = 60;
        config.screen.height = 60;
        assert!(config.validate().is_ok());
        let assets = Assets::placeholder(&config);
        let mut ship = Spaceship::new(
            60,
            60,
            &config.spaceship,
            &config.laser,
            &config.barrier,
            &assets,
        );
        assert_eq!((ship.x, ship.y), (20, 20));

        ship.move_step(&Buttons::default());
        assert!(ship.x >= 0 && ship.x <= 20);
        assert!(ship.y >= 0 && ship.y <= 20);
    }

    #[test]
    fn test_spaceship_take_laser() {
        let mut ship = ship();
        ship.shoot();
        assert!(ship.take_laser(1).is_none());
        assert_eq!(ship.lasers().len(), 1);
        let laser = ship.take_laser(0).unwrap();
        assert_eq!(laser.damage, 1);
        assert!(ship.lasers().is_empty());
    }

    #[test]
    fn test_spaceship_hitbox() {
        let ship = ship();
        assert_eq!(ship.hitbox().as_tuple(), (128, 208, 152, 232));
    }

    #[test]
    fn test_spaceship_draw_hud() {
        let background = Rgba([0, 0, 0, 255]);
        let mut frame = RgbaImage::from_pixel(240, 240, background);
        let mut ship = ship();
        ship.x = 0;
        ship.y = 0;
        ship.draw(&mut frame);

        // Ship sprite
        assert_eq!(frame.get_pixel(10, 10), &Rgba([40, 200, 80, 255]));
        // Life icon at the bottom-right
        assert_eq!(frame.get_pixel(196, 230), &Rgba([255, 80, 80, 255]));
        // Health digit in white right of the icon
        let digit_lit = (220..240)
            .flat_map(|x| (215..235).map(move |y| (x, y)))
            .any(|(x, y)| frame.get_pixel(x, y) == &Rgba([255, 255, 255, 255]));
        assert!(digit_lit);
    }

    // Property-based tests
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn buttons_strategy() -> impl Strategy<Value = Buttons> {
            (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
                |(left, right, up, down, a)| Buttons {
                    left,
                    right,
                    up,
                    down,
                    a,
                    barrier: false,
                },
            )
        }

        proptest! {
            #[test]
            fn test_spaceship_stays_in_bounds(
                frames in prop::collection::vec(buttons_strategy(), 0..200),
            ) {
                let mut ship = ship();
                for buttons in frames {
                    ship.move_step(&buttons);
                    prop_assert!(ship.x >= 0 && ship.x <= 200);
                    prop_assert!(ship.y >= 0 && ship.y <= 200);
                }
            }

            #[test]
            fn test_spaceship_shoot_respects_cooldown(
                frames in prop::collection::vec(buttons_strategy(), 0..100),
            ) {
                let mut ship = ship();
                for buttons in frames {
                    let timer = ship.laser_timer();
                    let before = ship.lasers().len();
                    let fired = ship.shoot();
                    prop_assert_eq!(fired, timer == 0);
                    prop_assert_eq!(ship.lasers().len(), before + usize::from(fired));
                    ship.move_step(&buttons);
                }
            }

            #[test]
            fn test_spaceship_spawns_in_bounds_on_any_valid_screen(
                width in 40u32..400,
                height in 40u32..400,
            ) {
                let mut config = GameConfig::default();
                config.screen.width = width.max(config.enemy.size);
                config.screen.height = height;
                prop_assume!(config.validate().is_ok());

                let assets = Assets::placeholder(&config);
                let mut ship = Spaceship::new(
                    config.screen.width,
                    config.screen.height,
                    &config.spaceship,
                    &config.laser,
                    &config.barrier,
                    &assets,
                );
                ship.move_step(&Buttons::default());
                let max_x = (config.screen.width - config.spaceship.size) as i32;
                let max_y = (config.screen.height - config.spaceship.size) as i32;
                prop_assert!(ship.x >= 0 && ship.x <= max_x);
                prop_assert!(ship.y >= 0 && ship.y <= max_y);
            }

            #[test]
            fn test_spaceship_health_never_negative(
                hits in prop::collection::vec(any::<bool>(), 0..20),
            ) {
                let mut ship = ship();
                for shielded in hits {
                    if shielded {
                        ship.activate_barrier();
                    }
                    let before = ship.health;
                    ship.take_damage();
                    if ship.barrier().is_active() {
                        prop_assert_eq!(ship.health, before);
                    }
                    prop_assert!(ship.health >= 0 && ship.health <= 3);
                    ship.update_barrier(Duration::from_secs(4));
                }
            }
        }
    }
}
