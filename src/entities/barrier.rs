use std::time::Duration;

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, PrimitiveStyle},
};
use image::RgbaImage;

use crate::canvas::{self, Canvas, HUD_WHITE};
use crate::config::BarrierConfig;
use crate::sprite::Sprite;

const SHIELD_COLOR: Rgb888 = Rgb888::new(0, 200, 255);
const SHIELD_FILL_ALPHA: u8 = 60;
const SHIELD_RING_ALPHA: u8 = 180;
const SHIELD_MARGIN: u32 = 6;

/// Temporary damage immunity with a limited number of activations
#[derive(Debug, Clone)]
pub struct Barrier {
    uses_remaining: u32,
    active: bool,
    elapsed: Duration,
    duration: Duration,
    icon: Sprite,
}

impl Barrier {
    pub fn new(config: &BarrierConfig, icon: Sprite) -> Self {
        Self {
            uses_remaining: config.uses,
            active: false,
            elapsed: Duration::ZERO,
            duration: config.duration(),
            icon,
        }
    }

    /// Raises the shield, consuming one use.
    ///
    /// Does nothing while the shield is already up or when no uses are left, so
    /// holding the button down never burns more than one use.
    pub fn activate(&mut self) -> bool {
        if self.active || self.uses_remaining == 0 {
            return false;
        }
        self.uses_remaining -= 1;
        self.active = true;
        self.elapsed = Duration::ZERO;
        log::info!(
            "Barrier up for {:?}, {} use(s) left",
            self.duration,
            self.uses_remaining
        );
        true
    }

    /// Advances the shield timer by `dt` and drops the shield once its duration has run out.
    /// Safe to call every frame; a lowered shield is left alone.
    pub fn deactivate(&mut self, dt: Duration) {
        if !self.active {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.active = false;
            self.elapsed = Duration::ZERO;
            log::info!("Barrier expired");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn uses_remaining(&self) -> u32 {
        self.uses_remaining
    }

    /// Time left before the shield drops, zero when inactive
    pub fn remaining(&self) -> Duration {
        if self.active {
            self.duration.saturating_sub(self.elapsed)
        } else {
            Duration::ZERO
        }
    }

    /// Translucent ring around a `size`x`size` ship at `(x, y)` while the shield is up
    pub fn draw_effect(&self, frame: &mut RgbaImage, x: i32, y: i32, size: u32) {
        if !self.active {
            return;
        }
        let half = size as i32 / 2;
        let circle = Circle::with_center(Point::new(x + half, y + half), size + SHIELD_MARGIN * 2);

        // Infallible
        let _ = circle
            .into_styled(PrimitiveStyle::with_fill(SHIELD_COLOR))
            .draw(&mut Canvas::translucent(frame, SHIELD_FILL_ALPHA));
        let _ = circle
            .into_styled(PrimitiveStyle::with_stroke(SHIELD_COLOR, 2))
            .draw(&mut Canvas::translucent(frame, SHIELD_RING_ALPHA));
    }

    /// Shield icon with the remaining use count to its right
    pub fn draw_icon(&self, frame: &mut RgbaImage, x: i32, y: i32) {
        self.icon.paste_onto(frame, x, y);
        canvas::draw_text(
            frame,
            &self.uses_remaining.to_string(),
            x + self.icon.width() as i32 + 2,
            y + 3,
            HUD_WHITE,
        );
    }
}
