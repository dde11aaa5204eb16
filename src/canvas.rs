use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};
use image::{Pixel as _, Rgba, RgbaImage};

pub const HUD_WHITE: Rgb888 = Rgb888::WHITE;

/// embedded-graphics draw target over the RGBA frame buffer
///
/// Every drawn pixel is alpha-blended onto the frame at the canvas opacity,
/// so primitives can be laid over sprites as translucent effects.
pub struct Canvas<'a> {
    frame: &'a mut RgbaImage,
    alpha: u8,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut RgbaImage) -> Self {
        Self::translucent(frame, u8::MAX)
    }

    pub fn translucent(frame: &'a mut RgbaImage, alpha: u8) -> Self {
        Self { frame, alpha }
    }
}

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.frame.width(), self.frame.height())
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (width, height) = self.frame.dimensions();
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x >= width || y >= height {
                continue;
            }
            let source = Rgba([color.r(), color.g(), color.b(), self.alpha]);
            self.frame.get_pixel_mut(x, y).blend(&source);
        }
        Ok(())
    }
}

/// Draws `text` with its top-left corner at `(x, y)` in the HUD font
pub fn draw_text(frame: &mut RgbaImage, text: &str, x: i32, y: i32, color: Rgb888) {
    let mut canvas = Canvas::new(frame);
    let style = MonoTextStyle::new(&FONT_6X10, color);
    // Infallible
    let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(&mut canvas);
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    fn black(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]))
    }

    #[test]
    fn test_opaque_fill() {
        let mut frame = black(10, 10);
        let mut canvas = Canvas::new(&mut frame);
        let _ = Rectangle::new(Point::new(2, 2), Size::new(3, 3))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::new(0, 255, 0)))
            .draw(&mut canvas);

        assert_eq!(frame.get_pixel(3, 3), &Rgba([0, 255, 0, 255]));
        assert_eq!(frame.get_pixel(5, 5), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_translucent_fill_blends() {
        let mut frame = black(4, 4);
        let mut canvas = Canvas::translucent(&mut frame, 128);
        let _ = Rectangle::new(Point::zero(), Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::new(0, 0, 255)))
            .draw(&mut canvas);

        let pixel = frame.get_pixel(1, 1);
        assert!(pixel[2] > 100 && pixel[2] < 160, "blue channel was {}", pixel[2]);
        assert_eq!(pixel[0], 0);
    }

    #[test]
    fn test_out_of_bounds_pixels_are_dropped() {
        let mut frame = black(4, 4);
        let mut canvas = Canvas::new(&mut frame);
        let _ = Rectangle::new(Point::new(-2, -2), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::WHITE))
            .draw(&mut canvas);
        assert_eq!(frame.get_pixel(3, 3), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_draw_text_marks_pixels_near_origin() {
        let mut frame = black(40, 20);
        draw_text(&mut frame, " 3", 5, 5, HUD_WHITE);

        let lit = frame
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] == 255)
            .collect::<Vec<_>>();
        assert!(!lit.is_empty());
        // The leading space leaves the first glyph cell blank
        assert!(lit.iter().all(|(x, y, _)| *x >= 11 && *y >= 5 && *y < 15));
    }
}
