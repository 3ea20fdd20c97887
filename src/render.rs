//! Drawing capability consumed by the game states.
//!
//! The core only describes shapes in world coordinates; the host decides how
//! they reach a screen. See `ui::BrailleCanvas` for the terminal backend.

use crate::geometry::Vector2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GRAY: Rgb = Rgb(128, 128, 128);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);

    /// Scale every channel by `factor` (clamped to 0..=1).
    pub fn scaled(self, factor: f64) -> Rgb {
        let f = factor.clamp(0.0, 1.0);
        let ch = |c: u8| (c as f64 * f).round() as u8;
        Rgb(ch(self.0), ch(self.1), ch(self.2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `position` is the left edge of the text.
    Left,
    /// `position` is the centre of the text.
    Center,
}

pub trait Renderer {
    /// `width == 0.0` fills the circle.
    fn draw_circle(&mut self, center: Vector2, radius: f64, color: Rgb, width: f64);
    fn draw_polygon(&mut self, points: &[Vector2], color: Rgb, width: f64);
    fn draw_text(&mut self, text: &str, position: Vector2, align: Align, font_size: f64, color: Rgb);
    fn clear(&mut self, color: Rgb);
    fn present(&mut self);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_color_fades_to_black() {
        assert_eq!(Rgb(200, 100, 50).scaled(0.5), Rgb(100, 50, 25));
        assert_eq!(Rgb(200, 100, 50).scaled(0.0), Rgb::BLACK);
        assert_eq!(Rgb(200, 100, 50).scaled(2.0), Rgb(200, 100, 50));
    }
}
