use ratatui::prelude::*;

use crate::geometry::{Bounds, Vector2};
use crate::render::{Align, Renderer, Rgb};

const BRAILLE_BASE: u32 = 0x2800;
const BOLD_FONT_SIZE: f64 = 40.0;

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Braille bit for each dot, indexed `[column][row]` within a 2x4 cell.
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// Dots on the segment between two dot coordinates, both ends included.
fn segment(from: (i32, i32), to: (i32, i32)) -> impl Iterator<Item = (i32, i32)> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs());
    (0..=steps).map(move |i| {
        if steps == 0 {
            return from;
        }
        let t = i as f64 / steps as f64;
        (
            from.0 + (dx as f64 * t).round() as i32,
            from.1 + (dy as f64 * t).round() as i32,
        )
    })
}

/// Terminal [`Renderer`]: world coordinates are scaled onto a grid of
/// braille cells, two dots wide and four tall per character.
pub struct BrailleCanvas {
    world: Bounds,
    width: usize,
    height: usize,
    background: Color,
    grid: Vec<Vec<(char, Style)>>,
    frame: Vec<Line<'static>>,
}

impl BrailleCanvas {
    pub fn new(world: Bounds) -> Self {
        Self {
            world,
            width: 0,
            height: 0,
            background: Color::Rgb(5, 5, 15),
            grid: Vec::new(),
            frame: Vec::new(),
        }
    }

    /// Match the grid to the terminal area. Contents are dropped on change.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.grid = vec![vec![(' ', Style::default().bg(self.background)); width]; height];
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// The last presented frame.
    pub fn lines(&self) -> Vec<Line<'static>> {
        self.frame.clone()
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<char> {
        self.grid.get(row).and_then(|r| r.get(col)).map(|(ch, _)| *ch)
    }

    fn dot_size(&self) -> (i32, i32) {
        ((self.width * 2) as i32, (self.height * 4) as i32)
    }

    fn to_dots(&self, p: Vector2) -> (i32, i32) {
        let (bw, bh) = self.dot_size();
        (
            (p.x / self.world.width * bw as f64).floor() as i32,
            (p.y / self.world.height * bh as f64).floor() as i32,
        )
    }

    fn to_cell(&self, p: Vector2) -> (i32, i32) {
        (
            (p.x / self.world.width * self.width as f64).floor() as i32,
            (p.y / self.world.height * self.height as f64).floor() as i32,
        )
    }

    fn set_dot(&mut self, bx: i32, by: i32, fg: Color) {
        let (bw, bh) = self.dot_size();
        if bx < 0 || by < 0 || bx >= bw || by >= bh { return; }
        let (cx, cy) = (bx as usize / 2, by as usize / 4);
        let bit = DOT_BITS[bx as usize % 2][by as usize % 4];
        let cell = &mut self.grid[cy][cx];
        let code = cell.0 as u32;
        // Merge with dots already in this cell; the newest colour wins.
        let bits = if (BRAILLE_BASE..BRAILLE_BASE + 0x100).contains(&code) {
            (code - BRAILLE_BASE) as u8 | bit
        } else {
            bit
        };
        let ch = char::from_u32(BRAILLE_BASE + bits as u32).unwrap_or(' ');
        *cell = (ch, Style::default().fg(fg).bg(self.background));
    }

    fn stroke(&mut self, from: Vector2, to: Vector2, fg: Color) {
        for (x, y) in segment(self.to_dots(from), self.to_dots(to)) {
            self.set_dot(x, y, fg);
        }
    }

    fn stars(&mut self) {
        let bg = self.background;
        for (yi, row) in self.grid.iter_mut().enumerate() {
            for (xi, cell) in row.iter_mut().enumerate() {
                let hash = ((xi * 7 + yi * 13 + 37) * 31) % 250;
                if hash < 2 {
                    let b = 35 + (hash as u8) * 15;
                    *cell = ('.', Style::default().fg(Color::Rgb(b, b, b + 8)).bg(bg));
                }
            }
        }
    }
}

impl Renderer for BrailleCanvas {
    fn draw_circle(&mut self, center: Vector2, radius: f64, rgb: Rgb, width: f64) {
        let fg = color(rgb);
        let (cx, cy) = self.to_dots(center);
        let (bw, _) = self.dot_size();
        let r = (radius / self.world.width * bw as f64).round() as i32;
        if r <= 1 {
            self.set_dot(cx, cy, fg);
            return;
        }
        if width <= 0.0 {
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy <= r * r {
                        self.set_dot(cx + dx, cy + dy, fg);
                    }
                }
            }
            return;
        }
        let steps = ((r as f64) * std::f64::consts::TAU).ceil().max(8.0) as usize;
        for i in 0..steps {
            let a = i as f64 / steps as f64 * std::f64::consts::TAU;
            let x = cx + (a.cos() * r as f64).round() as i32;
            let y = cy + (a.sin() * r as f64).round() as i32;
            self.set_dot(x, y, fg);
        }
    }

    fn draw_polygon(&mut self, points: &[Vector2], rgb: Rgb, _width: f64) {
        let fg = color(rgb);
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.stroke(from, to, fg);
        }
    }

    fn draw_text(&mut self, text: &str, position: Vector2, align: Align, font_size: f64, rgb: Rgb) {
        let (mut col, row) = self.to_cell(position);
        if row < 0 || row as usize >= self.height {
            return;
        }
        let len = text.chars().count() as i32;
        if align == Align::Center {
            col -= len / 2;
        }
        let mut style = Style::default().fg(color(rgb)).bg(self.background);
        if font_size >= BOLD_FONT_SIZE {
            style = style.add_modifier(Modifier::BOLD);
        }
        for (i, ch) in text.chars().enumerate() {
            let x = col + i as i32;
            if x >= 0 && (x as usize) < self.width {
                self.grid[row as usize][x as usize] = (ch, style);
            }
        }
    }

    fn clear(&mut self, rgb: Rgb) {
        if rgb != Rgb::BLACK {
            self.background = color(rgb);
        }
        let blank = (' ', Style::default().bg(self.background));
        for row in &mut self.grid {
            row.fill(blank);
        }
        self.stars();
    }

    fn present(&mut self) {
        self.frame = self
            .grid
            .iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .iter()
                    .map(|&(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect();
    }
}
