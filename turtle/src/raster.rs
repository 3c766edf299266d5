// turtle/src/raster.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An in-memory RGBA drawing surface.
//!
//! Marks go to an ink layer that sits on top of a solid background, the way a
//! canvas sits on top of its element's background color. `clear` wipes the ink
//! and leaves the background alone.
//!
//! Coverage is binary: a pixel is painted when its center falls inside the
//! shape.

use crate::color::{Color, ColorU};
use crate::command::{Font, Point};
use crate::font::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::surface::{Surface, SurfaceConfig};
use image::{ImageResult, Rgba, RgbaImage};
use std::cmp::Ordering;
use std::path::Path;
use uturtle::ast::Align;

/// Largest pixel multiple a bitmap glyph is drawn at.
const MAX_TEXT_SCALE: i64 = 64;

pub struct RasterSurface {
    background: ColorU,
    ink: RgbaImage,
}

impl RasterSurface {
    pub fn new(config: &SurfaceConfig) -> RasterSurface {
        RasterSurface {
            background: resolve(&config.background),
            ink: RgbaImage::new(config.width, config.height),
        }
    }

    pub fn background(&self) -> ColorU {
        self.background
    }

    /// The visible color at a pixel: ink composited over the background.
    pub fn pixel(&self, x: u32, y: u32) -> ColorU {
        let Rgba([r, g, b, a]) = *self.ink.get_pixel(x, y);
        over(ColorU::new(r, g, b, a), self.background)
    }

    /// Flattens ink and background into one image.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.ink.width(), self.ink.height(), |x, y| {
            let ColorU { r, g, b, a } = self.pixel(x, y);
            Rgba([r, g, b, a])
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_image().save(path)
    }

    fn blend(&mut self, x: i64, y: i64, color: ColorU) {
        if x < 0 || y < 0 || x >= self.ink.width() as i64 || y >= self.ink.height() as i64 {
            return;
        }
        let pixel = self.ink.get_pixel_mut(x as u32, y as u32);
        let Rgba([r, g, b, a]) = *pixel;
        let ColorU { r, g, b, a } = over(color, ColorU::new(r, g, b, a));
        *pixel = Rgba([r, g, b, a]);
    }

    /// Pixel rows whose centers lie in `[top, bottom]`, clamped to the image.
    fn rows(&self, top: f64, bottom: f64) -> (i64, i64) {
        let first = (top - 0.5).ceil().max(0.0) as i64;
        let last = (bottom - 0.5).floor().min(self.ink.height() as f64 - 1.0) as i64;
        (first, last)
    }

    fn columns(&self, left: f64, right: f64) -> (i64, i64) {
        let first = (left - 0.5).ceil().max(0.0) as i64;
        let last = (right - 0.5).floor().min(self.ink.width() as f64 - 1.0) as i64;
        (first, last)
    }

    /// Paints every pixel whose center satisfies `inside`.
    fn fill_where<F>(&mut self, bounds: (f64, f64, f64, f64), color: ColorU, inside: F)
    where
        F: Fn(f64, f64) -> bool,
    {
        let (left, top, right, bottom) = bounds;
        let (y0, y1) = self.rows(top, bottom);
        let (x0, x1) = self.columns(left, right);
        for py in y0..=y1 {
            for px in x0..=x1 {
                if inside(px as f64 + 0.5, py as f64 + 0.5) {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn line(&mut self, from: Point, to: Point, color: ColorU, width: f64) {
        let half = width.max(1.0) / 2.0;
        let bounds = (
            from.0.min(to.0) - half,
            from.1.min(to.1) - half,
            from.0.max(to.0) + half,
            from.1.max(to.1) + half,
        );
        self.fill_where(bounds, color, |x, y| {
            distance_to_segment((x, y), from, to) <= half
        });
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.ink.dimensions()
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: &Color, width: f64) {
        self.line(from, to, resolve(color), width);
    }

    fn fill_circle(&mut self, (cx, cy): Point, radius: f64, color: &Color) {
        let radius = radius.abs();
        let bounds = (cx - radius, cy - radius, cx + radius, cy + radius);
        self.fill_where(bounds, resolve(color), |x, y| {
            (x - cx) * (x - cx) + (y - cy) * (y - cy) <= radius * radius
        });
    }

    /// Scanline fill with the nonzero winding rule.
    fn fill_polygon(&mut self, points: &[Point], color: &Color) {
        if points.len() < 3 {
            return;
        }
        let color = resolve(color);
        let top = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let bottom = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let (y0, y1) = self.rows(top, bottom);

        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for py in y0..=y1 {
            let y = py as f64 + 0.5;
            crossings.clear();
            for (i, &(x1, y1)) in points.iter().enumerate() {
                let (x2, y2) = points[(i + 1) % points.len()];
                let winding = if y1 <= y && y < y2 {
                    1
                } else if y2 <= y && y < y1 {
                    -1
                } else {
                    continue;
                };
                crossings.push((x1 + (y - y1) * (x2 - x1) / (y2 - y1), winding));
            }
            crossings.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let (x0, x1) = self.columns(pair[0].0, pair[1].0);
                for px in x0..=x1 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[Point], color: &Color, width: f64) {
        let color = resolve(color);
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.line(from, to, color, width);
        }
    }

    fn fill_text(&mut self, (x, y): Point, text: &str, font: &Font, color: &Color, align: Align) {
        let color = resolve(color);
        let scale = (font.size / 8.0).round().max(1.0).min(MAX_TEXT_SCALE as f64) as i64;
        let advance = ADVANCE as i64 * scale;
        let chars = text.chars().count() as i64;
        let width = if chars == 0 {
            0
        } else {
            chars.saturating_mul(advance).saturating_sub(scale)
        };
        let left = match align {
            Align::Left => x.round() as i64,
            Align::Center => (x - width as f64 / 2.0).round() as i64,
            Align::Right => (x.round() as i64).saturating_sub(width),
        };
        let top = (y.round() as i64).saturating_sub(GLYPH_HEIGHT as i64 * scale);

        for (index, c) in text.chars().enumerate() {
            let origin_x = left.saturating_add((index as i64).saturating_mul(advance));
            if origin_x >= self.ink.width() as i64 {
                break;
            }
            for (column, &bits) in font::glyph(c).iter().enumerate().take(GLYPH_WIDTH as usize) {
                for row in 0..GLYPH_HEIGHT as i64 {
                    if bits & (1u8 << row) == 0 {
                        continue;
                    }
                    for dy in 0..scale {
                        for dx in 0..scale {
                            self.blend(
                                origin_x.saturating_add(column as i64 * scale + dx),
                                top.saturating_add(row * scale + dy),
                                color,
                            );
                        }
                    }
                }
            }
        }
    }

    fn clear(&mut self) {
        for pixel in self.ink.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn set_background(&mut self, color: &Color) {
        self.background = resolve(color);
    }
}

fn resolve(color: &Color) -> ColorU {
    color.to_color_u().unwrap_or_else(|| {
        warn!("unrecognized color `{}`, using black", color);
        ColorU::BLACK
    })
}

/// Source-over compositing.
fn over(src: ColorU, dst: ColorU) -> ColorU {
    match src.a {
        255 => src,
        0 => dst,
        _ => {
            let sa = src.a as f64 / 255.0;
            let da = dst.a as f64 / 255.0;
            let a = sa + da * (1.0 - sa);
            let channel = |s: u8, d: u8| {
                ((s as f64 * sa + d as f64 * da * (1.0 - sa)) / a).round() as u8
            };
            ColorU::new(
                channel(src.r, dst.r),
                channel(src.g, dst.g),
                channel(src.b, dst.b),
                (a * 255.0).round() as u8,
            )
        }
    }
}

fn distance_to_segment((px, py): Point, (ax, ay): Point, (bx, by): Point) -> f64 {
    let (dx, dy) = (bx - ax, by - ay);
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / length_sq).max(0.0).min(1.0)
    };
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    (px - cx).hypot(py - cy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> RasterSurface {
        RasterSurface::new(&SurfaceConfig {
            width: 40,
            height: 30,
            background: Color::from_named("white"),
        })
    }

    fn red() -> Color {
        Color::from_named("red")
    }

    #[test]
    fn test_background() {
        let mut s = surface();
        assert_eq!(s.pixel(0, 0), ColorU::WHITE);
        s.set_background(&Color::from_named("navy"));
        assert_eq!(s.pixel(39, 29), ColorU::rgb(0, 0, 128));
    }

    #[test]
    fn test_line_round_caps() {
        let mut s = surface();
        s.stroke_line((10.0, 10.0), (30.0, 10.0), &red(), 4.0);
        assert_eq!(s.pixel(20, 10), ColorU::rgb(255, 0, 0));
        assert_eq!(s.pixel(20, 8), ColorU::rgb(255, 0, 0));
        // Caps extend past the endpoints by half the width.
        assert_eq!(s.pixel(8, 10), ColorU::rgb(255, 0, 0));
        assert_eq!(s.pixel(5, 10), ColorU::WHITE);
        assert_eq!(s.pixel(20, 14), ColorU::WHITE);
    }

    #[test]
    fn test_fill_polygon() {
        let mut s = surface();
        s.fill_polygon(&[(5.0, 5.0), (25.0, 5.0), (25.0, 25.0), (5.0, 25.0)], &red());
        assert_eq!(s.pixel(15, 15), ColorU::rgb(255, 0, 0));
        assert_eq!(s.pixel(5, 5), ColorU::rgb(255, 0, 0));
        assert_eq!(s.pixel(24, 24), ColorU::rgb(255, 0, 0));
        assert_eq!(s.pixel(25, 15), ColorU::WHITE);
        assert_eq!(s.pixel(4, 15), ColorU::WHITE);

        // Degenerate polygons draw nothing.
        let mut s = surface();
        s.fill_polygon(&[(5.0, 5.0), (25.0, 5.0)], &red());
        assert_eq!(s.to_image().pixels().filter(|p| p.0 != [255, 255, 255, 255]).count(), 0);
    }

    #[test]
    fn test_fill_circle_and_clear() {
        let mut s = surface();
        s.fill_circle((20.0, 15.0), 5.0, &Color::from_named("#0000ff"));
        assert_eq!(s.pixel(20, 15), ColorU::rgb(0, 0, 255));
        assert_eq!(s.pixel(20, 11), ColorU::rgb(0, 0, 255));
        assert_eq!(s.pixel(27, 15), ColorU::WHITE);

        s.set_background(&Color::from_named("yellow"));
        s.clear();
        assert_eq!(s.pixel(20, 15), ColorU::rgb(255, 255, 0));
    }

    #[test]
    fn test_text() {
        let mut s = surface();
        let font = Font::default();
        s.fill_text((2.0, 20.0), "I", &font, &red(), Align::Left);
        // `I` has a full-height stem in its middle column; 12px text draws at 2x.
        assert_eq!(s.pixel(6, 19), ColorU::rgb(255, 0, 0));
        assert_eq!(s.pixel(6, 6), ColorU::rgb(255, 0, 0));
        assert_eq!(s.pixel(6, 21), ColorU::WHITE);

        let mut s = surface();
        s.fill_text((38.0, 20.0), "I", &font, &red(), Align::Right);
        // Ten pixels wide, so the stem lands at x = 28 + 4.
        assert_eq!(s.pixel(32, 12), ColorU::rgb(255, 0, 0));
        assert_eq!(s.pixel(38, 12), ColorU::WHITE);
    }

    #[test]
    fn test_text_scale_is_bounded() {
        let mut s = surface();
        let font = Font {
            size: 1e300,
            ..Font::default()
        };
        s.fill_text((20.0, 29.0), "I", &font, &red(), Align::Center);
        // The stem, 64 pixels wide, covers the whole middle of the surface.
        assert_eq!(s.pixel(20, 15), ColorU::rgb(255, 0, 0));

        let mut s = surface();
        s.fill_text((1e300, -1e300), "far away", &font, &red(), Align::Right);
        s.fill_text((-1e300, 1e300), "far away", &font, &red(), Align::Left);
        assert_eq!(s.pixel(20, 15), ColorU::WHITE);
    }

    #[test]
    fn test_unknown_color_draws_black() {
        let mut s = surface();
        s.fill_circle((20.0, 15.0), 3.0, &Color::from_named("not-a-color"));
        assert_eq!(s.pixel(20, 15), ColorU::BLACK);
    }

    #[test]
    fn test_translucent_ink() {
        let mut s = surface();
        s.fill_circle((20.0, 15.0), 3.0, &Color::from_named("rgba(0,0,0,0.5)"));
        assert_eq!(s.pixel(20, 15), ColorU::rgb(127, 127, 127));
    }
}
