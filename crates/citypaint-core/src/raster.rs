//! Raster paint buffer for a single wall.
//!
//! Mirrors the small slice of 2D canvas behaviour the drawing protocol
//! needs: an open path that can be moved, extended and stroked, plus filled
//! dots for relayed point events. Stroking re-rasterizes the whole open
//! path, so repeated strokes over the same path are idempotent.

use kurbo::Point;

/// Stroke thickness in pixels (square brush).
pub const LINE_WIDTH: u32 = 2;

/// Radius of the dot painted for relayed point events.
pub const DOT_RADIUS: f64 = 2.0;

/// Opaque white, the background every wall starts from.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// A mutable RGBA pixel buffer with an open-path cursor.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    stroke_color: [u8; 4],
    /// Points of the current open path; first entry is the subpath start.
    path: Vec<Point>,
}

impl Raster {
    /// Create a white buffer of the given size with a black stroke color.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; (width as usize) * (height as usize) * 4];
        for px in pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&WHITE);
        }
        Self {
            width,
            height,
            pixels,
            stroke_color: [0, 0, 0, 255],
            path: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set the color used by [`stroke`](Self::stroke) and
    /// [`fill_circle`](Self::fill_circle).
    pub fn set_stroke_color(&mut self, color: [u8; 4]) {
        self.stroke_color = color;
    }

    pub fn stroke_color(&self) -> [u8; 4] {
        self.stroke_color
    }

    /// Discard the current open path.
    pub fn begin_path(&mut self) {
        self.path.clear();
    }

    /// Start a new subpath at `p`.
    pub fn move_to(&mut self, p: Point) {
        self.path.clear();
        self.path.push(p);
    }

    /// Extend the open path to `p`. With no open subpath this behaves like
    /// `move_to`, matching 2D canvas semantics.
    pub fn line_to(&mut self, p: Point) {
        self.path.push(p);
    }

    /// Rasterize every segment of the open path with the stroke color.
    pub fn stroke(&mut self) {
        for i in 1..self.path.len() {
            let (a, b) = (self.path[i - 1], self.path[i]);
            self.draw_segment(a, b);
        }
    }

    /// Paint a filled circle at `center`. Leaves the open path untouched,
    /// so a later line continuation resumes from the last path point.
    pub fn fill_circle(&mut self, center: Point, radius: f64) {
        let r = radius.max(0.0);
        let x0 = (center.x - r).floor() as i64;
        let x1 = (center.x + r).ceil() as i64;
        let y0 = (center.y - r).floor() as i64;
        let y1 = (center.y + r).ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                if dx * dx + dy * dy <= r * r {
                    self.put(x, y);
                }
            }
        }
    }

    /// Points of the current open path, oldest first.
    pub fn path_points(&self) -> &[Point] {
        &self.path
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(px)
    }

    /// Raw RGBA bytes, row-major, for texture upload.
    pub fn bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Bresenham over the segment, stamping a `LINE_WIDTH` square brush.
    fn draw_segment(&mut self, a: Point, b: Point) {
        let mut x = a.x.round() as i64;
        let mut y = a.y.round() as i64;
        let x_end = b.x.round() as i64;
        let y_end = b.y.round() as i64;
        let dx = (x_end - x).abs();
        let dy = -(y_end - y).abs();
        let sx = if x < x_end { 1 } else { -1 };
        let sy = if y < y_end { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.stamp(x, y);
            if x == x_end && y == y_end {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn stamp(&mut self, x: i64, y: i64) {
        for oy in 0..LINE_WIDTH as i64 {
            for ox in 0..LINE_WIDTH as i64 {
                self.put(x + ox, y + oy);
            }
        }
    }

    fn put(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&self.stroke_color);
    }
}

/// Fully saturated, half-lightness color for a hue in degrees, the palette
/// the walls pick their stroke color from.
pub fn color_from_hue(hue: f64) -> [u8; 4] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = 1.0 - (h.rem_euclid(2.0) - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    [
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
        255,
    ]
}
