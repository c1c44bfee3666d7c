//! Drawing surfaces the warp field paints onto.
//!
//! `PixelCanvas` is a small software rasterizer: linear `f32` RGB over an
//! opaque black background, source-over blending, anti-aliased lines and
//! circles. The terminal front end turns it into braille cells.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }
}

/// Color with a straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        // NaN alpha draws nothing
        let a = if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) };
        Self { r, g, b, a }
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| -> u8 {
            (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
        };
        Rgba::new(
            ch(self.r, other.r),
            ch(self.g, other.g),
            ch(self.b, other.b),
            self.a + (other.a - self.a) * t,
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Circular gradient from `center` out to `radius`. Stops must be sorted by
/// offset; past the last stop the last color holds.
#[derive(Clone, Copy, Debug)]
pub struct RadialGradient<'a> {
    pub center: Point,
    pub radius: f32,
    pub stops: &'a [ColorStop],
}

impl RadialGradient<'_> {
    pub fn color_at(&self, distance: f32) -> Rgba {
        let Some(first) = self.stops.first() else {
            return Rgba::TRANSPARENT;
        };
        let t = if self.radius > 0.0 {
            distance / self.radius
        } else {
            1.0
        };
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let k = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
                return a.color.lerp(b.color, k);
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

/// Render target for the warp field.
///
/// A zero-sized surface counts as "not acquired": callers skip drawing until a
/// resize gives it an extent.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Changes the extent. Implementations may discard their contents.
    fn resize(&mut self, width: u32, height: u32);

    /// Paints `color` over the whole surface.
    fn fill(&mut self, color: Rgba);

    /// Paints the gradient over the whole surface.
    fn fill_radial_gradient(&mut self, gradient: &RadialGradient<'_>);

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba);

    fn is_drawable(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pixel {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Pixel {
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    pub fn to_rgb(self) -> Rgb {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        Rgb::new(q(self.r), q(self.g), q(self.b))
    }
}

pub struct PixelCanvas {
    w: u32,
    h: u32,
    px: Vec<Pixel>,
}

impl PixelCanvas {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
        }
    }

    pub fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.w || y >= self.h {
            return None;
        }
        Some(self.px[self.idx(x, y)])
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.px
    }

    pub fn clear(&mut self) {
        self.px.fill(Pixel::default());
    }

    fn blend_over(&mut self, x: u32, y: u32, src: Rgba, coverage: f32) {
        let sa = src.a * coverage;
        if sa <= 0.0 {
            return;
        }
        let i = self.idx(x, y);
        let dst = &mut self.px[i];
        let mix = |sc: u8, dc: f32| -> f32 { (sc as f32 / 255.0) * sa + dc * (1.0 - sa) };
        dst.r = mix(src.r, dst.r);
        dst.g = mix(src.g, dst.g);
        dst.b = mix(src.b, dst.b);
    }

    // Pixel-index box covering [x0, x1] x [y0, y1], or None when off-canvas.
    fn clip(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<(u32, u32, u32, u32)> {
        if self.w == 0 || self.h == 0 {
            return None;
        }
        let max_x = (self.w - 1) as f32;
        let max_y = (self.h - 1) as f32;
        if x1 < 0.0 || y1 < 0.0 || x0 > max_x || y0 > max_y {
            return None;
        }
        Some((
            x0.max(0.0).floor() as u32,
            y0.max(0.0).floor() as u32,
            x1.min(max_x).ceil() as u32,
            y1.min(max_y).ceil() as u32,
        ))
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance(Point::new(a.x + dx * t, a.y + dy * t))
}

impl Surface for PixelCanvas {
    fn width(&self) -> u32 {
        self.w
    }

    fn height(&self) -> u32 {
        self.h
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == self.w && height == self.h {
            return;
        }
        *self = PixelCanvas::new(width, height);
    }

    fn fill(&mut self, color: Rgba) {
        if color.a <= 0.0 {
            return;
        }
        for y in 0..self.h {
            for x in 0..self.w {
                self.blend_over(x, y, color, 1.0);
            }
        }
    }

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient<'_>) {
        if !gradient.center.is_finite() || !gradient.radius.is_finite() {
            return;
        }
        for y in 0..self.h {
            for x in 0..self.w {
                let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                let color = gradient.color_at(p.distance(gradient.center));
                self.blend_over(x, y, color, 1.0);
            }
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        if !from.is_finite() || !to.is_finite() || !(width > 0.0) {
            return;
        }
        let half = (width * 0.5).max(0.5);
        let pad = half + 1.0;
        let Some((x0, y0, x1, y1)) = self.clip(
            from.x.min(to.x) - pad,
            from.y.min(to.y) - pad,
            from.x.max(to.x) + pad,
            from.y.max(to.y) + pad,
        ) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (half + 0.5 - distance_to_segment(p, from, to)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_over(x, y, color, coverage);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        if !center.is_finite() || !(radius > 0.0) {
            return;
        }
        let pad = radius + 1.0;
        let Some((x0, y0, x1, y1)) = self.clip(
            center.x - pad,
            center.y - pad,
            center.x + pad,
            center.y + pad,
        ) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_over(x, y, color, coverage);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = Rgba {
        r: 255,
        g: 255,
        b: 255,
        a: 1.0,
    };

    fn lit(canvas: &PixelCanvas) -> usize {
        canvas.pixels().iter().filter(|p| p.luminance() > 0.0).count()
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(Rgba::new(1, 2, 3, 4.0).a, 1.0);
        assert_eq!(Rgba::new(1, 2, 3, -0.5).a, 0.0);
        assert_eq!(Rgba::new(1, 2, 3, f32::NAN).a, 0.0);
    }

    #[test]
    fn circle_lights_its_center_pixel() {
        let mut canvas = PixelCanvas::new(10, 10);
        canvas.fill_circle(Point::new(5.5, 5.5), 0.4, WHITE);
        let p = canvas.pixel(5, 5).unwrap();
        assert!(p.r > 0.85, "center pixel should be nearly white, got {p:?}");
        assert_eq!(canvas.pixel(0, 0).unwrap(), Pixel::default());
    }

    #[test]
    fn fade_scales_existing_light() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.fill(WHITE);
        canvas.fill(Rgba::new(0, 0, 0, 0.15));
        for p in canvas.pixels() {
            assert!((p.r - 0.85).abs() < 1e-5);
        }
    }

    #[test]
    fn line_covers_pixels_between_endpoints() {
        let mut canvas = PixelCanvas::new(20, 5);
        canvas.stroke_line(Point::new(2.5, 2.5), Point::new(17.5, 2.5), 1.0, WHITE);
        for x in 3..17 {
            assert!(canvas.pixel(x, 2).unwrap().r > 0.9, "pixel {x} not lit");
        }
        assert_eq!(canvas.pixel(10, 0).unwrap(), Pixel::default());
    }

    #[test]
    fn non_finite_shapes_draw_nothing() {
        let mut canvas = PixelCanvas::new(8, 8);
        canvas.stroke_line(Point::new(f32::INFINITY, 1.0), Point::new(2.0, 2.0), 1.0, WHITE);
        canvas.fill_circle(Point::new(f32::NAN, 3.0), 2.0, WHITE);
        assert_eq!(lit(&canvas), 0);
    }

    #[test]
    fn far_off_canvas_shapes_are_clipped() {
        let mut canvas = PixelCanvas::new(8, 8);
        canvas.fill_circle(Point::new(-1.0e6, 3.0), 2.0, WHITE);
        canvas.stroke_line(Point::new(100.0, 100.0), Point::new(1.0e7, 1.0e7), 3.0, WHITE);
        assert_eq!(lit(&canvas), 0);
    }

    #[test]
    fn gradient_interpolates_and_holds_last_stop() {
        let stops = [
            ColorStop::new(0.0, Rgba::new(200, 0, 0, 1.0)),
            ColorStop::new(0.5, Rgba::new(100, 0, 0, 0.5)),
            ColorStop::new(1.0, Rgba::TRANSPARENT),
        ];
        let g = RadialGradient {
            center: Point::new(0.0, 0.0),
            radius: 100.0,
            stops: &stops,
        };
        assert_eq!(g.color_at(0.0), stops[0].color);
        let quarter = g.color_at(25.0);
        assert_eq!(quarter.r, 150);
        assert!((quarter.a - 0.75).abs() < 1e-6);
        assert_eq!(g.color_at(100.0), Rgba::TRANSPARENT);
        assert_eq!(g.color_at(5000.0), Rgba::TRANSPARENT);
    }

    #[test]
    fn resize_changes_extent_and_clears() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.fill(WHITE);
        canvas.resize(6, 3);
        assert_eq!((canvas.width(), canvas.height()), (6, 3));
        assert_eq!(canvas.pixels().len(), 18);
        assert_eq!(lit(&canvas), 0);

        canvas.resize(0, 3);
        assert!(!canvas.is_drawable());
    }
}
