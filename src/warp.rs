//! The warp tunnel: a fixed pool of stars flying at the viewer.
//!
//! Speeds are in depth units per frame. Nothing here looks at wall-clock time;
//! the frame loop decides how often [`WarpField::frame`] runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::controls::Controls;
use crate::surface::{ColorStop, Point, RadialGradient, Rgb, Rgba, Surface};

pub const STAR_COUNT: usize = 800;
pub const WARP_SPEED: f32 = 15.0;

const CRUISE_LERP: f32 = 0.02;
const WARP_LERP: f32 = 0.04;
const CRUISE_FADE: f32 = 0.15;
const WARP_FADE: f32 = 0.08;
const FOCAL: f32 = 0.3;
// streaks shorter than this (in pixels) are not stroked
const MIN_STREAK: f32 = 0.5;

pub const PALETTE: [Rgb; 6] = [
    Rgb::new(100, 180, 255), // light blue
    Rgb::new(140, 120, 255), // purple
    Rgb::new(80, 200, 255),  // cyan
    Rgb::new(180, 140, 255), // lavender
    Rgb::new(60, 160, 255),  // deep blue
    Rgb::new(200, 180, 255), // soft purple
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub prev_z: f32,
    /// Index into [`PALETTE`].
    pub color: usize,
}

impl Star {
    fn spawn(rng: &mut impl Rng, width: f32, height: f32) -> Self {
        let z = rng.gen::<f32>() * width;
        Self {
            x: (rng.gen::<f32>() - 0.5) * width * 2.0,
            y: (rng.gen::<f32>() - 0.5) * height * 2.0,
            z,
            prev_z: z,
            color: rng.gen_range(0..PALETTE.len()),
        }
    }

    fn recycle(&mut self, rng: &mut impl Rng, width: f32, height: f32) {
        self.x = (rng.gen::<f32>() - 0.5) * width * 2.0;
        self.y = (rng.gen::<f32>() - 0.5) * height * 2.0;
        self.z = width;
        self.prev_z = width;
        self.color = rng.gen_range(0..PALETTE.len());
    }

    pub fn rgb(&self) -> Rgb {
        PALETTE[self.color % PALETTE.len()]
    }
}

/// Perspective divide onto a `width` x `height` surface centered on its middle.
pub fn project(x: f32, y: f32, z: f32, width: f32, height: f32) -> Point {
    Point::new(
        (x / z) * width * FOCAL + width * 0.5,
        (y / z) * height * FOCAL + height * 0.5,
    )
}

pub fn star_size(z: f32, width: f32) -> f32 {
    ((1.0 - z / width) * 3.0).max(0.5)
}

pub fn star_alpha(z: f32, width: f32) -> f32 {
    ((1.0 - z / width) * 1.5).min(1.0)
}

/// Exponential ease of the actual speed toward a target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Throttle {
    current: f32,
}

impl Throttle {
    pub fn new(current: f32) -> Self {
        Self { current }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn step(&mut self, target: f32, lerp: f32) -> f32 {
        self.current += (target - self.current) * lerp;
        self.current
    }
}

#[derive(Clone, Copy, Debug)]
pub struct WarpConfig {
    pub speed: f32,
    pub accelerating: bool,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            accelerating: false,
            seed: None,
        }
    }
}

pub struct WarpField<S: Surface> {
    surface: S,
    stars: Vec<Star>,
    throttle: Throttle,
    controls: Controls,
    rng: StdRng,
    frames: u64,
}

impl<S: Surface> WarpField<S> {
    pub fn new(surface: S, config: WarpConfig) -> Self {
        let controls = Controls::new(config.speed, config.accelerating);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut field = Self {
            surface,
            stars: Vec::new(),
            throttle: Throttle::new(controls.speed()),
            controls,
            rng,
            frames: 0,
        };
        field.seed_if_empty();
        field
    }

    pub fn controls(&self) -> Controls {
        self.controls.clone()
    }

    pub fn set_accelerating(&self, on: bool) -> bool {
        self.controls.set_accelerating(on)
    }

    pub fn set_speed(&self, speed: f32) {
        self.controls.set_speed(speed);
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn current_speed(&self) -> f32 {
        self.throttle.current()
    }

    pub fn target_speed(&self) -> f32 {
        target_for(&self.controls, self.controls.accelerating())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Matches the surface to a new viewport. An existing pool is kept as-is,
    /// so the field rescales with the next projection instead of restarting.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        debug!(width, height, stars = self.stars.len(), "warp surface resized");
        self.seed_if_empty();
    }

    fn seed_if_empty(&mut self) {
        if !self.stars.is_empty() || !self.surface.is_drawable() {
            return;
        }
        let w = self.surface.width() as f32;
        let h = self.surface.height() as f32;
        self.stars.reserve_exact(STAR_COUNT);
        for _ in 0..STAR_COUNT {
            self.stars.push(Star::spawn(&mut self.rng, w, h));
        }
        info!(count = STAR_COUNT, width = w, height = h, "star pool seeded");
    }

    /// Advances and redraws one frame. Returns `false` without touching
    /// anything when there is no surface to draw on yet.
    pub fn frame(&mut self) -> bool {
        if !self.surface.is_drawable() {
            return false;
        }

        // one read of the flag so target and lerp always agree
        let accelerating = self.controls.accelerating();
        let target = target_for(&self.controls, accelerating);
        let lerp = if accelerating { WARP_LERP } else { CRUISE_LERP };
        let speed = self.throttle.step(target, lerp);

        let Self {
            surface,
            stars,
            rng,
            ..
        } = self;
        let w = surface.width() as f32;
        let h = surface.height() as f32;
        let center = Point::new(w * 0.5, h * 0.5);

        let fade = if accelerating { WARP_FADE } else { CRUISE_FADE };
        surface.fill(Rgba::new(0, 0, 0, fade));

        let stops = [
            ColorStop::new(0.0, Rgba::new(80, 140, 255, 0.03 + speed * 0.005)),
            ColorStop::new(0.5, Rgba::new(100, 80, 200, 0.02 + speed * 0.003)),
            ColorStop::new(1.0, Rgba::TRANSPARENT),
        ];
        surface.fill_radial_gradient(&RadialGradient {
            center,
            radius: 150.0 + speed * 10.0,
            stops: &stops,
        });

        for star in stars.iter_mut() {
            star.prev_z = star.z;
            star.z -= speed * 2.0;
            if star.z <= 0.0 {
                star.recycle(rng, w, h);
            }

            let now = project(star.x, star.y, star.z, w, h);
            let before = project(star.x, star.y, star.prev_z, w, h);
            let size = star_size(star.z, w);
            let color = star.rgb().with_alpha(star_alpha(star.z, w));

            if now.distance(before) > MIN_STREAK {
                surface.stroke_line(before, now, size, color);
            }
            surface.fill_circle(now, size * 0.8, color);
        }

        self.frames += 1;
        true
    }

    /// Tears the field down and hands the surface back.
    pub fn dispose(self) -> S {
        debug!(frames = self.frames, "warp field disposed");
        self.surface
    }
}

fn target_for(controls: &Controls, accelerating: bool) -> f32 {
    if accelerating {
        WARP_SPEED
    } else {
        controls.speed()
    }
}
