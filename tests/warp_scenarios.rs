use warpfield::warp::project;
use warpfield::{
    PixelCanvas, Point, RadialGradient, Rgba, Surface, WarpConfig, WarpField, STAR_COUNT,
    WARP_SPEED,
};

/// Keeps the star positions of the latest frame, nothing else.
#[derive(Default)]
struct PointLog {
    w: u32,
    h: u32,
    points: Vec<Point>,
}

impl Surface for PointLog {
    fn width(&self) -> u32 {
        self.w
    }
    fn height(&self) -> u32 {
        self.h
    }
    fn resize(&mut self, width: u32, height: u32) {
        self.w = width;
        self.h = height;
    }
    fn fill(&mut self, _color: Rgba) {
        self.points.clear();
    }
    fn fill_radial_gradient(&mut self, _gradient: &RadialGradient<'_>) {}
    fn stroke_line(&mut self, _from: Point, _to: Point, _width: f32, _color: Rgba) {}
    fn fill_circle(&mut self, center: Point, _radius: f32, _color: Rgba) {
        self.points.push(center);
    }
}

fn field(accelerating: bool) -> WarpField<PointLog> {
    WarpField::new(
        PointLog {
            w: 1000,
            h: 800,
            ..PointLog::default()
        },
        WarpConfig {
            speed: 1.0,
            accelerating,
            seed: Some(42),
        },
    )
}

#[test]
fn cruising_stays_in_bounds_and_settles() {
    let mut f = field(false);
    assert_eq!(f.stars().len(), STAR_COUNT);

    for _ in 0..100 {
        assert!(f.frame());
        for s in f.stars() {
            assert!(s.z >= 0.0 && s.z <= 1000.0, "depth out of bounds: {}", s.z);
        }
    }

    assert_eq!(f.stars().len(), STAR_COUNT);
    assert_eq!(f.surface().points.len(), STAR_COUNT);
    assert!((f.current_speed() - 1.0).abs() < 0.05);
}

#[test]
fn engaging_warp_surges_within_a_second() {
    let mut f = field(false);
    f.set_accelerating(true);
    assert_eq!(f.target_speed(), WARP_SPEED);

    let mut last = f.current_speed();
    for _ in 0..60 {
        f.frame();
        assert!(f.current_speed() > last);
        last = f.current_speed();
    }
    assert!(f.current_speed() > 10.0, "got {}", f.current_speed());
    assert!(f.current_speed() < WARP_SPEED);
}

#[test]
fn dropping_out_of_warp_eases_back_down() {
    let mut f = field(true);
    for _ in 0..120 {
        f.frame();
    }
    let peak = f.current_speed();
    f.set_accelerating(false);
    f.frame();
    assert!(f.current_speed() < peak);
    assert!(f.current_speed() > 1.0);
}

#[test]
fn resize_keeps_the_pool_and_rescales_projection() {
    let mut f = field(false);
    for _ in 0..10 {
        f.frame();
    }
    let before: Vec<_> = f.stars().to_vec();

    f.resize(500, 400);
    assert_eq!(f.stars(), &before[..]);

    f.frame();
    assert_eq!(f.stars().len(), STAR_COUNT);
    for (star, drawn) in f.stars().iter().zip(&f.surface().points) {
        assert_eq!(*drawn, project(star.x, star.y, star.z, 500.0, 400.0));
    }
}

#[test]
fn zero_sized_viewport_pauses_then_recovers() {
    let mut f = WarpField::new(PixelCanvas::new(0, 0), WarpConfig::default());
    assert!(!f.frame());
    assert!(f.stars().is_empty());

    f.resize(64, 48);
    assert_eq!(f.stars().len(), STAR_COUNT);
    assert!(f.frame());

    f.resize(0, 0);
    assert!(!f.frame());
    assert_eq!(f.stars().len(), STAR_COUNT);
}

#[test]
fn canvas_shows_stars_after_a_few_frames() {
    let mut f = WarpField::new(
        PixelCanvas::new(160, 96),
        WarpConfig {
            speed: 1.5,
            accelerating: false,
            seed: Some(3),
        },
    );
    for _ in 0..30 {
        f.frame();
    }
    let canvas = f.dispose();
    let bright = canvas
        .pixels()
        .iter()
        .filter(|p| p.luminance() > 0.1)
        .count();
    assert!(bright > 0, "expected some lit pixels");
}

#[test]
fn controls_handle_reaches_the_next_frame() {
    let mut f = field(false);
    let remote = f.controls();
    f.frame();
    remote.set_accelerating(true);
    f.frame();
    let expected = 1.0 + (WARP_SPEED - 1.0) * 0.04;
    assert!((f.current_speed() - expected).abs() < 1e-5);
}
