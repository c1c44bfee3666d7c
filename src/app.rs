use crate::config::Settings;
use crate::input::{collect_input_nonblocking, Action};
use crate::term::{canvas_matches, canvas_to_cells, draw_centered, draw_text, Terminal};
use crossterm::style::Color;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use warpfield::{CancelToken, FrameLoop, PixelCanvas, Surface, WarpConfig, WarpField};

// The prompt fades out shortly after warp is engaged, then the intro ends.
const PROMPT_HIDE_AFTER: Duration = Duration::from_millis(600);
const INTRO_DONE_AFTER: Duration = Duration::from_millis(1200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Cruising,
    Engaged,
    Departing,
    Complete,
}

/// Timeline of the warp-entry screen.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Voyage {
    engaged_at: Option<Instant>,
}

impl Voyage {
    /// Returns `false` if the voyage had already started.
    pub(crate) fn engage(&mut self, now: Instant) -> bool {
        if self.engaged_at.is_some() {
            return false;
        }
        self.engaged_at = Some(now);
        true
    }

    pub(crate) fn phase(&self, now: Instant) -> Phase {
        let Some(at) = self.engaged_at else {
            return Phase::Cruising;
        };
        let t = now.saturating_duration_since(at);
        if t >= INTRO_DONE_AFTER {
            Phase::Complete
        } else if t >= PROMPT_HIDE_AFTER {
            Phase::Departing
        } else {
            Phase::Engaged
        }
    }
}

pub(crate) struct App {
    settings: Settings,
    field: WarpField<PixelCanvas>,
    term: Terminal,
    voyage: Voyage,
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        let term = Terminal::begin()?;
        let (w, h) = term.canvas_size();

        // canvas starts empty and is acquired by the first resize
        let mut field = WarpField::new(
            PixelCanvas::new(0, 0),
            WarpConfig {
                speed: settings.speed,
                accelerating: settings.start_at_warp,
                seed: settings.seed(),
            },
        );
        field.resize(w, h);
        info!(
            cols = term.cols,
            rows = term.rows,
            speed = settings.speed,
            fps = settings.fps_cap,
            "warpfield started"
        );

        Ok(Self {
            settings,
            field,
            term,
            voyage: Voyage::default(),
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let mut frame_loop = FrameLoop::new(self.settings.fps_cap);
        let frame_dt = frame_loop.frame_interval();
        let frames = frame_loop.run(|cancel| self.tick(cancel, frame_dt))?;
        info!(frames, "frame loop stopped");
        Ok(())
    }

    fn tick(&mut self, cancel: &CancelToken, frame_dt: Duration) -> anyhow::Result<()> {
        // resizes are handled here, between frames, never during a draw
        for action in collect_input_nonblocking(frame_dt)? {
            match action {
                Action::Quit => {
                    cancel.cancel();
                    return Ok(());
                }
                Action::Engage => self.engage(),
                Action::Resize(cols, rows) => self.resize(cols, rows)?,
            }
        }

        let now = Instant::now();
        if !self.settings.linger && self.voyage.phase(now) == Phase::Complete {
            info!("warp sequence complete");
            cancel.cancel();
            return Ok(());
        }

        self.field.frame();
        self.draw(now)
    }

    fn engage(&mut self) {
        let was_accelerating = self.field.set_accelerating(true);
        if self.voyage.engage(Instant::now()) {
            info!(was_accelerating, "warp engaged");
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) -> anyhow::Result<()> {
        self.term.resize(cols, rows)?;
        let (w, h) = self.term.canvas_size();
        self.field.resize(w, h);
        debug!(cols, rows, "terminal resized");
        Ok(())
    }

    fn draw(&mut self, now: Instant) -> anyhow::Result<()> {
        let bg = Color::Black;
        let canvas = self.field.surface();
        if canvas_matches(&self.term, canvas) {
            canvas_to_cells(canvas, &mut self.term.cur, self.settings.enable_color, bg);
        }

        if self.settings.show_hud {
            self.draw_hud(now);
        }

        self.term.present(true)
    }

    fn draw_hud(&mut self, now: Instant) {
        let buf = &mut self.term.cur;
        let dim = Color::DarkGrey;
        let bg = Color::Black;

        let status = format!(
            "warpfield  speed {:>5.2} -> {:>5.2}",
            self.field.current_speed(),
            self.field.target_speed()
        );
        draw_text(buf, 1, 0, &status, dim, bg);

        let rows = buf.h;
        match self.voyage.phase(now) {
            Phase::Cruising => {
                draw_centered(buf, rows / 3, "PREPARE FOR DEPARTURE", dim, bg);
                draw_centered(buf, rows.saturating_sub(4), "[  START VOYAGE  ]", Color::White, bg);
                draw_centered(
                    buf,
                    rows.saturating_sub(2),
                    "space to initiate warp sequence  ·  q to quit",
                    dim,
                    bg,
                );
            }
            Phase::Engaged => {
                draw_centered(buf, rows.saturating_sub(4), "[  WARP ENGAGED  ]", Color::Cyan, bg);
            }
            Phase::Departing | Phase::Complete => {}
        }
    }

    fn shutdown(mut self) -> anyhow::Result<()> {
        let canvas = self.field.dispose();
        debug!(width = canvas.width(), height = canvas.height(), "canvas released");
        self.term.end()
    }
}

pub(crate) fn run(settings: Settings) -> anyhow::Result<()> {
    let mut app = App::init(settings)?;
    let res = app.run();
    // restore the terminal even when the loop failed
    let end = app.shutdown();
    res.and(end)
}
