//! Warp-travel starfield: a pool of stars streaking past the viewer, drawn onto
//! any [`Surface`].
//!
//! ```no_run
//! use warpfield::{FrameLoop, PixelCanvas, WarpConfig, WarpField};
//!
//! let mut field = WarpField::new(PixelCanvas::new(160, 96), WarpConfig::default());
//! let controls = field.controls();
//! let mut frames = FrameLoop::new(60);
//! let cancel = frames.cancel_token();
//! frames
//!     .run(|_| -> Result<(), ()> {
//!         field.frame();
//!         if field.frames() == 30 {
//!             controls.set_accelerating(true);
//!         }
//!         if field.frames() == 120 {
//!             cancel.cancel();
//!         }
//!         Ok(())
//!     })
//!     .unwrap();
//! let _canvas = field.dispose();
//! ```

pub mod controls;
pub mod frame;
pub mod surface;
pub mod warp;

pub use controls::{Controls, MIN_SPEED};
pub use frame::{CancelToken, FrameLoop};
pub use surface::{ColorStop, Pixel, PixelCanvas, Point, RadialGradient, Rgb, Rgba, Surface};
pub use warp::{Star, Throttle, WarpConfig, WarpField, PALETTE, STAR_COUNT, WARP_SPEED};
