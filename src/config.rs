use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

#[derive(Parser, Debug, Clone)]
#[command(name = "warpfield")]
#[command(about = "Warp-travel starfield intro for the terminal", long_about = None)]
pub(crate) struct Args {
    /// Cruising speed before warp is engaged
    #[arg(long)]
    pub(crate) speed: Option<f32>,

    /// FPS cap (render rate). Star motion is per frame.
    #[arg(long)]
    pub(crate) fps: Option<u32>,

    /// RNG seed, 0 picks one at random
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Start already at warp
    #[arg(long, default_value_t = false)]
    pub(crate) warp: bool,

    #[arg(long, default_value_t = false)]
    pub(crate) no_color: bool,

    /// Hide title and prompt
    #[arg(long, default_value_t = false)]
    pub(crate) no_hud: bool,

    /// Keep flying after the warp sequence instead of exiting
    #[arg(long, default_value_t = false)]
    pub(crate) linger: bool,

    /// Settings file (JSON). Defaults to the platform config dir.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Write logs here; nothing is logged otherwise
    #[arg(long)]
    pub(crate) log: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) speed: f32,
    pub(crate) fps_cap: u32,
    pub(crate) seed: u64,
    pub(crate) start_at_warp: bool,
    pub(crate) enable_color: bool,
    pub(crate) show_hud: bool,
    pub(crate) linger: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: 1.5,
            fps_cap: 60,
            seed: 0,
            start_at_warp: false,
            enable_color: true,
            show_hud: true,
            linger: false,
        }
    }
}

impl Settings {
    /// Command-line flags win over the settings file.
    pub(crate) fn apply_args(mut self, args: &Args) -> Self {
        if let Some(speed) = args.speed {
            self.speed = speed;
        }
        if let Some(fps) = args.fps {
            self.fps_cap = fps;
        }
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        self.start_at_warp |= args.warp;
        self.enable_color &= !args.no_color;
        self.show_hud &= !args.no_hud;
        self.linger |= args.linger;
        self
    }

    pub(crate) fn seed(&self) -> Option<u64> {
        (self.seed != 0).then_some(self.seed)
    }
}

pub(crate) fn settings_path(args: &Args) -> Option<PathBuf> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }
    ProjectDirs::from("com", "warpfield", "Warpfield")
        .map(|proj| proj.config_dir().join("settings.json"))
}

pub(crate) fn load_settings(path: &Path) -> Settings {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no settings file, using defaults");
            return Settings::default();
        }
    };
    match serde_json::from_str::<Settings>(&text) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed settings file, using defaults");
            Settings::default()
        }
    }
}

pub(crate) fn resolve(args: &Args) -> Settings {
    let base = settings_path(args)
        .map(|path| load_settings(&path))
        .unwrap_or_default();
    base.apply_args(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "warpfield-{}-{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "warpfield", "--speed", "3", "--fps", "30", "--seed", "9", "--no-color", "--linger",
        ]);
        let s = Settings::default().apply_args(&args);
        assert_eq!(s.speed, 3.0);
        assert_eq!(s.fps_cap, 30);
        assert_eq!(s.seed(), Some(9));
        assert!(!s.enable_color);
        assert!(s.show_hud);
        assert!(s.linger);
        assert!(!s.start_at_warp);
    }

    #[test]
    fn no_flags_keep_file_values() {
        let args = Args::parse_from(["warpfield"]);
        let file = Settings {
            speed: 2.0,
            fps_cap: 45,
            linger: true,
            ..Settings::default()
        };
        assert_eq!(file.clone().apply_args(&args), file);
        assert_eq!(Settings::default().seed(), None);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = scratch("partial", r#"{ "speed": 4.0, "show_hud": false }"#);
        let s = load_settings(&path);
        fs::remove_file(&path).ok();
        assert_eq!(s.speed, 4.0);
        assert!(!s.show_hud);
        assert_eq!(s.fps_cap, 60);
    }

    #[test]
    fn malformed_or_missing_file_falls_back() {
        let path = scratch("broken", "{ speed: ");
        assert_eq!(load_settings(&path), Settings::default());
        fs::remove_file(&path).ok();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn explicit_config_path_is_used() {
        let path = scratch("explicit", r#"{ "fps_cap": 24 }"#);
        let args = Args::parse_from([
            "warpfield".to_string(),
            "--config".to_string(),
            path.display().to_string(),
        ]);
        assert_eq!(settings_path(&args), Some(path.clone()));
        let s = resolve(&args);
        fs::remove_file(&path).ok();
        assert_eq!(s.fps_cap, 24);
    }
}
