use clap::Parser;
use std::time::Duration;

use crate::config::{self, EngineConfig};

/// Capture a patch from the camera and juggle it with both hands
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Camera device index
    #[arg(long = "camera", value_name = "N", default_value_t = 0)]
    pub camera_index: u32,

    /// Requested frame width (the camera may pick the closest it supports)
    #[arg(long = "width", value_name = "PX", default_value_t = config::FRAME_WIDTH)]
    pub width: u32,

    /// Requested frame height
    #[arg(long = "height", value_name = "PX", default_value_t = config::FRAME_HEIGHT)]
    pub height: u32,

    /// Gravity added to vertical speed each frame
    #[arg(long = "gravity", value_name = "PX", default_value_t = config::GRAVITY)]
    pub gravity: f32,

    /// Fraction of speed kept after a bounce, in (0,1)
    #[arg(long = "damping", value_name = "F", default_value_t = config::BOUNCE_DAMPING)]
    pub damping: f32,

    /// Horizontal speed multiplier per frame, in (0,1)
    #[arg(long = "friction", value_name = "F", default_value_t = config::FRICTION)]
    pub friction: f32,

    /// Y coordinate of the floor
    #[arg(long = "ground", value_name = "Y", default_value_t = config::GROUND_LEVEL)]
    pub ground_y: i32,

    /// Minimum seconds between two peace-sign duplications
    #[arg(long = "cooldown", value_name = "SECS", default_value_t = config::PEACE_COOLDOWN.as_secs_f32())]
    pub cooldown_secs: f32,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Args {
    /// Out-of-range physics values fall back to the defaults instead of failing.
    pub fn engine_config(&self) -> EngineConfig {
        let unit = |v: f32, fallback: f32| if v > 0.0 && v < 1.0 { v } else { fallback };
        EngineConfig {
            camera_index: self.camera_index,
            width: self.width,
            height: self.height,
            gravity: self.gravity,
            damping: unit(self.damping, config::BOUNCE_DAMPING),
            friction: unit(self.friction, config::FRICTION),
            ground_y: self.ground_y,
            peace_cooldown: Duration::try_from_secs_f32(self.cooldown_secs.max(0.0))
                .unwrap_or(config::PEACE_COOLDOWN),
            ..EngineConfig::default()
        }
    }
}
