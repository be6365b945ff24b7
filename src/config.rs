// Named tuning constants and the runtime configuration built from them.
// Visual: these decide how fast sprites fall, how much they bounce, and
// where the green capture box sits on screen.

use crate::types::Rect;
use std::time::Duration;

pub const FRAME_WIDTH: u32 = 1280;
pub const FRAME_HEIGHT: u32 = 720;

/// Most sprites alive at once; also the highest select-by-number key.
pub const MAX_OBJECTS: usize = 5;

pub const GRAVITY: f32 = 0.4;           // px/frame² added to vy every step
pub const BOUNCE_DAMPING: f32 = 0.7;    // fraction of speed kept after a bounce
pub const FRICTION: f32 = 0.98;         // vx multiplier per step
pub const GROUND_LEVEL: i32 = 680;      // y of the floor line
pub const REST_SPEED: f32 = 2.0;        // |vy| below this after a floor bounce = at rest

pub const SCALE_MIN: f32 = 0.3;
pub const SCALE_MAX: f32 = 3.0;
/// Thumb–pinky distance (px) that maps to scale 1.0.
pub const SCALE_REFERENCE_SPAN: f32 = 150.0;

/// Both axes; keeps a duplicate visibly apart from its source.
pub const DUPLICATE_OFFSET: i32 = 80;
pub const PEACE_COOLDOWN: Duration = Duration::from_millis(1500);

pub const CAPTURE_ZONE: Rect = Rect::new(200, 150, 300, 250);
pub const CAPTURE_THRESHOLD: u8 = 100;  // gray <= this counts as object
pub const MIN_CONTOUR_AREA: usize = 500;

/// Everything the session needs, with defaults matching the constants above.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub camera_index: u32,
    pub width: u32,
    pub height: u32,
    pub gravity: f32,
    pub damping: f32,
    pub friction: f32,
    pub ground_y: i32,
    pub peace_cooldown: Duration,
    pub capture_zone: Rect,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            gravity: GRAVITY,
            damping: BOUNCE_DAMPING,
            friction: FRICTION,
            ground_y: GROUND_LEVEL,
            peace_cooldown: PEACE_COOLDOWN,
            capture_zone: CAPTURE_ZONE,
        }
    }
}
