// One-step integrator for free-falling sprites.
// Visual: released sprites drop, slide to a stop and bounce off the screen
// edges and the floor line, losing energy on every bounce until they rest.

use crate::config::{self, EngineConfig};
use crate::store::ManipulableObject;

/// Read-only constants shared by every object in a frame.
#[derive(Debug, Clone, Copy)]
pub struct World {
    pub gravity: f32,
    pub damping: f32,
    pub friction: f32,
    pub ground_y: i32,
    pub width: i32,
}

impl World {
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self {
            gravity: cfg.gravity,
            damping: cfg.damping,
            friction: cfg.friction,
            // A floor below the frame would let sprites fall out of view.
            ground_y: cfg.ground_y.min(cfg.height as i32),
            width: cfg.width as i32,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Advance `obj` by one frame. Hand control overrides physics entirely.
///
/// Position moves by the velocity truncated toward zero on each axis, so a
/// speed below one pixel per frame moves nothing until it accumulates.
pub fn step(obj: &mut ManipulableObject, world: &World) {
    if obj.is_controlled {
        obj.velocity = (0.0, 0.0);
        return;
    }

    obj.velocity.1 += world.gravity;
    obj.velocity.0 *= world.friction;

    obj.position.0 += obj.velocity.0 as i32;
    obj.position.1 += obj.velocity.1 as i32;

    let (w, h) = obj.size();

    // Left and right walls
    if obj.position.0 <= 0 {
        obj.position.0 = 0;
        obj.velocity.0 = -obj.velocity.0 * world.damping;
    }
    if obj.position.0 + w >= world.width {
        obj.position.0 = world.width - w;
        obj.velocity.0 = -obj.velocity.0 * world.damping;
    }

    // Floor
    if obj.position.1 + h >= world.ground_y {
        obj.position.1 = world.ground_y - h;
        obj.velocity.1 = -obj.velocity.1 * world.damping;
        if obj.velocity.1.abs() < config::REST_SPEED {
            obj.velocity.1 = 0.0;
        }
    }

    // Ceiling
    if obj.position.1 <= 0 {
        obj.position.1 = 0;
        obj.velocity.1 = -obj.velocity.1 * world.damping;
    }
}
