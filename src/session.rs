// Everything one run of the program owns, and the per-frame core step.
// A frame is: keyboard commands (capture reads the clean camera image),
// hand routing, physics for everything not held, compositing in store order.
// Visual: after `frame` the buffer shows camera + sprites; the HUD comes later.

use std::time::Instant;

use log::{info, trace, warn};

use crate::compositor;
use crate::config::EngineConfig;
use crate::control::{self, HandsFrame, RouteOutcome};
use crate::gesture::GestureDebouncer;
use crate::physics::{self, World};
use crate::store::ObjectStore;
use crate::types::{FrameBuffer, Rect};
use crate::vision;

/// Discrete commands from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Capture,
    /// Zero-based store index (key `1` selects index 0).
    Select(usize),
    Reset,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    pub store: ObjectStore,
    pub debouncer: GestureDebouncer,
    pub world: World,
    pub capture_zone: Rect,
}

impl Session {
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            store: ObjectStore::new(),
            debouncer: GestureDebouncer::new(cfg.peace_cooldown),
            world: World::from_config(cfg),
            capture_zone: cfg.capture_zone,
        }
    }

    /// Run one full frame on `frame` in place.
    pub fn frame(
        &mut self,
        frame: &mut FrameBuffer,
        commands: &[Command],
        hands: &HandsFrame,
        now: Instant,
    ) -> (Flow, RouteOutcome) {
        for &cmd in commands {
            if self.handle_command(cmd, frame) == Flow::Quit {
                return (Flow::Quit, RouteOutcome::default());
            }
        }
        let outcome = self.update(hands, now);
        self.render(frame);
        (Flow::Continue, outcome)
    }

    pub fn handle_command(&mut self, cmd: Command, frame: &FrameBuffer) -> Flow {
        match cmd {
            Command::Capture => self.capture(frame),
            Command::Select(i) => self.store.select(i),
            Command::Reset => self.store.reset(),
            Command::Quit => {
                info!("Quit requested");
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Cut a sprite out of the capture zone of `frame`.
    pub fn capture(&mut self, frame: &FrameBuffer) {
        if self.store.is_full() {
            warn!("Cannot capture - maximum {} objects reached", self.store.capacity());
            return;
        }
        let Some(region) = vision::capture_region(frame, self.capture_zone) else {
            warn!("Capture zone {:?} is outside the frame", self.capture_zone);
            return;
        };
        if let Err(e) = self.store.capture(region.image, region.origin) {
            warn!("Capture rejected: {e}");
        }
    }

    /// Hand routing, then physics for every object.
    pub fn update(&mut self, hands: &HandsFrame, now: Instant) -> RouteOutcome {
        let outcome = control::route(&mut self.store, &mut self.debouncer, hands, now);
        for obj in self.store.iter_mut() {
            physics::step(obj, &self.world);
        }
        outcome
    }

    /// Composite every object onto `frame` in store order; returns how many were visible.
    pub fn render(&self, frame: &mut FrameBuffer) -> usize {
        let drawn = self
            .store
            .iter()
            .filter_map(|obj| compositor::render_object(frame, obj))
            .count();
        trace!("rendered {drawn}/{} objects", self.store.len());
        drawn
    }
}
