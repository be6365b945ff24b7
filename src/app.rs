// The frame loop: camera -> session -> overlays -> window.
// All state the loop mutates lives in one `Session`; this module only moves
// pixels and input between the outside world and it.
// Visual: the live window, refreshed once per camera frame.

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::camera::CameraCapture;
use crate::config::{EngineConfig, MAX_OBJECTS};
use crate::control::HandsFrame;
use crate::draw::Drawer;
use crate::error::Error;
use crate::hands::{HandSource, SimulatedHands};
use crate::hud;
use crate::session::{Flow, Session};
use crate::types::FrameBuffer;

pub const WINDOW_TITLE: &str = "Two-Hand Object Control";
const NOTICE_TIME: Duration = Duration::from_millis(1500);

/// Frames-per-second counter, refreshed once a second.
struct FpsCounter {
    since: Instant,
    frames: u32,
    text: String,
}

impl FpsCounter {
    fn new(now: Instant) -> Self {
        Self { since: now, frames: 0, text: String::from("FPS: 0.0") }
    }

    fn tick(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.duration_since(self.since);
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames as f32 / elapsed.as_secs_f32();
            debug!("FPS: {:.1}", fps);
            self.text = format!("FPS: {:.1}", fps);
            self.frames = 0;
            self.since = now;
        }
    }
}

/// Open camera and window and run until quit or the window closes.
pub fn run(cfg: EngineConfig) -> Result<(), Error> {
    let mut cam = CameraCapture::open(cfg.camera_index, cfg.width, cfg.height)?;
    let (w, h) = cam.resolution();
    let cfg = EngineConfig { width: w, height: h, ..cfg };
    info!("Camera {} open at {}x{}", cfg.camera_index, w, h);

    let mut drawer = Drawer::new(WINDOW_TITLE, w as usize, h as usize)?;
    let mut screen = FrameBuffer::filled(w as usize, h as usize, 0);
    let mut session = Session::new(&cfg);
    let mut hand_source = SimulatedHands::new();
    let mut fps = FpsCounter::new(Instant::now());
    let mut notice: Option<(String, Instant)> = None; // text, shown until

    info!("Left mouse = right hand (A/D tilt), right mouse = left hand (wheel spread, P peace)");

    while drawer.is_open() {
        let now = Instant::now();

        // 1) Fresh camera image; a missed frame changes nothing.
        if let Err(e) = cam.read_into(&mut screen) {
            warn!("{e}; skipping frame");
            drawer.pump();
            continue;
        }

        // 2) Inputs
        let commands = drawer.poll_commands(MAX_OBJECTS);
        let hands = HandsFrame::from_records(hand_source.poll(&drawer.pointer_input()));

        // 3) Core: commands, routing, physics, compositing
        let (flow, outcome) = session.frame(&mut screen, &commands, &hands, now);
        if flow == Flow::Quit {
            break;
        }
        if outcome.peace {
            debug!("peace sign held");
        }
        if let Some(result) = &outcome.duplicated {
            notice = Some((hud::duplicate_notice(result, session.store.len()), now + NOTICE_TIME));
        }

        // 4) HUD and present
        hud::draw_overlays(&mut screen, &session, &hands, &fps.text);
        if notice.as_ref().is_some_and(|(_, until)| now >= *until) {
            notice = None;
        }
        if let Some((text, _)) = &notice {
            hud::draw_notice(&mut screen, text);
        }
        drawer.present(&screen)?;

        fps.tick(now);
    }

    info!("Bye");
    Ok(())
}
