// Everything drawn over the composited frame.
// Visual: gray floor line, green capture box, yellow marker on the selected
// sprite, and the status/help text in the top-left corner.

use crate::control::HandsFrame;
use crate::draw::{draw_hline, draw_rect, draw_text_5x7, fill_circle, text_width};
use crate::session::Session;
use crate::store::StoreError;
use crate::types::{pack_rgb, FrameBuffer};

const TEXT_SCALE: i32 = 2;

const FLOOR_COLOR: u32 = 0x0064_6464;
const ZONE_COLOR: u32 = 0x0000_FF00;
const MARKER_COLOR: u32 = 0x00FF_FF00; // yellow
const STATUS_COLOR: u32 = 0x0000_FFFF; // cyan
const HELP_COLOR: u32 = 0x00FF_FFFF;
const HINT_COLOR: u32 = 0x0000_FF00;

/// One line describing which hands are driving what.
pub fn hand_status(hands: &HandsFrame) -> &'static str {
    match (hands.right.is_some(), hands.left.is_some()) {
        (true, true) => "RIGHT: Move+Rotate | LEFT: Scale+Duplicate",
        (true, false) => "RIGHT hand detected - Move & Rotate active",
        (false, true) => "LEFT hand detected - Scale & Duplicate active",
        (false, false) => "No hands detected - Object falling",
    }
}

/// "Selected: 2/3 | Scale: 1.4x", or `None` with nothing selected.
pub fn selection_status(session: &Session) -> Option<String> {
    let store = &session.store;
    let obj = store.selected()?;
    Some(format!(
        "Selected: {}/{} | Scale: {:.1}x",
        store.selected_index() + 1,
        store.len(),
        obj.scale()
    ))
}

/// Short message after a peace-sign duplicate attempt.
pub fn duplicate_notice(result: &Result<usize, StoreError>, total: usize) -> String {
    match result {
        Ok(_) => format!("Duplicated! Now {total} objects"),
        Err(StoreError::AtCapacity { max }) => format!("Cannot duplicate - maximum {max} objects"),
        Err(e) => format!("Cannot duplicate - {e}"),
    }
}

/// Notice line under the status lines.
pub fn draw_notice(fb: &mut FrameBuffer, text: &str) {
    draw_text_5x7(fb, 10, 240, text, MARKER_COLOR, TEXT_SCALE);
}

pub fn draw_overlays(fb: &mut FrameBuffer, session: &Session, hands: &HandsFrame, fps_text: &str) {
    // Floor and capture box
    draw_hline(fb, session.world.ground_y, 2, FLOOR_COLOR);
    let zone = session.capture_zone;
    draw_rect(fb, zone.x, zone.y, zone.w, zone.h, 2, ZONE_COLOR);
    draw_text_5x7(fb, zone.x, zone.y - 12, "Capture Zone", ZONE_COLOR, 1);

    // Selection marker: dot with the ordinal just above the sprite's corner
    let store = &session.store;
    if let Some(obj) = store.selected() {
        let (x, y) = obj.position;
        fill_circle(fb, x, y - 15, 8, MARKER_COLOR);
        let label = (store.selected_index() + 1).to_string();
        draw_text_5x7(fb, x - 2, y - 18, &label, pack_rgb(0, 0, 0), 1);
    }

    if let Some(status) = selection_status(session) {
        draw_text_5x7(fb, 10, 180, &status, STATUS_COLOR, TEXT_SCALE);
        draw_text_5x7(fb, 10, 210, hand_status(hands), HELP_COLOR, TEXT_SCALE);
    }

    if store.is_empty() {
        draw_text_5x7(fb, 10, 30, "Place object in green box and press 'c'", HELP_COLOR, TEXT_SCALE);
    } else {
        draw_text_5x7(
            fb,
            10,
            30,
            "RIGHT HAND: Move + Rotate | LEFT HAND: Scale + Peace Sign Duplicate",
            HINT_COLOR,
            TEXT_SCALE,
        );
    }
    let keys = format!("Numbers 1-{}: Select | 'r': Reset | 'q': Quit", store.capacity());
    draw_text_5x7(fb, 10, 60, &keys, HELP_COLOR, TEXT_SCALE);

    let fps_x = fb.width as i32 - text_width(fps_text, TEXT_SCALE) - 10;
    draw_text_5x7(fb, fps_x, 10, fps_text, HELP_COLOR, TEXT_SCALE);
}
