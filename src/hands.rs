// Hand records from the perception side, and the measurements the control
// router reads off them.
// Landmarks use the usual 21-point numbering: 0 is the wrist, then four
// joints per finger from the palm outwards (thumb 1-4, index 5-8, middle
// 9-12, ring 13-16, pinky 17-20), in frame pixels.
// Visual: with no tracker attached, holding a mouse button puts a hand on
// screen at the cursor (see `SimulatedHands`).

use log::warn;

use crate::error::Error;

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// One tracked hand with exactly [`LANDMARK_COUNT`] landmarks.
#[derive(Clone, Debug, PartialEq)]
pub struct HandRecord {
    pub handedness: Handedness,
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

/// Which fingers point away from the palm. Order: thumb, index, middle, ring, pinky.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FingerState(pub [bool; 5]);

impl HandRecord {
    /// Validate a landmark list from the tracker.
    pub fn new(handedness: Handedness, landmarks: &[Landmark]) -> Result<Self, Error> {
        let landmarks: [Landmark; LANDMARK_COUNT] = landmarks.try_into().map_err(|_| {
            Error::LandmarkCount { expected: LANDMARK_COUNT, got: landmarks.len() }
        })?;
        Ok(Self { handedness, landmarks })
    }

    pub fn point(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    /// Wrist → middle fingertip direction in degrees (`atan2(dy, dx)`, screen axes).
    pub fn rotation_degrees(&self) -> f32 {
        let wrist = self.landmarks[WRIST];
        let tip = self.landmarks[MIDDLE_TIP];
        (tip.y - wrist.y).atan2(tip.x - wrist.x).to_degrees()
    }

    /// Thumb tip to pinky tip distance; how wide the hand is spread.
    pub fn thumb_pinky_span(&self) -> f32 {
        self.landmarks[THUMB_TIP].distance(&self.landmarks[PINKY_TIP])
    }

    /// Thumb counts as extended when its tip lies right of the IP joint,
    /// whichever hand it is. Other fingers are extended when the tip sits
    /// above the PIP joint (smaller y).
    pub fn fingers(&self) -> FingerState {
        let lm = &self.landmarks;
        FingerState([
            lm[THUMB_TIP].x > lm[THUMB_IP].x,
            lm[INDEX_TIP].y < lm[INDEX_PIP].y,
            lm[MIDDLE_TIP].y < lm[MIDDLE_PIP].y,
            lm[RING_TIP].y < lm[RING_PIP].y,
            lm[PINKY_TIP].y < lm[PINKY_PIP].y,
        ])
    }

    /// Index and middle up, thumb ring and pinky folded.
    pub fn is_peace_sign(&self) -> bool {
        let FingerState([thumb, index, middle, ring, pinky]) = self.fingers();
        index && middle && !thumb && !ring && !pinky
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Simulated perception
// ════════════════════════════════════════════════════════════════════════════

/// Raw pointer/keyboard state sampled from the window once per frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerInput {
    pub cursor: Option<(f32, f32)>,
    pub left_button: bool,
    pub right_button: bool,
    pub scroll: f32,       // wheel delta this frame
    pub tilt_ccw: bool,    // A
    pub tilt_cw: bool,     // D
    pub peace: bool,       // P
}

/// Anything that can report the hands visible in the current frame.
pub trait HandSource {
    fn poll(&mut self, input: &PointerInput) -> Vec<HandRecord>;
}

/// Upright open hand, wrist at the origin, fingers towards -y.
/// Pixel distances for a hand roughly 140 px tall.
const OPEN_HAND: [(f32, f32); LANDMARK_COUNT] = [
    (0.0, 0.0),
    (-20.0, -10.0), (-35.0, -25.0), (-45.0, -40.0), (-55.0, -50.0),
    (-15.0, -60.0), (-18.0, -90.0), (-20.0, -110.0), (-22.0, -130.0),
    (0.0, -62.0), (0.0, -95.0), (0.0, -117.0), (0.0, -138.0),
    (15.0, -58.0), (17.0, -88.0), (19.0, -108.0), (20.0, -125.0),
    (28.0, -50.0), (32.0, -72.0), (35.0, -88.0), (37.0, -100.0),
];

/// Ring and pinky folded back below their PIP joints.
const FOLDED_RING: [(f32, f32); 2] = [(17.0, -78.0), (16.0, -70.0)];
const FOLDED_PINKY: [(f32, f32); 2] = [(31.0, -66.0), (30.0, -60.0)];

const TILT_STEP_DEG: f32 = 3.0;
const SPREAD_STEP: f32 = 0.1;
const SPREAD_MIN: f32 = 0.3;
const SPREAD_MAX: f32 = 4.0;

/// Mouse-driven stand-in for a hand tracker.
///
/// * Left button held: right hand, index fingertip on the cursor, tilted with A/D.
/// * Right button held: left hand at the cursor, spread with the wheel,
///   peace sign while P is held.
pub struct SimulatedHands {
    tilt_degrees: f32,
    spread: f32,
}

impl Default for SimulatedHands {
    fn default() -> Self {
        Self { tilt_degrees: -90.0, spread: 1.0 }
    }
}

impl SimulatedHands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Right hand whose wrist→middle-tip angle is `tilt_degrees`, index tip at `at`.
    pub fn right_hand(at: (f32, f32), tilt_degrees: f32) -> Result<HandRecord, Error> {
        // OPEN_HAND points at -90°; rotate the template onto the wanted tilt.
        let turn = (tilt_degrees + 90.0).to_radians();
        let (sin, cos) = turn.sin_cos();
        let mut pts = OPEN_HAND.map(|(x, y)| (x * cos - y * sin, x * sin + y * cos));
        let tip = pts[INDEX_TIP];
        for p in pts.iter_mut() {
            p.0 += at.0 - tip.0;
            p.1 += at.1 - tip.1;
        }
        // Exact, so integer positions derived from the tip do not drift by a pixel.
        pts[INDEX_TIP] = at;
        HandRecord::new(Handedness::Right, &pts.map(|(x, y)| Landmark::new(x, y)))
    }

    /// Upright left hand with its wrist at `at`, template scaled by `spread`.
    pub fn left_hand(at: (f32, f32), spread: f32, peace: bool) -> Result<HandRecord, Error> {
        let mut pts = OPEN_HAND;
        if peace {
            pts[RING_DIP] = FOLDED_RING[0];
            pts[RING_TIP] = FOLDED_RING[1];
            pts[PINKY_DIP] = FOLDED_PINKY[0];
            pts[PINKY_TIP] = FOLDED_PINKY[1];
        }
        let landmarks = pts.map(|(x, y)| Landmark::new(at.0 + x * spread, at.1 + y * spread));
        HandRecord::new(Handedness::Left, &landmarks)
    }
}

impl HandSource for SimulatedHands {
    fn poll(&mut self, input: &PointerInput) -> Vec<HandRecord> {
        if input.tilt_ccw { self.tilt_degrees -= TILT_STEP_DEG; }
        if input.tilt_cw { self.tilt_degrees += TILT_STEP_DEG; }
        if input.scroll != 0.0 {
            self.spread = (self.spread + input.scroll.signum() * SPREAD_STEP).clamp(SPREAD_MIN, SPREAD_MAX);
        }

        let Some(cursor) = input.cursor else { return Vec::new() };
        let mut built = Vec::with_capacity(2);
        if input.left_button {
            built.push(Self::right_hand(cursor, self.tilt_degrees));
        }
        if input.right_button {
            built.push(Self::left_hand(cursor, self.spread, input.peace));
        }
        built
            .into_iter()
            .filter_map(|hand| hand.map_err(|e| warn!("Dropping hand: {e}")).ok())
            .collect()
    }
}
