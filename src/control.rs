// Per-frame routing of hand input onto the selected object.
// Visual: the right hand drags and tilts the selected sprite, the left hand
// resizes it and a peace sign drops a copy next to it. Only the selected
// sprite is ever held; everything else falls.

use std::time::Instant;

use log::{info, warn};

use crate::config::SCALE_REFERENCE_SPAN;
use crate::gesture::GestureDebouncer;
use crate::hands::{HandRecord, Handedness, INDEX_TIP};
use crate::store::{ObjectStore, StoreError};

/// The hands visible this frame, at most one per side.
#[derive(Clone, Debug, Default)]
pub struct HandsFrame {
    pub left: Option<HandRecord>,
    pub right: Option<HandRecord>,
}

impl HandsFrame {
    /// Sort tracker output by handedness; a later record replaces an earlier one.
    pub fn from_records(records: impl IntoIterator<Item = HandRecord>) -> Self {
        let mut frame = Self::default();
        for hand in records {
            match hand.handedness {
                Handedness::Left => frame.left = Some(hand),
                Handedness::Right => frame.right = Some(hand),
            }
        }
        frame
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// What routing did this frame, for the HUD and tests.
#[derive(Debug, Default, PartialEq)]
pub struct RouteOutcome {
    pub peace: bool,
    pub duplicated: Option<Result<usize, StoreError>>,
}

/// Scale the left hand's thumb–pinky spread asks for (unclamped).
pub fn scale_from_span(span: f32) -> f32 {
    span / SCALE_REFERENCE_SPAN
}

pub fn route(
    store: &mut ObjectStore,
    debouncer: &mut GestureDebouncer,
    hands: &HandsFrame,
    now: Instant,
) -> RouteOutcome {
    let selected = store.selected_index();
    let mut peace = false;

    if let Some(obj) = store.selected_mut() {
        if let Some(right) = &hands.right {
            obj.is_controlled = true;
            let tip = right.point(INDEX_TIP);
            let (w, h) = obj.size();
            obj.position = (tip.x as i32 - w / 2, tip.y as i32 - h / 2);
            obj.rotation_degrees = right.rotation_degrees();
        }

        if let Some(left) = &hands.left {
            obj.set_scale(scale_from_span(left.thumb_pinky_span()));
            peace = left.is_peace_sign();
        }

        if hands.is_empty() {
            obj.is_controlled = false;
        }
    }

    for (i, obj) in store.iter_mut().enumerate() {
        if i != selected {
            obj.is_controlled = false;
        }
    }

    // Fed every frame so a hand leaving the view counts as a falling edge.
    let mut outcome = RouteOutcome { peace, duplicated: None };
    if debouncer.should_fire(peace, now) {
        let result = store.duplicate(selected);
        match &result {
            Ok(_) => info!("Peace sign: duplicated object {}", selected + 1),
            Err(e) => warn!("Peace sign ignored: {e}"),
        }
        outcome.duplicated = Some(result);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_OBJECTS, SCALE_MAX, SCALE_MIN};
    use crate::hands::SimulatedHands;
    use image::{Rgb, RgbImage};
    use std::time::Duration;

    fn store_with(n: usize) -> ObjectStore {
        let mut store = ObjectStore::new();
        for i in 0..n {
            let img = RgbImage::from_pixel(100, 60, Rgb([180, 90, 40]));
            store.capture(img, (50 * i as i32, 100)).unwrap();
        }
        store
    }

    fn controlled_count(store: &ObjectStore) -> usize {
        store.iter().filter(|o| o.is_controlled).count()
    }

    #[test]
    fn right_hand_moves_and_rotates_selected() {
        let mut store = store_with(2);
        let mut deb = GestureDebouncer::default();
        let hands = HandsFrame::from_records([SimulatedHands::right_hand((400.0, 300.0), 30.0).unwrap()]);

        route(&mut store, &mut deb, &hands, Instant::now());

        let obj = store.selected().unwrap();
        assert!(obj.is_controlled);
        assert_eq!(obj.center(), (400, 300));
        assert!((obj.rotation_degrees - 30.0).abs() < 1e-2);
        assert!(!store.iter().next().unwrap().is_controlled);
    }

    #[test]
    fn left_hand_scales_with_clamp() {
        let mut store = store_with(1);
        let mut deb = GestureDebouncer::default();
        for spread in [0.05f32, 0.5, 1.0, 2.0, 10.0] {
            let hand = SimulatedHands::left_hand((300.0, 400.0), spread, false).unwrap();
            let expected = scale_from_span(hand.thumb_pinky_span()).clamp(SCALE_MIN, SCALE_MAX);
            route(&mut store, &mut deb, &HandsFrame::from_records([hand]), Instant::now());
            let obj = store.selected().unwrap();
            assert!((obj.scale() - expected).abs() < 1e-5);
            assert!((SCALE_MIN..=SCALE_MAX).contains(&obj.scale()));
        }
    }

    #[test]
    fn no_hands_releases_selected() {
        let mut store = store_with(1);
        let mut deb = GestureDebouncer::default();
        let hands = HandsFrame::from_records([SimulatedHands::right_hand((10.0, 10.0), 0.0).unwrap()]);
        route(&mut store, &mut deb, &hands, Instant::now());
        assert!(store.selected().unwrap().is_controlled);
        route(&mut store, &mut deb, &HandsFrame::default(), Instant::now());
        assert!(!store.selected().unwrap().is_controlled);
    }

    #[test]
    fn at_most_one_object_is_controlled() {
        let mut store = store_with(3);
        let mut deb = GestureDebouncer::default();
        let right = SimulatedHands::right_hand((200.0, 200.0), 0.0).unwrap();
        for sel in [0usize, 2, 1, 2] {
            store.select(sel);
            route(&mut store, &mut deb, &HandsFrame::from_records([right.clone()]), Instant::now());
            assert_eq!(controlled_count(&store), 1);
            assert!(store.iter().nth(sel).unwrap().is_controlled);
        }
    }

    #[test]
    fn held_peace_sign_duplicates_once() {
        let mut store = store_with(1);
        let mut deb = GestureDebouncer::new(Duration::from_millis(1500));
        let base = Instant::now();
        let peace = HandsFrame::from_records([SimulatedHands::left_hand((300.0, 400.0), 1.0, true).unwrap()]);

        let first = route(&mut store, &mut deb, &peace, base);
        assert!(first.peace);
        assert_eq!(first.duplicated, Some(Ok(1)));
        for i in 1..20 {
            let o = route(&mut store, &mut deb, &peace, base + Duration::from_millis(100 * i));
            assert_eq!(o.duplicated, None);
        }
        assert_eq!(store.len(), 2);
        assert_eq!(store.selected_index(), 0);

        // drop the hand, bring the sign back after the cooldown
        route(&mut store, &mut deb, &HandsFrame::default(), base + Duration::from_secs(3));
        let again = route(&mut store, &mut deb, &peace, base + Duration::from_millis(3100));
        assert_eq!(again.duplicated, Some(Ok(2)));
    }

    #[test]
    fn peace_sign_on_full_store_is_rejected() {
        let mut store = store_with(MAX_OBJECTS);
        let mut deb = GestureDebouncer::default();
        let peace = HandsFrame::from_records([SimulatedHands::left_hand((300.0, 400.0), 1.0, true).unwrap()]);
        let o = route(&mut store, &mut deb, &peace, Instant::now());
        assert_eq!(o.duplicated, Some(Err(StoreError::AtCapacity { max: MAX_OBJECTS })));
        assert_eq!(store.len(), MAX_OBJECTS);
    }

    #[test]
    fn rejected_duplicate_still_starts_cooldown() {
        let mut store = store_with(MAX_OBJECTS);
        let mut deb = GestureDebouncer::new(Duration::from_millis(1500));
        let base = Instant::now();
        let peace = HandsFrame::from_records([SimulatedHands::left_hand((300.0, 400.0), 1.0, true).unwrap()]);

        let full = route(&mut store, &mut deb, &peace, base);
        assert!(full.duplicated.is_some_and(|r| r.is_err()));

        // room again, sign dropped and shown again inside the cooldown
        store.reset();
        store.capture(RgbImage::from_pixel(100, 60, Rgb([180, 90, 40])), (0, 100)).unwrap();
        route(&mut store, &mut deb, &HandsFrame::default(), base + Duration::from_millis(500));
        let early = route(&mut store, &mut deb, &peace, base + Duration::from_millis(1000));
        assert!(early.peace);
        assert_eq!(early.duplicated, None);
        assert_eq!(store.len(), 1);

        // and fires once the cooldown has passed
        route(&mut store, &mut deb, &HandsFrame::default(), base + Duration::from_millis(1600));
        let later = route(&mut store, &mut deb, &peace, base + Duration::from_millis(1700));
        assert_eq!(later.duplicated, Some(Ok(1)));
    }

    #[test]
    fn empty_store_ignores_hands() {
        let mut store = ObjectStore::new();
        let mut deb = GestureDebouncer::default();
        let hands = HandsFrame::from_records([
            SimulatedHands::right_hand((10.0, 10.0), 0.0).unwrap(),
            SimulatedHands::left_hand((300.0, 400.0), 1.0, true).unwrap(),
        ]);
        let o = route(&mut store, &mut deb, &hands, Instant::now());
        assert!(!o.peace);
        assert_eq!(o.duplicated, None);
        assert!(store.is_empty());
    }

    #[test]
    fn later_record_wins_per_side() {
        let a = SimulatedHands::right_hand((10.0, 10.0), 0.0).unwrap();
        let b = SimulatedHands::right_hand((90.0, 90.0), 0.0).unwrap();
        let frame = HandsFrame::from_records([a, b.clone()]);
        assert_eq!(frame.right, Some(b));
        assert!(frame.left.is_none());
    }
}
