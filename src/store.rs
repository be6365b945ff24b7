// Captured sprites and which one the hands are driving.
// Visual: each entry is one patch on screen; the selected one wears the
// yellow marker and follows your hands.

use image::RgbImage;
use log::{debug, info};
use thiserror::Error;

use crate::config::{DUPLICATE_OFFSET, MAX_OBJECTS, SCALE_MAX, SCALE_MIN};

/// Why the store refused to add an object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store is full ({max} objects)")]
    AtCapacity { max: usize },
    #[error("store is empty")]
    Empty,
    #[error("no object at index {0}")]
    InvalidIndex(usize),
}

/// One captured sprite with its live transform and physics state.
#[derive(Clone)]
pub struct ManipulableObject {
    pub id: usize,
    pub image: RgbImage,                // pixels at capture size, never rescaled in place
    pub position: (i32, i32),           // top-left on screen
    pub rotation_degrees: f32,
    pub velocity: (f32, f32),
    pub is_controlled: bool,
    original_size: (u32, u32),
    size: (i32, i32),
    scale: f32,
}

impl ManipulableObject {
    pub fn new(id: usize, image: RgbImage, position: (i32, i32)) -> Self {
        let original_size = image.dimensions();
        Self {
            id,
            image,
            position,
            rotation_degrees: 0.0,
            velocity: (0.0, 0.0),
            is_controlled: false,
            original_size,
            size: (original_size.0 as i32, original_size.1 as i32),
            scale: 1.0,
        }
    }

    pub fn scale(&self) -> f32 { self.scale }
    pub fn size(&self) -> (i32, i32) { self.size }

    /// Clamp `raw` into the allowed range and recompute the display size.
    pub fn set_scale(&mut self, raw: f32) {
        // NaN from a degenerate hand would poison every later frame.
        let s = if raw.is_nan() { 1.0 } else { raw.clamp(SCALE_MIN, SCALE_MAX) };
        self.scale = s;
        let (w, h) = scaled_size(self.original_size, s);
        self.size = (w as i32, h as i32);
    }

    /// Screen point the sprite is drawn around.
    pub fn center(&self) -> (i32, i32) {
        (self.position.0 + self.size.0 / 2, self.position.1 + self.size.1 / 2)
    }

    fn duplicate(&self, id: usize) -> Self {
        Self {
            id,
            image: self.image.clone(),
            position: (self.position.0 + DUPLICATE_OFFSET, self.position.1 + DUPLICATE_OFFSET),
            rotation_degrees: self.rotation_degrees,
            velocity: (0.0, 0.0),
            is_controlled: false,
            original_size: self.original_size,
            size: self.size,
            scale: self.scale,
        }
    }
}

/// `round(original * scale)` per axis; zero when the product rounds away.
pub fn scaled_size(original: (u32, u32), scale: f32) -> (u32, u32) {
    let w = (original.0 as f32 * scale).round().max(0.0) as u32;
    let h = (original.1 as f32 * scale).round().max(0.0) as u32;
    (w, h)
}

/// Insertion-ordered, capacity-bounded sprite list plus the selection.
pub struct ObjectStore {
    objects: Vec<ManipulableObject>,
    selected: usize,
    next_id: usize,
    capacity: usize,
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_OBJECTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { objects: Vec::with_capacity(capacity), selected: 0, next_id: 0, capacity }
    }

    pub fn len(&self) -> usize { self.objects.len() }
    pub fn is_empty(&self) -> bool { self.objects.is_empty() }
    pub fn is_full(&self) -> bool { self.objects.len() >= self.capacity }
    pub fn capacity(&self) -> usize { self.capacity }

    /// Meaningful only while the store is non-empty.
    pub fn selected_index(&self) -> usize { self.selected }

    pub fn selected(&self) -> Option<&ManipulableObject> {
        self.objects.get(self.selected)
    }

    pub fn selected_mut(&mut self) -> Option<&mut ManipulableObject> {
        self.objects.get_mut(self.selected)
    }


    pub fn iter(&self) -> impl Iterator<Item = &ManipulableObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ManipulableObject> {
        self.objects.iter_mut()
    }

    /// Add a freshly captured sprite and select it.
    pub fn capture(&mut self, image: RgbImage, position: (i32, i32)) -> Result<usize, StoreError> {
        if self.is_full() {
            return Err(StoreError::AtCapacity { max: self.capacity });
        }
        let (w, h) = image.dimensions();
        let obj = ManipulableObject::new(self.take_id(), image, position);
        self.objects.push(obj);
        self.selected = self.objects.len() - 1;
        info!("Captured object {} ({}x{}) at {:?}", self.objects.len(), w, h, position);
        Ok(self.selected)
    }

    /// Copy `source` next to itself. Selection stays where it was.
    pub fn duplicate(&mut self, source: usize) -> Result<usize, StoreError> {
        if self.objects.is_empty() {
            return Err(StoreError::Empty);
        }
        if source >= self.objects.len() {
            return Err(StoreError::InvalidIndex(source));
        }
        if self.is_full() {
            return Err(StoreError::AtCapacity { max: self.capacity });
        }
        let id = self.take_id();
        let copy = self.objects[source].duplicate(id);
        self.objects.push(copy);
        info!("Duplicated object {} -> now {} objects", source + 1, self.objects.len());
        Ok(self.objects.len() - 1)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.objects.len() {
            self.selected = index;
            debug!("Selected object {}", index + 1);
        }
    }

    pub fn reset(&mut self) {
        self.objects.clear();
        self.selected = 0;
        self.next_id = 0;
        info!("Reset: all objects cleared");
    }

    fn take_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn sprite(w: u32, h: u32) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([200, 40, 40]))
    }

    #[test]
    fn capture_selects_new_object() {
        let mut store = ObjectStore::new();
        assert_eq!(store.capture(sprite(10, 10), (0, 0)), Ok(0));
        assert_eq!(store.capture(sprite(10, 10), (5, 5)), Ok(1));
        assert_eq!(store.selected_index(), 1);
        let obj = store.selected().unwrap();
        assert_eq!(obj.scale(), 1.0);
        assert_eq!(obj.rotation_degrees, 0.0);
        assert_eq!(obj.velocity, (0.0, 0.0));
        assert!(!obj.is_controlled);
    }

    #[test]
    fn sixth_addition_is_rejected() {
        let mut store = ObjectStore::new();
        for i in 0..MAX_OBJECTS {
            if i % 2 == 0 {
                store.capture(sprite(4, 4), (0, 0)).unwrap();
            } else {
                store.duplicate(0).unwrap();
            }
        }
        assert_eq!(store.len(), MAX_OBJECTS);
        assert_eq!(
            store.capture(sprite(4, 4), (0, 0)),
            Err(StoreError::AtCapacity { max: MAX_OBJECTS })
        );
        assert_eq!(store.duplicate(0), Err(StoreError::AtCapacity { max: MAX_OBJECTS }));
        assert_eq!(store.len(), MAX_OBJECTS);
    }

    #[test]
    fn duplicate_rejections() {
        let mut store = ObjectStore::new();
        assert_eq!(store.duplicate(0), Err(StoreError::Empty));
        store.capture(sprite(4, 4), (0, 0)).unwrap();
        assert_eq!(store.duplicate(3), Err(StoreError::InvalidIndex(3)));
    }

    #[test]
    fn duplicate_copies_transform_and_resets_motion() {
        let mut store = ObjectStore::new();
        store.capture(sprite(40, 20), (100, 50)).unwrap();
        {
            let src = store.selected_mut().unwrap();
            src.set_scale(2.0);
            src.rotation_degrees = 33.0;
            src.velocity = (3.0, -4.0);
            src.is_controlled = true;
        }
        store.capture(sprite(8, 8), (0, 0)).unwrap();
        store.select(0);

        let idx = store.duplicate(0).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(store.selected_index(), 0);

        let copy = store.iter().nth(idx).unwrap();
        let src = store.iter().next().unwrap();
        assert_eq!(copy.position, (100 + DUPLICATE_OFFSET, 50 + DUPLICATE_OFFSET));
        assert_eq!(copy.scale(), 2.0);
        assert_eq!(copy.size(), (80, 40));
        assert_eq!(copy.original_size, (40, 20));
        assert_eq!(copy.rotation_degrees, 33.0);
        assert_eq!(copy.velocity, (0.0, 0.0));
        assert!(!copy.is_controlled);
        assert_eq!(copy.image, src.image);
        assert_ne!(copy.id, src.id);
    }

    #[test]
    fn select_out_of_range_is_ignored() {
        let mut store = ObjectStore::new();
        store.capture(sprite(4, 4), (0, 0)).unwrap();
        store.capture(sprite(4, 4), (0, 0)).unwrap();
        store.select(0);
        store.select(7);
        assert_eq!(store.selected_index(), 0);
    }

    #[test]
    fn reset_empties_and_restarts_ids() {
        let mut store = ObjectStore::new();
        store.capture(sprite(4, 4), (0, 0)).unwrap();
        store.capture(sprite(4, 4), (0, 0)).unwrap();
        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.selected_index(), 0);
        assert!(store.selected().is_none());
        store.capture(sprite(4, 4), (0, 0)).unwrap();
        assert_eq!(store.iter().next().unwrap().id, 0);
    }

    #[test]
    fn scale_is_always_clamped() {
        let mut obj = ManipulableObject::new(0, sprite(100, 50), (0, 0));
        for raw in [-5.0, 0.0, 0.1, 0.3, 1.0, 2.99, 3.0, 10.0, f32::INFINITY, f32::NAN] {
            obj.set_scale(raw);
            assert!((SCALE_MIN..=SCALE_MAX).contains(&obj.scale()), "raw {raw} -> {}", obj.scale());
            let (w, h) = scaled_size(obj.original_size, obj.scale());
            assert_eq!(obj.size(), (w as i32, h as i32));
        }
        obj.set_scale(0.25);
        assert_eq!(obj.size(), (30, 15));
    }
}
