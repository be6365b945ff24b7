// Capture-zone analysis: find the object inside the green box.
// Visual expectation: hold something dark against a bright background inside
// the box, press C, and only that object (its bounding box) becomes a sprite.
// If nothing big enough is found, the whole box is captured instead.

use image::{GrayImage, Luma, RgbImage};
use log::debug;

use crate::config::{CAPTURE_THRESHOLD, MIN_CONTOUR_AREA};
use crate::types::{luma, unpack_rgb, FrameBuffer, Rect};

/// Pixels and screen position of a new sprite.
pub struct CapturedRegion {
    pub image: RgbImage,
    pub origin: (i32, i32),
}

/// One 8-connected blob of foreground pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blob {
    pub area: usize, // pixels inside the outer boundary, holes included
    pub bounds: Rect,
}

/// Analyse `zone` of `frame` and cut out the sprite.
/// `None` only when the zone does not overlap the frame at all.
pub fn capture_region(frame: &FrameBuffer, zone: Rect) -> Option<CapturedRegion> {
    let zone = zone.clip_to(frame.width, frame.height);
    if zone.is_empty() {
        return None;
    }

    let gray = grayscale(frame, zone);
    let fg = threshold_inv(&gray, CAPTURE_THRESHOLD);
    let bounds = match largest_blob(&fg) {
        Some(blob) if blob.area > MIN_CONTOUR_AREA => {
            debug!("capture: blob of {} px at {:?}", blob.area, blob.bounds);
            Rect::new(zone.x + blob.bounds.x, zone.y + blob.bounds.y, blob.bounds.w, blob.bounds.h)
        }
        other => {
            debug!("capture: no blob above {} px ({:?}), taking whole zone", MIN_CONTOUR_AREA, other);
            zone
        }
    };

    Some(CapturedRegion { image: crop_rgb(frame, bounds), origin: (bounds.x, bounds.y) })
}

/// Gray copy of `zone` (must already lie inside `frame`).
pub fn grayscale(frame: &FrameBuffer, zone: Rect) -> GrayImage {
    GrayImage::from_fn(zone.w as u32, zone.h as u32, |x, y| {
        let [r, g, b] = unpack_rgb(frame.get(zone.x as usize + x as usize, zone.y as usize + y as usize));
        Luma([luma(r, g, b)])
    })
}

/// 255 where gray <= `thresh` (dark object on bright background), else 0.
pub fn threshold_inv(gray: &GrayImage, thresh: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([if gray.get_pixel(x, y)[0] > thresh { 0 } else { 255 }])
    })
}

/// Largest 8-connected foreground component, measured by the area its outer
/// boundary encloses. A ring counts as the disc it outlines.
pub fn largest_blob(mask: &GrayImage) -> Option<Blob> {
    let (w, h) = (mask.width() as usize, mask.height() as usize);
    let mut labels = vec![0usize; w * h]; // 0 = background, k = component k
    let mut stack = Vec::new();
    let mut best: Option<Blob> = None;
    let mut next_label = 0;

    for start in 0..w * h {
        if labels[start] != 0 || mask.as_raw()[start] == 0 {
            continue;
        }
        next_label += 1;
        labels[start] = next_label;
        stack.push(start);

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (w, h, 0, 0);
        while let Some(i) = stack.pop() {
            let (x, y) = (i % w, i / w);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);

            for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                    let j = ny * w + nx;
                    if labels[j] == 0 && mask.as_raw()[j] != 0 {
                        labels[j] = next_label;
                        stack.push(j);
                    }
                }
            }
        }

        let bounds = Rect::new(
            min_x as i32,
            min_y as i32,
            (max_x - min_x + 1) as i32,
            (max_y - min_y + 1) as i32,
        );
        let area = enclosed_area(&labels, w, next_label, bounds);
        if best.is_none_or(|b| area > b.area) {
            best = Some(Blob { area, bounds });
        }
    }
    best
}

/// Pixels of `bounds` not reachable from outside without crossing component
/// `label`: the component itself plus every hole it surrounds.
fn enclosed_area(labels: &[usize], w: usize, label: usize, bounds: Rect) -> usize {
    // One-pixel ring around the bounds so the outside is a single region.
    let (bw, bh) = ((bounds.w + 2) as usize, (bounds.h + 2) as usize);
    let on_blob = |px: usize, py: usize| {
        if px == 0 || py == 0 || px == bw - 1 || py == bh - 1 {
            return false;
        }
        let x = bounds.x as usize + px - 1;
        let y = bounds.y as usize + py - 1;
        labels[y * w + x] == label
    };

    // Outside flood is 4-connected: a diagonal gap in an 8-connected outline is closed.
    let mut outside = vec![false; bw * bh];
    let mut stack = vec![0usize];
    outside[0] = true;
    let mut reached = 0usize;
    while let Some(i) = stack.pop() {
        reached += 1;
        let (x, y) = (i % bw, i / bw);
        let mut visit = |nx: usize, ny: usize| {
            let j = ny * bw + nx;
            if !outside[j] && !on_blob(nx, ny) {
                outside[j] = true;
                stack.push(j);
            }
        };
        if x > 0 { visit(x - 1, y); }
        if x + 1 < bw { visit(x + 1, y); }
        if y > 0 { visit(x, y - 1); }
        if y + 1 < bh { visit(x, y + 1); }
    }
    bw * bh - reached
}

/// Owned RGB copy of `rect` (inside `frame`).
pub fn crop_rgb(frame: &FrameBuffer, rect: Rect) -> RgbImage {
    RgbImage::from_fn(rect.w as u32, rect.h as u32, |x, y| {
        image::Rgb(unpack_rgb(frame.get(rect.x as usize + x as usize, rect.y as usize + y as usize)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pack_rgb;

    const WHITE: u32 = 0x00FF_FFFF;

    fn paint(fb: &mut FrameBuffer, r: Rect, color: u32) {
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                fb.set(x as usize, y as usize, color);
            }
        }
    }

    #[test]
    fn picks_largest_dark_blob() {
        let mut fb = FrameBuffer::filled(640, 480, WHITE);
        let zone = Rect::new(200, 150, 300, 250);
        paint(&mut fb, Rect::new(220, 170, 10, 10), pack_rgb(10, 10, 10)); // 100 px speck
        paint(&mut fb, Rect::new(300, 200, 60, 40), pack_rgb(30, 60, 20)); // the object

        let cap = capture_region(&fb, zone).unwrap();
        assert_eq!(cap.origin, (300, 200));
        assert_eq!(cap.image.dimensions(), (60, 40));
        assert_eq!(cap.image.get_pixel(0, 0).0, [30, 60, 20]);
    }

    #[test]
    fn small_blob_falls_back_to_whole_zone() {
        let mut fb = FrameBuffer::filled(640, 480, WHITE);
        let zone = Rect::new(200, 150, 300, 250);
        paint(&mut fb, Rect::new(250, 200, 20, 20), 0); // 400 px, under the minimum
        let cap = capture_region(&fb, zone).unwrap();
        assert_eq!(cap.origin, (200, 150));
        assert_eq!(cap.image.dimensions(), (300, 250));
    }

    #[test]
    fn bright_zone_falls_back_to_whole_zone() {
        let fb = FrameBuffer::filled(640, 480, WHITE);
        let cap = capture_region(&fb, Rect::new(10, 10, 50, 40)).unwrap();
        assert_eq!(cap.origin, (10, 10));
        assert_eq!(cap.image.dimensions(), (50, 40));
    }

    #[test]
    fn zone_is_clipped_to_frame() {
        let fb = FrameBuffer::filled(100, 100, WHITE);
        let cap = capture_region(&fb, Rect::new(80, 90, 50, 50)).unwrap();
        assert_eq!(cap.image.dimensions(), (20, 10));
        assert!(capture_region(&fb, Rect::new(200, 200, 10, 10)).is_none());
    }

    #[test]
    fn diagonal_pixels_join_one_blob() {
        let mut mask = GrayImage::new(5, 5);
        for i in 0..5 {
            mask.put_pixel(i, i, Luma([255]));
        }
        mask.put_pixel(4, 0, Luma([255]));
        let blob = largest_blob(&mask).unwrap();
        assert_eq!(blob.area, 5); // a diagonal line encloses nothing
        assert_eq!(blob.bounds, Rect::new(0, 0, 5, 5));
    }

    #[test]
    fn outline_counts_the_area_it_encloses() {
        let mut mask = GrayImage::new(12, 12);
        for i in 1..11 {
            for (x, y) in [(i, 1), (i, 10), (1, i), (10, i)] {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask.put_pixel(5, 5, Luma([255])); // island inside the ring, its own blob
        let blob = largest_blob(&mask).unwrap();
        assert_eq!(blob.area, 100);
        assert_eq!(blob.bounds, Rect::new(1, 1, 10, 10));
    }

    #[test]
    fn outlined_object_is_cropped_not_the_whole_zone() {
        let mut fb = FrameBuffer::filled(640, 480, WHITE);
        let zone = Rect::new(200, 150, 300, 250);
        // 1 px black frame, 100x100: only 396 dark pixels
        paint(&mut fb, Rect::new(250, 200, 100, 1), 0);
        paint(&mut fb, Rect::new(250, 299, 100, 1), 0);
        paint(&mut fb, Rect::new(250, 200, 1, 100), 0);
        paint(&mut fb, Rect::new(349, 200, 1, 100), 0);

        let cap = capture_region(&fb, zone).unwrap();
        assert_eq!(cap.origin, (250, 200));
        assert_eq!(cap.image.dimensions(), (100, 100));
        assert_eq!(cap.image.get_pixel(50, 50).0, [255, 255, 255]);
    }
}
