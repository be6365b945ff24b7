// Draws one sprite onto the live frame: scale → mask → rotate → clip → blend.
// Visual: the captured patch appears at its object's spot, turned and sized
// by your hands, with near-black pixels left see-through, and simply gets
// cut off where it leaves the screen.
//
// Nothing in here fails: sizes that collapse to zero or rectangles that miss
// the frame just mean nothing is drawn this frame.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgb, RgbImage};
use log::trace;

use crate::store::{scaled_size, ManipulableObject};
use crate::types::{luma, pack_rgb, unpack_rgb, FrameBuffer, Rect};

/// Gray values strictly above this are foreground in a sprite mask.
pub const MASK_THRESHOLD: u8 = 1;

/// Blend `obj` centred on its current position.
pub fn render_object(background: &mut FrameBuffer, obj: &ManipulableObject) -> Option<Rect> {
    let drawn = render(background, &obj.image, obj.scale(), obj.rotation_degrees, obj.center());
    if drawn.is_none() {
        trace!("object {} not visible this frame", obj.id);
    }
    drawn
}

/// Blend `sprite` (at its original size) scaled by `scale` and rotated by
/// `rotation_degrees` onto `background`, centred on `center`.
/// Returns the screen rectangle that was written, if any.
pub fn render(
    background: &mut FrameBuffer,
    sprite: &RgbImage,
    scale: f32,
    rotation_degrees: f32,
    center: (i32, i32),
) -> Option<Rect> {
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }

    // 1) Resize to the display size.
    let (sw, sh) = scaled_size(sprite.dimensions(), scale);
    if sw == 0 || sh == 0 {
        return None;
    }
    let scaled = resize_rgb(sprite, sw, sh);

    // 2) Mask from the pixels we are about to draw (near-black = transparent).
    let mask = luminance_mask(&scaled);

    // 3) Rotate both, growing the canvas so corners survive.
    let (rotated, rotated_mask) = rotate_expand(&scaled, &mask, rotation_degrees);
    let (rw, rh) = rotated.dimensions();
    if rw == 0 || rh == 0 {
        return None;
    }

    // 4) Where it lands, and the part of it that is on screen.
    let dest = Rect::new(center.0 - rw as i32 / 2, center.1 - rh as i32 / 2, rw as i32, rh as i32);
    let visible = dest.clip_to(background.width, background.height);
    if visible.is_empty() {
        return None;
    }
    let (sx, sy) = ((visible.x - dest.x) as u32, (visible.y - dest.y) as u32);
    let (vw, vh) = (visible.w as u32, visible.h as u32);

    let crop = imageops::crop_imm(&rotated, sx, sy, vw, vh).to_image();
    let crop_mask = imageops::crop_imm(&rotated_mask, sx, sy, vw, vh).to_image();

    // 5) Crop and destination must agree exactly before blending.
    let crop = resize_rgb(&crop, vw, vh);
    let crop_mask = resize_gray(&crop_mask, vw, vh);

    // 6) Alpha blend.
    blend_into(background, visible, &crop, &crop_mask);
    Some(visible)
}

/// Bilinear resize; the identity size is a plain copy so pixels stay exact.
pub fn resize_rgb(src: &RgbImage, w: u32, h: u32) -> RgbImage {
    if src.dimensions() == (w, h) {
        return src.clone();
    }
    imageops::resize(src, w, h, FilterType::Triangle)
}

pub fn resize_gray(src: &GrayImage, w: u32, h: u32) -> GrayImage {
    if src.dimensions() == (w, h) {
        return src.clone();
    }
    imageops::resize(src, w, h, FilterType::Triangle)
}

/// 255 where the pixel's gray value is above [`MASK_THRESHOLD`], else 0.
pub fn luminance_mask(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let Rgb([r, g, b]) = *img.get_pixel(x, y);
        Luma([if luma(r, g, b) > MASK_THRESHOLD { 255 } else { 0 }])
    })
}

/// Canvas size that holds a `w`×`h` image rotated by `degrees` without cropping.
pub fn expanded_size(w: u32, h: u32, degrees: f32) -> (u32, u32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let nw = (cos * w as f32 + sin * h as f32).round() as u32;
    let nh = (sin * w as f32 + cos * h as f32).round() as u32;
    (nw, nh)
}

/// Rotate image and mask about their centre by `degrees` (positive turns
/// counter-clockwise on screen) onto an expanded canvas. Samples outside the
/// source read as black with mask 0.
pub fn rotate_expand(img: &RgbImage, mask: &GrayImage, degrees: f32) -> (RgbImage, GrayImage) {
    if degrees == 0.0 {
        return (img.clone(), mask.clone());
    }
    let (w, h) = img.dimensions();
    let (nw, nh) = expanded_size(w, h, degrees);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let (ncx, ncy) = (nw as f32 / 2.0, nh as f32 / 2.0);

    let mut out = RgbImage::new(nw, nh);
    let mut out_mask = GrayImage::new(nw, nh);
    for y in 0..nh {
        for x in 0..nw {
            // Inverse map: destination pixel → source coordinates.
            let dx = x as f32 - ncx;
            let dy = y as f32 - ncy;
            let src_x = cos * dx - sin * dy + cx;
            let src_y = sin * dx + cos * dy + cy;

            let m = bilinear(mask.width(), mask.height(), src_x, src_y, |px, py| {
                [mask.get_pixel(px, py)[0] as f32, 0.0, 0.0]
            })[0];
            if m <= 0.0 {
                continue; // outside the sprite: stays black / transparent
            }
            let c = bilinear(w, h, src_x, src_y, |px, py| {
                let Rgb([r, g, b]) = *img.get_pixel(px, py);
                [r as f32, g as f32, b as f32]
            });
            out.put_pixel(x, y, Rgb(c.map(to_u8)));
            out_mask.put_pixel(x, y, Luma([to_u8(m)]));
        }
    }
    (out, out_mask)
}

/// Bilinear sample at (`x`,`y`); neighbours outside `w`×`h` contribute zero.
#[inline]
fn bilinear(w: u32, h: u32, x: f32, y: f32, fetch: impl Fn(u32, u32) -> [f32; 3]) -> [f32; 3] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let mut acc = [0.0f32; 3];
    for (ox, oy, wgt) in [
        (0, 0, (1.0 - fx) * (1.0 - fy)),
        (1, 0, fx * (1.0 - fy)),
        (0, 1, (1.0 - fx) * fy),
        (1, 1, fx * fy),
    ] {
        if wgt <= 0.0 {
            continue;
        }
        let px = x0 as i64 + ox;
        let py = y0 as i64 + oy;
        if px < 0 || py < 0 || px >= w as i64 || py >= h as i64 {
            continue;
        }
        let v = fetch(px as u32, py as u32);
        for i in 0..3 {
            acc[i] += v[i] * wgt;
        }
    }
    acc
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// `out = src·a + dst·(1−a)` with `a = mask/255`, truncated to 8 bits.
/// `src` and `mask` must be exactly `rect`'s size and `rect` inside `fb`.
fn blend_into(fb: &mut FrameBuffer, rect: Rect, src: &RgbImage, mask: &GrayImage) {
    for y in 0..rect.h as u32 {
        let fy = (rect.y as u32 + y) as usize;
        for x in 0..rect.w as u32 {
            let m = mask.get_pixel(x, y)[0];
            if m == 0 {
                continue;
            }
            let fx = (rect.x as u32 + x) as usize;
            let a = m as f32 / 255.0;
            let inv = 1.0 - a;
            let s = src.get_pixel(x, y).0;
            let d = unpack_rgb(fb.get(fx, fy));
            let mix = |i: usize| (s[i] as f32 * a + d[i] as f32 * inv) as u8;
            fb.set(fx, fy, pack_rgb(mix(0), mix(1), mix(2)));
        }
    }
}
