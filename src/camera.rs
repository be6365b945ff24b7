// Opens the webcam and fills the frame buffer the sprites are composited onto.
// Visual expectation: every `read_into` call replaces the screen buffer with
// the newest camera image, ready for sprites and HUD to be drawn on top.

use log::info;
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use crate::error::Error;
use crate::types::{pack_rgb, FrameBuffer};

pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` as close as possible to `width`×`height` at 30 FPS.
    pub fn open(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let fmt = CameraFormat::new(Resolution::new(width, height), FrameFormat::YUYV, 30);
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::CameraInit(format!("Create camera {index}: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The driver may settle on a different mode than the one we asked for.
        let actual = cam.resolution();
        if (actual.width(), actual.height()) != (width, height) {
            info!("Camera delivers {}x{} (asked for {width}x{height})", actual.width(), actual.height());
        }
        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }

    /// Block for the next frame and decode it into `out` (resized if needed).
    pub fn read_into(&mut self, out: &mut FrameBuffer) -> Result<(), Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;
        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = (rgb.width() as usize, rgb.height() as usize);
        if out.width != w || out.height != h {
            *out = FrameBuffer::filled(w, h, 0);
        }
        for (dst, px) in out.pixels.iter_mut().zip(rgb.as_raw().chunks_exact(3)) {
            *dst = pack_rgb(px[0], px[1], px[2]);
        }
        Ok(())
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
