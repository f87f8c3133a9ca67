//! Decoding and scaling of the radar image.
//!
//! The radar endpoint serves an animated GIF whose last frame is the most recent observation.
//! Every refresh turns whatever bytes the [`ImageSource`] produced into a single RGBA bitmap
//! sized for the screen, falling back to a local image when the bytes can't be used.

use std::io::Cursor;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, Frame, ImageFormat, ImageResult, RgbaImage};

use crate::downloader::ImageSource;
use crate::error::{Error, Result};

/// Natural size of the radar image. The output keeps this aspect ratio whatever the target.
pub const SOURCE_WIDTH: u32 = 550;
pub const SOURCE_HEIGHT: u32 = 512;

/// The frame kept from a decoded image, along with its position in the animation.
pub struct LastFrame {
    pub index: usize,
    pub image: RgbaImage,
}

/// Size of the displayed image for a screen of `target` pixels.
pub fn scaled_size(target: (u32, u32)) -> (u32, u32) {
    let (target_width, target_height) = target;
    let scale = f64::min(
        f64::from(target_width) / f64::from(SOURCE_WIDTH),
        f64::from(target_height) / f64::from(SOURCE_HEIGHT),
    );

    (
        (f64::from(SOURCE_WIDTH) * scale).round() as u32,
        (f64::from(SOURCE_HEIGHT) * scale).round() as u32,
    )
}

pub fn scale(frame: &RgbaImage, target: (u32, u32)) -> RgbaImage {
    let (width, height) = scaled_size(target);
    imageops::resize(frame, width, height, FilterType::Triangle)
}

/// Drain a frame sequence, keeping the last frame that decoded.
///
/// The sequence ends either when it is exhausted or at the first frame that fails to decode.
/// Returns `None` if not even the first frame could be read.
pub fn last_frame<I>(frames: I) -> Option<LastFrame>
where
    I: IntoIterator<Item = ImageResult<Frame>>,
{
    let mut last = None;

    for (index, frame) in frames.into_iter().enumerate() {
        match frame {
            Ok(frame) => {
                last = Some(LastFrame {
                    index,
                    image: frame.into_buffer(),
                })
            }
            Err(e) => {
                log::warn!("Frame {} could not be decoded, stopping there: {}", index, e);
                break;
            }
        }
    }

    last
}

/// Decode raw image bytes, picking the last frame of animated GIFs and APNGs.
pub fn decode(bytes: &[u8]) -> Result<LastFrame> {
    match image::guess_format(bytes)? {
        ImageFormat::Gif => {
            let decoder = GifDecoder::new(Cursor::new(bytes))?;
            last_frame(decoder.into_frames()).ok_or(Error::NoFrames)
        }
        ImageFormat::Png => {
            let decoder = PngDecoder::new(Cursor::new(bytes))?;
            if decoder.is_apng() {
                last_frame(decoder.apng().into_frames()).ok_or(Error::NoFrames)
            } else {
                single_frame(bytes, ImageFormat::Png)
            }
        }
        format => single_frame(bytes, format),
    }
}

fn single_frame(bytes: &[u8], format: ImageFormat) -> Result<LastFrame> {
    let image = image::load_from_memory_with_format(bytes, format)?.into_rgba8();
    Ok(LastFrame { index: 0, image })
}

/// Load the local image shown when the radar can't be fetched or decoded.
/// Failing here is fatal, there is nothing left to fall back on.
pub fn load_fallback(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|image| image.into_rgba8())
        .map_err(|source| Error::Fallback {
            path: path.to_owned(),
            source,
        })
}

/// Run one refresh cycle: fetch, decode, and scale to `target`.
///
/// Fetch and decode failures are logged and replaced by the fallback image. The only error
/// returned is a failure to load the fallback itself.
pub fn refresh(
    source: &mut dyn ImageSource,
    fallback: &Path,
    target: (u32, u32),
) -> Result<RgbaImage> {
    let frame = match source.fetch().and_then(|bytes| decode(&bytes)) {
        Ok(last) => {
            log::info!(
                "Decoded radar frame {} ({}x{})",
                last.index,
                last.image.width(),
                last.image.height()
            );
            last.image
        }
        Err(e) if e.is_recoverable() => {
            log::warn!("{}, showing {:?} instead", e, fallback);
            load_fallback(fallback)?
        }
        Err(e) => return Err(e),
    };

    Ok(scale(&frame, target))
}
