//! Sample descriptors and the buffers handed to the inference engine.
//!
//! A descriptor is an immutable value: every numeric field is strictly
//! positive once constructed. [`AudioFormat::new`] and [`ImageFormat::new`]
//! treat a zero field as a contract violation and panic; the `try_new`
//! variants return [`EmbedError::InvalidFormat`] instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EmbedError;
use crate::region::Extent;

/// Channel count used when only a sample rate is given.
pub const DEFAULT_CHANNEL_COUNT: u32 = 1;

/// Format of an incoming audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AudioFormatRepr")]
pub struct AudioFormat {
    channel_count: u32,
    sample_rate: u32,
}

#[derive(Deserialize)]
struct AudioFormatRepr {
    #[serde(default = "default_channel_count")]
    channel_count: u32,
    sample_rate: u32,
}

fn default_channel_count() -> u32 {
    DEFAULT_CHANNEL_COUNT
}

impl TryFrom<AudioFormatRepr> for AudioFormat {
    type Error = EmbedError;

    fn try_from(r: AudioFormatRepr) -> Result<Self, Self::Error> {
        Self::try_new(r.channel_count, r.sample_rate)
    }
}

impl AudioFormat {
    /// Creates an audio format.
    ///
    /// # Panics
    ///
    /// Panics if `channel_count` or `sample_rate` is zero.
    pub fn new(channel_count: u32, sample_rate: u32) -> Self {
        assert!(channel_count > 0, "embedder: channel_count must be positive");
        assert!(sample_rate > 0, "embedder: sample_rate must be positive");
        Self {
            channel_count,
            sample_rate,
        }
    }

    /// Creates a mono audio format with the given sample rate.
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self::new(DEFAULT_CHANNEL_COUNT, sample_rate)
    }

    /// Fallible constructor for formats coming from untrusted configuration.
    pub fn try_new(channel_count: u32, sample_rate: u32) -> Result<Self, EmbedError> {
        if channel_count == 0 {
            return Err(EmbedError::InvalidFormat("channel_count must be positive".into()));
        }
        if sample_rate == 0 {
            return Err(EmbedError::InvalidFormat("sample_rate must be positive".into()));
        }
        Ok(Self {
            channel_count,
            sample_rate,
        })
    }

    pub fn channel_count(&self) -> u32 {
        self.channel_count
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Pixel layout of an image buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Rgba,
    Rgb,
    Gray,
    Nv12,
    Nv21,
    Yv12,
    Yv21,
}

impl PixelFormat {
    /// Returns true for the planar / semi-planar YUV 4:2:0 layouts.
    pub fn is_yuv(&self) -> bool {
        matches!(self, Self::Nv12 | Self::Nv21 | Self::Yv12 | Self::Yv21)
    }

    /// Bytes per pixel for packed layouts; `None` for YUV.
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            Self::Rgba => Some(4),
            Self::Rgb => Some(3),
            Self::Gray => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rgba => "rgba",
            Self::Rgb => "rgb",
            Self::Gray => "gray",
            Self::Nv12 => "nv12",
            Self::Nv21 => "nv21",
            Self::Yv12 => "yv12",
            Self::Yv21 => "yv21",
        };
        f.write_str(s)
    }
}

/// Format of an incoming image frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ImageFormatRepr")]
pub struct ImageFormat {
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
}

#[derive(Deserialize)]
struct ImageFormatRepr {
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
}

impl TryFrom<ImageFormatRepr> for ImageFormat {
    type Error = EmbedError;

    fn try_from(r: ImageFormatRepr) -> Result<Self, Self::Error> {
        Self::try_new(r.width, r.height, r.pixel_format)
    }
}

impl ImageFormat {
    /// Creates an image format.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn new(width: u32, height: u32, pixel_format: PixelFormat) -> Self {
        assert!(width > 0, "embedder: width must be positive");
        assert!(height > 0, "embedder: height must be positive");
        Self {
            width,
            height,
            pixel_format,
        }
    }

    pub fn try_new(width: u32, height: u32, pixel_format: PixelFormat) -> Result<Self, EmbedError> {
        if width == 0 || height == 0 {
            return Err(EmbedError::InvalidFormat(format!(
                "image size must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            pixel_format,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Expected byte length of one frame in this format.
    ///
    /// YUV 4:2:0 layouts carry a full-resolution luma plane plus two chroma
    /// planes subsampled by two on each axis (rounded up).
    ///
    /// Returns `None` when the length does not fit in `usize`.
    pub fn buffer_len(&self) -> Option<usize> {
        let w = self.width as usize;
        let h = self.height as usize;
        let luma = w.checked_mul(h)?;
        match self.pixel_format.bytes_per_pixel() {
            Some(bpp) => luma.checked_mul(bpp),
            None => {
                let chroma = w.div_ceil(2).checked_mul(h.div_ceil(2))?.checked_mul(2)?;
                luma.checked_add(chroma)
            }
        }
    }
}

/// Describes the shape of an input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SampleDescriptor {
    Audio(AudioFormat),
    Image(ImageFormat),
}

/// Borrowed sample data that is known to match its descriptor.
#[derive(Debug, Clone, Copy)]
pub struct SampleBuffer<'a> {
    data: SampleData<'a>,
}

#[derive(Debug, Clone, Copy)]
enum SampleData<'a> {
    Audio { format: AudioFormat, samples: &'a [f32] },
    Image { format: ImageFormat, data: &'a [u8] },
}

impl<'a> SampleBuffer<'a> {
    /// Wraps interleaved audio samples. The buffer must hold at least one
    /// complete frame and no partial frame.
    pub fn audio(format: AudioFormat, samples: &'a [f32]) -> Result<Self, EmbedError> {
        let channels = format.channel_count() as usize;
        if samples.is_empty() {
            return Err(EmbedError::InvalidInput("empty audio buffer".into()));
        }
        if samples.len() % channels != 0 {
            return Err(EmbedError::InvalidInput(format!(
                "{} samples is not a whole number of {channels}-channel frames",
                samples.len()
            )));
        }
        Ok(Self {
            data: SampleData::Audio { format, samples },
        })
    }

    /// Wraps a decoded image frame. The byte length must match the format.
    pub fn image(format: ImageFormat, data: &'a [u8]) -> Result<Self, EmbedError> {
        let want = format.buffer_len().ok_or_else(|| {
            EmbedError::InvalidInput(format!(
                "{} image of {}x{} is too large to address",
                format.pixel_format(),
                format.width(),
                format.height()
            ))
        })?;
        if data.len() != want {
            return Err(EmbedError::InvalidInput(format!(
                "{} image of {}x{} needs {want} bytes, got {}",
                format.pixel_format(),
                format.width(),
                format.height(),
                data.len()
            )));
        }
        Ok(Self {
            data: SampleData::Image { format, data },
        })
    }

    pub fn descriptor(&self) -> SampleDescriptor {
        match self.data {
            SampleData::Audio { format, .. } => SampleDescriptor::Audio(format),
            SampleData::Image { format, .. } => SampleDescriptor::Image(format),
        }
    }

    /// Interleaved audio samples, or `None` for an image buffer.
    pub fn audio_samples(&self) -> Option<&'a [f32]> {
        match self.data {
            SampleData::Audio { samples, .. } => Some(samples),
            SampleData::Image { .. } => None,
        }
    }

    /// Raw image bytes, or `None` for an audio buffer.
    pub fn image_data(&self) -> Option<&'a [u8]> {
        match self.data {
            SampleData::Image { data, .. } => Some(data),
            SampleData::Audio { .. } => None,
        }
    }

    /// Number of audio frames (samples per channel); zero for images.
    pub fn frame_count(&self) -> usize {
        match self.data {
            SampleData::Audio { format, samples } => samples.len() / format.channel_count() as usize,
            SampleData::Image { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_format_default_channel_count() {
        let f = AudioFormat::with_sample_rate(16000);
        assert_eq!(f.channel_count(), 1);
        assert_eq!(f.sample_rate(), 16000);
    }

    #[test]
    #[should_panic(expected = "channel_count must be positive")]
    fn audio_format_zero_channels_panics() {
        AudioFormat::new(0, 16000);
    }

    #[test]
    #[should_panic(expected = "sample_rate must be positive")]
    fn audio_format_zero_rate_panics() {
        AudioFormat::new(2, 0);
    }

    #[test]
    fn audio_format_try_new_rejects_zero() {
        assert!(matches!(
            AudioFormat::try_new(0, 44100),
            Err(EmbedError::InvalidFormat(_))
        ));
        assert!(AudioFormat::try_new(2, 44100).is_ok());
    }

    #[test]
    fn audio_format_deserialize_defaults_and_validates() {
        let f: AudioFormat = serde_json::from_str(r#"{"sample_rate": 8000}"#).unwrap();
        assert_eq!(f, AudioFormat::new(1, 8000));
        assert!(serde_json::from_str::<AudioFormat>(r#"{"channel_count": 0, "sample_rate": 8000}"#).is_err());
    }

    #[test]
    fn image_buffer_len_packed() {
        assert_eq!(ImageFormat::new(4, 3, PixelFormat::Rgb).buffer_len(), Some(36));
        assert_eq!(ImageFormat::new(4, 3, PixelFormat::Rgba).buffer_len(), Some(48));
        assert_eq!(ImageFormat::new(4, 3, PixelFormat::Gray).buffer_len(), Some(12));
    }

    #[test]
    fn image_buffer_len_yuv_rounds_chroma_up() {
        // 3x3 luma + two 2x2 chroma planes.
        assert_eq!(ImageFormat::new(3, 3, PixelFormat::Nv21).buffer_len(), Some(9 + 8));
        assert_eq!(ImageFormat::new(4, 4, PixelFormat::Yv12).buffer_len(), Some(16 + 8));
    }

    #[test]
    fn image_buffer_len_overflow_is_none() {
        assert_eq!(ImageFormat::new(u32::MAX, u32::MAX, PixelFormat::Rgba).buffer_len(), None);
        assert_eq!(ImageFormat::new(u32::MAX, u32::MAX, PixelFormat::Nv12).buffer_len(), None);
    }

    #[test]
    fn sample_buffer_image_rejects_unaddressable_format() {
        let fmt = ImageFormat::new(u32::MAX, u32::MAX, PixelFormat::Rgba);
        assert!(matches!(
            SampleBuffer::image(fmt, &[0u8; 16]),
            Err(EmbedError::InvalidInput(_))
        ));
    }

    #[test]
    fn image_format_try_new_rejects_zero() {
        assert!(ImageFormat::try_new(0, 10, PixelFormat::Rgb).is_err());
        assert!(serde_json::from_str::<ImageFormat>(
            r#"{"width": 10, "height": 0, "pixel_format": "rgb"}"#
        )
        .is_err());
    }

    #[test]
    fn sample_buffer_image_checks_length() {
        let fmt = ImageFormat::new(2, 2, PixelFormat::Rgb);
        assert!(SampleBuffer::image(fmt, &[0u8; 12]).is_ok());
        assert!(matches!(
            SampleBuffer::image(fmt, &[0u8; 11]),
            Err(EmbedError::InvalidInput(_))
        ));
    }

    #[test]
    fn sample_buffer_audio_checks_frames() {
        let fmt = AudioFormat::new(2, 16000);
        let buf = SampleBuffer::audio(fmt, &[0.0; 8]).unwrap();
        assert_eq!(buf.frame_count(), 4);
        assert_eq!(buf.descriptor(), SampleDescriptor::Audio(fmt));
        assert!(buf.image_data().is_none());
        assert!(SampleBuffer::audio(fmt, &[0.0; 7]).is_err());
        assert!(SampleBuffer::audio(fmt, &[]).is_err());
    }

    #[test]
    fn descriptor_serde_tagged() {
        let d = SampleDescriptor::Image(ImageFormat::new(8, 6, PixelFormat::Gray));
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains(r#""kind":"image""#), "got {json}");
        let back: SampleDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }
}
