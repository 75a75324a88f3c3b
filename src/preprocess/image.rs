/// Image preprocessing for the classifier.
///
/// Uploaded bytes (PNG or JPEG) are decoded, reduced to a single luminance
/// channel, resized to the model's input size, and normalized to [0, 1].
use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::io::{Limits, Reader};
use image::{DynamicImage, GrayImage, ImageFormat, ImageOutputFormat, Luma};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::preprocess::tensor::ImageTensor;

/// Largest width or height accepted from an upload. Headers may declare far
/// more pixels than the compressed body suggests.
pub const MAX_DECODE_DIMENSION: u32 = 16_384;

/// Upper bound on decoder allocations for a single upload.
pub const MAX_DECODE_ALLOC: u64 = 256 * 1024 * 1024;

/// Resampling filter used for the resize step.
///
/// The default, Catmull-Rom, is a bicubic kernel and matches what common
/// Python imaging stacks use when no filter is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(f: ResizeFilter) -> FilterType {
        match f {
            ResizeFilter::Nearest    => FilterType::Nearest,
            ResizeFilter::Triangle   => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian   => FilterType::Gaussian,
            ResizeFilter::Lanczos3   => FilterType::Lanczos3,
        }
    }
}

/// Output of the preprocessor: the model input plus the resized grayscale
/// image it was built from.
#[derive(Debug, Clone)]
pub struct PreprocessedImage {
    pub tensor: ImageTensor,
    pub image: GrayImage,
}

impl PreprocessedImage {
    /// Encodes the resized grayscale image as PNG for display.
    pub fn preview_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(self.image.clone())
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)?;
        Ok(buf)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessor {
    width: u32,
    height: u32,
    filter: ResizeFilter,
}

impl Preprocessor {
    pub fn new(width: u32, height: u32, filter: ResizeFilter) -> Preprocessor {
        Preprocessor { width, height, filter }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Shape of every tensor this preprocessor produces.
    pub fn output_shape(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, 1]
    }

    /// Number of scalar values per image.
    pub fn input_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn run(&self, bytes: &[u8]) -> Result<PreprocessedImage, PipelineError> {
        let format = sniff_format(bytes)?;
        let decoded = decode_limited(bytes, format)?;
        let gray = to_luma_601(decoded);
        let resized = imageops::resize(&gray, self.width, self.height, self.filter.into());
        let tensor = ImageTensor::from_gray_pixels(self.width, self.height, resized.as_raw())
            .ok_or_else(|| PipelineError::Inference("resized image has unexpected pixel count".into()))?;
        Ok(PreprocessedImage { tensor, image: resized })
    }
}

/// Identifies the upload from its leading bytes. Only PNG and JPEG pass.
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyUpload);
    }
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png)  => Ok(ImageFormat::Png),
        Ok(ImageFormat::Jpeg) => Ok(ImageFormat::Jpeg),
        Ok(other)             => Err(PipelineError::UnsupportedFormat(format!("{:?}", other))),
        Err(_)                => Err(PipelineError::UnsupportedFormat("unrecognized data".into())),
    }
}

/// Decodes `bytes` as `format`, refusing images whose declared size exceeds
/// `MAX_DECODE_DIMENSION` on either side or needs more than `MAX_DECODE_ALLOC`.
fn decode_limited(bytes: &[u8], format: ImageFormat) -> Result<DynamicImage, PipelineError> {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_DECODE_DIMENSION);
    limits.max_image_height = Some(MAX_DECODE_DIMENSION);
    limits.max_alloc = Some(MAX_DECODE_ALLOC);

    let mut reader = Reader::with_format(Cursor::new(bytes), format);
    reader.limits(limits);
    Ok(reader.decode()?)
}

/// ITU-R 601-2 luma, `L = R*299/1000 + G*587/1000 + B*114/1000`, in 16-bit
/// fixed point. Alpha is ignored.
fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

/// Single-channel view of `img`. Grayscale sources keep their values; color
/// sources go through `luma_601`.
pub fn to_luma_601(img: DynamicImage) -> GrayImage {
    match img {
        DynamicImage::ImageLuma8(g) => g,
        other @ (DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)) => other.into_luma8(),
        other => {
            let rgb = other.into_rgb8();
            GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                let [r, g, b] = rgb.get_pixel(x, y).0;
                Luma([luma_601(r, g, b)])
            })
        }
    }
}
