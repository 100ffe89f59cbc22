use std::path::{Path, PathBuf};

use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbImage};
use ndarray::Array4;
use rayon::prelude::*;
use tracing::debug;

use crate::error::PreprocessError;

/// Input side length expected by the waste classifier.
pub const TARGET_SIZE: usize = 128;
pub const CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resample {
    Nearest,
    #[default]
    Bilinear,
}

#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    pub height: usize,
    pub width: usize,
    pub resample: Resample,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            height: TARGET_SIZE,
            width: TARGET_SIZE,
            resample: Resample::default(),
        }
    }
}

/// Normalized NHWC input tensor, shape `(1, height, width, 3)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Array4<f32>,
}

impl ImageTensor {
    pub fn shape(&self) -> [usize; 4] {
        let s = self.data.shape();
        [s[0], s[1], s[2], s[3]]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat values in row-major pixel order, RGB interleaved.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().copied()
    }

    pub fn into_array(self) -> Array4<f32> {
        self.data
    }
}

#[derive(Debug, Default)]
pub struct Processor {
    pub config: PreprocessConfig,
}

impl Processor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Resize to the configured size, drop alpha and scale channels to [0, 1].
    pub fn preprocess(&self, image: &DynamicImage) -> Result<ImageTensor, PreprocessError> {
        let (orig_width, orig_height) = (image.width(), image.height());
        if orig_width == 0 || orig_height == 0 {
            return Err(PreprocessError::InvalidInput(format!(
                "image has zero dimension {}x{}",
                orig_width, orig_height
            )));
        }

        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        let resized = self.resize(&rgb)?;

        let (width, height) = (self.config.width, self.config.height);
        let data: Vec<f32> = resized
            .pixels()
            .flat_map(|p| p.0.map(|c| c as f32 / 255.0))
            .collect();
        let data = Array4::from_shape_vec((1, height, width, CHANNELS), data)?;

        debug!(
            "preprocessed {}x{} image into {:?} tensor",
            orig_width,
            orig_height,
            data.shape()
        );
        Ok(ImageTensor { data })
    }

    /// Preprocess several images in parallel; one result per input, in order.
    pub fn preprocess_batch(&self, xs: &[DynamicImage]) -> Vec<Result<ImageTensor, PreprocessError>> {
        xs.par_iter().map(|x| self.preprocess(x)).collect()
    }

    /// Decode and preprocess image files in parallel, keeping input order.
    pub fn preprocess_paths(&self, paths: &[PathBuf]) -> Vec<Result<ImageTensor, PreprocessError>> {
        paths
            .par_iter()
            .map(|path| decode_image(path).and_then(|image| self.preprocess(&image)))
            .collect()
    }

    fn resize(&self, src: &DynamicImage) -> Result<RgbImage, PreprocessError> {
        let (width, height) = (self.config.width as u32, self.config.height as u32);
        if src.width() == width && src.height() == height {
            return Ok(src.to_rgb8());
        }

        let mut dst_image = Image::new(width, height, PixelType::U8x3);
        let alg = match self.config.resample {
            Resample::Nearest => ResizeAlg::Nearest,
            Resample::Bilinear => ResizeAlg::Convolution(FilterType::Bilinear),
        };
        let options = ResizeOptions::new().resize_alg(alg);

        let mut resizer = Resizer::new();
        resizer
            .resize(src, &mut dst_image, Some(&options))
            .map_err(|e| PreprocessError::Resize(e.to_string()))?;

        RgbImage::from_raw(width, height, dst_image.buffer().to_vec()).ok_or_else(|| {
            PreprocessError::Resize("resized buffer does not match target size".to_string())
        })
    }
}

/// Decode an image file, the "image is present" check before predicting.
pub fn decode_image(path: impl AsRef<Path>) -> Result<DynamicImage, PreprocessError> {
    let path = path.as_ref();
    image::open(path).map_err(|source| PreprocessError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn tensor_has_fixed_size_and_unit_range() {
        let processor = Processor::default();
        for (w, h) in [(640, 480), (37, 211), (128, 128), (1, 1)] {
            let tensor = processor.preprocess(&gradient(w, h)).unwrap();
            assert_eq!(tensor.shape(), [1, 128, 128, 3]);
            assert_eq!(tensor.len(), 49_152);
            assert!(tensor.values().all(|v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn solid_red_pixel_becomes_unit_red_triplets() {
        let red = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([255, 0, 0])));
        for resample in [Resample::Bilinear, Resample::Nearest] {
            let processor = Processor::new(PreprocessConfig {
                resample,
                ..PreprocessConfig::default()
            });
            let values: Vec<f32> = processor.preprocess(&red).unwrap().values().collect();
            assert_eq!(values.len(), 49_152);
            for triplet in values.chunks_exact(3) {
                assert_eq!(triplet, &[1.0, 0.0, 0.0]);
            }
        }
    }

    #[test]
    fn alpha_channel_is_discarded() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(128, 128, Rgba([0, 51, 255, 0])));
        let values: Vec<f32> = Processor::default().preprocess(&rgba).unwrap().values().collect();
        assert_eq!(&values[..3], &[0.0, 0.2, 1.0]);
    }

    #[test]
    fn pixel_order_is_row_major() {
        let mut img = RgbImage::new(128, 128);
        img.put_pixel(1, 0, Rgb([255, 255, 255]));
        img.put_pixel(0, 1, Rgb([0, 255, 0]));
        let values: Vec<f32> = Processor::default()
            .preprocess(&DynamicImage::ImageRgb8(img))
            .unwrap()
            .values()
            .collect();
        assert_eq!(&values[3..6], &[1.0, 1.0, 1.0]);
        assert_eq!(&values[128 * 3..128 * 3 + 3], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn zero_sized_image_is_invalid_input() {
        let empty = DynamicImage::new_rgb8(0, 0);
        assert!(matches!(
            Processor::default().preprocess(&empty),
            Err(PreprocessError::InvalidInput(_))
        ));
    }

    #[test]
    fn batch_keeps_input_order() {
        let images = vec![gradient(10, 10), DynamicImage::new_rgb8(0, 3), gradient(300, 20)];
        let results = Processor::default().preprocess_batch(&images);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(PreprocessError::InvalidInput(_))));
        assert!(results[2].is_ok());
    }

    #[test]
    fn undecodable_file_is_decode_error() {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        std::fs::write(file.path(), b"not a png").unwrap();
        assert!(matches!(
            decode_image(file.path()),
            Err(PreprocessError::Decode { .. })
        ));
    }
}
