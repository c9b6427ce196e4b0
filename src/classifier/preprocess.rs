use std::path::Path;

use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

use super::error::ClassifierError;

/// Per-channel normalization constants for models trained on ImageNet.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// The fixed preprocessing pipeline applied before inference.
///
/// Resizes the shortest image side to `resize_edge` with bilinear
/// filtering, takes a `crop_size` square from the center, scales pixels to
/// [0, 1] and normalizes each channel with the configured mean and standard
/// deviation. The per-pixel transform is folded into
/// `alpha = scale / std` and `beta = -mean / std` so normalization is a
/// single multiply-add per channel value.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    resize_edge: u32,
    crop_size: u32,
    alpha: [f32; 3],
    beta: [f32; 3],
}

impl Preprocessor {
    /// Creates a preprocessor with validated parameters.
    ///
    /// # Errors
    /// Returns `ValidationError` if the crop exceeds the resize edge, the
    /// resize edge is zero, or any standard deviation is not positive.
    pub fn new(
        resize_edge: u32,
        crop_size: u32,
        mean: [f32; 3],
        std: [f32; 3],
    ) -> Result<Self, ClassifierError> {
        if resize_edge == 0 || crop_size == 0 {
            return Err(ClassifierError::ValidationError(
                "Resize edge and crop size must be greater than 0".into(),
            ));
        }
        if crop_size > resize_edge {
            return Err(ClassifierError::ValidationError(format!(
                "Crop size {} cannot exceed resize edge {}",
                crop_size, resize_edge
            )));
        }
        for (i, &s) in std.iter().enumerate() {
            if s <= 0.0 {
                return Err(ClassifierError::ValidationError(format!(
                    "Standard deviation at index {} must be greater than 0, got {}",
                    i, s
                )));
            }
        }

        let scale = 1.0 / 255.0;
        let mut alpha = [0.0f32; 3];
        let mut beta = [0.0f32; 3];
        for c in 0..3 {
            alpha[c] = scale / std[c];
            beta[c] = -mean[c] / std[c];
        }

        Ok(Self {
            resize_edge,
            crop_size,
            alpha,
            beta,
        })
    }

    /// The standard ImageNet pipeline: resize to 256, center-crop 224,
    /// normalize with the pinned ImageNet mean and std.
    pub fn imagenet() -> Self {
        // Constants are valid, so this cannot fail
        Self::new(256, 224, IMAGENET_MEAN, IMAGENET_STD)
            .expect("ImageNet preprocessing constants are valid")
    }

    pub fn crop_size(&self) -> u32 {
        self.crop_size
    }

    /// Runs the full transform and returns a (1, 3, crop, crop) CHW tensor.
    pub fn process(&self, img: &DynamicImage) -> Result<Array4<f32>, ClassifierError> {
        let (width, height) = (img.width(), img.height());
        if width == 0 || height == 0 {
            return Err(ClassifierError::ImageDecodeError(
                "Image has zero width or height".into(),
            ));
        }

        let resized = self.resize_shortest_edge(img);
        let cropped = self.center_crop(&resized)?;
        Ok(self.normalize(&cropped))
    }

    /// Scales the image so its shortest side equals `resize_edge`,
    /// preserving aspect ratio.
    fn resize_shortest_edge(&self, img: &DynamicImage) -> DynamicImage {
        let (width, height) = (img.width(), img.height());
        let edge = self.resize_edge as f32;

        let (new_width, new_height) = if width <= height {
            let scaled = (height as f32 * edge / width as f32).round() as u32;
            (self.resize_edge, scaled.max(1))
        } else {
            let scaled = (width as f32 * edge / height as f32).round() as u32;
            (scaled.max(1), self.resize_edge)
        };

        img.resize_exact(new_width, new_height, FilterType::Triangle)
    }

    /// Extracts the central `crop_size` square from a resized image.
    fn center_crop(&self, img: &DynamicImage) -> Result<DynamicImage, ClassifierError> {
        let (width, height) = (img.width(), img.height());
        if width < self.crop_size || height < self.crop_size {
            return Err(ClassifierError::ValidationError(format!(
                "Resized image {}x{} is smaller than the {}px crop",
                width, height, self.crop_size
            )));
        }
        let x0 = (width - self.crop_size) / 2;
        let y0 = (height - self.crop_size) / 2;
        Ok(img.crop_imm(x0, y0, self.crop_size, self.crop_size))
    }

    /// Converts to RGB and writes the normalized pixels in CHW order.
    fn normalize(&self, img: &DynamicImage) -> Array4<f32> {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let (w, h) = (width as usize, height as usize);

        let mut data = vec![0.0f32; 3 * h * w];
        for (x, y, pixel) in rgb.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            for c in 0..3 {
                data[c * h * w + y * w + x] = pixel[c] as f32 * self.alpha[c] + self.beta[c];
            }
        }

        Array4::from_shape_vec((1, 3, h, w), data)
            .expect("CHW buffer length matches image dimensions")
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::imagenet()
    }
}

/// Decodes an image from disk.
///
/// Decode failures map to `ImageDecodeError`; color layouts the decoder
/// cannot represent map to `UnsupportedFormatError`.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage, ClassifierError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| match e {
        image::ImageError::Unsupported(e) => ClassifierError::UnsupportedFormatError(format!(
            "{}: {}",
            path.display(),
            e
        )),
        e => ClassifierError::ImageDecodeError(format!("{}: {}", path.display(), e)),
    })?;
    Ok(img)
}
