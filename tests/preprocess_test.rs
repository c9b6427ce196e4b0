use image::{DynamicImage, RgbImage};
use retina::Preprocessor;

fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb(rgb)))
}

#[test]
fn test_output_shape_is_fixed() -> Result<(), Box<dyn std::error::Error>> {
    let preprocessor = Preprocessor::imagenet();

    // Landscape, portrait, square, already-cropped, extreme aspect ratio
    let sizes = [
        (640, 480),
        (375, 500),
        (300, 300),
        (224, 224),
        (2000, 100),
        (100, 2000),
    ];

    for (width, height) in sizes {
        let img = solid_image(width, height, [120, 80, 40]);
        let tensor = preprocessor.process(&img)?;
        assert_eq!(
            tensor.shape(),
            &[1, 3, 224, 224],
            "unexpected shape for {}x{} input",
            width,
            height
        );
    }
    Ok(())
}

#[test]
fn test_small_images_are_upscaled() -> Result<(), Box<dyn std::error::Error>> {
    let preprocessor = Preprocessor::imagenet();
    let img = solid_image(32, 48, [200, 200, 200]);
    let tensor = preprocessor.process(&img)?;
    assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    Ok(())
}

#[test]
fn test_normalization_values() -> Result<(), Box<dyn std::error::Error>> {
    let preprocessor = Preprocessor::imagenet();

    // A solid color survives bilinear resizing and cropping unchanged, so
    // every output value must equal (v/255 - mean) / std for its channel.
    let img = solid_image(400, 300, [255, 128, 0]);
    let tensor = preprocessor.process(&img)?;

    let expected = [
        (1.0 - 0.485) / 0.229,
        (128.0 / 255.0 - 0.456) / 0.224,
        (0.0 - 0.406) / 0.225,
    ];

    for c in 0..3 {
        let value = tensor[[0, c, 100, 100]];
        assert!(
            (value - expected[c]).abs() < 1e-4,
            "channel {}: expected {}, got {}",
            c,
            expected[c],
            value
        );
    }
    Ok(())
}

#[test]
fn test_preprocessing_is_deterministic() -> Result<(), Box<dyn std::error::Error>> {
    let preprocessor = Preprocessor::imagenet();

    // A gradient so that resampling actually has work to do
    let mut buf = RgbImage::new(500, 350);
    for (x, y, pixel) in buf.enumerate_pixels_mut() {
        *pixel = image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
    }
    let img = DynamicImage::ImageRgb8(buf);

    let first = preprocessor.process(&img)?;
    let second = preprocessor.process(&img)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_grayscale_input_is_converted() -> Result<(), Box<dyn std::error::Error>> {
    let preprocessor = Preprocessor::imagenet();
    let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
        320,
        240,
        image::Luma([90u8]),
    ));
    let tensor = preprocessor.process(&gray)?;
    assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    Ok(())
}
