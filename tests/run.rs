// SPDX-License-Identifier: MPL-2.0

use fftfilter::{Error, FilterOptions, Image, Method, Options};
use image::{Rgb, RgbImage};

fn write_input(dir: &std::path::Path, width: u32, height: u32) -> std::path::PathBuf {
    let path = dir.join("input.png");
    let pixels = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 5 % 256) as u8, (y * 3 % 256) as u8, 128])
    });
    Image::from_rgb(pixels, Image::DEFAULT_GAMMA)
        .write(&path)
        .unwrap();
    path
}

fn options(input: std::path::PathBuf, output: std::path::PathBuf, method: Method) -> Options {
    Options {
        input,
        output,
        filter: FilterOptions {
            method,
            ..Default::default()
        },
    }
}

#[test]
fn every_method_writes_an_image_of_the_expected_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), 40, 24);
    for (method, size) in [
        (Method::Nop, (40, 24)),
        (Method::Gaussian, (40, 24)),
        (Method::Spectrum, (40, 24)),
        (Method::Downscale2x, (20, 12)),
        (Method::Upscale2x, (80, 48)),
    ] {
        let output = dir.path().join(format!("{method}.png"));
        fftfilter::run(&options(input.clone(), output.clone(), method)).unwrap();
        let written = Image::open(&output).unwrap();
        assert_eq!(written.dimensions(), size, "{method}");
    }
}

#[test]
fn nop_run_reproduces_the_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), 33, 21);
    let output = dir.path().join("nop.png");
    fftfilter::run(&options(input.clone(), output.clone(), Method::Nop)).unwrap();
    assert_eq!(
        Image::open(&output).unwrap().as_rgb(),
        Image::open(&input).unwrap().as_rgb()
    );
}

#[test]
fn invalid_weight_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), 8, 8);
    let output = dir.path().join("out.png");
    let mut options = options(input, output.clone(), Method::Gaussian);
    options.filter.weight = f64::NAN;
    let err = fftfilter::run(&options).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert!(!output.exists());
}

#[test]
fn unreadable_input_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("corrupt.png");
    std::fs::write(&input, b"not a png").unwrap();
    let output = dir.path().join("out.png");
    let err = fftfilter::run(&options(input, output.clone(), Method::Nop)).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(!output.exists());
}

#[test]
fn odd_image_cannot_be_downscaled() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), 9, 8);
    let output = dir.path().join("out.png");
    let err = fftfilter::run(&options(input, output.clone(), Method::Downscale2x)).unwrap_err();
    assert!(matches!(err, Error::UnsupportedDimensions { .. }));
    assert!(!output.exists());
}

#[test]
fn unwritable_output_is_an_encode_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), 8, 8);
    let output = dir.path().join("missing").join("out.png");
    let err = fftfilter::run(&options(input, output, Method::Gaussian)).unwrap_err();
    assert!(matches!(err, Error::Encode { .. }));
}
