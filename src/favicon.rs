//! Derives the favicon set from the résumé photo: five PNGs at the sizes
//! browsers and home screens ask for, a two-resolution `favicon.ico`, and a
//! copy of the photo itself.
//!
//! The photo is center-cropped to a square once ("the base image"), optionally
//! enhanced, and every output is resized from that base.

use crate::config;
use crate::ico::{self, IconImage};
use image::imageops::{self, FilterType};
use image::{ImageError, ImageFormat, RgbaImage};
use log::{debug, info};
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// The PNG favicons and their conventional file names.
pub const FAVICONS: [(u32, &str); 5] = [
    (16, "favicon-16x16.png"),
    (32, "favicon-32x32.png"),
    (180, "apple-touch-icon.png"),
    (192, "android-chrome-192x192.png"),
    (512, "android-chrome-512x512.png"),
];

/// The resolutions bundled into `favicon.ico`.
pub const ICO_SIZES: [u32; 2] = [16, 32];

pub const ICO_FILE_NAME: &str = "favicon.ico";

// Outputs at or below this size get an extra sharpening pass.
const SMALL_ICON_MAX: u32 = 32;

const BASE_SHARPEN: Sharpen = Sharpen {
    sigma: 1.0,
    threshold: 2,
};

const SMALL_SHARPEN: Sharpen = Sharpen {
    sigma: 0.5,
    threshold: 0,
};

// Identity for now; kept as a tuning point.
const MODULATION: Modulation = Modulation {
    brightness: 1.0,
    saturation: 1.0,
};

// Slight contrast boost that keeps the midtone (128) in place.
const CONTRAST: Linear = Linear {
    a: 1.1,
    b: 128.0 - 128.0 * 1.1,
};

/// Inputs to [`generate`].
#[derive(Clone, Debug)]
pub struct Options {
    /// The YAML document holding the `photo` field.
    pub data_file: PathBuf,

    /// Where the favicons are written. Created if absent.
    pub output_directory: PathBuf,

    /// Whether to sharpen the base image and boost the contrast of the PNGs.
    pub enhance: bool,
}

impl Options {
    pub fn new(data_file: impl Into<PathBuf>) -> Options {
        Options {
            data_file: data_file.into(),
            output_directory: PathBuf::from("."),
            enhance: true,
        }
    }
}

/// Generates the favicon set described by `options` and returns the paths of
/// the files written, in the order they were written. Files written before a
/// failure are left in place.
pub fn generate(options: &Options) -> Result<Vec<PathBuf>> {
    let photo = config::photo(&options.data_file)?;
    info!("Processing image: {}", photo.display());

    let mut base = load_square(&photo)?;
    if options.enhance {
        base = MODULATION.apply(base);
        base = BASE_SHARPEN.apply(&base);
    }

    let dir = &options.output_directory;
    std::fs::create_dir_all(dir).map_err(|err| Error::Io {
        path: dir.to_owned(),
        err,
    })?;

    let mut written = Vec::with_capacity(FAVICONS.len() + 2);
    for (size, name) in FAVICONS.iter() {
        let mut icon = resize(&base, *size);
        if options.enhance {
            CONTRAST.apply(&mut icon);
        }
        let path = dir.join(name);
        icon.save(&path).map_err(|err| Error::Image {
            path: path.clone(),
            err,
        })?;
        info!("Generated {}", name);
        written.push(path);
    }

    let path = dir.join(ICO_FILE_NAME);
    write_file(&path, &favicon_ico(&base)?)?;
    info!("Generated {}", ICO_FILE_NAME);
    written.push(path);

    written.push(copy_photo(&photo, dir)?);
    Ok(written)
}

/// A square region of an image, anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crop {
    pub left: u32,
    pub top: u32,
    pub side: u32,
}

/// Computes the largest square centered in a `width` x `height` image. Odd
/// margins round down, so the extra pixel is trimmed from the right or
/// bottom.
pub fn square_crop(width: u32, height: u32) -> Crop {
    let side = width.min(height);
    Crop {
        left: (width - side) / 2,
        top: (height - side) / 2,
        side,
    }
}

fn load_square(path: &Path) -> Result<RgbaImage> {
    let (width, height) = image::image_dimensions(path).map_err(|err| Error::Dimensions {
        path: path.to_owned(),
        err,
    })?;
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage(path.to_owned()));
    }

    let image = image::open(path).map_err(|err| Error::Image {
        path: path.to_owned(),
        err,
    })?;
    let crop = square_crop(width, height);
    debug!(
        "cropping {}x{} to {}x{} at ({}, {})",
        width, height, crop.side, crop.side, crop.left, crop.top
    );
    Ok(image
        .crop_imm(crop.left, crop.top, crop.side, crop.side)
        .to_rgba8())
}

// Lanczos resize, plus a light sharpening pass for the tiny sizes.
fn resize(base: &RgbaImage, size: u32) -> RgbaImage {
    let resized = imageops::resize(base, size, size, FilterType::Lanczos3);
    if size <= SMALL_ICON_MAX {
        SMALL_SHARPEN.apply(&resized)
    } else {
        resized
    }
}

fn favicon_ico(base: &RgbaImage) -> Result<Vec<u8>> {
    let mut payloads = Vec::with_capacity(ICO_SIZES.len());
    for size in ICO_SIZES.iter() {
        let icon = resize(base, *size);
        let mut png = Vec::new();
        icon.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|err| Error::Image {
                path: PathBuf::from(ICO_FILE_NAME),
                err,
            })?;
        payloads.push((*size, png));
    }

    let images: Vec<IconImage> = payloads
        .iter()
        .map(|(size, png)| IconImage {
            width: *size,
            height: *size,
            payload: png,
        })
        .collect();
    Ok(ico::encode(&images)?)
}

// Copies the photo next to the favicons under its own file name. Copying a
// file onto itself would truncate it, so that case is skipped.
fn copy_photo(photo: &Path, dir: &Path) -> Result<PathBuf> {
    let file_name = photo
        .file_name()
        .ok_or_else(|| Error::PhotoFileName(photo.to_owned()))?;
    let destination = dir.join(file_name);

    if let (Ok(src), Ok(dst)) = (photo.canonicalize(), destination.canonicalize()) {
        if src == dst {
            debug!("{} is already in place", photo.display());
            return Ok(destination);
        }
    }

    std::fs::copy(photo, &destination).map_err(|err| Error::Io {
        path: destination.clone(),
        err,
    })?;
    info!("Copied {} to {}", photo.display(), destination.display());
    Ok(destination)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    std::fs::write(path, contents).map_err(|err| Error::Io {
        path: path.to_owned(),
        err,
    })
}

/// Unsharp masking.
#[derive(Clone, Copy, Debug)]
struct Sharpen {
    sigma: f32,
    threshold: i32,
}

impl Sharpen {
    fn apply(&self, image: &RgbaImage) -> RgbaImage {
        imageops::unsharpen(image, self.sigma, self.threshold)
    }
}

/// Brightness and saturation multipliers; 1.0 leaves a channel alone.
#[derive(Clone, Copy, Debug)]
struct Modulation {
    brightness: f32,
    saturation: f32,
}

impl Modulation {
    fn is_identity(&self) -> bool {
        (self.brightness - 1.0).abs() < f32::EPSILON
            && (self.saturation - 1.0).abs() < f32::EPSILON
    }

    fn apply(&self, mut image: RgbaImage) -> RgbaImage {
        if self.is_identity() {
            return image;
        }
        for pixel in image.pixels_mut() {
            let [r, g, b, _] = pixel.0;
            let luma = 0.2126 * r as f32 + 0.7152 * g as f32 + 0.0722 * b as f32;
            for channel in pixel.0[..3].iter_mut() {
                let saturated = luma + (*channel as f32 - luma) * self.saturation;
                *channel = clamp_channel(saturated * self.brightness);
            }
        }
        image
    }
}

/// Maps each color channel `c` to `a * c + b`. Alpha is left alone.
#[derive(Clone, Copy, Debug)]
struct Linear {
    a: f32,
    b: f32,
}

impl Linear {
    fn apply(&self, image: &mut RgbaImage) {
        for pixel in image.pixels_mut() {
            for channel in pixel.0[..3].iter_mut() {
                *channel = clamp_channel(self.a * *channel as f32 + self.b);
            }
        }
    }
}

fn clamp_channel(value: f32) -> u8 {
    value.round().max(0.0).min(255.0) as u8
}

/// The result of generating favicons.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem generating favicons.
#[derive(Debug)]
pub enum Error {
    /// Returned when the YAML document can't be loaded or lacks `photo`.
    Config(config::Error),

    /// Returned when the photo's dimensions can't be determined.
    Dimensions { path: PathBuf, err: ImageError },

    /// Returned when the photo has no pixels.
    EmptyImage(PathBuf),

    /// Returned when an image can't be decoded, encoded, or saved.
    Image { path: PathBuf, err: ImageError },

    /// Returned when the icon container can't be assembled.
    Ico(ico::Error),

    /// Returned when the photo path doesn't end in a file name.
    PhotoFileName(PathBuf),

    /// Returned for other I/O errors.
    Io { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Config(err) => err.fmt(f),
            Error::Dimensions { path, err } => {
                write!(f, "Could not get image metadata for `{}`: {}", path.display(), err)
            }
            Error::EmptyImage(path) => write!(f, "Image `{}` is empty", path.display()),
            Error::Image { path, err } => {
                write!(f, "Processing image `{}`: {}", path.display(), err)
            }
            Error::Ico(err) => write!(f, "Encoding {}: {}", ICO_FILE_NAME, err),
            Error::PhotoFileName(path) => {
                write!(f, "Photo path `{}` has no file name", path.display())
            }
            Error::Io { path, err } => write!(f, "Writing `{}`: {}", path.display(), err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            Error::Dimensions { path: _, err } => Some(err),
            Error::EmptyImage(_) => None,
            Error::Image { path: _, err } => Some(err),
            Error::Ico(err) => Some(err),
            Error::PhotoFileName(_) => None,
            Error::Io { path: _, err } => Some(err),
        }
    }
}

impl From<config::Error> for Error {
    /// Converts a [`config::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator when loading the YAML document.
    fn from(err: config::Error) -> Error {
        Error::Config(err)
    }
}

impl From<ico::Error> for Error {
    /// Converts an [`ico::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator when assembling `favicon.ico`.
    fn from(err: ico::Error) -> Error {
        Error::Ico(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use image::{GenericImageView, Rgba};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        data_file: PathBuf,
        photo: PathBuf,
        output_directory: PathBuf,
    }

    fn fixture(width: u32, height: u32) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("portrait.png");
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8, 255])
        })
        .save(&photo)
        .unwrap();

        let data_file = dir.path().join("data.yaml");
        std::fs::write(
            &data_file,
            format!("author: Jane Doe\nphoto: '{}'\n", photo.display()),
        )
        .unwrap();

        let output_directory = dir.path().join("public").join("icons");
        Fixture {
            _dir: dir,
            data_file,
            photo,
            output_directory,
        }
    }

    impl Fixture {
        fn options(&self, enhance: bool) -> Options {
            Options {
                data_file: self.data_file.clone(),
                output_directory: self.output_directory.clone(),
                enhance,
            }
        }
    }

    #[test]
    fn test_square_crop_landscape() {
        assert_eq!(
            Crop {
                left: 20,
                top: 0,
                side: 60
            },
            square_crop(100, 60)
        );
    }

    #[test]
    fn test_square_crop_portrait_odd_margin() {
        assert_eq!(
            Crop {
                left: 0,
                top: 2,
                side: 10
            },
            square_crop(10, 15)
        );
    }

    #[test]
    fn test_square_crop_square() {
        assert_eq!(
            Crop {
                left: 0,
                top: 0,
                side: 32
            },
            square_crop(32, 32)
        );
    }

    #[test]
    fn test_contrast_keeps_midtone() {
        let mut image = RgbaImage::from_pixel(1, 1, Rgba([128, 0, 255, 77]));
        CONTRAST.apply(&mut image);
        assert_eq!(Rgba([128, 0, 255, 77]), *image.get_pixel(0, 0));

        let mut image = RgbaImage::from_pixel(1, 1, Rgba([100, 200, 10, 255]));
        CONTRAST.apply(&mut image);
        assert_eq!(Rgba([97, 207, 0, 255]), *image.get_pixel(0, 0));
    }

    #[test]
    fn test_modulation_is_identity() {
        let image = RgbaImage::from_fn(4, 4, |x, y| Rgba([x as u8 * 60, y as u8 * 60, 9, 255]));
        assert!(MODULATION.is_identity());
        assert_eq!(image, MODULATION.apply(image.clone()));
    }

    #[test]
    fn test_generate() -> Result<()> {
        let fixture = fixture(90, 60);
        let written = generate(&fixture.options(true))?;
        assert_eq!(FAVICONS.len() + 2, written.len());

        for (size, name) in FAVICONS.iter() {
            let path = fixture.output_directory.join(name);
            assert_eq!(
                (*size, *size),
                image::image_dimensions(&path).map_err(|err| Error::Image { path, err })?
            );
        }

        let ico = std::fs::read(fixture.output_directory.join(ICO_FILE_NAME)).unwrap();
        assert_eq!(&[0u8, 0, 1, 0, 2, 0][..], &ico[..6]);
        for (i, size) in ICO_SIZES.iter().enumerate() {
            let entry = &ico[6 + 16 * i..6 + 16 * (i + 1)];
            assert_eq!(*size as u8, entry[0]);
            assert_eq!(*size as u8, entry[1]);
            let len = u32::from_le_bytes([entry[8], entry[9], entry[10], entry[11]]) as usize;
            let offset = u32::from_le_bytes([entry[12], entry[13], entry[14], entry[15]]) as usize;
            let payload = &ico[offset..offset + len];
            let png = image::load_from_memory_with_format(payload, ImageFormat::Png).map_err(
                |err| Error::Image {
                    path: PathBuf::from(ICO_FILE_NAME),
                    err,
                },
            )?;
            assert_eq!((*size, *size), (png.width(), png.height()));
        }

        let copied = fixture.output_directory.join("portrait.png");
        assert_eq!(
            std::fs::read(&fixture.photo).unwrap(),
            std::fs::read(&copied).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_generate_without_enhancement() -> Result<()> {
        let fixture = fixture(40, 70);
        generate(&fixture.options(false))?;
        assert!(fixture.output_directory.join("apple-touch-icon.png").is_file());
        Ok(())
    }

    #[test]
    fn test_generate_is_deterministic() -> Result<()> {
        let fixture = fixture(50, 50);
        let first = generate(&fixture.options(true))?
            .iter()
            .map(|p| std::fs::read(p).unwrap())
            .collect::<Vec<_>>();
        let second = generate(&fixture.options(true))?
            .iter()
            .map(|p| std::fs::read(p).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_missing_photo_field() {
        let fixture = fixture(8, 8);
        std::fs::write(&fixture.data_file, "author: Jane Doe\n").unwrap();
        match generate(&fixture.options(true)) {
            Err(Error::Config(config::Error::MissingField { field, .. })) => {
                assert_eq!("photo", field)
            }
            other => panic!("expected missing field, got {:?}", other),
        }
        assert!(!fixture.output_directory.exists());
    }

    #[test]
    fn test_unreadable_photo() {
        let fixture = fixture(8, 8);
        std::fs::write(&fixture.photo, "not an image").unwrap();
        match generate(&fixture.options(true)) {
            Err(Error::Dimensions { .. }) => {}
            other => panic!("expected dimensions error, got {:?}", other),
        }
        assert!(!fixture.output_directory.exists());
    }

    #[test]
    fn test_copy_photo_onto_itself() -> Result<()> {
        let fixture = fixture(8, 8);
        let before = std::fs::read(&fixture.photo).unwrap();
        let dir = fixture.photo.parent().unwrap();
        assert_eq!(fixture.photo, copy_photo(&fixture.photo, dir)?);
        assert_eq!(before, std::fs::read(&fixture.photo).unwrap());
        Ok(())
    }
}
