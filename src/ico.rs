//! Assembles a multi-resolution `.ico` container from already-encoded image
//! payloads. Nothing here touches pixels, so any bytes will do as a payload.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! header     reserved: u16 = 0, type: u16 = 1, count: u16
//! directory  count x 16-byte entries (see `write_entry`)
//! payloads   concatenated, in directory order
//! ```

use std::convert::TryFrom;
use std::fmt;

const HEADER_LEN: usize = 6;
const ENTRY_LEN: usize = 16;
const TYPE_ICON: u16 = 1;
const COLOR_PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 32;

/// One image in the container: its pixel dimensions and its encoded bytes
/// (typically a PNG).
#[derive(Clone, Copy, Debug)]
pub struct IconImage<'a> {
    pub width: u32,
    pub height: u32,
    pub payload: &'a [u8],
}

/// Encodes `images` into a single `.ico` file. The offset recorded for each
/// image is the header and directory length plus the sizes of all preceding
/// payloads. Payloads must be non-empty, which keeps the offsets strictly
/// increasing.
pub fn encode(images: &[IconImage]) -> Result<Vec<u8>> {
    let count = u16::try_from(images.len()).map_err(|_| Error::TooManyImages(images.len()))?;

    let directory_end = HEADER_LEN + ENTRY_LEN * images.len();
    let total = directory_end + images.iter().map(|i| i.payload.len()).sum::<usize>();
    let mut out = Vec::with_capacity(total);

    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&TYPE_ICON.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());

    let mut offset = directory_end;
    for (index, image) in images.iter().enumerate() {
        if image.payload.is_empty() {
            return Err(Error::EmptyPayload(index));
        }
        let too_large = || Error::PayloadTooLarge {
            index,
            len: image.payload.len(),
        };
        let size = u32::try_from(image.payload.len()).map_err(|_| too_large())?;
        let position = u32::try_from(offset).map_err(|_| too_large())?;
        let end = offset + image.payload.len();
        // The payload's last byte must be addressable too.
        u32::try_from(end).map_err(|_| too_large())?;
        write_entry(&mut out, image, size, position);
        offset = end;
    }

    for image in images {
        out.extend_from_slice(image.payload);
    }
    Ok(out)
}

// width: u8, height: u8 (0 means 256 or more), palette colors: u8 = 0,
// reserved: u8 = 0, planes: u16, bits per pixel: u16, size: u32, offset: u32
fn write_entry(out: &mut Vec<u8>, image: &IconImage, size: u32, offset: u32) {
    out.push(dimension_byte(image.width));
    out.push(dimension_byte(image.height));
    out.push(0);
    out.push(0);
    out.extend_from_slice(&COLOR_PLANES.to_le_bytes());
    out.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&offset.to_le_bytes());
}

fn dimension_byte(dimension: u32) -> u8 {
    if dimension >= 256 {
        0
    } else {
        dimension as u8
    }
}

/// The result of encoding an icon container.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an icon container that can't be expressed in the format.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Returned when there are more images than the 16-bit count can hold.
    TooManyImages(usize),

    /// Returned when a payload has no bytes.
    EmptyPayload(usize),

    /// Returned when a payload's size, offset, or end doesn't fit in 32 bits.
    PayloadTooLarge { index: usize, len: usize },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::TooManyImages(count) => {
                write!(f, "an icon holds at most {} images, got {}", u16::MAX, count)
            }
            Error::EmptyPayload(index) => write!(f, "icon image {} is empty", index),
            Error::PayloadTooLarge { index, len } => {
                write!(f, "icon image {} is too large ({} bytes)", index, len)
            }
        }
    }
}

impl std::error::Error for Error {}
