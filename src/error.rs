use core::fmt;

use crate::ColorType;

/// Buffer length or geometry does not fit the pixel layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SizeError {
    /// Length is zero or not a whole number of pixels.
    NotPixelAligned,
    /// Destination holds fewer pixels than the source provides.
    PixelCountMismatch,
    /// Zero dimensions, stride shorter than a row, or buffer shorter than
    /// `(height - 1) * stride + width * bpp`.
    InvalidStride,
}

impl fmt::Display for SizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPixelAligned => f.write_str("buffer length is not a whole number of pixels"),
            Self::PixelCountMismatch => {
                f.write_str("destination is too small for the source pixel count")
            }
            Self::InvalidStride => {
                f.write_str("stride or buffer length does not fit the image dimensions")
            }
        }
    }
}

impl core::error::Error for SizeError {}

/// Why a bitmap could not be copied into another color type.
///
/// Whenever one of these is returned the destination was not touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CopyError {
    /// The source has zero width or height.
    EmptySource,
    /// The source row bytes or pixel buffer do not match its info.
    InvalidSource(SizeError),
    /// The destination buffer passed to [`read_pixels`](crate::read_pixels)
    /// is too small, or its dimensions differ from the source.
    InvalidDestination(SizeError),
    /// [`ColorType::Unknown`] on either side.
    UnsupportedColorType(ColorType),
    /// Both color types are valid but there is no meaningful mapping
    /// between them (an alpha mask has no color to expand).
    UnsupportedConversion { from: ColorType, to: ColorType },
    /// The alpha type is unknown or not representable by the color type.
    InvalidAlphaType,
    /// The destination buffer could not be allocated.
    AllocationFailed,
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySource => f.write_str("source bitmap is empty"),
            Self::InvalidSource(e) => write!(f, "invalid source bitmap: {e}"),
            Self::InvalidDestination(e) => write!(f, "invalid destination buffer: {e}"),
            Self::UnsupportedColorType(ct) => write!(f, "unsupported color type {ct:?}"),
            Self::UnsupportedConversion { from, to } => {
                write!(f, "cannot convert {from:?} pixels to {to:?}")
            }
            Self::InvalidAlphaType => f.write_str("alpha type is not valid for the color type"),
            Self::AllocationFailed => f.write_str("failed to allocate destination pixels"),
        }
    }
}

impl core::error::Error for CopyError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidSource(e) | Self::InvalidDestination(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SizeError> for CopyError {
    fn from(e: SizeError) -> Self {
        Self::InvalidSource(e)
    }
}
