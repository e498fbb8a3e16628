//! Bitmap values: an owned [`Bitmap`], a borrowed [`Pixmap`], and the two
//! capability traits the converter is written against.

use alloc::vec::Vec;

use crate::{AlphaType, ColorType, CopyError, ImageInfo, SizeError};

/// Read access to a pixel buffer and the info that describes it.
pub trait PixelSource {
    fn info(&self) -> &ImageInfo;

    /// Distance in bytes between the starts of consecutive rows.
    fn row_bytes(&self) -> usize;

    fn pixels(&self) -> &[u8];

    /// Pixel bytes of row `y`, without stride padding.
    fn row(&self, y: u32) -> Option<&[u8]> {
        let info = self.info();
        if y >= info.height() {
            return None;
        }
        let start = (y as usize).checked_mul(self.row_bytes())?;
        let len = info.min_row_bytes()?;
        self.pixels().get(start..start.checked_add(len)?)
    }

    /// Check that this source describes real, readable pixels.
    ///
    /// Returns the info with its alpha type normalized for the color type.
    fn validate(&self) -> Result<ImageInfo, CopyError> {
        let info = *self.info();
        if info.is_empty() {
            return Err(CopyError::EmptySource);
        }
        if info.color_type() == ColorType::Unknown {
            return Err(CopyError::UnsupportedColorType(ColorType::Unknown));
        }
        let alpha_type = info
            .color_type()
            .validate_alpha_type(info.alpha_type())
            .ok_or(CopyError::InvalidAlphaType)?;
        info.validate_buffer(self.row_bytes(), self.pixels().len())?;
        Ok(info.with_alpha_type(alpha_type))
    }
}

/// Somewhere a converted buffer can be committed.
///
/// `install` is only called with a fully populated buffer that matches
/// `info` at `row_bytes`.
pub trait PixelTarget {
    fn install(&mut self, info: ImageInfo, row_bytes: usize, pixels: Vec<u8>);
}

pub(crate) fn try_zeroed(len: usize) -> Result<Vec<u8>, CopyError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| CopyError::AllocationFailed)?;
    buf.resize(len, 0);
    Ok(buf)
}

/// An owned bitmap.
///
/// The default value is empty: 0×0 with [`ColorType::Unknown`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bitmap {
    info: ImageInfo,
    row_bytes: usize,
    pixels: Vec<u8>,
}

impl Bitmap {
    pub const fn new() -> Self {
        Self {
            info: ImageInfo::new(0, 0, ColorType::Unknown, AlphaType::Unknown),
            row_bytes: 0,
            pixels: Vec::new(),
        }
    }

    /// Zeroed, tightly packed storage for `info`.
    pub fn try_alloc(info: ImageInfo) -> Result<Self, CopyError> {
        let row_bytes = info.min_row_bytes().ok_or(CopyError::AllocationFailed)?;
        let len = info
            .compute_byte_size(row_bytes)
            .ok_or(CopyError::AllocationFailed)?;
        Ok(Self {
            info,
            row_bytes,
            pixels: try_zeroed(len)?,
        })
    }

    /// Wrap an existing buffer. Fails if `pixels` cannot hold `info` at
    /// `row_bytes`.
    pub fn from_vec(info: ImageInfo, row_bytes: usize, pixels: Vec<u8>) -> Result<Self, SizeError> {
        info.validate_buffer(row_bytes, pixels.len())?;
        Ok(Self {
            info,
            row_bytes,
            pixels,
        })
    }

    #[inline]
    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.pixels
    }

    pub fn as_pixmap(&self) -> Pixmap<'_> {
        Pixmap {
            info: self.info,
            row_bytes: self.row_bytes,
            pixels: &self.pixels,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }

    /// Drop the pixels and return to the empty state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Convert into a new tightly packed bitmap of `color_type`.
    pub fn copy_to(&self, color_type: ColorType) -> Result<Bitmap, CopyError> {
        let mut out = Bitmap::new();
        crate::copy_to(&mut out, color_type, self)?;
        Ok(out)
    }
}

impl PixelSource for Bitmap {
    fn info(&self) -> &ImageInfo {
        &self.info
    }

    fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl PixelTarget for Bitmap {
    fn install(&mut self, info: ImageInfo, row_bytes: usize, pixels: Vec<u8>) {
        self.info = info;
        self.row_bytes = row_bytes;
        self.pixels = pixels;
    }
}

impl PixelTarget for Option<Bitmap> {
    fn install(&mut self, info: ImageInfo, row_bytes: usize, pixels: Vec<u8>) {
        *self = Some(Bitmap {
            info,
            row_bytes,
            pixels,
        });
    }
}

/// A borrowed view of pixels owned elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pixmap<'a> {
    info: ImageInfo,
    row_bytes: usize,
    pixels: &'a [u8],
}

impl<'a> Pixmap<'a> {
    /// Only the buffer geometry is checked; empty or `Unknown` views are
    /// allowed and rejected later by [`copy_to`](crate::copy_to).
    pub fn new(info: ImageInfo, row_bytes: usize, pixels: &'a [u8]) -> Result<Self, SizeError> {
        info.validate_buffer(row_bytes, pixels.len())?;
        Ok(Self {
            info,
            row_bytes,
            pixels,
        })
    }

    #[inline]
    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    #[inline]
    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    pub fn copy_to(&self, color_type: ColorType) -> Result<Bitmap, CopyError> {
        let mut out = Bitmap::new();
        crate::copy_to(&mut out, color_type, self)?;
        Ok(out)
    }
}

impl PixelSource for Pixmap<'_> {
    fn info(&self) -> &ImageInfo {
        &self.info
    }

    fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    fn pixels(&self) -> &[u8] {
        self.pixels
    }
}
