//! Pixel encodings and the image descriptor that ties them to dimensions.

use crate::SizeError;

/// In-memory encoding of one pixel: channel order, bit depth, alpha.
///
/// Multi-byte words (`Rgb565`, `Argb4444`, `Rgba16161616`) are stored in
/// native endianness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ColorType {
    /// Not a pixel encoding. Never valid as a source or destination.
    #[default]
    Unknown,
    /// 8-bit alpha mask, no color.
    Alpha8,
    /// 8-bit luminance.
    Gray8,
    /// 8-bit luminance followed by 8-bit alpha.
    GrayAlpha88,
    /// 16-bit word: red in bits 11..16, green in 5..11, blue in 0..5.
    Rgb565,
    /// 16-bit word: red in bits 12..16, green 8..12, blue 4..8, alpha 0..4.
    Argb4444,
    /// Bytes `R G B`.
    Rgb888,
    /// Bytes `B G R`.
    Bgr888,
    /// Bytes `R G B A`.
    Rgba8888,
    /// Bytes `R G B x`. The fourth byte is ignored on read and written as 255.
    Rgb888x,
    /// Bytes `B G R A`.
    Bgra8888,
    /// Four 16-bit words `R G B A`.
    Rgba16161616,
}

impl ColorType {
    /// The native 32-bit layout used by most surfaces.
    pub const N32: ColorType = ColorType::Bgra8888;

    /// Every encoding that can take part in a conversion.
    pub const ALL: [ColorType; 11] = [
        ColorType::Alpha8,
        ColorType::Gray8,
        ColorType::GrayAlpha88,
        ColorType::Rgb565,
        ColorType::Argb4444,
        ColorType::Rgb888,
        ColorType::Bgr888,
        ColorType::Rgba8888,
        ColorType::Rgb888x,
        ColorType::Bgra8888,
        ColorType::Rgba16161616,
    ];

    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            ColorType::Unknown => 0,
            ColorType::Alpha8 | ColorType::Gray8 => 1,
            ColorType::GrayAlpha88 | ColorType::Rgb565 | ColorType::Argb4444 => 2,
            ColorType::Rgb888 | ColorType::Bgr888 => 3,
            ColorType::Rgba8888 | ColorType::Rgb888x | ColorType::Bgra8888 => 4,
            ColorType::Rgba16161616 => 8,
        }
    }

    /// True when the encoding has no alpha storage.
    #[inline]
    pub const fn is_always_opaque(self) -> bool {
        matches!(
            self,
            ColorType::Gray8
                | ColorType::Rgb565
                | ColorType::Rgb888
                | ColorType::Bgr888
                | ColorType::Rgb888x
        )
    }

    /// True when the encoding stores only alpha.
    #[inline]
    pub const fn is_alpha_only(self) -> bool {
        matches!(self, ColorType::Alpha8)
    }

    /// Normalize `alpha_type` for this color type.
    ///
    /// Opaque encodings always report [`AlphaType::Opaque`]; an alpha mask
    /// is premultiplied by definition. Returns `None` when the combination
    /// cannot describe real pixels.
    pub const fn validate_alpha_type(self, alpha_type: AlphaType) -> Option<AlphaType> {
        match self {
            ColorType::Unknown => Some(AlphaType::Unknown),
            _ if self.is_always_opaque() => Some(AlphaType::Opaque),
            _ => match alpha_type {
                AlphaType::Unknown => None,
                AlphaType::Unpremul if self.is_alpha_only() => Some(AlphaType::Premul),
                other => Some(other),
            },
        }
    }
}

/// How the alpha channel relates to the color channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlphaType {
    #[default]
    Unknown,
    /// Every pixel is fully opaque; alpha is ignored.
    Opaque,
    /// Color channels are already multiplied by alpha.
    Premul,
    /// Color channels are independent of alpha.
    Unpremul,
}

/// Color space tag. Carried through conversions, never transformed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    #[default]
    Srgb,
    LinearSrgb,
}

/// Dimensions and encoding of a bitmap, without its pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageInfo {
    width: u32,
    height: u32,
    color_type: ColorType,
    alpha_type: AlphaType,
    color_space: ColorSpace,
}

impl ImageInfo {
    pub const fn new(width: u32, height: u32, color_type: ColorType, alpha_type: AlphaType) -> Self {
        Self {
            width,
            height,
            color_type,
            alpha_type,
            color_space: ColorSpace::Srgb,
        }
    }

    /// [`ColorType::N32`] with premultiplied alpha.
    pub const fn n32_premul(width: u32, height: u32) -> Self {
        Self::new(width, height, ColorType::N32, AlphaType::Premul)
    }

    pub const fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    pub const fn with_alpha_type(mut self, alpha_type: AlphaType) -> Self {
        self.alpha_type = alpha_type;
        self
    }

    /// Same dimensions and color space, new color type. The alpha type is
    /// re-normalized for the new encoding, falling back to `Unknown` when
    /// the old one is not representable.
    pub const fn with_color_type(mut self, color_type: ColorType) -> Self {
        self.alpha_type = match color_type.validate_alpha_type(self.alpha_type) {
            Some(at) => at,
            None => AlphaType::Unknown,
        };
        self.color_type = color_type;
        self
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub const fn color_type(&self) -> ColorType {
        self.color_type
    }

    #[inline]
    pub const fn alpha_type(&self) -> AlphaType {
        self.alpha_type
    }

    #[inline]
    pub const fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    #[inline]
    pub const fn bytes_per_pixel(&self) -> usize {
        self.color_type.bytes_per_pixel()
    }

    /// Zero width or zero height.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `width * bytes_per_pixel`, or `None` on overflow.
    #[inline]
    pub const fn min_row_bytes(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.bytes_per_pixel())
    }

    /// Bytes needed to hold every row at `row_bytes` stride. The last row
    /// only needs [`min_row_bytes`](Self::min_row_bytes).
    pub fn compute_byte_size(&self, row_bytes: usize) -> Option<usize> {
        if self.height == 0 {
            return Some(0);
        }
        (self.height as usize - 1)
            .checked_mul(row_bytes)?
            .checked_add(self.min_row_bytes()?)
    }

    /// Check that a buffer of `len` bytes at `row_bytes` stride holds this image.
    ///
    /// Row bytes must be a whole number of pixels and at least
    /// [`min_row_bytes`](Self::min_row_bytes).
    pub fn validate_buffer(&self, row_bytes: usize, len: usize) -> Result<(), SizeError> {
        let bpp = self.bytes_per_pixel();
        let min = self.min_row_bytes().ok_or(SizeError::InvalidStride)?;
        if row_bytes < min {
            return Err(SizeError::InvalidStride);
        }
        if bpp > 0 && !row_bytes.is_multiple_of(bpp) {
            return Err(SizeError::NotPixelAligned);
        }
        let need = self
            .compute_byte_size(row_bytes)
            .ok_or(SizeError::InvalidStride)?;
        if len < need {
            return Err(SizeError::InvalidStride);
        }
        Ok(())
    }
}
