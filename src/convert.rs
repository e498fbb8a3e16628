//! Color type conversion between bitmaps.
//!
//! A conversion is planned once per call: the alpha step follows from the
//! two alpha types, then the color type pair picks a byte-level row kernel
//! from [`crate::bytes`] when one exists. Everything else goes through the
//! 16-bit RGBA intermediate in [`crate::pixel`], one row at a time.

use alloc::vec::Vec;

use log::{debug, trace};

use crate::bitmap::try_zeroed;
use crate::pixel::{self, Rgba16};
use crate::{
    AlphaType, ColorType, CopyError, ImageInfo, PixelSource, PixelTarget, SizeError, bytes,
};

/// Alpha arithmetic applied between load and store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AlphaStep {
    None,
    Premultiply,
    Unpremultiply,
}

impl AlphaStep {
    fn between(src: AlphaType, dst: AlphaType) -> Self {
        match (src, dst) {
            // Opaque destinations from straight alpha composite over black.
            (AlphaType::Unpremul, AlphaType::Premul | AlphaType::Opaque) => Self::Premultiply,
            (AlphaType::Premul, AlphaType::Unpremul) => Self::Unpremultiply,
            _ => Self::None,
        }
    }

    fn for_pair(src: &ImageInfo, dst: &ImageInfo) -> Self {
        if dst.color_type().is_alpha_only() {
            Self::None
        } else {
            Self::between(src.alpha_type(), dst.alpha_type())
        }
    }
}

/// How each row (or the whole image, for the 4bpp shuffles) is converted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RowOp {
    Memcpy,
    SwapBr,
    FillAlpha,
    SwapBrFillAlpha,
    RgbToRgba,
    RgbToBgra,
    StripAlpha,
    StripAlphaSwap,
    Swap3,
    GrayToRgba,
    GrayAlphaToRgba,
    Generic(AlphaStep),
}

impl RowOp {
    fn select(src: ColorType, dst: ColorType, step: AlphaStep) -> Self {
        use ColorType::*;
        if step != AlphaStep::None {
            return Self::Generic(step);
        }
        match (src, dst) {
            _ if src == dst => Self::Memcpy,
            (Rgba8888, Bgra8888) | (Bgra8888, Rgba8888) => Self::SwapBr,
            (Rgba8888, Rgb888x) | (Rgb888x, Rgba8888) => Self::FillAlpha,
            (Bgra8888, Rgb888x) | (Rgb888x, Bgra8888) => Self::SwapBrFillAlpha,
            (Rgb888, Rgba8888 | Rgb888x) | (Bgr888, Bgra8888) => Self::RgbToRgba,
            (Rgb888, Bgra8888) | (Bgr888, Rgba8888 | Rgb888x) => Self::RgbToBgra,
            (Rgba8888 | Rgb888x, Rgb888) | (Bgra8888, Bgr888) => Self::StripAlpha,
            (Bgra8888, Rgb888) | (Rgba8888 | Rgb888x, Bgr888) => Self::StripAlphaSwap,
            (Rgb888, Bgr888) | (Bgr888, Rgb888) => Self::Swap3,
            (Gray8, Rgba8888 | Bgra8888 | Rgb888x) => Self::GrayToRgba,
            (GrayAlpha88, Rgba8888 | Bgra8888) => Self::GrayAlphaToRgba,
            _ => Self::Generic(AlphaStep::None),
        }
    }
}

/// Whether pixels of `src` can be converted to `dst` at all.
///
/// `Unknown` never converts. An alpha mask has no color, so `Alpha8`
/// only converts to itself; every other type converts to everything,
/// including `Alpha8`.
pub const fn conversion_supported(src: ColorType, dst: ColorType) -> bool {
    match (src, dst) {
        (ColorType::Unknown, _) | (_, ColorType::Unknown) => false,
        (ColorType::Alpha8, ColorType::Alpha8) => true,
        (ColorType::Alpha8, _) => false,
        _ => true,
    }
}

fn check_supported(src: ColorType, dst: ColorType) -> Result<(), CopyError> {
    if dst == ColorType::Unknown {
        return Err(CopyError::UnsupportedColorType(dst));
    }
    if !conversion_supported(src, dst) {
        return Err(CopyError::UnsupportedConversion { from: src, to: dst });
    }
    Ok(())
}

fn rejected(e: CopyError) -> CopyError {
    debug!("pixel copy rejected: {e}");
    e
}

/// Copy `src` into `dst`, converting to `dst_color_type`.
///
/// The destination gets the source's dimensions and color space, the
/// requested color type, the source alpha type normalized for that color
/// type, and tightly packed rows. Its previous contents are replaced only
/// on success; on any error `dst` is left exactly as it was.
///
/// ```
/// use pixcast::{AlphaType, Bitmap, ColorType, ImageInfo};
///
/// let info = ImageInfo::new(1, 1, ColorType::Rgba8888, AlphaType::Premul);
/// let src = Bitmap::from_vec(info, 4, vec![10, 20, 30, 255]).unwrap();
/// let mut dst = Bitmap::new();
/// pixcast::copy_to(&mut dst, ColorType::Bgra8888, &src).unwrap();
/// assert_eq!(dst.pixels(), &[30, 20, 10, 255]);
/// ```
pub fn copy_to<D, S>(dst: &mut D, dst_color_type: ColorType, src: &S) -> Result<(), CopyError>
where
    D: PixelTarget + ?Sized,
    S: PixelSource + ?Sized,
{
    let src_info = src.validate().map_err(rejected)?;
    check_supported(src_info.color_type(), dst_color_type).map_err(rejected)?;
    let alpha_type = dst_color_type
        .validate_alpha_type(src_info.alpha_type())
        .ok_or(CopyError::InvalidAlphaType)
        .map_err(rejected)?;
    let info = src_info
        .with_color_type(dst_color_type)
        .with_alpha_type(alpha_type);

    let row_bytes = info.min_row_bytes().ok_or(CopyError::AllocationFailed)?;
    let len = info
        .compute_byte_size(row_bytes)
        .ok_or(CopyError::AllocationFailed)?;
    let mut pixels = try_zeroed(len).map_err(rejected)?;

    convert(&src_info, src, &info, &mut pixels, row_bytes)?;
    dst.install(info, row_bytes, pixels);
    Ok(())
}

/// Convert `src` into caller-owned memory described by `dst_info`.
///
/// `dst_info` must have the source's dimensions. Its alpha type is honored,
/// so this is also how to premultiply or unpremultiply without changing
/// the color type. Nothing is written unless every check passes; bytes
/// between the end of a row and the next `dst_row_bytes` boundary are
/// never touched.
pub fn read_pixels<S>(
    dst_info: &ImageInfo,
    dst_pixels: &mut [u8],
    dst_row_bytes: usize,
    src: &S,
) -> Result<(), CopyError>
where
    S: PixelSource + ?Sized,
{
    let src_info = src.validate().map_err(rejected)?;
    let dst_ct = dst_info.color_type();
    if dst_ct == ColorType::Unknown {
        return Err(rejected(CopyError::UnsupportedColorType(dst_ct)));
    }
    if (dst_info.width(), dst_info.height()) != (src_info.width(), src_info.height()) {
        return Err(rejected(CopyError::InvalidDestination(
            SizeError::PixelCountMismatch,
        )));
    }
    let alpha_type = dst_ct
        .validate_alpha_type(dst_info.alpha_type())
        .ok_or(CopyError::InvalidAlphaType)
        .map_err(rejected)?;
    dst_info
        .validate_buffer(dst_row_bytes, dst_pixels.len())
        .map_err(|e| rejected(CopyError::InvalidDestination(e)))?;
    check_supported(src_info.color_type(), dst_ct).map_err(rejected)?;

    let dst_info = dst_info.with_alpha_type(alpha_type);
    convert(&src_info, src, &dst_info, dst_pixels, dst_row_bytes)
}

/// Both sides already validated against each other.
fn convert<S: PixelSource + ?Sized>(
    src_info: &ImageInfo,
    src: &S,
    dst_info: &ImageInfo,
    dst_pixels: &mut [u8],
    dst_row_bytes: usize,
) -> Result<(), CopyError> {
    let step = AlphaStep::for_pair(src_info, dst_info);
    let op = RowOp::select(src_info.color_type(), dst_info.color_type(), step);
    trace!(
        "{}x{} {:?}/{:?} -> {:?}/{:?} via {:?}",
        src_info.width(),
        src_info.height(),
        src_info.color_type(),
        src_info.alpha_type(),
        dst_info.color_type(),
        dst_info.alpha_type(),
        op
    );
    Rows {
        width: src_info.width() as usize,
        height: src_info.height() as usize,
        src: src.pixels(),
        src_ct: src_info.color_type(),
        src_row_bytes: src.row_bytes(),
        dst: dst_pixels,
        dst_ct: dst_info.color_type(),
        dst_row_bytes,
    }
    .run(op)
}

/// Two validated pixel buffers of equal dimensions.
struct Rows<'s, 'd> {
    width: usize,
    height: usize,
    src: &'s [u8],
    src_ct: ColorType,
    src_row_bytes: usize,
    dst: &'d mut [u8],
    dst_ct: ColorType,
    dst_row_bytes: usize,
}

impl Rows<'_, '_> {
    fn run(self, op: RowOp) -> Result<(), CopyError> {
        let (w, h) = (self.width, self.height);
        let (ss, ds) = (self.src_row_bytes, self.dst_row_bytes);
        match op {
            RowOp::SwapBr => bytes::rgba_to_bgra_strided(self.src, self.dst, w, h, ss, ds)?,
            RowOp::FillAlpha => bytes::copy_fill_alpha_strided(self.src, self.dst, w, h, ss, ds)?,
            RowOp::SwapBrFillAlpha => {
                bytes::rgba_to_bgrx_strided(self.src, self.dst, w, h, ss, ds)?
            }
            RowOp::Memcpy => self.each_row(|s, d| {
                d.copy_from_slice(s);
                Ok(())
            })?,
            RowOp::RgbToRgba => self.each_row(bytes::rgb_to_rgba)?,
            RowOp::RgbToBgra => self.each_row(bytes::rgb_to_bgra)?,
            RowOp::StripAlpha => self.each_row(bytes::rgba_to_rgb)?,
            RowOp::StripAlphaSwap => self.each_row(bytes::bgra_to_rgb)?,
            RowOp::Swap3 => self.each_row(bytes::rgb_to_bgr)?,
            RowOp::GrayToRgba => self.each_row(bytes::gray_to_rgba)?,
            RowOp::GrayAlphaToRgba => self.each_row(bytes::gray_alpha_to_rgba)?,
            RowOp::Generic(step) => return self.generic(step),
        }
        Ok(())
    }

    fn each_row(
        self,
        mut f: impl FnMut(&[u8], &mut [u8]) -> Result<(), SizeError>,
    ) -> Result<(), SizeError> {
        let src_len = self.width * self.src_ct.bytes_per_pixel();
        let dst_len = self.width * self.dst_ct.bytes_per_pixel();
        for y in 0..self.height {
            let s = &self.src[y * self.src_row_bytes..][..src_len];
            let d = &mut self.dst[y * self.dst_row_bytes..][..dst_len];
            f(s, d)?;
        }
        Ok(())
    }

    fn generic(self, step: AlphaStep) -> Result<(), CopyError> {
        let mut scratch: Vec<Rgba16> = Vec::new();
        scratch
            .try_reserve_exact(self.width)
            .map_err(|_| CopyError::AllocationFailed)?;
        scratch.resize(self.width, [0; 4]);

        let (src_ct, dst_ct) = (self.src_ct, self.dst_ct);
        self.each_row(|s, d| {
            pixel::load_row(src_ct, s, &mut scratch);
            match step {
                AlphaStep::None => {}
                AlphaStep::Premultiply => {
                    scratch.iter_mut().for_each(|c| *c = pixel::premultiply(*c))
                }
                AlphaStep::Unpremultiply => {
                    scratch.iter_mut().for_each(|c| *c = pixel::unpremultiply(*c))
                }
            }
            pixel::store_row(dst_ct, &scratch, d);
            Ok(())
        })?;
        Ok(())
    }
}
