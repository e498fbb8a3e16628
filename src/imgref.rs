//! Whole-image conversions using [`imgref`] types.
//!
//! Strided `ImgRef`s are viewed in place; the padding between rows is
//! never read.
//!
//! ```rust
//! use rgb::{Bgra, Rgb};
//! use ::imgref::ImgVec;
//! use pixcast::{imgref, AlphaType};
//!
//! let img = ImgVec::new(vec![Rgb::new(255u8, 0, 128); 4], 2, 2);
//! let src = imgref::pixmap_from_img(img.as_ref(), AlphaType::Opaque).unwrap();
//! let bgra: ImgVec<Bgra<u8>> = imgref::copy_to_img(&src).unwrap();
//! assert_eq!(bgra.buf()[0], Bgra { b: 128, g: 0, r: 255, a: 255 });
//! ```

use alloc::vec::Vec;

use imgref::{ImgRef, ImgVec};

use crate::typed_rgb::{TypedPixel, copy_to_pixels};
use crate::{AlphaType, CopyError, ImageInfo, PixelSource, Pixmap, SizeError};

/// View an image as a [`Pixmap`], honoring its stride.
pub fn pixmap_from_img<P: TypedPixel>(
    img: ImgRef<'_, P>,
    alpha_type: AlphaType,
) -> Result<Pixmap<'_>, SizeError> {
    let width = u32::try_from(img.width()).map_err(|_| SizeError::InvalidStride)?;
    let height = u32::try_from(img.height()).map_err(|_| SizeError::InvalidStride)?;
    let row_bytes = img
        .stride()
        .checked_mul(size_of::<P>())
        .ok_or(SizeError::InvalidStride)?;
    let info = ImageInfo::new(width, height, P::COLOR_TYPE, alpha_type);
    Pixmap::new(info, row_bytes, bytemuck::cast_slice(img.into_buf()))
}

/// Convert `src` into a new tightly packed image of `P`.
pub fn copy_to_img<P, S>(src: &S) -> Result<ImgVec<P>, CopyError>
where
    P: TypedPixel,
    S: PixelSource + ?Sized,
{
    let info = src.validate()?;
    let (w, h) = (info.width() as usize, info.height() as usize);
    let len = w.checked_mul(h).ok_or(CopyError::AllocationFailed)?;
    let mut buf: Vec<P> = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| CopyError::AllocationFailed)?;
    buf.resize(len, P::zeroed());
    copy_to_pixels(src, &mut buf)?;
    Ok(ImgVec::new(buf, w, h))
}
