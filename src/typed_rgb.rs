//! Conversions into and out of [`rgb`] crate pixel slices.
//!
//! Each supported pixel type knows its [`ColorType`], so typed buffers can
//! be viewed as a [`Pixmap`] without copying, and any source can be
//! converted straight into a typed slice.
//!
//! ```rust
//! use rgb::{Bgra, Rgba};
//! use pixcast::{typed_rgb, AlphaType};
//!
//! let rgba = vec![Rgba::new(255u8, 0, 128, 255); 6];
//! let src = typed_rgb::pixmap_from_pixels(&rgba, 3, 2, AlphaType::Premul).unwrap();
//! let mut bgra = vec![Bgra::default(); 6];
//! typed_rgb::copy_to_pixels(&src, &mut bgra).unwrap();
//! assert_eq!(bgra[0], Bgra { b: 128, g: 0, r: 255, a: 255 });
//! ```

use rgb::{Bgr, Bgra, Gray, GrayAlpha, Rgb, Rgba};

use crate::{AlphaType, ColorType, CopyError, ImageInfo, PixelSource, Pixmap, SizeError};

/// A pixel struct whose memory layout matches a [`ColorType`].
pub trait TypedPixel: bytemuck::Pod {
    const COLOR_TYPE: ColorType;
}

macro_rules! typed_pixel {
    ($($ty:ty => $ct:ident),* $(,)?) => {
        $(impl TypedPixel for $ty {
            const COLOR_TYPE: ColorType = ColorType::$ct;
        })*
    };
}

typed_pixel! {
    Rgba<u8> => Rgba8888,
    Bgra<u8> => Bgra8888,
    Rgb<u8> => Rgb888,
    Bgr<u8> => Bgr888,
    Gray<u8> => Gray8,
    GrayAlpha<u8> => GrayAlpha88,
    Rgba<u16> => Rgba16161616,
}

/// View a tightly packed `width × height` slice of typed pixels.
///
/// `pixels` may be longer than needed; extra pixels are ignored.
pub fn pixmap_from_pixels<P: TypedPixel>(
    pixels: &[P],
    width: u32,
    height: u32,
    alpha_type: AlphaType,
) -> Result<Pixmap<'_>, SizeError> {
    let info = ImageInfo::new(width, height, P::COLOR_TYPE, alpha_type);
    let row_bytes = info.min_row_bytes().ok_or(SizeError::InvalidStride)?;
    Pixmap::new(info, row_bytes, bytemuck::cast_slice(pixels))
}

/// Convert `src` into a tightly packed slice of `P`, keeping the source
/// alpha type where `P` can represent it.
pub fn copy_to_pixels<P, S>(src: &S, dst: &mut [P]) -> Result<(), CopyError>
where
    P: TypedPixel,
    S: PixelSource + ?Sized,
{
    let info = src.info().with_color_type(P::COLOR_TYPE);
    let row_bytes = info
        .min_row_bytes()
        .ok_or(CopyError::InvalidDestination(SizeError::InvalidStride))?;
    crate::read_pixels(&info, bytemuck::cast_slice_mut(dst), row_bytes, src)
}
