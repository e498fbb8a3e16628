//! # pixcast
//!
//! *Recast your pixels.*
//!
//! Copy a bitmap into another color type: swap BGRA for RGBA, pack RGB into
//! 565, pull the alpha mask out of anything, or go from straight alpha to
//! premultiplied on the way.
//!
//! [`copy_to`] is the entry point. It validates the source, allocates a
//! tightly packed destination, converts every row and only then commits the
//! result, so a failed copy leaves the destination untouched. Common
//! byte-order changes take SIMD-optimized row kernels (x86-64 AVX2 with
//! automatic scalar fallback); everything else goes through an exact
//! 16-bit per-pixel codec.
//!
//! ```rust
//! use pixcast::{AlphaType, Bitmap, ColorType, ImageInfo};
//!
//! let info = ImageInfo::new(2, 1, ColorType::Rgba8888, AlphaType::Unpremul);
//! let src = Bitmap::from_vec(info, 8, vec![255, 0, 0, 255, 0, 0, 255, 128]).unwrap();
//! let rgb565 = src.copy_to(ColorType::Rgb565).unwrap();
//! assert_eq!(rgb565.info().alpha_type(), AlphaType::Opaque);
//! assert_eq!(rgb565.row_bytes(), 4);
//! ```
//!
//! ## Row kernels (always available)
//!
//! [`bytes`] exposes the byte-slice swizzles the fast paths are built from.
//!
//! ## Feature flags
//!
//! - **`rgb`** — Typed pixel slices using [`rgb`] crate pixel types
//!   (`Rgb<u8>`, `Rgba<u8>`, `Bgra<u8>`, `Gray<u8>`, etc.) via bytemuck.
//! - **`imgref`** — Whole-image conversions using [`imgref`] types
//!   (`ImgRef`, `ImgVec`). Implies `rgb`.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod bitmap;
pub mod bytes;
mod convert;
mod error;
mod info;
mod pixel;

pub use bitmap::{Bitmap, PixelSource, PixelTarget, Pixmap};
pub use convert::{conversion_supported, copy_to, read_pixels};
pub use error::{CopyError, SizeError};
pub use info::{AlphaType, ColorSpace, ColorType, ImageInfo};

#[cfg(feature = "rgb")]
pub mod typed_rgb;

#[cfg(feature = "imgref")]
pub mod imgref;
