// ---------------------------------------------------------------------------
// Row-level byte swizzles used by the conversion fast paths.
//
// 4bpp shuffles (B↔R swap, alpha fill, both at once) go through one
// table-driven kernel with SIMD dispatch via incant!. The remaining
// reshapes (3↔4 bpp, gray broadcast) are scalar loops.
// ---------------------------------------------------------------------------

use crate::SizeError;
use archmage::incant;

mod scalar;
use scalar::*;

#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "x86_64")]
use avx2::*;


// ===========================================================================
// Validation helpers
// ===========================================================================

#[inline]
fn check_inplace(len: usize, bpp: usize) -> Result<(), SizeError> {
    if len == 0 || !len.is_multiple_of(bpp) {
        Err(SizeError::NotPixelAligned)
    } else {
        Ok(())
    }
}

#[inline]
fn check_copy(
    src_len: usize,
    src_bpp: usize,
    dst_len: usize,
    dst_bpp: usize,
) -> Result<(), SizeError> {
    if src_len == 0 || !src_len.is_multiple_of(src_bpp) {
        return Err(SizeError::NotPixelAligned);
    }
    if dst_len < (src_len / src_bpp) * dst_bpp {
        return Err(SizeError::PixelCountMismatch);
    }
    Ok(())
}

#[inline]
fn check_strided(
    len: usize,
    width: usize,
    height: usize,
    stride: usize,
    bpp: usize,
) -> Result<(), SizeError> {
    if width == 0 || height == 0 {
        return Err(SizeError::InvalidStride);
    }
    let row_bytes = width.checked_mul(bpp).ok_or(SizeError::InvalidStride)?;
    if row_bytes > stride {
        return Err(SizeError::InvalidStride);
    }
    let total = (height - 1)
        .checked_mul(stride)
        .ok_or(SizeError::InvalidStride)?
        .checked_add(row_bytes)
        .ok_or(SizeError::InvalidStride)?;
    if len < total {
        return Err(SizeError::InvalidStride);
    }
    Ok(())
}

// ===========================================================================
// 4bpp shuffle table
// ===========================================================================

/// Per-pixel byte permutation for 4bpp layouts, optionally forcing byte 3
/// to 0xFF. `order[i]` is the source byte written to destination byte `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Shuffle4 {
    order: [u8; 4],
    opaque: bool,
}

impl Shuffle4 {
    const SWAP_BR: Self = Self {
        order: [2, 1, 0, 3],
        opaque: false,
    };
    const FILL_ALPHA: Self = Self {
        order: [0, 1, 2, 3],
        opaque: true,
    };
    const SWAP_BR_FILL_ALPHA: Self = Self {
        order: [2, 1, 0, 3],
        opaque: true,
    };

    /// `pshufb` control for 8 pixels (two 128-bit lanes of 4 pixels).
    #[cfg(target_arch = "x86_64")]
    const fn shuffle_lanes(self) -> [i8; 32] {
        let mut out = [0i8; 32];
        let mut i = 0;
        while i < 32 {
            let px = (i % 16) / 4 * 4;
            out[i] = (px + self.order[i % 4] as usize) as i8;
            i += 1;
        }
        out
    }

    /// OR mask applied after the shuffle.
    #[cfg(target_arch = "x86_64")]
    const fn or_lanes(self) -> [i8; 32] {
        let mut out = [0i8; 32];
        if self.opaque {
            let mut i = 3;
            while i < 32 {
                out[i] = -1;
                i += 4;
            }
        }
        out
    }

    #[inline(always)]
    fn apply(self, s: &[u8], d: &mut [u8]) {
        let [o0, o1, o2, o3] = self.order;
        d[0] = s[o0 as usize];
        d[1] = s[o1 as usize];
        d[2] = s[o2 as usize];
        d[3] = if self.opaque { 0xFF } else { s[o3 as usize] };
    }

    #[inline(always)]
    fn apply_inplace(self, px: &mut [u8]) {
        let s = [px[0], px[1], px[2], px[3]];
        self.apply(&s, px);
    }
}

// ===========================================================================
// Public API: 4bpp contiguous
// ===========================================================================

/// Swap B↔R channels in-place for 4bpp pixels (RGBA↔BGRA).
pub fn rgba_to_bgra_inplace(buf: &mut [u8]) -> Result<(), SizeError> {
    check_inplace(buf.len(), 4)?;
    incant!(shuffle4_inplace_impl(buf, Shuffle4::SWAP_BR), [v3, scalar]);
    Ok(())
}

/// Copy 4bpp pixels, swapping B↔R (RGBA→BGRA or BGRA→RGBA).
pub fn rgba_to_bgra(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 4, dst.len(), 4)?;
    incant!(shuffle4_impl(src, dst, Shuffle4::SWAP_BR), [v3, scalar]);
    Ok(())
}

/// Set byte 3 to 255 for every 4bpp pixel. Works for RGBA, BGRA and RGBX.
pub fn fill_alpha(buf: &mut [u8]) -> Result<(), SizeError> {
    check_inplace(buf.len(), 4)?;
    incant!(shuffle4_inplace_impl(buf, Shuffle4::FILL_ALPHA), [v3, scalar]);
    Ok(())
}

/// Copy 4bpp pixels keeping channel order, writing 255 to byte 3
/// (RGBA→RGBX, RGBX→RGBA).
pub fn copy_fill_alpha(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 4, dst.len(), 4)?;
    incant!(shuffle4_impl(src, dst, Shuffle4::FILL_ALPHA), [v3, scalar]);
    Ok(())
}

/// Copy 4bpp pixels swapping B↔R and writing 255 to byte 3
/// (BGRA→RGBX, RGBX→BGRA).
pub fn rgba_to_bgrx(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 4, dst.len(), 4)?;
    incant!(
        shuffle4_impl(src, dst, Shuffle4::SWAP_BR_FILL_ALPHA),
        [v3, scalar]
    );
    Ok(())
}

// ===========================================================================
// Public API: 4bpp strided
// ===========================================================================

/// Swap B↔R in-place for a strided 4bpp image.
///
/// `stride` is the distance in bytes between the start of consecutive rows.
/// Must be ≥ `width × 4`. Padding bytes between rows are never read or written.
pub fn rgba_to_bgra_inplace_strided(
    buf: &mut [u8],
    width: usize,
    height: usize,
    stride: usize,
) -> Result<(), SizeError> {
    check_strided(buf.len(), width, height, stride, 4)?;
    incant!(
        shuffle4_inplace_strided(buf, width, height, stride, Shuffle4::SWAP_BR),
        [v3, scalar]
    );
    Ok(())
}

/// Copy a strided 4bpp image, swapping B↔R. Single SIMD dispatch.
pub fn rgba_to_bgra_strided(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
) -> Result<(), SizeError> {
    shuffle4_strided_checked(src, dst, width, height, src_stride, dst_stride, Shuffle4::SWAP_BR)
}

/// Set byte 3 to 255 in a strided 4bpp image.
pub fn fill_alpha_strided(
    buf: &mut [u8],
    width: usize,
    height: usize,
    stride: usize,
) -> Result<(), SizeError> {
    check_strided(buf.len(), width, height, stride, 4)?;
    incant!(
        shuffle4_inplace_strided(buf, width, height, stride, Shuffle4::FILL_ALPHA),
        [v3, scalar]
    );
    Ok(())
}

/// Strided [`copy_fill_alpha`].
pub fn copy_fill_alpha_strided(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
) -> Result<(), SizeError> {
    shuffle4_strided_checked(src, dst, width, height, src_stride, dst_stride, Shuffle4::FILL_ALPHA)
}

/// Strided [`rgba_to_bgrx`].
pub fn rgba_to_bgrx_strided(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
) -> Result<(), SizeError> {
    shuffle4_strided_checked(
        src,
        dst,
        width,
        height,
        src_stride,
        dst_stride,
        Shuffle4::SWAP_BR_FILL_ALPHA,
    )
}

fn shuffle4_strided_checked(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    src_stride: usize,
    dst_stride: usize,
    shuf: Shuffle4,
) -> Result<(), SizeError> {
    check_strided(src.len(), width, height, src_stride, 4)?;
    check_strided(dst.len(), width, height, dst_stride, 4)?;
    incant!(
        shuffle4_strided(src, dst, width, height, src_stride, dst_stride, shuf),
        [v3, scalar]
    );
    Ok(())
}

// ===========================================================================
// Scalar-only reshapes
// ===========================================================================

/// RGB (3 bytes/px) → RGBA (4 bytes/px). Keeps channel order, alpha=255.
pub fn rgb_to_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 3, dst.len(), 4)?;
    expand_3to4(src, dst, [0, 1, 2]);
    Ok(())
}

/// RGB (3 bytes/px) → BGRA (4 bytes/px). Reverses channel order, alpha=255.
pub fn rgb_to_bgra(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 3, dst.len(), 4)?;
    expand_3to4(src, dst, [2, 1, 0]);
    Ok(())
}

/// Copy 3bpp pixels, swapping R↔B (RGB→BGR or BGR→RGB).
pub fn rgb_to_bgr(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 3, dst.len(), 3)?;
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(3)) {
        d[0] = s[2];
        d[1] = s[1];
        d[2] = s[0];
    }
    Ok(())
}

/// Swap R↔B in-place for 3bpp pixels.
pub fn rgb_to_bgr_inplace(buf: &mut [u8]) -> Result<(), SizeError> {
    check_inplace(buf.len(), 3)?;
    for px in buf.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    Ok(())
}

/// 4bpp → 3bpp by dropping byte 3. Keeps byte order (RGBA→RGB, BGRA→BGR).
pub fn rgba_to_rgb(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 4, dst.len(), 3)?;
    strip_4to3(src, dst, [0, 1, 2]);
    Ok(())
}

/// 4bpp → 3bpp, dropping byte 3 and reversing bytes 0↔2 (BGRA→RGB, RGBA→BGR).
pub fn bgra_to_rgb(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 4, dst.len(), 3)?;
    strip_4to3(src, dst, [2, 1, 0]);
    Ok(())
}

/// Gray (1 byte/px) → RGBA/BGRA/RGBX (4 bytes/px). R=G=B=gray, alpha=255.
pub fn gray_to_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 1, dst.len(), 4)?;
    for (&g, d) in src.iter().zip(dst.chunks_exact_mut(4)) {
        d.copy_from_slice(&[g, g, g, 0xFF]);
    }
    Ok(())
}

/// GrayAlpha (2 bytes/px) → RGBA/BGRA (4 bytes/px). R=G=B=gray.
pub fn gray_alpha_to_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    check_copy(src.len(), 2, dst.len(), 4)?;
    for (ga, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(4)) {
        d.copy_from_slice(&[ga[0], ga[0], ga[0], ga[1]]);
    }
    Ok(())
}

#[inline]
fn expand_3to4(src: &[u8], dst: &mut [u8], order: [usize; 3]) {
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        d.copy_from_slice(&[s[order[0]], s[order[1]], s[order[2]], 0xFF]);
    }
}

#[inline]
fn strip_4to3(src: &[u8], dst: &mut [u8], order: [usize; 3]) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(3)) {
        d.copy_from_slice(&[s[order[0]], s[order[1]], s[order[2]]]);
    }
}

// ===========================================================================
// Aliases: symmetric operations get both names
// ===========================================================================

/// Alias for [`rgba_to_bgra_inplace`].
#[inline(always)]
pub fn bgra_to_rgba_inplace(buf: &mut [u8]) -> Result<(), SizeError> {
    rgba_to_bgra_inplace(buf)
}

/// Alias for [`rgba_to_bgra`].
#[inline(always)]
pub fn bgra_to_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    rgba_to_bgra(src, dst)
}

/// Alias for [`rgba_to_bgrx`] (the swap is symmetric).
#[inline(always)]
pub fn bgra_to_rgbx(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    rgba_to_bgrx(src, dst)
}

/// Alias for [`rgb_to_bgra`].
#[inline(always)]
pub fn bgr_to_rgba(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    rgb_to_bgra(src, dst)
}

/// Alias for [`rgb_to_rgba`].
#[inline(always)]
pub fn bgr_to_bgra(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    rgb_to_rgba(src, dst)
}

/// Alias for [`rgb_to_bgr`].
#[inline(always)]
pub fn bgr_to_rgb(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    rgb_to_bgr(src, dst)
}

/// Alias for [`bgra_to_rgb`].
#[inline(always)]
pub fn rgba_to_bgr(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    bgra_to_rgb(src, dst)
}

/// Alias for [`rgba_to_rgb`].
#[inline(always)]
pub fn bgra_to_bgr(src: &[u8], dst: &mut [u8]) -> Result<(), SizeError> {
    rgba_to_rgb(src, dst)
}
