use archmage::prelude::*;

use super::Shuffle4;

// ===========================================================================
// Scalar row implementations
// ===========================================================================

pub(super) fn shuffle4_row_scalar(_token: ScalarToken, src: &[u8], dst: &mut [u8], shuf: Shuffle4) {
    for (s, d) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        shuf.apply(s, d);
    }
}

pub(super) fn shuffle4_inplace_row_scalar(_token: ScalarToken, row: &mut [u8], shuf: Shuffle4) {
    for px in row.chunks_exact_mut(4) {
        shuf.apply_inplace(px);
    }
}

// ===========================================================================
// Dispatch targets for incant!
// ===========================================================================

pub(super) fn shuffle4_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u8], shuf: Shuffle4) {
    shuffle4_row_scalar(t, s, d, shuf);
}

pub(super) fn shuffle4_inplace_impl_scalar(t: ScalarToken, b: &mut [u8], shuf: Shuffle4) {
    shuffle4_inplace_row_scalar(t, b, shuf);
}

#[allow(clippy::too_many_arguments)]
pub(super) fn shuffle4_strided_scalar(
    t: ScalarToken,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
    shuf: Shuffle4,
) {
    for y in 0..h {
        shuffle4_row_scalar(t, &src[y * ss..][..w * 4], &mut dst[y * ds..][..w * 4], shuf);
    }
}

pub(super) fn shuffle4_inplace_strided_scalar(
    t: ScalarToken,
    buf: &mut [u8],
    w: usize,
    h: usize,
    stride: usize,
    shuf: Shuffle4,
) {
    for y in 0..h {
        shuffle4_inplace_row_scalar(t, &mut buf[y * stride..][..w * 4], shuf);
    }
}
