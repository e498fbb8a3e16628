use archmage::prelude::*;
use safe_unaligned_simd::x86_64::{_mm256_loadu_si256, _mm256_storeu_si256};

use super::Shuffle4;

// ===========================================================================
// x86-64 AVX2 rite row implementations
// ===========================================================================

// Eight pixels per iteration: pshufb permutes within each 128-bit lane,
// then the OR mask forces alpha where requested. The tail goes through
// the scalar table.

#[rite]
pub(super) fn shuffle4_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u8], shuf: Shuffle4) {
    let control = _mm256_loadu_si256(&shuf.shuffle_lanes());
    let alpha = _mm256_loadu_si256(&shuf.or_lanes());
    let n = src.len().min(dst.len());
    let mut i = 0;
    while i + 32 <= n {
        let s: &[u8; 32] = src[i..i + 32].try_into().unwrap();
        let v = _mm256_shuffle_epi8(_mm256_loadu_si256(s), control);
        let d: &mut [u8; 32] = (&mut dst[i..i + 32]).try_into().unwrap();
        _mm256_storeu_si256(d, _mm256_or_si256(v, alpha));
        i += 32;
    }
    for (s, d) in src[i..n].chunks_exact(4).zip(dst[i..n].chunks_exact_mut(4)) {
        shuf.apply(s, d);
    }
}

#[rite]
pub(super) fn shuffle4_inplace_row_v3(_token: X64V3Token, row: &mut [u8], shuf: Shuffle4) {
    let control = _mm256_loadu_si256(&shuf.shuffle_lanes());
    let alpha = _mm256_loadu_si256(&shuf.or_lanes());
    let n = row.len();
    let mut i = 0;
    while i + 32 <= n {
        let arr: &[u8; 32] = row[i..i + 32].try_into().unwrap();
        let v = _mm256_shuffle_epi8(_mm256_loadu_si256(arr), control);
        let out: &mut [u8; 32] = (&mut row[i..i + 32]).try_into().unwrap();
        _mm256_storeu_si256(out, _mm256_or_si256(v, alpha));
        i += 32;
    }
    for px in row[i..].chunks_exact_mut(4) {
        shuf.apply_inplace(px);
    }
}

// ===========================================================================
// Arcane wrappers, contiguous and strided
// ===========================================================================

#[arcane]
pub(super) fn shuffle4_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u8], shuf: Shuffle4) {
    shuffle4_row_v3(t, s, d, shuf);
}

#[arcane]
pub(super) fn shuffle4_inplace_impl_v3(t: X64V3Token, b: &mut [u8], shuf: Shuffle4) {
    shuffle4_inplace_row_v3(t, b, shuf);
}

#[arcane]
#[allow(clippy::too_many_arguments)]
pub(super) fn shuffle4_strided_v3(
    t: X64V3Token,
    src: &[u8],
    dst: &mut [u8],
    w: usize,
    h: usize,
    ss: usize,
    ds: usize,
    shuf: Shuffle4,
) {
    for y in 0..h {
        shuffle4_row_v3(t, &src[y * ss..][..w * 4], &mut dst[y * ds..][..w * 4], shuf);
    }
}

#[arcane]
pub(super) fn shuffle4_inplace_strided_v3(
    t: X64V3Token,
    buf: &mut [u8],
    w: usize,
    h: usize,
    stride: usize,
    shuf: Shuffle4,
) {
    for y in 0..h {
        shuffle4_inplace_row_v3(t, &mut buf[y * stride..][..w * 4], shuf);
    }
}
