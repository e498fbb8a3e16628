//! Per-pixel codec between every [`ColorType`] and a 16-bit RGBA
//! intermediate, plus the alpha arithmetic the generic path needs.
//!
//! All channels widen to `u16` so the 16-bit encoding converts without
//! loss; 8-bit values replicate (`v * 257`) so that narrowing back is
//! exact.

use crate::ColorType;

/// One pixel in the working format: `[r, g, b, a]`, each 0..=65535.
pub(crate) type Rgba16 = [u16; 4];

const OPAQUE: u16 = u16::MAX;

#[inline(always)]
pub(crate) const fn widen8(v: u8) -> u16 {
    v as u16 * 257
}

#[inline(always)]
pub(crate) const fn narrow8(v: u16) -> u8 {
    ((v as u32 + 128) / 257) as u8
}

/// Replicate the top bits of an `n`-bit field into a full byte.
#[inline(always)]
const fn widen_bits(v: u16, bits: u32) -> u8 {
    match bits {
        4 => (v * 17) as u8,
        5 => ((v << 3) | (v >> 2)) as u8,
        6 => ((v << 2) | (v >> 4)) as u8,
        _ => v as u8,
    }
}

/// Round a byte down to an `n`-bit field.
#[inline(always)]
const fn narrow_bits(v: u8, bits: u32) -> u16 {
    let max = (1u32 << bits) - 1;
    ((v as u32 * max + 127) / 255) as u16
}

#[inline(always)]
fn word(px: &[u8], i: usize) -> u16 {
    u16::from_ne_bytes([px[i], px[i + 1]])
}

#[inline(always)]
fn put_word(px: &mut [u8], i: usize, w: u16) {
    px[i..i + 2].copy_from_slice(&w.to_ne_bytes());
}

/// Rec. 709 luma in 1/256ths: `(54 R + 183 G + 19 B + 128) >> 8`.
#[inline]
pub(crate) fn luminance(c: Rgba16) -> u16 {
    ((54 * c[0] as u32 + 183 * c[1] as u32 + 19 * c[2] as u32 + 128) >> 8) as u16
}

/// Decode one pixel. `px` holds at least `ct.bytes_per_pixel()` bytes.
///
/// Color types without alpha storage decode with full alpha. `Alpha8`
/// decodes to black with its coverage in alpha.
pub(crate) fn load(ct: ColorType, px: &[u8]) -> Rgba16 {
    match ct {
        ColorType::Alpha8 => [0, 0, 0, widen8(px[0])],
        ColorType::Gray8 => {
            let g = widen8(px[0]);
            [g, g, g, OPAQUE]
        }
        ColorType::GrayAlpha88 => {
            let g = widen8(px[0]);
            [g, g, g, widen8(px[1])]
        }
        ColorType::Rgb565 => {
            let w = word(px, 0);
            [
                widen8(widen_bits(w >> 11, 5)),
                widen8(widen_bits((w >> 5) & 0x3F, 6)),
                widen8(widen_bits(w & 0x1F, 5)),
                OPAQUE,
            ]
        }
        ColorType::Argb4444 => {
            let w = word(px, 0);
            [
                widen8(widen_bits(w >> 12, 4)),
                widen8(widen_bits((w >> 8) & 0xF, 4)),
                widen8(widen_bits((w >> 4) & 0xF, 4)),
                widen8(widen_bits(w & 0xF, 4)),
            ]
        }
        ColorType::Rgb888 | ColorType::Rgb888x => {
            [widen8(px[0]), widen8(px[1]), widen8(px[2]), OPAQUE]
        }
        ColorType::Bgr888 => [widen8(px[2]), widen8(px[1]), widen8(px[0]), OPAQUE],
        ColorType::Rgba8888 => [widen8(px[0]), widen8(px[1]), widen8(px[2]), widen8(px[3])],
        ColorType::Bgra8888 => [widen8(px[2]), widen8(px[1]), widen8(px[0]), widen8(px[3])],
        ColorType::Rgba16161616 => [word(px, 0), word(px, 2), word(px, 4), word(px, 6)],
        ColorType::Unknown => [0; 4],
    }
}

/// Encode one pixel into `px`, which holds at least
/// `ct.bytes_per_pixel()` bytes. Opaque encodings drop alpha; gray
/// encodings store luminance.
pub(crate) fn store(ct: ColorType, c: Rgba16, px: &mut [u8]) {
    let [r, g, b, a] = c;
    match ct {
        ColorType::Alpha8 => px[0] = narrow8(a),
        ColorType::Gray8 => px[0] = narrow8(luminance(c)),
        ColorType::GrayAlpha88 => {
            px[0] = narrow8(luminance(c));
            px[1] = narrow8(a);
        }
        ColorType::Rgb565 => {
            let w = (narrow_bits(narrow8(r), 5) << 11)
                | (narrow_bits(narrow8(g), 6) << 5)
                | narrow_bits(narrow8(b), 5);
            put_word(px, 0, w);
        }
        ColorType::Argb4444 => {
            let w = (narrow_bits(narrow8(r), 4) << 12)
                | (narrow_bits(narrow8(g), 4) << 8)
                | (narrow_bits(narrow8(b), 4) << 4)
                | narrow_bits(narrow8(a), 4);
            put_word(px, 0, w);
        }
        ColorType::Rgb888 => px[..3].copy_from_slice(&[narrow8(r), narrow8(g), narrow8(b)]),
        ColorType::Bgr888 => px[..3].copy_from_slice(&[narrow8(b), narrow8(g), narrow8(r)]),
        ColorType::Rgba8888 => {
            px[..4].copy_from_slice(&[narrow8(r), narrow8(g), narrow8(b), narrow8(a)])
        }
        ColorType::Rgb888x => px[..4].copy_from_slice(&[narrow8(r), narrow8(g), narrow8(b), 0xFF]),
        ColorType::Bgra8888 => {
            px[..4].copy_from_slice(&[narrow8(b), narrow8(g), narrow8(r), narrow8(a)])
        }
        ColorType::Rgba16161616 => {
            put_word(px, 0, r);
            put_word(px, 2, g);
            put_word(px, 4, b);
            put_word(px, 6, a);
        }
        ColorType::Unknown => {}
    }
}

/// Multiply color by alpha, rounding to nearest.
#[inline]
pub(crate) fn premultiply(c: Rgba16) -> Rgba16 {
    let a = c[3] as u32;
    let mul = |v: u16| ((v as u32 * a + 32767) / 65535) as u16;
    [mul(c[0]), mul(c[1]), mul(c[2]), c[3]]
}

/// Divide color by alpha, rounding to nearest. Fully transparent pixels
/// become transparent black.
#[inline]
pub(crate) fn unpremultiply(c: Rgba16) -> Rgba16 {
    let a = c[3] as u64;
    if a == 0 {
        return [0; 4];
    }
    let div = |v: u16| ((v as u64 * 65535 + a / 2) / a).min(65535) as u16;
    [div(c[0]), div(c[1]), div(c[2]), c[3]]
}

pub(crate) fn load_row(ct: ColorType, src: &[u8], out: &mut [Rgba16]) {
    let bpp = ct.bytes_per_pixel();
    for (px, c) in src.chunks_exact(bpp).zip(out.iter_mut()) {
        *c = load(ct, px);
    }
}

pub(crate) fn store_row(ct: ColorType, row: &[Rgba16], dst: &mut [u8]) {
    let bpp = ct.bytes_per_pixel();
    for (&c, px) in row.iter().zip(dst.chunks_exact_mut(bpp)) {
        store(ct, c, px);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba8(c: Rgba16) -> [u8; 4] {
        c.map(narrow8)
    }

    #[test]
    fn byte_widening_is_exact() {
        for v in 0..=255u8 {
            assert_eq!(narrow8(widen8(v)), v);
        }
        assert_eq!(narrow8(u16::MAX), 255);
        assert_eq!(narrow8(128), 0);
        assert_eq!(narrow8(129), 1);
    }

    #[test]
    fn rgb565_round_trips() {
        let mut px = [0u8; 2];
        for w in 0..=u16::MAX {
            let c = load(ColorType::Rgb565, &w.to_ne_bytes());
            assert_eq!(c[3], u16::MAX);
            store(ColorType::Rgb565, c, &mut px);
            assert_eq!(u16::from_ne_bytes(px), w, "word {w:#06x}");
        }
    }

    #[test]
    fn argb4444_round_trips() {
        let mut px = [0u8; 2];
        for w in 0..=u16::MAX {
            store(ColorType::Argb4444, load(ColorType::Argb4444, &w.to_ne_bytes()), &mut px);
            assert_eq!(u16::from_ne_bytes(px), w);
        }
    }

    #[test]
    fn rgb565_expands_to_full_range() {
        let white = load(ColorType::Rgb565, &0xFFFFu16.to_ne_bytes());
        assert_eq!(rgba8(white), [255, 255, 255, 255]);
        let red = load(ColorType::Rgb565, &0xF800u16.to_ne_bytes());
        assert_eq!(rgba8(red), [255, 0, 0, 255]);
    }

    #[test]
    fn channel_orders() {
        let c = load(ColorType::Bgra8888, &[1, 2, 3, 4]);
        assert_eq!(rgba8(c), [3, 2, 1, 4]);
        let mut out = [0u8; 3];
        store(ColorType::Bgr888, c, &mut out);
        assert_eq!(out, [1, 2, 3]);
        let mut x = [0u8; 4];
        store(ColorType::Rgb888x, c, &mut x);
        assert_eq!(x, [3, 2, 1, 255]);
        assert_eq!(load(ColorType::Rgb888x, &[9, 8, 7, 0])[3], u16::MAX);
    }

    #[test]
    fn wide_words_are_native_endian() {
        let mut px = [0u8; 8];
        store(ColorType::Rgba16161616, [1, 0x0203, 0xFFFF, 0x8000], &mut px);
        assert_eq!(&px[2..4], &0x0203u16.to_ne_bytes());
        assert_eq!(load(ColorType::Rgba16161616, &px), [1, 0x0203, 0xFFFF, 0x8000]);
    }

    #[test]
    fn gray_uses_luminance() {
        let mut g = [0u8; 1];
        store(ColorType::Gray8, load(ColorType::Rgb888, &[255, 255, 255]), &mut g);
        assert_eq!(g, [255]);
        store(ColorType::Gray8, load(ColorType::Rgb888, &[255, 0, 0]), &mut g);
        assert_eq!(g, [54]);
        store(ColorType::Gray8, load(ColorType::Rgb888, &[0, 255, 0]), &mut g);
        assert_eq!(g, [182]);
        for v in 0..=255u8 {
            store(ColorType::Gray8, load(ColorType::Gray8, &[v]), &mut g);
            assert_eq!(g, [v]);
        }
    }

    #[test]
    fn premultiply_rounds() {
        let unpremul = load(ColorType::Rgba8888, &[255, 128, 0, 128]);
        assert_eq!(rgba8(premultiply(unpremul)), [128, 64, 0, 128]);
        let premul = load(ColorType::Rgba8888, &[128, 64, 0, 128]);
        assert_eq!(rgba8(unpremultiply(premul)), [255, 128, 0, 128]);
    }

    #[test]
    fn unpremultiply_edges() {
        assert_eq!(unpremultiply([500, 20, 0, 0]), [0; 4]);
        // color above alpha clamps instead of overflowing
        assert_eq!(unpremultiply([300, 0, 0, 200])[0], u16::MAX);
        let opaque = [1, 2, 3, u16::MAX];
        assert_eq!(premultiply(opaque), opaque);
        assert_eq!(unpremultiply(opaque), opaque);
    }

    #[test]
    fn premul_survives_unpremul_round_trip() {
        for a in 1..=255u8 {
            for c in 0..=a {
                let px = load(ColorType::Rgba8888, &[c, c, c, a]);
                let back = rgba8(premultiply(unpremultiply(px)));
                assert_eq!(back, [c, c, c, a], "c={c} a={a}");
            }
        }
    }

    #[test]
    fn rows() {
        let src = [1u8, 2, 3, 4, 5, 6];
        let mut tmp = [[0u16; 4]; 2];
        load_row(ColorType::Rgb888, &src, &mut tmp);
        let mut dst = [0u8; 8];
        store_row(ColorType::Bgra8888, &tmp, &mut dst);
        assert_eq!(dst, [3, 2, 1, 255, 6, 5, 4, 255]);
    }
}
