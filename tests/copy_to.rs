//! End-to-end behavior of `copy_to` across every color type.

use pixcast::{
    AlphaType, Bitmap, ColorSpace, ColorType, CopyError, ImageInfo, PixelSource, Pixmap, SizeError,
    conversion_supported, copy_to, read_pixels,
};

fn opaque_or_premul(ct: ColorType) -> AlphaType {
    if ct.is_always_opaque() {
        AlphaType::Opaque
    } else {
        AlphaType::Premul
    }
}

fn noisy(ct: ColorType, w: u32, h: u32) -> Bitmap {
    let mut bm = Bitmap::try_alloc(ImageInfo::new(w, h, ct, opaque_or_premul(ct))).unwrap();
    let mut state = 0x1234_5678u32;
    for b in bm.pixels_mut() {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
        *b = (state >> 16) as u8;
    }
    bm
}

#[test]
fn identity_is_byte_exact() {
    for ct in ColorType::ALL {
        let src = noisy(ct, 17, 5);
        let dst = src.copy_to(ct).unwrap();
        assert_eq!(dst.pixels(), src.pixels(), "{ct:?}");
        assert_eq!(dst.info(), src.info(), "{ct:?}");
    }
}

#[test]
fn lossless_round_trips() {
    let pairs = [
        (ColorType::Rgba8888, ColorType::Bgra8888),
        (ColorType::Rgb888, ColorType::Bgr888),
        (ColorType::Rgba8888, ColorType::Rgba16161616),
        (ColorType::Rgb565, ColorType::Rgb888),
        (ColorType::Argb4444, ColorType::Rgba8888),
        (ColorType::Gray8, ColorType::Rgb888),
        (ColorType::GrayAlpha88, ColorType::Bgra8888),
        (ColorType::Rgb888, ColorType::Rgb888x),
    ];
    for (a, b) in pairs {
        let src = noisy(a, 9, 4);
        let there = src.copy_to(b).unwrap();
        let back = there.copy_to(a).unwrap();
        assert_eq!(back.pixels(), src.pixels(), "{a:?} -> {b:?} -> {a:?}");
    }
}

#[test]
fn every_supported_pair_converts() {
    for from in ColorType::ALL {
        let src = noisy(from, 5, 3);
        for to in ColorType::ALL {
            let mut dst = Bitmap::new();
            let result = copy_to(&mut dst, to, &src);
            if conversion_supported(from, to) {
                result.unwrap();
                assert_eq!(dst.info().color_type(), to);
                assert_eq!(dst.row_bytes(), 5 * to.bytes_per_pixel());
                assert_eq!(dst.pixels().len(), 15 * to.bytes_per_pixel());
            } else {
                assert_eq!(result, Err(CopyError::UnsupportedConversion { from, to }));
                assert!(dst.is_empty());
            }
        }
    }
}

#[test]
fn empty_source_leaves_destination_unchanged() {
    let mut dst = noisy(ColorType::Rgb565, 3, 3);
    let before = dst.clone();
    for (w, h) in [(0, 0), (0, 4), (4, 0)] {
        let src = Pixmap::new(
            ImageInfo::new(w, h, ColorType::Rgba8888, AlphaType::Premul),
            w as usize * 4,
            &[],
        )
        .unwrap();
        assert_eq!(
            copy_to(&mut dst, ColorType::Bgra8888, &src),
            Err(CopyError::EmptySource)
        );
        assert_eq!(dst, before);
    }
}

#[test]
fn unknown_destination_fails_deterministically() {
    let src = noisy(ColorType::Rgba8888, 2, 2);
    let mut dst = noisy(ColorType::Gray8, 2, 2);
    let before = dst.clone();
    for _ in 0..3 {
        assert_eq!(
            copy_to(&mut dst, ColorType::Unknown, &src),
            Err(CopyError::UnsupportedColorType(ColorType::Unknown))
        );
        assert_eq!(dst, before);
    }
}

#[test]
fn invalid_source_is_rejected() {
    let info = ImageInfo::new(2, 2, ColorType::Rgba8888, AlphaType::Premul);
    // A PixelSource that skips Pixmap's constructor checks.
    struct Raw(ImageInfo, usize, Vec<u8>);
    impl PixelSource for Raw {
        fn info(&self) -> &ImageInfo {
            &self.0
        }
        fn row_bytes(&self) -> usize {
            self.1
        }
        fn pixels(&self) -> &[u8] {
            &self.2
        }
    }
    let mut dst = Bitmap::new();
    assert_eq!(
        copy_to(&mut dst, ColorType::Bgra8888, &Raw(info, 8, vec![0; 12])),
        Err(CopyError::InvalidSource(SizeError::InvalidStride))
    );
    assert_eq!(
        copy_to(&mut dst, ColorType::Bgra8888, &Raw(info, 6, vec![0; 16])),
        Err(CopyError::InvalidSource(SizeError::InvalidStride))
    );
    assert_eq!(
        copy_to(
            &mut dst,
            ColorType::Bgra8888,
            &Raw(info.with_alpha_type(AlphaType::Unknown), 8, vec![0; 16])
        ),
        Err(CopyError::InvalidAlphaType)
    );
    assert!(dst.is_empty());
}

#[test]
fn strided_source_ignores_padding() {
    let (w, h, stride) = (5usize, 3usize, 28usize);
    let mut px = vec![0xABu8; stride * h];
    for y in 0..h {
        for x in 0..w {
            let i = y * stride + x * 4;
            px[i..i + 4].copy_from_slice(&[x as u8, y as u8, 7, 255]);
        }
    }
    let info = ImageInfo::new(w as u32, h as u32, ColorType::Rgba8888, AlphaType::Premul);
    let src = Pixmap::new(info, stride, &px).unwrap();
    for to in [ColorType::Bgra8888, ColorType::Rgb888, ColorType::Rgb565, ColorType::Gray8] {
        let dst = src.copy_to(to).unwrap();
        assert_eq!(dst.row_bytes(), w * to.bytes_per_pixel());
        let back = dst.copy_to(ColorType::Rgba8888).unwrap();
        for y in 0..h {
            let row = back.row(y as u32).unwrap();
            assert!(row.chunks_exact(4).all(|p| p[3] == 255), "{to:?}");
        }
    }
    let bgra = src.copy_to(ColorType::Bgra8888).unwrap();
    assert_eq!(&bgra.pixels()[..8], &[7, 0, 0, 255, 7, 0, 1, 255]);
    assert!(!bgra.pixels().contains(&0xAB));
}

#[test]
fn alpha_conversions() {
    let info = ImageInfo::new(2, 1, ColorType::Rgba8888, AlphaType::Unpremul);
    let src = Bitmap::from_vec(info, 8, vec![255, 128, 0, 128, 10, 20, 30, 0]).unwrap();

    // Straight alpha into an opaque type composites over black.
    let rgb = src.copy_to(ColorType::Rgb888).unwrap();
    assert_eq!(rgb.pixels(), &[128, 64, 0, 0, 0, 0]);
    assert_eq!(rgb.info().alpha_type(), AlphaType::Opaque);

    // Alpha masks are premultiplied by definition.
    let mask = src.copy_to(ColorType::Alpha8).unwrap();
    assert_eq!(mask.pixels(), &[128, 0]);
    assert_eq!(mask.info().alpha_type(), AlphaType::Premul);

    // Unpremul stays unpremul when the destination can carry alpha.
    let wide = src.copy_to(ColorType::Rgba16161616).unwrap();
    assert_eq!(wide.info().alpha_type(), AlphaType::Unpremul);
    assert_eq!(wide.copy_to(ColorType::Rgba8888).unwrap().pixels(), src.pixels());
}

#[test]
fn opaque_types_extract_full_alpha() {
    let src = noisy(ColorType::Rgb565, 4, 2);
    let mask = src.copy_to(ColorType::Alpha8).unwrap();
    assert!(mask.pixels().iter().all(|&a| a == 255));
    let x = noisy(ColorType::Rgb888x, 4, 2).copy_to(ColorType::Rgba8888).unwrap();
    assert!(x.pixels().chunks_exact(4).all(|p| p[3] == 255));
}

#[test]
fn color_space_is_carried() {
    let info = ImageInfo::new(1, 1, ColorType::Rgb888, AlphaType::Opaque)
        .with_color_space(ColorSpace::LinearSrgb);
    let src = Bitmap::from_vec(info, 3, vec![1, 2, 3]).unwrap();
    let dst = src.copy_to(ColorType::Bgra8888).unwrap();
    assert_eq!(dst.info().color_space(), ColorSpace::LinearSrgb);
    assert_eq!(dst.pixels(), &[3, 2, 1, 255]);
}

#[test]
fn option_destination() {
    let src = noisy(ColorType::Bgr888, 3, 3);
    let mut slot: Option<Bitmap> = None;
    copy_to(&mut slot, ColorType::Rgb888, &src).unwrap();
    assert_eq!(slot.unwrap().info().color_type(), ColorType::Rgb888);

    let mut untouched: Option<Bitmap> = None;
    assert!(copy_to(&mut untouched, ColorType::Unknown, &src).is_err());
    assert!(untouched.is_none());
}

#[test]
fn read_pixels_into_padded_rows() {
    let src = noisy(ColorType::Bgra8888, 3, 2);
    let dst_info = src.info().with_color_type(ColorType::Rgba8888);
    let mut out = vec![0x5Au8; 16 + 12];
    read_pixels(&dst_info, &mut out, 16, &src).unwrap();
    assert_eq!(&out[12..16], &[0x5A; 4]);
    let s = src.pixels();
    assert_eq!(&out[16..20], &[s[14], s[13], s[12], s[15]]);
}
