//! Horizontal pixel spans, and the few pixel operations defined on them.
//!
//! Every shape rasterizes to a list of [`Scanline`]s, clipped to the canvas, with at most one
//! span per row. The color solver, the scorer and compositing iterate those spans, so each
//! covered pixel is visited exactly once.

use {
  crate::geometry::PixelSpace,
  euclid::Size2D,
  image::{Rgba, RgbaImage}
};

/// Inclusive span `x1..=x2` on row `y`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Scanline {
  pub y: u32,
  pub x1: u32,
  pub x2: u32,
}

impl Scanline {
  /// Clip a span given in signed coordinates to `bounds`.
  /// Returns `None` if nothing is left.
  pub fn clipped(y: i64, x1: i64, x2: i64, bounds: Size2D<u32, PixelSpace>) -> Option<Self> {
    let (w, h) = (bounds.width as i64, bounds.height as i64);
    if y < 0 || y >= h || w == 0 {
      return None;
    }
    let (x1, x2) = (x1.max(0), x2.min(w - 1));
    (x1 <= x2).then(|| Scanline { y: y as u32, x1: x1 as u32, x2: x2 as u32 })
  }

  pub fn len(&self) -> usize {
    (self.x2 - self.x1 + 1) as usize
  }

  /// Byte range of this span in a row-major RGBA buffer of the given width.
  #[inline]
  pub(crate) fn byte_range(&self, width: u32) -> std::ops::Range<usize> {
    let start = (self.y as usize * width as usize + self.x1 as usize) * 4;
    start..start + self.len() * 4
  }
}

/// Number of pixels covered by `lines`.
pub fn footprint(lines: &[Scanline]) -> usize {
  lines.iter().map(Scanline::len).sum()
}

/// Composite a solid color over `lines` with "source over" blending.
///
/// Channels are widened to 16 bits, premultiplied by the color's alpha, and narrowed back,
/// so no channel can overflow or wrap.
pub fn draw_lines(image: &mut RgbaImage, color: Rgba<u8>, lines: &[Scanline]) {
  const M: u32 = 0xffff;
  let Rgba([r, g, b, a]) = color;
  let sa = a as u32 * 0x101;
  let premultiply = |c: u8| c as u32 * 0x101 * sa / M;
  let (sr, sg, sb) = (premultiply(r), premultiply(g), premultiply(b));
  let k = (M - sa) * 0x101;
  let width = image.width();
  let data: &mut [u8] = image;

  for line in lines {
    for px in data[line.byte_range(width)].chunks_exact_mut(4) {
      px[0] = ((px[0] as u32 * k / M + sr) >> 8) as u8;
      px[1] = ((px[1] as u32 * k / M + sg) >> 8) as u8;
      px[2] = ((px[2] as u32 * k / M + sb) >> 8) as u8;
      px[3] = ((px[3] as u32 * k / M + sa) >> 8) as u8;
    }
  }
}

/// Copy the pixels under `lines` from `src` into `dst`.
pub fn copy_lines(dst: &mut RgbaImage, src: &RgbaImage, lines: &[Scanline]) {
  debug_assert_eq!(dst.dimensions(), src.dimensions());
  let width = src.width();
  let (dst, src): (&mut [u8], &[u8]) = (dst, src);
  for line in lines {
    let range = line.byte_range(width);
    dst[range.clone()].copy_from_slice(&src[range]);
  }
}

/// Image filled with a single color.
pub fn uniform(size: Size2D<u32, PixelSpace>, color: Rgba<u8>) -> RgbaImage {
  RgbaImage::from_pixel(size.width, size.height, color)
}

#[cfg(test)] mod tests {
  use super::*;

  #[test] fn clipping() {
    let bounds = Size2D::new(4, 3);
    assert_eq!(Scanline::clipped(1, -5, 10, bounds), Some(Scanline { y: 1, x1: 0, x2: 3 }));
    assert_eq!(Scanline::clipped(3, 0, 1, bounds), None);
    assert_eq!(Scanline::clipped(-1, 0, 1, bounds), None);
    assert_eq!(Scanline::clipped(0, 5, 9, bounds), None);
    assert_eq!(Scanline::clipped(0, 2, 1, bounds), None);
  }

  #[test] fn opaque_draw_replaces() {
    let mut image = uniform(Size2D::new(3, 2), Rgba([255, 255, 255, 255]));
    let lines = [Scanline { y: 1, x1: 1, x2: 2 }];
    draw_lines(&mut image, Rgba([10, 20, 30, 255]), &lines);
    assert_eq!(*image.get_pixel(1, 1), Rgba([10, 20, 30, 255]));
    assert_eq!(*image.get_pixel(2, 1), Rgba([10, 20, 30, 255]));
    assert_eq!(*image.get_pixel(0, 1), Rgba([255, 255, 255, 255]));
    assert_eq!(*image.get_pixel(1, 0), Rgba([255, 255, 255, 255]));
  }

  #[test] fn half_alpha_blends() {
    let mut image = uniform(Size2D::new(1, 1), Rgba([0, 0, 0, 255]));
    draw_lines(&mut image, Rgba([255, 255, 255, 128]), &[Scanline { y: 0, x1: 0, x2: 0 }]);
    let Rgba([r, g, b, a]) = *image.get_pixel(0, 0);
    assert!((127..=129).contains(&r));
    assert_eq!((r, r), (g, b));
    assert_eq!(a, 255);
  }

  #[test] fn copy_restores() {
    let src = uniform(Size2D::new(2, 2), Rgba([1, 2, 3, 4]));
    let mut dst = uniform(Size2D::new(2, 2), Rgba([9, 9, 9, 9]));
    copy_lines(&mut dst, &src, &[Scanline { y: 0, x1: 0, x2: 1 }]);
    assert_eq!(*dst.get_pixel(1, 0), Rgba([1, 2, 3, 4]));
    assert_eq!(*dst.get_pixel(0, 1), Rgba([9, 9, 9, 9]));
    assert_eq!(footprint(&[Scanline { y: 0, x1: 0, x2: 1 }, Scanline { y: 1, x1: 1, x2: 1 }]), 3);
  }
}
