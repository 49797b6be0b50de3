use {
  crate::geometry::PixelSpace,
  euclid::Size2D,
  image::{DynamicImage, GenericImageView, Rgba, RgbaImage}
};

/// Output size for a `source` of arbitrary aspect ratio: the longer side becomes `size`, and
/// the shorter one is scaled down and truncated, but never below one pixel. Returns the size
/// and the scale factor.
pub fn fit_size(source: Size2D<u32, PixelSpace>, size: u32) -> (Size2D<u32, PixelSpace>, f64) {
  let aspect = source.width as f64 / source.height as f64;
  if aspect >= 1.0 {
    (
      Size2D::new(size, ((size as f64 / aspect) as u32).max(1)),
      size as f64 / source.width as f64
    )
  } else {
    (
      Size2D::new(((size as f64 * aspect) as u32).max(1), size),
      size as f64 / source.height as f64
    )
  }
}

/// Mean of the color channels, fully opaque.
pub fn average_color(image: &RgbaImage) -> Rgba<u8> {
  let n = (image.width() as u64 * image.height() as u64).max(1);
  let sum = image.pixels().fold([0u64; 3], |[r, g, b], Rgba([pr, pg, pb, _])| {
    [r + *pr as u64, g + *pg as u64, b + *pb as u64]
  });
  let [r, g, b] = sum.map(|c| (c / n) as u8);
  Rgba([r, g, b, 255])
}

/// Shrink a decoded image so that its longer side is at most `max_size`, keeping the aspect
/// ratio. Smaller images are only converted.
pub fn prepare_target(image: &DynamicImage, max_size: u32) -> RgbaImage {
  let (w, h) = image.dimensions();
  if w.max(h) > max_size {
    image.thumbnail(max_size, max_size).to_rgba8()
  } else {
    image.to_rgba8()
  }
}

/// SVG fill attributes for a solid color with opacity.
pub(crate) fn svg_fill(color: Rgba<u8>) -> String {
  let Rgba([r, g, b, a]) = color;
  format!("fill=\"#{:02x}{:02x}{:02x}\" fill-opacity=\"{:.6}\"", r, g, b, a as f64 / 255.0)
}
