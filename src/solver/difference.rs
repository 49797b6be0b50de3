use {
  crate::raster::Scanline,
  image::RgbaImage,
  rayon::prelude::*
};

fn channel_count(image: &RgbaImage) -> f64 {
  image.width() as f64 * image.height() as f64 * 4.0
}

#[inline]
fn squared_error(a: &[u8], b: &[u8]) -> i64 {
  a.iter().zip(b).map(|(&x, &y)| {
    let d = x as i64 - y as i64;
    d * d
  }).sum()
}

/// Root mean square error over all four channels, normalized to `[0, 1]`.
pub fn difference_full(a: &RgbaImage, b: &RgbaImage) -> f64 {
  debug_assert_eq!(a.dimensions(), b.dimensions());
  let total: i64 = a.as_raw()
    .par_chunks(4096)
    .zip(b.as_raw().par_chunks(4096))
    .map(|(a, b)| squared_error(a, b))
    .sum();
  (total as f64 / channel_count(a)).sqrt() / 255.0
}

/// Score of `after`, given that `score` is the [`difference_full`] of `before`, and that the
/// two buffers only differ under `lines`.
///
/// Cost is proportional to the number of pixels under `lines`.
pub fn difference_partial(
  target: &RgbaImage,
  before: &RgbaImage,
  after: &RgbaImage,
  score: f64,
  lines: &[Scanline]
) -> f64 {
  debug_assert_eq!(target.dimensions(), before.dimensions());
  debug_assert_eq!(target.dimensions(), after.dimensions());
  let n = channel_count(target);
  let width = target.width();
  let (t, b, a): (&[u8], &[u8], &[u8]) = (target, before, after);

  let delta: i64 = lines.iter()
    .map(|line| {
      let range = line.byte_range(width);
      squared_error(&t[range.clone()], &a[range.clone()]) - squared_error(&t[range.clone()], &b[range])
    })
    .sum();
  let total = (score * 255.0).powi(2) * n + delta as f64;
  (total.max(0.0) / n).sqrt() / 255.0
}
