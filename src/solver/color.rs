use {
  crate::raster::Scanline,
  image::{Rgba, RgbaImage}
};

/// Solid color which, composited over `current` at `alpha`, minimizes the squared error
/// against `target` on the pixels under `lines`.
///
/// Per channel, the blend is `a*o + (1-a)*c` with `a = alpha / 255`. Setting the derivative of
/// the summed squared error to zero gives `o = mean((a*c - c + t) / a)`, which is then rounded
/// and clamped to `[0, 255]`.
///
/// An empty footprint, or `alpha == 0`, yields fully transparent black.
pub fn compute_color(target: &RgbaImage, current: &RgbaImage, lines: &[Scanline], alpha: u8) -> Rgba<u8> {
  debug_assert_eq!(target.dimensions(), current.dimensions());
  if alpha == 0 {
    return Rgba([0; 4]);
  }
  let a = alpha as f64 / 255.0;
  let width = target.width();
  let (t, c): (&[u8], &[u8]) = (target, current);

  let mut sum = [0.0f64; 3];
  let mut count = 0usize;
  for line in lines {
    let range = line.byte_range(width);
    for (tp, cp) in t[range.clone()].chunks_exact(4).zip(c[range].chunks_exact(4)) {
      count += 1;
      for ch in 0..3 {
        let (tv, cv) = (tp[ch] as f64, cp[ch] as f64);
        sum[ch] += (a * cv - cv + tv) / a;
      }
    }
  }
  if count == 0 {
    return Rgba([0; 4]);
  }

  let channel = |s: f64| (s / count as f64).round().clamp(0.0, 255.0) as u8;
  Rgba([channel(sum[0]), channel(sum[1]), channel(sum[2]), alpha])
}
