use {
  super::{Bounds, P2, PixelSpace, Primitive, clamp, fill_convex, fill_ellipse, normal},
  crate::raster::Scanline,
  euclid::{Angle, Rotation2D, Size2D, Vector2D as V2},
  rand::Rng
};
#[cfg(feature = "drawing")]
use crate::drawing::Canvas;

fn random_point<R: Rng>(bounds: Bounds, rng: &mut R) -> P2<i32> {
  P2::new(
    rng.gen_range(0..bounds.width.max(1) as i32),
    rng.gen_range(0..bounds.height.max(1) as i32)
  )
}

/// Offset by a normally distributed step of standard deviation `sigma`.
fn jitter<R: Rng>(v: i32, sigma: f64, rng: &mut R) -> i32 {
  v + (normal(rng) * sigma) as i32
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
  pub a: P2<i32>,
  pub b: P2<i32>,
  pub c: P2<i32>,
}

impl Triangle {
  /// Minimal interior angle, in degrees. Slivers below it are rejected by [`Triangle::mutate`].
  pub const MIN_DEGREES: f64 = 15.0;
  /// Vertices may leave the canvas by this many pixels.
  const MARGIN: i32 = 16;

  pub fn random<R: Rng>(bounds: Bounds, rng: &mut R) -> Self {
    let a = random_point(bounds, rng);
    let b = a + V2::new(rng.gen_range(-15..=15), rng.gen_range(-15..=15));
    let c = a + V2::new(rng.gen_range(-15..=15), rng.gen_range(-15..=15));
    Triangle { a, b, c }.mutate(bounds, rng)
  }

  pub fn is_valid(&self) -> bool {
    // NaN for coincident vertices, which fails the comparison
    let angle = |p: P2<i32>, q: P2<i32>, r: P2<i32>| {
      let (u, v) = ((q - p).to_f64(), (r - p).to_f64());
      (u.dot(v) / (u.length() * v.length())).acos().to_degrees()
    };
    [
      angle(self.a, self.b, self.c),
      angle(self.b, self.c, self.a),
      angle(self.c, self.a, self.b),
    ].iter().all(|&deg| deg > Self::MIN_DEGREES)
  }
}

impl Primitive for Triangle {
  fn rasterize(&self, bounds: Bounds) -> Vec<Scanline> {
    fill_convex(&[self.a.to_f64(), self.b.to_f64(), self.c.to_f64()], bounds)
  }

  #[cfg(feature = "drawing")]
  fn render(&self, canvas: &mut Canvas) {
    canvas.move_to(self.a.to_f64());
    canvas.line_to(self.b.to_f64());
    canvas.line_to(self.c.to_f64());
    canvas.close_path();
  }

  fn svg(&self, attrs: &str) -> String {
    format!(
      "<polygon {} points=\"{},{} {},{} {},{}\" />",
      attrs, self.a.x, self.a.y, self.b.x, self.b.y, self.c.x, self.c.y
    )
  }

  fn mutate<R: Rng>(&self, bounds: Bounds, rng: &mut R) -> Self {
    let (w, h) = (bounds.width as i32, bounds.height as i32);
    let m = Self::MARGIN;
    let mut t = *self;
    loop {
      let vertex = match rng.gen_range(0..3) {
        0 => &mut t.a,
        1 => &mut t.b,
        _ => &mut t.c,
      };
      vertex.x = clamp(jitter(vertex.x, 16.0, rng), -m, w - 1 + m);
      vertex.y = clamp(jitter(vertex.y, 16.0, rng), -m, h - 1 + m);
      if t.is_valid() {
        return t;
      }
    }
  }
}

/// Axis-aligned rectangle between two inclusive corners, in any order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rectangle {
  pub p1: P2<i32>,
  pub p2: P2<i32>,
}

impl Rectangle {
  pub fn random<R: Rng>(bounds: Bounds, rng: &mut R) -> Self {
    let (w, h) = (bounds.width as i32, bounds.height as i32);
    let p1 = random_point(bounds, rng);
    let p2 = P2::new(
      clamp(p1.x + rng.gen_range(1..=32), 0, w - 1),
      clamp(p1.y + rng.gen_range(1..=32), 0, h - 1)
    );
    Rectangle { p1, p2 }
  }

  /// `(top-left, bottom-right)`, both inclusive.
  pub fn corners(&self) -> (P2<i32>, P2<i32>) {
    (self.p1.min(self.p2), self.p1.max(self.p2))
  }
}

impl Primitive for Rectangle {
  fn rasterize(&self, bounds: Bounds) -> Vec<Scanline> {
    let (min, max) = self.corners();
    (min.y..=max.y)
      .filter_map(|y| Scanline::clipped(y as i64, min.x as i64, max.x as i64, bounds))
      .collect()
  }

  #[cfg(feature = "drawing")]
  fn render(&self, canvas: &mut Canvas) {
    let (min, max) = self.corners();
    canvas.rectangle(min.to_f64(), (max - min).to_f64() + V2::splat(1.0));
  }

  fn svg(&self, attrs: &str) -> String {
    let (min, max) = self.corners();
    format!(
      "<rect {} x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" />",
      attrs, min.x, min.y, max.x - min.x + 1, max.y - min.y + 1
    )
  }

  fn mutate<R: Rng>(&self, bounds: Bounds, rng: &mut R) -> Self {
    let (w, h) = (bounds.width as i32, bounds.height as i32);
    let mut r = *self;
    let corner = if rng.gen_bool(0.5) { &mut r.p1 } else { &mut r.p2 };
    corner.x = clamp(jitter(corner.x, 16.0, rng), 0, w - 1);
    corner.y = clamp(jitter(corner.y, 16.0, rng), 0, h - 1);
    r
  }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ellipse {
  pub center: P2<i32>,
  pub rx: i32,
  pub ry: i32,
}

impl Ellipse {
  pub fn random<R: Rng>(bounds: Bounds, rng: &mut R) -> Self {
    Ellipse {
      center: random_point(bounds, rng),
      rx: rng.gen_range(1..=32),
      ry: rng.gen_range(1..=32),
    }
  }
}

impl Primitive for Ellipse {
  fn rasterize(&self, bounds: Bounds) -> Vec<Scanline> {
    fill_ellipse(self.center, self.rx, self.ry, bounds)
  }

  #[cfg(feature = "drawing")]
  fn render(&self, canvas: &mut Canvas) {
    canvas.ellipse(self.center.to_f64(), V2::new(self.rx, self.ry).to_f64());
  }

  fn svg(&self, attrs: &str) -> String {
    format!(
      "<ellipse {} cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" />",
      attrs, self.center.x, self.center.y, self.rx, self.ry
    )
  }

  fn mutate<R: Rng>(&self, bounds: Bounds, rng: &mut R) -> Self {
    let (w, h) = (bounds.width as i32, bounds.height as i32);
    let mut e = *self;
    match rng.gen_range(0..3) {
      0 => {
        e.center.x = clamp(jitter(e.center.x, 16.0, rng), 0, w - 1);
        e.center.y = clamp(jitter(e.center.y, 16.0, rng), 0, h - 1);
      },
      1 => e.rx = clamp(jitter(e.rx, 16.0, rng), 1, w - 1),
      _ => e.ry = clamp(jitter(e.ry, 16.0, rng), 1, h - 1),
    }
    e
  }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
  pub center: P2<i32>,
  pub radius: i32,
}

impl Circle {
  pub fn random<R: Rng>(bounds: Bounds, rng: &mut R) -> Self {
    Circle {
      center: random_point(bounds, rng),
      radius: rng.gen_range(1..=32),
    }
  }
}

impl Primitive for Circle {
  fn rasterize(&self, bounds: Bounds) -> Vec<Scanline> {
    fill_ellipse(self.center, self.radius, self.radius, bounds)
  }

  #[cfg(feature = "drawing")]
  fn render(&self, canvas: &mut Canvas) {
    canvas.ellipse(self.center.to_f64(), V2::splat(self.radius as f64));
  }

  fn svg(&self, attrs: &str) -> String {
    format!(
      "<circle {} cx=\"{}\" cy=\"{}\" r=\"{}\" />",
      attrs, self.center.x, self.center.y, self.radius
    )
  }

  fn mutate<R: Rng>(&self, bounds: Bounds, rng: &mut R) -> Self {
    let (w, h) = (bounds.width as i32, bounds.height as i32);
    let mut c = *self;
    if rng.gen_bool(0.5) {
      c.center.x = clamp(jitter(c.center.x, 16.0, rng), 0, w - 1);
      c.center.y = clamp(jitter(c.center.y, 16.0, rng), 0, h - 1);
    } else {
      c.radius = clamp(jitter(c.radius, 16.0, rng), 1, w.max(h) - 1);
    }
    c
  }
}

/// Rectangle of `size` centered on `center`, rotated by `angle` degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RotatedRectangle {
  pub center: P2<i32>,
  pub size: Size2D<i32, PixelSpace>,
  pub angle: i32,
}

impl RotatedRectangle {
  /// Longest side over shortest side.
  pub const MAX_ASPECT: f64 = 5.0;

  pub fn random<R: Rng>(bounds: Bounds, rng: &mut R) -> Self {
    RotatedRectangle {
      center: random_point(bounds, rng),
      size: Size2D::new(rng.gen_range(1..=32), rng.gen_range(1..=32)),
      angle: rng.gen_range(0..360),
    }.mutate(bounds, rng)
  }

  pub fn is_valid(&self) -> bool {
    let (a, b) = (self.size.width.max(1) as f64, self.size.height.max(1) as f64);
    a.max(b) / a.min(b) <= Self::MAX_ASPECT
  }

  /// Corners in drawing order.
  pub fn corners(&self) -> [P2<f64>; 4] {
    let rotation = Rotation2D::<f64, PixelSpace, PixelSpace>::new(Angle::degrees(self.angle as f64));
    let half = self.size.to_f64().to_vector() / 2.0;
    let center = self.center.to_f64();
    [
      V2::new(-half.x, -half.y),
      V2::new(half.x, -half.y),
      V2::new(half.x, half.y),
      V2::new(-half.x, half.y),
    ].map(|corner| center + rotation.transform_vector(corner))
  }
}

impl Primitive for RotatedRectangle {
  fn rasterize(&self, bounds: Bounds) -> Vec<Scanline> {
    fill_convex(&self.corners(), bounds)
  }

  #[cfg(feature = "drawing")]
  fn render(&self, canvas: &mut Canvas) {
    let [p0, p1, p2, p3] = self.corners();
    canvas.move_to(p0);
    canvas.line_to(p1);
    canvas.line_to(p2);
    canvas.line_to(p3);
    canvas.close_path();
  }

  fn svg(&self, attrs: &str) -> String {
    format!(
      "<g transform=\"translate({} {}) rotate({}) scale({} {})\"><rect {} x=\"-0.5\" y=\"-0.5\" width=\"1\" height=\"1\" /></g>",
      self.center.x, self.center.y, self.angle, self.size.width, self.size.height, attrs
    )
  }

  fn mutate<R: Rng>(&self, bounds: Bounds, rng: &mut R) -> Self {
    let (w, h) = (bounds.width as i32, bounds.height as i32);
    let mut r = *self;
    loop {
      match rng.gen_range(0..3) {
        0 => {
          r.center.x = clamp(jitter(r.center.x, 16.0, rng), 0, w - 1);
          r.center.y = clamp(jitter(r.center.y, 16.0, rng), 0, h - 1);
        },
        1 => {
          r.size.width = clamp(jitter(r.size.width, 16.0, rng), 1, w - 1);
          r.size.height = clamp(jitter(r.size.height, 16.0, rng), 1, h - 1);
        },
        _ => r.angle = jitter(r.angle, 32.0, rng),
      }
      if r.is_valid() {
        return r;
      }
    }
  }
}
