//! Geometric primitives, and their rasterization into scanlines.
//!
//! The origin of coordinate system is in top-left corner. All shapes are represented in the
//! pixel space of the target image, with integer parameters; the drawing context applies the
//! scale to the output resolution.

use {
  crate::raster::Scanline,
  euclid::{Point2D, Size2D},
  itertools::{Itertools, MinMaxResult},
  rand::Rng,
  rand_distr::StandardNormal
};
#[cfg(feature = "drawing")]
use crate::drawing::Canvas;

pub mod shapes;
pub use shapes::*;

/// Pixel coordinate basis
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelSpace;

pub type P2<T> = Point2D<T, PixelSpace>;
pub type Bounds = Size2D<u32, PixelSpace>;

/// The capability every primitive kind implements.
pub trait Primitive: Sized {
  /// Pixels covered by the shape, clipped to `bounds`, at most one span per row.
  fn rasterize(&self, bounds: Bounds) -> Vec<Scanline>;
  /// Append the filled outline of the shape to the current path of `canvas`.
  /// The caller selects the color before, and fills after.
  #[cfg(feature = "drawing")]
  #[cfg_attr(docsrs, doc(cfg(feature = "drawing")))]
  fn render(&self, canvas: &mut Canvas);
  /// SVG element for the shape. `attrs` are pre-formatted fill attributes.
  fn svg(&self, attrs: &str) -> String;
  /// A perturbed copy of the shape. The receiver is left untouched.
  fn mutate<R: Rng>(&self, bounds: Bounds, rng: &mut R) -> Self;
}

/// Selector for random shape generation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ShapeKind {
  /// Uniformly random concrete kind, drawn separately for every shape.
  #[default]
  Any,
  Triangle,
  Rectangle,
  Ellipse,
  Circle,
  RotatedRectangle,
}

impl ShapeKind {
  pub const CONCRETE: [ShapeKind; 5] = [
    ShapeKind::Triangle,
    ShapeKind::Rectangle,
    ShapeKind::Ellipse,
    ShapeKind::Circle,
    ShapeKind::RotatedRectangle,
  ];

  pub fn random<R: Rng>(self, bounds: Bounds, rng: &mut R) -> Shape {
    match self {
      ShapeKind::Any => {
        let kind = Self::CONCRETE[rng.gen_range(0..Self::CONCRETE.len())];
        kind.random(bounds, rng)
      },
      ShapeKind::Triangle => Shape::Triangle(Triangle::random(bounds, rng)),
      ShapeKind::Rectangle => Shape::Rectangle(Rectangle::random(bounds, rng)),
      ShapeKind::Ellipse => Shape::Ellipse(Ellipse::random(bounds, rng)),
      ShapeKind::Circle => Shape::Circle(Circle::random(bounds, rng)),
      ShapeKind::RotatedRectangle => Shape::RotatedRectangle(RotatedRectangle::random(bounds, rng)),
    }
  }
}

/// Any of the supported primitives.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
  Triangle(Triangle),
  Rectangle(Rectangle),
  Ellipse(Ellipse),
  Circle(Circle),
  RotatedRectangle(RotatedRectangle),
}

impl Shape {
  pub fn kind(&self) -> ShapeKind {
    match self {
      Shape::Triangle(_) => ShapeKind::Triangle,
      Shape::Rectangle(_) => ShapeKind::Rectangle,
      Shape::Ellipse(_) => ShapeKind::Ellipse,
      Shape::Circle(_) => ShapeKind::Circle,
      Shape::RotatedRectangle(_) => ShapeKind::RotatedRectangle,
    }
  }
}

macro_rules! dispatch {
  ($value: expr, $s: ident => $e: expr) => {
    match $value {
      Shape::Triangle($s) => $e,
      Shape::Rectangle($s) => $e,
      Shape::Ellipse($s) => $e,
      Shape::Circle($s) => $e,
      Shape::RotatedRectangle($s) => $e,
    }
  }
}

impl Primitive for Shape {
  fn rasterize(&self, bounds: Bounds) -> Vec<Scanline> {
    dispatch!(self, s => s.rasterize(bounds))
  }

  #[cfg(feature = "drawing")]
  fn render(&self, canvas: &mut Canvas) {
    dispatch!(self, s => s.render(canvas))
  }

  fn svg(&self, attrs: &str) -> String {
    dispatch!(self, s => s.svg(attrs))
  }

  fn mutate<R: Rng>(&self, bounds: Bounds, rng: &mut R) -> Self {
    match self {
      Shape::Triangle(s) => Shape::Triangle(s.mutate(bounds, rng)),
      Shape::Rectangle(s) => Shape::Rectangle(s.mutate(bounds, rng)),
      Shape::Ellipse(s) => Shape::Ellipse(s.mutate(bounds, rng)),
      Shape::Circle(s) => Shape::Circle(s.mutate(bounds, rng)),
      Shape::RotatedRectangle(s) => Shape::RotatedRectangle(s.mutate(bounds, rng)),
    }
  }
}

/// Standard normal sample, used as the mutation step.
pub(crate) fn normal<R: Rng>(rng: &mut R) -> f64 {
  rng.sample(StandardNormal)
}

/// Scanlines of a convex polygon. Rows are sampled at integer `y`, and every row yields a
/// single span between the outermost edge crossings.
pub fn fill_convex(points: &[P2<f64>], bounds: Bounds) -> Vec<Scanline> {
  let (min_y, max_y) = match points.iter().map(|p| p.y).minmax() {
    MinMaxResult::NoElements => return vec![],
    MinMaxResult::OneElement(y) => (y, y),
    MinMaxResult::MinMax(a, b) => (a, b),
  };
  let y0 = (min_y.ceil() as i64).max(0);
  let y1 = (max_y.floor() as i64).min(bounds.height as i64 - 1);

  (y0..=y1).filter_map(|y| {
    let yf = y as f64;
    let crossings = points.iter()
      .zip(points.iter().cycle().skip(1))
      .flat_map(|(p, q)| {
        if p.y == q.y {
          if p.y == yf { vec![p.x, q.x] } else { vec![] }
        } else if (p.y.min(q.y)..=p.y.max(q.y)).contains(&yf) {
          vec![p.x + (yf - p.y) * (q.x - p.x) / (q.y - p.y)]
        } else {
          vec![]
        }
      })
      .minmax();
    let (x1, x2) = match crossings {
      MinMaxResult::NoElements => return None,
      MinMaxResult::OneElement(x) => (x, x),
      MinMaxResult::MinMax(a, b) => (a, b),
    };
    Scanline::clipped(y, x1.round() as i64, x2.round() as i64, bounds)
  }).collect()
}

/// Scanlines of an axis-aligned ellipse with integer center and radii.
pub fn fill_ellipse(center: P2<i32>, rx: i32, ry: i32, bounds: Bounds) -> Vec<Scanline> {
  let (rx, ry) = (rx.max(1) as i64, ry.max(1) as i64);
  let aspect = rx as f64 / ry as f64;
  let (cx, cy) = (center.x as i64, center.y as i64);

  (-ry..=ry).filter_map(|dy| {
    let half = (((ry * ry - dy * dy) as f64).sqrt() * aspect) as i64;
    Scanline::clipped(cy + dy, cx - half, cx + half, bounds)
  }).collect()
}

/// `v.clamp(lo, hi)` that tolerates `hi < lo` on tiny canvases by collapsing to `lo`.
pub(crate) fn clamp(v: i32, lo: i32, hi: i32) -> i32 {
  v.min(hi).max(lo)
}
