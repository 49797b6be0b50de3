//! Vector drawing context, backed by `tiny-skia`.
//!
//! Shapes append their outline to the current path with [`Primitive::render`](crate::geometry::Primitive::render),
//! then [`Canvas::fill`] rasterizes it with the selected color, anti-aliased, at the output
//! resolution. The order `set_color` -> `render` -> `fill` matters.

use {
  crate::geometry::{P2, PixelSpace},
  anyhow::{Result, anyhow},
  euclid::{Size2D, Vector2D as V2},
  image::{Rgba, RgbaImage},
  tiny_skia as sk
};


pub struct Canvas {
  pixmap: sk::Pixmap,
  transform: sk::Transform,
  paint: sk::Paint<'static>,
  path: sk::PathBuilder,
}

impl Canvas {
  /// A canvas of `size` pixels, cleared to `background`. Shape coordinates are scaled by
  /// `scale` and shifted by half a pixel, so that integer coordinates address pixel centers.
  pub fn new(size: Size2D<u32, PixelSpace>, scale: f64, background: Rgba<u8>) -> Result<Self> {
    let mut pixmap = sk::Pixmap::new(size.width, size.height)
      .ok_or_else(|| anyhow!("invalid canvas size: {}x{}", size.width, size.height))?;
    let Rgba([r, g, b, a]) = background;
    pixmap.fill(sk::Color::from_rgba8(r, g, b, a));

    let mut paint = sk::Paint::default();
    paint.anti_alias = true;

    Ok(Self {
      pixmap,
      transform: sk::Transform::from_scale(scale as f32, scale as f32).pre_translate(0.5, 0.5),
      paint,
      path: sk::PathBuilder::new(),
    })
  }

  pub fn size(&self) -> Size2D<u32, PixelSpace> {
    Size2D::new(self.pixmap.width(), self.pixmap.height())
  }

  pub fn set_color(&mut self, color: Rgba<u8>) {
    let Rgba([r, g, b, a]) = color;
    self.paint.set_color_rgba8(r, g, b, a);
  }

  pub fn move_to(&mut self, p: P2<f64>) {
    self.path.move_to(p.x as f32, p.y as f32);
  }

  pub fn line_to(&mut self, p: P2<f64>) {
    self.path.line_to(p.x as f32, p.y as f32);
  }

  pub fn close_path(&mut self) {
    self.path.close();
  }

  pub fn rectangle(&mut self, origin: P2<f64>, size: V2<f64, PixelSpace>) {
    if let Some(rect) = sk::Rect::from_xywh(origin.x as f32, origin.y as f32, size.x as f32, size.y as f32) {
      self.path.push_rect(rect);
    }
  }

  pub fn ellipse(&mut self, center: P2<f64>, radii: V2<f64, PixelSpace>) {
    let min = center - radii;
    if let Some(rect) = sk::Rect::from_xywh(
      min.x as f32, min.y as f32,
      2.0 * radii.x as f32, 2.0 * radii.y as f32
    ) {
      self.path.push_oval(rect);
    }
  }

  /// Fill the current path with the selected color, and start a new one.
  pub fn fill(&mut self) {
    let path = std::mem::replace(&mut self.path, sk::PathBuilder::new());
    if let Some(path) = path.finish() {
      self.pixmap.fill_path(&path, &self.paint, sk::FillRule::Winding, self.transform, None);
    }
  }

  /// Snapshot of the canvas, un-premultiplied.
  pub fn image(&self) -> RgbaImage {
    let mut image = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
    image.pixels_mut()
      .zip(self.pixmap.pixels())
      .for_each(|(dst, src)| {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
      });
    image
  }
}
