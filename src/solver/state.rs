use {
  super::{Annealable, compute_color, difference_partial},
  crate::{
    geometry::{Bounds, Primitive, Shape, ShapeKind},
    model::Model,
    raster::{copy_lines, draw_lines}
  },
  image::{Rgba, RgbaImage},
  rand::{RngCore, SeedableRng},
  rand_pcg::Pcg64,
  std::cell::OnceCell
};

/// A shape with an opacity, bound to the current canvas of a [`Model`] through a [`Worker`].
///
/// Color and energy are computed on first request and never again: a mutation produces a
/// new `State`.
#[derive(Debug, Clone)]
pub struct State {
  pub shape: Shape,
  pub alpha: u8,
  color: OnceCell<Rgba<u8>>,
  energy: OnceCell<f64>,
}

impl State {
  pub fn new(shape: Shape, alpha: u8) -> Self {
    Self { shape, alpha, color: OnceCell::new(), energy: OnceCell::new() }
  }

  /// Solved color, if the state has been evaluated.
  pub fn color(&self) -> Option<Rgba<u8>> {
    self.color.get().copied()
  }

  /// Energy, if the state has been evaluated.
  pub fn cached_energy(&self) -> Option<f64> {
    self.energy.get().copied()
  }
}

impl<'a> Annealable<Worker<'a>> for State {
  fn energy(&self, worker: &mut Worker<'a>) -> f64 {
    *self.energy.get_or_init(|| {
      let (color, energy) = worker.evaluate(&self.shape, self.alpha);
      let _ = self.color.set(color);
      energy
    })
  }

  fn mutate(&self, worker: &mut Worker<'a>) -> Self {
    let bounds = worker.bounds();
    State::new(self.shape.mutate(bounds, worker), self.alpha)
  }
}

/// Evaluation context of one search: a private scratch copy of the model's canvas, and a
/// private random generator. Workers share nothing mutable, so independent searches can run
/// on separate threads.
pub struct Worker<'a> {
  model: &'a Model,
  scratch: RgbaImage,
  rng: Pcg64,
  evaluations: usize,
}

impl<'a> Worker<'a> {
  pub fn new(model: &'a Model, seed: u64) -> Self {
    Self {
      model,
      scratch: model.current().clone(),
      rng: Pcg64::seed_from_u64(seed),
      evaluations: 0,
    }
  }

  pub fn bounds(&self) -> Bounds {
    self.model.bounds()
  }

  /// Number of shapes rasterized and scored so far.
  pub fn evaluations(&self) -> usize {
    self.evaluations
  }

  /// Unevaluated state with a random shape of `kind`, at the model's configured alpha.
  pub fn random_state(&mut self, kind: ShapeKind) -> State {
    let shape = kind.random(self.bounds(), self);
    State::new(shape, self.model.config().alpha)
  }

  /// Solve the color of `shape` and score the canvas with it composited on top.
  ///
  /// The shape is drawn onto the scratch buffer, scored against the model's current canvas,
  /// and the touched pixels are restored afterwards. Shapes with an empty footprint score
  /// `f64::INFINITY`.
  pub fn evaluate(&mut self, shape: &Shape, alpha: u8) -> (Rgba<u8>, f64) {
    self.evaluations += 1;
    let model = self.model;
    let lines = shape.rasterize(self.bounds());
    let color = compute_color(model.target(), model.current(), &lines, alpha);
    if lines.is_empty() {
      return (color, f64::INFINITY);
    }

    draw_lines(&mut self.scratch, color, &lines);
    let energy = difference_partial(model.target(), model.current(), &self.scratch, model.score(), &lines);
    copy_lines(&mut self.scratch, model.current(), &lines);
    (color, energy)
  }
}

impl RngCore for Worker<'_> {
  fn next_u32(&mut self) -> u32 {
    self.rng.next_u32()
  }

  fn next_u64(&mut self) -> u64 {
    self.rng.next_u64()
  }

  fn fill_bytes(&mut self, dest: &mut [u8]) {
    self.rng.fill_bytes(dest)
  }

  fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
    self.rng.try_fill_bytes(dest)
  }
}
