//! The orchestrator: owns the canvases and the accepted shapes, and drives the search.

use {
  crate::{
    geometry::{Bounds, PixelSpace, Primitive, Shape, ShapeKind},
    raster::{self, draw_lines},
    solver::{
      Annealable, State, Worker,
      anneal, best_hill_climb_state, best_random_state, compute_color,
      difference_full, difference_partial, hill_climb
    },
    util
  },
  anyhow::{Result, ensure},
  euclid::Size2D,
  image::{Rgba, RgbaImage},
  rand::{Rng, SeedableRng},
  rand_pcg::Pcg64
};
#[cfg(feature = "drawing")]
use crate::drawing::Canvas;

#[cfg(test)] mod tests;

/// How [`Model::step`] searches for the next shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Strategy {
  /// [`best_hill_climb_state`], then one more long [`hill_climb`].
  HillClimb,
  /// [`best_random_state`] over `samples` shapes, then [`anneal`].
  Anneal {
    samples: usize,
    max_temp: f64,
    min_temp: f64,
    steps: usize,
  },
}

impl Strategy {
  pub fn default_anneal() -> Self {
    Strategy::Anneal {
      samples: 1000,
      max_temp: 0.1,
      min_temp: 0.00001,
      steps: 25000,
    }
  }
}

#[derive(Debug, Copy, Clone)]
pub struct Config {
  /// Longer side of the output, in pixels. Used by [`Model::svg`] and the drawing context.
  pub size: u32,
  pub kind: ShapeKind,
  /// Opacity of every shape.
  pub alpha: u8,
  pub seed: u64,
  /// Random shapes drawn per restart.
  pub random_samples: usize,
  /// Hill climbing iterations per restart.
  pub hill_climb_age: usize,
  pub restarts: usize,
  /// Hill climbing iterations on the winner of all restarts.
  pub refine_iterations: usize,
  pub strategy: Strategy,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      size: 1024,
      kind: ShapeKind::Any,
      alpha: 128,
      seed: 0,
      random_samples: 100,
      hill_climb_age: 100,
      restarts: 10,
      refine_iterations: 1000,
      strategy: Strategy::HillClimb,
    }}}

/// A committed shape.
#[derive(Debug, Clone)]
pub struct Record {
  pub shape: Shape,
  pub alpha: u8,
  pub color: Rgba<u8>,
  /// Score of the canvas right after this shape was added.
  pub score: f64,
  pub svg: String,
}

pub struct Model {
  background: Rgba<u8>,
  target: RgbaImage,
  current: RgbaImage,
  buffer: RgbaImage,
  initial_score: f64,
  score: f64,
  config: Config,
  history: Vec<Record>,
  rng: Pcg64,
  #[cfg(feature = "drawing")]
  canvas: Canvas,
}

impl Model {
  /// Start from a canvas filled with `background`.
  pub fn new(target: RgbaImage, background: Rgba<u8>, config: Config) -> Result<Self> {
    let (w, h) = target.dimensions();
    ensure!(w > 0 && h > 0, "target image is empty: {}x{}", w, h);
    ensure!(config.size > 0, "output size must be positive");

    let current = raster::uniform(Size2D::new(w, h), background);
    let score = difference_full(&target, &current);
    #[cfg(feature = "drawing")]
    let canvas = {
      let (size, scale) = util::fit_size(Size2D::new(w, h), config.size);
      Canvas::new(size, scale, background)?
    };

    Ok(Self {
      background,
      buffer: current.clone(),
      current,
      target,
      initial_score: score,
      score,
      config,
      history: vec![],
      rng: Pcg64::seed_from_u64(config.seed),
      #[cfg(feature = "drawing")]
      canvas,
    })
  }

  pub fn width(&self) -> u32 { self.target.width() }
  pub fn height(&self) -> u32 { self.target.height() }
  pub fn bounds(&self) -> Bounds { Size2D::new(self.width(), self.height()) }
  pub fn background(&self) -> Rgba<u8> { self.background }
  pub fn target(&self) -> &RgbaImage { &self.target }
  /// The canvas with every accepted shape composited, at the target resolution.
  pub fn current(&self) -> &RgbaImage { &self.current }
  pub fn score(&self) -> f64 { self.score }
  pub fn config(&self) -> &Config { &self.config }
  pub fn history(&self) -> &[Record] { &self.history }

  /// Output size and the scale from target to output coordinates.
  pub fn size_and_scale(&self) -> (Size2D<u32, PixelSpace>, f64) {
    util::fit_size(self.bounds(), self.config.size)
  }

  /// Search for one shape and commit it. Returns the new score.
  ///
  /// Nothing is committed if the search yields no shape with a finite energy, or if the best
  /// shape found would raise the score.
  pub fn step(&mut self) -> f64 {
    let seed = self.rng.gen::<u64>();
    let score = self.score;
    let state = self.search(seed)
      .filter(|state| state.cached_energy().map_or(false, |e| e.is_finite() && e <= score));

    match state {
      Some(state) => {
        let score = self.add(state.shape, state.alpha);
        log::info!("shape {}: {:?}, score {:.6}", self.history.len(), state.shape.kind(), score);
        score
      },
      None => {
        log::warn!("no viable shape found, score stays at {:.6}", self.score);
        self.score
      }
    }
  }

  fn search(&self, seed: u64) -> Option<State> {
    let Config { kind, random_samples, hill_climb_age, restarts, refine_iterations, .. } = self.config;
    let mut seeds = Pcg64::seed_from_u64(seed);
    let mut worker = Worker::new(self, seeds.gen());

    match self.config.strategy {
      Strategy::HillClimb => {
        let state = best_hill_climb_state(
          self, kind, random_samples, hill_climb_age, restarts, seeds.gen()
        )?;
        Some(hill_climb(state, &mut worker, refine_iterations))
      },
      Strategy::Anneal { samples, max_temp, min_temp, steps } => {
        let state = best_random_state(&mut worker, kind, samples)?;
        let state = anneal(state, &mut worker, max_temp, min_temp, steps);
        state.energy(&mut worker);
        Some(state)
      }
    }
  }

  /// Composite `shape` with the optimal color at `alpha` onto the canvas, and record it.
  /// Returns the new score.
  pub fn add(&mut self, shape: Shape, alpha: u8) -> f64 {
    let lines = shape.rasterize(self.bounds());
    let color = compute_color(&self.target, &self.current, &lines, alpha);

    self.buffer.copy_from_slice(&self.current);
    draw_lines(&mut self.buffer, color, &lines);
    let score = difference_partial(&self.target, &self.current, &self.buffer, self.score, &lines);
    draw_lines(&mut self.current, color, &lines);

    let svg = shape.svg(&util::svg_fill(color));
    self.score = score;
    self.history.push(Record { shape, alpha, color, score, svg });

    #[cfg(feature = "drawing")]
    {
      self.canvas.set_color(color);
      shape.render(&mut self.canvas);
      self.canvas.fill();
    }
    score
  }

  /// Replay the history onto a fresh canvas at the output resolution.
  ///
  /// The first frame is the bare background. Another frame is taken after every shape which
  /// brings the score down by at least `score_delta` since the previous frame.
  #[cfg(feature = "drawing")]
  #[cfg_attr(docsrs, doc(cfg(feature = "drawing")))]
  pub fn frames(&self, score_delta: f64) -> Result<Vec<RgbaImage>> {
    let (size, scale) = self.size_and_scale();
    let mut canvas = Canvas::new(size, scale, self.background)?;
    let mut frames = vec![canvas.image()];
    let mut previous = self.initial_score;

    for record in &self.history {
      canvas.set_color(record.color);
      record.shape.render(&mut canvas);
      canvas.fill();
      if previous - record.score >= score_delta {
        previous = record.score;
        frames.push(canvas.image());
      }
    }
    Ok(frames)
  }

  /// The live drawing at the output resolution.
  #[cfg(feature = "drawing")]
  #[cfg_attr(docsrs, doc(cfg(feature = "drawing")))]
  pub fn render(&self) -> RgbaImage {
    self.canvas.image()
  }

  /// SVG document of the background and every accepted shape, at the output resolution.
  pub fn svg(&self) -> String {
    let (size, scale) = self.size_and_scale();
    let Rgba([r, g, b, _]) = self.background;
    let mut lines = vec![
      format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{}\" height=\"{}\">",
        size.width, size.height
      ),
      format!(
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#{:02x}{:02x}{:02x}\" />",
        size.width, size.height, r, g, b
      ),
      format!("<g transform=\"scale({:.6}) translate(0.5 0.5)\">", scale),
    ];
    lines.extend(self.history.iter().map(|record| record.svg.clone()));
    lines.push("</g>".into());
    lines.push("</svg>".into());
    lines.join("\n")
  }
}
