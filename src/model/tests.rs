use {
  super::*,
  crate::geometry::{P2, Rectangle},
  euclid::Size2D,
  regex::Regex
};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

fn quick() -> Config {
  Config {
    size: 64,
    random_samples: 20,
    hill_climb_age: 20,
    restarts: 2,
    refine_iterations: 50,
    ..Config::default()
  }
}

fn gradient(w: u32, h: u32) -> RgbaImage {
  RgbaImage::from_fn(w, h, |x, y| Rgba([
    (x * 255 / w) as u8,
    (y * 255 / h) as u8,
    128,
    255
  ]))
}

/// Three vertical bands: red, green, blue.
fn bands() -> RgbaImage {
  RgbaImage::from_fn(6, 2, |x, _| match x / 2 {
    0 => RED,
    1 => Rgba([0, 255, 0, 255]),
    _ => Rgba([0, 0, 255, 255]),
  })
}

fn band(i: i32) -> Shape {
  Shape::Rectangle(Rectangle { p1: P2::new(2 * i, 0), p2: P2::new(2 * i + 1, 1) })
}

#[test_log::test] fn empty_target_fails() {
  assert!(Model::new(RgbaImage::new(0, 0), WHITE, Config::default()).is_err());
  assert!(Model::new(RgbaImage::new(4, 0), WHITE, Config::default()).is_err());
}

#[test_log::test] fn initial_state() -> Result<()> {
  let model = Model::new(uniform_red(3, 2), WHITE, quick())?;
  assert_eq!((model.width(), model.height()), (3, 2));
  assert_eq!(model.background(), WHITE);
  assert!(model.current().pixels().all(|p| *p == WHITE));
  assert!(model.history().is_empty());
  assert!((model.score() - difference_full(model.target(), model.current())).abs() < 1e-12);
  Ok(())
}

fn uniform_red(w: u32, h: u32) -> RgbaImage {
  raster::uniform(Size2D::new(w, h), RED)
}

#[test_log::test] fn extreme_aspect_target() -> Result<()> {
  let mut model = Model::new(uniform_red(300, 1), WHITE, Config { size: 100, ..quick() })?;
  let (size, _) = model.size_and_scale();
  assert_eq!((size.width, size.height), (100, 1));
  model.add(Shape::Rectangle(Rectangle { p1: P2::new(0, 0), p2: P2::new(299, 0) }), 255);
  assert!(model.svg().contains("width=\"100\" height=\"1\""));
  #[cfg(feature = "drawing")]
  {
    assert_eq!(model.render().dimensions(), (100, 1));
    assert_eq!(model.frames(0.0)?.len(), 2);
  }
  Ok(())
}

#[test_log::test] fn full_rectangle_paints_red() -> Result<()> {
  let mut model = Model::new(uniform_red(2, 2), WHITE, quick())?;
  let score = model.add(Shape::Rectangle(Rectangle { p1: P2::new(0, 0), p2: P2::new(1, 1) }), 255);
  assert!(score < 1e-6, "{}", score);
  assert!(model.current().pixels().all(|p| *p == RED));

  let record = &model.history()[0];
  assert_eq!(record.color, RED);
  assert_eq!(record.svg, "<rect fill=\"#ff0000\" fill-opacity=\"1.000000\" x=\"0\" y=\"0\" width=\"2\" height=\"2\" />");
  Ok(())
}

#[test_log::test] fn step_paints_red() -> Result<()> {
  let mut model = Model::new(uniform_red(2, 2), WHITE, Config {
    alpha: 255,
    kind: ShapeKind::Rectangle,
    ..quick()
  })?;
  let before = model.score();
  let score = model.step();
  assert!(score < before);
  assert!(score < 1e-6, "{}", score);
  assert!(model.current().pixels().all(|p| *p == RED));
  assert_eq!(model.history().len(), 1);
  Ok(())
}

#[test_log::test] fn score_is_monotonic() -> Result<()> {
  let mut model = Model::new(gradient(40, 30), Rgba([0, 0, 0, 255]), Config { seed: 5, ..quick() })?;
  let mut previous = model.score();
  for _ in 0..8 {
    let score = model.step();
    assert!(score <= previous, "{} > {}", score, previous);
    assert_eq!(score, model.score());
    previous = score;
  }
  assert!(!model.history().is_empty());
  assert!((model.score() - difference_full(model.target(), model.current())).abs() < 1e-9);
  Ok(())
}

#[test_log::test] fn current_is_replay_of_history() -> Result<()> {
  let background = Rgba([20, 40, 60, 255]);
  let mut model = Model::new(gradient(32, 32), background, Config { seed: 9, ..quick() })?;
  (0..5).for_each(|_| { model.step(); });

  let mut replay = raster::uniform(model.bounds(), background);
  for record in model.history() {
    draw_lines(&mut replay, record.color, &record.shape.rasterize(model.bounds()));
  }
  assert!(replay == *model.current());
  Ok(())
}

#[test_log::test] fn seeded_runs_agree() -> Result<()> {
  let run = || -> Result<Vec<Shape>> {
    let mut model = Model::new(gradient(24, 24), WHITE, Config { seed: 3, ..quick() })?;
    (0..3).for_each(|_| { model.step(); });
    Ok(model.history().iter().map(|r| r.shape).collect())
  };
  assert_eq!(run()?, run()?);
  Ok(())
}

#[test_log::test] fn anneal_strategy() -> Result<()> {
  let mut model = Model::new(gradient(24, 16), WHITE, Config {
    strategy: Strategy::Anneal { samples: 50, max_temp: 0.1, min_temp: 0.0001, steps: 300 },
    ..quick()
  })?;
  let before = model.score();
  model.step();
  model.step();
  assert!(model.score() <= before);
  assert_eq!(
    Strategy::default_anneal(),
    Strategy::Anneal { samples: 1000, max_temp: 0.1, min_temp: 0.00001, steps: 25000 }
  );
  Ok(())
}

#[cfg(feature = "drawing")]
#[test_log::test] fn frames_per_shape() -> Result<()> {
  let mut model = Model::new(bands(), WHITE, Config { size: 12, ..quick() })?;
  let mut previous = model.score();
  for i in 0..3 {
    let score = model.add(band(i), 255);
    assert!(score < previous);
    previous = score;
  }

  let frames = model.frames(0.0)?;
  assert_eq!(frames.len(), 4);
  assert!(frames.iter().all(|f| f.dimensions() == (12, 4)));
  assert!(frames[0].pixels().all(|p| *p == WHITE));
  // every band is 4x4 output pixels
  assert_eq!(*frames[1].get_pixel(1, 1), RED);
  assert_eq!(*frames[1].get_pixel(9, 1), WHITE);
  assert_eq!(*frames[3].get_pixel(9, 1), Rgba([0, 0, 255, 255]));

  // the total improvement is only reached by the last shape
  let initial = difference_full(model.target(), &raster::uniform(model.bounds(), WHITE));
  let threshold = initial - model.history()[2].score;
  assert_eq!(model.frames(threshold)?.len(), 2);
  assert_eq!(model.frames(f64::INFINITY)?.len(), 1);
  Ok(())
}

#[cfg(feature = "drawing")]
#[test_log::test] fn render_matches_last_frame() -> Result<()> {
  let mut model = Model::new(bands(), WHITE, Config { size: 12, ..quick() })?;
  (0..3).for_each(|i| { model.add(band(i), 255); });
  let frames = model.frames(0.0)?;
  assert!(frames.last() == Some(&model.render()));
  assert_eq!(model.render().dimensions(), (12, 4));
  Ok(())
}

#[test_log::test] fn svg_document() -> Result<()> {
  let mut model = Model::new(gradient(30, 20), WHITE, Config { size: 100, ..quick() })?;
  model.add(Shape::Rectangle(Rectangle { p1: P2::new(1, 2), p2: P2::new(10, 12) }), 128);
  model.step();

  let svg = model.svg();
  let header = Regex::new(r#"<svg [^>]*width="(\d+)" height="(\d+)">"#)?;
  let captures = header.captures(&svg).ok_or_else(|| anyhow::anyhow!("no header"))?;
  let (size, scale) = util::fit_size(Size2D::new(30, 20), 100);
  assert_eq!(captures[1].parse::<u32>()?, size.width);
  assert_eq!(captures[2].parse::<u32>()?, size.height);
  assert_eq!((size.width, size.height), (100, 66));
  assert_eq!(model.size_and_scale(), (size, scale));

  assert!(svg.contains(&format!("<g transform=\"scale({:.6}) translate(0.5 0.5)\">", scale)));
  assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"100\" height=\"66\" fill=\"#ffffff\" />"));
  assert!(svg.ends_with("</g>\n</svg>"));
  assert_eq!(svg.lines().count(), 5 + model.history().len());
  Ok(())
}
