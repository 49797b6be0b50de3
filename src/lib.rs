//! This is a library for approximating raster images with geometric primitives.
//!
//! Shapes are added one at a time. Every new shape is the best one a randomized local search
//! could find: its color is solved in closed form for the pixels it covers, and it is scored
//! by the root-mean-square error of the canvas against the target after compositing it.
//!
//! It is split into a few modules: [`geometry`] for the primitives and their rasterization,
//! [`solver`] for color solving, scoring and the search itself, [`model`] which owns the
//! canvases and the accepted shapes, and [`drawing`] for rendering the result at the output
//! resolution (requires `drawing` feature).
//!
//! # Basic usage
//! ```no_run
//! # use {
//! #   primitive_filling::{model::{Config, Model}, util},
//! #   anyhow::Result
//! # };
//! # fn main() -> Result<()> {
//! // Work on a small copy of the input: the search cost grows with the pixel count.
//! let input = image::open("input.png")?;
//! let target = util::prepare_target(&input, 256);
//! let background = util::average_color(&target);
//!
//! let mut model = Model::new(target, background, Config {
//!   size: 1024,
//!   ..Config::default()
//! })?;
//! for _ in 0..100 {
//!   model.step();
//! }
//!
//! std::fs::write("out.svg", model.svg())?;
//! model.render().save("out.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Search
//! Each [`Model::step`](model::Model::step) runs a number of independent restarts on the rayon
//! pool. A restart draws random shapes, keeps the best, and improves it by hill climbing; the
//! winner of all restarts is refined further and committed. Restart seeds are derived from
//! [`Config::seed`](model::Config::seed) in order, so a run is reproducible regardless of the
//! thread count.
//!
//! Simulated annealing is available through [`Strategy::Anneal`](model::Strategy::Anneal).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(rustdoc::private_intra_doc_links)]

pub mod raster;
pub mod geometry;
pub mod solver;
pub mod model;
pub mod util;
#[cfg(feature = "drawing")]
#[cfg_attr(docsrs, doc(cfg(feature = "drawing")))]
pub mod drawing;
