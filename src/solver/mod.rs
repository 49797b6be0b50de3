//! Candidate evaluation and search.
//!
//! A [`State`] is scored by a [`Worker`]: the color is solved in closed form
//! ([`compute_color`]), and the canvas error after compositing is updated incrementally
//! ([`difference_partial`]), touching only the pixels under the shape. The search strategies
//! ([`best_random_state`], [`hill_climb`], [`anneal`], [`best_hill_climb_state`]) compose on
//! top of that.

pub mod color;
pub use color::compute_color;

pub mod difference;
pub use difference::{difference_full, difference_partial};

pub mod search;
pub use search::{Annealable, anneal, hill_climb};

pub mod state;
pub use state::{State, Worker};

pub mod optimizer;
pub use optimizer::{best_hill_climb_state, best_random_state};
