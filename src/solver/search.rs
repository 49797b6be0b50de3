//! Local search over anything with an energy and a neighbourhood.

use rand::{Rng, RngCore};

/// A candidate solution. `C` is the evaluation context, which also provides randomness.
pub trait Annealable<C: RngCore>: Sized {
  /// Lower is better. Must return the same value on every call for the same instance.
  fn energy(&self, ctx: &mut C) -> f64;
  /// A new, randomly perturbed candidate.
  fn mutate(&self, ctx: &mut C) -> Self;
}

/// Greedy local search: propose `iterations` mutations, keep a proposal only if its energy is
/// strictly lower. There is no early exit on stagnation.
pub fn hill_climb<C: RngCore, S: Annealable<C>>(state: S, ctx: &mut C, iterations: usize) -> S {
  let mut state = state;
  let mut energy = state.energy(ctx);
  for _ in 0..iterations {
    let candidate = state.mutate(ctx);
    let candidate_energy = candidate.energy(ctx);
    if candidate_energy < energy {
      state = candidate;
      energy = candidate_energy;
    }
  }
  state
}

/// Simulated annealing with an exponential schedule from `max_temp` down to `min_temp`.
///
/// Worse proposals are accepted with probability `exp(-Δe / T)`. Returns the best state seen,
/// which is not necessarily the last one accepted.
pub fn anneal<C: RngCore, S: Annealable<C> + Clone>(
  state: S,
  ctx: &mut C,
  max_temp: f64,
  min_temp: f64,
  steps: usize
) -> S {
  let factor = -(max_temp / min_temp).ln();
  let mut state = state;
  let mut energy = state.energy(ctx);
  let mut best = state.clone();
  let mut best_energy = energy;

  for step in 0..steps {
    let temp = max_temp * (factor * step as f64 / steps as f64).exp();
    let candidate = state.mutate(ctx);
    let candidate_energy = candidate.energy(ctx);
    let change = candidate_energy - energy;
    if change < 0.0 || ctx.gen::<f64>() < (-change / temp).exp() {
      state = candidate;
      energy = candidate_energy;
      if energy < best_energy {
        best = state.clone();
        best_energy = energy;
      }
    }
  }
  best
}
