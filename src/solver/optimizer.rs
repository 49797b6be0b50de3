use {
  super::{Annealable, State, Worker, hill_climb},
  crate::{geometry::ShapeKind, model::Model},
  rand::{Rng, SeedableRng},
  rand_pcg::Pcg64,
  rayon::prelude::*
};

/// Evaluate `n` random shapes of `kind`, and return the one with the lowest energy.
/// Ties go to the earliest draw. `None` if `n == 0`.
pub fn best_random_state(worker: &mut Worker, kind: ShapeKind, n: usize) -> Option<State> {
  let mut best: Option<(f64, State)> = None;
  for _ in 0..n {
    let state = worker.random_state(kind);
    let energy = state.energy(worker);
    if best.as_ref().map_or(true, |(best_energy, _)| energy < *best_energy) {
      best = Some((energy, state));
    }
  }
  best.map(|(_, state)| state)
}

/// `m` independent restarts of a random search over `n` shapes followed by `age` iterations
/// of hill climbing. Returns the best of them; ties go to the earliest restart.
///
/// Restarts run in parallel, each with its own [`Worker`]. Their seeds are derived from `seed`
/// in order, so the result does not depend on scheduling.
pub fn best_hill_climb_state(
  model: &Model,
  kind: ShapeKind,
  n: usize,
  age: usize,
  m: usize,
  seed: u64
) -> Option<State> {
  let mut rng = Pcg64::seed_from_u64(seed);
  let seeds = (0..m).map(|_| rng.gen::<u64>()).collect::<Vec<_>>();

  seeds.into_par_iter()
    .filter_map(|seed| {
      let mut worker = Worker::new(model, seed);
      let state = best_random_state(&mut worker, kind, n)?;
      let before = state.energy(&mut worker);
      let state = hill_climb(state, &mut worker, age);
      let energy = state.energy(&mut worker);
      log::debug!("{}x random: {:.6} -> {}x hill climb: {:.6}", n, before, age, energy);
      Some((energy, state))
    })
    .collect::<Vec<_>>()
    .into_iter()
    .min_by(|(a, _), (b, _)| a.total_cmp(b))
    .map(|(_, state)| state)
}
