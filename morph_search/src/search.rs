// Local search engines: deterministic and stochastic hill climbing.
//
// Both engines minimize an arbitrary scalar objective over a vector's
// coordinates with adaptive step sizes, and stop on whichever comes first:
// the objective reaching `epsilon` of zero, a stalled point, or the
// iteration budget. The budget is a hard bound; nothing in the loop depends
// on the objective behaving well.
//
// - `hill_climb`: coordinate descent. Each dimension tries -step, 0, +step
//   in that fixed order (first strictly-lower score wins, so ties favour
//   -1, then 0). A dimension whose best move is "stay" halves its own step
//   until it reaches the minimum.
// - `hill_climb_stochastic`: one shared step size; each iteration scores
//   5 × dims random candidates (every coordinate moved by -step, 0 or +step)
//   and takes the best only on strict improvement. Without improvement the
//   step shrinks (halved, or reduced by `step_size_subtract`), and at the
//   minimum the search gives up.
//
// Objective values that are NaN rank below every real value, so a broken
// objective degrades the search without panicking.
//
// `SearchEngine` is the seam the generators (`generate.rs`, `path.rs`) use,
// so any conforming optimizer can be plugged in. `Engine` is the
// serializable selector between the two built-in engines.
//
// **Critical constraint: determinism.** All randomness comes from the
// `MorphRng` passed in. The same seed, start and options reproduce the same
// trajectory.

use crate::error::{MorphError, Result};
use morph_prng::MorphRng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, trace};

/// Scalar function to minimize.
pub type Objective<'a> = dyn Fn(&[f64]) -> f64 + 'a;

/// Step-size, convergence and budget settings shared by both engines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Success when `|objective| <= epsilon`.
    pub epsilon: f64,
    /// Step sizes never shrink below this.
    pub min_step_size: f64,
    /// Upper bound on the starting step size.
    pub max_step_size: f64,
    pub start_step_size: f64,
    /// Hard cap on iterations.
    pub max_iterations: usize,
    /// Keep every recorded point, not just the final one.
    pub return_full_path: bool,
    /// Stochastic engine only: shrink the step by this amount instead of
    /// halving it.
    pub step_size_subtract: Option<f64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            epsilon: 0.001,
            min_step_size: 0.001,
            max_step_size: 1000.0,
            start_step_size: 1.0,
            max_iterations: 1000,
            return_full_path: false,
            step_size_subtract: None,
        }
    }
}

impl SearchOptions {
    /// Reject option combinations that would make the step-size schedule
    /// meaningless.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(MorphError::InvalidOptions(msg));
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return fail(format!("epsilon must be finite and >= 0, got {}", self.epsilon));
        }
        if !(self.min_step_size.is_finite() && self.min_step_size > 0.0) {
            return fail(format!(
                "min_step_size must be finite and > 0, got {}",
                self.min_step_size
            ));
        }
        if !(self.max_step_size.is_finite() && self.max_step_size >= self.min_step_size) {
            return fail(format!(
                "max_step_size must be finite and >= min_step_size, got {}",
                self.max_step_size
            ));
        }
        if !(self.start_step_size >= self.min_step_size
            && self.start_step_size <= self.max_step_size)
        {
            return fail(format!(
                "start_step_size must lie in [{}, {}], got {}",
                self.min_step_size, self.max_step_size, self.start_step_size
            ));
        }
        if let Some(sub) = self.step_size_subtract {
            if !(sub.is_finite() && sub > 0.0) {
                return fail(format!("step_size_subtract must be finite and > 0, got {sub}"));
            }
        }
        Ok(())
    }
}

/// Why a search stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The objective came within `epsilon` of zero.
    Converged,
    /// No move improved and the step size could not shrink further.
    Stalled,
    /// `max_iterations` ran out.
    BudgetExhausted,
}

/// Outcome of a search. `Converged` only says the objective got close to
/// zero; callers that care about a constraint must re-check it themselves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub point: Vec<f64>,
    /// Start point followed by every recorded point, if requested.
    pub path: Option<Vec<Vec<f64>>>,
    /// Objective value at `point`.
    pub score: f64,
    pub iterations: usize,
    pub termination: Termination,
}

impl SearchResult {
    pub fn into_point(self) -> Vec<f64> {
        self.point
    }

    /// The recorded trajectory, or just the final point when no path was kept.
    pub fn into_path(self) -> Vec<Vec<f64>> {
        match self.path {
            Some(path) => path,
            None => vec![self.point],
        }
    }
}

/// An optimizer the generators can delegate to.
pub trait SearchEngine {
    fn search(
        &self,
        objective: &Objective<'_>,
        start: &[f64],
        options: &SearchOptions,
        rng: &mut MorphRng,
    ) -> Result<SearchResult>;

    /// True if repeated runs from the same start always return the same
    /// result, which makes retrying pointless.
    fn is_deterministic(&self) -> bool {
        false
    }
}

/// Deterministic per-dimension hill climb.
#[derive(Clone, Copy, Debug, Default)]
pub struct HillClimb;

/// Randomized multi-candidate hill climb.
#[derive(Clone, Copy, Debug, Default)]
pub struct StochasticHillClimb;

impl SearchEngine for HillClimb {
    fn search(
        &self,
        objective: &Objective<'_>,
        start: &[f64],
        options: &SearchOptions,
        _rng: &mut MorphRng,
    ) -> Result<SearchResult> {
        hill_climb(objective, start, options)
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}

impl SearchEngine for StochasticHillClimb {
    fn search(
        &self,
        objective: &Objective<'_>,
        start: &[f64],
        options: &SearchOptions,
        rng: &mut MorphRng,
    ) -> Result<SearchResult> {
        hill_climb_stochastic(objective, start, options, rng)
    }
}

/// Serializable choice between the built-in engines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    #[default]
    HillClimb,
    Stochastic,
}

impl SearchEngine for Engine {
    fn search(
        &self,
        objective: &Objective<'_>,
        start: &[f64],
        options: &SearchOptions,
        rng: &mut MorphRng,
    ) -> Result<SearchResult> {
        match self {
            Engine::HillClimb => HillClimb.search(objective, start, options, rng),
            Engine::Stochastic => StochasticHillClimb.search(objective, start, options, rng),
        }
    }

    fn is_deterministic(&self) -> bool {
        matches!(self, Engine::HillClimb)
    }
}

/// Order objective values with NaN after everything else.
fn compare_scores(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Strict improvement under `compare_scores`.
fn is_better(candidate: f64, incumbent: f64) -> bool {
    compare_scores(candidate, incumbent) == Ordering::Less
}

fn within_epsilon(score: f64, epsilon: f64) -> bool {
    score.abs() <= epsilon
}

/// Deterministic coordinate-descent hill climb.
///
/// See the module header for the move and tie-break rules. A point counts as
/// stalled only when it did not move and no dimension could shrink its step
/// any further; an unmoved point whose steps just shrank keeps searching at
/// the finer resolution.
pub fn hill_climb(
    objective: &Objective<'_>,
    start: &[f64],
    options: &SearchOptions,
) -> Result<SearchResult> {
    options.validate()?;

    let mut current = start.to_vec();
    let mut steps = vec![options.start_step_size; current.len()];
    let mut path = options.return_full_path.then(|| vec![current.clone()]);
    let mut score = objective(&current);

    if within_epsilon(score, options.epsilon) {
        return Ok(finish(current, path, score, 0, Termination::Converged));
    }

    let mut termination = Termination::BudgetExhausted;
    let mut iterations = 0;
    while iterations < options.max_iterations {
        iterations += 1;
        let before = current.clone();
        let mut shrank = false;

        for d in 0..current.len() {
            let origin = current[d];
            let step = steps[d];

            let mut best_mult = -1.0;
            current[d] = origin - step;
            let mut best_score = objective(&current);
            for mult in [0.0, 1.0] {
                current[d] = origin + mult * step;
                let s = objective(&current);
                if is_better(s, best_score) {
                    best_mult = mult;
                    best_score = s;
                }
            }

            if best_mult == 0.0 && step > options.min_step_size {
                steps[d] = (step / 2.0).max(options.min_step_size);
                current[d] = origin;
                shrank = true;
            } else {
                current[d] = origin + best_mult * step;
            }
        }

        score = objective(&current);
        if let Some(path) = path.as_mut() {
            path.push(current.clone());
        }
        trace!(iterations, score, ?steps, "hill_climb iteration");

        if within_epsilon(score, options.epsilon) {
            termination = Termination::Converged;
            break;
        }
        if current == before && !shrank {
            termination = Termination::Stalled;
            break;
        }
    }

    debug!(?termination, iterations, score, "hill_climb finished");
    Ok(finish(current, path, score, iterations, termination))
}

/// Stochastic multi-candidate hill climb drawing from `rng`.
pub fn hill_climb_stochastic(
    objective: &Objective<'_>,
    start: &[f64],
    options: &SearchOptions,
    rng: &mut MorphRng,
) -> Result<SearchResult> {
    options.validate()?;

    let mut current = start.to_vec();
    let mut step = options.start_step_size;
    let mut path = options.return_full_path.then(|| vec![current.clone()]);
    let mut score = objective(&current);

    if within_epsilon(score, options.epsilon) {
        return Ok(finish(current, path, score, 0, Termination::Converged));
    }

    let num_candidates = 5 * current.len();
    let mut termination = Termination::BudgetExhausted;
    let mut iterations = 0;
    while iterations < options.max_iterations {
        iterations += 1;

        let best = (0..num_candidates)
            .map(|_| {
                let candidate: Vec<f64> = current
                    .iter()
                    .map(|&x| x + rng.next_unit_step() * step)
                    .collect();
                let s = objective(&candidate);
                (candidate, s)
            })
            .min_by(|a, b| compare_scores(a.1, b.1));

        let improved = match best {
            Some((candidate, s)) if is_better(s, score) => {
                current = candidate;
                score = s;
                if let Some(path) = path.as_mut() {
                    path.push(current.clone());
                }
                true
            }
            _ => false,
        };
        trace!(iterations, score, step, improved, "hill_climb_stochastic iteration");

        if within_epsilon(score, options.epsilon) {
            termination = Termination::Converged;
            break;
        }
        if !improved {
            if step > options.min_step_size {
                let reduced = match options.step_size_subtract {
                    Some(sub) => step - sub,
                    None => step / 2.0,
                };
                step = reduced.max(options.min_step_size);
            } else {
                termination = Termination::Stalled;
                break;
            }
        }
    }

    debug!(?termination, iterations, score, step, "hill_climb_stochastic finished");
    Ok(finish(current, path, score, iterations, termination))
}

fn finish(
    point: Vec<f64>,
    path: Option<Vec<Vec<f64>>>,
    score: f64,
    iterations: usize,
    termination: Termination,
) -> SearchResult {
    SearchResult {
        point,
        path,
        score,
        iterations,
        termination,
    }
}
