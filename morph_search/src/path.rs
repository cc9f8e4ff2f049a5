// Metric path builder: a chain of morphs from v1 to v2 whose distances to
// both endpoints follow a linear schedule under the chosen metric.
//
// For step i of n the objective is
//
//   |metric(v1, x) - i·inc| + |metric(v2, x) - (total - i·inc)|
//     + tightness · euclid(x, lerp(v1, v2, i/n))
//
// where `total = metric(v1, v2)` and `inc = total / n`. The Euclidean term
// keeps the search near the straight line so it doesn't wander off along a
// level set of the metric. Each step's search starts from the previous
// step's point, not from v1.
//
// Duplicate-coordinate results go through the same bounded retry as the
// point generator (`generate::search_distinct`). With `cheat`, the last
// step is not searched at all; v2 is appended exactly. Skipping that search
// also skips its RNG draws and its duplicate retry, so a cheated path leaves
// `rng` in a different state than searching the last step and overwriting
// the result would.
//
// The default engine is the stochastic one. Between endpoints like [0, 0]
// and [10, 10] the deterministic climb lands exactly on diagonal points such
// as [2, 2], and since it cannot usefully retry, the distinct-coordinate rule
// would fail every such path.

use crate::error::{MorphError, Result, check_dims};
use crate::generate::search_distinct;
use crate::metric::{Metric, MetricConfig};
use crate::search::{Engine, SearchEngine, SearchOptions};
use crate::vector::{euclidean_distance, lerp};
use morph_prng::MorphRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptions {
    pub metric_config: MetricConfig,
    /// Number of steps; the path has `steps + 1` points.
    pub steps: usize,
    /// Replace the last point with v2 exactly.
    pub cheat: bool,
    /// Weight of the pull towards the straight-line interpolation.
    pub euclidean_tightness: f64,
    /// Defaults to `Engine::Stochastic`.
    pub engine: Engine,
    pub search: SearchOptions,
    pub allow_duplicates: bool,
    pub max_retries: usize,
}

impl Default for PathOptions {
    fn default() -> Self {
        PathOptions {
            metric_config: MetricConfig::default(),
            steps: 10,
            cheat: false,
            euclidean_tightness: 1.0,
            engine: Engine::Stochastic,
            search: SearchOptions::default(),
            allow_duplicates: false,
            max_retries: 100,
        }
    }
}

impl PathOptions {
    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            return Err(MorphError::InvalidStepCount(self.steps));
        }
        if !(self.euclidean_tightness.is_finite() && self.euclidean_tightness >= 0.0) {
            return Err(MorphError::InvalidOptions(format!(
                "euclidean_tightness must be finite and >= 0, got {}",
                self.euclidean_tightness
            )));
        }
        if self.max_retries == 0 {
            return Err(MorphError::InvalidOptions(
                "max_retries must be at least 1".to_string(),
            ));
        }
        self.search.validate()
    }
}

/// Build a path of `steps + 1` morphs from `v1` towards `v2`.
pub fn metric_path(
    v1: &[f64],
    v2: &[f64],
    metric: &dyn Metric,
    options: &PathOptions,
    rng: &mut MorphRng,
) -> Result<Vec<Vec<f64>>> {
    metric_path_with(v1, v2, metric, options, &options.engine, rng)
}

/// `metric_path` with a caller-supplied search engine.
pub fn metric_path_with(
    v1: &[f64],
    v2: &[f64],
    metric: &dyn Metric,
    options: &PathOptions,
    engine: &dyn SearchEngine,
    rng: &mut MorphRng,
) -> Result<Vec<Vec<f64>>> {
    options.validate()?;
    check_dims(v1, v2)?;

    let config = options.metric_config.as_arg();
    let steps = options.steps;
    let total = metric.distance(v1, v2, config);
    let increment = total / steps as f64;
    let tightness = options.euclidean_tightness;

    let mut path = Vec::with_capacity(steps + 1);
    path.push(v1.to_vec());
    let mut previous = v1.to_vec();

    for i in 1..=steps {
        if options.cheat && i == steps {
            // No search, so no RNG draws for this step.
            path.push(v2.to_vec());
            break;
        }

        let from_v1 = increment * i as f64;
        let from_v2 = total - from_v1;
        let anchor = lerp(v1, v2, i as f64 / steps as f64);
        let objective = |x: &[f64]| {
            (metric.distance(v1, x, config) - from_v1).abs()
                + (metric.distance(v2, x, config) - from_v2).abs()
                + tightness * euclidean_distance(x, &anchor)
        };

        let point = search_distinct(
            &objective,
            &previous,
            &options.search,
            engine,
            options.allow_duplicates,
            options.max_retries,
            rng,
        )?;
        debug!(step = i, residual = objective(&point), "metric_path step");
        previous.clone_from(&point);
        path.push(point);
    }

    Ok(path)
}
