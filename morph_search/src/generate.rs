// Distance-constrained generation of new morphs.
//
// `find_point_at_distance` turns "a point at distance d from v1 under this
// metric" into the objective `|metric(v1, x) - d|` and hands it to a search
// engine, starting from v1. Results whose coordinates are not pairwise
// distinct are rejected and the whole search re-run, up to `max_retries`
// times; a deterministic engine would only repeat itself, so it gets a
// single attempt. Running out of attempts is `ConstraintUnsatisfied`.
//
// `set_at_distance` calls the point generator repeatedly and collects
// distinct results. Repeats and unsatisfiable attempts count as failures;
// hitting `max_failures` returns whatever was collected.
//
// Neither function checks how close the result actually is to `d`. The
// optimizer can settle in a poor local optimum, so callers verify.
//
// See also: `search.rs` for the engines, `path.rs` which reuses
// `search_distinct` for each step of a metric path.

use crate::error::{MorphError, Result};
use crate::metric::{Metric, MetricConfig};
use crate::search::{Engine, Objective, SearchEngine, SearchOptions};
use crate::vector::has_duplicates;
use morph_prng::MorphRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Settings for `find_point_at_distance`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointOptions {
    pub metric_config: MetricConfig,
    pub engine: Engine,
    pub search: SearchOptions,
    /// Accept results with repeated coordinate values.
    pub allow_duplicates: bool,
    /// Full searches to attempt before giving up on distinct coordinates.
    pub max_retries: usize,
}

impl Default for PointOptions {
    fn default() -> Self {
        PointOptions {
            metric_config: MetricConfig::default(),
            engine: Engine::default(),
            search: SearchOptions::default(),
            allow_duplicates: false,
            max_retries: 100,
        }
    }
}

impl PointOptions {
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(MorphError::InvalidOptions(
                "max_retries must be at least 1".to_string(),
            ));
        }
        self.search.validate()
    }
}

/// Settings for `set_at_distance`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetOptions {
    #[serde(flatten)]
    pub point: PointOptions,
    pub set_size: usize,
    pub max_failures: usize,
}

impl Default for SetOptions {
    fn default() -> Self {
        SetOptions {
            point: PointOptions::default(),
            set_size: 10,
            max_failures: 1000,
        }
    }
}

/// Find a point whose distance from `v1` under `metric` is close to
/// `distance`, using the engine named in `options`.
pub fn find_point_at_distance(
    v1: &[f64],
    distance: f64,
    metric: &dyn Metric,
    options: &PointOptions,
    rng: &mut MorphRng,
) -> Result<Vec<f64>> {
    find_point_at_distance_with(v1, distance, metric, options, &options.engine, rng)
}

/// `find_point_at_distance` with a caller-supplied search engine.
pub fn find_point_at_distance_with(
    v1: &[f64],
    distance: f64,
    metric: &dyn Metric,
    options: &PointOptions,
    engine: &dyn SearchEngine,
    rng: &mut MorphRng,
) -> Result<Vec<f64>> {
    options.validate()?;
    if !distance.is_finite() {
        return Err(MorphError::InvalidOptions(format!(
            "target distance must be finite, got {distance}"
        )));
    }

    let config = options.metric_config.as_arg();
    let objective = |x: &[f64]| (metric.distance(v1, x, config) - distance).abs();
    search_distinct(
        &objective,
        v1,
        &options.search,
        engine,
        options.allow_duplicates,
        options.max_retries,
        rng,
    )
}

/// Collect up to `set_size` distinct points at `distance` from `v1`.
pub fn set_at_distance(
    v1: &[f64],
    distance: f64,
    metric: &dyn Metric,
    options: &SetOptions,
    rng: &mut MorphRng,
) -> Result<Vec<Vec<f64>>> {
    set_at_distance_with(v1, distance, metric, options, &options.point.engine, rng)
}

/// `set_at_distance` with a caller-supplied search engine.
pub fn set_at_distance_with(
    v1: &[f64],
    distance: f64,
    metric: &dyn Metric,
    options: &SetOptions,
    engine: &dyn SearchEngine,
    rng: &mut MorphRng,
) -> Result<Vec<Vec<f64>>> {
    options.point.validate()?;

    let mut set: Vec<Vec<f64>> = Vec::new();
    let mut failures = 0;
    while set.len() < options.set_size && failures < options.max_failures {
        match find_point_at_distance_with(v1, distance, metric, &options.point, engine, rng) {
            Ok(point) if !set.contains(&point) => set.push(point),
            Ok(_) | Err(MorphError::ConstraintUnsatisfied { .. }) => {
                failures += 1;
                if engine.is_deterministic() {
                    // Every further call returns the same outcome.
                    debug!(found = set.len(), "deterministic engine exhausted");
                    break;
                }
            }
            Err(e) => return Err(e),
        }
    }

    if set.len() < options.set_size && failures >= options.max_failures {
        warn!(
            found = set.len(),
            wanted = options.set_size,
            failures,
            "set_at_distance hit its failure budget"
        );
    }
    Ok(set)
}

/// Run `engine` from `start`, re-running while the result has duplicate
/// coordinates (unless allowed), for at most `max_retries` attempts.
pub(crate) fn search_distinct(
    objective: &Objective<'_>,
    start: &[f64],
    search: &SearchOptions,
    engine: &dyn SearchEngine,
    allow_duplicates: bool,
    max_retries: usize,
    rng: &mut MorphRng,
) -> Result<Vec<f64>> {
    for attempt in 1..=max_retries {
        let point = engine.search(objective, start, search, rng)?.into_point();
        if allow_duplicates || !has_duplicates(&point) {
            return Ok(point);
        }
        debug!(attempt, ?point, "rejected point with duplicate coordinates");
        if engine.is_deterministic() {
            warn!("deterministic search produced duplicate coordinates");
            return Err(MorphError::ConstraintUnsatisfied { attempts: attempt });
        }
    }
    warn!(max_retries, "no point with distinct coordinates found");
    Err(MorphError::ConstraintUnsatisfied {
        attempts: max_retries,
    })
}
