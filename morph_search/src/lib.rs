// Morph Search
//
// Generative search over morphs: ordered numeric vectors compared under
// morphological distance metrics. Given a metric, the library finds vectors
// at a prescribed distance from a reference, collects sets of such vectors,
// and builds paths between two morphs whose distances to both endpoints
// follow a linear schedule. The metrics themselves are supplied by the
// caller through the `Metric` trait.
//
// Architecture:
// - vector.rs: dot/length/distance, interpolation, upsampling, n-sphere sampling
// - metric.rs: Metric contract, DistConfig pass-through, named metric registry
// - search.rs: deterministic and stochastic hill climbing (SearchEngine trait)
// - generate.rs: point-at-distance and set-at-distance generators
// - path.rs: metric path builder
// - angle.rs: Euclidean and metric (law-of-cosines) angles
// - job.rs: JSON jobs run by the `morph` binary
// - error.rs: MorphError
//
// Search is deterministic given a seed: the only randomness is the
// `MorphRng` each call borrows.

pub mod angle;
pub mod error;
pub mod generate;
pub mod job;
pub mod metric;
pub mod path;
pub mod search;
pub mod vector;

pub use error::{MorphError, Result};
pub use metric::{DistConfig, Metric, MetricConfig, MetricRegistry};
pub use search::{Engine, SearchEngine, SearchOptions, SearchResult};
