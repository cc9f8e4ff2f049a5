// JSON-described jobs for the `morph` binary.
//
// A job names the operation (`kind`), its vectors, a metric from the
// registry, and an options block using the same structs as the library
// API. Every options field is optional in JSON and falls back to the
// library default. Example:
//
//   {"kind": "path", "v1": [0, 0], "v2": [10, 10], "metric": "euclidean",
//    "options": {"steps": 5, "cheat": true, "engine": "stochastic"}}
//
// Integer coordinates in JSON are read as f64.

use crate::angle::{angle, angle_euclidean};
use crate::error::Result;
use crate::generate::{PointOptions, SetOptions, find_point_at_distance, set_at_distance};
use crate::metric::{MetricConfig, MetricRegistry};
use crate::path::{PathOptions, metric_path};
use crate::vector::upsample;
use morph_prng::MorphRng;
use serde::{Deserialize, Serialize};

fn default_metric() -> String {
    "euclidean".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Job {
    Point {
        v1: Vec<f64>,
        distance: f64,
        #[serde(default = "default_metric")]
        metric: String,
        #[serde(default)]
        options: PointOptions,
    },
    Set {
        v1: Vec<f64>,
        distance: f64,
        #[serde(default = "default_metric")]
        metric: String,
        #[serde(default)]
        options: SetOptions,
    },
    Path {
        v1: Vec<f64>,
        v2: Vec<f64>,
        #[serde(default = "default_metric")]
        metric: String,
        #[serde(default)]
        options: PathOptions,
    },
    Upsample {
        v: Vec<f64>,
        new_size: usize,
    },
    /// Euclidean angle when `metric` is absent, law-of-cosines angle otherwise.
    Angle {
        v1: Vec<f64>,
        v2: Vec<f64>,
        #[serde(default)]
        vertex: Option<Vec<f64>>,
        #[serde(default)]
        metric: Option<String>,
        #[serde(default)]
        config: MetricConfig,
    },
}

/// What a job produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JobOutput {
    Vector(Vec<f64>),
    Vectors(Vec<Vec<f64>>),
    Scalar(f64),
}

impl Job {
    pub fn run(&self, registry: &MetricRegistry, rng: &mut MorphRng) -> Result<JobOutput> {
        match self {
            Job::Point {
                v1,
                distance,
                metric,
                options,
            } => {
                let metric = registry.get(metric)?;
                find_point_at_distance(v1, *distance, &metric, options, rng).map(JobOutput::Vector)
            }
            Job::Set {
                v1,
                distance,
                metric,
                options,
            } => {
                let metric = registry.get(metric)?;
                set_at_distance(v1, *distance, &metric, options, rng).map(JobOutput::Vectors)
            }
            Job::Path {
                v1,
                v2,
                metric,
                options,
            } => {
                let metric = registry.get(metric)?;
                metric_path(v1, v2, &metric, options, rng).map(JobOutput::Vectors)
            }
            Job::Upsample { v, new_size } => upsample(v, *new_size).map(JobOutput::Vector),
            Job::Angle {
                v1,
                v2,
                vertex,
                metric,
                config,
            } => {
                let theta = match metric {
                    None => angle_euclidean(v1, v2, vertex.as_deref())?,
                    Some(name) => {
                        let metric = registry.get(name)?;
                        angle(v1, v2, vertex.as_deref(), &metric, config)?
                    }
                };
                Ok(JobOutput::Scalar(theta))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MorphError;

    fn run(json: &str) -> Result<JobOutput> {
        let job: Job = serde_json::from_str(json).unwrap();
        job.run(&MetricRegistry::builtin(), &mut MorphRng::new(0))
    }

    #[test]
    fn path_job_with_integer_coordinates() {
        let out = run(
            r#"{"kind": "path", "v1": [0, 0], "v2": [10, 10],
                "options": {"steps": 5, "cheat": true}}"#,
        )
        .unwrap();
        match out {
            JobOutput::Vectors(path) => {
                assert_eq!(path.len(), 6);
                assert_eq!(path[0], vec![0.0, 0.0]);
                assert_eq!(path[5], vec![10.0, 10.0]);
            }
            other => panic!("expected a path, got {other:?}"),
        }
    }

    #[test]
    fn upsample_job() {
        let out = run(r#"{"kind": "upsample", "v": [0, 3, 6, 9], "new_size": 7}"#).unwrap();
        assert_eq!(
            out,
            JobOutput::Vector(vec![0.0, 1.5, 3.0, 4.5, 6.0, 7.5, 9.0])
        );
    }

    #[test]
    fn angle_job_defaults_to_euclidean() {
        let out = run(r#"{"kind": "angle", "v1": [1, 0], "v2": [0, 1]}"#).unwrap();
        match out {
            JobOutput::Scalar(theta) => {
                assert!((theta - std::f64::consts::FRAC_PI_2).abs() < 1e-12)
            }
            other => panic!("expected a scalar, got {other:?}"),
        }
    }

    #[test]
    fn point_job_uses_registry() {
        let out = run(r#"{"kind": "point", "v1": [1, 2, 3], "distance": 1.0}"#).unwrap();
        match out {
            JobOutput::Vector(p) => {
                let d = crate::vector::euclidean_distance(&p, &[1.0, 2.0, 3.0]);
                assert!((d - 1.0).abs() <= 0.001, "distance {d}");
            }
            other => panic!("expected a vector, got {other:?}"),
        }
    }

    #[test]
    fn unknown_metric_surfaces() {
        let err = run(r#"{"kind": "set", "v1": [1, 2], "distance": 1.0, "metric": "ocm"}"#)
            .unwrap_err();
        assert_eq!(err, MorphError::UnknownMetric("ocm".to_string()));
    }

    #[test]
    fn output_serializes_untagged() {
        let json = serde_json::to_string(&JobOutput::Vectors(vec![vec![1.0], vec![2.0]])).unwrap();
        assert_eq!(json, "[[1.0],[2.0]]");
    }
}
