// Metric contract and the named metric registry.
//
// The concrete morphological metrics live outside this crate; the search
// code only needs something that maps two vectors (plus an optional opaque
// configuration) to a non-negative distance. That is the `Metric` trait,
// implemented for every matching closure or `fn`.
//
// `MetricConfig` carries the distinction between "call the metric with a
// configuration" and the explicit no-configuration sentinel. The search code
// never looks inside a `DistConfig`; it only hands it to the metric.
//
// `MetricRegistry` maps names to plain `fn` metrics. It is assembled once
// through `MetricRegistryBuilder` and is read-only afterwards, so lookups can
// be shared freely.

use crate::error::{MorphError, Result};
use crate::vector::euclidean_distance;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scaling mode recognized by the morphological metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    /// Raw, unscaled distances.
    None,
    /// Distances scaled by absolute magnitude (the metrics' default).
    #[default]
    Absolute,
}

/// Opaque metric configuration. Passed through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistConfig {
    pub scale: Scale,
    /// Metric-specific settings the search code doesn't know about.
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// How a metric is invoked: with a configuration, or with the explicit
/// no-configuration sentinel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricConfig {
    NoConfig,
    Config(DistConfig),
}

impl Default for MetricConfig {
    fn default() -> Self {
        MetricConfig::Config(DistConfig::default())
    }
}

impl MetricConfig {
    /// The argument handed to `Metric::distance`.
    pub fn as_arg(&self) -> Option<&DistConfig> {
        match self {
            MetricConfig::NoConfig => None,
            MetricConfig::Config(cfg) => Some(cfg),
        }
    }
}

/// A distance between two vectors. `None` is the no-configuration sentinel.
pub trait Metric {
    fn distance(&self, a: &[f64], b: &[f64], config: Option<&DistConfig>) -> f64;
}

impl<F> Metric for F
where
    F: Fn(&[f64], &[f64], Option<&DistConfig>) -> f64,
{
    fn distance(&self, a: &[f64], b: &[f64], config: Option<&DistConfig>) -> f64 {
        self(a, b, config)
    }
}

/// Function-pointer form stored in the registry.
pub type MetricFn = fn(&[f64], &[f64], Option<&DistConfig>) -> f64;

/// Plain Euclidean distance, ignoring any configuration.
pub fn euclidean(a: &[f64], b: &[f64], _config: Option<&DistConfig>) -> f64 {
    euclidean_distance(a, b)
}

/// Read-only name → metric lookup.
#[derive(Clone, Debug)]
pub struct MetricRegistry {
    metrics: BTreeMap<String, MetricFn>,
}

impl MetricRegistry {
    /// Registry with the metrics this crate ships (`"euclidean"`).
    pub fn builtin() -> Self {
        Self::builder().build()
    }

    /// Start from the built-in metrics and add more before freezing.
    pub fn builder() -> MetricRegistryBuilder {
        let mut metrics = BTreeMap::new();
        metrics.insert("euclidean".to_string(), euclidean as MetricFn);
        MetricRegistryBuilder { metrics }
    }

    pub fn get(&self, name: &str) -> Result<MetricFn> {
        self.metrics
            .get(name)
            .copied()
            .ok_or_else(|| MorphError::UnknownMetric(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }
}

/// Collects metrics for a `MetricRegistry`. Consumed by `build()`.
#[derive(Debug)]
pub struct MetricRegistryBuilder {
    metrics: BTreeMap<String, MetricFn>,
}

impl MetricRegistryBuilder {
    /// Register `metric` under `name`, replacing any earlier entry.
    pub fn with(mut self, name: impl Into<String>, metric: MetricFn) -> Self {
        self.metrics.insert(name.into(), metric);
        self
    }

    pub fn build(self) -> MetricRegistry {
        MetricRegistry {
            metrics: self.metrics,
        }
    }
}
