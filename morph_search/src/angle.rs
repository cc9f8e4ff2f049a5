// Angles between morphs.
//
// `angle_euclidean` is the ordinary angle at a vertex (origin by default)
// from the dot product. `angle` generalizes it to any metric through the law
// of cosines, treating metric distances as side lengths of the triangle
// (vertex, v1, v2). That is only meaningful for metrics that are symmetric
// and satisfy the triangle inequality; anything else is the caller's problem.
//
// Both return 0.0 when v1 or v2 coincides with the vertex. The cosine is
// clamped to [-1, 1] so collinear points don't produce NaN from rounding.

use crate::error::{Result, check_dims};
use crate::metric::{Metric, MetricConfig};
use crate::vector::{dot, length};

/// Angle in radians at `vertex` (origin if `None`) between the rays to `v1`
/// and `v2`.
pub fn angle_euclidean(v1: &[f64], v2: &[f64], vertex: Option<&[f64]>) -> Result<f64> {
    check_dims(v1, v2)?;
    let origin = vec![0.0; v1.len()];
    let vertex = vertex.unwrap_or(origin.as_slice());
    check_dims(v1, vertex)?;

    let a: Vec<f64> = v1.iter().zip(vertex).map(|(x, o)| x - o).collect();
    let b: Vec<f64> = v2.iter().zip(vertex).map(|(x, o)| x - o).collect();
    let (len_a, len_b) = (length(&a), length(&b));
    if len_a == 0.0 || len_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot(&a, &b) / (len_a * len_b)).clamp(-1.0, 1.0).acos())
}

/// Angle in radians at `vertex` (origin if `None`) using `metric` distances
/// as triangle sides.
pub fn angle(
    v1: &[f64],
    v2: &[f64],
    vertex: Option<&[f64]>,
    metric: &dyn Metric,
    config: &MetricConfig,
) -> Result<f64> {
    check_dims(v1, v2)?;
    let origin = vec![0.0; v1.len()];
    let vertex = vertex.unwrap_or(origin.as_slice());
    check_dims(v1, vertex)?;

    let cfg = config.as_arg();
    let a = metric.distance(vertex, v1, cfg);
    let b = metric.distance(vertex, v2, cfg);
    if a == 0.0 || b == 0.0 {
        return Ok(0.0);
    }
    let c = metric.distance(v1, v2, cfg);
    let cos = (a * a + b * b - c * c) / (2.0 * a * b);
    Ok(cos.clamp(-1.0, 1.0).acos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MorphError;
    use crate::metric::euclidean;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const TOL: f64 = 1e-12;

    #[test]
    fn right_angle_at_origin() {
        let theta = angle_euclidean(&[1.0, 0.0], &[0.0, 3.0], None).unwrap();
        assert!((theta - FRAC_PI_2).abs() < TOL);
    }

    #[test]
    fn vertex_translation() {
        let theta = angle_euclidean(&[2.0, 1.0], &[1.0, 2.0], Some(&[1.0, 1.0][..])).unwrap();
        assert!((theta - FRAC_PI_2).abs() < TOL);
    }

    #[test]
    fn collinear_points_do_not_produce_nan() {
        let same = angle_euclidean(&[1.0, 1.0], &[3.0, 3.0], None).unwrap();
        assert!(same.abs() < 1e-6);
        let opposite = angle_euclidean(&[1.0, 1.0], &[-2.0, -2.0], None).unwrap();
        assert!((opposite - PI).abs() < 1e-6);
    }

    #[test]
    fn coincident_vertex_is_zero() {
        assert_eq!(angle_euclidean(&[0.0, 0.0], &[1.0, 2.0], None).unwrap(), 0.0);
        assert_eq!(
            angle(&[1.0, 1.0], &[4.0, 2.0], Some(&[1.0, 1.0][..]), &euclidean, &MetricConfig::default())
                .unwrap(),
            0.0
        );
    }

    #[test]
    fn metric_angle_matches_euclidean_for_euclidean_metric() {
        let cases = vec![
            (vec![1.0, 0.0], vec![1.0, 1.0], None),
            (vec![3.0, -1.0, 2.0], vec![0.5, 4.0, -2.0], None),
            (vec![5.0, 5.0], vec![7.0, 1.0], Some(vec![2.0, 3.0])),
        ];
        for (v1, v2, vertex) in &cases {
            let vertex = vertex.as_deref();
            let e = angle_euclidean(v1, v2, vertex).unwrap();
            let m = angle(v1, v2, vertex, &euclidean, &MetricConfig::NoConfig).unwrap();
            assert!((e - m).abs() < 1e-9, "{e} vs {m}");
        }
        let quarter = angle(&[1.0, 0.0], &[1.0, 1.0], None, &euclidean, &MetricConfig::default())
            .unwrap();
        assert!((quarter - FRAC_PI_4).abs() < 1e-9);
    }

    #[test]
    fn mismatched_dimensions_fail() {
        assert!(matches!(
            angle_euclidean(&[1.0], &[1.0, 2.0], None),
            Err(MorphError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            angle(&[1.0, 2.0], &[1.0, 2.0], Some(&[0.0][..]), &euclidean, &MetricConfig::default()),
            Err(MorphError::DimensionMismatch { .. })
        ));
    }
}
