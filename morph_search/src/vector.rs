// Vector algebra primitives over `f64` morphs.
//
// Scalar kernels (`dot`, `length`, `euclidean_distance`) sit inside objective
// functions that run thousands of times per search, so they only
// debug-assert matching lengths. Operations that build new vectors
// (`interpolate*`, `upsample`) check dimensions and preconditions and return
// `MorphError` on violation; nothing here clamps bad input silently.
//
// Inputs are borrowed slices and outputs are freshly allocated, so caller
// vectors are never mutated.
//
// See also: `search.rs` (consumes `length`/`euclidean_distance` through
// caller objectives), `path.rs` (linear interpolation target per step),
// `angle.rs` (dot/length for the Euclidean angle).

use crate::error::{MorphError, Result, check_dims};
use morph_prng::MorphRng;

/// Dot product: `Σ a[i] * b[i]`. Returns 0.0 for empty vectors.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(
        a.len(),
        b.len(),
        "dot: dimension mismatch ({} vs {})",
        a.len(),
        b.len()
    );
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Euclidean norm `sqrt(dot(v, v))`.
pub fn length(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Euclidean (L2) distance between two points.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "euclidean_distance: dimension mismatch");
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

pub fn rad_to_deg(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Coerce integer (or `f32`) coordinates to the `f64` working type.
pub fn to_f64_vec<T: Copy + Into<f64>>(v: &[T]) -> Vec<f64> {
    v.iter().map(|&x| x.into()).collect()
}

/// True if any two coordinates are equal.
///
/// NaN never equals anything, including another NaN, so NaN coordinates do
/// not count as duplicates.
pub fn has_duplicates(v: &[f64]) -> bool {
    let mut sorted = v.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.windows(2).any(|w| w[0] == w[1])
}

/// `v1 + percent * (v2 - v1)`. `percent` is unconstrained, so values outside
/// [0, 1] extrapolate.
pub fn interpolate(v1: &[f64], v2: &[f64], percent: f64) -> Result<Vec<f64>> {
    check_dims(v1, v2)?;
    Ok(lerp(v1, v2, percent))
}

pub(crate) fn lerp(v1: &[f64], v2: &[f64], percent: f64) -> Vec<f64> {
    v1.iter()
        .zip(v2)
        .map(|(a, b)| a + percent * (b - a))
        .collect()
}

/// Sample the segment from `v1` towards `v2` at `0, interval, 2·interval, …`
/// up to a fraction of 1.0.
///
/// `v2` is emitted (exactly) only when some `k·interval` lands on 1.0, as it
/// does for 0.5 or 0.25. Otherwise the sampling is half-open and stops at the
/// last fraction below 1.0. Use `interpolate_steps` when both endpoints are
/// always needed.
pub fn interpolate_path(v1: &[f64], v2: &[f64], interval: f64) -> Result<Vec<Vec<f64>>> {
    if !(interval > 0.0 && interval < 1.0) {
        return Err(MorphError::InvalidInterval(interval));
    }
    check_dims(v1, v2)?;

    let mut path = Vec::new();
    let mut k = 0usize;
    loop {
        // Multiply rather than accumulate so rounding doesn't drift.
        let percent = k as f64 * interval;
        if percent > 1.0 {
            break;
        }
        if percent == 1.0 {
            path.push(v2.to_vec());
            break;
        }
        path.push(lerp(v1, v2, percent));
        k += 1;
    }
    Ok(path)
}

/// `num_steps` evenly spaced points from `v1` to `v2`, both endpoints
/// included exactly.
pub fn interpolate_steps(v1: &[f64], v2: &[f64], num_steps: usize) -> Result<Vec<Vec<f64>>> {
    if num_steps == 0 {
        return Err(MorphError::InvalidStepCount(num_steps));
    }
    check_dims(v1, v2)?;

    match num_steps {
        1 => Ok(vec![v1.to_vec()]),
        2 => Ok(vec![v1.to_vec(), v2.to_vec()]),
        _ => {
            let last = num_steps - 1;
            let mut steps = Vec::with_capacity(num_steps);
            steps.push(v1.to_vec());
            for i in 1..last {
                steps.push(lerp(v1, v2, i as f64 / last as f64));
            }
            steps.push(v2.to_vec());
            Ok(steps)
        }
    }
}

/// Stretch `v` to exactly `new_size` elements by inserting interpolated
/// samples into the gaps between existing elements.
///
/// The `new_size - len` new samples are spread over the `len - 1` gaps using
/// integer arithmetic (gap `g` receives
/// `floor((g+1)·extra/gaps) - floor(g·extra/gaps)`), so the allocation is
/// exact and sums to `extra`. Original elements are kept, including the last
/// one unchanged.
pub fn upsample(v: &[f64], new_size: usize) -> Result<Vec<f64>> {
    if new_size < v.len() {
        return Err(MorphError::UpsampleShrink {
            len: v.len(),
            new_size,
        });
    }
    match v {
        [] if new_size == 0 => return Ok(Vec::new()),
        [] => return Err(MorphError::EmptyVector),
        [only] => return Ok(vec![*only; new_size]),
        _ => {}
    }

    let gaps = v.len() - 1;
    let extra = new_size - v.len();
    let mut out = Vec::with_capacity(new_size);
    for g in 0..gaps {
        let inserted = (g + 1) * extra / gaps - g * extra / gaps;
        let segment = interpolate_steps(&v[g..=g], &v[g + 1..=g + 1], inserted + 2)?;
        // Drop the segment's end; it is the next segment's start.
        out.extend(segment[..segment.len() - 1].iter().map(|p| p[0]));
    }
    out.push(v[gaps]);
    Ok(out)
}

/// Uniform random point on the surface of an `n`-sphere of radius `radius`.
///
/// Draws `n` standard normals and rescales them to the requested norm. A
/// draw whose norm is exactly zero is discarded and redrawn.
pub fn sphere_rand_euclidean(n: usize, radius: f64, rng: &mut MorphRng) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    loop {
        let v: Vec<f64> = (0..n).map(|_| rng.next_standard_normal()).collect();
        let norm = length(&v);
        if norm > 0.0 {
            return v.into_iter().map(|x| x * radius / norm).collect();
        }
    }
}
