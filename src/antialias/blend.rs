//! Dual-field resampling along the edge and the bounded selection.
//!
//! The near field averages two taps close to the pixel and is always safe. The
//! far field reaches further along the edge and smooths long shallow steps
//! better, but is only accepted while it stays inside the depth range the
//! center and ring actually observed.

use super::{FilterOutcome, FilterParams, Ring};
use crate::sampler::{DepthReduce, DepthSampler};
use glam::Vec2;
use serde::Serialize;

/// Min and max depth over the center and its ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    /// Inclusive at both ends.
    pub fn contains(&self, depth: f32) -> bool {
        depth >= self.min && self.max >= depth
    }
}

/// The two candidate depths for a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DualField {
    pub near_mix: f32,
    pub far_mix: f32,
}

/// Equal-weight blend of two depths.
#[inline]
fn mix_half(a: f32, b: f32) -> f32 {
    (a + b) * 0.5
}

/// Compute the local bounds from the center depth and the ring.
pub fn local_bounds<R>(center: f32, ring: &Ring, reducer: &R) -> Bounds
where
    R: DepthReduce + ?Sized,
{
    let samples = ring.to_array();
    Bounds {
        min: center.min(reducer.min4(samples)),
        max: center.max(reducer.max4(samples)),
    }
}

/// Sample along `direction` at the near and far offsets.
pub fn resample<S>(sampler: &S, uv: Vec2, direction: Vec2, params: &FilterParams) -> DualField
where
    S: DepthSampler + ?Sized,
{
    let near_neg = sampler.sample(uv + direction * -params.near_offset);
    let near_pos = sampler.sample(uv + direction * params.near_offset);
    let far_neg = sampler.sample(uv + direction * -params.far_offset);
    let far_pos = sampler.sample(uv + direction * params.far_offset);

    let near_mix = mix_half(near_neg, near_pos);
    let far_mix = mix_half(mix_half(far_neg, far_pos), near_mix);
    DualField { near_mix, far_mix }
}

/// Pick the far estimate when it is locally plausible, the near one otherwise.
///
/// The result is always exactly one of the two candidates.
pub fn select(fields: &DualField, bounds: &Bounds) -> (f32, FilterOutcome) {
    if bounds.contains(fields.far_mix) {
        (fields.far_mix, FilterOutcome::Far)
    } else {
        (fields.near_mix, FilterOutcome::Near)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::ScalarReduce;

    #[test]
    fn test_bounds_inclusive() {
        let bounds = Bounds { min: 0.2, max: 0.6 };
        assert!(bounds.contains(0.2));
        assert!(bounds.contains(0.6));
        assert!(bounds.contains(0.4));
        assert!(!bounds.contains(0.199_999));
        assert!(!bounds.contains(0.600_001));
        assert!(!bounds.contains(f32::NAN));
    }

    #[test]
    fn test_local_bounds_include_center() {
        let ring = Ring { tl: 0.3, tr: 0.4, bl: 0.5, br: 0.35 };
        let inside = local_bounds(0.45, &ring, &ScalarReduce);
        assert_eq!(inside, Bounds { min: 0.3, max: 0.5 });

        let below = local_bounds(0.1, &ring, &ScalarReduce);
        assert_eq!(below, Bounds { min: 0.1, max: 0.5 });

        let above = local_bounds(0.9, &ring, &ScalarReduce);
        assert_eq!(above, Bounds { min: 0.3, max: 0.9 });
    }

    #[test]
    fn test_resample_offsets() {
        let params = FilterParams::default();
        // Depth equals the x coordinate, so each tap reports where it landed.
        let field = |uv: Vec2| uv.x;
        let dir = Vec2::new(0.1, 0.0);
        let fields = resample(&field, Vec2::new(0.5, 0.5), dir, &params);
        // near taps at 0.48 / 0.52, far taps at 0.45 / 0.55
        assert!((fields.near_mix - 0.5).abs() < 1e-6);
        assert!((fields.far_mix - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_resample_weights() {
        let params = FilterParams::default();
        let field = |uv: Vec2| -> f32 {
            match uv.x {
                x if x < 0.46 => 0.1,  // far negative
                x if x < 0.49 => 0.2,  // near negative
                x if x < 0.53 => 0.3,  // near positive
                _ => 0.7,              // far positive
            }
        };
        let fields = resample(&field, Vec2::new(0.5, 0.5), Vec2::new(0.1, 0.0), &params);
        assert!((fields.near_mix - 0.25).abs() < 1e-6);
        // ((0.1 + 0.7) / 2 + 0.25) / 2
        assert!((fields.far_mix - 0.325).abs() < 1e-6);
    }

    #[test]
    fn test_select_prefers_far_inside_bounds() {
        let bounds = Bounds { min: 0.2, max: 0.6 };
        let fields = DualField { near_mix: 0.3, far_mix: 0.6 };
        assert_eq!(select(&fields, &bounds), (0.6, FilterOutcome::Far));

        let fields = DualField { near_mix: 0.3, far_mix: 0.2 };
        assert_eq!(select(&fields, &bounds), (0.2, FilterOutcome::Far));
    }

    #[test]
    fn test_select_falls_back_to_near() {
        let bounds = Bounds { min: 0.2, max: 0.6 };
        let above = DualField { near_mix: 0.3, far_mix: 0.61 };
        assert_eq!(select(&above, &bounds), (0.3, FilterOutcome::Near));

        let below = DualField { near_mix: 0.3, far_mix: 0.19 };
        assert_eq!(select(&below, &bounds), (0.3, FilterOutcome::Near));
    }
}
