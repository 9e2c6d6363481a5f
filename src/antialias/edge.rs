//! Edge direction estimation from the ring neighborhood.
//!
//! The ring is read in a rotated basis: `x` compares the bottom pair against the
//! top pair and `y` compares one diagonal against the other. The direction is
//! normalized by its smaller component, clamped to the footprint, and returned
//! as a uv-space offset.

use super::{FilterParams, Footprint, Ring};
use crate::sampler::DepthReduce;
use glam::Vec2;

/// Raw, unnormalized gradient of the ring.
pub fn ring_gradient(ring: &Ring) -> Vec2 {
    Vec2::new(
        (ring.br + ring.bl) - (ring.tl + ring.tr),
        (ring.br + ring.tl) - (ring.bl + ring.tr),
    )
}

/// Normalization floor for the gradient.
///
/// Never below `reduce_min`, which bounds the division in [`edge_direction`]
/// on near-flat neighborhoods.
pub fn reduce_term<R>(ring: &Ring, reducer: &R, params: &FilterParams) -> f32
where
    R: DepthReduce + ?Sized,
{
    (reducer.sum4(ring.to_array()) * params.reduce_mul).max(params.reduce_min)
}

/// Estimate the edge direction as a uv-space offset.
///
/// Each component is bounded by the footprint's `step_count` in texels before
/// conversion, so the offset never exceeds the neighborhood the ring validated.
pub fn edge_direction<R>(ring: &Ring, footprint: &Footprint, reducer: &R, params: &FilterParams) -> Vec2
where
    R: DepthReduce + ?Sized,
{
    let dir = ring_gradient(ring);
    let reduce = reduce_term(ring, reducer, params);
    let scale = 1.0 / (dir.x.abs().min(dir.y.abs()) + reduce);

    let limit = footprint.step_count;
    (dir * scale).clamp(-limit, limit) * footprint.step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::ScalarReduce;

    fn footprint() -> Footprint {
        Footprint { step_count: Vec2::new(5.0, 5.0), step: Vec2::new(0.05, 0.05) }
    }

    fn ring(tl: f32, tr: f32, bl: f32, br: f32) -> Ring {
        Ring { tl, tr, bl, br }
    }

    #[test]
    fn test_gradient_components() {
        let g = ring_gradient(&ring(0.1, 0.2, 0.3, 0.4));
        // x: (0.4 + 0.3) - (0.1 + 0.2), y: (0.4 + 0.1) - (0.3 + 0.2)
        assert!((g.x - 0.4).abs() < 1e-6);
        assert!(g.y.abs() < 1e-6);
    }

    #[test]
    fn test_flat_ring_has_zero_direction() {
        let params = FilterParams::default();
        let dir = edge_direction(&ring(0.5, 0.5, 0.5, 0.5), &footprint(), &ScalarReduce, &params);
        assert_eq!(dir, Vec2::ZERO);
    }

    #[test]
    fn test_reduce_term_floor() {
        let params = FilterParams::default();
        // sum 0.04 * 0.03 = 0.0012 < 0.008
        let low = ring(0.01, 0.01, 0.01, 0.01);
        assert_eq!(reduce_term(&low, &ScalarReduce, &params), 0.008);

        // sum 2.0 * 0.03 = 0.06
        let high = ring(0.5, 0.5, 0.5, 0.5);
        assert!((reduce_term(&high, &ScalarReduce, &params) - 0.06).abs() < 1e-7);
    }

    #[test]
    fn test_direction_clamped_to_footprint() {
        let params = FilterParams::default();
        let fp = footprint();
        // Strong horizontal edge: top far, bottom near.
        let dir = edge_direction(&ring(0.9, 0.9, 0.1, 0.1), &fp, &ScalarReduce, &params);
        // x = 0.2 - 1.8 = -1.6, y = 0; scale = 1 / 0.06 -> -26.7, clamped to -5 texels
        assert!((dir.x - (-5.0 * 0.05)).abs() < 1e-6);
        assert_eq!(dir.y, 0.0);
    }

    #[test]
    fn test_direction_within_limit_is_not_clamped() {
        let params = FilterParams::default();
        let fp = footprint();
        let r = ring(0.5, 0.5, 0.51, 0.51);
        let dir = edge_direction(&r, &fp, &ScalarReduce, &params);
        let g = ring_gradient(&r);
        let reduce = reduce_term(&r, &ScalarReduce, &params);
        let expected = g.x / (0.0 + reduce) * fp.step.x;
        assert!(g.x / reduce < fp.step_count.x);
        assert!((dir.x - expected).abs() < 1e-6);
    }

    #[test]
    fn test_direction_diagonal_uses_smaller_component() {
        let params = FilterParams::default();
        let fp = footprint();
        let r = ring(0.2, 0.5, 0.5, 0.6);
        let g = ring_gradient(&r);
        // x = 1.1 - 0.7 = 0.4, y = 0.8 - 1.0 = -0.2
        let reduce = reduce_term(&r, &ScalarReduce, &params);
        let scale = 1.0 / (0.2 + reduce);
        let dir = edge_direction(&r, &fp, &ScalarReduce, &params);
        assert!((dir.x - (g.x * scale).min(5.0) * 0.05).abs() < 1e-5);
        assert!((dir.y - (g.y * scale).max(-5.0) * 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_direction_is_finite_on_zero_ring() {
        let params = FilterParams::default();
        let dir = edge_direction(&ring(0.0, 0.0, 0.0, 0.0), &footprint(), &ScalarReduce, &params);
        assert!(dir.is_finite());
    }
}
