//! Diamond-shaped 4-tap neighborhood around the filtered pixel.

use super::{is_valid_depth, FilterParams, Footprint};
use crate::sampler::DepthSampler;
use glam::Vec2;
use serde::Serialize;

/// Depth samples at the four corners of the ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ring {
    pub tl: f32,
    pub tr: f32,
    pub bl: f32,
    pub br: f32,
}

impl Ring {
    /// Samples in TL, TR, BL, BR order.
    pub fn to_array(self) -> [f32; 4] {
        [self.tl, self.tr, self.bl, self.br]
    }

    /// Returns true if no tap landed on background depth.
    pub fn is_valid(&self, threshold: f32) -> bool {
        self.to_array().iter().all(|&d| is_valid_depth(d, threshold))
    }
}

/// Tap positions in TL, TR, BL, BR order.
///
/// The top-left tap sits at `uv + step * ring_shift`; the others follow by
/// adding the horizontal and vertical step offsets.
pub fn ring_positions(uv: Vec2, footprint: &Footprint, params: &FilterParams) -> [Vec2; 4] {
    let tl = uv + footprint.step * params.ring_shift;
    let tr = tl + footprint.horizontal();
    let bl = tl + footprint.vertical();
    let br = tr + footprint.vertical();
    [tl, tr, bl, br]
}

/// Sample the ring around `uv`.
pub fn sample_ring<S>(sampler: &S, uv: Vec2, footprint: &Footprint, params: &FilterParams) -> Ring
where
    S: DepthSampler + ?Sized,
{
    let [tl, tr, bl, br] = ring_positions(uv, footprint, params);
    Ring {
        tl: sampler.sample(tl),
        tr: sampler.sample(tr),
        bl: sampler.sample(bl),
        br: sampler.sample(br),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antialias::footprint;

    fn fixed_footprint() -> Footprint {
        Footprint { step_count: Vec2::new(4.0, 8.0), step: Vec2::new(0.04, 0.08) }
    }

    #[test]
    fn test_ring_positions_diamond() {
        let params = FilterParams::default();
        let uv = Vec2::new(0.5, 0.5);
        let [tl, tr, bl, br] = ring_positions(uv, &fixed_footprint(), &params);

        assert!((tl - Vec2::new(0.47, 0.44)).abs().max_element() < 1e-6);
        assert!((tr - Vec2::new(0.51, 0.44)).abs().max_element() < 1e-6);
        assert!((bl - Vec2::new(0.47, 0.52)).abs().max_element() < 1e-6);
        assert!((br - Vec2::new(0.51, 0.52)).abs().max_element() < 1e-6);
    }

    #[test]
    fn test_ring_is_off_center() {
        // The -0.75 shift places the diamond's center a quarter step up-left of uv.
        let params = FilterParams::default();
        let uv = Vec2::new(0.5, 0.5);
        let fp = fixed_footprint();
        let taps = ring_positions(uv, &fp, &params);
        let center = taps.iter().copied().sum::<Vec2>() / 4.0;
        let expected = uv - fp.step * 0.25;
        assert!((center - expected).abs().max_element() < 1e-6);
    }

    #[test]
    fn test_sample_ring_order() {
        let params = FilterParams::default();
        let field = |uv: Vec2| -> f32 {
            let right = if uv.x > 0.5 { 1.0 } else { 0.0 };
            let bottom = if uv.y > 0.5 { 2.0 } else { 0.0 };
            0.1 + right * 0.1 + bottom * 0.1
        };
        let ring = sample_ring(&field, Vec2::new(0.5, 0.5), &fixed_footprint(), &params);
        assert_eq!(ring.tl, 0.1);
        assert_eq!(ring.tr, 0.2);
        assert!((ring.bl - 0.3).abs() < 1e-6);
        assert!((ring.br - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_ring_validity() {
        let threshold = FilterParams::default().invalid_threshold;
        let ring = Ring { tl: 0.5, tr: 0.5, bl: 0.5, br: 0.5 };
        assert!(ring.is_valid(threshold));

        for i in 0..4 {
            let mut samples = ring.to_array();
            samples[i] = 0.0;
            let [tl, tr, bl, br] = samples;
            assert!(!Ring { tl, tr, bl, br }.is_valid(threshold), "tap {i} should invalidate");
        }
    }

    #[test]
    fn test_ring_from_adaptive_footprint() {
        let params = FilterParams::default();
        let resolution = Vec2::new(200.0, 100.0);
        let fp = footprint(0.75, resolution, &params);
        let [tl, tr, _, br] = ring_positions(Vec2::new(0.5, 0.5), &fp, &params);
        // 7 texels wide at depth 0.75
        assert!((tr.x - tl.x - 7.0 / 200.0).abs() < 1e-6);
        assert!((br.y - tr.y - 7.0 / 100.0).abs() < 1e-6);
    }
}
