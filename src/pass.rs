//! Whole-image filter pass
//!
//! Invokes the per-pixel filter at every texel center of a [`DepthMap`], with
//! the map's own dimensions as the resolution. Rows are filtered in parallel
//! with rayon; the result does not depend on scheduling.

use crate::antialias::{filter_traced, FilterOutcome, FilterParams, FilterTrace};
use crate::depth_map::DepthMap;
use crate::sampler::{SamplerSettings, ScalarReduce, TextureSampler};
use rayon::prelude::*;
use serde::Serialize;

/// Per-outcome pixel counts for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    /// Center was background
    pub passthrough_invalid: usize,
    /// Ring touched background
    pub passthrough_ring: usize,
    /// Near estimate selected
    pub near: usize,
    /// Far estimate selected
    pub far: usize,
}

impl PassStats {
    pub fn record(&mut self, outcome: FilterOutcome) {
        match outcome {
            FilterOutcome::InvalidCenter => self.passthrough_invalid += 1,
            FilterOutcome::InvalidRing => self.passthrough_ring += 1,
            FilterOutcome::Near => self.near += 1,
            FilterOutcome::Far => self.far += 1,
        }
    }

    pub fn merge(self, other: PassStats) -> PassStats {
        PassStats {
            passthrough_invalid: self.passthrough_invalid + other.passthrough_invalid,
            passthrough_ring: self.passthrough_ring + other.passthrough_ring,
            near: self.near + other.near,
            far: self.far + other.far,
        }
    }

    pub fn total(&self) -> usize {
        self.passthrough_invalid + self.passthrough_ring + self.near + self.far
    }

    /// Pixels that went through the resample stage.
    pub fn filtered(&self) -> usize {
        self.near + self.far
    }
}

impl std::fmt::Display for PassStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pixels: {} far, {} near, {} background, {} ring-rejected",
            self.total(),
            self.far,
            self.near,
            self.passthrough_invalid,
            self.passthrough_ring
        )
    }
}

/// Filter every pixel of `map`.
pub fn apply(map: &DepthMap, sampling: &SamplerSettings, params: &FilterParams) -> DepthMap {
    apply_with_stats(map, sampling, params).0
}

/// Filter every pixel of `map` and count how each pixel was resolved.
pub fn apply_with_stats(
    map: &DepthMap,
    sampling: &SamplerSettings,
    params: &FilterParams,
) -> (DepthMap, PassStats) {
    let (width, height) = map.dimensions();
    let sampler = TextureSampler::new(map, *sampling);
    let resolution = map.resolution();

    tracing::debug!(width, height, mode = %sampling.mode, "starting depth antialias pass");

    let mut output = map.clone();
    let stats = output
        .as_mut_slice()
        .par_chunks_mut(width as usize)
        .enumerate()
        .map(|(y, row)| {
            let mut stats = PassStats::default();
            for (x, out) in row.iter_mut().enumerate() {
                let uv = map.pixel_center_uv(x as u32, y as u32);
                let trace = filter_traced(uv, resolution, &sampler, &ScalarReduce, params);
                stats.record(trace.outcome);
                *out = trace.depth;
            }
            stats
        })
        .reduce(PassStats::default, PassStats::merge);

    tracing::debug!(%stats, "finished depth antialias pass");

    (output, stats)
}

/// Filter one pixel of `map` and keep every intermediate value.
///
/// # Panics
///
/// Panics if `(x, y)` is outside the map.
pub fn trace_pixel(
    map: &DepthMap,
    x: u32,
    y: u32,
    sampling: &SamplerSettings,
    params: &FilterParams,
) -> FilterTrace {
    assert!(x < map.width() && y < map.height(), "pixel ({x}, {y}) outside depth map");
    let sampler = TextureSampler::new(map, *sampling);
    filter_traced(map.pixel_center_uv(x, y), map.resolution(), &sampler, &ScalarReduce, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::FilterMode;

    /// Background on the left, a surface at `depth` on the right.
    fn half_background(width: u32, height: u32, depth: f32) -> DepthMap {
        DepthMap::from_fn(width, height, |x, _| if x < width / 2 { 0.0 } else { depth })
    }

    /// Two surfaces meeting along a shallow diagonal staircase.
    fn staircase(width: u32, height: u32) -> DepthMap {
        DepthMap::from_fn(width, height, |x, y| if x / 4 > y { 0.3 } else { 0.7 })
    }

    #[test]
    fn test_flat_map_unchanged() {
        let map = DepthMap::filled(32, 24, 0.42);
        let (out, stats) = apply_with_stats(&map, &SamplerSettings::default(), &FilterParams::default());
        assert_eq!(out, map);
        assert_eq!(stats.far, 32 * 24);
    }

    #[test]
    fn test_background_untouched() {
        let map = half_background(32, 16, 0.5);
        let out = apply(&map, &SamplerSettings::default(), &FilterParams::default());
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(out.get(x, y), 0.0);
            }
        }
    }

    #[test]
    fn test_stats_count_every_pixel() {
        let map = half_background(32, 16, 0.5);
        let (_, stats) = apply_with_stats(&map, &SamplerSettings::default(), &FilterParams::default());
        assert_eq!(stats.total(), 32 * 16);
        assert!(stats.passthrough_invalid >= 16 * 16);
        assert!(stats.passthrough_ring > 0);
    }

    #[test]
    fn test_output_within_input_range() {
        let map = staircase(64, 32);
        let out = apply(&map, &SamplerSettings::default(), &FilterParams::default());
        for &d in out.as_slice() {
            assert!((0.3 - 1e-6..=0.7 + 1e-6).contains(&d), "depth {d} escaped the input range");
        }
    }

    #[test]
    fn test_staircase_gets_smoothed() {
        let map = staircase(64, 32);
        let (out, stats) = apply_with_stats(&map, &SamplerSettings::default(), &FilterParams::default());
        assert!(stats.filtered() > 0);
        let changed = out.as_slice().iter().zip(map.as_slice()).filter(|(a, b)| a != b).count();
        assert!(changed > 0, "a staircase edge should be modified");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let map = staircase(48, 40);
        let params = FilterParams::default();
        let sampling = SamplerSettings { mode: FilterMode::Nearest, ..Default::default() };
        let out = apply(&map, &sampling, &params);
        for y in 0..map.height() {
            for x in 0..map.width() {
                let trace = trace_pixel(&map, x, y, &sampling, &params);
                assert_eq!(out.get(x, y).to_bits(), trace.depth.to_bits());
            }
        }
    }

    #[test]
    fn test_stats_merge_and_display() {
        let mut a = PassStats::default();
        a.record(FilterOutcome::Far);
        a.record(FilterOutcome::Near);
        let mut b = PassStats::default();
        b.record(FilterOutcome::InvalidCenter);
        b.record(FilterOutcome::InvalidRing);
        let merged = a.merge(b);
        assert_eq!(merged.total(), 4);
        assert_eq!(merged.filtered(), 2);
        assert_eq!(format!("{}", merged), "4 pixels: 1 far, 1 near, 1 background, 1 ring-rejected");
    }

    #[test]
    #[should_panic(expected = "outside depth map")]
    fn test_trace_pixel_out_of_bounds() {
        let map = DepthMap::filled(4, 4, 0.5);
        trace_pixel(&map, 4, 0, &SamplerSettings::default(), &FilterParams::default());
    }
}
