//! Edge-directed antialiasing for depth maps
//!
//! Smooths staircase artifacts along depth discontinuities while leaving flat
//! regions and background depth untouched. Each call filters one pixel and is
//! a pure function of its inputs, so the harness can fan out freely.
//!
//! # Module Structure
//!
//! - [`footprint`] - Depth-adaptive sizing of the sampling neighborhood
//! - [`ring`] - Diamond-shaped 4-tap neighborhood sampling
//! - [`edge`] - Edge direction estimation from the ring
//! - [`blend`] - Near/far resampling along the edge and the bounded selection
//!
//! # Pipeline
//!
//! | Stage | Early exit |
//! |-------|------------|
//! | Validity gate | center depth below threshold |
//! | Footprint | - |
//! | Ring sampler | any ring tap below threshold |
//! | Edge estimator | - |
//! | Dual-field resample + bounded blend | - |

pub mod blend;
pub mod edge;
pub mod footprint;
pub mod ring;

pub use blend::{local_bounds, resample, select, Bounds, DualField};
pub use edge::edge_direction;
pub use footprint::{depth_factor, footprint, Footprint};
pub use ring::{ring_positions, sample_ring, Ring};

use crate::sampler::{DepthReduce, DepthSampler};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Depth values below this are background (no geometry).
pub const INVALID_DEPTH_THRESHOLD: f32 = 0.001;

/// Returns true if `depth` carries geometry under the given threshold.
///
/// NaN never passes, so it is passed through like background depth.
#[inline]
pub fn is_valid_depth(depth: f32, threshold: f32) -> bool {
    depth >= threshold
}

/// Tuning parameters for the depth antialiasing filter.
///
/// The defaults are the reference tuning. They are exposed so that the
/// `[filter]` table of `depthaa.toml` can override them, but the filter's
/// invariants (inclusive bounds, passthrough gates) hold for any valid set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterParams {
    /// Depth below this value is treated as background
    pub invalid_threshold: f32,
    /// Footprint in texels for the nearest surfaces
    pub min_steps: Vec2,
    /// Footprint in texels for the farthest surfaces
    pub max_steps: Vec2,
    /// Shift of the top-left ring tap, in units of the step vector
    pub ring_shift: f32,
    /// Multiplier applied to the ring sum when computing the reduce term
    pub reduce_mul: f32,
    /// Floor of the reduce term
    pub reduce_min: f32,
    /// Offset along the edge direction for the near field
    pub near_offset: f32,
    /// Offset along the edge direction for the far field
    pub far_offset: f32,
}

impl FilterParams {
    pub const DEFAULT_INVALID_THRESHOLD: f32 = INVALID_DEPTH_THRESHOLD;
    pub const DEFAULT_MIN_STEPS: Vec2 = Vec2::new(4.0, 4.0);
    pub const DEFAULT_MAX_STEPS: Vec2 = Vec2::new(10.0, 10.0);
    /// Not the diamond's half diagonal (-0.5); the off-center shift is part of the tuning.
    pub const DEFAULT_RING_SHIFT: f32 = -0.75;
    pub const DEFAULT_REDUCE_MUL: f32 = 0.03;
    pub const DEFAULT_REDUCE_MIN: f32 = 0.008;
    pub const DEFAULT_NEAR_OFFSET: f32 = 0.2;
    pub const DEFAULT_FAR_OFFSET: f32 = 0.5;
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            invalid_threshold: Self::DEFAULT_INVALID_THRESHOLD,
            min_steps: Self::DEFAULT_MIN_STEPS,
            max_steps: Self::DEFAULT_MAX_STEPS,
            ring_shift: Self::DEFAULT_RING_SHIFT,
            reduce_mul: Self::DEFAULT_REDUCE_MUL,
            reduce_min: Self::DEFAULT_REDUCE_MIN,
            near_offset: Self::DEFAULT_NEAR_OFFSET,
            far_offset: Self::DEFAULT_FAR_OFFSET,
        }
    }
}

/// How the filter arrived at its result for one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterOutcome {
    /// Center depth was background; returned unchanged
    InvalidCenter,
    /// A ring tap was background; center returned unchanged
    InvalidRing,
    /// Far estimate left the local bounds; near estimate returned
    Near,
    /// Far estimate was within the local bounds and returned
    Far,
}

impl FilterOutcome {
    /// Returns true if the pixel was left untouched.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, FilterOutcome::InvalidCenter | FilterOutcome::InvalidRing)
    }
}

impl std::fmt::Display for FilterOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterOutcome::InvalidCenter => write!(f, "invalid-center"),
            FilterOutcome::InvalidRing => write!(f, "invalid-ring"),
            FilterOutcome::Near => write!(f, "near"),
            FilterOutcome::Far => write!(f, "far"),
        }
    }
}

/// Every intermediate value computed while filtering one pixel.
///
/// Stages that were skipped by an early exit are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterTrace {
    pub uv: Vec2,
    pub resolution: Vec2,
    pub center: f32,
    pub footprint: Option<Footprint>,
    pub ring: Option<Ring>,
    pub direction: Option<Vec2>,
    pub fields: Option<DualField>,
    pub bounds: Option<Bounds>,
    pub outcome: FilterOutcome,
    /// The filtered depth
    pub depth: f32,
}

impl FilterTrace {
    fn passthrough(uv: Vec2, resolution: Vec2, center: f32, outcome: FilterOutcome) -> Self {
        Self {
            uv,
            resolution,
            center,
            footprint: None,
            ring: None,
            direction: None,
            fields: None,
            bounds: None,
            outcome,
            depth: center,
        }
    }
}

/// Filter the depth at `uv` and return the smoothed value.
///
/// `resolution` is the pixel size of the render target the sampler reads from.
/// Background depth, and any pixel whose neighborhood touches background depth,
/// is returned unchanged.
///
/// # Example
///
/// ```
/// use depthaa::antialias::{filter_depth, FilterParams};
/// use depthaa::sampler::ScalarReduce;
/// use glam::Vec2;
///
/// let flat = |_uv: Vec2| 0.5_f32;
/// let depth = filter_depth(
///     Vec2::new(0.5, 0.5),
///     Vec2::new(64.0, 64.0),
///     &flat,
///     &ScalarReduce,
///     &FilterParams::default(),
/// );
/// assert_eq!(depth, 0.5);
/// ```
pub fn filter_depth<S, R>(
    uv: Vec2,
    resolution: Vec2,
    sampler: &S,
    reducer: &R,
    params: &FilterParams,
) -> f32
where
    S: DepthSampler + ?Sized,
    R: DepthReduce + ?Sized,
{
    filter_traced(uv, resolution, sampler, reducer, params).depth
}

/// Filter the depth at `uv`, keeping every intermediate value.
///
/// Produces the same `depth` as [`filter_depth`].
pub fn filter_traced<S, R>(
    uv: Vec2,
    resolution: Vec2,
    sampler: &S,
    reducer: &R,
    params: &FilterParams,
) -> FilterTrace
where
    S: DepthSampler + ?Sized,
    R: DepthReduce + ?Sized,
{
    let center = sampler.sample(uv);
    if !is_valid_depth(center, params.invalid_threshold) {
        return FilterTrace::passthrough(uv, resolution, center, FilterOutcome::InvalidCenter);
    }

    let footprint = footprint(center, resolution, params);

    let ring = sample_ring(sampler, uv, &footprint, params);
    if !ring.is_valid(params.invalid_threshold) {
        return FilterTrace {
            footprint: Some(footprint),
            ring: Some(ring),
            ..FilterTrace::passthrough(uv, resolution, center, FilterOutcome::InvalidRing)
        };
    }

    let direction = edge_direction(&ring, &footprint, reducer, params);
    let fields = resample(sampler, uv, direction, params);
    let bounds = local_bounds(center, &ring, reducer);
    let (depth, outcome) = select(&fields, &bounds);

    FilterTrace {
        uv,
        resolution,
        center,
        footprint: Some(footprint),
        ring: Some(ring),
        direction: Some(direction),
        fields: Some(fields),
        bounds: Some(bounds),
        outcome,
        depth,
    }
}
