//! Depth-adaptive sizing of the sampling neighborhood.
//!
//! Distant surfaces change less per texel in screen space, so the footprint
//! grows with depth to keep the edge estimate stable across the depth range.

use super::FilterParams;
use glam::Vec2;
use serde::Serialize;

/// Size of the sampling neighborhood for one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Footprint {
    /// Neighborhood size in texels, between `min_steps` and `max_steps`
    pub step_count: Vec2,
    /// `step_count` converted to uv units
    pub step: Vec2,
}

impl Footprint {
    /// Offset between the left and right ring taps.
    pub fn horizontal(&self) -> Vec2 {
        Vec2::new(self.step.x, 0.0)
    }

    /// Offset between the top and bottom ring taps.
    pub fn vertical(&self) -> Vec2 {
        Vec2::new(0.0, self.step.y)
    }
}

/// Blend weight derived from depth: 1 at the camera, 0 at the far plane.
///
/// Depth above 1 is treated as the far plane. [`footprint`] interpolates from
/// `min_steps` to `max_steps` by the complement `1 - depth_factor`, not by the
/// factor itself, so the footprint grows with depth.
pub fn depth_factor(depth: f32) -> f32 {
    (1.0 - depth).max(0.0).sqrt()
}

/// Compute the neighborhood footprint for a pixel at `depth`.
pub fn footprint(depth: f32, resolution: Vec2, params: &FilterParams) -> Footprint {
    // depth_factor falls with depth, so weight the far end by its complement.
    let weight = 1.0 - depth_factor(depth);
    let step_count = params.min_steps.lerp(params.max_steps, weight);
    Footprint { step_count, step: step_count / resolution }
}
