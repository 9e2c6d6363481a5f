//! Depth sampling and reduction capabilities consumed by the filter
//!
//! The filter only sees a [`DepthSampler`] and a [`DepthReduce`]. Real depth
//! buffers go through [`TextureSampler`]; tests can pass any closure
//! `Fn(Vec2) -> f32` as a synthetic depth field.

use crate::depth_map::DepthMap;
use clap::ValueEnum;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Reads depth at a continuous uv coordinate.
///
/// Implementations must be read-only: the harness calls `sample` from many
/// threads at once.
pub trait DepthSampler {
    fn sample(&self, uv: Vec2) -> f32;
}

impl<F> DepthSampler for F
where
    F: Fn(Vec2) -> f32,
{
    #[inline]
    fn sample(&self, uv: Vec2) -> f32 {
        self(uv)
    }
}

/// Sum, min and max over a batch of four depths.
pub trait DepthReduce {
    fn sum4(&self, v: [f32; 4]) -> f32;
    fn min4(&self, v: [f32; 4]) -> f32;
    fn max4(&self, v: [f32; 4]) -> f32;
}

/// Straightforward scalar reductions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarReduce;

impl DepthReduce for ScalarReduce {
    #[inline]
    fn sum4(&self, v: [f32; 4]) -> f32 {
        v[0] + v[1] + v[2] + v[3]
    }

    #[inline]
    fn min4(&self, v: [f32; 4]) -> f32 {
        v[0].min(v[1]).min(v[2].min(v[3]))
    }

    #[inline]
    fn max4(&self, v: [f32; 4]) -> f32 {
        v[0].max(v[1]).max(v[2].max(v[3]))
    }
}

/// Texel filtering applied between texel centers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Nearest texel
    Nearest,
    /// Bilinear interpolation of the four surrounding texels (default)
    #[default]
    Bilinear,
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::Nearest => write!(f, "nearest"),
            FilterMode::Bilinear => write!(f, "bilinear"),
        }
    }
}

/// What a lookup outside the depth map returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressMode {
    /// Repeat the nearest edge texel (default)
    #[default]
    Clamp,
    /// Return `border_depth`
    Border,
}

/// The `[sampling]` section of `depthaa.toml`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SamplerSettings {
    #[serde(default)]
    pub mode: FilterMode,
    #[serde(default)]
    pub address: AddressMode,
    /// Depth returned outside the map in `border` mode (default: 0, background)
    #[serde(default)]
    pub border_depth: f32,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self { mode: FilterMode::Bilinear, address: AddressMode::Clamp, border_depth: 0.0 }
    }
}

/// Samples a [`DepthMap`] with texel centers at half-integer coordinates.
#[derive(Debug, Clone, Copy)]
pub struct TextureSampler<'a> {
    map: &'a DepthMap,
    settings: SamplerSettings,
}

impl<'a> TextureSampler<'a> {
    pub fn new(map: &'a DepthMap, settings: SamplerSettings) -> Self {
        Self { map, settings }
    }

    /// Texel lookup with the configured address mode applied.
    fn texel(&self, x: i64, y: i64) -> f32 {
        let (width, height) = (self.map.width() as i64, self.map.height() as i64);
        match self.settings.address {
            AddressMode::Clamp => {
                self.map.get(x.clamp(0, width - 1) as u32, y.clamp(0, height - 1) as u32)
            }
            AddressMode::Border => {
                if x < 0 || y < 0 || x >= width || y >= height {
                    self.settings.border_depth
                } else {
                    self.map.get(x as u32, y as u32)
                }
            }
        }
    }

    fn sample_nearest(&self, uv: Vec2) -> f32 {
        let p = uv * self.map.resolution();
        self.texel(p.x.floor() as i64, p.y.floor() as i64)
    }

    fn sample_bilinear(&self, uv: Vec2) -> f32 {
        let p = uv * self.map.resolution() - Vec2::splat(0.5);
        let base = p.floor();
        let frac = p - base;
        let (x, y) = (base.x as i64, base.y as i64);

        let (x1, y1) = (x.saturating_add(1), y.saturating_add(1));

        let top = lerp(self.texel(x, y), self.texel(x1, y), frac.x);
        let bottom = lerp(self.texel(x, y1), self.texel(x1, y1), frac.x);
        lerp(top, bottom, frac.y)
    }
}

/// Exact at both ends, and exact anywhere when `a == b`.
#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl DepthSampler for TextureSampler<'_> {
    fn sample(&self, uv: Vec2) -> f32 {
        match self.settings.mode {
            FilterMode::Nearest => self.sample_nearest(uv),
            FilterMode::Bilinear => self.sample_bilinear(uv),
        }
    }
}
