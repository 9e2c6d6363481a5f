//! depthaa - Edge-aware antialiasing for depth maps
//!
//! This library provides functionality to:
//! - Smooth stair-stepped silhouettes in a depth buffer, one pixel at a time
//! - Leave background depth and pixels touching background untouched
//! - Load, filter and save whole depth images in parallel

pub mod antialias;
pub mod cli;
pub mod config;
pub mod depth_map;
pub mod logging;
pub mod output;
pub mod pass;
pub mod sampler;
