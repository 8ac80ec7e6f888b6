//! WebGPU rendering module
//!
//! The scene is built on the CPU in CSS pixels every frame and drawn as flat
//! triangles plus an optional textured avatar quad.

use std::fmt;

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod sprite;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{Scene, build_scene};
pub use vertex::{SpriteVertex, Vertex};

/// Renderer setup and upload failures
#[derive(Debug)]
pub enum RenderError {
    Device(wgpu::RequestDeviceError),
    NoSurfaceFormat,
    SpriteSize { width: u32, height: u32, len: usize },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(e) => write!(f, "failed to create device: {e}"),
            Self::NoSurfaceFormat => write!(f, "surface reports no supported formats"),
            Self::SpriteSize { width, height, len } => {
                write!(f, "sprite {width}x{height} does not match {len} bytes of RGBA")
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        Self::Device(e)
    }
}
