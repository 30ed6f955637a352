//! WebGPU rendering module
//!
//! Vertex-buffer pipelines over a shared camera/light bind group; scene
//! groups are converted to vertices in `shapes` and uploaded per frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::GlobeRenderState;
pub use vertex::{FlatVertex, MeshVertex};
