//! Inspection collaborators around `rimlens-core`: text rendering of decode
//! results and the `rim-display` binary.

pub mod render;

pub use render::{render, RenderOptions};
