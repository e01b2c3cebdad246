//! Glyphrain engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the binary:
//! the wgpu device/surface layer, the fullscreen effect pass, the render
//! worker and the winit host runtime that feeds it.

pub mod device;
pub mod render;
pub mod time;
pub mod window;
pub mod worker;

pub mod logging;
