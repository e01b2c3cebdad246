//! Winit host runtime.
//!
//! The event-loop thread owns the window and forwards resize/teardown to
//! the render worker; it never touches the GPU itself.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
