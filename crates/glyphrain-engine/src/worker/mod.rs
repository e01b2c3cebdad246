//! Render worker.
//!
//! All wgpu calls happen on one dedicated thread. The host owns a
//! [`RendererHandle`] and talks to the worker exclusively through
//! [`HostMsg`] values; the worker applies pending messages between frame
//! ticks and otherwise paces itself against presentation.

mod handle;
mod msg;
mod renderer;

pub use handle::RendererHandle;
pub use msg::HostMsg;
pub use renderer::{FrameOutcome, Renderer, RendererError};
