//! Fullscreen effect rendering.
//!
//! One pipeline, one static quad, one uniform block. The fragment stage is
//! the opaque effect artifact; this module only owns its GPU plumbing.

mod rain;
mod uniforms;

pub use rain::{PipelineError, RainRenderer, ShaderStage};
pub use uniforms::EffectUniforms;
