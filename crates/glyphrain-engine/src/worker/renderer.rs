use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::device::{Gpu, GpuError, GpuInit, SurfaceErrorAction};
use crate::render::{EffectUniforms, PipelineError, RainRenderer};
use crate::time::FrameClock;

/// Errors raised while bringing the renderer up.
///
/// Initialization failure is terminal for the instance; the host must spawn
/// a new worker to retry.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("no compatible graphics context: {0}")]
    Init(#[from] GpuError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Whether the frame loop may continue after a tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Continue,
    Stop,
}

/// Owns the full lifecycle of one animated fullscreen effect on one surface.
///
/// Exactly one pipeline and one vertex buffer exist per instance; ticks only
/// ever update uniforms and record a draw.
pub struct Renderer {
    window: Arc<Window>,
    gpu: Gpu,
    effect: RainRenderer,
    clock: FrameClock,
    uniforms: EffectUniforms,

    last_stats: Instant,
    frames_since_stats: u32,
}

impl Renderer {
    /// Acquires the graphics context, builds the effect pipeline, uploads
    /// the quad and captures the start timestamp.
    pub fn initialize(window: Arc<Window>, init: GpuInit) -> Result<Self, RendererError> {
        let gpu = pollster::block_on(Gpu::new(window.clone(), init))?;
        log::info!(
            "renderer initialized on {} ({:?})",
            gpu.adapter_info().name,
            gpu.surface_format()
        );

        let effect = RainRenderer::new(gpu.device(), gpu.surface_format())?;

        let size = gpu.size();
        Ok(Self {
            window,
            gpu,
            effect,
            clock: FrameClock::new(),
            uniforms: EffectUniforms::new(size.width, size.height),
            last_stats: Instant::now(),
            frames_since_stats: 0,
        })
    }

    /// Updates the surface dimensions and viewport.
    ///
    /// Shaders and buffers are untouched; safe to call before the first
    /// frame and idempotent at any point after.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(PhysicalSize::new(width, height));
        self.uniforms.set_resolution(width, height);
    }

    /// One frame tick: advance the clock, push uniforms, draw the quad,
    /// present.
    pub fn frame(&mut self) -> FrameOutcome {
        let ft = self.clock.tick();
        self.uniforms.set_time(ft.elapsed);

        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface is out of memory; stopping frame loop");
                        FrameOutcome::Stop
                    }
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        FrameOutcome::Continue
                    }
                };
            }
        };

        self.effect
            .render(self.gpu.queue(), &mut frame.encoder, &frame.view, &self.uniforms);

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        self.frames_since_stats += 1;
        if ft.now.duration_since(self.last_stats) >= Duration::from_secs(1) {
            let res = self.uniforms.resolution();
            log::debug!(
                "iTime={:.3}s frames={} res={}x{}",
                self.uniforms.time(),
                self.frames_since_stats,
                res[0],
                res[1],
            );
            self.last_stats = ft.now;
            self.frames_since_stats = 0;
        }

        FrameOutcome::Continue
    }
}
