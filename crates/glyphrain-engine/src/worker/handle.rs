use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use winit::window::Window;

use crate::device::GpuInit;

use super::msg::HostMsg;
use super::renderer::{FrameOutcome, Renderer};

/// Owning handle for a spawned render worker.
///
/// Returned to the host at spawn time; every later interaction with the
/// renderer goes through this handle rather than shared module state.
pub struct RendererHandle {
    tx: Sender<HostMsg>,
    worker: Option<JoinHandle<()>>,
}

impl RendererHandle {
    /// Spawns the render worker for `window` and starts its frame loop.
    ///
    /// Initialization failures are logged inside the worker and do not
    /// surface here; the handle stays valid and its messages become no-ops.
    pub fn spawn(window: Arc<Window>, init: GpuInit) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker = thread::spawn(move || run(window, init, rx));

        Self {
            tx,
            worker: Some(worker),
        }
    }

    /// Forwards new surface dimensions to the worker.
    ///
    /// Safe at any time, including before the first frame; ignored once the
    /// worker has stopped.
    pub fn resize(&self, width: u32, height: u32) {
        let _ = self.tx.send(HostMsg::Resize { width, height });
    }

    /// Stops the frame loop and waits for the worker to exit.
    ///
    /// Idempotent; a second call is a no-op. Joining the worker drops the
    /// renderer and with it every GPU resource it owned.
    pub fn shutdown(&mut self) {
        let _ = self.tx.send(HostMsg::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("render worker panicked");
            }
        }
    }
}

impl Drop for RendererHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Worker entry point: initialize, then alternate message drains with frame
/// ticks until told to stop.
///
/// FIFO presentation inside `Renderer::frame` blocks at the display refresh,
/// which is what paces this loop; a slow frame delays the next tick rather
/// than being skipped.
fn run(window: Arc<Window>, init: GpuInit, rx: Receiver<HostMsg>) {
    let mut renderer = match Renderer::initialize(window, init) {
        Ok(renderer) => renderer,
        Err(err) => {
            log::error!("renderer initialization failed: {err}");
            return;
        }
    };

    loop {
        match drain_host_messages(&rx) {
            HostDirective::Shutdown => return,
            HostDirective::Continue(Some((width, height))) => renderer.resize(width, height),
            HostDirective::Continue(None) => {}
        }

        if renderer.frame() == FrameOutcome::Stop {
            return;
        }
    }
}

/// What the worker should do after a message drain.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum HostDirective {
    /// Keep running, optionally applying the most recent resize first.
    Continue(Option<(u32, u32)>),
    /// Stop the loop; either an explicit shutdown or a hung-up channel.
    Shutdown,
}

/// Applies all pending host messages without blocking.
///
/// Resizes coalesce to the most recent pair — ticks only ever observe the
/// latest dimensions anyway. A disconnected channel counts as shutdown.
fn drain_host_messages(rx: &Receiver<HostMsg>) -> HostDirective {
    let mut resize = None;

    loop {
        match rx.try_recv() {
            Ok(HostMsg::Resize { width, height }) => resize = Some((width, height)),
            Ok(HostMsg::Shutdown) => return HostDirective::Shutdown,
            Err(TryRecvError::Disconnected) => return HostDirective::Shutdown,
            Err(TryRecvError::Empty) => return HostDirective::Continue(resize),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── drain_host_messages ───────────────────────────────────────────────

    #[test]
    fn drain_empty_channel_continues_without_resize() {
        let (_tx, rx) = mpsc::channel();
        assert_eq!(drain_host_messages(&rx), HostDirective::Continue(None));
    }

    #[test]
    fn drain_coalesces_resizes_to_most_recent() {
        let (tx, rx) = mpsc::channel();
        tx.send(HostMsg::Resize { width: 800, height: 600 }).unwrap();
        tx.send(HostMsg::Resize { width: 400, height: 300 }).unwrap();
        assert_eq!(
            drain_host_messages(&rx),
            HostDirective::Continue(Some((400, 300)))
        );
    }

    #[test]
    fn drain_shutdown_wins_over_queued_resizes() {
        let (tx, rx) = mpsc::channel();
        tx.send(HostMsg::Resize { width: 800, height: 600 }).unwrap();
        tx.send(HostMsg::Shutdown).unwrap();
        assert_eq!(drain_host_messages(&rx), HostDirective::Shutdown);
    }

    #[test]
    fn drain_treats_hangup_as_shutdown() {
        let (tx, rx) = mpsc::channel::<HostMsg>();
        drop(tx);
        assert_eq!(drain_host_messages(&rx), HostDirective::Shutdown);
    }

    #[test]
    fn drain_consumes_resizes_before_empty() {
        let (tx, rx) = mpsc::channel();
        tx.send(HostMsg::Resize { width: 1, height: 2 }).unwrap();
        drain_host_messages(&rx);
        assert_eq!(drain_host_messages(&rx), HostDirective::Continue(None));
    }

    // ── RendererHandle ────────────────────────────────────────────────────

    /// Builds a handle around a stub worker that drains messages the way the
    /// real loop does, without needing a window or a GPU.
    fn stub_handle() -> RendererHandle {
        let (tx, rx) = mpsc::channel();
        let worker = thread::spawn(move || {
            loop {
                match rx.recv() {
                    Ok(HostMsg::Shutdown) | Err(_) => return,
                    Ok(HostMsg::Resize { .. }) => {}
                }
            }
        });
        RendererHandle {
            tx,
            worker: Some(worker),
        }
    }

    #[test]
    fn shutdown_twice_is_idempotent() {
        let mut handle = stub_handle();
        handle.shutdown();
        handle.shutdown();
        assert!(handle.worker.is_none());
    }

    #[test]
    fn resize_after_shutdown_is_a_noop() {
        let mut handle = stub_handle();
        handle.shutdown();
        handle.resize(640, 480);
    }

    #[test]
    fn drop_joins_the_worker() {
        let handle = stub_handle();
        drop(handle);
    }
}
