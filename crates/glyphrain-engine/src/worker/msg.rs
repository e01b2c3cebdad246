/// Messages delivered by the hosting thread to the render worker.
///
/// The surface handle itself travels once, at spawn time; everything after
/// that is dimensions or teardown.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HostMsg {
    /// New surface dimensions in physical pixels.
    Resize { width: u32, height: u32 },

    /// Stop the frame loop and wind the worker down.
    Shutdown,
}
