use bytemuck::{Pod, Zeroable};

/// CPU mirror of the shader uniform block.
///
/// Field order and padding match the WGSL `EffectUniforms` struct: three
/// vec4s, then the time scalar padded out to a 16-byte boundary (64 bytes
/// total).
///
/// `i_mouse` and `i_date` are part of the block contract but are never
/// written after zero-initialization; the effect does not consume them.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct EffectUniforms {
    i_resolution: [f32; 4],
    i_mouse: [f32; 4],
    i_date: [f32; 4],
    i_time: f32,
    _pad: [f32; 3],
}

impl EffectUniforms {
    /// Builds a zeroed block seeded with the surface resolution.
    pub fn new(width: u32, height: u32) -> Self {
        let mut uniforms = Self::zeroed();
        uniforms.set_resolution(width, height);
        uniforms
    }

    /// Sets `iResolution` to `(width, height, 1)`.
    ///
    /// The z component is the fixed constant the effect expects, not a real
    /// depth extent.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.i_resolution = [width as f32, height as f32, 1.0, 0.0];
    }

    /// Sets `iTime`, in seconds since the renderer started.
    pub fn set_time(&mut self, seconds: f32) {
        self.i_time = seconds;
    }

    pub fn resolution(&self) -> [f32; 3] {
        [
            self.i_resolution[0],
            self.i_resolution[1],
            self.i_resolution[2],
        ]
    }

    pub fn time(&self) -> f32 {
        self.i_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn block_is_sixty_four_bytes() {
        // Must match the WGSL struct size exactly or the bind group layout's
        // min_binding_size check rejects the buffer.
        assert_eq!(std::mem::size_of::<EffectUniforms>(), 64);
    }

    // ── resolution ────────────────────────────────────────────────────────

    #[test]
    fn resolution_carries_fixed_one_in_z() {
        let u = EffectUniforms::new(800, 600);
        assert_eq!(u.resolution(), [800.0, 600.0, 1.0]);
    }

    #[test]
    fn resolution_accepts_zero_dimensions() {
        let mut u = EffectUniforms::new(800, 600);
        u.set_resolution(0, 0);
        assert_eq!(u.resolution(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn resize_leaves_time_untouched() {
        let mut u = EffectUniforms::new(800, 600);
        u.set_time(4.25);
        u.set_resolution(400, 300);
        assert_eq!(u.resolution(), [400.0, 300.0, 1.0]);
        assert_eq!(u.time(), 4.25);
    }

    // ── dead uniforms ─────────────────────────────────────────────────────

    #[test]
    fn mouse_and_date_stay_zero() {
        let mut u = EffectUniforms::new(1920, 1080);
        u.set_time(123.5);
        u.set_resolution(640, 480);
        assert_eq!(u.i_mouse, [0.0; 4]);
        assert_eq!(u.i_date, [0.0; 4]);
    }

    #[test]
    fn fresh_block_reports_zero_time() {
        assert_eq!(EffectUniforms::new(1, 1).time(), 0.0);
    }
}
