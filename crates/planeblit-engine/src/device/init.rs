/// Initialization parameters for a headless GPU context.
///
/// Keep this structure small. Add flags only when a concrete backend
/// requirement shows up.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends wgpu may pick from.
    pub backends: wgpu::Backends,

    /// Adapter preference.
    ///
    /// Off-screen verification does not care about throughput, so the default
    /// favours whatever adapter is cheapest to wake up.
    pub power_preference: wgpu::PowerPreference,

    /// Request the software adapter straight away.
    ///
    /// When `false`, a missing hardware adapter triggers one retry against the
    /// fallback adapter before giving up.
    pub force_fallback_adapter: bool,

    /// Required wgpu features. Empty keeps the pipeline portable.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::LowPower,
            force_fallback_adapter: false,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
        }
    }
}
