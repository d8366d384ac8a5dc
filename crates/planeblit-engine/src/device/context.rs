use crate::render::{RenderCtx, RenderTarget};

use super::error::ContextError;
use super::init::GpuInit;
use super::surface::{self, OffscreenSurface};

/// wgpu core objects. Cloning shares the underlying device.
#[derive(Clone)]
struct GpuCore {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

/// Owns a headless GPU context and at most one off-screen surface.
///
/// This type is the low-level rendering context:
/// - creates and stores Adapter/Device/Queue (or borrows them from a shared context)
/// - allocates the fixed-size off-screen colour target
/// - binds the pair as "current" by handing out a [`RenderCtx`]
/// - releases everything deterministically in [`release`](Self::release) or on drop
///
/// Every scenario creates and releases its own context; nothing is created
/// implicitly.
pub struct GpuSurfaceContext {
    /// `None` once released.
    core: Option<GpuCore>,

    /// Current off-screen target, if one was created.
    surface: Option<OffscreenSurface>,

    /// `true` when the device belongs to another context.
    shared: bool,
}

impl GpuSurfaceContext {
    /// Creates a context, blocking on adapter/device acquisition.
    ///
    /// With `share = Some(other)` the new context reuses `other`'s device and
    /// queue, so GPU objects created in either context are visible in both.
    pub fn create(share: Option<&GpuSurfaceContext>, init: &GpuInit) -> Result<Self, ContextError> {
        pollster::block_on(Self::create_async(share, init))
    }

    /// Async variant of [`create`](Self::create).
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn create_async(
        share: Option<&GpuSurfaceContext>,
        init: &GpuInit,
    ) -> Result<Self, ContextError> {
        if let Some(other) = share {
            let core = other.core.clone().ok_or(ContextError::Released)?;
            log::debug!("created context sharing device with an existing context");
            return Ok(Self {
                core: Some(core),
                surface: None,
                shared: true,
            });
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let adapter = request_adapter(&instance, init).await?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("planeblit device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self {
            core: Some(GpuCore {
                adapter,
                device,
                queue,
            }),
            surface: None,
            shared: false,
        })
    }

    /// Allocates the off-screen drawable of exactly `width`×`height` pixels.
    ///
    /// An existing surface is destroyed first.
    pub fn create_surface(&mut self, width: u32, height: u32) -> Result<(), ContextError> {
        let core = self.core.as_ref().ok_or(ContextError::Released)?;

        let max = core.device.limits().max_texture_dimension_2d;
        if !surface::validate_size(width, height, max) {
            return Err(ContextError::InvalidSurfaceSize { width, height, max });
        }

        if let Some(old) = self.surface.take() {
            old.destroy();
        }

        let new_surface = super::check_no_gpu_error(&core.device, || {
            OffscreenSurface::new(&core.device, width, height)
        })
        .map_err(|message| ContextError::Gpu {
            op: "create_surface",
            message,
        })?;

        log::debug!("created {width}x{height} off-screen surface");
        self.surface = Some(new_surface);
        Ok(())
    }

    /// Binds context + surface and returns the handle draw/readback calls take.
    ///
    /// The returned [`RenderCtx`] borrows the context, so the context cannot be
    /// released or its surface replaced while the handle is alive.
    pub fn make_current(&self) -> Result<RenderCtx<'_>, ContextError> {
        let core = self.core.as_ref().ok_or(ContextError::Released)?;
        let surface = self.surface.as_ref().ok_or(ContextError::NoSurface)?;

        Ok(RenderCtx::new(
            &core.device,
            &core.queue,
            RenderTarget::new(surface),
        ))
    }

    /// Returns the current surface, if any.
    pub fn surface(&self) -> Option<&OffscreenSurface> {
        self.surface.as_ref()
    }

    /// Returns `true` once [`release`](Self::release) has run.
    pub fn is_released(&self) -> bool {
        self.core.is_none()
    }

    /// Returns `true` if this context borrows another context's device.
    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// Adapter details, for diagnostics.
    pub fn adapter_info(&self) -> Option<wgpu::AdapterInfo> {
        self.core.as_ref().map(|c| c.adapter.get_info())
    }

    /// Waits for outstanding GPU work, then destroys the surface and drops the
    /// device handles.
    ///
    /// Safe to call more than once; later calls do nothing.
    pub fn release(&mut self) {
        let Some(core) = self.core.take() else { return };

        if let Err(err) = core.device.poll(wgpu::PollType::wait_indefinitely()) {
            log::warn!("device poll during release failed: {err}");
        }

        if let Some(surface) = self.surface.take() {
            surface.destroy();
        }

        log::debug!(
            "released {} context",
            if self.shared { "shared" } else { "owned" }
        );
        drop(core);
    }
}

impl Drop for GpuSurfaceContext {
    fn drop(&mut self) {
        self.release();
    }
}

async fn request_adapter(
    instance: &wgpu::Instance,
    init: &GpuInit,
) -> Result<wgpu::Adapter, ContextError> {
    let options = wgpu::RequestAdapterOptions {
        power_preference: init.power_preference,
        compatible_surface: None,
        force_fallback_adapter: init.force_fallback_adapter,
    };

    match instance.request_adapter(&options).await {
        Ok(adapter) => Ok(adapter),
        Err(err) if !init.force_fallback_adapter => {
            log::debug!("no hardware adapter ({err}); retrying with the fallback adapter");
            instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    force_fallback_adapter: true,
                    ..options
                })
                .await
                .map_err(ContextError::NoAdapter)
        }
        Err(err) => Err(ContextError::NoAdapter(err)),
    }
}
