use wgpu::util::DeviceExt;

use crate::device;
use crate::texture::{PlaneFormat, Texture};

use super::common::{
    plane_texture_entry, tex_transform_min_binding_size, QuadVertex, TexTransformUniform,
    QUAD_INDICES, QUAD_VERTICES,
};
use super::{DrawError, RenderCtx, TexMatrix};

/// Draws a surface-filling textured quad from an RGB texture or three YUV planes.
///
/// Both pipelines, the sampler, the transform uniform and the quad geometry
/// are created in [`new`](Self::new) and live until [`release`](Self::release).
/// Draw calls submit immediately; readback waits for them.
///
/// Sampling is nearest-neighbour, so with an identity matrix and a texture the
/// size of the surface each output pixel comes from exactly one texel.
pub struct RectDrawer {
    /// `None` once released.
    gpu: Option<DrawerGpu>,
}

struct DrawerGpu {
    target_format: wgpu::TextureFormat,

    rgb_pipeline: wgpu::RenderPipeline,
    yuv_pipeline: wgpu::RenderPipeline,

    /// group 0: transform uniform + sampler, shared by both pipelines
    common_bind_group: wgpu::BindGroup,
    rgb_planes_layout: wgpu::BindGroupLayout,
    yuv_planes_layout: wgpu::BindGroupLayout,

    tex_transform_ubo: wgpu::Buffer,
    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
}

impl RectDrawer {
    /// Builds both pipelines for the format of the current target.
    pub fn new(ctx: &RenderCtx<'_>) -> Result<Self, DrawError> {
        let gpu = device::check_no_gpu_error(ctx.device, || DrawerGpu::new(ctx))
            .map_err(|message| DrawError::Gpu {
                op: "create_drawer",
                message,
            })?;

        log::debug!("created rect drawer for {:?}", gpu.target_format);
        Ok(Self { gpu: Some(gpu) })
    }

    /// Draws `texture` (an [`PlaneFormat::Rgb8`] texture) over the whole target.
    pub fn draw_rgb(
        &self,
        ctx: &RenderCtx<'_>,
        texture: &Texture,
        matrix: &TexMatrix,
    ) -> Result<(), DrawError> {
        const OP: &str = "draw_rgb";
        let gpu = self.gpu_for(OP, ctx)?;

        let view = plane_view(OP, 0, texture, PlaneFormat::Rgb8)?;

        device::check_no_gpu_error(ctx.device, || {
            let planes = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("planeblit rgb planes"),
                layout: &gpu.rgb_planes_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                }],
            });
            gpu.draw(ctx, &gpu.rgb_pipeline, &planes, matrix, "planeblit rgb pass");
        })
        .map_err(|message| DrawError::Gpu { op: OP, message })
    }

    /// Draws three [`PlaneFormat::Luminance8`] textures (Y, U, V in that order)
    /// converted to RGB.
    pub fn draw_yuv(
        &self,
        ctx: &RenderCtx<'_>,
        textures: [&Texture; 3],
        matrix: &TexMatrix,
    ) -> Result<(), DrawError> {
        const OP: &str = "draw_yuv";
        let gpu = self.gpu_for(OP, ctx)?;

        let y_view = plane_view(OP, 0, textures[0], PlaneFormat::Luminance8)?;
        let u_view = plane_view(OP, 1, textures[1], PlaneFormat::Luminance8)?;
        let v_view = plane_view(OP, 2, textures[2], PlaneFormat::Luminance8)?;

        device::check_no_gpu_error(ctx.device, || {
            let planes = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("planeblit yuv planes"),
                layout: &gpu.yuv_planes_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(y_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(u_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(v_view),
                    },
                ],
            });
            gpu.draw(ctx, &gpu.yuv_pipeline, &planes, matrix, "planeblit yuv pass");
        })
        .map_err(|message| DrawError::Gpu { op: OP, message })
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.gpu.is_none()
    }

    /// Destroys pipelines and geometry. Draws after this fail with
    /// [`DrawError::Released`]; a second call does nothing.
    pub fn release(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
            log::debug!("released rect drawer");
        }
    }

    fn gpu_for(&self, op: &'static str, ctx: &RenderCtx<'_>) -> Result<&DrawerGpu, DrawError> {
        let gpu = self.gpu.as_ref().ok_or(DrawError::Released { op })?;
        if gpu.target_format != ctx.target.format {
            return Err(DrawError::TargetFormat {
                op,
                expected: gpu.target_format,
                actual: ctx.target.format,
            });
        }
        Ok(gpu)
    }
}

impl Drop for RectDrawer {
    fn drop(&mut self) {
        self.release();
    }
}

impl DrawerGpu {
    fn new(ctx: &RenderCtx<'_>) -> Self {
        let device = ctx.device;
        let target_format = ctx.target.format;

        let common_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("planeblit common bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: tex_transform_min_binding_size(),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let rgb_planes_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("planeblit rgb planes bgl"),
            entries: &[plane_texture_entry(0)],
        });

        let yuv_planes_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("planeblit yuv planes bgl"),
            entries: &[
                plane_texture_entry(0),
                plane_texture_entry(1),
                plane_texture_entry(2),
            ],
        });

        let tex_transform_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("planeblit tex transform ubo"),
            contents: bytemuck::bytes_of(&TexTransformUniform::from(&TexMatrix::identity())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Nearest everywhere: output must be texel-exact, never filtered.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("planeblit plane sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let common_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("planeblit common bind group"),
            layout: &common_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: tex_transform_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let rgb_pipeline = build_pipeline(
            device,
            "planeblit rgb",
            include_str!("shaders/rgb.wgsl"),
            &[&common_layout, &rgb_planes_layout],
            target_format,
        );
        let yuv_pipeline = build_pipeline(
            device,
            "planeblit yuv",
            include_str!("shaders/yuv.wgsl"),
            &[&common_layout, &yuv_planes_layout],
            target_format,
        );

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("planeblit quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("planeblit quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            target_format,
            rgb_pipeline,
            yuv_pipeline,
            common_bind_group,
            rgb_planes_layout,
            yuv_planes_layout,
            tex_transform_ubo,
            quad_vbo,
            quad_ibo,
        }
    }

    /// Uploads `matrix`, records one pass drawing the quad, and submits it.
    fn draw(
        &self,
        ctx: &RenderCtx<'_>,
        pipeline: &wgpu::RenderPipeline,
        planes: &wgpu::BindGroup,
        matrix: &TexMatrix,
        label: &'static str,
    ) {
        ctx.queue.write_buffer(
            &self.tex_transform_ubo,
            0,
            bytemuck::bytes_of(&TexTransformUniform::from(matrix)),
        );

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("planeblit draw encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: ctx.target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &self.common_bind_group, &[]);
            rpass.set_bind_group(1, planes, &[]);
            rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
            rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
    }

    fn destroy(self) {
        self.tex_transform_ubo.destroy();
        self.quad_vbo.destroy();
        self.quad_ibo.destroy();
        // Pipelines and layouts have no explicit destroy; dropping frees them.
    }
}

fn plane_view<'t>(
    op: &'static str,
    slot: usize,
    texture: &'t Texture,
    expected: PlaneFormat,
) -> Result<&'t wgpu::TextureView, DrawError> {
    if texture.format() != expected {
        return Err(DrawError::FormatMismatch {
            op,
            slot,
            expected,
            actual: texture.format(),
        });
    }
    texture
        .view()
        .ok_or(DrawError::TextureDestroyed { op, slot })
}

fn build_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader_src: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[QuadVertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                // Replace, never blend: the quad covers the target and output must be exact.
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
