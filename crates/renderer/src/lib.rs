//! Renderer: wgpu device/surface setup and the per-frame draw path.
//!
//! Geometry arrives as CPU mesh data and is uploaded once at startup. Every
//! frame clears color + depth, rebinds pipeline and buffers from scratch and
//! issues one indexed draw covering the full index count; no state caching.

pub mod axes;
pub mod buffer;
pub mod layout;
pub mod mesh;
pub mod overlay;

use std::num::NonZeroU64;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::{
    Backends, BindGroup, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType, BlendState,
    Buffer, BufferBindingType, BufferUsages, ColorTargetState, ColorWrites,
    CommandEncoderDescriptor, DepthBiasState, DepthStencilState, Device, DeviceDescriptor,
    Extent3d, Features, FragmentState, Instance, InstanceDescriptor, Limits, LoadOp, Operations,
    PipelineLayoutDescriptor, PowerPreference, PresentMode, Queue, RenderPassColorAttachment,
    RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor, ShaderModuleDescriptor,
    ShaderSource, ShaderStages, StoreOp, Surface, SurfaceConfiguration, SurfaceError,
    TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
    TextureViewDescriptor, VertexState, util::DeviceExt,
};
use winit::{dpi::PhysicalSize, window::Window};

use asset::MeshData;

use crate::axes::{AXIS_VERTICES, AxisVertex};
use crate::buffer::VertexBuffer;
use crate::mesh::{GpuMesh, Vertex};
use crate::overlay::OverlayRenderer;

pub use crate::overlay::OverlayFrame;

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.08,
    a: 1.0,
};

/// Everything the renderer needs for one frame, computed by the app layer.
#[derive(Clone, Copy, Debug)]
pub struct SceneFrame {
    pub view_proj: Mat4,
    pub model: Mat4,
}

/// Per-frame uniform (16-byte aligned columns).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
}

pub struct GpuState {
    // Surface
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    // Pipelines & geometry
    mesh_pipeline: RenderPipeline,
    axis_pipeline: RenderPipeline,
    mesh: GpuMesh,
    axes: VertexBuffer,

    // Frame uniform
    frame_bg: BindGroup,
    frame_buf: Buffer,

    // Overlay
    overlay: OverlayRenderer,

    // Depth
    depth_view: TextureView,

    // Size cache
    width: u32,
    height: u32,
}

impl GpuState {
    /// Create GPU state bound to an Arc<Window> and upload the mesh.
    /// Adapter/device failures are fatal; there is no recovery path for a
    /// session without a GPU.
    pub async fn new(window: Arc<Window>, backends: Backends, mesh_data: &MeshData) -> Self {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        // Instance & surface
        let instance = Instance::new(InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance
            .create_surface(window.clone())
            .expect("create_surface failed");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("No suitable GPU adapter");
        log::info!("Adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("Veles3D Device"),
                    required_features: Features::empty(),
                    required_limits: Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .expect("request_device failed");

        // Surface format (prefer sRGB)
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, &surface_config);

        // ==== Shaders ====
        let mesh_shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Mesh WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });
        let axis_shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Axes WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/axes.wgsl").into()),
        });

        // ==== Frame uniform BGL/BG ====
        let frame_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Frame BGL"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        NonZeroU64::new(std::mem::size_of::<FrameUniform>() as u64).unwrap(),
                    ),
                },
                count: None,
            }],
        });

        // Identity matrices until the first frame supplies real ones.
        let frame_init = FrameUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let frame_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame UBO"),
            contents: bytemuck::bytes_of(&frame_init),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });
        let frame_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame BG"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buf.as_entire_binding(),
            }],
        });

        // ==== Pipelines ====
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Frame PipelineLayout"),
            bind_group_layouts: &[&frame_bgl],
            push_constant_ranges: &[],
        });

        let vertex_layout = Vertex::layout();
        let mesh_pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout.buffer_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                // Double-sided, matching the GL demo state.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let axis_layout = AxisVertex::layout();
        let axis_pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Axes Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &axis_shader,
                entry_point: Some("vs_main"),
                buffers: &[axis_layout.buffer_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &axis_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // ==== Geometry upload ====
        let mesh = GpuMesh::upload(&device, mesh_data);
        log::info!(
            "Uploaded mesh: {} vertices, {} indices",
            mesh_data.vertices.len(),
            mesh.index_count()
        );
        let axes = VertexBuffer::new(&device, bytemuck::cast_slice(&AXIS_VERTICES));

        let overlay = OverlayRenderer::new(&device, surface_format, DEPTH_FORMAT);

        Self {
            surface,
            surface_config,
            device,
            queue,
            mesh_pipeline,
            axis_pipeline,
            mesh,
            axes,
            frame_bg,
            frame_buf,
            overlay,
            depth_view,
            width,
            height,
        }
    }

    /// Resize: reconfigure surface & recreate depth view.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.surface_config.width = self.width;
        self.surface_config.height = self.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    /// Render one frame: clear color + depth, draw the mesh and the axis
    /// gizmo, then paint the overlay on top.
    pub fn render(
        &mut self,
        scene: &SceneFrame,
        overlay: Option<&OverlayFrame>,
    ) -> Result<(), SurfaceError> {
        let uniform = FrameUniform {
            view_proj: scene.view_proj.to_cols_array_2d(),
            model: scene.model.to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.frame_buf, 0, bytemuck::bytes_of(&uniform));

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        let size_px = [self.width, self.height];
        let user_cmd_bufs = match overlay {
            Some(o) => self
                .overlay
                .prepare(&self.device, &self.queue, &mut encoder, o, size_px),
            None => Vec::new(),
        };

        {
            let mut rpass = encoder
                .begin_render_pass(&RenderPassDescriptor {
                    label: Some("MainPass"),
                    color_attachments: &[Some(RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: Operations {
                            load: LoadOp::Clear(CLEAR_COLOR),
                            store: StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth_view,
                        depth_ops: Some(Operations {
                            load: LoadOp::Clear(1.0),
                            store: StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            rpass.set_pipeline(&self.mesh_pipeline);
            rpass.set_bind_group(0, &self.frame_bg, &[]);
            self.mesh.bind(&mut rpass);
            rpass.draw_indexed(0..self.mesh.index_count(), 0, 0..1);

            rpass.set_pipeline(&self.axis_pipeline);
            self.axes.bind(&mut rpass);
            rpass.draw(0..AXIS_VERTICES.len() as u32, 0..1);

            if let Some(o) = overlay {
                self.overlay.paint(&mut rpass, o, size_px);
            }
        }

        self.queue
            .submit(user_cmd_bufs.into_iter().chain(Some(encoder.finish())));
        frame.present();

        if let Some(o) = overlay {
            self.overlay.cleanup(o);
        }
        Ok(())
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: sc.width.max(1),
            height: sc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}
