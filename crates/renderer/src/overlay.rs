//! egui overlay paint path: texture deltas, buffer upload and drawing into
//! the main render pass.

use egui::{ClippedPrimitive, TexturesDelta};
use egui_wgpu::ScreenDescriptor;
use wgpu::{CommandBuffer, CommandEncoder, Device, Queue, RenderPass, TextureFormat};

/// Tessellated egui output for one frame, produced by the platform layer.
pub struct OverlayFrame {
    pub primitives: Vec<ClippedPrimitive>,
    pub textures_delta: TexturesDelta,
    pub pixels_per_point: f32,
}

impl OverlayFrame {
    fn screen_descriptor(&self, size_in_pixels: [u32; 2]) -> ScreenDescriptor {
        ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: self.pixels_per_point,
        }
    }
}

/// Paints [`OverlayFrame`]s through `egui-wgpu`.
pub struct OverlayRenderer {
    renderer: egui_wgpu::Renderer,
}

impl OverlayRenderer {
    pub fn new(device: &Device, surface_format: TextureFormat, depth_format: TextureFormat) -> Self {
        Self {
            renderer: egui_wgpu::Renderer::new(device, surface_format, Some(depth_format), 1, false),
        }
    }

    /// Upload textures and buffers. Must run before the render pass begins.
    /// Returns command buffers for egui paint callbacks, to be submitted
    /// ahead of the main encoder.
    pub fn prepare(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        frame: &OverlayFrame,
        size_in_pixels: [u32; 2],
    ) -> Vec<CommandBuffer> {
        for (id, delta) in &frame.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.primitives,
            &frame.screen_descriptor(size_in_pixels),
        )
    }

    /// Record the overlay draws into the pass.
    pub fn paint(
        &mut self,
        rpass: &mut RenderPass<'static>,
        frame: &OverlayFrame,
        size_in_pixels: [u32; 2],
    ) {
        self.renderer.render(
            rpass,
            &frame.primitives,
            &frame.screen_descriptor(size_in_pixels),
        );
    }

    /// Release textures egui freed this frame. Call after submit.
    pub fn cleanup(&mut self, frame: &OverlayFrame) {
        for id in &frame.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
