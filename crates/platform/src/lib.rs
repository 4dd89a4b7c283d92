//! Platform layer: window, event loop, input routing and egui frame
//! orchestration.
//!
//! The event loop is redraw-driven: poll input, update the viewer state,
//! build the overlay, render, repeat. Close request is the only exit path.

pub mod state;

use std::sync::Arc;

use anyhow::Result;
use asset::MeshData;
use egui::ViewportId;
use renderer::{GpuState, OverlayFrame};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::state::ViewerState;

/// Startup configuration resolved by the binary from CLI flags.
#[derive(Clone, Copy, Debug)]
pub struct AppConfig {
    pub backends: wgpu::Backends,
    pub width: u32,
    pub height: u32,
}

/// Open a window and drive the render loop until close is requested.
pub fn run(config: AppConfig, mesh: MeshData) -> Result<()> {
    let event_loop: EventLoop<()> =
        EventLoop::new().map_err(|e| anyhow::anyhow!("Failed to create event loop: {e}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(config, mesh);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e}"))?;
    Ok(())
}

/// Window + GPU + egui wiring, created once the event loop is live.
struct Gfx {
    window: Arc<Window>,
    gpu: GpuState,
    egui_ctx: egui::Context,
    egui_input: egui_winit::State,
}

struct ViewerApp {
    config: AppConfig,
    mesh: MeshData,
    state: ViewerState,
    gfx: Option<Gfx>,
}

impl ViewerApp {
    fn new(config: AppConfig, mesh: MeshData) -> Self {
        let state = ViewerState::new(config.width, config.height);
        Self {
            config,
            mesh,
            state,
            gfx: None,
        }
    }

    fn init_gfx(&mut self, event_loop: &ActiveEventLoop) {
        let attrs = Window::default_attributes()
            .with_title("Veles3D")
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .expect("Failed to create window"),
        );
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let gpu = pollster::block_on(GpuState::new(
            window.clone(),
            self.config.backends,
            &self.mesh,
        ));

        let egui_ctx = egui::Context::default();
        let egui_input = egui_winit::State::new(
            egui_ctx.clone(),
            ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        self.gfx = Some(Gfx {
            window,
            gpu,
            egui_ctx,
            egui_input,
        });
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        self.state.tick_frame();

        let raw_input = gfx.egui_input.take_egui_input(&gfx.window);
        let state = &mut self.state;
        let full_output = gfx.egui_ctx.run(raw_input, |ctx| state.ui(ctx));
        gfx.egui_input
            .handle_platform_output(&gfx.window, full_output.platform_output);

        let primitives = gfx
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let overlay = OverlayFrame {
            primitives,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        };

        let scene = self.state.scene_frame();
        match gfx.gpu.render(&scene, Some(&overlay)) {
            Ok(()) => {}
            Err(err) if GpuState::is_surface_lost(&err) => {
                log::warn!("Surface lost/outdated; reconfiguring.");
                gfx.gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory. Exiting.");
                event_loop.exit();
            }
            Err(err) => {
                log::warn!("Dropped frame: {err:?}");
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_none() {
            self.init_gfx(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        // egui gets first refusal on every event.
        let response = gfx.egui_input.on_window_event(&gfx.window, &event);
        if response.repaint {
            gfx.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gfx.gpu.resize(new_size.width, new_size.height);
                self.state.set_viewport(new_size.width, new_size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                log::info!("Scale factor changed: {scale_factor:.3}");
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if !response.consumed && !gfx.egui_ctx.wants_pointer_input() {
                    self.state.begin_drag();
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                self.state.end_drag();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if !response.consumed {
                    let lines = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                    };
                    self.state.zoom(lines);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Continuous redraws: the viewer animates with input, so keep frames
        // flowing instead of waiting for OS damage events.
        if let Some(gfx) = self.gfx.as_ref() {
            gfx.window.request_redraw();
        }
    }
}
