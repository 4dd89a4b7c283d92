//! Viewer-side mutable state: model placement, camera, drag tracking and
//! frame timing. All of it lives in one struct that update functions take by
//! reference; nothing accumulates in loop locals.

use std::time::Instant;

use corelib::{Vec3, camera::Camera, transform::ModelTransform, vec3};
use renderer::SceneFrame;

const DRAG_SENSITIVITY: f32 = 0.01;
const ZOOM_SENSITIVITY_DEG: f32 = 2.0;
const FOV_MIN_DEG: f32 = 1.0;
const FOV_MAX_DEG: f32 = 120.0;

pub struct ViewerState {
    pub model: ModelTransform,
    pub camera: Camera,
    fov_deg: f32,
    /// Last cursor position while the left button is held, None otherwise.
    drag: Option<(f64, f64)>,
    cursor: (f64, f64),
    width: u32,
    height: u32,
    last_frame: Instant,
    frame_ms: f32,
}

impl ViewerState {
    pub fn new(width: u32, height: u32) -> Self {
        let fov_deg: f32 = 50.0;
        let camera = Camera::new_perspective(
            vec3(75.0, 75.0, 75.0),
            Vec3::ZERO,
            Vec3::Y,
            fov_deg.to_radians(),
            0.1,
            10_000.0,
            width.max(1) as f32 / height.max(1) as f32,
        );
        Self {
            model: ModelTransform::identity(),
            camera,
            fov_deg,
            drag: None,
            cursor: (0.0, 0.0),
            width: width.max(1),
            height: height.max(1),
            last_frame: Instant::now(),
            frame_ms: 0.0,
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn begin_drag(&mut self) {
        self.drag = Some(self.cursor);
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Orbit the camera while a drag is active; always tracks the cursor.
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.drag {
            let yaw = (x - last_x) as f32 * DRAG_SENSITIVITY;
            let pitch = (y - last_y) as f32 * DRAG_SENSITIVITY;
            self.camera.orbit(yaw, pitch);
            self.drag = Some((x, y));
        }
        self.cursor = (x, y);
    }

    /// Wheel zoom: scroll up narrows the field of view.
    pub fn zoom(&mut self, lines: f32) {
        self.fov_deg = (self.fov_deg - lines * ZOOM_SENSITIVITY_DEG).clamp(FOV_MIN_DEG, FOV_MAX_DEG);
        self.camera.fov_y_rad = self.fov_deg.to_radians();
    }

    /// Update frame timing; call once per redraw.
    pub fn tick_frame(&mut self) {
        let now = Instant::now();
        let dt_ms = now.duration_since(self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        // Smoothed so the readout stays legible.
        self.frame_ms = if self.frame_ms == 0.0 {
            dt_ms
        } else {
            self.frame_ms * 0.95 + dt_ms * 0.05
        };
    }

    pub fn scene_frame(&self) -> SceneFrame {
        let aspect = self.width as f32 / self.height as f32;
        SceneFrame {
            view_proj: self.camera.with_aspect(aspect).proj_view(),
            model: self.model.matrix(),
        }
    }

    /// Controls overlay: translation/scale/camera sliders plus frame stats.
    pub fn ui(&mut self, ctx: &egui::Context) {
        egui::Window::new("Controls").show(ctx, |ui| {
            ui.label("Translation");
            ui.add(egui::Slider::new(&mut self.model.translation.x, -50.0..=50.0).text("x"));
            ui.add(egui::Slider::new(&mut self.model.translation.y, -50.0..=50.0).text("y"));
            ui.add(egui::Slider::new(&mut self.model.translation.z, -50.0..=50.0).text("z"));
            ui.add(egui::Slider::new(&mut self.model.scale, 0.1..=10.0).text("Scale"));
            ui.separator();
            ui.label("Camera position");
            ui.add(egui::Slider::new(&mut self.camera.eye.x, -150.0..=150.0).text("x"));
            ui.add(egui::Slider::new(&mut self.camera.eye.y, -150.0..=150.0).text("y"));
            ui.add(egui::Slider::new(&mut self.camera.eye.z, -150.0..=150.0).text("z"));
            ui.separator();
            if self.frame_ms > 0.0 {
                ui.label(format!(
                    "{:.3} ms/frame ({:.1} FPS)",
                    self.frame_ms,
                    1000.0 / self.frame_ms
                ));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_clamps_fov() {
        let mut state = ViewerState::new(1280, 720);
        state.zoom(1000.0);
        assert!((state.camera.fov_y_rad - FOV_MIN_DEG.to_radians()).abs() < 1e-6);
        state.zoom(-10_000.0);
        assert!((state.camera.fov_y_rad - FOV_MAX_DEG.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn cursor_only_orbits_while_dragging() {
        let mut state = ViewerState::new(1280, 720);
        let eye = state.camera.eye;
        state.cursor_moved(100.0, 100.0);
        assert_eq!(state.camera.eye, eye);

        state.begin_drag();
        state.cursor_moved(140.0, 80.0);
        assert_ne!(state.camera.eye, eye);
        // Orbit preserves the distance to the target.
        assert!((state.camera.eye.length() - eye.length()).abs() < 1e-2);

        let dragged = state.camera.eye;
        state.end_drag();
        state.cursor_moved(200.0, 200.0);
        assert_eq!(state.camera.eye, dragged);
    }

    #[test]
    fn viewport_never_degenerates() {
        let mut state = ViewerState::new(1280, 720);
        state.set_viewport(0, 0);
        let frame = state.scene_frame();
        assert!(frame.view_proj.to_cols_array().iter().all(|f| f.is_finite()));
    }
}
