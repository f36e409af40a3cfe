use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use futures::task::LocalSpawnExt;
use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::controller::TransitionController;
use crate::driver::RenderDriver;
use crate::gpu::{GpuContext, GpuError};
use crate::gpu_scene::{GpuScene, GpuSceneFactory};
use crate::input::Pointer;
use crate::overlay::{Overlay, ShapeBatch};
use crate::scene::SceneContext;
use crate::surface::LoadingFlag;
use crate::trigger::ActivateOn;
use crate::ui::Color;

/// Configuration for the app window.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Viewport height UI pixel lengths are authored against.
    pub ideal_height: f32,
    /// Draw a progress bar along the bottom edge while a scene is staged.
    ///
    /// The built-in [`GpuScene`] is ready on its first poll, so its
    /// transitions finish inside a single frame and the bar never shows.
    /// It shows for scenes whose readiness spans frames.
    pub loading_indicator: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Stagehand".to_string(),
            width: 1280,
            height: 720,
            ideal_height: 720.0,
            loading_indicator: true,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn ideal_height(mut self, ideal_height: f32) -> Self {
        self.ideal_height = ideal_height;
        self
    }

    pub fn loading_indicator(mut self, enabled: bool) -> Self {
        self.loading_indicator = enabled;
        self
    }
}

/// Failures that stop the app from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("could not open the window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error("could not schedule the first scene: {0}")]
    Spawn(#[from] futures::task::SpawnError),
}

/// Open a window and run the scene cycle with the default configuration.
pub fn run() -> Result<(), AppError> {
    run_with_config(AppConfig::default())
}

/// Open a window and run the scene cycle.
///
/// Returns once the window is closed, or with the error that prevented
/// start-up.
pub fn run_with_config(config: AppConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::Pending { config };
    event_loop.run_app(&mut app)?;

    match app {
        App::Failed(err) => Err(err),
        App::Pending { .. } | App::Running(_) => Ok(()),
    }
}

enum App {
    Pending { config: AppConfig },
    Running(Box<Running>),
    Failed(AppError),
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    overlay: Overlay,
    pointer: Pointer,
    driver: RenderDriver<GpuScene>,
    loading: Rc<LoadingFlag>,
    show_loading: bool,
    // Keeps the controller alive; triggers only hold weak references.
    _controller: Rc<TransitionController<GpuSceneFactory>>,
    start_time: Instant,
}

impl Running {
    fn start(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self, AppError> {
        let attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let gpu = GpuContext::new(Arc::clone(&window))?;
        let overlay = Overlay::new(&gpu);

        let context = Rc::new(SceneContext::new());
        let driver = RenderDriver::new(Rc::clone(&context));
        let loading = Rc::new(LoadingFlag::new());
        let controller = TransitionController::new(
            context,
            GpuSceneFactory::new(config.ideal_height),
            loading.clone(),
            driver.spawner(),
        );

        let launching = Rc::clone(&controller);
        driver.spawner().spawn_local(async move {
            if let Err(err) = launching.launch().await {
                log::error!("could not show the first scene: {err}");
            }
        })?;

        log::info!(
            "window open at {}x{}, UI authored for {}px",
            gpu.width(),
            gpu.height(),
            config.ideal_height
        );

        Ok(Self {
            window,
            gpu,
            overlay,
            pointer: Pointer::new(),
            driver,
            loading,
            show_loading: config.loading_indicator,
            _controller: controller,
            start_time: Instant::now(),
        })
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(self.gpu.width() as f32, self.gpu.height() as f32)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.driver.resize(&mut self.gpu, width, height) {
            log::debug!("surface resized to {width}x{height}");
        }
    }

    fn dispatch(&self, edge: ActivateOn) {
        let position = self.pointer.position();
        let viewport = self.viewport();
        self.driver
            .context()
            .with_active(|scene| scene.pointer(edge, position, viewport));
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let viewport = self.viewport();
        self.overlay.clear();

        let overlay = &mut self.overlay;
        let clear_color = self
            .driver
            .frame(|scene| {
                scene.draw(overlay.batch(), viewport);
                scene.clear_color()
            })
            .unwrap_or(Color::BLACK);

        let phase = self.start_time.elapsed().as_secs_f32() * 0.8;
        draw_loading(overlay.batch(), &self.loading, self.show_loading, viewport, phase);

        match self.present(clear_color) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => log::debug!("frame skipped: surface timeout"),
            Err(err) => {
                log::error!("cannot present frames: {err}");
                event_loop.exit();
            }
        }
    }

    fn present(&self, clear_color: Color) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.overlay.render(&self.gpu, &mut render_pass);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Queue the loading bar if it is enabled and a transition is staging.
fn draw_loading(
    batch: &mut ShapeBatch,
    loading: &LoadingFlag,
    enabled: bool,
    viewport: Vec2,
    phase: f32,
) -> bool {
    if !enabled || !loading.is_visible() {
        return false;
    }
    batch.loading_bar(viewport, phase);
    true
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let App::Pending { config } = self else {
            return;
        };
        match Running::start(event_loop, config) {
            Ok(running) => *self = App::Running(Box::new(running)),
            Err(err) => {
                log::error!("start-up failed: {err}");
                *self = App::Failed(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let App::Running(running) = self else {
            return;
        };

        if let Some(edge) = running.pointer.handle_event(&event) {
            running.dispatch(edge);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                running.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                running.redraw(event_loop);
                running.window.request_redraw();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::LoadingScope;

    #[test]
    fn default_config_targets_a_720p_ui() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (1280, 720));
        assert_eq!(config.ideal_height, 720.0);
        assert!(config.loading_indicator);
    }

    #[test]
    fn loading_bar_follows_the_flag_and_the_config() {
        let viewport = Vec2::new(1280.0, 720.0);
        let flag = LoadingFlag::new();
        let mut batch = ShapeBatch::default();

        assert!(!draw_loading(&mut batch, &flag, true, viewport, 0.5));
        assert!(batch.is_empty());

        let scope = LoadingScope::new(&flag);
        assert!(!draw_loading(&mut batch, &flag, false, viewport, 0.5));
        assert!(batch.is_empty());
        assert!(draw_loading(&mut batch, &flag, true, viewport, 0.5));
        assert!(!batch.is_empty());
        drop(scope);

        batch.clear();
        assert!(!draw_loading(&mut batch, &flag, true, viewport, 0.5));
        assert!(batch.is_empty());
    }

    #[test]
    fn builder_overrides_fields() {
        let config = AppConfig::new()
            .title("Demo")
            .size(800, 600)
            .ideal_height(1080.0)
            .loading_indicator(false);

        assert_eq!(config.title, "Demo");
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.ideal_height, 1080.0);
        assert!(!config.loading_indicator);
    }
}
