mod content;
mod ui;

use anyhow::Result;
use clap::Parser;
use content::Content;
use donutfield_assets::{AssetPaths, FontFile, MatcapLibrary};
use donutfield_common::ViewportSize;
use donutfield_input::{PointerButton, PointerTracker};
use donutfield_render::{FullscreenHost, Viewport};
use donutfield_render_wgpu::WgpuRenderer;
use donutfield_tools::{PanelCommand, SceneInspector};
use egui::Context as EguiContext;
use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowId};

#[derive(Parser)]
#[command(name = "donutfield-desktop", about = "Floating 3D text in a field of donuts")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding fonts/ and textures/
    #[arg(long, default_value = "./static")]
    assets_dir: PathBuf,

    /// Seed for donut placement (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Initial window width in logical pixels
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "720")]
    height: u32,
}

/// Lets the viewport switch the window in and out of fullscreen.
struct WindowHost<'a>(&'a Window);

impl FullscreenHost for WindowHost<'_> {
    type Error = Infallible;

    fn is_fullscreen(&self) -> bool {
        self.0.fullscreen().is_some()
    }

    fn request_fullscreen(&mut self) -> Result<(), Infallible> {
        self.0.set_fullscreen(Some(Fullscreen::Borderless(None)));
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), Infallible> {
        self.0.set_fullscreen(None);
        Ok(())
    }
}

fn logical_size(window: &Window) -> ViewportSize {
    let size = window.inner_size().to_logical::<f64>(window.scale_factor());
    ViewportSize::new(size.width.round() as u32, size.height.round() as u32)
}

fn physical_size(window: &Window) -> (u32, u32) {
    let size = window.inner_size();
    (size.width, size.height)
}

struct GpuApp {
    initial_size: ViewportSize,
    matcaps: MatcapLibrary,
    content: Content<FontFile>,
    pointer: PointerTracker,
    window: Option<Arc<Window>>,
    viewport: Option<Viewport<WgpuRenderer>>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(cli: &Cli) -> Self {
        let paths = AssetPaths::new(&cli.assets_dir);
        let matcaps = MatcapLibrary::load(&paths);
        tracing::info!(
            loaded = matcaps.loaded_count(),
            root = %paths.root().display(),
            "matcaps ready"
        );
        let rng = cli
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

        Self {
            initial_size: ViewportSize::new(cli.width, cli.height),
            matcaps,
            content: Content::new(FontFile::new(paths.font()), rng),
            pointer: PointerTracker::new(),
            window: None,
            viewport: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn toggle_fullscreen(&mut self) {
        let (Some(window), Some(viewport)) = (&self.window, &self.viewport) else {
            return;
        };
        if let Err(e) = viewport.toggle_fullscreen(&mut WindowHost(window)) {
            tracing::error!("{e}");
        }
    }

    fn redraw(&mut self) {
        let GpuApp {
            window: Some(window),
            viewport: Some(viewport),
            egui_winit: Some(egui_winit),
            egui_renderer: Some(egui_renderer),
            egui_ctx,
            content,
            ..
        } = self
        else {
            return;
        };

        content.poll_text(viewport);

        let summary = SceneInspector::summary(viewport.scene());
        let raw_input = egui_winit.take_egui_input(window);
        let mut commands = Vec::new();
        let full_output = egui_ctx.run(raw_input, |ctx| {
            commands = ui::draw_panel(ctx, &mut content.panel, &summary);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        content.sync(viewport);
        for command in commands {
            match command {
                PanelCommand::RebuildText => content.rebuild_text(),
                PanelCommand::RebuildDonuts => content.rebuild_donuts(viewport),
                PanelCommand::ToggleFullscreen => {
                    if let Err(e) = viewport.toggle_fullscreen(&mut WindowHost(window)) {
                        tracing::error!("{e}");
                    }
                }
            }
        }

        let Some(frame) = viewport.frame(|scene, clock| content.animate(scene, clock)) else {
            window.request_redraw();
            return;
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let renderer = viewport.renderer();
        let (device, queue) = (renderer.device(), renderer.queue());
        // the surface matches the window, so egui keeps the window's scale
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [renderer.config().width, renderer.config().height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        frame.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Donut Field")
            .with_inner_size(LogicalSize::new(
                self.initial_size.width as f64,
                self.initial_size.height as f64,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = logical_size(&window);
        let scale_factor = window.scale_factor() as f32;
        let renderer = match WgpuRenderer::new(
            window.clone(),
            physical_size(&window),
            size,
            scale_factor,
            &self.matcaps,
        ) {
            Ok(renderer) => renderer,
            Err(e) => {
                tracing::error!("failed to initialise GPU: {e}");
                event_loop.exit();
                return;
            }
        };
        let surface_format = renderer.surface_format();

        let mut viewport = Viewport::new(renderer, size, scale_factor);
        self.content.populate(&mut viewport);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(scale_factor),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(viewport.renderer().device(), surface_format, None, 1, false);

        window.request_redraw();
        self.window = Some(window);
        self.viewport = Some(viewport);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(window), Some(viewport)) = (&self.window, &mut self.viewport) {
                    let (width, height) = physical_size(window);
                    viewport.renderer_mut().resize_surface(width, height);
                    viewport.resize(logical_size(window), window.scale_factor() as f32);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    _ => return,
                };
                match state {
                    ElementState::Pressed => {
                        let double = self.pointer.press(button, Instant::now());
                        let fullscreen = self
                            .window
                            .as_ref()
                            .is_some_and(|w| w.fullscreen().is_some());
                        if double && fullscreen {
                            self.toggle_fullscreen();
                        }
                    }
                    ElementState::Released => self.pointer.release(button),
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (Some(window), Some(viewport)) = (&self.window, &mut self.viewport) else {
                    return;
                };
                let logical = position.to_logical::<f32>(window.scale_factor());
                if let Some(action) = self.pointer.moved(Vec2::new(logical.x, logical.y)) {
                    viewport.navigate(action);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.left();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                if let (Some(action), Some(viewport)) = (self.pointer.wheel(dy), &mut self.viewport) {
                    viewport.navigate(action);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("donutfield-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(&cli);
    event_loop.run_app(&mut app)?;

    Ok(())
}
