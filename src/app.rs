//! The application event loop.
//!
//! One thread owns everything: event polling, input integration, scene
//! mutation (distance recompute + transparency sort) and draw submission, in
//! that order every frame. The loop only blocks on the buffer swap and on
//! the non-blocking event drain.
//!
//! Frame timing deliberately lags one frame: the `dt` fed into input
//! integration is the duration measured for the *previous* frame, seeded
//! with 16 ms before the first one. The timer restarts at the top of the
//! redraw and is read after present.

use std::{iter, sync::Arc};

use cgmath::Point3;
use instant::{Duration, Instant};
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    context::Context,
    data_structures::{model::GpuBundle, scene::Scene, texture::Texture},
    lod::QualityLevel,
    render::{self, DrawItem, FrameState, Pass},
    resources::{AssetStore, diffuse_layout, upload_bundle},
};

/// Everything alive once the window and GPU context exist.
pub struct ViewerState {
    ctx: Context,
    gpu: Vec<GpuBundle>,
    store: AssetStore,
    scene: Scene,
    quality: QualityLevel,
    sorting: bool,
    show_info: bool,
    light_position: Point3<f32>,
    dt: Duration,
    info_accum: f32,
    is_surface_configured: bool,
}

impl ViewerState {
    async fn new(window: Arc<Window>, store: AssetStore, scene: Scene) -> Self {
        let ctx = match Context::new(window).await {
            Ok(ctx) => ctx,
            Err(e) => panic!(
                "App initialization failed. Cannot create the main context: {}",
                e
            ),
        };

        let layout = diffuse_layout(&ctx.device);
        let gpu = store
            .bundles()
            .iter()
            .map(|bundle| upload_bundle(&ctx.device, &ctx.queue, &layout, bundle))
            .collect();

        let light_position = ctx.camera.camera.position;

        Self {
            ctx,
            gpu,
            store,
            scene,
            quality: QualityLevel::Auto,
            sorting: true,
            show_info: true,
            light_position,
            dt: Duration::from_millis(16),
            info_accum: 0.0,
            is_surface_configured: false,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.begin_error_scope();
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
            self.ctx.end_error_scope("resize");
        }
    }

    /// Runtime toggles, acknowledged with a one-line message each.
    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Digit1 => {
                self.sorting = !self.sorting;
                log::info!("Sorting is {}", if self.sorting { "ON" } else { "OFF" });
            }
            KeyCode::Digit2 => {
                self.show_info = !self.show_info;
                log::info!("Info is {}", if self.show_info { "ON" } else { "OFF" });
            }
            KeyCode::Digit3 => {
                let position = self.ctx.camera.camera.position;
                log::info!(
                    "LightPos: {}:{}:{}",
                    position.x,
                    position.y,
                    position.z
                );
                self.light_position = position;
            }
            KeyCode::Digit4 => {
                self.quality = self.quality.cycle();
                log::info!("LOD: {}", self.quality.label());
            }
            _ => (),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let dt = self.dt;
        let frame_start = Instant::now();

        // Integrate input into the camera, then push camera and light state.
        let camera = &mut self.ctx.camera;
        camera.controller.update(&mut camera.camera, dt);
        camera
            .uniform
            .update_view_proj(&camera.camera, &self.ctx.projection);

        self.ctx.begin_error_scope();
        self.ctx.queue.write_buffer(
            &self.ctx.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.ctx.camera.uniform]),
        );
        self.ctx.light.uniform.position = [
            self.light_position.x,
            self.light_position.y,
            self.light_position.z,
        ];
        self.ctx.queue.write_buffer(
            &self.ctx.light.buffer,
            0,
            bytemuck::cast_slice(&[self.ctx.light.uniform]),
        );
        self.ctx.end_error_scope("after camera movement");

        let frame = FrameState {
            camera_position: self.ctx.camera.camera.position,
            light_position: self.light_position,
            quality: self.quality,
            sorting: self.sorting,
        };

        // Refresh distances from the current camera before any LOD
        // selection; both passes see the same frame's distances.
        self.scene.update_distances(frame.camera_position);
        let opaque = render::build_pass(&self.scene, &self.store, &frame, Pass::Opaque);

        // Between the passes, when enabled, re-sort ascending so the reverse
        // iteration draws farthest-first. With sorting off the scene stays in
        // its last sorted order, an accepted quality tradeoff.
        if frame.sorting {
            self.scene.sort_by_distance();
        }
        let transparent = render::build_pass(&self.scene, &self.store, &frame, Pass::Transparent);

        // One shared payload buffer for both passes, rebuilt per frame.
        let draw_data: Vec<_> = opaque
            .iter()
            .chain(transparent.iter())
            .map(DrawItem::to_raw)
            .collect();
        let draw_buffer = self
            .ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Draw Buffer"),
                contents: bytemuck::cast_slice(&draw_data),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_vertex_buffer(1, draw_buffer.slice(..));
            render_pass.set_bind_group(1, &self.ctx.camera.bind_group, &[]);
            render_pass.set_bind_group(2, &self.ctx.light.bind_group, &[]);

            render_pass.set_pipeline(&self.ctx.pipelines.basic);
            render::draw_items(&mut render_pass, &self.gpu, &opaque, 0);

            render_pass.set_pipeline(&self.ctx.pipelines.transparent);
            render::draw_items(&mut render_pass, &self.gpu, &transparent, opaque.len() as u32);
        }

        self.ctx.begin_error_scope();
        self.ctx.queue.submit(iter::once(encoder.finish()));
        self.ctx.end_error_scope("frame submission");
        output.present();

        // Instantaneous frame rate, roughly once per second while info is on.
        if self.info_accum > 1.0 && self.show_info {
            log::info!("{}", 1.0 / dt.as_secs_f32());
            self.info_accum = 0.0;
        }
        self.info_accum += dt.as_secs_f32();

        self.dt = frame_start.elapsed();
        Ok(())
    }
}

pub struct App {
    state: Option<ViewerState>,
    // Loaded before the event loop starts; taken once the window exists.
    pending: Option<(AssetStore, Scene)>,
}

impl App {
    pub fn new(store: AssetStore, scene: Scene) -> Self {
        Self {
            state: None,
            pending: Some((store, scene)),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some((store, scene)) = self.pending.take() else {
            return;
        };

        let window_attributes = Window::default_attributes().with_title("Showroom");
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .expect("Failed to create the main window"),
        );

        let mut state =
            futures::executor::block_on(ViewerState::new(window.clone(), store, scene));

        // Mouse look scales against the display's reference resolution.
        if let Some(monitor) = window.current_monitor() {
            let size = monitor.size();
            state
                .ctx
                .camera
                .controller
                .set_display(size.width as f32, size.height as f32);
        }

        let size = window.inner_size();
        state.resize(size.width, size.height);
        self.state = Some(state);
        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => {
                state
                    .ctx
                    .camera
                    .controller
                    .set_pointer(position.x as f32, position.y as f32);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        repeat,
                        ..
                    },
                ..
            } => {
                state
                    .ctx
                    .camera
                    .controller
                    .process_keyboard(code, key_state.is_pressed());
                if key_state.is_pressed() && !repeat {
                    state.handle_key(event_loop, code);
                }
            }
            WindowEvent::RedrawRequested => match state.render() {
                Ok(_) => (),
                // Reconfigure the surface if it's lost or outdated
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let size = state.ctx.window.inner_size();
                    state.resize(size.width, size.height);
                }
                Err(e) => {
                    log::error!("Unable to render {}", e);
                }
            },
            _ => (),
        }
    }
}

/// Run the viewer with a loaded store and a composed scene.
pub fn run(store: AssetStore, scene: Scene) -> anyhow::Result<()> {
    // No-op when the binary already set a logger up.
    let _ = env_logger::try_init();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::new(store, scene);
    event_loop.run_app(&mut app)?;

    Ok(())
}
