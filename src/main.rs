// main.rs — 事件循环：欢迎页 → 360° 全景查看器

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // 在 Release 模式下隐藏控制台窗口

mod overlay;
mod renderer;

use overlay::LoadStatus;
use renderer::{Renderer, Shading};

use skyline_panorama::camera::CameraRig;
use skyline_panorama::config::Config;
use skyline_panorama::i18n;
use skyline_panorama::input::{normalized_pointer, wheel_delta_y};
use skyline_panorama::panorama::Variant;
use skyline_panorama::texture::{self, LoadError, PreparedTexture, TextureSettings};
use skyline_panorama::view::{Transition, ViewFlow};

use anyhow::Context as _;
use clap::Parser;
use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowBuilder},
};

use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Instant;

fn new_rig(variant: Variant, renderer: &Renderer) -> CameraRig {
    let mut rig = CameraRig::for_variant(variant);
    rig.set_viewport(renderer.size.width as f32, renderer.size.height as f32);
    rig
}

fn set_fullscreen(window: &Window, on: bool) {
    if on {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        window.set_fullscreen(None);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    i18n::init(config.lang.clone());
    log::info!("variant {:?}, image {}", config.variant, config.image.display());

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(i18n::tr("app.title"))
            .with_inner_size(LogicalSize::new(1280, 720))
            .build(&event_loop)
            .context("creating window")?,
    );
    let mut is_fullscreen = config.fullscreen;
    set_fullscreen(&window, is_fullscreen);

    let surface = config.variant.surface();
    let mut renderer = pollster::block_on(Renderer::new(&window, surface))?;
    overlay::install_fonts(&renderer.egui_ctx);

    // 异步加载：解码与 mip 生成都在后台线程
    let (tx, rx): (_, Receiver<Result<PreparedTexture, LoadError>>) = channel();
    let settings = TextureSettings::for_fidelity(surface.fidelity, renderer.supports_anisotropy());
    texture::spawn_load(config.image.clone(), settings, renderer.max_texture_dimension(), tx);
    let mut status = LoadStatus::Loading;

    let variant = config.variant;
    let mut flow = ViewFlow::new(Instant::now(), config.show_landing());
    let mut rig = flow.is_viewer().then(|| new_rig(variant, &renderer));
    let mut cursor = PhysicalPosition::new(0.0f64, 0.0f64);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match rx.try_recv() {
            Ok(Ok(prepared)) => {
                renderer.upload_panorama(&prepared);
                status = LoadStatus::Ready;
            }
            Ok(Err(e)) => status = LoadStatus::Failed(e),
            Err(_) => {}
        }

        match event {
            Event::WindowEvent { event, .. } => {
                // 先让 egui 处理事件
                let consumed = renderer
                    .egui_state
                    .on_event(&renderer.egui_ctx, &event)
                    .consumed;

                match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        if let Some(rig) = rig.as_mut() {
                            rig.set_viewport(new_size.width as f32, new_size.height as f32);
                        }
                    }

                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        renderer.resize(*new_inner_size);
                        if let Some(rig) = rig.as_mut() {
                            rig.set_viewport(new_inner_size.width as f32, new_inner_size.height as f32);
                        }
                    }

                    WindowEvent::KeyboardInput { input, .. } if !consumed => {
                        if input.state == ElementState::Pressed {
                            match input.virtual_keycode {
                                Some(VirtualKeyCode::F11) => {
                                    is_fullscreen = !is_fullscreen;
                                    set_fullscreen(&window, is_fullscreen);
                                }
                                Some(VirtualKeyCode::Escape) if is_fullscreen => {
                                    is_fullscreen = false;
                                    set_fullscreen(&window, false);
                                }
                                _ => {}
                            }
                        }
                    }

                    // 松开总是结束拖拽，即使 egui 消费了事件
                    WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                        if let Some(rig) = rig.as_mut() {
                            match state {
                                ElementState::Pressed if !consumed => {
                                    rig.pointer_down(cursor.x as f32, cursor.y as f32);
                                }
                                ElementState::Released => rig.pointer_up(),
                                _ => {}
                            }
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = position;
                        let (w, h) = (renderer.size.width as f32, renderer.size.height as f32);
                        let (x, y) = (position.x as f32, position.y as f32);
                        if let Some(landing) = flow.landing_mut() {
                            let (nx, ny) = normalized_pointer(x, y, w, h);
                            landing.set_pointer(nx, ny);
                        }
                        if let Some(rig) = rig.as_mut() {
                            rig.pointer_move(x, y);
                        }
                    }

                    WindowEvent::MouseWheel { delta, .. } if !consumed => {
                        if let Some(rig) = rig.as_mut() {
                            rig.wheel(wheel_delta_y(delta));
                        }
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                let now = Instant::now();

                if let Some(Transition::EnteredViewer) = flow.tick(now) {
                    rig = Some(new_rig(variant, &renderer));
                }

                // 每帧重新计算相机（阻尼 / look-at），而不只是在输入事件里
                let (pose, shading) = match (rig.as_mut(), flow.landing()) {
                    (Some(rig), _) => (rig.tick(), Shading::VIEWER),
                    (None, Some(landing)) => (landing.backdrop_pose(now), Shading::LANDING),
                    (None, None) => return,
                };
                renderer.update_camera(&pose, shading);

                let mut cta_clicked = false;
                let render_result = renderer.render_with_ui(&window, |ctx| match flow.landing() {
                    Some(landing) => cta_clicked = overlay::draw_landing(ctx, landing, now),
                    None => overlay::draw_viewer(ctx, &status),
                });

                if cta_clicked {
                    flow.enter(now);
                }

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory, exiting");
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::error!("render error: {e:?}"),
                }
            }

            Event::MainEventsCleared => {
                window.request_redraw();
            }

            _ => {}
        }
    });
}
