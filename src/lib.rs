use cfg_if::cfg_if;
use log::warn;
use nalgebra::Vector3;
use wgpu::SurfaceError;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::app::Application;
use crate::camera::Camera;
use crate::mirage::lighting::{Lighting, PointLight};
use crate::mirage::scene::{Capsule, Cube, Scene, Sphere};

// wasm32 환경에서만 wasm_bindgen 활용
#[cfg(target_arch="wasm32")]
use wasm_bindgen::prelude::*;

pub mod app;
pub mod camera;
pub mod gui;
pub mod mirage;

cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        use web_time::Instant;
    } else {
        use std::time::Instant;
    }
}

// 시작 장면. 바닥 역할의 넓은 판 하나, 구 둘, 둥근 큐브, 캡슐 하나.
fn demo_scene() -> Scene {
    let mut scene = Scene::default();

    scene.add_sphere(Sphere {
        center: Vector3::zeros(),
        color: Vector3::new(0.0, 1.0, 1.0),
        ..Default::default()
    });
    scene.add_sphere(Sphere {
        center: Vector3::new(1.0, 0.5, -3.0),
        color: Vector3::new(1.0, 0.0, 0.0),
        ..Default::default()
    });

    scene.add_cube(Cube {
        center: Vector3::new(0.0, -1.5, 0.0),
        half_size: Vector3::new(10.0, 0.5, 10.0),
        color: Vector3::new(0.7, 0.7, 0.7),
        reflection: 0.8,
        ..Default::default()
    });
    scene.add_cube(Cube {
        center: Vector3::new(-2.5, 0.5, 2.0),
        half_size: Vector3::new(0.5, 0.5, 0.5),
        color: Vector3::new(1.0, 0.0, 1.0),
        rounding: 0.05,
        ..Default::default()
    });

    scene.add_capsule(Capsule {
        pos1: Vector3::new(2.0, 0.0, 3.0),
        pos2: Vector3::new(2.0, 1.2, 3.0),
        radius: 0.4,
        color: Vector3::new(1.0, 0.8, 0.2),
        ..Default::default()
    });

    scene
}

fn demo_lighting() -> Lighting {
    let mut lighting = Lighting::default();
    lighting.dir_light.direction = Vector3::new(0.0, -1.0, 0.0);

    lighting.add_point_light(PointLight {
        position: Vector3::new(0.0, 5.0, 0.0),
        diffuse: Vector3::new(0.6, 0.6, 0.6),
        ..Default::default()
    });
    lighting.add_point_light(PointLight {
        position: Vector3::new(3.0, 5.0, 1.0),
        diffuse: Vector3::new(0.6, 0.6, 0.6),
        ..Default::default()
    });

    lighting
}

// wasm 연결시 아래 함수를 시작점으로 삼도록 함.
#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn run() {
    // 로거 초기화
    cfg_if! {
        // 만약 현재 환경이 wasm32라면
        if #[cfg(target_arch = "wasm32")] {
            // panic 발생시 웹 브라우저의 console.err에 로그 띄우기
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Debug).expect("로거 초기화 실패");
        } else {
            // 아니면 기본적인 로거만 불러오기
            env_logger::init();
        }
    }

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Mirage: Ray Marcher")
        .build(&event_loop)
        .unwrap();

    // 브라우저에선 CSS로 창 크기를 못 정하니 여기서 직접 지정하고,
    // 문서에 캔버스를 달아줘야 화면에 뜸
    #[cfg(target_arch = "wasm32")]
    {
        use winit::dpi::PhysicalSize;
        use winit::platform::web::WindowExtWebSys;

        window.set_inner_size(PhysicalSize::new(1280, 720));

        web_sys::window()
            .and_then(|win| win.document())
            .and_then(|document| {
                let destination = document.get_element_by_id("mirage")?;
                let canvas = web_sys::Element::from(window.canvas());
                destination.append_child(&canvas).ok()?;
                Some(())
            })
            .expect("캔버스를 문서에 붙이지 못함");
    }

    cfg_if! {
        // 브라우저의 메인 스레드는 블로킹이 안되니 Future를 통째로 넘김
        if #[cfg(target_arch = "wasm32")] {
            wasm_bindgen_futures::spawn_local(launch(event_loop, window));
        } else {
            pollster::block_on(launch(event_loop, window));
        }
    }
}

async fn launch(event_loop: EventLoop<()>, window: Window) {
    let mut app = Application::new(window, &event_loop).await;
    let mut camera = Camera::new(45f32.to_radians(), 0.1, 100.0, app.size);

    let mut scene = demo_scene();
    let mut lighting = demo_lighting();

    let start = Instant::now();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| match event {
        Event::WindowEvent {
            ref event,
            window_id
        } if window_id == app.window.id() => {
            // GUI가 먼저 먹고, 남은 입력만 카메라로
            if !app.input(event) && !camera.input(event) {
                match event {
                    // 만약 앱을 운영체제에서 닫으려고 하거나
                    WindowEvent::CloseRequested |
                    // 키보드 입력이 들어왔고
                    WindowEvent::KeyboardInput {
                        input: KeyboardInput {
                            // 키보드가 새로 눌러졌으며, 그 눌러진 키가 ESC라면
                            state: ElementState::Pressed, virtual_keycode: Some(VirtualKeyCode::Escape), ..
                        }, ..
                    } => *control_flow = ControlFlow::ExitWithCode(0), // 나가기

                    WindowEvent::Resized(physical_size) => {
                        app.resize(*physical_size);
                        camera.resize(*physical_size);
                    }
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        app.resize(**new_inner_size);
                        camera.resize(**new_inner_size);
                    }

                    _ => {}
                }
            }
        }

        Event::RedrawRequested(window_id) if window_id == app.window.id() => {
            let frame_time = last_frame.elapsed().as_millis();
            last_frame = Instant::now();
            camera.update(frame_time);

            // 빨간 구를 시간에 따라 둥둥 띄움. 레코드는 제자리에서 고치고,
            // 다음 synchronize가 알아서 GPU로 가져감.
            let elapsed = start.elapsed().as_secs_f32();
            scene.spheres[1].center.y = elapsed.sin() * 0.5 + 0.5;

            match app.render(&mut scene, &mut lighting, &mut camera) {
                Ok(_) => {}
                // surface를 잃어버리면 다시 설정
                Err(SurfaceError::Lost) => app.resize(app.size),
                Err(SurfaceError::OutOfMemory) => *control_flow = ControlFlow::ExitWithCode(1),
                Err(error) => warn!("{error:?}"),
            }
        }

        Event::MainEventsCleared => app.window.request_redraw(),

        _ => {}
    });
}
