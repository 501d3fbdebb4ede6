use std::iter;

use eframe::egui::ClippedPrimitive;
use wgpu::{Backends, Color, CommandEncoder, CommandEncoderDescriptor, CompositeAlphaMode, Device, DeviceDescriptor, Dx12Compiler, Features, Instance, InstanceDescriptor, Limits, LoadOp, Operations, PowerPreference, PresentMode, Queue, RenderPassColorAttachment, RenderPassDescriptor, RequestAdapterOptions, Surface, SurfaceConfiguration, SurfaceError, TextureUsages, TextureViewDescriptor};
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::EventLoop;
use winit::window::Window;

use crate::camera::Camera;
use crate::gui;
use crate::mirage::lighting::Lighting;
use crate::mirage::scene::Scene;
use crate::mirage::Marcher;

pub struct Application {
    surface: Surface,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    pub size: PhysicalSize<u32>,
    // 무조건 winit의 Window를 쓸 것!
    pub window: Window,
    marcher: Marcher,
    egui_state: egui_winit::State,
    egui_context: eframe::egui::Context,
    egui_renderer: egui_wgpu::Renderer,
    egui_screen: egui_wgpu::renderer::ScreenDescriptor
}

impl Application {
    // Rust식 생성자. new라는 이름의 메서드를 만듦
    pub async fn new(window: Window, event_loop: &EventLoop<()>) -> Self {
        let size = window.inner_size();

        // instance는 Adapter와 Surface를 만들어주며 이들에 필요한 정보를 제공함.
        // 백엔드: Vulkan, Metal, DirectX 등등
        let instance = Instance::new(InstanceDescriptor {
            backends: Backends::all(),                // 모든 종류의 백엔드 허용
            dx12_shader_compiler: Dx12Compiler::default(), // DirectX 사용시, 쉐이더 컴파일러로 FXC 사용
        });

        // unsafe: 전달하는 &window가 생성하는 surface보다 오래 유지되어야 함.
        // 여기서 surface는 GPU가 그릴 수 있는 사각형 "표면"을 의미함.
        let surface = unsafe { instance.create_surface(&window) }.unwrap();

        // adapter는 GPU 관리자. 기기로부터 정보를 가져오거나 특정 요청을 보낼 수 있음.
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::default(),
                force_fallback_adapter: false, // 어뎁더가 없다고 CPU 렌더링으로 넘어가진 않음
                compatible_surface: Some(&surface), // 무조건 위 surface와 호환되는 어뎁더만
            })
            .await
            .unwrap();

        // device: GPU 장치
        // queue: GPU에 보낼 명령어들을 저장하는 큐
        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    features: Features::empty(), // 사용할 기능 없음
                    // limits는 버퍼 사이즈, 텍스쳐 크기와 같은 제한 사항 기준들
                    limits: if cfg!(target_arch = "wasm32") {
                        // 브라우저가 아직 webgpu를 제대로 지원 안하니 webgl2 기준 채택
                        Limits::downlevel_webgl2_defaults()
                    } else {
                        Limits::default()
                    },
                    // 디버그시 device에 붙일 이름
                    label: Some("Mirage GPU"),
                },
                None,
            )
            .await
            .unwrap();

        // 해당 surface랑 adapter가 가진 기능들의 집합
        let capabilities = surface.get_capabilities(&adapter);

        // 색 포맷으로 sRGB 사용. 다른거 쓰면 의도한 것보다 밝기나 명도에서 차이가 날 수 있음.
        let surface_format = capabilities
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .copied()
            .unwrap_or(capabilities.formats[0]);
        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT, // 해당 surface를 이용해 화면에 작성할 것임.
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: CompositeAlphaMode::Auto,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        // 장면을 유니폼으로 올려 행진시키는 파이프라인
        let marcher = Marcher::new(&device, surface_format);

        let egui_state = egui_winit::State::new(event_loop);
        let egui_context = eframe::egui::Context::default();

        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            surface_format,
            None, // 깊이 안씀
            1 // 멀티 샘플링 1번만 할꺼임
        );
        let egui_screen = egui_wgpu::renderer::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: egui_context.pixels_per_point(),
        };

        Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            marcher,
            egui_state,
            egui_context,
            egui_renderer,
            egui_screen,
        }
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        self.egui_screen.pixels_per_point = self.egui_context.pixels_per_point();
        self.egui_screen.size_in_pixels = [self.config.width, self.config.height];
    }

    pub fn render(
        &mut self,
        scene: &mut Scene,
        lighting: &mut Lighting,
        camera: &mut Camera,
    ) -> Result<(), SurfaceError> {
        let output = self.surface.get_current_texture()?; // 렌더링 결과를 출력할 곳

        let view = output.texture.create_view(&TextureViewDescriptor::default());
        // encoder는 GPU에 보내는 명령들을 임시적으로 저장하는 것
        let mut encoder = self.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("Encoder"),
        });

        // 순서가 중요함: 패널이 레코드를 고친 다음에 synchronize가 돌아야
        // 이번 프레임 그림에 편집 결과가 들어감
        let primitives = self.update_egui(&mut encoder, scene, lighting, camera);
        self.marcher.prepare(&self.queue, scene, lighting, camera);

        // render_pass가 encoder를 빌려오기 때문에 아래처럼 따로 빼지 않으면 앞으로 계속 쓸 수 없음
        {
            let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view, // 렌더링할 결과를 저장할 때 사용할 view
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(Color {
                            r: 0.0,
                            g: 0.0,
                            b: 0.0,
                            a: 1.0
                        }),
                        store: true
                    },
                })],
                // 깊이맵, 스텐실은 아직 안쓰니 None
                depth_stencil_attachment: None,
            });

            // 장면 먼저, GUI는 그 위에
            self.marcher.draw(&mut render_pass);
            self.egui_renderer.render(&mut render_pass, &primitives, &self.egui_screen)
        }

        // render_pass로 작성한 내용을 담고 있는 encoder를 마감하고 queue를 통해 device에 전송
        self.queue.submit(iter::once(encoder.finish()));
        // 전송 끝났으면 모니터에 출력
        output.present();

        // 프레임 생성 성공!
        Ok(())
    }

    // true: 앱에서 입력 처리를 했으니 따로 관리할 필요 없음
    // false: 아래 event loop에서 처리 해야 함.
    pub fn input(&mut self, event: &WindowEvent) -> bool {
        let egui_response = self.egui_state.on_event(&self.egui_context, event);
        egui_response.consumed
    }

    fn update_egui(
        &mut self,
        encoder: &mut CommandEncoder,
        scene: &mut Scene,
        lighting: &mut Lighting,
        camera: &mut Camera,
    ) -> Vec<ClippedPrimitive> {
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let egui_output = self.egui_context.run(egui_input, |ctx| {
            gui::draw(ctx, scene, lighting, camera);
        });

        self.egui_state.handle_platform_output(&self.window, &self.egui_context, egui_output.platform_output);
        let primitives = self.egui_context.tessellate(egui_output.shapes);
        egui_output.textures_delta.set.iter().for_each(|(id, delta)| {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, &delta);
        });

        self.egui_renderer.update_buffers(&self.device, &self.queue, encoder, &primitives, &self.egui_screen);

        primitives
    }
}
