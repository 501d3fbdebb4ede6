use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingType, BlendState, BufferBindingType, ColorTargetState,
    ColorWrites, Device, FragmentState, FrontFace, MultisampleState, PipelineLayoutDescriptor,
    PolygonMode, PrimitiveState, PrimitiveTopology, Queue, RenderPass, RenderPipeline,
    RenderPipelineDescriptor, ShaderModuleDescriptor, ShaderSource, ShaderStages, TextureFormat,
    VertexState,
};

use crate::camera::Camera;
use crate::mirage::lighting::Lighting;
use crate::mirage::scene::Scene;
use crate::mirage::shader::{
    Shader, MAX_CAPSULES, MAX_CUBES, MAX_POINT_LIGHTS, MAX_SPHERES,
};

pub mod lighting;
pub mod scene;
pub mod shader;
pub mod transform;

// 화면 전체를 덮는 삼각형 하나를 그리고, 프래그먼트 쉐이더가
// 유니폼으로 올라온 장면을 거리 함수로 행진하며 색을 계산함.
pub struct Marcher {
    shader: Shader,
    pipeline: RenderPipeline,
    bind_group: BindGroup,
}

impl Marcher {
    pub fn new(device: &Device, surface_format: TextureFormat) -> Self {
        let shader = Shader::new(device);

        let module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("March Shader"),
            source: ShaderSource::Wgsl(include_str!("march.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Mirage Bind Group Layout"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("Mirage Bind Group"),
            layout: &bind_group_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: shader.buffer().as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Mirage Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Mirage Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &module,
                entry_point: "vs_main",
                // 정점 버퍼 없음. 정점 인덱스만으로 화면 전체 삼각형을 만듦.
                buffers: &[],
            },
            fragment: Some(FragmentState {
                module: &module,
                entry_point: "fs_main",
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        Self {
            shader,
            pipeline,
            bind_group,
        }
    }

    // 편집이 끝난 뒤, 그리기 전에 호출. 레지스트리의 현재 상태를
    // 전부 바인딩하고 카운트까지 채워서 GPU로 올림.
    pub fn prepare(
        &mut self,
        queue: &Queue,
        scene: &Scene,
        lighting: &Lighting,
        camera: &Camera,
    ) {
        camera.bind(&mut self.shader);
        scene.synchronize(&mut self.shader);
        lighting.synchronize(&mut self.shader);

        self.shader
            .set_uint("sphereCount", scene.spheres.len().min(MAX_SPHERES) as u32);
        self.shader
            .set_uint("cubeCount", scene.cubes.len().min(MAX_CUBES) as u32);
        self.shader
            .set_uint("capsuleCount", scene.capsules.len().min(MAX_CAPSULES) as u32);
        self.shader.set_uint(
            "pointLightCount",
            lighting.point_lights.len().min(MAX_POINT_LIGHTS) as u32,
        );

        self.shader.flush(queue);
    }

    pub fn draw<'pass>(&'pass self, render_pass: &mut RenderPass<'pass>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}
