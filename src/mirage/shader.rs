use std::collections::{HashMap, HashSet};

use bytemuck::bytes_of;
use log::warn;
use nalgebra::{Matrix4, Vector3};
use wgpu::{Buffer, BufferDescriptor, BufferUsages, Device, Queue};

// march.wgsl의 고정 배열 크기와 무조건 일치해야 함
pub const MAX_SPHERES: usize = 16;
pub const MAX_CUBES: usize = 8;
pub const MAX_CAPSULES: usize = 8;
pub const MAX_POINT_LIGHTS: usize = 8;

// "cubes[1].halfSize" 같은 이름으로 유니폼 값을 받아주는 쪽.
// Scene과 Lighting은 이 트레잇만 보고, 실제 GPU 버퍼는 Shader가 들고 있음.
pub trait BindingSurface {
    fn set_scalar(&mut self, name: &str, value: f32);
    fn set_vector3(&mut self, name: &str, value: Vector3<f32>);
    fn set_matrix4(&mut self, name: &str, value: &Matrix4<f32>);
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SlotKind {
    Scalar,
    Vector3,
    Matrix4,
    Uint,
}

impl SlotKind {
    pub fn byte_size(self) -> usize {
        match self {
            SlotKind::Scalar | SlotKind::Uint => 4,
            SlotKind::Vector3 => 12,
            SlotKind::Matrix4 => 64,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Slot {
    pub kind: SlotKind,
    pub offset: usize,
}

// 유니폼 버퍼 안에서 각 이름이 몇 바이트 지점에 있는지 기록한 표.
// 만드는 시점에 한 번만 계산하고, 이후 프레임마다 여길 찾아서 복사만 함.
#[derive(Default)]
pub struct UniformLayout {
    slots: HashMap<String, Slot>,
    cursor: usize,
}

impl UniformLayout {
    // march.wgsl의 Uniforms 구조체와 같은 순서, 같은 패킹.
    // vec3 뒤 4바이트에 스칼라를 끼워넣는 vec4 패킹을 사용함.
    pub fn scene() -> Self {
        let mut layout = Self::default();

        layout.matrix4("camera.inverseProjection");
        layout.matrix4("camera.inverseView");
        layout.vector3("camera.position");
        layout.pad();

        layout.uint("sphereCount");
        layout.uint("cubeCount");
        layout.uint("capsuleCount");
        layout.uint("pointLightCount");

        layout.vector3("dirLight.direction");
        layout.pad();
        layout.vector3("dirLight.color");
        layout.pad();
        layout.vector3("dirLight.ambient");
        layout.pad();
        layout.vector3("dirLight.diffuse");
        layout.pad();
        layout.vector3("dirLight.specular");
        layout.pad();

        for index in 0..MAX_POINT_LIGHTS {
            let name = format!("pointLights[{index}].");

            layout.vector3(format!("{name}position"));
            layout.scalar(format!("{name}constant"));
            layout.vector3(format!("{name}color"));
            layout.scalar(format!("{name}linear"));
            layout.vector3(format!("{name}ambient"));
            layout.scalar(format!("{name}quadratic"));
            layout.vector3(format!("{name}diffuse"));
            layout.pad();
            layout.vector3(format!("{name}specular"));
            layout.pad();
        }

        for index in 0..MAX_SPHERES {
            let name = format!("spheres[{index}].");

            layout.vector3(format!("{name}center"));
            layout.scalar(format!("{name}radius"));
            layout.vector3(format!("{name}color"));
            layout.scalar(format!("{name}reflection"));
        }

        for index in 0..MAX_CUBES {
            let name = format!("cubes[{index}].");

            layout.vector3(format!("{name}halfSize"));
            layout.scalar(format!("{name}rounding"));
            layout.vector3(format!("{name}color"));
            layout.scalar(format!("{name}reflection"));
            layout.matrix4(format!("{name}inverseTransformation"));
        }

        for index in 0..MAX_CAPSULES {
            let name = format!("capsules[{index}].");

            layout.vector3(format!("{name}pos1"));
            layout.scalar(format!("{name}radius"));
            layout.vector3(format!("{name}pos2"));
            layout.scalar(format!("{name}reflection"));
            layout.vector3(format!("{name}color"));
            layout.pad();
            layout.matrix4(format!("{name}inverseTransformation"));
        }

        layout
    }

    pub fn get(&self, name: &str) -> Option<Slot> {
        self.slots.get(name).copied()
    }

    pub fn byte_size(&self) -> usize {
        self.cursor
    }

    fn insert(&mut self, name: impl Into<String>, kind: SlotKind) {
        self.slots.insert(
            name.into(),
            Slot {
                kind,
                offset: self.cursor,
            },
        );
        self.cursor += kind.byte_size();
    }

    fn scalar(&mut self, name: impl Into<String>) {
        self.insert(name, SlotKind::Scalar);
    }

    fn uint(&mut self, name: impl Into<String>) {
        self.insert(name, SlotKind::Uint);
    }

    fn vector3(&mut self, name: impl Into<String>) {
        self.insert(name, SlotKind::Vector3);
    }

    fn matrix4(&mut self, name: impl Into<String>) {
        self.insert(name, SlotKind::Matrix4);
    }

    fn pad(&mut self) {
        self.cursor += 4;
    }
}

pub struct Shader {
    layout: UniformLayout,
    staging: Vec<u8>,
    buffer: Buffer,
    // 같은 경고를 프레임마다 도배하지 않도록 이미 알린 이름을 기억함
    reported: HashSet<String>,
}

impl Shader {
    pub fn new(device: &Device) -> Self {
        let layout = UniformLayout::scene();
        let staging = vec![0u8; layout.byte_size()];

        let buffer = device.create_buffer(&BufferDescriptor {
            label: Some("Mirage Uniforms"),
            size: layout.byte_size() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            layout,
            staging,
            buffer,
            reported: HashSet::new(),
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    // 카운트는 트레잇 바깥의 확장. 쉐이더는 [0, count) 범위만 돌기 때문에
    // 컬렉션이 줄어도 이전 프레임의 찌꺼기 인덱스를 읽지 않음.
    pub fn set_uint(&mut self, name: &str, value: u32) {
        self.write(name, SlotKind::Uint, bytes_of(&value));
    }

    // 스테이징에 모아둔 값을 한 번에 GPU로 올림. 프레임당 한 번 호출.
    pub fn flush(&self, queue: &Queue) {
        queue.write_buffer(&self.buffer, 0, &self.staging);
    }

    fn write(&mut self, name: &str, kind: SlotKind, bytes: &[u8]) {
        let Some(slot) = self.layout.get(name) else {
            if self.reported.insert(name.to_owned()) {
                warn!("바인딩할 수 없는 유니폼: {name}");
            }
            return;
        };

        if slot.kind != kind {
            if self.reported.insert(name.to_owned()) {
                warn!("유니폼 타입이 맞지 않음: {name} ({:?} != {kind:?})", slot.kind);
            }
            return;
        }

        self.staging[slot.offset..slot.offset + bytes.len()].copy_from_slice(bytes);
    }
}

impl BindingSurface for Shader {
    fn set_scalar(&mut self, name: &str, value: f32) {
        self.write(name, SlotKind::Scalar, bytes_of(&value));
    }

    fn set_vector3(&mut self, name: &str, value: Vector3<f32>) {
        self.write(name, SlotKind::Vector3, bytemuck::cast_slice(value.as_slice()));
    }

    fn set_matrix4(&mut self, name: &str, value: &Matrix4<f32>) {
        // nalgebra도 wgsl도 열 우선이라 그대로 복사하면 됨
        self.write(name, SlotKind::Matrix4, bytemuck::cast_slice(value.as_slice()));
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::BindingSurface;
    use nalgebra::{Matrix4, Vector3};

    #[derive(Debug, PartialEq)]
    pub enum Recorded {
        Scalar(f32),
        Vector3(Vector3<f32>),
        Matrix4(Matrix4<f32>),
    }

    // 실제 GPU 없이 어떤 키에 뭐가 적혔는지만 기록하는 바인딩 표면
    #[derive(Default)]
    pub struct RecordingSurface {
        pub writes: Vec<(String, Recorded)>,
    }

    impl RecordingSurface {
        pub fn find(&self, name: &str) -> Option<&Recorded> {
            self.writes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value)
        }
    }

    impl BindingSurface for RecordingSurface {
        fn set_scalar(&mut self, name: &str, value: f32) {
            self.writes.push((name.to_owned(), Recorded::Scalar(value)));
        }

        fn set_vector3(&mut self, name: &str, value: Vector3<f32>) {
            self.writes.push((name.to_owned(), Recorded::Vector3(value)));
        }

        fn set_matrix4(&mut self, name: &str, value: &Matrix4<f32>) {
            self.writes.push((name.to_owned(), Recorded::Matrix4(*value)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_never_overlap() {
        let layout = UniformLayout::scene();

        let mut slots: Vec<Slot> = layout.slots.values().copied().collect();
        slots.sort_by_key(|slot| slot.offset);

        for pair in slots.windows(2) {
            assert!(
                pair[0].offset + pair[0].kind.byte_size() <= pair[1].offset,
                "{pair:?}"
            );
        }
    }

    #[test]
    fn vectors_and_matrices_are_sixteen_byte_aligned() {
        let layout = UniformLayout::scene();

        for (name, slot) in &layout.slots {
            assert_eq!(slot.offset % 4, 0, "{name}");

            if matches!(slot.kind, SlotKind::Vector3 | SlotKind::Matrix4) {
                assert_eq!(slot.offset % 16, 0, "{name}");
            }
        }
    }

    #[test]
    fn total_size_matches_the_wgsl_struct() {
        let layout = UniformLayout::scene();

        assert_eq!(layout.byte_size() % 16, 0);
        // mat4 둘 + 카메라 위치 + 카운트 + 조명 + 도형 배열들
        assert_eq!(
            layout.byte_size(),
            64 + 64
                + 16
                + 16
                + 80
                + MAX_POINT_LIGHTS * 80
                + MAX_SPHERES * 32
                + MAX_CUBES * 96
                + MAX_CAPSULES * 112
        );
    }

    #[test]
    fn known_keys_resolve_and_unknown_keys_do_not() {
        let layout = UniformLayout::scene();

        assert_eq!(layout.get("spheres[0].radius").unwrap().kind, SlotKind::Scalar);
        assert_eq!(
            layout.get("cubes[1].inverseTransformation").unwrap().kind,
            SlotKind::Matrix4
        );
        assert_eq!(
            layout.get("pointLights[7].quadratic").unwrap().kind,
            SlotKind::Scalar
        );
        assert_eq!(layout.get("sphereCount").unwrap().kind, SlotKind::Uint);
        assert_eq!(
            layout.get("camera.inverseView").unwrap().kind,
            SlotKind::Matrix4
        );

        assert!(layout.get("spheres[15].reflection").is_some());
        assert!(layout.get("spheres[16].radius").is_none()); // 수용량 밖
        assert!(layout.get("spheres[0].albedo").is_none());
    }
}
