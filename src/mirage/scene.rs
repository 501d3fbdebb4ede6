use nalgebra::{Matrix4, Vector3};

use crate::mirage::shader::BindingSurface;
use crate::mirage::transform;

pub struct Sphere {
    pub radius: f32,
    pub center: Vector3<f32>,
    pub color: Vector3<f32>,
    pub reflection: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            radius: 1.0,
            center: Vector3::zeros(),
            color: Vector3::new(1.0, 1.0, 1.0),
            reflection: 0.0,
        }
    }
}

// 모서리가 둥근 직육면체. rounding이 가장 짧은 half_size보다 커지면
// 모양이 망가지지만, 여기선 검사하지 않고 그대로 넘김.
pub struct Cube {
    pub center: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub half_size: Vector3<f32>,
    pub color: Vector3<f32>,
    pub reflection: f32,
    pub rounding: f32,
}

impl Default for Cube {
    fn default() -> Self {
        Self {
            center: Vector3::zeros(),
            rotation: Vector3::zeros(),
            half_size: Vector3::new(1.0, 1.0, 1.0),
            color: Vector3::new(1.0, 1.0, 1.0),
            reflection: 0.0,
            rounding: 0.0,
        }
    }
}

impl Cube {
    pub fn matrix(&self) -> Matrix4<f32> {
        transform::local_to_world(&self.center, &self.rotation)
    }

    pub fn inverse_matrix(&self) -> Matrix4<f32> {
        transform::world_to_local(&self.center, &self.rotation)
    }
}

// 실제 모양은 pos1 -> pos2 선분 + radius가 정함.
// center와 rotation은 변환 행렬에만 들어가는 편집용 값.
pub struct Capsule {
    pub center: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub pos1: Vector3<f32>,
    pub pos2: Vector3<f32>,
    pub color: Vector3<f32>,
    pub reflection: f32,
    pub radius: f32,
}

impl Default for Capsule {
    fn default() -> Self {
        Self {
            center: Vector3::zeros(),
            rotation: Vector3::zeros(),
            pos1: Vector3::zeros(),
            pos2: Vector3::zeros(),
            color: Vector3::new(1.0, 1.0, 1.0),
            reflection: 0.0,
            radius: 1.0,
        }
    }
}

impl Capsule {
    pub fn matrix(&self) -> Matrix4<f32> {
        transform::local_to_world(&self.center, &self.rotation)
    }

    pub fn inverse_matrix(&self) -> Matrix4<f32> {
        transform::world_to_local(&self.center, &self.rotation)
    }
}

// 장면의 도형들. 넣은 순서가 곧 쉐이더 배열의 인덱스가 됨.
// 중간 삭제는 없음. 지우고 싶으면 밖에서 레지스트리째로 버려야 함.
#[derive(Default)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
    pub cubes: Vec<Cube>,
    pub capsules: Vec<Capsule>,
}

impl Scene {
    pub fn add_sphere(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    pub fn add_cube(&mut self, cube: Cube) {
        self.cubes.push(cube);
    }

    pub fn add_capsule(&mut self, capsule: Capsule) {
        self.capsules.push(capsule);
    }

    // 매 프레임, 값을 바꾼 뒤 그리기 전에 호출해야 함.
    // 쉐이더는 여기서 적은 값만 보고 장면을 안다.
    pub fn synchronize(&self, surface: &mut impl BindingSurface) {
        for (index, sphere) in self.spheres.iter().enumerate() {
            let name = format!("spheres[{index}].");

            surface.set_scalar(&format!("{name}radius"), sphere.radius);
            surface.set_scalar(&format!("{name}reflection"), sphere.reflection);
            surface.set_vector3(&format!("{name}center"), sphere.center);
            surface.set_vector3(&format!("{name}color"), sphere.color);
        }

        for (index, cube) in self.cubes.iter().enumerate() {
            let name = format!("cubes[{index}].");

            surface.set_vector3(&format!("{name}halfSize"), cube.half_size);
            surface.set_scalar(&format!("{name}reflection"), cube.reflection);
            surface.set_scalar(&format!("{name}rounding"), cube.rounding);
            surface.set_vector3(&format!("{name}color"), cube.color);
            surface.set_matrix4(
                &format!("{name}inverseTransformation"),
                &cube.inverse_matrix(),
            );
        }

        for (index, capsule) in self.capsules.iter().enumerate() {
            let name = format!("capsules[{index}].");

            surface.set_vector3(&format!("{name}pos1"), capsule.pos1);
            surface.set_vector3(&format!("{name}pos2"), capsule.pos2);
            surface.set_scalar(&format!("{name}reflection"), capsule.reflection);
            surface.set_scalar(&format!("{name}radius"), capsule.radius);
            surface.set_vector3(&format!("{name}color"), capsule.color);
            surface.set_matrix4(
                &format!("{name}inverseTransformation"),
                &capsule.inverse_matrix(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirage::shader::test_support::{Recorded, RecordingSurface};
    use approx::assert_relative_eq;
    use nalgebra::Matrix4;

    #[test]
    fn empty_scene_binds_nothing() {
        let mut surface = RecordingSurface::default();
        Scene::default().synchronize(&mut surface);

        assert!(surface.writes.is_empty());
    }

    #[test]
    fn each_sphere_binds_exactly_four_fields() {
        let mut scene = Scene::default();
        scene.add_sphere(Sphere::default());
        scene.add_sphere(Sphere {
            radius: 2.0,
            ..Default::default()
        });
        scene.add_sphere(Sphere::default());

        let mut surface = RecordingSurface::default();
        scene.synchronize(&mut surface);

        assert_eq!(surface.writes.len(), 12);
        for index in 0..3 {
            for field in ["radius", "reflection", "center", "color"] {
                assert!(
                    surface.find(&format!("spheres[{index}].{field}")).is_some(),
                    "spheres[{index}].{field}"
                );
            }
        }
        assert!(!surface
            .writes
            .iter()
            .any(|(_, value)| matches!(value, Recorded::Matrix4(_))));
    }

    #[test]
    fn insertion_order_assigns_indices() {
        let mut scene = Scene::default();
        scene.add_sphere(Sphere {
            radius: 1.0,
            ..Default::default()
        });
        scene.add_sphere(Sphere {
            radius: 2.0,
            ..Default::default()
        });

        let mut surface = RecordingSurface::default();
        scene.synchronize(&mut surface);

        assert_eq!(
            surface.find("spheres[0].radius"),
            Some(&Recorded::Scalar(1.0))
        );
        assert_eq!(
            surface.find("spheres[1].radius"),
            Some(&Recorded::Scalar(2.0))
        );
    }

    #[test]
    fn ground_slab_binds_half_size_and_inverse_translation() {
        let mut scene = Scene::default();
        scene.add_cube(Cube {
            center: Vector3::new(0.0, -1.5, 0.0),
            half_size: Vector3::new(5.0, 0.25, 5.0),
            ..Default::default()
        });

        let mut surface = RecordingSurface::default();
        scene.synchronize(&mut surface);

        assert_eq!(
            surface.find("cubes[0].halfSize"),
            Some(&Recorded::Vector3(Vector3::new(5.0, 0.25, 5.0)))
        );

        let Some(Recorded::Matrix4(inverse)) = surface.find("cubes[0].inverseTransformation")
        else {
            panic!("inverseTransformation이 바인딩되지 않음");
        };
        assert_relative_eq!(
            *inverse,
            Matrix4::new_translation(&Vector3::new(0.0, 1.5, 0.0)),
            epsilon = 1e-6
        );
    }

    #[test]
    fn capsule_binds_segment_and_inverse_transformation() {
        let mut scene = Scene::default();
        scene.add_capsule(Capsule {
            pos1: Vector3::new(2.0, 0.0, 3.0),
            pos2: Vector3::new(2.0, 1.2, 3.0),
            radius: 0.4,
            ..Default::default()
        });

        let mut surface = RecordingSurface::default();
        scene.synchronize(&mut surface);

        assert_eq!(surface.writes.len(), 6);
        for field in ["pos1", "pos2", "reflection", "radius", "color", "inverseTransformation"] {
            assert!(
                surface.find(&format!("capsules[0].{field}")).is_some(),
                "capsules[0].{field}"
            );
        }
        // center와 rotation 자체는 바인딩되지 않음
        assert!(surface.find("capsules[0].center").is_none());
        assert!(surface.find("capsules[0].rotation").is_none());
    }

    #[test]
    fn animated_center_tracks_the_sinusoid() {
        let mut scene = Scene::default();
        scene.add_cube(Cube::default());

        let mut bound = vec![];
        for time in [0.3f32, 1.1] {
            scene.cubes[0].center.y = time.sin() + 1.5;

            assert_relative_eq!(scene.cubes[0].matrix()[(1, 3)], time.sin() + 1.5);

            let mut surface = RecordingSurface::default();
            scene.synchronize(&mut surface);
            let Some(Recorded::Matrix4(inverse)) =
                surface.find("cubes[0].inverseTransformation")
            else {
                panic!("inverseTransformation이 바인딩되지 않음");
            };
            bound.push(*inverse);
        }

        assert_ne!(bound[0], bound[1]);
    }
}
