use nalgebra::Vector3;

use crate::mirage::shader::BindingSurface;

pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub color: Vector3<f32>,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vector3::new(0.2, -1.0, -0.15),
            ambient: Vector3::new(0.06, 0.06, 0.06),
            diffuse: Vector3::new(0.6, 0.6, 0.6),
            specular: Vector3::zeros(),
            color: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

pub struct PointLight {
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub color: Vector3<f32>,
    // 거리 d에서의 감쇠는 1 / (constant + linear * d + quadratic * d^2)
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            ambient: Vector3::new(0.05, 0.05, 0.05),
            diffuse: Vector3::new(0.8, 0.8, 0.8),
            specular: Vector3::new(1.0, 1.0, 1.0),
            color: Vector3::new(1.0, 1.0, 1.0),
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

// 방향광 하나 + 점광 목록. Scene과 같은 규칙으로 바인딩하며,
// 접두사(dirLight, pointLights)는 Scene 쪽과 절대 겹치면 안 됨.
#[derive(Default)]
pub struct Lighting {
    pub dir_light: DirectionalLight,
    pub point_lights: Vec<PointLight>,
}

impl Lighting {
    pub fn add_point_light(&mut self, point_light: PointLight) {
        self.point_lights.push(point_light);
    }

    pub fn synchronize(&self, surface: &mut impl BindingSurface) {
        surface.set_vector3("dirLight.direction", self.dir_light.direction);
        surface.set_vector3("dirLight.color", self.dir_light.color);
        surface.set_vector3("dirLight.ambient", self.dir_light.ambient);
        surface.set_vector3("dirLight.diffuse", self.dir_light.diffuse);
        surface.set_vector3("dirLight.specular", self.dir_light.specular);

        for (index, point_light) in self.point_lights.iter().enumerate() {
            let name = format!("pointLights[{index}].");

            surface.set_vector3(&format!("{name}position"), point_light.position);
            surface.set_vector3(&format!("{name}ambient"), point_light.ambient);
            surface.set_vector3(&format!("{name}diffuse"), point_light.diffuse);
            surface.set_vector3(&format!("{name}specular"), point_light.specular);
            surface.set_vector3(&format!("{name}color"), point_light.color);
            surface.set_scalar(&format!("{name}constant"), point_light.constant);
            surface.set_scalar(&format!("{name}linear"), point_light.linear);
            surface.set_scalar(&format!("{name}quadratic"), point_light.quadratic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirage::shader::test_support::{Recorded, RecordingSurface};

    #[test]
    fn directional_light_always_binds_five_fields() {
        let mut surface = RecordingSurface::default();
        Lighting::default().synchronize(&mut surface);

        assert_eq!(surface.writes.len(), 5);
        for field in ["direction", "color", "ambient", "diffuse", "specular"] {
            assert!(
                surface.find(&format!("dirLight.{field}")).is_some(),
                "dirLight.{field}"
            );
        }
    }

    #[test]
    fn each_point_light_adds_eight_fields_in_index_order() {
        let mut lighting = Lighting::default();
        lighting.add_point_light(PointLight {
            position: Vector3::new(0.0, 5.0, 0.0),
            ..Default::default()
        });
        lighting.add_point_light(PointLight {
            position: Vector3::new(3.0, 5.0, 1.0),
            ..Default::default()
        });

        let mut surface = RecordingSurface::default();
        lighting.synchronize(&mut surface);

        assert_eq!(surface.writes.len(), 5 + 2 * 8);
        assert_eq!(
            surface.find("pointLights[0].position"),
            Some(&Recorded::Vector3(Vector3::new(0.0, 5.0, 0.0)))
        );
        assert_eq!(
            surface.find("pointLights[1].position"),
            Some(&Recorded::Vector3(Vector3::new(3.0, 5.0, 1.0)))
        );
        assert_eq!(
            surface.find("pointLights[1].quadratic"),
            Some(&Recorded::Scalar(0.032))
        );
    }

    #[test]
    fn direction_passes_through_unnormalized() {
        let mut lighting = Lighting::default();
        lighting.dir_light.direction = Vector3::new(0.0, -2.0, 0.0);

        let mut surface = RecordingSurface::default();
        lighting.synchronize(&mut surface);

        assert_eq!(
            surface.find("dirLight.direction"),
            Some(&Recorded::Vector3(Vector3::new(0.0, -2.0, 0.0)))
        );
    }
}
