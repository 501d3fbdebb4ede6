use std::ops::Add;

use nalgebra::{
    Isometry3, Matrix4, Perspective3, Point3, Unit, UnitQuaternion, Vector2, Vector3,
};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyboardInput, VirtualKeyCode, WindowEvent};

use crate::mirage::shader::BindingSurface;

pub struct Camera {
    projection: Matrix4<f32>,
    inverse_projection: Matrix4<f32>,

    vertical_fov: f32,
    near: f32,
    far: f32,

    pub position: Point3<f32>,
    forward: Unit<Vector3<f32>>,

    pub last_mouse: PhysicalPosition<f64>,

    viewport_size: PhysicalSize<u32>,

    inputs: [bool; 6],
    // WASD SPACE SHIFT
    pub grab_mouse: bool,
}

impl Camera {
    pub fn new(vertical_fov: f32, near: f32, far: f32, viewport_size: PhysicalSize<u32>) -> Self {
        let projection = Self::evaluate_projection(vertical_fov, near, far, viewport_size);
        let position = Point3::from([0.0, 0.5, -6.0]);
        let forward = Vector3::z_axis();

        Self {
            projection,
            inverse_projection: projection.try_inverse().unwrap(),
            vertical_fov,
            near,
            far,
            position,
            forward,
            last_mouse: Default::default(),
            viewport_size,
            inputs: [false; 6],
            grab_mouse: false,
        }
    }

    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let delta = Vector2::new(
                    (position.x - self.last_mouse.x) as f32,
                    (position.y - self.last_mouse.y) as f32,
                ) * 0.002;
                self.last_mouse = *position;

                if !self.grab_mouse {
                    return false;
                }

                let up: Unit<Vector3<f32>> = Vector3::y_axis();
                let right = Unit::new_unchecked(up.cross(&self.forward));

                let pitch_delta = delta.y * self.rotation_speed(); // negative when up
                let yaw_delta = delta.x * self.rotation_speed(); // positive when right

                let q = UnitQuaternion::from_axis_angle(&right, pitch_delta)
                    * UnitQuaternion::from_axis_angle(&up, yaw_delta);

                self.forward = q * self.forward;
                self.forward.renormalize_fast();

                true
            }
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(key),
                        ..
                    },
                ..
            } => {
                let is_press = matches!(state, ElementState::Pressed);
                match key {
                    VirtualKeyCode::W => self.inputs[0] = is_press,
                    VirtualKeyCode::A => self.inputs[1] = is_press,
                    VirtualKeyCode::S => self.inputs[2] = is_press,
                    VirtualKeyCode::D => self.inputs[3] = is_press,
                    VirtualKeyCode::Space => self.inputs[4] = is_press,
                    VirtualKeyCode::LShift => self.inputs[5] = is_press,
                    VirtualKeyCode::C if is_press => {
                        self.grab_mouse = !self.grab_mouse;
                    }
                    _ => {
                        return false;
                    }
                };

                true
            }
            _ => false,
        }
    }

    pub fn update(&mut self, frame_time: u128) -> bool {
        let time_step = ((frame_time as f32) / 1000.0).min(1.0 / 60.0);

        let up: Unit<Vector3<f32>> = Vector3::y_axis();
        let right = up.cross(&self.forward);
        let mut moved = false;

        if self.inputs[0] {
            self.position += self.forward.scale(self.movement_speed() * time_step);
            moved = true;
        }
        if self.inputs[1] {
            self.position -= right.scale(self.movement_speed() * time_step);
            moved = true;
        }
        if self.inputs[2] {
            self.position -= self.forward.scale(self.movement_speed() * time_step);
            moved = true;
        }
        if self.inputs[3] {
            self.position += right.scale(self.movement_speed() * time_step);
            moved = true;
        }
        if self.inputs[4] {
            self.position += up.scale(self.movement_speed() * time_step);
            moved = true;
        }
        if self.inputs[5] {
            self.position -= up.scale(self.movement_speed() * time_step);
            moved = true;
        }

        moved
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.viewport_size = new_size;

        self.projection =
            Self::evaluate_projection(self.vertical_fov, self.near, self.far, self.viewport_size);
        self.inverse_projection = self.projection.try_inverse().unwrap();
    }

    // 레이는 GPU에서 픽셀마다 복원하니, 여기선 역행렬 두 개랑 위치만 넘기면 됨.
    // GUI가 위치를 직접 고칠 수 있어서 뷰 행렬은 바인딩 시점에 새로 만듦.
    pub fn bind(&self, surface: &mut impl BindingSurface) {
        let target = self.position.add(self.forward.into_inner());
        let view = Isometry3::look_at_lh(&self.position, &target, &Vector3::y_axis());

        surface.set_matrix4("camera.inverseProjection", &self.inverse_projection);
        surface.set_matrix4("camera.inverseView", &view.inverse().to_homogeneous());
        surface.set_vector3("camera.position", self.position.coords);
    }

    pub fn rotation_speed(&self) -> f32 {
        0.7
    }

    pub fn movement_speed(&self) -> f32 {
        5.0
    }

    fn evaluate_projection(
        vertical_fov: f32,
        near: f32,
        far: f32,
        viewport_size: PhysicalSize<u32>,
    ) -> Matrix4<f32> {
        let aspect = viewport_size.width as f32 / viewport_size.height.max(1) as f32;

        let right = Perspective3::new(aspect, vertical_fov, near, far).into_inner();
        let mut z_flip = Matrix4::identity();
        z_flip[(2, 2)] = -1.0;
        right * z_flip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirage::shader::test_support::{Recorded, RecordingSurface};

    #[test]
    fn bind_writes_exactly_the_camera_keys() {
        let camera = Camera::new(45f32.to_radians(), 0.1, 100.0, PhysicalSize::new(800, 600));

        let mut surface = RecordingSurface::default();
        camera.bind(&mut surface);

        assert_eq!(surface.writes.len(), 3);
        assert!(matches!(
            surface.find("camera.inverseProjection"),
            Some(Recorded::Matrix4(_))
        ));
        assert!(matches!(
            surface.find("camera.inverseView"),
            Some(Recorded::Matrix4(_))
        ));
        assert_eq!(
            surface.find("camera.position"),
            Some(&Recorded::Vector3(Vector3::new(0.0, 0.5, -6.0)))
        );
    }
}
