use eframe::egui::{Context, DragValue, Ui, Window};
use nalgebra::Vector3;

use crate::camera::Camera;
use crate::mirage::lighting::Lighting;
use crate::mirage::scene::Scene;

// 입력 처리와 synchronize 사이, 매 프레임 한 번 호출됨.
// 여기서 고친 값은 같은 프레임의 바인딩에 바로 반영됨.
pub fn draw(context: &Context, scene: &mut Scene, lighting: &mut Lighting, camera: &mut Camera) {
    Window::new("Objects").show(context, |ui| {
        ui.collapsing("Spheres", |ui| {
            for (index, sphere) in scene.spheres.iter_mut().enumerate() {
                if index > 0 {
                    ui.separator();
                }
                ui.push_id(index, |ui| {
                    drag_vector3(ui, "Position", &mut sphere.center, 0.05);
                    color_edit(ui, "Color", &mut sphere.color);
                    drag_scalar(ui, "Radius", &mut sphere.radius, 0.05, 0.1, f32::INFINITY);
                    drag_scalar(ui, "Reflection", &mut sphere.reflection, 0.01, 0.0, 1.0);
                });
            }
        });

        ui.collapsing("Cubes", |ui| {
            for (index, cube) in scene.cubes.iter_mut().enumerate() {
                if index > 0 {
                    ui.separator();
                }
                ui.push_id(index, |ui| {
                    drag_vector3(ui, "Position", &mut cube.center, 0.05);
                    drag_vector3(ui, "Rotation", &mut cube.rotation, 1.0);
                    drag_vector3(ui, "Half Size", &mut cube.half_size, 0.05);
                    color_edit(ui, "Color", &mut cube.color);
                    drag_scalar(ui, "Rounding", &mut cube.rounding, 0.01, 0.0, f32::INFINITY);
                    drag_scalar(ui, "Reflection", &mut cube.reflection, 0.01, 0.0, 1.0);
                });
            }
        });

        ui.collapsing("Capsules", |ui| {
            for (index, capsule) in scene.capsules.iter_mut().enumerate() {
                if index > 0 {
                    ui.separator();
                }
                ui.push_id(index, |ui| {
                    drag_vector3(ui, "Position", &mut capsule.center, 0.05);
                    drag_vector3(ui, "Rotation", &mut capsule.rotation, 1.0);
                    drag_vector3(ui, "Pos1", &mut capsule.pos1, 0.05);
                    drag_vector3(ui, "Pos2", &mut capsule.pos2, 0.05);
                    color_edit(ui, "Color", &mut capsule.color);
                    drag_scalar(ui, "Radius", &mut capsule.radius, 0.01, 0.01, f32::INFINITY);
                    drag_scalar(ui, "Reflection", &mut capsule.reflection, 0.01, 0.0, 1.0);
                });
            }
        });
    });

    Window::new("Lighting and Cameras").show(context, |ui| {
        ui.collapsing("Directional Light", |ui| {
            drag_vector3(ui, "Direction", &mut lighting.dir_light.direction, 0.01);
            color_edit(ui, "Ambient", &mut lighting.dir_light.ambient);
            color_edit(ui, "Diffuse", &mut lighting.dir_light.diffuse);
            color_edit(ui, "Specular", &mut lighting.dir_light.specular);
            color_edit(ui, "Color", &mut lighting.dir_light.color);
        });

        ui.collapsing("Point Lights", |ui| {
            for (index, point_light) in lighting.point_lights.iter_mut().enumerate() {
                if index > 0 {
                    ui.separator();
                }
                ui.push_id(index, |ui| {
                    drag_vector3(ui, "Position", &mut point_light.position, 0.05);
                    color_edit(ui, "Ambient", &mut point_light.ambient);
                    color_edit(ui, "Diffuse", &mut point_light.diffuse);
                    color_edit(ui, "Specular", &mut point_light.specular);
                    color_edit(ui, "Color", &mut point_light.color);
                    drag_scalar(ui, "Constant", &mut point_light.constant, 0.05, 0.0, f32::INFINITY);
                    drag_scalar(ui, "Linear", &mut point_light.linear, 0.05, 0.0, f32::INFINITY);
                    drag_scalar(ui, "Quadratic", &mut point_light.quadratic, 0.05, 0.0, f32::INFINITY);
                });
            }
        });

        ui.collapsing("Camera", |ui| {
            ui.horizontal(|ui| {
                ui.add(DragValue::new(&mut camera.position.x).speed(0.05));
                ui.add(DragValue::new(&mut camera.position.y).speed(0.05));
                ui.add(DragValue::new(&mut camera.position.z).speed(0.05));
                ui.label("Position");
            });
            ui.label("C: toggle mouse look");
        });
    });
}

fn drag_vector3(ui: &mut Ui, label: &str, value: &mut Vector3<f32>, speed: f64) {
    ui.horizontal(|ui| {
        ui.add(DragValue::new(&mut value.x).speed(speed));
        ui.add(DragValue::new(&mut value.y).speed(speed));
        ui.add(DragValue::new(&mut value.z).speed(speed));
        ui.label(label);
    });
}

// 범위 제한은 편집기 쪽 안내일 뿐, 레코드 자체는 아무 값이나 담을 수 있음
fn drag_scalar(ui: &mut Ui, label: &str, value: &mut f32, speed: f64, min: f32, max: f32) {
    ui.horizontal(|ui| {
        ui.add(DragValue::new(value).speed(speed).clamp_range(min..=max));
        ui.label(label);
    });
}

fn color_edit(ui: &mut Ui, label: &str, value: &mut Vector3<f32>) {
    let mut rgb = [value.x, value.y, value.z];
    ui.horizontal(|ui| {
        if ui.color_edit_button_rgb(&mut rgb).changed() {
            *value = Vector3::from(rgb);
        }
        ui.label(label);
    });
}
