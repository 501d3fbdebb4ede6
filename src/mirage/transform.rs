use nalgebra::{Matrix4, Rotation3, Vector3};

// center + 오일러 회전(도 단위)으로 로컬 -> 월드 변환 행렬을 만듦.
// 회전은 X, Y, Z 축 순서대로 적용됨. 순서를 바꾸면 다른 자세가 나옴!
pub fn local_to_world(center: &Vector3<f32>, rotation: &Vector3<f32>) -> Matrix4<f32> {
    let mut model = Matrix4::new_translation(center);
    model *=
        Rotation3::from_axis_angle(&Vector3::x_axis(), rotation.x.to_radians()).to_homogeneous();
    model *=
        Rotation3::from_axis_angle(&Vector3::y_axis(), rotation.y.to_radians()).to_homogeneous();
    model *=
        Rotation3::from_axis_angle(&Vector3::z_axis(), rotation.z.to_radians()).to_homogeneous();

    model
}

// 월드 좌표의 점을 로컬 좌표로 보내는 역행렬.
// 회전 + 평행이동은 언제나 역행렬이 존재하지만, 없으면 단위 행렬로 대체함.
pub fn world_to_local(center: &Vector3<f32>, rotation: &Vector3<f32>) -> Matrix4<f32> {
    local_to_world(center, rotation)
        .try_inverse()
        .unwrap_or_else(Matrix4::identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn inverse_round_trips_to_identity() {
        let center = Vector3::new(1.2, -3.4, 0.5);
        let rotation = Vector3::new(30.0, 45.0, 60.0);

        let round_trip =
            local_to_world(&center, &rotation) * world_to_local(&center, &rotation);

        assert_relative_eq!(round_trip, Matrix4::identity(), epsilon = 1e-4);
    }

    #[test]
    fn zero_rotation_is_pure_translation() {
        let center = Vector3::new(0.0, -1.5, 0.0);
        let matrix = local_to_world(&center, &Vector3::zeros());

        assert_relative_eq!(matrix, Matrix4::new_translation(&center), epsilon = 1e-6);
    }

    #[test]
    fn quarter_turn_about_y_sends_x_to_negative_z() {
        let matrix = local_to_world(&Vector3::zeros(), &Vector3::new(0.0, 90.0, 0.0));
        let mapped = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));

        assert_relative_eq!(mapped, Point3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn rotations_compose_x_then_y_then_z() {
        // Y를 먼저 적용하면 (0, 0, -1)이 나와버림
        let matrix = local_to_world(&Vector3::zeros(), &Vector3::new(90.0, 90.0, 0.0));
        let mapped = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));

        assert_relative_eq!(mapped, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn inverse_of_translation_negates_center() {
        let center = Vector3::new(0.0, -1.5, 0.0);
        let inverse = world_to_local(&center, &Vector3::zeros());

        assert_relative_eq!(
            inverse,
            Matrix4::new_translation(&-center),
            epsilon = 1e-6
        );
    }
}
