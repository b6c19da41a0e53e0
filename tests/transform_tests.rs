// Tests for model/view/projection construction and the per-frame update.

use glam::{Mat4, Vec2, Vec3, Vec4};
use stereo_core::*;

fn approx(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

fn approx_v3(a: Vec3, b: Vec3, tol: f32) -> bool {
    (a - b).abs().max_element() <= tol
}

fn ndc(m: &Mat4, p: Vec3) -> Vec3 {
    let clip = *m * p.extend(1.0);
    clip.truncate() / clip.w
}

#[test]
fn perspective_maps_near_and_far_to_clip_range() {
    let p = compute_perspective_transform(-1.0, 1.0, 1.0, -1.0, 1.0, 100.0);
    assert!(approx(ndc(&p, Vec3::new(0.0, 0.0, -1.0)).z, -1.0, 1e-5));
    assert!(approx(ndc(&p, Vec3::new(0.0, 0.0, -100.0)).z, 1.0, 1e-5));
    // Bottom row is (0, 0, -1, 0)
    assert_eq!(entry(&p, 3, 2), -1.0);
    assert_eq!(entry(&p, 3, 3), 0.0);
    assert!(is_perspective(&p));
}

#[test]
fn off_axis_perspective_maps_bounds_to_clip_edges() {
    let p = compute_perspective_transform(-2.0, 1.0, 0.5, -1.5, 1.0, 50.0);
    let right_top = ndc(&p, Vec3::new(1.0, 0.5, -1.0));
    let left_bottom = ndc(&p, Vec3::new(-2.0, -1.5, -1.0));
    assert!(approx(right_top.x, 1.0, 1e-5));
    assert!(approx(right_top.y, 1.0, 1e-5));
    assert!(approx(left_bottom.x, -1.0, 1e-5));
    assert!(approx(left_bottom.y, -1.0, 1e-5));
    // Off-centre terms in the third column
    assert!(approx(entry(&p, 0, 2), -1.0 / 3.0, 1e-6));
    assert!(approx(entry(&p, 1, 2), -0.5, 1e-6));
}

#[test]
fn orthographic_keeps_parallel_lines_parallel() {
    let p = compute_orthographic_transform(-240.0, 240.0, 135.0, -135.0, 1.0, 10000.0);
    let near = ndc(&p, Vec3::new(100.0, 50.0, -1.0));
    let far = ndc(&p, Vec3::new(100.0, 50.0, -5000.0));
    assert!(approx(near.x, far.x, 1e-6));
    assert!(approx(near.y, far.y, 1e-6));
    assert!(approx(near.z, -1.0, 1e-5));
    assert!(approx(ndc(&p, Vec3::new(0.0, 0.0, -10000.0)).z, 1.0, 1e-5));
    assert!(!is_perspective(&p));
}

#[test]
fn model_rotates_about_y_before_x() {
    let state = ViewerState {
        model_rotation: Vec2::new(90.0, 90.0),
        ..ViewerState::default()
    };
    let m = compute_model_transform(&state);
    // Ry(90) takes +X to -Z, then Rx(90) takes -Z to +Y.
    assert!(approx_v3(m.transform_point3(Vec3::X), Vec3::Y, 1e-5));

    // The opposite order would leave +X on -Z.
    let swapped = Mat4::from_rotation_y(90f32.to_radians()) * Mat4::from_rotation_x(90f32.to_radians());
    assert!(approx_v3(swapped.transform_point3(Vec3::X), Vec3::NEG_Z, 1e-5));
}

#[test]
fn model_translation_is_applied_last() {
    let state = ViewerState {
        model_translation: Vec3::new(10.0, -20.0, 30.0),
        model_rotation: Vec2::new(0.0, 180.0),
        ..ViewerState::default()
    };
    let m = compute_model_transform(&state);
    let p = m.transform_point3(Vec3::X);
    assert!(approx_v3(p, Vec3::new(9.0, -20.0, 30.0), 1e-4));
}

#[test]
fn view_places_target_on_negative_z() {
    let state = ViewerState {
        viewer_position: Vec3::new(300.0, 200.0, 500.0),
        viewer_target: Vec3::new(10.0, -20.0, 30.0),
        ..ViewerState::default()
    };
    let v = compute_view_transform(&state, 0.0);
    let d = (state.viewer_position - state.viewer_target).length();

    assert!(approx_v3(v.transform_point3(state.viewer_position), Vec3::ZERO, 1e-3));
    assert!(approx_v3(v.transform_point3(state.viewer_target), Vec3::new(0.0, 0.0, -d), 1e-3));
}

#[test]
fn view_rotation_is_orthonormal() {
    let state = ViewerState {
        viewer_position: Vec3::new(-120.0, 340.0, 610.0),
        viewer_target: Vec3::new(40.0, 10.0, -75.0),
        ..ViewerState::default()
    };
    let v = compute_view_transform(&state, 0.0);
    let rows: Vec<Vec3> = (0..3).map(|r| v.row(r).truncate()).collect();
    for (i, a) in rows.iter().enumerate() {
        assert!(approx(a.length(), 1.0, 1e-5));
        for b in rows.iter().skip(i + 1) {
            assert!(approx(a.dot(*b), 0.0, 1e-5));
        }
    }
    // Right-handed, and the up row has no component that flips the horizon.
    assert!(approx(glam::Mat3::from_mat4(v).determinant(), 1.0, 1e-5));
    assert!(v.row(1).y > 0.0);
}

#[test]
fn eye_shift_offsets_along_camera_right() {
    let state = ViewerState::default();
    let left = compute_view_transform(&state, Eye::Left.half_ipd_shift(63.0));
    let right = compute_view_transform(&state, Eye::Right.half_ipd_shift(63.0));
    // The left eye sits at -ipd/2, so the world moves by +ipd/2 in its camera.
    assert!(approx_v3(left.transform_point3(state.viewer_position), Vec3::new(31.5, 0.0, 0.0), 1e-4));
    assert!(approx_v3(right.transform_point3(state.viewer_position), Vec3::new(-31.5, 0.0, 0.0), 1e-4));
}

#[test]
fn update_mono_shares_one_view() {
    let display = DisplayParameters::default();
    let mvp = update(&ViewerState::default(), &display, RenderMode::Mono);
    assert!(!mvp.is_stereo());
    assert_eq!(mvp.eye(Eye::Left), mvp.eye(Eye::Right));

    let bounds = desktop_frustum(DEFAULT_CLIP_NEAR, DEFAULT_CLIP_FAR, &display, true);
    assert_eq!(mvp.eye(Eye::Left).projection, perspective_from_bounds(&bounds));
}

#[test]
fn update_mono_orthographic_uses_linear_depth() {
    let state = ViewerState {
        perspective: false,
        ..ViewerState::default()
    };
    let mvp = update(&state, &DisplayParameters::default(), RenderMode::Mono);
    let p = mvp.eye(Eye::Left).projection;
    assert_eq!(entry(&p, 3, 3), 1.0);
    assert!(!is_perspective(&p));
}

#[test]
fn update_stereo_uses_per_eye_frustums() {
    let display = DisplayParameters::default();
    let state = ViewerState::default();
    let mvp = update(&state, &display, RenderMode::Stereo);
    assert!(mvp.is_stereo());

    let bounds = compute_top_bottom_left_right(state.clip_near, state.clip_far, &display);
    for eye in Eye::BOTH {
        assert_eq!(mvp.eye(eye).projection, perspective_from_bounds(&bounds[eye]));
        let expected_view = compute_view_transform(&state, eye.half_ipd_shift(display.ipd));
        assert_eq!(mvp.eye(eye).view, expected_view);
    }
    assert_ne!(mvp.eye(Eye::Left).view, mvp.eye(Eye::Right).view);
}

#[test]
fn update_top_view_overrides_camera() {
    let state = ViewerState {
        top_view: true,
        viewer_position: Vec3::new(500.0, 20.0, 100.0),
        ..ViewerState::default()
    };
    for mode in [RenderMode::Mono, RenderMode::Stereo] {
        let mvp = update(&state, &DisplayParameters::default(), mode);
        for eye in Eye::BOTH {
            assert_eq!(mvp.eye(eye).view, TOP_VIEW_MATRIX);
        }
    }
    // The overhead camera looks straight down at the origin from 1500 mm.
    let origin = TOP_VIEW_MATRIX * Vec4::new(0.0, 0.0, 0.0, 1.0);
    assert!(approx_v3(origin.truncate(), Vec3::new(0.0, 0.0, -1500.0), 1e-4));
}

#[test]
fn top_view_keeps_square_pixels_in_each_eye() {
    let display = DisplayParameters {
        canvas_width: 64,
        canvas_height: 32,
        pixel_pitch: 2.0,
        ipd: 8.0,
        ..DisplayParameters::default()
    };
    let h = display.canvas_height as f32;
    for (mode, w_eye) in [(RenderMode::Mono, 64.0), (RenderMode::Stereo, 32.0)] {
        for top_view in [false, true] {
            let state = ViewerState {
                top_view,
                ..ViewerState::default()
            };
            let mvp = update(&state, &display, mode);
            for eye in Eye::BOTH {
                let p = mvp.eye(eye).projection;
                let x_scale = entry(&p, 0, 0) * w_eye;
                let y_scale = entry(&p, 1, 1) * h;
                assert!(
                    approx(x_scale / y_scale, 1.0, 1e-5),
                    "{mode:?} top_view={top_view}: {x_scale} vs {y_scale}"
                );
            }
        }
    }
}

#[test]
fn update_is_a_pure_function_of_its_inputs() {
    let display = DisplayParameters::default();
    let state = ViewerState {
        model_rotation: Vec2::new(12.0, -30.0),
        ..ViewerState::default()
    };
    let a = update(&state, &display, RenderMode::Stereo);
    let b = update(&state, &display, RenderMode::Stereo);
    assert_eq!(a, b);
}

#[test]
fn uniforms_pack_four_column_major_matrices() {
    let mvp = update(&ViewerState::default(), &DisplayParameters::default(), RenderMode::Stereo);
    let u = mvp.uniforms(Eye::Right);
    assert_eq!(bytemuck::bytes_of(&u).len(), 4 * 16 * 4);
    assert_eq!(u.projection, mvp.eye(Eye::Right).projection.to_cols_array_2d());
    let mv = mvp.eye(Eye::Right).view * mvp.model;
    assert_eq!(u.model_view, mv.to_cols_array_2d());
}

#[test]
fn invalid_clip_planes_are_rejected() {
    let state = ViewerState {
        clip_near: 100.0,
        clip_far: 10.0,
        ..ViewerState::default()
    };
    assert_eq!(
        state.validate(),
        Err(Error::InvalidClipPlanes {
            near: 100.0,
            far: 10.0
        })
    );
    assert!(ViewerState::default().validate().is_ok());
}
