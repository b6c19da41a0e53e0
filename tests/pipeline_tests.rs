// End-to-end frames: test scene -> post chain -> composition.

use glam::{Quat, Vec2, Vec3, Vec4};
use stereo_core::*;
use stereo_view::camera::{apply_head_orientation, pixel_to_world_ray, ray_plane, ray_sphere};
use stereo_view::compose::{anaglyph, side_by_side};
use stereo_view::*;

/// 64 x 32 px panel, 128 x 64 mm, wide enough for a 63 mm IPD.
fn small_display() -> DisplayParameters {
    DisplayParameters {
        canvas_width: 64,
        canvas_height: 32,
        pixel_pitch: 2.0,
        ..DisplayParameters::default()
    }
}

fn render(renderer: &FrameRenderer, state: &ViewerState) -> FrameOutput {
    let scene = TestScene::default();
    renderer
        .render(state, |mvp, eye, w, h| scene.render_eye(&mvp.model, mvp.eye(eye), w, h))
        .unwrap()
}

#[test]
fn stereo_side_by_side_fills_the_canvas() {
    let renderer = FrameRenderer::new(small_display(), RenderMode::Stereo, PostSettings::default()).unwrap();
    assert_eq!(renderer.eye_viewport(), (32, 32));

    let frame = render(&renderer, &ViewerState::default());
    assert!(frame.mvp.is_stereo());
    assert_eq!(frame.image.dimensions(), (64, 32));
    let eyes = frame.eyes.expect("stereo frames keep per-eye images");
    assert_eq!(eyes.left.get(5, 7), frame.image.get(5, 7));
    assert_eq!(eyes.right.get(5, 7), frame.image.get(32 + 5, 7));
}

#[test]
fn eyes_see_different_images() {
    let renderer = FrameRenderer::new(small_display(), RenderMode::Stereo, PostSettings::default()).unwrap();
    let frame = render(&renderer, &ViewerState::default());
    let eyes = frame.eyes.unwrap();
    assert_ne!(eyes.left, eyes.right);
}

#[test]
fn anaglyph_frames_are_eye_sized_and_opaque() {
    let post = PostSettings {
        output: StereoOutput::Anaglyph,
        ..PostSettings::default()
    };
    let renderer = FrameRenderer::new(small_display(), RenderMode::Stereo, post).unwrap();
    let frame = render(&renderer, &ViewerState::default());
    assert_eq!(frame.image.dimensions(), (32, 32));
    assert!(frame.image.texels().iter().all(|c| c.w == 1.0));
}

#[test]
fn mono_frames_use_the_whole_canvas() {
    let renderer = FrameRenderer::new(small_display(), RenderMode::Mono, PostSettings::default()).unwrap();
    assert_eq!(renderer.eye_viewport(), (64, 32));
    let frame = render(&renderer, &ViewerState::default());
    assert!(frame.eyes.is_none());
    assert_eq!(frame.image.dimensions(), (64, 32));
}

#[test]
fn full_post_chain_runs_on_both_eyes() {
    let post = PostSettings {
        dof: Some(DofSettings::default()),
        foveation: Some(FoveationSettings::default()),
        unwarp: true,
        gaze_uv: Vec2::new(0.4, 0.6),
        output: StereoOutput::SideBySide,
    };
    let renderer = FrameRenderer::new(small_display(), RenderMode::Stereo, post).unwrap();
    let frame = render(&renderer, &ViewerState::default());
    assert_eq!(frame.image.dimensions(), (64, 32));
    for c in frame.image.texels() {
        assert!(c.is_finite());
        assert!((c.w - 1.0).abs() < 1e-4);
    }
}

#[test]
fn dof_is_skipped_for_orthographic_views() {
    let post = PostSettings {
        dof: Some(DofSettings::default()),
        ..PostSettings::default()
    };
    let renderer = FrameRenderer::new(small_display(), RenderMode::Mono, post).unwrap();
    let state = ViewerState {
        perspective: false,
        ..ViewerState::default()
    };
    let mvp = renderer.update(&state);
    let (color, depth) = TestScene::default()
        .render_eye(&mvp.model, mvp.eye(Eye::Left), 64, 32)
        .unwrap();
    let out = renderer.post_process(&mvp, Eye::Left, &color, &depth).unwrap();
    assert_eq!(out, color);
}

#[test]
fn post_process_rejects_mismatched_buffers() {
    let renderer = FrameRenderer::new(small_display(), RenderMode::Mono, PostSettings::default()).unwrap();
    let mvp = renderer.update(&ViewerState::default());
    let color = Image::filled(8, 8, Vec4::ONE);
    let depth = Image::filled(4, 8, 1.0f32);
    assert!(renderer.post_process(&mvp, Eye::Left, &color, &depth).is_err());
}

#[test]
fn invalid_configuration_is_rejected() {
    let narrow = DisplayParameters {
        canvas_width: 16,
        ..small_display()
    };
    assert!(FrameRenderer::new(narrow, RenderMode::Stereo, PostSettings::default()).is_err());

    let inverted = PostSettings {
        foveation: Some(FoveationSettings { e1: 20.0, e2: 5.0 }),
        ..PostSettings::default()
    };
    assert!(FrameRenderer::new(small_display(), RenderMode::Mono, inverted).is_err());

    let mut renderer =
        FrameRenderer::new(small_display(), RenderMode::Mono, PostSettings::default()).unwrap();
    assert!(renderer.set_post(inverted).is_err());
    assert_eq!(*renderer.post(), PostSettings::default());

    let bad_clip = ViewerState {
        clip_near: 0.0,
        ..ViewerState::default()
    };
    let scene = TestScene::default();
    let result = renderer.render(&bad_clip, |mvp, eye, w, h| scene.render_eye(&mvp.model, mvp.eye(eye), w, h));
    assert!(result.is_err());
}

#[test]
fn stereo_needs_an_even_canvas_width() {
    let odd = DisplayParameters {
        canvas_width: 65,
        canvas_height: 16,
        ..small_display()
    };
    let err = FrameRenderer::new(odd.clone(), RenderMode::Stereo, PostSettings::default())
        .err()
        .expect("odd stereo widths are rejected");
    assert_eq!(err.root_cause().to_string(), Error::OddStereoWidth(65).to_string());

    // Mono frames use every column.
    let renderer = FrameRenderer::new(odd, RenderMode::Mono, PostSettings::default()).unwrap();
    let frame = render(&renderer, &ViewerState::default());
    assert_eq!(frame.image.dimensions(), (65, 16));
}

#[test]
fn scene_depth_reconstructs_to_the_sphere_surface() {
    let renderer = FrameRenderer::new(small_display(), RenderMode::Mono, PostSettings::default()).unwrap();
    let mvp = renderer.update(&ViewerState::default());
    let eye = mvp.eye(Eye::Left);
    let (color, depth) = TestScene::default().render_eye(&mvp.model, eye, 64, 32).unwrap();

    // The middle sphere (r = 70) sits at the target, 800 mm away.
    let recon = DepthReconstructor::new(eye.projection, Vec2::new(64.0, 32.0));
    let d = recon.distance_at(&depth, Vec2::new(32.0, 16.0));
    assert!((d - 730.0).abs() < 1.0, "distance {d}");

    let c = color.get(32, 16);
    assert!(c.y > c.x && c.y > c.z, "{c:?}");
    assert!(depth.texels().iter().all(|d| (0.0..=1.0).contains(d)));
}

#[test]
fn compositing_checks_eye_sizes() {
    let a = Image::filled(4, 4, Vec4::ONE);
    let b = Image::filled(5, 4, Vec4::ONE);
    let pair = StereoPair::new(a.clone(), b);
    assert!(side_by_side(&pair).is_err());
    assert!(anaglyph(&pair).is_err());

    let pair = StereoPair::new(a.clone(), Image::filled(4, 4, Vec4::new(0.0, 0.0, 0.0, 1.0)));
    let sbs = side_by_side(&pair).unwrap();
    assert_eq!(sbs.dimensions(), (8, 4));
    assert_eq!(sbs.get(0, 0), Vec4::ONE);
    assert_eq!(sbs.get(4, 0), Vec4::new(0.0, 0.0, 0.0, 1.0));
}

#[test]
fn rgba8_output_is_top_row_first() {
    let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
    let blue = Vec4::new(0.0, 0.0, 1.0, 1.0);
    // Row 0 is the bottom row.
    let img = Image::from_fn(1, 2, |_, y| if y == 0 { red } else { blue });
    assert_eq!(to_rgba8_bytes(&img), vec![0, 0, 255, 255, 255, 0, 0, 255]);

    assert_eq!(to_rgba8(Vec4::new(2.0, -1.0, 0.5, 1.0)), [255, 0, 128, 255]);
    // Anaglyph white rounds to full intensity.
    let white = stereo_core::filters::luminance(Vec4::ONE);
    assert_eq!(to_rgba8(Vec4::new(white, white, white, 1.0)), [255; 4]);
}

#[test]
fn head_yaw_turns_the_look_direction() {
    let state = ViewerState::default();
    let turned = apply_head_orientation(&state, Quat::from_rotation_y(90f32.to_radians()));
    assert_eq!(turned.viewer_position, state.viewer_position);
    assert!((turned.viewer_target - Vec3::new(-800.0, 0.0, 800.0)).length() < 1e-3);

    let same = apply_head_orientation(&state, Quat::IDENTITY);
    assert_eq!(same, state);
}

#[test]
fn centre_ray_passes_through_the_target() {
    let display = small_display();
    let mvp = update(&ViewerState::default(), &display, RenderMode::Mono);
    let vp = mvp.eye(Eye::Left).view_projection();
    let (origin, dir) = pixel_to_world_ray(&vp, Vec2::new(32.0, 16.0), Vec2::new(64.0, 32.0));
    // Origin on the near plane, 1 mm in front of the viewer.
    assert!((origin - Vec3::new(0.0, 0.0, 799.0)).length() < 1e-2);
    assert!((dir - Vec3::NEG_Z).length() < 1e-4);
}

#[test]
fn ray_primitives_hit_and_miss() {
    let t = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 2.0).unwrap();
    assert!((t - 3.0).abs() < 1e-5);
    assert!(ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 5.0), 2.0).is_none());

    let t = ray_plane(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, Vec3::Y, -100.0).unwrap();
    assert!((t - 110.0).abs() < 1e-4);
    // Parallel and behind-the-origin rays miss.
    assert!(ray_plane(Vec3::ZERO, Vec3::X, Vec3::Y, -100.0).is_none());
    assert!(ray_plane(Vec3::ZERO, Vec3::Y, Vec3::Y, -100.0).is_none());
}
