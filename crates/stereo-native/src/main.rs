use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glam::{DVec3, EulerRot, Mat4, Quat, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use stereo_core::tracking::{ImuCalibration, ImuSample, OrientationTracker};
use stereo_core::{
    compute_top_bottom_left_right, desktop_frustum, entry, perspective_from_bounds, ColorImage,
    DisplayParameters, Eye, FrustumBounds, RenderMode, ViewerState, DEFAULT_CANVAS_HEIGHT,
    DEFAULT_CANVAS_WIDTH, DEFAULT_CLIP_FAR, DEFAULT_CLIP_NEAR, DEFAULT_DISTANCE_SCREEN_VIEWER_MM,
    DEFAULT_FOVEA_E1_DEG, DEFAULT_FOVEA_E2_DEG, DEFAULT_IMU_ALPHA, DEFAULT_IPD_MM,
    DEFAULT_LENS_MAGNIFICATION, DEFAULT_PIXEL_PITCH_MM, DEFAULT_PUPIL_DIAMETER_MM,
};
use stereo_view::camera::apply_head_orientation;
use stereo_view::{
    to_rgba8_bytes, DofSettings, FoveationSettings, FrameRenderer, PostSettings, StereoOutput,
    TestScene,
};

const GRAVITY: f64 = 9.81;

#[derive(Parser)]
#[command(name = "stereo-native")]
#[command(about = "Headless stereo renderer and IMU tracking playground")]
struct Cli {
    /// Log filter in env_logger syntax; falls back to RUST_LOG, then "info"
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the test scene through the post chain and write PNGs
    Render(RenderArgs),

    /// Print frustum bounds and projection matrices
    Frustum {
        #[command(flatten)]
        display: DisplayArgs,
        #[arg(long, default_value_t = DEFAULT_CLIP_NEAR)]
        near: f32,
        #[arg(long, default_value_t = DEFAULT_CLIP_FAR)]
        far: f32,
    },

    /// Run the orientation filters over a synthetic IMU stream
    Track(TrackArgs),
}

#[derive(Args, Clone)]
struct DisplayArgs {
    #[arg(long, default_value_t = DEFAULT_CANVAS_WIDTH)]
    width: u32,
    #[arg(long, default_value_t = DEFAULT_CANVAS_HEIGHT)]
    height: u32,
    /// Pixel pitch (mm)
    #[arg(long, default_value_t = DEFAULT_PIXEL_PITCH_MM)]
    pitch: f32,
    /// Viewer to screen distance (mm)
    #[arg(long, default_value_t = DEFAULT_DISTANCE_SCREEN_VIEWER_MM)]
    distance: f32,
    /// Interpupillary distance (mm)
    #[arg(long, default_value_t = DEFAULT_IPD_MM)]
    ipd: f32,
    #[arg(long, default_value_t = DEFAULT_LENS_MAGNIFICATION)]
    magnification: f32,
}

impl DisplayArgs {
    fn to_display(&self) -> DisplayParameters {
        DisplayParameters {
            canvas_width: self.width,
            canvas_height: self.height,
            pixel_pitch: self.pitch,
            distance_screen_viewer: self.distance,
            ipd: self.ipd,
            lens_magnification: self.magnification,
            ..DisplayParameters::default()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Mono,
    Stereo,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputArg {
    SideBySide,
    Anaglyph,
}

#[derive(Args)]
struct RenderArgs {
    #[command(flatten)]
    display: DisplayArgs,
    #[arg(long, value_enum, default_value = "stereo")]
    mode: ModeArg,
    #[arg(long, value_enum, default_value = "side-by-side")]
    output: OutputArg,
    /// Enable retinal depth of field
    #[arg(long)]
    dof: bool,
    #[arg(long, default_value_t = DEFAULT_PUPIL_DIAMETER_MM)]
    pupil: f32,
    /// Enable gaze-contingent foveated blur
    #[arg(long)]
    foveate: bool,
    #[arg(long, default_value_t = DEFAULT_FOVEA_E1_DEG)]
    e1: f32,
    #[arg(long, default_value_t = DEFAULT_FOVEA_E2_DEG)]
    e2: f32,
    /// Pre-distort for the HMD lenses
    #[arg(long)]
    unwarp: bool,
    /// Gaze point as normalised "u,v"
    #[arg(long, default_value = "0.5,0.5")]
    gaze: String,
    /// Orthographic projection (mono only)
    #[arg(long)]
    orthographic: bool,
    #[arg(long)]
    top_view: bool,
    /// Model rotation about X, then Y (degrees)
    #[arg(long, default_value_t = 0.0)]
    rotate_x: f32,
    #[arg(long, default_value_t = 0.0)]
    rotate_y: f32,
    /// Head yaw applied to the viewer (degrees)
    #[arg(long, default_value_t = 0.0)]
    head_yaw: f32,
    #[arg(short, long, default_value = "out")]
    out: PathBuf,
}

#[derive(Args)]
struct TrackArgs {
    #[arg(long, default_value_t = 2000)]
    samples: usize,
    /// Stationary samples used for bias calibration
    #[arg(long, default_value_t = 500)]
    calibration: usize,
    #[arg(long, default_value_t = 1000.0)]
    rate_hz: f64,
    /// True yaw rate of the simulated head (deg/s)
    #[arg(long, default_value_t = 45.0)]
    yaw_rate: f64,
    /// Constant gyro bias added to every sample (deg/s)
    #[arg(long, default_value_t = 0.5)]
    bias: f64,
    /// Std-dev-like amplitude of uniform sensor noise
    #[arg(long, default_value_t = 0.05)]
    noise: f64,
    #[arg(long, default_value_t = DEFAULT_IMU_ALPHA)]
    alpha: f64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// `env_filter` uses the `env_logger` filter syntax, e.g. "stereo_view=debug".
#[derive(Debug, Clone, Default)]
struct LoggingConfig {
    env_filter: Option<String>,
}

fn init_logging(config: LoggingConfig) {
    let mut builder = env_logger::Builder::new();
    if let Some(filter) = config.env_filter {
        builder.parse_filters(&filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
    log::debug!("logging initialized");
}

fn parse_gaze(s: &str) -> Result<Vec2> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("gaze '{s}' is not \"u,v\""))?;
    match parts.as_slice() {
        [u, v] => Ok(Vec2::new(*u, *v)),
        _ => Err(anyhow!("gaze '{s}' needs exactly two components")),
    }
}

fn write_png(path: &Path, image: &ColorImage) -> Result<()> {
    let (w, h) = image.dimensions();
    let buffer = image::RgbaImage::from_raw(w, h, to_rgba8_bytes(image))
        .ok_or_else(|| anyhow!("pixel buffer does not fit {w}x{h}"))?;
    buffer
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("[out] wrote {}", path.display());
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<()> {
    let display = args.display.to_display();
    let mode = match args.mode {
        ModeArg::Mono => RenderMode::Mono,
        ModeArg::Stereo => RenderMode::Stereo,
    };
    let post = PostSettings {
        dof: args.dof.then_some(DofSettings {
            pupil_diameter: args.pupil,
        }),
        foveation: args.foveate.then_some(FoveationSettings {
            e1: args.e1,
            e2: args.e2,
        }),
        unwarp: args.unwarp,
        gaze_uv: parse_gaze(&args.gaze)?,
        output: match args.output {
            OutputArg::SideBySide => StereoOutput::SideBySide,
            OutputArg::Anaglyph => StereoOutput::Anaglyph,
        },
    };
    let renderer = FrameRenderer::new(display, mode, post)?;

    let base = ViewerState {
        model_rotation: Vec2::new(args.rotate_x, args.rotate_y),
        perspective: !args.orthographic,
        top_view: args.top_view,
        ..ViewerState::default()
    };
    let head = Quat::from_rotation_y(args.head_yaw.to_radians());
    let state = apply_head_orientation(&base, head);

    let scene = TestScene::default();
    let started = Instant::now();
    let frame = renderer.render(&state, |mvp, eye, w, h| {
        scene.render_eye(&mvp.model, mvp.eye(eye), w, h)
    })?;
    log::info!(
        "[frame] rendered in {:.1}ms",
        started.elapsed().as_secs_f64() * 1e3
    );

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    write_png(&args.out.join("frame.png"), &frame.image)?;
    if let Some(eyes) = &frame.eyes {
        for eye in Eye::BOTH {
            let name = match eye {
                Eye::Left => "left.png",
                Eye::Right => "right.png",
            };
            write_png(&args.out.join(name), &eyes[eye])?;
        }
    }
    Ok(())
}

fn print_bounds(label: &str, b: &FrustumBounds, projection: &Mat4) {
    println!(
        "{label}: left={:.4} right={:.4} top={:.4} bottom={:.4} near={} far={}",
        b.left, b.right, b.top, b.bottom, b.near, b.far
    );
    for row in 0..4 {
        println!(
            "  [{:>10.4} {:>10.4} {:>10.4} {:>10.4}]",
            entry(projection, row, 0),
            entry(projection, row, 1),
            entry(projection, row, 2),
            entry(projection, row, 3)
        );
    }
}

fn run_frustum(display: DisplayArgs, near: f32, far: f32) -> Result<()> {
    let display = display.to_display();
    display.validate().context("invalid display parameters")?;
    ViewerState {
        clip_near: near,
        clip_far: far,
        ..ViewerState::default()
    }
    .validate()?;

    let desktop = desktop_frustum(near, far, &display, true);
    print_bounds("desktop", &desktop, &perspective_from_bounds(&desktop));
    let eyes = compute_top_bottom_left_right(near, far, &display);
    for eye in Eye::BOTH {
        let label = format!("{eye:?}").to_lowercase();
        print_bounds(&label, &eyes[eye], &perspective_from_bounds(&eyes[eye]));
    }
    Ok(())
}

fn noisy(rng: &mut StdRng, v: DVec3, amplitude: f64) -> DVec3 {
    if amplitude <= 0.0 {
        return v;
    }
    v + DVec3::new(
        rng.gen_range(-amplitude..amplitude),
        rng.gen_range(-amplitude..amplitude),
        rng.gen_range(-amplitude..amplitude),
    )
}

fn run_track(args: TrackArgs) -> Result<()> {
    if !(args.rate_hz.is_finite() && args.rate_hz > 0.0) {
        return Err(anyhow!("sample rate must be positive, got {}", args.rate_hz));
    }
    let dt = 1.0 / args.rate_hz;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let bias = DVec3::splat(args.bias);
    let gravity = DVec3::new(0.0, GRAVITY, 0.0);

    let resting: Vec<ImuSample> = (0..args.calibration)
        .map(|_| ImuSample {
            gyr: noisy(&mut rng, bias, args.noise),
            acc: noisy(&mut rng, gravity, args.noise),
            dt,
        })
        .collect();
    let calibration = ImuCalibration::from_samples(&resting).context("calibration")?;
    println!(
        "calibration: gyr_bias={:.4?} gyr_var={:.6?}",
        calibration.gyr_bias, calibration.gyr_variance
    );

    let mut tracker = OrientationTracker::new(args.alpha);
    tracker.calibrate(&calibration);
    let truth_rate = DVec3::new(0.0, args.yaw_rate, 0.0);
    let report_every = (args.samples / 10).max(1);

    for i in 1..=args.samples {
        let sample = ImuSample {
            gyr: noisy(&mut rng, truth_rate + bias, args.noise),
            acc: noisy(&mut rng, gravity, args.noise),
            dt,
        };
        let estimate = tracker.process(&sample)?;
        if i % report_every == 0 {
            let t = i as f64 * dt;
            let (yaw, pitch, roll) = estimate.quaternion_comp.to_euler(EulerRot::YXZ);
            println!(
                "t={t:>7.3}s truth_yaw={:>8.2} comp(yaw={:>8.2} pitch={:>6.2} roll={:>6.2}) acc(pitch={:>6.2} roll={:>6.2})",
                args.yaw_rate * t,
                yaw.to_degrees(),
                pitch.to_degrees(),
                roll.to_degrees(),
                estimate.euler_acc.x,
                estimate.euler_acc.z,
            );
        }
    }

    let head = tracker.estimate().quaternion_comp.as_quat();
    let state = apply_head_orientation(&ViewerState::default(), head);
    let look = (state.viewer_target - state.viewer_position).normalize_or_zero();
    println!("final look direction: {:.4?}", look);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
    });

    match cli.command {
        Commands::Render(args) => run_render(args),
        Commands::Frustum { display, near, far } => run_frustum(display, near, far),
        Commands::Track(args) => run_track(args),
    }
}
