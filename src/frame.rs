use std::time::Instant;

use anyhow::Context;
use glam::Vec2;
use stereo_core::filters::{DofParams, DofPass, FoveatedPass, FoveationParams, UnwarpParams, UnwarpPass};
use stereo_core::{
    is_perspective, render_pass, ColorImage, DepthImage, DepthReconstructor, DisplayParameters, Eye,
    MvpSet, RenderMode, StereoPair, ViewerState, DEFAULT_FOVEA_E1_DEG, DEFAULT_FOVEA_E2_DEG,
    DEFAULT_PUPIL_DIAMETER_MM,
};

use crate::compose::{self, StereoOutput};
use crate::constants::DEFAULT_GAZE_UV;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DofSettings {
    pub pupil_diameter: f32,
}

impl Default for DofSettings {
    fn default() -> Self {
        Self {
            pupil_diameter: DEFAULT_PUPIL_DIAMETER_MM,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoveationSettings {
    pub e1: f32,
    pub e2: f32,
}

impl Default for FoveationSettings {
    fn default() -> Self {
        Self {
            e1: DEFAULT_FOVEA_E1_DEG,
            e2: DEFAULT_FOVEA_E2_DEG,
        }
    }
}

/// Which passes run after the main render, in order DoF -> foveation -> unwarp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostSettings {
    pub dof: Option<DofSettings>,
    pub foveation: Option<FoveationSettings>,
    pub unwarp: bool,
    /// Fixation point in normalised viewport coordinates, shared by both eyes.
    pub gaze_uv: Vec2,
    pub output: StereoOutput,
}

impl Default for PostSettings {
    fn default() -> Self {
        Self {
            dof: None,
            foveation: None,
            unwarp: false,
            gaze_uv: Vec2::from_array(DEFAULT_GAZE_UV),
            output: StereoOutput::default(),
        }
    }
}

impl PostSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(dof) = self.dof {
            anyhow::ensure!(
                dof.pupil_diameter.is_finite() && dof.pupil_diameter >= 0.0,
                "pupil diameter must be non-negative, got {}",
                dof.pupil_diameter
            );
        }
        if let Some(fov) = self.foveation {
            anyhow::ensure!(
                fov.e1 >= 0.0 && fov.e1 < fov.e2,
                "foveation thresholds must satisfy 0 <= e1 < e2, got e1={} e2={}",
                fov.e1,
                fov.e2
            );
        }
        Ok(())
    }
}

/// Result of one frame: the matrices used and the final display image.
pub struct FrameOutput {
    pub mvp: MvpSet,
    /// Post-processed per-eye images; `None` in mono mode.
    pub eyes: Option<StereoPair<ColorImage>>,
    pub image: ColorImage,
}

pub struct FrameRenderer {
    display: DisplayParameters,
    mode: RenderMode,
    post: PostSettings,
}

impl FrameRenderer {
    pub fn new(display: DisplayParameters, mode: RenderMode, post: PostSettings) -> anyhow::Result<Self> {
        display.validate_for(mode).context("invalid display parameters")?;
        post.validate()?;
        log::info!(
            "[frame] {}x{} px, pitch={}mm, ipd={}mm, mode={:?}",
            display.canvas_width,
            display.canvas_height,
            display.pixel_pitch,
            display.ipd,
            mode
        );
        Ok(Self {
            display,
            mode,
            post,
        })
    }

    pub fn display(&self) -> &DisplayParameters {
        &self.display
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn post(&self) -> &PostSettings {
        &self.post
    }

    pub fn set_post(&mut self, post: PostSettings) -> anyhow::Result<()> {
        post.validate()?;
        self.post = post;
        Ok(())
    }

    /// Per-eye render target size: the whole canvas in mono mode, one half of
    /// it per eye in stereo mode.
    pub fn eye_viewport(&self) -> (u32, u32) {
        match self.mode {
            RenderMode::Mono => (self.display.canvas_width, self.display.canvas_height),
            RenderMode::Stereo => (self.display.canvas_width / 2, self.display.canvas_height),
        }
    }

    pub fn update(&self, state: &ViewerState) -> MvpSet {
        stereo_core::update(state, &self.display, self.mode)
    }

    fn unwarp_params(&self, eye: Eye) -> UnwarpParams {
        match self.mode {
            RenderMode::Mono => UnwarpParams::centered(&self.display),
            RenderMode::Stereo => UnwarpParams::for_eye(&self.display, eye),
        }
    }

    /// Run the enabled passes over one eye's rendered buffers.
    pub fn post_process(
        &self,
        mvp: &MvpSet,
        eye: Eye,
        color: &ColorImage,
        depth: &DepthImage,
    ) -> anyhow::Result<ColorImage> {
        let (w, h) = color.dimensions();
        depth
            .ensure_dimensions((w, h))
            .context("depth buffer does not match colour buffer")?;
        let viewport = Vec2::new(w as f32, h as f32);
        let gaze = self.post.gaze_uv * viewport;
        let started = Instant::now();

        let mut current = color.clone();

        if let Some(dof) = self.post.dof {
            let projection = mvp.eye(eye).projection;
            if is_perspective(&projection) {
                let params = DofParams {
                    gaze_position: gaze,
                    pupil_diameter: dof.pupil_diameter,
                    pixel_pitch: self.display.pixel_pitch,
                };
                let reconstructor = DepthReconstructor::new(projection, viewport);
                current = render_pass(&DofPass::new(&current, depth, reconstructor, params), w, h);
            } else {
                log::warn!("[post] depth of field needs a perspective projection; skipped");
            }
        }

        if let Some(fov) = self.post.foveation {
            let params = FoveationParams {
                e1: fov.e1,
                e2: fov.e2,
                ..FoveationParams::new(gaze, &self.display)
            };
            current = render_pass(&FoveatedPass::new(&current, params), w, h);
        }

        if self.post.unwarp {
            let params = self.unwarp_params(eye);
            current = render_pass(&UnwarpPass::new(&current, params), w, h);
        }

        log::debug!(
            "[post] eye={:?} {}x{} in {:.1}ms",
            eye,
            w,
            h,
            started.elapsed().as_secs_f64() * 1e3
        );
        Ok(current)
    }

    /// Full frame: matrices, main render through `rasterize`, post chain and
    /// stereo composition.
    pub fn render<F>(&self, state: &ViewerState, mut rasterize: F) -> anyhow::Result<FrameOutput>
    where
        F: FnMut(&MvpSet, Eye, u32, u32) -> anyhow::Result<(ColorImage, DepthImage)>,
    {
        state.validate().context("invalid viewer state")?;
        let mvp = self.update(state);
        let (w, h) = self.eye_viewport();

        let mut shade_eye = |eye: Eye| -> anyhow::Result<ColorImage> {
            let (color, depth) =
                rasterize(&mvp, eye, w, h).with_context(|| format!("main render for {eye:?} eye"))?;
            self.post_process(&mvp, eye, &color, &depth)
        };

        let output = match self.mode {
            RenderMode::Mono => {
                let image = shade_eye(Eye::Left)?;
                FrameOutput {
                    mvp,
                    eyes: None,
                    image,
                }
            }
            RenderMode::Stereo => {
                let eyes = StereoPair::new(shade_eye(Eye::Left)?, shade_eye(Eye::Right)?);
                let image = compose::compose(&eyes, self.post.output).context("stereo composition")?;
                FrameOutput {
                    mvp,
                    eyes: Some(eyes),
                    image,
                }
            }
        };
        Ok(output)
    }
}
