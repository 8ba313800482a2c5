//! Filter template documents and stage planning.
//!
//! A template is a persisted JSON document selecting an ordered subset of
//! effect groups. Present groups become pipeline stages in a fixed order
//! (color/eq/vignette fused, then fps, then noise) regardless of document
//! order, so a given template always produces the same pipeline.

use crate::artifact;
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::filters;
use crate::pipeline::Stage;
use serde::Deserialize;

/// Color-curve triple; each channel is an engine curve expression like
/// `"0/0.1 0.5/0.6 1/0.9"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurveSet {
    pub red: String,
    pub green: String,
    pub blue: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EqSettings {
    pub contrast: f64,
    pub saturation: f64,
}

/// Vignette settings. The angle is required in the template document, same
/// as in the single-shot path; there is no baked-in constant.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VignetteSettings {
    pub angle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FpsSettings {
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoiseSettings {
    pub strength: u32,
    pub flags: String,
}

/// A named filter template. Absent groups are skipped; stage order is fixed
/// no matter which groups are present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterTemplate {
    pub curves: Option<CurveSet>,
    pub eq: Option<EqSettings>,
    pub vignette: Option<VignetteSettings>,
    pub fps: Option<FpsSettings>,
    pub noise: Option<NoiseSettings>,
}

impl FilterTemplate {
    /// Expands this template into its ordered stage list. The curve, eq and
    /// vignette groups fuse into a single stage; fps and noise each get
    /// their own. An all-absent template yields an empty plan, which the
    /// pipeline executor rejects.
    pub fn plan(&self) -> Vec<Stage> {
        let mut stages = Vec::new();

        let mut color_parts = Vec::new();
        if let Some(curves) = &self.curves {
            color_parts.push(filters::curves_expr(&curves.red, &curves.green, &curves.blue));
        }
        if let Some(eq) = &self.eq {
            color_parts.push(filters::eq_expr(eq.contrast, eq.saturation));
        }
        if let Some(vignette) = &self.vignette {
            color_parts.push(filters::vignette_expr(&vignette.angle));
        }
        if !color_parts.is_empty() {
            stages.push(Stage {
                label: "color",
                filter: color_parts.join(","),
            });
        }

        if let Some(fps) = &self.fps {
            stages.push(Stage {
                label: "fps",
                filter: filters::fps_expr(fps.value),
            });
        }

        if let Some(noise) = &self.noise {
            stages.push(Stage {
                label: "noise",
                filter: filters::noise_expr(noise.strength, &noise.flags),
            });
        }

        stages
    }
}

/// Loads the template named `name` from the configured template directory
/// (`<template_dir>/<name>.json`).
pub fn load_template(config: &CoreConfig, name: &str) -> CoreResult<FilterTemplate> {
    artifact::ensure_safe_name(name)?;
    let path = config.template_dir.join(format!("{name}.json"));
    if !path.is_file() {
        return Err(CoreError::TemplateNotFound(name.to_string()));
    }
    let text = std::fs::read_to_string(&path)?;
    serde_json::from_str(&text)
        .map_err(|e| CoreError::TemplateParse(format!("{name}: {e}")))
}
