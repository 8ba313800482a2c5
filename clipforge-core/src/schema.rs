//! Parameter schema registry for the transform family.
//!
//! Maps each transform kind to its required and optional parameter names and
//! per-parameter constraints, and builds the typed [`Transform`] plan once a
//! parameter map has passed validation. Required parameters are checked in
//! declared order before any range/enum constraint, so a missing parameter
//! is always reported as `MissingParameter`, never masked by a range error.

use crate::error::{CoreError, CoreResult};
use crate::filters::{FlipDirection, OverlayPosition, Transform};
use serde_json::Value;
use std::str::FromStr;

/// Heterogeneous parameter map, as delivered by the call surface.
pub type Params = serde_json::Map<String, Value>;

/// The closed set of parameterized transform kinds the registry governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Crop,
    Scale,
    Rotate,
    Flip,
    Transpose,
    Pad,
    Overlay,
}

impl TransformKind {
    pub fn name(self) -> &'static str {
        match self {
            TransformKind::Crop => "crop",
            TransformKind::Scale => "scale",
            TransformKind::Rotate => "rotate",
            TransformKind::Flip => "flip",
            TransformKind::Transpose => "transpose",
            TransformKind::Pad => "pad",
            TransformKind::Overlay => "overlay",
        }
    }

    /// Required parameter names, in reporting order.
    pub fn required_params(self) -> &'static [&'static str] {
        match self {
            TransformKind::Crop => &["x", "y", "width", "height"],
            TransformKind::Scale => &["width", "height"],
            TransformKind::Rotate => &["angle"],
            TransformKind::Flip => &["direction"],
            TransformKind::Transpose => &["dir"],
            TransformKind::Pad => &["width", "height", "x", "y"],
            TransformKind::Overlay => &["position", "opacity"],
        }
    }

    /// Optional parameters with their defaults.
    pub fn optional_params(self) -> &'static [(&'static str, &'static str)] {
        match self {
            TransformKind::Pad => &[("color", "black")],
            _ => &[],
        }
    }
}

impl FromStr for TransformKind {
    type Err = CoreError;

    // An unknown kind is a schema error, not a silent no-op.
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "crop" => Ok(TransformKind::Crop),
            "scale" => Ok(TransformKind::Scale),
            "rotate" => Ok(TransformKind::Rotate),
            "flip" => Ok(TransformKind::Flip),
            "transpose" => Ok(TransformKind::Transpose),
            "pad" => Ok(TransformKind::Pad),
            "overlay" => Ok(TransformKind::Overlay),
            other => Err(CoreError::UnknownOperation(other.to_string())),
        }
    }
}

/// Validates `params` against the registry: every required parameter must be
/// present (`MissingParameter`), and every present parameter must satisfy
/// its constraint (`InvalidParameter`). Short-circuits on the first failure.
pub fn validate_params(kind: TransformKind, params: &Params) -> CoreResult<()> {
    for name in kind.required_params() {
        if !params.contains_key(*name) {
            return Err(CoreError::MissingParameter {
                kind: kind.name(),
                name,
            });
        }
    }
    for name in kind.required_params() {
        check_param(kind, name, &params[*name])?;
    }
    for (name, _default) in kind.optional_params() {
        if let Some(value) = params.get(*name) {
            check_param(kind, name, value)?;
        }
    }
    Ok(())
}

/// Constraint predicate for one parameter of one kind.
fn check_param(kind: TransformKind, name: &str, value: &Value) -> CoreResult<()> {
    match (kind, name) {
        (TransformKind::Crop | TransformKind::Pad, "width" | "height") => {
            positive_int(kind, name, value).map(|_| ())
        }
        (TransformKind::Crop | TransformKind::Pad, "x" | "y") => {
            non_negative_int(kind, name, value).map(|_| ())
        }
        (TransformKind::Scale, "width" | "height") => {
            // -1 and -2 are engine placeholders for aspect-preserving scale.
            let v = integer(kind, name, value)?;
            if v >= 1 || v == -1 || v == -2 {
                Ok(())
            } else {
                Err(invalid(kind, name, "must be >= 1, or -1/-2 to preserve aspect"))
            }
        }
        (TransformKind::Rotate, "angle") => {
            let v = number(kind, name, value)?;
            if v.is_finite() {
                Ok(())
            } else {
                Err(invalid(kind, name, "must be a finite number of degrees"))
            }
        }
        (TransformKind::Flip, "direction") => {
            string(kind, name, value)?.parse::<FlipDirection>().map(|_| ())
        }
        (TransformKind::Transpose, "dir") => {
            let v = integer(kind, name, value)?;
            if (0..=3).contains(&v) {
                Ok(())
            } else {
                Err(invalid(kind, name, "must be in 0..=3"))
            }
        }
        (TransformKind::Pad, "color") => {
            let v = string(kind, name, value)?;
            if v.is_empty() {
                Err(invalid(kind, name, "must be a non-empty color name"))
            } else {
                Ok(())
            }
        }
        (TransformKind::Overlay, "position") => {
            string(kind, name, value)?.parse::<OverlayPosition>().map(|_| ())
        }
        (TransformKind::Overlay, "opacity") => {
            let v = number(kind, name, value)?;
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(invalid(kind, name, "must be in [0, 1]"))
            }
        }
        _ => Err(invalid(kind, name, "is not a recognized parameter")),
    }
}

/// Builds the typed transform plan from a parameter map that has passed
/// [`validate_params`].
pub fn build_transform(kind: TransformKind, params: &Params) -> CoreResult<Transform> {
    validate_params(kind, params)?;
    let plan = match kind {
        TransformKind::Crop => Transform::Crop {
            width: positive_int(kind, "width", &params["width"])?,
            height: positive_int(kind, "height", &params["height"])?,
            x: non_negative_int(kind, "x", &params["x"])?,
            y: non_negative_int(kind, "y", &params["y"])?,
        },
        TransformKind::Scale => Transform::Scale {
            width: integer(kind, "width", &params["width"])?,
            height: integer(kind, "height", &params["height"])?,
        },
        TransformKind::Rotate => Transform::Rotate {
            angle: number(kind, "angle", &params["angle"])?,
        },
        TransformKind::Flip => Transform::Flip {
            direction: string(kind, "direction", &params["direction"])?.parse()?,
        },
        TransformKind::Transpose => Transform::Transpose {
            dir: integer(kind, "dir", &params["dir"])? as u8,
        },
        TransformKind::Pad => Transform::Pad {
            width: positive_int(kind, "width", &params["width"])?,
            height: positive_int(kind, "height", &params["height"])?,
            x: non_negative_int(kind, "x", &params["x"])?,
            y: non_negative_int(kind, "y", &params["y"])?,
            color: params
                .get("color")
                .and_then(Value::as_str)
                .unwrap_or("black")
                .to_string(),
        },
        TransformKind::Overlay => {
            return Err(CoreError::InvalidParameter(
                "overlay is compiled by build_overlay, not build_transform".to_string(),
            ));
        }
    };
    Ok(plan)
}

/// Builds the validated overlay plan (position keyword, opacity).
pub fn build_overlay(params: &Params) -> CoreResult<(OverlayPosition, f64)> {
    let kind = TransformKind::Overlay;
    validate_params(kind, params)?;
    let position = string(kind, "position", &params["position"])?.parse()?;
    let opacity = number(kind, "opacity", &params["opacity"])?;
    Ok((position, opacity))
}

fn invalid(kind: TransformKind, name: &str, detail: &str) -> CoreError {
    CoreError::InvalidParameter(format!("{}.{name} {detail}", kind.name()))
}

fn number(kind: TransformKind, name: &str, value: &Value) -> CoreResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| invalid(kind, name, "must be a number"))
}

fn string<'a>(kind: TransformKind, name: &str, value: &'a Value) -> CoreResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| invalid(kind, name, "must be a string"))
}

fn integer(kind: TransformKind, name: &str, value: &Value) -> CoreResult<i64> {
    value
        .as_i64()
        .ok_or_else(|| invalid(kind, name, "must be an integer"))
}

fn positive_int(kind: TransformKind, name: &str, value: &Value) -> CoreResult<u32> {
    match integer(kind, name, value)? {
        v if v >= 1 && v <= i64::from(u32::MAX) => Ok(v as u32),
        _ => Err(invalid(kind, name, "must be a positive integer")),
    }
}

fn non_negative_int(kind: TransformKind, name: &str, value: &Value) -> CoreResult<u32> {
    match integer(kind, name, value)? {
        v if (0..=i64::from(u32::MAX)).contains(&v) => Ok(v as u32),
        _ => Err(invalid(kind, name, "must be a non-negative integer")),
    }
}
