//! Filter-graph expression compiler.
//!
//! Pure string builders mapping validated operation parameters to the
//! expressions the engine consumes. Nothing here touches the filesystem or
//! spawns a process; the pipeline executor and the single-shot operations
//! pass these strings as `-vf`/`-filter_complex` arguments.

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// Symbolic overlay positions, resolved to coordinate expressions in the
/// engine's expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl OverlayPosition {
    /// Coordinate expression for this position, with a 10px margin from the
    /// nearest corner. `main_w`/`overlay_w` are resolved by the engine at
    /// run time, not precomputed here.
    pub fn coords(self) -> &'static str {
        match self {
            OverlayPosition::TopLeft => "10:10",
            OverlayPosition::TopRight => "main_w-overlay_w-10:10",
            OverlayPosition::BottomLeft => "10:main_h-overlay_h-10",
            OverlayPosition::BottomRight => "main_w-overlay_w-10:main_h-overlay_h-10",
            OverlayPosition::Center => "(main_w-overlay_w)/2:(main_h-overlay_h)/2",
        }
    }

    pub const KEYWORDS: &'static [&'static str] =
        &["top-left", "top-right", "bottom-left", "bottom-right", "center"];
}

impl FromStr for OverlayPosition {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "top-left" => Ok(OverlayPosition::TopLeft),
            "top-right" => Ok(OverlayPosition::TopRight),
            "bottom-left" => Ok(OverlayPosition::BottomLeft),
            "bottom-right" => Ok(OverlayPosition::BottomRight),
            "center" => Ok(OverlayPosition::Center),
            other => Err(CoreError::InvalidParameter(format!(
                "position must be one of {}; got '{other}'",
                OverlayPosition::KEYWORDS.join(", ")
            ))),
        }
    }
}

/// Mirror axis for the flip transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipDirection {
    Horizontal,
    Vertical,
}

impl FromStr for FlipDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "horizontal" => Ok(FlipDirection::Horizontal),
            "vertical" => Ok(FlipDirection::Vertical),
            other => Err(CoreError::InvalidParameter(format!(
                "direction must be 'horizontal' or 'vertical'; got '{other}'"
            ))),
        }
    }
}

/// A validated geometric transform, ready to compile into a single filter
/// expression. One variant per operation kind; adding a kind is an
/// exhaustiveness-checked change.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Crop { width: u32, height: u32, x: u32, y: u32 },
    Scale { width: i64, height: i64 },
    Rotate { angle: f64 },
    Flip { direction: FlipDirection },
    Transpose { dir: u8 },
    Pad { width: u32, height: u32, x: u32, y: u32, color: String },
}

impl Transform {
    /// Compiles this transform into its filter expression. Argument order
    /// follows the engine's filter grammar, not struct field order.
    pub fn compile(&self) -> String {
        match self {
            Transform::Crop { width, height, x, y } => format!("crop={width}:{height}:{x}:{y}"),
            Transform::Scale { width, height } => format!("scale={width}:{height}"),
            // Degrees-to-radians stays in the engine's expression language
            // to preserve its exact semantics.
            Transform::Rotate { angle } => format!("rotate={angle}*PI/180"),
            Transform::Flip { direction } => match direction {
                FlipDirection::Horizontal => "hflip".to_string(),
                FlipDirection::Vertical => "vflip".to_string(),
            },
            Transform::Transpose { dir } => format!("transpose={dir}"),
            Transform::Pad { width, height, x, y, color } => {
                format!("pad={width}:{height}:{x}:{y}:{color}")
            }
        }
    }

    /// Human-readable label for log and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Transform::Crop { .. } => "crop",
            Transform::Scale { .. } => "scale",
            Transform::Rotate { .. } => "rotate",
            Transform::Flip { .. } => "flip",
            Transform::Transpose { .. } => "transpose",
            Transform::Pad { .. } => "pad",
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compile())
    }
}

/// Compiles the two-stage overlay expression: the overlay source is remapped
/// to an alpha-capable pixel format with its alpha scaled by `opacity`, then
/// composited at the resolved position.
pub fn overlay_expr(position: OverlayPosition, opacity: f64) -> String {
    format!(
        "[1:v]format=rgba,colorchannelmixer=aa={opacity}[ovr];[0:v][ovr]overlay={}",
        position.coords()
    )
}

/// Three-channel color curve expression.
pub fn curves_expr(red: &str, green: &str, blue: &str) -> String {
    format!("curves=red='{red}':green='{green}':blue='{blue}'")
}

/// Contrast/saturation expression.
pub fn eq_expr(contrast: f64, saturation: f64) -> String {
    format!("eq=contrast={contrast}:saturation={saturation}")
}

/// Vignette expression. The angle is an engine-side expression (e.g.
/// `PI/4`), passed through verbatim.
pub fn vignette_expr(angle: &str) -> String {
    format!("vignette=angle={angle}")
}

/// Frame-rate retarget expression.
pub fn fps_expr(value: f64) -> String {
    format!("fps={value}")
}

/// Noise injection expression.
pub fn noise_expr(strength: u32, flags: &str) -> String {
    format!("noise=c0s={strength}:c0f={flags}")
}

/// Fade expression for the single-shot fade operation.
pub fn fade_expr(direction: FadeDirection, start: f64, duration: f64) -> String {
    let t = match direction {
        FadeDirection::In => "in",
        FadeDirection::Out => "out",
    };
    format!("fade=t={t}:st={start}:d={duration}")
}

/// Direction of a fade effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

impl FromStr for FadeDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "in" => Ok(FadeDirection::In),
            "out" => Ok(FadeDirection::Out),
            other => Err(CoreError::InvalidParameter(format!(
                "fade direction must be 'in' or 'out'; got '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_argument_order() {
        // width:height:x:y, not field or alphabetical order
        let t = Transform::Crop { width: 640, height: 480, x: 10, y: 20 };
        assert_eq!(t.compile(), "crop=640:480:10:20");
    }

    #[test]
    fn test_scale_allows_engine_placeholders() {
        assert_eq!(
            Transform::Scale { width: 1280, height: -2 }.compile(),
            "scale=1280:-2"
        );
    }

    #[test]
    fn test_rotate_delegates_radian_conversion() {
        assert_eq!(Transform::Rotate { angle: 90.0 }.compile(), "rotate=90*PI/180");
        assert_eq!(Transform::Rotate { angle: 45.5 }.compile(), "rotate=45.5*PI/180");
    }

    #[test]
    fn test_flip_and_transpose() {
        assert_eq!(
            Transform::Flip { direction: FlipDirection::Horizontal }.compile(),
            "hflip"
        );
        assert_eq!(
            Transform::Flip { direction: FlipDirection::Vertical }.compile(),
            "vflip"
        );
        assert_eq!(Transform::Transpose { dir: 2 }.compile(), "transpose=2");
    }

    #[test]
    fn test_pad_includes_color() {
        let t = Transform::Pad { width: 1920, height: 1080, x: 0, y: 140, color: "black".into() };
        assert_eq!(t.compile(), "pad=1920:1080:0:140:black");
    }

    #[test]
    fn test_position_table() {
        assert_eq!(OverlayPosition::TopLeft.coords(), "10:10");
        assert_eq!(OverlayPosition::TopRight.coords(), "main_w-overlay_w-10:10");
        assert_eq!(OverlayPosition::BottomLeft.coords(), "10:main_h-overlay_h-10");
        assert_eq!(
            OverlayPosition::BottomRight.coords(),
            "main_w-overlay_w-10:main_h-overlay_h-10"
        );
        assert_eq!(
            OverlayPosition::Center.coords(),
            "(main_w-overlay_w)/2:(main_h-overlay_h)/2"
        );
    }

    #[test]
    fn test_overlay_expr_scales_alpha_then_composites() {
        assert_eq!(
            overlay_expr(OverlayPosition::Center, 0.5),
            "[1:v]format=rgba,colorchannelmixer=aa=0.5[ovr];[0:v][ovr]overlay=(main_w-overlay_w)/2:(main_h-overlay_h)/2"
        );
    }

    #[test]
    fn test_color_stage_pieces() {
        assert_eq!(
            curves_expr("0/0 0.5/0.6 1/1", "0/0 1/1", "0/0.1 1/0.9"),
            "curves=red='0/0 0.5/0.6 1/1':green='0/0 1/1':blue='0/0.1 1/0.9'"
        );
        assert_eq!(eq_expr(1.1, 0.85), "eq=contrast=1.1:saturation=0.85");
        assert_eq!(vignette_expr("PI/4"), "vignette=angle=PI/4");
        assert_eq!(fps_expr(24.0), "fps=24");
        assert_eq!(noise_expr(12, "t"), "noise=c0s=12:c0f=t");
    }

    #[test]
    fn test_fade_expr() {
        assert_eq!(fade_expr(FadeDirection::In, 0.0, 2.5), "fade=t=in:st=0:d=2.5");
        assert_eq!(fade_expr(FadeDirection::Out, 58.0, 2.0), "fade=t=out:st=58:d=2");
    }

    #[test]
    fn test_keyword_parsing() {
        assert_eq!("center".parse::<OverlayPosition>().unwrap(), OverlayPosition::Center);
        assert!("middle".parse::<OverlayPosition>().is_err());
        assert_eq!("vertical".parse::<FlipDirection>().unwrap(), FlipDirection::Vertical);
        assert!("diagonal".parse::<FlipDirection>().is_err());
    }
}
