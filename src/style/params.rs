use std::fmt;

/// Custom property names understood by the stylesheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CssVar {
    /// Horizontal landing point.
    XLandingPoint,
    /// Jittered animation duration.
    DurationChaos,
    /// Lateral disturbance, first control value.
    X1,
    /// Lateral disturbance, second control value.
    X2,
    /// Lateral disturbance, third control value.
    X3,
    /// Lateral weight of the explosion curve.
    X4,
    /// Early-phase vertical easing.
    Y1,
    /// Fall-curve offset.
    Y2,
    /// Mid-phase easing anchor.
    Y3,
    /// Free-fall ease weight.
    Y4,
    /// Particle width.
    Width,
    /// Particle height.
    Height,
    /// Half rotation vector, used at the midpoint keyframe.
    HalfRotation,
    /// Rotation vector.
    Rotation,
    /// Duration of one full rotation.
    RotationDuration,
    /// Corner rounding.
    BorderRadius,
    /// Particle color.
    BackgroundColor,
    /// Stage height, set on the container.
    StageHeight,
}

impl CssVar {
    /// The custom property name, including the leading `--`.
    pub fn name(self) -> &'static str {
        match self {
            Self::XLandingPoint => "--xlp",
            Self::DurationChaos => "--dc",
            Self::X1 => "--x1",
            Self::X2 => "--x2",
            Self::X3 => "--x3",
            Self::X4 => "--x4",
            Self::Y1 => "--y1",
            Self::Y2 => "--y2",
            Self::Y3 => "--y3",
            Self::Y4 => "--y4",
            Self::Width => "--w",
            Self::Height => "--h",
            Self::HalfRotation => "--hr",
            Self::Rotation => "--r",
            Self::RotationDuration => "--rd",
            Self::BorderRadius => "--br",
            Self::BackgroundColor => "--bgc",
            Self::StageHeight => "--sh",
        }
    }
}

impl fmt::Display for CssVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved particle shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Equal sides, fully rounded corners.
    Circle,
    /// Slightly randomized sides, square corners.
    Rectangle,
}

impl ShapeKind {
    /// Whether this is [`ShapeKind::Circle`].
    pub fn is_circle(self) -> bool {
        matches!(self, Self::Circle)
    }
}

/// Rotation axes chosen by a 3-bit selector: `x = 0b100`, `y = 0b010`, `z = 0b001`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RotationAxes {
    /// Rotate around the x axis.
    pub x: bool,
    /// Rotate around the y axis.
    pub y: bool,
    /// Rotate around the z axis.
    pub z: bool,
}

impl RotationAxes {
    /// Selector value that rotates around the z axis only.
    pub const Z_ONLY: u8 = 0b001;
    /// Largest selector value that can be rolled.
    pub const MAX_SELECTOR: u8 = 5;

    /// Decode a selector; only the low three bits are used.
    pub fn from_selector(selector: u8) -> Self {
        Self {
            x: selector & 0b100 != 0,
            y: selector & 0b010 != 0,
            z: selector & 0b001 != 0,
        }
    }

    /// Encode back into the selector value.
    pub fn selector(self) -> u8 {
        (u8::from(self.x) << 2) | (u8::from(self.y) << 1) | u8::from(self.z)
    }

    /// Flags as `"x y z"`, each `0` or `1`.
    pub fn vector(self) -> String {
        format!("{} {} {}", u8::from(self.x), u8::from(self.y), u8::from(self.z))
    }

    /// Flags halved, as `"x y z"`.
    pub fn half_vector(self) -> String {
        let half = |b: bool| if b { "0.5" } else { "0" };
        format!("{} {} {}", half(self.x), half(self.y), half(self.z))
    }
}

/// Every synthesized value for one particle.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ParameterSet {
    /// Horizontal landing offset in pixels, relative to the container.
    pub x_landing_px: f64,
    /// Jittered duration in milliseconds.
    pub duration_chaos_ms: i64,
    /// Lateral disturbance; non-zero only for crazy particles.
    pub x1: f64,
    /// Negated `x1`.
    pub x2: f64,
    /// Equal to `x1`.
    pub x3: f64,
    /// Explosion-curve lateral weight in `[0, 1]`.
    pub x4: f64,
    /// Early-phase vertical easing in `[0, 0.5]`.
    pub y1: f64,
    /// Fall-curve offset in `[-force, force]`.
    pub y2: f64,
    /// Mid-phase easing anchor.
    pub y3: f64,
    /// Free-fall ease weight in `[0, force]`.
    pub y4: f64,
    /// Width in pixels.
    pub width_px: f64,
    /// Height in pixels.
    pub height_px: f64,
    /// Axes the particle spins around.
    pub rotation: RotationAxes,
    /// Duration of one full rotation in milliseconds.
    pub rotation_duration_ms: f64,
    /// Resolved shape.
    pub shape: ShapeKind,
}

impl ParameterSet {
    /// Corner rounding for the resolved shape.
    pub fn border_radius(&self) -> &'static str {
        if self.shape.is_circle() { "50%" } else { "0" }
    }

    /// Render as custom property assignments, in application order.
    pub fn properties(&self) -> Vec<(CssVar, String)> {
        vec![
            (CssVar::XLandingPoint, format!("{}px", fmt_num(self.x_landing_px))),
            (CssVar::DurationChaos, format!("{}ms", self.duration_chaos_ms)),
            (CssVar::X1, fmt_num(self.x1)),
            (CssVar::X2, fmt_num(self.x2)),
            (CssVar::X3, fmt_num(self.x3)),
            (CssVar::X4, fmt_num(self.x4)),
            (CssVar::Y1, fmt_num(self.y1)),
            (CssVar::Y2, fmt_num(self.y2)),
            (CssVar::Y3, fmt_num(self.y3)),
            (CssVar::Y4, fmt_num(self.y4)),
            (CssVar::Width, format!("{}px", fmt_num(self.width_px))),
            (CssVar::Height, format!("{}px", fmt_num(self.height_px))),
            (CssVar::HalfRotation, self.rotation.half_vector()),
            (CssVar::Rotation, self.rotation.vector()),
            (
                CssVar::RotationDuration,
                format!("{}ms", fmt_num(self.rotation_duration_ms)),
            ),
            (CssVar::BorderRadius, self.border_radius().to_string()),
        ]
    }
}

/// Shortest decimal rendering, with negative zero printed as `0`.
pub(crate) fn fmt_num(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}

#[cfg(test)]
#[path = "../../tests/unit/style/params.rs"]
mod tests;
