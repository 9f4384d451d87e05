use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use strum::{Display, EnumIter};

const AXIS_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of `self` around `center` in screen coordinates (y grows downwards), in `[0, 2π)`.
    pub fn angle_around(&self, center: Point) -> f64 {
        normalize_angle((self.y - center.y).atan2(self.x - center.x))
    }

    pub fn polar_offset(&self, angle: f64, radius: f64) -> Point {
        Point::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }
}

/// Wraps an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Signed shortest rotation taking `from` onto `to`, in `[-π, π)`.
pub fn angle_difference(to: f64, from: f64) -> f64 {
    (to - from + PI).rem_euclid(TAU) - PI
}

/// Region around the chart center used to place labels and detail views.
///
/// ```text
///   ___
///  /3|4\
///  |-+-|
///  \2|1/
/// ```
///
/// Screen coordinates, so `First` is the lower-right region. The combined
/// variants cover points lying on an axis: `Bottom` is `First | Second`,
/// `Top` is `Third | Fourth`, `Left` is `Second | Third` and `Right` is
/// `First | Fourth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum Quadrant {
    #[default]
    Unknown,
    First,
    Second,
    Third,
    Fourth,
    Bottom,
    Top,
    Left,
    Right,
}

impl Quadrant {
    /// Classifies an offset from the chart center.
    pub fn from_offset(dx: f64, dy: f64) -> Self {
        let horizontal = classify_axis(dx);
        let vertical = classify_axis(dy);

        match (horizontal, vertical) {
            (AxisSide::Positive, AxisSide::Positive) => Self::First,
            (AxisSide::Negative, AxisSide::Positive) => Self::Second,
            (AxisSide::Negative, AxisSide::Negative) => Self::Third,
            (AxisSide::Positive, AxisSide::Negative) => Self::Fourth,
            (AxisSide::Zero, AxisSide::Positive) => Self::Bottom,
            (AxisSide::Zero, AxisSide::Negative) => Self::Top,
            (AxisSide::Negative, AxisSide::Zero) => Self::Left,
            (AxisSide::Positive, AxisSide::Zero) => Self::Right,
            (AxisSide::Zero, AxisSide::Zero) => Self::Unknown,
        }
    }

    pub fn from_point(point: Point, center: Point) -> Self {
        Self::from_offset(point.x - center.x, point.y - center.y)
    }

    /// Whether every region covered by `other` is also covered by `self`.
    pub fn contains(self, other: Quadrant) -> bool {
        if self == other {
            return true;
        }
        match self {
            Self::Bottom => matches!(other, Self::First | Self::Second),
            Self::Top => matches!(other, Self::Third | Self::Fourth),
            Self::Left => matches!(other, Self::Second | Self::Third),
            Self::Right => matches!(other, Self::First | Self::Fourth),
            _ => false,
        }
    }

    pub fn is_bottom(self) -> bool {
        Self::Bottom.contains(self)
    }

    pub fn is_top(self) -> bool {
        Self::Top.contains(self)
    }

    pub fn is_left(self) -> bool {
        Self::Left.contains(self)
    }

    pub fn is_right(self) -> bool {
        Self::Right.contains(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisSide {
    Negative,
    Zero,
    Positive,
}

fn classify_axis(delta: f64) -> AxisSide {
    if delta > AXIS_EPSILON {
        AxisSide::Positive
    } else if delta < -AXIS_EPSILON {
        AxisSide::Negative
    } else {
        AxisSide::Zero
    }
}
