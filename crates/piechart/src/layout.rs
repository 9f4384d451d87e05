use crate::color::Color;
use crate::geometry::{Point, Quadrant, normalize_angle};
use crate::normalize::{normalize, sanitize};
use std::f64::consts::{FRAC_PI_2, TAU};

/// 12 o'clock in screen coordinates.
pub const DEFAULT_START_ANGLE: f64 = 3.0 * FRAC_PI_2;

/// What the data source reports for one slice before layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SliceInput {
    pub value: f64,
    pub color: Option<Color>,
    pub text: Option<String>,
}

impl SliceInput {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub index: usize,
    pub value: f64,
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: Color,
    pub text: Option<String>,
}

impl Slice {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.sweep() / 2.0
    }

    /// Zero-width slices keep their index but are never drawn or hit.
    pub fn is_empty(&self) -> bool {
        self.sweep() <= 0.0
    }
}

/// Laid-out slices of one chart. Angles accumulate clockwise (screen
/// coordinates) from `start_angle` without wrapping, so the last slice ends at
/// `start_angle + 2π`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PieGeometry {
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub label_radius: f64,
    pub start_angle: f64,
    pub slices: Vec<Slice>,
}

impl PieGeometry {
    pub fn is_empty(&self) -> bool {
        self.slices.iter().all(Slice::is_empty)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn total_sweep(&self) -> f64 {
        self.slices.iter().map(Slice::sweep).sum()
    }

    pub fn slice(&self, index: usize) -> Option<&Slice> {
        self.slices.get(index)
    }

    /// Where the label of `index` sits once the chart is rotated by `rotation`.
    pub fn label_point(&self, index: usize, rotation: f64) -> Option<Point> {
        self.slice(index).map(|s| {
            self.center
                .polar_offset(s.mid_angle() + rotation, self.label_radius)
        })
    }

    pub fn quadrant_of(&self, index: usize, rotation: f64) -> Quadrant {
        self.label_point(index, rotation)
            .map(|p| Quadrant::from_point(p, self.center))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceGeometryBuilder {
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
    label_radius: f64,
    start_angle: f64,
}

impl SliceGeometryBuilder {
    pub fn new(center: Point, outer_radius: f64) -> Self {
        Self {
            center,
            inner_radius: 0.0,
            outer_radius,
            label_radius: outer_radius / 2.0,
            start_angle: DEFAULT_START_ANGLE,
        }
    }

    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.inner_radius = inner_radius;
        self
    }

    pub fn with_label_radius(mut self, label_radius: f64) -> Self {
        self.label_radius = label_radius;
        self
    }

    pub fn with_start_angle(mut self, start_angle: f64) -> Self {
        self.start_angle = normalize_angle(start_angle);
        self
    }

    /// `(start, end)` for each fraction, tiling `[start_angle, start_angle + 2π)`.
    pub fn spans(&self, fractions: &[f64]) -> Vec<(f64, f64)> {
        let last_filled = fractions.iter().rposition(|&f| f > 0.0);
        let mut cursor = self.start_angle;

        fractions
            .iter()
            .enumerate()
            .map(|(i, &fraction)| {
                let start = cursor;
                // pin the closing edge so rounding never leaves a gap
                let end = if Some(i) == last_filled {
                    self.start_angle + TAU
                } else {
                    start + fraction.max(0.0) * TAU
                };
                cursor = end;
                (start, end)
            })
            .collect()
    }

    pub fn build(&self, inputs: &[SliceInput]) -> PieGeometry {
        let values: Vec<f64> = inputs.iter().map(|i| sanitize(i.value)).collect();
        let fractions = normalize(&values);
        let spans = self.spans(&fractions);

        let slices = inputs
            .iter()
            .zip(values)
            .zip(fractions.iter().zip(spans))
            .enumerate()
            .map(|(index, ((input, value), (&fraction, (start, end))))| Slice {
                index,
                value,
                fraction,
                start_angle: start,
                end_angle: end,
                color: input.color.unwrap_or_else(|| Color::for_slice(index)),
                text: input.text.clone(),
            })
            .collect();

        PieGeometry {
            center: self.center,
            inner_radius: self.inner_radius,
            outer_radius: self.outer_radius,
            label_radius: self.label_radius,
            start_angle: self.start_angle,
            slices,
        }
    }
}
