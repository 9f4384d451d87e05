use crate::color::Color;
use crate::geometry::Point;
use crate::layout::DEFAULT_START_ANGLE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelFont {
    pub family: String,
    pub size: f64,
    pub bold: bool,
}

impl Default for LabelFont {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            size: 12.0,
            bold: true,
        }
    }
}

/// Styling and geometry parameters of a chart. Geometry fields take effect on
/// the next reload.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Radians, screen coordinates. 12 o'clock by default.
    pub start_angle: f64,
    /// Selection animation length in seconds.
    pub animation_speed: f64,
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub show_label: bool,
    pub label_font: LabelFont,
    pub label_color: Color,
    pub label_selected_color: Option<Color>,
    pub label_shadow_color: Option<Color>,
    pub label_radius: f64,
    pub selected_slice_stroke: f64,
    pub selected_slice_offset_radius: f64,
    pub selected_slice_color: Option<Color>,
    pub show_percentage: bool,
    pub rotate_on_select: bool,
    /// Where a selected slice's mid-angle ends up when `rotate_on_select` is set.
    pub rotation_anchor: f64,
    pub background_color: Option<Color>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::for_radius(Point::default(), 100.0)
    }
}

impl ChartStyle {
    /// Defaults scaled to a pie of `radius` around `center`.
    pub fn for_radius(center: Point, radius: f64) -> Self {
        Self {
            start_angle: DEFAULT_START_ANGLE,
            animation_speed: 0.5,
            center,
            inner_radius: 0.0,
            outer_radius: radius,
            show_label: true,
            label_font: LabelFont {
                size: (radius / 10.0).max(5.0),
                ..LabelFont::default()
            },
            label_color: Color::WHITE,
            label_selected_color: None,
            label_shadow_color: Some(Color::DARK_GRAY),
            label_radius: radius / 2.0,
            selected_slice_stroke: 3.0,
            selected_slice_offset_radius: (radius / 10.0).max(10.0),
            selected_slice_color: None,
            show_percentage: true,
            rotate_on_select: false,
            rotation_anchor: std::f64::consts::FRAC_PI_2,
            background_color: None,
        }
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.animation_speed).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_scale_with_radius() {
        let small = ChartStyle::for_radius(Point::default(), 20.0);
        assert_eq!(small.label_font.size, 5.0);
        assert_eq!(small.selected_slice_offset_radius, 10.0);
        assert_eq!(small.label_radius, 10.0);

        let large = ChartStyle::for_radius(Point::new(5.0, 5.0), 300.0);
        assert_eq!(large.label_font.size, 30.0);
        assert_eq!(large.selected_slice_offset_radius, 30.0);
        assert_eq!(large.center, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let json = r##"{
            "outer_radius": 150.0,
            "show_percentage": false,
            "label_color": "#101010",
            "label_font": { "size": 18.0 }
        }"##;
        let style: ChartStyle = serde_json::from_str(json).unwrap();

        assert_eq!(style.outer_radius, 150.0);
        assert!(!style.show_percentage);
        assert_eq!(style.label_color, "#101010".parse().unwrap());
        assert_eq!(style.label_font.size, 18.0);
        assert_eq!(style.label_font.family, "Sans");
        assert_eq!(style.start_angle, DEFAULT_START_ANGLE);
    }

    #[test]
    fn test_animation_duration_handles_bad_speed() {
        let mut style = ChartStyle::default();
        assert_eq!(style.animation_duration(), Duration::from_millis(500));
        style.animation_speed = -1.0;
        assert_eq!(style.animation_duration(), Duration::ZERO);
        style.animation_speed = f64::NAN;
        assert_eq!(style.animation_duration(), Duration::ZERO);
    }
}
