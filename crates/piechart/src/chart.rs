use crate::animator::{SelectionAnimator, SelectionEvent};
use crate::color::Color;
use crate::geometry::{Point, Quadrant, Rect, angle_difference};
use crate::hit_test::{Hit, HitTester};
use crate::label::label_text;
use crate::layout::{PieGeometry, Slice, SliceGeometryBuilder, SliceInput};
use crate::source::{self, PieChartDataSource, PieChartDelegate};
use crate::style::ChartStyle;
use std::rc::{Rc, Weak};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartError {
    #[error("slice index {index} out of range (chart has {count} slices)")]
    InvalidIndex { index: usize, count: usize },
}

/// A pie/donut chart: pulls values from a data source, lays them out, answers
/// hit tests and animates the selected slice.
///
/// The data source and delegate are held weakly; the chart never keeps them
/// alive. A dropped data source reads as an empty one.
pub struct PieChart {
    frame: Rect,
    style: ChartStyle,
    data_source: Option<Weak<dyn PieChartDataSource>>,
    delegate: Option<Weak<dyn PieChartDelegate>>,
    geometry: PieGeometry,
    animator: SelectionAnimator,
}

impl std::fmt::Debug for PieChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PieChart")
            .field("frame", &self.frame)
            .field("style", &self.style)
            .field("slices", &self.geometry.len())
            .field("animator", &self.animator)
            .finish_non_exhaustive()
    }
}

impl PieChart {
    pub fn new(frame: Rect, center: Point, radius: f64) -> Self {
        Self::with_style(frame, ChartStyle::for_radius(center, radius))
    }

    pub fn with_style(frame: Rect, style: ChartStyle) -> Self {
        let animator = SelectionAnimator::new(style.animation_duration());
        let mut chart = Self {
            frame,
            style,
            data_source: None,
            delegate: None,
            geometry: PieGeometry::default(),
            animator,
        };
        chart.rebuild(Vec::new());
        chart
    }

    pub fn set_data_source(&mut self, data_source: &Rc<impl PieChartDataSource + 'static>) {
        let data_source: Rc<dyn PieChartDataSource> = data_source.clone();
        self.data_source = Some(Rc::downgrade(&data_source));
    }

    pub fn set_delegate(&mut self, delegate: &Rc<impl PieChartDelegate + 'static>) {
        let delegate: Rc<dyn PieChartDelegate> = delegate.clone();
        self.delegate = Some(Rc::downgrade(&delegate));
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Geometry fields take effect on the next [`PieChart::reload`].
    pub fn style_mut(&mut self) -> &mut ChartStyle {
        &mut self.style
    }

    pub fn set_style(&mut self, style: ChartStyle) {
        self.style = style;
        self.reload();
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.style.background_color = Some(color);
    }

    pub fn background_color(&self) -> Option<Color> {
        self.style.background_color
    }

    pub fn geometry(&self) -> &PieGeometry {
        &self.geometry
    }

    pub fn slice_count(&self) -> usize {
        self.geometry.len()
    }

    /// Re-reads every value from the data source and rebuilds the geometry.
    pub fn reload(&mut self) {
        let inputs = match self.data_source.as_ref().and_then(Weak::upgrade) {
            Some(source) => (0..source.slice_count())
                .map(|i| SliceInput {
                    value: source.value(i),
                    color: source.color(i),
                    text: source.text(i),
                })
                .collect(),
            None => Vec::new(),
        };
        self.rebuild(inputs);
    }

    fn rebuild(&mut self, inputs: Vec<SliceInput>) {
        let style = &self.style;
        self.geometry = SliceGeometryBuilder::new(style.center, style.outer_radius)
            .with_inner_radius(style.inner_radius)
            .with_label_radius(style.label_radius)
            .with_start_angle(style.start_angle)
            .build(&inputs);
        self.animator.set_duration(style.animation_duration());

        if self
            .animator
            .selected()
            .is_some_and(|i| i >= self.geometry.len())
        {
            self.animator.reset();
        }
        log::debug!("Rebuilt pie geometry with {} slices", self.geometry.len());
    }

    fn check_index(&self, index: usize) -> Result<(), ChartError> {
        let count = self.geometry.len();
        if index < count {
            Ok(())
        } else {
            log::warn!("Ignoring selection of slice {index}; chart has {count} slices");
            Err(ChartError::InvalidIndex { index, count })
        }
    }

    pub fn select(&mut self, index: usize) -> Result<(), ChartError> {
        self.check_index(index)?;
        let target = self.rotation_target(index);
        let events = self.animator.select(index, target);
        self.notify(&events);
        Ok(())
    }

    pub fn deselect(&mut self, index: usize) -> Result<(), ChartError> {
        self.check_index(index)?;
        let events = self.animator.deselect(index);
        self.notify(&events);
        Ok(())
    }

    /// Toggles the tapped slice; tapping outside the ring clears the selection.
    pub fn handle_tap(&mut self, point: Point) -> Hit {
        let hit = self.hit_test(point);
        let selected = self.animator.selected();

        let result = match (hit.index, selected) {
            (Some(i), Some(s)) if i == s => self.deselect(i),
            (Some(i), _) => self.select(i),
            (None, Some(s)) => self.deselect(s),
            (None, None) => Ok(()),
        };
        // both indexes come from the current geometry
        debug_assert!(result.is_ok());
        hit
    }

    /// Advances the selection animation. Returns whether another frame is needed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let events = self.animator.tick(dt);
        self.notify(&events);
        self.animator.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn hit_test(&self, point: Point) -> Hit {
        HitTester::new(&self.geometry)
            .with_rotation(self.rotation())
            .hit(point)
    }

    pub fn selected(&self) -> Option<usize> {
        self.animator.selected()
    }

    pub fn animator(&self) -> &SelectionAnimator {
        &self.animator
    }

    /// Outward displacement of `index` in pixels.
    pub fn slice_offset(&self, index: usize) -> f64 {
        self.animator.offset_factor(index) * self.style.selected_slice_offset_radius
    }

    pub fn rotation(&self) -> f64 {
        self.animator.rotation()
    }

    pub fn quadrant(&self, index: usize) -> Quadrant {
        self.geometry.quadrant_of(index, self.rotation())
    }

    /// Label anchor for `index`, following rotation and selection offset.
    pub fn label_point(&self, index: usize) -> Option<Point> {
        let slice = self.geometry.slice(index)?;
        let angle = slice.mid_angle() + self.rotation();
        let radius = self.geometry.label_radius + self.slice_offset(index);
        Some(self.geometry.center.polar_offset(angle, radius))
    }

    pub fn label(&self, index: usize) -> Option<String> {
        let slice: &Slice = self.geometry.slice(index)?;
        (self.style.show_label && !slice.is_empty())
            .then(|| label_text(slice, self.style.show_percentage))
    }

    pub fn detail(&self, index: usize) -> Option<String> {
        let source = self.data_source.as_ref().and_then(Weak::upgrade)?;
        if index >= self.geometry.len() {
            return None;
        }
        source.detail(index, self.quadrant(index))
    }

    /// Rotation for selecting `index`, reached from the current rotation by the
    /// shortest turn.
    fn rotation_target(&self, index: usize) -> f64 {
        let goal = match (self.style.rotate_on_select, self.geometry.slice(index)) {
            (true, Some(slice)) => self.style.rotation_anchor - slice.mid_angle(),
            _ => 0.0,
        };
        let current = self.rotation();
        current + angle_difference(goal, current)
    }

    fn notify(&self, events: &[SelectionEvent]) {
        source::dispatch(self.delegate.as_ref(), events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyed::{KeyedDataSource, SliceKey};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::f64::consts::{FRAC_PI_2, PI};

    const FRAME: Duration = Duration::from_millis(16);
    const CENTER: Point = Point { x: 150.0, y: 150.0 };

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl PieChartDelegate for Recorder {
        fn will_select(&self, index: usize) {
            self.calls.borrow_mut().push(format!("will_select {index}"));
        }

        fn did_select(&self, index: usize) {
            self.calls.borrow_mut().push(format!("did_select {index}"));
        }

        fn did_deselect(&self, index: usize) {
            self.calls.borrow_mut().push(format!("did_deselect {index}"));
        }
    }

    struct Detailed;

    impl PieChartDataSource for Detailed {
        fn slice_count(&self) -> usize {
            4
        }

        fn value(&self, _index: usize) -> f64 {
            1.0
        }

        fn detail(&self, index: usize, quadrant: Quadrant) -> Option<String> {
            Some(format!("{index} in {quadrant}"))
        }
    }

    fn chart_with(values: &Rc<Vec<f64>>) -> PieChart {
        let mut style = ChartStyle::for_radius(CENTER, 100.0);
        style.start_angle = 0.0;
        let mut chart = PieChart::with_style(Rect::new(0.0, 0.0, 300.0, 300.0), style);
        chart.set_data_source(values);
        chart.reload();
        chart
    }

    fn settle(chart: &mut PieChart) {
        for _ in 0..1000 {
            if !chart.tick(FRAME) {
                return;
            }
        }
        panic!("animation did not settle");
    }

    #[test]
    fn test_reload_pulls_values() {
        let values = Rc::new(vec![1.0, 1.0, 2.0]);
        let chart = chart_with(&values);

        assert_eq!(chart.slice_count(), 3);
        let spans: Vec<f64> = chart.geometry().slices.iter().map(Slice::sweep).collect();
        assert!((spans[0] - FRAC_PI_2).abs() < 1e-12);
        assert!((spans[2] - PI).abs() < 1e-12);
    }

    #[test]
    fn test_empty_data_is_not_an_error() {
        let values = Rc::new(Vec::new());
        let mut chart = chart_with(&values);

        assert_eq!(chart.slice_count(), 0);
        assert!(chart.geometry().is_empty());
        assert_eq!(chart.handle_tap(CENTER.polar_offset(1.0, 50.0)), Hit::miss());
        assert_eq!(
            chart.select(0),
            Err(ChartError::InvalidIndex { index: 0, count: 0 })
        );
        assert!(!chart.tick(FRAME));
    }

    #[test]
    fn test_dropped_data_source_reads_empty() {
        let values = Rc::new(vec![1.0, 2.0]);
        let mut chart = chart_with(&values);
        assert_eq!(chart.slice_count(), 2);

        drop(values);
        chart.reload();
        assert_eq!(chart.slice_count(), 0);
    }

    #[test]
    fn test_chart_does_not_own_collaborators() {
        let values = Rc::new(vec![1.0]);
        let delegate = Rc::new(Recorder::default());
        let mut chart = chart_with(&values);
        chart.set_delegate(&delegate);

        assert_eq!(Rc::strong_count(&values), 1);
        assert_eq!(Rc::strong_count(&delegate), 1);
    }

    #[test]
    fn test_invalid_index_leaves_state_untouched() {
        let values = Rc::new(vec![1.0, 2.0]);
        let mut chart = chart_with(&values);
        chart.select(1).unwrap();
        chart.tick(FRAME);
        let before = chart.animator().clone();

        assert_eq!(
            chart.select(2),
            Err(ChartError::InvalidIndex { index: 2, count: 2 })
        );
        assert!(chart.deselect(9).is_err());
        assert_eq!(chart.animator(), &before);

        // still usable
        settle(&mut chart);
        assert_eq!(chart.selected(), Some(1));
    }

    #[test]
    fn test_delegate_sees_selection_lifecycle() {
        let values = Rc::new(vec![1.0, 1.0]);
        let delegate = Rc::new(Recorder::default());
        let mut chart = chart_with(&values);
        chart.set_delegate(&delegate);

        chart.select(0).unwrap();
        settle(&mut chart);
        chart.select(1).unwrap();
        settle(&mut chart);

        assert_eq!(
            *delegate.calls.borrow(),
            vec![
                "will_select 0",
                "did_select 0",
                "did_deselect 0",
                "will_select 1",
                "did_select 1",
            ]
        );
    }

    #[test]
    fn test_switch_selection_leaves_no_residual_offset() {
        let values = Rc::new(vec![1.0, 1.0, 1.0]);
        let mut chart = chart_with(&values);

        chart.select(0).unwrap();
        chart.tick(Duration::from_millis(120));
        assert!(chart.slice_offset(0) > 0.0);

        chart.select(2).unwrap();
        settle(&mut chart);

        assert_eq!(chart.selected(), Some(2));
        assert_eq!(chart.slice_offset(0), 0.0);
        assert_eq!(chart.slice_offset(2), chart.style().selected_slice_offset_radius);
    }

    #[test]
    fn test_tap_toggles_selection() {
        let values = Rc::new(vec![1.0, 1.0]);
        let mut chart = chart_with(&values);
        let lower = CENTER.polar_offset(FRAC_PI_2, 60.0);

        assert_eq!(chart.handle_tap(lower).index, Some(0));
        assert_eq!(chart.selected(), Some(0));
        settle(&mut chart);

        chart.handle_tap(lower);
        assert_eq!(chart.selected(), None);
        settle(&mut chart);

        chart.handle_tap(lower);
        settle(&mut chart);
        let outside = CENTER.polar_offset(FRAC_PI_2, 140.0);
        assert_eq!(chart.handle_tap(outside), Hit::miss());
        assert_eq!(chart.selected(), None);
    }

    #[test]
    fn test_rotate_on_select_brings_slice_to_anchor() {
        let values = Rc::new(vec![1.0, 1.0, 1.0, 1.0]);
        let mut chart = chart_with(&values);
        chart.style_mut().rotate_on_select = true;

        // slice 3 spans [3π/2, 2π); its middle should end up at π/2
        chart.select(3).unwrap();
        settle(&mut chart);
        let mid = chart.geometry().slices[3].mid_angle() + chart.rotation();
        assert!(angle_difference(mid, FRAC_PI_2).abs() < 1e-9);

        // hit testing follows the rotation
        let tapped = chart.hit_test(CENTER.polar_offset(FRAC_PI_2, 50.0));
        assert_eq!(tapped.index, Some(3));
        assert_eq!(tapped.quadrant, Quadrant::Bottom);

        chart.deselect(3).unwrap();
        settle(&mut chart);
        assert!(angle_difference(chart.rotation(), 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_tick_reports_when_animation_settles() {
        let values = Rc::new(vec![1.0, 2.0]);
        let mut chart = chart_with(&values);
        assert!(!chart.is_animating());
        assert!(!chart.tick(FRAME));

        chart.select(1).unwrap();
        assert!(chart.is_animating());
        assert!(chart.tick(FRAME));

        let long = chart.animator().duration() * 2;
        assert!(!chart.tick(long));
        assert!(!chart.is_animating());
        assert_eq!(chart.slice_offset(1), chart.style().selected_slice_offset_radius);
    }

    #[test]
    fn test_switching_rotated_selection_takes_short_way() {
        let values = Rc::new(vec![1.0, 1.0, 1.0, 1.0]);
        let mut chart = chart_with(&values);
        chart.style_mut().rotate_on_select = true;

        chart.select(2).unwrap();
        settle(&mut chart);
        let before = chart.rotation();

        // neighbouring slices are a quarter turn apart
        chart.select(3).unwrap();
        settle(&mut chart);
        let after = chart.rotation();
        assert!((after - before).abs() <= PI);
        assert!(((after - before).abs() - FRAC_PI_2).abs() < 1e-9);

        let mid = chart.geometry().slices[3].mid_angle() + after;
        assert!(angle_difference(mid, FRAC_PI_2).abs() < 1e-9);

        // every switch stays within half a turn, whatever the order
        for index in [0, 2, 1, 3, 0] {
            let before = chart.rotation();
            chart.select(index).unwrap();
            settle(&mut chart);
            assert!((chart.rotation() - before).abs() <= PI + 1e-9);
        }

        chart.deselect(0).unwrap();
        settle(&mut chart);
        assert!(angle_difference(chart.rotation(), 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_reload_drops_selection_past_new_count() {
        let values = Rc::new(vec![1.0, 1.0, 1.0]);
        let mut chart = chart_with(&values);
        chart.select(2).unwrap();
        settle(&mut chart);

        let fewer = Rc::new(vec![1.0]);
        chart.set_data_source(&fewer);
        chart.reload();
        assert_eq!(chart.selected(), None);
        assert_eq!(chart.slice_offset(2), 0.0);
    }

    #[test]
    fn test_labels_follow_style() {
        let values = Rc::new(vec![0.0, 3.0, 1.0]);
        let mut chart = chart_with(&values);

        assert_eq!(chart.label(0), None);
        assert_eq!(chart.label(1).as_deref(), Some("75%"));
        chart.style_mut().show_percentage = false;
        assert_eq!(chart.label(1).as_deref(), Some("3"));
        chart.style_mut().show_label = false;
        assert_eq!(chart.label(1), None);
    }

    #[test]
    fn test_label_point_moves_with_selection() {
        let values = Rc::new(vec![1.0, 1.0]);
        let mut chart = chart_with(&values);
        let resting = chart.label_point(0).unwrap();
        assert!((resting.distance(CENTER) - chart.geometry().label_radius).abs() < 1e-9);

        chart.select(0).unwrap();
        settle(&mut chart);
        let popped = chart.label_point(0).unwrap();
        let expected = chart.geometry().label_radius + chart.style().selected_slice_offset_radius;
        assert!((popped.distance(CENTER) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_detail_uses_quadrant() {
        let source = Rc::new(Detailed);
        let mut style = ChartStyle::for_radius(CENTER, 100.0);
        style.start_angle = 0.0;
        let mut chart = PieChart::with_style(Rect::new(0.0, 0.0, 300.0, 300.0), style);
        chart.set_data_source(&source);
        chart.reload();

        assert_eq!(chart.detail(0).as_deref(), Some("0 in First"));
        assert_eq!(chart.detail(3).as_deref(), Some("3 in Fourth"));
        assert_eq!(chart.detail(4), None);
    }

    #[test]
    fn test_keyed_source_drives_chart() {
        let values: HashMap<SliceKey, f64> =
            HashMap::from([("a".into(), 1.0), ("b".into(), 3.0)]);
        let source = Rc::new(KeyedDataSource::new(values).with_key_labels(true));
        let mut chart = PieChart::new(Rect::new(0.0, 0.0, 200.0, 200.0), CENTER, 80.0);
        chart.set_data_source(&source);
        chart.reload();

        assert_eq!(chart.slice_count(), 2);
        assert_eq!(chart.geometry().slices[1].fraction, 0.75);
        assert_eq!(chart.label(0).as_deref(), Some("a"));
    }

    #[test]
    fn test_background_color() {
        let values = Rc::new(vec![1.0]);
        let mut chart = chart_with(&values);
        assert_eq!(chart.background_color(), None);
        chart.set_background_color(Color::BLACK);
        assert_eq!(chart.background_color(), Some(Color::BLACK));
    }
}
