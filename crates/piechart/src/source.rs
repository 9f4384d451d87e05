use crate::animator::SelectionEvent;
use crate::color::Color;
use crate::geometry::Quadrant;
use std::rc::Weak;

/// Supplies slice data to a chart. Only the count and values are required;
/// the remaining methods fall back to chart defaults.
pub trait PieChartDataSource {
    fn slice_count(&self) -> usize;

    fn value(&self, index: usize) -> f64;

    fn color(&self, _index: usize) -> Option<Color> {
        None
    }

    fn text(&self, _index: usize) -> Option<String> {
        None
    }

    /// Extra text shown next to a selected slice, placed according to `quadrant`.
    fn detail(&self, _index: usize, _quadrant: Quadrant) -> Option<String> {
        None
    }
}

/// Receives selection notifications. Every method is optional.
pub trait PieChartDelegate {
    fn will_select(&self, _index: usize) {}

    fn did_select(&self, _index: usize) {}

    fn will_deselect(&self, _index: usize) {}

    fn did_deselect(&self, _index: usize) {}
}

pub(crate) fn dispatch(delegate: Option<&Weak<dyn PieChartDelegate>>, events: &[SelectionEvent]) {
    let Some(delegate) = delegate.and_then(Weak::upgrade) else {
        return;
    };

    for event in events {
        match *event {
            SelectionEvent::WillSelect(i) => delegate.will_select(i),
            SelectionEvent::DidSelect(i) => delegate.did_select(i),
            SelectionEvent::WillDeselect(i) => delegate.will_deselect(i),
            SelectionEvent::DidDeselect(i) => delegate.did_deselect(i),
        }
    }
}

impl PieChartDataSource for Vec<f64> {
    fn slice_count(&self) -> usize {
        self.len()
    }

    fn value(&self, index: usize) -> f64 {
        self.get(index).copied().unwrap_or_default()
    }
}
