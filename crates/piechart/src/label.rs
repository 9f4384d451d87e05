use crate::layout::Slice;

/// Text drawn on a slice: data-source text first, then the percentage when
/// enabled, otherwise the raw value.
pub fn label_text(slice: &Slice, show_percentage: bool) -> String {
    if let Some(text) = &slice.text {
        return text.clone();
    }
    if show_percentage {
        format_percentage(slice.fraction)
    } else {
        format!("{:.0}", slice.value)
    }
}

pub fn format_percentage(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}
