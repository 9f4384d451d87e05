use crate::gui::theme::ThemeColors;
use cairo::Context;
use piechart::{LabelFont, LegendEntry, PieChart, Point, Quadrant, Slice};

const LEGEND_MARGIN: f64 = 16.0;
const LEGEND_SWATCH: f64 = 12.0;
const LEGEND_ROW: f64 = 20.0;
const DETAIL_PADDING: f64 = 6.0;
const DETAIL_GAP: f64 = 10.0;

fn set_source(cr: &Context, (r, g, b, a): (f64, f64, f64, f64)) {
    cr.set_source_rgba(r, g, b, a);
}

fn select_font(cr: &Context, font: &LabelFont) {
    let weight = if font.bold {
        cairo::FontWeight::Bold
    } else {
        cairo::FontWeight::Normal
    };
    cr.select_font_face(&font.family, cairo::FontSlant::Normal, weight);
    cr.set_font_size(font.size);
}

struct SliceRenderer<'a> {
    chart: &'a PieChart,
    slice: &'a Slice,
    selected: bool,
}

impl<'a> SliceRenderer<'a> {
    fn new(chart: &'a PieChart, slice: &'a Slice) -> Self {
        Self {
            chart,
            slice,
            selected: chart.selected() == Some(slice.index),
        }
    }

    fn draw_wedge(&self, cr: &Context) -> Result<(), cairo::Error> {
        let geometry = self.chart.geometry();
        let style = self.chart.style();
        let rotation = self.chart.rotation();
        let (start, end) = (
            self.slice.start_angle + rotation,
            self.slice.end_angle + rotation,
        );
        // the whole wedge slides outward along its mid-angle
        let center = geometry.center.polar_offset(
            self.slice.mid_angle() + rotation,
            self.chart.slice_offset(self.slice.index),
        );

        cr.new_path();
        if geometry.inner_radius > 0.0 {
            cr.arc(center.x, center.y, geometry.outer_radius, start, end);
            cr.arc_negative(center.x, center.y, geometry.inner_radius, end, start);
        } else {
            cr.move_to(center.x, center.y);
            cr.arc(center.x, center.y, geometry.outer_radius, start, end);
        }
        cr.close_path();
        set_source(cr, self.slice.color.components());

        if !self.selected || style.selected_slice_stroke <= 0.0 {
            return cr.fill();
        }

        cr.fill_preserve()?;
        let stroke = style.selected_slice_color.unwrap_or(self.slice.color);
        set_source(cr, stroke.components());
        cr.set_line_width(style.selected_slice_stroke);
        cr.stroke()
    }

    fn draw_label(&self, cr: &Context) -> Result<(), cairo::Error> {
        let (Some(text), Some(anchor)) = (
            self.chart.label(self.slice.index),
            self.chart.label_point(self.slice.index),
        ) else {
            return Ok(());
        };
        let style = self.chart.style();

        select_font(cr, &style.label_font);
        let ext = cr.text_extents(&text)?;
        let (x, y) = (
            anchor.x - ext.width() / 2.0 - ext.x_bearing(),
            anchor.y - ext.height() / 2.0 - ext.y_bearing(),
        );

        if let Some(shadow) = style.label_shadow_color {
            set_source(cr, shadow.components());
            cr.move_to(x + 1.0, y + 1.0);
            cr.show_text(&text)?;
        }

        let color = match (self.selected, style.label_selected_color) {
            (true, Some(selected)) => selected,
            _ => style.label_color,
        };
        set_source(cr, color.components());
        cr.move_to(x, y);
        cr.show_text(&text)
    }

    fn draw_detail(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        if !self.selected {
            return Ok(());
        }
        let Some(text) = self.chart.detail(self.slice.index) else {
            return Ok(());
        };

        let geometry = self.chart.geometry();
        let anchor = geometry.center.polar_offset(
            self.slice.mid_angle() + self.chart.rotation(),
            geometry.outer_radius + self.chart.slice_offset(self.slice.index) + DETAIL_GAP,
        );

        select_font(cr, &self.chart.style().label_font);
        let ext = cr.text_extents(&text)?;
        let (w, h) = (
            ext.width() + DETAIL_PADDING * 2.0,
            ext.height() + DETAIL_PADDING * 2.0,
        );
        let origin = detail_origin(anchor, self.chart.quadrant(self.slice.index), w, h);

        set_source(cr, colors.detail_bg.into_components());
        cr.rectangle(origin.x, origin.y, w, h);
        cr.fill()?;

        set_source(cr, colors.detail_fg.into_components());
        cr.move_to(
            origin.x + DETAIL_PADDING - ext.x_bearing(),
            origin.y + DETAIL_PADDING - ext.y_bearing(),
        );
        cr.show_text(&text)
    }
}

/// Top-left corner of a `w`×`h` box attached to `anchor` on the side facing away
/// from the chart.
fn detail_origin(anchor: Point, quadrant: Quadrant, w: f64, h: f64) -> Point {
    let x = if quadrant.is_right() {
        anchor.x
    } else if quadrant.is_left() {
        anchor.x - w
    } else {
        anchor.x - w / 2.0
    };
    let y = if quadrant.is_bottom() {
        anchor.y
    } else if quadrant.is_top() {
        anchor.y - h
    } else {
        anchor.y - h / 2.0
    };
    Point::new(x, y)
}

fn draw_background(
    cr: &Context,
    chart: &PieChart,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let components = match chart.background_color() {
        Some(color) => color.components(),
        None => colors.background.into_components(),
    };
    let frame = chart.frame();
    set_source(cr, components);
    cr.rectangle(frame.origin.x, frame.origin.y, frame.width, frame.height);
    cr.fill()
}

fn draw_legend(
    cr: &Context,
    chart: &PieChart,
    legend: &[LegendEntry],
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let frame = chart.frame();
    select_font(
        cr,
        &LabelFont {
            bold: false,
            ..chart.style().label_font.clone()
        },
    );

    for (row, entry) in legend.iter().enumerate() {
        let top = frame.origin.y + LEGEND_MARGIN + row as f64 * LEGEND_ROW;
        let left = frame.origin.x + LEGEND_MARGIN;

        set_source(cr, entry.color.components());
        cr.rectangle(left, top, LEGEND_SWATCH, LEGEND_SWATCH);
        cr.fill()?;

        set_source(cr, colors.legend_text.into_components());
        cr.move_to(left + LEGEND_SWATCH + 6.0, top + LEGEND_SWATCH);
        cr.show_text(entry.key.as_str())?;
    }
    Ok(())
}

pub fn draw(
    cr: &Context,
    chart: &PieChart,
    legend: &[LegendEntry],
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    draw_background(cr, chart, colors)?;

    let renderers: Vec<SliceRenderer<'_>> = chart
        .geometry()
        .slices
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| SliceRenderer::new(chart, s))
        .collect();

    // selected slice last so its outline sits on top
    let (selected, rest): (Vec<_>, Vec<_>) = renderers.iter().partition(|r| r.selected);
    for renderer in rest.iter().chain(&selected) {
        renderer.draw_wedge(cr)?;
    }
    for renderer in &renderers {
        renderer.draw_label(cr)?;
    }
    for renderer in &selected {
        renderer.draw_detail(cr, colors)?;
    }

    if !legend.is_empty() {
        draw_legend(cr, chart, legend, colors)?;
    }
    Ok(())
}
