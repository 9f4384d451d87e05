use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

const CHART_CSS: &str = "
.pieview-drawing-area {
    background: none;
}
";

/// Colors for everything the chart style does not cover.
pub struct ThemeColors {
    pub background: Srgba<f64>,
    pub legend_text: Srgba<f64>,
    pub detail_bg: Srgba<f64>,
    pub detail_fg: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let named = |name: &str, fallback: Srgba<f64>| {
            context
                .lookup_color(name)
                .map(|c| to_srgba(&c))
                .unwrap_or(fallback)
        };

        let mut detail_bg = named(
            "theme_selected_bg_color",
            Srgba::new(0.2, 0.2, 0.25, 1.0),
        );
        // callouts are drawn at 90% opacity
        detail_bg.alpha = 0.9;

        Self {
            background: named("theme_bg_color", Srgba::new(0.12, 0.12, 0.15, 1.0)),
            legend_text: named("theme_fg_color", Srgba::new(0.9, 0.9, 0.9, 1.0)),
            detail_bg,
            detail_fg: named("theme_selected_fg_color", Srgba::new(1.0, 1.0, 1.0, 1.0)),
        }
    }
}

fn to_srgba(c: &gdk::RGBA) -> Srgba<f64> {
    Srgba::new(
        f64::from(c.red()),
        f64::from(c.green()),
        f64::from(c.blue()),
        f64::from(c.alpha()),
    )
}

pub fn load_css() {
    let Some(display) = gdk::Display::default() else {
        log::warn!("No display; chart CSS not loaded");
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_data(CHART_CSS);
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}
