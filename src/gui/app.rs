use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::render;
use crate::gui::theme::{self, ThemeColors};
use gtk::prelude::*;
use gtk4 as gtk;
use piechart::{KeyedDataSource, LegendEntry, PieChart, PieChartDelegate, Point, Rect};
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

/// Reports selection changes in the log.
pub struct SelectionLogger;

impl PieChartDelegate for SelectionLogger {
    fn did_select(&self, index: usize) {
        log::info!("Selected slice {}", index);
    }

    fn did_deselect(&self, index: usize) {
        log::info!("Deselected slice {}", index);
    }
}

pub struct AppModel {
    pub chart: Rc<RefCell<PieChart>>,
    pub source: Rc<KeyedDataSource>,
    pub delegate: Rc<SelectionLogger>,
    pub legend: Rc<RefCell<Vec<LegendEntry>>>,
    pub config_path: PathBuf,
    pub drawing_area: gtk::DrawingArea,
    /// Set while a tick callback is driving the animation.
    pub ticking: Rc<Cell<bool>>,
}

#[derive(Debug)]
pub enum AppMsg {
    Tap(Point),
    Select(usize),
    Deselect(usize),
    ClearSelection,
    Reload,
    ConfigReload,
    Resize(i32, i32),
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Select(i) => AppMsg::Select(i),
            AppEvent::Deselect(i) => AppMsg::Deselect(i),
            AppEvent::Reload => AppMsg::Reload,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn legend_for(config: &Config, source: &KeyedDataSource) -> Vec<LegendEntry> {
    if config.legend {
        source.legend_entries()
    } else {
        Vec::new()
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, PathBuf, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Pieview"),
            set_default_width: 640,
            set_default_height: 480,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::ClearSelection);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "pieview-drawing-area",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::GestureClick {
                    connect_released[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::Tap(Point::new(x, y)));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, config_path, rx) = init;

        theme::load_css();

        let source = Rc::new(config.data_source());
        let delegate = Rc::new(SelectionLogger);
        let mut chart = PieChart::with_style(Rect::default(), config.chart.clone());
        chart.set_data_source(&source);
        chart.set_delegate(&delegate);
        chart.reload();
        let legend = legend_for(&config, &source);

        let model = AppModel {
            chart: Rc::new(RefCell::new(chart)),
            source,
            delegate,
            legend: Rc::new(RefCell::new(legend)),
            config_path,
            drawing_area: gtk::DrawingArea::default(),
            ticking: Rc::new(Cell::new(false)),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let chart_draw = model.chart.clone();
        let legend_draw = model.legend.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = render::draw(
                    cr,
                    &chart_draw.borrow(),
                    &legend_draw.borrow(),
                    &colors,
                ) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Tap(point) => {
                let hit = self.chart.borrow_mut().handle_tap(point);
                log::debug!("Tap at ({:.0}, {:.0}) hit {:?}", point.x, point.y, hit);
            }
            AppMsg::Select(index) => {
                if let Err(e) = self.chart.borrow_mut().select(index) {
                    log::error!("Select failed: {}", e);
                }
            }
            AppMsg::Deselect(index) => {
                if let Err(e) = self.chart.borrow_mut().deselect(index) {
                    log::error!("Deselect failed: {}", e);
                }
            }
            AppMsg::ClearSelection => {
                let mut chart = self.chart.borrow_mut();
                if let Some(index) = chart.selected() {
                    let _ = chart.deselect(index);
                }
            }
            AppMsg::Reload => {
                self.chart.borrow_mut().reload();
            }
            AppMsg::ConfigReload => match config::load_config(&self.config_path) {
                Ok(new_config) => {
                    self.apply_config(&new_config);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppMsg::Resize(width, height) => {
                let frame = Rect::new(0.0, 0.0, width as f64, height as f64);
                let mut chart = self.chart.borrow_mut();
                chart.set_frame(frame);
                chart.style_mut().center = frame.center();
                chart.reload();
            }
        }
        self.animate();
        self.drawing_area.queue_draw();
    }
}

impl AppModel {
    /// Hooks the frame clock while the chart animates. The callback removes
    /// itself once the animation settles.
    fn animate(&self) {
        if self.ticking.get() || !self.chart.borrow().is_animating() {
            return;
        }
        self.ticking.set(true);

        let chart = self.chart.clone();
        let ticking = self.ticking.clone();
        let last_frame: Cell<Option<i64>> = Cell::new(None);
        // steps by frame-clock time, not by frame count
        self.drawing_area.add_tick_callback(move |area, clock| {
            let now = clock.frame_time();
            let elapsed = last_frame.replace(Some(now)).map_or(0, |prev| now - prev);
            let running = chart
                .borrow_mut()
                .tick(Duration::from_micros(elapsed.max(0) as u64));
            area.queue_draw();

            if running {
                glib::ControlFlow::Continue
            } else {
                ticking.set(false);
                glib::ControlFlow::Break
            }
        });
    }

    fn apply_config(&mut self, config: &Config) {
        let source = Rc::new(config.data_source());
        {
            let mut chart = self.chart.borrow_mut();
            let mut style = config.chart.clone();
            // the window decides where the chart sits
            style.center = chart.style().center;
            chart.set_data_source(&source);
            chart.set_style(style);
        }
        *self.legend.borrow_mut() = legend_for(config, &source);
        self.source = source;
    }
}
