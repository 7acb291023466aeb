use crate::colorings::{ColorInfo, RgbImage};
use crate::config::RunConfig;
use crate::error::Result;
use crate::producer::{render_producer, reply_for, RenderReply, RenderReq};
use crate::strategies::StrategyInfo;
use crate::timing::Timed;
use async_channel::{Receiver, Sender};
use gtk::cairo::{Format, ImageSurface};
use gtk::ffi::GTK_INVALID_LIST_POSITION;
use gtk::glib::{clone, WeakRef};
use gtk::{
    gio, glib, prelude::*, Adjustment, Application, ApplicationWindow, DrawingArea, DropDown,
    Label, ScrolledWindow, SpinButton,
};
use std::cell::RefCell;
use std::rc::Rc;

const APP_ID: &str = "io.github.mandel_strategies";
const IMG_FMT: Format = Format::Rgb24;

struct State {
    config: RunConfig,
    img: Option<ImageSurface>,
    col_idx: usize,
    strategy_idx: usize,
    color_info: ColorInfo,
    strategy_info: StrategyInfo,
    req_sender: Sender<RenderReq>,
    canvas: WeakRef<DrawingArea>,
    status: WeakRef<Label>,
}

impl State {
    fn new(config: RunConfig, req_sender: Sender<RenderReq>) -> State {
        let strategy_info = StrategyInfo::new();
        let strategy_idx = config
            .strategies
            .first()
            .and_then(|name| strategy_info.names().iter().position(|n| *n == name.as_str()))
            .unwrap_or(0);
        State {
            config,
            img: None,
            col_idx: 0,
            strategy_idx,
            color_info: ColorInfo::new(),
            strategy_info,
            req_sender,
            canvas: WeakRef::new(),
            status: WeakRef::new(),
        }
    }
    fn recompute_image(&mut self) {
        let request = RenderReq {
            job: self.config.job(),
            width: self.config.width,
            height: self.config.height,
            strategy: self.strategy_info.producer(self.strategy_idx),
            coloring: self.color_info.producer(self.col_idx),
        };
        let _ = self.req_sender.send_blocking(request);
    }
    fn set_status(&self, text: &str) {
        if let Some(label) = self.status.upgrade() {
            label.set_text(text);
        }
    }
    fn iter_depth_changed(&mut self, adj: &Adjustment) {
        self.config.max_iters = adj.value() as u32;
        self.recompute_image();
    }
}

fn mandel_draw(state: &Rc<RefCell<State>>, ctxt: &gtk::cairo::Context) {
    if let Some(img) = &state.borrow().img {
        if let Err(e) = ctxt.set_source_surface(img, 0.0, 0.0) {
            log::error!("cannot use image as source: {}", e);
            return;
        }
        if let Err(e) = ctxt.paint() {
            log::error!("paint failed: {}", e);
        }
    }
}

fn col_changed(state: &mut State, dd: &DropDown) {
    let sel = dd.selected();
    if sel != GTK_INVALID_LIST_POSITION {
        state.col_idx = sel as usize;
        state.recompute_image();
    }
}

fn strategy_changed(state: &mut State, dd: &DropDown) {
    let sel = dd.selected();
    if sel != GTK_INVALID_LIST_POSITION {
        state.strategy_idx = sel as usize;
        state.recompute_image();
    }
}

fn surface_for(image: RgbImage) -> Option<ImageSurface> {
    let (Ok(width), Ok(height), Ok(stride)) = (
        i32::try_from(image.width),
        i32::try_from(image.height),
        i32::try_from(image.stride),
    ) else {
        log::error!("{}x{} image does not fit a surface", image.width, image.height);
        return None;
    };
    match IMG_FMT.stride_for_width(width as u32) {
        Ok(expected) if expected == stride => {}
        _ => {
            log::error!("stride {} does not suit the surface format", stride);
            return None;
        }
    }
    match ImageSurface::create_for_data(image.data, IMG_FMT, width, height, stride) {
        Ok(surface) => Some(surface),
        Err(e) => {
            log::error!("cannot create image surface: {}", e);
            None
        }
    }
}

impl State {
    fn show_image(&mut self, image: RgbImage, report: &str) {
        if let Some(surface) = surface_for(image) {
            self.img = Some(surface);
            self.set_status(report);
            if let Some(canvas) = self.canvas.upgrade() {
                canvas.queue_draw();
            }
        }
    }
    /// Show counts that were computed before the window opened.
    fn show_timed(&mut self, timed: Timed) {
        let coloring = self.color_info.producer(self.col_idx);
        match reply_for(timed, self.config.max_iters, coloring.as_ref()) {
            Ok(reply) => self.show_image(reply.image, &reply.report),
            Err(e) => {
                log::error!("cannot color the last run: {}", e);
                self.recompute_image();
            }
        }
    }
}

fn handle_new_image(reply: Result<RenderReply>, state: &mut State) {
    match reply {
        Ok(reply) => state.show_image(reply.image, &reply.report),
        Err(e) => {
            log::error!("render failed: {}", e);
            state.set_status(&e.to_string());
        }
    }
}

async fn new_image_handler(
    reply_receiver: Receiver<Result<RenderReply>>,
    state: Rc<RefCell<State>>,
) {
    while let Ok(reply) = reply_receiver.recv().await {
        handle_new_image(reply, &mut state.borrow_mut());
    }
}

fn make_row_box() -> gtk::Box {
    gtk::Box::builder()
        .orientation(gtk::Orientation::Horizontal)
        .spacing(5)
        .build()
}

fn build_ui(app: &Application, config: RunConfig, last: Option<Timed>) {
    let (req_sender, req_receiver) = async_channel::unbounded();
    let (reply_sender, reply_receiver) = async_channel::bounded(1);
    gio::spawn_blocking(move || render_producer(req_receiver, reply_sender));
    let state = Rc::new(RefCell::new(State::new(config, req_sender)));
    let (colorings, strategies, iter_val, width, height);
    {
        let state = state.borrow();
        colorings = DropDown::from_strings(state.color_info.color_names());
        strategies = DropDown::from_strings(&state.strategy_info.names());
        strategies.set_selected(state.strategy_idx as u32);
        iter_val = state.config.max_iters as f64;
        width = i32::try_from(state.config.width).unwrap_or(i32::MAX);
        height = i32::try_from(state.config.height).unwrap_or(i32::MAX);
    }
    colorings.set_width_request(120);
    colorings.set_margin_end(15);
    strategies.set_width_request(120);
    strategies.set_margin_end(15);
    let iter_adj = Adjustment::new(iter_val, 1.0, 255.0, 1.0, 0.0, 0.0);
    let iteration_button = SpinButton::builder().adjustment(&iter_adj).build();
    let first_row = make_row_box();
    first_row.append(&Label::new(Some("coloring:")));
    first_row.append(&colorings);
    first_row.append(&Label::new(Some("strategy:")));
    first_row.append(&strategies);
    first_row.append(&Label::new(Some("max iterations:")));
    first_row.append(&iteration_button);
    let status = Label::builder().xalign(0.0).build();
    state.borrow_mut().status = status.downgrade();
    let canvas = DrawingArea::builder()
        .content_height(height)
        .content_width(width)
        .build();
    state.borrow_mut().canvas = canvas.downgrade();
    let scroller = ScrolledWindow::builder()
        .child(&canvas)
        .vexpand(true)
        .min_content_width(800)
        .min_content_height(550)
        .build();
    let content_box = gtk::Box::builder()
        .orientation(gtk::Orientation::Vertical)
        .spacing(5)
        .margin_start(10)
        .margin_end(10)
        .margin_top(10)
        .margin_bottom(10)
        .build();
    content_box.append(&first_row);
    content_box.append(&status);
    content_box.append(&scroller);
    let window = ApplicationWindow::builder()
        .application(app)
        .title("Mandelbrot")
        .child(&content_box)
        .build();

    // Set actions
    canvas.set_draw_func(clone!(@strong state =>move |_d, ctxt, _w, _h| mandel_draw(&state, ctxt)));
    iter_adj.connect_value_changed(clone!(@strong state => move |a| {
        state.borrow_mut().iter_depth_changed(a);
    }));
    colorings.connect_selected_notify(clone!(@strong state => move |dd| {
        col_changed(&mut state.borrow_mut(), dd);
    }));
    strategies.connect_selected_notify(clone!(@strong state => move |dd| {
        strategy_changed(&mut state.borrow_mut(), dd);
    }));
    match last {
        Some(timed) => state.borrow_mut().show_timed(timed),
        None => state.borrow_mut().recompute_image(),
    }
    glib::spawn_future_local(new_image_handler(reply_receiver, state));

    window.present();
}

/// Open a window on the configured image, starting with `last` when given.
/// Blocks until the window is closed.
pub fn run(config: RunConfig, last: Option<Timed>) -> glib::ExitCode {
    let app = Application::builder().application_id(APP_ID).build();
    let last = RefCell::new(last);
    app.connect_activate(move |app| build_ui(app, config.clone(), last.borrow_mut().take()));
    app.run_with_args::<&str>(&[])
}
