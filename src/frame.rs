use crate::audio;
use crate::constants::{COLOR_MODE_LABEL_ID, DIRECTION_BUTTON_ID, STATUS_REFRESH_SEC};
use crate::dom;
use crate::overlay;
use crate::pages::{self, PageContext};
use crate::render;
use crate::sprites::SpriteAtlas;
use crate::ui;
use flock_core::{AutoloadTick, ColorMode, SessionRole};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Last values written to the page chrome, so unchanged text is not rewritten.
#[derive(Default)]
pub struct ChromeCache {
    direction: Option<f32>,
    color_mode: Option<ColorMode>,
    countdown: Option<String>,
    home_status: Option<String>,
    editor_refresh_in: f32,
}

pub struct FrameContext<'a> {
    pub page: PageContext,
    pub role: SessionRole,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub chrome: ChromeCache,
    pub started: Instant,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        page: PageContext,
        role: SessionRole,
        canvas: web::HtmlCanvasElement,
        gpu: Option<render::GpuState<'a>>,
    ) -> Self {
        let now = Instant::now();
        Self {
            page,
            role,
            canvas,
            gpu,
            chrome: ChromeCache::default(),
            started: now,
            last_instant: now,
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        let dt_sec = dt.as_secs_f32();
        let t = (now - self.started).as_secs_f32();

        let (w, h) = (self.canvas.width(), self.canvas.height());
        let clock = audio::track_clock(&self.page.audio.track);
        let report = {
            let mut engine = self.page.engine.borrow_mut();
            engine.camera_mut().aspect = w.max(1) as f32 / h.max(1) as f32;
            let mut graph = self.page.audio.graph.borrow_mut();
            engine.tick(dt_sec, t, graph.capture(), clock)
        };
        audio::set_ambient_volume(&self.page.audio, report.ambient_volume);
        for action in &report.played {
            log::debug!("[playback] {:?}", action);
        }

        match self.role {
            SessionRole::Home => self.update_home(dt_sec, clock.playing),
            SessionRole::Editor => self.update_editor(dt_sec),
        }
        self.update_labels();

        if let Some(g) = &mut self.gpu {
            let engine = self.page.engine.borrow();
            let flock = engine.flock();
            g.resize_if_needed(w, h);
            g.set_decor_reveal(engine.decor().reveal());
            let scene = render::SceneFrame {
                view_proj: engine.camera().view_projection(),
                time: t,
                globals: flock.globals(),
                instances: flock.instances(),
                segments: engine.lines_visible().then(|| flock.line_segments()),
            };
            if let Err(e) = g.render(&scene) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    fn update_home(&mut self, dt_sec: f32, playing: bool) {
        let tick = self
            .page
            .engine
            .borrow_mut()
            .session
            .autoload
            .tick(dt_sec as f64 * 1000.0);
        let countdown = ui::countdown_text(tick);
        if countdown != self.chrome.countdown {
            overlay::update_countdown(&self.page.document, countdown.as_deref());
            self.chrome.countdown = countdown;
        }
        if tick == AutoloadTick::Fire {
            pages::load_default_edits(&self.page);
        }

        let status = {
            let engine = self.page.engine.borrow();
            let player = &engine.session.player;
            (player.is_armed() && playing).then(|| player.status_text())
        };
        if let Some(status) = status {
            if self.chrome.home_status.as_deref() != Some(status.as_str()) {
                self.page.set_home_status(&status);
                self.chrome.home_status = Some(status);
            }
        }
    }

    fn update_editor(&mut self, dt_sec: f32) {
        self.chrome.editor_refresh_in -= dt_sec;
        if self.chrome.editor_refresh_in <= 0.0 {
            self.chrome.editor_refresh_in = STATUS_REFRESH_SEC;
            self.page.refresh_editor();
        }
    }

    fn update_labels(&mut self) {
        let (direction, mode) = {
            let engine = self.page.engine.borrow();
            (engine.flock().travel_direction(), engine.palette().mode())
        };
        if self.chrome.direction != Some(direction) {
            dom::set_text(
                &self.page.document,
                DIRECTION_BUTTON_ID,
                ui::direction_label(direction),
            );
            self.chrome.direction = Some(direction);
        }
        if self.chrome.color_mode != Some(mode) {
            dom::set_text(&self.page.document, COLOR_MODE_LABEL_ID, mode.name());
            self.chrome.color_mode = Some(mode);
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    atlas: &SpriteAtlas,
    bird_capacity: usize,
    line_capacity: usize,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, atlas, bird_capacity, line_capacity).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}
