#![cfg(target_arch = "wasm32")]
use flock_core::{FlockConfig, FlockEngine, SessionRole};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod edits_io;
mod events;
mod frame;
mod input;
mod overlay;
mod pages;
mod render;
mod sprites;
mod storage;
mod ui;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("flock-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
            dom::alert(&format!("Could not start the flock: {e}"));
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let role = input::page_role(dom::body_page(&document).as_deref());
    log::info!("[page] {:?}", role);

    let canvas = dom::canvas_in(&document, constants::CANVAS_ID)?;
    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let rig = audio::create_audio_rig()?;
    audio::start_ambient(&rig);

    let atlas = sprites::load_sprite_atlas(&document).await?;
    let cfg = FlockConfig::default();
    let (bird_capacity, line_capacity) = (cfg.count, cfg.line_count());
    let engine = Rc::new(RefCell::new(FlockEngine::new(
        cfg,
        &atlas.rects,
        role,
        rand::random::<u64>(),
    )?));

    let gpu = frame::init_gpu(&canvas, &atlas, bird_capacity, line_capacity).await;

    let page = pages::PageContext {
        document: document.clone(),
        engine: engine.clone(),
        audio: rig,
        editor_note: Rc::new(RefCell::new(String::new())),
    };
    match role {
        SessionRole::Home => pages::wire_home_page(&page),
        SessionRole::Editor => {
            pages::wire_editor_page(&page);
            events::wire_global_keydown(page.clone());
        }
    }

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        page, role, canvas, gpu,
    )));
    frame::start_loop(frame_ctx);
    Ok(())
}
