use crate::audio;
use crate::input::{should_dispatch, suppresses_default, KeyPress};
use crate::pages::PageContext;
use flock_core::Action;
use wasm_bindgen::JsCast;
use web_sys as web;

fn target_element(ev: &web::KeyboardEvent) -> Option<web::HtmlElement> {
    ev.target()
        .and_then(|t| t.dyn_into::<web::HtmlElement>().ok())
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, ctx: &PageContext) {
    let code = ev.code();
    let target = target_element(ev);
    let tag = target.as_ref().map(|el| el.tag_name());
    let press = KeyPress {
        code: &code,
        repeat: ev.repeat(),
        ctrl: ev.ctrl_key(),
        meta: ev.meta_key(),
        alt: ev.alt_key(),
        target_tag: tag.as_deref(),
        target_editable: target.as_ref().is_some_and(|el| el.is_content_editable()),
    };
    if !should_dispatch(&press) {
        return;
    }
    if suppresses_default(&code) {
        ev.prevent_default();
    }
    let clock = audio::track_clock(&ctx.audio.track);
    let action = ctx.engine.borrow_mut().handle_key(&code, clock);
    match action {
        Some(Action::PlayTrack) => audio::request_play(&ctx.audio, &ctx.engine, true),
        Some(a) => log::debug!("[keys] {} -> {:?}", code, a),
        None => return,
    }
    ctx.refresh_editor();
}

/// Route window keydowns through the action dispatcher and the recorder.
pub fn wire_global_keydown(ctx: PageContext) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &ctx);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
