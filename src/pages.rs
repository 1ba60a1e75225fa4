use crate::audio::{self, AudioRig};
use crate::constants::*;
use crate::dom;
use crate::edits_io;
use crate::storage;
use crate::ui::{self, EditsSource};
use flock_core::constants::DEFAULT_EDITS_URL;
use flock_core::{parse_edits_json, Action, ActionSource, EditEvent, FlockEngine};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Handles shared by the page buttons, the keyboard and the frame loop.
#[derive(Clone)]
pub struct PageContext {
    pub document: web::Document,
    pub engine: Rc<RefCell<FlockEngine>>,
    pub audio: AudioRig,
    /// Trailing note on the editor status line, kept until the next one.
    pub editor_note: Rc<RefCell<String>>,
}

impl PageContext {
    pub fn set_home_status(&self, text: &str) {
        dom::set_text(&self.document, HOME_STATUS_ID, text);
    }

    pub fn set_editor_note(&self, note: &str) {
        *self.editor_note.borrow_mut() = note.to_string();
        self.refresh_editor();
    }

    /// Redraw the editor status line and timeline.
    pub fn refresh_editor(&self) {
        let clock = audio::track_clock(&self.audio.track);
        let engine = self.engine.borrow();
        let recorder = &engine.session.recorder;
        let note = self.editor_note.borrow();
        dom::set_text(
            &self.document,
            EDITOR_STATUS_ID,
            &recorder.status_line(clock, &note),
        );
        dom::set_text(&self.document, EDITOR_TIMELINE_ID, &recorder.timeline_text());
        dom::set_text(
            &self.document,
            EDITOR_RECORD_BUTTON_ID,
            ui::record_button_label(recorder.is_recording()),
        );
    }

    /// Start home playback of user-supplied edits and the track with them.
    fn play_custom(&self, events: Vec<EditEvent>, source: EditsSource<'_>) {
        let count = events.len();
        self.engine.borrow_mut().session.load_custom(events);
        if count > 0 {
            audio::request_play(&self.audio, &self.engine, true);
        }
        self.set_home_status(&ui::home_loaded_status(&source, count));
    }

    fn replace_editor_edits(&self, events: Vec<EditEvent>, source: EditsSource<'_>) {
        let count = events.len();
        self.engine.borrow_mut().session.recorder.replace(events);
        self.set_editor_note(&ui::editor_loaded_status(&source, count));
    }
}

fn wire_direction_button(ctx: &PageContext) {
    let engine = ctx.engine.clone();
    dom::add_click_listener(&ctx.document, DIRECTION_BUTTON_ID, move || {
        engine
            .borrow_mut()
            .dispatch(Action::ToggleDirection, ActionSource::User);
    });
}

pub fn wire_home_page(ctx: &PageContext) {
    wire_direction_button(ctx);
    dom::wire_import_button(&ctx.document, HOME_IMPORT_BUTTON_ID, HOME_IMPORT_INPUT_ID);

    let import_ctx = ctx.clone();
    dom::add_file_listener(&ctx.document, HOME_IMPORT_INPUT_ID, move |file| {
        let ctx = import_ctx.clone();
        spawn_local(async move {
            let name = file.name();
            let parsed = match edits_io::read_file_text(&file).await {
                Ok(text) => parse_edits_json(&text).map_err(anyhow::Error::from),
                Err(e) => Err(e),
            };
            match parsed {
                Ok(payload) => ctx.play_custom(payload.events, EditsSource::File(&name)),
                Err(e) => {
                    log::warn!("[edits] import failed: {:?}", e);
                    ctx.set_home_status("import failed");
                }
            }
        });
    });

    let local_ctx = ctx.clone();
    dom::add_click_listener(&ctx.document, HOME_LOAD_LOCAL_BUTTON_ID, move || {
        match storage::load_edits().filter(|p| !p.events.is_empty()) {
            Some(payload) => local_ctx.play_custom(payload.events, EditsSource::LocalStorage),
            None => local_ctx.set_home_status(ui::no_saved_edits_status(true)),
        }
    });

    ctx.set_home_status(ui::HOME_IDLE_STATUS);
}

/// Fetch the bundled edits once the home countdown runs out.
pub fn load_default_edits(ctx: &PageContext) {
    let ctx = ctx.clone();
    spawn_local(async move {
        let parsed = match edits_io::fetch_text(DEFAULT_EDITS_URL).await {
            Ok(text) => parse_edits_json(&text).map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };
        let payload = match parsed {
            Ok(p) => p,
            Err(e) => {
                log::warn!("[edits] could not load {}: {:?}", DEFAULT_EDITS_URL, e);
                ctx.set_home_status("default.json not found");
                return;
            }
        };
        if payload.events.is_empty() {
            ctx.set_home_status("default.json has no edits");
            return;
        }
        if ctx.engine.borrow().session.player.is_armed() {
            // custom edits arrived while the fetch was in flight
            return;
        }
        let count = payload.events.len();
        ctx.engine.borrow_mut().session.player.start(payload.events);
        audio::request_play(&ctx.audio, &ctx.engine, true);
        ctx.set_home_status(&ui::home_loaded_status(&EditsSource::Default, count));
    });
}

pub fn wire_editor_page(ctx: &PageContext) {
    wire_direction_button(ctx);

    let play_ctx = ctx.clone();
    dom::add_click_listener(&ctx.document, EDITOR_PLAY_BUTTON_ID, move || {
        audio::request_play(&play_ctx.audio, &play_ctx.engine, true);
    });

    let record_ctx = ctx.clone();
    dom::add_click_listener(&ctx.document, EDITOR_RECORD_BUTTON_ID, move || {
        let recording = record_ctx
            .engine
            .borrow_mut()
            .session
            .recorder
            .toggle_recording();
        if recording && record_ctx.audio.track.paused() {
            audio::request_play(&record_ctx.audio, &record_ctx.engine, false);
        }
        record_ctx.refresh_editor();
    });

    let clear_ctx = ctx.clone();
    dom::add_click_listener(&ctx.document, EDITOR_CLEAR_BUTTON_ID, move || {
        clear_ctx.engine.borrow_mut().session.recorder.clear();
        clear_ctx.refresh_editor();
    });

    let save_ctx = ctx.clone();
    dom::add_click_listener(&ctx.document, EDITOR_SAVE_LOCAL_BUTTON_ID, move || {
        let result = storage::save_edits(save_ctx.engine.borrow().session.recorder.events());
        match result {
            Ok(()) => save_ctx.set_editor_note("saved to localStorage"),
            Err(e) => {
                log::warn!("[storage] save failed: {:?}", e);
                save_ctx.set_editor_note("save failed");
            }
        }
    });

    let load_ctx = ctx.clone();
    dom::add_click_listener(&ctx.document, EDITOR_LOAD_LOCAL_BUTTON_ID, move || {
        match storage::load_edits().filter(|p| !p.events.is_empty()) {
            Some(payload) => load_ctx.replace_editor_edits(payload.events, EditsSource::LocalStorage),
            None => load_ctx.set_editor_note(ui::no_saved_edits_status(false)),
        }
    });

    let export_ctx = ctx.clone();
    dom::add_click_listener(&ctx.document, EDITOR_EXPORT_BUTTON_ID, move || {
        let result = edits_io::export_edits(
            &export_ctx.document,
            export_ctx.engine.borrow().session.recorder.events(),
        );
        match result {
            Ok(()) => export_ctx.set_editor_note("exported json"),
            Err(e) => {
                log::warn!("[edits] export failed: {:?}", e);
                export_ctx.set_editor_note("export failed");
            }
        }
    });

    dom::wire_import_button(&ctx.document, EDITOR_IMPORT_BUTTON_ID, EDITOR_IMPORT_INPUT_ID);
    let import_ctx = ctx.clone();
    dom::add_file_listener(&ctx.document, EDITOR_IMPORT_INPUT_ID, move |file| {
        let ctx = import_ctx.clone();
        spawn_local(async move {
            let name = file.name();
            let parsed = match edits_io::read_file_text(&file).await {
                Ok(text) => parse_edits_json(&text).map_err(anyhow::Error::from),
                Err(e) => Err(e),
            };
            match parsed {
                Ok(payload) => ctx.replace_editor_edits(payload.events, EditsSource::File(&name)),
                Err(e) => {
                    log::warn!("[edits] editor import failed: {:?}", e);
                    ctx.set_editor_note("import failed");
                }
            }
        });
    });

    ctx.set_editor_note(ui::EDITOR_READY_STATUS);
}
