use crate::constants::HOME_COUNTDOWN_ID;
use wasm_bindgen::JsCast;
use web_sys as web;

const COUNTDOWN_STYLE: &str = "position:fixed;left:50%;top:50%;transform:translate(-50%,-50%);\
color:rgba(255,255,255,0.88);font:700 22px/1.1 Helvetica Neue,Helvetica,Arial,sans-serif;\
text-shadow:0 0 14px rgba(0,0,0,0.55);pointer-events:none;user-select:none;z-index:40";

#[inline]
pub fn show(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().remove_1("hidden");
        if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
            _ = html.style().remove_property("display");
        }
    }
}

#[inline]
pub fn hide(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().add_1("hidden");
        // fallback for pages without the CSS class
        if let Some(html) = el.dyn_ref::<web::HtmlElement>() {
            _ = html.style().set_property("display", "none");
        }
    }
}

#[inline]
pub fn is_hidden(document: &web::Document, id: &str) -> bool {
    document
        .get_element_by_id(id)
        .map(|el| el.class_list().contains("hidden"))
        .unwrap_or(true)
}

/// The home page countdown, created on first use.
pub fn ensure_countdown(document: &web::Document) -> Option<web::Element> {
    if let Some(el) = document.get_element_by_id(HOME_COUNTDOWN_ID) {
        return Some(el);
    }
    let el = document.create_element("div").ok()?;
    el.set_id(HOME_COUNTDOWN_ID);
    _ = el.set_attribute("style", COUNTDOWN_STYLE);
    document.body()?.append_child(&el).ok()?;
    hide(document, HOME_COUNTDOWN_ID);
    Some(el)
}

/// Show `text` in the countdown, or hide it for `None`.
pub fn update_countdown(document: &web::Document, text: Option<&str>) {
    match text {
        Some(t) => {
            if let Some(el) = ensure_countdown(document) {
                el.set_text_content(Some(t));
                show(document, HOME_COUNTDOWN_ID);
            }
        }
        None => {
            if !is_hidden(document, HOME_COUNTDOWN_ID) {
                hide(document, HOME_COUNTDOWN_ID);
            }
        }
    }
}
