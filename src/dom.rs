use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Forward `change` events of a file input as the first picked file, then
/// clear the input so the same file can be picked again.
pub fn add_file_listener(
    document: &web::Document,
    input_id: &str,
    mut handler: impl FnMut(web::File) + 'static,
) {
    let Some(input) = input_element(document, input_id) else {
        return;
    };
    let input_cb = input.clone();
    let closure = Closure::wrap(Box::new(move || {
        if let Some(file) = input_cb.files().and_then(|list| list.get(0)) {
            handler(file);
        }
        input_cb.set_value("");
    }) as Box<dyn FnMut()>);
    _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn input_element(document: &web::Document, id: &str) -> Option<web::HtmlInputElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
}

/// Open the file picker behind `button_id`.
pub fn wire_import_button(document: &web::Document, button_id: &str, input_id: &str) {
    let Some(input) = input_element(document, input_id) else {
        return;
    };
    add_click_listener(document, button_id, move || input.click());
}

#[inline]
pub fn set_text(document: &web::Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

/// `<body data-page>`, if present.
pub fn body_page(document: &web::Document) -> Option<String> {
    document.body().and_then(|b| b.dataset().get("page"))
}

/// The render canvas: `#id` itself when it is a canvas, otherwise a canvas
/// appended to it.
pub fn canvas_in(
    document: &web::Document,
    id: &str,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let host = document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?;
    match host.dyn_into::<web::HtmlCanvasElement>() {
        Ok(canvas) => Ok(canvas),
        Err(host) => {
            let canvas = document
                .create_element("canvas")
                .map_err(|e| anyhow::anyhow!("{:?}", e))?
                .dyn_into::<web::HtmlCanvasElement>()
                .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
            _ = canvas.set_attribute("style", "width:100%;height:100%;display:block");
            host.append_child(&canvas)
                .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            Ok(canvas)
        }
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Blocking notice for failures the page cannot recover from.
pub fn alert(message: &str) {
    if let Some(w) = web::window() {
        _ = w.alert_with_message(message);
    }
}
