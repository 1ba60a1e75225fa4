use crate::constants::EXPORT_URL_REVOKE_MS;
use flock_core::{export_file_name, format_capture_stamp, make_edits_payload, EditEvent};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[inline]
pub fn iso_now() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

/// Local time as `YYYYMMDD-HHMMSS`.
pub fn capture_stamp_now() -> String {
    let d = js_sys::Date::new_0();
    format_capture_stamp(
        d.get_full_year(),
        d.get_month() + 1,
        d.get_date(),
        d.get_hours(),
        d.get_minutes(),
        d.get_seconds(),
    )
}

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

/// Offer `text` as a file download through a temporary object URL.
pub fn download_text(document: &web::Document, file_name: &str, text: &str) -> anyhow::Result<()> {
    let parts = js_sys::Array::of1(&JsValue::from_str(text));
    let opts = web::BlobPropertyBag::new();
    opts.set_type("application/json");
    let blob = web::Blob::new_with_str_sequence_and_options(&parts, &opts).map_err(js_err)?;
    let url = web::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

    let anchor = document
        .create_element("a")
        .map_err(js_err)?
        .dyn_into::<web::HtmlAnchorElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    let body = document.body().ok_or_else(|| anyhow::anyhow!("no body"))?;
    body.append_child(&anchor).map_err(js_err)?;
    anchor.click();
    anchor.remove();

    let revoke = Closure::once_into_js(move || {
        _ = web::Url::revoke_object_url(&url);
    });
    if let Some(w) = web::window() {
        _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
            revoke.unchecked_ref(),
            EXPORT_URL_REVOKE_MS,
        );
    }
    Ok(())
}

pub fn export_edits(document: &web::Document, events: &[EditEvent]) -> anyhow::Result<()> {
    let payload = make_edits_payload(events, Some(iso_now()));
    let json = payload.to_json_pretty()?;
    let name = export_file_name(&capture_stamp_now());
    download_text(document, &name, &json)?;
    log::info!("[edits] exported {} events as {}", payload.events.len(), name);
    Ok(())
}

pub async fn read_file_text(file: &web::File) -> anyhow::Result<String> {
    let text = JsFuture::from(file.text()).await.map_err(js_err)?;
    text.as_string()
        .ok_or_else(|| anyhow::anyhow!("file text is not a string"))
}

/// GET `url` bypassing the HTTP cache. Non-2xx statuses are errors.
pub async fn fetch_text(url: &str) -> anyhow::Result<String> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let init = web::RequestInit::new();
    init.set_cache(web::RequestCache::NoStore);
    let request = web::Request::new_with_str_and_init(url, &init).map_err(js_err)?;
    let response: web::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !response.ok() {
        anyhow::bail!("{} status {}", url, response.status());
    }
    let text = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    text.as_string()
        .ok_or_else(|| anyhow::anyhow!("{} body is not text", url))
}
