//! Thin wrappers over browser APIs used by the pages.

use js_sys::{Array, ArrayBuffer, Uint8Array};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::AppError;
use crate::upload::UploadCandidate;

fn js_err(context: &str, e: wasm_bindgen::JsValue) -> AppError {
    AppError::Network(format!("{}: {:?}", context, e))
}

/// Read a picked or dropped file into memory.
pub async fn read_file(file: web_sys::File) -> Result<UploadCandidate, AppError> {
    let name = file.name();
    let array_buffer: ArrayBuffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| js_err("Failed to read file", e))?
        .dyn_into()
        .map_err(|_| AppError::Validation("Failed to read file contents".to_string()))?;

    let bytes = Uint8Array::new(&array_buffer).to_vec();
    Ok(UploadCandidate::new(name, bytes))
}

/// Size as reported by the browser, before the body is read.
pub fn file_size(file: &web_sys::File) -> u64 {
    file.size().max(0.0) as u64
}

/// Offer `bytes` to the user as a download named `file_name`.
pub fn save_bytes(file_name: &str, bytes: &[u8], mime: &str) -> Result<(), AppError> {
    let window = web_sys::window().ok_or_else(|| AppError::Storage("No window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| AppError::Storage("No document".to_string()))?;
    let body = document
        .body()
        .ok_or_else(|| AppError::Storage("No document body".to_string()))?;

    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(|e| js_err("Failed to create blob", e))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|e| js_err("Failed to create object URL", e))?;

    let link: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| js_err("Failed to create link", e))?
        .dyn_into()
        .map_err(|_| AppError::Storage("Created element is not an anchor".to_string()))?;
    link.set_href(&url);
    link.set_download(file_name);

    body.append_child(&link).map_err(|e| js_err("Failed to attach link", e))?;
    link.click();
    link.remove();

    if let Err(e) = web_sys::Url::revoke_object_url(&url) {
        warn!("Failed to revoke object URL: {:?}", e);
    }
    Ok(())
}

/// Blocking alert, used for per-row action failures.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
