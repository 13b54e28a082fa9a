//! CSV upload page.
//!
//! Users can drag-and-drop or browse for a CSV file. The file is checked
//! before it is read, held until submitted, then posted to the backend.

use std::time::Duration;

use leptos::html::Input;
use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppState;
use crate::browser;
use crate::components::banner::{Banner, BannerKind};
use crate::config::{MAX_FILE_SIZE_MB, REQUIRED_COLUMNS};
use crate::requests::RequestGuard;
use crate::shortcuts::{use_shortcuts, Shortcut};
use crate::upload::{validate_file, UploadFlow, SUCCESS_DISPLAY_DELAY_MS};

#[component]
pub fn UploadPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let max_bytes = state.config().max_file_size_bytes;

    let flow = RwSignal::new(UploadFlow::new(max_bytes));
    let (is_over, set_is_over) = signal(false);
    let file_input = NodeRef::<Input>::new();

    // Responses arriving after the page is left are dropped
    let guard = StoredValue::new(RequestGuard::new());
    on_cleanup(move || guard.with_value(|g| g.invalidate()));

    // Lets the same file be picked again after a rejection
    let reset_input = move || {
        if let Some(input) = file_input.get_untracked() {
            input.set_value("");
        }
    };

    let take_file = move |file: web_sys::File| {
        if flow.with_untracked(|f| f.is_uploading()) {
            return;
        }
        let name = file.name();
        if let Err(rejection) = validate_file(&name, browser::file_size(&file), max_bytes) {
            flow.update(|f| f.reject(rejection));
            reset_input();
            return;
        }
        if !matches!(flow.try_update(|f| f.begin_read()), Some(Ok(()))) {
            return;
        }

        let ticket = guard.with_value(|g| g.ticket());
        spawn_local(async move {
            let result = browser::read_file(file).await;
            let Some(result) = ticket.accept("file read", result) else {
                return;
            };
            let selected = match result {
                Ok(candidate) => flow.try_update(|f| f.select(Some(candidate))),
                Err(e) => {
                    warn!("Failed to read {}: {}", name, e);
                    flow.try_update(|f| f.select(None))
                }
            };
            // The rejection itself is already recorded in the flow
            if !matches!(selected, Some(Ok(()))) {
                reset_input();
            }
        });
    };

    let submit = move || {
        let candidate = match flow.try_update(|f| f.begin_upload()) {
            Some(Ok(candidate)) => candidate,
            _ => return,
        };

        let ticket = guard.with_value(|g| g.ticket());
        let api = state.api();
        spawn_local(async move {
            let result = api.upload_csv(&candidate).await;
            let Some(result) = ticket.accept("upload", result) else {
                return;
            };
            let Some(summary) = flow.try_update(|f| f.finish(result)).flatten() else {
                return;
            };

            set_timeout(
                move || {
                    if ticket.is_current() {
                        state.upload_succeeded(summary);
                    }
                },
                Duration::from_millis(SUCCESS_DISPLAY_DELAY_MS),
            );
        });
    };

    let clear = move || {
        flow.update(|f| {
            f.clear();
        });
        reset_input();
    };

    use_shortcuts(move |shortcut| match shortcut {
        Shortcut::Escape => clear(),
        Shortcut::Enter if flow.with_untracked(|f| f.can_submit()) => submit(),
        _ => {}
    });

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        set_is_over.set(false);

        if let Some(file) = ev.data_transfer().and_then(|dt| dt.files()).and_then(|files| files.get(0)) {
            take_file(file);
        }
    };

    let on_input_change = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            take_file(file);
        }
    };

    let uploading = move || flow.with(|f| f.is_uploading());

    view! {
        <div class="page page-upload">
            <div class="page-header">
                <div>
                    <h2>"Upload CSV"</h2>
                    <p class="page-description">"Upload equipment data to generate statistics and charts"</p>
                </div>
            </div>

            {move || flow.with(|f| f.error().map(str::to_string)).map(|msg| view! {
                <Banner kind=BannerKind::Error message=msg />
            })}
            {move || flow.with(|f| f.success().map(str::to_string)).map(|msg| view! {
                <Banner kind=BannerKind::Success message=msg />
            })}

            <div class="card">
                <div
                    class="drop-zone"
                    class:drop-zone-active=move || is_over.get()
                    class:drop-zone-loading=move || uploading() || flow.with(|f| f.is_reading())
                    on:dragover=move |ev: web_sys::DragEvent| {
                        ev.prevent_default();
                        set_is_over.set(true);
                    }
                    on:dragleave=move |_| set_is_over.set(false)
                    on:drop=on_drop
                >
                    <div class="drop-zone-content">
                        <div class="drop-icon">"\u{1f4c4}"</div>
                        <p class="drop-main">"Drop your CSV file here"</p>
                        <p class="drop-hint">"or"</p>
                        <label
                            for="csv-file-input"
                            class="btn btn-secondary"
                            class:disabled=uploading
                        >
                            "Browse Files"
                        </label>
                        <input
                            type="file"
                            id="csv-file-input"
                            accept=".csv"
                            style="display: none"
                            node_ref=file_input
                            disabled=uploading
                            on:change=on_input_change
                        />
                        <p class="drop-formats">{format!("CSV files up to {}MB", MAX_FILE_SIZE_MB)}</p>
                    </div>
                </div>

                {move || flow.with(|f| f.file().map(|file| (file.name.clone(), file.size_display()))).map(|(name, size)| view! {
                    <div class="selected-file">
                        <div class="selected-file-info">
                            <span class="selected-file-name">{name}</span>
                            <span class="selected-file-size">{size}</span>
                        </div>
                        <button
                            class="btn btn-secondary btn-sm"
                            on:click=move |_| clear()
                            disabled=uploading
                            title="Remove file (Esc)"
                        >
                            "Remove"
                        </button>
                    </div>
                })}

                <Show when=uploading>
                    <div class="upload-progress">
                        <div class="spinner"></div>
                        <p class="loading-text">"Uploading and processing..."</p>
                    </div>
                </Show>

                <div class="upload-actions">
                    <button
                        class="btn btn-primary btn-lg"
                        on:click=move |_| submit()
                        disabled=move || !flow.with(|f| f.can_submit())
                    >
                        {move || if uploading() { "Uploading..." } else { "Upload and Analyze" }}
                    </button>
                </div>
            </div>

            <div class="card requirements">
                <h3 class="card-title">"File Requirements"</h3>
                <ul>
                    <li>{format!("Required columns: {}", REQUIRED_COLUMNS.join(", "))}</li>
                    <li>"Numeric values for Flowrate, Pressure and Temperature"</li>
                    <li>{format!("Maximum file size: {}MB", MAX_FILE_SIZE_MB)}</li>
                    <li>"File extension must be .csv"</li>
                </ul>
            </div>
        </div>
    }
}
