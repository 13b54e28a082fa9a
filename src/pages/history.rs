use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppState;
use crate::browser;
use crate::components::banner::{Banner, BannerKind};
use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::stat_card::format_stat;
use crate::history::{HistoryList, RowAction};
use crate::models::DatasetSummary;
use crate::requests::RequestGuard;
use crate::shortcuts::{use_shortcuts, Shortcut};

const LOAD_FAILED: &str = "Failed to load upload history. Please try again.";
const VIEW_FAILED: &str = "Failed to load dataset details. Please try again.";
const DOWNLOAD_FAILED: &str = "Failed to download PDF. Please try again.";
const DELETE_FAILED: &str = "Failed to delete dataset. Please try again.";

#[component]
pub fn HistoryPage() -> impl IntoView {
    let state = expect_context::<AppState>();

    let list = RwSignal::new(HistoryList::default());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal::<Option<String>>(None);

    // `load_guard` keeps only the newest reload; `scope` drops everything
    // once the page is left.
    let load_guard = StoredValue::new(RequestGuard::new());
    let scope = StoredValue::new(RequestGuard::new());
    on_cleanup(move || {
        load_guard.with_value(|g| g.invalidate());
        scope.with_value(|g| g.invalidate());
    });

    let reload = move || {
        let ticket = load_guard.with_value(|g| g.supersede());
        let api = state.api();
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let result = api.upload_history().await;
            let Some(result) = ticket.accept("upload history", result) else {
                return;
            };
            match result {
                Ok(datasets) => list.update(|l| l.load(datasets)),
                Err(e) => {
                    warn!("Failed to load history: {}", e);
                    set_error.set(Some(LOAD_FAILED.to_string()));
                }
            }
            set_loading.set(false);
        });
    };

    // Load on mount
    Effect::new(move |_| reload());

    let view_dataset = move |id: u64| {
        let Some(key) = list.try_update(|l| l.begin(RowAction::View, id)) else {
            return;
        };
        let ticket = scope.with_value(|g| g.ticket());
        let api = state.api();
        spawn_local(async move {
            let result = api.dataset_summary(id).await;
            let Some(result) = ticket.accept("dataset summary", result) else {
                return;
            };
            list.update(|l| l.end(key));
            match result {
                Ok(dataset) => state.show_dataset(dataset),
                Err(e) => {
                    warn!("Failed to load dataset {}: {}", id, e);
                    browser::alert(VIEW_FAILED);
                }
            }
        });
    };

    let download = move |id: u64| {
        let Some(key) = list.try_update(|l| l.begin(RowAction::Download, id)) else {
            return;
        };
        let ticket = scope.with_value(|g| g.ticket());
        let api = state.api();
        spawn_local(async move {
            let result = api.download_pdf(id).await;
            let Some(result) = ticket.accept("pdf report", result) else {
                return;
            };
            list.update(|l| l.end(key));
            let saved = result.and_then(|report| browser::save_bytes(&report.file_name, &report.bytes, "application/pdf"));
            if let Err(e) = saved {
                warn!("Failed to download report for dataset {}: {}", id, e);
                browser::alert(DOWNLOAD_FAILED);
            }
        });
    };

    let confirm_delete = move || {
        let Some(id) = list.try_update(|l| l.confirm_delete()).flatten() else {
            return;
        };
        let ticket = scope.with_value(|g| g.ticket());
        let api = state.api();
        spawn_local(async move {
            let result = api.delete_dataset(id).await;
            let Some(result) = ticket.accept("delete dataset", result) else {
                return;
            };
            match result {
                Ok(()) => list.update(|l| l.delete_succeeded(id)),
                Err(e) => {
                    warn!("Failed to delete dataset {}: {}", id, e);
                    list.update(|l| l.delete_failed(id));
                    browser::alert(DELETE_FAILED);
                }
            }
        });
    };

    let deleting_now = move || {
        list.with_untracked(|l| l.pending_delete().is_some_and(|id| l.is_pending(RowAction::Delete, id)))
    };

    use_shortcuts(move |shortcut| match shortcut {
        Shortcut::Escape => {
            // A delete in flight keeps its dialog open
            if !deleting_now() {
                list.update(|l| {
                    l.escape();
                });
            }
        }
        Shortcut::Refresh => reload(),
        _ => {}
    });

    let deleting = Signal::derive(move || {
        list.with(|l| l.pending_delete().is_some_and(|id| l.is_pending(RowAction::Delete, id)))
    });

    view! {
        <div class="page page-history">
            <div class="page-header">
                <div>
                    <h2>"Upload History"</h2>
                    <p class="page-description">"Your most recent uploads"</p>
                </div>
                <div class="page-header-actions">
                    <span class="badge badge-primary">{move || list.with(|l| l.count_label())}</span>
                    <button
                        class="btn btn-secondary"
                        on:click=move |_| reload()
                        disabled=move || loading.get()
                    >
                        {move || if loading.get() { "Refreshing..." } else { "Refresh" }}
                    </button>
                </div>
            </div>

            {move || error.get().map(|msg| view! { <Banner kind=BannerKind::Error message=msg /> })}

            <Show when=move || !list.with(|l| l.is_empty())>
                <div class="search-bar">
                    <input
                        type="search"
                        class="input"
                        placeholder="Search by dataset ID or equipment count..."
                        prop:value=move || list.with(|l| l.search_term().to_string())
                        on:input=move |ev| list.update(|l| l.set_search_term(event_target_value(&ev)))
                    />
                </div>
            </Show>

            {move || {
                if loading.get() && list.with(|l| l.is_empty()) {
                    return view! {
                        <div class="loading-container">
                            <div class="spinner"></div>
                            <p class="loading-text">"Loading history..."</p>
                        </div>
                    }
                    .into_any();
                }

                let rows = list.with(|l| l.filtered());
                if rows.is_empty() {
                    let searching = list.with(|l| !l.is_empty());
                    return view! {
                        <div class="card empty-state">
                            <div class="empty-icon">"\u{1f4c2}"</div>
                            <h3>{if searching { "No Results Found" } else { "No Upload History" }}</h3>
                            <p>
                                {if searching {
                                    "No datasets match your search."
                                } else {
                                    "Datasets you upload will appear here."
                                }}
                            </p>
                        </div>
                    }
                    .into_any();
                }

                view! {
                    <div class="history-list">
                        {rows.into_iter().map(|dataset| view! {
                            <HistoryRow
                                dataset=dataset
                                list=list
                                on_view=Callback::new(view_dataset)
                                on_download=Callback::new(download)
                                on_delete=Callback::new(move |id| list.update(|l| l.request_delete(id)))
                            />
                        }).collect::<Vec<_>>()}
                    </div>
                }
                .into_any()
            }}

            {move || list.with(|l| l.pending_delete()).map(|id| view! {
                <ConfirmDialog
                    title="Delete Dataset?"
                    message=format!("Are you sure you want to delete Dataset #{}? This action cannot be undone.", id)
                    confirm_label="Delete"
                    busy=deleting
                    on_confirm=Callback::new(move |_| confirm_delete())
                    on_cancel=Callback::new(move |_| list.update(|l| l.cancel_delete()))
                />
            })}
        </div>
    }
}

#[component]
fn HistoryRow(
    dataset: DatasetSummary,
    list: RwSignal<HistoryList>,
    on_view: Callback<u64>,
    on_download: Callback<u64>,
    on_delete: Callback<u64>,
) -> impl IntoView {
    let id = dataset.id;
    let pending = move |action| list.with(|l| l.is_pending(action, id));

    view! {
        <div class="card history-item">
            <div class="history-item-header">
                <span class="history-item-title">{format!("Dataset #{}", id)}</span>
                <span class="history-item-date">{dataset.uploaded_at_display()}</span>
            </div>
            <div class="history-stats">
                <div class="history-stat">
                    <span class="stat-label">"Equipment"</span>
                    <span class="history-stat-value">{dataset.total_equipment.to_string()}</span>
                </div>
                <div class="history-stat">
                    <span class="stat-label">"Avg Flowrate"</span>
                    <span class="history-stat-value">{format_stat(dataset.avg_flowrate)}</span>
                </div>
                <div class="history-stat">
                    <span class="stat-label">"Avg Pressure"</span>
                    <span class="history-stat-value">{format_stat(dataset.avg_pressure)}</span>
                </div>
                <div class="history-stat">
                    <span class="stat-label">"Avg Temperature"</span>
                    <span class="history-stat-value">{format_stat(dataset.avg_temperature)}</span>
                </div>
            </div>
            <div class="history-actions">
                <button class="btn btn-primary btn-sm" on:click=move |_| on_view.run(id) disabled=move || pending(RowAction::View)>
                    {move || if pending(RowAction::View) { "Loading..." } else { "View" }}
                </button>
                <button class="btn btn-secondary btn-sm" on:click=move |_| on_download.run(id) disabled=move || pending(RowAction::Download)>
                    {move || if pending(RowAction::Download) { "Downloading..." } else { "Download PDF" }}
                </button>
                <button class="btn btn-danger btn-sm" on:click=move |_| on_delete.run(id) disabled=move || pending(RowAction::Delete)>
                    {move || if pending(RowAction::Delete) { "Deleting..." } else { "Delete" }}
                </button>
            </div>
        </div>
    }
}
