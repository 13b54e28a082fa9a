use leptos::prelude::*;

use crate::app::AppState;
use crate::components::charts::{BarChart, PieChart};
use crate::components::equipment_table::EquipmentTable;
use crate::components::stat_card::{format_stat, Accent, StatCard};
use crate::models::DatasetSummary;
use crate::router::{Transition, View};
use crate::shortcuts::{use_shortcuts, Shortcut};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let state = expect_context::<AppState>();

    use_shortcuts(move |shortcut| {
        if shortcut == Shortcut::Refresh {
            state.load_latest();
        }
    });

    view! {
        <div class="page page-dashboard">
            <div class="page-header">
                <div>
                    <h2>"Dashboard"</h2>
                    <p class="page-description">"Summary of your most recent equipment dataset"</p>
                </div>
                <button
                    class="btn btn-secondary"
                    on:click=move |_| state.load_latest()
                    disabled=move || state.dataset_loading.get()
                >
                    {move || if state.dataset_loading.get() { "Refreshing..." } else { "Refresh" }}
                </button>
            </div>

            {move || {
                let loading = state.dataset_loading.get();
                match state.dataset.get() {
                    Some(dataset) => view! { <DatasetView dataset=dataset /> }.into_any(),
                    None if loading => view! {
                        <div class="loading-container">
                            <div class="spinner"></div>
                            <p class="loading-text">"Loading dataset..."</p>
                        </div>
                    }
                    .into_any(),
                    None => view! { <EmptyDashboard /> }.into_any(),
                }
            }}
        </div>
    }
}

#[component]
fn EmptyDashboard() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <div class="card empty-state">
            <div class="empty-icon">"\u{1f4ca}"</div>
            <h3>"No Data Yet"</h3>
            <p>"Upload a CSV file to see equipment statistics and charts."</p>
            <button
                class="btn btn-primary"
                on:click=move |_| {
                    state.go(Transition::Navigate(View::Upload));
                }
            >
                "Upload CSV"
            </button>
        </div>
    }
}

#[component]
fn DatasetView(dataset: DatasetSummary) -> impl IntoView {
    let chart = dataset.chart();
    let uploaded = dataset.uploaded_at_display();

    let charts = if chart.is_empty() {
        view! { <p class="table-empty">"No equipment type breakdown available."</p> }.into_any()
    } else {
        view! {
            <div class="chart-grid">
                <BarChart title="Equipment Type Distribution" chart=chart.clone() />
                <PieChart title="Equipment Type Share" chart=chart />
            </div>
        }
        .into_any()
    };

    view! {
        <div class="dataset-view">
            <div class="dataset-meta">
                <span class="badge badge-primary">{format!("Dataset #{}", dataset.id)}</span>
                <span class="dataset-date">{format!("Uploaded {}", uploaded)}</span>
            </div>

            <div class="stat-grid">
                <StatCard
                    label="Total Equipment"
                    value=dataset.total_equipment.to_string()
                    hint="Number of equipment rows in the uploaded CSV"
                    accent=Accent::Primary
                />
                <StatCard
                    label="Avg Flowrate"
                    value=format_stat(dataset.avg_flowrate)
                    hint="Mean flowrate across all equipment"
                    accent=Accent::Success
                />
                <StatCard
                    label="Avg Pressure"
                    value=format_stat(dataset.avg_pressure)
                    hint="Mean pressure across all equipment"
                    accent=Accent::Purple
                />
                <StatCard
                    label="Avg Temperature"
                    value=format_stat(dataset.avg_temperature)
                    hint="Mean temperature across all equipment"
                    accent=Accent::Amber
                />
            </div>

            {charts}

            <EquipmentTable records=dataset.equipment_records />
        </div>
    }
}
