//! Per-row equipment records of a dataset.

use leptos::prelude::*;

use crate::components::stat_card::format_stat;
use crate::models::EquipmentRecord;

#[component]
pub fn EquipmentTable(records: Vec<EquipmentRecord>) -> impl IntoView {
    if records.is_empty() {
        return view! {
            <p class="table-empty">"No equipment records in this dataset."</p>
        }
        .into_any();
    }

    let count = records.len();
    view! {
        <div class="card table-card">
            <div class="card-header">
                <h3 class="card-title">"Equipment Records"</h3>
                <span class="badge badge-primary">{format!("{} rows", count)}</span>
            </div>
            <div class="table-scroll">
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"Equipment Name"</th>
                            <th>"Type"</th>
                            <th class="num">"Flowrate"</th>
                            <th class="num">"Pressure"</th>
                            <th class="num">"Temperature"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {records.into_iter().map(|r| view! {
                            <tr>
                                <td>{r.equipment_name}</td>
                                <td>{r.equipment_type}</td>
                                <td class="num">{format_stat(r.flowrate)}</td>
                                <td class="num">{format_stat(r.pressure)}</td>
                                <td class="num">{format_stat(r.temperature)}</td>
                            </tr>
                        }).collect::<Vec<_>>()}
                    </tbody>
                </table>
            </div>
        </div>
    }
    .into_any()
}
