use leptos::prelude::*;

/// Accent colour of a summary card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Primary,
    Success,
    Purple,
    Amber,
}

impl Accent {
    fn class(&self) -> &'static str {
        match self {
            Accent::Primary => "stat-card stat-primary",
            Accent::Success => "stat-card stat-success",
            Accent::Purple => "stat-card stat-purple",
            Accent::Amber => "stat-card stat-amber",
        }
    }
}

/// Format an average the way the backend rounds it (two decimals, trailing
/// zeros dropped).
pub fn format_stat(value: f64) -> String {
    let rounded = format!("{:.2}", value);
    rounded.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[component]
pub fn StatCard(
    /// Card label, e.g. "Avg Pressure"
    #[prop(into)]
    label: String,
    /// Displayed value
    #[prop(into)]
    value: String,
    /// Hover hint explaining the metric
    #[prop(optional, into)]
    hint: Option<String>,
    accent: Accent,
) -> impl IntoView {
    let aria = label.clone();
    view! {
        <div class=accent.class() role="article" aria-label=aria>
            <div class="stat-label" title=hint.unwrap_or_default()>{label}</div>
            <div class="stat-value">{value}</div>
        </div>
    }
}
