use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Success,
}

/// Inline alert shown above a form or list.
#[component]
pub fn Banner(kind: BannerKind, #[prop(into)] message: String) -> impl IntoView {
    let (class, icon) = match kind {
        BannerKind::Error => ("alert alert-error", "\u{26a0}"),
        BannerKind::Success => ("alert alert-success", "\u{2713}"),
    };

    view! {
        <div class=class role="alert">
            <span class="alert-icon">{icon}</span>
            <span>{message}</span>
        </div>
    }
}
