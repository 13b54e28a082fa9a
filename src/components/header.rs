use leptos::prelude::*;

use crate::app::AppState;
use crate::config::APP_NAME;
use crate::router::{Transition, View};

#[component]
pub fn Header() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <header class="app-header">
            <div class="header-content">
                <div class="app-logo">
                    <span class="logo-icon">"\u{2697}"</span>
                    <span class="logo-text">{APP_NAME}</span>
                </div>
                <div class="header-right">
                    <div class="user-info">
                        <span class="user-name">{move || state.username.get()}</span>
                    </div>
                    <button class="btn btn-secondary btn-sm" on:click=move |_| state.logout()>
                        "Logout"
                    </button>
                </div>
            </div>
        </header>
        <nav class="app-nav">
            <div class="nav-container">
                {View::TABS.into_iter().map(|tab| {
                    let label = tab.tab_label().unwrap_or_default();
                    view! {
                        <button
                            class="nav-tab"
                            class:active=move || state.view() == tab
                            on:click=move |_| { state.go(Transition::Navigate(tab)); }
                        >
                            {label}
                        </button>
                    }
                }).collect::<Vec<_>>()}
            </div>
        </nav>
    }
}
