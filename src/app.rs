use leptos::prelude::*;
use tracing::{error, info, warn};
use wasm_bindgen_futures::spawn_local;

use crate::api::ApiClient;
use crate::components::banner::{Banner, BannerKind};
use crate::components::header::Header;
use crate::config::{AppConfig, APP_NAME, APP_VERSION};
use crate::models::DatasetSummary;
use crate::pages::dashboard::DashboardPage;
use crate::pages::history::HistoryPage;
use crate::pages::login::LoginPage;
use crate::pages::upload::UploadPage;
use crate::requests::RequestGuard;
use crate::router::{Transition, View, ViewRouter};
use crate::session::Session;
use crate::shortcuts::{use_shortcuts, Shortcut};

const DEFAULT_USERNAME: &str = "User";

/// Shared app state, provided as context. All fields are arena handles, so
/// the struct is `Copy` and can be moved into any closure.
#[derive(Clone, Copy)]
pub struct AppState {
    api: StoredValue<ApiClient>,
    config: StoredValue<AppConfig>,
    /// Supersedes older "load dataset for the dashboard" requests.
    dashboard_guard: StoredValue<RequestGuard>,
    pub router: RwSignal<ViewRouter>,
    /// Dataset shown on the dashboard.
    pub dataset: RwSignal<Option<DatasetSummary>>,
    pub dataset_loading: RwSignal<bool>,
    pub username: RwSignal<String>,
}

impl AppState {
    pub fn new(config: AppConfig, api: ApiClient) -> Self {
        Self {
            api: StoredValue::new(api),
            config: StoredValue::new(config),
            dashboard_guard: StoredValue::new(RequestGuard::new()),
            router: RwSignal::new(ViewRouter::default()),
            dataset: RwSignal::new(None),
            dataset_loading: RwSignal::new(false),
            username: RwSignal::new(DEFAULT_USERNAME.to_string()),
        }
    }

    pub fn api(&self) -> ApiClient {
        self.api.get_value()
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    pub fn view(&self) -> View {
        self.router.with(|r| r.current())
    }

    pub fn go(&self, transition: Transition) -> bool {
        self.router.try_update(|r| r.apply(transition)).unwrap_or(false)
    }

    /// Check the persisted session and pick the first view.
    pub fn restore_session(&self) {
        let session = self.api().session().clone();
        let authenticated = session.is_authenticated();
        self.go(Transition::SessionChecked { authenticated });

        if authenticated {
            self.username
                .set(session.username().unwrap_or_else(|| DEFAULT_USERNAME.to_string()));
            self.load_latest();
        }
    }

    pub fn login_succeeded(&self, username: &str) {
        let name = if username.trim().is_empty() {
            DEFAULT_USERNAME
        } else {
            username
        };
        self.username.set(name.to_string());
        self.go(Transition::LoggedIn);
        self.load_latest();
    }

    pub fn logout(&self) {
        self.api().logout();
        self.dashboard_guard.with_value(|g| g.invalidate());
        self.dataset.set(None);
        self.dataset_loading.set(false);
        self.username.set(DEFAULT_USERNAME.to_string());
        self.go(Transition::LoggedOut);
    }

    /// Fetch the newest upload (first history entry, then its full summary)
    /// for the dashboard.
    pub fn load_latest(&self) {
        let ticket = self.dashboard_guard.with_value(|g| g.supersede());
        let api = self.api();
        let state = *self;
        self.dataset_loading.set(true);

        spawn_local(async move {
            let result = api.latest_dataset().await;
            let Some(result) = ticket.accept("latest dataset", result) else {
                return;
            };
            match result {
                Ok(Some(dataset)) => state.dataset.set(Some(dataset)),
                Ok(None) => info!("No datasets uploaded yet"),
                Err(e) => warn!("Failed to load latest dataset: {}", e),
            }
            state.dataset_loading.set(false);
        });
    }

    /// Show an already complete dataset on the dashboard.
    pub fn show_dataset(&self, dataset: DatasetSummary) {
        self.dashboard_guard.with_value(|g| g.invalidate());
        self.dataset_loading.set(false);
        self.dataset.set(Some(dataset));
        self.go(Transition::DatasetSelected);
    }

    /// A fresh upload finished: reload it with its records, then show it.
    /// Falls back to the upload response if the reload fails.
    pub fn upload_succeeded(&self, summary: DatasetSummary) {
        let ticket = self.dashboard_guard.with_value(|g| g.supersede());
        let api = self.api();
        let state = *self;

        spawn_local(async move {
            let full = match api.dataset_summary(summary.id).await {
                Ok(full) => full,
                Err(e) => {
                    warn!("Failed to reload dataset {}: {}", summary.id, e);
                    summary
                }
            };
            if let Some(full) = ticket.accept("uploaded dataset", full) {
                state.show_dataset(full);
            }
        });
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::load();
    let api = match ApiClient::new(&config, Session::browser()) {
        Ok(api) => api,
        Err(e) => {
            error!("Cannot start client: {}", e);
            return view! {
                <div class="fatal">
                    <Banner kind=BannerKind::Error message=e.user_message() />
                </div>
            }
            .into_any();
        }
    };

    let state = AppState::new(config, api);
    provide_context(state);

    // Resolve the stored session before the first render
    state.restore_session();

    use_shortcuts(move |shortcut| {
        if let Shortcut::GoTo(tab) = shortcut {
            state.go(Transition::Navigate(tab));
        }
    });

    let loading = Memo::new(move |_| state.view() == View::Loading);
    let signed_in = Memo::new(move |_| state.view().is_authenticated());

    view! {
        {move || {
            if loading.get() {
                view! {
                    <div class="loading-overlay">
                        <div class="spinner"></div>
                        <p class="loading-text">"Loading application..."</p>
                    </div>
                }
                .into_any()
            } else if signed_in.get() {
                view! { <Shell /> }.into_any()
            } else {
                view! { <LoginPage /> }.into_any()
            }
        }}
    }
    .into_any()
}

#[component]
fn Shell() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <div class="app">
            <Header />
            <main class="app-main">
                <div class="container">
                    {move || match state.view() {
                        View::Upload => view! { <UploadPage /> }.into_any(),
                        View::History => view! { <HistoryPage /> }.into_any(),
                        _ => view! { <DashboardPage /> }.into_any(),
                    }}
                </div>
            </main>
            <footer class="app-footer">
                <p class="footer-text">{format!("{} v{}", APP_NAME, APP_VERSION)}</p>
            </footer>
        </div>
    }
}
