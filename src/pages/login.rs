//! Sign-in and registration form.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppState;
use crate::components::banner::{Banner, BannerKind};
use crate::config::APP_NAME;

const AUTH_FALLBACK: &str = "An error occurred. Please try again.";

#[component]
pub fn LoginPage() -> impl IntoView {
    let state = expect_context::<AppState>();

    let (is_registering, set_is_registering) = signal(false);
    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (show_password, set_show_password) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if loading.get() {
            return;
        }

        let user = username.get();
        let pass = password.get();
        let mail = email.get();
        let registering = is_registering.get();
        set_error.set(None);
        set_loading.set(true);

        let api = state.api();
        spawn_local(async move {
            let result = if registering {
                let mail = Some(mail.trim()).filter(|m| !m.is_empty());
                api.register(&user, mail, &pass).await
            } else {
                api.login(&user, &pass).await
            };

            match result {
                Ok(_) => state.login_succeeded(&user),
                Err(e) => {
                    let msg = e.server_message().map(str::to_string).unwrap_or_else(|| AUTH_FALLBACK.to_string());
                    set_error.set(Some(msg));
                }
            }
            set_loading.set(false);
        });
    };

    let toggle_mode = move |_| {
        set_is_registering.update(|r| *r = !*r);
        set_error.set(None);
        set_email.set(String::new());
        set_password.set(String::new());
    };

    view! {
        <div class="login-screen">
            <div class="card login-card">
                <div class="login-welcome">
                    <div class="login-icon">"\u{2697}"</div>
                    <h2>{move || if is_registering.get() { "Create Account" } else { "Welcome Back" }}</h2>
                    <p class="page-description">
                        {move || if is_registering.get() {
                            "Join us to visualize your equipment data".to_string()
                        } else {
                            format!("Sign in to continue to {}", APP_NAME)
                        }}
                    </p>
                </div>

                {move || error.get().map(|msg| view! { <Banner kind=BannerKind::Error message=msg /> })}

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label class="label" for="login-username">"Username"</label>
                        <input
                            id="login-username"
                            type="text"
                            class="input"
                            required
                            placeholder="Enter your username"
                            prop:value=move || username.get()
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                            disabled=move || loading.get()
                        />
                    </div>

                    <Show when=move || is_registering.get()>
                        <div class="form-group">
                            <label class="label" for="login-email">"Email (Optional)"</label>
                            <input
                                id="login-email"
                                type="email"
                                class="input"
                                placeholder="your.email@example.com"
                                prop:value=move || email.get()
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                disabled=move || loading.get()
                            />
                        </div>
                    </Show>

                    <div class="form-group">
                        <label class="label" for="login-password">"Password"</label>
                        <div class="input-row">
                            <input
                                id="login-password"
                                type=move || if show_password.get() { "text" } else { "password" }
                                class="input"
                                required
                                placeholder="Enter your password"
                                prop:value=move || password.get()
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                disabled=move || loading.get()
                            />
                            <button
                                type="button"
                                class="btn btn-secondary btn-sm"
                                on:click=move |_| set_show_password.update(|s| *s = !*s)
                                disabled=move || loading.get()
                            >
                                {move || if show_password.get() { "Hide" } else { "Show" }}
                            </button>
                        </div>
                    </div>

                    <button type="submit" class="btn btn-primary btn-lg btn-block" disabled=move || loading.get()>
                        {move || match (loading.get(), is_registering.get()) {
                            (true, true) => "Creating Account...",
                            (true, false) => "Signing In...",
                            (false, true) => "Create Account",
                            (false, false) => "Sign In",
                        }}
                    </button>
                </form>

                <div class="login-toggle">
                    <span>
                        {move || if is_registering.get() { "Already have an account? " } else { "Don't have an account? " }}
                    </span>
                    <button type="button" class="btn-link" on:click=toggle_mode disabled=move || loading.get()>
                        {move || if is_registering.get() { "Sign In" } else { "Create Account" }}
                    </button>
                </div>
            </div>
        </div>
    }
}
