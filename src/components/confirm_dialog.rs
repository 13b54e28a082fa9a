//! Modal confirmation for destructive actions.

use leptos::prelude::*;

#[component]
pub fn ConfirmDialog(
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    #[prop(into)] confirm_label: String,
    /// Disables both buttons while the confirmed action runs.
    #[prop(into)]
    busy: Signal<bool>,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="confirm-overlay">
            <style>{include_str!("confirm_dialog.css")}</style>
            <div class="confirm-dialog" role="dialog" aria-modal="true">
                <div class="confirm-icon">"\u{26a0}"</div>
                <h3>{title}</h3>
                <p class="confirm-message">{message}</p>
                <div class="dialog-actions">
                    <button
                        class="btn btn-secondary"
                        on:click=move |_| on_cancel.run(())
                        disabled=move || busy.get()
                    >
                        "Cancel"
                    </button>
                    <button
                        class="btn btn-danger"
                        on:click=move |_| on_confirm.run(())
                        disabled=move || busy.get()
                    >
                        {move || if busy.get() { "Deleting...".to_string() } else { confirm_label.clone() }}
                    </button>
                </div>
            </div>
        </div>
    }
}
