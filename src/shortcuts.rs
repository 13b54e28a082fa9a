//! Keyboard shortcuts.
//!
//! | Keys            | Action                              |
//! |-----------------|-------------------------------------|
//! | Esc             | cancel dialog / clear selection     |
//! | Enter           | submit (not while typing in a field)|
//! | F5              | refresh data                        |
//! | Ctrl/Cmd + 1..3 | Dashboard / Upload / History        |

use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::router::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Escape,
    Enter,
    Refresh,
    GoTo(View),
}

/// Key state extracted from a `keydown` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress<'a> {
    pub key: &'a str,
    pub ctrl: bool,
    pub meta: bool,
    /// Focus is in an input, textarea or contenteditable element.
    pub typing: bool,
}

impl Shortcut {
    /// Map a key press to a shortcut. The second value says whether the
    /// browser default should be suppressed.
    pub fn from_key(press: KeyPress<'_>) -> Option<(Shortcut, bool)> {
        let modifier = press.ctrl || press.meta;
        match press.key {
            "Escape" => Some((Shortcut::Escape, false)),
            "Enter" if !press.typing => Some((Shortcut::Enter, false)),
            "F5" => Some((Shortcut::Refresh, true)),
            "1" if modifier => Some((Shortcut::GoTo(View::Dashboard), true)),
            "2" if modifier => Some((Shortcut::GoTo(View::Upload), true)),
            "3" if modifier => Some((Shortcut::GoTo(View::History), true)),
            _ => None,
        }
    }
}

fn is_typing(ev: &web_sys::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
        .map(|el| {
            let tag = el.tag_name();
            tag == "INPUT" || tag == "TEXTAREA" || el.is_content_editable()
        })
        .unwrap_or(false)
}

/// Listen for shortcuts on the window for as long as the calling component
/// lives.
pub fn use_shortcuts(handler: impl Fn(Shortcut) + 'static) {
    let handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let key = ev.key();
        let press = KeyPress {
            key: &key,
            ctrl: ev.ctrl_key(),
            meta: ev.meta_key(),
            typing: is_typing(&ev),
        };
        if let Some((shortcut, prevent)) = Shortcut::from_key(press) {
            if prevent {
                ev.prevent_default();
            }
            handler(shortcut);
        }
    });
    on_cleanup(move || handle.remove());
}
