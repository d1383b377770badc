//! Password field with a show/hide toggle.
//!
//! The visibility flag is a module-level signal. The field is wrapped in a
//! `Watch`, so clicking the toggle re-renders only that fragment.
//!
//! Run with `cargo run -p pulse-core --example show_password`.

use pulse_core::{Signal, Watch, Watchable};

thread_local! {
    static VISIBLE: Signal<bool> = Signal::new(false);
}

/// What the fragment hands to the page for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PasswordField {
    input_type: &'static str,
    aria_label: &'static str,
    aria_pressed: bool,
    icon: &'static str,
}

fn render_field() -> PasswordField {
    let visible = VISIBLE.with(Signal::get);
    PasswordField {
        input_type: if visible { "text" } else { "password" },
        aria_label: if visible { "Hide password" } else { "Show password" },
        aria_pressed: visible,
        icon: if visible { "eye-off" } else { "eye" },
    }
}

fn toggle_visibility() {
    VISIBLE.with(|visible| visible.update(|value| *value = !*value));
}

fn main() {
    let mut field = Watch::new(VISIBLE.with(|visible| visible.to_source()), render_field);
    field.mount();
    println!("mounted:  {:?}", field.view());

    toggle_visibility();
    println!("clicked:  {:?}", field.view());

    toggle_visibility();
    println!("clicked:  {:?}", field.view());

    field.unmount();
    toggle_visibility();
    println!(
        "unmounted: renders={} visible={}",
        field.render_count(),
        VISIBLE.with(|v| v.to_string())
    );
}
