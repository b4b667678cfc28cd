use std::panic;

pub const FALLBACK_MARKUP: &str = concat!(
    r#"<div class="error-fallback" style="display:flex;align-items:center;"#,
    r#"justify-content:center;width:100%;height:100vh">"#,
    r#"<img src="error.png" alt="Error" width="200"></div>"#,
);

/// After any panic the page is replaced by a static error image for the rest
/// of the session.
pub fn install() {
    panic::set_hook(Box::new(|info| {
        console_error_panic_hook::hook(info);
        show_fallback();
    }));
}

fn show_fallback() {
    let body = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body());
    match body {
        Some(body) => body.set_inner_html(FALLBACK_MARKUP),
        None => web_sys::console::error_1(&"[frontend] no document body for error fallback".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_a_single_centered_image() {
        assert!(FALLBACK_MARKUP.starts_with("<div class=\"error-fallback\""));
        assert!(FALLBACK_MARKUP.contains("height:100vh"));
        assert!(FALLBACK_MARKUP.contains(r#"<img src="error.png" alt="Error""#));
        assert_eq!(FALLBACK_MARKUP.matches("<img").count(), 1);
    }
}
