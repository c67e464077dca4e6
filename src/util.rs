//! Small browser helpers shared across components.

/// The window handle, or `None` off-wasm. `web_sys::window()` aborts when
/// invoked outside a browser, so everything that might run under native
/// tests goes through this guard.
pub fn browser_window() -> Option<web_sys::Window> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// Whether to show the virtual touch controls.
pub fn is_touch_device() -> bool {
    browser_window()
        .map(|w| w.navigator().max_touch_points() > 0)
        .unwrap_or(false)
}

/// Window inner size in CSS pixels, with a sane fallback.
pub fn window_size() -> (u32, u32) {
    let Some(window) = browser_window() else {
        return (800, 600);
    };
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0);
    (width.max(0.0) as u32, height.max(0.0) as u32)
}
