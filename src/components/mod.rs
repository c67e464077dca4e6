pub mod app;
pub mod game_view;
pub mod hud_panel;
pub mod login_screen;
pub mod main_menu;
pub mod modals;
pub mod server_select;
pub mod status_banner;
pub mod touch_controls;

use crate::input::InputRouter;

/// Overlay buttons stand in for momentary key presses; the engine acts on
/// the key-down, so the matching key-up can follow immediately.
pub(crate) fn key_tap(router: &InputRouter, code: &str) {
    router.dispatch_virtual(code, true);
    router.dispatch_virtual(code, false);
}
