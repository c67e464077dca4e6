mod components;
mod diagnostics;
mod engine;
mod input;
mod loop_driver;
mod model;
mod state_sync;
#[cfg(test)]
mod testutil;
mod util;

use components::app::App;

fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    yew::Renderer::<App>::new().render();
}
