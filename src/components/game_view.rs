use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlCanvasElement, HtmlElement};
use yew::prelude::*;

use crate::engine::js_engine_factory;
use crate::input::InputRouter;
use crate::loop_driver::LoopDriver;
use crate::state_sync::StateSync;
use crate::util;

const CANVAS_ID: &str = "game-canvas";

#[derive(Properties, PartialEq, Clone)]
pub struct GameViewProps {
    pub router: InputRouter,
    pub driver: LoopDriver,
    pub sync: StateSync,
}

/// The interactive surface. Mounting sizes the canvas to the window, wires
/// the router onto it, kicks off engine acquisition and state polling, and
/// tracks window resizes; unmounting tears all of that down again.
#[function_component(GameView)]
pub fn game_view(props: &GameViewProps) -> Html {
    let canvas_ref = use_node_ref();

    {
        let canvas_ref = canvas_ref.clone();
        let router = props.router.clone();
        let driver = props.driver.clone();
        let sync = props.sync.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("no global `window` exists");
            let canvas: HtmlCanvasElement = canvas_ref
                .cast::<HtmlCanvasElement>()
                .expect("canvas_ref not attached to a canvas element");

            let (width, height) = util::window_size();
            canvas.set_width(width);
            canvas.set_height(height);
            driver.resize(width, height);

            let surface: HtmlElement = canvas.clone().into();
            router.attach(&surface);
            driver.start(js_engine_factory(CANVAS_ID));
            sync.start();

            let resize_cb = {
                let canvas = canvas.clone();
                let driver = driver.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    let (w, h) = util::window_size();
                    canvas.set_width(w);
                    canvas.set_height(h);
                    driver.resize(w, h);
                }) as Box<dyn FnMut(_)>)
            };
            let _ = window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());

            move || {
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                // Listeners go first, then the timers, then the binding, so
                // nothing can dispatch into a stale engine handle.
                router.detach();
                sync.stop();
                driver.stop();
                router.set_engine(None);
                sync.set_engine(None);
            }
        });
    }

    html! {
        <canvas
            ref={canvas_ref}
            id={CANVAS_ID}
            style="display:block; width:100%; height:100%;"
        ></canvas>
    }
}
