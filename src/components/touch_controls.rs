use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, HtmlElement, MouseEvent as DomMouseEvent};
use yew::prelude::*;

use crate::input::InputRouter;
use crate::input::joystick::{JoystickCore, JoystickLayout, KeyTransition};
use crate::input::pad::{ButtonPad, PadConfig};
use crate::util;

#[derive(Properties, PartialEq, Clone)]
pub struct TouchControlsProps {
    pub router: InputRouter,
}

const PAD_BUTTONS: [(&str, &str); 5] = [
    ("INV", "KeyI"),
    ("SHOP", "KeyT"),
    ("HELP", "KeyH"),
    ("OK", "Enter"),
    ("BACK", "Escape"),
];

fn apply(router: &InputRouter, transitions: &[KeyTransition]) {
    for transition in transitions {
        match transition {
            KeyTransition::Release(dir) => {
                router.dispatch_virtual(dir.key_code(), false);
            }
            KeyTransition::Press(dir) => {
                router.dispatch_virtual(dir.key_code(), true);
            }
        }
    }
}

/// Pointer position relative to the control center.
fn center_offset(base: &HtmlElement, client_x: f64, client_y: f64) -> (f64, f64) {
    let rect = base.get_bounding_client_rect();
    (
        client_x - (rect.left() + rect.width() / 2.0),
        client_y - (rect.top() + rect.height() / 2.0),
    )
}

/// On-screen joystick and button pad for touch devices. The joystick feeds
/// its transitions through the router's virtual entry point; the pad pulses
/// momentary keys.
#[function_component(TouchControls)]
pub fn touch_controls(props: &TouchControlsProps) -> Html {
    let layout = JoystickLayout::default();
    let core = use_mut_ref(move || JoystickCore::new(layout));
    let knob = use_state(|| (0.0f64, 0.0f64));
    let base_ref = use_node_ref();
    let pad = {
        let router = props.router.clone();
        use_mut_ref(move || ButtonPad::new(router, PadConfig::default()))
    };
    let pressed_button = use_state(|| None::<&'static str>);

    // Mouse drags can leave the control, so move/up live on the document for
    // the component's lifetime; the dragging flag keeps them cheap while
    // idle. Unmount releases any held key and pending pad timers.
    {
        let core = core.clone();
        let knob = knob.clone();
        let router = props.router.clone();
        let base_ref = base_ref.clone();
        let pad = pad.clone();
        use_effect_with((), move |_| {
            let document = web_sys::window()
                .expect("no global `window` exists")
                .document()
                .expect("should have a document on window");

            let mousemove_cb = {
                let core = core.clone();
                let knob = knob.clone();
                let router = router.clone();
                let base_ref = base_ref.clone();
                Closure::wrap(Box::new(move |event: Event| {
                    if !core.borrow().dragging() {
                        return;
                    }
                    let Some(mouse) = event.dyn_ref::<DomMouseEvent>() else {
                        return;
                    };
                    let Some(base) = base_ref.cast::<HtmlElement>() else {
                        return;
                    };
                    let (dx, dy) =
                        center_offset(&base, mouse.client_x() as f64, mouse.client_y() as f64);
                    let transitions = core.borrow_mut().drag_to(dx, dy);
                    apply(&router, &transitions);
                    knob.set(core.borrow().knob_offset());
                }) as Box<dyn FnMut(Event)>)
            };
            let mouseup_cb = {
                let core = core.clone();
                let knob = knob.clone();
                let router = router.clone();
                Closure::wrap(Box::new(move |_event: Event| {
                    if !core.borrow().dragging() {
                        return;
                    }
                    let transitions = core.borrow_mut().release();
                    apply(&router, &transitions);
                    knob.set((0.0, 0.0));
                }) as Box<dyn FnMut(Event)>)
            };
            let _ = document.add_event_listener_with_callback(
                "mousemove",
                mousemove_cb.as_ref().unchecked_ref(),
            );
            let _ = document.add_event_listener_with_callback(
                "mouseup",
                mouseup_cb.as_ref().unchecked_ref(),
            );

            move || {
                let _ = document.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = document.remove_event_listener_with_callback(
                    "mouseup",
                    mouseup_cb.as_ref().unchecked_ref(),
                );
                let transitions = core.borrow_mut().release();
                apply(&router, &transitions);
                pad.borrow().release_all();
            }
        });
    }

    // Brief highlight after the engine consumed a pad press.
    {
        let pressed_button = pressed_button.clone();
        use_effect_with(*pressed_button, move |code| {
            let mut timer = None;
            if code.is_some() {
                if let Some(window) = util::browser_window() {
                    let callback = Closure::wrap(Box::new(move || pressed_button.set(None))
                        as Box<dyn FnMut()>);
                    if let Ok(id) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                        callback.as_ref().unchecked_ref(),
                        150,
                    ) {
                        timer = Some((id, callback));
                    }
                }
            }
            move || {
                if let Some((id, _callback)) = timer {
                    if let Some(window) = util::browser_window() {
                        window.clear_timeout_with_handle(id);
                    }
                }
            }
        });
    }

    let on_mouse_down = {
        let core = core.clone();
        let knob = knob.clone();
        let router = props.router.clone();
        let base_ref = base_ref.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let Some(base) = base_ref.cast::<HtmlElement>() else {
                return;
            };
            let (dx, dy) = center_offset(&base, e.client_x() as f64, e.client_y() as f64);
            let transitions = core.borrow_mut().begin_drag(dx, dy);
            apply(&router, &transitions);
            knob.set(core.borrow().knob_offset());
        })
    };
    let on_touch_start = {
        let core = core.clone();
        let knob = knob.clone();
        let router = props.router.clone();
        let base_ref = base_ref.clone();
        Callback::from(move |e: TouchEvent| {
            e.prevent_default();
            let (Some(base), Some(touch)) = (base_ref.cast::<HtmlElement>(), e.touches().item(0))
            else {
                return;
            };
            let (dx, dy) = center_offset(&base, touch.client_x() as f64, touch.client_y() as f64);
            let transitions = core.borrow_mut().begin_drag(dx, dy);
            apply(&router, &transitions);
            knob.set(core.borrow().knob_offset());
        })
    };
    let on_touch_move = {
        let core = core.clone();
        let knob = knob.clone();
        let router = props.router.clone();
        let base_ref = base_ref.clone();
        Callback::from(move |e: TouchEvent| {
            e.prevent_default();
            let (Some(base), Some(touch)) = (base_ref.cast::<HtmlElement>(), e.touches().item(0))
            else {
                return;
            };
            let (dx, dy) = center_offset(&base, touch.client_x() as f64, touch.client_y() as f64);
            let transitions = core.borrow_mut().drag_to(dx, dy);
            apply(&router, &transitions);
            knob.set(core.borrow().knob_offset());
        })
    };
    let on_touch_end = {
        let core = core.clone();
        let knob = knob.clone();
        let router = props.router.clone();
        Callback::from(move |e: TouchEvent| {
            e.prevent_default();
            let transitions = core.borrow_mut().release();
            apply(&router, &transitions);
            knob.set((0.0, 0.0));
        })
    };

    let (kx, ky) = *knob;
    let base_size = layout.control_diameter;
    let knob_size = layout.knob_diameter;
    let pad_buttons = PAD_BUTTONS
        .iter()
        .map(|&(label, code)| {
            let onclick = {
                let pad = pad.clone();
                let pressed_button = pressed_button.clone();
                Callback::from(move |_: MouseEvent| {
                    if pad.borrow().press(code) {
                        pressed_button.set(Some(code));
                    }
                })
            };
            let background = if *pressed_button == Some(code) {
                "#1f6feb"
            } else {
                "rgba(22,27,34,0.9)"
            };
            html! {
                <button
                    key={code}
                    onclick={onclick}
                    style={format!("min-width:52px; padding:10px 8px; border:1px solid #30363d; border-radius:8px; background:{background}; color:#e6edf3; font-size:12px;")}
                >{ label }</button>
            }
        })
        .collect::<Html>();

    html! {
        <>
            <div
                ref={base_ref}
                onmousedown={on_mouse_down}
                ontouchstart={on_touch_start}
                ontouchmove={on_touch_move}
                ontouchend={on_touch_end.clone()}
                ontouchcancel={on_touch_end}
                style={format!("position:absolute; left:24px; bottom:24px; width:{base_size}px; height:{base_size}px; border-radius:50%; background:rgba(22,27,34,0.6); border:1px solid #30363d; touch-action:none;")}
            >
                <div style={format!("position:absolute; left:50%; top:50%; width:{knob_size}px; height:{knob_size}px; border-radius:50%; background:rgba(88,166,255,0.8); transform:translate(calc(-50% + {kx}px), calc(-50% + {ky}px));")}></div>
            </div>
            <div style="position:absolute; right:24px; bottom:24px; display:flex; gap:8px;">
                { pad_buttons }
            </div>
        </>
    }
}
