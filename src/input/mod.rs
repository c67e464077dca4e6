//! Input normalization: one router owns every event subscription and turns
//! keyboard, mouse, touch and synthetic sources into the single command
//! protocol the engine understands.

pub mod command;
pub mod joystick;
pub mod pad;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

use crate::diagnostics::{ReportContext, SharedSink};
use crate::engine::SharedEngine;
pub use command::InputCommand;

/// Currently attached event subscriptions, keyed by event name. Adding under
/// an existing key removes the old listener first, so attachment can never
/// duplicate; `clear` leaves zero listeners.
#[derive(Default)]
pub struct ListenerSet {
    entries: HashMap<&'static str, (EventTarget, bool, Closure<dyn FnMut(Event)>)>,
}

impl ListenerSet {
    pub fn add(
        &mut self,
        name: &'static str,
        target: &EventTarget,
        capture: bool,
        closure: Closure<dyn FnMut(Event)>,
    ) {
        self.remove(name);
        if target
            .add_event_listener_with_callback_and_bool(
                name,
                closure.as_ref().unchecked_ref(),
                capture,
            )
            .is_ok()
        {
            self.entries.insert(name, (target.clone(), capture, closure));
        }
    }

    pub fn remove(&mut self, name: &str) {
        if let Some((target, capture, closure)) = self.entries.remove(name) {
            let _ = target.remove_event_listener_with_callback_and_bool(
                name,
                closure.as_ref().unchecked_ref(),
                capture,
            );
        }
    }

    pub fn clear(&mut self) {
        let names: Vec<&'static str> = self.entries.keys().copied().collect();
        for name in names {
            self.remove(name);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

struct RouterInner {
    // Shared with the listener closures, so rebinding the engine takes
    // effect without re-attaching anything.
    engine: Rc<RefCell<Option<SharedEngine>>>,
    sink: SharedSink,
    listeners: RefCell<ListenerSet>,
}

/// Single point of translation from raw input events to engine commands.
/// Cheap to clone; clones share the listener set and engine binding.
#[derive(Clone)]
pub struct InputRouter {
    inner: Rc<RouterInner>,
}

impl PartialEq for InputRouter {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Dispatches one command, swallowing engine exceptions: a malfunctioning
/// engine gets the event dropped and reported, never a crash of the input
/// layer. Returns whether the engine consumed the command.
fn forward(engine: &RefCell<Option<SharedEngine>>, sink: &SharedSink, command: &InputCommand) -> bool {
    let engine = engine.borrow();
    let Some(engine) = engine.as_ref() else {
        return false;
    };
    match engine.handle_input(command.kind(), &command.payload()) {
        Ok(consumed) => consumed,
        Err(err) => {
            sink.report(
                &format!("input dispatch failed: {err}"),
                &ReportContext {
                    extra: Some(format!("{} {}", command.kind(), command.payload())),
                    ..ReportContext::default()
                },
            );
            false
        }
    }
}

impl InputRouter {
    pub fn new(sink: SharedSink) -> Self {
        Self {
            inner: Rc::new(RouterInner {
                engine: Rc::new(RefCell::new(None)),
                sink,
                listeners: RefCell::new(ListenerSet::default()),
            }),
        }
    }

    /// Rebinds the forwarding target. `None` keeps observing events but
    /// drops them unconsumed, for the window before the engine is ready.
    pub fn set_engine(&self, engine: Option<SharedEngine>) {
        *self.inner.engine.borrow_mut() = engine;
    }

    /// Entry point for synthetic sources (joystick, button pad). Forwarded
    /// exactly like a physical key event.
    pub fn dispatch_virtual(&self, code: &str, pressed: bool) -> bool {
        forward(
            &self.inner.engine,
            &self.inner.sink,
            &InputCommand::key(code, pressed),
        )
    }

    /// Synthetic pointer click at surface-relative coordinates, used by
    /// overlay UI that stands in for a click on the canvas.
    pub fn dispatch_click(&self, x: f64, y: f64) -> bool {
        forward(
            &self.inner.engine,
            &self.inner.sink,
            &InputCommand::PointerClick { x, y },
        )
    }

    /// Subscribes to keyboard events on the document (keyboard focus may
    /// leave the surface) and to pointer/touch events on the surface itself.
    /// Idempotent: any prior subscriptions are detached first.
    pub fn attach(&self, surface: &HtmlElement) {
        self.detach();
        let Some(document) = crate::util::browser_window().and_then(|w| w.document()) else {
            return;
        };
        let document: EventTarget = document.into();
        let surface_target: EventTarget = surface.clone().into();
        let mut listeners = self.inner.listeners.borrow_mut();

        {
            let engine = self.inner.engine.clone();
            let sink = self.inner.sink.clone();
            // Capture phase, so an overlay handler that stops propagation
            // cannot starve the game of keys.
            listeners.add(
                "keydown",
                &document,
                true,
                Closure::wrap(Box::new(move |event: Event| {
                    if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                        let consumed =
                            forward(&engine, &sink, &InputCommand::key(key.code(), true));
                        // Stop the page from scrolling on keys the game uses.
                        if consumed {
                            key.prevent_default();
                        }
                    }
                }) as Box<dyn FnMut(Event)>),
            );
        }
        {
            let engine = self.inner.engine.clone();
            let sink = self.inner.sink.clone();
            listeners.add(
                "keyup",
                &document,
                true,
                Closure::wrap(Box::new(move |event: Event| {
                    if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                        forward(&engine, &sink, &InputCommand::key(key.code(), false));
                    }
                }) as Box<dyn FnMut(Event)>),
            );
        }
        {
            let engine = self.inner.engine.clone();
            let sink = self.inner.sink.clone();
            let surface = surface.clone();
            listeners.add(
                "click",
                &surface_target,
                false,
                Closure::wrap(Box::new(move |event: Event| {
                    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                        // Relative to the surface box at event time, so page
                        // scroll or resize does not skew hit-testing.
                        let rect = surface.get_bounding_client_rect();
                        let x = mouse.client_x() as f64 - rect.left();
                        let y = mouse.client_y() as f64 - rect.top();
                        forward(&engine, &sink, &InputCommand::PointerClick { x, y });
                    }
                }) as Box<dyn FnMut(Event)>),
            );
        }
        {
            let engine = self.inner.engine.clone();
            let sink = self.inner.sink.clone();
            let surface = surface.clone();
            listeners.add(
                "touchstart",
                &surface_target,
                false,
                Closure::wrap(Box::new(move |event: Event| {
                    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                        touch.prevent_default();
                        if let Some(contact) = touch.touches().item(0) {
                            let rect = surface.get_bounding_client_rect();
                            let x = contact.client_x() as f64 - rect.left();
                            let y = contact.client_y() as f64 - rect.top();
                            // The engine wants both the begin and a position
                            // command, or it can miss the first contact.
                            forward(&engine, &sink, &InputCommand::PointerDown { x, y });
                            forward(&engine, &sink, &InputCommand::PointerMove { x, y });
                        }
                    }
                }) as Box<dyn FnMut(Event)>),
            );
        }
        {
            let engine = self.inner.engine.clone();
            let sink = self.inner.sink.clone();
            let surface = surface.clone();
            listeners.add(
                "touchmove",
                &surface_target,
                false,
                Closure::wrap(Box::new(move |event: Event| {
                    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                        touch.prevent_default();
                        if let Some(contact) = touch.touches().item(0) {
                            let rect = surface.get_bounding_client_rect();
                            let x = contact.client_x() as f64 - rect.left();
                            let y = contact.client_y() as f64 - rect.top();
                            forward(&engine, &sink, &InputCommand::PointerMove { x, y });
                        }
                    }
                }) as Box<dyn FnMut(Event)>),
            );
        }
        for name in ["touchend", "touchcancel"] {
            let engine = self.inner.engine.clone();
            let sink = self.inner.sink.clone();
            listeners.add(
                name,
                &surface_target,
                false,
                Closure::wrap(Box::new(move |event: Event| {
                    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                        touch.prevent_default();
                        forward(&engine, &sink, &InputCommand::PointerUp);
                    }
                }) as Box<dyn FnMut(Event)>),
            );
        }
        log::debug!("input router attached {} listeners", listeners.len());
    }

    /// Removes every subscription added by `attach`. Safe to call twice or
    /// before any attach ever happened.
    pub fn detach(&self) {
        let mut listeners = self.inner.listeners.borrow_mut();
        if listeners.len() > 0 {
            listeners.clear();
            log::debug!("input router detached");
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::testutil::{RecordingSink, ScriptedEngine};

    fn router_with_engine() -> (InputRouter, Rc<ScriptedEngine>, Rc<RecordingSink>) {
        let sink = Rc::new(RecordingSink::default());
        let router = InputRouter::new(sink.clone() as SharedSink);
        let engine = Rc::new(ScriptedEngine::default());
        router.set_engine(Some(engine.clone() as SharedEngine));
        (router, engine, sink)
    }

    #[test]
    fn virtual_keys_forward_like_physical_ones() {
        let (router, engine, _) = router_with_engine();
        engine.consume_input.set(true);
        assert!(router.dispatch_virtual("ArrowRight", true));
        assert!(router.dispatch_virtual("ArrowRight", false));
        assert_eq!(
            engine.inputs.borrow().as_slice(),
            &[
                ("keydown".to_string(), "ArrowRight".to_string()),
                ("keyup".to_string(), "ArrowRight".to_string()),
            ]
        );
    }

    #[test]
    fn consumed_flag_comes_from_the_engine() {
        let (router, engine, _) = router_with_engine();
        engine.consume_input.set(false);
        assert!(!router.dispatch_virtual("KeyI", true));
        engine.consume_input.set(true);
        assert!(router.dispatch_virtual("KeyI", true));
    }

    #[test]
    fn synthetic_clicks_carry_surface_coordinates() {
        let (router, engine, _) = router_with_engine();
        router.dispatch_click(33.0, 250.0);
        let inputs = engine.inputs.borrow();
        assert_eq!(inputs[0].0, "mouseclick");
        let coords: (f64, f64) = serde_json::from_str(&inputs[0].1).unwrap();
        assert_eq!(coords, (33.0, 250.0));
    }

    #[test]
    fn no_engine_means_observed_but_not_forwarded() {
        let sink = Rc::new(RecordingSink::default());
        let router = InputRouter::new(sink.clone() as SharedSink);
        assert!(!router.dispatch_virtual("Enter", true));
        assert!(sink.reports.borrow().is_empty());
    }

    #[test]
    fn rebinding_to_none_disables_forwarding() {
        let (router, engine, _) = router_with_engine();
        router.dispatch_virtual("Enter", true);
        router.set_engine(None);
        router.dispatch_virtual("Enter", true);
        assert_eq!(engine.inputs.borrow().len(), 1);
    }

    #[test]
    fn engine_exception_is_reported_and_later_events_still_flow() {
        let (router, engine, sink) = router_with_engine();
        engine.fail_input.set(true);
        assert!(!router.dispatch_virtual("ArrowUp", true));

        let reports = sink.reports.borrow();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].0.contains("input dispatch failed"));
        assert_eq!(
            reports[0].1.extra.as_deref(),
            Some("keydown ArrowUp")
        );
        drop(reports);

        engine.fail_input.set(false);
        router.dispatch_virtual("ArrowUp", false);
        assert_eq!(engine.inputs.borrow().len(), 2);
    }
}
