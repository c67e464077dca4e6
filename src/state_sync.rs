//! Fixed-interval poller that republishes the engine's screen/state snapshot
//! for the presentation layer, independently of render cadence. Screen and
//! snapshot always travel together so observers never see a mixed tick.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::Callback;

use crate::engine::SharedEngine;
use crate::model::{EngineView, ScreenId, StateSnapshot};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyncConfig {
    pub interval_ms: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { interval_ms: 100 }
    }
}

struct SyncInner {
    config: SyncConfig,
    engine: RefCell<Option<SharedEngine>>,
    last: RefCell<EngineView>,
    on_update: Callback<EngineView>,
    interval_id: Cell<Option<i32>>,
    tick_closure: RefCell<Option<Closure<dyn FnMut()>>>,
}

/// Cheap to clone; clones share one poller.
#[derive(Clone)]
pub struct StateSync {
    inner: Rc<SyncInner>,
}

impl PartialEq for StateSync {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl StateSync {
    pub fn new(config: SyncConfig, on_update: Callback<EngineView>) -> Self {
        Self {
            inner: Rc::new(SyncInner {
                config,
                engine: RefCell::new(None),
                last: RefCell::new(EngineView::default()),
                on_update,
                interval_id: Cell::new(None),
                tick_closure: RefCell::new(None),
            }),
        }
    }

    pub fn set_engine(&self, engine: Option<SharedEngine>) {
        *self.inner.engine.borrow_mut() = engine;
    }

    /// The most recently published view; survives failed ticks unchanged.
    pub fn last_view(&self) -> EngineView {
        self.inner.last.borrow().clone()
    }

    /// One poll: read screen and state, parse, publish atomically. Failures
    /// are recoverable noise, logged at low severity; the previous view
    /// stands until the next good tick.
    pub fn tick(&self) {
        let engine = self.inner.engine.borrow().clone();
        let Some(engine) = engine else {
            return;
        };
        let view = match read_view(&engine) {
            Ok(view) => view,
            Err(detail) => {
                log::warn!("state poll failed: {detail}");
                return;
            }
        };
        if let ScreenId::Unknown(raw) = &view.screen {
            log::warn!("engine reported unknown screen: {raw}");
        }
        *self.inner.last.borrow_mut() = view.clone();
        self.inner.on_update.emit(view);
    }

    /// Begins polling on the configured interval. Restarting replaces the
    /// previous interval instead of doubling up.
    pub fn start(&self) {
        self.stop();
        let Some(window) = crate::util::browser_window() else {
            return;
        };
        let sync = self.clone();
        let callback = Closure::wrap(Box::new(move || sync.tick()) as Box<dyn FnMut()>);
        if let Ok(id) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            self.inner.config.interval_ms as i32,
        ) {
            self.inner.interval_id.set(Some(id));
            *self.inner.tick_closure.borrow_mut() = Some(callback);
        }
    }

    /// Cancels the interval. Idempotent and safe before `start`.
    pub fn stop(&self) {
        if let Some(id) = self.inner.interval_id.take() {
            if let Some(window) = crate::util::browser_window() {
                window.clear_interval_with_handle(id);
            }
        }
        *self.inner.tick_closure.borrow_mut() = None;
    }
}

fn read_view(engine: &SharedEngine) -> Result<EngineView, String> {
    let screen = engine.current_screen().map_err(|e| e.to_string())?;
    let raw = engine.game_state().map_err(|e| e.to_string())?;
    let snapshot: StateSnapshot =
        serde_json::from_str(&raw).map_err(|e| format!("bad state json: {e}"))?;
    Ok(EngineView {
        screen: ScreenId::parse(&screen),
        snapshot,
    })
}
