//! The engine boundary. The simulation itself is an opaque JS-owned object
//! (`GameEngine` on the global scope, built against a canvas id); this module
//! wraps it in a narrow trait so the rest of the client never touches
//! `JsValue` and so tests can script an engine double.

use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("engine call `{call}` failed: {detail}")]
    Call { call: &'static str, detail: String },
    #[error("engine module unavailable after {attempts} attempts")]
    Unavailable { attempts: u32 },
    #[error("engine construction failed: {0}")]
    Construct(String),
}

/// Everything this layer is allowed to ask of the engine. Calls are
/// synchronous and short; a JS exception surfaces as `Err`, never unwinds.
pub trait Engine {
    fn update(&self) -> Result<(), EngineError>;
    fn render(&self) -> Result<(), EngineError>;
    /// Returns whether the engine consumed the input.
    fn handle_input(&self, kind: &str, payload: &str) -> Result<bool, EngineError>;
    fn current_screen(&self) -> Result<String, EngineError>;
    fn game_state(&self) -> Result<String, EngineError>;
    fn resize(&self, width: u32, height: u32) -> Result<(), EngineError>;
    fn reset(&self) -> Result<(), EngineError>;
}

/// The canonical binding is owned by the loop driver and lent by reference
/// to the input router and state sync; all on one thread, so `Rc` suffices.
pub type SharedEngine = Rc<dyn Engine>;

/// Produces an engine binding. `Ok(None)` means "not available yet, poll
/// again"; `Err` means acquisition is hopeless for this cycle.
pub type EngineFactory = Rc<dyn Fn() -> Result<Option<SharedEngine>, EngineError>>;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = GameEngine)]
    type JsEngineObject;

    #[wasm_bindgen(constructor, catch, js_class = "GameEngine")]
    fn new(canvas_id: &str) -> Result<JsEngineObject, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn update(this: &JsEngineObject) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn render(this: &JsEngineObject) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn handle_input(this: &JsEngineObject, event_type: &str, data: &str) -> Result<bool, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn get_current_screen(this: &JsEngineObject) -> Result<String, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn get_game_state(this: &JsEngineObject) -> Result<String, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn resize(this: &JsEngineObject, width: u32, height: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn reset(this: &JsEngineObject) -> Result<(), JsValue>;
}

fn js_detail(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// `Engine` over the live JS object.
pub struct JsGameEngine {
    handle: JsEngineObject,
}

impl JsGameEngine {
    fn wrap(result: Result<(), JsValue>, call: &'static str) -> Result<(), EngineError> {
        result.map_err(|e| EngineError::Call {
            call,
            detail: js_detail(&e),
        })
    }
}

impl Engine for JsGameEngine {
    fn update(&self) -> Result<(), EngineError> {
        Self::wrap(self.handle.update(), "update")
    }

    fn render(&self) -> Result<(), EngineError> {
        Self::wrap(self.handle.render(), "render")
    }

    fn handle_input(&self, kind: &str, payload: &str) -> Result<bool, EngineError> {
        self.handle
            .handle_input(kind, payload)
            .map_err(|e| EngineError::Call {
                call: "handle_input",
                detail: js_detail(&e),
            })
    }

    fn current_screen(&self) -> Result<String, EngineError> {
        self.handle
            .get_current_screen()
            .map_err(|e| EngineError::Call {
                call: "get_current_screen",
                detail: js_detail(&e),
            })
    }

    fn game_state(&self) -> Result<String, EngineError> {
        self.handle.get_game_state().map_err(|e| EngineError::Call {
            call: "get_game_state",
            detail: js_detail(&e),
        })
    }

    fn resize(&self, width: u32, height: u32) -> Result<(), EngineError> {
        Self::wrap(self.handle.resize(width, height), "resize")
    }

    fn reset(&self) -> Result<(), EngineError> {
        Self::wrap(self.handle.reset(), "reset")
    }
}

/// Factory that waits for the `GameEngine` constructor to appear on the
/// global scope (the engine module loads asynchronously alongside the app)
/// and then builds it against the given canvas id.
pub fn js_engine_factory(canvas_id: &str) -> EngineFactory {
    let canvas_id = canvas_id.to_string();
    Rc::new(move || {
        let global = js_sys::global();
        let ctor = js_sys::Reflect::get(&global, &JsValue::from_str("GameEngine"))
            .unwrap_or(JsValue::UNDEFINED);
        if ctor.is_undefined() || ctor.is_null() {
            return Ok(None);
        }
        let handle = JsEngineObject::new(&canvas_id)
            .map_err(|e| EngineError::Construct(js_detail(&e)))?;
        Ok(Some(Rc::new(JsGameEngine { handle }) as SharedEngine))
    })
}
