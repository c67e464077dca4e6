//! Test doubles shared across the unit tests: a scriptable engine and a
//! recording diagnostics sink. Compiled only for tests.

use std::cell::{Cell, RefCell};

use crate::diagnostics::{DiagnosticsSink, ReportContext};
use crate::engine::{Engine, EngineError};

/// Engine double with per-call failure switches and full call recording.
pub struct ScriptedEngine {
    pub calls: RefCell<Vec<&'static str>>,
    /// Every `handle_input` as (kind, payload), recorded even when the call
    /// is scripted to fail.
    pub inputs: RefCell<Vec<(String, String)>>,
    pub consume_input: Cell<bool>,
    pub fail_input: Cell<bool>,
    pub fail_update: Cell<bool>,
    pub fail_render: Cell<bool>,
    pub fail_resize: Cell<bool>,
    pub fail_state: Cell<bool>,
    pub screen: RefCell<String>,
    pub state_json: RefCell<String>,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            inputs: RefCell::new(Vec::new()),
            consume_input: Cell::new(true),
            fail_input: Cell::new(false),
            fail_update: Cell::new(false),
            fail_render: Cell::new(false),
            fail_resize: Cell::new(false),
            fail_state: Cell::new(false),
            screen: RefCell::new("GameHUD".to_string()),
            state_json: RefCell::new("{}".to_string()),
        }
    }
}

impl ScriptedEngine {
    fn outcome(&self, call: &'static str, fail: bool) -> Result<(), EngineError> {
        self.calls.borrow_mut().push(call);
        if fail {
            Err(EngineError::Call {
                call,
                detail: "scripted failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl Engine for ScriptedEngine {
    fn update(&self) -> Result<(), EngineError> {
        self.outcome("update", self.fail_update.get())
    }

    fn render(&self) -> Result<(), EngineError> {
        self.outcome("render", self.fail_render.get())
    }

    fn handle_input(&self, kind: &str, payload: &str) -> Result<bool, EngineError> {
        self.calls.borrow_mut().push("handle_input");
        self.inputs
            .borrow_mut()
            .push((kind.to_string(), payload.to_string()));
        if self.fail_input.get() {
            Err(EngineError::Call {
                call: "handle_input",
                detail: "scripted failure".to_string(),
            })
        } else {
            Ok(self.consume_input.get())
        }
    }

    fn current_screen(&self) -> Result<String, EngineError> {
        self.calls.borrow_mut().push("get_current_screen");
        if self.fail_state.get() {
            Err(EngineError::Call {
                call: "get_current_screen",
                detail: "scripted failure".to_string(),
            })
        } else {
            Ok(self.screen.borrow().clone())
        }
    }

    fn game_state(&self) -> Result<String, EngineError> {
        self.calls.borrow_mut().push("get_game_state");
        if self.fail_state.get() {
            Err(EngineError::Call {
                call: "get_game_state",
                detail: "scripted failure".to_string(),
            })
        } else {
            Ok(self.state_json.borrow().clone())
        }
    }

    fn resize(&self, _width: u32, _height: u32) -> Result<(), EngineError> {
        self.outcome("resize", self.fail_resize.get())
    }

    fn reset(&self) -> Result<(), EngineError> {
        self.outcome("reset", false)
    }
}

/// Sink that records every report for assertion.
#[derive(Default)]
pub struct RecordingSink {
    pub reports: RefCell<Vec<(String, ReportContext)>>,
}

impl DiagnosticsSink for RecordingSink {
    fn report(&self, message: &str, context: &ReportContext) {
        self.reports
            .borrow_mut()
            .push((message.to_string(), context.clone()));
    }
}
