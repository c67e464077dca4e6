//! The command protocol spoken to the engine. Every raw input event, from
//! whichever source, is normalized into one of these values before dispatch.

/// A single normalized input command. Created per event, dispatched once,
/// then discarded. Coordinates are relative to the interactive surface.
#[derive(Clone, Debug, PartialEq)]
pub enum InputCommand {
    KeyDown { code: String },
    KeyUp { code: String },
    PointerClick { x: f64, y: f64 },
    /// First contact of a touch gesture.
    PointerDown { x: f64, y: f64 },
    /// Continued contact (touch drag).
    PointerMove { x: f64, y: f64 },
    PointerUp,
}

impl InputCommand {
    pub fn key(code: impl Into<String>, pressed: bool) -> Self {
        if pressed {
            InputCommand::KeyDown { code: code.into() }
        } else {
            InputCommand::KeyUp { code: code.into() }
        }
    }

    /// Event-kind discriminator in the engine's wire vocabulary.
    pub fn kind(&self) -> &'static str {
        match self {
            InputCommand::KeyDown { .. } => "keydown",
            InputCommand::KeyUp { .. } => "keyup",
            InputCommand::PointerClick { .. } => "mouseclick",
            InputCommand::PointerDown { .. } => "touchstart",
            InputCommand::PointerMove { .. } => "touch",
            InputCommand::PointerUp => "touchend",
        }
    }

    /// Wire payload: the raw key code for key commands, a JSON `[x, y]`
    /// pair for pointer commands, empty for touch end.
    pub fn payload(&self) -> String {
        match self {
            InputCommand::KeyDown { code } | InputCommand::KeyUp { code } => code.clone(),
            InputCommand::PointerClick { x, y }
            | InputCommand::PointerDown { x, y }
            | InputCommand::PointerMove { x, y } => {
                serde_json::to_string(&(x, y)).unwrap_or_default()
            }
            InputCommand::PointerUp => String::new(),
        }
    }
}
