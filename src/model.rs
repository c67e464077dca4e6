//! Data model for the engine-reported state: the logical screen identifier
//! and the wholesale-replaced state snapshot polled from the engine.

use serde::Deserialize;

/// Logical screen the engine is currently showing. Parsed from the string
/// identifiers the engine reports; anything unrecognised is carried through
/// as `Unknown` so the presentation layer can at least log it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenId {
    Login,
    ServerSelection,
    MainMenu,
    GameHud,
    Inventory,
    Shop,
    HelpModal,
    Unknown(String),
}

impl ScreenId {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "LoginScreen" => ScreenId::Login,
            "ServerSelection" => ScreenId::ServerSelection,
            "MainMenu" => ScreenId::MainMenu,
            "GameHUD" => ScreenId::GameHud,
            "Inventory" => ScreenId::Inventory,
            "Shop" => ScreenId::Shop,
            "HelpModal" => ScreenId::HelpModal,
            other => ScreenId::Unknown(other.to_string()),
        }
    }
}

/// One poll tick's worth of engine state, deserialized from the JSON the
/// engine hands back. Immutable once published; the next tick replaces it
/// wholesale. Keys the engine sends that we do not use (e.g. legacy ball
/// position) are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StateSnapshot {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub player_position: (f64, f64),
}

/// Screen and snapshot published together, so an observer never sees a
/// screen value paired with a stale snapshot from a different tick.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineView {
    pub screen: ScreenId,
    pub snapshot: StateSnapshot,
}

impl Default for EngineView {
    fn default() -> Self {
        // The engine boots into the HUD; the status banner covers the window
        // before the loop is actually running.
        Self {
            screen: ScreenId::GameHud,
            snapshot: StateSnapshot::default(),
        }
    }
}
