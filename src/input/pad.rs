//! Virtual button pad: a tap becomes a pulsed key, pressed immediately and
//! auto-released after a short delay. One pending release per code; a
//! re-press cancels and reschedules rather than queueing a second release.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use super::InputRouter;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PadConfig {
    /// Delay before the synthetic key-up fires. Tuned against the engine's
    /// per-frame input sampling; a knob, not a contract.
    pub release_delay_ms: u32,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            release_delay_ms: 100,
        }
    }
}

/// Pending-release bookkeeping, kept separate from the timer plumbing so the
/// one-release-per-code rule is testable without a browser.
#[derive(Debug, Default)]
pub struct PendingReleases<T> {
    entries: HashMap<String, T>,
}

impl<T> PendingReleases<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers a pending release for `code`, returning the token it
    /// replaced so the caller can cancel the superseded timer.
    pub fn arm(&mut self, code: &str, token: T) -> Option<T> {
        self.entries.insert(code.to_string(), token)
    }

    pub fn disarm(&mut self, code: &str) -> Option<T> {
        self.entries.remove(code)
    }

    pub fn drain(&mut self) -> Vec<(String, T)> {
        self.entries.drain().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct ReleaseTimer {
    id: i32,
    // Held so the JS callback stays valid until it fires or is cancelled.
    _closure: Closure<dyn FnMut()>,
}

struct PadInner {
    config: PadConfig,
    router: InputRouter,
    pending: RefCell<PendingReleases<ReleaseTimer>>,
}

/// DOM-facing pad. Cheap to clone; all clones share one pending-release map.
#[derive(Clone)]
pub struct ButtonPad {
    inner: Rc<PadInner>,
}

impl PartialEq for ButtonPad {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl ButtonPad {
    pub fn new(router: InputRouter, config: PadConfig) -> Self {
        Self {
            inner: Rc::new(PadInner {
                config,
                router,
                pending: RefCell::new(PendingReleases::new()),
            }),
        }
    }

    /// Emits the key-down now, schedules the key-up, and returns whether the
    /// engine consumed the press (for visual feedback on the button).
    pub fn press(&self, code: &str) -> bool {
        let consumed = self.inner.router.dispatch_virtual(code, true);

        if let Some(prev) = self.inner.pending.borrow_mut().disarm(code) {
            clear_timeout(prev.id);
        }

        let Some(window) = crate::util::browser_window() else {
            return consumed;
        };
        let callback = {
            let pad = self.clone();
            let code = code.to_string();
            Closure::wrap(Box::new(move || {
                // Drop the timer entry after the borrow ends, not during it:
                // dispatch may re-enter press() from an engine callback.
                let fired = pad.inner.pending.borrow_mut().disarm(&code);
                if fired.is_some() {
                    pad.inner.router.dispatch_virtual(&code, false);
                }
            }) as Box<dyn FnMut()>)
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            self.inner.config.release_delay_ms as i32,
        ) {
            Ok(id) => {
                self.inner.pending.borrow_mut().arm(
                    code,
                    ReleaseTimer {
                        id,
                        _closure: callback,
                    },
                );
            }
            Err(_) => {
                // No timer means no delayed release; send it immediately so
                // the key cannot stick.
                self.inner.router.dispatch_virtual(code, false);
            }
        }
        consumed
    }

    /// Teardown: cancel every pending timer and release its key right away,
    /// so no synthetic key outlives the pad.
    pub fn release_all(&self) {
        let drained = self.inner.pending.borrow_mut().drain();
        for (code, timer) in drained {
            clear_timeout(timer.id);
            self.inner.router.dispatch_virtual(&code, false);
        }
    }
}

fn clear_timeout(id: i32) {
    if let Some(window) = crate::util::browser_window() {
        window.clear_timeout_with_handle(id);
    }
}
