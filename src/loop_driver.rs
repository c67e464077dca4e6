//! Cooperative frame-loop driver: owns the canonical engine binding, runs
//! update/render once per display refresh while running, and fail-stops on
//! the first frame exception instead of flooding diagnostics with retries.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::Callback;

use crate::diagnostics::{ReportContext, SharedSink};
use crate::engine::{EngineError, EngineFactory, SharedEngine};

#[derive(Clone, Debug, PartialEq)]
pub enum LoopStatus {
    Idle,
    /// Transient while the engine module is being acquired.
    Starting,
    Running,
    Stopped,
    /// Terminal until an explicit restart begins a fresh cycle.
    Failed(String),
}

impl fmt::Display for LoopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopStatus::Idle => write!(f, "idle"),
            LoopStatus::Starting => write!(f, "starting engine"),
            LoopStatus::Running => write!(f, "running"),
            LoopStatus::Stopped => write!(f, "paused"),
            LoopStatus::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopConfig {
    /// Hard ceiling on engine-acquisition polls before giving up.
    pub acquire_retry_limit: u32,
    pub acquire_retry_interval_ms: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            acquire_retry_limit: 50,
            acquire_retry_interval_ms: 100,
        }
    }
}

/// Outcome of one acquisition poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcquireStep {
    /// Engine bound, loop entered Running.
    Bound,
    /// Not available yet; poll again after the retry interval.
    Retry,
    /// Acquisition is over, successfully or not; stop polling.
    Settled,
}

struct DriverInner {
    config: LoopConfig,
    sink: SharedSink,
    status: RefCell<LoopStatus>,
    engine: RefCell<Option<SharedEngine>>,
    factory: RefCell<Option<EngineFactory>>,
    attempts: Cell<u32>,
    surface_size: Cell<(u32, u32)>,
    raf_id: Cell<Option<i32>>,
    frame_closure: RefCell<Option<Closure<dyn FnMut()>>>,
    retry_id: Cell<Option<i32>>,
    retry_closure: RefCell<Option<Closure<dyn FnMut()>>>,
    on_status: Callback<LoopStatus>,
    on_engine_bound: Callback<Option<SharedEngine>>,
}

/// Cheap to clone; clones share one loop. Only this driver ever replaces or
/// discards the engine binding; router and state sync borrow it through
/// `on_engine_bound`.
#[derive(Clone)]
pub struct LoopDriver {
    inner: Rc<DriverInner>,
}

impl PartialEq for LoopDriver {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl LoopDriver {
    pub fn new(
        config: LoopConfig,
        sink: SharedSink,
        on_status: Callback<LoopStatus>,
        on_engine_bound: Callback<Option<SharedEngine>>,
    ) -> Self {
        Self {
            inner: Rc::new(DriverInner {
                config,
                sink,
                status: RefCell::new(LoopStatus::Idle),
                engine: RefCell::new(None),
                factory: RefCell::new(None),
                attempts: Cell::new(0),
                surface_size: Cell::new((0, 0)),
                raf_id: Cell::new(None),
                frame_closure: RefCell::new(None),
                retry_id: Cell::new(None),
                retry_closure: RefCell::new(None),
                on_status,
                on_engine_bound,
            }),
        }
    }

    pub fn status(&self) -> LoopStatus {
        self.inner.status.borrow().clone()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.inner.surface_size.get()
    }

    fn set_status(&self, status: LoopStatus) {
        *self.inner.status.borrow_mut() = status.clone();
        self.inner.on_status.emit(status);
    }

    fn fail(&self, reason: String) {
        log::warn!("loop driver failed: {reason}");
        self.set_status(LoopStatus::Failed(reason));
    }

    /// Begins the acquisition sequence: discards any previous binding, then
    /// polls the factory with a bounded retry budget. Ends in Running or
    /// Failed; never blocks.
    pub fn start(&self, factory: EngineFactory) {
        self.cancel_frame();
        self.cancel_retry();
        *self.inner.engine.borrow_mut() = None;
        self.inner.on_engine_bound.emit(None);
        *self.inner.factory.borrow_mut() = Some(factory);
        self.inner.attempts.set(0);
        self.set_status(LoopStatus::Starting);
        self.pump_acquire();
    }

    /// Re-runs the full start sequence unconditionally, whatever state the
    /// driver is in, provided a factory was ever supplied.
    pub fn restart(&self) {
        let factory = self.inner.factory.borrow().clone();
        if let Some(factory) = factory {
            self.start(factory);
        }
    }

    /// Running -> Stopped. Cancels the pending frame; does not reset the
    /// engine. Idempotent if already stopped.
    pub fn pause(&self) {
        if matches!(self.status(), LoopStatus::Running) {
            self.cancel_frame();
            self.set_status(LoopStatus::Stopped);
        }
    }

    /// Stopped -> Running, only if an engine is already bound. No-op when
    /// already running.
    pub fn resume(&self) {
        if self.inner.engine.borrow().is_none() {
            return;
        }
        if matches!(self.status(), LoopStatus::Stopped) {
            self.set_status(LoopStatus::Running);
            self.schedule_frame();
        }
    }

    /// Teardown: cancel whatever is scheduled. Safe to call during partial
    /// initialization and safe to call twice.
    pub fn stop(&self) {
        self.cancel_frame();
        self.cancel_retry();
        if matches!(self.status(), LoopStatus::Running | LoopStatus::Starting) {
            self.set_status(LoopStatus::Stopped);
        }
    }

    /// Forwards a surface resize to the engine. The recorded size only moves
    /// to the new value if the engine accepted it, so diagnostics always
    /// carry the last known-good dimensions.
    pub fn resize(&self, width: u32, height: u32) {
        let engine = self.inner.engine.borrow().clone();
        match engine {
            Some(engine) => match engine.resize(width, height) {
                Ok(()) => self.inner.surface_size.set((width, height)),
                Err(err) => log::warn!("engine resize failed: {err}"),
            },
            None => self.inner.surface_size.set((width, height)),
        }
    }

    /// One acquisition poll. Public so the retry cadence can live outside
    /// the decision logic.
    pub fn try_acquire_once(&self) -> AcquireStep {
        if !matches!(self.status(), LoopStatus::Starting) {
            return AcquireStep::Settled;
        }
        let factory = self.inner.factory.borrow().clone();
        let Some(factory) = factory else {
            self.fail("no engine factory".to_string());
            return AcquireStep::Settled;
        };
        let attempt = self.inner.attempts.get() + 1;
        self.inner.attempts.set(attempt);
        match factory() {
            Ok(Some(engine)) => {
                log::info!("engine bound on attempt {attempt}");
                self.bind(engine);
                AcquireStep::Bound
            }
            Ok(None) => {
                if attempt >= self.inner.config.acquire_retry_limit {
                    self.fail(EngineError::Unavailable { attempts: attempt }.to_string());
                    AcquireStep::Settled
                } else {
                    AcquireStep::Retry
                }
            }
            Err(err) => {
                self.fail(err.to_string());
                AcquireStep::Settled
            }
        }
    }

    fn bind(&self, engine: SharedEngine) {
        *self.inner.engine.borrow_mut() = Some(engine.clone());
        self.inner.on_engine_bound.emit(Some(engine));
        self.set_status(LoopStatus::Running);
        self.schedule_frame();
    }

    fn pump_acquire(&self) {
        if self.try_acquire_once() == AcquireStep::Retry {
            self.schedule_retry();
        }
    }

    fn schedule_retry(&self) {
        let Some(window) = crate::util::browser_window() else {
            return;
        };
        let driver = self.clone();
        let callback = Closure::wrap(Box::new(move || {
            driver.inner.retry_id.set(None);
            driver.pump_acquire();
        }) as Box<dyn FnMut()>);
        if let Ok(id) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            self.inner.config.acquire_retry_interval_ms as i32,
        ) {
            self.inner.retry_id.set(Some(id));
            *self.inner.retry_closure.borrow_mut() = Some(callback);
        }
    }

    fn cancel_retry(&self) {
        if let Some(id) = self.inner.retry_id.take() {
            if let Some(window) = crate::util::browser_window() {
                window.clear_timeout_with_handle(id);
            }
        }
        *self.inner.retry_closure.borrow_mut() = None;
    }

    /// One frame: update then render. Returns whether the loop should keep
    /// scheduling. Any engine exception is fail-stop: status goes Failed,
    /// one report is filed, and no further tick runs until restart.
    pub fn tick(&self) -> bool {
        let entry_status = self.status();
        if !matches!(entry_status, LoopStatus::Running) {
            return false;
        }
        let engine = self.inner.engine.borrow().clone();
        let Some(engine) = engine else {
            return false;
        };
        match engine.update().and_then(|()| engine.render()) {
            Ok(()) => true,
            Err(err) => {
                let reason = err.to_string();
                self.fail(reason.clone());
                self.inner.sink.report(
                    &format!("frame tick failed: {reason}"),
                    &ReportContext {
                        surface_size: Some(self.inner.surface_size.get()),
                        loop_status: Some(self.status().to_string()),
                        extra: Some(format!(
                            "was running: {}",
                            matches!(entry_status, LoopStatus::Running)
                        )),
                    },
                );
                false
            }
        }
    }

    fn schedule_frame(&self) {
        if crate::util::browser_window().is_none() {
            return;
        }
        let driver = self.clone();
        *self.inner.frame_closure.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            driver.inner.raf_id.set(None);
            if driver.tick() {
                driver.request_frame();
            }
        }) as Box<dyn FnMut()>));
        self.request_frame();
    }

    fn request_frame(&self) {
        let Some(window) = crate::util::browser_window() else {
            return;
        };
        let closure = self.inner.frame_closure.borrow();
        if let Some(callback) = closure.as_ref() {
            if let Ok(id) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                self.inner.raf_id.set(Some(id));
            }
        }
    }

    fn cancel_frame(&self) {
        if let Some(id) = self.inner.raf_id.take() {
            if let Some(window) = crate::util::browser_window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        *self.inner.frame_closure.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::testutil::{RecordingSink, ScriptedEngine};

    fn driver_with(
        config: LoopConfig,
        sink: Rc<RecordingSink>,
    ) -> (LoopDriver, Rc<RefCell<Vec<LoopStatus>>>, Rc<RefCell<Vec<bool>>>) {
        let statuses = Rc::new(RefCell::new(Vec::new()));
        let bindings = Rc::new(RefCell::new(Vec::new()));
        let on_status = {
            let statuses = statuses.clone();
            Callback::from(move |s| statuses.borrow_mut().push(s))
        };
        let on_bound = {
            let bindings = bindings.clone();
            Callback::from(move |e: Option<SharedEngine>| bindings.borrow_mut().push(e.is_some()))
        };
        let driver = LoopDriver::new(config, sink as SharedSink, on_status, on_bound);
        (driver, statuses, bindings)
    }

    fn immediate_factory(engine: Rc<ScriptedEngine>) -> EngineFactory {
        Rc::new(move || Ok(Some(engine.clone() as SharedEngine)))
    }

    #[test]
    fn start_binds_and_enters_running() {
        let sink = Rc::new(RecordingSink::default());
        let (driver, statuses, bindings) = driver_with(LoopConfig::default(), sink);
        let engine = Rc::new(ScriptedEngine::default());

        driver.start(immediate_factory(engine));

        assert_eq!(driver.status(), LoopStatus::Running);
        // Binding is cleared at the top of start, then set on success.
        assert_eq!(bindings.borrow().as_slice(), &[false, true]);
        assert_eq!(
            statuses.borrow().as_slice(),
            &[LoopStatus::Starting, LoopStatus::Running]
        );
    }

    #[test]
    fn tick_runs_update_then_render() {
        let sink = Rc::new(RecordingSink::default());
        let (driver, _, _) = driver_with(LoopConfig::default(), sink);
        let engine = Rc::new(ScriptedEngine::default());
        driver.start(immediate_factory(engine.clone()));

        assert!(driver.tick());
        assert_eq!(engine.calls.borrow().as_slice(), &["update", "render"]);
    }

    #[test]
    fn frame_exception_is_fail_stop() {
        let sink = Rc::new(RecordingSink::default());
        let (driver, _, _) = driver_with(LoopConfig::default(), sink.clone());
        let engine = Rc::new(ScriptedEngine::default());
        driver.start(immediate_factory(engine.clone()));
        driver.resize(800, 600);
        engine.calls.borrow_mut().clear();
        engine.fail_update.set(true);

        assert!(!driver.tick());
        assert!(matches!(driver.status(), LoopStatus::Failed(_)));

        let reports = sink.reports.borrow();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].0.contains("frame tick failed"));
        assert_eq!(reports[0].1.surface_size, Some((800, 600)));
        // The report captures the status the tick entered with, not the
        // Failed status it left behind.
        assert_eq!(reports[0].1.extra.as_deref(), Some("was running: true"));
        drop(reports);

        // Failed is terminal: further ticks never reach the engine.
        engine.calls.borrow_mut().clear();
        assert!(!driver.tick());
        assert!(engine.calls.borrow().is_empty());
        assert_eq!(sink.reports.borrow().len(), 1);
    }

    #[test]
    fn acquisition_budget_exhaustion_ends_failed() {
        let sink = Rc::new(RecordingSink::default());
        let (driver, _, _) = driver_with(LoopConfig::default(), sink);
        let factory: EngineFactory = Rc::new(|| Ok(None));

        driver.start(factory);
        let mut polls = 1; // start() performs the first poll
        loop {
            polls += 1;
            if driver.try_acquire_once() != AcquireStep::Retry {
                break;
            }
        }

        assert_eq!(polls, 50);
        match driver.status() {
            LoopStatus::Failed(reason) => assert!(reason.contains("unavailable")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn factory_error_fails_immediately() {
        let sink = Rc::new(RecordingSink::default());
        let (driver, _, _) = driver_with(LoopConfig::default(), sink);
        let factory: EngineFactory =
            Rc::new(|| Err(EngineError::Construct("canvas missing".to_string())));

        driver.start(factory);
        match driver.status() {
            LoopStatus::Failed(reason) => assert!(reason.contains("canvas missing")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn pause_and_resume_round_trip() {
        let sink = Rc::new(RecordingSink::default());
        let (driver, _, _) = driver_with(LoopConfig::default(), sink);
        let engine = Rc::new(ScriptedEngine::default());
        driver.start(immediate_factory(engine.clone()));

        driver.pause();
        assert_eq!(driver.status(), LoopStatus::Stopped);
        assert!(!driver.tick());
        // Idempotent.
        driver.pause();
        assert_eq!(driver.status(), LoopStatus::Stopped);

        driver.resume();
        assert_eq!(driver.status(), LoopStatus::Running);
        assert!(driver.tick());
    }

    #[test]
    fn resume_without_engine_is_a_noop() {
        let sink = Rc::new(RecordingSink::default());
        let (driver, _, _) = driver_with(LoopConfig::default(), sink);
        driver.resume();
        assert_eq!(driver.status(), LoopStatus::Idle);
    }

    #[test]
    fn restart_recovers_from_failure() {
        let sink = Rc::new(RecordingSink::default());
        let (driver, _, _) = driver_with(LoopConfig::default(), sink);
        let engine = Rc::new(ScriptedEngine::default());
        driver.start(immediate_factory(engine.clone()));

        engine.fail_update.set(true);
        driver.tick();
        assert!(matches!(driver.status(), LoopStatus::Failed(_)));

        engine.fail_update.set(false);
        driver.restart();
        assert_eq!(driver.status(), LoopStatus::Running);
        assert!(driver.tick());
    }

    #[test]
    fn failed_resize_keeps_last_known_good_size() {
        let sink = Rc::new(RecordingSink::default());
        let (driver, _, _) = driver_with(LoopConfig::default(), sink);
        let engine = Rc::new(ScriptedEngine::default());
        driver.start(immediate_factory(engine.clone()));

        driver.resize(1024, 768);
        assert_eq!(driver.surface_size(), (1024, 768));

        engine.fail_resize.set(true);
        driver.resize(1, 1);
        assert_eq!(driver.surface_size(), (1024, 768));
    }

    #[test]
    fn stop_is_safe_before_start() {
        let sink = Rc::new(RecordingSink::default());
        let (driver, _, _) = driver_with(LoopConfig::default(), sink);
        driver.stop();
        driver.stop();
        assert_eq!(driver.status(), LoopStatus::Idle);
    }
}
