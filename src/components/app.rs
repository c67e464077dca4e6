use std::rc::Rc;

use yew::prelude::*;

use super::game_view::GameView;
use super::hud_panel::HudPanel;
use super::login_screen::LoginScreen;
use super::main_menu::MainMenu;
use super::modals::{HelpModal, InventoryModal, ShopModal};
use super::server_select::ServerSelect;
use super::status_banner::StatusBanner;
use super::touch_controls::TouchControls;
use crate::diagnostics::{ConsoleDiagnostics, SharedSink};
use crate::engine::SharedEngine;
use crate::input::InputRouter;
use crate::loop_driver::{LoopConfig, LoopDriver, LoopStatus};
use crate::model::{EngineView, ScreenId};
use crate::state_sync::{StateSync, SyncConfig};
use crate::util;

#[derive(Clone)]
struct Services {
    router: InputRouter,
    driver: LoopDriver,
    sync: StateSync,
}

#[function_component(App)]
pub fn app() -> Html {
    let view = use_state(EngineView::default);
    let status = use_state(|| LoopStatus::Idle);

    // The router/driver/sync trio lives for the component's lifetime; the
    // driver owns the engine binding and lends it to the other two.
    let services = {
        let view = view.clone();
        let status = status.clone();
        use_mut_ref(move || {
            let sink: SharedSink = Rc::new(ConsoleDiagnostics);
            let router = InputRouter::new(sink.clone());
            let sync = StateSync::new(
                SyncConfig::default(),
                Callback::from(move |v: EngineView| view.set(v)),
            );
            let on_engine_bound = {
                let router = router.clone();
                let sync = sync.clone();
                Callback::from(move |engine: Option<SharedEngine>| {
                    router.set_engine(engine.clone());
                    sync.set_engine(engine);
                })
            };
            let driver = LoopDriver::new(
                LoopConfig::default(),
                sink,
                Callback::from(move |s: LoopStatus| status.set(s)),
                on_engine_bound,
            );
            Services {
                router,
                driver,
                sync,
            }
        })
    };
    let Services {
        router,
        driver,
        sync,
    } = services.borrow().clone();

    let screen = (*view).screen.clone();
    let snapshot = (*view).snapshot.clone();

    let overlay = match &screen {
        ScreenId::Login => html! {
            <LoginScreen
                router={router.clone()}
                loading={snapshot.is_loading}
                error={snapshot.error.clone()}
            />
        },
        ScreenId::ServerSelection => html! { <ServerSelect router={router.clone()} /> },
        ScreenId::MainMenu => html! {
            <MainMenu router={router.clone()} snapshot={snapshot.clone()} />
        },
        ScreenId::GameHud => html! { <HudPanel snapshot={snapshot.clone()} /> },
        ScreenId::Inventory => html! { <InventoryModal router={router.clone()} /> },
        ScreenId::Shop => html! { <ShopModal router={router.clone()} /> },
        ScreenId::HelpModal => html! { <HelpModal router={router.clone()} /> },
        ScreenId::Unknown(_) => html! {},
    };

    html! {
        <div style="position:relative; width:100vw; height:100vh; overflow:hidden; background:#0e1116; color:#e6edf3; font-family:sans-serif;">
            <GameView router={router.clone()} driver={driver.clone()} sync={sync.clone()} />
            { overlay }
            <StatusBanner status={(*status).clone()} driver={driver.clone()} />
            { if util::is_touch_device() {
                html! { <TouchControls router={router.clone()} /> }
            } else {
                html! {}
            } }
        </div>
    }
}
