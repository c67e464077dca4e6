use yew::prelude::*;

use crate::loop_driver::{LoopDriver, LoopStatus};

#[derive(Properties, PartialEq, Clone)]
pub struct StatusBannerProps {
    pub status: LoopStatus,
    pub driver: LoopDriver,
}

/// Human-readable loop status plus the pause/resume/restart controls.
#[function_component(StatusBanner)]
pub fn status_banner(props: &StatusBannerProps) -> Html {
    let on_pause = {
        let driver = props.driver.clone();
        Callback::from(move |_: MouseEvent| driver.pause())
    };
    let on_resume = {
        let driver = props.driver.clone();
        Callback::from(move |_: MouseEvent| driver.resume())
    };
    let on_restart = {
        let driver = props.driver.clone();
        Callback::from(move |_: MouseEvent| driver.restart())
    };

    let failed = matches!(props.status, LoopStatus::Failed(_));
    let color = if failed { "#f85149" } else { "#8b949e" };

    html! {
        <div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:180px; display:flex; flex-direction:column; gap:6px; font-size:13px;">
            <div style={format!("color:{color};")}>{ props.status.to_string() }</div>
            <div style="display:flex; gap:6px;">
                { match props.status {
                    LoopStatus::Running => html! { <button onclick={on_pause}>{"Pause"}</button> },
                    LoopStatus::Stopped => html! { <button onclick={on_resume}>{"Resume"}</button> },
                    _ => html! {},
                } }
                { if failed {
                    html! { <button onclick={on_restart}>{"Restart"}</button> }
                } else {
                    html! {}
                } }
            </div>
        </div>
    }
}
