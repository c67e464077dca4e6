use yew::prelude::*;

use crate::model::StateSnapshot;

#[derive(Properties, PartialEq, Clone)]
pub struct HudPanelProps {
    pub snapshot: StateSnapshot,
}

#[function_component(HudPanel)]
pub fn hud_panel(props: &HudPanelProps) -> Html {
    let snap = &props.snapshot;
    let (px, py) = snap.player_position;

    html! {
        <>
            <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:180px; display:flex; flex-direction:column; gap:6px; font-size:13px;">
                <div>{ format!("Player: {}", snap.player_name.as_deref().unwrap_or("-")) }</div>
                <div>{ format!("Region: {}", snap.region.as_deref().unwrap_or("-")) }</div>
                <div>{ format!("Position: ({px:.0}, {py:.0})") }</div>
                { if snap.is_loading {
                    html! { <div style="opacity:0.7;">{"Loading..."}</div> }
                } else {
                    html! {}
                } }
                <div style="font-size:11px; opacity:0.6;">{"Move: WASD/arrows  I: inventory  T: shop  H: help"}</div>
            </div>
            { if let Some(error) = &snap.error {
                html! {
                    <div style="position:absolute; bottom:12px; left:50%; transform:translateX(-50%); background:rgba(248,81,73,0.15); border:1px solid #f85149; color:#f85149; border-radius:8px; padding:8px 16px;">
                        { error.clone() }
                    </div>
                }
            } else {
                html! {}
            } }
        </>
    }
}
