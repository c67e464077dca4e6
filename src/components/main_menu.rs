use yew::prelude::*;

use super::key_tap;
use crate::input::InputRouter;
use crate::model::StateSnapshot;

#[derive(Properties, PartialEq, Clone)]
pub struct MainMenuProps {
    pub router: InputRouter,
    pub snapshot: StateSnapshot,
}

#[function_component(MainMenu)]
pub fn main_menu(props: &MainMenuProps) -> Html {
    let on_enter = {
        let router = props.router.clone();
        Callback::from(move |_: MouseEvent| key_tap(&router, "Enter"))
    };
    let name = props.snapshot.player_name.as_deref().unwrap_or("Adventurer");
    let region = props.snapshot.region.as_deref().unwrap_or("?");

    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(22,27,34,0.95); border:1px solid #30363d; border-radius:12px; padding:24px 40px; text-align:center; min-width:280px;">
            <h2 style="margin:0 0 8px 0;">{ format!("Welcome, {name}") }</h2>
            <p style="margin:0 0 20px 0; opacity:0.7;">{ format!("Server: {region}") }</p>
            <button onclick={on_enter} style="padding:10px 32px; font-size:16px;">{"Enter World"}</button>
        </div>
    }
}
