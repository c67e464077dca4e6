use yew::prelude::*;

use super::key_tap;
use crate::input::InputRouter;

#[derive(Properties, PartialEq, Clone)]
pub struct LoginScreenProps {
    pub router: InputRouter,
    pub loading: bool,
    pub error: Option<String>,
}

#[function_component(LoginScreen)]
pub fn login_screen(props: &LoginScreenProps) -> Html {
    let on_start = {
        let router = props.router.clone();
        Callback::from(move |_: MouseEvent| key_tap(&router, "Enter"))
    };

    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(22,27,34,0.95); border:1px solid #30363d; border-radius:12px; padding:32px 48px; text-align:center; min-width:300px;">
            <h1 style="margin:0 0 8px 0;">{"RPG Online"}</h1>
            <p style="margin:0 0 20px 0; opacity:0.7;">{"Press Enter or tap Start to log in"}</p>
            <button onclick={on_start} style="padding:10px 32px; font-size:16px;">{"Start"}</button>
            { if props.loading {
                html! { <p style="margin:16px 0 0 0; opacity:0.7;">{"Connecting..."}</p> }
            } else {
                html! {}
            } }
            { if let Some(error) = &props.error {
                html! { <p style="margin:16px 0 0 0; color:#f85149;">{ error.clone() }</p> }
            } else {
                html! {}
            } }
        </div>
    }
}
