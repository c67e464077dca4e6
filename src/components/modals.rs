use yew::prelude::*;

use super::key_tap;
use crate::input::InputRouter;

#[derive(Properties, PartialEq, Clone)]
pub struct ModalShellProps {
    pub title: &'static str,
    pub router: InputRouter,
    pub children: Html,
}

/// Shared frame for the in-game modal screens; closing sends the same
/// Escape the keyboard would.
#[function_component(ModalShell)]
fn modal_shell(props: &ModalShellProps) -> Html {
    let on_close = {
        let router = props.router.clone();
        Callback::from(move |_: MouseEvent| key_tap(&router, "Escape"))
    };

    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(22,27,34,0.95); border:1px solid #30363d; border-radius:12px; padding:24px 32px; min-width:320px; max-width:70vw;">
            <div style="display:flex; justify-content:space-between; align-items:center; margin-bottom:12px;">
                <h2 style="margin:0;">{ props.title }</h2>
                <button onclick={on_close}>{"Close (Esc)"}</button>
            </div>
            { props.children.clone() }
        </div>
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct ScreenModalProps {
    pub router: InputRouter,
}

#[function_component(InventoryModal)]
pub fn inventory_modal(props: &ScreenModalProps) -> Html {
    html! {
        <ModalShell title="Inventory" router={props.router.clone()}>
            <p style="opacity:0.7;">{"Your bags are empty."}</p>
        </ModalShell>
    }
}

#[function_component(ShopModal)]
pub fn shop_modal(props: &ScreenModalProps) -> Html {
    html! {
        <ModalShell title="Shop" router={props.router.clone()}>
            <p style="opacity:0.7;">{"The merchant has nothing for sale yet."}</p>
        </ModalShell>
    }
}

#[function_component(HelpModal)]
pub fn help_modal(props: &ScreenModalProps) -> Html {
    html! {
        <ModalShell title="Help" router={props.router.clone()}>
            <ul style="margin:0; padding-left:20px; line-height:1.7;">
                <li>{"WASD or arrow keys: move"}</li>
                <li>{"I: inventory"}</li>
                <li>{"T: shop"}</li>
                <li>{"H or F1: help"}</li>
                <li>{"Escape: back"}</li>
            </ul>
        </ModalShell>
    }
}
