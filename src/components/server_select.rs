use wasm_bindgen::JsCast;
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::input::InputRouter;
use crate::util;

#[derive(Properties, PartialEq, Clone)]
pub struct ServerSelectProps {
    pub router: InputRouter,
}

const REGIONS: [&str; 3] = ["EU", "Asia", "Vietnam"];

/// Surface size in CSS pixels, for mapping overlay rows onto click bands.
fn surface_size() -> Option<(f64, f64)> {
    let element = util::browser_window()?
        .document()?
        .get_element_by_id("game-canvas")?;
    let element: HtmlElement = element.dyn_into().ok()?;
    Some((element.client_width() as f64, element.client_height() as f64))
}

#[function_component(ServerSelect)]
pub fn server_select(props: &ServerSelectProps) -> Html {
    let rows = REGIONS
        .iter()
        .enumerate()
        .map(|(index, region)| {
            let onclick = {
                let router = props.router.clone();
                // The engine picks the region from the click's vertical
                // third of the surface; synthesize a click in that band.
                Callback::from(move |_: MouseEvent| {
                    let Some((width, height)) = surface_size() else {
                        return;
                    };
                    let y = (index as f64 + 0.5) / REGIONS.len() as f64 * height;
                    router.dispatch_click(width / 2.0, y);
                })
            };
            html! {
                <button
                    key={*region}
                    onclick={onclick}
                    style="display:block; width:100%; padding:12px; margin:6px 0; font-size:15px;"
                >{ *region }</button>
            }
        })
        .collect::<Html>();

    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(22,27,34,0.95); border:1px solid #30363d; border-radius:12px; padding:24px 40px; text-align:center; min-width:260px;">
            <h2 style="margin:0 0 16px 0;">{"Select Server"}</h2>
            { rows }
        </div>
    }
}
