mod components;
mod dom;
mod model;
mod session;
mod util;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
