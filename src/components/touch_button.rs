use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct TouchButtonProps {
    /// Number of currently active synthetic touch points.
    pub active: usize,
    pub on_arm: Callback<()>,
}

/// Floating button that arms the next touch-point capture. Shows the
/// live count of active points so the user can keep track of fingers.
#[function_component(TouchButton)]
pub fn touch_button(props: &TouchButtonProps) -> Html {
    let onclick = {
        let cb = props.on_arm.clone();
        Callback::from(move |_: yew::events::MouseEvent| cb.emit(()))
    };
    let label = if props.active > 0 {
        format!("+\u{261d} {}", props.active)
    } else {
        "+\u{261d}".to_string()
    };
    html! {
        <button
            {onclick}
            title="Click, then click anywhere on the page to add a touch point. Drag a circle to move it, double-click it to release."
            style="position:fixed; bottom:20px; right:20px; z-index:9999; font-size:20px; padding:10px; cursor:pointer; background:#0af; color:white; border:none; border-radius:5px; box-shadow:0 2px 5px rgba(0,0,0,0.3);"
        >
            { label }
        </button>
    }
}
