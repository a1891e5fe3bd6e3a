//! Markup and input helpers shared by the pages.

use web_sys::HtmlInputElement;
use yew::prelude::*;

pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-gray-700">
                <h1 class="text-2xl font-bold text-white">{ title }</h1>
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

/// The centered card used by the login, register and forgot-password screens.
pub fn auth_card(title: &'static str, children: Html) -> Html {
    html! {
        <div class="flex flex-col justify-center items-center min-h-screen bg-base-200 p-4">
            <h1 class="text-4xl sm:text-5xl font-extrabold mb-6 text-center text-primary">{"MoneyWise"}</h1>
            <div class="card w-full sm:w-96 bg-base-100 shadow-xl p-6 sm:p-8">
                <h2 class="text-2xl sm:text-3xl font-bold text-center mb-6">{ title }</h2>
                { children }
            </div>
        </div>
    }
}

pub fn error_text(error: &Option<String>) -> Html {
    match error {
        Some(message) => html! { <p class="text-red-500 mt-2 text-center">{ message.clone() }</p> },
        None => html! {},
    }
}

pub fn success_text(message: &Option<String>) -> Html {
    match message {
        Some(message) => html! { <p class="text-green-500 mt-2 text-center">{ message.clone() }</p> },
        None => html! {},
    }
}

/// Keep a string state in sync with an `<input>`.
pub fn bind_input(handle: &UseStateHandle<String>) -> Callback<InputEvent> {
    let handle = handle.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
            handle.set(input.value());
        }
    })
}

/// Keep one field of a form struct in sync with an `<input>`.
pub fn bind_field<T>(handle: &UseStateHandle<T>, apply: fn(&mut T, String)) -> Callback<InputEvent>
where
    T: Clone + 'static,
{
    let handle = handle.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
            let mut next = (*handle).clone();
            apply(&mut next, input.value());
            handle.set(next);
        }
    })
}

/// Like [bind_field] for `<select>` elements, which fire `change` rather than `input`.
pub fn bind_select<T>(handle: &UseStateHandle<T>, apply: fn(&mut T, String)) -> Callback<Event>
where
    T: Clone + 'static,
{
    let handle = handle.clone();
    Callback::from(move |e: Event| {
        let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
        let mut next = (*handle).clone();
        apply(&mut next, select.value());
        handle.set(next);
    })
}

fn icon_base(path: &'static str, size: u32) -> Html {
    html! {
        <svg width={size.to_string()} height={size.to_string()} viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
            <path d={path}></path>
        </svg>
    }
}

pub fn icon_home() -> Html {
    icon_base("M3 9l9-7 9 7v11a2 2 0 01-2 2H5a2 2 0 01-2-2zM9 22V12h6v10", 20)
}
pub fn icon_list() -> Html {
    icon_base("M8 6h13M8 12h13M8 18h13M3 6h.01M3 12h.01M3 18h.01", 20)
}
pub fn icon_user() -> Html {
    icon_base("M20 21v-2a4 4 0 00-4-4H8a4 4 0 00-4 4v2M12 11a4 4 0 100-8 4 4 0 000 8z", 20)
}
pub fn icon_bar_chart() -> Html {
    icon_base("M12 20V10M18 20V4M6 20v-4", 20)
}
pub fn icon_log_out() -> Html {
    icon_base("M9 21H5a2 2 0 01-2-2V5a2 2 0 012-2h4M16 17l5-5-5-5M21 12H9", 18)
}
pub fn icon_menu() -> Html {
    icon_base("M3 12h18M3 6h18M3 18h18", 20)
}
