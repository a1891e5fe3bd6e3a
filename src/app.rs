use std::rc::Rc;

use yew::prelude::*;

use crate::{
    api::HttpApi,
    browser::{self, PopStateListener},
    pages::{
        dashboard::DashboardPage, forgot_password::ForgotPasswordPage, login::LoginPage,
        register::RegisterPage,
    },
    route::{Redirect, Route},
    session::SessionContext,
};

/// What every page gets from the root component.
#[derive(Clone, PartialEq)]
pub struct AppContext {
    pub session: SessionContext,
    pub api: Rc<HttpApi>,
    pub navigate: Callback<Route>,
    /// Bumped whenever the stored user changes, so context consumers re-render.
    pub session_version: u32,
    pub session_changed: Callback<()>,
}

#[hook]
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("pages are rendered inside App")
}

#[function_component(App)]
pub fn app() -> Html {
    let session = use_state(SessionContext::browser);
    let api = use_state(|| Rc::new(HttpApi::default()));
    let route = use_state(|| Route::from_path(&browser::current_path()));
    let session_version = use_state(|| 0u32);

    let session_changed = {
        let session_version = session_version.clone();
        Callback::from(move |_: ()| session_version.set(*session_version + 1))
    };

    let navigate = {
        let route = route.clone();
        Callback::from(move |next: Route| {
            tracing::debug!("Navigating to {}", next.path());
            browser::push_path(next.path());
            route.set(next);
        })
    };

    {
        let route = route.clone();
        use_effect_with_deps(
            move |_| {
                let listener = PopStateListener::new(move || {
                    route.set(Route::from_path(&browser::current_path()));
                });
                move || drop(listener)
            },
            (),
        );
    }

    let resolved = route.resolve(session.load().is_some());

    {
        let deps = (*route, resolved);
        let route = route.clone();
        use_effect_with_deps(
            move |(current, resolved): &(Route, Route)| {
                let redirect = Redirect::between(*current, *resolved, &browser::current_path());
                if !redirect.is_none() {
                    tracing::info!("Redirecting to {}", resolved.path());
                }
                if let Some(path) = redirect.path {
                    browser::replace_path(path);
                }
                if let Some(next) = redirect.route {
                    route.set(next);
                }
                || ()
            },
            deps,
        );
    }

    let context = AppContext {
        session: (*session).clone(),
        api: (*api).clone(),
        navigate,
        session_version: *session_version,
        session_changed,
    };

    let content = match resolved {
        Route::Login => html! { <LoginPage /> },
        Route::Register => html! { <RegisterPage /> },
        Route::ForgotPassword => html! { <ForgotPasswordPage /> },
        Route::Dashboard(tab) => html! { <DashboardPage tab={tab} /> },
    };

    html! {
        <ContextProvider<AppContext> context={context}>
            { content }
        </ContextProvider<AppContext>>
    }
}
