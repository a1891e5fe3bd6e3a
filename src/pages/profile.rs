use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::{
    api::FinanceApi,
    app::use_app,
    browser,
    components::{bind_input, error_text, page_shell, success_text},
    config::profile_image_url,
    error::ApiError,
    models::{ProfileUpdate, User},
    pages::report_failure,
    request::use_request_tracker,
    route::Route,
    session::SessionContext,
};

const LOAD_FAILED: &str = "Impossible de charger le profil.";
const UPDATE_FAILED: &str = "Impossible de mettre à jour le profil.";
const UPDATED: &str = "Profil mis à jour !";

pub async fn load_profile<A: FinanceApi>(api: &A, session: &SessionContext) -> Result<User, ApiError> {
    let session = session.require()?;
    api.me(&session.token).await
}

/// Send the new name (and picture, if any) and refresh the stored user with
/// what the server returned.
pub async fn save_profile<A: FinanceApi>(
    api: &A,
    session: &SessionContext,
    update: &ProfileUpdate,
) -> Result<User, ApiError> {
    let current = session.require()?;
    let user = api.update_profile(&current.token, update).await?;
    session.update_user(&user)?;
    Ok(user)
}

#[function_component(ProfilePage)]
pub fn profile_page() -> Html {
    let app = use_app();
    let tracker = use_request_tracker();
    let name = use_state(String::new);
    let email = use_state(String::new);
    let preview = use_state(|| profile_image_url(None));
    let image = use_state(|| None::<web_sys::File>);
    let error = use_state(|| None::<String>);
    let message = use_state(|| None::<String>);
    let loading = use_state(|| false);
    // The blob URL currently shown, released when replaced or on unmount.
    let blob_url = use_mut_ref(|| None::<String>);

    {
        let app = app.clone();
        let name = name.clone();
        let email = email.clone();
        let preview = preview.clone();
        let error = error.clone();
        let tracker = tracker.clone();
        let blob_url = blob_url.clone();
        use_effect_with_deps(
            move |_| {
                let ticket = tracker.begin();
                spawn_local(async move {
                    let result = load_profile(app.api.as_ref(), &app.session).await;
                    if !ticket.is_current() {
                        return;
                    }
                    match result {
                        Ok(user) => {
                            name.set(user.name);
                            email.set(user.email);
                            preview.set(profile_image_url(user.profile_image.as_deref()));
                        }
                        Err(failure) => report_failure(failure, LOAD_FAILED, &error, &app.navigate),
                    }
                });
                move || {
                    if let Some(url) = blob_url.borrow_mut().take() {
                        browser::revoke_object_url(&url);
                    }
                }
            },
            (),
        );
    }

    let on_pick_image = {
        let image = image.clone();
        let preview = preview.clone();
        let blob_url = blob_url.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            if let Some(url) = browser::object_url(&file) {
                if let Some(old) = blob_url.borrow_mut().replace(url.clone()) {
                    browser::revoke_object_url(&old);
                }
                preview.set(url);
            }
            image.set(Some(file));
        })
    };

    let on_submit = {
        let app = app.clone();
        let name = name.clone();
        let image = image.clone();
        let preview = preview.clone();
        let error = error.clone();
        let message = message.clone();
        let loading = loading.clone();
        let blob_url = blob_url.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            error.set(None);
            message.set(None);
            loading.set(true);

            let update = ProfileUpdate {
                name: (*name).clone(),
                image: (*image).clone(),
            };
            let app = app.clone();
            let name = name.clone();
            let image = image.clone();
            let preview = preview.clone();
            let error = error.clone();
            let message = message.clone();
            let loading = loading.clone();
            let blob_url = blob_url.clone();
            let ticket = tracker.begin();
            spawn_local(async move {
                let result = save_profile(app.api.as_ref(), &app.session, &update).await;
                if !ticket.is_current() {
                    return;
                }
                loading.set(false);
                match result {
                    Ok(user) => {
                        if let Some(url) = blob_url.borrow_mut().take() {
                            browser::revoke_object_url(&url);
                        }
                        preview.set(profile_image_url(user.profile_image.as_deref()));
                        name.set(user.name);
                        image.set(None);
                        message.set(Some(UPDATED.to_string()));
                        app.session_changed.emit(());
                    }
                    Err(failure) => report_failure(failure, UPDATE_FAILED, &error, &app.navigate),
                }
            });
        })
    };

    let on_change_password = {
        let navigate = app.navigate.clone();
        Callback::from(move |_| navigate.emit(Route::ForgotPassword))
    };

    page_shell(
        "Profil",
        html! {},
        html! {
            <div class="bg-gray-800 rounded-2xl shadow-lg p-6 max-w-lg">
                <form onsubmit={on_submit} class="space-y-4">
                    <div class="flex flex-col items-center gap-3">
                        <img src={(*preview).clone()} alt="Photo de profil"
                            class="w-28 h-28 rounded-full object-cover border-2 border-gray-600" />
                        <input type="file" accept="image/*" class="file-input file-input-bordered w-full"
                            onchange={on_pick_image} />
                    </div>
                    <label class="block">
                        <span class="text-gray-300 text-sm">{"Nom"}</span>
                        <input type="text" class="input input-bordered w-full"
                            value={(*name).clone()} oninput={bind_input(&name)} required=true />
                    </label>
                    <label class="block">
                        <span class="text-gray-300 text-sm">{"Email"}</span>
                        <input type="email" class="input input-bordered w-full"
                            value={(*email).clone()} disabled=true />
                    </label>
                    <button type="submit" class="btn btn-primary w-full" disabled={*loading}>
                        { if *loading { "Mise à jour..." } else { "Mettre à jour le profil" } }
                    </button>
                </form>

                <button class="btn btn-outline w-full mt-4" onclick={on_change_password}>
                    {"Modifier le mot de passe"}
                </button>

                { success_text(&message) }
                { error_text(&error) }
            </div>
        },
    )
}
