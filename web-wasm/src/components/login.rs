//! ログイン画面

use crate::api;
use crate::app::{home_route, use_app, AppContext};
use crate::components::form::{validate_all, TextField};
use crate::storage;
use dazl_common::api::{AuthResponse, Endpoint};
use dazl_common::forms::Login;
use dazl_common::notice::Notice;
use dazl_common::routes::Route;
use dazl_common::storage::UserType;
use dazl_common::validation::{FormValues, ValidationErrors};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

/// 登録・ログイン応答からセッションを開始してトップ画面へ
pub fn finish_auth(app: AppContext, response: Value, fallback: UserType) {
    let response: AuthResponse = match api::decode(response) {
        Ok(r) => r,
        Err(e) => return app.fail(e),
    };
    let data = response.data;
    let user_type = data
        .user_type
        .as_deref()
        .and_then(UserType::parse)
        .unwrap_or(fallback);
    if let Err(e) = storage::session().start_session(&data.token, user_type, data.user_id().as_deref()) {
        return app.fail(e.to_string());
    }
    app.logged_in.set(true);
    app.notify(Notice::welcome(&data.first_name));
    app.navigate(home_route(Some(user_type)));
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let app = use_app();
    let values = RwSignal::new(FormValues::new());
    let errors = RwSignal::new(ValidationErrors::default());
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() || !validate_all(values, errors, Login::schema) {
            return;
        }
        let form = values.with_untracked(Login::from_values);
        set_submitting.set(true);
        spawn_local(async move {
            match api::post(&Endpoint::Login, &form).await {
                Ok(response) => finish_auth(app, response, UserType::Customer),
                Err(e) => app.fail(e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <section class="card">
            <h2>"Login"</h2>
            <form on:submit=on_submit>
                <TextField label="Email" name="email" values=values errors=errors schema=Login::schema />
                <TextField label="Password" name="password" input_type="password" values=values errors=errors schema=Login::schema />
                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Logging in..." } else { "Login" }}
                </button>
            </form>
            <p class="text-muted">
                "No account? "
                <a href="#" on:click=move |ev| { ev.prevent_default(); app.navigate(Route::CustomerSignup); }>"Sign up"</a>
            </p>
        </section>
    }
}
