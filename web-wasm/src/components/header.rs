//! ヘッダーコンポーネント

use crate::app::{home_route, use_app};
use crate::storage;
use dazl_common::routes::Route;
use dazl_common::storage::UserType;
use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    let app = use_app();

    let links = move || {
        if !app.logged_in.get() {
            return vec![
                ("Login", Route::Login),
                ("Agent Signup", Route::AgentSignup),
                ("Homeowner Signup", Route::CustomerSignup),
                ("Contact", Route::Contact),
            ];
        }
        let user_type = storage::session().user_type();
        let mut links = vec![("Home", home_route(user_type))];
        match user_type {
            Some(UserType::Agent) => {
                links.push(("Create PHD", Route::CreatePhd));
                links.push(("My Projects", Route::AgentProjects));
                links.push(("Profile", Route::AgentProfile));
            }
            Some(UserType::Customer) => {
                links.push(("Create Project", Route::HomeOwnerCreateProject));
                links.push(("My Projects", Route::HomeOwnerProjects));
            }
            Some(UserType::Professional) | None => {}
        }
        links.push(("Contact", Route::Contact));
        links
    };

    let on_logout = move |_| {
        if let Err(e) = storage::session().reset() {
            app.fail(e.to_string());
            return;
        }
        app.logged_in.set(false);
        app.navigate(Route::Login);
    };

    view! {
        <header class="header">
            <h1>"Dazl"</h1>
            <nav>
                {move || links()
                    .into_iter()
                    .map(|(label, route)| {
                        view! {
                            <a href=route.path() on:click=move |ev| {
                                ev.prevent_default();
                                app.navigate(route.clone());
                            }>{label}</a>
                        }
                    })
                    .collect_view()}
                <Show when=move || app.logged_in.get()>
                    <button class="btn btn-link" on:click=on_logout>"Logout"</button>
                </Show>
            </nav>
        </header>
    }
}
