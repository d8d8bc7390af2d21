//! トップ画面（ユーザー種別ごと）

use crate::app::use_app;
use dazl_common::routes::Route;
use leptos::prelude::*;

fn title(route: &Route) -> &'static str {
    match route {
        Route::AgentHome => "Agent Home",
        Route::HomeOwnerDashboard => "Dashboard",
        Route::AgentProjects | Route::HomeOwnerProjects => "My Projects",
        Route::ProjectOpportunities => "Project Opportunities",
        _ => "Dazl",
    }
}

/// 一覧APIがない画面では番号で開く
fn opener(route: &Route) -> Option<(&'static str, fn(String) -> Route)> {
    match route {
        Route::AgentHome | Route::AgentProjects => Some(("Open PHD", Route::ViewPhd)),
        Route::ProjectOpportunities => Some(("Open project", Route::ProjectOpportunity)),
        _ => None,
    }
}

#[component]
pub fn HomePage(route: Route) -> impl IntoView {
    let app = use_app();
    let (id, set_id) = signal(String::new());
    let heading = title(&route);
    let action = match route {
        Route::AgentHome => Some(("Create PHD", Route::CreatePhd)),
        Route::HomeOwnerDashboard | Route::HomeOwnerProjects => {
            Some(("Create Project", Route::HomeOwnerCreateProject))
        }
        _ => None,
    };

    view! {
        <section class="card">
            <h2>{heading}</h2>
            {action.map(|(label, target)| view! {
                <button class="btn btn-primary" on:click=move |_| app.navigate(target.clone())>{label}</button>
            })}
            {opener(&route).map(|(label, to_route)| view! {
                <div class="form-group inline">
                    <input
                        type="text"
                        placeholder="ID"
                        prop:value=move || id.get()
                        on:input=move |ev| set_id.set(event_target_value(&ev))
                    />
                    <button
                        class="btn"
                        disabled=move || id.get().trim().is_empty()
                        on:click=move |_| app.navigate(to_route(id.get_untracked().trim().to_string()))
                    >{label}</button>
                </div>
            })}
        </section>
    }
}
