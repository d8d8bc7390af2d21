//! エージェントプロフィール編集

use crate::api;
use crate::app::use_app;
use crate::components::form::{validate_all, TextField};
use crate::storage;
use dazl_common::api::{ApiMessage, Endpoint};
use dazl_common::forms::{AgentProfile, AgentProfileRecord};
use dazl_common::notice::{Notice, PROFILE_UPDATED};
use dazl_common::validation::{FormValues, ValidationErrors};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn AgentProfilePage() -> impl IntoView {
    let app = use_app();
    let values = RwSignal::new(FormValues::new());
    let errors = RwSignal::new(ValidationErrors::default());
    let (loaded, set_loaded) = signal(false);
    let (submitting, set_submitting) = signal(false);
    let schema = AgentProfile::schema;

    match storage::session().user_id() {
        Some(user_id) => spawn_local(async move {
            match api::get(&Endpoint::AgentProfile(user_id))
                .await
                .and_then(api::decode::<AgentProfileRecord>)
            {
                Ok(record) => {
                    values.set(AgentProfile::values_from_record(&record));
                    set_loaded.set(true);
                }
                Err(e) => app.fail(e),
            }
        }),
        None => app.fail("Please log in again"),
    }

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() || !validate_all(values, errors, schema) {
            return;
        }
        let profile = values.with_untracked(AgentProfile::from_values);
        set_submitting.set(true);
        spawn_local(async move {
            match api::post(&Endpoint::UpdateAgentProfile, &profile)
                .await
                .and_then(api::decode::<ApiMessage>)
            {
                Ok(response) => app.notify(Notice::server_success(&response.message, PROFILE_UPDATED)),
                Err(e) => app.fail(e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <section class="card">
            <h2>"Profile"</h2>
            <Show when=move || loaded.get() fallback=|| view! { <p class="text-muted">"Loading..."</p> }>
                <form on:submit=on_submit>
                    <TextField label="First Name" name="firstName" values=values errors=errors schema=schema />
                    <TextField label="Last Name" name="lastName" values=values errors=errors schema=schema />
                    <TextField label="Email" name="email" input_type="email" values=values errors=errors schema=schema />
                    <TextField label="Company Name" name="companyName" values=values errors=errors schema=schema />
                    <TextField label="City" name="city" values=values errors=errors schema=schema />
                    <TextField label="State" name="state" values=values errors=errors schema=schema />
                    <TextField label="Zip Code" name="zipCode" values=values errors=errors schema=schema />
                    <TextField label="Phone Number" name="number" values=values errors=errors schema=schema />
                    <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>"Save"</button>
                </form>
            </Show>
        </section>
    }
}
