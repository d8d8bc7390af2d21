//! PHD作成ウィザード
//!
//! 1. 売主情報 → 2. 価格レンジ → 3. 部屋・設備（`ProjectRooms`）

use crate::api;
use crate::app::use_app;
use crate::components::form::{validate_all, TextField};
use crate::components::project_rooms::ProjectRooms;
use crate::storage;
use dazl_common::api::Endpoint;
use dazl_common::forms::{ClientDetails, PriceRange};
use dazl_common::notice::Notice;
use dazl_common::payload::ProjectKind;
use dazl_common::validation::{FormValues, ValidationErrors};
use dazl_common::wizard::{Wizard, WizardEvent, WizardStep};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn CreatePhdPage() -> impl IntoView {
    let wizard = RwSignal::new(Wizard::new());
    // 部屋入力中のステップ変化では画面を作り直さない
    let phase = Memo::new(move |_| match wizard.with(Wizard::step) {
        WizardStep::Start => WizardStep::Start,
        WizardStep::ClientDetailsEntered => WizardStep::ClientDetailsEntered,
        _ => WizardStep::PriceRangeSet,
    });

    view! {
        <section class="card">
            <h2>"Create PHD"</h2>
            {move || match phase.get() {
                WizardStep::Start => view! { <ClientDetailsStep wizard=wizard /> }.into_any(),
                WizardStep::ClientDetailsEntered => view! { <PriceRangeStep wizard=wizard /> }.into_any(),
                _ => view! { <ProjectRooms kind=ProjectKind::Realtor wizard=wizard /> }.into_any(),
            }}
        </section>
    }
}

#[component]
fn ClientDetailsStep(wizard: RwSignal<Wizard>) -> impl IntoView {
    let app = use_app();
    let initial = storage::session()
        .client_details()
        .ok()
        .flatten()
        .map(|d| {
            FormValues::new()
                .with_text("firstName", d.first_name)
                .with_text("lastName", d.last_name)
                .with_text("email", d.email)
                .with_text("location", d.location)
        })
        .unwrap_or_default();
    let values = RwSignal::new(initial);
    let errors = RwSignal::new(ValidationErrors::default());
    let (submitting, set_submitting) = signal(false);
    let schema = ClientDetails::schema;

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() || !validate_all(values, errors, schema) {
            return;
        }
        let details = values.with_untracked(ClientDetails::from_values);
        set_submitting.set(true);
        spawn_local(async move {
            let saved = api::post(&Endpoint::PhdStepOne, &details)
                .await
                .and_then(|_| storage::session().save_client_details(&details).map_err(|e| e.to_string()));
            match saved {
                Ok(()) => {
                    let moved = wizard.try_update(|w| w.apply(WizardEvent::ClientDetailsSaved));
                    if let Some(Err(e)) = moved {
                        app.fail(e.to_string());
                    }
                }
                Err(e) => app.fail(e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <h3>"Step 1: Client Details"</h3>
        <form on:submit=on_submit>
            <TextField label="First Name" name="firstName" values=values errors=errors schema=schema />
            <TextField label="Last Name" name="lastName" values=values errors=errors schema=schema />
            <TextField label="Email" name="email" input_type="email" values=values errors=errors schema=schema />
            <TextField label="Location" name="location" values=values errors=errors schema=schema />
            <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>"Next"</button>
        </form>
    }
}

#[component]
fn PriceRangeStep(wizard: RwSignal<Wizard>) -> impl IntoView {
    let app = use_app();
    let range = RwSignal::new(PriceRange::default());
    let (low_input, set_low_input) = signal(range.get_untracked().low.to_string());
    let (high_input, set_high_input) = signal(range.get_untracked().high.to_string());

    let on_confirm = move |_| {
        let current = range.get_untracked();
        if let Err(e) = current.validate() {
            return app.fail(e);
        }
        if let Err(e) = storage::session().save_price_range(&current) {
            return app.fail(e.to_string());
        }
        match wizard.try_update(|w| w.apply(WizardEvent::PriceRangeConfirmed)) {
            Some(Err(e)) => app.fail(e.to_string()),
            _ => app.notify(Notice::success(format!(
                "Price range saved: {} - {}",
                current.low, current.high
            ))),
        }
    };

    view! {
        <h3>"Step 2: Price Range"</h3>
        <div class="form-group inline">
            <label for="low">"Low"</label>
            <input
                id="low"
                type="number"
                prop:value=move || low_input.get()
                on:input=move |ev| {
                    let input = event_target_value(&ev);
                    range.update(|r| r.set_low(&input));
                    set_low_input.set(input);
                }
            />
            <label for="high">"High"</label>
            <input
                id="high"
                type="number"
                prop:value=move || high_input.get()
                on:input=move |ev| {
                    let input = event_target_value(&ev);
                    range.update(|r| r.set_high(&input));
                    set_high_input.set(input);
                }
            />
        </div>
        <div class="form-group">
            <input
                type="range"
                prop:min=move || range.with(|r| r.low.to_string())
                prop:max=move || range.with(|r| r.high.to_string())
                prop:value=move || range.with(|r| r.value.to_string())
                on:input=move |ev| {
                    if let Ok(value) = event_target_value(&ev).parse::<u32>() {
                        range.update(|r| r.set_value(value));
                    }
                }
            />
            <p class="text-muted">{move || range.with(|r| r.value.to_string())}</p>
        </div>
        <Show when=move || range.with(|r| r.error().is_some())>
            <p class="field-error">{move || range.with(|r| r.error().unwrap_or_default().to_string())}</p>
        </Show>
        <button
            class="btn btn-primary"
            disabled=move || range.with(|r| r.validate().is_err())
            on:click=on_confirm
        >"Continue"</button>
    }
}
