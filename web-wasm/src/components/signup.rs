//! エージェント・ホームオーナー登録画面

use crate::api;
use crate::app::use_app;
use crate::components::form::{validate_all, CheckboxField, FieldError, TextField};
use crate::components::login::finish_auth;
use dazl_common::api::Endpoint;
use dazl_common::forms::{AgentSignup, CustomerSignup};
use dazl_common::storage::UserType;
use dazl_common::validation::{password_confirmation, FormValues, PasswordMatch, ValidationErrors};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 確認欄の入力中に一致状態を表示
#[component]
fn PasswordHint(values: RwSignal<FormValues>) -> impl IntoView {
    let state = move || {
        values.with(|v| {
            let confirm = v.text("confirmPassword");
            if confirm.is_empty() {
                None
            } else {
                Some(password_confirmation(v.text("password"), confirm))
            }
        })
    };
    view! {
        {move || match state() {
            Some(PasswordMatch::Matching) => view! { <p class="hint hint-ok">"Passwords match"</p> }.into_any(),
            Some(PasswordMatch::Mismatched) => view! { <p class="hint hint-error">"Passwords do not match"</p> }.into_any(),
            None => ().into_any(),
        }}
    }
}

#[component]
pub fn AgentSignupPage() -> impl IntoView {
    let app = use_app();
    let values = RwSignal::new(FormValues::new().with_text("subscription", "monthly"));
    let errors = RwSignal::new(ValidationErrors::default());
    let (submitting, set_submitting) = signal(false);
    let schema = AgentSignup::schema;

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() || !validate_all(values, errors, schema) {
            return;
        }
        let form = values.with_untracked(AgentSignup::from_values);
        set_submitting.set(true);
        spawn_local(async move {
            match api::post(&Endpoint::AgentSignup, &form).await {
                Ok(response) => finish_auth(app, response, UserType::Agent),
                Err(e) => app.fail(e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <section class="card">
            <h2>"Agent Signup"</h2>
            <form on:submit=on_submit>
                <TextField label="First Name" name="firstName" values=values errors=errors schema=schema />
                <TextField label="Last Name" name="lastName" values=values errors=errors schema=schema />
                <TextField label="Email" name="email" input_type="email" values=values errors=errors schema=schema />
                <TextField label="Phone Number" name="number" values=values errors=errors schema=schema />
                <TextField label="Password" name="password" input_type="password" values=values errors=errors schema=schema />
                <TextField label="Confirm Password" name="confirmPassword" input_type="password" values=values errors=errors schema=schema />
                <PasswordHint values=values />
                <TextField label="Company Name" name="companyName" values=values errors=errors schema=schema />
                <TextField label="Street Address" name="streetAddress" values=values errors=errors schema=schema />
                <TextField label="City" name="city" values=values errors=errors schema=schema />
                <TextField label="State" name="state" values=values errors=errors schema=schema />
                <TextField label="Zip" name="zip" values=values errors=errors schema=schema />
                <div class="form-group">
                    <label for="subscription">"Subscription"</label>
                    <select
                        id="subscription"
                        prop:value=move || values.with(|v| v.text("subscription").to_string())
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            values.update(|v| v.set_text("subscription", value));
                        }
                    >
                        <option value="monthly">"Monthly"</option>
                        <option value="yearly">"Yearly"</option>
                    </select>
                    <FieldError name="subscription" errors=errors />
                </div>
                <CheckboxField label="I agree to the terms and conditions" name="agreeToTerms" values=values errors=errors schema=schema />
                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>"Sign up"</button>
            </form>
        </section>
    }
}

#[component]
pub fn CustomerSignupPage() -> impl IntoView {
    let app = use_app();
    let values = RwSignal::new(FormValues::new());
    let errors = RwSignal::new(ValidationErrors::default());
    let (submitting, set_submitting) = signal(false);
    let schema = CustomerSignup::schema;

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() || !validate_all(values, errors, schema) {
            return;
        }
        let form = values.with_untracked(CustomerSignup::from_values);
        set_submitting.set(true);
        spawn_local(async move {
            match api::post(&Endpoint::CustomerSignup, &form).await {
                Ok(response) => finish_auth(app, response, UserType::Customer),
                Err(e) => app.fail(e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <section class="card">
            <h2>"Homeowner Signup"</h2>
            <form on:submit=on_submit>
                <TextField label="First Name" name="firstName" values=values errors=errors schema=schema />
                <TextField label="Last Name" name="lastName" values=values errors=errors schema=schema />
                <TextField label="Email" name="email" input_type="email" values=values errors=errors schema=schema />
                <TextField label="Password" name="password" input_type="password" values=values errors=errors schema=schema />
                <TextField label="Confirm Password" name="confirmPassword" input_type="password" values=values errors=errors schema=schema />
                <PasswordHint values=values />
                <TextField label="Zip Code" name="zipCode" values=values errors=errors schema=schema />
                <TextField label="Phone Number" name="number" values=values errors=errors schema=schema />
                <CheckboxField label="I agree to the terms and conditions" name="agreeToTerms" values=values errors=errors schema=schema />
                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>"Sign up"</button>
            </form>
        </section>
    }
}
