//! お問い合わせ画面

use crate::api;
use crate::app::use_app;
use crate::components::form::{selected_file, start_upload, validate_all, TextArea, TextField};
use crate::storage;
use dazl_common::api::{ApiMessage, Endpoint};
use dazl_common::feature_list::{PhotoList, SlotId};
use dazl_common::forms::ContactRequest;
use dazl_common::notice::{Notice, CONTACT_SENT};
use dazl_common::upload::UploadSlots;
use dazl_common::validation::{FormValues, ValidationErrors};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::Event;

#[component]
pub fn ContactPage() -> impl IntoView {
    let app = use_app();
    let values = RwSignal::new(FormValues::new());
    let errors = RwSignal::new(ValidationErrors::default());
    let photos = RwSignal::new(PhotoList::default());
    let uploads = RwSignal::new(UploadSlots::new());
    let (submitting, set_submitting) = signal(false);
    let schema = ContactRequest::schema;

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() || !validate_all(values, errors, schema) {
            return;
        }
        if let Err(e) = photos.with_untracked(|p| uploads.with_untracked(|u| u.ensure_ready(p))) {
            return app.fail(e);
        }
        let request = values.with_untracked(|v| ContactRequest::from_values(v, photos.with_untracked(PhotoList::uploaded)));
        let endpoint = Endpoint::contact(storage::session().is_logged_in());
        set_submitting.set(true);
        spawn_local(async move {
            match api::post(&endpoint, &request).await.and_then(api::decode::<ApiMessage>) {
                Ok(response) => {
                    values.set(FormValues::new());
                    photos.set(PhotoList::default());
                    uploads.set(UploadSlots::new());
                    app.notify(Notice::server_success(&response.message, CONTACT_SENT));
                }
                Err(e) => app.fail(e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <section class="card">
            <h2>"Contact Us"</h2>
            <form on:submit=on_submit>
                <TextField label="Member Name" name="memberName" values=values errors=errors schema=schema />
                <TextField label="Property Address" name="propertyAddress" values=values errors=errors schema=schema />
                <TextField label="Company Name" name="companyName" values=values errors=errors schema=schema />
                <TextField label="Contact Name" name="contactName" values=values errors=errors schema=schema />
                <TextArea label="Describe the issue" name="describeIssue" values=values errors=errors schema=schema />
                <TextArea label="Steps taken to resolve" name="stepsToResolve" values=values errors=errors schema=schema />
                <TextArea label="How should the issue be resolved?" name="howIssueResolved" values=values errors=errors schema=schema />
                <Show when=move || app.logged_in.get()>
                    <h4>"Photos"</h4>
                    <For
                        each=move || photos.with(|p| p.slots().iter().map(|s| s.id).collect::<Vec<_>>())
                        key=|slot| *slot
                        children=move |slot| view! { <PhotoInput slot=slot photos=photos uploads=uploads /> }
                    />
                    <button
                        type="button"
                        class="btn btn-link"
                        on:click=move |_| photos.update(|p| {
                            p.append();
                        })
                    >"+ Add photo"</button>
                </Show>
                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>"Send"</button>
            </form>
        </section>
    }
}

#[component]
fn PhotoInput(slot: SlotId, photos: RwSignal<PhotoList>, uploads: RwSignal<UploadSlots>) -> impl IntoView {
    let app = use_app();
    let on_file = move |ev: Event| {
        if let Some(file) = selected_file(&ev) {
            start_upload(app, photos, uploads, slot, file);
        }
    };

    view! {
        <div class="photo-slot">
            <input type="file" accept="image/jpeg,image/png" on:change=on_file />
            <Show when=move || uploads.with(|u| u.is_pending(slot))>
                <span class="text-muted">"Uploading..."</span>
            </Show>
            {move || uploads.with(|u| u.error(slot).map(|e| view! { <p class="field-error">{e.to_string()}</p> }))}
            <input
                type="text"
                placeholder="Image description"
                prop:value=move || photos.with(|p| p.slot(slot).map(|s| s.description.clone()).unwrap_or_default())
                on:input=move |ev| {
                    let description = event_target_value(&ev);
                    photos.update(|p| {
                        p.set_description(slot, description);
                    });
                }
            />
            <button
                type="button"
                class="btn btn-link"
                on:click=move |_| {
                    if photos.try_update(|p| p.remove(slot)).unwrap_or(false) {
                        uploads.update(|u| u.forget(slot));
                    }
                }
            >"Remove"</button>
        </div>
    }
}
