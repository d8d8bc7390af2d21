//! 部屋・設備の入力と送信
//!
//! 部屋を選ぶと設備一覧を取得し、チェックした設備ごとにメモと写真を付ける。
//! 「Add another room」で部屋を保存し、「Submit」でプロジェクトを送信する。

use crate::api;
use crate::app::use_app;
use crate::components::form::{selected_file, start_upload};
use crate::storage;
use dazl_common::api::{Endpoint, RoomType};
use dazl_common::dispatch::RoomState;
use dazl_common::feature_list::{FeatureKey, FeatureList, FeatureOption, SlotId};
use dazl_common::payload::{ProjectKind, SubmissionBuilder, SubmitAction};
use dazl_common::upload::UploadSlots;
use dazl_common::wizard::{Wizard, WizardEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::Event;

fn apply(wizard: RwSignal<Wizard>, event: WizardEvent) -> Result<(), String> {
    match wizard.try_update(|w| w.apply(event)) {
        Some(Err(e)) => Err(e.to_string()),
        _ => Ok(()),
    }
}

#[component]
pub fn ProjectRooms(kind: ProjectKind, wizard: RwSignal<Wizard>) -> impl IntoView {
    let app = use_app();
    let rooms = RwSignal::new(Vec::<RoomType>::new());
    let room_id = RwSignal::new(String::new());
    let list = RwSignal::new(FeatureList::default());
    let uploads = RwSignal::new(UploadSlots::new());
    let (loading, set_loading) = signal(false);
    let (submitting, set_submitting) = signal(false);

    spawn_local(async move {
        match api::get(&Endpoint::RoomTypes).await.and_then(api::decode::<Vec<RoomType>>) {
            Ok(found) => rooms.set(found),
            Err(e) => app.fail(e),
        }
    });

    let on_room_change = move |ev: Event| {
        let id = event_target_value(&ev);
        room_id.set(id.clone());
        if id.is_empty() {
            list.set(FeatureList::default());
            return;
        }
        let name = rooms
            .with_untracked(|r| r.iter().find(|r| r.id.to_string() == id).map(|r| r.name.clone()))
            .unwrap_or_default();
        if let Err(e) = storage::session().select_room(&id, &name) {
            return app.fail(e.to_string());
        }
        set_loading.set(true);
        spawn_local(async move {
            let fetched = api::get(&Endpoint::RoomFeatures(id.clone()))
                .await
                .and_then(api::decode::<Vec<FeatureOption>>);
            // 取得中に別の部屋が選ばれていれば捨てる
            if room_id.get_untracked() == id {
                match fetched {
                    Ok(options) => {
                        list.set(FeatureList::from_options(&options));
                        uploads.set(UploadSlots::new());
                        if let Err(e) = apply(wizard, WizardEvent::RoomSelected) {
                            app.fail(e);
                        }
                    }
                    Err(e) => app.fail(e),
                }
                set_loading.set(false);
            }
        });
    };

    let submit = move |action: SubmitAction| {
        if submitting.get_untracked() {
            return;
        }
        let id = room_id.get_untracked();
        if id.is_empty() {
            return app.fail("Please select a room");
        }
        let session = storage::session();
        let saved_rooms = match session.saved_rooms() {
            Ok(saved) => saved,
            Err(e) => return app.fail(e.to_string()),
        };
        let mut current = list.get_untracked();
        let submission = SubmissionBuilder::new(kind, id)
            .realtor_id(session.user_id())
            .saved_rooms(saved_rooms)
            .build(action, &current);
        let name = session.selected_room_name().unwrap_or_default();
        let mut slots = uploads.get_untracked();
        let mut state = wizard.get_untracked();

        set_submitting.set(true);
        spawn_local(async move {
            let room = RoomState { list: &mut current, uploads: &mut slots, wizard: &mut state };
            match api::dispatch_room(kind, &submission, &name, room).await {
                Ok(done) => {
                    list.set(current);
                    uploads.set(slots);
                    wizard.set(state);
                    room_id.set(String::new());
                    app.notify(done.notice);
                    if let Some(route) = done.route {
                        app.navigate(route);
                    }
                }
                Err(e) => app.fail(e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="project-rooms">
            <h3>"Rooms"</h3>
            <Show when=move || wizard.with(Wizard::has_saved_rooms)>
                <p class="text-muted">{move || format!("{} room(s) saved", wizard.with(Wizard::saved_rooms))}</p>
            </Show>
            <div class="form-group">
                <label for="room">"Room"</label>
                <select id="room" prop:value=move || room_id.get() on:change=on_room_change>
                    <option value="">"Select a room"</option>
                    <For
                        each=move || rooms.get()
                        key=|room| room.id
                        children=move |room| view! {
                            <option value=room.id.to_string()>{room.name}</option>
                        }
                    />
                </select>
            </div>
            <Show when=move || loading.get()>
                <p class="text-muted">"Loading features..."</p>
            </Show>
            <div class="features">
                <For
                    each=move || list.with(|l| l.features().iter().map(|f| f.key).collect::<Vec<_>>())
                    key=|key| *key
                    children=move |key| view! { <FeatureCard feature=key list=list uploads=uploads wizard=wizard /> }
                />
            </div>
            <div class="actions">
                <button
                    class="btn"
                    disabled=move || submitting.get() || room_id.with(String::is_empty)
                    on:click=move |_| submit(SubmitAction::AddAnother)
                >"Add another room"</button>
                <button
                    class="btn btn-primary"
                    disabled=move || submitting.get() || room_id.with(String::is_empty)
                    on:click=move |_| submit(SubmitAction::Submit)
                >{move || if submitting.get() { "Submitting..." } else { "Submit" }}</button>
            </div>
        </div>
    }
}

#[component]
fn FeatureCard(
    feature: FeatureKey,
    list: RwSignal<FeatureList>,
    uploads: RwSignal<UploadSlots>,
    wizard: RwSignal<Wizard>,
) -> impl IntoView {
    let app = use_app();
    let key = feature;
    let name = list.with_untracked(|l| l.get(key).map(|f| f.display_name().to_string()).unwrap_or_default());
    let checked = move || list.with(|l| l.get(key).map(|f| f.shows_details()).unwrap_or(false));

    let on_toggle = move |_| {
        list.update(|l| {
            l.toggle(key);
        });
        let any_checked = list.with_untracked(FeatureList::any_checked);
        if let Err(e) = apply(wizard, WizardEvent::FeatureToggled { any_checked }) {
            app.fail(e);
        }
    };

    view! {
        <div class="feature">
            <label>
                <input type="checkbox" prop:checked=checked on:change=on_toggle />
                {name}
            </label>
            <Show when=checked>
                <textarea
                    placeholder="Inspection notes"
                    prop:value=move || list.with(|l| l.get(key).map(|f| f.note.clone()).unwrap_or_default())
                    on:input=move |ev| {
                        let note = event_target_value(&ev);
                        list.update(|l| {
                            l.set_note(key, note);
                        });
                    }
                ></textarea>
                <For
                    each=move || list.with(|l| {
                        l.get(key)
                            .map(|f| f.slots.iter().map(|s| s.id).collect::<Vec<_>>())
                            .unwrap_or_default()
                    })
                    key=|slot| *slot
                    children=move |slot| view! { <SlotInput slot=slot list=list uploads=uploads /> }
                />
                <button
                    class="btn btn-link"
                    on:click=move |_| list.update(|l| {
                        l.append_slot(key);
                    })
                >"+ Add photo"</button>
            </Show>
        </div>
    }
}

#[component]
fn SlotInput(slot: SlotId, list: RwSignal<FeatureList>, uploads: RwSignal<UploadSlots>) -> impl IntoView {
    let app = use_app();
    let on_file = move |ev: Event| {
        if let Some(file) = selected_file(&ev) {
            start_upload(app, list, uploads, slot, file);
        }
    };
    let uploaded = move || list.with(|l| l.slot(slot).map(|s| s.image.is_some()).unwrap_or(false));

    view! {
        <div class="photo-slot">
            <input type="file" accept="image/jpeg,image/png" on:change=on_file />
            <Show when=move || uploads.with(|u| u.is_pending(slot))>
                <span class="text-muted">"Uploading..."</span>
            </Show>
            <Show when=uploaded>
                <span class="hint hint-ok">"✔ Uploaded"</span>
            </Show>
            {move || uploads.with(|u| u.error(slot).map(|e| view! { <p class="field-error">{e.to_string()}</p> }))}
            <input
                type="text"
                placeholder="Image description"
                prop:value=move || list.with(|l| l.slot(slot).map(|s| s.description.clone()).unwrap_or_default())
                on:input=move |ev| {
                    let description = event_target_value(&ev);
                    list.update(|l| {
                        l.set_slot_description(slot, description);
                    });
                }
            />
            <button
                class="btn btn-link"
                on:click=move |_| {
                    if list.try_update(|l| l.remove_slot(slot)).unwrap_or(false) {
                        uploads.update(|u| u.forget(slot));
                    }
                }
            >"Remove"</button>
        </div>
    }
}
