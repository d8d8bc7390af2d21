//! フォーム部品
//!
//! 入力のたびに `Schema::validate_field` で該当フィールドだけ再検証する。

use crate::api;
use crate::app::AppContext;
use dazl_common::feature_list::SlotId;
use dazl_common::upload::{ImageSlots, UploadOutcome, UploadSlots};
use dazl_common::validation::{FileMeta, FormValues, Schema, ValidationErrors};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, HtmlInputElement};

fn revalidate(name: &'static str, values: RwSignal<FormValues>, errors: RwSignal<ValidationErrors>, schema: fn() -> Schema) {
    let message = values.with_untracked(|v| schema().validate_field(name, v));
    errors.update(move |e| match message {
        Some(message) => e.insert(name, message),
        None => e.remove(name),
    });
}

/// 送信前の全体検証。エラーはフィールドごとに表示される
pub fn validate_all(values: RwSignal<FormValues>, errors: RwSignal<ValidationErrors>, schema: fn() -> Schema) -> bool {
    match values.with_untracked(|v| schema().validate(v)) {
        Ok(()) => {
            errors.set(ValidationErrors::default());
            true
        }
        Err(found) => {
            errors.set(found);
            false
        }
    }
}

#[component]
pub fn FieldError(name: &'static str, errors: RwSignal<ValidationErrors>) -> impl IntoView {
    view! {
        <Show when=move || errors.with(|e| e.get(name).is_some())>
            <p class="field-error">{move || errors.with(|e| e.get(name).unwrap_or_default().to_string())}</p>
        </Show>
    }
}

#[component]
pub fn TextField(
    label: &'static str,
    name: &'static str,
    values: RwSignal<FormValues>,
    errors: RwSignal<ValidationErrors>,
    schema: fn() -> Schema,
    #[prop(default = "text")] input_type: &'static str,
) -> impl IntoView {
    view! {
        <div class="form-group">
            <label for=name>{label}</label>
            <input
                type=input_type
                id=name
                name=name
                prop:value=move || values.with(|v| v.text(name).to_string())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    values.update(|v| v.set_text(name, value));
                    revalidate(name, values, errors, schema);
                }
            />
            <FieldError name=name errors=errors />
        </div>
    }
}

#[component]
pub fn TextArea(
    label: &'static str,
    name: &'static str,
    values: RwSignal<FormValues>,
    errors: RwSignal<ValidationErrors>,
    schema: fn() -> Schema,
) -> impl IntoView {
    view! {
        <div class="form-group">
            <label for=name>{label}</label>
            <textarea
                id=name
                name=name
                prop:value=move || values.with(|v| v.text(name).to_string())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    values.update(|v| v.set_text(name, value));
                    revalidate(name, values, errors, schema);
                }
            ></textarea>
            <FieldError name=name errors=errors />
        </div>
    }
}

#[component]
pub fn CheckboxField(
    label: &'static str,
    name: &'static str,
    values: RwSignal<FormValues>,
    errors: RwSignal<ValidationErrors>,
    schema: fn() -> Schema,
) -> impl IntoView {
    view! {
        <div class="form-group form-check">
            <input
                type="checkbox"
                id=name
                name=name
                prop:checked=move || values.with(|v| v.flag(name))
                on:change=move |ev| {
                    let checked = event_target_checked(&ev);
                    values.update(|v| v.set_bool(name, checked));
                    revalidate(name, values, errors, schema);
                }
            />
            <label for=name>{label}</label>
            <FieldError name=name errors=errors />
        </div>
    }
}

/// ファイル入力で選ばれた1件目
pub fn selected_file(ev: &Event) -> Option<File> {
    let input: HtmlInputElement = ev.target()?.dyn_into().ok()?;
    input.files()?.get(0)
}

pub fn file_meta(file: &File) -> FileMeta {
    FileMeta::new(file.name(), file.type_(), file.size() as u64)
}

/// スロットへのアップロードを開始する
///
/// 不正なファイルは送信せずスロットにエラーを残す。
/// 同じスロットで後から始めたアップロードだけが反映される。
pub fn start_upload<T>(app: AppContext, target: RwSignal<T>, uploads: RwSignal<UploadSlots>, slot: SlotId, file: File)
where
    T: ImageSlots + Send + Sync + 'static,
{
    let meta = file_meta(&file);
    let ticket = match uploads.try_update(|u| u.begin(slot, &meta)) {
        Some(Ok(ticket)) => ticket,
        Some(Err(e)) => return app.fail(e.to_string()),
        None => return,
    };
    spawn_local(async move {
        let result = api::upload_image(&file).await;
        let outcome = target.try_update(|t| uploads.try_update(|u| u.complete(t, ticket, result)));
        if let Some(Some(UploadOutcome::Failed(message))) = outcome {
            app.fail(message);
        }
    });
}
