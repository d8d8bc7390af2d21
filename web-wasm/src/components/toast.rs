//! 一時メッセージ表示

use dazl_common::notice::Notice;
use leptos::prelude::*;

#[component]
pub fn Toast(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    view! {
        <Show when=move || notice.with(Option::is_some)>
            <div
                class=move || {
                    if notice.with(|n| n.as_ref().map(Notice::is_error).unwrap_or(false)) {
                        "toast toast-error"
                    } else {
                        "toast toast-success"
                    }
                }
                on:click=move |_| notice.set(None)
            >
                {move || notice.with(|n| n.as_ref().map(|n| n.message.clone()).unwrap_or_default())}
            </div>
        </Show>
    }
}
