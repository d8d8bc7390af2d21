//! 専門業者向け案件の閲覧・返信・削除

use crate::api;
use crate::app::use_app;
use dazl_common::api::Endpoint;
use dazl_common::notice::Notice;
use dazl_common::report::{
    DeleteProjectRequest, OpportunityResponse, ResponseBlock, ServicePhd, PROJECT_DELETED, RESPONSE_SENT,
};
use dazl_common::routes::Route;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 確認モーダルの用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Decline,
    Delete,
}

#[component]
pub fn ProjectOpportunityPage(id: String) -> impl IntoView {
    let app = use_app();
    let phd = RwSignal::new(None::<ServicePhd>);
    let response = RwSignal::new(OpportunityResponse::new());
    let modal = RwSignal::new(None::<Pending>);
    let (busy, set_busy) = signal(false);
    let id = StoredValue::new(id);

    spawn_local(async move {
        match api::get(&Endpoint::ViewServicePhd(id.get_value())).await {
            Ok(value) => match ServicePhd::from_response(&value) {
                Some(found) => phd.set(Some(found)),
                None => app.fail(format!("Project {} not found", id.get_value())),
            },
            Err(e) => app.fail(e),
        }
    });

    let send = move || {
        let Some(customer) = phd.with_untracked(|p| p.as_ref().map(|p| p.customer.clone())) else {
            return;
        };
        let mail = match response.with_untracked(|r| r.build(&id.get_value(), &customer)) {
            Ok(mail) => mail,
            Err(ResponseBlock::NeedsConfirmation) => return modal.set(Some(Pending::Decline)),
            Err(block) => return app.fail(block.message()),
        };
        set_busy.set(true);
        spawn_local(async move {
            match api::post(&Endpoint::SendMailHomeOwner, &mail).await {
                Ok(_) => {
                    app.notify(Notice::success(RESPONSE_SENT));
                    app.navigate(Route::ProjectOpportunities);
                }
                Err(e) => app.fail(e),
            }
            set_busy.set(false);
        });
    };

    let delete = move || {
        let request = DeleteProjectRequest {
            project_id: id.get_value(),
        };
        set_busy.set(true);
        spawn_local(async move {
            match api::post(&Endpoint::DeleteProfessionalProject, &request).await {
                Ok(_) => {
                    app.notify(Notice::success(PROJECT_DELETED));
                    app.navigate(Route::ProjectOpportunities);
                }
                Err(e) => app.fail(e),
            }
            set_busy.set(false);
        });
    };

    let on_confirm = move |_| match modal.get_untracked() {
        Some(Pending::Decline) => {
            modal.set(None);
            response.update(OpportunityResponse::confirm_decline);
            send();
        }
        Some(Pending::Delete) => {
            modal.set(None);
            delete();
        }
        None => {}
    };

    let on_cancel = move |_| {
        if modal.get_untracked() == Some(Pending::Decline) {
            response.update(OpportunityResponse::cancel_decline);
        }
        modal.set(None);
    };

    let customer_field = move |read: fn(&ServicePhd) -> String| {
        move || phd.with(|p| p.as_ref().map(read).unwrap_or_default())
    };

    view! {
        <section class="card">
            <h2>"Project Opportunity"</h2>
            <Show when=move || phd.with(Option::is_some) fallback=|| view! { <p class="text-muted">"Loading..."</p> }>
                <dl>
                    <dt>"Homeowner"</dt>
                    <dd>{customer_field(|p| p.customer.full_name())}</dd>
                    <dt>"Address"</dt>
                    <dd>{customer_field(|p| p.customer.house.address.clone())}</dd>
                    <dt>"Updated"</dt>
                    <dd>{customer_field(|p| p.updated_on().unwrap_or_default())}</dd>
                </dl>
                <ul class="rooms">
                    {move || phd.with(|p| {
                        p.as_ref()
                            .map(|p| p.roominfo.clone())
                            .unwrap_or_default()
                            .into_iter()
                            .map(|room| view! {
                                <li>
                                    {room.room_name.clone()}
                                    " "
                                    <span class="text-muted">{room.status.clone().unwrap_or_default()}</span>
                                </li>
                            })
                            .collect_view()
                    })}
                </ul>
                <div class="form-group">
                    <label class="radio">
                        <input
                            type="radio"
                            name="interest"
                            prop:checked=move || response.with(|r| r.interested == Some(true))
                            on:change=move |_| response.update(|r| r.set_interested(true))
                        />
                        "Interested"
                    </label>
                    <label class="radio">
                        <input
                            type="radio"
                            name="interest"
                            prop:checked=move || response.with(|r| r.interested == Some(false))
                            on:change=move |_| response.update(|r| r.set_interested(false))
                        />
                        "Not interested"
                    </label>
                </div>
                <div class="form-group">
                    <textarea
                        placeholder="Message to the homeowner"
                        prop:value=move || response.with(|r| r.message.clone())
                        on:input=move |ev| {
                            let message = event_target_value(&ev);
                            response.update(|r| r.message = message);
                        }
                    ></textarea>
                </div>
                <div class="actions">
                    <button class="btn btn-primary" disabled=move || busy.get() on:click=move |_| send()>"Send"</button>
                    <button class="btn btn-danger" disabled=move || busy.get() on:click=move |_| modal.set(Some(Pending::Delete))>"Delete"</button>
                </div>
            </Show>
            <Show when=move || modal.with(Option::is_some)>
                <div class="modal">
                    <p>
                        {move || match modal.get() {
                            Some(Pending::Decline) => ResponseBlock::NeedsConfirmation.message(),
                            _ => "Are you sure you want to delete this project?",
                        }}
                    </p>
                    <button class="btn btn-primary" on:click=on_confirm>"Yes"</button>
                    <button class="btn" on:click=on_cancel>"No"</button>
                </div>
            </Show>
        </section>
    }
}
