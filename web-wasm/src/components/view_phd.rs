//! PHDレポート閲覧（エージェント）

use crate::api;
use crate::app::use_app;
use dazl_common::api::{ApiMessage, Endpoint};
use dazl_common::notice::Notice;
use dazl_common::report::{
    format_created_at, format_price, parse_reports, BidStatus, BidStatusRequest, MailPdfRequest, PhdReport,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashMap;

#[component]
pub fn ViewPhdPage(id: String) -> impl IntoView {
    let app = use_app();
    let report = RwSignal::new(None::<PhdReport>);
    let statuses = RwSignal::new(HashMap::<String, BidStatus>::new());
    let (email, set_email) = signal(String::new());
    let (sending, set_sending) = signal(false);
    let id = StoredValue::new(id);

    spawn_local(async move {
        let fetched = api::get(&Endpoint::ViewPhd(id.get_value()))
            .await
            .and_then(|value| parse_reports(value).map_err(|e| e.to_string()));
        match fetched.map(|reports| reports.into_iter().next()) {
            Ok(Some(found)) => {
                statuses.set(
                    found
                        .rooms
                        .iter()
                        .filter_map(|room| room.bid_status().map(|s| (room.id(), s)))
                        .collect(),
                );
                report.set(Some(found));
            }
            Ok(None) => app.fail(format!("PHD {} not found", id.get_value())),
            Err(e) => app.fail(e),
        }
    });

    let set_status = move |room_id: String, status: BidStatus| {
        let request = BidStatusRequest {
            id: id.get_value(),
            room_id: room_id.clone(),
            status,
        };
        spawn_local(async move {
            match api::post(&Endpoint::BidStatus, &request).await {
                Ok(_) => {
                    statuses.update(|s| {
                        s.insert(room_id, status);
                    });
                    app.notify(Notice::success(format!("Status set to {}", status.label())));
                }
                Err(e) => app.fail(e),
            }
        });
    };

    let on_mail = move |_| {
        let address = email.get_untracked().trim().to_string();
        if address.is_empty() {
            return app.fail("Email is required");
        }
        let request = MailPdfRequest {
            id: id.get_value(),
            email: address,
        };
        set_sending.set(true);
        spawn_local(async move {
            match api::post(&Endpoint::MailPdf, &request)
                .await
                .and_then(api::decode::<ApiMessage>)
            {
                Ok(response) => {
                    let fallback = format!("Report sent to {}", request.email);
                    app.notify(Notice::server_success(&response.message, &fallback));
                }
                Err(e) => app.fail(e),
            }
            set_sending.set(false);
        });
    };

    let rooms_view = move || {
        report.with(|r| r.as_ref().map(|r| (r.phd_price, r.rooms.clone()))).map(|(price, rooms)| {
            rooms
                .into_iter()
                .map(|room| {
                    let room_id = room.id();
                    let selected = {
                        let room_id = room_id.clone();
                        move || statuses.with(|s| s.get(&room_id).copied())
                    };
                    let projected = {
                        let selected = selected.clone();
                        move || selected().map(|s| format_price(s.projected_price(price)))
                    };
                    view! {
                        <tr>
                            <td>{room.room_name.clone()}</td>
                            <td>{room.images.len()}</td>
                            <td>
                                {BidStatus::ALL
                                    .into_iter()
                                    .map(|status| {
                                        let room_id = room_id.clone();
                                        let selected = selected.clone();
                                        view! {
                                            <label class="radio">
                                                <input
                                                    type="radio"
                                                    name=format!("status-{}", room_id)
                                                    prop:checked=move || selected() == Some(status)
                                                    on:change=move |_| set_status(room_id.clone(), status)
                                                />
                                                {status.label()}
                                            </label>
                                        }
                                    })
                                    .collect_view()}
                            </td>
                            <td>{projected}</td>
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <section class="card">
            <h2>{move || format!("PHD {}", id.get_value())}</h2>
            <Show when=move || report.with(Option::is_some) fallback=|| view! { <p class="text-muted">"Loading..."</p> }>
                <dl>
                    <dt>"Created"</dt>
                    <dd>{move || report.with(|r| r.as_ref().and_then(|r| r.created_at.as_deref().and_then(format_created_at)).unwrap_or_default())}</dd>
                    <dt>"PHD price"</dt>
                    <dd>{move || report.with(|r| r.as_ref().map(|r| format_price(r.phd_price)).unwrap_or_default())}</dd>
                    <dt>"Pre price"</dt>
                    <dd>{move || report.with(|r| r.as_ref().map(|r| format_price(r.pre_price)).unwrap_or_default())}</dd>
                </dl>
                <table class="rooms">
                    <thead>
                        <tr><th>"Room"</th><th>"Images"</th><th>"Status"</th><th>"Projected"</th></tr>
                    </thead>
                    <tbody>{rooms_view}</tbody>
                </table>
                <div class="form-group inline">
                    <input
                        type="email"
                        placeholder="Email"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                    <button class="btn btn-primary" disabled=move || sending.get() on:click=on_mail>"Mail PDF"</button>
                </div>
            </Show>
        </section>
    }
}
