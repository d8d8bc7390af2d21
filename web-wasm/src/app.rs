//! メインアプリケーションコンポーネント
//!
//! 画面遷移は `Route` のシグナルで管理し、URLは History API で同期する。

use crate::components::{
    agent_profile::AgentProfilePage,
    contact::ContactPage,
    create_phd::CreatePhdPage,
    header::Header,
    home::HomePage,
    login::LoginPage,
    project_opportunity::ProjectOpportunityPage,
    project_rooms::ProjectRooms,
    signup::{AgentSignupPage, CustomerSignupPage},
    toast::Toast,
    view_phd::ViewPhdPage,
};
use crate::storage;
use dazl_common::notice::Notice;
use dazl_common::payload::ProjectKind;
use dazl_common::routes::Route;
use dazl_common::storage::UserType;
use dazl_common::wizard::Wizard;
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen::JsValue;

/// トーストの表示時間（ミリ秒）
const NOTICE_MS: u32 = 3_000;

/// 画面共通の状態
#[derive(Clone, Copy)]
pub struct AppContext {
    pub route: RwSignal<Route>,
    pub notice: RwSignal<Option<Notice>>,
    pub logged_in: RwSignal<bool>,
}

impl AppContext {
    pub fn navigate(&self, route: Route) {
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&route.path()));
        }
        self.route.set(route);
    }

    pub fn notify(&self, notice: Notice) {
        let signal = self.notice;
        signal.set(Some(notice));
        Timeout::new(NOTICE_MS, move || signal.set(None)).forget();
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.notify(Notice::error(message));
    }
}

pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}

/// ユーザー種別ごとのトップ画面
pub fn home_route(user_type: Option<UserType>) -> Route {
    match user_type {
        Some(UserType::Agent) => Route::AgentHome,
        Some(UserType::Customer) => Route::HomeOwnerDashboard,
        Some(UserType::Professional) => Route::ProjectOpportunities,
        None => Route::Login,
    }
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

fn initial_route(logged_in: bool) -> Route {
    match Route::from_path(&current_path()) {
        Some(route) => route,
        None if logged_in => home_route(storage::session().user_type()),
        None => Route::Login,
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let session = storage::session();
    let logged_in = RwSignal::new(session.is_logged_in());
    let app = AppContext {
        route: RwSignal::new(initial_route(logged_in.get_untracked())),
        notice: RwSignal::new(None),
        logged_in,
    };
    provide_context(app);

    // ブラウザの戻る・進む
    let _ = window_event_listener(leptos::ev::popstate, move |_| {
        if let Some(route) = Route::from_path(&current_path()) {
            app.route.set(route);
        }
    });

    view! {
        <div class="container">
            <Header />
            <Toast notice=app.notice />
            <main>{move || render(app.route.get(), app.logged_in.get())}</main>
        </div>
    }
}

/// ログインなしで開ける画面
fn is_public(route: &Route) -> bool {
    matches!(
        route,
        Route::Login | Route::AgentSignup | Route::CustomerSignup | Route::Contact
    )
}

fn render(route: Route, logged_in: bool) -> AnyView {
    if !logged_in && !is_public(&route) {
        return view! { <LoginPage /> }.into_any();
    }
    match route {
        Route::Login => view! { <LoginPage /> }.into_any(),
        Route::AgentSignup => view! { <AgentSignupPage /> }.into_any(),
        Route::CustomerSignup => view! { <CustomerSignupPage /> }.into_any(),
        Route::CreatePhd => view! { <CreatePhdPage /> }.into_any(),
        Route::CreatePhdRooms | Route::AgentCreateProject => {
            let wizard = RwSignal::new(Wizard::rooms_only());
            view! { <ProjectRooms kind=ProjectKind::Realtor wizard=wizard /> }.into_any()
        }
        Route::HomeOwnerCreateProject => {
            let wizard = RwSignal::new(Wizard::rooms_only());
            view! { <ProjectRooms kind=ProjectKind::HomeOwner wizard=wizard /> }.into_any()
        }
        Route::Contact => view! { <ContactPage /> }.into_any(),
        Route::AgentProfile => view! { <AgentProfilePage /> }.into_any(),
        Route::ViewPhd(id) => view! { <ViewPhdPage id=id /> }.into_any(),
        Route::ProjectOpportunity(id) => view! { <ProjectOpportunityPage id=id /> }.into_any(),
        other => view! { <HomePage route=other /> }.into_any(),
    }
}
