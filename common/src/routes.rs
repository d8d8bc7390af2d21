//! 画面遷移先

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Login,
    AgentHome,
    AgentSignup,
    CustomerSignup,
    HomeOwnerDashboard,
    AgentProjects,
    HomeOwnerProjects,
    CreatePhd,
    CreatePhdRooms,
    AgentCreateProject,
    HomeOwnerCreateProject,
    AgentProfile,
    ViewPhd(String),
    ProjectOpportunities,
    ProjectOpportunity(String),
    Contact,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::AgentHome => "/agent/home".into(),
            Route::AgentSignup => "/signup/agent".into(),
            Route::CustomerSignup => "/signup/customer".into(),
            Route::HomeOwnerDashboard => "/homeOwner/dashboard".into(),
            Route::AgentProjects => "/agent/my-project".into(),
            Route::HomeOwnerProjects => "/homeOwner/my-project".into(),
            Route::CreatePhd => "/agent/createPhd".into(),
            Route::CreatePhdRooms => "/agent/createPhd/rooms".into(),
            Route::AgentCreateProject => "/agent/createProject".into(),
            Route::HomeOwnerCreateProject => "/homeOwner/createProject".into(),
            Route::AgentProfile => "/agent/profile".into(),
            Route::ViewPhd(id) => format!("/agent/viewPhd/{}", id),
            Route::ProjectOpportunities => "/company/projectOpportunities".into(),
            Route::ProjectOpportunity(id) => format!("/company/projectOpportunities/{}", id),
            Route::Contact => "/contact".into(),
        }
    }

    /// パスから復元（未知のパスはNone）
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        let fixed = [
            Route::Login,
            Route::AgentHome,
            Route::AgentSignup,
            Route::CustomerSignup,
            Route::HomeOwnerDashboard,
            Route::AgentProjects,
            Route::HomeOwnerProjects,
            Route::CreatePhd,
            Route::CreatePhdRooms,
            Route::AgentCreateProject,
            Route::HomeOwnerCreateProject,
            Route::AgentProfile,
            Route::ProjectOpportunities,
            Route::Contact,
        ];
        if let Some(route) = fixed.into_iter().find(|r| r.path() == path) {
            return Some(route);
        }
        if let Some(id) = path.strip_prefix("/agent/viewPhd/") {
            return (!id.is_empty()).then(|| Route::ViewPhd(id.to_string()));
        }
        if let Some(id) = path.strip_prefix("/company/projectOpportunities/") {
            return (!id.is_empty()).then(|| Route::ProjectOpportunity(id.to_string()));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_round_trip_for_parameterised_routes() {
        assert_eq!(
            Route::from_path("/agent/viewPhd/15"),
            Some(Route::ViewPhd("15".into()))
        );
        assert_eq!(
            Route::from_path("/company/projectOpportunities/8/"),
            Some(Route::ProjectOpportunity("8".into()))
        );
        assert_eq!(Route::from_path("/agent/viewPhd/"), None);
    }

    #[test]
    fn test_fixed_routes() {
        assert_eq!(Route::from_path("/agent/my-project"), Some(Route::AgentProjects));
        assert_eq!(Route::from_path("/nowhere"), None);
    }
}
