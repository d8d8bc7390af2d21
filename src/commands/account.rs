//! 登録・ログイン・ログアウト

use super::{print_notice, print_route, prompt_password, Context};
use crate::cli::{AgentSignupArgs, CustomerSignupArgs};
use crate::error::Result;
use dazl_common::api::{AuthData, AuthResponse, Endpoint};
use dazl_common::forms::{AgentSignup, CustomerSignup, Login};
use dazl_common::notice::Notice;
use dazl_common::routes::Route;
use dazl_common::storage::UserType;
use dazl_common::validation::FormValues;
use tracing::info;

/// ログイン後の遷移先
pub fn home_route(user_type: UserType) -> Route {
    match user_type {
        UserType::Agent => Route::AgentHome,
        UserType::Customer => Route::HomeOwnerDashboard,
        UserType::Professional => Route::ProjectOpportunities,
    }
}

fn finish_auth(ctx: &mut Context, data: &AuthData, user_type: UserType) -> Result<()> {
    ctx.session
        .start_session(&data.token, user_type, data.user_id().as_deref())?;
    info!(user_type = user_type.as_str(), "session started");
    print_notice(&Notice::welcome(&data.first_name));
    print_route(&home_route(user_type));
    Ok(())
}

pub async fn signup_agent(ctx: &mut Context, args: AgentSignupArgs) -> Result<()> {
    let (password, confirm) = prompt_password(true)?;
    let values = FormValues::new()
        .with_text("firstName", args.first_name)
        .with_text("lastName", args.last_name)
        .with_text("email", args.email)
        .with_text("number", args.number)
        .with_text("password", password)
        .with_text("confirmPassword", confirm)
        .with_text("companyName", args.company_name)
        .with_text("streetAddress", args.street_address)
        .with_text("city", args.city)
        .with_text("state", args.state)
        .with_text("zip", args.zip)
        .with_bool("agreeToTerms", args.agree_to_terms)
        .with_text("subscription", "monthly");
    AgentSignup::schema().validate(&values)?;

    let form = AgentSignup::from_values(&values);
    let response: AuthResponse = ctx
        .client()?
        .post_json(&Endpoint::AgentSignup, &form)
        .await?;
    finish_auth(ctx, &response.data, UserType::Agent)
}

pub async fn signup_customer(ctx: &mut Context, args: CustomerSignupArgs) -> Result<()> {
    let (password, confirm) = prompt_password(true)?;
    let values = FormValues::new()
        .with_text("firstName", args.first_name)
        .with_text("lastName", args.last_name)
        .with_text("email", args.email)
        .with_text("password", password)
        .with_text("confirmPassword", confirm)
        .with_text("zipCode", args.zip_code)
        .with_text("number", args.number)
        .with_bool("agreeToTerms", args.agree_to_terms);
    CustomerSignup::schema().validate(&values)?;

    let form = CustomerSignup::from_values(&values);
    let response: AuthResponse = ctx
        .client()?
        .post_json(&Endpoint::CustomerSignup, &form)
        .await?;
    finish_auth(ctx, &response.data, UserType::Customer)
}

pub async fn login(ctx: &mut Context, email: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password(false)?.0,
    };
    let values = FormValues::new()
        .with_text("email", email)
        .with_text("password", password);
    Login::schema().validate(&values)?;

    let response: AuthResponse = ctx
        .client()?
        .post_json(&Endpoint::Login, &Login::from_values(&values))
        .await?;
    let user_type = response
        .data
        .user_type
        .as_deref()
        .and_then(UserType::parse)
        .unwrap_or(UserType::Customer);
    finish_auth(ctx, &response.data, user_type)
}

pub fn logout(ctx: &mut Context) -> Result<()> {
    ctx.session.reset()?;
    println!("✔ ログアウトしました");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_route_per_user_type() {
        assert_eq!(home_route(UserType::Agent).path(), "/agent/home");
        assert_eq!(home_route(UserType::Customer), Route::HomeOwnerDashboard);
        assert_eq!(home_route(UserType::Professional), Route::ProjectOpportunities);
    }
}
