//! Control panel sign-in and sign-out.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use super::Layout;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    ActiveLocale, OptionalAdminAuth, clear_current_admin, set_current_admin, set_flash,
    take_flash,
};
use crate::models::CurrentAdmin;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Where a successful sign-in lands without a `next` target.
pub const DEFAULT_LANDING: &str = "/ControlPanel/categories/?page=1";

/// `?next=` of the login page.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub next: String,
    pub username: String,
    pub error: Option<&'static str>,
}

/// `next` when it is a same-site path, so sign-in cannot redirect off site.
fn safe_next(next: Option<&str>) -> Option<&str> {
    next.map(str::trim).filter(|target| {
        target.starts_with('/') && !target.starts_with("//") && !target.starts_with("/\\")
    })
}

fn landing(next: Option<&str>) -> String {
    safe_next(next).unwrap_or(DEFAULT_LANDING).to_owned()
}

/// Display the login page, or skip it when already signed in.
pub async fn login_page(
    session: Session,
    active: ActiveLocale,
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Query(query): Query<NextQuery>,
) -> Response {
    if admin.is_some() {
        return Redirect::to(&landing(query.next.as_deref())).into_response();
    }

    LoginTemplate {
        layout: Layout::new(&active).with_flash(take_flash(&session).await),
        next: safe_next(query.next.as_deref()).unwrap_or_default().to_owned(),
        username: String::new(),
        error: None,
    }
    .into_response()
}

/// Handle login form submission.
///
/// # Errors
///
/// Returns an error only if the session cannot be written; bad credentials
/// re-render the form.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    active: ActiveLocale,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let next = form.next.as_deref().or(query.next.as_deref());

    let user = match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            match e {
                AuthError::InvalidCredentials => {
                    tracing::warn!(username = %form.username.trim(), "Admin login failed");
                }
                other => tracing::error!(error = %other, "Admin login errored"),
            }
            return Ok(LoginTemplate {
                layout: Layout::new(&active),
                next: safe_next(next).unwrap_or_default().to_owned(),
                username: form.username,
                error: Some("auth.login.error"),
            }
            .into_response());
        }
    };

    set_current_admin(&session, &CurrentAdmin::from(&user)).await?;
    set_sentry_user(&user.id, &user.username);
    set_flash(&session, Layout::new(&active).i18n.t("auth.login.success")).await;
    tracing::info!(admin_id = %user.id, "Admin signed in");

    Ok(Redirect::to(&landing(next)).into_response())
}

/// Sign out and return to the login page.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn logout(session: Session, active: ActiveLocale) -> Result<Redirect, AppError> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    set_flash(&session, Layout::new(&active).i18n.t("auth.logout.success")).await;
    Ok(Redirect::to("/login/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_must_stay_on_site() {
        assert_eq!(safe_next(Some("/ControlPanel/news/")), Some("/ControlPanel/news/"));
        assert_eq!(safe_next(Some("https://evil.example/")), None);
        assert_eq!(safe_next(Some("//evil.example/")), None);
        assert_eq!(safe_next(Some("/\\evil.example")), None);
        assert_eq!(safe_next(Some("javascript:alert(1)")), None);
        assert_eq!(safe_next(None), None);
    }

    #[test]
    fn test_landing_defaults_to_categories() {
        assert_eq!(landing(None), DEFAULT_LANDING);
        assert_eq!(landing(Some("/ControlPanel/products/?page=2")), "/ControlPanel/products/?page=2");
    }
}
