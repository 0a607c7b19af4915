/// Session cookie handling and current-user extractors
///
/// The session credential is an HS256-signed token in an http-only
/// cookie. Two extractors expose it to handlers:
///
/// - [`CurrentUser`]: required authentication. Rejection redirects to
///   the login page with the originally requested path in `next`, so
///   the request resumes after login.
/// - [`MaybeUser`]: optional authentication for public pages that show
///   different navigation when logged in.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use uzduotys_shared::{auth::token::verify_session_token, models::User};

use crate::{app::AppState, error::AppError};

const SESSION_COOKIE: &str = "session";

/// Builds the session cookie for a freshly issued token
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build()
}

/// Builds the removal cookie that ends a session
///
/// Removing an absent cookie is harmless, which makes logout
/// idempotent.
pub fn session_removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

async fn resolve_user(parts: &Parts, state: &AppState) -> Result<Option<User>, AppError> {
    let jar = CookieJar::from_headers(&parts.headers);

    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };

    let user_id = match verify_session_token(cookie.value(), state.secret()) {
        Ok(id) => id,
        // Absent, tampered, and expired credentials all read as
        // anonymous
        Err(_) => return Ok(None),
    };

    Ok(User::find_by_id(&state.db, user_id).await?)
}

/// The authenticated user behind the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Rejection for protected routes: redirect to login, preserving the
/// requested destination
#[derive(Debug)]
pub enum AuthRejection {
    LoginRedirect { next: String },
    Error(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::LoginRedirect { next } => Redirect::to(&format!(
                "/prisijungti?next={}",
                urlencoding::encode(&next)
            ))
            .into_response(),
            AuthRejection::Error(err) => err.into_response(),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // The full destination, query string included, so login can
        // resume exactly where the request was headed
        let next = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        match resolve_user(parts, state).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(AuthRejection::LoginRedirect { next }),
            Err(err) => Err(AuthRejection::Error(err)),
        }
    }
}

/// The authenticated user, if any
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve_user(parts, state).await?))
    }
}
