/// Public pages: landing, liveness probe, and the 404 fallback

use axum::{http::StatusCode, response::Html};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    flash::take_flash,
    session::MaybeUser,
    views,
};

/// `GET /` - landing page
pub async fn index(MaybeUser(user): MaybeUser, jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, flash) = take_flash(jar);
    let username = user.as_ref().map(|u| u.username.as_str());
    (jar, views::landing(username, flash.as_ref()))
}

/// `GET /healthz` - liveness probe
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Fallback for unknown paths
pub async fn not_found() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        views::status_page(StatusCode::NOT_FOUND),
    )
}
