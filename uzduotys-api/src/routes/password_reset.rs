/// Password reset by email
///
/// Requesting a reset answers with the same message whether or not the
/// email is on file, so the form cannot be used to probe which
/// addresses are registered. When the email does match, a link carrying
/// a signed, expiring token is dispatched on a spawned task; the HTTP
/// response never waits on the mail transport, and delivery failure is
/// logged rather than surfaced.
///
/// The completion handler verifies the token on both the GET (form) and
/// the POST (submit); an invalid or expired token redirects back to the
/// request form with one generic warning.

use axum::{
    extract::{rejection::FormRejection, Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use uzduotys_shared::{
    auth::password::hash_password,
    auth::token::{issue_reset_token, verify_reset_token},
    models::{StoreError, User},
};
use validator::Validate;

use crate::{
    app::AppState,
    error::{collect_field_errors, AppResult, FieldError},
    flash::{set_flash, take_flash, Flash},
    routes::auth::form_rejection_error,
    views,
};

/// Shown regardless of whether the email matched an account
const RESET_REQUESTED_MESSAGE: &str =
    "If that email is registered, a password reset link has been sent";

const RESET_INVALID_MESSAGE: &str = "The password reset link is invalid or has expired";

/// Reset-request form fields
#[derive(Debug, Deserialize, Validate)]
pub struct RequestResetForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// New-password form fields
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteResetForm {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub password_confirm: String,
}

/// `GET /reset_password` - request form
pub async fn request_form(jar: CookieJar) -> (CookieJar, Response) {
    let (jar, flash) = take_flash(jar);
    (
        jar,
        views::reset_request_page(flash.as_ref(), "", &[]).into_response(),
    )
}

/// `POST /reset_password` - maybe send a reset link
pub async fn request(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<RequestResetForm>, FormRejection>,
) -> AppResult<Response> {
    let Ok(Form(form)) = form else {
        return Ok(
            views::reset_request_page(None, "", &form_rejection_error()).into_response(),
        );
    };

    if let Err(e) = form.validate() {
        let errors = collect_field_errors(&e);
        return Ok(views::reset_request_page(None, &form.email, &errors).into_response());
    }

    if let Some(user) = User::find_by_email(&state.db, &form.email).await? {
        let token = issue_reset_token(user.id, state.secret(), state.config.reset_token_ttl_secs)?;
        let link = format!("{}/reset_password/{}", state.config.base_url, token);
        let body = format!(
            "To choose a new password, open this link:\n\n{}\n\n\
             The link expires in {} minutes. If you did not request a reset, ignore this message.",
            link,
            state.config.reset_token_ttl_secs / 60,
        );

        // Fire and forget; the response below must not depend on the
        // mail transport
        let mailer = state.mailer.clone();
        let to = user.email.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&to, "Password reset", &body).await {
                tracing::warn!("password reset mail failed: {}", e);
            }
        });
    }

    let jar = set_flash(jar, Flash::info(RESET_REQUESTED_MESSAGE));
    Ok((jar, Redirect::to("/prisijungti")).into_response())
}

fn invalid_token_redirect(jar: CookieJar) -> Response {
    let jar = set_flash(jar, Flash::warning(RESET_INVALID_MESSAGE));
    (jar, Redirect::to("/reset_password")).into_response()
}

/// `GET /reset_password/:token` - new-password form behind a valid token
pub async fn complete_form(
    State(state): State<AppState>,
    Path(token): Path<String>,
    jar: CookieJar,
) -> Response {
    if verify_reset_token(&token, state.secret()).is_err() {
        return invalid_token_redirect(jar);
    }

    let (jar, flash) = take_flash(jar);
    (
        jar,
        views::reset_complete_page(flash.as_ref(), &format!("/reset_password/{}", token), &[]),
    )
        .into_response()
}

/// `POST /reset_password/:token` - rewrite the password hash
///
/// The token authorizes exactly this change; there is no revocation
/// list, so it stays usable until the window elapses.
pub async fn complete(
    State(state): State<AppState>,
    Path(token): Path<String>,
    jar: CookieJar,
    form: Result<Form<CompleteResetForm>, FormRejection>,
) -> AppResult<Response> {
    let Ok(user_id) = verify_reset_token(&token, state.secret()) else {
        return Ok(invalid_token_redirect(jar));
    };

    let Ok(Form(form)) = form else {
        return Ok(views::reset_complete_page(
            None,
            &format!("/reset_password/{}", token),
            &form_rejection_error(),
        )
        .into_response());
    };

    let mut errors = match form.validate() {
        Ok(()) => Vec::new(),
        Err(e) => collect_field_errors(&e),
    };
    if form.password != form.password_confirm {
        errors.push(FieldError::new("password_confirm", "Passwords do not match"));
    }
    if !errors.is_empty() {
        return Ok(
            views::reset_complete_page(None, &format!("/reset_password/{}", token), &errors)
                .into_response(),
        );
    }

    let new_hash = hash_password(&form.password)?;
    match User::update_password_hash(&state.db, user_id, &new_hash).await {
        Ok(()) => {}
        // Signed token for a user that no longer resolves; treat like
        // any other bad token
        Err(StoreError::NotFound) => return Ok(invalid_token_redirect(jar)),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id, "password reset completed");
    let jar = set_flash(jar, Flash::success("Your password has been updated"));
    Ok((jar, Redirect::to("/prisijungti")).into_response())
}
