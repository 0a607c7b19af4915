/// Registration, login, and logout
///
/// Login failures are reported with one generic message whether the
/// username is unknown or the password is wrong, so the form cannot be
/// used to enumerate accounts. Identity uniqueness is enforced by the
/// store's unique constraints, not by a form-level pre-check; the
/// constraint violation comes back as a field-level error.

use axum::{
    extract::{rejection::FormRejection, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use uzduotys_shared::{
    auth::password::{hash_password, verify_password},
    auth::token::issue_session_token,
    models::{DuplicateField, NewUser, StoreError, User},
};
use validator::Validate;

use crate::{
    app::AppState,
    error::{collect_field_errors, AppResult, FieldError},
    flash::{set_flash, take_flash, Flash},
    session::{session_cookie, session_removal_cookie},
    views,
};

/// Registration form fields
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, max = 20, message = "Username must be 1-20 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub password_confirm: String,
}

/// Login form fields
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `next` redirect target carried through the login flow
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Only follow redirect targets inside this application
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/",
    }
}

/// Error shown when a POST body does not decode into the form at all,
/// e.g. a required field missing from a non-browser client
pub(crate) fn form_rejection_error() -> Vec<FieldError> {
    vec![FieldError::new("form", "Invalid form submission")]
}

/// `GET /registruotis` - registration form
pub async fn register_form(jar: CookieJar) -> (CookieJar, Response) {
    let (jar, flash) = take_flash(jar);
    (
        jar,
        views::register_page(flash.as_ref(), "", "", &[]).into_response(),
    )
}

/// `POST /registruotis` - create an account
///
/// Valid input creates the user and redirects to `/`; anything else
/// re-renders the form with field errors and writes nothing.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> AppResult<Response> {
    let Ok(Form(form)) = form else {
        return Ok(
            views::register_page(None, "", "", &form_rejection_error()).into_response(),
        );
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
            views::register_page(None, &form.username, &form.email, &errors).into_response(),
        );
    }

    let password_hash = hash_password(&form.password)?;

    match User::create(
        &state.db,
        NewUser {
            username: form.username.clone(),
            email: form.email.clone(),
            password_hash,
        },
    )
    .await
    {
        Ok(user) => {
            tracing::info!(user_id = user.id, "user registered");
            let jar = set_flash(
                jar,
                Flash::success("Registration successful. You can now log in."),
            );
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(StoreError::Duplicate(field)) => {
            let message = match field {
                DuplicateField::Username => "This username is already taken",
                DuplicateField::Email => "This email is already registered",
            };
            let errors = vec![FieldError::new(field.as_str(), message)];
            Ok(
                views::register_page(None, &form.username, &form.email, &errors)
                    .into_response(),
            )
        }
        Err(e) => Err(e.into()),
    }
}

/// `GET /prisijungti` - login form
pub async fn login_form(Query(query): Query<NextQuery>, jar: CookieJar) -> (CookieJar, Response) {
    let (jar, flash) = take_flash(jar);
    (
        jar,
        views::login_page(flash.as_ref(), query.next.as_deref(), &[]).into_response(),
    )
}

/// `POST /prisijungti` - establish a session
///
/// On success the session cookie is set and the request is redirected
/// to the preserved `next` destination, or `/`.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> AppResult<Response> {
    let Ok(Form(form)) = form else {
        return Ok(
            views::login_page(None, query.next.as_deref(), &form_rejection_error())
                .into_response(),
        );
    };

    if let Err(e) = form.validate() {
        let errors = collect_field_errors(&e);
        return Ok(
            views::login_page(None, query.next.as_deref(), &errors).into_response(),
        );
    }

    // One lookup-and-verify path; unknown user and wrong password give
    // the same answer
    let user = User::find_by_username(&state.db, &form.username).await?;
    let verified = match &user {
        Some(user) => verify_password(&form.password, &user.password_hash)?,
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        let flash = Flash::danger("Invalid username or password");
        return Ok(
            views::login_page(Some(&flash), query.next.as_deref(), &[]).into_response(),
        );
    };

    let token = issue_session_token(user.id, state.secret(), state.config.session_ttl_secs)?;
    let jar = jar.add(session_cookie(token));

    tracing::info!(user_id = user.id, "login");
    Ok((jar, Redirect::to(safe_next(query.next.as_deref()))).into_response())
}

/// `GET /atsijungti` - end the session
///
/// Idempotent: logging out while anonymous just clears nothing and
/// redirects the same way.
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(session_removal_cookie());
    let jar = set_flash(jar, Flash::info("You have been logged out"));
    (jar, Redirect::to("/"))
}
