/// Owner-scoped task CRUD
///
/// Every handler takes `CurrentUser` and passes the caller's id into
/// the store, which is the entire authorization story: a task that is
/// absent and a task that belongs to someone else both come back as
/// `None`/`NotFound`, rendered as the same 404 page.

use axum::{
    extract::{rejection::FormRejection, Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use uzduotys_shared::models::{NewTask, Task};
use validator::Validate;

use crate::{
    app::AppState,
    error::{collect_field_errors, AppError, AppResult},
    flash::{set_flash, take_flash, Flash},
    routes::auth::form_rejection_error,
    session::CurrentUser,
    views,
};

/// Task form fields
///
/// The checkbox posts a value only when checked, hence the `Option`.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    pub done: Option<String>,
}

impl TaskForm {
    fn to_new_task(&self) -> NewTask {
        NewTask {
            title: self.title.clone(),
            done: self.done.is_some(),
        }
    }
}

/// `GET /uzduotys` - the caller's tasks, insertion order
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> AppResult<Response> {
    let tasks = Task::list_for_owner(&state.db, user.id).await?;
    let (jar, flash) = take_flash(jar);
    Ok((jar, views::tasks_page(&user.username, flash.as_ref(), &tasks)).into_response())
}

/// `GET /uzduotys/nauja` - blank task form
pub async fn new_form(CurrentUser(user): CurrentUser, jar: CookieJar) -> (CookieJar, Response) {
    let (jar, flash) = take_flash(jar);
    (
        jar,
        views::task_form_page(
            &user.username,
            flash.as_ref(),
            "New task",
            "/uzduotys/nauja",
            "",
            false,
            &[],
        )
        .into_response(),
    )
}

/// `POST /uzduotys/nauja` - create a task bound to the caller
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    form: Result<Form<TaskForm>, FormRejection>,
) -> AppResult<Response> {
    let Ok(Form(form)) = form else {
        return Ok(views::task_form_page(
            &user.username,
            None,
            "New task",
            "/uzduotys/nauja",
            "",
            false,
            &form_rejection_error(),
        )
        .into_response());
    };

    if let Err(e) = form.validate() {
        let errors = collect_field_errors(&e);
        return Ok(views::task_form_page(
            &user.username,
            None,
            "New task",
            "/uzduotys/nauja",
            &form.title,
            form.done.is_some(),
            &errors,
        )
        .into_response());
    }

    Task::create(&state.db, user.id, form.to_new_task()).await?;

    let jar = set_flash(jar, Flash::success("Task created"));
    Ok((jar, Redirect::to("/uzduotys")).into_response())
}

/// `GET /uzduotys/redaguoti/:id` - edit form, 404 unless owned
pub async fn edit_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> AppResult<Response> {
    let task = Task::find_for_owner(&state.db, id, user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    let (jar, flash) = take_flash(jar);
    Ok((
        jar,
        views::task_form_page(
            &user.username,
            flash.as_ref(),
            "Edit task",
            &format!("/uzduotys/redaguoti/{}", task.id),
            &task.title,
            task.done,
            &[],
        ),
    )
        .into_response())
}

/// `POST /uzduotys/redaguoti/:id` - update in place, 404 unless owned
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    jar: CookieJar,
    form: Result<Form<TaskForm>, FormRejection>,
) -> AppResult<Response> {
    let Ok(Form(form)) = form else {
        return Ok(views::task_form_page(
            &user.username,
            None,
            "Edit task",
            &format!("/uzduotys/redaguoti/{}", id),
            "",
            false,
            &form_rejection_error(),
        )
        .into_response());
    };

    if let Err(e) = form.validate() {
        let errors = collect_field_errors(&e);
        return Ok(views::task_form_page(
            &user.username,
            None,
            "Edit task",
            &format!("/uzduotys/redaguoti/{}", id),
            &form.title,
            form.done.is_some(),
            &errors,
        )
        .into_response());
    }

    Task::update_for_owner(&state.db, id, user.id, form.to_new_task()).await?;

    let jar = set_flash(jar, Flash::success("Task updated"));
    Ok((jar, Redirect::to("/uzduotys")).into_response())
}

/// `GET /uzduotys/istrinti/:id` - confirmation page, 404 unless owned
pub async fn delete_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let task = Task::find_for_owner(&state.db, id, user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(views::delete_task_page(&user.username, &task).into_response())
}

/// `POST /uzduotys/istrinti/:id` - delete, 404 unless owned
///
/// A repeat delete of the same id is a 404, not a second success.
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    jar: CookieJar,
) -> AppResult<Response> {
    Task::delete_for_owner(&state.db, id, user.id).await?;

    let jar = set_flash(jar, Flash::success("Task deleted"));
    Ok((jar, Redirect::to("/uzduotys")).into_response())
}
