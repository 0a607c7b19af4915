/// Minimal server-rendered HTML
///
/// Rendering is deliberately thin: plain string assembly, one shared
/// layout, no template engine. Anything user-supplied goes through
/// [`escape`] before it reaches the page.

use axum::{http::StatusCode, response::Html};
use uzduotys_shared::models::Task;

use crate::{error::FieldError, flash::Flash};

/// Escapes text for safe interpolation into HTML
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn flash_banner(flash: Option<&Flash>) -> String {
    match flash {
        Some(flash) => format!(
            r#"<p class="flash flash-{}">{}</p>"#,
            flash.kind.as_str(),
            escape(&flash.message)
        ),
        None => String::new(),
    }
}

fn error_list(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let items: String = errors
        .iter()
        .map(|e| {
            format!(
                r#"<li data-field="{}">{}</li>"#,
                escape(&e.field),
                escape(&e.message)
            )
        })
        .collect();

    format!(r#"<ul class="errors">{}</ul>"#, items)
}

fn nav(username: Option<&str>) -> String {
    match username {
        Some(name) => format!(
            r#"<nav><a href="/">Home</a> <a href="/uzduotys">My tasks</a> <span>{}</span> <a href="/atsijungti">Log out</a></nav>"#,
            escape(name)
        ),
        None => String::from(
            r#"<nav><a href="/">Home</a> <a href="/prisijungti">Log in</a> <a href="/registruotis">Register</a></nav>"#,
        ),
    }
}

fn layout(title: &str, username: Option<&str>, flash: Option<&Flash>, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="lt">
<head><meta charset="utf-8"><title>{title} - Uzduotys</title></head>
<body>
{nav}
{flash}
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        nav = nav(username),
        flash = flash_banner(flash),
        body = body,
    ))
}

/// Landing page
pub fn landing(username: Option<&str>, flash: Option<&Flash>) -> Html<String> {
    let body = match username {
        Some(_) => r#"<p>Welcome back. <a href="/uzduotys">View your tasks</a>.</p>"#,
        None => {
            r#"<p>A small to-do list. <a href="/registruotis">Register</a> or <a href="/prisijungti">log in</a> to get started.</p>"#
        }
    };
    layout("Uzduotys", username, flash, body)
}

/// Registration form, re-rendered with errors on invalid submits
pub fn register_page(
    flash: Option<&Flash>,
    username: &str,
    email: &str,
    errors: &[FieldError],
) -> Html<String> {
    let body = format!(
        r#"{errors}
<form method="post" action="/registruotis">
<label>Username <input name="username" value="{username}" maxlength="20"></label>
<label>Email <input name="email" type="email" value="{email}"></label>
<label>Password <input name="password" type="password"></label>
<label>Repeat password <input name="password_confirm" type="password"></label>
<button type="submit">Register</button>
</form>"#,
        errors = error_list(errors),
        username = escape(username),
        email = escape(email),
    );
    layout("Register", None, flash, &body)
}

/// Login form; `next` is carried through so login can resume the
/// originally requested page
pub fn login_page(flash: Option<&Flash>, next: Option<&str>, errors: &[FieldError]) -> Html<String> {
    let action = match next {
        // Percent-encoded, so a destination with its own query string
        // survives the round trip through the form action
        Some(next) => format!("/prisijungti?next={}", urlencoding::encode(next)),
        None => "/prisijungti".to_string(),
    };
    let body = format!(
        r#"{errors}
<form method="post" action="{action}">
<label>Username <input name="username"></label>
<label>Password <input name="password" type="password"></label>
<button type="submit">Log in</button>
</form>
<p><a href="/reset_password">Forgot your password?</a></p>"#,
        errors = error_list(errors),
        action = action,
    );
    layout("Log in", None, flash, &body)
}

/// The caller's task list
pub fn tasks_page(username: &str, flash: Option<&Flash>, tasks: &[Task]) -> Html<String> {
    let rows: String = tasks
        .iter()
        .map(|task| {
            format!(
                r#"<li class="{class}">{title} <a href="/uzduotys/redaguoti/{id}">edit</a> <a href="/uzduotys/istrinti/{id}">delete</a></li>"#,
                class = if task.done { "done" } else { "open" },
                title = escape(&task.title),
                id = task.id,
            )
        })
        .collect();

    let list = if tasks.is_empty() {
        String::from("<p>No tasks yet.</p>")
    } else {
        format!("<ul>{}</ul>", rows)
    };

    let body = format!(
        r#"{list}
<p><a href="/uzduotys/nauja">New task</a></p>"#,
        list = list
    );
    layout("My tasks", Some(username), flash, &body)
}

/// Create/edit task form
pub fn task_form_page(
    username: &str,
    flash: Option<&Flash>,
    heading: &str,
    action: &str,
    title: &str,
    done: bool,
    errors: &[FieldError],
) -> Html<String> {
    let body = format!(
        r#"{errors}
<form method="post" action="{action}">
<label>Title <input name="title" value="{title}"></label>
<label>Done <input name="done" type="checkbox"{checked}></label>
<button type="submit">Save</button>
</form>
<p><a href="/uzduotys">Back to tasks</a></p>"#,
        errors = error_list(errors),
        action = escape(action),
        title = escape(title),
        checked = if done { " checked" } else { "" },
    );
    layout(heading, Some(username), flash, &body)
}

/// Delete confirmation page
pub fn delete_task_page(username: &str, task: &Task) -> Html<String> {
    let body = format!(
        r#"<p>Delete task "{title}"?</p>
<form method="post" action="/uzduotys/istrinti/{id}">
<button type="submit">Delete</button>
</form>
<p><a href="/uzduotys">Back to tasks</a></p>"#,
        title = escape(&task.title),
        id = task.id,
    );
    layout("Delete task", Some(username), None, &body)
}

/// Password-reset request form
pub fn reset_request_page(
    flash: Option<&Flash>,
    email: &str,
    errors: &[FieldError],
) -> Html<String> {
    let body = format!(
        r#"{errors}
<form method="post" action="/reset_password">
<label>Email <input name="email" type="email" value="{email}"></label>
<button type="submit">Send reset link</button>
</form>"#,
        errors = error_list(errors),
        email = escape(email),
    );
    layout("Reset password", None, flash, &body)
}

/// New-password form behind a valid reset token
pub fn reset_complete_page(
    flash: Option<&Flash>,
    action: &str,
    errors: &[FieldError],
) -> Html<String> {
    let body = format!(
        r#"{errors}
<form method="post" action="{action}">
<label>New password <input name="password" type="password"></label>
<label>Repeat password <input name="password_confirm" type="password"></label>
<button type="submit">Change password</button>
</form>"#,
        errors = error_list(errors),
        action = escape(action),
    );
    layout("Choose a new password", None, flash, &body)
}

/// Distinct pages for 404, 403, and 500
///
/// The 500 page never carries internal detail; that goes to the log.
pub fn status_page(status: StatusCode) -> Html<String> {
    let (title, text) = match status {
        StatusCode::NOT_FOUND => ("Page not found", "The page you asked for does not exist."),
        StatusCode::FORBIDDEN => ("Forbidden", "You are not allowed to do that."),
        _ => ("Something went wrong", "An internal error occurred. Please try again."),
    };
    layout(title, None, None, &format!("<p>{}</p>", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>&"it's"</b>"#),
            "&lt;b&gt;&amp;&quot;it&#39;s&quot;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_task_titles_are_escaped() {
        let task = Task {
            id: 1,
            title: "<script>alert(1)</script>".to_string(),
            done: false,
            owner_id: 1,
        };
        let Html(page) = tasks_page("alice", None, std::slice::from_ref(&task));
        assert!(!page.contains("<script>alert"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_status_pages_are_distinct() {
        let Html(p404) = status_page(StatusCode::NOT_FOUND);
        let Html(p403) = status_page(StatusCode::FORBIDDEN);
        let Html(p500) = status_page(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(p404.contains("not found"));
        assert!(p403.contains("Forbidden"));
        assert!(p500.contains("internal error occurred"));
        assert_ne!(p404, p403);
        assert_ne!(p403, p500);
    }

    #[test]
    fn test_error_list_rendering() {
        let errors = vec![FieldError::new("email", "Invalid email")];
        let Html(page) = register_page(None, "", "", &errors);
        assert!(page.contains(r#"data-field="email""#));
        assert!(page.contains("Invalid email"));
    }
}
