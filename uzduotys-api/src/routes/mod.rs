/// Route handlers
///
/// Each handler is a straight composition: optional auth guard → typed
/// form validation → one store operation → redirect with a flash
/// message, or the same form re-rendered with field errors. Validation
/// failures never touch the store; successes always redirect so a
/// refresh cannot resubmit.
///
/// - `pages`: landing page, liveness probe, fallback
/// - `auth`: register, login, logout
/// - `tasks`: owner-scoped task CRUD
/// - `password_reset`: reset-by-email flow

pub mod auth;
pub mod pages;
pub mod password_reset;
pub mod tasks;
