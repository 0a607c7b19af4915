/// Authentication primitives
///
/// - [`password`]: Argon2id password hashing and constant-time verification
/// - [`token`]: HS256-signed, expiring tokens for session cookies and
///   password-reset links
///
/// Both token families are signed with the single server secret; a
/// purpose claim keeps a reset token from ever being accepted as a
/// session credential or vice versa.

pub mod password;
pub mod token;
