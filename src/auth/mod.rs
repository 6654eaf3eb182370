//! Accounts and sessions.
//!
//! Passwords are stored as Argon2id PHC strings. A successful login issues an
//! HS256 JWT that travels in the HTTP-only `Authorization` cookie (or as a
//! bearer token) and is turned back into a [`CurrentUser`] by the extractor.

pub mod current_user;
pub mod email;
pub mod password;
pub mod seed;
pub mod session;

pub use current_user::CurrentUser;
