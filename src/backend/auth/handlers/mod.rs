//! HTTP handlers for the `/auth` surface.

pub mod delete_account;
pub mod login;
pub mod password_reset;
pub mod register;
pub mod types;

pub use delete_account::delete_account;
pub use login::login;
pub use password_reset::{forgot_password, reset_password, verify_reset_code};
pub use register::register;
