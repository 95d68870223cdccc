//! Authentication Module
//!
//! User identity and session management:
//!
//! - **`users`** - user rows and identity queries
//! - **`sessions`** - JWT creation and verification (8-hour expiry)
//! - **`reset`** - password-reset code generation and digesting
//! - **`handlers`** - HTTP handlers for the `/auth` surface
//!
//! # Flow
//!
//! 1. **Register**: username + email + password, bcrypt-hashed, 409 on
//!    duplicates.
//! 2. **Login**: email + password verified, JWT returned.
//! 3. **Forgot/verify/reset password**: 6-digit emailed code, stored as a
//!    SHA-256 digest with a 10-minute expiry, cleared on use.
//! 4. **Delete account**: password confirmation, then the user row goes (the
//!    store cascades the rest).

pub mod handlers;
pub mod reset;
pub mod sessions;
pub mod users;

pub use handlers::types::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use handlers::{
    delete_account, forgot_password, login, register, reset_password, verify_reset_code,
};
