//! Authentication and session lifecycle.
//!
//! Three credential shapes flow through here: short-lived signed access
//! tokens carrying the user's token epoch, one-time refresh sessions stored
//! hashed in Postgres, and single-use verification tokens bound to an action.
//! Rotating the epoch invalidates every outstanding access token without
//! tracking them individually.

pub mod claims;
pub mod error;
pub mod login;
pub mod password;
pub mod principal;
pub mod session;
pub mod state;
pub mod storage;
pub mod types;
pub mod utils;
pub mod verification;

pub use state::{AuthConfig, AuthState};
