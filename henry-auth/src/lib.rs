//! HENRY Auth - Accounts, sessions, and profiles for the HENRY platform.
//!
//! This crate provides:
//! - An in-memory user directory seeded with demo accounts
//! - A session store with replaying, ordered change notifications
//! - A profile repository with strict merge and explicit upsert
//! - The `AuthService` facade for sign-in, sign-up, and sign-out
//!
//! ## Flow
//!
//! ```text
//! sign_in ─→ directory lookup ─→ argon2 verify ─→ session.set ─→ listeners
//! ```
//!
//! Every store is an explicitly constructed value; nothing is global, so
//! tests can build as many independent services as they like.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod directory;
pub mod error;
pub mod password;
pub mod profile;
pub mod record;
pub mod seed;
pub mod service;
pub mod session;

pub use directory::UserDirectory;
pub use error::{AuthError, AuthResult};
pub use password::CredentialHasher;
pub use profile::ProfileRepository;
pub use record::{Identity, ProfileFields, UserRecord};
pub use seed::{sample_accounts, SeedAccount, SAMPLE_SECRET};
pub use service::{AuthService, DEFAULT_DISPLAY_NAME};
pub use session::{Listener, SessionStore, Subscription};
