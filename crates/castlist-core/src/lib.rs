#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, unreachable_pub)]

//! Client core for the Castlist movie/actor administration API.
//!
//! Layout:
//! - `auth.rs`: implicit-grant fragment parsing and the per-call [`Session`]
//! - `api.rs`: the [`CastingApi`] seam and its `reqwest` implementation
//! - `app.rs`: the [`App`] state container driving every user flow
//! - `store.rs`: container state and the read-only presentation view
//! - `host.rs`: navigation, prompt and storage capabilities of the host
//! - `config.rs`, `modal.rs`, `permissions.rs`, `error.rs`: supporting types

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod host;
pub mod modal;
pub mod permissions;
pub mod store;

pub use api::{ApiClient, CastingApi};
pub use app::{App, DeleteOutcome, SessionStatus};
pub use auth::{ImplicitGrant, RedirectFragment, Session, extract_token, parse_fragment};
pub use config::{AppConfig, IdentityProvider};
pub use error::{ApiError, ApiResult, AppError, AppResult, ErrorBody, StorageError};
pub use host::{AUTH_STORAGE_KEY, Host, MemoryStorage, SessionStorage};
pub use modal::Modal;
pub use permissions::PermissionSet;
pub use store::{AppState, ModalView, Store};
