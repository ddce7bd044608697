//! Big Brother admin client.
//!
//! Session resolution, role gating and typed REST access to the childcare
//! backend. Every call goes through one [`ApiClient`] carrying the injected
//! [`SessionContext`]; per-entity APIs are thin [`RestResource`] instances.

pub mod access;
pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod prefs;
pub mod resource;
pub mod session;
pub mod storage;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use access::{PageAccess, Redirect, RoleGate, SessionGuard};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use controller::{ListController, Notice, NoticeLevel, ViewState};
pub use error::{ClientError, ClientResult};
pub use prefs::PreferencesStore;
pub use resource::RestResource;
pub use session::{Session, SessionContext, SessionIssue};
pub use storage::{ClientStorage, StorageType};
pub use transport::{ReqwestTransport, Transport};
