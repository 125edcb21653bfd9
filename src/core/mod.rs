// src/core/mod.rs
//! HTTP plumbing and session state shared by every service

pub mod service_client;
pub mod session;
pub mod transport;

pub use service_client::{ApiClient, ApiRequest};
pub use session::{
    FileStorage, MemoryStorage, RedirectGuard, Session, SessionSnapshot, SessionStorage,
};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
