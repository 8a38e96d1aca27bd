//! User lookup and authentication context: domain, repository, service.

pub mod domain;
pub mod repository;
pub mod service;

pub use repository::Principal;
pub use service::UserService;
