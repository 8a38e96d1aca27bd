//! Movie CRUD: three-layer architecture (domain, repository, service).

pub mod domain;
pub mod repository;
pub mod service;

pub use service::MovieService;
