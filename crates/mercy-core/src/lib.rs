//! # mercy-core
//!
//! Shared types for the Mercy campus registry.
//!
//! - [`Student`], [`Staff`] and [`Item`]: the records kept in the document store
//! - [`Permission`]: capability tags held by staff
//! - [`ObjectId`]: the store's native 12-byte identifier
//! - [`ErrorCode`]: the stable, machine-readable codes returned to clients
//! - [`config`]: the configuration file model

pub mod config;
pub mod error;
pub mod id;
pub mod permission;
pub mod record;

pub use config::{
    AuthConfig, BootstrapConfig, LogConfig, MercyConfig, ServerConfig, StoreBackend, StoreConfig,
    TokenConfig,
};
pub use error::{EntityKind, ErrorCode};
pub use id::{ObjectId, ObjectIdError};
pub use permission::Permission;
pub use record::{Item, Staff, Student};
