//! `peerconnect` - Find fellow students and keep track of connections
//!
//! This library provides a student profile, a searchable student directory,
//! and a locally persisted set of connection requests, plus the views and
//! plain-text rendering the `peerconnect` binary is built from.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod connections;
pub mod dashboard;
pub mod directory;
pub mod discovery;
pub mod display;
pub mod error;
pub mod logging;
pub mod notice;
pub mod pages;
pub mod profile;
pub mod routes;
pub mod storage;
pub mod store;

pub use config::Config;
pub use connections::ConnectionsView;
pub use dashboard::{Dashboard, DashboardStats, Tab};
pub use directory::{Directory, StudentId, StudentRecord};
pub use discovery::{DiscoveryView, LoadState, SearchFilter};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use notice::{Notice, Severity};
pub use profile::{ProfileManager, ProfileMode, UserProfile};
pub use routes::Route;
pub use storage::{Storage, StorageStats};
pub use store::Store;
