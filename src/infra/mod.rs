//! Infrastructure layer: file-backed repository, MongoDB driver adapter and settings.

use mongoconnect_app as app;
use mongoconnect_domain as domain;

pub mod adapters;
pub mod config;
