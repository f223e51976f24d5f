pub use mongoconnect_app as app;
pub use mongoconnect_domain as domain;
pub use mongoconnect_infra as infra;

pub mod cli;
pub mod error;
pub mod logging;
