pub mod connection_host;
pub mod connection_repository;
pub mod data_service;

pub use connection_host::ConnectionHost;
pub use connection_repository::{ConnectionRepository, RepositoryError};
pub use data_service::{DataService, DataServiceError, DataSession, SessionHandle};

#[cfg(test)]
pub use connection_host::MockConnectionHost;
#[cfg(test)]
pub use connection_repository::MockConnectionRepository;
