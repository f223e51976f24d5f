pub mod connection_repository;
pub mod host;
pub mod mongo_data_service;

pub use connection_repository::TomlConnectionRepository;
pub use host::ChannelHost;
pub use mongo_data_service::{MongoDataService, MongoSession};
