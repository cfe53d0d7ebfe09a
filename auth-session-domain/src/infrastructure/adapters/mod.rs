pub mod env_config;
pub mod event_bus;
pub mod in_memory_session_repository;
pub mod memory_event_publisher;
pub mod system_clock;

pub use env_config::*;
pub use event_bus::InMemoryEventBus;
pub use in_memory_session_repository::*;
pub use memory_event_publisher::*;
pub use system_clock::*;
