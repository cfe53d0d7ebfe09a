pub mod clock;
pub mod config;
pub mod events;
pub mod repository;
pub mod token;

pub use clock::*;
pub use config::*;
pub use events::*;
pub use repository::*;
pub use token::*;
