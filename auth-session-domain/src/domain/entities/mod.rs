pub mod attempt;
pub mod client_ip;
pub mod common;
pub mod risk;
pub mod session;

pub use attempt::*;
pub use client_ip::*;
pub use common::*;
pub use risk::*;
pub use session::*;
