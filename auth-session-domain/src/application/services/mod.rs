pub mod session_lockout;
pub mod token_gate;

pub use session_lockout::*;
pub use token_gate::*;
