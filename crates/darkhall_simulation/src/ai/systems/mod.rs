//! AI systems (strategic layer logic)

pub mod fsm;
pub mod movement;
pub mod perception;

// Re-export all systems
pub use fsm::*;
pub use movement::*;
pub use perception::*;
