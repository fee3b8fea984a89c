//! States, the state interning table and successor generation.

mod numeric;
mod repository;
mod space;
mod types;

pub use repository::StateRepository;
pub use space::StateSpace;
pub use types::{State, StateId, StateSnapshot};
