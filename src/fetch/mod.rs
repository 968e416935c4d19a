pub mod controller;
pub mod ticket;

pub use controller::{FetchState, PageController};
pub use ticket::{Sequencer, Ticket};
