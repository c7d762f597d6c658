//! Matching passes over the live roster and care queue.

mod dispatcher;

pub use dispatcher::{DispatchError, Dispatcher, PassReport};
