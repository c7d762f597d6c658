//! Assignment engine.
//!
//! Two pure steps make up a matching pass:
//!
//! 1. [`order`] ranks pending patients by [`UrgencyKey`], keeping arrival
//!    order between equals.
//! 2. [`assign`] walks that ranking and binds each patient to the next doctor
//!    from the available pool until the pool runs dry.
//!
//! Neither step touches storage. [`plan`] runs both after checking the
//! inputs; the dispatcher applies the resulting [`AssignmentMap`].

mod matcher;
mod plan;
mod priority;

pub use matcher::{assign, Assignment, AssignmentMap};
pub use plan::{check_preconditions, plan, EngineError};
pub use priority::{order, UrgencyKey};
