//! Editing model: structural steps and transactions

mod operation;
mod transaction;

pub use operation::{NodePath, Step};
pub use transaction::{Dispatch, Transaction};
