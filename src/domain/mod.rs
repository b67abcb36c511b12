pub mod action;
pub mod assessment;
pub mod condition;
pub mod snapshot;

pub use action::*;
pub use assessment::*;
pub use condition::*;
pub use snapshot::*;
