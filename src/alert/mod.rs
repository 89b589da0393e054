pub mod classify;
pub mod compose;
pub mod dispatch;

pub use classify::{classify, Classification, EvalMode, SeverityColor};
pub use compose::{compose, AlertBatch};
pub use dispatch::{dispatch, DispatchOutcome};
