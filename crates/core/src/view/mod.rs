pub mod machine;
pub mod states;

pub use machine::{ViewTransitionError, FETCH_REJECTED_MESSAGE};
pub use states::{ViewEvent, ViewState, ViewStatus};
