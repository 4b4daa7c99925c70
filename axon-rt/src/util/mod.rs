//! Small async utilities.

mod time;

pub use time::{sleep, with_timeout, TimeoutError};
