//! Canonical event names for structured logging
//!
//! Every boundary log line carries `event` set to one of these.

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
