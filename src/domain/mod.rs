pub mod db_error;
pub mod log_event;
pub mod request;

pub use db_error::{mysql_error_name, DbErrorReport, POOL_TIMEOUT};
pub use log_event::{
    AccessEntry, EventPayload, LogEvent, LogKind, TraceLevel, TracedBody,
};
pub use request::{RequestBody, RequestSnapshot};
