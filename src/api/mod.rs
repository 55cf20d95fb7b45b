pub mod errors;
pub mod middleware;
pub mod request_snapshot;
pub mod sql_error_handler;

pub use errors::ApiError;
pub use middleware::{access_log_middleware, AccessLog};
pub use sql_error_handler::{handle_sql_error, sql_error_response};
