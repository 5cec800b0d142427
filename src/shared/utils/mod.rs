pub mod logger;
pub mod rate_limiter;
pub mod validation;

pub use logger::{init_logger_with_level, LogContext, TimedOperation};
pub use rate_limiter::{QueueState, RateLimitedQueue, Submission};
pub use validation::Validator;
