pub mod extractor;
pub mod file_magic;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod pdf;
pub mod random_code;
pub mod scoring;
pub mod sql;
pub mod validate;

pub use extractor::{
    SafeActivityIdI64, SafeFileToken, SafeIDI64, SafeIndicatorIdI64, SafeStudentIdI64,
};
pub use file_magic::{detect_content_type, validate_magic_bytes};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
