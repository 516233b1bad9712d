//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_seio_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SEIOError {
            $($variant(String),)*
        }

        impl SEIOError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SEIOError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SEIOError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SEIOError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl SEIOError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SEIOError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_seio_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Resource Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Mail("E014", "Mail Delivery Error"),
    Document("E015", "Document Rendering Error"),
}

impl SEIOError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SEIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SEIOError {}

impl From<sea_orm::DbErr> for SEIOError {
    fn from(err: sea_orm::DbErr) -> Self {
        SEIOError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SEIOError {
    fn from(err: std::io::Error) -> Self {
        SEIOError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SEIOError {
    fn from(err: serde_json::Error) -> Self {
        SEIOError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SEIOError {
    fn from(err: chrono::ParseError) -> Self {
        SEIOError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SEIOError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SEIOError::cache_connection("test").code(), "E001");
        assert_eq!(SEIOError::database_config("test").code(), "E003");
        assert_eq!(SEIOError::validation("test").code(), "E007");
        assert_eq!(SEIOError::conflict("test").code(), "E010");
        assert_eq!(SEIOError::mail("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SEIOError::not_found("plan").error_type(),
            "Resource Not Found"
        );
        assert_eq!(
            SEIOError::document("font").error_type(),
            "Document Rendering Error"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = SEIOError::validation("phase must be between 1 and 4");
        let formatted = err.format_simple();
        assert!(formatted.starts_with("Validation Error"));
        assert!(formatted.contains("phase must be between 1 and 4"));
    }

    #[test]
    fn test_db_error_conversion() {
        let err: SEIOError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E005");
        assert_eq!(err.message(), "Custom Error: boom");
    }
}
