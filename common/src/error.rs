//! 오류 타입 정의

use thiserror::Error;

/// 공통 오류 타입
#[derive(Error, Debug)]
pub enum Error {
    #[error("존재하지 않는 행 번호: {0}")]
    UnknownRow(usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unknown_row() {
        let error = Error::UnknownRow(42);
        assert_eq!(format!("{}", error), "존재하지 않는 행 번호: 42");
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
