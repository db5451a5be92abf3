use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("설정 오류: {0}")]
    Config(String),

    #[error("통합문서 경로가 설정되지 않았습니다. `evidence config --set-workbook PATH` 또는 --workbook 으로 지정하세요")]
    MissingWorkbook,

    #[error("파일을 찾을 수 없습니다: {0}")]
    FileNotFound(String),

    #[error("통합문서 읽기 오류: {0}")]
    WorkbookRead(String),

    #[error("통합문서 쓰기 오류: {0}")]
    WorkbookWrite(String),

    #[error("시트가 없습니다: {0}")]
    NoWorksheet(String),

    #[error("PDF 생성 오류: {0}")]
    PdfGeneration(String),

    #[error("입력 오류: {0}")]
    InvalidInput(String),

    #[error("대화형 입력 오류: {0}")]
    Interaction(String),

    #[error("{0}")]
    Core(#[from] evidence_common::Error),

    #[error("JSON 해석 오류: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO 오류: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::Error> for DashboardError {
    fn from(e: calamine::Error) -> Self {
        DashboardError::WorkbookRead(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for DashboardError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        DashboardError::WorkbookWrite(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
