use crate::error::{DashboardError, Result};
use evidence_common::report::{DEFAULT_AUTHOR_LABEL, DEFAULT_DEPARTMENT_LABEL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 통합문서 경로 환경 변수
pub const WORKBOOK_ENV: &str = "EVIDENCE_WORKBOOK";
/// PDF 글꼴 경로 환경 변수
pub const PDF_FONT_ENV: &str = "EVIDENCE_PDF_FONT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 증빙자료 통합문서(.xlsx) 경로
    pub workbook: Option<PathBuf>,
    /// 이 글자가 들어간 시트를 대상으로 한다
    pub sheet_keyword: String,
    pub cache_ttl_seconds: u64,
    /// 한글 TTF 글꼴 (없으면 PDF에 한글이 나오지 않음)
    pub pdf_font: Option<PathBuf>,
    pub author_label: String,
    pub department_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workbook: None,
            sheet_keyword: "증빙자료".into(),
            cache_ttl_seconds: 60,
            pdf_font: None,
            author_label: DEFAULT_AUTHOR_LABEL.into(),
            department_label: DEFAULT_DEPARTMENT_LABEL.into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 파일이 없으면 기본 설정
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DashboardError::Config("홈 디렉터리를 찾을 수 없습니다".into()))?;
        Ok(home.join(".config").join("evidence-dashboard").join("config.json"))
    }

    /// 통합문서 경로: 명령행 > 환경 변수 > 설정 파일
    pub fn workbook_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = cli_override {
            return Ok(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(WORKBOOK_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        self.workbook.clone().ok_or(DashboardError::MissingWorkbook)
    }

    /// PDF 글꼴 경로: 환경 변수 > 설정 파일
    pub fn pdf_font_path(&self) -> Option<PathBuf> {
        match std::env::var(PDF_FONT_ENV) {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => self.pdf_font.clone(),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn set_workbook(&mut self, path: PathBuf) -> Result<()> {
        self.workbook = Some(path);
        self.save()
    }
}
