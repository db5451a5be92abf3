pub mod pdf;
pub mod text;

use crate::cli::ExportFormat;
use crate::error::Result;
use chrono::NaiveDate;
use evidence_common::report::{DEFAULT_AUTHOR_LABEL, DEFAULT_DEPARTMENT_LABEL};
use evidence_common::{compose_report, ClassifiedItem, ReportOptions};
use std::path::{Path, PathBuf};

pub const TEXT_MIME: &str = "text/plain; charset=utf-8";
pub const PDF_MIME: &str = "application/pdf";

/// 보고서 내보내기 설정
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub report_date: NaiveDate,
    pub author_label: String,
    pub department_label: String,
    /// 한글 TTF 글꼴
    pub pdf_font: Option<PathBuf>,
}

impl ExportSettings {
    pub fn new(report_date: NaiveDate) -> Self {
        Self {
            report_date,
            author_label: DEFAULT_AUTHOR_LABEL.into(),
            department_label: DEFAULT_DEPARTMENT_LABEL.into(),
            pdf_font: None,
        }
    }
}

/// `증빙자료_현황보고서_{YYYYMMDD}.{ext}`
pub fn report_file_name(date: NaiveDate, extension: &str) -> String {
    format!("증빙자료_현황보고서_{}.{}", date.format("%Y%m%d"), extension)
}

pub fn mime_type(extension: &str) -> &'static str {
    match extension {
        "pdf" => PDF_MIME,
        _ => TEXT_MIME,
    }
}

fn output_path_for_format(output: &Path, date: NaiveDate, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(report_file_name(date, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path, date: NaiveDate) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        (
            output.join(report_file_name(date, "txt")),
            output.join(report_file_name(date, "pdf")),
        )
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("증빙자료_현황보고서");
        (
            parent.join(format!("{}.txt", stem)),
            parent.join(format!("{}.pdf", stem)),
        )
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// 보고서를 만들어 파일로 저장, 만든 파일 경로를 돌려준다
pub fn export_report(
    rows: &[ClassifiedItem<'_>],
    format: &ExportFormat,
    output: &Path,
    settings: &ExportSettings,
) -> Result<Vec<PathBuf>> {
    let text_options = ReportOptions::text(settings.report_date)
        .with_labels(&settings.author_label, &settings.department_label);
    let pdf_options = ReportOptions::pdf(settings.report_date)
        .with_labels(&settings.author_label, &settings.department_label);

    let (text_path, pdf_path) = match format {
        ExportFormat::Text => (Some(output_path_for_format(output, settings.report_date, "txt")), None),
        ExportFormat::Pdf => (None, Some(output_path_for_format(output, settings.report_date, "pdf"))),
        ExportFormat::Both => {
            let (text_path, pdf_path) = output_paths_for_both(output, settings.report_date);
            (Some(text_path), Some(pdf_path))
        }
    };

    let mut written = Vec::new();

    if let Some(path) = text_path {
        ensure_parent(&path)?;
        println!("- 텍스트 보고서 생성 중...");
        let report = compose_report(rows, &text_options);
        text::generate_text(&report, &path)?;
        println!("✔ 텍스트 출력: {} ({})", path.display(), TEXT_MIME);
        written.push(path);
    }

    if let Some(path) = pdf_path {
        ensure_parent(&path)?;
        println!("- PDF 생성 중...");
        let report = compose_report(rows, &pdf_options);
        let pages = pdf::generate_pdf(&report, &path, settings.pdf_font.as_deref())?;
        println!("✔ PDF 출력: {} ({}쪽, {})", path.display(), pages, PDF_MIME);
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name(date(), "txt"), "증빙자료_현황보고서_20250309.txt");
        assert_eq!(report_file_name(date(), "pdf"), "증빙자료_현황보고서_20250309.pdf");
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type("txt"), "text/plain; charset=utf-8");
        assert_eq!(mime_type("pdf"), "application/pdf");
    }

    #[test]
    fn test_output_path_for_file() {
        let path = output_path_for_format(Path::new("out/report.txt"), date(), "txt");
        assert_eq!(path, PathBuf::from("out/report.txt"));

        let (text, pdf) = output_paths_for_both(Path::new("out/report.txt"), date());
        assert_eq!(text, PathBuf::from("out/report.txt"));
        assert_eq!(pdf, PathBuf::from("out/report.pdf"));
    }

    #[test]
    fn test_output_path_for_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path_for_format(dir.path(), date(), "pdf");
        assert_eq!(path, dir.path().join("증빙자료_현황보고서_20250309.pdf"));
    }
}
