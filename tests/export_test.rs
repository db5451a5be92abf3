//! 보고서 텍스트/PDF 출력 통합 테스트

use chrono::NaiveDate;
use evidence_common::{classify_all, compose_report, normalize_grid, render_text, EvidenceTable, ReportOptions};
use evidence_dashboard::cli::{ExportFormat, FilterArgs};
use evidence_dashboard::export::{self, pdf, ExportSettings};
use tempfile::tempdir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
}

/// 담당자 n명, 마감 임박 항목이 섞인 테이블
fn create_test_table(count: usize) -> EvidenceTable {
    let mut grid = vec![["평가영역", "평가준거", "보고서 주요내용", "담당자", "진행률", "마감일"]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()];

    for i in 0..count {
        grid.push(vec![
            format!("{}. 영역", i % 4 + 1),
            format!("{}.{}", i % 4 + 1, i),
            format!("테스트 증빙자료 {}", i),
            if i % 5 == 0 { String::new() } else { format!("담당{}", i) },
            format!("{}", (i * 13) % 101),
            format!("2025-03-{:02}", i % 28 + 1),
        ]);
    }
    normalize_grid(&grid)
}

#[test]
fn test_export_both_formats() {
    let dir = tempdir().expect("임시 디렉터리 생성 실패");
    let table = create_test_table(10);
    let rows = classify_all(&table.items, today());

    let written = export::export_report(&rows, &ExportFormat::Both, dir.path(), &ExportSettings::new(today())).unwrap();

    assert_eq!(
        written,
        vec![
            dir.path().join("증빙자료_현황보고서_20250305.txt"),
            dir.path().join("증빙자료_현황보고서_20250305.pdf"),
        ]
    );

    let text = std::fs::read_to_string(&written[0]).unwrap();
    assert!(text.starts_with("대학 인증 증빙자료 준비 현황 보고서"));
    assert!(text.contains("■ 1. 요약"));
    assert!(text.contains("전체 항목: 10건"));
    assert!(text.contains("미지정"));
    assert!(text.contains("2025년 03월 05일"));

    let pdf_bytes = std::fs::read(&written[1]).unwrap();
    assert!(pdf_bytes.starts_with(b"%PDF"));
}

#[test]
fn test_export_text_only_into_new_dir() {
    let dir = tempdir().expect("임시 디렉터리 생성 실패");
    let output = dir.path().join("reports");
    let table = create_test_table(3);
    let rows = classify_all(&table.items, today());

    let written = export::export_report(&rows, &ExportFormat::Text, &output, &ExportSettings::new(today())).unwrap();

    assert_eq!(written.len(), 1);
    assert!(written[0].exists());
    assert_eq!(written[0].extension().unwrap(), "txt");
}

#[test]
fn test_export_empty_rows() {
    let dir = tempdir().expect("임시 디렉터리 생성 실패");
    let written = export::export_report(&[], &ExportFormat::Text, dir.path(), &ExportSettings::new(today())).unwrap();

    let text = std::fs::read_to_string(&written[0]).unwrap();
    assert!(text.contains("전체 항목: 0건"));
    assert!(text.contains("제출완료: 0건 (0.0%)"));
    assert!(text.contains("해당 항목 없음"));
}

#[test]
fn test_pdf_spans_pages() {
    let dir = tempdir().expect("임시 디렉터리 생성 실패");
    let table = create_test_table(150);
    let rows = classify_all(&table.items, today());
    let report = compose_report(&rows, &ReportOptions::pdf(today()));

    let path = dir.path().join("long.pdf");
    let pages = pdf::generate_pdf(&report, &path, None).unwrap();

    assert!(pages > 1);
    assert!(path.exists());
}

#[test]
fn test_pdf_missing_font() {
    let dir = tempdir().expect("임시 디렉터리 생성 실패");
    let report = compose_report(&[], &ReportOptions::pdf(today()));
    let result = pdf::generate_pdf(&report, &dir.path().join("x.pdf"), Some(&dir.path().join("none.ttf")));
    assert!(result.is_err());
}

/// 마감 임박 35건 뒤 맨 아래에 마감 지난 1건
fn create_capped_table() -> EvidenceTable {
    let mut grid = vec![["평가영역", "평가준거", "보고서 주요내용", "담당자", "진행률", "마감일"]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()];

    for i in 0..35 {
        grid.push(vec![
            "1. 영역".to_string(),
            format!("1.{}", i),
            format!("임박 증빙 {}", i),
            "김".to_string(),
            "50".to_string(),
            "2025-03-08".to_string(),
        ]);
    }
    grid.push(
        ["2. 영역", "2.1", "마감 지난 증빙", "이", "50", "2025-02-20"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    normalize_grid(&grid)
}

#[test]
fn test_capped_report_keeps_overdue_row_with_risk_first() {
    let table = create_capped_table();
    let classified = classify_all(&table.items, today());

    // 시트 순서 그대로면 30건 제한에 걸려 빠진다
    let plain = FilterArgs::default().select(&classified);
    let text = render_text(&compose_report(&plain, &ReportOptions::text(today())));
    assert!(!text.contains("마감 지난 증빙"));

    let filter = FilterArgs {
        risk_first: true,
        ..Default::default()
    };
    let sorted = filter.select(&classified);
    assert_eq!(sorted[0].item.title(), "마감 지난 증빙");

    let text = render_text(&compose_report(&sorted, &ReportOptions::text(today())));
    assert!(text.contains("마감 지난 증빙"));
    assert!(text.contains("… 외 6건 생략"));
}
