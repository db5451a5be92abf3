//! .xlsx 저장소 통합 테스트

use evidence_common::{classify, EditSession, FieldEdit, Indicator};
use evidence_dashboard::error::DashboardError;
use evidence_dashboard::store::{CachedStore, SheetStore, XlsxStore};
use chrono::NaiveDate;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

/// 요약 시트 + 증빙자료 시트가 있는 통합문서
fn write_workbook(path: &Path) {
    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet();
    summary.set_name("요약").unwrap();
    summary.write_string(0, 0, "메모").unwrap();
    summary.write_string(1, 0, "건드리지 말 것").unwrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name("2025 증빙자료").unwrap();
    let headers = ["평가영역", "평가준거", "보고서 주요내용", "담당자", "진행상태", "진행률", "마감일", "Unnamed: 7"];
    for (c, header) in headers.iter().enumerate() {
        sheet.write_string(0, c as u16, *header).unwrap();
    }

    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let deadline = ExcelDateTime::from_ymd(2025, 3, 10).unwrap();

    sheet.write_string(1, 0, "1. 대학이념").unwrap();
    sheet.write_string(1, 1, "1.1 발전계획").unwrap();
    sheet.write_string(1, 2, "발전계획 보고서").unwrap();
    sheet.write_string(1, 3, "김").unwrap();
    sheet.write_string(1, 4, "진행중").unwrap();
    sheet.write_number(1, 5, 80.0).unwrap();
    sheet.write_datetime_with_format(1, 6, &deadline, &date_format).unwrap();

    sheet.write_string(2, 0, "2. 교육").unwrap();
    sheet.write_string(2, 1, "2.1 교육과정").unwrap();
    sheet.write_number(2, 5, 12.5).unwrap();
    sheet.write_string(2, 6, "2025/04/01").unwrap();

    workbook.save(path).unwrap();
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
}

#[test]
fn test_read_keyword_sheet() {
    let dir = tempdir().expect("임시 디렉터리 생성 실패");
    let path = dir.path().join("증빙.xlsx");
    write_workbook(&path);

    let store = XlsxStore::new(&path, "증빙자료");
    assert_eq!(store.sheet_names().unwrap(), vec!["요약", "2025 증빙자료"]);

    let mut cached = CachedStore::new(store, Duration::from_secs(60));
    let table = cached.load().unwrap();

    assert_eq!(table.len(), 2);
    assert!(!table.has_column("Unnamed: 7"));
    assert!(table.has_column("비고"));

    let first = &table.items[0];
    assert_eq!(first.title(), "발전계획 보고서");
    assert_eq!(first.progress, 80);
    assert_eq!(first.deadline, NaiveDate::from_ymd_opt(2025, 3, 10));
    assert_eq!(classify(first, today()), Indicator::Warning);

    let second = &table.items[1];
    assert_eq!(second.progress, 12);
    assert_eq!(second.deadline, NaiveDate::from_ymd_opt(2025, 4, 1));
    assert_eq!(classify(second, today()), Indicator::Risk);
}

#[test]
fn test_save_replaces_target_and_keeps_other_sheets() {
    let dir = tempdir().expect("임시 디렉터리 생성 실패");
    let path = dir.path().join("증빙.xlsx");
    write_workbook(&path);

    let mut cached = CachedStore::new(XlsxStore::new(&path, "증빙자료"), Duration::from_secs(60));
    let mut table = cached.load().unwrap();

    let mut session = EditSession::new();
    session.stage(
        1,
        FieldEdit {
            owner: Some("이".into()),
            progress: Some(100),
            deadline: Some("2025-05-01".into()),
            ..Default::default()
        },
    );
    cached.commit(&mut table, &session).unwrap();

    let reloaded = cached.load().unwrap();
    assert_eq!(reloaded.items[1].owner, "이");
    assert_eq!(reloaded.items[1].progress, 100);
    assert_eq!(reloaded.items[1].deadline, NaiveDate::from_ymd_opt(2025, 5, 1));
    // 손대지 않은 행
    assert_eq!(reloaded.items[0].owner, "김");
    assert_eq!(reloaded.items[0].deadline, NaiveDate::from_ymd_opt(2025, 3, 10));

    let store = cached.store();
    assert_eq!(store.sheet_names().unwrap(), vec!["요약", "2025 증빙자료"]);
    assert!(!dir.path().join("증빙.xlsx.tmp").exists());

    let summary = XlsxStore::new(&path, "요약").read_grid().unwrap();
    assert_eq!(summary[1][0], "건드리지 말 것");
}

#[test]
fn test_fallback_to_first_sheet() {
    let dir = tempdir().expect("임시 디렉터리 생성 실패");
    let path = dir.path().join("other.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "평가영역").unwrap();
    sheet.write_string(1, 0, "A영역").unwrap();
    workbook.save(&path).unwrap();

    let grid = XlsxStore::new(&path, "증빙자료").read_grid().unwrap();
    assert_eq!(grid, vec![vec!["평가영역".to_string()], vec!["A영역".to_string()]]);
}

#[test]
fn test_missing_workbook() {
    let store = XlsxStore::new("/nonexistent/path/증빙.xlsx", "증빙자료");
    let err = store.read_grid().unwrap_err();
    assert!(matches!(err, DashboardError::FileNotFound(_)));
}

#[test]
fn test_header_only_sheet_is_empty_table() {
    let dir = tempdir().expect("임시 디렉터리 생성 실패");
    let path = dir.path().join("empty.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("증빙자료").unwrap();
    sheet.write_string(0, 0, "평가영역").unwrap();
    workbook.save(&path).unwrap();

    let mut cached = CachedStore::new(XlsxStore::new(&path, "증빙자료"), Duration::from_secs(60));
    assert!(cached.load().unwrap().is_empty());
}
