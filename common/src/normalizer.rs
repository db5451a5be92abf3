//! 행 정규화 모듈
//!
//! 시트에서 읽은 텍스트 격자(0행 = 헤더)를 `EvidenceTable`로 바꾼다.
//!
//! ## 처리 흐름
//! 1. 헤더의 빈칸/중복 이름 정리 (`col_N`, `이름_N`)
//! 2. `Unnamed`로 시작하는 열 제거
//! 3. 없는 수정 가능 열은 빈 값으로 추가
//! 4. 진행률은 0~100 정수, 마감일은 날짜 또는 없음
//!
//! 셀 값이 이상해도 오류를 내지 않고 기본값으로 떨어진다.

use crate::types::*;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// 헤더 이름 정리
///
/// - 빈 헤더(위치 i) → `col_{i+1}`
/// - 같은 이름의 k번째(k ≥ 2) 등장 → `이름_{k}`
/// - 만든 이름이 이미 쓰였으면 k를 올려 비어 있는 이름을 찾는다
pub fn disambiguate_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();

    raw.iter()
        .enumerate()
        .map(|(idx, header)| {
            let mut name = header.trim().to_string();
            if name.is_empty() {
                name = format!("col_{}", idx + 1);
            }

            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;

            let mut k = *count;
            let mut unique = if k > 1 { format!("{}_{}", name, k) } else { name.clone() };
            while used.contains(&unique) {
                k = k.max(1) + 1;
                unique = format!("{}_{}", name, k);
            }
            used.insert(unique.clone());
            unique
        })
        .collect()
}

/// 진행률 파싱: 정수 → 실수(버림) 순으로 시도, 실패 시 0, 0~100으로 자름
pub fn parse_progress(raw: &str) -> u8 {
    let text = raw.trim();

    if let Ok(value) = text.parse::<i64>() {
        return value.clamp(0, 100) as u8;
    }

    match text.parse::<f64>() {
        Ok(value) if !value.is_nan() => value.clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

/// 마감일 파싱
///
/// 지원 형식: `2025-03-10`, `2025/3/10`, `2025.03.10`, `2025. 3. 10.`,
/// `2025년 3월 10일`, `20250310`, 뒤에 시각이 붙은 형태(날짜만 사용).
/// 해석할 수 없으면 `None` (마감일 없음).
pub fn parse_deadline(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    lazy_static::lazy_static! {
        // 연-월-일 (구분자 - / . 또는 년/월/일, 뒤에 시각 허용)
        static ref YMD_RE: Regex = Regex::new(
            r"^(\d{4})\s*(?:[-/.]|년)\s*(\d{1,2})\s*(?:[-/.]|월)\s*(\d{1,2})\s*(?:\.|일)?(?:[\sT].*)?$"
        ).unwrap();
        // 20250310
        static ref COMPACT_RE: Regex = Regex::new(r"^(\d{4})(\d{2})(\d{2})$").unwrap();
    }

    let caps = YMD_RE
        .captures(text)
        .or_else(|| COMPACT_RE.captures(text))?;

    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// 텍스트 격자를 정규화
///
/// 빈 격자 또는 헤더만 있는 격자는 빈 테이블이 된다.
/// 데이터 행의 길이가 헤더보다 짧으면 나머지는 빈 값, 길면 무시한다.
pub fn normalize_grid(grid: &[Vec<String>]) -> EvidenceTable {
    let Some((raw_header, data_rows)) = grid.split_first() else {
        return EvidenceTable::default();
    };

    let header = disambiguate_headers(raw_header);

    // 엑셀 잔재 열 제거 (원래 위치는 기억)
    let kept: Vec<(usize, &str)> = header
        .iter()
        .enumerate()
        .filter(|(_, name)| !name.starts_with("Unnamed"))
        .map(|(idx, name)| (idx, name.as_str()))
        .collect();

    let mut columns: Vec<String> = kept.iter().map(|(_, name)| name.to_string()).collect();
    for column in EDITABLE_COLUMNS {
        if !columns.iter().any(|c| c == column) {
            columns.push(column.to_string());
        }
    }

    let items = data_rows
        .iter()
        .enumerate()
        .map(|(row_id, row)| {
            let cells: Vec<(&str, &str)> = kept
                .iter()
                .map(|&(idx, name)| (name, row.get(idx).map(String::as_str).unwrap_or("")))
                .collect();
            build_item(row_id, &cells)
        })
        .collect();

    EvidenceTable { columns, items }
}

/// (열 이름, 셀 값) 목록에서 한 행을 만든다
fn build_item(row_id: usize, cells: &[(&str, &str)]) -> EvidenceItem {
    let mut item = EvidenceItem {
        row_id,
        ..Default::default()
    };

    for &(column, raw) in cells {
        let value = raw.trim().to_string();
        match column {
            COL_AREA => item.area = value,
            COL_CRITERION => item.criterion = value,
            COL_DEPARTMENT => item.department = value,
            COL_REQUIRED_DOCUMENTS => item.required_documents = value,
            COL_REPORT_SUMMARY => item.report_summary = value,
            COL_EXAMPLE_SUBMISSION => item.example_submission = value,
            COL_OWNER => item.owner = value,
            COL_STATUS => item.status = value,
            COL_PROGRESS => item.progress = parse_progress(&value),
            COL_LINK => item.link = value,
            COL_DEADLINE => item.deadline = parse_deadline(&value),
            COL_NOTES => item.notes = value,
            other => {
                item.extra.insert(other.to_string(), value);
            }
        }
    }

    item
}

/// 테이블을 저장용 텍스트 격자로 되돌린다 (헤더 포함, 전체 덮어쓰기용)
pub fn to_grid(table: &EvidenceTable) -> Vec<Vec<String>> {
    if table.columns.is_empty() {
        return Vec::new();
    }

    let mut grid = Vec::with_capacity(table.len() + 1);
    grid.push(table.columns.clone());

    for item in &table.items {
        let row = table
            .columns
            .iter()
            .map(|column| item.field(column).unwrap_or_default())
            .collect();
        grid.push(row);
    }

    grid
}
