//! .xlsx 통합문서 저장소
//!
//! 읽기: calamine, 쓰기: rust_xlsxwriter.
//! 제목에 키워드(기본 "증빙자료")가 들어간 첫 시트를 대상으로 하고,
//! 없으면 첫 번째 시트를 대신 쓴다.
//! 저장 시 대상 시트는 통째로 바뀌고, 다른 시트는 값만 그대로 옮겨 적는다.

use super::{Grid, SheetStore};
use crate::error::{DashboardError, Result};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::NaiveTime;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct XlsxStore {
    path: PathBuf,
    sheet_keyword: String,
}

/// 대상 시트 선택 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetChoice {
    pub name: String,
    /// 키워드 시트가 없어서 첫 시트를 대신 고른 경우
    pub fallback: bool,
}

/// 키워드가 들어간 첫 시트, 없으면 첫 시트
pub fn select_sheet(names: &[String], keyword: &str) -> Option<SheetChoice> {
    if let Some(name) = names.iter().find(|name| name.contains(keyword)) {
        return Some(SheetChoice {
            name: name.clone(),
            fallback: false,
        });
    }
    names.first().map(|name| SheetChoice {
        name: name.clone(),
        fallback: true,
    })
}

impl XlsxStore {
    pub fn new(path: impl Into<PathBuf>, sheet_keyword: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet_keyword: sheet_keyword.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Xlsx<std::io::BufReader<std::fs::File>>> {
        if !self.path.exists() {
            return Err(DashboardError::FileNotFound(self.path.display().to_string()));
        }
        open_workbook(&self.path).map_err(|e: calamine::XlsxError| {
            DashboardError::WorkbookRead(format!("{}: {}", self.path.display(), e))
        })
    }

    /// 통합문서의 시트 이름 목록
    pub fn sheet_names(&self) -> Result<Vec<String>> {
        Ok(self.open()?.sheet_names())
    }

    /// 모든 시트를 (이름, 격자)로 읽는다
    fn read_all(&self) -> Result<Vec<(String, Grid)>> {
        let mut workbook = self.open()?;
        let names = workbook.sheet_names();

        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| DashboardError::WorkbookRead(format!("{}: {}", name, e)))?;
            sheets.push((name, range_to_grid(&range)));
        }
        Ok(sheets)
    }
}

impl SheetStore for XlsxStore {
    fn read_grid(&self) -> Result<Grid> {
        let mut workbook = self.open()?;
        let names = workbook.sheet_names();
        info!(sheets = ?names, "통합문서 안의 시트");

        let choice = select_sheet(&names, &self.sheet_keyword)
            .ok_or_else(|| DashboardError::NoWorksheet(self.path.display().to_string()))?;
        if choice.fallback {
            warn!(
                "'{}'라는 글자가 들어간 시트를 찾지 못해 첫 번째 시트('{}')를 대신 사용합니다",
                self.sheet_keyword, choice.name
            );
        }
        info!(sheet = %choice.name, "현재 사용 중인 시트");

        let range = workbook
            .worksheet_range(&choice.name)
            .map_err(|e| DashboardError::WorkbookRead(format!("{}: {}", choice.name, e)))?;
        Ok(range_to_grid(&range))
    }

    fn write_grid(&mut self, grid: &[Vec<String>]) -> Result<()> {
        // 기존 시트 목록 (파일이 없으면 대상 시트 하나만 만든다)
        let mut sheets = if self.path.exists() {
            self.read_all()?
        } else {
            Vec::new()
        };

        let names: Vec<String> = sheets.iter().map(|(name, _)| name.clone()).collect();
        match select_sheet(&names, &self.sheet_keyword) {
            Some(choice) => {
                if let Some(sheet) = sheets.iter_mut().find(|(name, _)| *name == choice.name) {
                    sheet.1 = grid.to_vec();
                }
            }
            None => sheets.push((self.sheet_keyword.clone(), grid.to_vec())),
        }

        let mut workbook = Workbook::new();
        for (name, rows) in &sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name)?;
            for (r, row) in rows.iter().enumerate() {
                for (c, value) in row.iter().enumerate() {
                    if value.is_empty() {
                        continue;
                    }
                    worksheet.write_string(r as u32, c as u16, value)?;
                }
            }
        }

        // 임시 파일에 다 쓴 다음 교체 (중간 실패 시 원본 유지)
        let temp_path = self.path.with_extension("xlsx.tmp");
        workbook.save(&temp_path)?;
        std::fs::rename(&temp_path, &self.path)?;

        info!(path = %self.path.display(), rows = grid.len(), "통합문서 저장");
        Ok(())
    }
}

/// calamine 범위를 A1부터 시작하는 텍스트 격자로 (끝의 빈 행은 버림)
fn range_to_grid(range: &Range<Data>) -> Grid {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut grid: Grid = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_text));
        grid.push(cells);
    }

    while grid
        .last()
        .is_some_and(|row| row.iter().all(|cell| cell.trim().is_empty()))
    {
        grid.pop();
    }
    grid
}

/// 셀 값을 시트에 보이는 텍스트로
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if datetime.time() == NaiveTime::MIN => {
                datetime.format("%Y-%m-%d").to_string()
            }
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        // #N/A 등 수식 오류는 빈 칸으로
        Data::Error(_) => String::new(),
    }
}
