use super::{Grid, SheetStore};
use crate::error::{DashboardError, Result};
use std::cell::Cell;

/// 메모리 격자 저장소
#[derive(Debug, Default)]
pub struct MemoryStore {
    grid: Grid,
    reads: Cell<usize>,
    writes: usize,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            ..Default::default()
        }
    }

    /// 연결 실패를 흉내 낸다 (읽기/쓰기 모두 오류)
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// 시트를 다른 사용자가 바꾼 것처럼 직접 교체
    pub fn replace(&mut self, grid: Grid) {
        self.grid = grid;
    }

    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl SheetStore for MemoryStore {
    fn read_grid(&self) -> Result<Grid> {
        if self.unavailable {
            return Err(DashboardError::WorkbookRead("저장소에 연결할 수 없습니다".into()));
        }
        self.reads.set(self.reads.get() + 1);
        Ok(self.grid.clone())
    }

    fn write_grid(&mut self, grid: &[Vec<String>]) -> Result<()> {
        if self.unavailable {
            return Err(DashboardError::WorkbookWrite("저장소에 연결할 수 없습니다".into()));
        }
        self.writes += 1;
        self.grid = grid.to_vec();
        Ok(())
    }
}
