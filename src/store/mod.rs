//! 시트 저장소
//!
//! 핵심 로직은 "텍스트 격자를 읽고, 텍스트 격자를 쓴다"만 안다.
//! - `XlsxStore`: 로컬 .xlsx 통합문서 (calamine 읽기 / rust_xlsxwriter 쓰기)
//! - `MemoryStore`: 메모리 격자 (테스트용)
//! - `CachedStore`: 읽기 결과를 TTL 동안 보관, 저장 후 즉시 무효화

pub mod cache;
pub mod memory;
pub mod xlsx;

pub use cache::{CachedStore, Clock, ManualClock, SystemClock, TableCache};
pub use memory::MemoryStore;
pub use xlsx::XlsxStore;

use crate::error::Result;

/// 0행 = 헤더, 이후 데이터 행 (길이가 달라도 됨)
pub type Grid = Vec<Vec<String>>;

/// 시트 한 장을 통째로 읽고 쓰는 저장소
pub trait SheetStore {
    /// 대상 시트 전체를 읽는다
    fn read_grid(&self) -> Result<Grid>;

    /// 대상 시트 내용을 통째로 바꾼다 (전부 성공하거나 아무것도 바뀌지 않음)
    fn write_grid(&mut self, grid: &[Vec<String>]) -> Result<()>;
}
