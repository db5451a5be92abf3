//! 시트 읽기 캐시
//!
//! 읽은 격자를 TTL 동안 보관해 같은 시트를 반복해서 읽지 않는다.
//! 저장이 성공하면 바로 무효화하므로 다음 읽기는 항상 새 내용을 본다.

use super::{Grid, SheetStore};
use crate::error::Result;
use evidence_common::{normalize_grid, to_grid, EditSession, EvidenceTable};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::debug;

/// 현재 시각 공급자
pub trait Clock {
    fn now(&self) -> Instant;
}

/// 실제 시계
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// 손으로 돌리는 시계 (복제본끼리 시각 공유)
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// TTL 캐시 한 칸
#[derive(Debug)]
pub struct TableCache<C: Clock> {
    ttl: Duration,
    clock: C,
    entry: Option<(Instant, Grid)>,
}

impl<C: Clock> TableCache<C> {
    pub fn new(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entry: None,
        }
    }

    /// 유효한 항목 (TTL이 지났으면 `None`)
    pub fn get(&self) -> Option<&Grid> {
        let (stored_at, grid) = self.entry.as_ref()?;
        if self.clock.now().duration_since(*stored_at) < self.ttl {
            Some(grid)
        } else {
            None
        }
    }

    pub fn put(&mut self, grid: Grid) {
        self.entry = Some((self.clock.now(), grid));
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

/// 캐시를 거치는 저장소
pub struct CachedStore<S: SheetStore, C: Clock = SystemClock> {
    store: S,
    cache: TableCache<C>,
}

impl<S: SheetStore> CachedStore<S, SystemClock> {
    pub fn new(store: S, ttl: Duration) -> Self {
        Self::with_clock(store, ttl, SystemClock)
    }
}

impl<S: SheetStore, C: Clock> CachedStore<S, C> {
    pub fn with_clock(store: S, ttl: Duration, clock: C) -> Self {
        Self {
            store,
            cache: TableCache::new(ttl, clock),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// 시트를 읽어 정규화 (캐시가 유효하면 캐시 사용)
    pub fn load(&mut self) -> Result<EvidenceTable> {
        if let Some(grid) = self.cache.get() {
            debug!("캐시된 시트 사용");
            return Ok(normalize_grid(grid));
        }

        let grid = self.store.read_grid()?;
        debug!(rows = grid.len(), "시트 읽기 완료");
        let table = normalize_grid(&grid);
        self.cache.put(grid);
        Ok(table)
    }

    /// 테이블 전체를 덮어쓰고 캐시 무효화
    pub fn save(&mut self, table: &EvidenceTable) -> Result<()> {
        let grid = to_grid(table);
        self.store.write_grid(&grid)?;
        self.cache.invalidate();
        debug!(rows = table.len(), "시트 저장 완료, 캐시 무효화");
        Ok(())
    }

    /// 모아 둔 수정 반영 후 저장, 반영한 행 수를 돌려준다
    pub fn commit(&mut self, table: &mut EvidenceTable, session: &EditSession) -> Result<usize> {
        let applied = session.apply(table)?;
        self.save(table)?;
        Ok(applied)
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}
