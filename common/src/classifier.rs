//! 표시등 규칙
//!
//! 🔴 위험:
//!   1. 마감일 지났고 진행률 < 100
//!   2. 담당자 없음
//!   3. 진행상태 ∈ {중단, 이슈, 문제, 보류}
//!   4. 진행률 <= 30
//!
//! 🟡 주의:
//!   5. 마감일까지 0~7일 남았고 진행률 < 100
//!   6. 30 < 진행률 <= 70
//!   7. 진행상태 ∈ {지연, 늦음}
//!
//! 🔵 정상: 위 조건에 하나도 해당하지 않음
//!
//! 위에서부터 순서대로 보고 처음 맞는 규칙에서 끝난다.
//! 예: 진행률 25 + 지연 → 규칙 4에서 위험 (규칙 7까지 가지 않음).

use crate::types::{ClassifiedItem, EvidenceItem, Indicator, DUE_SOON_DAYS};
use chrono::NaiveDate;

/// 한 행의 표시등 계산
pub fn classify(item: &EvidenceItem, today: NaiveDate) -> Indicator {
    let progress = item.progress;
    let status = item.status_kind();
    let days_left = item.deadline.map(|due| (due - today).num_days());

    // 1) 마감일 지남 + 미완료
    if matches!(days_left, Some(days) if days < 0) && progress < 100 {
        return Indicator::Risk;
    }

    // 2) 담당자 없음
    if item.is_unassigned() {
        return Indicator::Risk;
    }

    // 3) 중단/이슈/문제/보류
    if status.is_danger() {
        return Indicator::Risk;
    }

    // 4) 진행률 매우 낮음
    if progress <= 30 {
        return Indicator::Risk;
    }

    // 5) 마감 임박 + 미완료
    if matches!(days_left, Some(days) if (0..=DUE_SOON_DAYS).contains(&days)) && progress < 100 {
        return Indicator::Warning;
    }

    // 6) 진행률 중간
    if progress > 30 && progress <= 70 {
        return Indicator::Warning;
    }

    // 7) 지연/늦음
    if status.is_warning() {
        return Indicator::Warning;
    }

    Indicator::Ok
}

/// 모든 행에 표시등을 붙인다 (행 순서 유지)
pub fn classify_all(items: &[EvidenceItem], today: NaiveDate) -> Vec<ClassifiedItem<'_>> {
    items
        .iter()
        .map(|item| ClassifiedItem {
            item,
            indicator: classify(item, today),
        })
        .collect()
}
