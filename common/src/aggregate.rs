//! 필터링 / 정렬 / 집계
//!
//! 표시등이 붙은 행 목록에 대해:
//! - 평가영역·평가준거·주무부처·담당자·표시등 필터
//! - 위험 우선 정렬
//! - 요약 카드 수치, 영역별/담당자별 평균 진행률

use crate::types::{ClassifiedItem, EvidenceItem, Indicator, UNASSIGNED_LABEL};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// "전체" 선택을 뜻하는 값
pub const ALL_LABEL: &str = "전체";

// ============================================
// 필터
// ============================================

/// 담당자 필터 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnerMatch {
    /// 담당자 칸 원문과 완전 일치
    #[default]
    Exact,
    /// 담당자 칸을 쉼표/슬래시로 나눈 이름 중 하나와 일치
    Member,
}

impl std::str::FromStr for OwnerMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(OwnerMatch::Exact),
            "member" | "contains" => Ok(OwnerMatch::Member),
            _ => Err(format!("Unknown owner match: {}. Use exact or member", s)),
        }
    }
}

/// 행 필터 (`None`은 전체)
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    pub area: Option<String>,
    pub criterion: Option<String>,
    pub department: Option<String>,
    pub owner: Option<String>,
    pub owner_match: OwnerMatch,
    pub indicator: Option<Indicator>,
}

impl RowFilter {
    /// 선택값 정리: 빈 값, "전체", "all"은 `None`
    pub fn selection(value: Option<&str>) -> Option<String> {
        let value = value?.trim();
        if value.is_empty() || value == ALL_LABEL || value.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(value.to_string())
        }
    }

    pub fn matches(&self, row: &ClassifiedItem<'_>) -> bool {
        let item = row.item;

        if !matches_exact(&self.area, &item.area)
            || !matches_exact(&self.criterion, &item.criterion)
            || !matches_exact(&self.department, &item.department)
        {
            return false;
        }

        if let Some(owner) = &self.owner {
            let hit = match self.owner_match {
                // "미지정"은 담당자 칸이 빈 행
                _ if owner == UNASSIGNED_LABEL => item.is_unassigned(),
                OwnerMatch::Exact => item.owner == *owner,
                OwnerMatch::Member => item.owner_names().contains(&owner.as_str()),
            };
            if !hit {
                return false;
            }
        }

        match self.indicator {
            Some(indicator) => row.indicator == indicator,
            None => true,
        }
    }
}

fn matches_exact(selected: &Option<String>, value: &str) -> bool {
    selected.as_deref().map_or(true, |s| s == value)
}

/// 필터에 맞는 행만 남긴다 (순서 유지)
pub fn filter_items<'a>(items: &[ClassifiedItem<'a>], filter: &RowFilter) -> Vec<ClassifiedItem<'a>> {
    items.iter().filter(|row| filter.matches(row)).copied().collect()
}

/// 위험 우선 정렬
///
/// 1차: 표시등 (위험 → 주의 → 정상), 2차: 마감일 오름차순 (없으면 맨 뒤).
/// 같은 키끼리는 원래 순서를 유지한다.
pub fn sort_risk_first(items: &mut [ClassifiedItem<'_>]) {
    items.sort_by_key(|row| {
        (
            row.indicator.rank(),
            row.item.deadline.is_none(),
            row.item.deadline,
        )
    });
}

/// 필터 선택지 (값별 정렬, 빈 값 제외)
///
/// 담당자가 빈 행이 있으면 담당자 목록 끝에 "미지정"을 붙인다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChoices {
    pub areas: Vec<String>,
    pub criteria: Vec<String>,
    pub departments: Vec<String>,
    pub owners: Vec<String>,
}

pub fn filter_choices(items: &[EvidenceItem]) -> FilterChoices {
    fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
        values
            .filter(|v| !v.is_empty())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    let mut owners = distinct(items.iter().map(|i| &i.owner));
    owners.retain(|owner| !owner.trim().is_empty() && owner != UNASSIGNED_LABEL);
    if items.iter().any(EvidenceItem::is_unassigned) {
        owners.push(UNASSIGNED_LABEL.to_string());
    }

    FilterChoices {
        areas: distinct(items.iter().map(|i| &i.area)),
        criteria: distinct(items.iter().map(|i| &i.criterion)),
        departments: distinct(items.iter().map(|i| &i.department)),
        owners,
    }
}

// ============================================
// 요약
// ============================================

/// 요약 카드 수치
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total: usize,
    /// 진행률 100
    pub done: usize,
    pub risk: usize,
    pub warning: usize,
    pub ok: usize,
    /// 마감일 경과 + 미완료
    pub overdue: usize,
    /// 오늘~7일 후 마감 + 미완료
    pub due_soon: usize,
    pub mean_progress: f64,
}

impl Summary {
    /// 완료 비율 (%), 행이 없으면 0.0
    pub fn done_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 * 100.0 / self.total as f64
        }
    }

    pub fn count(&self, indicator: Indicator) -> usize {
        match indicator {
            Indicator::Risk => self.risk,
            Indicator::Warning => self.warning,
            Indicator::Ok => self.ok,
        }
    }
}

pub fn summarize(items: &[ClassifiedItem<'_>], today: NaiveDate) -> Summary {
    let mut summary = Summary {
        total: items.len(),
        ..Default::default()
    };

    for row in items {
        let item = row.item;
        if item.is_done() {
            summary.done += 1;
        }
        match row.indicator {
            Indicator::Risk => summary.risk += 1,
            Indicator::Warning => summary.warning += 1,
            Indicator::Ok => summary.ok += 1,
        }
        if item.is_overdue(today) {
            summary.overdue += 1;
        }
        if item.is_due_soon(today) {
            summary.due_soon += 1;
        }
    }

    summary.mean_progress = mean(items.iter().map(|row| row.item.progress));
    summary
}

/// 마감일 경과 또는 임박 행 (순서 유지)
pub fn urgent_items<'a>(items: &[ClassifiedItem<'a>], today: NaiveDate) -> Vec<ClassifiedItem<'a>> {
    items
        .iter()
        .filter(|row| row.item.is_overdue(today) || row.item.is_due_soon(today))
        .copied()
        .collect()
}

// ============================================
// 그룹별 통계
// ============================================

/// 평가영역별 평균 진행률
#[derive(Debug, Clone, PartialEq)]
pub struct AreaStat {
    pub area: String,
    pub count: usize,
    pub mean_progress: f64,
}

/// 담당자별 통계
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerStat {
    /// 담당자 칸 원문 (비어 있으면 미지정)
    pub owner: String,
    pub count: usize,
    pub completed: usize,
    pub mean_progress: f64,
}

/// 평가영역별 평균 진행률 (평균 내림차순, 같으면 이름순)
pub fn area_stats(items: &[ClassifiedItem<'_>]) -> Vec<AreaStat> {
    let mut groups: BTreeMap<&str, Vec<u8>> = BTreeMap::new();
    for row in items {
        groups.entry(row.item.area.as_str()).or_default().push(row.item.progress);
    }

    let mut stats: Vec<AreaStat> = groups
        .into_iter()
        .map(|(area, values)| AreaStat {
            area: area.to_string(),
            count: values.len(),
            mean_progress: mean(values.into_iter()),
        })
        .collect();

    stats.sort_by(|a, b| {
        b.mean_progress
            .total_cmp(&a.mean_progress)
            .then_with(|| a.area.cmp(&b.area))
    });
    stats
}

/// 담당자별 통계 (평균 내림차순, 같으면 이름순)
///
/// 여러 명이 적힌 칸도 나누지 않고 원문 그대로 한 그룹으로 센다.
pub fn owner_stats(items: &[ClassifiedItem<'_>]) -> Vec<OwnerStat> {
    let mut groups: BTreeMap<&str, Vec<&EvidenceItem>> = BTreeMap::new();
    for row in items {
        groups.entry(row.item.owner_group()).or_default().push(row.item);
    }

    let mut stats: Vec<OwnerStat> = groups
        .into_iter()
        .map(|(owner, members)| OwnerStat {
            owner: owner.to_string(),
            count: members.len(),
            completed: members.iter().filter(|i| i.is_done()).count(),
            mean_progress: mean(members.iter().map(|i| i.progress)),
        })
        .collect();

    stats.sort_by(|a, b| {
        b.mean_progress
            .total_cmp(&a.mean_progress)
            .then_with(|| a.owner.cmp(&b.owner))
    });
    stats
}

fn mean(values: impl Iterator<Item = u8>) -> f64 {
    let (sum, count) = values.fold((0u64, 0usize), |(sum, count), v| (sum + v as u64, count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// 소수 첫째 자리 퍼센트 표기
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}
