//! 증빙자료 항목 타입 정의
//!
//! CLI와 저장소 계층이 공유하는 타입:
//! - EvidenceItem: 시트 한 행을 정규화한 결과
//! - EvidenceTable: 한 번 불러온 전체 행 집합 (열 순서 포함)
//! - StatusKind: 진행상태 자유 텍스트의 닫힌 분류
//! - Indicator / ClassifiedItem: 표시등과 표시등이 붙은 행

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================
// 열 이름
// ============================================

pub const COL_AREA: &str = "평가영역";
pub const COL_CRITERION: &str = "평가준거";
pub const COL_DEPARTMENT: &str = "주무부처";
pub const COL_REQUIRED_DOCUMENTS: &str = "구비서류";
pub const COL_REPORT_SUMMARY: &str = "보고서 주요내용";
pub const COL_EXAMPLE_SUBMISSION: &str = "제출자료(예시)";
pub const COL_OWNER: &str = "담당자";
pub const COL_STATUS: &str = "진행상태";
pub const COL_PROGRESS: &str = "진행률";
pub const COL_LINK: &str = "자료링크";
pub const COL_DEADLINE: &str = "마감일";
pub const COL_NOTES: &str = "비고";

/// 대시보드에서 수정 가능한 열 (시트에 없으면 빈 값으로 추가된다)
pub const EDITABLE_COLUMNS: &[&str] = &[
    COL_OWNER,
    COL_STATUS,
    COL_PROGRESS,
    COL_LINK,
    COL_DEADLINE,
    COL_NOTES,
];

/// 읽기 전용 설명 열
pub const DESCRIPTIVE_COLUMNS: &[&str] = &[
    COL_AREA,
    COL_CRITERION,
    COL_DEPARTMENT,
    COL_REQUIRED_DOCUMENTS,
    COL_REPORT_SUMMARY,
    COL_EXAMPLE_SUBMISSION,
];

/// 담당자가 비어 있는 행의 그룹 이름
pub const UNASSIGNED_LABEL: &str = "미지정";

/// 진행상태 입력 시 권장 선택지
pub const STATUS_OPTIONS: &[&str] = &["미착수", "진행중", "완료", "보류", "지연"];

// ============================================
// 진행상태 분류
// ============================================

/// 진행상태 텍스트의 분류
///
/// 규칙 엔진은 원문 문자열 대신 이 값만 본다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// 중단
    Halted,
    /// 이슈
    Issue,
    /// 문제
    Problem,
    /// 보류
    OnHold,
    /// 지연
    Delayed,
    /// 늦음
    Late,
    /// 그 밖의 모든 텍스트 (빈 값 포함)
    Other,
}

impl StatusKind {
    /// 원문 진행상태를 분류 (앞뒤 공백 무시, 완전 일치)
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "중단" => StatusKind::Halted,
            "이슈" => StatusKind::Issue,
            "문제" => StatusKind::Problem,
            "보류" => StatusKind::OnHold,
            "지연" => StatusKind::Delayed,
            "늦음" => StatusKind::Late,
            _ => StatusKind::Other,
        }
    }

    /// 위험 상태 (중단/이슈/문제/보류)
    pub fn is_danger(self) -> bool {
        matches!(
            self,
            StatusKind::Halted | StatusKind::Issue | StatusKind::Problem | StatusKind::OnHold
        )
    }

    /// 주의 상태 (지연/늦음)
    pub fn is_warning(self) -> bool {
        matches!(self, StatusKind::Delayed | StatusKind::Late)
    }
}

// ============================================
// 표시등
// ============================================

/// 표시등 (빨/노/파)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Risk,
    Warning,
    Ok,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::Risk, Indicator::Warning, Indicator::Ok];

    pub fn glyph(self) -> &'static str {
        match self {
            Indicator::Risk => "🔴",
            Indicator::Warning => "🟡",
            Indicator::Ok => "🔵",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Indicator::Risk => "위험",
            Indicator::Warning => "주의",
            Indicator::Ok => "정상",
        }
    }

    /// 위험 우선 정렬 순위 (작을수록 앞)
    pub fn rank(self) -> u8 {
        match self {
            Indicator::Risk => 0,
            Indicator::Warning => 1,
            Indicator::Ok => 2,
        }
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl std::str::FromStr for Indicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "risk" | "red" | "위험" | "🔴" => Ok(Indicator::Risk),
            "warning" | "yellow" | "주의" | "🟡" => Ok(Indicator::Warning),
            "ok" | "blue" | "정상" | "🔵" => Ok(Indicator::Ok),
            _ => Err(format!("Unknown indicator: {}. Use risk, warning, or ok", s)),
        }
    }
}

// ============================================
// 행 / 테이블
// ============================================

/// 증빙자료 한 행
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// 불러올 때 정해지는 행 번호 (헤더 다음 행이 0)
    pub row_id: usize,

    pub area: String,               // 평가영역
    pub criterion: String,          // 평가준거
    pub department: String,         // 주무부처
    pub required_documents: String, // 구비서류
    pub report_summary: String,     // 보고서 주요내용
    pub example_submission: String, // 제출자료(예시)

    pub owner: String,  // 담당자
    pub status: String, // 진행상태
    /// 0~100
    pub progress: u8,
    pub deadline: Option<NaiveDate>,
    pub link: String,  // 자료링크
    pub notes: String, // 비고

    /// 위에 없는 열 (열 이름 → 값), 저장 시 그대로 되돌려 쓴다
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl EvidenceItem {
    pub fn status_kind(&self) -> StatusKind {
        StatusKind::from_raw(&self.status)
    }

    pub fn is_done(&self) -> bool {
        self.progress >= 100
    }

    pub fn is_unassigned(&self) -> bool {
        self.owner.trim().is_empty()
    }

    /// 담당자 칸을 쉼표/슬래시로 나눈 이름 목록
    pub fn owner_names(&self) -> Vec<&str> {
        self.owner
            .split([',', '/'])
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// 담당자 그룹 키 (칸 원문 그대로, 비어 있으면 미지정)
    pub fn owner_group(&self) -> &str {
        if self.is_unassigned() {
            UNASSIGNED_LABEL
        } else {
            &self.owner
        }
    }

    /// 보고서 제목: 보고서 주요내용, 비어 있으면 제출자료(예시)
    pub fn title(&self) -> &str {
        if self.report_summary.trim().is_empty() {
            self.example_submission.trim()
        } else {
            self.report_summary.trim()
        }
    }

    /// 마감일 경과 + 미완료
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        matches!(self.deadline, Some(due) if due < today) && !self.is_done()
    }

    /// 오늘부터 7일 이내 마감 + 미완료
    pub fn is_due_soon(&self, today: NaiveDate) -> bool {
        match self.deadline {
            Some(due) => {
                let days = (due - today).num_days();
                (0..=DUE_SOON_DAYS).contains(&days) && !self.is_done()
            }
            None => false,
        }
    }

    /// 열 이름으로 값을 텍스트로 읽기
    pub fn field(&self, column: &str) -> Option<String> {
        let value = match column {
            COL_AREA => self.area.clone(),
            COL_CRITERION => self.criterion.clone(),
            COL_DEPARTMENT => self.department.clone(),
            COL_REQUIRED_DOCUMENTS => self.required_documents.clone(),
            COL_REPORT_SUMMARY => self.report_summary.clone(),
            COL_EXAMPLE_SUBMISSION => self.example_submission.clone(),
            COL_OWNER => self.owner.clone(),
            COL_STATUS => self.status.clone(),
            COL_PROGRESS => self.progress.to_string(),
            COL_LINK => self.link.clone(),
            COL_DEADLINE => format_date(self.deadline),
            COL_NOTES => self.notes.clone(),
            other => return self.extra.get(other).cloned(),
        };
        Some(value)
    }
}

/// 임박 기준 일수 (오늘 포함 7일 후까지)
pub const DUE_SOON_DAYS: i64 = 7;

/// 날짜를 `YYYY-MM-DD`로, 없으면 빈 문자열
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// 한 번 불러온 시트 전체
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvidenceTable {
    /// 저장 시 헤더로 쓰일 열 이름 (중복/빈칸 정리 후)
    pub columns: Vec<String>,
    pub items: Vec<EvidenceItem>,
}

impl EvidenceTable {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn get(&self, row_id: usize) -> Option<&EvidenceItem> {
        self.items.iter().find(|item| item.row_id == row_id)
    }

    pub fn get_mut(&mut self, row_id: usize) -> Option<&mut EvidenceItem> {
        self.items.iter_mut().find(|item| item.row_id == row_id)
    }
}

/// 표시등이 계산된 행 (원본 행을 빌려 쓴다)
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedItem<'a> {
    pub item: &'a EvidenceItem,
    pub indicator: Indicator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_kind_mapping() {
        assert_eq!(StatusKind::from_raw(" 보류 "), StatusKind::OnHold);
        assert_eq!(StatusKind::from_raw("늦음"), StatusKind::Late);
        assert_eq!(StatusKind::from_raw("진행중"), StatusKind::Other);
        assert_eq!(StatusKind::from_raw(""), StatusKind::Other);
        assert!(StatusKind::Issue.is_danger());
        assert!(!StatusKind::Delayed.is_danger());
        assert!(StatusKind::Delayed.is_warning());
    }

    #[test]
    fn test_owner_names_split() {
        let item = EvidenceItem {
            owner: "김철수, 이영희/ 박민수 ,".into(),
            ..Default::default()
        };
        assert_eq!(item.owner_names(), vec!["김철수", "이영희", "박민수"]);
    }

    #[test]
    fn test_owner_group_unassigned() {
        let item = EvidenceItem { owner: "  ".into(), ..Default::default() };
        assert_eq!(item.owner_group(), UNASSIGNED_LABEL);

        let item = EvidenceItem { owner: "김, 이".into(), ..Default::default() };
        assert_eq!(item.owner_group(), "김, 이");
    }

    #[test]
    fn test_title_fallback() {
        let item = EvidenceItem {
            report_summary: " ".into(),
            example_submission: "학사운영 규정".into(),
            ..Default::default()
        };
        assert_eq!(item.title(), "학사운영 규정");
    }

    #[test]
    fn test_indicator_parse() {
        assert_eq!("RISK".parse::<Indicator>(), Ok(Indicator::Risk));
        assert_eq!("주의".parse::<Indicator>(), Ok(Indicator::Warning));
        assert_eq!("🔵".parse::<Indicator>(), Ok(Indicator::Ok));
        assert!("purple".parse::<Indicator>().is_err());
    }

    #[test]
    fn test_due_windows() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut item = EvidenceItem {
            owner: "김".into(),
            progress: 50,
            deadline: NaiveDate::from_ymd_opt(2025, 3, 17),
            ..Default::default()
        };
        assert!(item.is_due_soon(today));
        assert!(!item.is_overdue(today));

        item.deadline = NaiveDate::from_ymd_opt(2025, 3, 9);
        assert!(item.is_overdue(today));
        assert!(!item.is_due_soon(today));

        item.progress = 100;
        assert!(!item.is_overdue(today));
    }

    #[test]
    fn test_extra_columns_serialize_in_name_order() {
        let mut item = EvidenceItem::default();
        for key in ["하", "나", "가"] {
            item.extra.insert(key.into(), key.into());
        }

        let json = serde_json::to_string(&item).unwrap();
        let positions: Vec<usize> = ["\"가\"", "\"나\"", "\"하\""]
            .iter()
            .map(|key| json.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
