//! 현황 보고서 구성
//!
//! 필터/정렬이 끝난 행 목록으로 고정된 구조의 보고서를 만든다.
//! 같은 행 목록과 같은 보고일이면 항상 같은 결과가 나온다.
//!
//! 구성:
//! 1. 머리말 (제목, 보고일, 작성/소속)
//! 2. 요약
//! 3. 긴급 항목 (마감 경과 또는 7일 이내 마감)
//! 4. 평가영역별 평균 진행률
//! 5. 담당자별 현황
//! 6. 권고 사항, 서명란

use crate::aggregate::{area_stats, format_percent, owner_stats, summarize, urgent_items, Summary};
use crate::types::{format_date, ClassifiedItem, Indicator};
use chrono::NaiveDate;

pub const REPORT_TITLE: &str = "대학 인증 증빙자료 준비 현황 보고서";
pub const DEFAULT_AUTHOR_LABEL: &str = "증빙자료 TF";
pub const DEFAULT_DEPARTMENT_LABEL: &str = "대학인증 준비위원회";

/// 텍스트 보고서의 긴급 항목 최대 행 수
pub const TEXT_URGENT_LIMIT: usize = 30;
/// PDF 보고서의 긴급 항목 최대 행 수
pub const PDF_URGENT_LIMIT: usize = 20;

const TEXT_TITLE_CHARS: usize = 40;
const PDF_TITLE_CHARS: usize = 24;

const RECOMMENDATIONS: &[&str] = &[
    "1. 위험 항목은 담당자 지정과 일정 재조정을 우선 검토해 주십시오.",
    "2. 마감 7일 이내 항목은 주간 점검 회의에서 진행 상황을 확인해 주십시오.",
    "3. 진행률 70% 이하 항목은 주무부처의 추가 지원이 필요합니다.",
    "4. 제출이 끝난 자료는 자료링크 열에 최종본 위치를 기록해 주십시오.",
];

/// 보고서 옵션
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub report_date: NaiveDate,
    pub author_label: String,
    pub department_label: String,
    /// 긴급 항목 최대 행 수
    pub urgent_limit: usize,
    /// 긴급 항목 제목 최대 글자 수
    pub title_chars: usize,
    /// 표시등을 🔴🟡🔵로 쓸지 ([위험] 등 글자로 쓸지)
    pub use_glyphs: bool,
}

impl ReportOptions {
    pub fn text(report_date: NaiveDate) -> Self {
        Self {
            report_date,
            author_label: DEFAULT_AUTHOR_LABEL.into(),
            department_label: DEFAULT_DEPARTMENT_LABEL.into(),
            urgent_limit: TEXT_URGENT_LIMIT,
            title_chars: TEXT_TITLE_CHARS,
            use_glyphs: true,
        }
    }

    pub fn pdf(report_date: NaiveDate) -> Self {
        Self {
            urgent_limit: PDF_URGENT_LIMIT,
            title_chars: PDF_TITLE_CHARS,
            use_glyphs: false,
            ..Self::text(report_date)
        }
    }

    pub fn with_labels(mut self, author: &str, department: &str) -> Self {
        self.author_label = author.to_string();
        self.department_label = department.to_string();
        self
    }

    fn indicator_mark(&self, indicator: Indicator) -> String {
        if self.use_glyphs {
            format!("{} {}", indicator.glyph(), indicator.label())
        } else {
            format!("[{}]", indicator.label())
        }
    }
}

/// 보고서 한 절
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub heading: String,
    pub lines: Vec<String>,
}

/// 구성이 끝난 보고서
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub header: Vec<String>,
    pub sections: Vec<ReportSection>,
    pub signature: Vec<String>,
    pub summary: Summary,
}

/// 보고서 구성
pub fn compose_report(items: &[ClassifiedItem<'_>], options: &ReportOptions) -> Report {
    let today = options.report_date;
    let summary = summarize(items, today);

    let header = vec![
        format!("보고일: {}", today.format("%Y-%m-%d")),
        format!("작성: {}", options.author_label),
        format!("소속: {}", options.department_label),
    ];

    let sections = vec![
        ReportSection {
            heading: "1. 요약".into(),
            lines: summary_lines(&summary, options),
        },
        ReportSection {
            heading: "2. 긴급 항목 (마감 경과·7일 이내 마감)".into(),
            lines: urgent_lines(items, options),
        },
        ReportSection {
            heading: "3. 평가영역별 평균 진행률".into(),
            lines: area_lines(items),
        },
        ReportSection {
            heading: "4. 담당자별 현황".into(),
            lines: owner_lines(items),
        },
        ReportSection {
            heading: "5. 권고 사항".into(),
            lines: RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
        },
    ];

    let signature = vec![
        today.format("%Y년 %m월 %d일").to_string(),
        options.department_label.clone(),
        format!("{} (서명)", options.author_label),
    ];

    Report {
        title: REPORT_TITLE.into(),
        header,
        sections,
        signature,
        summary,
    }
}

fn summary_lines(summary: &Summary, options: &ReportOptions) -> Vec<String> {
    let breakdown = Indicator::ALL
        .iter()
        .map(|&indicator| format!("{} {}건", options.indicator_mark(indicator), summary.count(indicator)))
        .collect::<Vec<_>>()
        .join(" / ");

    vec![
        format!("전체 항목: {}건", summary.total),
        format!(
            "제출완료: {}건 ({})",
            summary.done,
            format_percent(summary.done_percent())
        ),
        format!("평균 진행률: {}", format_percent(summary.mean_progress)),
        format!("표시등: {}", breakdown),
        format!(
            "마감 경과(미완료): {}건 / 7일 이내 마감: {}건",
            summary.overdue, summary.due_soon
        ),
    ]
}

fn urgent_lines(items: &[ClassifiedItem<'_>], options: &ReportOptions) -> Vec<String> {
    let urgent = urgent_items(items, options.report_date);
    if urgent.is_empty() {
        return vec!["해당 항목 없음".into()];
    }

    let mut lines: Vec<String> = urgent
        .iter()
        .take(options.urgent_limit)
        .map(|row| {
            let item = row.item;
            let title = truncate_chars(item.title(), options.title_chars);
            format!(
                "[{} / {}] {} | 담당: {} | 마감: {} | {} | {}%",
                or_dash(&item.area),
                or_dash(&item.criterion),
                or_dash(&title),
                item.owner_group(),
                or_dash(&format_date(item.deadline)),
                options.indicator_mark(row.indicator),
                item.progress
            )
        })
        .collect();

    if urgent.len() > options.urgent_limit {
        lines.push(format!("… 외 {}건 생략", urgent.len() - options.urgent_limit));
    }
    lines
}

fn area_lines(items: &[ClassifiedItem<'_>]) -> Vec<String> {
    let stats = area_stats(items);
    if stats.is_empty() {
        return vec!["해당 항목 없음".into()];
    }

    stats
        .iter()
        .map(|stat| {
            format!(
                "{}: 평균 {} ({}건)",
                or_dash(&stat.area),
                format_percent(stat.mean_progress),
                stat.count
            )
        })
        .collect()
}

fn owner_lines(items: &[ClassifiedItem<'_>]) -> Vec<String> {
    let stats = owner_stats(items);
    if stats.is_empty() {
        return vec!["해당 항목 없음".into()];
    }

    stats
        .iter()
        .map(|stat| {
            format!(
                "{}: {}건, 완료 {}건, 평균 {}",
                stat.owner,
                stat.count,
                stat.completed,
                format_percent(stat.mean_progress)
            )
        })
        .collect()
}

/// 글자 수 기준 자르기 (넘치면 …)
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push('…');
        cut
    }
}

fn or_dash(text: &str) -> &str {
    if text.trim().is_empty() {
        "-"
    } else {
        text
    }
}

/// 텍스트 보고서 출력
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();

    out.push_str(&report.title);
    out.push('\n');
    out.push_str(&"=".repeat(60));
    out.push('\n');
    for line in &report.header {
        out.push_str(line);
        out.push('\n');
    }

    for section in &report.sections {
        out.push('\n');
        out.push_str(&format!("■ {}\n", section.heading));
        out.push_str(&"-".repeat(60));
        out.push('\n');
        for line in &section.lines {
            out.push_str(line);
            out.push('\n');
        }
    }

    out.push('\n');
    for line in &report.signature {
        out.push_str(line);
        out.push('\n');
    }

    out
}
