//! Evidence Dashboard Common Library
//!
//! CLI와 저장소 계층이 공유하는 규칙 엔진:
//! 정규화 → 표시등 분류 → 필터/집계 → 보고서 구성

pub mod types;
pub mod error;
pub mod normalizer;
pub mod classifier;
pub mod aggregate;
pub mod edit;
pub mod layout;
pub mod report;

pub use types::{ClassifiedItem, EvidenceItem, EvidenceTable, Indicator, StatusKind};
pub use error::{Error, Result};
pub use normalizer::{normalize_grid, to_grid};
pub use classifier::{classify, classify_all};
pub use aggregate::{filter_items, sort_risk_first, summarize, OwnerMatch, RowFilter, Summary};
pub use edit::{EditSession, FieldEdit};
pub use report::{compose_report, render_text, Report, ReportOptions};
