//! 수정 내용 임시 보관
//!
//! 수정은 행 번호(`row_id`) 기준으로 메모리에 모아 두었다가
//! 저장할 때 한꺼번에 테이블에 반영한다. 표시등은 저장하지 않으므로
//! 반영 후 다시 계산하면 된다.

use crate::error::{Error, Result};
use crate::normalizer::parse_deadline;
use crate::types::EvidenceTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 한 행에 대한 수정 (`None`은 그대로 둠)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldEdit {
    pub owner: Option<String>,
    pub status: Option<String>,
    /// 0~100 밖의 값은 반영 시 잘린다
    pub progress: Option<i64>,
    pub link: Option<String>,
    /// 빈 문자열이면 마감일 삭제, 해석할 수 없는 값도 삭제로 처리
    pub deadline: Option<String>,
    pub notes: Option<String>,
}

impl FieldEdit {
    pub fn is_empty(&self) -> bool {
        *self == FieldEdit::default()
    }

    /// 나중 수정으로 덮어쓰기
    fn merge(&mut self, later: FieldEdit) {
        if later.owner.is_some() {
            self.owner = later.owner;
        }
        if later.status.is_some() {
            self.status = later.status;
        }
        if later.progress.is_some() {
            self.progress = later.progress;
        }
        if later.link.is_some() {
            self.link = later.link;
        }
        if later.deadline.is_some() {
            self.deadline = later.deadline;
        }
        if later.notes.is_some() {
            self.notes = later.notes;
        }
    }
}

/// JSON 수정 파일의 한 항목
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RowEdit {
    row_id: usize,
    #[serde(flatten)]
    fields: FieldEdit,
}

/// 저장 전까지 모아 둔 수정 내용
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    staged: BTreeMap<usize, FieldEdit>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// `[{"rowId": 3, "progress": 80, "status": "진행중"}, ...]` 형식
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<RowEdit> = serde_json::from_str(json)?;
        let mut session = Self::new();
        for row in rows {
            session.stage(row.row_id, row.fields);
        }
        Ok(session)
    }

    /// 수정 추가 (같은 행은 합쳐진다)
    pub fn stage(&mut self, row_id: usize, edit: FieldEdit) {
        if edit.is_empty() {
            return;
        }
        self.staged.entry(row_id).or_default().merge(edit);
    }

    pub fn get(&self, row_id: usize) -> Option<&FieldEdit> {
        self.staged.get(&row_id)
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn row_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.staged.keys().copied()
    }

    /// 테이블에 반영하고 반영한 행 수를 돌려준다
    ///
    /// 없는 행 번호가 하나라도 있으면 아무것도 바꾸지 않고 오류.
    pub fn apply(&self, table: &mut EvidenceTable) -> Result<usize> {
        if let Some(missing) = self.row_ids().find(|id| table.get(*id).is_none()) {
            return Err(Error::UnknownRow(missing));
        }

        for (&row_id, edit) in &self.staged {
            let Some(item) = table.get_mut(row_id) else {
                return Err(Error::UnknownRow(row_id));
            };

            if let Some(owner) = &edit.owner {
                item.owner = owner.trim().to_string();
            }
            if let Some(status) = &edit.status {
                item.status = status.trim().to_string();
            }
            if let Some(progress) = edit.progress {
                item.progress = progress.clamp(0, 100) as u8;
            }
            if let Some(link) = &edit.link {
                item.link = link.trim().to_string();
            }
            if let Some(deadline) = &edit.deadline {
                item.deadline = parse_deadline(deadline);
            }
            if let Some(notes) = &edit.notes {
                item.notes = notes.trim().to_string();
            }
        }

        Ok(self.staged.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize_grid;
    use chrono::NaiveDate;

    fn table() -> EvidenceTable {
        let grid: Vec<Vec<String>> = vec![
            vec!["평가영역", "담당자", "진행률", "마감일"],
            vec!["A영역", "김", "10", "2025-03-01"],
            vec!["B영역", "", "50", ""],
        ]
        .into_iter()
        .map(|row| row.into_iter().map(String::from).collect())
        .collect();
        normalize_grid(&grid)
    }

    #[test]
    fn test_stage_merges_same_row() {
        let mut session = EditSession::new();
        session.stage(1, FieldEdit { owner: Some("이".into()), ..Default::default() });
        session.stage(1, FieldEdit { progress: Some(70), ..Default::default() });
        session.stage(0, FieldEdit::default());

        assert_eq!(session.len(), 1);
        let edit = session.get(1).unwrap();
        assert_eq!(edit.owner.as_deref(), Some("이"));
        assert_eq!(edit.progress, Some(70));
    }

    #[test]
    fn test_apply_updates_fields() {
        let mut table = table();
        let mut session = EditSession::new();
        session.stage(
            1,
            FieldEdit {
                owner: Some(" 박 ".into()),
                progress: Some(250),
                deadline: Some("2025/04/01".into()),
                ..Default::default()
            },
        );
        session.stage(0, FieldEdit { deadline: Some(String::new()), ..Default::default() });

        assert_eq!(session.apply(&mut table).unwrap(), 2);
        assert_eq!(table.items[1].owner, "박");
        assert_eq!(table.items[1].progress, 100);
        assert_eq!(table.items[1].deadline, NaiveDate::from_ymd_opt(2025, 4, 1));
        assert_eq!(table.items[0].deadline, None);
        assert_eq!(table.items[0].area, "A영역");
    }

    #[test]
    fn test_apply_unknown_row_changes_nothing() {
        let mut table = table();
        let before = table.clone();
        let mut session = EditSession::new();
        session.stage(0, FieldEdit { owner: Some("최".into()), ..Default::default() });
        session.stage(9, FieldEdit { owner: Some("정".into()), ..Default::default() });

        let result = session.apply(&mut table);
        assert!(matches!(result, Err(Error::UnknownRow(9))));
        assert_eq!(table, before);
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"rowId": 0, "progress": 90, "status": "진행중"},
            {"rowId": 1, "owner": "이"}
        ]"#;
        let session = EditSession::from_json(json).unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(session.get(0).unwrap().status.as_deref(), Some("진행중"));
        assert_eq!(session.get(1).unwrap().progress, None);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(EditSession::from_json("{"), Err(Error::Json(_))));
    }
}
