//! 담당자 대화형 지정
//!
//! 담당자가 비어 있는 항목을 하나씩 보여 주고 담당자를 입력받는다.
//! 입력 결과는 바로 쓰지 않고 `EditSession`으로 모아 돌려준다.

use crate::error::{DashboardError, Result};
use dialoguer::Input;
use evidence_common::{EditSession, EvidenceTable, FieldEdit};
use std::collections::HashSet;

/// 담당자가 비어 있는 행 번호
pub fn extract_unassigned_rows(table: &EvidenceTable) -> Vec<usize> {
    table
        .items
        .iter()
        .filter(|item| item.is_unassigned())
        .map(|item| item.row_id)
        .collect()
}

/// 이미 쓰인 담당자 이름 (처음 나온 순서, 중복 제거)
pub fn collect_existing_owners(table: &EvidenceTable) -> Vec<String> {
    let mut seen = HashSet::new();
    table
        .items
        .iter()
        .flat_map(|item| item.owner_names())
        .filter_map(|name| {
            if seen.insert(name.to_string()) {
                Some(name.to_string())
            } else {
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignAction {
    /// 담당자 입력
    Input(String),
    /// 이 항목 건너뛰기
    Skip,
    /// 남은 항목 모두 건너뛰기
    SkipAll,
    /// 직전 담당자 다시 적용
    Repeat,
    /// 남은 항목 모두 직전 담당자
    RepeatAll,
    /// 여기까지 저장하고 끝내기
    Quit,
}

/// 입력 한 줄을 동작으로
pub fn parse_action(input: &str, has_prev: bool) -> AssignAction {
    match input.trim() {
        "" | "s" => AssignAction::Skip,
        "S" => AssignAction::SkipAll,
        "r" if has_prev => AssignAction::Repeat,
        "R" if has_prev => AssignAction::RepeatAll,
        "q" | "Q" => AssignAction::Quit,
        other => AssignAction::Input(other.to_string()),
    }
}

fn owner_edit(owner: &str) -> FieldEdit {
    FieldEdit {
        owner: Some(owner.to_string()),
        ..Default::default()
    }
}

/// 지정 루프 (프롬프트는 호출자가 공급)
pub fn run_assign<F>(table: &EvidenceTable, mut prompt: F) -> Result<EditSession>
where
    F: FnMut(&[String], Option<&str>) -> Result<AssignAction>,
{
    let mut session = EditSession::new();
    let unassigned = extract_unassigned_rows(table);

    if unassigned.is_empty() {
        println!("✔ 모든 항목에 담당자가 지정되어 있습니다");
        return Ok(session);
    }

    println!("👤 담당자 미지정 항목: {}건", unassigned.len());
    println!("---");
    println!("조작: [입력]담당자 [s]건너뛰기 [S]남은 항목 건너뛰기 [r]직전과 같이 [R]남은 항목 모두 직전과 같이 [q]종료");
    println!("---\n");

    let candidates = collect_existing_owners(table);
    let mut prev_owner: Option<String> = None;
    let mut repeat_all = false;

    for (count, &row_id) in unassigned.iter().enumerate() {
        let Some(item) = table.get(row_id) else {
            continue;
        };
        println!(
            "[{}/{}] #{} {} / {} - {}",
            count + 1,
            unassigned.len(),
            row_id,
            item.area,
            item.criterion,
            item.title()
        );

        if repeat_all {
            if let Some(owner) = &prev_owner {
                session.stage(row_id, owner_edit(owner));
                println!("  → {} (자동 적용)\n", owner);
                continue;
            }
        }

        match prompt(&candidates, prev_owner.as_deref())? {
            AssignAction::Input(owner) => {
                session.stage(row_id, owner_edit(&owner));
                println!("  → {}\n", owner);
                prev_owner = Some(owner);
            }
            AssignAction::Skip => {
                println!("  → 건너뜀\n");
            }
            AssignAction::SkipAll => {
                println!("  → 남은 항목 모두 건너뜀\n");
                break;
            }
            action @ (AssignAction::Repeat | AssignAction::RepeatAll) => match &prev_owner {
                Some(owner) => {
                    session.stage(row_id, owner_edit(owner));
                    if action == AssignAction::RepeatAll {
                        println!("  → {} (남은 항목 모두 적용)\n", owner);
                        repeat_all = true;
                    } else {
                        println!("  → {} (직전과 같이)\n", owner);
                    }
                }
                None => println!("  → 직전 담당자가 없어 건너뜀\n"),
            },
            AssignAction::Quit => {
                println!("지금까지 입력한 내용으로 종료합니다...");
                break;
            }
        }
    }

    Ok(session)
}

/// dialoguer 프롬프트로 지정
pub fn run_interactive_assign(table: &EvidenceTable) -> Result<EditSession> {
    run_assign(table, prompt_owner_action)
}

fn prompt_owner_action(candidates: &[String], prev: Option<&str>) -> Result<AssignAction> {
    let prompt = if prev.is_some() {
        "담당자 (s:건너뛰기 S:모두 건너뛰기 r:직전과 같이 R:모두 직전과 같이 q:종료)"
    } else {
        "담당자 (s:건너뛰기 S:모두 건너뛰기 q:종료)"
    };

    if !candidates.is_empty() {
        println!("  후보: {}", candidates.join(", "));
    }

    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| DashboardError::Interaction(e.to_string()))?;

    Ok(parse_action(&input, prev.is_some()))
}
