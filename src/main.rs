use chrono::{Local, NaiveDate};
use clap::Parser;
use evidence_common::aggregate::{filter_choices, format_percent};
use evidence_common::normalizer::parse_deadline;
use evidence_common::types::{format_date, STATUS_OPTIONS};
use evidence_common::{
    classify_all, summarize, ClassifiedItem, EditSession,
    EvidenceItem, EvidenceTable, FieldEdit, Indicator,
};
use evidence_dashboard::{assign, cli, config, error, export, store};
use cli::{Cli, Commands};
use config::Config;
use error::{DashboardError, Result};
use serde::Serialize;
use std::path::Path;
use store::{CachedStore, XlsxStore};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    debug!(%today, "기준일");

    match cli.command {
        Commands::List { filter, json } => {
            let table = open_store(&config, cli.workbook.as_deref())?.load()?;
            if warn_if_empty(&table) {
                return Ok(());
            }

            let classified = classify_all(&table.items, today);
            let rows = filter.select(&classified);

            if json {
                let out: Vec<ListRow> = rows.iter().map(ListRow::from).collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_rows(&rows);
            }
        }

        Commands::Summary { filter } => {
            let table = open_store(&config, cli.workbook.as_deref())?.load()?;
            if warn_if_empty(&table) {
                return Ok(());
            }

            let classified = classify_all(&table.items, today);
            let rows = filter.select(&classified);
            print_summary(&rows, today);
        }

        Commands::Options => {
            let table = open_store(&config, cli.workbook.as_deref())?.load()?;
            if warn_if_empty(&table) {
                return Ok(());
            }

            let choices = filter_choices(&table.items);
            println!("평가영역: {}", choices.areas.join(", "));
            println!("평가준거: {}", choices.criteria.join(", "));
            println!("주무부처: {}", choices.departments.join(", "));
            println!("담당자: {}", choices.owners.join(", "));
            println!(
                "표시등: {}",
                Indicator::ALL
                    .iter()
                    .map(|i| format!("{} {}", i.glyph(), i.label()))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!("진행상태: {}", STATUS_OPTIONS.join(", "));
        }

        Commands::Set { row, owner, status, progress, link, deadline, notes, edits } => {
            let session = match edits {
                Some(path) => {
                    if !path.exists() {
                        return Err(DashboardError::FileNotFound(path.display().to_string()));
                    }
                    EditSession::from_json(&std::fs::read_to_string(&path)?)?
                }
                None => {
                    let row = row.ok_or_else(|| {
                        DashboardError::InvalidInput("--row 또는 --edits 가 필요합니다".into())
                    })?;
                    let edit = FieldEdit { owner, status, progress, link, deadline, notes };
                    if edit.is_empty() {
                        return Err(DashboardError::InvalidInput("수정할 값이 없습니다".into()));
                    }
                    let mut session = EditSession::new();
                    session.stage(row, edit);
                    session
                }
            };
            check_edits(&session)?;

            let mut store = open_store(&config, cli.workbook.as_deref())?;
            let mut table = store.load()?;
            let applied = store.commit(&mut table, &session)?;
            println!("✔ {}개 행을 저장했습니다", applied);
        }

        Commands::Assign => {
            let mut store = open_store(&config, cli.workbook.as_deref())?;
            let mut table = store.load()?;
            if warn_if_empty(&table) {
                return Ok(());
            }

            let session = assign::run_interactive_assign(&table)?;
            if session.is_empty() {
                println!("변경 사항이 없습니다");
                return Ok(());
            }

            let applied = store.commit(&mut table, &session)?;
            println!("\n✔ {}개 행의 담당자를 저장했습니다", applied);
        }

        Commands::Report { filter, format, output, author, department_label } => {
            println!("📄 evidence - 현황 보고서\n");

            let table = open_store(&config, cli.workbook.as_deref())?.load()?;
            warn_if_empty(&table);

            let classified = classify_all(&table.items, today);
            let rows = filter.select(&classified);

            let mut settings = export::ExportSettings::new(today);
            settings.author_label = author.unwrap_or_else(|| config.author_label.clone());
            settings.department_label =
                department_label.unwrap_or_else(|| config.department_label.clone());
            settings.pdf_font = config.pdf_font_path();

            let written = export::export_report(&rows, &format, &output, &settings)?;
            println!("\n✅ 보고서 {}개 생성 완료", written.len());
        }

        Commands::Config { set_workbook, set_pdf_font, show } => {
            if let Some(path) = set_workbook {
                config.set_workbook(path)?;
                println!("✔ 통합문서 경로를 저장했습니다");
            }

            if let Some(path) = set_pdf_font {
                config.pdf_font = Some(path);
                config.save()?;
                println!("✔ PDF 글꼴 경로를 저장했습니다");
            }

            if show {
                println!("설정 파일: {}", Config::config_path()?.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn open_store(config: &Config, workbook: Option<&Path>) -> Result<CachedStore<XlsxStore>> {
    let path = config.workbook_path(workbook)?;
    debug!(path = %path.display(), "통합문서");
    Ok(CachedStore::new(
        XlsxStore::new(path, config.sheet_keyword.clone()),
        config.cache_ttl(),
    ))
}

/// 데이터가 없으면 안내하고 true
fn warn_if_empty(table: &EvidenceTable) -> bool {
    if table.is_empty() {
        println!("⚠ 시트에 데이터가 없습니다");
        true
    } else {
        false
    }
}

/// 진행상태·마감일 값 점검
fn check_edits(session: &EditSession) -> Result<()> {
    for row_id in session.row_ids() {
        let Some(edit) = session.get(row_id) else {
            continue;
        };

        if let Some(status) = edit.status.as_deref().map(str::trim) {
            if !status.is_empty() && !STATUS_OPTIONS.contains(&status) {
                warn!(row_id, status, "정해진 진행상태 값이 아님");
                println!(
                    "⚠ #{} 진행상태 '{}'는 정해진 값({})이 아닙니다",
                    row_id,
                    status,
                    STATUS_OPTIONS.join("/")
                );
            }
        }

        if let Some(deadline) = edit.deadline.as_deref().map(str::trim) {
            if !deadline.is_empty() && parse_deadline(deadline).is_none() {
                return Err(DashboardError::InvalidInput(format!(
                    "#{} 마감일 형식이 잘못되었습니다: {}",
                    row_id, deadline
                )));
            }
        }
    }
    Ok(())
}

/// `list --json` 한 줄
#[derive(Serialize)]
struct ListRow<'a> {
    #[serde(flatten)]
    item: &'a EvidenceItem,
    indicator: Indicator,
    indicator_label: &'static str,
}

impl<'a> From<&ClassifiedItem<'a>> for ListRow<'a> {
    fn from(row: &ClassifiedItem<'a>) -> Self {
        Self {
            item: row.item,
            indicator: row.indicator,
            indicator_label: row.indicator.label(),
        }
    }
}

fn print_rows(rows: &[ClassifiedItem<'_>]) {
    if rows.is_empty() {
        println!("조건에 맞는 항목이 없습니다");
        return;
    }

    for row in rows {
        let item = row.item;
        println!(
            "#{:<4} {} [{} / {}] {}",
            item.row_id,
            row.indicator,
            item.area,
            item.criterion,
            item.title()
        );
        println!(
            "      담당: {} | 상태: {} | 진행률: {}% | 마감: {}",
            item.owner_group(),
            if item.status.is_empty() { "-" } else { item.status.as_str() },
            item.progress,
            format_date(item.deadline)
        );
    }
    println!("\n{}건", rows.len());
}

fn print_summary(rows: &[ClassifiedItem<'_>], today: NaiveDate) {
    let summary = summarize(rows, today);
    println!("기준일: {}", today.format("%Y-%m-%d"));
    println!("전체 항목: {}건", summary.total);
    println!(
        "제출완료: {}건 ({})",
        summary.done,
        format_percent(summary.done_percent())
    );
    println!("평균 진행률: {}", format_percent(summary.mean_progress));
    for indicator in Indicator::ALL {
        println!(
            "{} {}: {}건",
            indicator.glyph(),
            indicator.label(),
            summary.count(indicator)
        );
    }
    println!("마감 경과(미완료): {}건", summary.overdue);
    println!("7일 이내 마감: {}건", summary.due_soon);
}
