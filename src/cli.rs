use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use evidence_common::{filter_items, sort_risk_first, ClassifiedItem, Indicator, OwnerMatch, RowFilter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "evidence")]
#[command(about = "대학 인증 증빙자료 준비 현황 대시보드", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 상세 로그 출력
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 증빙자료 통합문서(.xlsx) 경로 (설정 파일보다 우선)
    #[arg(long, global = true)]
    pub workbook: Option<PathBuf>,

    /// 기준일 YYYY-MM-DD (기본: 오늘)
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,
}

/// 조회 필터 (비우거나 "전체"면 제한 없음)
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// 평가영역
    #[arg(long)]
    pub area: Option<String>,

    /// 평가준거
    #[arg(long)]
    pub criterion: Option<String>,

    /// 주무부처
    #[arg(long)]
    pub department: Option<String>,

    /// 담당자 ("미지정"이면 담당자가 빈 행)
    #[arg(long)]
    pub owner: Option<String>,

    /// 담당자 비교 방식 (exact: 칸 전체 일치 / member: 여러 명 중 한 명)
    #[arg(long, default_value = "exact")]
    pub owner_match: OwnerMatch,

    /// 표시등 (risk/warning/ok)
    #[arg(long)]
    pub indicator: Option<Indicator>,

    /// 위험 → 주의 → 정상, 같은 등급은 마감일 순
    #[arg(long)]
    pub risk_first: bool,
}

impl FilterArgs {
    pub fn to_filter(&self) -> RowFilter {
        RowFilter {
            area: RowFilter::selection(self.area.as_deref()),
            criterion: RowFilter::selection(self.criterion.as_deref()),
            department: RowFilter::selection(self.department.as_deref()),
            owner: RowFilter::selection(self.owner.as_deref()),
            owner_match: self.owner_match,
            indicator: self.indicator,
        }
    }

    /// 필터 적용 후 필요하면 위험 우선 정렬
    pub fn select<'a>(&self, rows: &[ClassifiedItem<'a>]) -> Vec<ClassifiedItem<'a>> {
        let mut selected = filter_items(rows, &self.to_filter());
        if self.risk_first {
            sort_risk_first(&mut selected);
        }
        selected
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// 항목 목록 (표시등 포함)
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 요약 (전체/완료/위험/주의/지연)
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// 필터에 쓸 수 있는 값 목록
    Options,

    /// 항목 수정 후 저장
    Set {
        /// 행 번호 (list 출력의 #)
        #[arg(long)]
        row: Option<usize>,

        /// 담당자
        #[arg(long)]
        owner: Option<String>,

        /// 진행상태 (미착수/진행중/완료/보류/지연)
        #[arg(long)]
        status: Option<String>,

        /// 진행률 (0-100, 범위 밖은 잘림)
        #[arg(long, allow_hyphen_values = true)]
        progress: Option<i64>,

        /// 자료링크
        #[arg(long)]
        link: Option<String>,

        /// 마감일 (YYYY-MM-DD, 빈 문자열이면 지움)
        #[arg(long)]
        deadline: Option<String>,

        /// 비고
        #[arg(long)]
        notes: Option<String>,

        /// 여러 행 수정 JSON 파일 ([{"rowId": 3, "progress": 80}, ...])
        #[arg(long)]
        edits: Option<PathBuf>,
    },

    /// 담당자 미지정 항목에 대화형으로 담당자 지정
    Assign,

    /// 현황 보고서 내보내기
    Report {
        #[command(flatten)]
        filter: FilterArgs,

        /// 출력 형식 (text/pdf/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 출력 디렉터리 또는 파일
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// 작성 (서명란)
        #[arg(long)]
        author: Option<String>,

        /// 소속 (서명란)
        #[arg(long)]
        department_label: Option<String>,
    },

    /// 설정 표시/편집
    Config {
        /// 통합문서 경로 저장
        #[arg(long)]
        set_workbook: Option<PathBuf>,

        /// PDF 한글 글꼴(TTF) 경로 저장
        #[arg(long)]
        set_pdf_font: Option<PathBuf>,

        /// 설정 표시
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Pdf,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "pdf" => Ok(ExportFormat::Pdf),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("알 수 없는 형식: {}. text, pdf, both 중 하나를 쓰세요", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Pdf => write!(f, "pdf"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
