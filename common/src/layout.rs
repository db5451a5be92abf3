//! 보고서 레이아웃 설정
//!
//! mm 기준 정의 (PDF 렌더러는 이 값만 사용한다)

// ============================================
// mm 기준 레이아웃
// ============================================

/// A4 크기 (mm)
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 여백 (mm)
pub const MARGIN_MM: f32 = 20.0;

/// 글자 크기 (pt)
pub const TITLE_FONT_PT: f32 = 16.0;
pub const HEADING_FONT_PT: f32 = 12.0;
pub const BODY_FONT_PT: f32 = 9.5;

/// 줄 간격 배율
pub const LINE_SPACING: f32 = 1.5;

/// 본문 한 줄 최대 글자 수 (한글 기준)
pub const BODY_CHARS_PER_LINE: usize = 52;

// ============================================
// 변환 계수
// ============================================

/// pt → mm (1pt = 25.4/72 mm ≈ 0.353mm)
pub const PT_TO_MM: f32 = 25.4 / 72.0;

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * PT_TO_MM
}

/// 글자 크기에 맞는 줄 높이 (mm)
pub fn line_height_mm(font_pt: f32) -> f32 {
    pt_to_mm(font_pt) * LINE_SPACING
}

/// PDF 페이지 레이아웃
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub chars_per_line: usize,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self::a4()
    }
}

impl ReportLayout {
    pub fn a4() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: MARGIN_MM,
            chars_per_line: BODY_CHARS_PER_LINE,
        }
    }

    /// 첫 줄의 기준선 y (mm, 아래가 0)
    pub fn top_y_mm(&self) -> f32 {
        self.page_height_mm - self.margin_mm
    }

    /// 이 y 아래로는 쓰지 않는다
    pub fn bottom_y_mm(&self) -> f32 {
        self.margin_mm
    }
}

/// 글자 수 기준 줄 바꿈 (빈 문자열은 빈 줄 하나)
pub fn wrap_chars(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || max_chars == 0 {
        return vec![text.to_string()];
    }

    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
