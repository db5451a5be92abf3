//! PDF 보고서 (printpdf)
//!
//! A4 세로, 위에서 아래로 한 줄씩 채우고 바닥에 닿으면 새 페이지.
//! 한글 TTF가 없으면 내장 Helvetica로 쓰며 ASCII 밖의 글자는 `?`가 된다.

use crate::error::{DashboardError, Result};
use evidence_common::layout::{
    line_height_mm, wrap_chars, ReportLayout, BODY_FONT_PT, HEADING_FONT_PT, TITLE_FONT_PT,
};
use evidence_common::Report;
use printpdf::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::warn;

/// 페이지 넘김을 맡는 줄 단위 출력기
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    layout: ReportLayout,
    y: f32,
    ascii_only: bool,
    pages: usize,
}

impl<'a> PageWriter<'a> {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            Mm(self.layout.page_width_mm),
            Mm(self.layout.page_height_mm),
            format!("Layer {}", self.pages + 1),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = self.layout.top_y_mm();
        self.pages += 1;
    }

    fn line(&mut self, text: &str, font_pt: f32) {
        let height = line_height_mm(font_pt);
        if self.y - height < self.layout.bottom_y_mm() {
            self.new_page();
        }
        self.y -= height;

        let text = if self.ascii_only {
            ascii_fallback(text)
        } else {
            text.to_string()
        };
        self.layer
            .use_text(text, font_pt, Mm(self.layout.margin_mm), Mm(self.y), &self.font);
    }

    /// 폭에 맞춰 여러 줄로
    fn paragraph(&mut self, text: &str, font_pt: f32) {
        for chunk in wrap_chars(text, self.layout.chars_per_line) {
            self.line(&chunk, font_pt);
        }
    }

    fn gap(&mut self, font_pt: f32) {
        self.y -= line_height_mm(font_pt) / 2.0;
    }
}

fn ascii_fallback(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect()
}

fn load_font(doc: &PdfDocumentReference, font_path: Option<&Path>) -> Result<(IndirectFontRef, bool)> {
    match font_path {
        Some(path) => {
            if !path.exists() {
                return Err(DashboardError::FileNotFound(path.display().to_string()));
            }
            let file = File::open(path)?;
            let font = doc
                .add_external_font(file)
                .map_err(|e| DashboardError::PdfGeneration(format!("글꼴 추가 오류: {:?}", e)))?;
            Ok((font, false))
        }
        None => {
            warn!("PDF 글꼴이 설정되지 않아 내장 글꼴을 사용합니다 (한글은 ?로 표시됨)");
            let font = doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| DashboardError::PdfGeneration(format!("글꼴 추가 오류: {:?}", e)))?;
            Ok((font, true))
        }
    }
}

/// 보고서를 PDF로 저장하고 페이지 수를 돌려준다
pub fn generate_pdf(report: &Report, output_path: &Path, font_path: Option<&Path>) -> Result<usize> {
    let layout = ReportLayout::a4();
    let (doc, page1, layer1) = PdfDocument::new(
        report.title.as_str(),
        Mm(layout.page_width_mm),
        Mm(layout.page_height_mm),
        "Layer 1",
    );

    let (font, ascii_only) = load_font(&doc, font_path)?;
    let layer = doc.get_page(page1).get_layer(layer1);

    let mut writer = PageWriter {
        doc: &doc,
        layer,
        font,
        y: layout.top_y_mm(),
        layout,
        ascii_only,
        pages: 1,
    };

    writer.line(&report.title, TITLE_FONT_PT);
    writer.gap(TITLE_FONT_PT);
    for line in &report.header {
        writer.line(line, BODY_FONT_PT);
    }

    for section in &report.sections {
        writer.gap(HEADING_FONT_PT);
        writer.line(&section.heading, HEADING_FONT_PT);
        for line in &section.lines {
            writer.paragraph(line, BODY_FONT_PT);
        }
    }

    writer.gap(HEADING_FONT_PT);
    for line in &report.signature {
        writer.line(line, BODY_FONT_PT);
    }

    let pages = writer.pages;
    drop(writer);

    let file = File::create(output_path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| DashboardError::PdfGeneration(format!("PDF 저장 오류: {:?}", e)))?;

    Ok(pages)
}
