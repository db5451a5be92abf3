use crate::error::Result;
use evidence_common::{render_text, Report};
use std::path::Path;

/// UTF-8 텍스트 보고서
pub fn generate_text(report: &Report, output_path: &Path) -> Result<()> {
    std::fs::write(output_path, render_text(report))?;
    Ok(())
}
