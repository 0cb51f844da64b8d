//! Best-effort DOCX enhancements: body font and header logo.
//!
//! Each enhancement is attempted independently. A failure is logged and the letter
//! is produced without that enhancement; it never reaches the caller.

use thiserror::Error;
use tracing::warn;

use crate::render::docx::{BodyFontSpec, DocxDocument};
use crate::render::logo::Logo;

/// Word accepts font sizes from 1pt to 1638pt in half-point steps.
const MIN_FONT_PT: f32 = 1.0;
const MAX_FONT_PT: f32 = 1638.0;

#[derive(Debug, Error)]
pub enum EnhancementError {
    #[error("font family is empty")]
    EmptyFontFamily,

    #[error("font size {0}pt is outside 1-1638pt")]
    FontSizeOutOfRange(f32),

    #[error("no logo is available")]
    LogoUnavailable,
}

/// An optional capability applied to a document after layout.
pub trait Enhancement: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, doc: &mut DocxDocument) -> Result<(), EnhancementError>;
}

/// Sets the `Normal` style font family and size.
#[derive(Debug, Clone)]
pub struct BodyFont {
    pub family: String,
    pub size_pt: f32,
}

impl Enhancement for BodyFont {
    fn name(&self) -> &'static str {
        "body font"
    }

    fn apply(&self, doc: &mut DocxDocument) -> Result<(), EnhancementError> {
        let family = self.family.trim();
        if family.is_empty() {
            return Err(EnhancementError::EmptyFontFamily);
        }
        if !(MIN_FONT_PT..=MAX_FONT_PT).contains(&self.size_pt) {
            return Err(EnhancementError::FontSizeOutOfRange(self.size_pt));
        }
        doc.set_body_font(BodyFontSpec {
            family: family.to_string(),
            size_half_points: (self.size_pt * 2.0).round() as u32,
        });
        Ok(())
    }
}

/// Places the logo right-aligned in the page header.
#[derive(Debug, Clone)]
pub struct HeaderLogo {
    pub logo: Option<Logo>,
}

impl Enhancement for HeaderLogo {
    fn name(&self) -> &'static str {
        "header logo"
    }

    fn apply(&self, doc: &mut DocxDocument) -> Result<(), EnhancementError> {
        let logo = self.logo.clone().ok_or(EnhancementError::LogoUnavailable)?;
        doc.set_header_logo(logo);
        Ok(())
    }
}

/// Applies every enhancement, skipping (and logging) the ones that fail.
/// Returns how many were applied.
pub fn apply_best_effort(doc: &mut DocxDocument, enhancements: &[Box<dyn Enhancement>]) -> usize {
    let mut applied = 0;
    for enhancement in enhancements {
        match enhancement.apply(doc) {
            Ok(()) => applied += 1,
            Err(e) => warn!("Skipping {} enhancement: {e}", enhancement.name()),
        }
    }
    applied
}
