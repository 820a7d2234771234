//! PDF rendering for the career report.
//!
//! Builds a paginated US-letter document from the prediction list and the
//! collected assessment scores, using the builtin Helvetica faces so no font
//! files ship with the binary. Layout is a simple top-down cursor with page
//! breaks; long paragraphs are greedy word-wrapped.

use std::collections::HashMap;

use chrono::Utc;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::errors::AppError;
use crate::prediction::ensemble::CareerPrediction;
use crate::report::insights::{
    aptitude_level, environment_preference, top_strengths, trait_interpretation,
    work_style_preference,
};

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 18.0;
const TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

/// Rough Helvetica advance: ~0.5 em average, 1 pt = 0.3528 mm.
const CHAR_WIDTH_FACTOR: f32 = 0.176;

const EXECUTIVE_SUMMARY: &str = "This comprehensive career assessment analyzes your personality traits, \
     aptitudes, and work preferences to identify career paths where you're most \
     likely to excel and find fulfillment. The recommendations are based on \
     psychological research and data-driven analysis of successful professionals.";

const NEXT_STEPS: &[&str] = &[
    "1. Research the top recommended career paths in depth",
    "2. Connect with professionals in these fields for informational interviews",
    "3. Identify relevant skills to develop or enhance",
    "4. Consider internship or shadowing opportunities",
    "5. Discuss these findings with a career counselor or mentor",
];

const FOOTER: &str = "This report was generated by the Compass career intelligence service. The \
     recommendations are based on statistical analysis and should be considered \
     alongside personal interests, values, and market conditions.";

/// Personality rows: (feature key, display name) in report order.
const PERSONALITY_ROWS: &[(&str, &str)] = &[
    ("C_score", "Organization (C)"),
    ("O_score", "Openness (O)"),
    ("E_score", "Extraversion (E)"),
    ("A_score", "Agreeableness (A)"),
    ("N_score", "Neuroticism (N)"),
];

/// Aptitude rows: (feature key, display name) in report order.
const APTITUDE_ROWS: &[(&str, &str)] = &[
    ("Numerical_Aptitude", "Numerical Reasoning"),
    ("Verbal_Aptitude", "Verbal Ability"),
    ("Abstract_Reasoning", "Abstract Thinking"),
    ("Logical_Reasoning", "Logical Reasoning"),
    ("Spatial_Aptitude", "Spatial Awareness"),
];

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

/// Renders the full career report and returns the PDF bytes.
pub fn render_report(
    predictions: &[CareerPrediction],
    scores: &HashMap<String, f64>,
) -> Result<Vec<u8>, AppError> {
    let (doc, page, layer) = PdfDocument::new(
        "Compass Career Intelligence Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "content",
    );

    let fonts = Fonts {
        regular: builtin(&doc, BuiltinFont::Helvetica)?,
        bold: builtin(&doc, BuiltinFont::HelveticaBold)?,
        oblique: builtin(&doc, BuiltinFont::HelveticaOblique)?,
    };

    let mut writer = PageWriter {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT_MM - MARGIN_MM,
    };

    // Header
    writer.line("Compass Career Intelligence Report", 20.0, &fonts.bold);
    writer.line(
        &Utc::now()
            .format("Generated on %B %d, %Y at %H:%M UTC")
            .to_string(),
        9.0,
        &fonts.oblique,
    );
    writer.gap(6.0);

    // Executive summary
    writer.line("Executive Summary", 14.0, &fonts.bold);
    writer.paragraph(EXECUTIVE_SUMMARY, 10.0, &fonts.regular);
    writer.gap(5.0);

    // Top career recommendations
    writer.line("Top Career Recommendations", 14.0, &fonts.bold);
    if predictions.is_empty() {
        writer.line("No career predictions available.", 10.0, &fonts.regular);
    } else {
        for (rank, p) in predictions.iter().take(3).enumerate() {
            writer.line(
                &format!("{}. {} — {}% match", rank + 1, p.career, p.probability),
                11.0,
                &fonts.regular,
            );
        }
        let strengths = top_strengths(scores, 3);
        if !strengths.is_empty() {
            writer.gap(2.0);
            writer.paragraph(
                &format!("Key strengths: {}", strengths.join(", ")),
                10.0,
                &fonts.regular,
            );
        }
    }
    writer.gap(5.0);

    // Personality profile
    writer.line("Personal Profile Analysis", 14.0, &fonts.bold);
    for (key, name) in PERSONALITY_ROWS {
        let score = scores.get(*key).copied();
        writer.line(
            &format!(
                "{name}: {} — {}",
                format_score(score),
                trait_interpretation(key, score)
            ),
            10.0,
            &fonts.regular,
        );
    }
    writer.gap(5.0);

    // Aptitudes
    writer.line("Aptitude Assessment", 13.0, &fonts.bold);
    for (key, name) in APTITUDE_ROWS {
        let score = scores.get(*key).copied();
        writer.line(
            &format!(
                "{name}: {} — {}",
                format_score(score),
                aptitude_level(score)
            ),
            10.0,
            &fonts.regular,
        );
    }
    writer.gap(5.0);

    // Work style
    writer.line("Work Style Preferences", 14.0, &fonts.bold);
    writer.paragraph(
        &format!(
            "Your assessment indicates a strong preference for {}. You thrive in \
             environments that emphasize {}.",
            work_style_preference(scores),
            environment_preference(scores)
        ),
        10.0,
        &fonts.regular,
    );
    writer.gap(5.0);

    // Next steps
    writer.line("Recommended Next Steps", 14.0, &fonts.bold);
    for step in NEXT_STEPS {
        writer.line(step, 10.0, &fonts.regular);
    }

    writer.gap(10.0);
    writer.paragraph(FOOTER, 8.0, &fonts.oblique);

    doc.save_to_bytes()
        .map_err(|e| AppError::Report(format!("PDF serialization failed: {e}")))
}

fn builtin(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef, AppError> {
    doc.add_builtin_font(font)
        .map_err(|e| AppError::Report(format!("Builtin font unavailable: {e}")))
}

/// Top-down text cursor with automatic page breaks.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl PageWriter<'_> {
    fn line(&mut self, text: &str, size_pt: f32, font: &IndirectFontRef) {
        let height = line_height_mm(size_pt);
        if self.y - height < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        self.y -= height;
        self.layer
            .use_text(text, size_pt, Mm(MARGIN_MM), Mm(self.y), font);
    }

    fn paragraph(&mut self, text: &str, size_pt: f32, font: &IndirectFontRef) {
        let max_chars = (TEXT_WIDTH_MM / (size_pt * CHAR_WIDTH_FACTOR)) as usize;
        for line in wrap_text(text, max_chars) {
            self.line(&line, size_pt, font);
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }
}

fn line_height_mm(size_pt: f32) -> f32 {
    // 1.3 em leading, 1 pt = 0.3528 mm.
    size_pt * 0.3528 * 1.3
}

/// Greedy word wrap by character budget. A word longer than the budget gets
/// a line of its own rather than being split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) if s.fract() == 0.0 => format!("{s:.0}"),
        Some(s) => format!("{s}"),
        None => "N/A".to_string(),
    }
}
