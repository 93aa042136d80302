//! Deterministic pagination engine for tree-shaped rich-text documents.
//!
//! A [`DocumentTree`] (headings, paragraphs, nested lists, quotes, code
//! blocks, inline formatting runs) is laid out against a fixed
//! [`PageConfig`] into an [`Artifact`]: ordered pages of primitive draw
//! instructions, which [`emit_pdf`] can serialize to PDF bytes.

mod artifact;
mod config;
mod error;
mod json;
mod linebreak;
mod metrics;
mod model;
mod pdf;
mod render;
mod resolve;

pub use artifact::{Artifact, DrawOp, Page};
pub use config::{PageConfig, PageProfile};
pub use error::Error;
pub use json::{document_from_json, document_from_json_str};
pub use linebreak::{LinePiece, VisualLine, break_runs};
pub use metrics::{BuiltinMetrics, FaceMetrics, MetricProvider};
pub use model::{Alignment, Block, DocumentTree, FontFamily, InlineRun, Marks, Rgb, VertAlign};
pub use pdf::emit_pdf;
pub use resolve::{BlockDefaults, ResolvedRun, ResolvedStyle, resolve_runs};

use std::time::Instant;

/// Lay out a document against a page configuration.
///
/// Pure and synchronous: identical inputs yield an identical artifact,
/// and nothing is shared between invocations, so concurrent renders of
/// different documents are safe.
pub fn render(doc: &DocumentTree, config: &PageConfig) -> Result<Artifact, Error> {
    render_with_metrics(doc, config, &BuiltinMetrics)
}

/// [`render`] with a caller-supplied metric source (e.g. a parsed font
/// face instead of the built-in width tables).
pub fn render_with_metrics(
    doc: &DocumentTree,
    config: &PageConfig,
    metrics: &dyn MetricProvider,
) -> Result<Artifact, Error> {
    let t0 = Instant::now();
    let artifact = render::run(doc, config, metrics)?;
    log::info!(
        "laid out {} blocks onto {} pages in {:.1}ms",
        doc.blocks.len(),
        artifact.page_count(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(artifact)
}

/// Render and serialize in one call.
pub fn render_pdf(doc: &DocumentTree, config: &PageConfig) -> Result<Vec<u8>, Error> {
    let artifact = render(doc, config)?;
    let t0 = Instant::now();
    let bytes = emit_pdf(&artifact);
    log::info!(
        "emitted {} bytes of PDF in {:.1}ms",
        bytes.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(bytes)
}
