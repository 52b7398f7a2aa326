//! Error types with rich diagnostics using miette
//!
//! Fatal errors end the conversion; [`ObjectWarning`]s are collected while
//! the document is walked and only cost the object that raised them.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// Load Errors
// ============================================================================

/// Errors that stop a drawfile from being decoded at all
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("not a drawfile: expected \"Draw\" signature, found {found:?}")]
    #[diagnostic(
        code(draw2svg::load::not_a_drawfile),
        help("pass --no-type-check to convert anyway")
    )]
    NotADrawfile { found: String },

    #[error("drawfile truncated: {len} bytes is shorter than the {need}-byte header")]
    #[diagnostic(code(draw2svg::load::truncated))]
    Truncated { len: usize, need: usize },
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors that occur while laying out the document viewport
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid scale: {value}")]
    #[diagnostic(
        code(draw2svg::render::invalid_scale),
        help("scale factors must be finite and non-zero")
    )]
    InvalidScale { value: f64 },

    #[error("cannot fit a drawing with zero {axis}")]
    #[diagnostic(code(draw2svg::render::empty_extent))]
    EmptyExtent { axis: &'static str },
}

/// Any fatal error from [`crate::convert`]
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] RenderError),
}

// ============================================================================
// Per-object diagnostics
// ============================================================================

/// Recoverable problems reported against a single object.
///
/// `offset` is the byte offset of the object within the drawfile.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ObjectWarning {
    #[error("path aborted at object {offset:#x}: element is {code}")]
    #[diagnostic(code(draw2svg::object::unsupported_segment), severity(Warning))]
    UnsupportedSegment { offset: usize, code: i32 },

    #[error("curve in flattened stroke of path {offset:#x}; caps omitted")]
    #[diagnostic(code(draw2svg::object::curve_in_stroke), severity(Warning))]
    CurveInStroke { offset: usize },

    #[error("cap path aborted at object {offset:#x}: element is {code}")]
    #[diagnostic(code(draw2svg::object::cap_path_aborted), severity(Warning))]
    CapPathAborted { offset: usize, code: i32 },

    #[error("stroke expansion of path {offset:#x} failed: {reason}")]
    #[diagnostic(code(draw2svg::object::stroke_expansion), severity(Warning))]
    StrokeExpansionFailed { offset: usize, reason: String },

    #[error("font \"{font}\" rejected for text {text:?}: {reason}")]
    #[diagnostic(code(draw2svg::object::font_rejected), severity(Warning))]
    FontRejected {
        font: String,
        text: String,
        reason: String,
    },

    #[error("text {text:?} at {offset:#x} skipped: no usable outline font")]
    #[diagnostic(code(draw2svg::object::text_skipped), severity(Warning))]
    TextSkipped { offset: usize, text: String },

    #[error("painting text {text:?} in \"{font}\" failed: {reason}")]
    #[diagnostic(code(draw2svg::object::glyph_paint), severity(Warning))]
    GlyphPaintFailed {
        font: String,
        text: String,
        reason: String,
    },

    #[error("text {text:?} at {offset:#x} has a singular transform")]
    #[diagnostic(
        code(draw2svg::object::singular_transform),
        severity(Warning),
        help("the matrix determinant is zero, so the text cannot be placed")
    )]
    SingularTextTransform { offset: usize, text: String },

    #[error("sprite {name:?} at {offset:#x} skipped: {reason}")]
    #[diagnostic(code(draw2svg::object::sprite_size), severity(Warning))]
    SpriteSize {
        offset: usize,
        name: String,
        reason: String,
    },

    #[error("malformed object (tag {tag}) at {offset:#x}: {reason}")]
    #[diagnostic(code(draw2svg::object::malformed), severity(Warning))]
    MalformedObject {
        offset: usize,
        tag: u32,
        reason: String,
    },
}

// ============================================================================
// Service Errors
// ============================================================================

/// Failures reported by the external geometry services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0} is not available")]
    Unavailable(String),

    #[error("{0}")]
    Failed(String),
}

// ============================================================================
// Argument Errors
// ============================================================================

/// Errors from parsing command-line measure, scale and fit values
#[derive(Error, Diagnostic, Debug)]
pub enum ArgError {
    #[error("cannot parse {what}")]
    #[diagnostic(code(draw2svg::args::syntax), help("expected {expected}"))]
    Syntax {
        what: &'static str,
        expected: &'static str,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("unknown unit: {unit}")]
    #[diagnostic(
        code(draw2svg::args::unknown_unit),
        help("use one of in, mm, cm, pt or native")
    )]
    UnknownUnit {
        unit: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a unit")]
        span: SourceSpan,
    },

    #[error("{what} must be finite and non-zero")]
    #[diagnostic(code(draw2svg::args::zero))]
    Zero {
        what: &'static str,
        #[source_code]
        src: NamedSource<String>,
        #[label("this value")]
        span: SourceSpan,
    },
}
