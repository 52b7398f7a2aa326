//! Emission context - state threaded through every object's emitter

use super::RenderOptions;
use super::defaults::DEFAULT_FONT;
use super::writer::OutputWriter;
use crate::errors::ObjectWarning;
use crate::services::Services;

/// Per-document emitter state
pub struct EmitContext<'a> {
    pub out: OutputWriter,
    pub options: &'a RenderOptions,
    pub services: Services<'a>,
    /// Font names by font-table index
    fonts: Vec<String>,
    pub warnings: Vec<ObjectWarning>,
}

impl<'a> EmitContext<'a> {
    pub fn new(options: &'a RenderOptions, services: Services<'a>) -> Self {
        Self {
            out: OutputWriter::new(),
            options,
            services,
            fonts: vec![DEFAULT_FONT.to_string(); 256],
            warnings: Vec::new(),
        }
    }

    pub fn font(&self, index: u8) -> &str {
        &self.fonts[usize::from(index)]
    }

    pub fn set_font(&mut self, index: u8, name: &str) {
        self.fonts[usize::from(index)] = name.to_string();
    }

    pub fn warn(&mut self, warning: ObjectWarning) {
        crate::log::warn!(%warning, "object diagnostic");
        self.warnings.push(warning);
    }
}
