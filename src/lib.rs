//! Convert drawfiles to SVG.
//!
//! [`convert`] decodes a drawfile buffer and renders it with the portable
//! [`Services`]. [`convert_with`] takes caller-supplied services for glyph
//! outlines, stroke expansion and screen modes.

pub mod decode;
pub mod errors;
pub mod log;
pub mod measure;
pub mod object;
pub mod render;
pub mod services;
pub mod types;

pub use decode::{DecodeOptions, Drawfile};
pub use errors::{ArgError, ConvertError, LoadError, ObjectWarning, RenderError, ServiceError};
pub use render::{Conversion, RenderOptions, ScaleMode, render};
pub use services::Services;
pub use types::Unit;

/// Convert a drawfile to SVG using the built-in services
pub fn convert(data: &[u8], options: &RenderOptions) -> Result<Conversion, ConvertError> {
    convert_with(data, options, Services::default())
}

/// Convert a drawfile to SVG.
///
/// Decoder warnings come first in [`Conversion::warnings`], followed by
/// those raised while rendering, each group in document order.
pub fn convert_with(
    data: &[u8],
    options: &RenderOptions,
    services: Services<'_>,
) -> Result<Conversion, ConvertError> {
    let drawfile = Drawfile::parse(data, &options.decode_options())?;
    let mut conversion = render(&drawfile, options, services)?;
    let mut warnings = drawfile.warnings;
    warnings.append(&mut conversion.warnings);
    conversion.warnings = warnings;
    Ok(conversion)
}
