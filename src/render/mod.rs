//! SVG rendering for decoded drawfiles
//!
//! This module is organized into submodules:
//! - `defaults`: Built-in constants and fixed document text
//! - `writer`: Column-tracking output with word wrap and escaping
//! - `viewport`: View box, scale factors and declared size
//! - `context`: EmitContext threaded through every object
//! - `path`: Path data
//! - `stroke`: Path objects, stroke division and cap synthesis
//! - `sprite`: Sprite placement
//! - `text`: Native and outlined text
//! - `walk`: Font tables, groups and the object walk

pub mod context;
pub mod defaults;
pub mod path;
pub mod sprite;
pub mod stroke;
pub mod text;
pub mod viewport;
pub mod walk;
pub mod writer;

pub use context::EmitContext;
pub use viewport::Viewport;
pub use writer::{Escape, OutputWriter};

use std::fmt;

use glam::DVec2;

use crate::decode::{DecodeOptions, Drawfile};
use crate::errors::{ObjectWarning, RenderError};
use crate::log::debug;
use crate::services::Services;
use crate::types::{Unit, fmt_num};

/// How the drawing is scaled into the declared size
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleMode {
    /// Independent x and y factors
    Factor(DVec2),
    /// Uniform scale giving this width in draw-units
    FitWidth(f64),
    /// Uniform scale giving this height in draw-units
    FitHeight(f64),
    /// Independent scales giving this box in draw-units
    FitBox(DVec2),
}

impl Default for ScaleMode {
    fn default() -> Self {
        ScaleMode::Factor(DVec2::ONE)
    }
}

/// How the root element declares its size
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Sizing {
    /// Both forms as comments only
    None,
    /// Percentages, the longer axis at 100%
    #[default]
    Percent,
    /// Lengths in the output unit
    Absolute,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum AspectFit {
    #[default]
    Meet,
    Slice,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Align {
    Min,
    #[default]
    Mid,
    Max,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Min => "Min",
            Align::Mid => "Mid",
            Align::Max => "Max",
        }
    }
}

/// `preserveAspectRatio` policy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AspectRatio {
    pub fit: AspectFit,
    pub x: Align,
    pub y: Align,
}

impl AspectRatio {
    /// Whether the attribute can be left out
    pub fn is_default(&self) -> bool {
        *self == AspectRatio::default()
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fit {
            AspectFit::None => f.write_str("none"),
            fit => {
                write!(f, "x{}Y{}", self.x.as_str(), self.y.as_str())?;
                if fit == AspectFit::Slice {
                    f.write_str(" slice")?;
                }
                Ok(())
            }
        }
    }
}

/// Conversion settings
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// Unit of the declared width, height, x and y
    pub unit: Unit,
    /// Stroke width in draw-units for "thin" outlines
    pub thin: f64,
    pub scale: ScaleMode,
    /// Margin in draw-units at the final scale
    pub margin: DVec2,
    pub sizing: Sizing,
    pub aspect: AspectRatio,
    /// Keep groups as `<g>` elements
    pub groups: bool,
    /// Write `x` and `y` on the root element
    pub top_xy: bool,
    /// Paint for a rectangle behind the drawing
    pub background: Option<String>,
    /// Render text through the glyph outline service
    pub text_to_path: bool,
    /// Relative `c`, `l`, `h` and `v` path commands
    pub relative_coords: bool,
    /// Require the `Draw` signature
    pub check_signature: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            unit: Unit::Inch,
            thin: defaults::THIN,
            scale: ScaleMode::default(),
            margin: DVec2::ZERO,
            sizing: Sizing::Percent,
            aspect: AspectRatio::default(),
            groups: true,
            top_xy: false,
            background: None,
            text_to_path: false,
            relative_coords: true,
            check_signature: true,
        }
    }
}

impl RenderOptions {
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            check_signature: self.check_signature,
            text_as_outline: self.text_to_path,
        }
    }
}

/// A finished document
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
    pub svg: String,
    /// Per-object problems, in document order
    pub warnings: Vec<ObjectWarning>,
}

/// Render a decoded drawfile to an SVG document
pub fn render(
    drawfile: &Drawfile,
    options: &RenderOptions,
    services: Services<'_>,
) -> Result<Conversion, RenderError> {
    let viewport = Viewport::compute(drawfile.bbox, options)?;
    debug!(
        view_box = ?viewport.view_box,
        factor = ?viewport.factor,
        "computed viewport"
    );

    let mut cx = EmitContext::new(options, services);
    write_root(&mut cx.out, &viewport, options);

    cx.out.push_indent(2);
    if let Some(background) = &options.background {
        write_background(&mut cx.out, &viewport, background);
    }
    walk::emit_list(&mut cx, &drawfile.objects);
    cx.out.pop_indent(2);
    cx.out.raw("</svg>\n");

    Ok(Conversion {
        svg: cx.out.finish(),
        warnings: cx.warnings,
    })
}

/// Prologue and the `<svg>` start tag
fn write_root(out: &mut OutputWriter, viewport: &Viewport, options: &RenderOptions) {
    let unit = options.unit.suffix();
    let size = &viewport.size;
    let (width, height) = (fmt_num(size.width()), fmt_num(size.height()));
    let (wpc, hpc) = (fmt_num(viewport.percent.x), fmt_num(viewport.percent.y));

    out.raw(defaults::XML_DECLARATION);
    out.raw(&format!(
        "<!-- Generated by draw2svg {} -->\n",
        env!("CARGO_PKG_VERSION")
    ));
    for line in defaults::DOCTYPE {
        out.raw(line);
    }

    if options.sizing != Sizing::Absolute {
        out.raw(&format!(
            "<!-- width='{width}{unit}' height='{height}{unit}' -->\n"
        ));
    }
    if options.sizing != Sizing::Percent {
        out.raw(&format!("<!-- width='{wpc}%' height='{hpc}%' -->\n"));
    }

    out.raw("<svg xmlns='http://www.w3.org/2000/svg'\n");
    out.raw("     xmlns:xlink='http://www.w3.org/1999/xlink'\n");
    if options.top_xy {
        out.raw(&format!(
            "     x='{}{unit}' y='{}{unit}'\n",
            fmt_num(size.min.x),
            fmt_num(size.min.y)
        ));
    }
    match options.sizing {
        Sizing::Absolute => out.raw(&format!(
            "     width='{width}{unit}' height='{height}{unit}'\n"
        )),
        Sizing::Percent => out.raw(&format!("     width='{wpc}%' height='{hpc}%'\n")),
        Sizing::None => {}
    }
    if !options.aspect.is_default() {
        out.raw(&format!("     preserveAspectRatio='{}'\n", options.aspect));
    }

    out.raw("     style='fill-rule: evenodd;\n");
    out.push_indent(12);
    for line in defaults::ROOT_STYLE {
        out.raw(line);
    }
    out.pop_indent(12);

    let vb = &viewport.view_box;
    out.raw(&format!(
        "     viewBox='{} {} {} {}'>\n",
        fmt_num(vb.min.x),
        fmt_num(vb.min.y),
        fmt_num(vb.width()),
        fmt_num(vb.height())
    ));
}

fn write_background(out: &mut OutputWriter, viewport: &Viewport, paint: &str) {
    let vb = &viewport.view_box;
    out.raw("<rect style='fill: ");
    out.escaped(paint, Escape::SingleQuoted, false);
    out.raw("; stroke: none;'\n");
    out.push_indent(6);
    out.raw(&format!(
        "x='{}' y='{}' width='{}' height='{}' />\n",
        fmt_num(vb.min.x),
        fmt_num(vb.min.y),
        fmt_num(vb.width()),
        fmt_num(vb.height())
    ));
    out.pop_indent(6);
}

#[cfg(test)]
mod tests {
    use glam::dvec2;

    use super::*;
    use crate::types::BBox;

    fn drawfile(bbox: BBox) -> Drawfile {
        Drawfile {
            version: (201, 0),
            creator: "test".into(),
            bbox,
            objects: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn svg(options: &RenderOptions) -> String {
        render(&drawfile(BBox::new(0, 0, 46080, 23040)), options, Services::default())
            .unwrap()
            .svg
    }

    #[test]
    fn default_prologue() {
        let out = svg(&RenderOptions::default());
        let version = env!("CARGO_PKG_VERSION");
        assert_eq!(
            out,
            format!(
                "<?xml version='1.0' encoding='UTF-8' standalone='no' ?>\n\
                 <!-- Generated by draw2svg {version} -->\n\
                 <!DOCTYPE svg PUBLIC\n \
                 '-//W3C//DTD SVG 20000303 Stylable//EN'\n \
                 'http://www.w3.org/TR/2000/03/WD-SVG-20000303/DTD/svg-20000303-stylable.dtd'>\n\
                 <!-- width='1in' height='0.5in' -->\n\
                 <svg xmlns='http://www.w3.org/2000/svg'\n     \
                 xmlns:xlink='http://www.w3.org/1999/xlink'\n     \
                 width='100%' height='50%'\n     \
                 style='fill-rule: evenodd;\n\
                 \t    fill-opacity: 1;\n\
                 \t    stroke-dasharray: none;\n\
                 \t    stroke-linejoin: miter;\n\
                 \t    stroke-linecap: butt;\n\
                 \t    stroke-opacity: 1;'\n     \
                 viewBox='0 -23040 46080 23040'>\n\
                 </svg>\n"
            )
        );
    }

    #[test]
    fn absolute_size_and_position() {
        let out = svg(&RenderOptions {
            sizing: Sizing::Absolute,
            top_xy: true,
            unit: Unit::Point,
            ..Default::default()
        });
        assert!(out.contains("<!-- width='100%' height='50%' -->\n"));
        assert!(!out.contains("<!-- width='72pt'"));
        assert!(out.contains("     x='0pt' y='-36pt'\n"));
        assert!(out.contains("     width='72pt' height='36pt'\n"));
    }

    #[test]
    fn no_declared_size() {
        let out = svg(&RenderOptions {
            sizing: Sizing::None,
            ..Default::default()
        });
        assert!(out.contains("<!-- width='1in' height='0.5in' -->\n"));
        assert!(out.contains("<!-- width='100%' height='50%' -->\n"));
        assert!(!out.contains("     width="));
    }

    #[test]
    fn aspect_ratio_only_when_not_default() {
        assert!(!svg(&RenderOptions::default()).contains("preserveAspectRatio"));
        let slice = AspectRatio {
            fit: AspectFit::Slice,
            x: Align::Min,
            y: Align::Max,
        };
        let out = svg(&RenderOptions {
            aspect: slice,
            ..Default::default()
        });
        assert!(out.contains("     preserveAspectRatio='xMinYMax slice'\n"));
        let none = AspectRatio {
            fit: AspectFit::None,
            ..Default::default()
        };
        assert_eq!(none.to_string(), "none");
        let min = AspectRatio {
            x: Align::Min,
            ..Default::default()
        };
        assert_eq!(min.to_string(), "xMinYMid");
    }

    #[test]
    fn background_rect_covers_view_box() {
        let out = svg(&RenderOptions {
            background: Some("#fff".into()),
            margin: dvec2(10.0, 20.0),
            ..Default::default()
        });
        assert!(out.contains(
            "  <rect style='fill: #fff; stroke: none;'\n\
             \tx='-10' y='-23060' width='46100' height='23080' />\n"
        ));
    }

    #[test]
    fn scale_errors_are_fatal() {
        let result = render(
            &drawfile(BBox::new(0, 0, 0, 100)),
            &RenderOptions {
                scale: ScaleMode::FitWidth(100.0),
                ..Default::default()
            },
            Services::default(),
        );
        assert_eq!(result, Err(RenderError::EmptyExtent { axis: "width" }));
    }
}
