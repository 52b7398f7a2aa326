//! Built-in constants for the emitted document

/// Word-wrap column for pretty output
pub const LINE_WIDTH: usize = 76;
/// Columns per tab when indenting
pub const TAB_WIDTH: usize = 8;

/// Font used for indices the font table never set
pub const DEFAULT_FONT: &str = "System.Fixed";

/// Fonts tried in turn for text-to-path: the declared font, then these,
/// with their size scale factors
pub const FALLBACK_FONTS: [(&str, f64, f64); 2] =
    [("System.Fixed", 1.0, 1.0), ("Corpus.Medium", 1.6, 1.5)];

/// Flatness handed to the stroke service, in draw-units
pub const FLATNESS: i32 = 120;

/// Default thin-line width in draw-units
pub const THIN: f64 = 1.0;

/// Below this a text matrix is treated as singular
pub const SINGULAR_EPSILON: f64 = 1e-9;

pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8' standalone='no' ?>\n";

pub const DOCTYPE: [&str; 3] = [
    "<!DOCTYPE svg PUBLIC\n",
    " '-//W3C//DTD SVG 20000303 Stylable//EN'\n",
    " 'http://www.w3.org/TR/2000/03/WD-SVG-20000303/DTD/svg-20000303-stylable.dtd'>\n",
];

/// Style declarations on the root element after the first line
pub const ROOT_STYLE: [&str; 5] = [
    "fill-opacity: 1;\n",
    "stroke-dasharray: none;\n",
    "stroke-linejoin: miter;\n",
    "stroke-linecap: butt;\n",
    "stroke-opacity: 1;'\n",
];

/// Fill colour of sprite placeholders
pub const SPRITE_FILL: &str = "#777";
