//! Units, colours and geometry primitives shared by the decoder and the
//! emitter.
//!
//! Drawfile coordinates are signed 32-bit draw-units: 1/256 of an OS unit,
//! 180 × 256 per inch, with y increasing upwards.

use std::fmt;

use glam::{DAffine2, DMat2, DVec2, IVec2, dvec2};

/// Draw-units per inch
pub const DRAW_PER_INCH: f64 = 180.0 * 256.0;
/// Draw-units per point
pub const DRAW_PER_POINT: f64 = 640.0;
/// Draw-units per millimetre (the historical 0.0394 in/mm approximation)
pub const DRAW_PER_MM: f64 = DRAW_PER_INCH * 0.0394;
/// Draw-units per centimetre
pub const DRAW_PER_CM: f64 = DRAW_PER_MM * 10.0;

/// Output unit for declared sizes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Inch,
    Millimetre,
    Centimetre,
    Point,
    /// Draw-units, written without a suffix
    Native,
}

impl Unit {
    pub const ALL: [Unit; 5] = [
        Unit::Inch,
        Unit::Millimetre,
        Unit::Centimetre,
        Unit::Point,
        Unit::Native,
    ];

    /// The suffix written after numbers in this unit
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Inch => "in",
            Unit::Millimetre => "mm",
            Unit::Centimetre => "cm",
            Unit::Point => "pt",
            Unit::Native => "",
        }
    }

    /// Look a unit up by its suffix. `"native"` is accepted for the empty suffix.
    pub fn from_suffix(suffix: &str) -> Option<Unit> {
        match suffix {
            "native" => Some(Unit::Native),
            s => Unit::ALL.into_iter().find(|u| u.suffix() == s),
        }
    }

    fn draw_units(self) -> f64 {
        match self {
            Unit::Inch => DRAW_PER_INCH,
            Unit::Millimetre => DRAW_PER_MM,
            Unit::Centimetre => DRAW_PER_CM,
            Unit::Point => DRAW_PER_POINT,
            Unit::Native => 1.0,
        }
    }

    /// Convert draw-units into this unit
    #[inline]
    pub fn from_draw(self, value: f64) -> f64 {
        value / self.draw_units()
    }

    /// Convert a value in this unit into draw-units
    #[inline]
    pub fn to_draw(self, value: f64) -> f64 {
        value * self.draw_units()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Native => f.write_str("native"),
            u => f.write_str(u.suffix()),
        }
    }
}

/// A drawfile colour word, `0xBBGGRRxx` where the low byte is transparency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Colour(pub u32);

impl Colour {
    /// The "transparent" colour word
    pub const TRANSPARENT: Colour = Colour(0xFFFF_FFFF);

    pub fn rgb(r: u8, g: u8, b: u8) -> Colour {
        Colour(u32::from(b) << 24 | u32::from(g) << 16 | u32::from(r) << 8)
    }

    /// Opacity as 0..=255
    #[inline]
    pub fn alpha(self) -> u8 {
        !(self.0 as u8)
    }

    /// Whether anything is painted with this colour at all
    #[inline]
    pub fn is_visible(self) -> bool {
        self.alpha() != 0
    }

    /// Opacity when partial, `None` when fully opaque
    pub fn partial_opacity(self) -> Option<f64> {
        match self.alpha() {
            255 => None,
            a => Some(f64::from(a) / 255.0),
        }
    }

    /// `#RRGGBB`
    pub fn hex(self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}",
            (self.0 >> 8) & 0xff,
            (self.0 >> 16) & 0xff,
            (self.0 >> 24) & 0xff
        )
    }
}

/// Integer bounding box in draw-units (y-up)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BBox {
    pub min: IVec2,
    pub max: IVec2,
}

impl BBox {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: IVec2::new(x0, y0),
            max: IVec2::new(x1, y1),
        }
    }
}

/// Axis-aligned rectangle with floating-point corners
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle holding all the points. Empty input gives the zero rectangle.
    pub fn enclosing(points: &[DVec2]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::default();
        };
        rest.iter().fold(Self::new(*first, *first), |r, p| Self {
            min: r.min.min(*p),
            max: r.max.max(*p),
        })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) / 2.0
    }

    /// Grow outwards by `by` on each side
    pub fn expand(&self, by: DVec2) -> Self {
        Self {
            min: self.min - by,
            max: self.max + by,
        }
    }

    /// Scale each axis about the rectangle's own midpoint
    pub fn scale_about_center(&self, factor: DVec2) -> Self {
        let mid = self.center();
        Self {
            min: (self.min - mid) * factor + mid,
            max: (self.max - mid) * factor + mid,
        }
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            min: dvec2(f(self.min.x), f(self.min.y)),
            max: dvec2(f(self.max.x), f(self.max.y)),
        }
    }
}

/// A drawfile transformation matrix.
///
/// `a b c d` are 16.16 fixed point, `e f` are draw-units, and the mapping is
/// `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transform {
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
    pub e: i32,
    pub f: i32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 0x10000,
        b: 0,
        c: 0,
        d: 0x10000,
        e: 0,
        f: 0,
    };

    /// The linear part as floating point `[a, b, c, d]`
    pub fn linear(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d].map(|v| f64::from(v) / 65536.0)
    }

    pub fn to_affine(&self) -> DAffine2 {
        let [a, b, c, d] = self.linear();
        DAffine2::from_mat2_translation(
            DMat2::from_cols(dvec2(a, b), dvec2(c, d)),
            dvec2(f64::from(self.e), f64::from(self.f)),
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Format a number the way C's `%g` does: six significant figures, trailing
/// zeros trimmed, exponent form below 1e-4 and from 1e6 up.
pub fn fmt_num(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    const SIG_FIGS: i32 = 6;
    // Round first so that 999999.5 moves into exponent form like C does.
    let sci = format!("{:.*e}", (SIG_FIGS - 1) as usize, value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((&sci, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= SIG_FIGS {
        let mantissa = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else {
        let decimals = (SIG_FIGS - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
