//! Decoded drawfile objects
//!
//! Every object kind is its own type implementing [`Emit`]; [`Object`]
//! dispatches over them with `enum_dispatch`.

use enum_dispatch::enum_dispatch;
use glam::IVec2;

use crate::render::EmitContext;
use crate::types::{BBox, Colour, Transform};

// ============================================================================
// Path data
// ============================================================================

/// One path element. Coordinates are draw-units, y-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Terminates the element list (code 0)
    End,
    /// Start a new sub-path (code 2)
    MoveTo(IVec2),
    /// Move without starting a visible sub-path (code 3)
    SpecialMove(IVec2),
    /// Close the sub-path without a closing line (code 4)
    CloseGap,
    /// Close the sub-path with a line back to its start (code 5)
    ClosePath,
    /// Cubic Bézier: two control points and the end point (code 6)
    CurveTo(IVec2, IVec2, IVec2),
    /// Invisible line (code 7)
    GapTo(IVec2),
    /// Line (code 8)
    LineTo(IVec2),
    /// An element code with no known meaning; decoding stops here
    Unknown(i32),
}

impl Segment {
    /// The numeric element code
    pub fn code(&self) -> i32 {
        match self {
            Segment::End => 0,
            Segment::MoveTo(_) => 2,
            Segment::SpecialMove(_) => 3,
            Segment::CloseGap => 4,
            Segment::ClosePath => 5,
            Segment::CurveTo(..) => 6,
            Segment::GapTo(_) => 7,
            Segment::LineTo(_) => 8,
            Segment::Unknown(code) => *code,
        }
    }

    /// The point the pen ends up at, if the element moves it
    pub fn end_point(&self) -> Option<IVec2> {
        match *self {
            Segment::MoveTo(p)
            | Segment::SpecialMove(p)
            | Segment::GapTo(p)
            | Segment::LineTo(p)
            | Segment::CurveTo(_, _, p) => Some(p),
            _ => None,
        }
    }
}

// ============================================================================
// Stroke style
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Join {
    #[default]
    Miter,
    Round,
    Bevel,
    Inherit,
}

impl Join {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => Join::Miter,
            1 => Join::Round,
            2 => Join::Bevel,
            _ => Join::Inherit,
        }
    }

    pub fn bits(self) -> u32 {
        self as u32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Join::Miter => "miter",
            Join::Round => "round",
            Join::Bevel => "bevel",
            Join::Inherit => "inherit",
        }
    }
}

/// Triangular cap size in sixteenths of the line width
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TriangleCap {
    pub width: u8,
    pub length: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Cap {
    #[default]
    Butt,
    Round,
    Square,
    Triangle(TriangleCap),
}

impl Cap {
    pub fn from_bits(bits: u32, triangle: TriangleCap) -> Self {
        match bits & 3 {
            0 => Cap::Butt,
            1 => Cap::Round,
            2 => Cap::Square,
            _ => Cap::Triangle(triangle),
        }
    }

    pub fn is_triangle(self) -> bool {
        matches!(self, Cap::Triangle(_))
    }

    /// The SVG `stroke-linecap` keyword
    pub fn as_str(self) -> &'static str {
        match self {
            Cap::Butt => "butt",
            Cap::Round => "round",
            Cap::Square => "square",
            Cap::Triangle(_) => "inherit",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Winding {
    #[default]
    NonZero,
    EvenOdd,
}

impl Winding {
    pub fn from_bit(evenodd: bool) -> Self {
        if evenodd {
            Winding::EvenOdd
        } else {
            Winding::NonZero
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Winding::NonZero => "nonzero",
            Winding::EvenOdd => "evenodd",
        }
    }
}

/// Dash pattern in draw-units
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Dash {
    pub offset: i32,
    pub elements: Vec<i32>,
}

/// The decoded path style word
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StrokeStyle {
    pub join: Join,
    pub start_cap: Cap,
    pub end_cap: Cap,
    pub winding: Winding,
    pub dash: Option<Dash>,
}

impl StrokeStyle {
    /// Triangle cap factors shared by both ends, if either end uses them
    pub fn triangle(&self) -> Option<TriangleCap> {
        match (self.start_cap, self.end_cap) {
            (Cap::Triangle(t), _) | (_, Cap::Triangle(t)) => Some(t),
            _ => None,
        }
    }
}

// ============================================================================
// Objects
// ============================================================================

/// Font index to name mapping (tag 0)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontTable {
    pub offset: usize,
    pub entries: Vec<(u8, String)>,
}

/// Path object (tag 2)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathObject {
    pub offset: usize,
    pub bbox: BBox,
    pub fill: Colour,
    pub outline: Colour,
    /// Outline width in draw-units; 0 means "thin"
    pub width: i32,
    pub style: StrokeStyle,
    pub segments: Vec<Segment>,
}

/// Text object (tag 1, or tag 12 with a transform)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextObject {
    pub offset: usize,
    pub bbox: BBox,
    pub transform: Option<Transform>,
    pub kern: bool,
    pub right_to_left: bool,
    pub colour: Colour,
    pub background: Colour,
    /// Index into the font table
    pub font: u8,
    /// Font size in 1/640 point
    pub size: IVec2,
    pub baseline: IVec2,
    pub text: String,
}

/// A text object to be rendered through the glyph outline service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlinedText(pub TextObject);

/// The fields of a sprite header needed to size it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteHeader {
    pub name: String,
    /// Width in words, minus one
    pub width_words: i32,
    /// Height in rows, minus one
    pub height_rows: i32,
    pub first_bit: i32,
    pub last_bit: i32,
    pub mode: u32,
}

/// Sprite object (tag 5)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteObject {
    pub offset: usize,
    pub bbox: BBox,
    pub sprite: SpriteHeader,
}

/// Transformed sprite object (tag 13)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformedSprite {
    pub sprite: SpriteObject,
    pub transform: Transform,
}

/// Group object (tag 6)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub offset: usize,
    pub bbox: BBox,
    pub name: String,
    pub children: Vec<Object>,
}

/// Tagged object (tag 7): an identifier wrapped around one object
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggedObject {
    pub offset: usize,
    pub id: u32,
    pub object: Box<Object>,
}

/// An object the converter does not understand, kept only by extent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawObject {
    pub offset: usize,
    pub tag: u32,
    pub len: usize,
}

/// Writes one object's markup
#[enum_dispatch]
pub trait Emit {
    fn emit(&self, cx: &mut EmitContext<'_>);
}

#[enum_dispatch(Emit)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    FontTable(FontTable),
    Path(PathObject),
    Text(TextObject),
    TextOutline(OutlinedText),
    Sprite(SpriteObject),
    TransformedSprite(TransformedSprite),
    Group(Group),
    Tagged(TaggedObject),
    Unknown(RawObject),
}

impl Object {
    /// Byte offset of the object within the drawfile
    pub fn offset(&self) -> usize {
        match self {
            Object::FontTable(o) => o.offset,
            Object::Path(o) => o.offset,
            Object::Text(o) => o.offset,
            Object::TextOutline(o) => o.0.offset,
            Object::Sprite(o) => o.offset,
            Object::TransformedSprite(o) => o.sprite.offset,
            Object::Group(o) => o.offset,
            Object::Tagged(o) => o.offset,
            Object::Unknown(o) => o.offset,
        }
    }
}
