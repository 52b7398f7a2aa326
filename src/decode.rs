//! Drawfile decoding
//!
//! The object stream is a list of `(tag, length, payload)` records. Each
//! record is skipped by its own length, so tags the converter does not know
//! never desynchronise the walk.

use glam::IVec2;

use crate::errors::{LoadError, ObjectWarning};
use crate::log::debug;
use crate::object::*;
use crate::types::{BBox, Colour, Transform};

/// Size of the file header; objects start here
pub const HEADER_LEN: usize = 40;
const OBJECT_HEADER_LEN: usize = 8;
/// Deepest nesting of groups and tagged objects that is decoded
pub const MAX_DEPTH: usize = 256;

pub mod tag {
    pub const FONT_TABLE: u32 = 0;
    pub const TEXT: u32 = 1;
    pub const PATH: u32 = 2;
    pub const SPRITE: u32 = 5;
    pub const GROUP: u32 = 6;
    pub const TAGGED: u32 = 7;
    pub const TRANSFORMED_TEXT: u32 = 12;
    pub const TRANSFORMED_SPRITE: u32 = 13;
}

/// Decoder switches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject input without the `Draw` signature
    pub check_signature: bool,
    /// Decode text objects as [`Object::TextOutline`]
    pub text_as_outline: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            check_signature: true,
            text_as_outline: false,
        }
    }
}

/// A decoded drawfile
#[derive(Clone, Debug, PartialEq)]
pub struct Drawfile {
    pub version: (u32, u32),
    pub creator: String,
    pub bbox: BBox,
    pub objects: Vec<Object>,
    /// Problems found while walking the object stream
    pub warnings: Vec<ObjectWarning>,
}

impl Drawfile {
    pub fn parse(data: &[u8], options: &DecodeOptions) -> Result<Self, LoadError> {
        if data.len() < HEADER_LEN {
            if options.check_signature && !data.starts_with(b"Draw") {
                return Err(LoadError::NotADrawfile {
                    found: latin1(&data[..data.len().min(4)]),
                });
            }
            return Err(LoadError::Truncated {
                len: data.len(),
                need: HEADER_LEN,
            });
        }
        if options.check_signature && &data[..4] != b"Draw" {
            return Err(LoadError::NotADrawfile {
                found: latin1(&data[..4]),
            });
        }

        let header = Record::new(&data[..HEADER_LEN], 0);
        let word = |i| header.word(i).unwrap_or_default();
        let version = (word(1) as u32, word(2) as u32);
        let creator = header.fixed_str(12, 12);
        let bbox = BBox::new(word(6), word(7), word(8), word(9));

        let mut walker = Walker {
            data,
            options,
            warnings: Vec::new(),
            depth: 0,
        };
        let objects = walker.list(HEADER_LEN, data.len());
        debug!(
            objects = objects.len(),
            warnings = walker.warnings.len(),
            "decoded drawfile"
        );

        Ok(Drawfile {
            version,
            creator,
            bbox,
            objects,
            warnings: walker.warnings,
        })
    }
}

struct Walker<'a> {
    data: &'a [u8],
    options: &'a DecodeOptions,
    warnings: Vec<ObjectWarning>,
    /// Containers entered so far
    depth: usize,
}

impl Walker<'_> {
    /// Decode every object in `[start, end)`
    fn list(&mut self, start: usize, end: usize) -> Vec<Object> {
        let mut objects = Vec::new();
        let mut pos = start;
        while pos < end {
            match self.one(pos, end) {
                Ok((object, advance)) => {
                    if let Some(object) = object {
                        objects.push(object);
                    }
                    pos += advance;
                }
                Err(warning) => {
                    self.warnings.push(warning);
                    break;
                }
            }
        }
        objects
    }

    /// Decode the object at `pos`. A malformed payload costs only that
    /// object; a malformed header ends the enclosing list.
    fn one(&mut self, pos: usize, end: usize) -> Result<(Option<Object>, usize), ObjectWarning> {
        if end - pos < OBJECT_HEADER_LEN {
            return Err(ObjectWarning::MalformedObject {
                offset: pos,
                tag: 0,
                reason: format!("{} trailing bytes", end - pos),
            });
        }
        let data = self.data;
        let header = Record::new(&data[pos..pos + OBJECT_HEADER_LEN], pos);
        let tag = header.uword(0).unwrap_or_default();
        let len = header.uword(1).unwrap_or_default() as usize;
        if len < OBJECT_HEADER_LEN || len > end - pos {
            return Err(ObjectWarning::MalformedObject {
                offset: pos,
                tag,
                reason: format!("length {len} does not fit in {} bytes", end - pos),
            });
        }
        let advance = len & !3;
        let rec = Record::new(&data[pos..pos + len], pos);

        let decoded = match tag {
            tag::FONT_TABLE => Ok(Object::FontTable(font_table(&rec))),
            tag::TEXT | tag::TRANSFORMED_TEXT => text(&rec, tag).map(|t| {
                if self.options.text_as_outline {
                    Object::TextOutline(OutlinedText(t))
                } else {
                    Object::Text(t)
                }
            }),
            tag::PATH => path(&rec).map(Object::Path),
            tag::SPRITE => sprite(&rec, 6).map(Object::Sprite),
            tag::TRANSFORMED_SPRITE => transformed_sprite(&rec).map(Object::TransformedSprite),
            tag::GROUP => self.group(&rec),
            tag::TAGGED => self.tagged(&rec),
            _ => {
                debug!(offset = pos, tag, len, "skipping unknown object");
                Ok(Object::Unknown(RawObject {
                    offset: pos,
                    tag,
                    len,
                }))
            }
        };

        match decoded {
            Ok(object) => Ok((Some(object), advance)),
            Err(reason) => {
                self.warnings.push(ObjectWarning::MalformedObject {
                    offset: pos,
                    tag,
                    reason,
                });
                Ok((None, advance))
            }
        }
    }

    /// Decode the contents of a container one level further down
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> Result<T, String> {
        if self.depth >= MAX_DEPTH {
            return Err(format!("nested more than {MAX_DEPTH} deep"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        Ok(result)
    }

    fn group(&mut self, rec: &Record<'_>) -> Result<Object, String> {
        let bbox = rec.bbox()?;
        rec.need(36)?;
        let name = rec.fixed_str(24, 12);
        let (start, end) = (rec.offset + 36, rec.offset + rec.bytes.len());
        let children = self.nested(|walker| walker.list(start, end))?;
        Ok(Object::Group(Group {
            offset: rec.offset,
            bbox,
            name,
            children,
        }))
    }

    fn tagged(&mut self, rec: &Record<'_>) -> Result<Object, String> {
        let id = rec.uword(6)?;
        let start = rec.offset + 28;
        let end = rec.offset + rec.bytes.len();
        if start >= end {
            return Err("tagged object has no content".to_string());
        }
        match self.nested(|walker| walker.one(start, end))? {
            Ok((Some(object), _)) => Ok(Object::Tagged(TaggedObject {
                offset: rec.offset,
                id,
                object: Box::new(object),
            })),
            // The embedded object already reported its own problem.
            Ok((None, _)) => Ok(Object::Unknown(RawObject {
                offset: rec.offset,
                tag: tag::TAGGED,
                len: rec.bytes.len(),
            })),
            Err(warning) => Err(warning.to_string()),
        }
    }
}

// ============================================================================
// Record access
// ============================================================================

/// Bounds-checked little-endian view of one object record
pub(crate) struct Record<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Record<'a> {
    pub(crate) fn new(bytes: &'a [u8], offset: usize) -> Self {
        Self { bytes, offset }
    }

    fn need(&self, len: usize) -> Result<(), String> {
        if self.bytes.len() < len {
            Err(format!("record is {} bytes, needs {len}", self.bytes.len()))
        } else {
            Ok(())
        }
    }

    pub(crate) fn word(&self, index: usize) -> Result<i32, String> {
        let at = index * 4;
        self.bytes
            .get(at..at + 4)
            .and_then(|b| b.try_into().ok())
            .map(i32::from_le_bytes)
            .ok_or_else(|| format!("record ends before word {index}"))
    }

    pub(crate) fn uword(&self, index: usize) -> Result<u32, String> {
        self.word(index).map(|w| w as u32)
    }

    fn point(&self, index: usize) -> Result<IVec2, String> {
        Ok(IVec2::new(self.word(index)?, self.word(index + 1)?))
    }

    fn bbox(&self) -> Result<BBox, String> {
        Ok(BBox::new(
            self.word(2)?,
            self.word(3)?,
            self.word(4)?,
            self.word(5)?,
        ))
    }

    fn transform(&self, index: usize) -> Result<Transform, String> {
        Ok(Transform {
            a: self.word(index)?,
            b: self.word(index + 1)?,
            c: self.word(index + 2)?,
            d: self.word(index + 3)?,
            e: self.word(index + 4)?,
            f: self.word(index + 5)?,
        })
    }

    /// Bytes from `at` up to the next NUL, or to the end of the record
    fn c_bytes(&self, at: usize) -> &'a [u8] {
        let tail = self.bytes.get(at..).unwrap_or_default();
        let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        &tail[..end]
    }

    /// NUL-terminated Latin-1 string starting at byte `at`
    fn c_str(&self, at: usize) -> String {
        latin1(self.c_bytes(at))
    }

    /// Fixed-width name field, cut at the first NUL and right-trimmed
    fn fixed_str(&self, at: usize, len: usize) -> String {
        let field = self
            .bytes
            .get(at..(at + len).min(self.bytes.len()))
            .unwrap_or_default();
        let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        latin1(&field[..end]).trim_end().to_string()
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

// ============================================================================
// Object decoders
// ============================================================================

fn font_table(rec: &Record<'_>) -> FontTable {
    let mut entries = Vec::new();
    let mut pos = OBJECT_HEADER_LEN;
    while let Some(&index) = rec.bytes.get(pos) {
        if index == 0 {
            break;
        }
        // Step over the raw bytes; Latin-1 names grow when decoded
        let name = rec.c_bytes(pos + 1);
        pos += name.len() + 2;
        entries.push((index, latin1(name)));
    }
    FontTable {
        offset: rec.offset,
        entries,
    }
}

fn text(rec: &Record<'_>, tag: u32) -> Result<TextObject, String> {
    let bbox = rec.bbox()?;
    let (transform, flags, base) = if tag == tag::TRANSFORMED_TEXT {
        (Some(rec.transform(6)?), rec.uword(12)?, 13)
    } else {
        (None, 0, 6)
    };
    let style = rec.uword(base + 2)?;
    let string_at = (base + 7) * 4;
    rec.need(string_at)?;

    Ok(TextObject {
        offset: rec.offset,
        bbox,
        transform,
        kern: flags & 1 != 0,
        right_to_left: flags & 2 != 0,
        colour: Colour(rec.uword(base)?),
        background: Colour(rec.uword(base + 1)?),
        font: (style & 0xff) as u8,
        size: rec.point(base + 3)?,
        baseline: rec.point(base + 5)?,
        text: rec.c_str(string_at),
    })
}

pub(crate) fn path(rec: &Record<'_>) -> Result<PathObject, String> {
    let bbox = rec.bbox()?;
    let style_word = rec.uword(9)?;
    let triangle = TriangleCap {
        width: (style_word >> 16) as u8,
        length: (style_word >> 24) as u8,
    };

    let (dash, first) = if style_word & 0x80 != 0 {
        let offset = rec.word(10)?;
        let count = rec.word(11)?;
        if count < 0 {
            return Err(format!("negative dash count {count}"));
        }
        let elements = (0..count as usize)
            .map(|i| rec.word(12 + i))
            .collect::<Result<Vec<_>, _>>()?;
        (Some(Dash { offset, elements }), 12 + count as usize)
    } else {
        (None, 10)
    };

    Ok(PathObject {
        offset: rec.offset,
        bbox,
        fill: Colour(rec.uword(6)?),
        outline: Colour(rec.uword(7)?),
        width: rec.word(8)?,
        style: StrokeStyle {
            join: Join::from_bits(style_word),
            end_cap: Cap::from_bits(style_word >> 2, triangle),
            start_cap: Cap::from_bits(style_word >> 4, triangle),
            winding: Winding::from_bit(style_word & 0x40 != 0),
            dash,
        },
        segments: segments(rec, first)?,
    })
}

/// Path elements from word `first` up to and including the end marker.
/// An unknown element code is kept as [`Segment::Unknown`] and ends the list.
fn segments(rec: &Record<'_>, first: usize) -> Result<Vec<Segment>, String> {
    let words = rec.bytes.len() / 4;
    let mut out = Vec::new();
    let mut i = first;
    while i < words {
        let code = rec.word(i)?;
        let (segment, size) = match code {
            0 => (Segment::End, 1),
            2 => (Segment::MoveTo(rec.point(i + 1)?), 3),
            3 => (Segment::SpecialMove(rec.point(i + 1)?), 3),
            4 => (Segment::CloseGap, 1),
            5 => (Segment::ClosePath, 1),
            6 => (
                Segment::CurveTo(rec.point(i + 1)?, rec.point(i + 3)?, rec.point(i + 5)?),
                7,
            ),
            7 => (Segment::GapTo(rec.point(i + 1)?), 3),
            8 => (Segment::LineTo(rec.point(i + 1)?), 3),
            other => (Segment::Unknown(other), 1),
        };
        out.push(segment);
        if matches!(segment, Segment::End | Segment::Unknown(_)) {
            break;
        }
        i += size;
    }
    Ok(out)
}

fn sprite(rec: &Record<'_>, at: usize) -> Result<SpriteObject, String> {
    let bbox = rec.bbox()?;
    Ok(SpriteObject {
        offset: rec.offset,
        bbox,
        sprite: SpriteHeader {
            name: rec.fixed_str((at + 1) * 4, 12),
            width_words: rec.word(at + 4)?,
            height_rows: rec.word(at + 5)?,
            first_bit: rec.word(at + 6)?,
            last_bit: rec.word(at + 7)?,
            mode: rec.uword(at + 10)?,
        },
    })
}

fn transformed_sprite(rec: &Record<'_>) -> Result<TransformedSprite, String> {
    Ok(TransformedSprite {
        transform: rec.transform(6)?,
        sprite: sprite(rec, 12)?,
    })
}
