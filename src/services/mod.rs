//! External geometry services
//!
//! The converter asks three collaborators for things it cannot work out
//! from the drawfile alone: glyph outlines for text-to-path, the outline of
//! a stroked path, and the pixel geometry of legacy screen modes. Each is a
//! trait so callers can plug in a platform implementation or a test double.

mod flatten;
mod modes;

pub use flatten::Flattener;
pub use modes::StandardModes;

use glam::{DVec2, IVec2};

use crate::decode::{self, Record};
use crate::errors::ServiceError;
use crate::object::{Dash, Join, Segment, TriangleCap, Winding};
use crate::types::Transform;

// ============================================================================
// Outline record streams
// ============================================================================

/// One flagged sub-path of a service result
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct OutlinePath {
    pub winding: Winding,
    pub segments: Vec<Segment>,
}

/// The shape returned by the glyph and stroke services
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Outline {
    pub paths: Vec<OutlinePath>,
}

impl Outline {
    /// Decode a buffer of path-object records, as written by a font
    /// manager redirected to a buffer. A zero tag ends the stream.
    pub fn from_records(bytes: &[u8]) -> Result<Outline, ServiceError> {
        let mut paths = Vec::new();
        let mut pos = 0;
        while pos + 8 <= bytes.len() {
            let header = Record::new(&bytes[pos..pos + 8], pos);
            let tag = header.uword(0).map_err(ServiceError::Failed)?;
            if tag == 0 {
                break;
            }
            let len = header.uword(1).map_err(ServiceError::Failed)? as usize;
            if len < 8 || pos + len > bytes.len() {
                return Err(ServiceError::Failed(format!(
                    "outline record at {pos:#x} has length {len}"
                )));
            }
            let path = decode::path(&Record::new(&bytes[pos..pos + len], pos))
                .map_err(ServiceError::Failed)?;
            paths.push(OutlinePath {
                winding: path.style.winding,
                segments: path.segments,
            });
            pos += len & !3;
        }
        Ok(Outline { paths })
    }

    /// The fill rule most sub-paths ask for. Ties go to nonzero.
    pub fn majority_winding(&self) -> Winding {
        let evenodd = self
            .paths
            .iter()
            .filter(|p| p.winding == Winding::EvenOdd)
            .count();
        let nonzero = self.paths.len() - evenodd;
        if evenodd > nonzero {
            Winding::EvenOdd
        } else {
            Winding::NonZero
        }
    }

    pub fn has_curves(&self) -> bool {
        self.paths
            .iter()
            .flat_map(|p| &p.segments)
            .any(|s| matches!(s, Segment::CurveTo(..)))
    }
}

// ============================================================================
// Glyph outlines
// ============================================================================

/// A run of text to be turned into outlines
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRun<'a> {
    pub text: &'a str,
    /// Baseline start in draw-units
    pub origin: IVec2,
    pub transform: Option<Transform>,
    pub kern: bool,
    pub right_to_left: bool,
}

/// An open font. Dropping it releases the font.
pub trait OutlineFont {
    fn paint(&self, run: &GlyphRun<'_>) -> Result<Outline, ServiceError>;
}

pub trait GlyphOutliner {
    /// Open `name` at `size` (x and y, in sixteenths of a point)
    fn find_font(&self, name: &str, size: DVec2) -> Result<Box<dyn OutlineFont + '_>, ServiceError>;
}

/// A glyph service with no fonts at all
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOutlineFonts;

impl GlyphOutliner for NoOutlineFonts {
    fn find_font(&self, name: &str, _size: DVec2) -> Result<Box<dyn OutlineFont + '_>, ServiceError> {
        Err(ServiceError::Unavailable(format!("outline font {name}")))
    }
}

// ============================================================================
// Stroke expansion
// ============================================================================

/// Cap parameters for a stroke request. Triangle sizes are in 1/256 of
/// the line width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CapSpec {
    pub triangle_width: u16,
    pub triangle_length: u16,
}

impl CapSpec {
    pub fn from_triangle(triangle: Option<TriangleCap>) -> Self {
        triangle.map_or_else(Self::default, |t| Self {
            triangle_width: u16::from(t.width) << 4,
            triangle_length: u16::from(t.length) << 4,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeRequest<'a> {
    pub segments: &'a [Segment],
    /// Line thickness in draw-units; 0 asks for the centre line only
    pub thickness: i32,
    /// Maximum deviation from curves, in draw-units
    pub flatness: i32,
    pub join: Join,
    pub caps: CapSpec,
    pub dash: Option<&'a Dash>,
}

pub trait StrokeExpander {
    fn expand(&self, request: &StrokeRequest<'_>) -> Result<Outline, ServiceError>;
}

// ============================================================================
// Screen modes
// ============================================================================

/// Pixel geometry of a numbered screen mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegacyMode {
    pub log2_bpp: u32,
    /// OS units per pixel, as a power of two
    pub x_eig: u32,
    pub y_eig: u32,
}

pub trait ModeResolver {
    fn legacy_mode(&self, mode: u32) -> Option<LegacyMode>;
}

/// The services used by one conversion
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub glyphs: &'a dyn GlyphOutliner,
    pub stroker: &'a dyn StrokeExpander,
    pub modes: &'a dyn ModeResolver,
}

impl Default for Services<'_> {
    fn default() -> Self {
        Self {
            glyphs: &NoOutlineFonts,
            stroker: &Flattener,
            modes: &StandardModes,
        }
    }
}

impl std::fmt::Debug for Services<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(winding: Winding) -> OutlinePath {
        OutlinePath {
            winding,
            segments: vec![Segment::End],
        }
    }

    #[test]
    fn majority_winding_prefers_nonzero_on_ties() {
        let tie = Outline {
            paths: vec![path(Winding::EvenOdd), path(Winding::NonZero)],
        };
        assert_eq!(tie.majority_winding(), Winding::NonZero);

        let odd = Outline {
            paths: vec![path(Winding::EvenOdd), path(Winding::EvenOdd), path(Winding::NonZero)],
        };
        assert_eq!(odd.majority_winding(), Winding::EvenOdd);
        assert_eq!(Outline::default().majority_winding(), Winding::NonZero);
    }

    #[test]
    fn outline_from_path_records() {
        let words: Vec<i32> = vec![
            2, 72, 0, 0, 0, 0, -1, -1, 0, 0x40, 2, 1, 2, 8, 3, 4, 5, 0,
            2, 56, 0, 0, 0, 0, -1, -1, 0, 0, 2, 7, 7, 0,
            0, 0,
        ];
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        let outline = Outline::from_records(&bytes).unwrap();
        assert_eq!(outline.paths.len(), 2);
        assert_eq!(outline.paths[0].winding, Winding::EvenOdd);
        assert_eq!(
            outline.paths[0].segments,
            vec![
                Segment::MoveTo(IVec2::new(1, 2)),
                Segment::LineTo(IVec2::new(3, 4)),
                Segment::ClosePath,
                Segment::End
            ]
        );
        assert_eq!(outline.paths[1].winding, Winding::NonZero);
        assert!(!outline.has_curves());
    }

    #[test]
    fn outline_records_with_bad_length() {
        let bytes: Vec<u8> = [2i32, 400, 0, 0]
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect();
        assert!(Outline::from_records(&bytes).is_err());
    }

    #[test]
    fn cap_spec_scales_triangles() {
        let caps = CapSpec::from_triangle(Some(TriangleCap { width: 2, length: 3 }));
        assert_eq!(caps.triangle_width, 32);
        assert_eq!(caps.triangle_length, 48);
        assert_eq!(CapSpec::from_triangle(None), CapSpec::default());
    }

    #[test]
    fn no_fonts_is_unavailable() {
        let err = NoOutlineFonts
            .find_font("Trinity.Medium", DVec2::splat(160.0))
            .err();
        assert!(matches!(err, Some(ServiceError::Unavailable(_))));
    }
}
