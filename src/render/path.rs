//! Path data emission
//!
//! Moves are absolute; lines and curves are relative to the last point
//! unless relative coordinates are switched off. Output is y-down, so every
//! y is negated.

use glam::I64Vec2;

use super::context::EmitContext;
use super::writer::OutputWriter;
use crate::errors::ObjectWarning;
use crate::object::Segment;

/// Write path data for `segments` up to the end marker.
///
/// An element with no path-data form stops the path; its code is returned.
pub fn plot_path(out: &mut OutputWriter, segments: &[Segment], relative: bool) -> Result<(), i32> {
    let mut last = I64Vec2::ZERO;
    for segment in segments {
        match *segment {
            Segment::End => return Ok(()),
            Segment::MoveTo(p) => {
                let p = p.as_i64vec2();
                out.pretty(&format!("M{} {}", p.x, -p.y));
                last = p;
            }
            Segment::ClosePath => out.pretty("z"),
            Segment::CurveTo(c1, c2, p) => {
                let [c1, c2, p] = [c1, c2, p].map(|q| q.as_i64vec2());
                if relative {
                    let [a, b, c] = [c1, c2, p].map(|q| q - last);
                    out.pretty(&format!(
                        "c{} {} {} {} {} {}",
                        a.x, -a.y, b.x, -b.y, c.x, -c.y
                    ));
                } else {
                    out.pretty(&format!(
                        "C{} {} {} {} {} {}",
                        c1.x, -c1.y, c2.x, -c2.y, p.x, -p.y
                    ));
                }
                last = p;
            }
            Segment::LineTo(p) => {
                let p = p.as_i64vec2();
                if !relative {
                    out.pretty(&format!("L{} {}", p.x, -p.y));
                } else if p.x == last.x {
                    out.pretty(&format!("v{}", -(p.y - last.y)));
                } else if p.y == last.y {
                    out.pretty(&format!("h{}", p.x - last.x));
                } else {
                    out.pretty(&format!("l{} {}", p.x - last.x, -(p.y - last.y)));
                }
                last = p;
            }
            other => return Err(other.code()),
        }
    }
    Ok(())
}

/// [`plot_path`], reporting an aborted path against the object at `offset`
pub fn emit_path_data(cx: &mut EmitContext<'_>, segments: &[Segment], offset: usize) {
    if let Err(code) = plot_path(&mut cx.out, segments, cx.options.relative_coords) {
        cx.warn(ObjectWarning::UnsupportedSegment { offset, code });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn plot(segments: &[Segment], relative: bool) -> (String, Result<(), i32>) {
        let mut out = OutputWriter::new();
        let result = plot_path(&mut out, segments, relative);
        (out.finish(), result)
    }

    fn pt(x: i32, y: i32) -> IVec2 {
        IVec2::new(x, y)
    }

    #[test]
    fn relative_commands() {
        let (d, r) = plot(
            &[
                Segment::MoveTo(pt(10, 20)),
                Segment::LineTo(pt(10, 50)),
                Segment::LineTo(pt(40, 50)),
                Segment::LineTo(pt(0, 0)),
                Segment::CurveTo(pt(5, 5), pt(10, -5), pt(20, 0)),
                Segment::ClosePath,
                Segment::End,
            ],
            true,
        );
        assert_eq!(r, Ok(()));
        insta::assert_snapshot!(d, @"M10 -20v-30h30l-40 50c5 -5 10 5 20 0z");
    }

    #[test]
    fn absolute_commands() {
        let (d, _) = plot(
            &[
                Segment::MoveTo(pt(10, 20)),
                Segment::LineTo(pt(10, 50)),
                Segment::CurveTo(pt(1, 2), pt(3, 4), pt(5, 6)),
                Segment::End,
            ],
            false,
        );
        insta::assert_snapshot!(d, @"M10 -20L10 -50C1 -2 3 -4 5 -6");
    }

    #[test]
    fn close_does_not_move_last_point() {
        let (d, _) = plot(
            &[
                Segment::MoveTo(pt(0, 0)),
                Segment::LineTo(pt(100, 0)),
                Segment::ClosePath,
                Segment::LineTo(pt(100, 100)),
            ],
            true,
        );
        assert_eq!(d, "M0 0h100zv-100");
    }

    #[test]
    fn stops_at_end_marker() {
        let (d, _) = plot(
            &[
                Segment::MoveTo(pt(1, 1)),
                Segment::End,
                Segment::LineTo(pt(9, 9)),
            ],
            true,
        );
        assert_eq!(d, "M1 -1");
    }

    #[test]
    fn aborts_on_elements_without_path_data() {
        let (d, r) = plot(
            &[
                Segment::MoveTo(pt(1, 1)),
                Segment::GapTo(pt(5, 5)),
                Segment::LineTo(pt(9, 9)),
            ],
            true,
        );
        assert_eq!(d, "M1 -1");
        assert_eq!(r, Err(7));
        assert_eq!(plot(&[Segment::Unknown(42)], true).1, Err(42));
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let (d, r) = plot(
            &[Segment::MoveTo(pt(i32::MIN, i32::MIN)), Segment::LineTo(pt(i32::MAX, 0))],
            true,
        );
        assert_eq!(r, Ok(()));
        assert_eq!(d, "M-2147483648 2147483648l4294967295 -2147483648");
    }
}
