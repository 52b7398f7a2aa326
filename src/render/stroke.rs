//! Path objects and stroke division
//!
//! SVG gives a path one line cap for both ends and has no triangular caps.
//! A path whose ends differ, or that uses triangles, is divided: the body is
//! drawn with butt caps, and the caps are drawn as a separate filled path
//! built along the flattened, dashed centre line from the stroke service.

use glam::{DVec2, IVec2};

use super::context::EmitContext;
use super::defaults::FLATNESS;
use super::path::emit_path_data;
use super::writer::OutputWriter;
use crate::errors::ObjectWarning;
use crate::object::{Cap, Emit, PathObject, Segment, TriangleCap, Winding};
use crate::services::{CapSpec, StrokeRequest};
use crate::types::fmt_num;

impl PathObject {
    /// Whether the caps have to be drawn separately from the stroke
    pub fn needs_division(&self) -> bool {
        let (start, end) = (self.style.start_cap, self.style.end_cap);
        self.outline.is_visible()
            && self.width != 0
            && (start != end || start.is_triangle() || end.is_triangle())
    }
}

impl Emit for PathObject {
    fn emit(&self, cx: &mut EmitContext<'_>) {
        let divide = self.needs_division();
        let (stroked, filled) = (self.outline.is_visible(), self.fill.is_visible());

        if stroked || filled {
            if divide {
                cx.out.raw("<g>\n");
                cx.out.push_indent(2);
            }
            self.emit_body(cx, divide);
        }

        if divide {
            self.emit_caps(cx);
            cx.out.pop_indent(2);
            cx.out.raw("</g>\n");
        }
    }
}

impl PathObject {
    fn emit_body(&self, cx: &mut EmitContext<'_>, divide: bool) {
        let out = &mut cx.out;
        out.raw("<path style='");
        out.push_indent(13);

        if !self.outline.is_visible() {
            out.raw("stroke: none;\n");
        } else {
            out.raw(&format!("stroke: {};\n", self.outline.hex()));
            if let Some(opacity) = self.outline.partial_opacity() {
                out.raw(&format!("stroke-opacity: {};\n", fmt_num(opacity)));
            }
            let cap = if divide { Cap::Butt } else { self.style.start_cap };
            if cap != Cap::Butt {
                out.raw(&format!("stroke-linecap: {};\n", cap.as_str()));
            }
            if self.style.join.bits() != 0 {
                out.raw(&format!("stroke-linejoin: {};\n", self.style.join.as_str()));
            }
            if let Some(dash) = &self.style.dash {
                let items: Vec<String> = dash.elements.iter().map(|e| format!(" {e}")).collect();
                out.raw(&format!("stroke-dasharray:{};\n", items.join(",")));
                out.raw(&format!("stroke-dashoffset: {};\n", dash.offset));
            }
            if self.width != 0 {
                out.raw(&format!("stroke-width: {};\n", self.width));
            } else {
                out.raw(&format!("stroke-width: {};\n", fmt_num(cx.options.thin)));
            }
        }

        if !self.fill.is_visible() {
            out.raw("fill: none;'\n");
        } else {
            if self.style.winding != Winding::EvenOdd {
                out.raw(&format!("fill-rule: {};\n", self.style.winding.as_str()));
            }
            if let Some(opacity) = self.fill.partial_opacity() {
                out.raw(&format!("fill-opacity: {};\n", fmt_num(opacity)));
            }
            out.raw(&format!("fill: {};'\n", self.fill.hex()));
        }

        out.pop_indent(7);
        out.raw("d='");
        out.push_indent(3);
        emit_path_data(cx, &self.segments, self.offset);
        cx.out.pop_indent(9);
        cx.out.raw("' />\n");
    }

    fn emit_caps(&self, cx: &mut EmitContext<'_>) {
        let request = StrokeRequest {
            segments: &self.segments,
            thickness: 0,
            flatness: FLATNESS,
            join: self.style.join,
            caps: CapSpec::from_triangle(self.style.triangle()),
            dash: self.style.dash.as_ref(),
        };
        let outline = match cx.services.stroker.expand(&request) {
            Ok(outline) => outline,
            Err(err) => {
                cx.warn(ObjectWarning::StrokeExpansionFailed {
                    offset: self.offset,
                    reason: err.to_string(),
                });
                return;
            }
        };
        if outline.has_curves() {
            cx.warn(ObjectWarning::CurveInStroke {
                offset: self.offset,
            });
            return;
        }

        let out = &mut cx.out;
        out.raw("<path style='");
        out.push_indent(13);
        out.raw("stroke: none;\n");
        out.raw(&format!("fill: {};\n", self.outline.hex()));
        if let Some(opacity) = self.outline.partial_opacity() {
            out.raw(&format!("fill-opacity: {};\n", fmt_num(opacity)));
        }
        out.raw(&format!(
            "fill-rule: {};'\n",
            outline.majority_winding().as_str()
        ));
        out.pop_indent(7);
        out.raw("d='");
        out.push_indent(3);

        let caps = CapPlotter {
            start: self.style.start_cap,
            end: self.style.end_cap,
            width: f64::from(self.width),
        };
        for path in &outline.paths {
            if let Err(code) = caps.plot(&mut cx.out, &path.segments) {
                cx.warn(ObjectWarning::CapPathAborted {
                    offset: self.offset,
                    code,
                });
            }
        }

        cx.out.pop_indent(9);
        cx.out.raw("' />\n");
    }
}

/// Draws cap shapes at the ends of each run of lines
struct CapPlotter {
    start: Cap,
    end: Cap,
    width: f64,
}

impl CapPlotter {
    /// Walk one flattened sub-path stream, drawing a start cap where a run
    /// of lines begins and an end cap where it stops.
    fn plot(&self, out: &mut OutputWriter, segments: &[Segment]) -> Result<(), i32> {
        // The last two points seen, oldest first
        let mut recent: [Option<IVec2>; 2] = [None, None];
        let mut at_start = true;

        for segment in segments {
            match *segment {
                Segment::End
                | Segment::MoveTo(_)
                | Segment::SpecialMove(_)
                | Segment::GapTo(_) => {
                    if !at_start {
                        if let [Some(from), Some(to)] = recent {
                            self.cap(out, self.end, from, to);
                        }
                        at_start = true;
                    }
                    match segment.end_point() {
                        Some(p) => recent = [recent[1], Some(p)],
                        None => return Ok(()),
                    }
                }
                Segment::CloseGap => at_start = true,
                Segment::ClosePath => {}
                Segment::LineTo(p) => {
                    if at_start {
                        if let Some(run_start) = recent[1] {
                            self.cap(out, self.start, p, run_start);
                        }
                        at_start = false;
                    }
                    recent = [recent[1], Some(p)];
                }
                Segment::CurveTo(..) | Segment::Unknown(_) => return Err(segment.code()),
            }
        }
        Ok(())
    }

    /// Draw `cap` at `to`, for a line arriving from `from`
    fn cap(&self, out: &mut OutputWriter, cap: Cap, from: IVec2, to: IVec2) {
        let d = (to - from).as_dvec2();
        let len = d.length();
        if len == 0.0 {
            return;
        }
        let t = to.as_dvec2();
        match cap {
            Cap::Butt => {}
            Cap::Round => round_cap(out, t, d, len, self.width),
            Cap::Square => square_cap(out, t, d, len, self.width),
            Cap::Triangle(tri) => triangle_cap(out, t, d, len, self.width, tri),
        }
    }
}

fn round_cap(out: &mut OutputWriter, t: DVec2, d: DVec2, len: f64, width: f64) {
    let r = width / 2.0 / len;
    let radius = fmt_num(width / 2.0);
    out.pretty(&format!(
        "M{} {}",
        fmt_num(t.x - r * d.y),
        fmt_num(-(t.y + r * d.x))
    ));
    out.pretty(&format!("A{radius} {radius}"));
    out.pretty(&format!(
        " 0 0 1 {} {}z",
        fmt_num(t.x + r * d.y),
        fmt_num(-(t.y - r * d.x))
    ));
}

fn square_cap(out: &mut OutputWriter, t: DVec2, d: DVec2, len: f64, width: f64) {
    let r = width / 2.0 / len;
    out.pretty(&format!(
        "M{} {}",
        fmt_num(t.x - r * d.y),
        fmt_num(-(t.y + r * d.x))
    ));
    out.pretty(&format!("l{} {}", fmt_num(r * d.x), fmt_num(-r * d.y)));
    out.pretty(&format!(
        "l{} {}",
        fmt_num(2.0 * r * d.y),
        fmt_num(2.0 * r * d.x)
    ));
    out.pretty(&format!("l{} {}z", fmt_num(-r * d.x), fmt_num(r * d.y)));
}

fn triangle_cap(out: &mut OutputWriter, t: DVec2, d: DVec2, len: f64, width: f64, tri: TriangleCap) {
    let w = width * f64::from(tri.width) / 16.0 / len;
    let h = width * f64::from(tri.length) / 16.0 / len;
    out.pretty(&format!(
        "M{} {}",
        fmt_num(t.x - w * d.y),
        fmt_num(-(t.y + w * d.x))
    ));
    out.pretty(&format!(
        "l{} {}",
        fmt_num(w * d.y + h * d.x),
        fmt_num(w * d.x - h * d.y)
    ));
    out.pretty(&format!(
        "l{} {}z",
        fmt_num(w * d.y - h * d.x),
        fmt_num(h * d.y + w * d.x)
    ));
}
