//! Portable stroke service: centre-line flattening and dashing
//!
//! Only zero-thickness requests are served. The result is the path with
//! curves replaced by line runs and the dash pattern applied, which is
//! exactly what cap synthesis walks.

use glam::DVec2;

use super::{Outline, OutlinePath, StrokeExpander, StrokeRequest};
use crate::errors::ServiceError;
use crate::object::{Dash, Segment, Winding};

/// Subdivision depth limit for one Bézier
const MAX_DEPTH: u32 = 16;

#[derive(Clone, Copy, Debug, Default)]
pub struct Flattener;

impl StrokeExpander for Flattener {
    fn expand(&self, request: &StrokeRequest<'_>) -> Result<Outline, ServiceError> {
        if request.thickness != 0 {
            return Err(ServiceError::Unavailable(format!(
                "stroke thickening to width {}",
                request.thickness
            )));
        }
        if request.flatness <= 0 {
            return Err(ServiceError::Failed(format!(
                "flatness {} is not positive",
                request.flatness
            )));
        }

        let mut lines = flatten(request.segments, f64::from(request.flatness))?;
        if let Some(pattern) = request.dash.and_then(DashPattern::new) {
            lines = pattern.apply(&lines);
        }

        let mut segments = Vec::new();
        for line in &lines {
            let mut points = line.points.iter().map(|p| p.round().as_ivec2());
            let Some(first) = points.next() else { continue };
            segments.push(Segment::MoveTo(first));
            let mut last = first;
            for p in points {
                if p != last {
                    segments.push(Segment::LineTo(p));
                    last = p;
                }
            }
            if line.closed {
                segments.push(Segment::ClosePath);
            }
        }
        segments.push(Segment::End);

        Ok(Outline {
            paths: vec![OutlinePath {
                winding: Winding::NonZero,
                segments,
            }],
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Polyline {
    points: Vec<DVec2>,
    closed: bool,
}

impl Polyline {
    fn at(p: DVec2) -> Self {
        Self {
            points: vec![p],
            closed: false,
        }
    }
}

fn flatten(segments: &[Segment], flatness: f64) -> Result<Vec<Polyline>, ServiceError> {
    let mut lines = Vec::new();
    let mut current: Option<Polyline> = None;
    let mut pen = DVec2::ZERO;
    let mut start = DVec2::ZERO;

    let finish = |line: Option<Polyline>, lines: &mut Vec<Polyline>| {
        if let Some(line) = line.filter(|l| l.points.len() > 1) {
            lines.push(line);
        }
    };

    for segment in segments {
        match *segment {
            Segment::End => break,
            Segment::MoveTo(p) | Segment::SpecialMove(p) => {
                finish(current.take(), &mut lines);
                pen = p.as_dvec2();
                start = pen;
            }
            Segment::GapTo(p) => {
                finish(current.take(), &mut lines);
                pen = p.as_dvec2();
            }
            Segment::LineTo(p) => {
                let from = pen;
                pen = p.as_dvec2();
                current.get_or_insert_with(|| Polyline::at(from)).points.push(pen);
            }
            Segment::CurveTo(c1, c2, p) => {
                let from = pen;
                pen = p.as_dvec2();
                let line = current.get_or_insert_with(|| Polyline::at(from));
                subdivide(
                    [from, c1.as_dvec2(), c2.as_dvec2(), pen],
                    flatness,
                    0,
                    &mut line.points,
                );
            }
            Segment::ClosePath => {
                if let Some(mut line) = current.take() {
                    if pen != start {
                        line.points.push(start);
                    }
                    line.closed = true;
                    finish(Some(line), &mut lines);
                }
                pen = start;
            }
            Segment::CloseGap => {
                finish(current.take(), &mut lines);
                pen = start;
            }
            Segment::Unknown(code) => {
                return Err(ServiceError::Failed(format!("path element {code}")));
            }
        }
    }
    finish(current, &mut lines);
    Ok(lines)
}

/// Append the end points of line pieces approximating the curve to `out`
fn subdivide(curve: [DVec2; 4], flatness: f64, depth: u32, out: &mut Vec<DVec2>) {
    let [p0, c1, c2, p3] = curve;
    if depth >= MAX_DEPTH || deviation(p0, p3, c1).max(deviation(p0, p3, c2)) <= flatness {
        out.push(p3);
        return;
    }
    let half = |a: DVec2, b: DVec2| (a + b) * 0.5;
    let ab = half(p0, c1);
    let bc = half(c1, c2);
    let cd = half(c2, p3);
    let abc = half(ab, bc);
    let bcd = half(bc, cd);
    let mid = half(abc, bcd);
    subdivide([p0, ab, abc, mid], flatness, depth + 1, out);
    subdivide([mid, bcd, cd, p3], flatness, depth + 1, out);
}

/// Distance of `p` from the chord `a`..`b`
fn deviation(a: DVec2, b: DVec2, p: DVec2) -> f64 {
    let chord = b - a;
    let len = chord.length();
    if len < f64::EPSILON {
        p.distance(a)
    } else {
        chord.perp_dot(p - a).abs() / len
    }
}

struct DashPattern {
    elements: Vec<f64>,
    offset: f64,
}

impl DashPattern {
    /// `None` for patterns that would never switch: empty, negative or all zero
    fn new(dash: &Dash) -> Option<Self> {
        if dash.elements.iter().any(|&e| e < 0) {
            return None;
        }
        let mut elements: Vec<f64> = dash.elements.iter().map(|&e| f64::from(e)).collect();
        if elements.iter().sum::<f64>() <= 0.0 {
            return None;
        }
        // An odd count swaps on and off on each repetition.
        if elements.len() % 2 == 1 {
            elements.extend_from_within(..);
        }
        Some(Self {
            elements,
            offset: f64::from(dash.offset),
        })
    }

    /// Element index and the length left in it at the pattern start
    fn phase(&self) -> (usize, f64) {
        let total: f64 = self.elements.iter().sum();
        let mut phase = self.offset.rem_euclid(total);
        let mut index = 0;
        while phase >= self.elements[index] {
            phase -= self.elements[index];
            index = (index + 1) % self.elements.len();
        }
        (index, self.elements[index] - phase)
    }

    /// Cut each line into its dashes. The pattern restarts on every line.
    fn apply(&self, lines: &[Polyline]) -> Vec<Polyline> {
        let mut out = Vec::new();
        let emit = |run: Vec<DVec2>, out: &mut Vec<Polyline>| {
            if run.len() > 1 {
                out.push(Polyline {
                    points: run,
                    closed: false,
                });
            }
        };

        for line in lines {
            let Some(&first) = line.points.first() else { continue };
            let (mut index, mut remaining) = self.phase();
            let mut run = (index % 2 == 0).then(|| vec![first]);

            for pair in line.points.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let len = a.distance(b);
                let mut travelled = 0.0;
                while len - travelled > remaining {
                    travelled += remaining;
                    let p = a.lerp(b, travelled / len);
                    match run.take() {
                        Some(mut r) => {
                            r.push(p);
                            emit(r, &mut out);
                        }
                        None => run = Some(vec![p]),
                    }
                    index = (index + 1) % self.elements.len();
                    remaining = self.elements[index];
                }
                remaining -= len - travelled;
                if let Some(r) = run.as_mut() {
                    r.push(b);
                }
            }
            if let Some(r) = run {
                emit(r, &mut out);
            }
        }
        out
    }
}
