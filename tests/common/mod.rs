//! Synthetic drawfiles for integration tests
#![allow(dead_code)]

use draw2svg::object::Segment;
use glam::IVec2;

pub const BLACK: u32 = 0x0000_0000;
pub const TRANSPARENT: u32 = 0xFFFF_FFFF;

pub const CAP_BUTT: u32 = 0;
pub const CAP_ROUND: u32 = 1;
pub const CAP_SQUARE: u32 = 2;

/// Sprite mode word for a 32bpp, 90x90 dpi sprite
pub const MODE_90DPI: u32 = 6 << 27 | 90 << 14 | 90 << 1;

fn words(ws: &[i32]) -> Vec<u8> {
    ws.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// NUL-terminated and padded to a word boundary
fn c_string(text: &str) -> Vec<u8> {
    let mut out = text.as_bytes().to_vec();
    out.push(0);
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out
}

fn fixed_name(name: &str) -> Vec<u8> {
    let mut out = name.as_bytes().to_vec();
    out.resize(12, b' ');
    out
}

/// Wrap `body` in an object header for `tag`
fn object(tag: i32, body: Vec<u8>) -> Vec<u8> {
    let mut out = words(&[tag, (8 + body.len()) as i32]);
    out.extend(body);
    out
}

/// Path style word: join, end cap, start cap
pub fn path_style(start_cap: u32, end_cap: u32) -> u32 {
    end_cap << 2 | start_cap << 4
}

/// Path elements in the on-disk encoding
pub fn path_elements(segments: &[Segment]) -> Vec<i32> {
    let mut out = Vec::new();
    for segment in segments {
        out.push(segment.code());
        match *segment {
            Segment::MoveTo(p) | Segment::SpecialMove(p) | Segment::GapTo(p) | Segment::LineTo(p) => {
                out.extend([p.x, p.y]);
            }
            Segment::CurveTo(a, b, c) => out.extend([a.x, a.y, b.x, b.y, c.x, c.y]),
            _ => {}
        }
    }
    out
}

#[derive(Clone, Debug)]
pub struct PathSpec {
    pub fill: u32,
    pub outline: u32,
    pub width: i32,
    pub style: u32,
    pub segments: Vec<Segment>,
}

impl PathSpec {
    /// An unfilled black line from (0, 0) to `to`
    pub fn line(to: IVec2) -> Self {
        Self {
            fill: TRANSPARENT,
            outline: BLACK,
            width: 0,
            style: 0,
            segments: vec![
                Segment::MoveTo(IVec2::ZERO),
                Segment::LineTo(to),
                Segment::End,
            ],
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut body = vec![0, 0, 1000, 1000];
        body.extend([self.fill as i32, self.outline as i32, self.width, self.style as i32]);
        body.extend(path_elements(&self.segments));
        object(2, words(&body))
    }
}

/// Builds a drawfile byte buffer object by object
#[derive(Clone, Debug)]
pub struct DrawfileBuilder {
    bbox: [i32; 4],
    objects: Vec<Vec<u8>>,
}

impl DrawfileBuilder {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            bbox: [x0, y0, x1, y1],
            objects: Vec::new(),
        }
    }

    pub fn path(mut self, path: &PathSpec) -> Self {
        self.objects.push(path.encode());
        self
    }

    pub fn font_table(self, fonts: &[(u8, &str)]) -> Self {
        let raw: Vec<(u8, &[u8])> = fonts.iter().map(|(i, n)| (*i, n.as_bytes())).collect();
        self.raw_font_table(&raw)
    }

    /// Font table with names given as raw Latin-1 bytes
    pub fn raw_font_table(mut self, fonts: &[(u8, &[u8])]) -> Self {
        let mut body = Vec::new();
        for (index, name) in fonts {
            body.push(*index);
            body.extend(*name);
            body.push(0);
        }
        body.push(0);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        self.objects.push(object(0, body));
        self
    }

    /// Black text on white, `size` in 1/640 pt
    pub fn text(mut self, font: u8, size: i32, baseline: IVec2, text: &str) -> Self {
        let mut body = words(&[
            0,
            0,
            1000,
            1000,
            BLACK as i32,
            0xFFFF_FF00_u32 as i32,
            i32::from(font),
            size,
            size,
            baseline.x,
            baseline.y,
        ]);
        body.extend(c_string(text));
        self.objects.push(object(1, body));
        self
    }

    pub fn sprite(mut self, name: &str, pixels: i32, mode: u32) -> Self {
        let mut body = words(&[0, 0, 1000, 1000, 0]);
        body.extend(fixed_name(name));
        body.extend(words(&[pixels - 1, pixels - 1, 0, 31, 44, 44, mode as i32]));
        self.objects.push(object(5, body));
        self
    }

    pub fn group(mut self, name: &str, children: DrawfileBuilder) -> Self {
        let mut body = words(&[0, 0, 1000, 1000]);
        body.extend(fixed_name(name));
        for child in children.objects {
            body.extend(child);
        }
        self.objects.push(object(6, body));
        self
    }

    pub fn unknown(mut self, tag: i32, payload_words: usize) -> Self {
        self.objects.push(object(tag, words(&vec![0x5a5a_5a5a; payload_words])));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = b"Draw".to_vec();
        out.extend(words(&[201, 0]));
        out.extend(fixed_name("tests"));
        out.extend(words(&self.bbox));
        for object in &self.objects {
            out.extend(object);
        }
        out
    }
}

/// Read emitted path data back into segments.
///
/// Understands the commands the converter writes: `M`, `L`, `C`, `z` and
/// the relative `l`, `h`, `v` and `c`.
pub fn parse_path_data(d: &str) -> Vec<Segment> {
    let token = regex_lite::Regex::new(r"[MLCzlhvc]|-?\d+").unwrap();
    let tokens: Vec<&str> = token.find_iter(d).map(|m| m.as_str()).collect();
    let mut segments = Vec::new();
    let mut last = IVec2::ZERO;
    let mut i = 0;

    let num = |i: usize| -> i32 { tokens[i].parse().unwrap() };
    // Emitted y is negated
    let point = |i: usize| IVec2::new(num(i), -num(i + 1));

    while i < tokens.len() {
        let command = tokens[i];
        i += 1;
        match command {
            "M" => {
                last = point(i);
                segments.push(Segment::MoveTo(last));
                i += 2;
            }
            "L" => {
                last = point(i);
                segments.push(Segment::LineTo(last));
                i += 2;
            }
            "l" => {
                last += point(i);
                segments.push(Segment::LineTo(last));
                i += 2;
            }
            "h" => {
                last.x += num(i);
                segments.push(Segment::LineTo(last));
                i += 1;
            }
            "v" => {
                last.y -= num(i);
                segments.push(Segment::LineTo(last));
                i += 1;
            }
            "C" => {
                let (a, b, c) = (point(i), point(i + 2), point(i + 4));
                segments.push(Segment::CurveTo(a, b, c));
                last = c;
                i += 6;
            }
            "c" => {
                let (a, b, c) = (point(i) + last, point(i + 2) + last, point(i + 4) + last);
                segments.push(Segment::CurveTo(a, b, c));
                last = c;
                i += 6;
            }
            "z" => segments.push(Segment::ClosePath),
            other => panic!("unexpected path token {other:?} in {d:?}"),
        }
    }
    segments.push(Segment::End);
    segments
}

/// Every `d` attribute in `svg`, in document order
pub fn path_data(svg: &str) -> Vec<String> {
    let d = regex_lite::Regex::new(r"(?s)\sd='([^']*)'").unwrap();
    d.captures_iter(svg).map(|c| c[1].to_string()).collect()
}

/// The four numbers of the root `viewBox`
pub fn view_box(svg: &str) -> [f64; 4] {
    let re = regex_lite::Regex::new(r"viewBox='([^']*)'").unwrap();
    let caps = re.captures(svg).expect("no viewBox");
    let values: Vec<f64> = caps[1]
        .split_whitespace()
        .map(|v| v.parse().unwrap())
        .collect();
    [values[0], values[1], values[2], values[3]]
}

/// Parse `svg` as XML, accepting the legacy DOCTYPE
pub fn assert_well_formed(svg: &str) -> usize {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = roxmltree::Document::parse_with_options(svg, options)
        .unwrap_or_else(|e| panic!("not well-formed: {e}\n{svg}"));
    assert_eq!(doc.root_element().tag_name().name(), "svg");
    doc.descendants().filter(|n| n.is_element()).count()
}
