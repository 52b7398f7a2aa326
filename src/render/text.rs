//! Text objects, as native `<text>` elements or as glyph outlines

use glam::dvec2;

use super::context::EmitContext;
use super::defaults::{DEFAULT_FONT, FALLBACK_FONTS, SINGULAR_EPSILON};
use super::path::emit_path_data;
use super::writer::Escape;
use crate::errors::ObjectWarning;
use crate::object::{Emit, OutlinedText, TextObject, Winding};
use crate::services::{GlyphRun, Outline, OutlineFont};
use crate::types::fmt_num;

impl Emit for TextObject {
    fn emit(&self, cx: &mut EmitContext<'_>) {
        let (x, y) = (self.baseline.x, self.baseline.y);

        // Inverse of the linear part, for mapping the anchor frame back
        let inverse = match self.transform {
            None => None,
            Some(t) => {
                let [a, b, c, d] = t.linear();
                let det = a * d - b * c;
                if det.abs() < SINGULAR_EPSILON {
                    cx.warn(ObjectWarning::SingularTextTransform {
                        offset: self.offset,
                        text: self.text.clone(),
                    });
                    return;
                }
                Some([
                    d / det,
                    -b / det,
                    -c / det,
                    a / det,
                    -f64::from(t.e) / 65536.0,
                    -f64::from(t.f) / 65536.0,
                ])
            }
        };

        let font = cx.font(self.font).to_string();
        let out = &mut cx.out;
        out.raw(&format!("<text x='{x}' y='{}'\n", -i64::from(y)));
        out.push_indent(10);

        if let Some(m) = inverse {
            let m = m.map(fmt_num);
            out.raw(&format!(
                "transform='translate({x} {}) matrix({}) translate({} {y})'\n",
                -i64::from(y),
                m.join(" "),
                -i64::from(x),
            ));
        }

        out.raw("style='");
        out.raw(&format!("font-family: \"{font}\";\n"));
        out.raw(&format!("font-size: {};\n", self.size.x));
        if !self.colour.is_visible() {
            out.raw("fill: none;'>");
        } else {
            if let Some(opacity) = self.colour.partial_opacity() {
                out.raw(&format!("fill-opacity: {};\n", fmt_num(opacity)));
            }
            out.raw(&format!("fill: {};'>", self.colour.hex()));
        }

        out.escaped(&self.text, Escape::CharData, false);
        out.pop_indent(10);
        out.raw("</text>\n");
    }
}

impl OutlinedText {
    /// Open the first font that the glyph service accepts
    fn open_font<'s>(&self, cx: &mut EmitContext<'s>) -> Option<Box<dyn OutlineFont + 's>> {
        let text = &self.0;
        let declared = cx.font(text.font).to_string();
        let glyphs = cx.services.glyphs;

        let declared = (declared != DEFAULT_FONT).then_some((declared.as_str(), 1.0, 1.0));
        for (name, xs, ys) in declared.into_iter().chain(FALLBACK_FONTS) {
            // Sixteenths of a point
            let size = dvec2(
                (f64::from(text.size.x) * xs / 40.0).trunc(),
                (f64::from(text.size.y) * ys / 40.0).trunc(),
            );
            match glyphs.find_font(name, size) {
                Ok(font) => return Some(font),
                Err(err) => cx.warn(ObjectWarning::FontRejected {
                    font: name.to_string(),
                    text: text.text.clone(),
                    reason: err.to_string(),
                }),
            }
        }
        None
    }

    fn emit_outline(&self, cx: &mut EmitContext<'_>, outline: &Outline) {
        let text = &self.0;
        let rule = outline.majority_winding();

        let out = &mut cx.out;
        out.raw("<g style='");
        out.push_indent(10);
        out.raw("stroke: none;\n");
        if !text.colour.is_visible() {
            out.raw("fill: none;'>\n");
        } else {
            if let Some(opacity) = text.colour.partial_opacity() {
                out.raw(&format!("fill-opacity: {};\n", fmt_num(opacity)));
            }
            if rule != Winding::EvenOdd {
                out.raw(&format!("fill-rule: {};\n", rule.as_str()));
            }
            out.raw(&format!("fill: {};'>\n", text.colour.hex()));
        }
        out.pop_indent(8);

        for path in &outline.paths {
            cx.out.raw("<path ");
            cx.out.push_indent(6);
            if path.winding != rule {
                cx.out
                    .raw(&format!("style='fill-rule: {};'\n", path.winding.as_str()));
            }
            cx.out.raw("d='");
            cx.out.push_indent(3);
            emit_path_data(cx, &path.segments, text.offset);
            cx.out.raw("' />\n");
            cx.out.pop_indent(9);
        }

        cx.out.pop_indent(2);
        cx.out.raw("</g>\n");
    }
}

impl Emit for OutlinedText {
    fn emit(&self, cx: &mut EmitContext<'_>) {
        let text = &self.0;
        let Some(font) = self.open_font(cx) else {
            cx.warn(ObjectWarning::TextSkipped {
                offset: text.offset,
                text: text.text.clone(),
            });
            return;
        };

        let run = GlyphRun {
            text: &text.text,
            origin: text.baseline,
            transform: text.transform,
            kern: text.kern,
            right_to_left: text.right_to_left,
        };
        let painted = font.paint(&run);
        drop(font);

        match painted {
            Ok(outline) => self.emit_outline(cx, &outline),
            Err(err) => {
                let font = cx.font(text.font).to_string();
                cx.warn(ObjectWarning::GlyphPaintFailed {
                    font,
                    text: text.text.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
}
