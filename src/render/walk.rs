//! Structural objects: font tables, groups, tagged and unknown objects

use super::context::EmitContext;
use crate::log::debug;
use crate::object::{Emit, FontTable, Group, Object, RawObject, TaggedObject};

/// Emit `objects` in document order
pub fn emit_list(cx: &mut EmitContext<'_>, objects: &[Object]) {
    for object in objects {
        object.emit(cx);
    }
}

impl Emit for FontTable {
    fn emit(&self, cx: &mut EmitContext<'_>) {
        for (index, name) in &self.entries {
            debug!(index, name = name.as_str(), "font table entry");
            cx.set_font(*index, name);
        }
    }
}

impl Emit for Group {
    fn emit(&self, cx: &mut EmitContext<'_>) {
        if !cx.options.groups {
            emit_list(cx, &self.children);
            return;
        }
        cx.out.raw("<g>\n");
        cx.out.push_indent(2);
        emit_list(cx, &self.children);
        cx.out.pop_indent(2);
        cx.out.raw("</g>\n");
    }
}

impl Emit for TaggedObject {
    fn emit(&self, cx: &mut EmitContext<'_>) {
        debug!(offset = self.offset, id = self.id, "tagged object");
        self.object.emit(cx);
    }
}

impl Emit for RawObject {
    fn emit(&self, _cx: &mut EmitContext<'_>) {
        debug!(offset = self.offset, tag = self.tag, "no output for unknown object");
    }
}
