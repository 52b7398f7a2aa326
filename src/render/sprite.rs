//! Sprite placement
//!
//! Pixel data is not carried over. Each sprite becomes a grey rectangle the
//! size of its natural pixel box, mapped onto the object's bounding box by
//! a single `transform` matrix.

use glam::{DAffine2, DVec2, IVec2, dvec2};

use super::context::EmitContext;
use super::defaults::SPRITE_FILL;
use crate::errors::ObjectWarning;
use crate::object::{Emit, SpriteHeader, SpriteObject, TransformedSprite};
use crate::services::{LegacyMode, ModeResolver};
use crate::types::{Rect, Transform, fmt_num};

/// How a mode word gives pixel size
enum Resolution {
    /// OS units per pixel as powers of two
    Eig(u32, u32),
    /// Dots per inch
    Dpi(i64, i64),
}

/// Bits per pixel of a new-format sprite type
fn type_bpp(kind: u32) -> Option<u32> {
    match kind {
        1..=6 => Some(1 << (kind - 1)),
        // CMYK
        7 => Some(32),
        8 => Some(24),
        // 5:6:5 and 4:4:4:4
        10 | 11 => Some(16),
        _ => None,
    }
}

/// Size of the sprite in OS units
pub fn sprite_size(sprite: &SpriteHeader, modes: &dyn ModeResolver) -> Result<IVec2, String> {
    let mode = sprite.mode;
    let kind = mode >> 27;

    let (bpp, resolution) = if kind == 0 {
        if mode > 0xff {
            return Err(format!("mode selector {mode:#x} is not supported"));
        }
        let LegacyMode {
            log2_bpp,
            x_eig,
            y_eig,
        } = modes
            .legacy_mode(mode & 0x7f)
            .ok_or_else(|| format!("unknown screen mode {}", mode & 0x7f))?;
        (1 << log2_bpp, Resolution::Eig(x_eig, y_eig))
    } else {
        let bpp = type_bpp(kind).ok_or_else(|| format!("sprite type {kind} is not supported"))?;
        let xdpi = i64::from((mode >> 1) & 0x1fff);
        let ydpi = i64::from((mode >> 14) & 0x1fff);
        if xdpi == 0 || ydpi == 0 {
            return Err("mode word has zero resolution".to_string());
        }
        (bpp, Resolution::Dpi(xdpi, ydpi))
    };

    let bits = (i64::from(sprite.width_words) + 1) * 32
        - i64::from(sprite.first_bit)
        - (31 - i64::from(sprite.last_bit));
    let width = bits / i64::from(bpp);
    let height = i64::from(sprite.height_rows) + 1;
    if width <= 0 || height <= 0 {
        return Err(format!("pixel size {width}x{height}"));
    }

    let (x, y) = match resolution {
        Resolution::Eig(x, y) => (width << x, height << y),
        Resolution::Dpi(x, y) => (width * 180 / x, height * 180 / y),
    };
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) if x > 0 && y > 0 => Ok(IVec2::new(x, y)),
        _ => Err(format!("size {x}x{y} OS units is out of range")),
    }
}

/// The matrix taking the rectangle `(0, -size.y)..(size.x, 0)` onto the
/// object's bounding box, after the object's own transform.
fn placement(size: DVec2, transform: DAffine2, target: Rect) -> Result<DAffine2, String> {
    let corners = [
        DVec2::ZERO,
        dvec2(size.x, 0.0),
        dvec2(0.0, size.y),
        size,
    ]
    .map(|p| transform.transform_point2(p));
    let natural = Rect::enclosing(&corners);
    if natural.width() == 0.0 || natural.height() == 0.0 {
        return Err("transformed box is empty".to_string());
    }

    let flip = DAffine2::from_scale(dvec2(1.0, -1.0));
    let mut m = transform * flip;
    m.translation -= natural.min;
    let fit = DAffine2::from_translation(target.min)
        * DAffine2::from_scale(dvec2(
            target.width() / natural.width(),
            target.height() / natural.height(),
        ));
    Ok(flip * fit * m)
}

fn emit_sprite(cx: &mut EmitContext<'_>, object: &SpriteObject, transform: Option<Transform>) {
    let placed = sprite_size(&object.sprite, cx.services.modes).and_then(|os| {
        let size = os.as_dvec2() * 256.0 / 180.0;
        let target = Rect::new(object.bbox.min.as_dvec2(), object.bbox.max.as_dvec2());
        let transform = transform.map_or(DAffine2::IDENTITY, |t| t.to_affine());
        placement(size, transform, target).map(|m| (size, m))
    });
    let (size, m) = match placed {
        Ok(placed) => placed,
        Err(reason) => {
            cx.warn(ObjectWarning::SpriteSize {
                offset: object.offset,
                name: object.sprite.name.clone(),
                reason,
            });
            return;
        }
    };

    let out = &mut cx.out;
    out.raw(&format!("<rect style='fill: {SPRITE_FILL}'\n"));
    out.push_indent(6);
    out.raw(&format!(
        "width='{}' height='{}'\n",
        fmt_num(size.x),
        fmt_num(size.y)
    ));
    out.raw(&format!("x='0' y='{}'\n", fmt_num(-size.y)));
    let coefficients = [
        m.matrix2.x_axis.x,
        m.matrix2.x_axis.y,
        m.matrix2.y_axis.x,
        m.matrix2.y_axis.y,
        m.translation.x,
        m.translation.y,
    ]
    .map(fmt_num);
    out.raw(&format!(
        "transform='matrix({})' />\n",
        coefficients.join(",")
    ));
    out.pop_indent(6);
}

impl Emit for SpriteObject {
    fn emit(&self, cx: &mut EmitContext<'_>) {
        emit_sprite(cx, self, None);
    }
}

impl Emit for TransformedSprite {
    fn emit(&self, cx: &mut EmitContext<'_>) {
        emit_sprite(cx, &self.sprite, Some(self.transform));
    }
}
