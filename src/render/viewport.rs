//! Document viewport: view box, scale factors and declared size

use glam::{DVec2, dvec2};

use super::{RenderOptions, ScaleMode};
use crate::errors::RenderError;
use crate::types::{BBox, Rect};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// View box in draw-units, y-down, margins included
    pub view_box: Rect,
    /// Scale factors after fit modes are resolved
    pub factor: DVec2,
    /// Declared extent in the output unit
    pub size: Rect,
    /// Declared extent as percentages; the longer axis is 100
    pub percent: DVec2,
}

impl Viewport {
    pub fn compute(bbox: BBox, options: &RenderOptions) -> Result<Self, RenderError> {
        let natural = Rect::new(
            dvec2(f64::from(bbox.min.x), -f64::from(bbox.max.y)),
            dvec2(f64::from(bbox.max.x), -f64::from(bbox.min.y)),
        );
        let extent = dvec2(natural.width(), natural.height());

        let factor = match options.scale {
            ScaleMode::Factor(f) => f,
            ScaleMode::FitWidth(w) => DVec2::splat(fit(w, extent.x, "width")?),
            ScaleMode::FitHeight(h) => DVec2::splat(fit(h, extent.y, "height")?),
            ScaleMode::FitBox(target) => dvec2(
                fit(target.x, extent.x, "width")?,
                fit(target.y, extent.y, "height")?,
            ),
        };
        for value in [factor.x, factor.y] {
            if value == 0.0 || !value.is_finite() {
                return Err(RenderError::InvalidScale { value });
            }
        }

        // Margins are not scaled, so they shrink in draw-units as the scale grows.
        let view_box = natural.expand(options.margin / factor);
        let size = view_box
            .map(|v| options.unit.from_draw(v))
            .scale_about_center(factor);

        let (w, h) = (size.width(), size.height());
        let percent = if w == 0.0 && h == 0.0 {
            DVec2::splat(100.0)
        } else if w > h {
            dvec2(100.0, h / w * 100.0)
        } else {
            dvec2(w / h * 100.0, 100.0)
        };

        Ok(Self {
            view_box,
            factor,
            size,
            percent,
        })
    }
}

fn fit(target: f64, extent: f64, axis: &'static str) -> Result<f64, RenderError> {
    if extent == 0.0 {
        return Err(RenderError::EmptyExtent { axis });
    }
    Ok(target / extent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Unit;

    fn options(scale: ScaleMode, margin: f64) -> RenderOptions {
        RenderOptions {
            scale,
            margin: DVec2::splat(margin),
            ..Default::default()
        }
    }

    #[test]
    fn unit_scale_reproduces_bbox() {
        let bbox = BBox::new(-100, 50, 900, 1250);
        let vp = Viewport::compute(bbox, &RenderOptions::default()).unwrap();
        assert_eq!(vp.view_box.min, dvec2(-100.0, -1250.0));
        assert_eq!(vp.view_box.width(), 1000.0);
        assert_eq!(vp.view_box.height(), 1200.0);
        assert_eq!(vp.factor, DVec2::ONE);
    }

    #[test]
    fn margin_is_divided_by_scale() {
        let bbox = BBox::new(0, 0, 1000, 1000);
        for k in [0.5, 1.0, 2.0] {
            for m in [0.0, 10.0] {
                let vp = Viewport::compute(bbox, &options(ScaleMode::Factor(DVec2::splat(k)), m))
                    .unwrap();
                assert_eq!(vp.view_box.min, dvec2(-m / k, -1000.0 - m / k), "k={k} m={m}");
                assert_eq!(vp.view_box.max, dvec2(1000.0 + m / k, m / k), "k={k} m={m}");
            }
        }
    }

    #[test]
    fn scaling_keeps_center() {
        let bbox = BBox::new(0, 0, 46080, 92160);
        let vp = Viewport::compute(bbox, &options(ScaleMode::Factor(dvec2(2.0, 0.5)), 0.0))
            .unwrap();
        assert_eq!(vp.size.center(), dvec2(0.5, -1.0));
        assert_eq!(vp.size.width(), 2.0);
        assert_eq!(vp.size.height(), 1.0);
    }

    #[test]
    fn fit_width_scales_both_axes() {
        let bbox = BBox::new(0, 0, 1000, 1000);
        let opts = RenderOptions {
            unit: Unit::Millimetre,
            scale: ScaleMode::FitWidth(500.0),
            ..Default::default()
        };
        let vp = Viewport::compute(bbox, &opts).unwrap();
        assert_eq!(vp.factor, DVec2::splat(0.5));
        assert_eq!(vp.view_box, Rect::new(dvec2(0.0, -1000.0), dvec2(1000.0, 0.0)));
        let expected = Unit::Millimetre.from_draw(500.0);
        assert!((vp.size.width() - expected).abs() < 1e-12);
    }

    #[test]
    fn fit_box_is_independent() {
        let bbox = BBox::new(0, 0, 200, 100);
        let vp = Viewport::compute(bbox, &options(ScaleMode::FitBox(dvec2(400.0, 400.0)), 0.0))
            .unwrap();
        assert_eq!(vp.factor, dvec2(2.0, 4.0));
    }

    #[test]
    fn percentages_follow_longer_axis() {
        let vp = Viewport::compute(BBox::new(0, 0, 200, 100), &RenderOptions::default()).unwrap();
        assert_eq!(vp.percent, dvec2(100.0, 50.0));
        let vp = Viewport::compute(BBox::new(0, 0, 100, 400), &RenderOptions::default()).unwrap();
        assert_eq!(vp.percent, dvec2(25.0, 100.0));
    }

    #[test]
    fn rejects_degenerate_scales() {
        let flat = BBox::new(0, 0, 100, 0);
        assert_eq!(
            Viewport::compute(flat, &options(ScaleMode::FitHeight(10.0), 0.0)),
            Err(RenderError::EmptyExtent { axis: "height" })
        );
        assert!(matches!(
            Viewport::compute(flat, &options(ScaleMode::Factor(dvec2(1.0, 0.0)), 0.0)),
            Err(RenderError::InvalidScale { .. })
        ));
        assert!(matches!(
            Viewport::compute(flat, &options(ScaleMode::FitWidth(0.0), 0.0)),
            Err(RenderError::InvalidScale { value }) if value == 0.0
        ));
    }
}
