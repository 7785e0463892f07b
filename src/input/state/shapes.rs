//! Shape preview engine: rubber-band previews and normalized commits.

use crate::draw::{ArrowCap, Color, Layer, Primitive, RasterOp, Shape, StrokeStyle};

use super::{ActiveStroke, InputState};

/// Overlay primitive depicting `shape`.
///
/// Lines keep round caps on screen; arrows get a native arrow cap.
pub(crate) fn shape_primitive(shape: &Shape, outline: StrokeStyle, fill: Option<Color>) -> Primitive {
    match shape {
        Shape::Line {
            x1,
            y1,
            x2,
            y2,
            dashed,
        } => Primitive::Line {
            from: (*x1, *y1),
            to: (*x2, *y2),
            style: if *dashed {
                outline.with_dash(8.0, 6.0)
            } else {
                outline
            },
            arrow: None,
        },
        Shape::Arrow { x1, y1, x2, y2 } => Primitive::Line {
            from: (*x1, *y1),
            to: (*x2, *y2),
            style: outline.with_butt_caps(),
            arrow: Some(ArrowCap::default()),
        },
        Shape::Rect { x0, y0, x1, y1 } => Primitive::Rect {
            corner_a: (*x0, *y0),
            corner_b: (*x1, *y1),
            outline: outline.with_butt_caps(),
            fill,
        },
        Shape::Ellipse { x0, y0, x1, y1 } => Primitive::Oval {
            corner_a: (*x0, *y0),
            corner_b: (*x1, *y1),
            outline,
            fill,
        },
        Shape::Polygon { points } => Primitive::Polygon {
            points: points.clone(),
            outline: outline.with_butt_caps(),
            fill,
        },
    }
}

impl InputState {
    fn shape_style(&self, stroke: &ActiveStroke) -> (StrokeStyle, Option<Color>) {
        let style = StrokeStyle::new(stroke.color, stroke.size as f64);
        let fill = self.tool.fill_shapes.then_some(stroke.color);
        (style, fill)
    }

    /// Replaces the rubber-band preview with one spanning `start -> to`.
    pub(super) fn preview_shape(&mut self, stroke: &mut ActiveStroke, to: (f64, f64)) {
        if let Some(old) = stroke.preview.take() {
            self.renderer.overlay_mut().remove(old);
        }
        let Some(shape) = Shape::from_drag(stroke.tool, stroke.start, to, self.star_points) else {
            return;
        };
        let (style, fill) = self.shape_style(stroke);
        let handle = self
            .renderer
            .overlay_mut()
            .insert(
                Layer::Preview,
                shape_primitive(&shape, style.with_alpha(stroke.opacity), fill),
            );
        stroke.preview = Some(handle);
    }

    /// Drops the preview and commits the normalized shape to both buffers.
    pub(super) fn finalize_shape(&mut self, stroke: &mut ActiveStroke, end: (f64, f64)) {
        if let Some(old) = stroke.preview.take() {
            self.renderer.overlay_mut().remove(old);
        }
        let Some(shape) = Shape::from_drag(stroke.tool, stroke.start, end, self.star_points) else {
            return;
        };
        let (style, fill) = self.shape_style(stroke);

        self.add_drawing(stroke, shape_primitive(&shape, style, fill));
        stroke.push_op(RasterOp::Shape {
            shape,
            outline: stroke.color,
            width: stroke.size as f64,
            fill,
        });
    }
}
