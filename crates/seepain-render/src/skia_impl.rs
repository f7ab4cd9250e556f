//! CPU renderer built on tiny-skia.

use crate::background::BackgroundImage;
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError, RgbaFrame};
use kurbo::{Point, Rect};
use peniko::Color;
use seepain_core::{Normalizer, Stroke};
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    Stroke as SkiaStroke, Transform,
};

/// Software renderer for the annotation surface.
///
/// Draws the backdrop, the background image at its current rectangle and
/// every stroke in draw order. Used both for the live view and for exports.
#[derive(Debug, Clone)]
pub struct SkiaRenderer {
    background: BackgroundImage,
}

impl SkiaRenderer {
    pub fn new(background: BackgroundImage) -> Self {
        Self { background }
    }

    pub fn background(&self) -> &BackgroundImage {
        &self.background
    }

    fn draw_background(&self, pixmap: &mut Pixmap, rect: Rect) {
        let source = self.background.pixmap();
        let sx = rect.width() / f64::from(source.width());
        let sy = rect.height() / f64::from(source.height());
        let transform =
            Transform::from_row(sx as f32, 0.0, 0.0, sy as f32, rect.x0 as f32, rect.y0 as f32);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    }
}

/// Solid anti-aliased paint for a color.
fn paint_for(color: Color) -> Paint<'static> {
    let rgba = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba.r, rgba.g, rgba.b, rgba.a);
    paint.anti_alias = true;
    paint
}

/// Draw one stroke as a round-capped polyline; a lone point becomes a dot.
fn draw_stroke(pixmap: &mut Pixmap, stroke: &Stroke, normalizer: &Normalizer, zoom: f64) {
    let width = (stroke.width() * zoom) as f32;
    if width <= 0.0 {
        return;
    }
    let paint = paint_for(stroke.color().into());
    let mut points = stroke.screen_points(normalizer);
    let Some(first) = points.next() else {
        return;
    };

    if stroke.len() == 1 {
        if let Some(dot) = PathBuilder::from_circle(first.x as f32, first.y as f32, width / 2.0) {
            pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
        }
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for point in points {
        pb.line_to(point.x as f32, point.y as f32);
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let stroke_style = SkiaStroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..SkiaStroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke_style, Transform::identity(), None);
}

/// Translucent disc marking where the eraser touches.
fn draw_eraser_indicator(pixmap: &mut Pixmap, center: Point, radius: f64, color: Color) {
    let Some(circle) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
    else {
        return;
    };
    pixmap.fill_path(
        &circle,
        &paint_for(color),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
}

/// Copy pixels out of a pixmap, undoing premultiplication.
fn frame_from_pixmap(pixmap: &Pixmap) -> RgbaFrame {
    let rgba_data = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaFrame {
        rgba_data,
        width: pixmap.width(),
        height: pixmap.height(),
    }
}

impl Renderer for SkiaRenderer {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RgbaFrame> {
        let viewport = ctx.canvas.viewport_size();
        let empty = || RendererError::EmptyViewport {
            width: viewport.width,
            height: viewport.height,
        };

        let width = viewport.width.round();
        let height = viewport.height.round();
        if !(width >= 1.0 && height >= 1.0) {
            return Err(empty());
        }
        let mut pixmap = Pixmap::new(width as u32, height as u32).ok_or_else(|| {
            RendererError::RenderFailed(format!("cannot allocate {}x{} surface", width, height))
        })?;

        let camera = ctx.camera();
        let normalizer = ctx.canvas.normalizer_with(camera).ok_or_else(empty)?;

        let bg = self.background_color(ctx).to_rgba8();
        pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        self.draw_background(&mut pixmap, normalizer.rect());

        for stroke in ctx.canvas.store().render_order() {
            draw_stroke(&mut pixmap, stroke, &normalizer, camera.zoom);
        }

        if ctx.show_eraser_indicator {
            if let Some(center) = ctx.canvas.eraser_cursor() {
                draw_eraser_indicator(
                    &mut pixmap,
                    center,
                    ctx.canvas.eraser_indicator_radius(),
                    ctx.eraser_color,
                );
            }
        }

        Ok(frame_from_pixmap(&pixmap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use seepain_core::{AnnotationCanvas, CanvasConfig, PointerEvent, ToolMode};

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const GRAY: [u8; 4] = [128, 128, 128, 255];
    const RED: [u8; 4] = [255, 0, 0, 255];

    fn setup() -> (AnnotationCanvas, SkiaRenderer) {
        let background = BackgroundImage::solid(50, 100, GRAY).unwrap();
        let mut canvas = AnnotationCanvas::new(CanvasConfig::default(), background.size());
        canvas.set_viewport_size(200.0, 100.0);
        (canvas, SkiaRenderer::new(background))
    }

    /// Compare a pixel allowing for filtering/anti-aliasing rounding.
    fn assert_px(frame: &RgbaFrame, x: u32, y: u32, expected: [u8; 4]) {
        let actual = frame.pixel(x, y).unwrap();
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.abs_diff(e) <= 2, "pixel ({x}, {y}) is {actual:?}, expected {expected:?}");
        }
    }

    fn drag(canvas: &mut AnnotationCanvas, from: Point, to: Point) {
        canvas.handle_pointer_event(PointerEvent::Down { position: from });
        canvas.handle_pointer_event(PointerEvent::Move { position: to });
        canvas.handle_pointer_event(PointerEvent::Up { position: to });
    }

    #[test]
    fn test_render_before_layout_fails() {
        let background = BackgroundImage::solid(10, 10, GRAY).unwrap();
        let canvas = AnnotationCanvas::new(CanvasConfig::default(), background.size());
        let mut renderer = SkiaRenderer::new(background);
        let result = renderer.render(&RenderContext::new(&canvas));
        assert!(matches!(result, Err(RendererError::EmptyViewport { .. })));
    }

    #[test]
    fn test_background_is_letterboxed() {
        let (canvas, mut renderer) = setup();
        let frame = renderer.render(&RenderContext::new(&canvas)).unwrap();
        assert_eq!((frame.width, frame.height), (200, 100));
        // Image occupies x in 75..125
        assert_px(&frame, 10, 50, WHITE);
        assert_px(&frame, 100, 50, GRAY);
        assert_px(&frame, 190, 50, WHITE);
    }

    #[test]
    fn test_stroke_is_drawn_in_its_color() {
        let (mut canvas, mut renderer) = setup();
        canvas.set_pencil_level(6.0);
        drag(&mut canvas, Point::new(80.0, 50.0), Point::new(120.0, 50.0));

        let frame = renderer.render(&RenderContext::new(&canvas)).unwrap();
        assert_px(&frame, 100, 50, RED);
        assert_px(&frame, 100, 20, GRAY);
    }

    #[test]
    fn test_single_point_stroke_is_a_dot() {
        let (mut canvas, mut renderer) = setup();
        canvas.set_pencil_level(8.0);
        canvas.handle_pointer_event(PointerEvent::Down { position: Point::new(100.0, 50.0) });
        canvas.handle_pointer_event(PointerEvent::Up { position: Point::new(100.0, 50.0) });
        assert_eq!(canvas.strokes()[0].len(), 1);

        let frame = renderer.render(&RenderContext::new(&canvas)).unwrap();
        assert_px(&frame, 100, 50, RED);
    }

    #[test]
    fn test_stroke_in_progress_is_visible() {
        let (mut canvas, mut renderer) = setup();
        canvas.set_pencil_level(6.0);
        canvas.handle_pointer_event(PointerEvent::Down { position: Point::new(80.0, 50.0) });
        canvas.handle_pointer_event(PointerEvent::Move { position: Point::new(120.0, 50.0) });

        let frame = renderer.render(&RenderContext::new(&canvas)).unwrap();
        assert_px(&frame, 100, 50, RED);
    }

    #[test]
    fn test_strokes_move_with_pan() {
        let (mut canvas, mut renderer) = setup();
        canvas.set_pencil_level(6.0);
        drag(&mut canvas, Point::new(80.0, 50.0), Point::new(120.0, 50.0));

        canvas.set_mode(ToolMode::Pan);
        drag(&mut canvas, Point::new(100.0, 50.0), Point::new(100.0, 80.0));

        let frame = renderer.render(&RenderContext::new(&canvas)).unwrap();
        assert_px(&frame, 100, 80, RED);
        assert_px(&frame, 100, 50, GRAY);
    }

    #[test]
    fn test_export_view_ignores_live_zoom() {
        let (mut canvas, mut renderer) = setup();
        drag(&mut canvas, Point::new(80.0, 20.0), Point::new(120.0, 80.0));
        let reference = renderer.render(&RenderContext::new(&canvas)).unwrap();

        canvas.zoom_at(Point::new(30.0, 30.0), 2.0);
        let live = renderer.render(&RenderContext::new(&canvas)).unwrap();
        let export = renderer.render(&RenderContext::for_export(&canvas)).unwrap();

        assert_ne!(live, reference);
        assert_eq!(export, reference);
    }

    #[test]
    fn test_eraser_indicator_only_on_live_surface() {
        let (mut canvas, mut renderer) = setup();
        canvas.set_mode(ToolMode::Erase);
        canvas.handle_pointer_event(PointerEvent::Down { position: Point::new(100.0, 50.0) });

        let live = renderer.render(&RenderContext::new(&canvas)).unwrap();
        let export = renderer.render(&RenderContext::for_export(&canvas)).unwrap();
        assert_ne!(live.pixel(100, 50), Some(GRAY));
        assert_px(&export, 100, 50, GRAY);
    }

    #[test]
    fn test_background_color_override() {
        let (canvas, mut renderer) = setup();
        let ctx = RenderContext::new(&canvas).with_background(Color::from_rgba8(0, 0, 255, 255));
        let frame = renderer.render(&ctx).unwrap();
        assert_px(&frame, 5, 5, [0, 0, 255, 255]);
    }

    #[test]
    fn test_viewport_matches_frame() {
        let (mut canvas, mut renderer) = setup();
        canvas.set_viewport_size(64.0, 48.0);
        let frame = renderer.render(&RenderContext::new(&canvas)).unwrap();
        assert_eq!(frame.rgba_data.len(), 64 * 48 * 4);
        assert_eq!(renderer.background().size(), Size::new(50.0, 100.0));
    }
}
