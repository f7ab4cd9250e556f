//! The running annotation session.

use crate::actions::{ActionOutcome, UiAction};
use crate::config::AppConfig;
use crate::save::SaveLocation;
use seepain_core::{AnnotationCanvas, CanvasConfig, ConfigError, PointerEvent};
use seepain_render::{
    BackgroundImage, ExportError, Exporter, RenderContext, Renderer, RendererError, RgbaFrame,
    SkiaRenderer, path_exists,
};
use std::fs;
use thiserror::Error;

/// Size of the blank sheet used when no background image can be loaded.
const PLACEHOLDER_SIZE: (u32, u32) = (600, 800);

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please enter a pseudonym before saving")]
    MissingPseudonym,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Owns the canvas together with the renderer and exporter that draw it.
///
/// The host toolkit forwards pointer events and control actions here and
/// asks for frames whenever [`Session::revision`] changes.
pub struct Session {
    canvas: AnnotationCanvas,
    renderer: SkiaRenderer,
    exporter: Exporter,
    save_location: SaveLocation,
}

impl Session {
    pub fn new(
        config: CanvasConfig,
        background: BackgroundImage,
        save_location: SaveLocation,
    ) -> Self {
        let canvas = AnnotationCanvas::new(config, background.size());
        Self {
            canvas,
            renderer: SkiaRenderer::new(background),
            exporter: Exporter::new(),
            save_location,
        }
    }

    /// Build a session from application configuration.
    ///
    /// An unreadable or unset background image falls back to a blank sheet
    /// so the patient can still draw.
    pub fn from_config(config: &AppConfig) -> SessionResult<Self> {
        let background = match &config.background_image {
            Some(path) => BackgroundImage::open(path).or_else(|e| {
                log::warn!("{}; drawing on a blank sheet", e);
                Self::placeholder()
            })?,
            None => {
                log::warn!("No background image configured; drawing on a blank sheet");
                Self::placeholder()?
            }
        };
        let save_location = SaveLocation::from_config(config.save_dir.as_deref());
        log::info!("Saving images to {}", save_location.dir().display());
        Ok(Self::new(config.canvas.clone(), background, save_location))
    }

    fn placeholder() -> SessionResult<BackgroundImage> {
        let (width, height) = PLACEHOLDER_SIZE;
        Ok(BackgroundImage::solid(width, height, [255, 255, 255, 255])?)
    }

    pub fn canvas(&self) -> &AnnotationCanvas {
        &self.canvas
    }

    pub fn save_location(&self) -> &SaveLocation {
        &self.save_location
    }

    /// Visible-change counter of the canvas.
    pub fn revision(&self) -> u64 {
        self.canvas.revision()
    }

    /// Forward a widget resize.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.canvas.set_viewport_size(width, height);
    }

    /// Forward a pointer event. Returns true if a redraw is needed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        self.canvas.handle_pointer_event(event)
    }

    /// Apply a control action.
    pub fn handle_action(&mut self, action: UiAction) -> SessionResult<ActionOutcome> {
        let applied = |changed: bool| {
            if changed {
                ActionOutcome::Handled
            } else {
                ActionOutcome::Ignored
            }
        };
        let outcome = match action {
            UiAction::SetPainLevel(value) => {
                let level = self.canvas.set_pain_level(value);
                log::debug!("Pain level {}", level.get());
                ActionOutcome::Handled
            }
            UiAction::SetPencilLevel(value) => {
                let level = self.canvas.set_pencil_level(value);
                log::debug!("Pencil level {}", level.get());
                ActionOutcome::Handled
            }
            UiAction::TogglePan => {
                self.canvas.toggle_pan();
                ActionOutcome::Handled
            }
            UiAction::ToggleEraser => {
                self.canvas.toggle_eraser();
                ActionOutcome::Handled
            }
            UiAction::SetMode(mode) => {
                self.canvas.set_mode(mode);
                ActionOutcome::Handled
            }
            UiAction::Clear => {
                self.canvas.clear();
                log::info!("Canvas cleared");
                ActionOutcome::Handled
            }
            UiAction::Undo => applied(self.canvas.undo()),
            UiAction::Redo => applied(self.canvas.redo()),
            UiAction::ZoomIn => applied(self.canvas.zoom_in()),
            UiAction::ZoomOut => applied(self.canvas.zoom_out()),
            UiAction::ZoomReset => {
                self.canvas.reset_view();
                ActionOutcome::Handled
            }
            UiAction::Save {
                pseudonym,
                overwrite,
            } => self.save(&pseudonym, overwrite)?,
        };
        Ok(outcome)
    }

    /// Save the annotated image as `<save dir>/<pseudonym>.png`.
    ///
    /// Without `overwrite`, an existing file is left alone and
    /// [`ActionOutcome::ConfirmOverwrite`] is returned instead.
    pub fn save(&mut self, pseudonym: &str, overwrite: bool) -> SessionResult<ActionOutcome> {
        let path = self.save_location.path_for(pseudonym)?;
        if !overwrite && path_exists(&path) {
            log::info!("{} already exists, asking before overwriting", path.display());
            return Ok(ActionOutcome::ConfirmOverwrite(path));
        }

        let dir = self.save_location.dir();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| {
                log::error!("Failed to create save directory {}: {}", dir.display(), source);
                ExportError::FileWrite {
                    path: dir.to_path_buf(),
                    source,
                }
            })?;
        }

        self.exporter
            .export(&mut self.renderer, &self.canvas, &path)?;
        Ok(ActionOutcome::Saved(path))
    }

    /// Render the live surface.
    pub fn render_frame(&mut self) -> SessionResult<RgbaFrame> {
        Ok(self.renderer.render(&RenderContext::new(&self.canvas))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use seepain_core::{StrokeColor, ToolMode};
    use tempfile::{TempDir, tempdir};

    fn setup() -> (Session, TempDir) {
        let dir = tempdir().unwrap();
        let background = BackgroundImage::solid(50, 50, [255, 255, 255, 255]).unwrap();
        let mut session = Session::new(
            CanvasConfig::default(),
            background,
            SaveLocation::new(dir.path()),
        );
        session.set_viewport_size(100.0, 100.0);
        (session, dir)
    }

    fn drag(session: &mut Session, from: Point, to: Point) {
        session.handle_pointer(PointerEvent::Down { position: from });
        session.handle_pointer(PointerEvent::Move { position: to });
        session.handle_pointer(PointerEvent::Up { position: to });
    }

    fn save(pseudonym: &str, overwrite: bool) -> UiAction {
        UiAction::Save {
            pseudonym: pseudonym.to_string(),
            overwrite,
        }
    }

    #[test]
    fn test_sliders_apply_to_next_stroke() {
        let (mut session, _dir) = setup();
        drag(&mut session, Point::new(10.0, 10.0), Point::new(20.0, 20.0));

        session.handle_action(UiAction::SetPainLevel(1.0)).unwrap();
        session.handle_action(UiAction::SetPencilLevel(7.9)).unwrap();
        drag(&mut session, Point::new(30.0, 30.0), Point::new(40.0, 40.0));

        let strokes = session.canvas().strokes();
        assert_eq!(strokes[0].color(), StrokeColor::red());
        assert!((strokes[0].width() - 2.0).abs() < f64::EPSILON);
        assert_eq!(strokes[1].color(), StrokeColor::new(255, 255, 0, 255));
        assert!((strokes[1].width() - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_toggle_buttons() {
        let (mut session, _dir) = setup();
        session.handle_action(UiAction::TogglePan).unwrap();
        assert_eq!(session.canvas().mode(), ToolMode::Pan);
        session.handle_action(UiAction::ToggleEraser).unwrap();
        assert_eq!(session.canvas().mode(), ToolMode::Erase);
        session.handle_action(UiAction::ToggleEraser).unwrap();
        assert_eq!(session.canvas().mode(), ToolMode::Draw);
        session.handle_action(UiAction::SetMode(ToolMode::Pan)).unwrap();
        assert_eq!(session.canvas().mode(), ToolMode::Pan);
    }

    #[test]
    fn test_undo_redo_clear() {
        let (mut session, _dir) = setup();
        assert_eq!(session.handle_action(UiAction::Undo).unwrap(), ActionOutcome::Ignored);

        drag(&mut session, Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        drag(&mut session, Point::new(30.0, 30.0), Point::new(40.0, 40.0));
        assert_eq!(session.handle_action(UiAction::Undo).unwrap(), ActionOutcome::Handled);
        assert_eq!(session.canvas().strokes().len(), 1);
        assert_eq!(session.handle_action(UiAction::Redo).unwrap(), ActionOutcome::Handled);
        assert_eq!(session.canvas().strokes().len(), 2);
        assert_eq!(session.handle_action(UiAction::Redo).unwrap(), ActionOutcome::Ignored);

        session.handle_action(UiAction::Clear).unwrap();
        assert!(session.canvas().strokes().is_empty());
        assert!(!session.canvas().can_undo());
        assert!(!session.canvas().can_redo());
    }

    #[test]
    fn test_zoom_buttons() {
        let (mut session, _dir) = setup();
        assert_eq!(session.handle_action(UiAction::ZoomIn).unwrap(), ActionOutcome::Handled);
        assert!(session.canvas().camera().zoom > 1.0);
        session.handle_action(UiAction::ZoomReset).unwrap();
        assert!(session.canvas().camera().is_canonical());

        for _ in 0..20 {
            session.handle_action(UiAction::ZoomOut).unwrap();
        }
        assert_eq!(session.handle_action(UiAction::ZoomOut).unwrap(), ActionOutcome::Ignored);
    }

    #[test]
    fn test_save_writes_pseudonym_png() {
        let (mut session, dir) = setup();
        drag(&mut session, Point::new(10.0, 10.0), Point::new(90.0, 90.0));

        let outcome = session.handle_action(save(" Fox-17 ", false)).unwrap();
        let expected = dir.path().join("Fox-17.png");
        assert_eq!(outcome, ActionOutcome::Saved(expected.clone()));

        let decoded = image::open(&expected).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 100));
    }

    #[test]
    fn test_existing_file_needs_confirmation() {
        let (mut session, dir) = setup();
        let path = dir.path().join("Fox-17.png");
        fs::write(&path, b"previous").unwrap();

        let outcome = session.handle_action(save("Fox-17", false)).unwrap();
        assert_eq!(outcome, ActionOutcome::ConfirmOverwrite(path.clone()));
        assert_eq!(fs::read(&path).unwrap(), b"previous");

        let outcome = session.handle_action(save("Fox-17", true)).unwrap();
        assert_eq!(outcome, ActionOutcome::Saved(path.clone()));
        assert_ne!(fs::read(&path).unwrap(), b"previous");
    }

    #[test]
    fn test_save_without_pseudonym() {
        let (mut session, _dir) = setup();
        drag(&mut session, Point::new(10.0, 10.0), Point::new(20.0, 20.0));
        let before = session.canvas().strokes().to_vec();

        let result = session.handle_action(save("   ", false));
        assert!(matches!(result, Err(SessionError::MissingPseudonym)));
        assert_eq!(session.canvas().strokes(), before.as_slice());
    }

    #[test]
    fn test_save_creates_missing_dir() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("exports");
        let background = BackgroundImage::solid(10, 10, [255, 255, 255, 255]).unwrap();
        let mut session = Session::new(
            CanvasConfig::default(),
            background,
            SaveLocation::new(&target),
        );
        session.set_viewport_size(20.0, 20.0);

        let outcome = session.save("p1", false).unwrap();
        assert_eq!(outcome, ActionOutcome::Saved(target.join("p1.png")));
    }

    #[test]
    fn test_uncreatable_save_dir_is_a_write_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();
        let background = BackgroundImage::solid(10, 10, [255, 255, 255, 255]).unwrap();
        let mut session = Session::new(
            CanvasConfig::default(),
            background,
            SaveLocation::new(blocker.join("sub")),
        );
        session.set_viewport_size(20.0, 20.0);

        let result = session.save("p1", false);
        assert!(matches!(
            result,
            Err(SessionError::Export(ExportError::FileWrite { .. }))
        ));
    }

    #[test]
    fn test_save_before_layout_fails() {
        let dir = tempdir().unwrap();
        let background = BackgroundImage::solid(10, 10, [255, 255, 255, 255]).unwrap();
        let mut session = Session::new(
            CanvasConfig::default(),
            background,
            SaveLocation::new(dir.path()),
        );

        let result = session.save("p1", false);
        assert!(matches!(
            result,
            Err(SessionError::Export(ExportError::Render(_)))
        ));
        assert!(!dir.path().join("p1.png").exists());
    }

    #[test]
    fn test_render_frame_tracks_viewport() {
        let (mut session, _dir) = setup();
        let frame = session.render_frame().unwrap();
        assert_eq!((frame.width, frame.height), (100, 100));

        let before = session.revision();
        session.set_viewport_size(40.0, 30.0);
        assert_ne!(session.revision(), before);
        let frame = session.render_frame().unwrap();
        assert_eq!((frame.width, frame.height), (40, 30));
    }

    #[test]
    fn test_from_config_without_background() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            background_image: Some(dir.path().join("missing.png")),
            save_dir: Some(dir.path().to_path_buf()),
            ..AppConfig::default()
        };

        let session = Session::from_config(&config).unwrap();
        assert_eq!(session.canvas().image_size(), kurbo::Size::new(600.0, 800.0));
        assert_eq!(session.save_location().dir(), dir.path());
    }

    #[test]
    fn test_from_config_loads_background() {
        let dir = tempdir().unwrap();
        let image_path = dir.path().join("body.png");
        let frame = RgbaFrame {
            rgba_data: vec![0; 30 * 60 * 4],
            width: 30,
            height: 60,
        };
        fs::write(&image_path, seepain_render::encode_png(&frame).unwrap()).unwrap();

        let config = AppConfig {
            background_image: Some(image_path),
            ..AppConfig::default()
        };
        let session = Session::from_config(&config).unwrap();
        assert_eq!(session.canvas().image_size(), kurbo::Size::new(30.0, 60.0));
    }

    #[test]
    fn test_pinch_zoom_only_in_pan_mode() {
        let (mut session, _dir) = setup();
        let pinch = PointerEvent::Zoom {
            position: Point::new(50.0, 50.0),
            factor: 2.0,
        };
        assert!(!session.handle_pointer(pinch));

        session.handle_action(UiAction::TogglePan).unwrap();
        assert!(session.handle_pointer(pinch));
        assert!((session.canvas().camera().zoom - 2.0).abs() < f64::EPSILON);
    }
}
