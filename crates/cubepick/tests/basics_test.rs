//! GPU-free checks of the public API: configuration loading and the frame
//! schedule driven through a scripted backend.

use std::collections::HashMap;
use std::convert::Infallible;

use cubepick::*;

type BackendResult<T> = std::result::Result<T, Infallible>;

/// Answers identity reads from a table keyed by image coordinate.
struct ScriptedBackend {
    viewport: Viewport,
    hits: HashMap<(u32, u32), IdentityTriple>,
    reads: usize,
    highlights: Vec<Option<HighlightDraw>>,
}

impl ScriptedBackend {
    fn new() -> Self {
        Self {
            viewport: Viewport::new(800, 600).unwrap(),
            hits: HashMap::new(),
            reads: 0,
            highlights: Vec::new(),
        }
    }
}

impl FrameBackend for ScriptedBackend {
    type Error = Infallible;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn identity_pass(&mut self, _: &Mat4, _: DrawIdentity) -> BackendResult<()> {
        Ok(())
    }

    fn read_identity(&mut self, at: ImageCoord) -> BackendResult<Option<IdentityTriple>> {
        self.reads += 1;
        Ok(Some(
            self.hits
                .get(&(at.x, at.y))
                .copied()
                .unwrap_or(IdentityTriple::BACKGROUND),
        ))
    }

    fn visible_pass(&mut self, _: &Mat4, overlays: &OverlayPlan) -> BackendResult<()> {
        self.highlights.push(overlays.highlight);
        Ok(())
    }

    fn present(&mut self) -> BackendResult<()> {
        Ok(())
    }
}

#[test]
fn drag_over_primitive_four_then_release() {
    let options = Options::default();
    let mut backend = ScriptedBackend::new();
    // Window (400, 300) maps to image (400, 299).
    backend
        .hits
        .insert((400, 299), IdentityTriple::new(1, 1, 4));
    let mut state = InteractionState::new(options.object_id);

    let (elsewhere, target) = (CursorPosition::new(10, 10), CursorPosition::new(400, 300));

    state.handle_button(MouseButton::Left, ButtonAction::Pressed);
    run_frame(&mut backend, &mut state, 0.0, elsewhere, &options).unwrap();
    let report = run_frame(&mut backend, &mut state, 0.0, target, &options).unwrap();
    assert_eq!(report.pick, Some(IdentityTriple::new(1, 1, 4)));
    assert_eq!(report.pick.and_then(|p| p.face()), Some(Face::Right));

    state.handle_button(MouseButton::Left, ButtonAction::Released);
    run_frame(&mut backend, &mut state, 0.0, target, &options).unwrap();

    assert_eq!(backend.highlights[0], None);
    assert_eq!(backend.highlights[1].map(|h| h.vertices()), Some(12..15));
    assert_eq!(backend.highlights[2], None);
}

#[test]
fn steady_frames_are_quiet_and_outside_cursor_never_reads() {
    let options = Options::default();
    let mut backend = ScriptedBackend::new();
    let mut state = InteractionState::new(options.object_id);

    let cursor = CursorPosition::new(5, 5);

    let first = run_frame(&mut backend, &mut state, 0.0, cursor, &options).unwrap();
    let second = run_frame(&mut backend, &mut state, 0.0, cursor, &options).unwrap();
    assert_eq!(first.diagnostics.len(), 1);
    assert!(second.diagnostics.is_empty());
    assert_eq!(backend.reads, 2);

    for cursor in [CursorPosition::NONE, CursorPosition::new(800, 10)] {
        run_frame(&mut backend, &mut state, 0.0, cursor, &options).unwrap();
    }
    assert_eq!(backend.reads, 2);
}

#[test]
fn options_from_config_env() {
    let dir = std::env::temp_dir().join(format!("cubepick-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("options.json");
    std::fs::write(&path, r#"{ "uv_repeat": 4.0, "readback": "Deferred" }"#).unwrap();

    std::env::set_var(CONFIG_ENV, &path);
    let loaded = load_options();
    std::env::remove_var(CONFIG_ENV);
    let _ = std::fs::remove_dir_all(&dir);

    let options = loaded.unwrap();
    assert_eq!(options.uv_repeat, 4.0);
    assert_eq!(options.readback, ReadbackMode::Deferred);
    assert_eq!(options.object_id, 1);

    assert_eq!(load_options().unwrap(), Options::default());
}
