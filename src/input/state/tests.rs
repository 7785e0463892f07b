use super::*;
use crate::dialogs::ScriptedDialogs;
use crate::draw::{BLACK, BLUE, Color, GREEN, Layer, RED, WHITE};
use crate::history::StrokeRecord;
use crate::input::{MouseButton, ToolKind};

fn create_test_input_state() -> InputState {
    let settings = BoardSettings {
        page_width: 160,
        page_height: 100,
        display_width: 160,
        display_height: 100,
        ..BoardSettings::default()
    };
    InputState::with_rng_seed(settings, 42).unwrap()
}

fn drag(state: &mut InputState, from: (f64, f64), to: (f64, f64)) {
    let mut dialogs = ScriptedDialogs::new();
    state.on_mouse_press(MouseButton::Left, from.0, from.1, &mut dialogs);
    state.on_mouse_motion(to.0, to.1);
    state.on_mouse_release(MouseButton::Left, to.0, to.1);
}

fn count_pixels(state: &InputState, color: Color) -> usize {
    let raster = state.current_page().raster();
    (0..raster.height())
        .flat_map(|y| (0..raster.width()).map(move |x| (x, y)))
        .filter(|(x, y)| raster.pixel(*x, *y) == Some(color))
        .count()
}

#[test]
fn test_defaults_from_settings() {
    let state = create_test_input_state();
    assert_eq!(state.tool.active_tool, ToolKind::Pen);
    assert_eq!(state.tool.stroke_width, 4);
    assert_eq!(state.tool.color, WHITE);
    assert_eq!(state.pages.len(), 1);
    assert_eq!(state.current_page().background(), BLACK);
    assert_eq!(state.history.capacity(), 200);
    assert!(!state.is_drawing());
}

#[test]
fn test_freehand_stroke_scenario() {
    let mut state = create_test_input_state();
    drag(&mut state, (10.0, 10.0), (50.0, 10.0));

    let raster = state.current_page().raster();
    for x in 10..=50 {
        assert_ne!(raster.pixel(x, 10), Some(BLACK), "column {x}");
    }
    assert_eq!(raster.pixel(30, 20), Some(BLACK));

    assert_eq!(state.history.undo_len(), 1);
    match state.history.last_undo() {
        Some(StrokeRecord::Itemized(stroke)) => assert!(!stroke.handles().is_empty()),
        other => panic!("expected itemized entry, got {other:?}"),
    }
    assert_eq!(state.status, "Undo: 1  |  Redo: 0");
}

#[test]
fn test_press_and_release_without_motion_records_nothing() {
    let mut state = create_test_input_state();
    let mut dialogs = ScriptedDialogs::new();
    state.on_mouse_press(MouseButton::Left, 10.0, 10.0, &mut dialogs);
    state.on_mouse_release(MouseButton::Left, 10.0, 10.0);
    assert_eq!(state.history.undo_len(), 0);
    assert!(!state.is_drawing());
}

#[test]
fn test_reversed_rectangle_spans_exact_box() {
    let mut state = create_test_input_state();
    state.set_tool(ToolKind::Rectangle);
    state.set_color(RED);
    drag(&mut state, (80.0, 80.0), (20.0, 20.0));

    let raster = state.current_page().raster();
    assert_eq!(raster.pixel(20, 20), Some(RED));
    assert_eq!(raster.pixel(80, 80), Some(RED));
    assert_eq!(raster.pixel(20, 80), Some(RED));
    assert_eq!(raster.pixel(80, 50), Some(RED));
    assert_eq!(raster.pixel(19, 50), Some(BLACK));
    assert_eq!(raster.pixel(81, 50), Some(BLACK));
    assert_eq!(raster.pixel(50, 19), Some(BLACK));
    assert_eq!(raster.pixel(50, 81), Some(BLACK));
    assert_eq!(raster.pixel(50, 50), Some(BLACK));
}

#[test]
fn test_fill_inside_outline_scenario() {
    let mut state = create_test_input_state();
    state.set_background(WHITE);
    state.set_tool(ToolKind::Rectangle);
    state.set_color(RED);
    drag(&mut state, (20.0, 20.0), (80.0, 80.0));
    let pre_fill = state.current_page().raster().try_clone().unwrap();
    let undo_before = state.history.undo_len();

    state.set_tool(ToolKind::Fill);
    state.set_color(BLUE);
    let mut dialogs = ScriptedDialogs::new();
    state.on_mouse_press(MouseButton::Left, 50.0, 50.0, &mut dialogs);

    let raster = state.current_page().raster();
    assert_eq!(raster.pixel(50, 50), Some(BLUE));
    assert_eq!(raster.pixel(30, 70), Some(BLUE));
    assert_eq!(raster.pixel(20, 50), Some(RED));
    assert_eq!(raster.pixel(10, 10), Some(WHITE));
    assert_eq!(raster.pixel(120, 90), Some(WHITE));

    assert_eq!(state.history.undo_len(), undo_before + 1);
    match state.history.last_undo() {
        Some(StrokeRecord::Snapshot(snapshot)) => {
            assert!(snapshot.raster.same_pixels(&pre_fill));
        }
        other => panic!("expected snapshot entry, got {other:?}"),
    }

    state.undo();
    assert!(state.current_page().raster().same_pixels(&pre_fill));
}

#[test]
fn test_three_strokes_undo_twice_redo_once() {
    let mut state = create_test_input_state();
    drag(&mut state, (10.0, 10.0), (60.0, 10.0));
    drag(&mut state, (10.0, 30.0), (60.0, 30.0));
    drag(&mut state, (10.0, 50.0), (60.0, 50.0));

    state.undo();
    state.undo();
    assert_eq!(state.history.undo_len(), 1);
    assert_eq!(state.history.redo_len(), 1);
    assert_eq!(state.current_page().raster().pixel(30, 30), Some(BLACK));

    state.redo();
    assert_eq!(state.history.undo_len(), 2);
    assert_eq!(state.history.redo_len(), 0);
    // redo brings the second stroke back on both buffers
    assert_eq!(state.current_page().raster().pixel(30, 30), Some(WHITE));
    assert_eq!(state.current_page().raster().pixel(30, 50), Some(BLACK));
}

#[test]
fn test_empty_history_reports_status() {
    let mut state = create_test_input_state();
    state.undo();
    assert_eq!(state.status, "Nothing to undo");
    state.redo();
    assert_eq!(state.status, "Nothing to redo");
}

#[test]
fn test_commit_clears_redo() {
    let mut state = create_test_input_state();
    drag(&mut state, (10.0, 10.0), (60.0, 10.0));
    state.undo();
    assert_eq!(state.history.redo_len(), 1);

    state.set_color(GREEN);
    state.fill_at(100.0, 80.0);
    assert_eq!(state.history.redo_len(), 0);
}

#[test]
fn test_background_change_snapshot_round_trip() {
    let mut state = create_test_input_state();
    drag(&mut state, (10.0, 10.0), (60.0, 10.0));
    let before = state.current_page().raster().try_clone().unwrap();

    state.set_background(BLUE);
    assert_eq!(state.status, "Background -> #0000ff");
    assert_eq!(count_pixels(&state, BLUE), 160 * 100);
    assert_eq!(state.renderer.overlay().count_layer(Layer::Drawing), 0);
    assert!(state.renderer.has_backdrop());

    state.undo();
    assert!(state.current_page().raster().same_pixels(&before));
    assert_eq!(state.current_page().background(), BLACK);

    state.redo();
    assert_eq!(count_pixels(&state, BLUE), 160 * 100);
    assert_eq!(state.current_page().background(), BLUE);
}

#[test]
fn test_clear_board_requires_confirmation() {
    let mut state = create_test_input_state();
    drag(&mut state, (10.0, 10.0), (60.0, 10.0));

    let mut declined = ScriptedDialogs::new().with_confirmation(false);
    state.clear_board(&mut declined);
    assert_eq!(declined.asked, vec!["Clear the entire board?"]);
    assert_eq!(state.history.undo_len(), 1);
    assert_ne!(state.current_page().raster().pixel(30, 10), Some(BLACK));

    let mut accepted = ScriptedDialogs::new().with_confirmation(true);
    state.clear_board(&mut accepted);
    assert_eq!(state.status, "Board cleared");
    assert_eq!(state.history.undo_len(), 2);
    assert_eq!(count_pixels(&state, BLACK), 160 * 100);
}

#[test]
fn test_page_switch_resets_history_and_overlay() {
    let mut state = create_test_input_state();
    state.set_background(WHITE);
    state.set_color(RED);
    drag(&mut state, (10.0, 10.0), (60.0, 10.0));
    drag(&mut state, (10.0, 40.0), (60.0, 40.0));
    state.undo();
    assert_eq!(state.history.redo_len(), 1);

    state.add_page();
    assert_eq!(state.status, "Page 2/2");
    assert_eq!(state.history.undo_len(), 0);
    assert_eq!(state.history.redo_len(), 0);
    assert_eq!(state.renderer.overlay().count_layer(Layer::Drawing), 0);
    assert_eq!(state.current_page().background(), WHITE);
    assert_eq!(count_pixels(&state, WHITE), 160 * 100);

    state.next_page();
    assert_eq!(state.pages.current_index(), 1);

    state.prev_page();
    assert_eq!(state.status, "Page 1/2");
    assert_eq!(state.history.undo_len(), 0);
    // the first page's raster survives the round trip and shows as backdrop
    assert_eq!(state.current_page().raster().pixel(30, 10), Some(RED));
    assert_eq!(state.current_page().raster().pixel(30, 40), Some(WHITE));
    let display = state.display_snapshot().unwrap();
    assert_eq!(display.pixel(30, 10), state.current_page().raster().pixel(30, 10));
}

#[test]
fn test_overlay_and_raster_agree_at_rest() {
    let mut state = create_test_input_state();
    state.set_tool(ToolKind::Rectangle);
    state.set_color(RED);
    state.toggle_fill_shapes();
    drag(&mut state, (20.0, 20.0), (70.0, 60.0));
    state.set_tool(ToolKind::Pen);
    state.set_color(GREEN);
    drag(&mut state, (100.0, 30.0), (150.0, 30.0));
    state.undo();
    state.redo();

    let display = state.display_snapshot().unwrap();
    let raster = state.current_page().raster();
    for (x, y) in [(40, 40), (10, 10), (125, 30), (125, 50), (90, 90)] {
        assert_eq!(display.pixel(x, y), raster.pixel(x, y), "pixel ({x}, {y})");
    }
}

#[test]
fn test_right_click_cancels_stroke() {
    let mut state = create_test_input_state();
    let mut dialogs = ScriptedDialogs::new();
    state.on_mouse_press(MouseButton::Left, 10.0, 10.0, &mut dialogs);
    state.on_mouse_motion(50.0, 10.0);
    assert!(state.renderer.overlay().count_layer(Layer::Drawing) > 0);

    state.on_mouse_press(MouseButton::Right, 50.0, 10.0, &mut dialogs);
    state.on_mouse_release(MouseButton::Left, 50.0, 10.0);
    assert_eq!(state.renderer.overlay().count_layer(Layer::Drawing), 0);
    assert_eq!(state.history.undo_len(), 0);
    assert_eq!(count_pixels(&state, BLACK), 160 * 100);
}

#[test]
fn test_size_and_opacity_are_clamped() {
    let mut state = create_test_input_state();
    state.set_size(500);
    assert_eq!(state.tool.stroke_width, MAX_STROKE_WIDTH);
    state.set_size(0);
    assert_eq!(state.tool.stroke_width, 1);

    state.set_size(10);
    state.adjust_size(1);
    assert_eq!(state.tool.stroke_width, 12);
    state.adjust_size(-10);
    assert_eq!(state.tool.stroke_width, 1);

    state.set_opacity(0.0);
    assert_eq!(state.tool.opacity, 0.1);
    state.set_opacity(3.0);
    assert_eq!(state.tool.opacity, 1.0);
}

#[test]
fn test_recent_colors_are_unique_and_bounded() {
    let mut state = create_test_input_state();
    state.set_color(RED);
    state.set_color(BLUE);
    state.set_color(RED);
    assert_eq!(state.recent_colors.front(), Some(&RED));
    assert_eq!(state.recent_colors.iter().filter(|c| **c == RED).count(), 1);

    for i in 0..20u8 {
        state.set_color(Color::new(i, i, i));
    }
    assert_eq!(state.recent_colors.len(), RECENT_COLORS);
}

#[test]
fn test_pick_color_dismissed_keeps_color() {
    let mut state = create_test_input_state();
    state.pick_color(&mut ScriptedDialogs::new());
    assert_eq!(state.tool.color, WHITE);
    state.pick_color(&mut ScriptedDialogs::new().with_color(GREEN));
    assert_eq!(state.tool.color, GREEN);
}

#[test]
fn test_set_tool_reports_label() {
    let mut state = create_test_input_state();
    state.set_tool(ToolKind::Dotted);
    assert_eq!(state.status, "Tool: Dotted");
}

#[test]
fn test_grid_toggle_adds_lines() {
    let mut state = create_test_input_state();
    assert!(state.toggle_grid());
    // 160 / 40 verticals + 100 / 40 horizontals
    assert_eq!(state.renderer.overlay().count_layer(Layer::Grid), 4 + 3);
    state.set_background(WHITE);
    assert_eq!(state.renderer.overlay().count_layer(Layer::Grid), 7);
    assert!(!state.toggle_grid());
    assert_eq!(state.renderer.overlay().count_layer(Layer::Grid), 0);
}

#[test]
fn test_opacity_blends_raster_stroke() {
    let mut state = create_test_input_state();
    state.set_opacity(0.5);
    drag(&mut state, (10.0, 50.0), (100.0, 50.0));
    let pixel = state.current_page().raster().pixel(50, 50).unwrap();
    assert!(pixel.r > 100 && pixel.r < 160, "{pixel:?}");
}

#[test]
fn test_save_png_and_session() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("board.png");
    let json = dir.path().join("session.json");
    let mut state = create_test_input_state();

    assert!(state.save_png(&mut ScriptedDialogs::new()).is_none());

    let mut dialogs = ScriptedDialogs::new()
        .with_save_path(&png)
        .with_save_path(&json);
    assert_eq!(state.save_png(&mut dialogs), Some(png.clone()));
    assert_eq!(state.status, "Saved: board.png");
    assert!(png.exists());

    assert_eq!(state.export_session(&mut dialogs), Some(json.clone()));
    assert_eq!(state.status, "Session exported");
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(value["pages"], 1);
    assert_eq!(value["tool"], "pen");
}

#[test]
fn test_save_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();
    let mut state = create_test_input_state();
    let mut dialogs = ScriptedDialogs::new().with_save_path(blocker.join("board.jpg"));

    assert!(state.save_jpeg(&mut dialogs).is_none());
    assert!(state.status.starts_with("Save failed"));
}

#[test]
fn test_display_scale_maps_strokes_to_raster() {
    let settings = BoardSettings {
        page_width: 200,
        page_height: 100,
        display_width: 100,
        display_height: 100,
        ..BoardSettings::default()
    };
    let mut state = InputState::with_rng_seed(settings, 1).unwrap();
    state.set_tool(ToolKind::Rectangle);
    state.set_color(RED);
    state.toggle_fill_shapes();
    drag(&mut state, (10.0, 10.0), (40.0, 40.0));

    let raster = state.current_page().raster();
    assert_eq!(raster.pixel(60, 25), Some(RED));
    assert_eq!(raster.pixel(100, 25), Some(BLACK));
}
