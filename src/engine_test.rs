#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

const BOARD: &str = "notes";

fn surface() -> (SurfaceCore, ViewportStore) {
    (SurfaceCore::new(BOARD), ViewportStore::new())
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn place(core: &mut SurfaceCore, x: f64, y: f64, w: f64, h: f64) -> NoteId {
    let id = core.graph.add_note(NewNote { x, y, width: w, height: h, ..NewNote::default() });
    core.graph.select_note(None);
    id
}

/// A at the origin, B down and to the right; both 100x50.
fn two_notes(core: &mut SurfaceCore) -> (NoteId, NoteId) {
    (place(core, 0.0, 0.0, 100.0, 50.0), place(core, 300.0, 200.0, 100.0, 50.0))
}

fn click(core: &mut SurfaceCore, vps: &mut ViewportStore, at: Point) {
    core.on_pointer_down(vps, at, Button::Primary);
    core.on_pointer_up(vps, at);
}

fn drag_connection(core: &mut SurfaceCore, vps: &mut ViewportStore, from: Point, to: Point) -> Vec<Action> {
    core.on_pointer_down(vps, from, Button::Primary);
    core.on_pointer_move(vps, to);
    core.on_pointer_up(vps, to)
}

fn key(name: &str) -> Key {
    Key(name.to_string())
}

// =============================================================
// Panning
// =============================================================

#[test]
fn empty_space_drag_pans_viewport() {
    let (mut core, mut vps) = surface();
    let actions = core.on_pointer_down(&mut vps, pt(10.0, 10.0), Button::Primary);
    assert!(actions.contains(&Action::SetCursor("grabbing")));
    assert_eq!(core.input, InputState::Panning);
    assert!(vps.instance(BOARD).dragging);

    core.on_pointer_move(&mut vps, pt(30.0, 25.0));
    assert_eq!(vps.instance(BOARD).offset, pt(20.0, 15.0));

    core.on_pointer_up(&mut vps, pt(30.0, 25.0));
    assert_eq!(core.input, InputState::Idle);
    assert!(!vps.instance(BOARD).dragging);
}

#[test]
fn empty_space_press_clears_selection_and_editing() {
    let (mut core, mut vps) = surface();
    let id = core.graph.add_note(NewNote { width: 100.0, height: 50.0, ..NewNote::default() });
    assert_eq!(core.graph.editing(), Some(id));

    core.on_pointer_down(&mut vps, pt(500.0, 500.0), Button::Primary);
    assert_eq!(core.graph.selected(), None);
    assert_eq!(core.graph.editing(), None);
}

#[test]
fn leave_during_pan_stops_dragging() {
    let (mut core, mut vps) = surface();
    core.on_pointer_down(&mut vps, pt(0.0, 0.0), Button::Primary);
    core.on_pointer_leave(&mut vps);
    assert_eq!(core.input, InputState::Idle);
    assert!(!vps.instance(BOARD).dragging);

    core.on_pointer_move(&mut vps, pt(50.0, 50.0));
    assert_eq!(vps.instance(BOARD).offset, pt(0.0, 0.0));
}

#[test]
fn press_during_gesture_is_ignored() {
    let (mut core, mut vps) = surface();
    core.on_pointer_down(&mut vps, pt(0.0, 0.0), Button::Primary);
    let actions = core.on_pointer_down(&mut vps, pt(5.0, 5.0), Button::Secondary);
    assert!(actions.is_empty());
    assert_eq!(core.input, InputState::Panning);
}

#[test]
fn surfaces_share_store_without_interfering() {
    let mut vps = ViewportStore::new();
    let mut board = SurfaceCore::new("board");
    let notes = SurfaceCore::new("notes");

    board.on_pointer_down(&mut vps, pt(0.0, 0.0), Button::Primary);
    board.on_pointer_move(&mut vps, pt(40.0, 0.0));
    board.on_pointer_up(&mut vps, pt(40.0, 0.0));

    assert_eq!(board.viewport(&vps).offset, pt(40.0, 0.0));
    assert_eq!(notes.viewport(&vps), Viewport::default());
    assert!(!vps.contains("notes"));
}

// =============================================================
// Context menu
// =============================================================

#[test]
fn secondary_press_requests_context_menu_in_canvas_space() {
    let (mut core, mut vps) = surface();
    core.set_surface_rect(SurfaceRect { left: 10.0, top: 20.0, width: 800.0, height: 600.0 });
    vps.set_offset(BOARD, pt(5.0, 5.0));
    vps.set_scale(BOARD, 2.0);

    let actions = core.on_pointer_down(&mut vps, pt(115.0, 125.0), Button::Secondary);
    assert_eq!(actions, vec![Action::ContextMenuRequested { canvas: pt(50.0, 50.0), client: pt(115.0, 125.0) }]);
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn middle_press_does_nothing() {
    let (mut core, mut vps) = surface();
    assert!(core.on_pointer_down(&mut vps, pt(0.0, 0.0), Button::Middle).is_empty());
    assert_eq!(core.input, InputState::Idle);
}

// =============================================================
// Dragging notes
// =============================================================

#[test]
fn body_drag_moves_note_keeping_grab_point() {
    let (mut core, mut vps) = surface();
    let id = place(&mut core, 0.0, 0.0, 100.0, 50.0);

    core.on_pointer_down(&mut vps, pt(30.0, 20.0), Button::Primary);
    assert_eq!(core.input, InputState::DraggingNote { id, grab: pt(30.0, 20.0) });
    assert_eq!(core.graph.selected(), Some(id));

    let actions = core.on_pointer_move(&mut vps, pt(130.0, 70.0));
    assert_eq!(actions[0], Action::NoteUpdated { id, patch: NotePatch::position(100.0, 50.0) });
    let note = core.graph.note(id).unwrap();
    assert_eq!((note.x, note.y), (100.0, 50.0));

    core.on_pointer_up(&mut vps, pt(130.0, 70.0));
    assert_eq!(core.input, InputState::Idle);
    assert!(!vps.instance(BOARD).dragging);
}

#[test]
fn drag_under_zoom_moves_in_canvas_units() {
    let (mut core, mut vps) = surface();
    let id = place(&mut core, 0.0, 0.0, 100.0, 50.0);
    vps.set_scale(BOARD, 2.0);

    core.on_pointer_down(&mut vps, pt(60.0, 40.0), Button::Primary);
    core.on_pointer_move(&mut vps, pt(260.0, 140.0));
    let note = core.graph.note(id).unwrap();
    assert_eq!((note.x, note.y), (100.0, 50.0));
}

#[test]
fn drag_keeps_connection_attached() {
    let (mut core, mut vps) = surface();
    let (a, b) = two_notes(&mut core);
    core.graph.start_connection(a, 100.0, 25.0);
    let conn = core.graph.complete_connection(b).unwrap();

    core.on_pointer_down(&mut vps, pt(50.0, 25.0), Button::Primary);
    core.on_pointer_move(&mut vps, pt(50.0, 125.0));
    core.on_pointer_up(&mut vps, pt(50.0, 125.0));

    let points = core.graph.connection(conn).unwrap().points;
    assert_eq!(points.start(), pt(100.0, 125.0));
    assert_eq!(points.end(), pt(300.0, 225.0));
}

#[test]
fn deleting_dragged_note_ends_gesture() {
    let (mut core, mut vps) = surface();
    let id = place(&mut core, 0.0, 0.0, 100.0, 50.0);
    core.on_pointer_down(&mut vps, pt(30.0, 20.0), Button::Primary);

    core.delete_note(id);
    assert_eq!(core.input, InputState::Idle);
    assert!(core.on_pointer_move(&mut vps, pt(80.0, 80.0)).is_empty());
}

// =============================================================
// Resizing notes
// =============================================================

#[test]
fn grip_drag_resizes_with_minimum() {
    let (mut core, mut vps) = surface();
    let id = place(&mut core, 0.0, 0.0, 100.0, 50.0);

    core.on_pointer_down(&mut vps, pt(100.0, 50.0), Button::Primary);
    assert!(matches!(core.input, InputState::ResizingNote { id: r, .. } if r == id));

    core.on_pointer_move(&mut vps, pt(140.0, 90.0));
    let note = core.graph.note(id).unwrap();
    assert_eq!((note.width, note.height), (140.0, 90.0));

    core.on_pointer_move(&mut vps, pt(-100.0, -100.0));
    let note = core.graph.note(id).unwrap();
    assert_eq!((note.width, note.height), (MIN_NOTE_WIDTH, MIN_NOTE_HEIGHT));
    assert_eq!((note.x, note.y), (0.0, 0.0));
}

// =============================================================
// Connecting notes
// =============================================================

#[test]
fn handle_drag_previews_then_connects() {
    let (mut core, mut vps) = surface();
    let (a, b) = two_notes(&mut core);

    core.on_pointer_down(&mut vps, pt(100.0, 25.0), Button::Primary);
    assert_eq!(core.input, InputState::Connecting { from: a });
    let temp = core.graph.temp_connection().unwrap();
    assert_eq!((temp.x, temp.y), (100.0, 25.0));

    core.on_pointer_move(&mut vps, pt(250.0, 100.0));
    let temp = core.graph.temp_connection().unwrap();
    assert_eq!((temp.x, temp.y), (250.0, 100.0));

    let actions = core.on_pointer_up(&mut vps, pt(300.0, 225.0));
    let Some(Action::ConnectionCreated(conn)) = actions.iter().find(|a| matches!(a, Action::ConnectionCreated(_))) else {
        panic!("expected ConnectionCreated in {actions:?}");
    };
    assert_eq!((conn.from_note_id, conn.to_note_id), (a, b));
    assert_eq!(core.graph.connection_count(), 1);
    assert!(core.graph.temp_connection().is_none());
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn connect_handle_radius_follows_zoom() {
    let (mut core, mut vps) = surface();
    let (a, _) = two_notes(&mut core);
    vps.set_scale(BOARD, 0.5);

    // 5 screen px left of A's right handle is 10 canvas units: inside the
    // body, not the handle, at scale 1. At scale 0.5 the handle radius is
    // 12 canvas units so it still grabs the handle.
    core.on_pointer_down(&mut vps, pt(45.0, 12.5), Button::Primary);
    assert_eq!(core.input, InputState::Connecting { from: a });
}

#[test]
fn connection_dropped_on_empty_space_is_cancelled() {
    let (mut core, mut vps) = surface();
    two_notes(&mut core);
    let actions = drag_connection(&mut core, &mut vps, pt(100.0, 25.0), pt(600.0, 600.0));
    assert!(!actions.iter().any(|a| matches!(a, Action::ConnectionCreated(_))));
    assert_eq!(core.graph.connection_count(), 0);
    assert!(core.graph.temp_connection().is_none());
}

#[test]
fn connection_dropped_on_body_is_cancelled() {
    let (mut core, mut vps) = surface();
    two_notes(&mut core);
    drag_connection(&mut core, &mut vps, pt(100.0, 25.0), pt(350.0, 225.0));
    assert_eq!(core.graph.connection_count(), 0);
}

#[test]
fn connection_onto_own_handle_is_rejected() {
    let (mut core, mut vps) = surface();
    two_notes(&mut core);
    drag_connection(&mut core, &mut vps, pt(100.0, 25.0), pt(0.0, 25.0));
    assert_eq!(core.graph.connection_count(), 0);
    assert!(core.graph.temp_connection().is_none());
}

#[test]
fn reverse_connection_is_rejected() {
    let (mut core, mut vps) = surface();
    two_notes(&mut core);
    drag_connection(&mut core, &mut vps, pt(100.0, 25.0), pt(300.0, 225.0));
    let actions = drag_connection(&mut core, &mut vps, pt(400.0, 225.0), pt(0.0, 25.0));
    assert!(!actions.iter().any(|a| matches!(a, Action::ConnectionCreated(_))));
    assert_eq!(core.graph.connection_count(), 1);
}

#[test]
fn leave_during_connect_drops_preview() {
    let (mut core, mut vps) = surface();
    two_notes(&mut core);
    core.on_pointer_down(&mut vps, pt(100.0, 25.0), Button::Primary);
    core.on_pointer_leave(&mut vps);
    assert!(core.graph.temp_connection().is_none());
    assert_eq!(core.input, InputState::Idle);
    assert!(core.scene(&vps).temp_connection.is_none());
}

// =============================================================
// Wheel zoom
// =============================================================

#[test]
fn wheel_zooms_about_pointer() {
    let (mut core, mut vps) = surface();
    let before = vps.screen_to_canvas(BOARD, 100.0, 100.0);
    let actions = core.on_wheel(&mut vps, pt(100.0, 100.0), WheelDelta { dx: 0.0, dy: -1.0 });
    assert_eq!(actions, vec![Action::RenderNeeded]);

    assert!(approx_eq(vps.instance(BOARD).scale, 1.07));
    let after = vps.screen_to_canvas(BOARD, 100.0, 100.0);
    assert!(approx_eq(before.x, after.x) && approx_eq(before.y, after.y));
}

#[test]
fn wheel_uses_surface_rect() {
    let (mut core, mut vps) = surface();
    core.set_surface_rect(SurfaceRect { left: 50.0, top: 50.0, width: 400.0, height: 400.0 });
    let before = core.client_to_canvas(&vps, pt(150.0, 150.0));
    core.on_wheel(&mut vps, pt(150.0, 150.0), WheelDelta { dx: 0.0, dy: 3.0 });
    let after = core.client_to_canvas(&vps, pt(150.0, 150.0));
    assert!(approx_eq(vps.instance(BOARD).scale, 0.93));
    assert!(approx_eq(before.x, after.x) && approx_eq(before.y, after.y));
}

// =============================================================
// Editing and keys
// =============================================================

#[test]
fn double_click_starts_editing() {
    let (mut core, vps) = surface();
    let id = place(&mut core, 0.0, 0.0, 100.0, 50.0);
    let actions = core.on_double_click(&vps, pt(50.0, 25.0));
    assert_eq!(actions, vec![Action::EditRequested { id }, Action::RenderNeeded]);
    assert_eq!(core.graph.editing(), Some(id));
    assert_eq!(core.graph.selected(), Some(id));
}

#[test]
fn double_click_on_empty_space_does_nothing() {
    let (mut core, vps) = surface();
    assert!(core.on_double_click(&vps, pt(50.0, 25.0)).is_empty());
}

#[test]
fn escape_cancels_connect_and_stops_editing() {
    let (mut core, mut vps) = surface();
    let (a, _) = two_notes(&mut core);
    core.graph.start_editing(a);
    core.on_pointer_down(&mut vps, pt(100.0, 25.0), Button::Primary);

    core.on_key_down(&mut vps, &key("Escape"));
    assert_eq!(core.input, InputState::Idle);
    assert!(core.graph.temp_connection().is_none());
    assert_eq!(core.graph.editing(), None);
}

#[test]
fn delete_key_removes_selected_note_and_its_connections() {
    let (mut core, mut vps) = surface();
    let (a, b) = two_notes(&mut core);
    core.graph.start_connection(a, 0.0, 0.0);
    let conn = core.graph.complete_connection(b).unwrap();

    click(&mut core, &mut vps, pt(50.0, 25.0));
    assert_eq!(core.graph.selected(), Some(a));

    let actions = core.on_key_down(&mut vps, &key("Delete"));
    assert_eq!(
        actions,
        vec![Action::ConnectionDeleted { id: conn }, Action::NoteDeleted { id: a }, Action::RenderNeeded]
    );
    assert!(core.graph.note(a).is_none());
    assert_eq!(core.graph.connection_count(), 0);
    assert_eq!(core.graph.selected(), None);
}

#[test]
fn delete_key_while_editing_is_text_input() {
    let (mut core, mut vps) = surface();
    let id = core.graph.add_note(NewNote { width: 100.0, height: 50.0, ..NewNote::default() });
    assert!(core.on_key_down(&mut vps, &key("Backspace")).is_empty());
    assert!(core.graph.note(id).is_some());
}

#[test]
fn other_keys_are_ignored() {
    let (mut core, mut vps) = surface();
    place(&mut core, 0.0, 0.0, 100.0, 50.0);
    assert!(core.on_key_down(&mut vps, &key("a")).is_empty());
}

// =============================================================
// Commands
// =============================================================

#[test]
fn add_note_at_centers_default_note() {
    let (mut core, _) = surface();
    let actions = core.add_note_at(pt(400.0, 300.0));

    let Some(Action::NoteCreated(note)) = actions.first() else {
        panic!("expected NoteCreated first in {actions:?}");
    };
    assert_eq!((note.x, note.y), (300.0, 250.0));
    assert_eq!((note.width, note.height), (DEFAULT_NOTE_WIDTH, DEFAULT_NOTE_HEIGHT));
    assert_eq!(note.content, DEFAULT_NOTE_CONTENT);
    assert!(NOTE_PALETTE.contains(&note.color.as_str()));
    assert!(actions.contains(&Action::EditRequested { id: note.id }));
    assert_eq!(core.graph.editing(), Some(note.id));
}

#[test]
fn set_content_updates_note() {
    let (mut core, _) = surface();
    let id = place(&mut core, 0.0, 0.0, 100.0, 50.0);
    let actions = core.set_content(id, "groceries");
    assert_eq!(actions[0], Action::NoteUpdated { id, patch: NotePatch::content("groceries") });
    assert_eq!(core.graph.note(id).unwrap().content, "groceries");
}

#[test]
fn set_content_on_missing_note_is_noop() {
    let (mut core, _) = surface();
    assert!(core.set_content(uuid::Uuid::new_v4(), "x").is_empty());
}

#[test]
fn stop_editing_only_renders_when_editing() {
    let (mut core, _) = surface();
    assert!(core.stop_editing().is_empty());
    core.graph.add_note(NewNote::default());
    assert_eq!(core.stop_editing(), vec![Action::RenderNeeded]);
    assert_eq!(core.graph.editing(), None);
}

#[test]
fn delete_connection_command() {
    let (mut core, _) = surface();
    let (a, b) = two_notes(&mut core);
    core.graph.start_connection(a, 0.0, 0.0);
    let conn = core.graph.complete_connection(b).unwrap();

    assert_eq!(core.delete_connection(conn), vec![Action::ConnectionDeleted { id: conn }, Action::RenderNeeded]);
    assert!(core.delete_connection(conn).is_empty());
    assert_eq!(core.graph.note_count(), 2);
}

#[test]
fn clear_all_empties_graph_and_gesture() {
    let (mut core, mut vps) = surface();
    two_notes(&mut core);
    core.on_pointer_down(&mut vps, pt(100.0, 25.0), Button::Primary);

    core.clear_all(&mut vps);
    assert!(core.graph.is_empty());
    assert_eq!(core.input, InputState::Idle);
    assert!(core.graph.temp_connection().is_none());
}

#[test]
fn reset_view_restores_default_viewport() {
    let (mut core, mut vps) = surface();
    core.on_wheel(&mut vps, pt(10.0, 10.0), WheelDelta { dx: 0.0, dy: -1.0 });
    vps.set_offset(BOARD, pt(80.0, -20.0));

    core.reset_view(&mut vps);
    let vp = core.viewport(&vps);
    assert_eq!(vp.offset, pt(0.0, 0.0));
    assert_eq!(vp.scale, 1.0);
}

#[test]
fn scene_reflects_surface_state() {
    let (mut core, mut vps) = surface();
    let (a, _) = two_notes(&mut core);
    core.on_pointer_down(&mut vps, pt(100.0, 25.0), Button::Primary);
    core.on_pointer_move(&mut vps, pt(200.0, 100.0));

    let scene = core.scene(&vps);
    assert_eq!(scene.notes.len(), 2);
    assert_eq!(scene.notes[0].note.id, a);
    assert!(scene.temp_connection.is_some());
}
