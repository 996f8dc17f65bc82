// Collection manager and editing, driven through the public editor types

use std::cell::RefCell;
use std::rc::Rc;

use ascii_anim_wasm::editor::{AppController, CollectionManager, KeyOutcome, MoveDirection};
use ascii_anim_wasm::events::ChangeBus;
use ascii_anim_wasm::models::{Direction, GridId, Key, SelectionState};
use ascii_anim_wasm::EditorConfig;

fn manager(count: usize) -> (CollectionManager, Rc<RefCell<Vec<GridId>>>) {
    let bus = ChangeBus::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    bus.subscribe(move |event| sink.borrow_mut().push(event.grid));
    let mut frames = CollectionManager::new(4, 3, 1.0, bus);
    frames.initialize(count);
    seen.borrow_mut().clear();
    (frames, seen)
}

#[test]
fn test_snapshot_preserves_order() {
    let (mut frames, _) = manager(3);
    for (id, mark) in frames.ids().into_iter().zip(["A", "B", "C"]) {
        frames.get_mut(id).unwrap().set_cell(0, 0, mark);
    }
    let firsts: Vec<String> = frames
        .snapshot_all()
        .iter()
        .map(|f| f.cells()[0].clone())
        .collect();
    assert_eq!(firsts, vec!["A", "B", "C"]);
}

#[test]
fn test_swap_is_its_own_inverse() {
    let (mut frames, _) = manager(3);
    let mut sel = SelectionState::new();
    let ids = frames.ids();
    frames.get_mut(ids[0]).unwrap().set_cell(0, 0, "1");
    frames.get_mut(ids[1]).unwrap().set_cell(0, 0, "2");
    let before = frames.snapshot_all();

    assert!(frames.swap_grid(ids[0], MoveDirection::Next, &mut sel));
    assert_ne!(frames.snapshot_all(), before);
    let moved = frames.ids()[1];
    assert!(frames.swap_grid(moved, MoveDirection::Previous, &mut sel));
    assert_eq!(frames.snapshot_all(), before);
}

#[test]
fn test_swap_past_either_end_is_a_no_op() {
    let (mut frames, seen) = manager(2);
    let mut sel = SelectionState::new();
    let ids = frames.ids();
    assert!(!frames.swap_grid(ids[0], MoveDirection::Previous, &mut sel));
    assert!(!frames.swap_grid(ids[1], MoveDirection::Next, &mut sel));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_last_grid_is_cleared_not_removed() {
    let (mut frames, _) = manager(1);
    let mut sel = SelectionState::new();
    let id = frames.ids()[0];
    frames.get_mut(id).unwrap().set_cell(1, 1, "#");

    assert!(frames.delete_grid(id, 1, &mut sel));
    assert_eq!(frames.len(), 1);
    assert!(frames.snapshot_all()[0].cells().iter().all(|c| c == " "));
}

#[test]
fn test_typing_edits_only_the_selected_cell() {
    let bus = ChangeBus::new();
    let seen = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&seen);
    bus.subscribe(move |_| *sink.borrow_mut() += 1);
    let mut frames = CollectionManager::new(4, 4, 1.0, bus);
    let id = frames.initialize(1)[0];
    *seen.borrow_mut() = 0;

    let mut sel = SelectionState::new();
    let grid = frames.get_mut(id).unwrap();
    assert!(grid.select(&mut sel, 2, 3));
    assert_eq!(grid.handle_key(&mut sel, Key::Char('x')), KeyOutcome::Edited);

    assert_eq!(*seen.borrow(), 1);
    let cells = grid.serialize();
    for y in 0..4 {
        for x in 0..4 {
            let expected = if (x, y) == (2, 3) { "x" } else { " " };
            assert_eq!(cells.cell(x, y), Some(expected));
        }
    }
}

#[test]
fn test_arrow_right_is_clamped_at_the_edge() {
    let (mut frames, _) = manager(1);
    let mut sel = SelectionState::new();
    let id = frames.ids()[0];
    let grid = frames.get_mut(id).unwrap();
    grid.select(&mut sel, 3, 0);

    assert_eq!(
        grid.handle_key(&mut sel, Key::Arrow(Direction::Right)),
        KeyOutcome::Ignored
    );
    assert_eq!(sel.position_in(id), Some((3, 0)));
}

#[test]
fn test_editor_preview_follows_edits() {
    let mut app = AppController::new(EditorConfig::default()).unwrap();
    app.start(0.0);
    let first = app.frames().ids()[0];

    assert!(app.click_cell(first, 0, 0));
    app.key_down(Key::Char('*'));

    assert_eq!(app.preview().frames()[0].cells()[0], "*");
    assert!(app.has_unsaved_changes());
}
