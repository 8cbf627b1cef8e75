use egui::Pos2;
use image_slicer::geometry::{LineKind, LineRules};
use image_slicer::{Command, History, ImageDimensions, SliceLines};

fn dims() -> ImageDimensions {
    ImageDimensions::new(400.0, 300.0)
}

fn add_horizontal(y: f32) -> Command {
    Command::AddLine {
        kind: LineKind::Horizontal,
        point: Pos2::new(50.0, y),
        rules: LineRules::default(),
    }
}

#[test]
fn test_undo_then_redo_restores_present() {
    let mut history = History::new(SliceLines::new());
    assert!(history.execute(&add_horizontal(100.0), dims()));
    assert!(history.execute(&add_horizontal(200.0), dims()));
    let after = history.present().clone();

    assert!(history.undo());
    assert_eq!(history.present().horizontal, vec![100.0]);
    assert!(history.redo());
    assert_eq!(history.present(), &after);
}

#[test]
fn test_new_commit_discards_redo() {
    let mut history = History::new(SliceLines::new());
    history.execute(&add_horizontal(100.0), dims());
    history.execute(&add_horizontal(200.0), dims());
    history.undo();
    assert!(history.can_redo());

    history.execute(&add_horizontal(150.0), dims());
    assert!(!history.can_redo());
    assert_eq!(history.present().horizontal, vec![100.0, 150.0]);
    assert!(!history.redo());
}

#[test]
fn test_rejected_command_records_nothing() {
    let mut history = History::new(SliceLines::new());
    history.execute(&add_horizontal(100.0), dims());

    // Too close to the existing line and too close to the edge.
    assert!(!history.execute(&add_horizontal(105.0), dims()));
    assert!(!history.execute(&add_horizontal(3.0), dims()));
    assert_eq!(history.past_len(), 1);
}

#[test]
fn test_undo_on_empty_history_is_noop() {
    let mut history = History::new(SliceLines::new());
    assert!(!history.undo());
    assert!(!history.redo());
    assert!(history.present().is_empty());
}

#[test]
fn test_limit_evicts_oldest_steps() {
    let mut history = History::with_limit(SliceLines::new(), Some(2));
    for y in [50.0, 100.0, 150.0, 200.0] {
        history.execute(&add_horizontal(y), dims());
    }
    assert_eq!(history.past_len(), 2);

    while history.undo() {}
    assert_eq!(history.present().horizontal, vec![50.0, 100.0]);
}

#[test]
fn test_clear_is_one_undoable_step() {
    let mut history = History::new(SliceLines::new());
    history.execute(&add_horizontal(100.0), dims());
    history.execute(&add_horizontal(200.0), dims());

    assert!(history.execute(&Command::Clear, dims()));
    assert!(history.present().is_empty());
    assert!(!history.execute(&Command::Clear, dims()));

    history.undo();
    assert_eq!(history.present().horizontal, vec![100.0, 200.0]);
}
