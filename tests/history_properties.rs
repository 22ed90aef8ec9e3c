use cutout_editor::{Document, History, Stroke, StrokeMode, StrokeRef};
use egui::pos2;
use std::sync::Arc;

fn stroke(mode: StrokeMode, from: (f32, f32), to: (f32, f32)) -> StrokeRef {
    Arc::new(Stroke::new(
        vec![pos2(from.0, from.1), pos2(to.0, to.1)],
        10.0,
        mode,
    ))
}

fn ids(doc: &Document) -> Vec<String> {
    doc.strokes().iter().map(|s| s.id().to_owned()).collect()
}

fn assert_flags_match_stacks(doc: &Document) {
    assert_eq!(doc.can_undo(), !doc.history().past().is_empty());
    assert_eq!(doc.can_redo(), !doc.history().future().is_empty());
}

#[test]
fn test_n_undos_and_redos_walk_the_whole_chain() {
    let mut doc = Document::new();
    let mut states = vec![ids(&doc)];

    for i in 0..5 {
        let mode = if i % 2 == 0 { StrokeMode::Paint } else { StrokeMode::Erase };
        doc.commit_stroke(stroke(mode, (i as f32, 0.0), (i as f32 + 1.0, 1.0)));
        states.push(ids(&doc));
        assert_flags_match_stacks(&doc);
    }

    for expected in states.iter().rev().skip(1) {
        assert!(doc.undo());
        assert_eq!(&ids(&doc), expected);
        assert_flags_match_stacks(&doc);
    }
    assert!(doc.is_empty());
    assert!(!doc.undo());

    for expected in states.iter().skip(1) {
        assert!(doc.redo());
        assert_eq!(&ids(&doc), expected);
        assert_flags_match_stacks(&doc);
    }
    assert!(!doc.redo());
    assert_eq!(doc.len(), 5);
}

#[test]
fn test_undo_redo_are_inverses_from_any_state() {
    let mut doc = Document::new();
    for i in 0..4 {
        doc.commit_stroke(stroke(StrokeMode::Paint, (0.0, 0.0), (i as f32, 5.0)));
    }
    doc.undo();
    doc.undo();

    let before = ids(&doc);
    doc.undo();
    doc.redo();
    assert_eq!(ids(&doc), before);

    doc.redo();
    doc.undo();
    assert_eq!(ids(&doc), before);
}

#[test]
fn test_commit_after_undo_truncates_future() {
    let mut doc = Document::new();
    let a = stroke(StrokeMode::Paint, (0.0, 0.0), (10.0, 10.0));
    let b = stroke(StrokeMode::Erase, (5.0, 5.0), (15.0, 15.0));
    let c = stroke(StrokeMode::Paint, (20.0, 0.0), (0.0, 20.0));

    doc.commit_stroke(a.clone());
    doc.commit_stroke(b.clone());
    assert_eq!(doc.strokes(), &[a.clone(), b.clone()]);

    doc.undo();
    assert_eq!(doc.strokes(), &[a.clone()]);
    assert!(doc.can_redo());

    doc.commit_stroke(c.clone());
    assert_eq!(doc.strokes(), &[a, c]);
    assert!(doc.history().future().is_empty());
    assert!(!doc.can_redo());
    assert!(!doc.redo());
}

#[test]
fn test_commit_shares_strokes_instead_of_copying() {
    let mut doc = Document::new();
    let a = stroke(StrokeMode::Paint, (0.0, 0.0), (1.0, 1.0));
    doc.commit_stroke(a.clone());
    let before = doc.snapshot();

    doc.commit_stroke(stroke(StrokeMode::Paint, (1.0, 1.0), (2.0, 2.0)));

    assert!(Arc::ptr_eq(&before[0], &doc.strokes()[0]));
    assert_eq!(before.len(), 1);
}

#[test]
fn test_generic_history_with_plain_values() {
    let mut history: History<Vec<u32>> = History::default();
    history.commit(vec![1]);
    history.commit(vec![1, 2]);
    history.undo();
    history.commit(vec![1, 3]);

    assert_eq!(history.present(), &vec![1, 3]);
    assert_eq!(history.past().to_vec(), vec![Vec::<u32>::new(), vec![1]]);
    assert!(!history.can_redo());
}
