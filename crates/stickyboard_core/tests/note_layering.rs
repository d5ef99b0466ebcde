use stickyboard_core::layout::layering::{band_base, is_consistent};
use stickyboard_core::{Note, NoteColor, NotePatch, NoteStore, Point, Priority, Size, Viewport};

fn store() -> NoteStore {
    NoteStore::new(Viewport::new(1280.0, 800.0))
}

fn priority(value: u8) -> Priority {
    Priority::new(value).unwrap()
}

fn z_of(store: &NoteStore, note: &Note) -> i64 {
    store.get(note.id).unwrap().z_index
}

fn assert_priority_order(store: &NoteStore) {
    for a in store.notes() {
        for b in store.notes() {
            if a.priority < b.priority {
                assert!(
                    a.z_index > b.z_index,
                    "priority {} note ({}) must render above priority {} note ({})",
                    a.priority,
                    a.z_index,
                    b.priority,
                    b.z_index
                );
            }
        }
    }
    assert!(is_consistent(store.notes()));
}

#[test]
fn first_default_note_gets_z_index_3001() {
    let mut store = store();
    let note = store.create(Some(Point::new(10.0, 10.0)), None);
    assert_eq!(note.priority, Priority::DEFAULT);
    assert_eq!(note.color, NoteColor::Yellow);
    assert!(note.content.is_empty());
    assert_eq!(note.z_index, 3001);
}

#[test]
fn second_default_note_stacks_above_first() {
    let mut store = store();
    let first = store.create(None, None);
    let second = store.create(None, None);
    assert_eq!(first.z_index, 3001);
    assert_eq!(second.z_index, 3002);
}

#[test]
fn raising_priority_moves_note_into_top_band_and_keeps_sibling_order() {
    let mut store = store();
    let top_a = store.create(None, None);
    let top_b = store.create(None, None);
    store.update(top_a.id, NotePatch::priority(Priority::HIGHEST));
    store.update(top_b.id, NotePatch::priority(Priority::HIGHEST));
    let before_a = z_of(&store, &top_a);
    let before_b = z_of(&store, &top_b);
    assert!(before_a < before_b);

    let moved = store.create(None, None);
    assert!(store.update(moved.id, NotePatch::priority(Priority::HIGHEST)));

    let moved_z = z_of(&store, &moved);
    assert!((5001..=5999).contains(&moved_z));
    assert!(z_of(&store, &top_a) < z_of(&store, &top_b));
    assert_priority_order(&store);
}

#[test]
fn lowering_priority_drops_note_below_every_higher_priority_note() {
    let mut store = store();
    let notes: Vec<Note> = (0..4).map(|_| store.create(None, None)).collect();
    store.update(notes[0].id, NotePatch::priority(priority(5)));
    store.update(notes[1].id, NotePatch::priority(priority(2)));

    assert!(z_of(&store, &notes[0]) < band_base(priority(4)));
    assert!(z_of(&store, &notes[1]) > band_base(priority(2)));
    assert_priority_order(&store);
}

#[test]
fn moving_a_note_brings_it_to_front_of_its_priority() {
    let mut store = store();
    let older = store.create(Some(Point::new(0.0, 0.0)), None);
    let newer = store.create(Some(Point::new(50.0, 50.0)), None);
    assert!(z_of(&store, &newer) > z_of(&store, &older));

    assert!(store.update(older.id, NotePatch::position(300.0, 300.0)));
    assert!(z_of(&store, &older) > z_of(&store, &newer));

    assert!(store.update(
        newer.id,
        NotePatch::geometry(50.0, 50.0, 260.0, 240.0)
    ));
    assert!(z_of(&store, &newer) > z_of(&store, &older));
}

#[test]
fn recency_never_crosses_priority_bands() {
    let mut store = store();
    let high = store.create(None, None);
    store.update(high.id, NotePatch::priority(priority(2)));
    let low = store.create(None, None);

    for step in 0..20 {
        let offset = f64::from(step) * 10.0;
        store.update(low.id, NotePatch::position(offset, offset));
    }
    assert!(z_of(&store, &high) > z_of(&store, &low));
    assert_priority_order(&store);
}

#[test]
fn empty_update_is_idempotent() {
    let mut store = store();
    let note = store.create(Some(Point::new(40.0, 60.0)), Some(Size::new(320.0, 240.0)));
    store.create(None, None);
    let before = store.get(note.id).unwrap().clone();

    assert!(!store.update(note.id, NotePatch::default()));
    assert_eq!(store.get(note.id).unwrap(), &before);
}

#[test]
fn updates_never_shrink_below_minimum_size() {
    let mut store = store();
    let note = store.create(None, None);
    let patches = [
        NotePatch::geometry(10.0, 10.0, 0.0, 0.0),
        NotePatch {
            width: Some(-400.0),
            ..NotePatch::default()
        },
        NotePatch {
            height: Some(199.9),
            ..NotePatch::default()
        },
        NotePatch::geometry(5000.0, -5000.0, 150.0, 3000.0),
    ];

    for patch in patches {
        store.update(note.id, patch);
        let current = store.get(note.id).unwrap();
        assert!(current.width >= 200.0);
        assert!(current.height >= 200.0);
    }
}

#[test]
fn update_reapplies_drag_clamp() {
    let mut store = store();
    let note = store.create(None, None);
    store.update(note.id, NotePatch::position(-10_000.0, 10_000.0));
    let current = store.get(note.id).unwrap();
    assert_eq!(current.x, -140.0);
    assert_eq!(current.y, 740.0);
}

#[test]
fn unknown_ids_are_ignored() {
    let mut store = store();
    let note = store.create(None, None);
    assert!(store.delete(note.id));
    assert!(!store.delete(note.id));
    assert!(!store.update(note.id, NotePatch::content("late edit")));
    assert!(!store.bring_to_front(note.id));
    assert!(store.is_empty());
    assert_eq!(store.take_pending_deletions(), vec![note.id]);
}

#[test]
fn creation_after_deletion_stays_above_remaining_siblings() {
    let mut store = store();
    let first = store.create(None, None);
    let second = store.create(None, None);
    store.delete(first.id);

    let third = store.create(None, None);
    assert!(third.z_index > z_of(&store, &second));
    assert_priority_order(&store);
}

#[test]
fn layering_holds_after_mixed_operations() {
    let mut store = store();
    let mut ids = Vec::new();
    for index in 0..12u8 {
        let note = store.create(None, None);
        store.update(note.id, NotePatch::priority(priority(index % 5 + 1)));
        ids.push(note.id);
    }
    for (index, id) in ids.iter().enumerate() {
        let offset = index as f64 * 7.0;
        store.update(*id, NotePatch::position(offset, offset));
        if index % 4 == 0 {
            store.delete(*id);
        }
        assert_priority_order(&store);
    }
}
