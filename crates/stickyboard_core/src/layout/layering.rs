//! Z-order policy derived from note priority and recency.
//!
//! # Responsibility
//! - Map each priority to a disjoint band of z-index values.
//! - Order notes of equal priority by most recent interaction.
//!
//! # Invariants
//! - For notes `a`, `b` with `a.priority < b.priority`, `a.z_index > b.z_index`.
//! - Every assigned z-index lies in `band_base(p) + 1 ..= band_base(p) + BAND_CAPACITY`.
//! - Values are derived from the note collection itself; nothing is cached.
//!
//! Design limit: fewer than 1000 live notes per priority. Past that, offsets
//! saturate at `BAND_CAPACITY` and siblings may tie.

use crate::model::note::{Note, NoteId, Priority};
use log::warn;

/// Width of one priority band.
pub const BAND_WIDTH: i64 = 1000;
/// Highest offset usable inside a band.
pub const BAND_CAPACITY: i64 = BAND_WIDTH - 1;

/// First z-index value of the band reserved for `priority`.
///
/// Priority 1 maps to 5000, priority 5 to 1000.
pub fn band_base(priority: Priority) -> i64 {
    (6 - i64::from(priority.get())) * BAND_WIDTH
}

/// Position of `z_index` inside its band.
pub fn band_offset(z_index: i64) -> i64 {
    z_index.rem_euclid(BAND_WIDTH)
}

/// Next free z-index on top of the `priority` band, ignoring `exclude`.
///
/// Returns `None` when the band has no offset left above its current top.
pub fn next_band_z(notes: &[Note], priority: Priority, exclude: Option<NoteId>) -> Option<i64> {
    let top = notes
        .iter()
        .filter(|note| note.priority == priority && Some(note.id) != exclude)
        .map(|note| band_offset(note.z_index))
        .max()
        .unwrap_or(0);
    let offset = top + 1;
    (offset <= BAND_CAPACITY).then(|| band_base(priority) + offset)
}

/// Z-index for a note about to be created with `priority`.
///
/// On a compact band this equals `base + sibling_count + 1`. A full band is
/// compacted first.
pub fn creation_z_index(notes: &mut [Note], priority: Priority) -> i64 {
    if let Some(z_index) = next_band_z(notes, priority, None) {
        return z_index;
    }
    compact_band(notes, priority);
    next_band_z(notes, priority, None).unwrap_or_else(|| {
        warn!(
            "event=band_saturated module=layering status=error priority={}",
            priority
        );
        band_base(priority) + BAND_CAPACITY
    })
}

/// Raises one note above every other note of its priority.
///
/// Returns whether the note's z-index changed. Unknown ids are ignored.
pub fn bring_to_front(notes: &mut [Note], id: NoteId) -> bool {
    let Some(index) = notes.iter().position(|note| note.id == id) else {
        return false;
    };
    let priority = notes[index].priority;

    let z_index = match next_band_z(notes, priority, Some(id)) {
        Some(z_index) => z_index,
        None => {
            compact_band(notes, priority);
            next_band_z(notes, priority, Some(id))
                .unwrap_or(band_base(priority) + BAND_CAPACITY)
        }
    };

    let note = &mut notes[index];
    if note.z_index == z_index {
        return false;
    }
    note.z_index = z_index;
    true
}

/// Renumbers one band to sequential offsets, keeping its current order.
pub fn compact_band(notes: &mut [Note], priority: Priority) {
    let mut members: Vec<usize> = notes
        .iter()
        .enumerate()
        .filter(|(_, note)| note.priority == priority)
        .map(|(index, _)| index)
        .collect();
    members.sort_by_key(|&index| band_offset(notes[index].z_index));
    assign_sequential(notes, &members, priority);
}

/// Re-derives every z-index after a priority change.
///
/// Within each priority group, notes keep their current relative order;
/// `promoted` (the note whose priority just changed) is placed on top of
/// its new group.
pub fn recompute_all(notes: &mut [Note], promoted: Option<NoteId>) {
    for value in 1..=5 {
        let Some(priority) = Priority::new(value) else {
            continue;
        };
        let mut members: Vec<usize> = notes
            .iter()
            .enumerate()
            .filter(|(_, note)| note.priority == priority)
            .map(|(index, _)| index)
            .collect();
        // Stable sort: insertion order breaks z-index ties.
        members.sort_by_key(|&index| {
            let note = &notes[index];
            (Some(note.id) == promoted, note.z_index)
        });
        assign_sequential(notes, &members, priority);
    }
}

/// Z-index that renders above every note in the collection.
///
/// Used for the note under an active drag gesture.
pub fn front_most_z(notes: &[Note]) -> i64 {
    notes
        .iter()
        .map(|note| note.z_index)
        .max()
        .map_or(band_base(Priority::HIGHEST) + BAND_WIDTH, |top| top + 1)
}

/// Checks that every note sits inside its own band.
pub fn is_consistent(notes: &[Note]) -> bool {
    notes.iter().all(|note| {
        let base = band_base(note.priority);
        note.z_index > base && note.z_index <= base + BAND_CAPACITY
    })
}

fn assign_sequential(notes: &mut [Note], members: &[usize], priority: Priority) {
    let base = band_base(priority);
    if members.len() as i64 > BAND_CAPACITY {
        warn!(
            "event=band_saturated module=layering status=error priority={} members={}",
            priority,
            members.len()
        );
    }
    for (position, &index) in members.iter().enumerate() {
        let offset = (position as i64 + 1).min(BAND_CAPACITY);
        notes[index].z_index = base + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        band_base, bring_to_front, compact_band, creation_z_index, front_most_z, is_consistent,
        recompute_all, BAND_CAPACITY,
    };
    use crate::model::note::{Note, Priority};

    fn note_with(priority: u8, z_index: i64) -> Note {
        let mut note = Note::new(0.0, 0.0, 200.0, 200.0);
        note.priority = Priority::new(priority).unwrap();
        note.z_index = z_index;
        note
    }

    #[test]
    fn band_base_maps_priority_to_disjoint_bands() {
        assert_eq!(band_base(Priority::HIGHEST), 5000);
        assert_eq!(band_base(Priority::DEFAULT), 3000);
        assert_eq!(band_base(Priority::LOWEST), 1000);
    }

    #[test]
    fn creation_fills_band_from_one() {
        let mut notes = Vec::new();
        assert_eq!(creation_z_index(&mut notes, Priority::DEFAULT), 3001);
        notes.push(note_with(3, 3001));
        assert_eq!(creation_z_index(&mut notes, Priority::DEFAULT), 3002);
        assert_eq!(creation_z_index(&mut notes, Priority::HIGHEST), 5001);
    }

    #[test]
    fn creation_after_gap_does_not_reuse_top_value() {
        let mut notes = vec![note_with(3, 3002)];
        assert_eq!(creation_z_index(&mut notes, Priority::DEFAULT), 3003);
    }

    #[test]
    fn full_band_is_compacted_before_assignment() {
        let mut notes = vec![note_with(3, 3000 + BAND_CAPACITY), note_with(3, 3010)];
        let z_index = creation_z_index(&mut notes, Priority::DEFAULT);
        assert_eq!(notes[1].z_index, 3001);
        assert_eq!(notes[0].z_index, 3002);
        assert_eq!(z_index, 3003);
    }

    #[test]
    fn bring_to_front_is_stable_for_top_note() {
        let mut notes = vec![note_with(3, 3001), note_with(3, 3002)];
        let top = notes[1].id;
        assert!(!bring_to_front(&mut notes, top));

        let bottom = notes[0].id;
        assert!(bring_to_front(&mut notes, bottom));
        assert_eq!(notes[0].z_index, 3003);
    }

    #[test]
    fn recompute_places_promoted_note_on_top_of_new_group() {
        let mut notes = vec![note_with(1, 5001), note_with(1, 5002), note_with(1, 3001)];
        let promoted = notes[2].id;
        recompute_all(&mut notes, Some(promoted));
        assert_eq!(notes[0].z_index, 5001);
        assert_eq!(notes[1].z_index, 5002);
        assert_eq!(notes[2].z_index, 5003);
        assert!(is_consistent(&notes));
    }

    #[test]
    fn compact_band_keeps_relative_order() {
        let mut notes = vec![note_with(2, 4500), note_with(2, 4020), note_with(4, 2007)];
        compact_band(&mut notes, Priority::new(2).unwrap());
        assert_eq!(notes[0].z_index, 4002);
        assert_eq!(notes[1].z_index, 4001);
        assert_eq!(notes[2].z_index, 2007);
    }

    #[test]
    fn front_most_z_exceeds_every_note() {
        assert_eq!(front_most_z(&[]), 6000);
        let notes = vec![note_with(5, 1001), note_with(1, 5004)];
        assert_eq!(front_most_z(&notes), 5005);
    }
}
