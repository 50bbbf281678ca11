//! Minimal-diff list updates
//!
//! Computes the row operations that turn one note list into another so a
//! list view can animate only what changed. Rows are identified by note id;
//! a row whose title, description or priority differ is reported as changed.
//!
//! Operations are positional and must be applied in order:
//! 1. removals, highest index first
//! 2. inserts and moves, walking the new list front to back
//! 3. content changes, at their final index
//!
//! Rows on a longest increasing subsequence of the old order stay put, which
//! keeps the number of moves minimal. Ids must be unique within each list.

use std::collections::{HashMap, HashSet};

use crate::models::Note;

/// One row operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOp {
    /// Remove the row at `index`
    Remove { index: usize },
    /// Insert `note` so it ends up at `index`
    Insert { index: usize, note: Note },
    /// Take the row at `from` out and reinsert it at `to`
    Move { from: usize, to: usize },
    /// Replace the contents of the row at `index`
    Change { index: usize, note: Note },
}

/// Operations turning `old` into `new`
pub fn diff(old: &[Note], new: &[Note]) -> Vec<ListOp> {
    let new_index: HashMap<i64, usize> = new.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
    let old_by_id: HashMap<i64, &Note> = old.iter().map(|n| (n.id, n)).collect();

    let mut ops = Vec::new();

    for (index, note) in old.iter().enumerate().rev() {
        if !new_index.contains_key(&note.id) {
            ops.push(ListOp::Remove { index });
        }
    }

    let mut working: Vec<i64> = old
        .iter()
        .filter(|n| new_index.contains_key(&n.id))
        .map(|n| n.id)
        .collect();

    let targets: Vec<usize> = working.iter().map(|id| new_index[id]).collect();
    let stable: HashSet<i64> = longest_increasing_subsequence(&targets)
        .into_iter()
        .map(|i| working[i])
        .collect();

    // Every row not on the stable subsequence is placed right after its
    // predecessor in the new order, which is already in place by then.
    for (i, note) in new.iter().enumerate() {
        if stable.contains(&note.id) {
            continue;
        }

        let from = if old_by_id.contains_key(&note.id) {
            match working.iter().position(|&id| id == note.id) {
                Some(from) => {
                    working.remove(from);
                    Some(from)
                }
                None => continue,
            }
        } else {
            None
        };

        let to = i
            .checked_sub(1)
            .and_then(|prev| {
                let prev_id = new[prev].id;
                working.iter().position(|&id| id == prev_id)
            })
            .map_or(0, |p| p + 1);
        working.insert(to, note.id);

        match from {
            Some(from) if from != to => ops.push(ListOp::Move { from, to }),
            Some(_) => {}
            None => ops.push(ListOp::Insert {
                index: to,
                note: note.clone(),
            }),
        }
    }

    for (index, note) in new.iter().enumerate() {
        if let Some(previous) = old_by_id.get(&note.id) {
            if !previous.same_content(note) {
                ops.push(ListOp::Change {
                    index,
                    note: note.clone(),
                });
            }
        }
    }

    ops
}

/// Apply operations produced by [`diff`] to the list they were computed from
pub fn apply(list: &mut Vec<Note>, ops: &[ListOp]) {
    for op in ops {
        match op {
            ListOp::Remove { index } => {
                list.remove(*index);
            }
            ListOp::Insert { index, note } => list.insert(*index, note.clone()),
            ListOp::Move { from, to } => {
                let note = list.remove(*from);
                list.insert(*to, note);
            }
            ListOp::Change { index, note } => list[*index] = note.clone(),
        }
    }
}

/// Indices into `seq` of one longest strictly increasing subsequence
fn longest_increasing_subsequence(seq: &[usize]) -> Vec<usize> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];

    for (i, &value) in seq.iter().enumerate() {
        let pos = tails.partition_point(|&t| seq[t] < value);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }

    let mut out = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        out.push(i);
        cursor = prev[i];
    }
    out.reverse();
    out
}
