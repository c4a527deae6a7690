//! List diffing for order views
//!
//! Identity is the order id; two versions are equal when status, update
//! timestamp and total match. Ops are meant to be applied in emission order:
//!
//! 1. removes, highest index first
//! 2. moves (`remove(from)` then `insert(to)`), only for orders outside the
//!    longest run that already has the right relative order
//! 3. inserts, lowest final index first
//! 4. updates, addressed by final index

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use shared::order::Order;
use thiserror::Error;

/// One step of a patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PatchOp {
    Remove { index: usize, order_id: String },
    Move { from: usize, to: usize, order_id: String },
    Insert { index: usize, order: Order },
    Update { index: usize, order: Order },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("Index {index} out of range for list of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Expected order {expected} at index {index}, found {found}")]
    IdMismatch {
        index: usize,
        expected: String,
        found: String,
    },
}

/// Whether two versions of an order render identically
pub fn same_content(a: &Order, b: &Order) -> bool {
    a.status() == b.status() && a.updated_at() == b.updated_at() && a.total() == b.total()
}

/// Ops turning `old` into `new`
pub fn diff(old: &[Order], new: &[Order]) -> Vec<PatchOp> {
    let new_ids: HashSet<&str> = new.iter().map(|o| o.order_id.as_str()).collect();
    let old_by_id: HashMap<&str, &Order> = old.iter().map(|o| (o.order_id.as_str(), o)).collect();
    let mut ops = Vec::new();

    // 1. removes
    for (index, order) in old.iter().enumerate().rev() {
        if !new_ids.contains(order.order_id.as_str()) {
            ops.push(PatchOp::Remove {
                index,
                order_id: order.order_id.clone(),
            });
        }
    }
    let mut current: Vec<&str> = old
        .iter()
        .map(|o| o.order_id.as_str())
        .filter(|id| new_ids.contains(id))
        .collect();

    // 2. moves
    let target: Vec<&str> = new
        .iter()
        .map(|o| o.order_id.as_str())
        .filter(|id| old_by_id.contains_key(id))
        .collect();
    let positions: HashMap<&str, usize> = current.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let sequence: Vec<usize> = target.iter().map(|id| positions[id]).collect();
    let stable = longest_increasing(&sequence);

    for (k, id) in target.iter().enumerate() {
        if stable[k] {
            continue;
        }
        let from = index_of(&current, id);
        let to = if k == 0 {
            0
        } else {
            let pred = index_of(&current, target[k - 1]);
            if from > pred { pred + 1 } else { pred }
        };
        if from == to {
            continue;
        }
        let moved = current.remove(from);
        current.insert(to, moved);
        ops.push(PatchOp::Move {
            from,
            to,
            order_id: (*id).to_string(),
        });
    }

    // 3. inserts
    for (index, order) in new.iter().enumerate() {
        if !old_by_id.contains_key(order.order_id.as_str()) {
            ops.push(PatchOp::Insert {
                index,
                order: order.clone(),
            });
        }
    }

    // 4. updates
    for (index, order) in new.iter().enumerate() {
        if let Some(prev) = old_by_id.get(order.order_id.as_str())
            && !same_content(prev, order)
        {
            ops.push(PatchOp::Update {
                index,
                order: order.clone(),
            });
        }
    }

    ops
}

/// Apply ops in order; the list is left partially patched on error
pub fn apply_patch(list: &mut Vec<Order>, ops: &[PatchOp]) -> Result<(), PatchError> {
    for op in ops {
        match op {
            PatchOp::Remove { index, order_id } => {
                check_id(list, *index, order_id)?;
                list.remove(*index);
            }
            PatchOp::Move { from, to, order_id } => {
                check_id(list, *from, order_id)?;
                let order = list.remove(*from);
                if *to > list.len() {
                    return Err(PatchError::IndexOutOfRange {
                        index: *to,
                        len: list.len(),
                    });
                }
                list.insert(*to, order);
            }
            PatchOp::Insert { index, order } => {
                if *index > list.len() {
                    return Err(PatchError::IndexOutOfRange {
                        index: *index,
                        len: list.len(),
                    });
                }
                list.insert(*index, order.clone());
            }
            PatchOp::Update { index, order } => {
                check_id(list, *index, &order.order_id)?;
                list[*index] = order.clone();
            }
        }
    }
    Ok(())
}

fn check_id(list: &[Order], index: usize, expected: &str) -> Result<(), PatchError> {
    let found = list.get(index).ok_or(PatchError::IndexOutOfRange {
        index,
        len: list.len(),
    })?;
    if found.order_id != expected {
        return Err(PatchError::IdMismatch {
            index,
            expected: expected.to_string(),
            found: found.order_id.clone(),
        });
    }
    Ok(())
}

fn index_of(list: &[&str], id: &str) -> usize {
    // every id in `target` is in `current`
    list.iter().position(|x| *x == id).unwrap_or(0)
}

/// Marks one longest strictly increasing subsequence of `seq`
fn longest_increasing(seq: &[usize]) -> Vec<bool> {
    // tails[len] = index in seq of the smallest tail of an increasing run of length len+1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];

    for (i, &value) in seq.iter().enumerate() {
        let slot = tails.partition_point(|&t| seq[t] < value);
        if slot > 0 {
            prev[i] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(i);
        } else {
            tails[slot] = i;
        }
    }

    let mut stable = vec![false; seq.len()];
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        stable[i] = true;
        cursor = prev[i];
    }
    stable
}
