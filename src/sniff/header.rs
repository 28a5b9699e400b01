//! Header row detection.

use super::cell::detect_cell_type;
use super::table::Table;
use crate::field_type::Type;

/// Decide whether the first row of `table` is a header.
///
/// Each column votes by comparing the first row's cell against the rest of
/// the column:
/// - if the remaining cells share a non-text shape, a first cell that does not
///   fit that shape votes for a header, one that fits votes against;
/// - if the remaining cells are text of one fixed length, a first cell of a
///   different length votes for a header, the same length votes against;
/// - otherwise the column abstains, as do empty first cells.
pub fn detect_header(table: &Table) -> bool {
    let Some((first, rest)) = table.rows.split_first() else {
        return false;
    };
    if rest.is_empty() {
        return false;
    }

    let votes: i64 = first
        .iter()
        .enumerate()
        .map(|(col, cell)| column_vote(cell, rest.iter().filter_map(|row| row.get(col))))
        .sum();

    tracing::trace!(votes, "header votes");
    votes > 0
}

fn column_vote<'a>(first: &str, rest: impl Iterator<Item = &'a String> + Clone) -> i64 {
    let first_type = detect_cell_type(first);
    if first_type == Type::NULL {
        return 0;
    }

    let column_type = rest
        .clone()
        .map(|cell| detect_cell_type(cell))
        .fold(Type::NULL, Type::merge);

    match column_type {
        Type::NULL => 0,
        Type::Text => {
            let mut lengths = rest.map(|cell| cell.chars().count());
            let Some(len) = lengths.next() else {
                return 0;
            };
            if !lengths.all(|l| l == len) {
                0
            } else if first.chars().count() == len {
                -1
            } else {
                1
            }
        }
        shape if first_type.fits(shape) => -1,
        _ => 1,
    }
}
