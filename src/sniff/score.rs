//! Scoring of candidate dialects.
//!
//! Each candidate parses the sample into a [`Table`]. The score rewards
//! tables whose rows agree on a field count and whose columns hold values of a
//! consistent shape, then adjusts for how plausible the delimiter and quote
//! character are.

use super::cell::detect_cell_type;
use super::table::{Table, parse_table};
use crate::field_type::Type;
use crate::metadata::{Dialect, Quote};

/// Scores within this ratio of the best one are ranked by preference instead.
const NEAR_TIE_RATIO: f64 = 0.90;

/// Quote characters per 1000 bytes above which quoting is considered in use.
const QUOTE_DENSITY_THRESHOLD: usize = 5;

/// Quote character counts, computed once per sample.
#[derive(Debug, Clone, Copy)]
pub struct QuoteCounts {
    double: usize,
    single: usize,
    data_len: usize,
}

impl QuoteCounts {
    pub fn new(data: &[u8]) -> Self {
        Self {
            double: bytecount::count(data, b'"'),
            single: bytecount::count(data, b'\''),
            data_len: data.len(),
        }
    }

    fn per_mille(&self, count: usize) -> usize {
        if self.data_len == 0 {
            0
        } else {
            count * 1000 / self.data_len
        }
    }

    /// Multiplier for `quote` given how often quote characters appear.
    ///
    /// Single quotes only earn a boost when they are frequent and double
    /// quotes are not, since apostrophes in free text are common.
    fn evidence(&self, quote: Quote) -> f64 {
        let double_quoted = self.per_mille(self.double) >= QUOTE_DENSITY_THRESHOLD;
        let single_quoted = self.per_mille(self.single) >= QUOTE_DENSITY_THRESHOLD * 2;

        match quote {
            Quote::Some(b'"') if double_quoted => 1.03,
            Quote::Some(b'\'') if single_quoted && !double_quoted => 1.05,
            Quote::Some(b'\'') if double_quoted => 0.95,
            Quote::None if double_quoted || single_quoted => 0.90,
            _ => 1.0,
        }
    }
}

/// Score of one candidate dialect.
#[derive(Debug, Clone)]
pub struct DialectScore {
    pub dialect: Dialect,
    /// Combined score (higher is better).
    pub gamma: f64,
    /// Modal field count of the parsed sample.
    pub num_fields: usize,
    pub num_rows: usize,
}

/// Parse the sample with `dialect` and score the resulting table.
///
/// Returns the table too, so the winner's table can be reused for header
/// detection.
pub fn score_dialect(
    data: &[u8],
    dialect: &Dialect,
    max_rows: usize,
    quote_counts: &QuoteCounts,
) -> (DialectScore, Table) {
    let table = parse_table(data, dialect, max_rows);

    let gamma = if table.is_empty() {
        0.0
    } else {
        table_score(&table)
            * delimiter_weight(dialect.delimiter)
            * quote_counts.evidence(dialect.quote)
    };

    let score = DialectScore {
        dialect: *dialect,
        gamma,
        num_fields: table.modal_field_count(),
        num_rows: table.num_rows(),
    };
    tracing::trace!(
        dialect = %score.dialect,
        gamma = score.gamma,
        fields = score.num_fields,
        "scored candidate"
    );

    (score, table)
}

/// Score every candidate. Tables come back in candidate order so the
/// winner's table can be looked up by index.
pub fn score_all(
    data: &[u8],
    dialects: &[Dialect],
    max_rows: usize,
) -> (Vec<DialectScore>, Vec<Table>) {
    let quote_counts = QuoteCounts::new(data);
    dialects
        .iter()
        .map(|d| score_dialect(data, d, max_rows, &quote_counts))
        .unzip()
}

/// Structure score of a parsed table, in `[0, 1]` before adjustments.
fn table_score(table: &Table) -> f64 {
    let field_count = table.modal_field_count();
    let field_bonus = if field_count >= 2 {
        field_count.min(10) as f64 / 10.0
    } else {
        0.0
    };
    let single_field_penalty = if field_count <= 1 { 0.5 } else { 1.0 };

    let raw = 0.6 * uniformity(table) + 0.3 * type_consistency(table) + 0.1 * field_bonus;
    raw * single_field_penalty
}

/// How much the rows agree on one field count.
///
/// Geometric mean of the share of rows with the modal count and
/// `1 / (1 + 2 * cv)`, where `cv` is the coefficient of variation of the
/// field counts.
pub fn uniformity(table: &Table) -> f64 {
    let n = table.num_rows();
    if n == 0 {
        return 0.0;
    }

    let modal_share = table.modal_frequency() as f64 / n as f64;

    let mean = table.field_counts.iter().sum::<usize>() as f64 / n as f64;
    let variance = table
        .field_counts
        .iter()
        .map(|&fc| {
            let diff = fc as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / n as f64;
    let cv = variance.sqrt() / mean.max(1.0);
    let spread = 1.0 / 2.0f64.mul_add(cv, 1.0);

    (modal_share * spread).sqrt()
}

/// Average share of the dominant non-null type per column.
pub fn type_consistency(table: &Table) -> f64 {
    let num_cols = table.modal_field_count();
    if num_cols == 0 {
        return 0.0;
    }

    let mut counts = vec![[0usize; Type::COUNT]; num_cols];
    for row in &table.rows {
        for (col, cell) in row.iter().enumerate().take(num_cols) {
            counts[col][detect_cell_type(cell).as_index()] += 1;
        }
    }

    let total: f64 = counts
        .iter()
        .map(|col| {
            let non_null: usize = col
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != Type::NULL.as_index())
                .map(|(_, &c)| c)
                .sum();
            if non_null == 0 {
                return 0.5;
            }
            let dominant = col
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != Type::NULL.as_index())
                .map(|(_, &c)| c)
                .max()
                .unwrap_or(0);
            dominant as f64 / non_null as f64
        })
        .sum();

    total / num_cols as f64
}

/// Penalty for delimiters that are rare in practice.
const fn delimiter_weight(delimiter: u8) -> f64 {
    match delimiter {
        b',' | b';' | b'\t' => 1.0,
        b'|' => 0.98,
        b'^' | b'~' => 0.80,
        b' ' => 0.75,
        b'#' | b'&' => 0.60,
        _ => 0.70,
    }
}

/// Preference among delimiters when scores are close (higher wins).
const fn delimiter_priority(delimiter: u8) -> u8 {
    match delimiter {
        b',' => 10,
        b';' => 9,
        b'\t' => 8,
        b'|' => 7,
        b'^' | b'~' => 3,
        b' ' => 2,
        b'#' | b'&' => 1,
        _ => 0,
    }
}

/// Preference among quote characters when scores are close (higher wins).
const fn quote_priority(quote: Quote) -> u8 {
    match quote {
        Quote::Some(b'"') => 3,
        Quote::Some(b'\'') => 2,
        Quote::None => 1,
        Quote::Some(_) => 0,
    }
}

/// Pick the best scoring candidate.
///
/// Every candidate within [`NEAR_TIE_RATIO`] of the top score is in the
/// running; among those, multi-field tables beat single-field ones, then the
/// delimiter and quote preferences decide, then the raw score.
pub fn find_best(scores: &[DialectScore]) -> Option<usize> {
    let top = scores.iter().map(|s| s.gamma).fold(0.0f64, f64::max);
    if top <= 0.0 {
        return None;
    }

    scores
        .iter()
        .enumerate()
        .filter(|(_, s)| s.gamma >= top * NEAR_TIE_RATIO)
        .max_by(|(_, a), (_, b)| {
            (a.num_fields >= 2)
                .cmp(&(b.num_fields >= 2))
                .then_with(|| {
                    delimiter_priority(a.dialect.delimiter)
                        .cmp(&delimiter_priority(b.dialect.delimiter))
                })
                .then_with(|| quote_priority(a.dialect.quote).cmp(&quote_priority(b.dialect.quote)))
                .then_with(|| a.gamma.total_cmp(&b.gamma))
        })
        .map(|(i, _)| i)
}
