//! Sample parsed into rows for scoring.

use foldhash::{HashMap, HashMapExt};

use crate::metadata::Dialect;

/// A sample parsed with one candidate dialect.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// The rows of the table (each row is a vector of field values).
    pub rows: Vec<Vec<String>>,
    /// Number of fields in each row.
    pub field_counts: Vec<usize>,
    modal_field_count: usize,
    modal_frequency: usize,
}

impl Table {
    /// Build a table from already split rows.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let field_counts = rows.iter().map(Vec::len).collect::<Vec<_>>();
        let (modal_field_count, modal_frequency) = mode(&field_counts);
        Self {
            rows,
            field_counts,
            modal_field_count,
            modal_frequency,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// The most common field count.
    #[inline]
    pub fn modal_field_count(&self) -> usize {
        self.modal_field_count
    }

    /// How many rows have the modal field count.
    #[inline]
    pub fn modal_frequency(&self) -> usize {
        self.modal_frequency
    }

    /// The same table without its first `n` rows.
    pub fn without_leading(mut self, n: usize) -> Self {
        let n = n.min(self.rows.len());
        Self::from_rows(self.rows.split_off(n))
    }

    /// Returns true if every non-empty field after a delimiter starts with a
    /// space, and there is at least one such field.
    pub fn has_initial_space(&self) -> bool {
        let mut fields = self
            .rows
            .iter()
            .flat_map(|row| row.iter().skip(1))
            .filter(|field| !field.is_empty())
            .peekable();
        fields.peek().is_some() && fields.all(|field| field.starts_with(' '))
    }
}

/// Most common value and its frequency. Ties go to the larger value so the
/// result does not depend on hash iteration order.
fn mode(field_counts: &[usize]) -> (usize, usize) {
    let mut counts: HashMap<usize, usize> = HashMap::with_capacity(field_counts.len());
    for &fc in field_counts {
        *counts.entry(fc).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(fc_a, n_a), (fc_b, n_b)| n_a.cmp(n_b).then_with(|| fc_a.cmp(fc_b)))
        .unwrap_or((0, 0))
}

/// Parse `data` with `dialect`, stopping at `max_rows` (0 = unlimited) or at
/// the first malformed record.
pub fn parse_table(data: &[u8], dialect: &Dialect, max_rows: usize) -> Table {
    let mut reader = dialect.reader_builder().from_reader(data);
    let limit = if max_rows == 0 { usize::MAX } else { max_rows };

    let mut rows = Vec::new();
    let mut record = csv::ByteRecord::new();
    while rows.len() < limit {
        match reader.read_byte_record(&mut record) {
            Ok(true) => rows.push(
                record
                    .iter()
                    .enumerate()
                    .map(|(i, field)| {
                        let field = String::from_utf8_lossy(field);
                        if dialect.skip_initial_space && i > 0 {
                            field.trim_start_matches(' ').to_string()
                        } else {
                            field.into_owned()
                        }
                    })
                    .collect(),
            ),
            Ok(false) | Err(_) => break,
        }
    }

    Table::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{LineTerminator, Quote};

    #[test]
    fn test_parse_simple_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6\n";
        let table = parse_table(data, &Dialect::default(), 0);
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.field_counts, vec![3, 3, 3]);
        assert_eq!(table.rows[0], vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_quoted_csv() {
        let data = b"\"a,b\",c,d\n1,2,3\n";
        let table = parse_table(data, &Dialect::default(), 0);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.rows[0], vec!["a,b", "c", "d"]);
    }

    #[test]
    fn test_parse_cr_terminated() {
        let data = b"a;b\r1;2\r";
        let dialect = Dialect::new(b';', Quote::None, LineTerminator::CR);
        let table = parse_table(data, &dialect, 0);
        assert_eq!(table.field_counts, vec![2, 2]);
    }

    #[test]
    fn test_initial_space() {
        let data = b"name, age, city\nAlice, 30, Paris\nBob, 25,\n";
        let table = parse_table(data, &Dialect::default(), 0);
        assert!(table.has_initial_space());
        assert_eq!(table.rows[1][1], " 30");

        let dialect = Dialect::default().with_skip_initial_space(true);
        let table = parse_table(data, &dialect, 0);
        assert_eq!(table.rows[1], vec!["Alice", "30", "Paris"]);
        assert!(!table.has_initial_space());

        assert!(!parse_table(b"a,b\n1, 2\n", &Dialect::default(), 0).has_initial_space());
        assert!(!parse_table(b"a\nb\n", &Dialect::default(), 0).has_initial_space());
    }

    #[test]
    fn test_without_leading() {
        let data = b"junk\na,b\n1,2\n";
        let table = parse_table(data, &Dialect::default(), 0).without_leading(1);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.modal_field_count(), 2);
        assert!(table.without_leading(10).is_empty());
    }

    #[test]
    fn test_max_rows() {
        let data = b"a\nb\nc\n";
        assert_eq!(parse_table(data, &Dialect::default(), 2).num_rows(), 2);
    }

    #[test]
    fn test_modal_field_count() {
        let table = Table::from_rows(vec![
            vec!["a".into(); 3],
            vec!["a".into(); 3],
            vec!["a".into(); 4],
            vec!["a".into(); 4],
        ]);
        assert_eq!(table.modal_field_count(), 4);
        assert_eq!(table.modal_frequency(), 2);
    }
}
