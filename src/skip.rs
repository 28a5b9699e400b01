//! Leading line skipping.

use std::path::Path;

use encoding_rs::Encoding;

use crate::error::{ParserError, Result};
use crate::metadata::Dialect;
use crate::source::{ReadMode, RowSource};

/// Number of records discarded before the first data row, per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SkipReport {
    /// Records before the one whose first field matched the keyword.
    pub keyword: usize,
    /// Records discarded by the fixed line skip.
    pub fixed: usize,
    /// 1 if a header row was discarded.
    pub header: usize,
}

impl SkipReport {
    /// Total records discarded.
    pub const fn total(&self) -> usize {
        self.keyword + self.fixed + self.header
    }
}

/// Options for [`apply`].
pub(crate) struct SkipPlan<'a> {
    pub path: &'a Path,
    pub dialect: &'a Dialect,
    pub mode: ReadMode,
    pub encoding: &'static Encoding,
    pub line_skip: usize,
    pub keyword: &'a str,
    pub has_header: bool,
}

/// Advance `primary` past every leading non-data record.
///
/// Stages run in order: keyword scan, fixed count, header row. Running out of
/// input during the last two stages leaves `primary` at end of input.
pub(crate) fn apply(primary: &mut RowSource, plan: &SkipPlan<'_>) -> Result<SkipReport> {
    let mut report = SkipReport::default();

    if !plan.keyword.is_empty() {
        report.keyword = scan_for_keyword(primary, plan)?;
    }

    report.fixed = skip_n(primary, plan.line_skip)?;
    if report.fixed < plan.line_skip {
        tracing::warn!(
            requested = plan.line_skip,
            skipped = report.fixed,
            "input ended during line skip"
        );
        return Ok(report);
    }

    if plan.has_header {
        report.header = skip_n(primary, 1)?;
        if report.header == 0 {
            tracing::warn!("input ended before header row");
        }
    }

    tracing::debug!(
        keyword = report.keyword,
        fixed = report.fixed,
        header = report.header,
        "skipped leading records"
    );
    Ok(report)
}

/// Walk a second cursor until a record's first field matches the keyword,
/// discarding one primary record per non-matching record.
fn scan_for_keyword(primary: &mut RowSource, plan: &SkipPlan<'_>) -> Result<usize> {
    let keyword = plan.keyword.to_lowercase();
    let mut scan = RowSource::open(plan.path, plan.dialect, plan.mode, plan.encoding)?;
    let mut skipped = 0;

    loop {
        let matched = match scan.next_first_field()? {
            Some(first) => first.to_lowercase() == keyword,
            None => {
                return Err(ParserError::KeywordNotFound {
                    keyword: plan.keyword.to_string(),
                    path: plan.path.to_path_buf(),
                });
            }
        };
        if matched {
            return Ok(skipped);
        }
        primary.skip()?;
        skipped += 1;
    }
}

fn skip_n(source: &mut RowSource, n: usize) -> Result<usize> {
    for i in 0..n {
        if !source.skip()? {
            return Ok(i);
        }
    }
    Ok(n)
}
