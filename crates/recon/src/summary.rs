use crate::model::{BatchSummary, OutputRecord};

/// Summary counts for a finished batch.
pub fn compute_summary(records: &[OutputRecord], order_rows: usize, skipped_rows: usize) -> BatchSummary {
    let mut summary = BatchSummary {
        order_rows,
        processed: records.len(),
        skipped_rows,
        ..BatchSummary::default()
    };

    for r in records {
        if r.result.found {
            summary.matched += 1;
            *summary.by_carrier.entry(r.result.carrier.clone()).or_insert(0) += 1;
        } else {
            summary.unmatched += 1;
        }
    }

    summary
}
