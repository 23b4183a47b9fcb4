use chrono::NaiveDate;
use shipmatch_io::Row;

use crate::config::ReconConfig;
use crate::engine::{reconcile, CarrierSources};
use crate::matcher::MatchRules;
use crate::model::{BatchMeta, BatchResult, OrderRecord, OutputRecord, OUTPUT_TYPE_TAG};
use crate::summary::compute_summary;

/// Applies reconciliation to every order row of a report.
///
/// The processing date is fixed at construction so a batch stamps one date
/// on every record, whatever the wall clock does meanwhile.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    name: String,
    rules: MatchRules,
    processing_date: NaiveDate,
}

impl BatchOrchestrator {
    pub fn new(rules: MatchRules, processing_date: NaiveDate) -> Self {
        Self {
            name: String::new(),
            rules,
            processing_date,
        }
    }

    pub fn from_config(config: &ReconConfig, processing_date: NaiveDate) -> Self {
        Self {
            name: config.name.clone(),
            rules: config.matching.rules(),
            processing_date,
        }
    }

    /// Reconcile one parsed order row. `None` when the row is too narrow.
    pub fn process_row(&self, row: &[String], sources: &CarrierSources) -> Option<OutputRecord> {
        let order = OrderRecord::from_row(row)?;
        let result = reconcile(&order.buyer_name, sources, &self.rules);
        log::debug!(
            "order {}: buyer \"{}\" -> {}",
            order.order_id,
            order.buyer_name,
            if result.found { result.tracking_number.as_str() } else { "no match" }
        );

        Some(OutputRecord {
            order_id: order.order_id,
            order_item_id: order.order_item_id,
            quantity: order.quantity,
            shipping_date: self.processing_date,
            type_tag: OUTPUT_TYPE_TAG,
            result,
        })
    }

    /// Row 0 of `order_rows` is the report header and is never processed.
    pub fn run(&self, order_rows: &[Row], sources: &CarrierSources) -> BatchResult {
        let data_rows = order_rows.get(1..).unwrap_or(&[]);
        let mut records = Vec::with_capacity(data_rows.len());
        let mut skipped = 0;

        for (offset, row) in data_rows.iter().enumerate() {
            match self.process_row(row, sources) {
                Some(record) => records.push(record),
                None => {
                    log::debug!("order row {}: {} cells, skipped", offset + 1, row.len());
                    skipped += 1;
                }
            }
        }

        let summary = compute_summary(&records, data_rows.len(), skipped);
        log::info!(
            "batch: {} processed, {} matched, {} unmatched, {} skipped",
            summary.processed,
            summary.matched,
            summary.unmatched,
            summary.skipped_rows
        );

        BatchResult {
            meta: BatchMeta {
                config_name: self.name.clone(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                processing_date: self.processing_date,
            },
            summary,
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn order_row(width: usize, order_id: &str, buyer: &str) -> Row {
        let mut r = vec![String::new(); width];
        r[0] = order_id.into();
        r[1] = format!("{order_id}-item");
        r[2] = "2026-09-30T10:00:00+09:00".into();
        r[9] = "1".into();
        if width > 16 {
            r[16] = buyer.into();
        }
        r
    }

    fn sources() -> CarrierSources {
        let mut fukuyama_row = vec![String::new(); 10];
        fukuyama_row[2] = "F-77".into();
        fukuyama_row[9] = "山田太郎".into();
        CarrierSources {
            sagawa: Vec::new(),
            shoshin: Vec::new(),
            fukuyama: vec![vec![String::new(); 10], fukuyama_row],
        }
    }

    #[test]
    fn header_and_narrow_rows_skipped() {
        let rows = vec![
            order_row(25, "order-id", "buyer-name"),
            order_row(25, "A", "山田太郎"),
            order_row(24, "B", "山田太郎"),
            order_row(30, "C", "佐藤"),
        ];
        let result = BatchOrchestrator::new(MatchRules::default(), date()).run(&rows, &sources());

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].order_id, "A");
        assert_eq!(result.records[1].order_id, "C");
        assert_eq!(result.summary.order_rows, 3);
        assert_eq!(result.summary.skipped_rows, 1);
        assert_eq!(result.summary.matched, 1);
        assert_eq!(result.summary.unmatched, 1);
    }

    #[test]
    fn shipping_date_is_processing_date() {
        let rows = vec![order_row(25, "h", "h"), order_row(25, "A", "山田太郎")];
        let result = BatchOrchestrator::new(MatchRules::default(), date()).run(&rows, &sources());
        let rec = &result.records[0];
        assert_eq!(rec.shipping_date, date());
        assert_eq!(rec.type_tag, "Other");
        assert_eq!(rec.quantity, "1");
        assert_eq!(rec.result.tracking_number, "F-77");
    }

    #[test]
    fn empty_report() {
        let orchestrator = BatchOrchestrator::new(MatchRules::default(), date());
        let result = orchestrator.run(&[], &sources());
        assert!(result.records.is_empty());
        assert_eq!(result.summary.order_rows, 0);
    }
}
