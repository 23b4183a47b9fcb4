use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::source::CarrierSource;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Order rows narrower than this are skipped.
pub const MIN_ORDER_ROW_CELLS: usize = 25;

pub const ORDER_ID_COLUMN: usize = 0;
pub const ORDER_ITEM_ID_COLUMN: usize = 1;
pub const QUANTITY_COLUMN: usize = 9;
pub const BUYER_NAME_COLUMN: usize = 16;

/// Fields the batch needs from one order report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub order_id: String,
    pub order_item_id: String,
    pub quantity: String,
    pub buyer_name: String,
}

impl OrderRecord {
    /// `None` for rows below the integrity floor.
    pub fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < MIN_ORDER_ROW_CELLS {
            return None;
        }
        let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
        Some(Self {
            order_id: cell(ORDER_ID_COLUMN),
            order_item_id: cell(ORDER_ITEM_ID_COLUMN),
            quantity: cell(QUANTITY_COLUMN),
            buyer_name: cell(BUYER_NAME_COLUMN),
        })
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Tracking number and carrier recovered for one name, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub found: bool,
    pub carrier: String,
    pub tracking_number: String,
    /// Manifest that produced the match. Sagawa and Shoshin share a carrier label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<CarrierSource>,
}

impl ReconciliationResult {
    pub fn not_found() -> Self {
        Self {
            found: false,
            carrier: String::new(),
            tracking_number: String::new(),
            source: None,
        }
    }

    pub fn matched(source: CarrierSource, tracking_number: String) -> Self {
        Self {
            found: true,
            carrier: source.carrier_label().to_string(),
            tracking_number,
            source: Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Fixed type tag written on every output row.
pub const OUTPUT_TYPE_TAG: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub order_id: String,
    pub order_item_id: String,
    pub quantity: String,
    /// Processing date, never the purchase date.
    pub shipping_date: NaiveDate,
    #[serde(rename = "type")]
    pub type_tag: &'static str,
    #[serde(flatten)]
    pub result: ReconciliationResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Data rows seen, header excluded.
    pub order_rows: usize,
    pub processed: usize,
    pub skipped_rows: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub by_carrier: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMeta {
    pub config_name: String,
    pub engine_version: String,
    pub processing_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub meta: BatchMeta,
    pub summary: BatchSummary,
    pub records: Vec<OutputRecord>,
}
