use std::panic::{self, AssertUnwindSafe};

use shipmatch_io::Row;

use crate::matcher::MatchRules;
use crate::model::ReconciliationResult;
use crate::source::CarrierSource;

/// The three carrier manifests, as parsed rows. Read-only during a batch.
#[derive(Debug, Clone, Default)]
pub struct CarrierSources {
    pub sagawa: Vec<Row>,
    pub shoshin: Vec<Row>,
    pub fukuyama: Vec<Row>,
}

impl CarrierSources {
    pub fn rows(&self, source: CarrierSource) -> &[Row] {
        match source {
            CarrierSource::Sagawa => &self.sagawa,
            CarrierSource::Shoshin => &self.shoshin,
            CarrierSource::Fukuyama => &self.fukuyama,
        }
    }
}

/// Find `target` in the manifests in priority order. First match wins.
///
/// A fault while scanning any source degrades to not-found for this name
/// only; it never propagates to the caller.
pub fn reconcile(target: &str, sources: &CarrierSources, rules: &MatchRules) -> ReconciliationResult {
    for source in CarrierSource::PRIORITY {
        let rows = sources.rows(source);
        let scanned = panic::catch_unwind(AssertUnwindSafe(|| source.scan(rows, target, rules)));

        match scanned {
            Ok(Some(hit)) => return hit,
            Ok(None) => continue,
            Err(_) => {
                log::warn!("{source}: scan aborted while matching \"{target}\"; treating as not found");
                return ReconciliationResult::not_found();
            }
        }
    }

    log::debug!("no match for \"{target}\"");
    ReconciliationResult::not_found()
}
