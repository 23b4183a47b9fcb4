use chrono::NaiveDate;
use shipmatch_io::{CandidateEncoding, DecodePolicy, LoadedTable, RowSplit};
use shipmatch_recon::{BatchOrchestrator, CarrierSource, CarrierSources, MatchRules, ReconConfig};

fn processing_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

/// One delimited line with `set` cells filled in and everything else empty.
fn line(width: usize, sep: char, set: &[(usize, &str)]) -> String {
    let mut cells = vec![String::new(); width];
    for (i, v) in set {
        cells[*i] = v.to_string();
    }
    cells.join(&sep.to_string())
}

fn load(bytes: &[u8], split: RowSplit) -> LoadedTable {
    LoadedTable::from_bytes(bytes, &CandidateEncoding::DEFAULT, DecodePolicy::Lenient, split)
}

fn sagawa_manifest() -> Vec<u8> {
    let text = [
        line(17, ',', &[(0, "お問い合せ送り状No."), (15, "お届け先名称"), (16, "佐川急便 出荷通知")]),
        line(17, ',', &[(0, "S-001"), (15, "山田 太郎")]),
        line(17, ',', &[(0, "S-002"), (7, "ＡＢＣオンラインストア")]),
    ]
    .join("\r\n");
    encoding_rs::SHIFT_JIS.encode(&text).0.into_owned()
}

fn shoshin_manifest() -> Vec<u8> {
    // No header row: the first line is data
    let text = [
        line(10, ',', &[(0, "佐藤商店"), (9, "T-002")]),
        line(10, ',', &[(0, "昭新配送センター"), (9, "T-003")]),
    ]
    .join("\n");
    text.into_bytes()
}

fn fukuyama_manifest() -> Vec<u8> {
    let text = [
        line(10, '\t', &[(2, "送り状番号"), (9, "福山通運 配送先")]),
        line(10, '\t', &[(2, "F-003"), (9, "鈴木一郎")]),
        line(10, '\t', &[(2, "F-004"), (9, "山田太郎")]),
    ]
    .join("\n");
    encoding_rs::EUC_JP.encode(&text).0.into_owned()
}

fn order_report() -> Vec<u8> {
    let order = |id: &str, buyer: &str| line(25, '\t', &[(0, id), (1, &format!("{id}-1")), (9, "1"), (16, buyer)]);
    let text = [
        line(25, '\t', &[(0, "order-id"), (16, "buyer-name")]),
        order("A", "山田太郎"),
        order("B", "株式会社佐藤商店"),
        order("C", "鈴木 一郎"),
        order("D", "高橋"),
        line(24, '\t', &[(0, "E"), (16, "山田太郎")]),
        order("F", "abc online store"),
    ]
    .join("\n");
    text.into_bytes()
}

fn sources() -> CarrierSources {
    let sagawa = load(&sagawa_manifest(), RowSplit::TabOrComma);
    let shoshin = load(&shoshin_manifest(), RowSplit::TabOrComma);
    let fukuyama = load(&fukuyama_manifest(), RowSplit::TabOrComma);
    CarrierSources {
        sagawa: sagawa.rows,
        shoshin: shoshin.rows,
        fukuyama: fukuyama.rows,
    }
}

// -------------------------------------------------------------------------
// Decoding
// -------------------------------------------------------------------------

#[test]
fn manifests_decode_with_their_own_encoding() {
    let sagawa = load(&sagawa_manifest(), RowSplit::TabOrComma);
    assert_eq!(sagawa.encoding, Some(CandidateEncoding::ShiftJis));
    assert_eq!(sagawa.rows.len(), 3);
    assert_eq!(sagawa.rows[1][15], "山田 太郎");

    let fukuyama = load(&fukuyama_manifest(), RowSplit::TabOrComma);
    assert_eq!(fukuyama.encoding, Some(CandidateEncoding::EucJp));
    assert_eq!(fukuyama.rows[1][9], "鈴木一郎");

    let shoshin = load(&shoshin_manifest(), RowSplit::TabOrComma);
    assert_eq!(shoshin.encoding, Some(CandidateEncoding::Utf8));
}

// -------------------------------------------------------------------------
// Batch
// -------------------------------------------------------------------------

#[test]
fn end_to_end_batch() {
    let orders = load(&order_report(), RowSplit::TabOnly);
    let orchestrator = BatchOrchestrator::new(MatchRules::default(), processing_date());
    let result = orchestrator.run(&orders.rows, &sources());

    let ids: Vec<&str> = result.records.iter().map(|r| r.order_id.as_str()).collect();
    assert_eq!(ids, ["A", "B", "C", "D", "F"]);

    let a = &result.records[0];
    assert!(a.result.found);
    assert_eq!(a.result.carrier, "佐川急便");
    assert_eq!(a.result.tracking_number, "S-001");
    assert_eq!(a.result.source, Some(CarrierSource::Sagawa));
    assert_eq!(a.order_item_id, "A-1");
    assert_eq!(a.quantity, "1");

    let b = &result.records[1];
    assert_eq!(b.result.carrier, "佐川急便");
    assert_eq!(b.result.tracking_number, "T-002");
    assert_eq!(b.result.source, Some(CarrierSource::Shoshin));

    let c = &result.records[2];
    assert_eq!(c.result.carrier, "福山通運");
    assert_eq!(c.result.tracking_number, "F-003");

    let d = &result.records[3];
    assert!(!d.result.found);
    assert_eq!(d.result.carrier, "");
    assert_eq!(d.result.tracking_number, "");

    let f = &result.records[4];
    assert_eq!(f.result.tracking_number, "S-002");

    assert_eq!(result.summary.order_rows, 6);
    assert_eq!(result.summary.processed, 5);
    assert_eq!(result.summary.skipped_rows, 1);
    assert_eq!(result.summary.matched, 4);
    assert_eq!(result.summary.unmatched, 1);
    assert_eq!(result.summary.by_carrier["佐川急便"], 3);
    assert_eq!(result.summary.by_carrier["福山通運"], 1);

    for rec in &result.records {
        assert_eq!(rec.shipping_date, processing_date());
        assert_eq!(rec.type_tag, "Other");
    }
}

#[test]
fn earlier_source_wins_over_later_match() {
    // 山田太郎 is in both the Sagawa and Fukuyama manifests
    let orders = load(&order_report(), RowSplit::TabOnly);
    let result = BatchOrchestrator::new(MatchRules::default(), processing_date()).run(&orders.rows, &sources());
    let a = result.records.iter().find(|r| r.order_id == "A").unwrap();
    assert_eq!(a.result.tracking_number, "S-001");
}

#[test]
fn json_record_shape() {
    let orders = load(&order_report(), RowSplit::TabOnly);
    let result = BatchOrchestrator::new(MatchRules::default(), processing_date()).run(&orders.rows, &sources());
    let value = serde_json::to_value(&result.records[0]).unwrap();

    assert_eq!(value["orderId"], "A");
    assert_eq!(value["orderItemId"], "A-1");
    assert_eq!(value["shippingDate"], "2026-10-15");
    assert_eq!(value["type"], "Other");
    assert_eq!(value["carrier"], "佐川急便");
    assert_eq!(value["trackingNumber"], "S-001");
    assert_eq!(value["found"], true);
}

#[test]
fn configured_rules_flow_into_batch() {
    let config = ReconConfig::from_toml(
        r#"
name = "wider suffixes"

[inputs]
sagawa = "a.csv"
shoshin = "b.csv"
fukuyama = "c.csv"

[matching]
legal_suffixes = ["株式会社", "(株)"]
"#,
    )
    .unwrap();

    let mut fukuyama_row = vec![String::new(); 10];
    fukuyama_row[2] = "F-9".into();
    fukuyama_row[9] = "山田(株)東京支店".into();
    let sources = CarrierSources {
        fukuyama: vec![Vec::new(), fukuyama_row],
        ..CarrierSources::default()
    };
    let order = line(25, '\t', &[(0, "X"), (16, "山田株式会社東京支店")]);
    let rows = shipmatch_io::split_rows(&format!("header\n{order}"), RowSplit::TabOnly);

    let default_run = BatchOrchestrator::new(MatchRules::default(), processing_date()).run(&rows, &sources);
    assert!(!default_run.records[0].result.found);

    let configured = BatchOrchestrator::from_config(&config, processing_date()).run(&rows, &sources);
    assert_eq!(configured.meta.config_name, "wider suffixes");
    assert_eq!(configured.records[0].result.tracking_number, "F-9");
}

#[test]
fn no_manifests_means_every_order_unmatched() {
    let orders = load(&order_report(), RowSplit::TabOnly);
    let result = BatchOrchestrator::new(MatchRules::default(), processing_date())
        .run(&orders.rows, &CarrierSources::default());
    assert_eq!(result.summary.matched, 0);
    assert_eq!(result.summary.unmatched, 5);
    assert!(result.summary.by_carrier.is_empty());
}
