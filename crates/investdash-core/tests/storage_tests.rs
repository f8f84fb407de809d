use std::fs;

use investdash_core::currency::Currency;
use investdash_core::record::InvestmentRecord;
use investdash_core::storage::{FileStore, KeyValueStore, RecordRepository};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let repo = RecordRepository::new(FileStore::new(dir.path()), "investment_record");

    let record = InvestmentRecord::default()
        .with_initial_investment(dec!(750000.25))
        .with_discount_rate(dec!(12.5))
        .with_currency(Currency::BRL)
        .with_added_period()
        .with_flow_amount(5, dec!(-1200))
        .unwrap();

    repo.save(&record).unwrap();
    assert_eq!(repo.load(), Some(record));
    assert!(dir.path().join("investment_record.json").is_file());
}

#[test]
fn test_save_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("state").join("dashboard");
    let repo = RecordRepository::new(FileStore::new(&nested), "snapshot");
    repo.save(&InvestmentRecord::default()).unwrap();
    assert_eq!(repo.load(), Some(InvestmentRecord::default()));
}

#[test]
fn test_missing_file_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let repo = RecordRepository::new(FileStore::new(dir.path()), "never_written");
    assert_eq!(repo.load(), None);
}

#[test]
fn test_corrupt_file_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("investment_record.json"), "{\"initialInvestment\": \"abc\"").unwrap();
    let repo = RecordRepository::new(FileStore::new(dir.path()), "investment_record");
    assert_eq!(repo.load(), None);
    assert_eq!(repo.load_or_default(), InvestmentRecord::default());
}

#[test]
fn test_reads_plain_numeric_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store
        .set(
            "legacy",
            r#"{"initialInvestment":100,"discountRate":8,"currency":"USD","cashFlows":[{"period":1,"amount":60.5}]}"#,
        )
        .unwrap();
    let repo = RecordRepository::new(store, "legacy");
    let record = repo.load().unwrap();
    assert_eq!(record.currency, Currency::USD);
    assert_eq!(record.cash_flows[0].amount, dec!(60.5));
}

#[test]
fn test_invalid_key_fails_save_but_not_load() {
    let dir = tempfile::tempdir().unwrap();
    let repo = RecordRepository::new(FileStore::new(dir.path()), "../escape");
    assert!(repo.save(&InvestmentRecord::default()).is_err());
    assert_eq!(repo.load(), None);
}

#[test]
fn test_saved_amounts_are_json_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let repo = RecordRepository::new(FileStore::new(dir.path()), "investment_record");
    let record = InvestmentRecord::default().with_initial_investment(dec!(750000.25));
    repo.save(&record).unwrap();

    let raw = fs::read_to_string(dir.path().join("investment_record.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json["initialInvestment"].is_number(), "got {}", json["initialInvestment"]);
    assert!(json["discountRate"].is_number());
    assert_eq!(json["initialInvestment"].as_f64(), Some(750000.25));
    assert_eq!(json["currency"], "AOA");
    for entry in json["cashFlows"].as_array().unwrap() {
        assert!(entry["period"].is_u64());
        assert!(entry["amount"].is_number());
    }
    assert_eq!(repo.load(), Some(record));
}
