pub mod dashboard;
pub mod insight;
pub mod metrics;

use investdash_core::record::InvestmentRecord;
use investdash_core::storage::{FileStore, KeyValueStore, RecordRepository};
use investdash_core::types::Money;
use investdash_core::validation::{self, InputIssue};

use crate::settings::AppConfig;

/// State shared by every command: where the scenario lives and how input is parsed.
pub struct Session {
    repo: RecordRepository<Box<dyn KeyValueStore>>,
    lenient: bool,
}

impl Session {
    pub fn new(config: &AppConfig, lenient: bool) -> Self {
        Self::with_store(
            Box::new(FileStore::new(&config.state_dir)),
            config.storage_key.clone(),
            lenient,
        )
    }

    pub fn with_store(store: Box<dyn KeyValueStore>, key: String, lenient: bool) -> Self {
        Self {
            repo: RecordRepository::new(store, key),
            lenient,
        }
    }

    pub fn load(&self) -> InvestmentRecord {
        self.repo.load_or_default()
    }

    /// Persist the record. Failures are logged, never fatal.
    pub fn save(&self, record: &InvestmentRecord) {
        if let Err(e) = self.repo.save(record) {
            tracing::warn!(key = %self.repo.key(), error = %e, "could not save record");
        }
    }

    /// Apply the configured parse policy: reject with a hint, or fall back to
    /// coercion where anything the field parser rejects becomes 0.
    pub fn number(
        &self,
        field: &str,
        raw: &str,
        parse: fn(&str) -> Result<Money, InputIssue>,
    ) -> Result<Money, Box<dyn std::error::Error>> {
        match parse(raw) {
            Ok(value) => Ok(value),
            Err(issue) if self.lenient => {
                tracing::info!(field, %issue, "coercing input leniently");
                Ok(validation::coerce_or_zero(raw, parse))
            }
            Err(issue) => Err(format!("{field}: {issue} (hint: {})", issue.hint()).into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use investdash_core::storage::MemoryStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    pub(crate) fn memory_session(lenient: bool) -> Session {
        Session::with_store(Box::new(MemoryStore::new()), "investment_record".into(), lenient)
    }

    #[test]
    fn test_strict_number_rejects_negative_investment() {
        let session = memory_session(false);
        let err = session
            .number("initial investment", "-5", validation::parse_investment)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("initial investment: value must not be negative"));
        assert!(message.contains("hint:"));
    }

    #[test]
    fn test_lenient_number_coerces_out_of_range_to_zero() {
        let session = memory_session(true);
        let investment = session
            .number("initial investment", "-5", validation::parse_investment)
            .unwrap();
        assert_eq!(investment, Decimal::ZERO);

        let rate = session
            .number("discount rate", "-150", validation::parse_discount_rate)
            .unwrap();
        assert_eq!(rate, Decimal::ZERO);

        let garbage = session.number("cash flow", "abc", validation::parse_amount).unwrap();
        assert_eq!(garbage, Decimal::ZERO);
    }

    #[test]
    fn test_valid_number_passes_either_policy() {
        for lenient in [false, true] {
            let session = memory_session(lenient);
            let value = session.number("cash flow", "-250,5", validation::parse_amount).unwrap();
            assert_eq!(value, dec!(-250.5));
        }
    }

    #[test]
    fn test_load_defaults_then_reads_saved() {
        let session = memory_session(false);
        assert_eq!(session.load(), InvestmentRecord::default());

        let edited = InvestmentRecord::default().with_added_period();
        session.save(&edited);
        assert_eq!(session.load(), edited);
    }
}
