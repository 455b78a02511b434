//! Classification and aggregation services for the user dashboard.
//!
//! Records are bucketed by email domain (Government / Non-Government, with a
//! GSI refinement) and then split into National / International by country.

use super::models::{CellValue, ChartData, FilterState, PrimaryFilter, Record, SubFilter};

const GOV_MARKER: &str = ".gov";
const GSI_SUFFIX: &str = "gsi.gov.in";
const NATIONAL_COUNTRY: &str = "India";

/// Aggregates a borrowed record set into the two chart counts.
///
/// The aggregator never fails: a record whose fields have unexpected types is
/// simply kept or dropped according to the filter rules.
///
/// # Examples
///
/// ```
/// use user_dashboard::domain::{FilterState, PrimaryFilter, Record, UserAggregator};
///
/// let records = vec![
///     Record::new().with("email", "a@x.gov.in").with("country_name", "India"),
///     Record::new().with("email", "c@test.com").with("country_name", "USA"),
/// ];
/// let aggregator = UserAggregator::new(&records);
///
/// assert_eq!(aggregator.aggregate(FilterState::default()).counts, [1, 1]);
///
/// let government = FilterState::default().with_primary(PrimaryFilter::Government);
/// assert_eq!(aggregator.aggregate(government).counts, [1, 0]);
/// ```
pub struct UserAggregator<'a> {
    records: &'a [Record],
}

impl<'a> UserAggregator<'a> {
    pub fn new(records: &'a [Record]) -> Self {
        Self { records }
    }

    /// Returns the records kept by `filter`, in load order.
    pub fn filtered(&self, filter: FilterState) -> Vec<&'a Record> {
        self.records
            .iter()
            .filter(|record| Self::matches(record, filter))
            .collect()
    }

    /// Produces the National / International counts for `filter`.
    pub fn aggregate(&self, filter: FilterState) -> ChartData {
        let filtered = self.filtered(filter);
        let national = filtered.iter().filter(|record| is_national(record)).count();
        let international = filtered.len() - national;
        ChartData::new(national, international)
    }

    /// Whether a single record survives `filter`.
    ///
    /// Government requires a string email containing `.gov`. Non-Government
    /// requires an email to be present at all, and then accepts anything that
    /// is not a `.gov` string. A record without an email therefore drops out of
    /// both buckets.
    pub fn matches(record: &Record, filter: FilterState) -> bool {
        match filter.primary {
            PrimaryFilter::Government => {
                let Some(email) = lowercase_email(record) else {
                    return false;
                };
                if !email.contains(GOV_MARKER) {
                    return false;
                }
                match filter.sub {
                    SubFilter::Gsi => email.ends_with(GSI_SUFFIX),
                    SubFilter::All => true,
                }
            }
            PrimaryFilter::NonGovernment => match record.email() {
                None => false,
                Some(CellValue::Text(email)) => !email.to_lowercase().contains(GOV_MARKER),
                Some(_) => true,
            },
            PrimaryFilter::All => true,
        }
    }
}

fn lowercase_email(record: &Record) -> Option<String> {
    record
        .email()
        .and_then(CellValue::as_text)
        .map(str::to_lowercase)
}

/// Exact, case-sensitive match against the Text value "India".
pub fn is_national(record: &Record) -> bool {
    record
        .country_name()
        .and_then(CellValue::as_text)
        .is_some_and(|country| country == NATIONAL_COUNTRY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{COUNTRY_COLUMN, EMAIL_COLUMN};

    fn user(email: &str, country: &str) -> Record {
        Record::new()
            .with(EMAIL_COLUMN, email)
            .with(COUNTRY_COLUMN, country)
    }

    fn scenario_records() -> Vec<Record> {
        vec![
            user("a@x.gov.in", "India"),
            user("b@gsi.gov.in", "India"),
            user("c@test.com", "USA"),
        ]
    }

    fn mixed_records() -> Vec<Record> {
        vec![
            user("Officer@NIC.GOV.IN", "India"),
            user("geo@GSI.gov.in", "India"),
            user("someone@agency.gov", "USA"),
            user("dev@example.org", "India"),
            user("ops@example.com", "Germany"),
            Record::new().with(COUNTRY_COLUMN, "India"),
            Record::new().with(EMAIL_COLUMN, CellValue::Number(12345.0)),
            Record::new()
                .with(EMAIL_COLUMN, CellValue::Bool(true))
                .with(COUNTRY_COLUMN, "India"),
            user("x@gsi.gov.in.example.com", "india"),
            Record::new(),
        ]
    }

    fn government() -> FilterState {
        FilterState::default().with_primary(PrimaryFilter::Government)
    }

    fn gsi() -> FilterState {
        government().with_sub(SubFilter::Gsi)
    }

    fn non_government() -> FilterState {
        FilterState::default().with_primary(PrimaryFilter::NonGovernment)
    }

    #[test]
    fn test_scenario_counts() {
        let records = scenario_records();
        let aggregator = UserAggregator::new(&records);

        assert_eq!(aggregator.aggregate(FilterState::default()).counts, [2, 1]);
        assert_eq!(aggregator.aggregate(government()).counts, [2, 0]);
        assert_eq!(aggregator.aggregate(gsi()).counts, [1, 0]);
        assert_eq!(aggregator.aggregate(non_government()).counts, [0, 1]);
    }

    #[test]
    fn test_all_counts_every_record() {
        let records = mixed_records();
        let chart = UserAggregator::new(&records).aggregate(FilterState::default());
        assert_eq!(chart.total(), records.len());
    }

    #[test]
    fn test_sub_filter_ignored_outside_government() {
        let records = mixed_records();
        let aggregator = UserAggregator::new(&records);

        let all_with_gsi = FilterState::new(PrimaryFilter::All, SubFilter::Gsi);
        assert_eq!(
            aggregator.aggregate(all_with_gsi),
            aggregator.aggregate(FilterState::default())
        );

        let non_gov_with_gsi = FilterState::new(PrimaryFilter::NonGovernment, SubFilter::Gsi);
        assert_eq!(
            aggregator.aggregate(non_gov_with_gsi),
            aggregator.aggregate(non_government())
        );
    }

    #[test]
    fn test_government_is_case_insensitive() {
        let records = mixed_records();
        let aggregator = UserAggregator::new(&records);

        let kept = aggregator.filtered(government());
        assert_eq!(kept.len(), 4);
        for record in &kept {
            let email = record.email().and_then(CellValue::as_text).unwrap();
            assert!(email.to_lowercase().contains(".gov"));
        }
        // "india" is not "India"
        assert_eq!(aggregator.aggregate(government()).counts, [2, 2]);
    }

    #[test]
    fn test_gsi_is_subset_of_government() {
        let records = mixed_records();
        let aggregator = UserAggregator::new(&records);

        let government = aggregator.filtered(government());
        let gsi = aggregator.filtered(gsi());

        assert!(gsi.len() < government.len());
        for record in &gsi {
            assert!(government.contains(record));
            let email = record.email().and_then(CellValue::as_text).unwrap();
            assert!(email.to_lowercase().ends_with("gsi.gov.in"));
        }
        assert_eq!(gsi.len(), 1);
    }

    #[test]
    fn test_non_government_keeps_non_string_emails() {
        let records = mixed_records();
        let aggregator = UserAggregator::new(&records);

        let kept = aggregator.filtered(non_government());
        assert_eq!(kept.len(), 4);
        for record in &kept {
            match record.email() {
                Some(CellValue::Text(email)) => assert!(!email.to_lowercase().contains(".gov")),
                Some(_) => {}
                None => panic!("record without email counted as Non-Government"),
            }
        }
        assert_eq!(aggregator.aggregate(non_government()).counts, [2, 2]);
    }

    #[test]
    fn test_missing_email_excluded_from_both_buckets() {
        let records = vec![Record::new().with(COUNTRY_COLUMN, "India")];
        let aggregator = UserAggregator::new(&records);

        assert_eq!(aggregator.aggregate(non_government()).counts, [0, 0]);
        assert_eq!(aggregator.aggregate(government()).counts, [0, 0]);
        assert_eq!(aggregator.aggregate(FilterState::default()).counts, [1, 0]);
    }

    // A present but non-string email is Non-Government while a missing one is
    // neither. Kept as-is; this pins the asymmetry between the two branches.
    #[test]
    fn test_email_presence_asymmetry() {
        let numeric = Record::new().with(EMAIL_COLUMN, CellValue::Number(1.0));
        let missing = Record::new();

        assert!(!UserAggregator::matches(&numeric, government()));
        assert!(UserAggregator::matches(&numeric, non_government()));
        assert!(!UserAggregator::matches(&missing, government()));
        assert!(!UserAggregator::matches(&missing, non_government()));
    }

    #[test]
    fn test_national_requires_exact_match() {
        assert!(is_national(&user("a@b.c", "India")));
        assert!(!is_national(&user("a@b.c", "india")));
        assert!(!is_national(&user("a@b.c", "India ")));
        assert!(!is_national(&Record::new()));
        assert!(!is_national(
            &Record::new().with(COUNTRY_COLUMN, CellValue::Number(91.0))
        ));
    }

    #[test]
    fn test_counts_partition_filtered_set() {
        let records = mixed_records();
        let aggregator = UserAggregator::new(&records);

        for primary in PrimaryFilter::ALL {
            for sub in SubFilter::ALL {
                let filter = FilterState::new(primary, sub);
                let chart = aggregator.aggregate(filter);
                let filtered = aggregator.filtered(filter);
                let national = filtered.iter().filter(|r| is_national(r)).count();

                assert_eq!(chart.national(), national);
                assert_eq!(chart.international(), filtered.len() - national);
                assert!(chart.total() <= records.len());
            }
        }
    }

    #[test]
    fn test_empty_record_set() {
        let aggregator = UserAggregator::new(&[]);
        assert_eq!(aggregator.aggregate(gsi()).counts, [0, 0]);
    }
}
