use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Experience tier of the salesperson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
}

impl Seniority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Seniority::Junior => "Junior",
            Seniority::Mid => "Mid",
            Seniority::Senior => "Senior",
        }
    }
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Seniority {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "junior" | "jr" => Ok(Seniority::Junior),
            "mid" | "pleno" => Ok(Seniority::Mid),
            "senior" | "sr" => Ok(Seniority::Senior),
            _ => Err(EtlError::invalid_input(
                "seniority",
                s,
                "expected one of Junior, Mid, Senior",
            )),
        }
    }
}

/// Pricing tier of the product line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Standard,
    Premium,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Standard => "Standard",
            ProductCategory::Premium => "Premium",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ProductCategory::Standard),
            "premium" => Ok(ProductCategory::Premium),
            _ => Err(EtlError::invalid_input(
                "category",
                s,
                "expected one of Standard, Premium",
            )),
        }
    }
}

/// The four inputs of the commission policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub amount_sold: f64,
    pub target: f64,
    pub seniority: Seniority,
    pub category: ProductCategory,
}

impl SalesRecord {
    pub fn new(
        amount_sold: f64,
        target: f64,
        seniority: Seniority,
        category: ProductCategory,
    ) -> Self {
        Self {
            amount_sold,
            target,
            seniority,
            category,
        }
    }

    /// Rejects negative or non-finite amounts.
    pub fn validate(&self) -> Result<()> {
        validate_amount("amount_sold", self.amount_sold)?;
        validate_amount("target", self.target)
    }

    pub fn met_target(&self) -> bool {
        self.amount_sold >= self.target
    }
}

fn validate_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(EtlError::invalid_input(field, value, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(EtlError::invalid_input(field, value, "must not be negative"));
    }
    Ok(())
}

/// One input row as read from a sales file, before label parsing.
///
/// Column names follow the report headers; the Portuguese headers used by
/// the original spreadsheets (`vendedor`, `vendas`, `meta`, `nivel`,
/// `categoria`) are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    #[serde(skip)]
    pub line: u64,
    #[serde(default, alias = "vendedor")]
    pub salesperson: String,
    #[serde(alias = "vendas")]
    pub amount_sold: f64,
    #[serde(alias = "meta")]
    pub target: f64,
    #[serde(alias = "nivel")]
    pub seniority: String,
    #[serde(alias = "categoria")]
    pub category: String,
}

impl SalesRow {
    pub fn new(
        salesperson: &str,
        amount_sold: f64,
        target: f64,
        seniority: &str,
        category: &str,
    ) -> Self {
        Self {
            line: 0,
            salesperson: salesperson.to_string(),
            amount_sold,
            target,
            seniority: seniority.to_string(),
            category: category.to_string(),
        }
    }

    pub fn to_record(&self) -> Result<SalesRecord> {
        let record = SalesRecord::new(
            self.amount_sold,
            self.target,
            self.seniority.parse()?,
            self.category.parse()?,
        );
        record.validate()?;
        Ok(record)
    }
}

/// Report row: the input plus the derived columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionedRecord {
    pub salesperson: String,
    pub amount_sold: f64,
    pub target: f64,
    pub seniority: Seniority,
    pub category: ProductCategory,
    pub met_target: bool,
    #[serde(serialize_with = "serialize_rate")]
    pub commission_rate: f64,
    #[serde(serialize_with = "serialize_money")]
    pub commission: f64,
}

pub const REPORT_HEADERS: [&str; 8] = [
    "salesperson",
    "amount_sold",
    "target",
    "seniority",
    "category",
    "met_target",
    "commission_rate",
    "commission",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    pub line: u64,
    pub salesperson: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct RawBatch {
    pub rows: Vec<SalesRow>,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    pub record_count: usize,
    pub rejected_count: usize,
    #[serde(serialize_with = "serialize_money")]
    pub total_sales: f64,
    #[serde(serialize_with = "serialize_money")]
    pub total_commission: f64,
    pub met_target_count: usize,
    pub met_target_percent: f64,
    pub zero_target_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl SalesSummary {
    pub fn from_records(records: &[CommissionedRecord], rejected_count: usize) -> Self {
        let met_target_count = records.iter().filter(|r| r.met_target).count();
        let met_target_percent = if records.is_empty() {
            0.0
        } else {
            met_target_count as f64 / records.len() as f64 * 100.0
        };

        Self {
            record_count: records.len(),
            rejected_count,
            total_sales: records.iter().map(|r| r.amount_sold).sum(),
            total_commission: records.iter().map(|r| r.commission).sum(),
            met_target_count,
            met_target_percent,
            zero_target_count: records.iter().filter(|r| r.target == 0.0).count(),
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<CommissionedRecord>,
    pub rejected: Vec<RejectedRow>,
    pub summary: SalesSummary,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn serialize_rate<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 4))
}

fn serialize_money<S: Serializer>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seniority_labels() {
        assert_eq!("Senior".parse::<Seniority>().unwrap(), Seniority::Senior);
        assert_eq!(" junior ".parse::<Seniority>().unwrap(), Seniority::Junior);
        assert_eq!("Pleno".parse::<Seniority>().unwrap(), Seniority::Mid);
        assert_eq!("MID".parse::<Seniority>().unwrap(), Seniority::Mid);

        let err = "Intern".parse::<Seniority>().unwrap_err();
        assert!(matches!(err, EtlError::InvalidInput { ref field, .. } if field == "seniority"));
    }

    #[test]
    fn test_parse_category_labels() {
        assert_eq!("premium".parse::<ProductCategory>().unwrap(), ProductCategory::Premium);
        assert_eq!("Standard".parse::<ProductCategory>().unwrap(), ProductCategory::Standard);
        assert!("Luxury".parse::<ProductCategory>().is_err());
        assert!("".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn test_sales_record_validation() {
        let ok = SalesRecord::new(0.0, 0.0, Seniority::Junior, ProductCategory::Standard);
        assert!(ok.validate().is_ok());

        let negative_amount = SalesRecord::new(-1.0, 10.0, Seniority::Junior, ProductCategory::Standard);
        assert!(matches!(
            negative_amount.validate(),
            Err(EtlError::InvalidInput { ref field, .. }) if field == "amount_sold"
        ));

        let negative_target = SalesRecord::new(10.0, -0.5, Seniority::Mid, ProductCategory::Premium);
        assert!(matches!(
            negative_target.validate(),
            Err(EtlError::InvalidInput { ref field, .. }) if field == "target"
        ));

        let nan = SalesRecord::new(f64::NAN, 10.0, Seniority::Mid, ProductCategory::Premium);
        assert!(nan.validate().is_err());

        let infinite = SalesRecord::new(10.0, f64::INFINITY, Seniority::Mid, ProductCategory::Premium);
        assert!(infinite.validate().is_err());
    }

    #[test]
    fn test_row_to_record_rejects_unknown_labels() {
        let row = SalesRow::new("Ana", 100.0, 50.0, "Director", "Premium");
        assert!(row.to_record().is_err());

        let row = SalesRow::new("Ana", 100.0, 50.0, "Senior", "Gold");
        assert!(row.to_record().is_err());

        let row = SalesRow::new("Ana", 100.0, 50.0, "Senior", "Premium");
        let record = row.to_record().unwrap();
        assert_eq!(record.seniority, Seniority::Senior);
        assert_eq!(record.category, ProductCategory::Premium);
        assert!(record.met_target());
    }

    #[test]
    fn test_summary_totals() {
        let records = vec![
            CommissionedRecord {
                salesperson: "Ana".to_string(),
                amount_sold: 100.0,
                target: 50.0,
                seniority: Seniority::Senior,
                category: ProductCategory::Standard,
                met_target: true,
                commission_rate: 0.2,
                commission: 20.0,
            },
            CommissionedRecord {
                salesperson: "Bruno".to_string(),
                amount_sold: 40.0,
                target: 0.0,
                seniority: Seniority::Junior,
                category: ProductCategory::Standard,
                met_target: true,
                commission_rate: 0.15,
                commission: 6.0,
            },
            CommissionedRecord {
                salesperson: "Carlos".to_string(),
                amount_sold: 10.0,
                target: 50.0,
                seniority: Seniority::Junior,
                category: ProductCategory::Standard,
                met_target: false,
                commission_rate: 0.0,
                commission: 0.0,
            },
            CommissionedRecord {
                salesperson: "Diana".to_string(),
                amount_sold: 50.0,
                target: 100.0,
                seniority: Seniority::Mid,
                category: ProductCategory::Premium,
                met_target: false,
                commission_rate: 0.0,
                commission: 0.0,
            },
        ];

        let summary = SalesSummary::from_records(&records, 1);
        assert_eq!(summary.record_count, 4);
        assert_eq!(summary.rejected_count, 1);
        assert_eq!(summary.total_sales, 200.0);
        assert_eq!(summary.total_commission, 26.0);
        assert_eq!(summary.met_target_count, 2);
        assert_eq!(summary.met_target_percent, 50.0);
        assert_eq!(summary.zero_target_count, 1);
    }

    #[test]
    fn test_empty_summary_has_zero_percent() {
        let summary = SalesSummary::from_records(&[], 0);
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.met_target_percent, 0.0);
        assert_eq!(summary.total_commission, 0.0);
    }
}
