//! Tiered commission policy.
//!
//! Evaluation order is fixed:
//!
//! 1. base rate from how far `amount_sold` got relative to `target`
//! 2. additive seniority bonus, only when the target was met
//! 3. category multiplier over the combined (base + bonus) rate
//!
//! `commission = amount_sold * final_rate`.

use crate::domain::model::{ProductCategory, SalesRecord, Seniority};
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EXCEED_FACTOR: f64 = 1.2;
pub const DEFAULT_EXCEED_RATE: f64 = 0.15;
pub const DEFAULT_MET_RATE: f64 = 0.10;
pub const DEFAULT_SENIOR_BONUS: f64 = 0.05;
pub const DEFAULT_PREMIUM_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionPolicy {
    /// `amount_sold >= target * exceed_factor` earns `exceed_rate`.
    pub exceed_factor: f64,
    pub exceed_rate: f64,
    /// `amount_sold >= target` earns `met_rate`.
    pub met_rate: f64,
    pub senior_bonus: f64,
    pub premium_multiplier: f64,
}

impl Default for CommissionPolicy {
    fn default() -> Self {
        Self {
            exceed_factor: DEFAULT_EXCEED_FACTOR,
            exceed_rate: DEFAULT_EXCEED_RATE,
            met_rate: DEFAULT_MET_RATE,
            senior_bonus: DEFAULT_SENIOR_BONUS,
            premium_multiplier: DEFAULT_PREMIUM_MULTIPLIER,
        }
    }
}

/// Every intermediate value of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommissionBreakdown {
    pub base_rate: f64,
    pub bonus_rate: f64,
    pub multiplier: f64,
    pub final_rate: f64,
    pub commission: f64,
}

impl CommissionPolicy {
    pub fn base_rate(&self, record: &SalesRecord) -> f64 {
        if record.amount_sold >= record.target * self.exceed_factor {
            self.exceed_rate
        } else if record.met_target() {
            self.met_rate
        } else {
            0.0
        }
    }

    pub fn bonus_rate(&self, record: &SalesRecord) -> f64 {
        if record.seniority == Seniority::Senior && record.met_target() {
            self.senior_bonus
        } else {
            0.0
        }
    }

    pub fn multiplier(&self, category: ProductCategory) -> f64 {
        match category {
            ProductCategory::Premium => self.premium_multiplier,
            ProductCategory::Standard => 1.0,
        }
    }

    pub fn breakdown(&self, record: &SalesRecord) -> Result<CommissionBreakdown> {
        record.validate()?;

        let base_rate = self.base_rate(record);
        let bonus_rate = self.bonus_rate(record);
        let multiplier = self.multiplier(record.category);
        let final_rate = (base_rate + bonus_rate) * multiplier;

        Ok(CommissionBreakdown {
            base_rate,
            bonus_rate,
            multiplier,
            final_rate,
            commission: record.amount_sold * final_rate,
        })
    }

    pub fn compute(&self, record: &SalesRecord) -> Result<f64> {
        self.breakdown(record).map(|b| b.commission)
    }
}

impl Validate for CommissionPolicy {
    fn validate(&self) -> Result<()> {
        validate_range("policy.exceed_factor", self.exceed_factor, 1.0, 10.0)?;
        validate_range("policy.exceed_rate", self.exceed_rate, 0.0, 1.0)?;
        validate_range("policy.met_rate", self.met_rate, 0.0, 1.0)?;
        validate_range("policy.senior_bonus", self.senior_bonus, 0.0, 1.0)?;
        validate_range("policy.premium_multiplier", self.premium_multiplier, 0.0, 10.0)?;
        Ok(())
    }
}

/// Commission under the standard policy.
pub fn compute_commission(record: &SalesRecord) -> Result<f64> {
    CommissionPolicy::default().compute(record)
}
