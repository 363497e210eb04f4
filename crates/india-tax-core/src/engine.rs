//! A validated configuration bundled with every operation.

use crate::advance_tax::{compute_advance_tax_schedule, AdvanceTaxInput, AdvanceTaxSchedule};
use crate::assessment::{assess, AssessmentInput, AssessmentOutput};
use crate::capital_gains::{compute_capital_gains_tax, CapitalGainsInput, CapitalGainsResult};
use crate::config::TaxConfig;
use crate::deductions::{aggregate_deductions, AllowedDeductions, DeductionInput};
use crate::income_tax::comparison::{compare_regimes, ComparisonInput, RegimeComparison};
use crate::income_tax::regular::{compute_regular_tax, RegularTaxInput, TaxResult};
#[cfg(feature = "planning")]
use crate::planning::{find_tax_saving_opportunities, PlanningInput, TaxPlan};
use crate::types::ComputationOutput;
use crate::IndiaTaxResult;

/// Tax engine for one fiscal year.
///
/// The configuration is validated once on construction, so the operations
/// never see malformed slab or surcharge tables.
#[derive(Debug, Clone, Default)]
pub struct TaxEngine {
    config: TaxConfig,
}

impl TaxEngine {
    pub fn new(config: TaxConfig) -> IndiaTaxResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Engine for a built-in fiscal year label such as `"2024-25"`.
    pub fn for_fiscal_year(label: &str) -> IndiaTaxResult<Self> {
        Self::new(TaxConfig::for_fiscal_year(label)?)
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    pub fn regular_tax(&self, input: &RegularTaxInput) -> IndiaTaxResult<ComputationOutput<TaxResult>> {
        compute_regular_tax(&self.config, input)
    }

    pub fn compare(
        &self,
        input: &ComparisonInput,
    ) -> IndiaTaxResult<ComputationOutput<RegimeComparison>> {
        compare_regimes(&self.config, input)
    }

    pub fn capital_gains(
        &self,
        input: &CapitalGainsInput,
    ) -> IndiaTaxResult<ComputationOutput<CapitalGainsResult>> {
        compute_capital_gains_tax(&self.config, input)
    }

    pub fn advance_tax(
        &self,
        input: &AdvanceTaxInput,
    ) -> IndiaTaxResult<ComputationOutput<AdvanceTaxSchedule>> {
        compute_advance_tax_schedule(&self.config, input)
    }

    pub fn deductions(
        &self,
        input: &DeductionInput,
    ) -> IndiaTaxResult<ComputationOutput<AllowedDeductions>> {
        aggregate_deductions(&self.config, input)
    }

    #[cfg(feature = "planning")]
    pub fn plan(&self, input: &PlanningInput) -> IndiaTaxResult<ComputationOutput<TaxPlan>> {
        find_tax_saving_opportunities(&self.config, input)
    }

    pub fn assess(
        &self,
        input: &AssessmentInput,
    ) -> IndiaTaxResult<ComputationOutput<AssessmentOutput>> {
        assess(&self.config, input)
    }
}
