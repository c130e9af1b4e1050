//! Report formatting for computed metrics
//!
//! Everything here is presentation glue: period scaling of the daily
//! figures, Indian-style digit grouping and the printable summaries. None
//! of it feeds back into the calculation engine.

use std::fmt;

use crate::models::{PlantConfig, PlantMetrics};

/// Reporting horizon; monthly and annual figures scale the daily ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Monthly,
    Annual,
}

impl Period {
    /// Number of production days this period covers
    pub fn production_days(self, config: &PlantConfig) -> f64 {
        match self {
            Period::Daily => 1.0,
            Period::Monthly => config.production_days_per_month,
            Period::Annual => config.production_days_per_month * 12.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::Daily => "Daily",
            Period::Monthly => "Monthly",
            Period::Annual => "Annual",
        }
    }
}

/// Format a number with Indian digit grouping (12,34,56,789), rounded to
/// whole currency units
pub fn format_inr(n: f64) -> String {
    let negative = n < 0.0;
    let mut digits = format!("{:.0}", n.abs());
    // "-0" guard: rounding a tiny negative to zero drops the sign
    if digits == "0" {
        return "0".to_string();
    }

    let grouped = if digits.len() > 3 {
        let last_three = digits.split_off(digits.len() - 3);
        // Remaining leading digits group in pairs from the right
        let mut groups = Vec::new();
        let mut end = digits.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(digits[start..end].to_string());
            end = start;
        }
        groups.reverse();
        format!("{},{}", groups.join(","), last_three)
    } else {
        digits
    };

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format a value in crores (1 Cr = 1e7)
pub fn format_cr(n: f64) -> String {
    format!("Rs {:.2} Cr", n / 1e7)
}

/// Full P&L statement scaled to one reporting period
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodStatement {
    pub period_label: &'static str,
    pub seed_input_mt: f64,
    pub oil_blend_mt: f64,
    pub expeller_separate_mt: f64,
    pub enhanced_moc_mt: f64,
    pub revenue: f64,
    pub cogs: f64,
    pub gross_margin: f64,
    pub processing_cost: f64,
    pub contribution_margin: f64,
    pub variable_cost: f64,
    pub fixed_expenses: f64,
    pub ebitda: f64,
    pub depreciation: f64,
    pub interest: f64,
    pub pbt: f64,
    pub tax: f64,
    pub pat: f64,
}

/// Scale the daily metrics to the chosen period.
///
/// Depreciation and interest are spread per production day before scaling;
/// PBT, tax and PAT are re-derived at this granularity so the tax clamp
/// applies per period.
pub fn period_statement(
    config: &PlantConfig,
    metrics: &PlantMetrics,
    period: Period,
) -> PeriodStatement {
    let days = period.production_days(config);

    let ebitda = metrics.daily_ebitda * days;
    let depreciation = metrics.daily_depreciation * days;
    let interest = metrics.daily_interest * days;
    let pbt = ebitda - depreciation - interest;
    let tax = f64::max(0.0, pbt * (config.tax_rate_pct / 100.0));
    let pat = pbt - tax;

    PeriodStatement {
        period_label: period.label(),
        seed_input_mt: config.seed_input_mt * days,
        oil_blend_mt: metrics.final_oil_blend_mt * days,
        expeller_separate_mt: metrics.exp_oil_sold_separately_mt * days,
        enhanced_moc_mt: metrics.enhanced_moc_mt * days,
        revenue: metrics.daily_revenue * days,
        cogs: metrics.daily_cogs * days,
        gross_margin: metrics.daily_gm * days,
        processing_cost: metrics.daily_processing_cost * days,
        contribution_margin: metrics.daily_cm * days,
        variable_cost: metrics.daily_variable_cost * days,
        fixed_expenses: config.other_expenses_daily * days,
        ebitda,
        depreciation,
        interest,
        pbt,
        tax,
        pat,
    }
}

impl PeriodStatement {
    fn pct_of_revenue(&self, value: f64) -> f64 {
        if self.revenue != 0.0 {
            value / self.revenue * 100.0
        } else {
            0.0
        }
    }
}

impl fmt::Display for PeriodStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} P&L ===", self.period_label)?;
        writeln!(f, "Seed input:            {:.2} MT", self.seed_input_mt)?;
        writeln!(f, "Oil blend:             {:.2} MT", self.oil_blend_mt)?;
        writeln!(
            f,
            "Expeller (separate):   {:.2} MT",
            self.expeller_separate_mt
        )?;
        writeln!(f, "Enhanced MoC:          {:.2} MT", self.enhanced_moc_mt)?;
        writeln!(f)?;

        writeln!(f, "Revenue:               Rs {}", format_inr(self.revenue))?;
        writeln!(
            f,
            "COGS:                  Rs {} ({:.1}%)",
            format_inr(self.cogs),
            self.pct_of_revenue(self.cogs)
        )?;
        writeln!(
            f,
            "Gross margin:          Rs {} ({:.1}%)",
            format_inr(self.gross_margin),
            self.pct_of_revenue(self.gross_margin)
        )?;
        writeln!(
            f,
            "Processing cost:       Rs {}",
            format_inr(self.processing_cost)
        )?;
        writeln!(
            f,
            "Contribution margin:   Rs {} ({:.1}%)",
            format_inr(self.contribution_margin),
            self.pct_of_revenue(self.contribution_margin)
        )?;
        writeln!(
            f,
            "Other variable costs:  Rs {}",
            format_inr(self.variable_cost)
        )?;
        writeln!(
            f,
            "Fixed expenses:        Rs {}",
            format_inr(self.fixed_expenses)
        )?;
        writeln!(
            f,
            "EBITDA:                Rs {} ({:.1}%)",
            format_inr(self.ebitda),
            self.pct_of_revenue(self.ebitda)
        )?;
        writeln!(
            f,
            "Depreciation:          Rs {}",
            format_inr(self.depreciation)
        )?;
        writeln!(f, "Interest:              Rs {}", format_inr(self.interest))?;
        writeln!(
            f,
            "PBT:                   Rs {} ({:.1}%)",
            format_inr(self.pbt),
            self.pct_of_revenue(self.pbt)
        )?;
        writeln!(f, "Tax:                   Rs {}", format_inr(self.tax))?;
        writeln!(
            f,
            "PAT:                   Rs {} ({:.1}%)",
            format_inr(self.pat),
            self.pct_of_revenue(self.pat)
        )?;

        Ok(())
    }
}

/// Working capital, ROCE and synergy summary (period independent)
#[derive(Debug)]
pub struct CapitalSummary<'a> {
    metrics: &'a PlantMetrics,
}

impl<'a> CapitalSummary<'a> {
    pub fn new(metrics: &'a PlantMetrics) -> Self {
        Self { metrics }
    }
}

impl fmt::Display for CapitalSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.metrics;

        writeln!(f, "=== Working Capital ===")?;
        writeln!(f, "Inventory (RM + FG):   {}", format_cr(m.total_inventory))?;
        writeln!(f, "Debtors (oil + MoC):   {}", format_cr(m.total_debtors))?;
        writeln!(f, "Trade creditors:       {}", format_cr(m.trade_creditors))?;
        writeln!(
            f,
            "Financed RM hoard:     {}",
            format_cr(m.financed_rm_hoard_value)
        )?;
        writeln!(
            f,
            "Net WC requirement:    {}",
            format_cr(m.net_wc_requirement)
        )?;
        writeln!(f)?;

        writeln!(f, "=== Return on Capital Employed ===")?;
        writeln!(f, "Capital employed:      {}", format_cr(m.capital_employed))?;
        writeln!(f, "ROCE (PAT basis):      {:.2}%", m.roce_pat)?;
        writeln!(f, "ROCE (EBITDA basis):   {:.2}%", m.roce_ebitda)?;
        writeln!(
            f,
            "  with Solvex synergy: {:.2}% / {:.2}%",
            m.roce_pat_with_synergy, m.roce_ebitda_with_synergy
        )?;
        writeln!(f)?;

        writeln!(f, "=== Solvex Synergy Savings (daily) ===")?;
        writeln!(
            f,
            "MoC consumed in-house: {:.2} MT",
            m.moc_consumed_inhouse_mt
        )?;
        writeln!(
            f,
            "Logistics:             Rs {}",
            format_inr(m.daily_logistics_saving)
        )?;
        writeln!(
            f,
            "Labor:                 Rs {}",
            format_inr(m.daily_labor_saving)
        )?;
        writeln!(
            f,
            "Brokerage:             Rs {}",
            format_inr(m.daily_brokerage_saving)
        )?;
        writeln!(
            f,
            "Total:                 Rs {}",
            format_inr(m.daily_solvex_saving)
        )?;

        Ok(())
    }
}
