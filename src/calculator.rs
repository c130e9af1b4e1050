//! Financial calculation engine
//!
//! One pure function from a [`PlantConfig`] to a [`PlantMetrics`]: yield
//! split, pungency compliance rule, margin waterfall, working capital,
//! financing and ROCE. Total over all numeric inputs; every division guards
//! its denominator and substitutes zero instead of raising.

use crate::models::{PlantConfig, PlantMetrics, PungencyAdvice, PungencyCategory};
use crate::report::format_inr;

/// Minimum blend pungency required for market compliance
pub const TARGET_PUNGENCY: f64 = 0.27;

/// Compute every derived metric for one configuration.
///
/// Stateless and side-effect free; concurrent calls with different configs
/// are trivially safe. Out-of-domain inputs (negative prices, yields summing
/// past 100%) produce arithmetically consistent results without clamping,
/// except at the two adjustment quantities and at tax.
pub fn compute_metrics(c: &PlantConfig) -> PlantMetrics {
    // --- Yield split ---
    let kachi_ghani_yield = c.kachi_ghani_yield_pct / 100.0;
    let expeller_yield = c.expeller_yield_pct / 100.0;
    let moc_base_yield = 1.0 - (kachi_ghani_yield + expeller_yield);

    let kachi_ghani_oil_mt = c.seed_input_mt * kachi_ghani_yield;
    let expeller_oil_mt = c.seed_input_mt * expeller_yield;
    let total_produced_oil_mt = kachi_ghani_oil_mt + expeller_oil_mt;

    let blend_pungency = if total_produced_oil_mt > 0.0 {
        (kachi_ghani_oil_mt * c.kachi_ghani_pungency
            + expeller_oil_mt * c.expeller_oil_pungency)
            / total_produced_oil_mt
    } else {
        0.0
    };

    // --- Pungency compliance rule ---
    let mut exp_oil_in_blend_mt = expeller_oil_mt;
    let mut exp_oil_sold_separately_mt = 0.0;
    let mut market_oil_to_add_mt = 0.0;

    let pungency = if blend_pungency < TARGET_PUNGENCY && total_produced_oil_mt > 0.0 {
        // Largest expeller volume that keeps the blend at exactly the target
        let denominator = TARGET_PUNGENCY - c.expeller_oil_pungency;
        exp_oil_in_blend_mt = if denominator != 0.0 {
            f64::max(
                0.0,
                kachi_ghani_oil_mt * (c.kachi_ghani_pungency - TARGET_PUNGENCY) / denominator,
            )
        } else {
            0.0
        };
        exp_oil_sold_separately_mt = expeller_oil_mt - exp_oil_in_blend_mt;
        let loss =
            exp_oil_sold_separately_mt * (c.oil_blend_sell_price - c.expeller_oil_sell_price);
        PungencyAdvice {
            category: PungencyCategory::Deficit,
            adjustment_mt: exp_oil_sold_separately_mt,
            daily_gain_loss: -loss,
            message: format!(
                "Pungency low ({blend_pungency:.2}): reduce expeller oil in blend to \
                 {exp_oil_in_blend_mt:.2} MT and sell {exp_oil_sold_separately_mt:.2} MT \
                 separately. Est. daily opportunity loss: Rs {}.",
                format_inr(loss.abs())
            ),
        }
    } else if blend_pungency > TARGET_PUNGENCY && total_produced_oil_mt > 0.0 {
        // Zero-pungency market oil dilutes the blend down to the target
        market_oil_to_add_mt = f64::max(
            0.0,
            (kachi_ghani_oil_mt * c.kachi_ghani_pungency
                + expeller_oil_mt * c.expeller_oil_pungency)
                / TARGET_PUNGENCY
                - total_produced_oil_mt,
        );
        let profit = market_oil_to_add_mt * (c.oil_blend_sell_price - c.market_bought_oil_price);
        PungencyAdvice {
            category: PungencyCategory::Surplus,
            adjustment_mt: market_oil_to_add_mt,
            daily_gain_loss: profit,
            message: format!(
                "Pungency high ({blend_pungency:.2}): add {market_oil_to_add_mt:.2} MT of \
                 market oil to optimize. Est. daily profit opportunity: Rs {}.",
                format_inr(profit)
            ),
        }
    } else {
        PungencyAdvice {
            category: PungencyCategory::Compliant,
            adjustment_mt: 0.0,
            daily_gain_loss: 0.0,
            message: format!("Pungency compliant ({blend_pungency:.2}): no action needed."),
        }
    };

    // --- Final blended volumes ---
    let final_oil_blend_mt = kachi_ghani_oil_mt + exp_oil_in_blend_mt + market_oil_to_add_mt;
    let water_added_mt = c.seed_input_mt * (c.water_added_pct / 100.0);
    let salt_added_mt = c.seed_input_mt * (c.salt_added_pct / 100.0);
    let enhanced_moc_mt = c.seed_input_mt * moc_base_yield + water_added_mt + salt_added_mt;

    // --- Revenue and COGS ---
    let daily_revenue_oil_blend = final_oil_blend_mt * c.oil_blend_sell_price;
    let daily_revenue_expeller = exp_oil_sold_separately_mt * c.expeller_oil_sell_price;
    let daily_revenue_moc = enhanced_moc_mt * c.moc_sell_price;
    let daily_revenue = daily_revenue_oil_blend + daily_revenue_expeller + daily_revenue_moc;

    let cost_seed = c.seed_input_mt * c.seed_purchase_price;
    let cost_market_oil = market_oil_to_add_mt * c.market_bought_oil_price;
    // Additive quantities are in MT; costs are per kg
    let cost_moc_enhancement = water_added_mt * 1000.0 * c.water_cost_per_kg
        + salt_added_mt * 1000.0 * c.salt_cost_per_kg;
    let daily_cogs = cost_seed + cost_market_oil + cost_moc_enhancement;

    // --- Margin waterfall ---
    let daily_gm = daily_revenue - daily_cogs;
    let daily_processing_cost = c.seed_input_mt * c.processing_cost_per_mt;
    let daily_cm = daily_gm - daily_processing_cost;
    let daily_variable_cost = c.seed_input_mt * c.other_variable_costs_per_mt;
    let daily_ebitda = daily_cm - daily_variable_cost - c.other_expenses_daily;

    // --- Working capital ---
    let monthly_seed_consumption = c.seed_input_mt * c.production_days_per_month;
    let rm_hoarded_value = monthly_seed_consumption * c.rm_hoard_months * c.hoarded_rm_rate;
    let rm_safety_stock_value = c.seed_input_mt * c.rm_safety_stock_days * c.seed_purchase_price;
    let inventory_rm = rm_hoarded_value + rm_safety_stock_value;

    let total_daily_oil_revenue = daily_revenue_oil_blend + daily_revenue_expeller;
    let total_daily_oil_qty = final_oil_blend_mt + exp_oil_sold_separately_mt;
    let avg_oil_price = if total_daily_oil_qty > 0.0 {
        total_daily_oil_revenue / total_daily_oil_qty
    } else {
        0.0
    };
    let fg_oil_inventory_value = total_daily_oil_qty * avg_oil_price * c.fg_oil_safety_days;
    let fg_moc_inventory_value = enhanced_moc_mt * c.moc_sell_price * c.fg_moc_safety_days;
    let inventory_fg = fg_oil_inventory_value + fg_moc_inventory_value;
    let total_inventory = inventory_rm + inventory_fg;

    let debtors_oil = total_daily_oil_revenue * c.oil_debtor_days;
    let debtors_moc = daily_revenue_moc * c.moc_debtor_days;
    let total_debtors = debtors_oil + debtors_moc;
    let trade_creditors = c.seed_input_mt * c.seed_purchase_price * c.creditor_days;

    let financed_rm_hoard_value = rm_hoarded_value * (c.rm_hoard_financed_pct / 100.0);
    let gross_working_capital = total_inventory + total_debtors - trade_creditors;
    let net_wc_requirement = gross_working_capital - financed_rm_hoard_value;

    // --- Annualization and financing ---
    let annual_production_days = c.production_days_per_month * 12.0;
    let annual_ebitda = daily_ebitda * annual_production_days;

    let interest_on_hoard = financed_rm_hoard_value * (c.warehouse_finance_rate_pa / 100.0);
    let interest_on_main_capital =
        (net_wc_requirement + c.capex) * (c.main_financing_rate_pa / 100.0);
    let annual_interest = interest_on_hoard + interest_on_main_capital;

    let annual_depreciation = if c.depreciation_years > 0.0 {
        c.capex / c.depreciation_years
    } else {
        0.0
    };

    let annual_pbt = annual_ebitda - annual_depreciation - annual_interest;
    // Losses are never taxed
    let annual_tax = f64::max(0.0, annual_pbt * (c.tax_rate_pct / 100.0));
    let annual_pat = annual_pbt - annual_tax;

    // --- Daily financing view ---
    let daily_depreciation = if annual_production_days > 0.0 {
        annual_depreciation / annual_production_days
    } else {
        0.0
    };
    let daily_interest = if annual_production_days > 0.0 {
        annual_interest / annual_production_days
    } else {
        0.0
    };
    let daily_pbt = daily_ebitda - daily_depreciation - daily_interest;
    let daily_tax = f64::max(0.0, daily_pbt * (c.tax_rate_pct / 100.0));
    let daily_pat = daily_pbt - daily_tax;

    // --- Return on capital employed ---
    let capital_employed = c.capex + net_wc_requirement + c.other_assets;
    let roce = |numerator: f64| {
        if capital_employed != 0.0 {
            numerator / capital_employed * 100.0
        } else {
            0.0
        }
    };
    let roce_pat = roce(annual_pat);
    let roce_ebitda = roce(annual_ebitda);

    // --- Solvex synergy savings ---
    let moc_consumed_inhouse_mt = enhanced_moc_mt * (c.moc_consumed_pct / 100.0);
    let daily_logistics_saving = moc_consumed_inhouse_mt * c.logistics_saved_per_ton;
    let daily_labor_saving = c.labor_saved_headcount * c.labor_cost_per_head_daily;
    let daily_brokerage_saving = moc_consumed_inhouse_mt * c.brokerage_saved_per_ton;
    let daily_solvex_saving = daily_logistics_saving + daily_labor_saving + daily_brokerage_saving;
    let annual_solvex_saving = daily_solvex_saving * annual_production_days;

    let roce_pat_with_synergy = roce(annual_pat + annual_solvex_saving);
    let roce_ebitda_with_synergy = roce(annual_ebitda + annual_solvex_saving);

    PlantMetrics {
        kachi_ghani_oil_mt,
        expeller_oil_mt,
        total_produced_oil_mt,
        moc_base_yield,
        blend_pungency,
        pungency,
        exp_oil_in_blend_mt,
        exp_oil_sold_separately_mt,
        market_oil_to_add_mt,
        final_oil_blend_mt,
        water_added_mt,
        salt_added_mt,
        enhanced_moc_mt,
        daily_revenue_oil_blend,
        daily_revenue_expeller,
        daily_revenue_moc,
        daily_revenue,
        cost_seed,
        cost_market_oil,
        cost_moc_enhancement,
        daily_cogs,
        daily_gm,
        daily_processing_cost,
        daily_cm,
        daily_variable_cost,
        daily_ebitda,
        daily_depreciation,
        daily_interest,
        daily_pbt,
        daily_tax,
        daily_pat,
        rm_hoarded_value,
        rm_safety_stock_value,
        inventory_rm,
        fg_oil_inventory_value,
        fg_moc_inventory_value,
        inventory_fg,
        total_inventory,
        debtors_oil,
        debtors_moc,
        total_debtors,
        trade_creditors,
        gross_working_capital,
        financed_rm_hoard_value,
        net_wc_requirement,
        annual_production_days,
        annual_ebitda,
        annual_depreciation,
        interest_on_hoard,
        interest_on_main_capital,
        annual_interest,
        annual_pbt,
        annual_tax,
        annual_pat,
        capital_employed,
        roce_pat,
        roce_ebitda,
        roce_pat_with_synergy,
        roce_ebitda_with_synergy,
        moc_consumed_inhouse_mt,
        daily_logistics_saving,
        daily_labor_saving,
        daily_brokerage_saving,
        daily_solvex_saving,
        annual_solvex_saving,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlantConfig;

    const TOL: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64, what: &str) {
        assert!(
            (actual - expected).abs() < TOL,
            "{what}: expected {expected}, got {actual}"
        );
    }

    #[test]
    fn surplus_scenario_adds_market_oil() {
        // 200 MT seed at 18%/15% yields and 0.40/0.12 pungencies
        let config = PlantConfig::default();
        let m = compute_metrics(&config);

        assert_close(m.kachi_ghani_oil_mt, 36.0, "kachi ghani oil");
        assert_close(m.expeller_oil_mt, 30.0, "expeller oil");
        assert_close(m.blend_pungency, 18.0 / 66.0, "blend pungency");
        assert_eq!(m.pungency.category, PungencyCategory::Surplus);

        // (36*0.40 + 30*0.12)/0.27 - 66
        let expected_market_oil = 18.0 / 0.27 - 66.0;
        assert_close(m.market_oil_to_add_mt, expected_market_oil, "market oil");
        assert_close(m.pungency.adjustment_mt, expected_market_oil, "adjustment");
        assert_close(
            m.pungency.daily_gain_loss,
            expected_market_oil
                * (config.oil_blend_sell_price - config.market_bought_oil_price),
            "opportunity gain",
        );
        assert_close(
            m.final_oil_blend_mt,
            66.0 + expected_market_oil,
            "final blend",
        );
        assert!(m.pungency.daily_gain_loss > 0.0);
    }

    #[test]
    fn deficit_scenario_diverts_all_expeller_when_unsolvable() {
        let mut config = PlantConfig::default();
        config.kachi_ghani_pungency = 0.20;
        let m = compute_metrics(&config);

        assert_close(m.blend_pungency, 10.8 / 66.0, "blend pungency");
        assert_eq!(m.pungency.category, PungencyCategory::Deficit);

        // 36*(0.20-0.27)/(0.27-0.12) is negative, so the solvable volume
        // clamps to zero and the entire expeller stream sells separately
        assert_close(m.exp_oil_in_blend_mt, 0.0, "expeller in blend");
        assert_close(m.exp_oil_sold_separately_mt, 30.0, "expeller sold separately");
        assert_close(
            m.pungency.daily_gain_loss,
            -30.0 * (config.oil_blend_sell_price - config.expeller_oil_sell_price),
            "opportunity loss",
        );
        assert!(m.pungency.daily_gain_loss < 0.0);
    }

    #[test]
    fn deficit_adjustment_restores_target_pungency() {
        let mut config = PlantConfig::default();
        config.kachi_ghani_pungency = 0.30;
        let m = compute_metrics(&config);

        assert_eq!(m.pungency.category, PungencyCategory::Deficit);
        // 36*(0.30-0.27)/(0.27-0.12) = 7.2 MT stays in the blend
        assert_close(m.exp_oil_in_blend_mt, 7.2, "expeller in blend");

        let final_pungency = (m.kachi_ghani_oil_mt * config.kachi_ghani_pungency
            + m.exp_oil_in_blend_mt * config.expeller_oil_pungency)
            / m.final_oil_blend_mt;
        assert_close(final_pungency, TARGET_PUNGENCY, "restored pungency");
    }

    #[test]
    fn surplus_adjustment_restores_target_pungency() {
        let config = PlantConfig::default();
        let m = compute_metrics(&config);

        assert_eq!(m.pungency.category, PungencyCategory::Surplus);
        // Market oil carries zero pungency
        let final_pungency = (m.kachi_ghani_oil_mt * config.kachi_ghani_pungency
            + m.expeller_oil_mt * config.expeller_oil_pungency)
            / m.final_oil_blend_mt;
        assert_close(final_pungency, TARGET_PUNGENCY, "restored pungency");
    }

    #[test]
    fn expeller_pungency_at_target_solves_to_zero_blend_volume() {
        let mut config = PlantConfig::default();
        config.kachi_ghani_pungency = 0.10;
        config.expeller_oil_pungency = TARGET_PUNGENCY;
        let m = compute_metrics(&config);

        assert_eq!(m.pungency.category, PungencyCategory::Deficit);
        assert_close(m.exp_oil_in_blend_mt, 0.0, "expeller in blend");
        assert_close(m.exp_oil_sold_separately_mt, 30.0, "expeller sold separately");
    }

    #[test]
    fn zero_oil_is_compliant_with_only_moc_revenue() {
        let mut config = PlantConfig::default();
        config.kachi_ghani_yield_pct = 0.0;
        config.expeller_yield_pct = 0.0;
        let m = compute_metrics(&config);

        assert_eq!(m.pungency.category, PungencyCategory::Compliant);
        assert_close(m.pungency.adjustment_mt, 0.0, "adjustment");
        assert_close(m.pungency.daily_gain_loss, 0.0, "gain/loss");
        assert_close(m.blend_pungency, 0.0, "blend pungency");
        assert_close(m.daily_revenue_oil_blend, 0.0, "blend revenue");
        assert_close(m.daily_revenue_expeller, 0.0, "expeller revenue");

        // All seed mass lands in the meal stream
        let expected_moc = 200.0 * 1.0 + 4.0 + 6.0;
        assert_close(m.enhanced_moc_mt, expected_moc, "enhanced MoC");
        assert_close(
            m.daily_revenue,
            expected_moc * config.moc_sell_price,
            "revenue is MoC only",
        );
    }

    #[test]
    fn zero_seed_input_is_degenerate_but_finite() {
        let mut config = PlantConfig::default();
        config.seed_input_mt = 0.0;
        let m = compute_metrics(&config);

        assert_eq!(m.pungency.category, PungencyCategory::Compliant);
        assert_close(m.daily_revenue, 0.0, "revenue");
        assert_close(m.daily_cogs, 0.0, "cogs");
        assert_close(m.daily_gm, 0.0, "gm");
        // Fixed expenses still bite at zero throughput
        assert_close(m.daily_ebitda, -config.other_expenses_daily, "ebitda");
        assert!(m.annual_pbt < 0.0, "expected loss: {}", m.annual_pbt);
        assert_close(m.annual_tax, 0.0, "tax");
        assert!(m.daily_pbt.is_finite() && m.roce_pat.is_finite());
    }

    #[test]
    fn tax_never_negative_on_losses() {
        let mut config = PlantConfig::default();
        config.other_expenses_daily = 1e9;
        let m = compute_metrics(&config);

        assert!(m.annual_pbt < 0.0);
        assert_close(m.annual_tax, 0.0, "annual tax");
        assert_close(m.annual_pat, m.annual_pbt, "pat equals pbt on loss");
        assert_close(m.daily_tax, 0.0, "daily tax");
    }

    #[test]
    fn zero_capital_employed_yields_zero_roce() {
        let mut config = PlantConfig::default();
        config.seed_input_mt = 0.0;
        config.capex = 0.0;
        config.other_assets = 0.0;
        let m = compute_metrics(&config);

        assert_close(m.capital_employed, 0.0, "capital employed");
        assert_close(m.roce_pat, 0.0, "roce pat");
        assert_close(m.roce_ebitda, 0.0, "roce ebitda");
        assert_close(m.roce_pat_with_synergy, 0.0, "roce pat synergy");
        assert_close(m.roce_ebitda_with_synergy, 0.0, "roce ebitda synergy");
    }

    #[test]
    fn revenue_and_cogs_scale_linearly_with_seed_input() {
        let base = PlantConfig::default();
        let mut doubled = base.clone();
        doubled.seed_input_mt *= 2.0;

        let m1 = compute_metrics(&base);
        let m2 = compute_metrics(&doubled);

        assert_close(m2.daily_revenue, 2.0 * m1.daily_revenue, "revenue");
        assert_close(m2.daily_cogs, 2.0 * m1.daily_cogs, "cogs");
        assert_close(
            m2.daily_processing_cost,
            2.0 * m1.daily_processing_cost,
            "processing cost",
        );
        assert_close(
            m2.daily_variable_cost,
            2.0 * m1.daily_variable_cost,
            "variable cost",
        );
        // Depreciation depends only on capex
        assert_close(
            m2.annual_depreciation,
            m1.annual_depreciation,
            "depreciation invariant",
        );
    }

    #[test]
    fn depreciation_guard_at_zero_years() {
        let mut config = PlantConfig::default();
        config.depreciation_years = 0.0;
        let m = compute_metrics(&config);
        assert_close(m.annual_depreciation, 0.0, "depreciation");
    }

    #[test]
    fn negative_moc_base_yield_propagates_unclamped() {
        let mut config = PlantConfig::default();
        config.kachi_ghani_yield_pct = 60.0;
        config.expeller_yield_pct = 50.0;
        let m = compute_metrics(&config);
        assert!(m.moc_base_yield < 0.0);
        assert!(m.enhanced_moc_mt < 0.0);
    }

    #[test]
    fn split_rate_interest_matches_pools() {
        let config = PlantConfig::default();
        let m = compute_metrics(&config);

        assert_close(
            m.interest_on_hoard,
            m.financed_rm_hoard_value * config.warehouse_finance_rate_pa / 100.0,
            "hoard interest",
        );
        assert_close(
            m.interest_on_main_capital,
            (m.net_wc_requirement + config.capex) * config.main_financing_rate_pa / 100.0,
            "main interest",
        );
        assert_close(
            m.annual_interest,
            m.interest_on_hoard + m.interest_on_main_capital,
            "total interest",
        );
    }

    #[test]
    fn working_capital_components_add_up() {
        let config = PlantConfig::default();
        let m = compute_metrics(&config);

        assert_close(
            m.total_inventory,
            m.inventory_rm + m.inventory_fg,
            "inventory",
        );
        assert_close(
            m.gross_working_capital,
            m.total_inventory + m.total_debtors - m.trade_creditors,
            "gross wc",
        );
        assert_close(
            m.net_wc_requirement,
            m.gross_working_capital - m.financed_rm_hoard_value,
            "net wc",
        );
        assert_close(
            m.financed_rm_hoard_value,
            m.rm_hoarded_value * 0.80,
            "financed hoard",
        );
    }

    #[test]
    fn synergy_roce_adds_annualized_savings_to_numerator() {
        let config = PlantConfig::default();
        let m = compute_metrics(&config);

        assert_close(
            m.daily_solvex_saving,
            m.daily_logistics_saving + m.daily_labor_saving + m.daily_brokerage_saving,
            "daily saving",
        );
        assert_close(
            m.annual_solvex_saving,
            m.daily_solvex_saving * m.annual_production_days,
            "annual saving",
        );
        assert_close(
            m.roce_pat_with_synergy,
            (m.annual_pat + m.annual_solvex_saving) / m.capital_employed * 100.0,
            "synergy roce",
        );
        assert!(m.roce_pat_with_synergy > m.roce_pat);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let config = PlantConfig::default();
        assert_eq!(compute_metrics(&config), compute_metrics(&config));
    }
}
