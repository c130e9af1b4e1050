//! Data models for plant configuration and derived metrics

use std::fmt;

use thiserror::Error;

/// Error raised by by-name parameter access on [`PlantConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
}

/// Name, default value and description of one configuration parameter
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub default: f64,
    pub description: &'static str,
}

macro_rules! plant_config {
    ($($field:ident: $default:expr, $desc:expr;)+) => {
        /// Flat record of every business input to the calculation engine.
        ///
        /// All fields are plain numbers: quantities in MT, prices in Rs/MT,
        /// percentage fields in 0-100 (pungencies in 0-1), cycle lengths in
        /// days or months. The engine does not validate ranges; out-of-range
        /// values propagate arithmetically.
        #[derive(Debug, Clone, PartialEq)]
        pub struct PlantConfig {
            $(pub $field: f64,)+
        }

        impl Default for PlantConfig {
            fn default() -> Self {
                Self {
                    $($field: $default,)+
                }
            }
        }

        impl PlantConfig {
            /// Static table of every parameter with its default and description
            pub fn param_specs() -> &'static [ParamSpec] {
                &[
                    $(ParamSpec {
                        name: stringify!($field),
                        default: $default,
                        description: $desc,
                    },)+
                ]
            }

            /// Current (name, value) pairs in declaration order
            pub fn params(&self) -> Vec<(&'static str, f64)> {
                vec![$((stringify!($field), self.$field),)+]
            }

            /// Look up a parameter by name
            pub fn get(&self, name: &str) -> Result<f64, ConfigError> {
                match name {
                    $(stringify!($field) => Ok(self.$field),)+
                    _ => Err(ConfigError::UnknownParameter(name.to_string())),
                }
            }

            /// Set a parameter by name
            pub fn set(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
                match name {
                    $(stringify!($field) => {
                        self.$field = value;
                        Ok(())
                    })+
                    _ => Err(ConfigError::UnknownParameter(name.to_string())),
                }
            }
        }
    };
}

plant_config! {
    seed_input_mt: 200.0, "Daily seed input (MT)";
    kachi_ghani_yield_pct: 18.0, "Kachi Ghani oil yield (% of seeds)";
    expeller_yield_pct: 15.0, "Expeller oil yield (% of seeds)";
    seed_purchase_price: 57000.0, "Seed purchase price (Rs/MT)";
    oil_blend_sell_price: 138000.0, "Oil blend sell price (Rs/MT)";
    expeller_oil_sell_price: 135500.0, "Expeller oil standalone sell price (Rs/MT)";
    market_bought_oil_price: 133000.0, "Market-bought oil price (Rs/MT)";
    moc_sell_price: 22500.0, "Meal-of-cake sell price (Rs/MT)";
    kachi_ghani_pungency: 0.40, "Kachi Ghani oil pungency (0-1)";
    expeller_oil_pungency: 0.12, "Expeller oil pungency (0-1)";
    water_added_pct: 2.0, "Water added to MoC (% of seed input)";
    water_cost_per_kg: 1.0, "Water cost (Rs/kg)";
    salt_added_pct: 3.0, "Salt added to MoC (% of seed input)";
    salt_cost_per_kg: 5.0, "Salt cost (Rs/kg)";
    processing_cost_per_mt: 1300.0, "Processing cost (Rs/MT of seed)";
    other_variable_costs_per_mt: 2300.0, "Other variable costs (Rs/MT of seed)";
    other_expenses_daily: 50000.0, "Other fixed expenses (Rs/day)";
    production_days_per_month: 24.0, "Production days per month";
    capex: 170000000.0, "Capital expenditure (Rs)";
    depreciation_years: 8.0, "Depreciation period (years)";
    tax_rate_pct: 25.0, "Tax rate (%)";
    other_assets: 10000000.0, "Other assets (Rs)";
    warehouse_finance_rate_pa: 12.0, "Warehouse finance interest rate (% p.a.) on financed RM hoard";
    main_financing_rate_pa: 12.0, "Main financing interest rate (% p.a.) on capex and net WC";
    rm_hoard_financed_pct: 80.0, "Share of hoarded raw material that is externally financed (%)";
    rm_hoard_months: 6.0, "Raw material hoard (months of consumption)";
    hoarded_rm_rate: 57000.0, "Hoarded raw material rate (Rs/MT)";
    rm_safety_stock_days: 24.0, "Raw material safety stock (days)";
    fg_oil_safety_days: 15.0, "Finished goods oil safety stock (days)";
    fg_moc_safety_days: 5.0, "Finished goods MoC safety stock (days)";
    oil_debtor_days: 5.0, "Oil debtor cycle (days)";
    moc_debtor_days: 5.0, "MoC debtor cycle (days)";
    creditor_days: 15.0, "Creditor days on seed purchases";
    moc_consumed_pct: 70.0, "Share of MoC consumed in-house (%)";
    logistics_saved_per_ton: 500.0, "Logistics saved (Rs/ton of in-house MoC)";
    labor_saved_headcount: 10.0, "Labor headcount saved daily";
    labor_cost_per_head_daily: 700.0, "Cost per labor head (Rs/day)";
    brokerage_saved_per_ton: 150.0, "Brokerage saved (Rs/ton of in-house MoC)";
}

/// Which side of the 0.27 pungency target the raw blend falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PungencyCategory {
    /// Blend below target; excess expeller oil is routed to separate sales
    Deficit,
    /// Blend above target; zero-pungency market oil can be added
    Surplus,
    /// Blend exactly on target, or no oil produced
    Compliant,
}

impl fmt::Display for PungencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PungencyCategory::Deficit => "deficit",
            PungencyCategory::Surplus => "surplus",
            PungencyCategory::Compliant => "compliant",
        };
        f.write_str(s)
    }
}

/// Pungency compliance recommendation
#[derive(Debug, Clone, PartialEq)]
pub struct PungencyAdvice {
    pub category: PungencyCategory,
    /// MT of expeller oil diverted (deficit) or market oil added (surplus)
    pub adjustment_mt: f64,
    /// Signed daily opportunity value: negative for the deficit branch
    /// (forgone blend margin), positive for the surplus branch
    pub daily_gain_loss: f64,
    pub message: String,
}

/// Derived metrics record; recomputed in full on every engine call
#[derive(Debug, Clone, PartialEq)]
pub struct PlantMetrics {
    // Yield split
    pub kachi_ghani_oil_mt: f64,
    pub expeller_oil_mt: f64,
    pub total_produced_oil_mt: f64,
    /// Fraction of seed remaining as meal-of-cake; may go negative when
    /// yields sum past 100%
    pub moc_base_yield: f64,
    pub blend_pungency: f64,
    pub pungency: PungencyAdvice,

    // Final blended volumes
    pub exp_oil_in_blend_mt: f64,
    pub exp_oil_sold_separately_mt: f64,
    pub market_oil_to_add_mt: f64,
    pub final_oil_blend_mt: f64,
    pub water_added_mt: f64,
    pub salt_added_mt: f64,
    pub enhanced_moc_mt: f64,

    // Daily revenue and COGS
    pub daily_revenue_oil_blend: f64,
    pub daily_revenue_expeller: f64,
    pub daily_revenue_moc: f64,
    pub daily_revenue: f64,
    pub cost_seed: f64,
    pub cost_market_oil: f64,
    pub cost_moc_enhancement: f64,
    pub daily_cogs: f64,

    // Daily margin waterfall
    pub daily_gm: f64,
    pub daily_processing_cost: f64,
    pub daily_cm: f64,
    pub daily_variable_cost: f64,
    pub daily_ebitda: f64,
    pub daily_depreciation: f64,
    pub daily_interest: f64,
    pub daily_pbt: f64,
    pub daily_tax: f64,
    pub daily_pat: f64,

    // Working capital
    pub rm_hoarded_value: f64,
    pub rm_safety_stock_value: f64,
    pub inventory_rm: f64,
    pub fg_oil_inventory_value: f64,
    pub fg_moc_inventory_value: f64,
    pub inventory_fg: f64,
    pub total_inventory: f64,
    pub debtors_oil: f64,
    pub debtors_moc: f64,
    pub total_debtors: f64,
    pub trade_creditors: f64,
    pub gross_working_capital: f64,
    pub financed_rm_hoard_value: f64,
    pub net_wc_requirement: f64,

    // Annualization and financing
    pub annual_production_days: f64,
    pub annual_ebitda: f64,
    pub annual_depreciation: f64,
    pub interest_on_hoard: f64,
    pub interest_on_main_capital: f64,
    pub annual_interest: f64,
    pub annual_pbt: f64,
    pub annual_tax: f64,
    pub annual_pat: f64,

    // Return on capital employed
    pub capital_employed: f64,
    pub roce_pat: f64,
    pub roce_ebitda: f64,
    pub roce_pat_with_synergy: f64,
    pub roce_ebitda_with_synergy: f64,

    // Solvex synergy savings
    pub moc_consumed_inhouse_mt: f64,
    pub daily_logistics_saving: f64,
    pub daily_labor_saving: f64,
    pub daily_brokerage_saving: f64,
    pub daily_solvex_saving: f64,
    pub annual_solvex_saving: f64,
}
