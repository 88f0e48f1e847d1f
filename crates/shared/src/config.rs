//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Bookkeeping rules and posting accounts.
    #[serde(default)]
    pub ledger: LedgerSettings,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bookkeeping configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSettings {
    /// Allow item stock to go below zero.
    #[serde(default)]
    pub allow_negative_stock: bool,
    /// Accounts the transaction managers post to.
    #[serde(default)]
    pub accounts: PostingAccounts,
    /// Roots of the financial statements.
    #[serde(default)]
    pub chart: ChartLayout,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            allow_negative_stock: false,
            accounts: PostingAccounts::default(),
            chart: ChartLayout::default(),
        }
    }
}

/// Account codes used by the transaction managers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostingAccounts {
    /// Group whose leaves are treasuries (cash boxes, banks).
    #[serde(default = "default_treasury_group")]
    pub treasury_group: String,
    /// Treasury used when a cash document names none.
    #[serde(default = "default_treasury")]
    pub default_treasury: String,
    /// Customers control account.
    #[serde(default = "default_receivable")]
    pub receivable: String,
    /// Inventory control account.
    #[serde(default = "default_inventory")]
    pub inventory: String,
    /// Suppliers control account.
    #[serde(default = "default_payable")]
    pub payable: String,
    /// Sales revenue account.
    #[serde(default = "default_sales_revenue")]
    pub sales_revenue: String,
    /// Cost of goods sold account.
    #[serde(default = "default_cost_of_goods_sold")]
    pub cost_of_goods_sold: String,
}

fn default_treasury_group() -> String {
    "111".to_string()
}

fn default_treasury() -> String {
    "1111".to_string()
}

fn default_receivable() -> String {
    "112".to_string()
}

fn default_inventory() -> String {
    "113".to_string()
}

fn default_payable() -> String {
    "211".to_string()
}

fn default_sales_revenue() -> String {
    "411".to_string()
}

fn default_cost_of_goods_sold() -> String {
    "421".to_string()
}

impl Default for PostingAccounts {
    fn default() -> Self {
        Self {
            treasury_group: default_treasury_group(),
            default_treasury: default_treasury(),
            receivable: default_receivable(),
            inventory: default_inventory(),
            payable: default_payable(),
            sales_revenue: default_sales_revenue(),
            cost_of_goods_sold: default_cost_of_goods_sold(),
        }
    }
}

/// Root account codes used by the statements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChartLayout {
    /// Assets root.
    #[serde(default = "default_assets")]
    pub assets: String,
    /// Liabilities root.
    #[serde(default = "default_liabilities")]
    pub liabilities: String,
    /// Equity root.
    #[serde(default = "default_equity")]
    pub equity: String,
    /// Revenues and expenses root.
    #[serde(default = "default_revenue_and_expenses")]
    pub revenue_and_expenses: String,
    /// Operating expenses branch (under the revenues and expenses root).
    #[serde(default = "default_operating_expenses")]
    pub operating_expenses: String,
}

fn default_assets() -> String {
    "1".to_string()
}

fn default_liabilities() -> String {
    "2".to_string()
}

fn default_equity() -> String {
    "3".to_string()
}

fn default_revenue_and_expenses() -> String {
    "4".to_string()
}

fn default_operating_expenses() -> String {
    "42".to_string()
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            assets: default_assets(),
            liabilities: default_liabilities(),
            equity: default_equity(),
            revenue_and_expenses: default_revenue_and_expenses(),
            operating_expenses: default_operating_expenses(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "mizan=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MIZAN").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
