use serde::{Deserialize, Serialize};

/// Coarse category of business question. Classification is keyword-driven and
/// falls back to `Unknown` rather than erroring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Inventory,
    Sales,
    Products,
    Customers,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Sales => "sales",
            Self::Products => "products",
            Self::Customers => "customers",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Stage A output: the matched category plus any parameters extracted from the
/// question text. `None` means the question did not mention the parameter and
/// the planner substitutes the configured default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedIntent {
    pub intent: Intent,
    pub top_n: Option<u32>,
    pub window_days: Option<u32>,
    pub threshold: Option<u32>,
}
