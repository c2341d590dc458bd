use serde::{Deserialize, Serialize};

/// Account balances the advisor tracks. All keys are required on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assets {
    pub rrsp: f64,
    pub tfsa: f64,
    pub investments: f64,
    pub real_estate: f64,
    pub total_assets: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liabilities {
    pub mortgage: f64,
    pub car_loan: f64,
    pub credit_cards: f64,
    pub total_liabilities: f64,
}

/// A savings target with completion percentage (0-100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub goal: String,
    pub amount: f64,
    pub progress: f64,
}

impl Goal {
    pub fn new(goal: impl Into<String>, amount: f64, progress: f64) -> Self {
        Self {
            goal: goal.into(),
            amount,
            progress,
        }
    }

    pub fn current_value(&self) -> f64 {
        self.amount * self.progress / 100.0
    }

    pub fn remaining(&self) -> f64 {
        self.amount - self.current_value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizon {
    Short,
    Medium,
    Long,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::Short, Horizon::Medium, Horizon::Long];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Short => "Short-term",
            Self::Medium => "Medium-term",
            Self::Long => "Long-term",
        }
    }

    /// Badge color used in rendered goal tables
    pub fn color(&self) -> &'static str {
        match self {
            Self::Short => "#3b82f6",
            Self::Medium => "#6b7280",
            Self::Long => "#10b981",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    pub short_term: Vec<Goal>,
    pub medium_term: Vec<Goal>,
    pub long_term: Vec<Goal>,
}

impl Goals {
    pub fn bucket(&self, horizon: Horizon) -> &[Goal] {
        match horizon {
            Horizon::Short => &self.short_term,
            Horizon::Medium => &self.medium_term,
            Horizon::Long => &self.long_term,
        }
    }

    /// Goals in table order: short, then medium, then long term
    pub fn iter(&self) -> impl Iterator<Item = (Horizon, &Goal)> {
        Horizon::ALL
            .into_iter()
            .flat_map(move |h| self.bucket(h).iter().map(move |g| (h, g)))
    }

    pub fn len(&self) -> usize {
        self.short_term.len() + self.medium_term.len() + self.long_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Financial snapshot extracted from a conversation.
///
/// `Default` is the all-zero structure returned whenever extraction fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    pub assets: Assets,
    pub liabilities: Liabilities,
    pub net_worth: f64,
    pub goals: Goals,
}

impl FinancialData {
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}))
    }
}
