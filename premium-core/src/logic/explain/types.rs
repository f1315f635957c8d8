use serde::{Deserialize, Serialize};

/// Direction and size of a factor's effect on the premium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Favorable,
    Neutral,
    Elevated,
    Major,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostDriver {
    pub factor: String,
    pub assessment: String,
    pub impact: Impact,
}
