//! Capacity strategy: どの購入モデルでタスクを配置するか

use serde::{Deserialize, Serialize};

/// Placement strategy sent as the single `capacityProviderStrategy` entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityStrategy {
    /// Regular on-demand capacity.
    #[default]
    OnDemand,
    /// Discounted, preemptible capacity.
    Spot,
}

impl CapacityStrategy {
    /// The strategy list always carries exactly one entry with this weight.
    pub const WEIGHT: u32 = 1;

    pub fn provider(&self) -> &'static str {
        match self {
            CapacityStrategy::OnDemand => "FARGATE",
            CapacityStrategy::Spot => "FARGATE_SPOT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_on_demand() {
        assert_eq!(CapacityStrategy::default(), CapacityStrategy::OnDemand);
        assert_eq!(CapacityStrategy::default().provider(), "FARGATE");
        assert_eq!(CapacityStrategy::Spot.provider(), "FARGATE_SPOT");
    }

    #[test]
    fn deserializes_from_snake_case() {
        let c: CapacityStrategy = serde_json::from_str("\"spot\"").unwrap();
        assert_eq!(c, CapacityStrategy::Spot);
    }
}
