/*
[INPUT]:  Supported EVM chain set
[OUTPUT]: Typed chain enum with serialization support
[POS]:    Data layer - chain identifiers for the connector registry
[UPDATE]: When chains are added or removed from the supported set
*/

use serde::{Deserialize, Serialize};

/// Chains the wallet connectors can authenticate against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Polygon,
    Optimism,
}

impl Chain {
    /// Numeric chain id used by EVM providers
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Polygon => 137,
            Chain::Optimism => 10,
        }
    }

    /// Query-string value understood by the backend
    pub fn query_value(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Polygon => "polygon",
            Chain::Optimism => "optimism",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_ids() {
        assert_eq!(Chain::Ethereum.chain_id(), 1);
        assert_eq!(Chain::Polygon.chain_id(), 137);
        assert_eq!(Chain::Optimism.chain_id(), 10);
    }

    #[test]
    fn test_chain_serialization() {
        let json = serde_json::to_string(&Chain::Polygon).unwrap();
        assert_eq!(json, "\"polygon\"");
    }
}
