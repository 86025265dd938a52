/*
[INPUT]:  Registry configuration, route context, and the active chain set
[OUTPUT]: Ordered, grouped connector descriptors with working factories
[POS]:    Connector layer - selectable wallet catalogue
[UPDATE]: When providers are added or the route policy changes
*/

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::connector::{
    Connector, ExtensionConnector, HardwareConnector, MailLinkConnector, RelayApprover,
    RelayConnector, UdConnector,
};
use crate::http::{CrypteaError, Result};
use crate::types::Chain;

/// Routes with a restricted wallet set expose only these providers
const PAYMENT_ROUTE_PREFIX: &str = "/pay/";

/// Configuration for the connector registry, assembled once at startup
/// and injected wherever descriptors are built.
#[derive(Clone)]
pub struct RegistryConfig {
    /// Application name shown by providers that ask for one
    pub app_name: String,
    /// Signing keys for extension-class providers, keyed by provider id
    pub provider_keys: HashMap<String, String>,
    /// Directory holding hardware-connector keys
    pub key_dir: PathBuf,
    /// Where relay approvers are handed off when a relay-backed
    /// connector is created; unset means relay wallets are unavailable
    pub relay_sink: Option<mpsc::UnboundedSender<RelayApprover>>,
    /// Identity domain used by the decentralized-identity login
    pub ud_domain: Option<String>,
}

impl RegistryConfig {
    pub fn new(app_name: &str, key_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_name: app_name.to_string(),
            provider_keys: HashMap::new(),
            key_dir: key_dir.into(),
            relay_sink: None,
            ud_domain: None,
        }
    }
}

/// A selectable wallet entry. Read-only after registry construction;
/// `create_connector` is the capability factory.
#[derive(Clone)]
pub struct ConnectorDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub icon_ref: &'static str,
    factory: Arc<dyn Fn() -> Result<Arc<dyn Connector>> + Send + Sync>,
}

impl ConnectorDescriptor {
    /// Build a connector exposing the capability interface
    pub fn create_connector(&self) -> Result<Arc<dyn Connector>> {
        (self.factory)()
    }
}

impl fmt::Debug for ConnectorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorDescriptor")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// One ordered group of wallets as presented to the user
#[derive(Debug, Clone)]
pub struct ConnectorGroup {
    pub group_name: &'static str,
    pub wallets: Vec<ConnectorDescriptor>,
}

/// Builds the wallet catalogue for a route and chain set.
///
/// Construction happens once; `build` is a pure function of its inputs
/// and does no I/O, so call sites can rebuild groups freely without
/// reconstructing connectors.
#[derive(Clone)]
pub struct ConnectorRegistry {
    config: Arc<RegistryConfig>,
}

impl ConnectorRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Grouped descriptors for a route. An empty chain set yields an
    /// empty catalogue, never an error.
    pub fn build(&self, route: &str, chains: &[Chain]) -> Vec<ConnectorGroup> {
        if chains.is_empty() {
            return Vec::new();
        }

        let recommended: Vec<&'static str> = if route.starts_with(PAYMENT_ROUTE_PREFIX) {
            vec!["metamask", "walletconnect", "coinbase"]
        } else {
            vec!["metamask", "mail", "walletconnect", "unstoppable", "coinbase"]
        };

        let other = vec!["rainbow", "trust", "ledger", "injected", "argent", "brave"];

        vec![
            ConnectorGroup {
                group_name: "Recommended",
                wallets: recommended.into_iter().map(|id| self.descriptor(id)).collect(),
            },
            ConnectorGroup {
                group_name: "Other",
                wallets: other.into_iter().map(|id| self.descriptor(id)).collect(),
            },
        ]
    }

    fn descriptor(&self, id: &'static str) -> ConnectorDescriptor {
        let (display_name, icon_ref) = provider_branding(id);
        let config = Arc::clone(&self.config);

        let factory: Arc<dyn Fn() -> Result<Arc<dyn Connector>> + Send + Sync> =
            Arc::new(move || make_connector(id, &config));

        ConnectorDescriptor {
            id,
            display_name,
            icon_ref,
            factory,
        }
    }
}

fn provider_branding(id: &str) -> (&'static str, &'static str) {
    match id {
        "metamask" => ("MetaMask", "images/metamask.svg"),
        "mail" => ("Email link", "images/mglink.svg"),
        "walletconnect" => ("WalletConnect", "images/walletconnect.svg"),
        "unstoppable" => ("Login with unstoppable", "images/unstoppable.svg"),
        "coinbase" => ("Coinbase Wallet", "images/coinbase.svg"),
        "rainbow" => ("Rainbow", "images/rainbow.svg"),
        "trust" => ("Trust Wallet", "images/trust.svg"),
        "ledger" => ("Ledger", "images/ledger.svg"),
        "argent" => ("Argent", "images/argent.svg"),
        "brave" => ("Brave Wallet", "images/brave.svg"),
        _ => ("Injected", "images/injected.svg"),
    }
}

fn make_connector(id: &'static str, config: &RegistryConfig) -> Result<Arc<dyn Connector>> {
    match id {
        "walletconnect" => {
            let sink = config.relay_sink.as_ref().ok_or_else(|| {
                CrypteaError::Config("wallet relay is not configured".to_string())
            })?;
            let (connector, approver) = RelayConnector::pair(id);
            sink.send(approver)
                .map_err(|_| CrypteaError::Relay("relay approver sink is closed".to_string()))?;
            Ok(Arc::new(connector))
        }
        "mail" => Ok(Arc::new(MailLinkConnector::new())),
        "ledger" => Ok(Arc::new(HardwareConnector::new(
            id,
            &config.key_dir,
            "ledger",
        ))),
        "unstoppable" => {
            let domain = config.ud_domain.as_deref().ok_or_else(|| {
                CrypteaError::Config("no identity domain configured".to_string())
            })?;
            let inner = extension_for(config, "unstoppable")
                .or_else(|_| extension_for(config, "injected"))?;
            Ok(Arc::new(UdConnector::new(domain, inner)))
        }
        _ => extension_for(config, id).map(|c| c as Arc<dyn Connector>),
    }
}

fn extension_for(config: &RegistryConfig, id: &'static str) -> Result<Arc<ExtensionConnector>> {
    let key = config.provider_keys.get(id).ok_or_else(|| {
        CrypteaError::Config(format!("no signing key configured for provider `{id}`"))
    })?;
    Ok(Arc::new(ExtensionConnector::new(id, key)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn registry() -> ConnectorRegistry {
        let mut config = RegistryConfig::new("Cryptea", std::env::temp_dir());
        config.provider_keys.insert("metamask".to_string(), TEST_KEY.to_string());
        config.provider_keys.insert("injected".to_string(), TEST_KEY.to_string());
        config.ud_domain = Some("ada.crypto".to_string());
        ConnectorRegistry::new(config)
    }

    fn ids(group: &ConnectorGroup) -> Vec<&'static str> {
        group.wallets.iter().map(|w| w.id).collect()
    }

    #[test]
    fn test_empty_chain_set_disables_catalogue() {
        assert!(registry().build("/dashboard", &[]).is_empty());
    }

    #[test]
    fn test_payment_route_restricts_recommended_group() {
        let groups = registry().build("/pay/coffee-fund", &[Chain::Ethereum]);
        assert_eq!(groups[0].group_name, "Recommended");
        assert_eq!(ids(&groups[0]), vec!["metamask", "walletconnect", "coinbase"]);
    }

    #[test]
    fn test_default_route_adds_custom_descriptors() {
        let groups = registry().build("/dashboard", &[Chain::Ethereum, Chain::Polygon]);
        assert_eq!(
            ids(&groups[0]),
            vec!["metamask", "mail", "walletconnect", "unstoppable", "coinbase"]
        );
        assert_eq!(
            ids(&groups[1]),
            vec!["rainbow", "trust", "ledger", "injected", "argent", "brave"]
        );
    }

    #[test]
    fn test_build_is_stable_across_calls() {
        let registry = registry();
        let first = registry.build("/dashboard", &[Chain::Ethereum]);
        let second = registry.build("/dashboard", &[Chain::Ethereum]);
        assert_eq!(ids(&first[0]), ids(&second[0]));
        assert_eq!(ids(&first[1]), ids(&second[1]));
    }

    #[tokio::test]
    async fn test_descriptor_factories_produce_working_connectors() {
        let groups = registry().build("/dashboard", &[Chain::Ethereum]);
        let mail = groups[0]
            .wallets
            .iter()
            .find(|w| w.id == "mail")
            .unwrap()
            .create_connector()
            .unwrap();
        crate::connector::conformance::exercise(mail.as_ref())
            .await
            .unwrap();
    }

    #[test]
    fn test_unconfigured_provider_fails_at_creation() {
        let groups = registry().build("/dashboard", &[Chain::Ethereum]);
        let coinbase = groups[0].wallets.iter().find(|w| w.id == "coinbase").unwrap();
        assert!(coinbase.create_connector().is_err());
    }

    #[test]
    fn test_relay_without_sink_fails_at_creation() {
        let groups = registry().build("/dashboard", &[Chain::Ethereum]);
        let relay = groups[0]
            .wallets
            .iter()
            .find(|w| w.id == "walletconnect")
            .unwrap();
        assert!(relay.create_connector().is_err());
    }

    #[tokio::test]
    async fn test_relay_sink_receives_approver() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut config = RegistryConfig::new("Cryptea", std::env::temp_dir());
        config.relay_sink = Some(tx);
        let registry = ConnectorRegistry::new(config);

        let groups = registry.build("/pay/x", &[Chain::Ethereum]);
        let relay = groups[0]
            .wallets
            .iter()
            .find(|w| w.id == "walletconnect")
            .unwrap();
        let _connector = relay.create_connector().unwrap();
        assert!(rx.recv().await.is_some());
    }
}
