//! Chain client registry built from the `ETH_ENDPOINTS` configuration.

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use chainwatch_types::ChainName;

use crate::client::EthRpcClient;
use crate::error::ChainError;
use crate::ChainClient;

/// Immutable name-to-client map, built once at startup and shared read-only
/// across sweep workers.
pub struct ChainRegistry {
    clients: HashMap<ChainName, Arc<dyn ChainClient>>,
}

impl ChainRegistry {
    /// Registry over an explicit set of clients.
    pub fn new(clients: HashMap<ChainName, Arc<dyn ChainClient>>) -> Self {
        Self { clients }
    }

    /// Registry of JSON-RPC clients from parsed endpoint pairs. A repeated
    /// name keeps the last endpoint listed.
    pub fn from_endpoints(endpoints: &[(ChainName, Url)]) -> Self {
        let mut clients: HashMap<ChainName, Arc<dyn ChainClient>> = HashMap::new();
        for (name, url) in endpoints {
            clients.insert(name.clone(), Arc::new(EthRpcClient::new(url.as_str())));
        }
        Self { clients }
    }

    /// Resolve a chain name to its client.
    pub fn resolve(&self, chain: &ChainName) -> Result<Arc<dyn ChainClient>, ChainError> {
        self.clients
            .get(chain)
            .cloned()
            .ok_or(ChainError::ClientNotFound)
    }

    /// All configured clients, for the health probe.
    pub fn iter(&self) -> impl Iterator<Item = (&ChainName, &Arc<dyn ChainClient>)> {
        self.clients.iter()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

/// Parse an `ETH_ENDPOINTS` value: comma-separated `name=endpoint` pairs.
///
/// Every entry must carry a non-empty name and an endpoint that parses as a
/// URL; anything else is a configuration error. Pairs are returned in listing
/// order.
pub fn parse_endpoints(raw: &str) -> Result<Vec<(ChainName, Url)>, ChainError> {
    let mut pairs = Vec::new();
    for entry in raw.split(',') {
        let (name, endpoint) = entry.split_once('=').ok_or(ChainError::MalformedEndpoints)?;
        if name.is_empty() || endpoint.is_empty() {
            return Err(ChainError::MalformedEndpoints);
        }
        let url = Url::parse(endpoint).map_err(|_| ChainError::MalformedEndpoints)?;
        pairs.push((ChainName::new(name), url));
    }
    Ok(pairs)
}
