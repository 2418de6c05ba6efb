use std::net::SocketAddr;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Collection used by the HTTP endpoints when none is configured.
pub const DEFAULT_COLLECTION: &str = "users";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data_root: PathBuf,
    /// The single collection all HTTP endpoints operate on.
    pub collection: String,
    /// Answer 404 instead of 500 when a document or collection is missing.
    pub not_found_as_404: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 4000)),
            data_root: PathBuf::from("."),
            collection: DEFAULT_COLLECTION.to_string(),
            not_found_as_404: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:4000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.data_root, PathBuf::from("."));
        assert_eq!(c.collection, "users");
        assert!(!c.not_found_as_404);
    }

    #[test]
    fn config_serde() {
        let c = ServerConfig {
            collection: "orders".into(),
            ..ServerConfig::default()
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: ServerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.collection, "orders");
        assert_eq!(back.bind_addr, c.bind_addr);
    }
}
