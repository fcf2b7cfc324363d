// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protocol node identifiers.
//!
//! Text form follows the usual `ns=<index>;<kind>=<value>` notation, where
//! kind is `i` (numeric), `s` (string), `g` (guid) or `b` (opaque, hex here).
//! The namespace prefix is omitted for namespace 0.

use crate::types::Guid;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "schema-loaders")]
use serde::{Deserialize, Serialize};

/// Identifier part of a [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    Numeric(u32),
    String(String),
    Guid(Guid),
    Opaque(Vec<u8>),
}

/// Namespace-qualified node identifier; also used as protocol type identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "schema-loaders",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct NodeId {
    pub namespace_index: u16,
    pub identifier: Identifier,
}

impl NodeId {
    pub const NULL: NodeId = NodeId {
        namespace_index: 0,
        identifier: Identifier::Numeric(0),
    };

    pub fn numeric(namespace_index: u16, id: u32) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::Numeric(id),
        }
    }

    pub fn string(namespace_index: u16, id: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::String(id.into()),
        }
    }

    pub fn guid(namespace_index: u16, id: Guid) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::Guid(id),
        }
    }

    pub fn opaque(namespace_index: u16, id: Vec<u8>) -> Self {
        Self {
            namespace_index,
            identifier: Identifier::Opaque(id),
        }
    }

    /// True for the null node id (namespace 0, numeric 0) and empty identifiers.
    pub fn is_null(&self) -> bool {
        if self.namespace_index != 0 {
            return false;
        }
        match &self.identifier {
            Identifier::Numeric(id) => *id == 0,
            Identifier::String(s) => s.is_empty(),
            Identifier::Guid(g) => g.is_null(),
            Identifier::Opaque(b) => b.is_empty(),
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index != 0 {
            write!(f, "ns={};", self.namespace_index)?;
        }
        match &self.identifier {
            Identifier::Numeric(id) => write!(f, "i={}", id),
            Identifier::String(s) => write!(f, "s={}", s),
            Identifier::Guid(g) => write!(f, "g={}", g),
            Identifier::Opaque(bytes) => {
                f.write_str("b=")?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for NodeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace_index, rest) = match s.strip_prefix("ns=") {
            Some(tail) => {
                let (ns, rest) = tail
                    .split_once(';')
                    .ok_or_else(|| format!("missing ';' after namespace in node id: {}", s))?;
                let ns = ns
                    .parse::<u16>()
                    .map_err(|e| format!("bad namespace index in node id {}: {}", s, e))?;
                (ns, rest)
            }
            None => (0, s),
        };

        let (kind, value) = rest
            .split_once('=')
            .ok_or_else(|| format!("missing identifier in node id: {}", s))?;

        let identifier = match kind {
            "i" => Identifier::Numeric(
                value
                    .parse::<u32>()
                    .map_err(|e| format!("bad numeric identifier in node id {}: {}", s, e))?,
            ),
            "s" => Identifier::String(value.to_string()),
            "g" => Identifier::Guid(value.parse::<Guid>()?),
            "b" => {
                if value.len() % 2 != 0 {
                    return Err(format!("odd-length opaque identifier in node id: {}", s));
                }
                let bytes = (0..value.len())
                    .step_by(2)
                    .map(|i| u8::from_str_radix(&value[i..i + 2], 16))
                    .collect::<Result<Vec<u8>, _>>()
                    .map_err(|e| format!("bad opaque identifier in node id {}: {}", s, e))?;
                Identifier::Opaque(bytes)
            }
            other => return Err(format!("unknown identifier kind '{}' in node id: {}", other, s)),
        };

        Ok(Self {
            namespace_index,
            identifier,
        })
    }
}

impl TryFrom<String> for NodeId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(value: NodeId) -> Self {
        value.to_string()
    }
}

/// Node id that may point into another server or a namespace given by URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExpandedNodeId {
    pub node_id: NodeId,
    pub namespace_uri: Option<String>,
    pub server_index: u32,
}

impl ExpandedNodeId {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            namespace_uri: None,
            server_index: 0,
        }
    }

    pub fn with_namespace_uri(mut self, uri: impl Into<String>) -> Self {
        self.namespace_uri = Some(uri.into());
        self
    }

    pub fn with_server_index(mut self, server_index: u32) -> Self {
        self.server_index = server_index;
        self
    }

    /// True when the id resolves locally without a namespace table lookup.
    pub fn is_local(&self) -> bool {
        self.namespace_uri.is_none() && self.server_index == 0
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        Self::new(node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::numeric(0, 85).to_string(), "i=85");
        assert_eq!(NodeId::numeric(2, 5001).to_string(), "ns=2;i=5001");
        assert_eq!(NodeId::string(1, "Pump.Speed").to_string(), "ns=1;s=Pump.Speed");
        assert_eq!(NodeId::opaque(3, vec![0xde, 0xad]).to_string(), "ns=3;b=dead");
    }

    #[test]
    fn test_node_id_parse() {
        assert_eq!("ns=2;i=5001".parse::<NodeId>(), Ok(NodeId::numeric(2, 5001)));
        assert_eq!("i=85".parse::<NodeId>(), Ok(NodeId::numeric(0, 85)));
        assert_eq!(
            "ns=4;s=a=b".parse::<NodeId>(),
            Ok(NodeId::string(4, "a=b"))
        );
        assert_eq!(
            "ns=3;b=dead".parse::<NodeId>(),
            Ok(NodeId::opaque(3, vec![0xde, 0xad]))
        );
        assert!("ns=x;i=1".parse::<NodeId>().is_err());
        assert!("q=1".parse::<NodeId>().is_err());
        assert!("ns=1".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_null_node_id() {
        assert!(NodeId::NULL.is_null());
        assert!(NodeId::string(0, "").is_null());
        assert!(!NodeId::numeric(1, 0).is_null());
    }

    #[test]
    fn test_expanded_node_id_locality() {
        let local = ExpandedNodeId::from(NodeId::numeric(1, 7));
        assert!(local.is_local());
        let remote = local.clone().with_server_index(2);
        assert!(!remote.is_local());
        let by_uri = local.with_namespace_uri("urn:factory:line1");
        assert!(!by_uri.is_local());
    }
}
