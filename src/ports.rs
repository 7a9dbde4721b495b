//! Port derivation for organizations.
//!
//! Ports are taken from the 1-based organization index by appending a fixed
//! three digit suffix to a shifted index: the peer port is `index + 7`
//! followed by `051` and the CouchDB port is `index + 3` followed by `984`.
//! Downstream compose files and scripts expect exactly these ranges
//! (org1 -> 8051/4984, org2 -> 9051/5984, ...).
//!
//! Because the suffix always has three digits the concatenation equals
//! `(index + 7) * 1000 + 51`, so distinct indices never collide. It does
//! however leave the TCP port range once the index grows large enough; that
//! boundary is reported by [`port_range_warning`], not corrected.

use serde::Serialize;

/// Three digit suffix appended to `index + 7` for the peer port (`051`)
pub const PEER_PORT_SUFFIX: u32 = 51;
/// Three digit suffix appended to `index + 3` for the CouchDB port
pub const COUCH_PORT_SUFFIX: u32 = 984;

const PEER_PORT_SHIFT: usize = 7;
const COUCH_PORT_SHIFT: usize = 3;

/// Largest valid TCP port
pub const MAX_TCP_PORT: u32 = 65_535;

/// Ports assigned to a single organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PortAssignment {
    pub peer: u32,
    pub couch: u32,
}

/// Concatenate `shifted` with a three digit suffix
fn concat_port(shifted: usize, suffix: u32) -> u32 {
    u32::try_from(shifted)
        .unwrap_or(u32::MAX)
        .saturating_mul(1000)
        .saturating_add(suffix)
}

/// Derive the peer and CouchDB ports for a 1-based organization index
pub fn derive_ports(index: usize) -> PortAssignment {
    PortAssignment {
        peer: concat_port(index.saturating_add(PEER_PORT_SHIFT), PEER_PORT_SUFFIX),
        couch: concat_port(index.saturating_add(COUCH_PORT_SHIFT), COUCH_PORT_SUFFIX),
    }
}

/// Describe why the ports for `index` are outside the TCP port range, if they are.
///
/// Peer ports overflow from index 59 and CouchDB ports from index 62.
pub fn port_range_warning(index: usize) -> Option<String> {
    let ports = derive_ports(index);
    let mut over = Vec::new();
    if ports.peer > MAX_TCP_PORT {
        over.push(format!("peer port {}", ports.peer));
    }
    if ports.couch > MAX_TCP_PORT {
        over.push(format!("couch port {}", ports.couch));
    }
    if over.is_empty() {
        None
    } else {
        Some(format!(
            "organization index {} derives {} above {}",
            index,
            over.join(" and "),
            MAX_TCP_PORT
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_known_ports() {
        assert_eq!(derive_ports(1), PortAssignment { peer: 8051, couch: 4984 });
        assert_eq!(derive_ports(2), PortAssignment { peer: 9051, couch: 5984 });
        assert_eq!(derive_ports(3), PortAssignment { peer: 10051, couch: 6984 });
    }

    #[test]
    fn test_matches_string_concatenation() {
        for index in 1..=100 {
            let peer: u32 = format!("{}{:03}", index + 7, PEER_PORT_SUFFIX).parse().unwrap();
            let couch: u32 = format!("{}984", index + 3).parse().unwrap();
            assert_eq!(derive_ports(index), PortAssignment { peer, couch });
        }
    }

    #[test]
    fn test_ports_unique_across_range() {
        let mut peers = HashSet::new();
        let mut couches = HashSet::new();
        for index in 1..=50 {
            let ports = derive_ports(index);
            assert!(peers.insert(ports.peer), "peer port collision at {}", index);
            assert!(couches.insert(ports.couch), "couch port collision at {}", index);
        }
    }

    #[test]
    fn test_peer_suffix_keeps_leading_zero() {
        assert_eq!(format!("{:03}", PEER_PORT_SUFFIX), "051");
        assert_eq!(derive_ports(1).peer % 1000, 51);
        assert_eq!(derive_ports(1).couch % 1000, 984);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(derive_ports(17), derive_ports(17));
    }

    #[test]
    fn test_port_range_boundary() {
        assert!(port_range_warning(1).is_none());
        assert!(port_range_warning(58).is_none());

        let peer_only = port_range_warning(59).unwrap();
        assert!(peer_only.contains("peer port 66051"));
        assert!(!peer_only.contains("couch"));

        let both = port_range_warning(62).unwrap();
        assert!(both.contains("peer port 69051"));
        assert!(both.contains("couch port 65984"));
    }
}
