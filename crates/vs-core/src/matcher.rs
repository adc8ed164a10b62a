//! Token to node resolution

use crate::types::Node;

/// Find the first node the token refers to
///
/// Nodes are checked in the order given, which callers keep sorted by
/// name. A node matches when its name starts with the token, its MagicDNS
/// name starts with the token, or its address equals the token, all
/// ignoring case. The first hit wins even if a later node would match
/// "better". The token is used as given: surrounding whitespace is part of
/// it, and an empty token is a prefix of the first node's name.
pub fn match_node<'a>(nodes: &'a [Node], token: &str) -> Option<&'a Node> {
    let token = token.to_lowercase();

    nodes.iter().find(|node| {
        node.name.to_lowercase().starts_with(&token)
            || node
                .dns_name
                .as_deref()
                .is_some_and(|dns| dns.to_lowercase().starts_with(&token))
            || node.address.to_lowercase() == token
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sort_nodes;

    fn sample() -> Vec<Node> {
        let mut nodes = vec![
            Node::new("web-2", "10.0.0.12"),
            Node::new("db", "10.0.0.20"),
            Node::new("web-1", "10.0.0.11"),
            Node::new("Gateway", "GW.example.com"),
        ];
        sort_nodes(&mut nodes);
        nodes
    }

    #[test]
    fn test_prefix_picks_first_in_sort_order() {
        let nodes = sample();
        assert_eq!(match_node(&nodes, "web").unwrap().name, "web-1");
        assert_eq!(match_node(&nodes, "web-2").unwrap().name, "web-2");
    }

    #[test]
    fn test_prefix_ignores_case() {
        let nodes = sample();
        assert_eq!(match_node(&nodes, "WEB-1").unwrap().name, "web-1");
        assert_eq!(match_node(&nodes, "gate").unwrap().name, "Gateway");
    }

    #[test]
    fn test_address_equality() {
        let nodes = sample();
        assert_eq!(match_node(&nodes, "10.0.0.20").unwrap().name, "db");
        assert_eq!(match_node(&nodes, "gw.EXAMPLE.com").unwrap().name, "Gateway");
        // Address is compared whole, not by prefix
        assert!(match_node(&nodes, "10.0.0").is_none());
    }

    #[test]
    fn test_dns_name_prefix() {
        let mut peer = Node::new("nas", "100.64.0.3");
        peer.dns_name = Some("storage.tail1234.ts.net".to_string());
        let nodes = vec![peer];
        assert_eq!(match_node(&nodes, "storage").unwrap().name, "nas");
    }

    #[test]
    fn test_first_match_wins_over_later_address_match() {
        // "10" is a name prefix of the first node and the exact address of the second
        let nodes = vec![Node::new("10-rack", "10.1.1.1"), Node::new("zeta", "10")];
        assert_eq!(match_node(&nodes, "10").unwrap().name, "10-rack");
    }

    #[test]
    fn test_no_match() {
        let nodes = sample();
        assert!(match_node(&nodes, "unknown.example").is_none());
        assert!(match_node(&[], "web").is_none());
        assert!(match_node(&[], "").is_none());
    }

    #[test]
    fn test_token_is_not_trimmed() {
        let nodes = vec![Node::new("beta", "10.0.0.2")];
        assert!(match_node(&nodes, " beta").is_none());
        assert!(match_node(&nodes, "beta ").is_none());
        assert!(match_node(&nodes, "  ").is_none());
    }

    #[test]
    fn test_empty_token_matches_first_node() {
        let nodes = vec![Node::new("alpha", "10.0.0.1"), Node::new("beta", "10.0.0.2")];
        assert_eq!(match_node(&nodes, "").unwrap().name, "alpha");
    }

    #[test]
    fn test_deterministic() {
        let nodes = sample();
        for token in ["web", "db", "10.0.0.11", "nope"] {
            assert_eq!(match_node(&nodes, token), match_node(&nodes, token));
        }
    }
}
