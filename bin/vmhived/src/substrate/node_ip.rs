use std::collections::HashMap;

use vmhive_error::io::IoResult;

use vmhive_stubs::node::NodeItem;

use super::SubstrateClient;

/// Process wide map from substrate node name to its routable internal ip.
/// Built once at startup, read only afterwards. A pod scheduled on a node
/// missing from the map records an empty `node_ip`.
#[derive(Debug, Default)]
pub struct NodeIpIndex {
  map: HashMap<String, String>,
}

impl NodeIpIndex {
  pub async fn init(substrate: &SubstrateClient) -> IoResult<Self> {
    let nodes = substrate.list_nodes().await?;
    Ok(Self::from_nodes(nodes))
  }

  pub fn from_nodes(nodes: Vec<NodeItem>) -> Self {
    let mut map = HashMap::new();
    for node in nodes {
      if !node.internal_ip.is_empty() {
        map.insert(node.name, node.internal_ip);
      }
    }
    Self { map }
  }

  pub fn get(&self, node_name: &str) -> String {
    self.map.get(node_name).cloned().unwrap_or_default()
  }

  pub fn len(&self) -> usize {
    self.map.len()
  }

  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_node_yields_empty_ip() {
    let index = NodeIpIndex::from_nodes(vec![
      NodeItem {
        name: "node-a".to_owned(),
        internal_ip: "10.0.0.1".to_owned(),
      },
      NodeItem {
        name: "node-b".to_owned(),
        internal_ip: String::new(),
      },
    ]);
    assert_eq!(index.get("node-a"), "10.0.0.1");
    assert_eq!(index.get("node-b"), "");
    assert_eq!(index.get("node-c"), "");
    assert_eq!(index.len(), 1);
  }
}
