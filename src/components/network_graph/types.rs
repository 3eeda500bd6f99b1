//! Graph data structures consumed from, and handed back to, the host.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::error::{InputError, Result};
use super::geometry::Point;

/// Which derived edges are included and highlighted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
	/// Active and allowed connections; active ones are highlighted.
	#[default]
	All,
	/// Only connections with observed traffic.
	Active,
	/// Only policy-allowed connections; nothing is highlighted as active.
	Allowed,
}

impl FilterMode {
	/// Whether a flow record produces a link under this mode.
	pub fn admits(self, flow: &FlowRecord) -> bool {
		match self {
			FilterMode::All => flow.active || flow.allowed,
			FilterMode::Active => flow.active,
			FilterMode::Allowed => flow.allowed,
		}
	}

	/// Whether active traffic is highlighted under this mode.
	pub fn shows_activity(self) -> bool {
		!matches!(self, FilterMode::Allowed)
	}
}

/// Kind of network entity behind a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
	/// A workload living in a namespace.
	Deployment,
	/// The catch-all for traffic leaving the cluster.
	ExternalEntities,
	/// A named external address range.
	CidrBlock,
	/// Any other type; such nodes are excluded.
	#[serde(other)]
	Other,
}

/// Deployment payload of a `DEPLOYMENT` entity.
#[derive(Clone, Debug, Deserialize)]
pub struct DeploymentRef {
	/// Display name.
	pub name: String,
	/// Namespace the deployment is grouped into.
	#[serde(default)]
	pub namespace: String,
}

/// Source payload of a `CIDR_BLOCK` entity.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ExternalSource {
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Address range, e.g. `10.0.0.0/8`.
	#[serde(default)]
	pub cidr: Option<String>,
}

/// Entity payload embedded in every input node.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
	/// Unique node id; flow records refer to it.
	pub id: String,
	/// Entity type, read from `type`.
	#[serde(rename = "type")]
	pub kind: EntityType,
	/// Present for deployments.
	#[serde(default)]
	pub deployment: Option<DeploymentRef>,
	/// Present for CIDR blocks.
	#[serde(default)]
	pub external_source: Option<ExternalSource>,
}

/// A node as supplied by the host.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// The entity this node stands for.
	pub entity: Entity,
	/// Whether the entity is reachable from the internet.
	#[serde(default)]
	pub internet_access: bool,
	/// Optional placement hint; the layout owns positions once seeded.
	#[serde(default)]
	pub position: Option<Point>,
}

/// Observed and policy-allowed traffic between two entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FlowRecord {
	/// Traffic was observed.
	#[serde(default)]
	pub active: bool,
	/// Network policy allows the connection.
	#[serde(default)]
	pub allowed: bool,
}

/// Source entity id -> target entity id -> flow record.
pub type FlowMapping = BTreeMap<String, BTreeMap<String, FlowRecord>>;

/// Complete graph input: nodes, flows and the filter selector.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphInput {
	/// Nodes in input order; the order breaks layout ties.
	pub nodes: Vec<GraphNode>,
	/// Flows keyed by source and target entity id.
	#[serde(default)]
	pub network_flow_mapping: FlowMapping,
	/// Which flows become links.
	#[serde(default)]
	pub filter_state: FilterMode,
}

impl GraphInput {
	/// Records a flow from `source` to `target`, merging with any existing record.
	pub fn add_flow(&mut self, source: &str, target: &str, flow: FlowRecord) {
		let entry = self
			.network_flow_mapping
			.entry(source.to_string())
			.or_default()
			.entry(target.to_string())
			.or_default();
		entry.active |= flow.active;
		entry.allowed |= flow.allowed;
	}
}

/// Prefix of the group key given to external entities and CIDR blocks, so
/// they never share a container with a namespace of the same name.
pub const EXTERNAL_GROUP_PREFIX: &str = "external:";

/// A validated node ready for layout.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedNode {
	pub id: String,
	pub name: String,
	/// Group key. External entities and CIDR blocks form their own group.
	pub namespace: String,
	pub kind: EntityType,
	pub internet_access: bool,
	pub hint: Option<Point>,
}

impl ResolvedNode {
	/// Display name of the node's group: the namespace for deployments, the
	/// node's own name for the synthetic external groups.
	pub fn group_label(&self) -> &str {
		match self.kind {
			EntityType::Deployment => &self.namespace,
			_ => &self.name,
		}
	}
}

impl GraphNode {
	/// Convenience constructor for a deployment node.
	pub fn deployment(id: &str, name: &str, namespace: &str) -> Self {
		Self {
			entity: Entity {
				id: id.to_string(),
				kind: EntityType::Deployment,
				deployment: Some(DeploymentRef {
					name: name.to_string(),
					namespace: namespace.to_string(),
				}),
				external_source: None,
			},
			internet_access: false,
			position: None,
		}
	}

	/// Validates the entity payload and extracts its group and display name.
	pub(crate) fn resolve(&self) -> Result<ResolvedNode> {
		let id = self.entity.id.clone();
		if id.is_empty() {
			return Err(InputError::MissingId);
		}
		let (name, namespace) = match self.entity.kind {
			EntityType::Deployment => {
				let deployment = self
					.entity
					.deployment
					.as_ref()
					.ok_or_else(|| InputError::MissingDeployment { id: id.clone() })?;
				if deployment.namespace.is_empty() {
					return Err(InputError::MissingNamespace { id });
				}
				(deployment.name.clone(), deployment.namespace.clone())
			}
			EntityType::ExternalEntities => (
				"External Entities".to_string(),
				format!("{}{}", EXTERNAL_GROUP_PREFIX, id),
			),
			EntityType::CidrBlock => {
				let source = self.entity.external_source.clone().unwrap_or_default();
				let cidr = source.cidr.unwrap_or_default();
				(
					format!("{} / {}", cidr, source.name),
					format!("{}{}", EXTERNAL_GROUP_PREFIX, id),
				)
			}
			EntityType::Other => return Err(InputError::UnexpectedType { id }),
		};
		Ok(ResolvedNode {
			id,
			name,
			namespace,
			kind: self.entity.kind,
			internet_access: self.internet_access,
			hint: self.position,
		})
	}
}

/// Node payload emitted to the host on click and by `get_node_data`.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDetails {
	/// Entity id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Group key; `external:`-prefixed for external entities and CIDR blocks.
	pub namespace: String,
	/// Entity type.
	pub kind: EntityType,
	/// Whether the entity is reachable from the internet.
	pub internet_access: bool,
	/// Whether the node carries highlighted traffic under the current filter.
	pub is_active: bool,
	/// Peers with a link towards this node.
	pub ingress: Vec<String>,
	/// Peers this node links to.
	pub egress: Vec<String>,
}

/// Namespace payload emitted to the host on namespace click.
#[derive(Clone, Debug, PartialEq)]
pub struct NamespaceDetails {
	/// Group key of the clicked container.
	pub id: String,
	/// Members in input order.
	pub deployments: Vec<NodeDetails>,
}
