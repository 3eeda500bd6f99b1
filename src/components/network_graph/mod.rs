//! Namespace-clustered network topology view.
//!
//! Renders deployments and external entities grouped into one rectangular
//! container per namespace, with:
//! - Links derived from flow records under a filter mode
//! - A force layout that pulls members towards their namespace centroid
//! - Cross-namespace edges routed through facing container-side anchors
//! - Hover, click and drag interactions with host callbacks
//! - Bounded zoom, pan and zoom-to-fit
//!
//! Only the canvas component and its renderer touch the DOM. Layout,
//! routing, selection and zoom are plain data and are tested natively.
//!
//! # Example
//!
//! ```ignore
//! use netgraph::{GraphInput, NetworkGraphCanvas, NetworkGraphHandle};
//!
//! let input: GraphInput = serde_json::from_str(json)?;
//! let handle = NetworkGraphHandle::default();
//!
//! view! {
//!     <NetworkGraphCanvas
//!         data=Signal::derive(move || input.clone())
//!         handle=handle.clone()
//!         on_node_click=move |details: NodeDetails| log::info!("{}", details.name)
//!         fullscreen=true
//!     />
//! }
//! ```

mod component;
mod config;
mod error;
mod forces;
mod geometry;
mod handle;
mod layout;
mod links;
mod render;
mod rng;
mod router;
mod scale;
mod scene;
mod selection;
mod state;
mod theme;
mod throttle;
mod types;
mod zoom;

#[cfg(test)]
mod scenarios;

pub use component::NetworkGraphCanvas;
pub use config::LayoutConfig;
pub use geometry::Point;
pub use handle::NetworkGraphHandle;
pub use theme::Theme;
pub use types::{
	DeploymentRef, Entity, EntityType, ExternalSource, FilterMode, FlowMapping, FlowRecord,
	GraphInput, GraphNode, NamespaceDetails, NodeDetails,
};
pub use zoom::ViewTransform;
