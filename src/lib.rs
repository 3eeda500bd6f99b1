//! netgraph: Namespace-clustered network topology visualization.
//!
//! This crate provides a WASM-based graph component that lays out
//! deployments in per-namespace containers, routes cross-namespace traffic
//! through facing container sides, and supports selection, drag, pan and zoom.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::network_graph::{
	FilterMode, FlowRecord, GraphInput, GraphNode, LayoutConfig, NamespaceDetails,
	NetworkGraphCanvas, NetworkGraphHandle, NodeDetails, Theme,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("netgraph: logging initialized");
}

/// Parses the JSON text of the script element with the given id.
fn load_json_script<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("netgraph: failed to parse #{}: {}", id, e);
			None
		}
	}
}

/// Load graph input from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], networkFlowMapping: {...}, filterState }
fn load_graph_data() -> Option<GraphInput> {
	let data = load_json_script::<GraphInput>("graph-data")?;
	let flows: usize = data.network_flow_mapping.values().map(|t| t.len()).sum();
	info!("netgraph: loaded {} nodes, {} flows", data.nodes.len(), flows);
	Some(data)
}

/// Load layout overrides from a script element with id="graph-config".
fn load_config() -> LayoutConfig {
	load_json_script::<LayoutConfig>("graph-config").unwrap_or_default()
}

/// Main application component.
/// Loads graph input from the DOM and renders the topology with a toolbar.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let filter = RwSignal::new(graph_data.filter_state);
	let graph_signal = Signal::derive(move || GraphInput {
		filter_state: filter.get(),
		..graph_data.clone()
	});

	let flat = RwSignal::new(false);
	let theme = Signal::derive(move || {
		if flat.get() {
			Theme::minimal()
		} else {
			Theme::default()
		}
	});

	let handle = NetworkGraphHandle::default();
	let selected = RwSignal::new(None::<String>);
	let (zoom_in, zoom_out, fit) = (handle.clone(), handle.clone(), handle.clone());

	let filter_button = move |mode: FilterMode, label: &'static str| {
		view! {
			<button
				class:active=move || filter.get() == mode
				on:click=move |_| filter.set(mode)
			>
				{label}
			</button>
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Network Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<NetworkGraphCanvas
				data=graph_signal
				config=load_config()
				theme=theme
				handle=handle
				fullscreen=true
				on_node_click=move |details: NodeDetails| {
					selected.set(Some(format!("{} ({})", details.name, details.namespace)))
				}
				on_namespace_click=move |details: NamespaceDetails| {
					selected
						.set(Some(format!("{} ({} deployments)", details.id, details.deployments.len())))
				}
				on_click_outside=move |_: ()| selected.set(None)
			/>
			<div class="graph-overlay">
				<h1>"Network Graph"</h1>
				<p class="subtitle">
					"Click to select. Drag nodes or namespaces. Scroll to zoom. Drag background to pan."
				</p>
				<div class="graph-toolbar">
					<button on:click=move |_| {
						zoom_in.zoom_in();
					}>"+"</button>
					<button on:click=move |_| {
						zoom_out.zoom_out();
					}>"-"</button>
					<button on:click=move |_| {
						fit.zoom_to_fit();
					}>"Fit"</button>
					{filter_button(FilterMode::All, "All")}
					{filter_button(FilterMode::Active, "Active")}
					{filter_button(FilterMode::Allowed, "Allowed")}
					<button
						class:active=move || flat.get()
						on:click=move |_| flat.update(|f| *f = !*f)
					>
						"Flat"
					</button>
				</div>
				{move || selected.get().map(|label| view! { <p class="selection">{label}</p> })}
			</div>
		</div>
	}
}
