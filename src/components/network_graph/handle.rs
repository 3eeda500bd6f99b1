//! Imperative handle for host toolbars.

use std::cell::RefCell;
use std::rc::Rc;

use super::state::GraphSession;
use super::types::NodeDetails;
use super::zoom::ViewTransform;

/// Shared access to a mounted graph.
///
/// Create one with `NetworkGraphHandle::default()`, pass it to the
/// `NetworkGraphCanvas` component, and call it from surrounding UI. Calls made
/// before mount or after unmount are no-ops returning `None`.
#[derive(Clone, Default)]
pub struct NetworkGraphHandle {
	session: Rc<RefCell<Option<GraphSession>>>,
}

impl NetworkGraphHandle {
	pub(crate) fn attach(&self, session: GraphSession) {
		*self.session.borrow_mut() = Some(session);
	}

	/// Tears the session down and detaches it.
	pub(crate) fn detach(&self) {
		if let Some(mut session) = self.session.borrow_mut().take() {
			session.teardown();
		}
	}

	/// Whether a canvas is currently mounted.
	pub fn is_attached(&self) -> bool {
		self.session.borrow().is_some()
	}

	/// Runs `f` against the mounted session. Re-entrant calls see `None`.
	pub(crate) fn with<R>(&self, f: impl FnOnce(&mut GraphSession) -> R) -> Option<R> {
		let mut guard = self.session.try_borrow_mut().ok()?;
		guard.as_mut().map(f)
	}

	/// Zooms in one step around the viewport center.
	pub fn zoom_in(&self) -> Option<ViewTransform> {
		self.with(|s| s.zoom_in())
	}

	/// Zooms out one step around the viewport center.
	pub fn zoom_out(&self) -> Option<ViewTransform> {
		self.with(|s| s.zoom_out())
	}

	/// Fits the whole graph into the viewport.
	pub fn zoom_to_fit(&self) -> Option<ViewTransform> {
		self.with(|s| s.zoom_to_fit())
	}

	/// Selects a node without notifying the host. `None` clears the selection.
	pub fn set_selected_node(&self, id: Option<&str>) {
		self.with(|s| s.set_selected_node(id));
	}

	/// Details of a node, as reported on click.
	pub fn get_node_data(&self, id: &str) -> Option<NodeDetails> {
		self.with(|s| s.node_data(id)).flatten()
	}
}
