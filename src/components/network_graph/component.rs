//! Leptos component wrapping the network graph canvas.
//!
//! The component creates an HTML canvas element and wires mouse and wheel
//! handlers to the [`GraphSession`]. An animation loop runs via
//! `requestAnimationFrame`, advancing the layout and redrawing each frame
//! until the component unmounts.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::LayoutConfig;
use super::handle::NetworkGraphHandle;
use super::render::{self, Frame};
use super::state::{GraphSession, HostEvent};
use super::theme::Theme;
use super::types::{GraphInput, NamespaceDetails, NodeDetails};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Everything that must be released when the component unmounts.
struct Mount {
	handle: NetworkGraphHandle,
	animate: FrameCallback,
	frame_id: Rc<Cell<Option<i32>>>,
	resize_cb: FrameCallback,
}

impl Mount {
	fn release(&self) {
		self.handle.detach();
		if let Some(window) = web_sys::window() {
			if let Some(id) = self.frame_id.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(ref cb) = *self.resize_cb.borrow() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.animate.borrow_mut().take();
		self.resize_cb.borrow_mut().take();
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the namespace-clustered topology on a canvas element.
///
/// Pass graph input via the reactive `data` signal; a new value restarts the
/// layout while keeping positions of nodes that survive. The component sizes
/// itself to its parent container by default; set `fullscreen = true` to fill
/// the viewport and follow window resizes. Explicit `width`/`height` override
/// automatic sizing.
///
/// `theme` may change after mount; the next frame draws with it.
///
/// Clicks are reported through `on_node_click`, `on_namespace_click` and
/// `on_click_outside`. Pass a [`NetworkGraphHandle`] to zoom or select from
/// outside the canvas.
#[component]
pub fn NetworkGraphCanvas(
	#[prop(into)] data: Signal<GraphInput>,
	#[prop(optional)] config: Option<LayoutConfig>,
	#[prop(optional, into)] theme: Option<Signal<Theme>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] on_node_click: Option<Callback<NodeDetails>>,
	#[prop(optional, into)] on_namespace_click: Option<Callback<NamespaceDetails>>,
	#[prop(optional, into)] on_click_outside: Option<Callback<()>>,
	#[prop(optional)] handle: Option<NetworkGraphHandle>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let handle = handle.unwrap_or_default();
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let frame_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

	let mount = StoredValue::new_local(Mount {
		handle: handle.clone(),
		animate: animate.clone(),
		frame_id: frame_id.clone(),
		resize_cb: resize_cb.clone(),
	});
	on_cleanup(move || {
		mount.try_with_value(Mount::release);
	});

	let handle_init = handle.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if handle_init.is_attached() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("netgraph: no window, canvas left blank");
			return;
		};

		let parent = |f: fn(&web_sys::Element) -> i32, fallback: f64| {
			canvas
				.parent_element()
				.map(|p| f(&p) as f64)
				.unwrap_or(fallback)
		};
		let (w, h) = match fullscreen.then(|| window_size(&window)).flatten() {
			Some(size) => size,
			None => (
				width.unwrap_or_else(|| parent(web_sys::Element::client_width, 800.0)),
				height.unwrap_or_else(|| parent(web_sys::Element::client_height, 600.0)),
			),
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().ok(),
			_ => None,
		};
		let Some(ctx) = ctx else {
			warn!("netgraph: 2d canvas context unavailable");
			return;
		};

		let input = data.get_untracked();
		let mut session = GraphSession::new(config.clone().unwrap_or_default(), &input, w, h);
		if let Some(theme) = theme {
			session.theme = theme.get_untracked();
		}
		handle_init.attach(session);
		info!("netgraph: mounted {}x{} canvas", w, h);

		if fullscreen {
			let (handle_resize, canvas_resize) = (handle_init.clone(), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				handle_resize.with(|s| s.resize(nw, nh, js_sys::Date::now()));
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (handle_anim, animate_inner, frame_inner) =
			(handle_init.clone(), animate.clone(), frame_id.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			frame_inner.set(None);
			let alive = handle_anim.with(|s| {
				let alive = s.frame(js_sys::Date::now());
				let (width, height) = s.driver.viewport();
				let scale = s.scaled();
				render::render(
					s.scene(),
					&Frame {
						ctx: &ctx,
						width,
						height,
						transform: s.transform(),
						scale: &scale,
						theme: &s.theme,
					},
				);
				alive
			});
			if alive != Some(true) {
				return;
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				frame_inner.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			frame_id.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	let handle_data = handle.clone();
	Effect::new(move |prev: Option<()>| {
		let input = data.get();
		if prev.is_some() {
			handle_data.with(|s| s.load(&input));
		}
	});

	if let Some(theme) = theme {
		let handle_theme = handle.clone();
		Effect::new(move |prev: Option<()>| {
			let theme = theme.get();
			if prev.is_some() {
				handle_theme.with(|s| s.theme = theme);
			}
		});
	}

	let dispatch = move |event: HostEvent| match event {
		HostEvent::NodeClick(details) => {
			if let Some(cb) = &on_node_click {
				cb.run(details);
			}
		}
		HostEvent::NamespaceClick(details) => {
			if let Some(cb) = &on_namespace_click {
				cb.run(details);
			}
		}
		HostEvent::ClickOutside => {
			if let Some(cb) = &on_click_outside {
				cb.run(());
			}
		}
	};

	let handle_md = handle.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			handle_md.with(|s| s.pointer_down(x, y));
		}
	};

	let handle_mm = handle.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			handle_mm.with(|s| s.pointer_move(x, y, js_sys::Date::now()));
		}
	};

	// Host callbacks run after the session borrow is released so they may
	// call back into the handle.
	let handle_mu = handle.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(event) = handle_mu.with(|s| s.pointer_up()).flatten() {
			dispatch(event);
		}
	};

	let handle_ml = handle.clone();
	let on_mouseleave = move |_: MouseEvent| {
		handle_ml.with(|s| s.pointer_leave());
	};

	let handle_wh = handle;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = canvas_point(canvas_ref, &ev) {
			handle_wh.with(|s| s.wheel(x, y, ev.delta_y()));
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
