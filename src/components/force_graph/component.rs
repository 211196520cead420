use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::focus::FocusStyle;
use super::render;
use super::simulation::SimulationConfig;
use super::state::{FocusPanel, ForceGraphState};
use super::types::GraphData;
use crate::components::ticker::Tick;

const PANEL_WIDTH: f64 = 250.0;
const MIN_WIDTH: f64 = 320.0;
const MIN_HEIGHT: f64 = 240.0;

fn canvas_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: f64) -> (f64, f64) {
	let w = width.unwrap_or_else(|| {
		canvas
			.parent_element()
			.map(|p| p.client_width() as f64 - PANEL_WIDTH)
			.unwrap_or(800.0)
	});
	(w.max(MIN_WIDTH), height.max(MIN_HEIGHT))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Force-directed view of courses and artworks with a click-to-focus side
/// panel.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = HashMap::new())] descriptions: HashMap<String, String>,
	#[prop(optional)] config: SimulationConfig,
	#[prop(optional)] style: FocusStyle,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = 800.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let descriptions = Rc::new(descriptions);
	let (panel, set_panel) = signal(None::<FocusPanel>);
	let (load_error, set_load_error) = signal(None::<String>);
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = canvas_size(&canvas, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("Canvas 2d context unavailable");
			return;
		};
		match ForceGraphState::new(&data.get(), config.clone(), style.clone(), w, h) {
			Ok(s) => *state_init.borrow_mut() = Some(s),
			Err(err) => {
				error!("Invalid graph data: {err}");
				set_load_error.set(Some(err.to_string()));
				return;
			}
		}

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = canvas_size(&canvas_resize, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.rebuild(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(js_sys::Date::now());
				render::render(&s.frame(), &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let (state_mu, descriptions_mu) = (state.clone(), descriptions.clone());
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.release();
			set_panel.set(s.panel(descriptions_mu.as_ref()));
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.leave();
		}
	};

	let state_back = state.clone();
	let on_back = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_back.borrow_mut() {
			s.clear_focus();
		}
		set_panel.set(None);
	};

	view! {
		<div class="nodelink-container" style="display: flex; gap: 1rem;">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				style="display: block; cursor: grab;"
			/>
			<aside
				class="nodelink-description-panel"
				style:display=move || if panel.get().is_some() { "block" } else { "none" }
				style:width=format!("{PANEL_WIDTH}px")
			>
				<button class="nodelink-back-button" on:click=on_back>
					"Back"
				</button>
				<h3 class="nodelink-panel-title">
					{move || panel.get().map(|p| p.title).unwrap_or_default()}
				</h3>
				<div
					class="nodelink-panel-content"
					inner_html=move || panel.get().map(|p| p.description).unwrap_or_default()
				/>
			</aside>
			<Show when=move || load_error.get().is_some()>
				<p class="graph-error">
					{move || load_error.get().map(|e| format!("Could not build graph: {e}"))}
				</p>
			</Show>
		</div>
	}
}
