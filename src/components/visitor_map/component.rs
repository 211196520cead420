use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::boundaries::fetch_world;
use super::render;
use super::state::{VisitorMapConfig, VisitorMapState};
use crate::components::ticker::Tick;

pub const LOAD_FAILED: &str =
	"Failed to load map data. Please check your internet connection or try again later.";
const MIN_WIDTH: f64 = 320.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Boundaries {
	Loading,
	Ready,
	Failed,
}

fn canvas_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: f64) -> (f64, f64) {
	let w = width.unwrap_or_else(|| {
		canvas
			.parent_element()
			.map(|p| p.client_width() as f64)
			.unwrap_or(960.0)
	});
	(w.max(MIN_WIDTH), height)
}

/// World map of simulated visitors, grouped into markers sized by count.
#[component]
pub fn VisitorMapCanvas(
	#[prop(optional)] config: VisitorMapConfig,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = 500.0)] height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<VisitorMapState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (visitors, set_visitors) = signal(0usize);
	let (boundaries, set_boundaries) = signal(Boundaries::Loading);
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
		let url = config.boundary_url.clone();
		*state_init.borrow_mut() = Some(VisitorMapState::new(config.clone(), w, h));

		let state_fetch = state_init.clone();
		spawn_local(async move {
			match fetch_world(&url).await {
				Ok(world) => {
					if let Some(ref mut s) = *state_fetch.borrow_mut() {
						s.set_world(world);
					}
					set_boundaries.set(Boundaries::Ready);
				}
				Err(err) => {
					error!("Failed to load world boundaries from {url}: {err}");
					set_boundaries.set(Boundaries::Failed);
				}
			}
		});

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = canvas_size(&canvas_resize, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
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
				let count = s.visitor_count();
				if visitors.get_untracked() != count {
					set_visitors.set(count);
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.hover(x, y);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.clear_hover();
		}
	};

	view! {
		<div class="visitor-map">
			<p class="visitor-count">{move || format!("{} visitors online", visitors.get())}</p>
			<canvas
				node_ref=canvas_ref
				class="visitor-map-canvas"
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				style="display: block;"
			/>
			<Show when=move || boundaries.get() == Boundaries::Failed>
				<p class="map-error">{LOAD_FAILED}</p>
			</Show>
		</div>
	}
}
