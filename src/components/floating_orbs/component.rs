//! Leptos component wrapping the orb canvas.
//!
//! The component creates a canvas element covering its container, sizes the
//! backing store for the device pixel ratio and wires up the browser signals
//! the effect listens to: pointer/touch movement, debounced window resize, page
//! visibility and the reduced-motion preference. An animation loop runs via
//! `requestAnimationFrame` while motion is allowed and the page is visible.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent,
	Window,
};

use super::config::OrbConfig;
use super::render;
use super::state::OrbField;
use super::viewport::{RESIZE_DEBOUNCE_MS, Viewport};

/// Bundles the effect instance with the canvas it draws on.
struct OrbContext {
	field: OrbField,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	resize_timer: Option<i32>,
	frame_request: Option<i32>,
}

type Shared<T> = Rc<RefCell<Option<T>>>;

/// Event closures kept alive for as long as the component is mounted.
#[derive(Default)]
struct Listeners {
	resize: Option<Closure<dyn FnMut()>>,
	mouse: Option<Closure<dyn FnMut(MouseEvent)>>,
	touch: Option<Closure<dyn FnMut(TouchEvent)>>,
	visibility: Option<Closure<dyn FnMut()>>,
}

/// Renders drifting, glowing orbs on a canvas behind the page content.
///
/// The canvas is fixed to the viewport and ignores pointer events, so it can
/// sit under any markup. Pass a `config` to override the default preset.
/// Unmounting stops the animation loop and removes every listener.
#[component]
pub fn FloatingOrbs(
	/// Effect configuration. Defaults to the "mist" preset.
	#[prop(optional, into)]
	config: Option<OrbConfig>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Shared<OrbContext> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut(f64)>> = Rc::new(RefCell::new(None));
	let listeners: Rc<RefCell<Listeners>> = Rc::new(RefCell::new(Listeners::default()));
	let config = config.unwrap_or_default();

	let owned = SendWrapper::new((context.clone(), animate.clone(), listeners.clone()));
	on_cleanup(move || {
		let (context, animate, listeners) = owned.take();
		teardown(&context, &animate, &listeners);
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if context.borrow().is_some() {
			return;
		}
		if let Err(err) = start(
			canvas,
			config.clone(),
			context.clone(),
			animate.clone(),
			listeners.clone(),
		) {
			warn!("floating-orbs: failed to start: {:?}", err);
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="floating-orbs-canvas"
			aria-hidden="true"
			style="position: fixed; inset: 0; width: 100vw; height: 100vh; display: block; pointer-events: none;"
		/>
	}
}

fn start(
	canvas: HtmlCanvasElement,
	config: OrbConfig,
	context: Shared<OrbContext>,
	animate: Shared<Closure<dyn FnMut(f64)>>,
	listeners: Rc<RefCell<Listeners>>,
) -> Result<(), JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
	let document = window
		.document()
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or_else(|| JsValue::from_str("2d context unavailable"))?
		.dyn_into()?;

	let reduced_motion = prefers_reduced_motion(&window);
	let viewport = measure(&canvas, &window);
	apply_viewport(&canvas, &ctx, &viewport);

	let field = OrbField::new(config, viewport, reduced_motion, SmallRng::seed_from_u64(entropy_seed()));
	info!(
		"floating-orbs: starting with preset {:?}, {} orbs, reduced motion: {}",
		field.config.name,
		field.particles.len(),
		reduced_motion
	);
	*context.borrow_mut() = Some(OrbContext {
		field,
		canvas,
		ctx,
		resize_timer: None,
		frame_request: None,
	});

	let (context_anim, animate_inner) = (context.clone(), animate.clone());
	*animate.borrow_mut() = Some(Closure::new(move |now: f64| {
		let reschedule = {
			let mut guard = context_anim.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			c.frame_request = None;
			c.field.scheduler.begin_frame();
			render::render(&mut c.field, &mut c.ctx, now);
			c.field.scheduler.end_frame()
		};
		if reschedule {
			request_frame(&context_anim, &animate_inner);
		}
	}));

	let passive = AddEventListenerOptions::new();
	passive.set_passive(true);
	let mut slots = listeners.borrow_mut();

	let context_resize = context.clone();
	let resize = slots.resize.insert(Closure::new(move || {
		schedule_resize(&context_resize);
	}));
	window.add_event_listener_with_callback_and_add_event_listener_options(
		"resize",
		resize.as_ref().unchecked_ref(),
		&passive,
	)?;

	let context_mouse = context.clone();
	let mouse = slots.mouse.insert(Closure::new(move |ev: MouseEvent| {
		if let Some(ref mut c) = *context_mouse.borrow_mut() {
			c.field.set_pointer(ev.client_x() as f64, ev.client_y() as f64);
		}
	}));
	window.add_event_listener_with_callback_and_add_event_listener_options(
		"mousemove",
		mouse.as_ref().unchecked_ref(),
		&passive,
	)?;

	let context_touch = context.clone();
	let touch = slots.touch.insert(Closure::new(move |ev: TouchEvent| {
		let Some(t) = ev.touches().get(0) else {
			return;
		};
		if let Some(ref mut c) = *context_touch.borrow_mut() {
			c.field.set_pointer(t.client_x() as f64, t.client_y() as f64);
		}
	}));
	window.add_event_listener_with_callback_and_add_event_listener_options(
		"touchmove",
		touch.as_ref().unchecked_ref(),
		&passive,
	)?;

	let (context_vis, animate_vis, document_vis) = (context.clone(), animate.clone(), document.clone());
	let visibility = slots.visibility.insert(Closure::new(move || {
		let resume = {
			let mut guard = context_vis.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			if document_vis.hidden() {
				c.field.scheduler.suspend();
				false
			} else {
				c.field.scheduler.resume()
			}
		};
		if resume {
			debug!("floating-orbs: resuming after page became visible");
			request_frame(&context_vis, &animate_vis);
		}
	}));
	document.add_event_listener_with_callback("visibilitychange", visibility.as_ref().unchecked_ref())?;
	drop(slots);

	let first_frame = {
		let mut guard = context.borrow_mut();
		match guard.as_mut() {
			Some(c) if !c.field.scheduler.animates() => {
				render::render_static(&c.field, &mut c.ctx);
				false
			}
			Some(c) => c.field.scheduler.request(),
			None => false,
		}
	};
	if first_frame {
		request_frame(&context, &animate);
	}
	Ok(())
}

fn request_frame(context: &Shared<OrbContext>, animate: &Shared<Closure<dyn FnMut(f64)>>) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let handle = match *animate.borrow() {
		Some(ref cb) => match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(handle) => handle,
			Err(err) => {
				warn!("floating-orbs: requestAnimationFrame failed: {:?}", err);
				return;
			}
		},
		None => return,
	};
	if let Some(ref mut c) = *context.borrow_mut() {
		c.frame_request = Some(handle);
	}
}

/// Stops the loop, cancels pending callbacks and detaches every listener.
fn teardown(
	context: &Shared<OrbContext>,
	animate: &Shared<Closure<dyn FnMut(f64)>>,
	listeners: &Rc<RefCell<Listeners>>,
) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Some(mut c) = context.borrow_mut().take() {
		if c.field.scheduler.shutdown() {
			if let Some(handle) = c.frame_request.take() {
				let _ = window.cancel_animation_frame(handle);
			}
		}
		if let Some(handle) = c.resize_timer.take() {
			window.clear_timeout_with_handle(handle);
		}
	}

	let slots = std::mem::take(&mut *listeners.borrow_mut());
	if let Some(ref cb) = slots.resize {
		let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}
	if let Some(ref cb) = slots.mouse {
		let _ = window.remove_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
	}
	if let Some(ref cb) = slots.touch {
		let _ = window.remove_event_listener_with_callback("touchmove", cb.as_ref().unchecked_ref());
	}
	if let (Some(cb), Some(document)) = (slots.visibility.as_ref(), window.document()) {
		let _ = document
			.remove_event_listener_with_callback("visibilitychange", cb.as_ref().unchecked_ref());
	}

	// Safe to drop: the only pending frame was cancelled above.
	animate.borrow_mut().take();
	debug!("floating-orbs: torn down");
}

/// Restarts the debounce timer for a resize signal.
fn schedule_resize(context: &Shared<OrbContext>) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let mut guard = context.borrow_mut();
	let Some(c) = guard.as_mut() else {
		return;
	};
	if let Some(handle) = c.resize_timer.take() {
		window.clear_timeout_with_handle(handle);
	}

	let token = c.field.request_resize();
	let context_settle = context.clone();
	let settle = Closure::once_into_js(move || settle_resize(&context_settle, token));
	match window.set_timeout_with_callback_and_timeout_and_arguments_0(
		settle.unchecked_ref(),
		RESIZE_DEBOUNCE_MS,
	) {
		Ok(handle) => c.resize_timer = Some(handle),
		Err(err) => warn!("floating-orbs: could not arm resize timer: {:?}", err),
	}
}

fn settle_resize(context: &Shared<OrbContext>, token: u64) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let mut guard = context.borrow_mut();
	let Some(c) = guard.as_mut() else {
		return;
	};
	c.resize_timer = None;

	let viewport = measure(&c.canvas, &window);
	if !c.field.settle_resize(token, viewport) {
		return;
	}
	apply_viewport(&c.canvas, &c.ctx, &viewport);
	// Resizing the backing store wipes it; a frozen scene has no next frame to repaint.
	if !c.field.scheduler.animates() {
		render::render_static(&c.field, &mut c.ctx);
	}
}

/// Logical canvas size, falling back to the window when layout hasn't happened yet.
fn measure(canvas: &HtmlCanvasElement, window: &Window) -> Viewport {
	let dpr = window.device_pixel_ratio();
	let (w, h) = (canvas.client_width() as f64, canvas.client_height() as f64);
	if w > 0.0 && h > 0.0 {
		return Viewport::new(w, h, dpr);
	}
	let extent = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	Viewport::new(extent(window.inner_width()), extent(window.inner_height()), dpr)
}

fn apply_viewport(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, viewport: &Viewport) {
	let (bw, bh) = viewport.backing_size();
	canvas.set_width(bw);
	canvas.set_height(bh);
	let _ = ctx.set_transform(viewport.dpr, 0.0, 0.0, viewport.dpr, 0.0, 0.0);
}

fn prefers_reduced_motion(window: &Window) -> bool {
	window
		.match_media("(prefers-reduced-motion: reduce)")
		.ok()
		.flatten()
		.is_some_and(|mq| mq.matches())
}

fn entropy_seed() -> u64 {
	let high = (js_sys::Math::random() * u32::MAX as f64) as u64;
	let low = js_sys::Date::now() as u64;
	(high << 32) ^ low
}
