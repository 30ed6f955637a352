//! Globewire entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use globewire::camera::OrbitController;
    use globewire::catalog::Catalog;
    use globewire::geo::FeatureCollection;
    use globewire::renderer::GlobeRenderState;
    use globewire::{GlobeConfig, SceneGraph};

    const COUNTRIES_URL: &str = "/data/ne_110m_admin_0_countries.geojson";

    /// Everything the frame loop touches
    struct App {
        scene: SceneGraph,
        camera: OrbitController,
        render_state: Option<GlobeRenderState>,
        config: GlobeConfig,
        catalog: Catalog,
        /// Parsed boundary data parked here by the fetch until the next
        /// frame drains it (latest completed fetch wins)
        pending_boundaries: Option<FeatureCollection>,
        /// Cleared on teardown; the frame chain stops rescheduling
        running: bool,
    }

    impl App {
        fn new(config: GlobeConfig, width: u32, height: u32, seed: u64) -> Self {
            let scene = SceneGraph::compose(&config, seed);
            let mut camera = OrbitController::new(width, height);
            camera.look_at_geo(config.initial_position);
            camera.set_auto_rotate(config.auto_rotate, config.auto_rotate_speed);

            Self {
                scene,
                camera,
                render_state: None,
                config,
                catalog: Catalog::new(seed),
                pending_boundaries: None,
                running: true,
            }
        }

        /// One frame: drain data updates, advance, draw
        fn frame(&mut self) {
            if let Some(collection) = self.pending_boundaries.take() {
                self.scene.set_boundaries(&collection);
            }
            if self.catalog.tick() {
                let specs = self.catalog.satellites().to_vec();
                self.scene.set_satellites(&specs);
            }

            self.camera.update();
            self.scene.advance(&self.config);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.scene, &self.camera) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        render_state.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Handle one viewport change: camera aspect and surface pixel size,
        /// once each
        fn resize(&mut self, width: u32, height: u32) {
            self.camera.set_viewport(width, height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
        }
    }

    /// Scoped resources released together on teardown
    struct AppHandle {
        app: Rc<RefCell<App>>,
        canvas: HtmlCanvasElement,
        resize_closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
    }

    impl AppHandle {
        /// Exactly-once teardown: stop the frame chain, unhook the resize
        /// listener, detach the canvas. Safe to call repeatedly.
        fn dispose(&mut self) {
            self.app.borrow_mut().running = false;

            if let Some(closure) = self.resize_closure.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.remove_event_listener_with_callback(
                        "resize",
                        closure.as_ref().unchecked_ref(),
                    );
                }
            }

            self.canvas.remove();
            log::info!("Globe torn down");
        }
    }

    thread_local! {
        static HANDLE: RefCell<Option<AppHandle>> = const { RefCell::new(None) };
    }

    /// Canvas pixel size from the viewport, DPR-scaled (clamped at 2)
    fn viewport_size(window: &web_sys::Window) -> (u32, u32) {
        let dpr = window.device_pixel_ratio().min(2.0);
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        ((width * dpr) as u32, (height * dpr) as u32)
    }

    async fn fetch_geojson(url: &str) -> Result<FeatureCollection, String> {
        use web_sys::{Request, RequestInit, RequestMode, Response};

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let request = Request::new_with_str_and_init(url, &opts)
            .map_err(|e| format!("Failed to create request: {:?}", e))?;

        let window = web_sys::window().ok_or("No window")?;
        let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| format!("Fetch failed: {:?}", e))?;

        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| "Response is not a Response")?;

        if !resp.ok() {
            return Err(format!("HTTP error: {}", resp.status()));
        }

        let text = wasm_bindgen_futures::JsFuture::from(
            resp.text().map_err(|e| format!("Failed to read body: {:?}", e))?,
        )
        .await
        .map_err(|e| format!("Failed to read body: {:?}", e))?;

        let json = text.as_string().ok_or("Body is not a string")?;
        FeatureCollection::from_json(&json).map_err(|e| format!("Bad GeoJSON: {}", e))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Globewire starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let body = document.body().expect("no body");

        // The shell owns the render surface: create, attach, size
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .expect("failed to create canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_id("globe-canvas");
        body.append_child(&canvas).expect("failed to attach canvas");

        let (width, height) = viewport_size(&window);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let config = GlobeConfig::default();
        let app = Rc::new(RefCell::new(App::new(config, width, height, seed)));

        log::info!("Scene composed with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = GlobeRenderState::new(surface, &adapter, width, height).await;
        {
            let mut a = app.borrow_mut();
            render_state.upload_static(&a.scene);
            a.render_state = Some(render_state);

            let arcs = a.catalog.sample_arcs();
            a.scene.set_arcs(&arcs);
        }

        // Boundary data arrives whenever the fetch completes; the frame loop
        // picks it up on the next pass
        {
            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match fetch_geojson(COUNTRIES_URL).await {
                    Ok(collection) => {
                        log::info!("Country boundaries loaded");
                        app.borrow_mut().pending_boundaries = Some(collection);
                    }
                    Err(e) => log::warn!("Country boundaries unavailable: {}", e),
                }
            });
        }

        // Viewport listener: handled per event, synchronously, no debounce
        let resize_closure = {
            let app = app.clone();
            let canvas = canvas.clone();
            Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(window) = web_sys::window() {
                    let (width, height) = viewport_size(&window);
                    canvas.set_width(width);
                    canvas.set_height(height);
                    app.borrow_mut().resize(width, height);
                }
            })
        };
        window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())
            .expect("failed to attach resize listener");

        HANDLE.with(|handle| {
            *handle.borrow_mut() = Some(AppHandle {
                app: app.clone(),
                canvas,
                resize_closure: Some(resize_closure),
            });
        });

        request_animation_frame(app);

        log::info!("Globewire running!");
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        if !app.borrow().running {
            return;
        }
        app.borrow_mut().frame();
        request_animation_frame(app);
    }

    /// Tear down the globe from the page; idempotent
    #[wasm_bindgen]
    pub fn dispose_globe() {
        HANDLE.with(|handle| {
            if let Some(mut h) = handle.borrow_mut().take() {
                h.dispose();
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Globewire (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Exercise the simulation without a GPU
    demo_convergence();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_convergence() {
    use globewire::catalog::Catalog;
    use globewire::{GlobeConfig, SceneGraph};

    let config = GlobeConfig::default();
    let mut scene = SceneGraph::compose(&config, 42);
    let mut catalog = Catalog::new(42);

    let arcs = catalog.sample_arcs();
    scene.set_arcs(&arcs);

    println!("\nRunning headless fleet demo...");
    for frame in 0..2000u32 {
        if catalog.tick() {
            let specs = catalog.satellites().to_vec();
            scene.set_satellites(&specs);
        }
        scene.advance(&config);

        if frame % 500 == 0 && !scene.satellites.markers.is_empty() {
            let worst = scene
                .satellites
                .markers
                .iter()
                .map(|m| (m.position - m.target_position()).length())
                .fold(0.0f64, f64::max);
            println!(
                "frame {frame}: {} markers, worst distance-to-slot {worst:.6}",
                scene.satellites.markers.len()
            );
        }
    }
    println!("Done.");
}
