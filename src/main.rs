//! Bingo Drop entry point
//!
//! On the web this wires the page to a `GameController` and drives it from
//! `requestAnimationFrame`. Natively it plays one seeded session headlessly.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, HtmlInputElement};

    use bingo_drop::GameController;
    use bingo_drop::platform::web::{DomSurface, settings_from_page};
    use bingo_drop::sim::GameEvent;

    type Game = GameController<DomSurface>;

    /// Page state shared between callbacks
    struct App {
        game: Game,
        document: Document,
        last_time: f64,
    }

    impl App {
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time) / 1000.0
            } else {
                0.0
            };
            self.last_time = time;

            self.game
                .update(Duration::try_from_secs_f64(dt).unwrap_or_default());
            for event in self.game.drain_events() {
                self.apply(&event);
            }
        }

        /// Reflect a game event in the page
        fn apply(&self, event: &GameEvent) {
            match event {
                GameEvent::BoardChanged | GameEvent::SessionStarted => {
                    self.render_board();
                    self.render_count();
                }
                GameEvent::NumberDrawn { number, on_board } => {
                    if *on_board {
                        if let Some(i) = self.game.board().position(*number) {
                            self.mark_cell(i);
                        }
                    }
                    self.render_count();
                }
                GameEvent::MessageShown { text, is_win } => self.show_message(text, *is_win),
                GameEvent::MessageHidden => {
                    if let Some(el) = self.document.get_element_by_id("message") {
                        let _ = el.set_attribute("class", "message hidden");
                    }
                }
                GameEvent::LinesCompleted { .. } | GameEvent::SessionEnded { .. } => {
                    self.render_count();
                }
            }
        }

        fn render_board(&self) {
            let Some(grid) = self.document.get_element_by_id("board") else {
                return;
            };
            grid.set_inner_html("");
            for (i, &number) in self.game.board().cells().iter().enumerate() {
                let Ok(cell) = self.document.create_element("div") else {
                    continue;
                };
                cell.set_id(&format!("cell-{}", i));
                cell.set_class_name(if self.game.drawn().contains(number) {
                    "cell marked"
                } else {
                    "cell"
                });
                cell.set_text_content(Some(&number.to_string()));
                let _ = grid.append_child(&cell);
            }
        }

        fn mark_cell(&self, index: usize) {
            if let Some(cell) = self.document.get_element_by_id(&format!("cell-{}", index)) {
                let _ = cell.class_list().add_1("marked");
            }
        }

        fn render_count(&self) {
            let state = self.game.state();
            if let Some(el) = self.document.get_element_by_id("drawn-count") {
                el.set_text_content(Some(&format!(
                    "{} / {} balls, {} lines",
                    state.drawn.len(),
                    state.max_balls,
                    state.winning_lines
                )));
            }
        }

        fn show_message(&self, text: &str, is_win: bool) {
            if let Some(el) = self.document.get_element_by_id("message") {
                el.set_text_content(Some(text));
                let class = if is_win { "message win" } else { "message" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Bingo Drop starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let container: HtmlElement = document
            .get_element_by_id("physics-container")
            .ok_or("no #physics-container")?
            .dyn_into()?;

        let settings = settings_from_page(&document);
        let seed = js_sys::Date::now() as u64;
        let game = GameController::new(settings, DomSurface::new(container), seed);

        let app = Rc::new(RefCell::new(App {
            game,
            document: document.clone(),
            last_time: 0.0,
        }));
        {
            let mut a = app.borrow_mut();
            for event in a.game.drain_events() {
                a.apply(&event);
            }
        }

        setup_controls(&document, app.clone())?;
        request_animation_frame(app);

        log::info!("Bingo Drop running!");
        Ok(())
    }

    fn setup_controls(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Start button
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                let bounds = a.game.surface().bounds();
                a.game.start_session(bounds);
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // New board button
        if let Some(btn) = document.get_element_by_id("new-board-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().game.reset_board();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Session length input
        if let Some(input) = document.get_element_by_id("max-balls") {
            let input: HtmlInputElement = input.dyn_into()?;
            input.set_value(&app.borrow().game.settings().max_balls.to_string());

            let field = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                let requested = field.value().trim().parse().unwrap_or(0);
                let effective = a.game.set_max_balls(requested);
                field.set_value(&effective.to_string());
                a.render_count();
            });
            input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().update(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use bingo_drop::render::{Bounds, HeadlessSurface};
    use bingo_drop::sim::{GameEvent, SessionPhase};
    use bingo_drop::{GameController, Settings};

    env_logger::init();
    log::info!("Bingo Drop (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading settings from {}", path);
            Settings::from_json(&std::fs::read_to_string(path)?)?
        }
        None => Settings::default(),
    };
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let mut game: GameController<HeadlessSurface> =
        GameController::new(settings, HeadlessSurface::new(), seed);
    println!("{}", game.board());

    game.start_session(Bounds::new(400.0, 600.0));

    // Virtual 60 fps frames, capped so a stuck session cannot spin forever
    let frame = Duration::from_millis(16);
    let limit = Duration::from_secs(600);
    while game.phase() != SessionPhase::Ended && game.now() < limit {
        game.update(frame);
        for event in game.drain_events() {
            match event {
                GameEvent::NumberDrawn { number, on_board } => {
                    println!("{:>2}{}", number, if on_board { " *" } else { "" });
                }
                GameEvent::MessageShown { text, .. } => println!("> {}", text),
                _ => {}
            }
        }
    }

    println!(
        "{} balls drawn, {} lines, {} balls resting",
        game.drawn().len(),
        game.state().winning_lines,
        game.surface().len()
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
