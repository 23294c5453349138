//! Game controller
//!
//! Owns the board and draw state, the message, the timer schedule and the
//! physics adapter. The host calls `update` once per frame; everything that
//! happens later (draw ticks, staggered ball introductions, message hiding)
//! is an action on the schedule, consumed in due order by that one loop.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::board::{Board, DrawnSet};
use super::lines::count_lines;
use super::message::{Message, game_over_text, new_lines_text};
use super::schedule::Schedule;
use super::state::{GameEvent, GameState, SessionPhase};
use crate::error::GameError;
use crate::physics::adapter::spawn_point;
use crate::physics::{Ball, BodyParams, Launch, PhysicsAdapter, PhysicsEngine, World};
use crate::render::{BallSurface, BallVisual, Bounds};
use crate::settings::{Settings, clamp_max_balls};

/// Smallest batch drawn per tick
pub const BATCH_MIN: usize = 3;
/// Largest batch drawn per tick
pub const BATCH_MAX: usize = 5;

/// Deferred work, tagged with the session generation it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    DrawTick { generation: u32 },
    Introduce { generation: u32, number: u8 },
    HideMessage { serial: u32 },
}

/// Owns a bingo game and drives its physics
pub struct GameController<S: BallSurface, E: PhysicsEngine = World> {
    settings: Settings,
    state: GameState,
    message: Message,
    schedule: Schedule<Action>,
    physics: PhysicsAdapter<E>,
    surface: S,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl<S: BallSurface, E: PhysicsEngine> GameController<S, E> {
    /// Create a controller with a fresh board
    ///
    /// `seed` is used unless the settings pin one.
    pub fn new(settings: Settings, surface: S, seed: u64) -> Self {
        let settings = settings.validated();
        let seed = settings.seed.unwrap_or(seed);
        let mut rng = Pcg32::seed_from_u64(seed);
        let board = Board::generate(&mut rng);
        log::info!("Game created with seed {}", seed);

        Self {
            state: GameState::new(board, settings.max_balls),
            settings,
            message: Message::default(),
            schedule: Schedule::new(),
            physics: PhysicsAdapter::default(),
            surface,
            rng,
            events: vec![GameEvent::BoardChanged],
        }
    }

    /// (Re)create the physics world sized to the container
    pub fn initialize_physics(&mut self, bounds: Bounds) {
        self.physics.initialize(bounds, &mut self.surface);
    }

    /// Start a fresh session on the current board
    pub fn start_session(&mut self, bounds: Bounds) {
        self.state.reset_progress();
        self.initialize_physics(bounds);
        self.state.phase = SessionPhase::Running;

        let generation = self.state.generation;
        self.schedule
            .after(self.settings.draw_interval(), Action::DrawTick { generation });

        log::info!(
            "Session {} started ({} balls)",
            generation,
            self.state.max_balls
        );
        self.events.push(GameEvent::SessionStarted);
    }

    /// Run one draw tick
    ///
    /// Returns `Ok(false)` once no further draws will happen. Picks a batch
    /// of not-yet-drawn numbers and schedules their introduction one
    /// stagger apart.
    pub fn draw_next(&mut self) -> Result<bool, GameError> {
        if self.state.phase == SessionPhase::Ended {
            return Ok(false);
        }
        if self.state.is_exhausted() {
            self.finish_session();
            return Ok(false);
        }
        if !self.physics.is_initialized() {
            return Err(GameError::PhysicsNotInitialized);
        }

        let capacity = self.state.remaining_capacity();
        if capacity == 0 {
            // Everything allowed is already in flight
            return Ok(true);
        }
        let mut available = self.state.available_numbers();
        if available.is_empty() {
            return Ok(false);
        }

        let batch = self
            .rng
            .random_range(BATCH_MIN..=BATCH_MAX)
            .min(capacity)
            .min(available.len());
        let generation = self.state.generation;
        let stagger = self.settings.stagger();

        let mut picked = Vec::with_capacity(batch);
        for i in 0..batch {
            let number = available.swap_remove(self.rng.random_range(0..available.len()));
            self.state.pending.push(number);
            self.schedule
                .after(stagger * i as u32, Action::Introduce { generation, number });
            picked.push(number);
        }

        if self.state.phase == SessionPhase::Idle {
            self.state.phase = SessionPhase::Running;
        }
        log::info!("Drawing batch {:?}", picked);
        Ok(true)
    }

    /// Throw away the balls and the session, deal a new board
    pub fn reset_board(&mut self) {
        let cleared = self.physics.clear_balls(&mut self.surface);
        self.state.reset_progress();
        self.state.board = Board::generate(&mut self.rng);
        self.state.phase = SessionPhase::Idle;

        log::info!("New board dealt ({} balls cleared)", cleared);
        self.events.push(GameEvent::BoardChanged);
    }

    /// Set the session length; returns the effective (clamped) value
    ///
    /// Never drops below the balls already drawn this session. Reserved
    /// numbers beyond the new limit are released and will not enter.
    pub fn set_max_balls(&mut self, count: u32) -> u32 {
        let drawn = self.state.drawn.len() as u32;
        let clamped = clamp_max_balls(count).max(drawn);
        if clamped != count {
            log::warn!("max_balls {} out of range, using {}", count, clamped);
        }
        self.state.max_balls = clamped;
        self.settings.max_balls = clamped;

        let keep = (clamped - drawn) as usize;
        if self.state.pending.len() > keep {
            let released = self.state.pending.split_off(keep);
            log::debug!("Released reserved balls {:?}", released);
        }
        clamped
    }

    /// Show a message and schedule it to hide after the message duration
    pub fn show_message(&mut self, text: impl Into<String>, is_win: bool) {
        let serial = self.message.show(text, is_win);
        self.events.push(GameEvent::MessageShown {
            text: self.message.text.clone(),
            is_win,
        });
        self.schedule
            .after(self.settings.message_duration(), Action::HideMessage { serial });
    }

    /// Advance time: run due actions, then step physics and sync elements
    pub fn update(&mut self, dt: Duration) {
        let target = self.schedule.now() + dt;
        while let Some(action) = self.schedule.pop_until(target) {
            self.run(action);
        }
        self.schedule.advance_to(target);
        self.physics.advance(dt.as_secs_f32(), &mut self.surface);
    }

    /// Events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn drawn(&self) -> &DrawnSet {
        &self.state.drawn
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        self.physics.balls()
    }

    pub fn physics(&self) -> &PhysicsAdapter<E> {
        &self.physics
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.schedule.now()
    }

    fn run(&mut self, action: Action) {
        match action {
            Action::DrawTick { generation } => {
                if generation != self.state.generation {
                    log::debug!("Dropping draw tick from session {}", generation);
                    return;
                }
                match self.draw_next() {
                    Ok(true) => self
                        .schedule
                        .after(self.settings.draw_interval(), Action::DrawTick { generation }),
                    Ok(false) => log::info!("No more draws this session"),
                    Err(err) => log::error!("Draw tick failed: {}", err),
                }
            }
            Action::Introduce { generation, number } => {
                if generation != self.state.generation {
                    log::debug!("Dropping ball {} from session {}", number, generation);
                    return;
                }
                if !self.state.pending.contains(&number) {
                    log::debug!("Ball {} no longer reserved", number);
                    return;
                }
                if let Err(err) = self.introduce(number) {
                    log::error!("Could not introduce ball {}: {}", number, err);
                }
            }
            Action::HideMessage { serial } => {
                if self.message.hide(serial) {
                    self.events.push(GameEvent::MessageHidden);
                }
            }
        }
    }

    /// Put a drawn number into play and check the board
    fn introduce(&mut self, number: u8) -> Result<(), GameError> {
        self.state.pending.retain(|&n| n != number);
        let bounds = self.physics.bounds().ok_or(GameError::PhysicsNotInitialized)?;

        let visual = BallVisual::random(&mut self.rng);
        let center = spawn_point(&bounds, &mut self.rng);
        let params = BodyParams::random_ball(&mut self.rng);
        let launch = Launch::random(&mut self.rng);
        self.physics
            .spawn_ball(&mut self.surface, number, &visual, center, &params, &launch)?;

        self.state.drawn.insert(number);
        let on_board = self.state.board.contains(number);
        log::info!(
            "Ball {} drawn ({}/{}){}",
            number,
            self.state.drawn.len(),
            self.state.max_balls,
            if on_board { " - on the board" } else { "" }
        );
        self.events.push(GameEvent::NumberDrawn { number, on_board });

        if on_board {
            self.check_new_lines();
        }
        Ok(())
    }

    fn check_new_lines(&mut self) {
        let lines = count_lines(&self.state.board, &self.state.drawn);
        if lines <= self.state.winning_lines {
            return;
        }
        let new = lines - self.state.winning_lines;
        self.state.winning_lines = lines;
        log::info!("{} new line(s), {} total", new, lines);
        self.events.push(GameEvent::LinesCompleted { total: lines, new });
        self.show_message(new_lines_text(new), true);
    }

    /// Terminal message, shown once per session
    fn finish_session(&mut self) {
        if self.state.end_message_shown {
            return;
        }
        let lines = count_lines(&self.state.board, &self.state.drawn);
        self.state.end_message_shown = true;
        self.state.phase = SessionPhase::Ended;
        log::info!("Session over with {} line(s)", lines);

        self.show_message(game_over_text(self.state.max_balls, lines), lines > 0);
        self.events.push(GameEvent::SessionEnded { lines });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessSurface;
    use crate::sim::board::{CELL_COUNT, NUMBER_MAX};
    use proptest::prelude::*;

    const BOUNDS: Bounds = Bounds {
        width: 400.0,
        height: 300.0,
    };

    type TestController = GameController<HeadlessSurface>;

    fn controller(max_balls: u32, seed: u64) -> TestController {
        let settings = Settings {
            max_balls,
            ..Default::default()
        };
        GameController::new(settings, HeadlessSurface::new(), seed)
    }

    /// Controller whose board is 1..=25 row-major, physics ready
    fn numbered(max_balls: u32) -> TestController {
        let mut game = controller(max_balls, 1);
        game.state.board = Board::from_cells(std::array::from_fn(|i| i as u8 + 1)).unwrap();
        game.initialize_physics(BOUNDS);
        game
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn run(game: &mut TestController, total: Duration, step: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            game.update(step);
            elapsed += step;
        }
    }

    fn assert_valid_board(board: &Board) {
        let distinct: DrawnSet = board.cells().iter().copied().collect();
        assert_eq!(distinct.len(), CELL_COUNT);
    }

    #[test]
    fn test_draw_before_physics_is_an_error() {
        let mut game = controller(30, 3);
        assert!(matches!(
            game.draw_next(),
            Err(GameError::PhysicsNotInitialized)
        ));
        assert!(game.state().pending.is_empty());
        assert!(game.drawn().is_empty());
        assert_eq!(game.surface().len(), 0);
    }

    #[test]
    fn test_batch_enters_one_at_a_time() {
        let mut game = controller(30, 9);
        game.initialize_physics(BOUNDS);
        assert_eq!(game.draw_next().unwrap(), true);

        let batch = game.state().pending.len();
        assert!((BATCH_MIN..=BATCH_MAX).contains(&batch));

        game.update(Duration::ZERO);
        assert_eq!(game.drawn().len(), 1);
        game.update(ms(299));
        assert_eq!(game.drawn().len(), 1);
        game.update(ms(1));
        assert_eq!(game.drawn().len(), 2);

        game.update(ms(1500));
        assert_eq!(game.drawn().len(), batch);
        assert!(game.state().pending.is_empty());
        assert_eq!(game.balls().count(), batch);
        assert_eq!(game.surface().labels(), game.drawn().iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_five_ball_session_ends_once() {
        let mut game = controller(5, 77);
        game.start_session(BOUNDS);
        assert_eq!(game.phase(), SessionPhase::Running);

        run(&mut game, Duration::from_secs(20), ms(50));
        assert_eq!(game.drawn().len(), 5);
        assert_eq!(game.phase(), SessionPhase::Ended);
        assert!(game.state().end_message_shown);
        assert!(game.message().text.starts_with("5-ball game over!"));

        let ended = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::SessionEnded { .. }))
            .count();
        assert_eq!(ended, 1);

        for _ in 0..3 {
            assert_eq!(game.draw_next().unwrap(), false);
        }
        let events = game.drain_events();
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::SessionEnded { .. } | GameEvent::MessageShown { .. })),
            "terminal message shown again: {:?}",
            events
        );
        assert_eq!(game.drawn().len(), 5);
    }

    #[test]
    fn test_reset_board_is_idempotent() {
        let mut game = controller(30, 21);
        game.start_session(BOUNDS);
        run(&mut game, Duration::from_secs(4), ms(100));
        assert!(!game.drawn().is_empty());

        for _ in 0..2 {
            game.reset_board();
            assert_valid_board(game.board());
            assert!(game.drawn().is_empty());
            assert!(game.state().pending.is_empty());
            assert_eq!(game.balls().count(), 0);
            assert!(game.surface().is_empty());
            assert_eq!(game.phase(), SessionPhase::Idle);
        }
    }

    #[test]
    fn test_stale_introductions_are_dropped_after_reset() {
        let mut game = controller(30, 5);
        game.initialize_physics(BOUNDS);
        game.draw_next().unwrap();
        game.update(Duration::ZERO);
        assert_eq!(game.drawn().len(), 1);

        game.reset_board();
        run(&mut game, Duration::from_secs(3), ms(100));
        assert!(game.drawn().is_empty());
        assert!(game.surface().is_empty());
    }

    #[test]
    fn test_reset_stops_draw_ticks() {
        let mut game = controller(30, 6);
        game.start_session(BOUNDS);
        game.reset_board();
        run(&mut game, Duration::from_secs(6), ms(100));
        assert!(game.drawn().is_empty());
        assert_eq!(game.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_restart_mid_session_starts_clean() {
        let mut game = controller(10, 8);
        game.start_session(BOUNDS);
        run(&mut game, ms(1600), ms(100));
        assert!(!game.drawn().is_empty());

        game.start_session(BOUNDS);
        assert!(game.drawn().is_empty());
        assert_eq!(game.balls().count(), 0);
        assert!(game.surface().is_empty());

        run(&mut game, Duration::from_secs(15), ms(100));
        assert_eq!(game.drawn().len(), 10);
        assert_eq!(game.surface().labels(), game.drawn().iter().collect::<Vec<_>>());
        assert_eq!(game.physics().world_id(), Some(2));
    }

    #[test]
    fn test_line_message_only_when_count_grows() {
        let mut game = numbered(30);
        game.drain_events();

        for n in 1..=4 {
            game.introduce(n).unwrap();
        }
        assert!(!game.message().visible);

        game.introduce(5).unwrap();
        assert_eq!(game.state().winning_lines, 1);
        assert!(game.message().visible);
        assert!(game.message().is_win);
        assert_eq!(game.message().text, "Bingo! 1 new line!");

        // Off-board and non-completing numbers leave the message alone
        let shown_before = game.message().serial();
        game.introduce(40).unwrap();
        game.introduce(6).unwrap();
        assert_eq!(game.message().serial(), shown_before);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::LinesCompleted { total: 1, new: 1 }));
        assert!(events.contains(&GameEvent::NumberDrawn {
            number: 40,
            on_board: false
        }));

        game.update(ms(2999));
        assert!(game.message().visible);
        game.update(ms(1));
        assert!(!game.message().visible);
        assert_eq!(game.drain_events(), vec![GameEvent::MessageHidden]);
    }

    #[test]
    fn test_one_ball_completing_two_lines() {
        let mut game = numbered(30);
        // First row and first column, missing only the shared corner
        for n in [2, 3, 4, 5, 6, 11, 16, 21] {
            game.introduce(n).unwrap();
        }
        assert_eq!(game.state().winning_lines, 0);

        game.introduce(1).unwrap();
        assert_eq!(game.state().winning_lines, 2);
        assert_eq!(game.message().text, "Bingo! 2 new lines!");
    }

    #[test]
    fn test_terminal_message_without_lines() {
        let mut game = numbered(1);
        game.introduce(50).unwrap();

        assert_eq!(game.draw_next().unwrap(), false);
        assert_eq!(game.message().text, "1-ball game over! No lines this time.");
        assert!(!game.message().is_win);
        assert_eq!(game.phase(), SessionPhase::Ended);
    }

    #[test]
    fn test_terminal_message_with_lines() {
        let mut game = numbered(5);
        for n in 1..=5 {
            game.introduce(n).unwrap();
        }
        assert_eq!(game.draw_next().unwrap(), false);
        assert_eq!(game.message().text, "5-ball game over! You completed 1 line!");
        assert!(game.message().is_win);
    }

    #[test]
    fn test_replaced_message_keeps_full_duration() {
        let mut game = controller(30, 2);
        game.show_message("first", false);
        game.update(ms(2000));
        game.show_message("second", true);

        // The first message's hide fires here but must not hide "second"
        game.update(ms(1500));
        assert!(game.message().visible);
        assert_eq!(game.message().text, "second");

        game.update(ms(1500));
        assert!(!game.message().visible);
    }

    #[test]
    fn test_set_max_balls_clamps() {
        let mut game = controller(30, 1);
        assert_eq!(game.set_max_balls(0), 1);
        assert_eq!(game.set_max_balls(500), NUMBER_MAX as u32);
        assert_eq!(game.set_max_balls(12), 12);
        assert_eq!(game.state().max_balls, 12);
        assert_eq!(game.settings().max_balls, 12);
    }

    #[test]
    fn test_lowering_max_mid_batch_releases_reserved_balls() {
        let mut game = controller(30, 9);
        game.initialize_physics(BOUNDS);
        game.draw_next().unwrap();
        game.update(Duration::ZERO);
        assert_eq!(game.drawn().len(), 1);
        assert!(!game.state().pending.is_empty());

        assert_eq!(game.set_max_balls(1), 1);
        assert!(game.state().pending.is_empty());

        run(&mut game, Duration::from_secs(3), ms(100));
        assert_eq!(game.drawn().len(), 1);
        assert_eq!(game.surface().labels().len(), 1);

        assert_eq!(game.draw_next().unwrap(), false);
        assert_eq!(game.phase(), SessionPhase::Ended);
        assert_eq!(game.message().text, "1-ball game over! No lines this time.");
    }

    #[test]
    fn test_max_never_drops_below_drawn() {
        let mut game = controller(30, 4);
        game.initialize_physics(BOUNDS);
        game.draw_next().unwrap();
        game.update(ms(600));
        assert_eq!(game.drawn().len(), 3);

        // Whatever is still reserved gets released
        let pending = game.state().pending.len();
        assert_eq!(game.set_max_balls(1), 3);
        assert!(game.state().pending.is_empty());
        assert_eq!(game.set_max_balls(3 + pending as u32), 3 + pending as u32);
    }

    #[test]
    fn test_ended_session_stays_ended_when_max_raised() {
        let mut game = controller(3, 12);
        game.start_session(BOUNDS);
        run(&mut game, Duration::from_secs(10), ms(100));
        assert_eq!(game.phase(), SessionPhase::Ended);
        assert_eq!(game.drawn().len(), 3);

        assert_eq!(game.set_max_balls(6), 6);
        assert_eq!(game.draw_next().unwrap(), false);
        run(&mut game, Duration::from_secs(5), ms(100));
        assert_eq!(game.drawn().len(), 3);
        assert_eq!(game.phase(), SessionPhase::Ended);

        // A new session honours the raised limit
        game.start_session(BOUNDS);
        run(&mut game, Duration::from_secs(15), ms(100));
        assert_eq!(game.drawn().len(), 6);
        assert!(game.message().text.starts_with("6-ball game over!"));
    }

    #[test]
    fn test_long_frame_keeps_stagger_from_tick_time() {
        let mut game = controller(30, 15);
        game.start_session(BOUNDS);

        // Tick due at 1500 ms; balls at 1500 and 1800 fall inside this frame
        game.update(ms(2000));
        assert_eq!(game.drawn().len(), 2);
        assert_eq!(game.now(), ms(2000));

        game.update(ms(100));
        assert_eq!(game.drawn().len(), 3);
    }

    #[test]
    fn test_seed_from_settings_wins() {
        let pinned = Settings {
            seed: Some(1234),
            ..Default::default()
        };
        let a: TestController = GameController::new(pinned.clone(), HeadlessSurface::new(), 1);
        let b: TestController = GameController::new(pinned, HeadlessSurface::new(), 2);
        assert_eq!(a.board(), b.board());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_draws_respect_max_and_never_repeat(seed in any::<u64>(), max_balls in 1u32..=70) {
            let mut game = controller(max_balls, seed);
            game.start_session(BOUNDS);

            let mut elapsed = Duration::ZERO;
            while game.phase() != SessionPhase::Ended && elapsed < Duration::from_secs(90) {
                game.update(ms(250));
                elapsed += ms(250);
                prop_assert!(game.drawn().len() <= max_balls as usize);
                prop_assert!(
                    game.drawn().len() + game.state().pending.len() <= max_balls as usize
                );
            }

            prop_assert_eq!(game.phase(), SessionPhase::Ended);
            prop_assert_eq!(game.drawn().len(), max_balls as usize);
            // One element per drawn number, so nothing was drawn twice
            prop_assert_eq!(game.surface().labels(), game.drawn().iter().collect::<Vec<_>>());
            prop_assert!(game.drawn().iter().all(|n| (1..=NUMBER_MAX).contains(&n)));
        }
    }
}
