use color_eyre::Result;
use rand::Rng;
use ratatui::{Terminal, backend::CrosstermBackend};
use ratatui_image::picker::Picker;
use std::time::{Duration, Instant};

use crate::audio::AudioManager;
use crate::config::GameConfig;
use crate::entities::{Buttons, Enemy, GameState, Spaceship};
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView, Starfield};
use crate::sprite::Assets;

/// Delay between an enemy going down and the next one appearing
pub const RESPAWN_DELAY: Duration = Duration::from_millis(1500);
const STAR_COUNT: usize = 60;
const FRAME_TIME: Duration = Duration::from_millis(16);

/// What happened during one simulation step, for sound effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameEvents {
    pub player_fired: bool,
    pub enemy_lasers_fired: usize,
    pub enemies_destroyed: u32,
}

/// The simulation: one spaceship against a stream of enemies
pub struct Game {
    config: GameConfig,
    assets: Assets,
    pub spaceship: Spaceship,
    pub enemies: Vec<Enemy>,
    pub starfield: Starfield,
    /// Enemies destroyed
    pub score: u32,
    pub frame_count: u64,
    respawn_timer: Duration,
}

impl Game {
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, assets: &Assets, rng: &mut R) -> Self {
        let screen = config.screen;
        let mut game = Self {
            config: config.clone(),
            assets: assets.clone(),
            spaceship: Spaceship::new(
                screen.width,
                screen.height,
                &config.spaceship,
                &config.laser,
                &config.barrier,
                assets,
            ),
            enemies: Vec::new(),
            starfield: Starfield::new(screen.width, screen.height, STAR_COUNT, rng),
            score: 0,
            frame_count: 0,
            respawn_timer: Duration::ZERO,
        };

        // Spawn the first enemy so the player doesn't have to wait
        game.spawn_enemy(rng);
        game
    }

    pub fn spawn_enemy<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.enemies.push(Enemy::new(
            self.config.screen.width,
            &self.config.enemy,
            &self.config.enemy_laser,
            &self.assets,
            rng,
        ));
        log::debug!("Spawned enemy #{}", self.score + 1);
    }

    pub fn is_over(&self) -> bool {
        self.spaceship.is_destroyed()
    }

    /// Advances the whole world by one frame that took `dt`
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: Duration,
        buttons: &Buttons,
        rng: &mut R,
    ) -> FrameEvents {
        let mut events = FrameEvents::default();
        self.frame_count += 1;

        let lasers_before = self.spaceship.lasers().len();
        self.spaceship.move_step(buttons);
        events.player_fired = self.spaceship.lasers().len() > lasers_before;
        self.spaceship.update_lasers();
        self.spaceship.update_barrier(dt);

        let screen_height = self.config.screen.height as i32;
        for enemy in &mut self.enemies {
            enemy.move_step(dt, rng);
            events.enemy_lasers_fired += enemy.shoot(dt, rng);
            enemy.update_lasers(screen_height);
        }

        events.enemies_destroyed = self.check_collisions();
        self.score += events.enemies_destroyed;

        // Destroyed enemies linger until their last laser is gone
        self.enemies.retain(|enemy| !enemy.is_spent());

        if self.enemies.iter().all(Enemy::is_destroyed) {
            self.respawn_timer += dt;
            if self.respawn_timer >= RESPAWN_DELAY {
                self.respawn_timer = Duration::ZERO;
                self.spawn_enemy(rng);
            }
        } else {
            self.respawn_timer = Duration::ZERO;
        }

        self.starfield.scroll();
        events
    }

    /// Resolves hitbox overlaps and returns how many enemies were destroyed
    fn check_collisions(&mut self) -> u32 {
        let mut destroyed = 0;

        // Player lasers hitting enemies
        let mut index = 0;
        while index < self.spaceship.lasers().len() {
            let bounds = self.spaceship.lasers()[index].bounds();
            let target = self
                .enemies
                .iter_mut()
                .find(|enemy| !enemy.is_destroyed() && enemy.hitbox().intersects(&bounds));

            match target {
                Some(enemy) => {
                    let damage = self
                        .spaceship
                        .take_laser(index)
                        .map_or(0, |laser| laser.damage);
                    enemy.take_damage(damage);
                    if enemy.is_destroyed() {
                        destroyed += 1;
                    }
                }
                None => index += 1,
            }
        }

        // Enemy lasers hitting the spaceship
        let ship_hitbox = self.spaceship.hitbox();
        for enemy in &mut self.enemies {
            let mut index = 0;
            while index < enemy.lasers().len() {
                if enemy.lasers()[index].bounds().intersects(&ship_hitbox) {
                    enemy.take_laser(index);
                    self.spaceship.take_damage();
                } else {
                    index += 1;
                }
            }
        }

        destroyed
    }
}

/// The main application which holds the state and logic of the application.
pub struct App {
    running: bool,
    game_state: GameState,
    config: GameConfig,
    assets: Assets,
    game: Game,
    /// Frames info
    last_frame_time: Instant,
    fps: u32,
    /// Game timers
    game_start_time: Instant,
    final_time_secs: Option<u64>,
    /// internal components
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(
        config: GameConfig,
        assets: Assets,
        picker: Picker,
        reports_key_releases: bool,
    ) -> Self {
        let game = Game::new(&config, &assets, &mut rand::rng());
        let audio_manager = AudioManager::new(&config.assets.laser_sound);
        let now = Instant::now();

        Self {
            running: true,
            game_state: GameState::Playing,
            config,
            assets,
            game,
            last_frame_time: now,
            fps: 0,
            game_start_time: now,
            final_time_secs: None,
            input_manager: InputManager::new(reports_key_releases),
            renderer: GameRenderer::new(picker),
            audio_manager,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        let mut rng = rand::rng();

        while self.running {
            let now = Instant::now();
            let dt = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;
            if dt.as_micros() > 0 {
                self.fps = (1_000_000 / dt.as_micros()) as u32;
            }

            terminal.draw(|frame| {
                // Use final time if game is over, otherwise calculate current elapsed time
                let elapsed_time_secs = self
                    .final_time_secs
                    .unwrap_or_else(|| self.game_start_time.elapsed().as_secs());
                let view = RenderView {
                    game_state: self.game_state,
                    spaceship: &self.game.spaceship,
                    enemies: &self.game.enemies,
                    starfield: &self.game.starfield,
                    score: self.game.score,
                    fps: self.fps,
                    elapsed_time_secs,
                    screen_width: self.config.screen.width,
                    screen_height: self.config.screen.height,
                };
                self.renderer.render(frame, &view);
            })?;

            self.input_manager.poll_events(self.game_state)?;
            let actions = self.input_manager.actions().to_vec();
            self.process_actions(&actions);

            if self.game_state == GameState::Playing {
                let buttons = self.input_manager.buttons(self.game_state);
                let events = self.game.update(dt, &buttons, &mut rng);
                self.play_sounds(&events);

                if self.game.is_over() {
                    self.final_time_secs = Some(self.game_start_time.elapsed().as_secs());
                    self.game_state = GameState::GameOver;
                    log::info!("Game over, {} enemies destroyed", self.game.score);
                }
            }

            std::thread::sleep(FRAME_TIME);
        }
        Ok(())
    }

    fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::Pause => {
                    self.game_state = GameState::Paused;
                }
                InputAction::Resume => {
                    self.game_state = GameState::Playing;
                }
                InputAction::Restart => {
                    self.game = Game::new(&self.config, &self.assets, &mut rand::rng());
                    self.game_start_time = Instant::now();
                    self.final_time_secs = None;
                    self.game_state = GameState::Playing;
                    log::info!("Restarted");
                }
            }
        }
    }

    fn play_sounds(&self, events: &FrameEvents) {
        if events.player_fired {
            self.audio_manager.play_laser();
        }
        if events.enemy_lasers_fired > 0 {
            self.audio_manager.play_enemy_laser();
        }
    }
}
