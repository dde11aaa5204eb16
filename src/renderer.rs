use image::{DynamicImage, Rgba, RgbaImage};
use rand::Rng;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use ratatui_image::{StatefulImage, picker::Picker};

use crate::entities::{Enemy, GameState, Spaceship};

const BACKGROUND: Rgba<u8> = Rgba([4, 4, 16, 255]);
const STAR: Rgba<u8> = Rgba([90, 90, 110, 255]);

/// Slowly falling background stars
#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<(u32, u32)>,
    height: u32,
}

impl Starfield {
    pub fn new<R: Rng + ?Sized>(width: u32, height: u32, count: usize, rng: &mut R) -> Self {
        let stars = (0..count)
            .map(|_| (rng.random_range(0..width), rng.random_range(0..height)))
            .collect();
        Self { stars, height }
    }

    /// Moves every star down one pixel, wrapping at the bottom
    pub fn scroll(&mut self) {
        for (_, y) in &mut self.stars {
            *y = (*y + 1) % self.height;
        }
    }

    pub fn stars(&self) -> &[(u32, u32)] {
        &self.stars
    }

    fn draw(&self, frame: &mut RgbaImage) {
        for &(x, y) in &self.stars {
            if x < frame.width() && y < frame.height() {
                frame.put_pixel(x, y, STAR);
            }
        }
    }
}

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game_state: GameState,
    pub spaceship: &'a Spaceship,
    pub enemies: &'a [Enemy],
    pub starfield: &'a Starfield,
    pub score: u32,
    pub fps: u32,
    pub elapsed_time_secs: u64,
    pub screen_width: u32,
    pub screen_height: u32,
}

/// Composites the starfield, enemies and spaceship (with its HUD) into a fresh frame buffer
pub fn compose_frame(view: &RenderView) -> RgbaImage {
    let mut frame = RgbaImage::from_pixel(view.screen_width, view.screen_height, BACKGROUND);
    view.starfield.draw(&mut frame);
    for enemy in view.enemies {
        enemy.draw(&mut frame);
    }
    view.spaceship.draw(&mut frame);
    frame
}

/// Puts composed frames on the terminal through ratatui-image
pub struct GameRenderer {
    picker: Picker,
}

impl GameRenderer {
    pub fn new(picker: Picker) -> Self {
        Self { picker }
    }

    /// Main render method that dispatches to state-specific overlays
    pub fn render(&mut self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);
        match view.game_state {
            GameState::Playing => {}
            GameState::Paused => Self::render_paused(frame),
            GameState::GameOver => Self::render_game_over(frame, view),
        }
    }

    fn render_game(&mut self, frame: &mut Frame, view: &RenderView) {
        let [stats_area, game_area, controls_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let image = DynamicImage::ImageRgba8(compose_frame(view));
        let mut protocol = self.picker.new_resize_protocol(image);
        frame.render_stateful_widget(StatefulImage::default(), game_area, &mut protocol);

        frame.render_widget(Paragraph::new(Self::stats_line(view)), stats_area);

        let controls = Line::from(vec![Span::styled(
            "[WASD/Arrows: Move] [Space: Fire] [B: Barrier] [P: Pause] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }

    fn stats_line(view: &RenderView) -> Line<'static> {
        let ship = view.spaceship;
        let barrier = ship.barrier();
        let minutes = view.elapsed_time_secs / 60;
        let seconds = view.elapsed_time_secs % 60;

        let health_style = if ship.health > 1 {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        };
        let barrier_text = if barrier.is_active() {
            format!("ON {:.1}s", barrier.remaining().as_secs_f32())
        } else {
            format!("{} left", barrier.uses_remaining())
        };

        Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                view.score.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  HP: ", Style::default().fg(Color::DarkGray)),
            Span::styled(ship.health.to_string(), health_style),
            Span::styled("  Barrier: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                barrier_text,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Time: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{minutes:02}:{seconds:02}"),
                Style::default().fg(Color::White),
            ),
            Span::styled("  FPS: ", Style::default().fg(Color::DarkGray)),
            Span::styled(view.fps.to_string(), Style::default().fg(Color::White)),
        ])
    }

    fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }

    fn render_paused(frame: &mut Frame) {
        let pause_text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];
        let pause_area = Self::centered_box(frame.area(), 30, 6);

        frame.render_widget(Clear, pause_area);
        frame.render_widget(
            Paragraph::new(pause_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .alignment(Alignment::Center),
            pause_area,
        );
    }

    fn render_game_over(frame: &mut Frame, view: &RenderView) {
        let minutes = view.elapsed_time_secs / 60;
        let seconds = view.elapsed_time_secs % 60;

        let game_over_text = vec![
            Line::from(""),
            Line::from("GAME OVER!").centered().red().bold(),
            Line::from(""),
            Line::from(format!("Enemies destroyed: {}", view.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(format!("Time survived: {minutes:02}:{seconds:02}"))
                .centered()
                .cyan()
                .bold(),
            Line::from(""),
            Line::from("Press R to restart").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];
        let game_over_area = Self::centered_box(frame.area(), 36, 10);

        frame.render_widget(Clear, game_over_area);
        frame.render_widget(
            Paragraph::new(game_over_text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .alignment(Alignment::Center),
            game_over_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sprite::Assets;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_starfield_wraps() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut starfield = Starfield::new(10, 4, 5, &mut rng);
        let before: Vec<_> = starfield.stars().to_vec();
        for _ in 0..4 {
            starfield.scroll();
        }
        assert_eq!(starfield.stars(), before.as_slice());
        assert!(starfield.stars().iter().all(|&(x, y)| x < 10 && y < 4));
    }

    #[test]
    fn test_compose_frame_draws_entities() {
        let config = GameConfig::default();
        let assets = Assets::placeholder(&config);
        let mut rng = StdRng::seed_from_u64(2);
        let enemy = Enemy::new(
            config.screen.width,
            &config.enemy,
            &config.enemy_laser,
            &assets,
            &mut rng,
        );
        let ship = Spaceship::new(
            config.screen.width,
            config.screen.height,
            &config.spaceship,
            &config.laser,
            &config.barrier,
            &assets,
        );
        let starfield = Starfield::new(240, 240, 0, &mut rng);
        let view = RenderView {
            game_state: GameState::Playing,
            spaceship: &ship,
            enemies: std::slice::from_ref(&enemy),
            starfield: &starfield,
            score: 0,
            fps: 60,
            elapsed_time_secs: 0,
            screen_width: 240,
            screen_height: 240,
        };

        let frame = compose_frame(&view);
        assert_eq!(frame.dimensions(), (240, 240));
        assert_eq!(frame.get_pixel(0, 0), &BACKGROUND);
        // Enemy sprite at the top centre
        assert_eq!(frame.get_pixel(120, 30), &Rgba([220, 40, 40, 255]));
        // Ship sprite near the bottom
        assert_eq!(frame.get_pixel(125, 205), &Rgba([40, 200, 80, 255]));
    }
}
