// Library exports for testing and for the terminal binary
pub use app::{App, FrameEvents, Game};
pub use config::GameConfig;
pub use entities::{
    Barrier, Buttons, Direction, Enemy, EnemyLaser, GameState, Laser, Spaceship,
};
pub use error::GameError;
pub use hitbox::{Hitbox, HitboxShape};
pub use sprite::{Assets, Sprite};

pub mod app;
pub mod audio;
pub mod canvas;
pub mod config;
pub mod entities;
pub mod error;
pub mod hitbox;
pub mod input;
pub mod renderer;
pub mod sprite;
