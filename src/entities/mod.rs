mod barrier;
mod enemy;
mod game_state;
mod projectile;
mod spaceship;

// Re-export all public types
pub use barrier::Barrier;
pub use enemy::{Direction, Enemy};
pub use game_state::GameState;
pub use projectile::{EnemyLaser, Laser};
pub use spaceship::{Buttons, Spaceship};
