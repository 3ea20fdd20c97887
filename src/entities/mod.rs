pub mod asteroid;
pub mod ship;
pub mod shot;

pub use asteroid::Asteroid;
pub use ship::{Ship, ShipFrame};
pub use shot::Shot;

/// Live entity collections for one play session.
///
/// Owned by the playing state and handed to anything that creates entities,
/// so constructors register into it explicitly.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub asteroids: Vec<Asteroid>,
    pub shots: Vec<Shot>,
}
