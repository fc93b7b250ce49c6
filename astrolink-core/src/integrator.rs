use crate::engine::World;
use crate::error::SimError;

/// Advance the world by one tick of length `dt`.
///
/// Every ordered pair `(i, j)` with `i != j` is visited in index order and
/// updates are applied in place, so later pairs see the positions produced by
/// earlier ones. The trajectory depends on body order.
pub fn step(world: &mut World, dt: f32) -> Result<(), SimError> {
    let n = world.bodies().len();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            world.attract(i, j, dt)?;
        }
    }
    Ok(())
}
