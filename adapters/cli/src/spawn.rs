use glam::Vec3;
use rand::Rng;

/// Height at which agent and target are placed above the floor.
pub(crate) const SPAWN_HEIGHT: f32 = 0.25;

/// Lists the positions an agent or target may spawn at, `x` outer and `z` inner.
///
/// Both axes use the even integers in `[-(size / 2 + 1), size / 2 + 1]`.
pub(crate) fn spawn_candidates(size: u32) -> Vec<Vec3> {
    let half = i64::from(size / 2 + 1);
    let axis: Vec<i64> = (-half..=half).filter(|value| value % 2 == 0).collect();
    axis.iter()
        .flat_map(|&x| {
            axis.iter()
                .map(move |&z| Vec3::new(x as f32, SPAWN_HEIGHT, z as f32))
        })
        .collect()
}

/// Picks distinct agent and target positions, or `None` when fewer than two exist.
pub(crate) fn select_spawns(size: u32, rng: &mut impl Rng) -> Option<(Vec3, Vec3)> {
    let mut candidates = spawn_candidates(size);
    if candidates.len() < 2 {
        return None;
    }
    let agent = candidates.remove(rng.gen_range(0..candidates.len()));
    let target = candidates.get(rng.gen_range(0..candidates.len())).copied()?;
    Some((agent, target))
}
