mod aging;
mod death;
mod feeding;
mod migration;
mod procreation;
mod regeneration;

pub use aging::AgingSystem;
pub use death::DeathSystem;
pub use feeding::FeedingSystem;
pub use migration::MigrationSystem;
pub use procreation::ProcreationSystem;
pub use regeneration::RegenerationSystem;

use crate::animal::Animal;

/// Stable descending-fitness order; ties keep insertion order.
fn sort_by_descending_fitness(animals: &mut [Animal]) {
    animals.sort_by(|a, b| b.phi.total_cmp(&a.phi));
}

/// Stable ascending-fitness order, weakest first.
fn sort_by_ascending_fitness(animals: &mut [Animal]) {
    animals.sort_by(|a, b| a.phi.total_cmp(&b.phi));
}
