pub mod fitness_proportionate;
pub mod rank;
pub mod roulette;
pub mod selection_strategy;
pub mod tournament;
pub mod uniform;

pub use fitness_proportionate::FitnessProportionateSelection;
pub use rank::RankSelection;
pub use roulette::{RouletteWheel, RouletteWheelSampler, WheelSlice};
pub use selection_strategy::SelectionOperator;
pub use tournament::TournamentSelection;
pub use uniform::UniformSelection;
