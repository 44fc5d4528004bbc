pub mod distribution;
pub mod label;
pub mod profile;
pub mod ranker;

pub use distribution::ExpressionDistribution;
pub use label::{MoodLabel, UnknownMood};
pub use profile::{palette, MoodProfile};
pub use ranker::{rank, ranking, RankedMood};
