pub mod providers;
pub mod recommendation;

pub use recommendation::Recommender;
