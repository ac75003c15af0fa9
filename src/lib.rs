pub mod analytics;
pub mod chat_management;
pub mod dashboard;
pub mod error;
pub mod io;

// Re-export the main error types for convenience
pub use error::{ChatboardError, ChatboardResult};
pub use io::LoadError;

// Re-export the core data model and analytics
pub use analytics::{DensityGrid, GridRange, TimeSeries, TopUsersRanking};
pub use chat_management::{EmoteMap, FilterCriteria};
pub use dashboard::{AppContext, ChatMessage, DashboardSession, Presenter};
