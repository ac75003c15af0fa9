pub mod density_grid;
pub mod emote_usage;
pub mod time_series;
pub mod top_users;

pub use density_grid::*;
pub use emote_usage::*;
pub use time_series::*;
pub use top_users::*;
