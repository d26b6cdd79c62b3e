//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async data-access methods
//! that accept `&PgPool` as the first argument.

pub mod content_repo;
pub mod episode_repo;
pub mod profile_repo;
pub mod season_repo;
pub mod user_repo;
pub mod watch_progress_repo;

pub use content_repo::ContentRepo;
pub use episode_repo::EpisodeRepo;
pub use profile_repo::ProfileRepo;
pub use season_repo::SeasonRepo;
pub use user_repo::UserRepo;
pub use watch_progress_repo::WatchProgressRepo;
