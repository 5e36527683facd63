mod library;
mod moods;
mod serve;

pub use library::library;
pub use moods::moods;
pub use serve::serve;
