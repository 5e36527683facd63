mod library;

pub use library::LibraryError;
pub use library::Library;
pub use library::LinkedAccount;
pub use library::SPOTIFY_PROVIDER;
pub use library::SavedPlaylist;
pub use library::User;
