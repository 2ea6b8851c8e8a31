mod execute;
mod not_authenticated;
mod session;

pub use execute::CommandError;
pub use not_authenticated::Client;
pub use not_authenticated::LoginError;
pub use session::FetchError;
pub use session::ListError;
pub use session::SelectError;
pub use session::Session;
