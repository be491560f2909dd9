pub mod bot;
pub mod report;
pub mod telegram;

pub use bot::Bot;
pub use telegram::TelegramClient;
