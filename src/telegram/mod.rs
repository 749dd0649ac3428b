pub mod notifier;

pub use notifier::{DryRunNotifier, Notifier, TelegramNotifier};
