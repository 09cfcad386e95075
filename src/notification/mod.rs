pub mod notice;
pub mod notifier;
