pub mod annotate;
pub mod messages;
