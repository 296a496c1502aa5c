mod health;
mod summarize;

pub use health::health_handler;
pub use summarize::summarize_handler;
