mod media;
mod summary;
mod transcript;

pub use media::{MediaInput, MediaKind};
pub use summary::Summary;
pub use transcript::Transcript;
