pub mod line;
pub mod meeting;

pub use line::*;
pub use meeting::*;
