pub mod card;
pub mod detail;
pub mod pagination;

pub use card::*;
pub use detail::*;
pub use pagination::*;
