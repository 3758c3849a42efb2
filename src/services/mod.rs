pub mod generative;
pub mod quota;
pub mod validate;

pub use generative::*;
pub use quota::*;
pub use validate::*;
