pub mod enums;
pub mod lexicon;
pub mod request;

pub use enums::*;
pub use lexicon::CategoryLexicon;
pub use request::*;
