mod assembler;
pub mod error;
pub mod literal;
mod map;
pub mod msg;
pub mod parser;
pub mod pool;
pub mod record;
pub mod report;
pub mod symbol;

pub use assembler::Assembler;
pub use error::Error;
pub use map::TableMap;
