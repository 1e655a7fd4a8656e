mod function;
mod message;
mod schema;

pub use function::*;
pub use message::*;
pub use schema::*;
