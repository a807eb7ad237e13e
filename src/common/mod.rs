pub mod error;
pub use error::QueryError;
pub use error::SyntaxError;

pub mod result;
pub use result::QueryResult;
