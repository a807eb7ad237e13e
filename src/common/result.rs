use super::error::QueryError;

pub type QueryResult<T> = std::result::Result<T, QueryError>;
