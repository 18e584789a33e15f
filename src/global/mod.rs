pub mod extractor;
pub mod middleware;

pub use extractor::ValidatedJson;
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
