pub mod requests;
pub mod responses;

pub use requests::ActionRequest;
pub use responses::{ErrorBody, ResetAck, VERSION_CONFLICT_CODE};
