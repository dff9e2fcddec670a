// Remote ili2c service layer
// - types.rs: Operation, DiagramFormat, ServiceResponse
// - error.rs: ServiceError
// - payload.rs: multipart form construction
// - client.rs: HTTP transport
pub mod client;
pub mod error;
pub mod payload;
pub mod types;
