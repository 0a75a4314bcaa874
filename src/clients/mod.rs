pub mod document_client;
pub mod http_transport;
pub mod subtitle_client;
pub mod transport;

pub use document_client::DocumentClient;
pub use http_transport::HttpTransport;
pub use subtitle_client::{parse_urls, SubtitleClient};
pub use transport::{FilePart, MultipartPayload, ProgressCallback, RawResponse, Transport};
