pub mod punctuation;
pub mod transfer;
pub mod upload;

pub use punctuation::PunctuationCatalog;
pub use transfer::{FileArtifact, SubtitleRequest, TextBatchResult, TransferResult};
pub use upload::{UploadFile, UploadId, UploadItem, UploadStatus};
