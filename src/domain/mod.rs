pub mod comment;
pub mod message;

pub use comment::{Comment, ExtractionRequest, DEFAULT_MIN_LIKES};
pub use message::{
    ClientMessage, CoordinatorEvent, ExportReply, ExportRequest, ExtractionCommand,
    ExtractionReply,
};
