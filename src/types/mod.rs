//! Public types for the bedrock-gate API.

mod category;
mod invoke;
mod message;
mod options;
mod retrieval;

pub use category::Category;
pub use invoke::{ANTHROPIC_VERSION, InvokeRequest, InvokeResponse, ResponseBlock, Usage};
pub use message::{ContentBlock, Message, Role};
pub use options::SamplingParams;
pub use retrieval::{
    DEFAULT_RESULT_COUNT, PassageContent, RetrievalConfiguration, RetrievalPassage,
    RetrievalQuery, RetrieveRequest, RetrieveResponse, VectorSearchConfiguration,
};
