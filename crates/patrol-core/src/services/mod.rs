//! Services - business rules on top of the ports.

mod admins;
mod articles;
mod inputs;
mod lifecycle;

pub use admins::AdminService;
pub use articles::{ArticleService, ArticleSettings, MIN_SEARCH_LEN, SLUG_CONFLICT};
pub use inputs::{CoverImage, CreateArticle, ImageUpload, IngestArticle, UpdateArticle};
pub use lifecycle::{LifecycleAction, TransitionOutcome, UnknownAction};
