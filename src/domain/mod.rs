pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{default_pages, DownloadPhase, Notice, NoticeLevel, Page, PageView, Progress};
