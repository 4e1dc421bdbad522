mod chat_with_pdf;
mod health;
mod split_doc;
mod sql_insights;
mod upload_doc;

pub use chat_with_pdf::chat_with_pdf_handler;
pub use health::health_handler;
pub use split_doc::split_doc_handler;
pub use sql_insights::sql_insights_handler;
pub use upload_doc::upload_doc_handler;
