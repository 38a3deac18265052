// Service exports
pub mod cache;
pub mod catalog;
pub mod mailer;
pub mod matching;
pub mod memory;
pub mod pdf;
pub mod postgres;
pub mod store;

pub use cache::CatalogCache;
pub use catalog::default_catalog;
pub use mailer::{LogMailer, MailError, ResultsMailer, SmtpMailer, SmtpOptions, RESULTS_SUBJECT};
pub use matching::{MatchingService, ServiceError, SubmissionOutcome};
pub use memory::MemoryStore;
pub use pdf::{render_results_pdf, PdfError, PDF_FILENAME};
pub use postgres::PostgresClient;
pub use store::{ResultsStore, StoreError};
