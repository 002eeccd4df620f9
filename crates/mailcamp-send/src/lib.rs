pub mod error;
pub mod executor;
pub mod recipients;
pub mod records;
pub mod runner;
pub mod smtp;
pub mod transport;

pub use error::{SendError, TransportError};
pub use executor::{deliver, DeliveryOutcome};
pub use recipients::resolve_recipients;
pub use records::{DeliveryLog, RecordStore};
pub use runner::CampaignRunner;
pub use smtp::SmtpMailer;
pub use transport::{Attachment, OutgoingMessage, StdoutTransport, Transport};
