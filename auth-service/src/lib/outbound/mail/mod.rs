pub mod log;
pub mod sendgrid;
pub mod templates;

pub use log::LogMailDispatcher;
pub use sendgrid::SendGridMailDispatcher;
pub use templates::MailLinks;
