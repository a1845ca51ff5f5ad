//! Mail sending abstractions

pub mod console;
pub mod smtp;

pub use console::ConsoleMailer;
pub use smtp::{SmtpConfig, SmtpMailer};

/// Template parameters for a verification mail.
#[derive(Debug, Clone)]
pub struct VerifyParams {
    /// URL-safe code with its trailing `=` stripped for link friendliness.
    pub verification_code: String,
    pub email: String,
    /// `scheme://host` the registration request came from.
    pub referer_base_url: String,
}

/// Trait for sending registration mail
pub trait Mailer: Send + Sync {
    /// Send the email-verification mail for a new registration
    fn send_verify(&self, email: &str, params: &VerifyParams) -> Result<(), String>;

    /// Send the welcome mail after a successful verification
    fn send_welcome(&self, email: &str) -> Result<(), String>;
}
