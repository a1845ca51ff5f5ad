//! Console-based mailer for development

use super::{Mailer, VerifyParams};

/// Mailer that logs to console (for development)
pub struct ConsoleMailer;

impl ConsoleMailer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleMailer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mailer for ConsoleMailer {
    fn send_verify(&self, email: &str, params: &VerifyParams) -> Result<(), String> {
        println!();
        println!("========================================");
        println!("  VERIFICATION FOR: {}", email);
        println!(
            "  LINK: {}/verifyEmail?code={}",
            params.referer_base_url, params.verification_code
        );
        println!("========================================");
        println!();

        tracing::info!(email = %email, "Verification mail sent");

        Ok(())
    }

    fn send_welcome(&self, email: &str) -> Result<(), String> {
        println!();
        println!("========================================");
        println!("  WELCOME MAIL FOR: {}", email);
        println!("========================================");
        println!();

        tracing::info!(email = %email, "Welcome mail sent");

        Ok(())
    }
}
