use async_trait::async_trait;
use chrono::{Datelike, Utc};
use html_escape::encode_text;
use thiserror::Error;

pub const PASSCODE_SUBJECT: &str = "Your Financial Report Access Code";

#[derive(Error, Debug)]
pub enum MailError {
    #[error("mail transport not configured")]
    NotConfigured,

    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Delivery seam for outgoing mail
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Records sends in the log instead of delivering them
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(to = %email.to, subject = %email.subject, "Email queued (log transport)");
        Ok(())
    }
}

/// Passcode e-mail with the code, expiry notice and next steps
pub fn passcode_email(to: &str, passcode: &str, ttl_minutes: i64) -> OutgoingEmail {
    let code = encode_text(passcode);
    let year = Utc::now().year();
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Financial Report Access</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f8fafc;">
<div style="max-width: 600px; margin: 0 auto; background-color: #ffffff;">
<div style="background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 40px 20px; text-align: center;">
<h1 style="color: #ffffff; margin: 0; font-size: 28px; font-weight: 300;">Financial Report Access</h1>
</div>
<div style="padding: 40px 20px;">
<h2 style="color: #2d3748; margin: 0 0 20px 0; font-size: 24px;">Your Access Code</h2>
<p style="color: #4a5568; font-size: 16px; line-height: 1.6;">You have requested access to your financial report. Use the following code to log in:</p>
<div style="background-color: #f7fafc; border: 2px solid #e2e8f0; border-radius: 12px; padding: 30px; text-align: center; margin: 30px 0;">
<div style="font-size: 36px; font-weight: bold; color: #2d3748; letter-spacing: 8px; font-family: 'Courier New', monospace;">{code}</div>
</div>
<div style="background-color: #fff5f5; border-left: 4px solid #f56565; padding: 15px; margin: 20px 0;">
<p style="color: #c53030; margin: 0; font-weight: 500;">This code expires in {ttl_minutes} minutes</p>
</div>
<div style="background-color: #f0fff4; border-left: 4px solid #48bb78; padding: 15px; margin: 20px 0;">
<p style="color: #2f855a; margin: 0; font-size: 14px;">If you didn't request this code, please ignore this email. Your account remains secure.</p>
</div>
<h3 style="color: #2d3748; font-size: 18px;">What to do next:</h3>
<ol style="color: #4a5568; font-size: 14px; line-height: 1.6;">
<li>Return to the financial report page</li>
<li>Enter the {digits}-digit code above</li>
<li>Click "Verify &amp; Access Report"</li>
</ol>
</div>
<div style="background-color: #f8fafc; padding: 20px; text-align: center; border-top: 1px solid #e2e8f0;">
<p style="color: #718096; font-size: 12px; margin: 0;">This is an automated message. Please do not reply to this email.</p>
<p style="color: #718096; font-size: 12px; margin: 5px 0 0 0;">&copy; {year} Financial Advisory Services</p>
</div>
</div>
</body>
</html>"#,
        digits = passcode.chars().count(),
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: PASSCODE_SUBJECT.to_string(),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passcode_email_body() {
        let email = passcode_email("jane@example.com", "123456", 15);

        assert_eq!(email.to, "jane@example.com");
        assert_eq!(email.subject, PASSCODE_SUBJECT);
        assert!(email.html.contains("123456"));
        assert!(email.html.contains("This code expires in 15 minutes"));
        assert!(email.html.contains("Enter the 6-digit code above"));
    }

    #[tokio::test]
    async fn test_log_mailer_accepts() {
        let email = passcode_email("a@b.c", "000000", 15);
        assert!(LogMailer.send(&email).await.is_ok());
    }
}
