//! Input gating applied by the CLI before a message is submitted, plus the
//! built-in messages it can analyze.
//!
//! The analysis core accepts any string; these limits belong to the caller.

use std::fmt;

use crate::analysis::RiskLevel;
use crate::error::InputError;

/// Minimum length of the trimmed message, in characters.
pub const MIN_MESSAGE_CHARS: usize = 10;

/// Maximum length of the raw message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// Built-in sample messages for trying the tool out.
pub const EXAMPLE_MESSAGES: [&str; 3] = [
    "Congratulations! You've won $10,000. Click here to claim your prize: bit.ly/win-now",
    "Your account has been suspended. Verify your identity immediately to avoid closure.",
    "Hi! Just wanted to confirm our meeting tomorrow at 3 PM. See you then!",
];

/// How a catalogued scam reached its victims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Email,
    Sms,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Email => f.write_str("Email"),
            Channel::Sms => f.write_str("SMS"),
        }
    }
}

/// A real-world scam message with its published source and the risk level a
/// correct analysis should report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScamSample {
    pub category: &'static str,
    pub channel: Channel,
    pub message: &'static str,
    pub source: &'static str,
    pub expected_level: RiskLevel,
    /// As published; a percentage or a qualitative rating.
    pub compromise_rate: &'static str,
    pub url: &'static str,
}

const CANIPHISH_URL: &str = "https://caniphish.com/phishing-email-examples";
const ACMA_URL: &str =
    "https://www.acma.gov.au/articles/2024-09/scam-alert-5-most-common-sms-impersonation-scams";

/// Catalogue of documented phishing and impersonation scams.
pub const SCAM_SAMPLES: [ScamSample; 12] = [
    ScamSample {
        category: "Financial Fraud",
        channel: Channel::Email,
        message: "URGENT: Your account has been compromised. Someone may have accessed your Microsoft account. Verify your identity and change your password immediately. Click 'Recover account' now.",
        source: "CanIPhish - Microsoft Security Alert",
        expected_level: RiskLevel::High,
        compromise_rate: "11%",
        url: CANIPHISH_URL,
    },
    ScamSample {
        category: "Invoice Scam",
        channel: Channel::Email,
        message: "Apple Tax Invoice - You were charged $89.99 for iCloud + storage. Order ID: #APL-89234. Click here to dispute or cancel this charge immediately.",
        source: "CanIPhish - Apple Tax Invoice",
        expected_level: RiskLevel::High,
        compromise_rate: "12%",
        url: CANIPHISH_URL,
    },
    ScamSample {
        category: "Delivery Scam",
        channel: Channel::Sms,
        message: "Australia Post: Your package is awaiting delivery. Please update your delivery details and pay a $2.50 fee to receive your parcel. Click: auspost-delivery[.]com",
        source: "ACMA - Parcel Delivery Scams",
        expected_level: RiskLevel::Critical,
        compromise_rate: "High",
        url: ACMA_URL,
    },
    ScamSample {
        category: "Government Impersonation",
        channel: Channel::Sms,
        message: "MyGov: You have a pending tax refund of $847.50. Claim your refund now by verifying your details urgently. Link: mygov-refund[.]au",
        source: "ACMA - Government Impersonation",
        expected_level: RiskLevel::Critical,
        compromise_rate: "Very High",
        url: ACMA_URL,
    },
    ScamSample {
        category: "Account Deactivation",
        channel: Channel::Email,
        message: "SecureNotify: Your email account has been inactive and is scheduled for deletion. Click to verify your account within 24 hours to prevent deactivation.",
        source: "CanIPhish - Email Account Deactivation",
        expected_level: RiskLevel::High,
        compromise_rate: "14%",
        url: CANIPHISH_URL,
    },
    ScamSample {
        category: "HR Manipulation",
        channel: Channel::Email,
        message: "HR Peer Feedback Received: An anonymous colleague has submitted feedback about your recent workplace interactions. Click to view and respond confidentially. - Automated HR Solutions",
        source: "CanIPhish - HR Peer Feedback",
        expected_level: RiskLevel::Critical,
        compromise_rate: "40%",
        url: CANIPHISH_URL,
    },
    ScamSample {
        category: "Loyalty Points Scam",
        channel: Channel::Sms,
        message: "Woolworths Rewards: Your 2,450 points will expire in 48 hours! Login now to claim your rewards before they're gone. Link: woolworths-rewards[.]net",
        source: "ACMA - Reward Point Scams",
        expected_level: RiskLevel::High,
        compromise_rate: "High",
        url: ACMA_URL,
    },
    ScamSample {
        category: "Software Update",
        channel: Channel::Email,
        message: "IT Department: URGENT - Critical vulnerability found in device management software. Update your system immediately or you will be locked out by tomorrow. Click to access update portal.",
        source: "CanIPhish - Urgent Software Update",
        expected_level: RiskLevel::Critical,
        compromise_rate: "21%",
        url: CANIPHISH_URL,
    },
    ScamSample {
        category: "Social Media Threat",
        channel: Channel::Email,
        message: "X (Twitter) Content Violation: Your account has violated our content policies. Review the alleged violation now or your page will be suspended for non-compliance.",
        source: "CanIPhish - X Content Violation",
        expected_level: RiskLevel::Critical,
        compromise_rate: "30%",
        url: CANIPHISH_URL,
    },
    ScamSample {
        category: "Toll Road Scam",
        channel: Channel::Sms,
        message: "Linkt: You have an overdue toll road account of $12.70. Pay now to avoid additional fees and legal action. Visit: linkt-pay[.]com",
        source: "ACMA - Toll Road Operator Impersonation",
        expected_level: RiskLevel::High,
        compromise_rate: "High",
        url: ACMA_URL,
    },
    ScamSample {
        category: "Domain Security",
        channel: Channel::Email,
        message: "GoDaddy Security Alert: Your domain has been compromised through SQL Injection. Critical issue detected. Click to validate your domain immediately to prevent illegal activity.",
        source: "CanIPhish - GoDaddy Security Breach",
        expected_level: RiskLevel::Critical,
        compromise_rate: "8%",
        url: CANIPHISH_URL,
    },
    ScamSample {
        category: "Document Signing",
        channel: Channel::Email,
        message: "Adobe Acrobat Sign: Your signature is required on a mutual Non-Disclosure Agreement (NDA). Click 'Review and Sign' to complete this business process.",
        source: "CanIPhish - Adobe Acrobat Sign",
        expected_level: RiskLevel::High,
        compromise_rate: "14%",
        url: CANIPHISH_URL,
    },
];

/// Check that a message is long enough to analyze and short enough to send.
pub fn check_message(message: &str) -> Result<(), InputError> {
    if message.trim().chars().count() < MIN_MESSAGE_CHARS {
        return Err(InputError::TooShort {
            min: MIN_MESSAGE_CHARS,
        });
    }

    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(InputError::TooLong {
            max: MAX_MESSAGE_CHARS,
        });
    }

    Ok(())
}

/// Look up a sample message by its 1-based number.
pub fn example_message(number: usize) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|idx| EXAMPLE_MESSAGES.get(idx))
        .copied()
}

/// Look up a catalogued scam by its 1-based number.
pub fn scam_sample(number: usize) -> Option<&'static ScamSample> {
    number.checked_sub(1).and_then(|idx| SCAM_SAMPLES.get(idx))
}
