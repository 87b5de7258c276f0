//! Email rendering: one subject and HTML body per notification.
//!
//! Every interpolated value is HTML-escaped.

use cd_01_claims::{ClaimStatus, Notification};
use std::fmt::Write as _;

const PRIMARY: &str = "#1a237e";
const SUCCESS: &str = "#00c853";
const WARNING: &str = "#ffab00";
const TEXT: &str = "#2c3e50";
const BACKGROUND: &str = "#f5f7fa";

/// A rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Renders notifications into emails.
#[derive(Debug, Clone, Default)]
pub struct MailTemplates {
    /// Link target for the "follow my claim" button, if any.
    pub tracking_page_url: Option<String>,
}

impl MailTemplates {
    pub fn new(tracking_page_url: Option<String>) -> Self {
        Self { tracking_page_url }
    }

    pub fn render(&self, notification: &Notification) -> RenderedEmail {
        match notification {
            Notification::ClaimReceived {
                applicant_name,
                tracking_code,
                ..
            } => {
                let code = escape(tracking_code.as_str());
                let content = format!(
                    "<p>Hello <strong>{name}</strong>,</p>\
                     <p>We have received your claim and all of its documents.</p>\
                     <p style=\"text-align:center;font-size:12px;color:#666;\">YOUR TRACKING CODE</p>\
                     <p style=\"text-align:center;font-size:32px;font-weight:800;color:{PRIMARY};\
                     letter-spacing:3px;font-family:monospace;\">{code}</p>\
                     <p style=\"font-size:14px;color:#666;\">Keep this code: it is the only way \
                     to follow the progress of your claim.</p>",
                    name = escape(applicant_name),
                );
                RenderedEmail {
                    subject: "We received your claim".to_string(),
                    html: self.layout(
                        "Claim received",
                        &content,
                        self.tracking_button("Follow my claim"),
                    ),
                }
            }
            Notification::NewClaimAlert {
                applicant_name,
                national_id,
                claim_type,
                tracking_code,
                ..
            } => {
                let claim_type = claim_type.to_string();
                let mut rows = String::new();
                for (label, value) in [
                    ("Applicant", applicant_name.as_str()),
                    ("National ID", national_id.as_str()),
                    ("Claim type", claim_type.as_str()),
                    ("Tracking code", tracking_code.as_str()),
                ] {
                    let _ = write!(
                        rows,
                        "<tr><td style=\"font-weight:bold;color:#555;\">{label}</td><td>{}</td></tr>",
                        escape(value)
                    );
                }
                let content = format!(
                    "<p>A new claim has been submitted.</p>\
                     <table width=\"100%\" cellpadding=\"10\" cellspacing=\"0\">{rows}</table>\
                     <p>The documents are available for review.</p>"
                );
                RenderedEmail {
                    subject: format!("New claim: {applicant_name}"),
                    html: self.layout("New claim submitted", &content, None),
                }
            }
            Notification::StatusChanged {
                applicant_name,
                status,
                ..
            } => {
                let badge = match status {
                    ClaimStatus::Received => PRIMARY,
                    ClaimStatus::InProcess => WARNING,
                    ClaimStatus::Finalized => SUCCESS,
                };
                let content = format!(
                    "<p>Hello <strong>{name}</strong>,</p>\
                     <p>There is news about your claim.</p>\
                     <p style=\"text-align:center;font-size:12px;color:#999;\">CURRENT STATUS</p>\
                     <p style=\"text-align:center;\"><span style=\"display:inline-block;\
                     padding:12px 25px;background-color:{badge};color:#fff;border-radius:50px;\
                     font-weight:700;font-size:18px;\">{label}</span></p>\
                     <p>Use your tracking code on our website for more details.</p>",
                    name = escape(applicant_name),
                    label = escape(&status.label().to_uppercase()),
                );
                RenderedEmail {
                    subject: format!("Your claim is now {}", status.label()),
                    html: self.layout(
                        "Claim status update",
                        &content,
                        self.tracking_button("View my claim"),
                    ),
                }
            }
        }
    }

    fn tracking_button(&self, text: &'static str) -> Option<(&'static str, &str)> {
        self.tracking_page_url.as_deref().map(|url| (text, url))
    }

    fn layout(&self, title: &str, content: &str, button: Option<(&str, &str)>) -> String {
        let button = button
            .map(|(text, link)| {
                format!(
                    "<p style=\"text-align:center;padding:20px 0;\"><a href=\"{}\" \
                     style=\"background-color:{PRIMARY};color:#fff;padding:14px 30px;\
                     border-radius:50px;text-decoration:none;font-weight:600;\">{}</a></p>",
                    escape(link),
                    escape(text)
                )
            })
            .unwrap_or_default();
        let title = escape(title);
        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
             <body style=\"margin:0;background-color:{BACKGROUND};font-family:Helvetica,Arial,sans-serif;\">\
             <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"padding:40px 0;\"><tr><td align=\"center\">\
             <table width=\"600\" style=\"background-color:#fff;border-radius:12px;max-width:90%;\">\
             <tr><td align=\"center\" style=\"background-color:{PRIMARY};padding:30px;color:#fff;\">\
             <h1 style=\"margin:0;font-size:24px;letter-spacing:2px;\">CLAIMDESK</h1></td></tr>\
             <tr><td style=\"padding:40px;color:{TEXT};font-size:16px;line-height:1.6;\">\
             <h2 style=\"color:{PRIMARY};margin-top:0;\">{title}</h2>{content}</td></tr>\
             <tr><td>{button}</td></tr>\
             <tr><td align=\"center\" style=\"padding:30px;color:#999;font-size:12px;\">\
             This is an automated message. Please do not reply.</td></tr>\
             </table></td></tr></table></body></html>"
        )
    }
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
