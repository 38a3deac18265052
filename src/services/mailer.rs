use async_trait::async_trait;
use chrono::Datelike;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt::Write as _;
use thiserror::Error;

use crate::models::MatchResults;

pub const RESULTS_SUBJECT: &str = "Your Business Support Matches from Business Baraka Finder";

/// Errors that can occur when delivering a results email
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Sends rendered results to a recipient.
///
/// Carried in `AppState` as `Arc<dyn ResultsMailer>`.
#[async_trait]
pub trait ResultsMailer: Send + Sync {
    async fn send_results(&self, to: &str, results: &MatchResults) -> Result<(), MailError>;
}

/// SMTP connection parameters
#[derive(Debug, Clone)]
pub struct SmtpOptions {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

/// Mailer backed by an async SMTP transport
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(options: &SmtpOptions) -> Result<Self, MailError> {
        let builder = if options.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&options.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(options.host.as_str())
        };
        let mut builder = builder.port(options.port);

        if let (Some(user), Some(pass)) = (&options.username, &options.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: options.from.parse()?,
        })
    }
}

#[async_trait]
impl ResultsMailer for SmtpMailer {
    async fn send_results(&self, to: &str, results: &MatchResults) -> Result<(), MailError> {
        let html = render_results_html(to, results, chrono::Utc::now().year());

        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>()?)
            .subject(RESULTS_SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        let response = self.transport.send(message).await?;
        tracing::info!("Results email sent to {} ({})", to, response.code());
        Ok(())
    }
}

/// Mailer that only logs, for local runs without an SMTP relay
pub struct LogMailer;

#[async_trait]
impl ResultsMailer for LogMailer {
    async fn send_results(&self, to: &str, results: &MatchResults) -> Result<(), MailError> {
        let _: Mailbox = to.parse()?;
        tracing::info!(
            "Email delivery disabled; would send {} matches and {} insights to {}",
            results.matches.len(),
            results.insights.len(),
            to
        );
        Ok(())
    }
}

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const EMAIL_STYLE: &str = r#"
      body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 0; }
      .container { max-width: 600px; margin: 0 auto; padding: 20px; }
      .header { background-color: #0D5661; color: white; padding: 20px; text-align: center; }
      .section { margin-bottom: 30px; padding: 20px; background-color: #f9f9f9; border-radius: 5px; }
      .section-title { color: #0D5661; margin-top: 0; border-bottom: 2px solid #D99E32; padding-bottom: 10px; }
      .resource { margin-bottom: 20px; border-left: 4px solid #0D5661; padding-left: 15px; }
      .resource-title { margin: 0 0 10px 0; color: #0D5661; }
      .resource-type { display: inline-block; background-color: #88B2A7; color: white; padding: 4px 8px; border-radius: 3px; font-size: 12px; margin-bottom: 10px; }
      .insight-list { padding-left: 20px; }
      .insight-list li { margin-bottom: 10px; }
      .footer { text-align: center; font-size: 12px; color: #666; margin-top: 30px; }
      .button { display: inline-block; padding: 10px 20px; background-color: #0D5661; color: white; text-decoration: none; border-radius: 4px; margin-top: 10px; }
"#;

/// Render the results email body
pub fn render_results_html(to: &str, results: &MatchResults, year: i32) -> String {
    let profile = &results.business_profile;
    let mut html = String::new();

    // Writing to a String cannot fail
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Your Business Support Matches</title>
    <style>{style}</style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <h1>Your Business Support Matches</h1>
        <p>Ethically-guided support options for your business journey</p>
      </div>
      <div class="section">
        <h2 class="section-title">Your Business Profile</h2>
        <p><strong>Business Type:</strong> {business_type}</p>
        <p><strong>Industry:</strong> {sector}</p>
        <p><strong>Team Size:</strong> {team}</p>
        <p><strong>Funding Stage:</strong> {stage}</p>
        <p><strong>Growth Goals:</strong> {goals}</p>
      </div>
      <div class="section">
        <h2 class="section-title">Recommended Support Options</h2>
"#,
        style = EMAIL_STYLE,
        business_type = escape_html(&profile.business_type),
        sector = escape_html(&profile.industry_sector),
        team = escape_html(&profile.team_size),
        stage = escape_html(&profile.funding_stage),
        goals = escape_html(&profile.growth_goals.join(", ")),
    );

    if results.matches.is_empty() {
        html.push_str("        <p>No matches found</p>\n");
    }

    for ranked in &results.matches {
        let resource = &ranked.resource;
        let _ = write!(
            html,
            r#"        <div class="resource">
          <span class="resource-type">{kind}</span>
          <h3 class="resource-title">{name}</h3>
          <p>{description}</p>
"#,
            kind = resource.resource_type.as_str().to_uppercase(),
            name = escape_html(&resource.name),
            description = escape_html(&resource.description),
        );
        for (label, value) in [
            ("Amount", &resource.amount),
            ("Deadline", &resource.deadline),
            ("Duration", &resource.duration),
        ] {
            if let Some(value) = value {
                let _ = writeln!(html, "          <p><strong>{}:</strong> {}</p>", label, escape_html(value));
            }
        }
        let _ = write!(
            html,
            "          <a href=\"{}\" class=\"button\">{}</a>\n        </div>\n",
            escape_html(&resource.apply_url),
            escape_html(resource.apply_text.as_deref().unwrap_or("Apply Now")),
        );
    }

    html.push_str(
        r#"      </div>
      <div class="section">
        <h2 class="section-title">Personalized Insights</h2>
        <ul class="insight-list">
"#,
    );
    for insight in &results.insights {
        let _ = writeln!(html, "          <li>{}</li>", escape_html(insight));
    }

    let _ = write!(
        html,
        r#"        </ul>
      </div>
      <div class="footer">
        <p>&copy; {year} Business Baraka Finder. All rights reserved.</p>
        <p>This email was sent to {to} because you requested your business support matches.</p>
      </div>
    </div>
  </body>
</html>
"#,
        year = year,
        to = escape_html(to),
    );

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusinessProfile, RankedSupport};
    use crate::services::catalog::default_catalog;

    fn create_results() -> MatchResults {
        let resource = default_catalog().remove(0).with_id(1);
        MatchResults {
            matches: vec![RankedSupport {
                resource,
                match_score: 90,
            }],
            business_profile: BusinessProfile {
                id: 1,
                business_type: "startup".to_string(),
                industry_sector: "tech".to_string(),
                team_size: "micro".to_string(),
                funding_stage: "seed".to_string(),
                growth_goals: vec!["funding".to_string(), "digital".to_string()],
                notes: None,
                email: None,
                created_at: chrono::Utc::now(),
            },
            insights: vec!["Use <b>ethical</b> funding".to_string()],
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_render_includes_profile_resources_and_insights() {
        let html = render_results_html("owner@example.com", &create_results(), 2024);

        assert!(html.contains("<strong>Growth Goals:</strong> funding, digital"));
        assert!(html.contains("<span class=\"resource-type\">FUNDING</span>"));
        assert!(html.contains("Innovate UK Smart Grants"));
        assert!(html.contains("<strong>Amount:</strong> £25,000 - £500,000"));
        assert!(html.contains(">Apply Now</a>"));
        assert!(html.contains("<li>Use &lt;b&gt;ethical&lt;/b&gt; funding</li>"));
        assert!(html.contains("&copy; 2024 Business Baraka Finder"));
        assert!(html.contains("sent to owner@example.com"));
        assert!(!html.contains("<strong>Duration:</strong>"));
    }

    #[test]
    fn test_render_without_matches() {
        let mut results = create_results();
        results.matches.clear();
        let html = render_results_html("owner@example.com", &results, 2024);
        assert!(html.contains("No matches found"));
    }

    #[tokio::test]
    async fn test_log_mailer_rejects_bad_address() {
        let results = create_results();
        assert!(LogMailer.send_results("owner@example.com", &results).await.is_ok());
        assert!(matches!(
            LogMailer.send_results("not an address", &results).await,
            Err(MailError::Address(_))
        ));
    }
}
