use std::time::Duration;

use chrono::NaiveDate;

use crate::config::AppConfig;
use crate::models::{Booking, BookingStatus, Delivery, NotificationKind};
use crate::services::email::OutboundEmail;
use crate::state::AppState;

/// "Sunday, June 1, 2025"
pub fn format_event_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

pub fn escape_html(input: &str) -> String {
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

fn layout(body: &str) -> String {
    format!(
        r#"<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">{body}</div>"#
    )
}

fn details_box(heading: Option<&str>, items: &[(&str, String)]) -> String {
    let heading = heading
        .map(|h| format!("<h2>{h}</h2>"))
        .unwrap_or_default();
    let items: String = items
        .iter()
        .map(|(label, value)| format!("<li><strong>{label}:</strong> {value}</li>"))
        .collect();
    format!(
        r#"<div style="background: #f9f9f9; padding: 20px; border-radius: 8px; margin: 20px 0;">{heading}<ul style="list-style: none; padding: 0;">{items}</ul></div>"#
    )
}

// ── Templates ──

pub fn admin_new_booking_email(config: &AppConfig, booking: &Booking) -> OutboundEmail {
    let mut items = vec![
        ("Name", escape_html(&booking.name)),
        ("Email", escape_html(&booking.email)),
        ("Event", escape_html(&booking.event_type)),
        ("Date", format_event_date(booking.event_date)),
    ];
    if let Some(details) = &booking.details {
        items.push(("Additional Details", escape_html(details)));
    }

    let body = format!(
        "<h1>New Booking Request</h1>\
         <p>A new booking request has been submitted:</p>\
         {}\
         <p>Please review and confirm this booking in the admin dashboard.</p>",
        details_box(Some("Booking Details:"), &items)
    );

    OutboundEmail {
        from: config.email_from.clone(),
        to: config.admin_email.clone(),
        reply_to: Some(booking.email.clone()),
        subject: "New Booking Request".to_string(),
        html: layout(&body),
    }
}

pub fn customer_acknowledgement_email(config: &AppConfig, booking: &Booking) -> OutboundEmail {
    let business = escape_html(&config.business_email);
    let body = format!(
        "<h1>Thanks for Your Booking Request!</h1>\
         <p>Hi {name},</p>\
         <p>We've received your booking request for the NextSpin 360 Photo Booth. \
         Our team will review your request and get back to you within 24 hours.</p>\
         {details}\
         <p>If you need to make any changes to your request, please contact us at {business}</p>\
         <p>Best regards,<br>The NextSpin Team</p>",
        name = escape_html(&booking.name),
        details = details_box(
            Some("Your Request Details:"),
            &[
                ("Event", escape_html(&booking.event_type)),
                ("Date", format_event_date(booking.event_date)),
            ],
        ),
    );

    OutboundEmail {
        from: config.email_from.clone(),
        to: booking.email.clone(),
        reply_to: Some(config.business_email.clone()),
        subject: "We've Received Your Booking Request! 📸".to_string(),
        html: layout(&body),
    }
}

pub fn confirmation_email(config: &AppConfig, booking: &Booking) -> OutboundEmail {
    let event_type = escape_html(&booking.event_type);
    let body = format!(
        "<h1>Booking Confirmed!</h1>\
         <p>Hi {name},</p>\
         <p>Great news! Your NextSpin 360 Photo Booth booking has been confirmed for your upcoming {event_type}.</p>\
         {details}\
         <p>Our team will arrive 1 hour before your event to set up the booth and ensure everything runs smoothly.</p>\
         <p>If you need to make any changes to your booking or have any questions, please don't hesitate to contact us at {business}</p>\
         <p>Best regards,<br>The NextSpin Team</p>",
        name = escape_html(&booking.name),
        details = details_box(
            Some("Booking Details:"),
            &[
                ("Event", event_type.clone()),
                ("Date", format_event_date(booking.event_date)),
            ],
        ),
        business = escape_html(&config.business_email),
    );

    OutboundEmail {
        from: config.email_from.clone(),
        to: booking.email.clone(),
        reply_to: None,
        subject: "Your NextSpin Booking is Confirmed! 🎉".to_string(),
        html: layout(&body),
    }
}

pub fn cancellation_email(config: &AppConfig, booking: &Booking) -> OutboundEmail {
    let body = format!(
        "<h1>Booking Cancelled</h1>\
         <p>Hi {name},</p>\
         <p>Your NextSpin 360 Photo Booth booking for the following event has been cancelled:</p>\
         {details}\
         <p>If you believe this was done in error or would like to make a new booking, please contact us at {business}</p>\
         <p>Best regards,<br>The NextSpin Team</p>",
        name = escape_html(&booking.name),
        details = details_box(
            None,
            &[
                ("Event", escape_html(&booking.event_type)),
                ("Date", format_event_date(booking.event_date)),
            ],
        ),
        business = escape_html(&config.business_email),
    );

    OutboundEmail {
        from: config.email_from.clone(),
        to: booking.email.clone(),
        reply_to: None,
        subject: "NextSpin Booking Cancellation".to_string(),
        html: layout(&body),
    }
}

// ── Dispatch ──

async fn send(state: &AppState, kind: NotificationKind, email: OutboundEmail) -> Delivery {
    let timeout = Duration::from_secs(state.config.email_timeout_secs);
    let error = match tokio::time::timeout(timeout, state.email.send_email(&email)).await {
        Ok(Ok(())) => {
            tracing::info!(kind = kind.as_str(), to = %email.to, "notification sent");
            None
        }
        Ok(Err(e)) => {
            tracing::error!(kind = kind.as_str(), to = %email.to, error = %e, "failed to send notification");
            Some(format!("{e:#}"))
        }
        Err(_) => {
            tracing::error!(kind = kind.as_str(), to = %email.to, ?timeout, "notification send timed out");
            Some(format!("timed out after {}s", timeout.as_secs()))
        }
    };

    Delivery {
        kind,
        recipient: email.to,
        subject: email.subject,
        error,
    }
}

/// Sends the admin alert and the customer acknowledgement. The customer send
/// is attempted even when the admin send fails.
pub async fn notify_created(state: &AppState, booking: &Booking) -> Vec<Delivery> {
    let admin = send(
        state,
        NotificationKind::AdminNewBooking,
        admin_new_booking_email(&state.config, booking),
    )
    .await;
    let customer = send(
        state,
        NotificationKind::CustomerAcknowledgement,
        customer_acknowledgement_email(&state.config, booking),
    )
    .await;
    vec![admin, customer]
}

pub async fn notify_confirmed(state: &AppState, booking: &Booking) -> Delivery {
    send(
        state,
        NotificationKind::Confirmation,
        confirmation_email(&state.config, booking),
    )
    .await
}

pub async fn notify_cancelled(state: &AppState, booking: &Booking) -> Delivery {
    send(
        state,
        NotificationKind::Cancellation,
        cancellation_email(&state.config, booking),
    )
    .await
}

/// Emails owed for a booking that has just moved to its current status.
/// Reopening to PENDING sends nothing.
pub async fn notify_status_change(state: &AppState, booking: &Booking) -> Vec<Delivery> {
    match booking.status {
        BookingStatus::Confirmed => vec![notify_confirmed(state, booking).await],
        BookingStatus::Cancelled => vec![notify_cancelled(state, booking).await],
        BookingStatus::Pending => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::config::EmailProviderKind;

    fn config() -> AppConfig {
        AppConfig {
            port: 3000,
            database_url: ":memory:".to_string(),
            email_provider: EmailProviderKind::Console,
            resend_api_key: String::new(),
            resend_api_url: "https://api.resend.com".to_string(),
            email_from: "NextSpin <onboarding@resend.dev>".to_string(),
            admin_email: "admin@nextspin.test".to_string(),
            business_email: "hello@nextspin.test".to_string(),
            test_email_to: None,
            email_timeout_secs: 10,
        }
    }

    fn booking() -> Booking {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        Booking {
            id: "b-1".to_string(),
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            event_type: "Wedding".to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            details: Some("Garden <venue>".to_string()),
            status: BookingStatus::Pending,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_format_event_date() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(format_event_date(date), "Sunday, June 1, 2025");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_admin_email() {
        let email = admin_new_booking_email(&config(), &booking());
        assert_eq!(email.to, "admin@nextspin.test");
        assert_eq!(email.reply_to.as_deref(), Some("a@x.com"));
        assert_eq!(email.subject, "New Booking Request");
        assert!(email.html.contains("<strong>Name:</strong> Alice"));
        assert!(email.html.contains("<strong>Email:</strong> a@x.com"));
        assert!(email.html.contains("<strong>Event:</strong> Wedding"));
        assert!(email.html.contains("Sunday, June 1, 2025"));
        assert!(email.html.contains("Garden &lt;venue&gt;"));
    }

    #[test]
    fn test_admin_email_without_details() {
        let mut b = booking();
        b.details = None;
        let email = admin_new_booking_email(&config(), &b);
        assert!(!email.html.contains("Additional Details"));
    }

    #[test]
    fn test_customer_acknowledgement() {
        let email = customer_acknowledgement_email(&config(), &booking());
        assert_eq!(email.to, "a@x.com");
        assert_eq!(email.reply_to.as_deref(), Some("hello@nextspin.test"));
        assert!(email.html.contains("Hi Alice,"));
        assert!(!email.html.contains("Garden"));
    }

    #[test]
    fn test_confirmation_and_cancellation() {
        let confirmed = confirmation_email(&config(), &booking());
        assert_eq!(confirmed.to, "a@x.com");
        assert!(confirmed.subject.contains("Confirmed"));
        assert!(confirmed.html.contains("upcoming Wedding"));
        assert!(confirmed.html.contains("Sunday, June 1, 2025"));

        let cancelled = cancellation_email(&config(), &booking());
        assert_eq!(cancelled.to, "a@x.com");
        assert_eq!(cancelled.subject, "NextSpin Booking Cancellation");
        assert!(cancelled.html.contains("has been cancelled"));
    }
}
