use chrono::NaiveDate;
use maud::{html, Markup, DOCTYPE};

use crate::models::{Booking, BookingStatus};

pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

/// Per-status wording and accent color for the customer update email.
pub struct StatusTone {
    pub heading: &'static str,
    pub message: String,
    pub accent: &'static str,
}

pub fn status_tone(status: BookingStatus) -> StatusTone {
    match status {
        BookingStatus::Approved => StatusTone {
            heading: "Your Viewing Is Approved",
            message: "Great news! Your property viewing request has been approved. \
                      We look forward to seeing you on your scheduled visit."
                .to_string(),
            accent: "#16a34a",
        },
        BookingStatus::Rejected => StatusTone {
            heading: "Update on Your Viewing Request",
            message: "We're sorry, but we are unable to accommodate your viewing request \
                      for the selected schedule. Feel free to submit a new request or \
                      contact us for other available times."
                .to_string(),
            accent: "#dc2626",
        },
        BookingStatus::Completed => StatusTone {
            heading: "Thank You for Visiting",
            message: "Thank you for visiting the property! We hope you enjoyed the tour. \
                      Let us know if you have any questions."
                .to_string(),
            accent: "#2563eb",
        },
        other => StatusTone {
            heading: "Booking Status Updated",
            message: format!(
                "Your booking status has been updated to {}.",
                status_label(other)
            ),
            accent: "#6b7280",
        },
    }
}

pub fn status_label(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "Pending",
        BookingStatus::Approved => "Approved",
        BookingStatus::Rejected => "Rejected",
        BookingStatus::Completed => "Completed",
        BookingStatus::Cancelled => "Cancelled",
    }
}

/// `Tuesday, March 10, 2026`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

fn layout(title: &str, accent: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                title { (title) }
            }
            body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;" {
                div style="max-width: 600px; margin: 0 auto; padding: 20px;" {
                    h2 style=(format!("color: {accent};")) { (title) }
                    (content)
                    p style="color: #666; font-size: 12px; margin-top: 40px;" {
                        "This is an automated message. Please do not reply directly to this email."
                    }
                }
            }
        }
    }
}

fn details(rows: &[(&str, String)]) -> Markup {
    html! {
        table style="border-collapse: collapse; margin: 20px 0;" {
            @for (label, value) in rows {
                tr {
                    td style="padding: 6px 16px 6px 0; font-weight: bold; vertical-align: top;" { (label) }
                    td style="padding: 6px 0;" { (value) }
                }
            }
        }
    }
}

fn highlight(accent: &str, label: &str, text: &str) -> Markup {
    html! {
        div style=(format!("background-color: #f9fafb; border-left: 4px solid {accent}; padding: 15px; margin: 20px 0;")) {
            p style="margin: 0 0 6px 0; font-weight: bold;" { (label) }
            p style="margin: 0; white-space: pre-wrap;" { (text) }
        }
    }
}

fn schedule_rows(booking: &Booking) -> Vec<(&'static str, String)> {
    vec![
        ("Property", booking.property_label().to_string()),
        ("Date", format_long_date(booking.preferred_date)),
        ("Time", booking.preferred_time.to_string()),
    ]
}

/// Acknowledgement sent to the customer right after submission.
pub fn customer_confirmation(booking: &Booking) -> EmailContent {
    let accent = "#2563eb";
    let content = html! {
        p { "Hi " (booking.name) "," }
        p {
            "Thank you for your interest! We have received your viewing request and "
            "our team will review it shortly. You will receive another email once it "
            "has been confirmed."
        }
        (details(&schedule_rows(booking)))
    };

    EmailContent {
        subject: format!("Booking Request Received - {}", booking.property_label()),
        html: layout("We Received Your Booking Request", accent, content).into_string(),
    }
}

/// Alert sent to the staff inbox with everything needed to follow up.
pub fn staff_notification(booking: &Booking, admin_bookings_url: &str) -> EmailContent {
    let accent = "#f59e0b";
    let mut rows = vec![
        ("Name", booking.name.clone()),
        ("Email", booking.email.clone()),
        ("Phone", booking.phone.clone()),
    ];
    rows.extend(schedule_rows(booking));

    let content = html! {
        p { "A new property viewing request has been submitted." }
        (details(&rows))
        @if let Some(message) = &booking.message {
            (highlight(accent, "Message", message))
        }
        p style="margin: 30px 0;" {
            a href=(admin_bookings_url)
              style="display: inline-block; background-color: #2563eb; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px;" {
                "View Bookings"
            }
        }
    };

    EmailContent {
        subject: format!(
            "New Booking Request: {} - {}",
            booking.name,
            booking.property_label()
        ),
        html: layout("New Booking Request", accent, content).into_string(),
    }
}

/// Customer email for a staff status change, worded per target status.
pub fn status_update(booking: &Booking) -> EmailContent {
    let tone = status_tone(booking.status);
    let mut rows = schedule_rows(booking);
    rows.push(("Status", status_label(booking.status).to_string()));

    let content = html! {
        p { "Hi " (booking.name) "," }
        p { (tone.message) }
        (details(&rows))
        @if let Some(notes) = booking.admin_notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            (highlight(tone.accent, "Notes from our team", notes))
        }
    };

    EmailContent {
        subject: format!("{} - {}", tone.heading, booking.property_label()),
        html: layout(tone.heading, tone.accent, content).into_string(),
    }
}
