//! HTML newsletter preview.
//!
//! One template per topic decides the heading field, the body line and the
//! call-to-action link. All item text is escaped before it reaches markup.
use serde_json::Value;
use std::sync::Arc;

use discovery_core::catalog::Catalog;
use discovery_core::config::NewsletterSettings;
use discovery_core::traits::NewsletterRenderer;
use discovery_core::types::{ActiveFilterValue, ActiveFilters, DataItem, Topic};

enum Body {
    Field { field: &'static str, fallback: &'static str },
    Pair(&'static str, &'static str),
}

struct TopicTemplate {
    title: &'static str,
    heading: &'static [&'static str],
    body: Body,
    link: Option<(&'static str, &'static str)>,
}

fn template(topic: Topic) -> TopicTemplate {
    match topic {
        Topic::Movies => TopicTemplate {
            title: "Your Movie Recommendations",
            heading: &["title"],
            body: Body::Field { field: "description", fallback: "No description available" },
            link: Some(("link", "Watch Trailer")),
        },
        Topic::Restaurants => TopicTemplate {
            title: "Top Restaurant Picks",
            heading: &["name"],
            body: Body::Pair("cuisine", "location"),
            link: Some(("reservationLink", "Book Now")),
        },
        Topic::Travel => TopicTemplate {
            title: "Travel Destinations for You",
            heading: &["destination"],
            body: Body::Field { field: "description", fallback: "Explore this destination" },
            link: Some(("bookingLink", "Book Trip")),
        },
        Topic::Events => TopicTemplate {
            title: "Upcoming Events",
            heading: &["name"],
            body: Body::Pair("date", "location"),
            link: Some(("ticketLink", "Get Tickets")),
        },
        Topic::Tech => TopicTemplate {
            title: "Latest Tech Picks",
            heading: &["name"],
            body: Body::Field { field: "description", fallback: "Discover this tech" },
            link: Some(("purchaseLink", "Buy Now")),
        },
        Topic::Default => TopicTemplate {
            title: "Explore More",
            heading: &["title", "name"],
            body: Body::Field { field: "description", fallback: "No details available" },
            link: None,
        },
    }
}

/// Escape the five HTML-significant characters.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn text(item: &DataItem, field: &str) -> Option<String> {
    match item.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub struct HtmlNewsletter {
    settings: NewsletterSettings,
    catalog: Arc<Catalog>,
}

impl HtmlNewsletter {
    pub fn new(settings: NewsletterSettings, catalog: Arc<Catalog>) -> Self { Self { settings, catalog } }

    pub fn empty_newsletter(&self) -> String {
        concat!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">"#,
            r#"<h1 style="color: #552BBF; text-align: center;">Explore More</h1>"#,
            r#"<p style="text-align: center; color: #4B5563;">No results found. Try another search!</p>"#,
            r#"<footer style="text-align: center; color: #6B7280; margin-top: 20px;">Powered by Topic Discovery</footer>"#,
            "</div>"
        )
        .to_string()
    }

    fn render_item(&self, t: &TopicTemplate, item: &DataItem) -> String {
        let heading = t.heading.iter().find_map(|f| text(item, f)).unwrap_or_default();
        let body = match t.body {
            Body::Field { field, fallback } => text(item, field).unwrap_or_else(|| fallback.to_string()),
            Body::Pair(a, b) => format!("{} - {}", text(item, a).unwrap_or_default(), text(item, b).unwrap_or_default()),
        };
        let mut html = String::from(r#"<div style="margin-bottom: 20px;">"#);
        html.push_str(&format!(r#"<h3 style="color: #667eea;">{}</h3>"#, sanitize(&heading)));
        if self.settings.include_images {
            if let Some(image) = text(item, "image") {
                html.push_str(&format!(
                    r#"<img src="{}" alt="{}" style="max-width: 200px;" />"#,
                    sanitize(&image),
                    sanitize(&heading)
                ));
            }
        }
        html.push_str(&format!("<p>{}</p>", sanitize(&body)));
        if self.settings.include_links {
            if let Some((field, label)) = t.link {
                if let Some(href) = text(item, field) {
                    html.push_str(&format!(r#"<a href="{}" style="color: #E6007A;">{}</a>"#, sanitize(&href), label));
                }
            }
        }
        html.push_str("</div>");
        html
    }

    /// Labels of newsletter-relevant filters the user actually engaged.
    fn filter_summary(&self, topic: Topic, active: &ActiveFilters) -> Vec<String> {
        active
            .iter()
            .filter_map(|(id, value)| {
                let descriptor = self.catalog.descriptor(topic, id)?;
                if !descriptor.newsletter_relevant {
                    return None;
                }
                match value {
                    ActiveFilterValue::Checkbox(true) => Some(descriptor.label.clone()),
                    ActiveFilterValue::MultiSelect(sel) if !sel.is_empty() => {
                        Some(format!("{} ({})", descriptor.label, sel.iter().cloned().collect::<Vec<_>>().join(", ")))
                    }
                    ActiveFilterValue::Range { min, max } => Some(format!("{} ({}-{})", descriptor.label, min, max)),
                    _ => None,
                }
            })
            .collect()
    }
}

impl NewsletterRenderer for HtmlNewsletter {
    fn render(&self, topic: Topic, query: &str, items: &[DataItem], active: &ActiveFilters) -> String {
        if items.is_empty() {
            return self.empty_newsletter();
        }
        let t = template(topic);
        let query_line = if query.is_empty() { "General" } else { query };
        let mut html = String::from(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">"#,
        );
        html.push_str(&format!(r#"<h1 style="color: #552BBF; text-align: center;">{}</h1>"#, sanitize(t.title)));
        html.push_str(&format!(
            r#"<p style="text-align: center; color: #4B5563;">Generated for query: {}</p>"#,
            sanitize(query_line)
        ));
        let summary = self.filter_summary(topic, active);
        if !summary.is_empty() {
            html.push_str(&format!(
                r#"<p style="text-align: center; color: #4B5563;">Filters: {}</p>"#,
                sanitize(&summary.join("; "))
            ));
        }
        html.push_str(r#"<hr style="border: 1px solid #E5E7EB; margin: 20px 0;" />"#);
        for item in items.iter().take(self.settings.max_items) {
            html.push_str(&self.render_item(&t, item));
        }
        html.push_str(r#"<footer style="text-align: center; color: #6B7280; margin-top: 20px;">Powered by Topic Discovery</footer>"#);
        html.push_str("</div>");
        html
    }
}
