//! Presentation - turns an `Aggregation` into display text.
//!
//! Owns display rules only; no fetching happens here.

use chrono::{DateTime, NaiveDate};
use std::fmt::Write;

use super::pipeline::{Aggregation, ProfileReport};
use crate::models::types::{CountryInfo, ExchangeSnapshot, NewsArticle, Person, Rate};
use crate::utils::constants::{NOT_AVAILABLE, TARGET_CURRENCY};

pub const RATE_NOT_AVAILABLE: &str = "Rate not available";
pub const NO_NEWS_PLACEHOLDER: &str = "No news articles found for this country.";
pub const NO_IMAGE: &str = "No Image";
pub const INVALID_DATE: &str = "Invalid Date";

/// A titled block of label/value lines
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub lines: Vec<(String, String)>,
}

impl Section {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    fn line(mut self, label: &str, value: impl Into<String>) -> Self {
        self.lines.push((label.to_string(), value.into()));
        self
    }

    /// Value of the first line with `label`
    pub fn value(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

/// What the page shows after a run
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// Single banner replacing the content area
    Error(String),
    Content(Vec<Section>),
}

impl Page {
    pub fn section(&self, title: &str) -> Option<&Section> {
        match self {
            Page::Content(sections) => sections.iter().find(|s| s.title == title),
            Page::Error(_) => None,
        }
    }
}

// ============================================
// Formatting helpers
// ============================================

/// "female" -> "Female", empty -> "N/A"
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// ISO timestamp or date -> "March 5, 1990"
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%B %-d, %Y").to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => INVALID_DATE.to_string(),
    }
}

/// 1234567 -> "1,234,567"
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// "1 JPY = 0.01 USD", or the not-available text.
/// Halves round away from zero (0.125 -> 0.13).
pub fn format_rate(base: &str, rate: Rate, target: &str) -> String {
    match rate.value() {
        Some(v) => format!("1 {} = {:.2} {}", base, (v * 100.0).round() / 100.0, target),
        None => RATE_NOT_AVAILABLE.to_string(),
    }
}

pub fn format_currency(country: &CountryInfo) -> String {
    format!(
        "{} ({}) {}",
        country.currency_name, country.currency, country.currency_symbol
    )
    .trim_end()
    .to_string()
}

// ============================================
// Sections
// ============================================

pub fn user_section(person: &Person) -> Section {
    Section::new("User")
        .line("Name", person.full_name())
        .line("Picture", person.picture.clone())
        .line("Gender", capitalize_first(&person.gender))
        .line("Age", format!("{} years", person.age))
        .line("Date of Birth", format_date(&person.date_of_birth))
        .line("Email", person.email.clone())
        .line("Phone", person.phone.clone())
        .line("Address", person.address.clone())
        .line("City", person.city.clone())
        .line("Country", person.country.clone())
}

pub fn country_section(country: &CountryInfo) -> Section {
    Section::new("Country")
        .line("Flag", country.flag.clone())
        .line("Name", country.name.clone())
        .line("Capital", country.capital.clone())
        .line("Languages", country.languages.clone())
        .line("Currency", format_currency(country))
        .line("Region", country.region.clone())
        .line("Population", format_number(country.population))
}

pub fn exchange_section(snapshot: &ExchangeSnapshot) -> Section {
    Section::new("Exchange Rates")
        .line("Base", format!("Base Currency: {}", snapshot.base))
        .line("USD", format_rate(&snapshot.base, snapshot.usd_rate, "USD"))
        .line(
            TARGET_CURRENCY,
            format_rate(&snapshot.base, snapshot.kzt_rate, TARGET_CURRENCY),
        )
        .line("Updated", format!("Last updated: {}", snapshot.date))
}

fn article_lines(section: Section, index: usize, article: &NewsArticle) -> Section {
    let n = index + 1;
    let published = if article.published_at.is_empty() {
        "Unknown date".to_string()
    } else {
        format_date(&article.published_at)
    };
    section
        .line(&format!("{}. Title", n), article.title.clone())
        .line(&format!("{}. Image", n), article.image.clone().unwrap_or_else(|| NO_IMAGE.to_string()))
        .line(&format!("{}. Description", n), article.description.clone())
        .line(&format!("{}. Source", n), format!("Source: {}", article.source))
        .line(&format!("{}. Published", n), published)
        .line(&format!("{}. Link", n), article.url.clone())
}

pub fn news_section(articles: &[NewsArticle]) -> Section {
    if articles.is_empty() {
        return Section::new("News").line("News", NO_NEWS_PLACEHOLDER);
    }
    articles
        .iter()
        .enumerate()
        .fold(Section::new("News"), |section, (i, article)| {
            article_lines(section, i, article)
        })
}

/// Sections present for a completed run, in display order
pub fn report_sections(report: &ProfileReport) -> Vec<Section> {
    let mut sections = vec![user_section(&report.person)];
    if let Some(country) = &report.country {
        sections.push(country_section(country));
    }
    if let Some(exchange) = &report.exchange {
        sections.push(exchange_section(exchange));
    }
    sections.push(news_section(&report.news));
    sections
}

pub fn render_page(outcome: &Aggregation) -> Page {
    match outcome {
        Aggregation::Failed { message, .. } => Page::Error(message.clone()),
        Aggregation::Done(report) => Page::Content(report_sections(report)),
    }
}

/// Plain-text rendering for terminals
pub fn render_text(page: &Page) -> String {
    let mut out = String::new();
    match page {
        Page::Error(message) => {
            let _ = writeln!(out, "❌ {}", message);
        }
        Page::Content(sections) => {
            for section in sections {
                let _ = writeln!(out, "== {} ==", section.title);
                let width = section.lines.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
                for (label, value) in &section.lines {
                    let _ = writeln!(out, "  {:<width$}  {}", label, value, width = width);
                }
                out.push('\n');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::Stage;

    fn person() -> Person {
        Person {
            first_name: "Aiko".to_string(),
            last_name: "Tanaka".to_string(),
            gender: "female".to_string(),
            picture: "https://example.com/p.jpg".to_string(),
            age: 34,
            date_of_birth: "1990-03-05T10:00:00.000Z".to_string(),
            city: "Osaka".to_string(),
            country: "Japan".to_string(),
            address: "4521 Sakura Dori".to_string(),
            email: "aiko@example.com".to_string(),
            phone: "070-1234-5678".to_string(),
        }
    }

    fn report() -> ProfileReport {
        ProfileReport {
            person: person(),
            country: None,
            exchange: Some(ExchangeSnapshot {
                base: "JPY".to_string(),
                usd_rate: Rate::Value(0.0067),
                kzt_rate: Rate::NotAvailable,
                date: "2024-05-01".to_string(),
            }),
            news: Vec::new(),
            news_message: None,
            stages: vec![Stage::Done],
        }
    }

    #[test]
    fn test_rate_lines() {
        let page = render_page(&Aggregation::Done(report()));
        let exchange = page.section("Exchange Rates").unwrap();
        assert_eq!(exchange.value("USD"), Some("1 JPY = 0.01 USD"));
        assert_eq!(exchange.value("KZT"), Some("Rate not available"));
        assert_eq!(exchange.value("Base"), Some("Base Currency: JPY"));
        assert_eq!(exchange.value("Updated"), Some("Last updated: 2024-05-01"));
    }

    #[test]
    fn test_omits_missing_sections() {
        let page = render_page(&Aggregation::Done(report()));
        assert!(page.section("User").is_some());
        assert!(page.section("Country").is_none());
        assert_eq!(
            page.section("News").unwrap().value("News"),
            Some("No news articles found for this country.")
        );
    }

    #[test]
    fn test_failure_is_single_banner() {
        let page = render_page(&Aggregation::Failed {
            message: "No user data found".to_string(),
            stages: vec![Stage::Failed],
        });
        assert_eq!(page, Page::Error("No user data found".to_string()));
        assert!(page.section("User").is_none());
        assert_eq!(render_text(&page), "❌ No user data found\n");
    }

    #[test]
    fn test_user_formatting() {
        let section = user_section(&person());
        assert_eq!(section.value("Gender"), Some("Female"));
        assert_eq!(section.value("Age"), Some("34 years"));
        assert_eq!(section.value("Date of Birth"), Some("March 5, 1990"));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(capitalize_first(""), "N/A");
        assert_eq!(capitalize_first("male"), "Male");
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(125_836_021), "125,836,021");
        assert_eq!(format_date("2024-05-01"), "May 1, 2024");
        assert_eq!(format_date("yesterday"), "Invalid Date");
        assert_eq!(format_rate("EUR", Rate::Value(474.236), "KZT"), "1 EUR = 474.24 KZT");
    }

    #[test]
    fn test_rate_halves_round_up() {
        assert_eq!(format_rate("X", Rate::Value(0.125), "USD"), "1 X = 0.13 USD");
        assert_eq!(format_rate("X", Rate::Value(0.375), "USD"), "1 X = 0.38 USD");
        assert_eq!(format_rate("X", Rate::Value(2.5), "USD"), "1 X = 2.50 USD");
    }

    #[test]
    fn test_currency_line_without_symbol() {
        let country = CountryInfo {
            name: "Nowhere".to_string(),
            capital: "N/A".to_string(),
            languages: "N/A".to_string(),
            currency: "XYZ".to_string(),
            currency_name: "Test dollar".to_string(),
            currency_symbol: String::new(),
            flag: "N/A".to_string(),
            population: 0,
            region: "N/A".to_string(),
        };
        assert_eq!(format_currency(&country), "Test dollar (XYZ)");
        assert_eq!(country_section(&country).value("Population"), Some("0"));
    }

    #[test]
    fn test_news_cards() {
        let articles = vec![NewsArticle {
            title: "Tokyo opens new line".to_string(),
            description: "A new metro line.".to_string(),
            image: None,
            url: "https://bbc.co.uk/a".to_string(),
            source: "BBC News".to_string(),
            published_at: "2024-05-01T08:00:00Z".to_string(),
        }];
        let section = news_section(&articles);
        assert_eq!(section.value("1. Image"), Some("No Image"));
        assert_eq!(section.value("1. Source"), Some("Source: BBC News"));
        assert_eq!(section.value("1. Published"), Some("May 1, 2024"));
    }
}
