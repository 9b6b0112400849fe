//! Aggregation pipeline
//!
//! One run walks a fixed sequence of stages:
//!
//! ```text
//! Idle -> FetchingPerson -> FetchingCountry -> [FetchingExchange] -> FetchingNews -> Done
//!               \-> Failed
//! ```
//!
//! - person failure is HARD: the run stops, nothing else is called
//! - country / exchange failures are SOFT: the section is dropped
//! - news failure yields an empty list, never an abort
//!
//! News only needs the person's country, so it runs concurrently with the
//! country -> exchange chain. The report is assembled in the fixed order.

use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::source::ProfileSource;
use crate::models::types::{CountryInfo, ExchangeSnapshot, NewsArticle, Person};
use crate::utils::constants::{MSG_NO_NEWS, MSG_UNEXPECTED, MSG_USER_FAILED};

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    FetchingPerson,
    FetchingCountry,
    FetchingExchange,
    FetchingNews,
    Done,
    Failed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::FetchingPerson => "fetching_person",
            Stage::FetchingCountry => "fetching_country",
            Stage::FetchingExchange => "fetching_exchange",
            Stage::FetchingNews => "fetching_news",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

/// Everything a successful run collected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileReport {
    pub person: Person,
    /// Absent when the country lookup failed
    pub country: Option<CountryInfo>,
    /// Absent when skipped or failed
    pub exchange: Option<ExchangeSnapshot>,
    /// Empty when the news lookup failed or found nothing
    pub news: Vec<NewsArticle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_message: Option<String>,
    /// Stages visited, in pipeline order
    pub stages: Vec<Stage>,
}

/// Terminal state of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Aggregation {
    Failed { message: String, stages: Vec<Stage> },
    Done(ProfileReport),
}

impl Aggregation {
    pub fn is_done(&self) -> bool {
        matches!(self, Aggregation::Done(_))
    }

    pub fn stages(&self) -> &[Stage] {
        match self {
            Aggregation::Failed { stages, .. } => stages,
            Aggregation::Done(report) => &report.stages,
        }
    }

    pub fn report(&self) -> Option<&ProfileReport> {
        match self {
            Aggregation::Done(report) => Some(report),
            Aggregation::Failed { .. } => None,
        }
    }
}

/// Runs the pipeline against a `ProfileSource`
pub struct Aggregator<S> {
    source: S,
}

impl<S: ProfileSource> Aggregator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Execute one run. Never panics: anything unexpected becomes a
    /// single generic failure.
    pub async fn run(&self) -> Aggregation {
        let run_id = Uuid::new_v4();
        let span = info_span!("aggregation", run = %run_id);

        match AssertUnwindSafe(self.execute().instrument(span))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(run = %run_id, "❌ Aggregation aborted by an unexpected error");
                Aggregation::Failed {
                    message: MSG_UNEXPECTED.to_string(),
                    stages: vec![Stage::Idle, Stage::Failed],
                }
            }
        }
    }

    async fn execute(&self) -> Aggregation {
        let mut stages = vec![Stage::Idle];
        let mut enter = |stage: Stage| {
            info!(stage = stage.as_str(), "▶️ stage");
            stages.push(stage);
        };

        // Step 1: person (hard)
        enter(Stage::FetchingPerson);
        let person_env = self.source.random_user().await;
        let message = person_env.failure_message(MSG_USER_FAILED);
        let Some(person) = person_env.into_data() else {
            warn!("🛑 Person lookup failed: {}", message);
            enter(Stage::Failed);
            return Aggregation::Failed { message, stages };
        };
        info!("👤 {} ({})", person.full_name(), person.country);

        // Steps 2-3: country -> exchange (soft), concurrently with news
        let country_chain = async {
            let country_env = self.source.country(&person.country).await;
            let message = country_env.failure_message("");
            let country = country_env.into_data();
            if country.is_none() {
                warn!("⚠️ Country data not available: {}", message);
            }

            let exchange = match &country {
                Some(info) if info.has_currency() => {
                    let rate_env = self.source.exchange_rate(&info.currency).await;
                    let message = rate_env.failure_message("");
                    let snapshot = rate_env.into_data();
                    if snapshot.is_none() {
                        warn!("⚠️ Exchange rate not available: {}", message);
                    }
                    Some(snapshot)
                }
                Some(info) => {
                    info!("💱 No currency for {}, skipping exchange rate", info.name);
                    None
                }
                None => None,
            };
            (country, exchange)
        };

        // Step 4: news (never aborts)
        let news_step = self.source.news(&person.country);

        let ((country, exchange_attempt), news_env) = tokio::join!(country_chain, news_step);

        enter(Stage::FetchingCountry);
        if exchange_attempt.is_some() {
            enter(Stage::FetchingExchange);
        }
        enter(Stage::FetchingNews);

        let (news, news_message) = if news_env.success {
            (news_env.data.unwrap_or_default(), None)
        } else {
            let message = news_env.failure_message(MSG_NO_NEWS);
            warn!("⚠️ News not available: {}", message);
            (Vec::new(), Some(message))
        };

        enter(Stage::Done);
        info!(
            country = country.is_some(),
            exchange = exchange_attempt.as_ref().map_or(false, Option::is_some),
            articles = news.len(),
            "✅ Aggregation complete"
        );

        Aggregation::Done(ProfileReport {
            person,
            country,
            exchange: exchange_attempt.flatten(),
            news,
            news_message,
            stages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Envelope;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::models::types::Rate;

    fn person(country: &str) -> Person {
        Person {
            first_name: "Aiko".to_string(),
            last_name: "Tanaka".to_string(),
            gender: "female".to_string(),
            picture: "https://example.com/p.jpg".to_string(),
            age: 34,
            date_of_birth: "1990-03-05T10:00:00.000Z".to_string(),
            city: "Osaka".to_string(),
            country: country.to_string(),
            address: "4521 Sakura Dori".to_string(),
            email: "aiko@example.com".to_string(),
            phone: "070-1234-5678".to_string(),
        }
    }

    fn country(currency: &str) -> CountryInfo {
        CountryInfo {
            name: "Japan".to_string(),
            capital: "Tokyo".to_string(),
            languages: "Japanese".to_string(),
            currency: currency.to_string(),
            currency_name: "Japanese yen".to_string(),
            currency_symbol: "¥".to_string(),
            flag: "https://flagcdn.com/jp.svg".to_string(),
            population: 125_836_021,
            region: "Asia".to_string(),
        }
    }

    fn article(title: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            description: "d".to_string(),
            image: None,
            url: "https://example.com".to_string(),
            source: "Wire".to_string(),
            published_at: "2024-05-01T08:00:00Z".to_string(),
        }
    }

    /// Canned answers plus a log of every call
    struct Scripted {
        person: Envelope<Person>,
        country: Envelope<CountryInfo>,
        exchange: Envelope<ExchangeSnapshot>,
        news: Envelope<Vec<NewsArticle>>,
        calls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn happy() -> Self {
            Self {
                person: Envelope::success(person("Japan")),
                country: Envelope::success(country("JPY")),
                exchange: Envelope::success(ExchangeSnapshot {
                    base: "JPY".to_string(),
                    usd_rate: Rate::Value(0.0067),
                    kzt_rate: Rate::NotAvailable,
                    date: "2024-05-01".to_string(),
                }),
                news: Envelope::success(vec![article("a"), article("b")]),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl ProfileSource for Scripted {
        async fn random_user(&self) -> Envelope<Person> {
            self.record("user".to_string());
            self.person.clone()
        }

        async fn country(&self, name: &str) -> Envelope<CountryInfo> {
            self.record(format!("country:{}", name));
            self.country.clone()
        }

        async fn exchange_rate(&self, code: &str) -> Envelope<ExchangeSnapshot> {
            self.record(format!("exchange:{}", code));
            self.exchange.clone()
        }

        async fn news(&self, country: &str) -> Envelope<Vec<NewsArticle>> {
            self.record(format!("news:{}", country));
            self.news.clone()
        }
    }

    fn sorted(mut calls: Vec<String>) -> Vec<String> {
        calls.sort();
        calls
    }

    #[tokio::test]
    async fn test_full_run() {
        let aggregator = Aggregator::new(Scripted::happy());
        let outcome = aggregator.run().await;

        let report = outcome.report().expect("run should complete");
        assert_eq!(report.person.country, "Japan");
        assert_eq!(report.country.as_ref().unwrap().currency, "JPY");
        assert_eq!(report.exchange.as_ref().unwrap().base, "JPY");
        assert_eq!(report.news.len(), 2);
        assert_eq!(report.news_message, None);
        assert_eq!(
            report.stages,
            vec![
                Stage::Idle,
                Stage::FetchingPerson,
                Stage::FetchingCountry,
                Stage::FetchingExchange,
                Stage::FetchingNews,
                Stage::Done
            ]
        );
        assert_eq!(
            sorted(aggregator.source().calls()),
            vec!["country:Japan", "exchange:JPY", "news:Japan", "user"]
        );
    }

    #[tokio::test]
    async fn test_person_failure_is_terminal() {
        let mut source = Scripted::happy();
        source.person = Envelope::failure("No user data found");
        let aggregator = Aggregator::new(source);

        let outcome = aggregator.run().await;
        assert_eq!(
            outcome,
            Aggregation::Failed {
                message: "No user data found".to_string(),
                stages: vec![Stage::Idle, Stage::FetchingPerson, Stage::Failed],
            }
        );
        assert_eq!(aggregator.source().calls(), vec!["user"]);
    }

    #[tokio::test]
    async fn test_person_failure_without_message_uses_default() {
        let mut source = Scripted::happy();
        source.person = Envelope {
            success: false,
            data: None,
            message: None,
            error: None,
        };
        let outcome = Aggregator::new(source).run().await;
        match outcome {
            Aggregation::Failed { message, .. } => assert_eq!(message, "Failed to fetch user data"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_country_failure_is_soft() {
        let mut source = Scripted::happy();
        source.country = Envelope::failure("Country not found");
        let aggregator = Aggregator::new(source);

        let report = aggregator.run().await.report().cloned().unwrap();
        assert!(report.country.is_none());
        assert!(report.exchange.is_none());
        assert_eq!(report.news.len(), 2);
        assert!(!report.stages.contains(&Stage::FetchingExchange));
        assert_eq!(
            sorted(aggregator.source().calls()),
            vec!["country:Japan", "news:Japan", "user"]
        );
    }

    #[tokio::test]
    async fn test_missing_currency_skips_exchange() {
        let mut source = Scripted::happy();
        source.country = Envelope::success(country("N/A"));
        let aggregator = Aggregator::new(source);

        let report = aggregator.run().await.report().cloned().unwrap();
        assert!(report.country.is_some());
        assert!(report.exchange.is_none());
        assert!(!aggregator
            .source()
            .calls()
            .iter()
            .any(|c| c.starts_with("exchange:")));
    }

    #[tokio::test]
    async fn test_exchange_failure_is_soft() {
        let mut source = Scripted::happy();
        source.exchange = Envelope::failure("Exchange rate not found");
        let report = Aggregator::new(source).run().await.report().cloned().unwrap();
        assert!(report.country.is_some());
        assert!(report.exchange.is_none());
        assert!(report.stages.contains(&Stage::FetchingExchange));
        assert_eq!(report.stages.last(), Some(&Stage::Done));
    }

    #[tokio::test]
    async fn test_news_failure_gives_empty_list() {
        let mut source = Scripted::happy();
        source.news = Envelope::failure_with_data("apiKeyInvalid", vec![article("stale")]);
        let report = Aggregator::new(source).run().await.report().cloned().unwrap();
        assert!(report.news.is_empty());
        assert_eq!(report.news_message.as_deref(), Some("apiKeyInvalid"));
    }

    struct Exploding;

    #[async_trait]
    impl ProfileSource for Exploding {
        async fn random_user(&self) -> Envelope<Person> {
            Envelope::success(person("Japan"))
        }

        async fn country(&self, _name: &str) -> Envelope<CountryInfo> {
            panic!("boom");
        }

        async fn exchange_rate(&self, _code: &str) -> Envelope<ExchangeSnapshot> {
            Envelope::failure("unused")
        }

        async fn news(&self, _country: &str) -> Envelope<Vec<NewsArticle>> {
            Envelope::success(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_unexpected_error_is_caught() {
        let outcome = Aggregator::new(Exploding).run().await;
        match outcome {
            Aggregation::Failed { message, stages } => {
                assert_eq!(message, "An unexpected error occurred. Please try again.");
                assert_eq!(stages.last(), Some(&Stage::Failed));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_aggregation_json_shape() {
        let failed = Aggregation::Failed {
            message: "No user data found".to_string(),
            stages: vec![Stage::Idle, Stage::FetchingPerson, Stage::Failed],
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["stages"][2], "failed");

        let back: Aggregation = serde_json::from_value(json).unwrap();
        assert_eq!(back, failed);
    }

    #[test]
    fn test_terminal_stages() {
        assert!(Stage::Done.is_terminal());
        assert!(Stage::Failed.is_terminal());
        assert!(!Stage::FetchingNews.is_terminal());
    }
}
