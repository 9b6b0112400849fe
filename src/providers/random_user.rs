//! Random User API Client
//!
//! API: https://randomuser.me/api/
//! Free, no API key required. Returns `{ results: [ user, ... ] }`;
//! only the first record is used.

use serde::Deserialize;
use tracing::{info, warn};

use crate::models::errors::{AppError, AppResult};
use crate::models::types::Person;
use crate::providers::http::read_json;
use crate::utils::constants::{MSG_NO_USER, MSG_USER_FAILED};

/// Random User API response
#[derive(Debug, Deserialize)]
pub struct RandomUserResponse {
    #[serde(default)]
    pub results: Option<Vec<RawUser>>,
}

#[derive(Debug, Deserialize)]
pub struct RawUser {
    pub gender: String,
    pub name: RawName,
    pub location: RawLocation,
    pub email: String,
    pub dob: RawDob,
    pub phone: String,
    pub picture: RawPicture,
}

#[derive(Debug, Deserialize)]
pub struct RawName {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Deserialize)]
pub struct RawLocation {
    pub street: RawStreet,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct RawStreet {
    /// Usually a number, occasionally a string
    pub number: serde_json::Value,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RawDob {
    pub date: String,
    pub age: u32,
}

#[derive(Debug, Deserialize)]
pub struct RawPicture {
    pub large: String,
}

impl From<RawUser> for Person {
    fn from(user: RawUser) -> Self {
        let number = match &user.location.street.number {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        let address = format!("{} {}", number, user.location.street.name)
            .trim()
            .to_string();

        Person {
            first_name: user.name.first,
            last_name: user.name.last,
            gender: user.gender,
            picture: user.picture.large,
            age: user.dob.age,
            date_of_birth: user.dob.date,
            city: user.location.city,
            country: user.location.country,
            address,
            email: user.email,
            phone: user.phone,
        }
    }
}

/// Pick the first record of a decoded response
pub fn first_person(response: RandomUserResponse) -> AppResult<Person> {
    response
        .results
        .and_then(|users| users.into_iter().next())
        .map(Person::from)
        .ok_or_else(|| AppError::upstream_empty(MSG_NO_USER))
}

/// Random User API client
#[derive(Clone)]
pub struct RandomUserClient {
    client: reqwest::Client,
    base_url: String,
}

impl RandomUserClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch one random person
    pub async fn fetch_person(&self) -> AppResult<Person> {
        let url = format!("{}/api/", self.base_url);

        let result = async {
            let response = self.client.get(&url).send().await?;
            read_json::<RandomUserResponse>(response).await
        }
        .await;

        let person = match result {
            Ok(data) => first_person(data)?,
            Err(e) => {
                warn!("⚠️ RandomUser request failed: {}", e);
                return Err(e.context(MSG_USER_FAILED));
            }
        };

        info!("👤 RandomUser: {} from {}", person.full_name(), person.country);
        Ok(person)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;

    const SAMPLE: &str = r#"{
        "results": [{
            "gender": "female",
            "name": {"title": "Ms", "first": "Aiko", "last": "Tanaka"},
            "location": {
                "street": {"number": 4521, "name": "Sakura Dori"},
                "city": "Osaka",
                "state": "Osaka",
                "country": "Japan",
                "postcode": 12345
            },
            "email": "aiko.tanaka@example.com",
            "dob": {"date": "1990-03-05T10:00:00.000Z", "age": 34},
            "phone": "070-1234-5678",
            "picture": {"large": "https://randomuser.me/api/portraits/women/1.jpg"}
        }],
        "info": {"seed": "abc", "results": 1}
    }"#;

    #[test]
    fn test_flattens_first_record() {
        let response: RandomUserResponse = serde_json::from_str(SAMPLE).unwrap();
        let person = first_person(response).unwrap();
        assert_eq!(person.full_name(), "Aiko Tanaka");
        assert_eq!(person.address, "4521 Sakura Dori");
        assert_eq!(person.country, "Japan");
        assert_eq!(person.age, 34);
        assert_eq!(person.date_of_birth, "1990-03-05T10:00:00.000Z");
        assert_eq!(person.picture, "https://randomuser.me/api/portraits/women/1.jpg");
    }

    #[test]
    fn test_empty_results() {
        let response: RandomUserResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        let err = first_person(response).unwrap_err();
        assert_eq!(err.code, ErrorCode::UpstreamEmpty);
        assert_eq!(err.message, "No user data found");
    }

    #[test]
    fn test_missing_results_key() {
        let response: RandomUserResponse =
            serde_json::from_str(r#"{"error": "Uh oh"}"#).unwrap();
        assert!(first_person(response).is_err());
    }

    #[test]
    fn test_string_street_number() {
        let json = SAMPLE.replace("4521", "\"12B\"");
        let response: RandomUserResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(first_person(response).unwrap().address, "12B Sakura Dori");
    }
}
