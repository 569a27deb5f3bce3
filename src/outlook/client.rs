//! Client for the Outlook on the web JSON service endpoint.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use super::ReminderApi;
use crate::error::{AppError, AppResult};
use crate::http_config::HttpConfig;
use crate::models::OutlookReminder;

pub const OWA_SERVICE_URL: &str = "https://outlook.office.com/owa/service.svc";
pub const OWA_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const REQUEST_SERVER_VERSION: &str = "V2018_01_08";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetRemindersResponse {
    body: RemindersBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RemindersBody {
    #[serde(default)]
    reminders: Vec<RawReminder>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawReminder {
    #[serde(rename = "UID")]
    uid: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    location: Option<String>,
    reminder_time: String,
    start_date: String,
    end_date: String,
}

impl RawReminder {
    fn into_reminder(self) -> AppResult<OutlookReminder> {
        Ok(OutlookReminder {
            reminder_time: parse_owa_datetime(&self.reminder_time)?,
            start: parse_owa_datetime(&self.start_date)?,
            end: parse_owa_datetime(&self.end_date)?,
            id: self.uid,
            subject: self.subject.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            notification_id: None,
        })
    }
}

/// OWA sends ISO 8601 with an offset. Values without one are taken as UTC.
pub fn parse_owa_datetime(value: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| AppError::outlook(format!("Unexpected date '{}' in reminder", value)))
}

pub fn reminders_request(begin: DateTime<Utc>, end: DateTime<Utc>) -> Value {
    json!({
        "__type": "GetRemindersJsonRequest:#Exchange",
        "Header": {
            "__type": "JsonRequestHeaders:#Exchange",
            "RequestServerVersion": REQUEST_SERVER_VERSION,
        },
        "Body": {
            "__type": "GetRemindersRequest:#Exchange",
            "BeginTime": begin.format(OWA_TIME_FORMAT).to_string(),
            "EndTime": end.format(OWA_TIME_FORMAT).to_string(),
            "ReminderType": 1,
        },
    })
}

/// The request body travels URL-encoded in the `x-owa-urlpostdata` header.
pub fn encode_post_data(request: &Value) -> String {
    url::form_urlencoded::byte_serialize(request.to_string().as_bytes()).collect()
}

pub fn parse_reminders(body: &str) -> AppResult<Vec<OutlookReminder>> {
    let response: GetRemindersResponse = serde_json::from_str(body)?;
    response
        .body
        .reminders
        .into_iter()
        .map(RawReminder::into_reminder)
        .collect()
}

#[derive(Debug, Clone)]
pub struct OwaClient {
    client: Client,
    service_url: String,
}

impl OwaClient {
    pub fn new(config: &HttpConfig) -> AppResult<Self> {
        Self::with_url(config, OWA_SERVICE_URL)
    }

    pub fn with_url(config: &HttpConfig, service_url: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            client: config.build_client()?,
            service_url: service_url.into(),
        })
    }
}

#[async_trait]
impl ReminderApi for OwaClient {
    async fn validate_token(&self, token: &str) -> AppResult<bool> {
        let response = self
            .client
            .post(&self.service_url)
            .header("authorization", token)
            .send()
            .await?;
        // The bare endpoint answers 404 to an authenticated caller
        let valid = response.status() == StatusCode::NOT_FOUND;
        debug!("Token check returned {}", response.status());
        Ok(valid)
    }

    async fn get_reminders(
        &self,
        token: &str,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<OutlookReminder>> {
        let post_data = encode_post_data(&reminders_request(begin, end));
        let response = self
            .client
            .post(&self.service_url)
            .header("authorization", token)
            .header("action", "GetReminders")
            .header("x-owa-urlpostdata", post_data)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("GetReminders answered {}", status);
            return Err(AppError::auth(format!("Outlook rejected the request ({})", status)));
        }

        let body = response.text().await?;
        parse_reminders(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_reminders_request_shape() {
        let begin = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 15).unwrap();
        let end = begin + chrono::Duration::days(30);
        let request = reminders_request(begin, end);
        assert_eq!(request["Header"]["RequestServerVersion"], "V2018_01_08");
        assert_eq!(request["Body"]["BeginTime"], "2024-03-01T08:30:15Z");
        assert_eq!(request["Body"]["EndTime"], "2024-03-31T08:30:15Z");
        assert_eq!(request["Body"]["ReminderType"], 1);
    }

    #[test]
    fn test_encode_post_data_escapes_json() {
        let encoded = encode_post_data(&json!({"__type": "A:#B"}));
        assert_eq!(encoded, "%7B%22__type%22%3A%22A%3A%23B%22%7D");
    }

    #[test]
    fn test_parse_owa_datetime() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        assert_eq!(parse_owa_datetime("2024-03-04T10:00:00+01:00").unwrap(), expected);
        assert_eq!(parse_owa_datetime("2024-03-04T09:00:00Z").unwrap(), expected);
        assert_eq!(parse_owa_datetime("2024-03-04T09:00:00").unwrap(), expected);
        assert!(parse_owa_datetime("yesterday").is_err());
    }

    #[test]
    fn test_parse_reminders() {
        let body = r#"{
            "Header": {},
            "Body": {
                "ResponseClass": "Success",
                "Reminders": [{
                    "UID": "uid-1",
                    "Subject": "Review",
                    "Location": null,
                    "ReminderTime": "2024-03-04T08:45:00Z",
                    "StartDate": "2024-03-04T09:00:00Z",
                    "EndDate": "2024-03-04T09:30:00Z",
                    "ItemId": {"Id": "ignored"}
                }]
            }
        }"#;
        let reminders = parse_reminders(body).unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].id, "uid-1");
        assert_eq!(reminders[0].subject, "Review");
        assert_eq!(reminders[0].location, "");
    }

    #[test]
    fn test_parse_reminders_without_list() {
        assert!(parse_reminders(r#"{"Body": {}}"#).unwrap().is_empty());
        assert!(parse_reminders("<html>").is_err());
    }
}
