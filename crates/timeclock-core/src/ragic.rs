//! HTTP client for the Ragic tables backing the timeclock.
//!
//! Reads are `GET {base}/{route}?api&where=...` and come back as a JSON object
//! keyed by record id. Writes are form posts keyed by numeric field id and
//! come back as `{"status": "SUCCESS", "ragicId": ..}`.

use crate::config::Config;
use crate::error::{Result, TimeclockError};
use crate::fields::{attendance, hours, members};
use crate::hours::{record_id_order, HoursRecord, NewHoursRecord, Signup};
use crate::store::AttendanceStore;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};
use std::time::Duration;

type Row = Map<String, Value>;

pub struct RagicClient {
    base_url: String,
    api_key: String,
    members_route: String,
    attendance_route: String,
    hours_route: String,
    http: reqwest::Client,
}

impl RagicClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let api_key = cfg.api_key()?.to_string();
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: cfg.ragic.base_url.trim_end_matches('/').to_string(),
            api_key,
            members_route: cfg.ragic.members_route.clone(),
            attendance_route: cfg.ragic.attendance_route.clone(),
            hours_route: cfg.ragic.hours_route.clone(),
            http,
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_matches('/'))
    }

    fn auth(&self) -> String {
        format!("Basic {}", self.api_key)
    }

    async fn fetch_rows(&self, route: &str, conditions: &[String]) -> Result<Vec<(String, Row)>> {
        let url = self.url(route);
        let mut query: Vec<(&str, &str)> = vec![("api", "")];
        query.extend(conditions.iter().map(|c| ("where", c.as_str())));

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.auth())
            .query(&query)
            .send()
            .await?;
        let body = read_body(&url, response).await?;
        tracing::info!(%url, "data fetched from ragic");

        let Value::Object(map) = body else {
            return Err(unexpected(&url, "expected an object keyed by record id"));
        };
        let mut rows: Vec<(String, Row)> = map
            .into_iter()
            .filter_map(|(id, row)| match row {
                Value::Object(row) => Some((id, row)),
                _ => None,
            })
            .collect();
        rows.sort_by(|a, b| record_id_order(&a.0, &b.0));
        Ok(rows)
    }

    async fn send_form(&self, route: &str, form: &[(String, String)]) -> Result<Value> {
        let url = self.url(route);
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.auth())
            .query(&[("api", "")])
            .form(form)
            .send()
            .await?;
        let body = read_body(&url, response).await?;
        tracing::info!(%url, "data sent to ragic");
        Ok(body)
    }
}

#[async_trait]
impl AttendanceStore for RagicClient {
    async fn member_name(&self, member_id: &str) -> Result<String> {
        let rows = self
            .fetch_rows(&self.members_route, &[members::MEMBERSHIP_ID.eq(member_id)])
            .await?;
        rows.iter()
            .find_map(|(_, row)| text(row.get(members::FULL_NAME)))
            .ok_or_else(|| TimeclockError::MemberNotFound(member_id.to_string()))
    }

    async fn open_signups(&self, member_id: &str) -> Result<Vec<Signup>> {
        let conditions = [
            attendance::TIMECLOCK_STATUS.eq(attendance::STATUS_OPEN),
            attendance::MEMBERSHIP_ID.eq(member_id),
        ];
        let rows = self.fetch_rows(&self.attendance_route, &conditions).await?;
        Ok(rows
            .into_iter()
            .filter_map(|(id, row)| {
                let signup = signup_from_row(&id, &row);
                if signup.is_none() {
                    tracing::warn!(record_id = %id, "skipping signup row with missing fields");
                }
                signup
            })
            .collect())
    }

    async fn todays_hours_record(
        &self,
        member_id: &str,
        event_id: i64,
        date: &str,
    ) -> Result<Option<HoursRecord>> {
        let conditions = [
            hours::DATE.eq(date),
            hours::EVENT_ID.eq(event_id),
            hours::MEMBERSHIP_ID.eq(member_id),
        ];
        let rows = self.fetch_rows(&self.hours_route, &conditions).await?;
        if rows.len() > 1 {
            tracing::warn!(
                member_id,
                event_id,
                date,
                count = rows.len(),
                "several hours records for one day, using the first"
            );
        }
        Ok(rows.into_iter().next().map(|(id, row)| HoursRecord {
            record_id: id,
            member_id: text(hours::MEMBERSHIP_ID.get(&row)).unwrap_or_else(|| member_id.to_string()),
            event_id: int(hours::EVENT_ID.get(&row)).unwrap_or(event_id),
            date: text(hours::DATE.get(&row)).unwrap_or_else(|| date.to_string()),
            start_time: text(hours::START_TIME.get(&row)).unwrap_or_default(),
            end_time: text(hours::END_TIME.get(&row)),
        }))
    }

    async fn create_hours_record(&self, record: &NewHoursRecord) -> Result<HoursRecord> {
        let form = vec![
            (hours::EID.id.to_string(), record.eid.clone()),
            (hours::DATE.id.to_string(), record.date.clone()),
            (hours::EVENT_ID.id.to_string(), record.event_id.to_string()),
            (hours::MEMBERSHIP_ID.id.to_string(), record.member_id.clone()),
            (hours::START_TIME.id.to_string(), record.start_time.clone()),
        ];
        let body = self.send_form(&self.hours_route, &form).await?;
        let record_id = text(body.get("ragicId"))
            .ok_or_else(|| unexpected(&self.url(&self.hours_route), "missing ragicId"))?;
        Ok(record.clone().into_record(record_id))
    }

    async fn close_hours_record(
        &self,
        record: &HoursRecord,
        end_time: &str,
    ) -> Result<HoursRecord> {
        let route = format!("{}/{}", self.hours_route.trim_end_matches('/'), record.record_id);
        let form = vec![(hours::END_TIME.id.to_string(), end_time.to_string())];
        self.send_form(&route, &form).await?;
        Ok(HoursRecord {
            end_time: Some(end_time.to_string()),
            ..record.clone()
        })
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Turn a non-success status, or a body whose `status` is not SUCCESS, into
/// a `Remote` error.
async fn read_body(url: &str, response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        tracing::warn!(%url, status = status.as_u16(), "ragic request failed");
        return Err(TimeclockError::Remote {
            url: url.to_string(),
            status: status.as_u16(),
            message: snippet(&text),
        });
    }
    let body: Value = serde_json::from_str(&text)?;
    if let Some(flag) = body.get("status").and_then(Value::as_str) {
        if flag != "SUCCESS" {
            let message = body
                .get("msg")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(flag)
                .to_string();
            tracing::warn!(%url, %message, "ragic rejected request");
            return Err(TimeclockError::Remote {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }
    }
    Ok(body)
}

fn unexpected(url: &str, message: &str) -> TimeclockError {
    TimeclockError::Remote {
        url: url.to_string(),
        status: 200,
        message: message.to_string(),
    }
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(200) {
        Some((end, _)) => format!("{}...", &trimmed[..end]),
        None => trimmed.to_string(),
    }
}

/// Ragic sends most cells as strings but some as numbers; blank means absent.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn signup_from_row(id: &str, row: &Row) -> Option<Signup> {
    Some(Signup {
        record_id: id.to_string(),
        name: text(attendance::OPPORTUNITY.get(row))?,
        event_id: int(row.get(attendance::EVENT_ID))?,
        eid: text(attendance::EID.get(row))?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClockConfig;
    use crate::reconcile::{Outcome, Reconciler};
    use crate::time::{FixedClock, LocalTime};
    use chrono::{DateTime, Utc};
    use mockito::Matcher;
    use serde_json::json;
    use std::sync::Arc;

    fn client(server: &mockito::ServerGuard) -> RagicClient {
        let mut cfg = Config::default();
        cfg.ragic.base_url = server.url();
        cfg.ragic.api_key = Some("test-key".to_string());
        RagicClient::from_config(&cfg).unwrap()
    }

    fn open_record() -> HoursRecord {
        HoursRecord {
            record_id: "88".into(),
            member_id: "LYN123".into(),
            event_id: 42,
            date: "2026/10/18".into(),
            start_time: "09:00".into(),
            end_time: None,
        }
    }

    #[test]
    fn from_config_requires_api_key() {
        let err = RagicClient::from_config(&Config::default()).err().unwrap();
        assert!(matches!(err, TimeclockError::MissingApiKey));
    }

    #[tokio::test]
    async fn open_signups_filters_and_parses() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/lynvolunteer/lyn-temp/9")
            .match_header("authorization", "Basic test-key")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api".into(), "".into()),
                Matcher::UrlEncoded("where".into(), "1010008,eq,Open".into()),
                Matcher::UrlEncoded("where".into(), "1003777,eq,LYN123".into()),
            ]))
            .with_body(
                json!({
                    "12": { "Opportunity": "Food Bank", "Event ID": "42", "EID": "E-12" },
                    "3": { "Opportunity": "Park Cleanup", "Event ID": 7, "EID": "E-3" },
                    "5": { "Opportunity": "Broken Row" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let signups = client(&server).open_signups("LYN123").await.unwrap();
        mock.assert_async().await;
        assert_eq!(signups.len(), 2);
        assert_eq!(signups[0].name, "Park Cleanup");
        assert_eq!(signups[0].event_id, 7);
        assert_eq!(signups[1].eid, "E-12");
        assert_eq!(signups[1].event_id, 42);
    }

    #[tokio::test]
    async fn todays_record_takes_lowest_id_without_status_filter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/lynvolunteer/lyn-temp/55")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("where".into(), "1003908,eq,2026/10/18".into()),
                Matcher::UrlEncoded("where".into(), "1003914,eq,42".into()),
                Matcher::UrlEncoded("where".into(), "1003916,eq,LYN123".into()),
            ]))
            .with_body(
                json!({
                    "101": { "Start Time": "13:00", "End Time": "" },
                    "99": { "Start Time": "08:00", "End Time": "12:00", "Status": "Completed" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let record = client(&server)
            .todays_hours_record("LYN123", 42, "2026/10/18")
            .await
            .unwrap()
            .unwrap();
        mock.assert_async().await;
        assert_eq!(record.record_id, "99");
        assert_eq!(record.member_id, "LYN123");
        assert_eq!(record.end_time.as_deref(), Some("12:00"));
        assert!(!record.is_open());
    }

    #[tokio::test]
    async fn todays_record_none_when_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/lynvolunteer/lyn-temp/55")
            .match_query(Matcher::Any)
            .with_body("{}")
            .create_async()
            .await;

        let record = client(&server)
            .todays_hours_record("LYN123", 42, "2026/10/18")
            .await
            .unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn create_posts_form_by_field_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/lynvolunteer/lyn-temp/55")
            .match_query(Matcher::UrlEncoded("api".into(), "".into()))
            .match_header("authorization", "Basic test-key")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("1003813".into(), "E-12".into()),
                Matcher::UrlEncoded("1003908".into(), "2026/10/18".into()),
                Matcher::UrlEncoded("1003914".into(), "42".into()),
                Matcher::UrlEncoded("1003916".into(), "LYN123".into()),
                Matcher::UrlEncoded("1003910".into(), "09:00".into()),
            ]))
            .with_body(json!({ "status": "SUCCESS", "ragicId": 501, "data": {} }).to_string())
            .create_async()
            .await;

        let new = NewHoursRecord {
            eid: "E-12".into(),
            member_id: "LYN123".into(),
            event_id: 42,
            date: "2026/10/18".into(),
            start_time: "09:00".into(),
        };
        let record = client(&server).create_hours_record(&new).await.unwrap();
        mock.assert_async().await;
        assert_eq!(record.record_id, "501");
        assert!(record.is_open());
    }

    #[tokio::test]
    async fn close_posts_end_time_to_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/lynvolunteer/lyn-temp/55/88")
            .match_query(Matcher::UrlEncoded("api".into(), "".into()))
            .match_body(Matcher::UrlEncoded("1003911".into(), "10:15".into()))
            .with_body(json!({ "status": "SUCCESS", "ragicId": 88 }).to_string())
            .create_async()
            .await;

        let closed = client(&server)
            .close_hours_record(&open_record(), "10:15")
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(closed.start_time, "09:00");
        assert_eq!(closed.end_time.as_deref(), Some("10:15"));
    }

    #[tokio::test]
    async fn http_failure_is_remote_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/lynvolunteer/lyn-temp/9")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let err = client(&server).open_signups("LYN123").await.unwrap_err();
        match err {
            TimeclockError::Remote { status, message, .. } => {
                assert_eq!(status, 401);
                assert_eq!(message, "unauthorized");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_in_body_is_remote_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/lynvolunteer/lyn-temp/55/88")
            .match_query(Matcher::Any)
            .with_body(json!({ "status": "ERROR", "msg": "record locked" }).to_string())
            .create_async()
            .await;

        let err = client(&server)
            .close_hours_record(&open_record(), "10:15")
            .await
            .unwrap_err();
        assert!(matches!(err, TimeclockError::Remote { .. }));
        assert!(err.to_string().contains("record locked"));
    }

    #[tokio::test]
    async fn member_name_missing_row() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/lynvolunteer/lyn-temp/53")
            .match_query(Matcher::UrlEncoded("where".into(), "1003767,eq,LYN404".into()))
            .with_body("{}")
            .create_async()
            .await;

        let err = client(&server).member_name("LYN404").await.unwrap_err();
        assert!(matches!(err, TimeclockError::MemberNotFound(id) if id == "LYN404"));
    }

    #[tokio::test]
    async fn member_name_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/lynvolunteer/lyn-temp/53")
            .match_query(Matcher::Any)
            .with_body(json!({ "4": { "Full Name": "Ada Lovelace" } }).to_string())
            .create_async()
            .await;

        let name = client(&server).member_name("LYN123").await.unwrap();
        assert_eq!(name, "Ada Lovelace");
    }

    /// Kiosk clock at 10:00 local time on 2026/10/18.
    fn kiosk_time() -> LocalTime {
        let at = DateTime::parse_from_rfc3339("2026-10-18T17:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        LocalTime::new(&ClockConfig::default(), Arc::new(FixedClock::new(at))).unwrap()
    }

    #[tokio::test]
    async fn reconciler_clocks_in_over_ragic() {
        let mut server = mockito::Server::new_async().await;
        let lookup = server
            .mock("GET", "/lynvolunteer/lyn-temp/55")
            .match_query(Matcher::UrlEncoded("where".into(), "1003908,eq,2026/10/18".into()))
            .with_body("{}")
            .create_async()
            .await;
        let signups = server
            .mock("GET", "/lynvolunteer/lyn-temp/9")
            .match_query(Matcher::Any)
            .with_body(
                json!({ "12": { "Opportunity": "Food Bank", "Event ID": "42", "EID": "E-12" } })
                    .to_string(),
            )
            .create_async()
            .await;
        let create = server
            .mock("POST", "/lynvolunteer/lyn-temp/55")
            .match_query(Matcher::Any)
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("1003813".into(), "E-12".into()),
                Matcher::UrlEncoded("1003914".into(), "42".into()),
                Matcher::UrlEncoded("1003910".into(), "10:00".into()),
            ]))
            .with_body(json!({ "status": "SUCCESS", "ragicId": 501 }).to_string())
            .create_async()
            .await;

        let store = client(&server);
        let time = kiosk_time();
        let outcome = Reconciler::new(&store, &time, 10)
            .log_hours("LYN123", 42)
            .await
            .unwrap();

        lookup.assert_async().await;
        signups.assert_async().await;
        create.assert_async().await;
        match outcome {
            Outcome::ClockedIn { record } => {
                assert_eq!(record.record_id, "501");
                assert_eq!(record.start_time, "10:00");
            }
            other => panic!("expected ClockedIn, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reconciler_clocks_out_over_ragic() {
        let mut server = mockito::Server::new_async().await;
        let lookup = server
            .mock("GET", "/lynvolunteer/lyn-temp/55")
            .match_query(Matcher::Any)
            .with_body(json!({ "88": { "Start Time": "09:00", "End Time": "" } }).to_string())
            .create_async()
            .await;
        let close = server
            .mock("POST", "/lynvolunteer/lyn-temp/55/88")
            .match_query(Matcher::Any)
            .match_body(Matcher::UrlEncoded("1003911".into(), "10:00".into()))
            .with_body(json!({ "status": "SUCCESS", "ragicId": 88 }).to_string())
            .create_async()
            .await;
        let signups = server
            .mock("GET", "/lynvolunteer/lyn-temp/9")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let store = client(&server);
        let time = kiosk_time();
        let outcome = Reconciler::new(&store, &time, 10)
            .log_hours("LYN123", 42)
            .await
            .unwrap();

        lookup.assert_async().await;
        close.assert_async().await;
        signups.assert_async().await;
        assert_eq!(outcome.message(), "Clocked out successfully.");
        assert_eq!(outcome.record().unwrap().end_time.as_deref(), Some("10:00"));
    }

    #[test]
    fn text_and_int_accept_strings_and_numbers() {
        assert_eq!(text(Some(&json!(" x "))), Some("x".to_string()));
        assert_eq!(text(Some(&json!(""))), None);
        assert_eq!(text(Some(&json!(12))), Some("12".to_string()));
        assert_eq!(int(Some(&json!("42"))), Some(42));
        assert_eq!(int(Some(&json!(42))), Some(42));
        assert_eq!(int(Some(&json!("n/a"))), None);
    }
}
