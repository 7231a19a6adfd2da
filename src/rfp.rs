//! Contact form (RFP) submissions.
//!
//! The form posts JSON here; after validation the submission is stored in the
//! CMS `rfp-submissions` collection with `source` and `status` filled in.

use crate::{
    content::{ContentSource, RfpSubmission, non_empty},
    locale::Locale,
    log,
    serve::reply::Reply,
};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::LazyLock;

const SOURCE: &str = "website_contact_form";
const STATUS: &str = "new";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern compiles"));

/// Raw form fields as the browser sends them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RfpRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub budget_band: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

/// Why a form was rejected before reaching the CMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingFields,
    InvalidEmail,
}

impl Rejection {
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingFields => "Name, email, and message are required",
            Self::InvalidEmail => "Invalid email format",
        }
    }
}

impl RfpRequest {
    /// Validate and shape the form for the CMS.
    ///
    /// Empty optional fields become `null`; the locale defaults to `id`.
    pub fn into_submission(self) -> Result<RfpSubmission, Rejection> {
        let owned = |value: &Option<String>| non_empty(value.as_deref()).map(str::to_owned);

        let (Some(name), Some(email), Some(message)) =
            (owned(&self.name), owned(&self.email), owned(&self.message))
        else {
            return Err(Rejection::MissingFields);
        };
        if !EMAIL.is_match(&email) {
            return Err(Rejection::InvalidEmail);
        }

        Ok(RfpSubmission {
            name,
            email,
            company: owned(&self.company),
            goals: owned(&self.goals),
            scope: owned(&self.scope),
            budget_band: owned(&self.budget_band),
            timeline: owned(&self.timeline),
            message,
            locale: owned(&self.locale).unwrap_or_else(|| Locale::Id.code().to_owned()),
            source: SOURCE.to_owned(),
            status: STATUS.to_owned(),
        })
    }
}

/// Handle a `POST /next-api/rfp-submissions` body.
pub fn submit(source: &dyn ContentSource, body: &str) -> Reply {
    let request: RfpRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(err) => {
            log!("rfp"; "bad request body: {err}");
            return failure(&err.to_string());
        }
    };

    let submission = match request.into_submission() {
        Ok(submission) => submission,
        Err(rejection) => {
            return Reply::json(400, &json!({ "error": rejection.message() }));
        }
    };

    match source.submit_rfp(&submission) {
        Ok(result) => {
            log!("rfp"; "submission from {}", submission.email);
            let message = match Locale::from_code(&submission.locale) {
                Some(Locale::Id) => Locale::Id.strings().rfp_success,
                _ => Locale::En.strings().rfp_success,
            };
            Reply::json(
                200,
                &json!({
                    "success": true,
                    "message": message,
                    "data": result.get("data").cloned().unwrap_or(Value::Null),
                }),
            )
        }
        Err(err) => {
            log!("error"; "rfp submission failed: {err:#}");
            failure("Failed to submit RFP")
        }
    }
}

fn failure(message: &str) -> Reply {
    Reply::json(500, &json!({ "error": message, "success": false }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FixtureSource;

    fn request() -> RfpRequest {
        RfpRequest {
            name: Some("Sari".into()),
            email: Some("sari@example.co.id".into()),
            message: Some("Kami butuh bantuan strategi.".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_into_submission_defaults() {
        let submission = RfpRequest {
            company: Some(String::new()),
            budget_band: Some("100-250jt".into()),
            ..request()
        }
        .into_submission()
        .unwrap();

        assert_eq!(submission.company, None);
        assert_eq!(submission.budget_band.as_deref(), Some("100-250jt"));
        assert_eq!(submission.locale, "id");
        assert_eq!(submission.source, "website_contact_form");
        assert_eq!(submission.status, "new");
    }

    #[test]
    fn test_required_fields() {
        let missing = RfpRequest {
            message: Some(String::new()),
            ..request()
        };
        assert_eq!(missing.into_submission(), Err(Rejection::MissingFields));
        assert_eq!(
            RfpRequest::default().into_submission(),
            Err(Rejection::MissingFields)
        );
    }

    #[test]
    fn test_email_shape() {
        for bad in ["sari", "sari@example", "sari @example.com", "@example.com"] {
            let req = RfpRequest {
                email: Some(bad.into()),
                ..request()
            };
            assert_eq!(req.into_submission(), Err(Rejection::InvalidEmail), "{bad}");
        }
        let ok = RfpRequest {
            email: Some("a.b+c@sub.example.com".into()),
            ..request()
        };
        assert!(ok.into_submission().is_ok());
    }

    #[test]
    fn test_submit_stores_and_localizes() {
        let source = FixtureSource::new();
        let reply = submit(
            &source,
            r#"{"name":"Sari","email":"sari@example.co.id","message":"Halo","locale":"id"}"#,
        );
        assert_eq!(reply.status, 200);
        let body = reply.json_body();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], Locale::Id.strings().rfp_success);
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["data"]["source"], "website_contact_form");

        let reply = submit(
            &source,
            r#"{"name":"Ann","email":"ann@example.com","message":"Hi","locale":"en"}"#,
        );
        assert_eq!(reply.json_body()["message"], Locale::En.strings().rfp_success);
        assert_eq!(source.submissions().len(), 2);
    }

    #[test]
    fn test_submit_rejections() {
        let source = FixtureSource::new();
        let reply = submit(&source, r#"{"name":"Sari","email":"sari@example.co.id"}"#);
        assert_eq!(reply.status, 400);
        assert_eq!(reply.json_body()["error"], "Name, email, and message are required");

        let reply = submit(&source, r#"{"name":"Sari","email":"nope","message":"x"}"#);
        assert_eq!(reply.status, 400);
        assert_eq!(reply.json_body()["error"], "Invalid email format");

        let reply = submit(&source, "{");
        assert_eq!(reply.status, 500);
        assert_eq!(reply.json_body()["success"], false);
        assert!(source.submissions().is_empty());
    }
}
