use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::expiration::{evaluate, Expiration, StatusReport};

/// A document as returned by `GET /documents`.
///
/// This is a transient copy of server state. It carries no status; see
/// [`DocumentRow`] for the derived view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    pub document_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub expiration_date: Expiration,
}

/// Body returned by `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub document_name: String,
    #[serde(default)]
    pub expiration_date: Expiration,
}

impl UploadResponse {
    /// The uploaded document, recording the local file name it came from.
    pub fn into_document(self, original_filename: impl Into<String>) -> Document {
        Document {
            id: self.id,
            document_name: self.document_name,
            original_filename: Some(original_filename.into()),
            expiration_date: self.expiration_date,
        }
    }
}

/// Body for `POST /update_expiration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, message = "Document ID is required"))]
    pub document_id: String,
    pub expiration_date: Expiration,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Document name must be between 1 and 255 characters"
    ))]
    pub document_name: String,
}

/// One line of the document list with its status evaluated at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRow {
    pub id: String,
    pub document_name: String,
    pub original_filename: Option<String>,
    pub expiration_date: Expiration,
    #[serde(flatten)]
    pub report: StatusReport,
}

impl DocumentRow {
    pub fn evaluate<Tz: TimeZone>(document: &Document, now: &DateTime<Tz>) -> Self {
        DocumentRow {
            id: document.id.clone(),
            document_name: document.document_name.clone(),
            original_filename: document.original_filename.clone(),
            expiration_date: document.expiration_date.clone(),
            report: evaluate(&document.expiration_date, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiration::ExpirationStatus;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_document_from_service_json() {
        let docs: Vec<Document> = serde_json::from_str(
            r#"[
                {"_id": "a1", "document_name": "Passport", "original_filename": "passport.pdf", "expiration_date": "01-02-2030"},
                {"_id": "b2", "document_name": "Diploma", "original_filename": "diploma.pdf", "expiration_date": "NOT PRESENT"},
                {"_id": "c3", "document_name": "Lease"}
            ]"#,
        )
        .unwrap();

        assert_eq!(docs.len(), 3);
        assert_eq!(
            docs[0].expiration_date,
            Expiration::On(NaiveDate::from_ymd_opt(2030, 2, 1).unwrap())
        );
        assert_eq!(docs[1].expiration_date, Expiration::NotPresent);
        assert_eq!(docs[2].expiration_date, Expiration::NotPresent);
        assert_eq!(docs[2].original_filename, None);
    }

    #[test]
    fn test_upload_response_into_document() {
        let resp: UploadResponse = serde_json::from_str(
            r#"{"_id": "x9", "document_name": "Insurance", "expiration_date": "15-08-2026"}"#,
        )
        .unwrap();
        let doc = resp.into_document("insurance.pdf");
        assert_eq!(doc.id, "x9");
        assert_eq!(doc.original_filename.as_deref(), Some("insurance.pdf"));
    }

    #[test]
    fn test_update_request_wire_shape() {
        let req = UpdateDocumentRequest {
            document_id: "a1".to_string(),
            expiration_date: Expiration::from_iso("2027-04-09").unwrap(),
            document_name: "Passport".to_string(),
        };
        assert!(req.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({
                "document_id": "a1",
                "expiration_date": "09-04-2027",
                "document_name": "Passport"
            })
        );
    }

    #[test]
    fn test_update_request_requires_name() {
        let req = UpdateDocumentRequest {
            document_id: "a1".to_string(),
            expiration_date: Expiration::NotPresent,
            document_name: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_row_serializes_status_fields() {
        let doc = Document {
            id: "a1".to_string(),
            document_name: "Visa".to_string(),
            original_filename: None,
            expiration_date: Expiration::parse("10-01-2025"),
        };
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let row = DocumentRow::evaluate(&doc, &now);
        assert_eq!(row.report.status, ExpirationStatus::ExpiringSoon);

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["status"], "Expiring Soon");
        assert_eq!(json["day_count"]["days"], 9);
        assert_eq!(json["day_count"]["direction"], "until");
        assert_eq!(json["expiration_date"], "10-01-2025");
    }
}
