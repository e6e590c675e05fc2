//! Moderation reports

use serde_json::{Map, Value};

use super::{require_text, ContentService};
use crate::codec::decode_report;
use crate::errors::{DataError, DataResult};
use crate::identity::EntityRef;
use crate::model::{collections, NewReport, Report, ReportStatus};
use crate::observability::{log_event, Event};
use crate::store::server_timestamp;

impl ContentService {
    /// File a report against a resolvable article
    pub async fn create_report(&self, input: NewReport) -> DataResult<Report> {
        self.gate.ready().await;
        require_text("reporterId", &input.reporter_id, None)?;
        require_text(
            "reason",
            &input.reason,
            Some(self.limits.max_report_reason_length),
        )?;
        let article = self
            .require_article(&EntityRef::parse(&input.article_ref))
            .await?;

        let mut record = Map::new();
        record.insert("articleId".to_string(), Value::from(article.key.as_str()));
        record.insert("reporterId".to_string(), Value::from(input.reporter_id.as_str()));
        record.insert("reason".to_string(), Value::from(input.reason.trim()));
        record.insert(
            "status".to_string(),
            Value::from(ReportStatus::Pending.as_str()),
        );
        record.insert("createdAt".to_string(), server_timestamp());

        let key = self
            .store
            .insert(collections::REPORTS, Value::Object(record))
            .await?;
        let report = self
            .reread(collections::REPORTS, &key, decode_report)
            .await?;

        log_event(
            Event::ReportCreated,
            &[("article", article.key.as_str()), ("id", key.as_str())],
        );
        Ok(report)
    }

    /// Reports newest first, optionally only those in `status`.
    /// Never fails; a failed read is empty.
    pub async fn list_reports(&self, status: Option<ReportStatus>) -> Vec<Report> {
        self.gate.ready().await;
        let documents = match self.store.scan(collections::REPORTS).await {
            Ok(documents) => documents,
            Err(e) => {
                self.metrics.increment_feed_failures();
                let reason = e.to_string();
                log_event(
                    Event::FeedReadFailed,
                    &[("collection", collections::REPORTS), ("error", reason.as_str())],
                );
                return Vec::new();
            }
        };

        let mut reports: Vec<Report> = documents
            .iter()
            .filter_map(|doc| match decode_report(doc) {
                Ok(report) => Some(report),
                Err(e) => {
                    let reason = e.to_string();
                    log_event(Event::RecordSkipped, &[("error", reason.as_str())]);
                    None
                }
            })
            .filter(|report| status.map_or(true, |wanted| report.status == wanted))
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports
    }

    /// Move a report to `status`
    pub async fn update_report_status(&self, id: &str, status: ReportStatus) -> DataResult<Report> {
        self.gate.ready().await;
        let mut fields = Map::new();
        fields.insert("status".to_string(), Value::from(status.as_str()));

        let written = self
            .store
            .update(collections::REPORTS, id, Value::Object(fields))
            .await?;
        if !written {
            return Err(DataError::not_found(format!("report {}", id)));
        }

        let report = self.reread(collections::REPORTS, id, decode_report).await?;
        log_event(
            Event::ReportUpdated,
            &[("id", id), ("status", status.as_str())],
        );
        Ok(report)
    }

    /// Dismiss a report. Deleting an absent report succeeds.
    pub async fn delete_report(&self, id: &str) -> DataResult<()> {
        self.gate.ready().await;
        let existed = self.store.delete(collections::REPORTS, id).await?;
        let existed = existed.to_string();
        log_event(
            Event::ReportDeleted,
            &[("existed", existed.as_str()), ("id", id)],
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::errors::DataError;
    use crate::gate::ServiceAuth;
    use crate::model::{NewArticle, NewReport, ReportStatus};
    use crate::service::ContentService;
    use crate::store::{DocumentStore, MemoryStore};

    fn report(article: &str, reason: &str) -> NewReport {
        NewReport {
            article_ref: article.to_string(),
            reporter_id: "u2".to_string(),
            reason: reason.to_string(),
        }
    }

    async fn fixture() -> ContentService {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let service = ContentService::new(store, Arc::new(ServiceAuth::new("svc")));
        service.create_article(NewArticle::titled("A"), "u1").await.unwrap();
        service
    }

    #[tokio::test]
    async fn test_report_lifecycle() {
        let service = fixture().await;
        let first = service.create_report(report("1", "spam")).await.unwrap();
        let second = service.create_report(report("1", "abuse")).await.unwrap();
        assert_eq!(first.status, ReportStatus::Pending);

        let listed = service.list_reports(None).await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);

        let updated = service
            .update_report_status(&first.id, ReportStatus::Resolved)
            .await
            .unwrap();
        assert_eq!(updated.status, ReportStatus::Resolved);
        assert_eq!(updated.reason, "spam");

        let pending = service.list_reports(Some(ReportStatus::Pending)).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, second.id);

        service.delete_report(&second.id).await.unwrap();
        service.delete_report(&second.id).await.unwrap();
        assert_eq!(service.list_reports(None).await.len(), 1);
    }

    #[tokio::test]
    async fn test_report_validation() {
        let service = fixture().await;
        let too_long = "x".repeat(1001);

        assert!(matches!(
            service.create_report(report("1", "")).await,
            Err(DataError::Validation(_))
        ));
        assert!(matches!(
            service.create_report(report("1", &too_long)).await,
            Err(DataError::Validation(_))
        ));
        assert!(matches!(
            service.create_report(report("404", "spam")).await,
            Err(DataError::NotFound(_))
        ));
        assert!(matches!(
            service
                .update_report_status("missing", ReportStatus::Investigating)
                .await,
            Err(DataError::NotFound(_))
        ));
    }
}
