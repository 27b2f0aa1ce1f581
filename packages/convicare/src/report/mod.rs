mod dates;

use crate::error::Error;
use crate::log::REPORT;
use crate::model::{AttendedHistory, BasicConsultation, ClinicalHistory, PharmacyOrder, Service, User};
use crate::repository::Repository;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::debug;

pub use dates::{long_date, long_date_with_weekday};

///
/// One history in a list or report.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryRow {
    pub id: i64,
    pub visit_date: NaiveDate,
    /// Long Spanish form of `visit_date`
    pub date: String,
    pub name: String,
    pub identification: String,
    pub services: String,
    pub attention: String,
}

impl HistoryRow {
    fn pending(history: &ClinicalHistory) -> Self {
        let record = &history.record;
        HistoryRow {
            id: history.id,
            visit_date: record.visit_date,
            date: long_date(record.visit_date),
            name: record.patient.name.clone(),
            identification: record.patient.identification.clone(),
            services: record.services.to_stored(),
            attention: record.attention.to_stored(),
        }
    }

    fn attended(attended: &AttendedHistory) -> Self {
        let record = &attended.record.history;
        HistoryRow {
            id: attended.id,
            visit_date: record.visit_date,
            date: long_date(record.visit_date),
            name: record.patient.name.clone(),
            identification: record.patient.identification.clone(),
            services: record.services.to_stored(),
            attention: record.attention.to_stored(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IntakeRow {
    pub id: i64,
    /// Long Spanish form with weekday
    pub date: String,
    pub name: String,
    pub identification: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneralReport {
    pub pending: Vec<HistoryRow>,
    pub attended: Vec<HistoryRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServiceReport {
    /// Display label of the requested service
    pub service: String,
    pub pending: Vec<HistoryRow>,
    pub attended: Vec<HistoryRow>,
}

///
/// Pending and attended histories, as shown to medical staff.
///
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryLists {
    pub pending: Vec<HistoryRow>,
    pub attended: Vec<HistoryRow>,
}

///
/// Read-only aggregation for lists and admin reports.
///
#[derive(Clone)]
pub struct ReportBuilder {
    repository: Arc<dyn Repository>,
}

/// Priority tier first, then newest visit first
fn sort_by_priority(histories: &mut [ClinicalHistory]) {
    histories.sort_by_key(|h| (h.record.attention.tier(), Reverse(h.record.visit_date)));
}

fn sort_newest_first(histories: &mut [AttendedHistory]) {
    histories.sort_by_key(|h| Reverse(h.record.history.visit_date));
}

impl ReportBuilder {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        ReportBuilder { repository }
    }

    ///
    /// Every history with at least one service.
    ///
    pub async fn general_report(&self) -> Result<GeneralReport, Error> {
        let pending = self
            .repository
            .list_histories()
            .await?
            .iter()
            .filter(|h| !h.record.services.is_empty())
            .map(HistoryRow::pending)
            .collect::<Vec<_>>();

        let attended = self
            .repository
            .list_attended()
            .await?
            .iter()
            .filter(|h| !h.record.history.services.is_empty())
            .map(HistoryRow::attended)
            .collect::<Vec<_>>();

        debug!(target: REPORT, msg = "General report", pending = pending.len(), attended = attended.len());
        Ok(GeneralReport { pending, attended })
    }

    ///
    /// Histories whose services match `key`.
    ///
    /// A known report key such as `higiene_oral` matches its label, any other key is matched as
    /// a case-insensitive substring of the stored services string.
    ///
    pub async fn service_report(&self, key: &str) -> Result<ServiceReport, Error> {
        let service = Service::label_for_key(key);

        let mut pending = self
            .repository
            .list_histories()
            .await?
            .into_iter()
            .filter(|h| h.record.services.matches(&service))
            .collect::<Vec<_>>();
        sort_by_priority(&mut pending);

        let mut attended = self
            .repository
            .list_attended()
            .await?
            .into_iter()
            .filter(|h| h.record.history.services.matches(&service))
            .collect::<Vec<_>>();
        sort_newest_first(&mut attended);

        debug!(target: REPORT, msg = "Service report", key, pending = pending.len(), attended = attended.len());

        Ok(ServiceReport {
            service,
            pending: pending.iter().map(HistoryRow::pending).collect(),
            attended: attended.iter().map(HistoryRow::attended).collect(),
        })
    }

    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repository.list_users().await
    }

    /// Newest visit first
    pub async fn list_basic_intakes(&self) -> Result<Vec<IntakeRow>, Error> {
        let mut intakes = self.repository.list_basic().await?;
        intakes.sort_by_key(|b| Reverse(b.record.visit_date));

        Ok(intakes
            .iter()
            .map(|BasicConsultation { id, record }| IntakeRow {
                id: *id,
                date: long_date_with_weekday(record.visit_date),
                name: record.patient.name.clone(),
                identification: record.patient.identification.clone(),
            })
            .collect())
    }

    pub async fn list_pending_histories(&self) -> Result<Vec<HistoryRow>, Error> {
        let mut pending = self.repository.list_histories().await?;
        sort_by_priority(&mut pending);
        Ok(pending.iter().map(HistoryRow::pending).collect())
    }

    pub async fn list_attended_histories(&self) -> Result<Vec<HistoryRow>, Error> {
        let mut attended = self.repository.list_attended().await?;
        sort_newest_first(&mut attended);
        Ok(attended.iter().map(HistoryRow::attended).collect())
    }

    /// Both lists of the medical staff page
    pub async fn history_lists(&self) -> Result<HistoryLists, Error> {
        Ok(HistoryLists {
            pending: self.list_pending_histories().await?,
            attended: self.list_attended_histories().await?,
        })
    }

    /// Newest order first
    pub async fn list_pharmacy_orders(&self) -> Result<Vec<PharmacyOrder>, Error> {
        let mut orders = self.repository.list_pharmacy_orders().await?;
        orders.sort_by_key(|o| Reverse((o.created_at, o.id)));
        Ok(orders)
    }
}
