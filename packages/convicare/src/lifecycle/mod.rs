use crate::error::{Error, ValidationError};
use crate::log::LIFECYCLE;
use crate::model::{
    treatment_plan, Attention, AttendedRecord, Cycle, HistoryRecord, Identity, IntakeRecord,
    NewPharmacyOrder, Obstetrics, Patient, Prescription, Selection, Service, Vitals,
};
use crate::prometheus::{
    HISTORIES_ATTENDED_TOTAL, HISTORIES_CREATED_TOTAL, HISTORIES_PROMOTED_TOTAL, INTAKES_TOTAL,
};
use crate::repository::Repository;
use chrono::NaiveDate;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info};

///
/// Submitted basic intake.
///
#[derive(Clone, Debug, Default)]
pub struct IntakeForm {
    pub visit_date: Option<NaiveDate>,
    pub patient: Patient,
    pub reason: Option<String>,
}

///
/// Submitted clinical history fields, shared by the full history, promote and attend forms.
///
/// `obstetrics.cycle` is ignored, the submitted cycle is `cycle` and each transition decides
/// how it is stored.
///
#[derive(Clone, Debug, Default)]
pub struct HistoryForm {
    pub visit_date: Option<NaiveDate>,
    pub patient: Patient,
    pub reason: Option<String>,
    pub background: Option<String>,
    pub vitals: Vitals,
    pub obstetrics: Obstetrics,
    pub cycle: Cycle,
    pub physical_exam: Option<String>,
    pub services: Selection<Service>,
    pub attention: Selection<Attention>,
}

#[derive(Clone, Debug, Default)]
pub struct AttendForm {
    pub history: HistoryForm,
    pub diagnosis: Option<String>,
    pub prescriptions: Vec<Prescription>,
}

impl HistoryForm {
    fn into_record(
        self,
        cycle: Option<Cycle>,
        intake_signer: Option<String>,
        physician_signer: Option<String>,
    ) -> Result<HistoryRecord, ValidationError> {
        let visit_date = self.visit_date.ok_or(ValidationError::MissingVisitDate)?;

        Ok(HistoryRecord {
            visit_date,
            patient: self.patient,
            reason: self.reason,
            background: self.background,
            vitals: self.vitals,
            obstetrics: Obstetrics {
                cycle,
                ..self.obstetrics
            },
            physical_exam: self.physical_exam,
            services: self.services,
            attention: self.attention,
            intake_signer,
            physician_signer,
        })
    }
}

///
/// Moves a visit through its stages:
/// basic intake, pending clinical history, attended history with a pharmacy order.
///
#[derive(Clone)]
pub struct VisitLifecycle {
    repository: Arc<dyn Repository>,
}

impl VisitLifecycle {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        VisitLifecycle { repository }
    }

    pub async fn create_basic_intake(&self, form: IntakeForm) -> Result<i64, Error> {
        let visit_date = form.visit_date.ok_or(ValidationError::MissingVisitDate)?;

        let intake = IntakeRecord {
            visit_date,
            patient: form.patient,
            reason: form.reason,
        };

        let id = self.repository.insert_basic(&intake).await?;
        counter!(INTAKES_TOTAL).increment(1);

        info!(target: LIFECYCLE, msg = "Basic intake recorded", id);
        Ok(id)
    }

    ///
    /// Records a pending history signed by `identity`.
    /// A medico signs as physician, anyone else as intake.
    ///
    pub async fn create_full_history(
        &self,
        form: HistoryForm,
        identity: &Identity,
    ) -> Result<i64, Error> {
        let (intake_signer, physician_signer) = identity.signatures();
        let cycle = Some(form.cycle.clone());
        let history = form.into_record(cycle, intake_signer, physician_signer)?;

        let id = self.repository.insert_history(&history).await?;
        counter!(HISTORIES_CREATED_TOTAL).increment(1);

        info!(target: LIFECYCLE, msg = "Clinical history recorded", id, user = identity.id);
        Ok(id)
    }

    ///
    /// Replaces basic intake `basic_id` with a pending history built from the form.
    ///
    /// The cycle is kept only when both parts were submitted. Only the intake signature is set.
    ///
    pub async fn promote(
        &self,
        basic_id: i64,
        form: HistoryForm,
        identity: &Identity,
    ) -> Result<i64, Error> {
        let intake_signer = if identity.role.is_medico() {
            None
        } else {
            Some(identity.name.clone())
        };
        let cycle = Some(form.cycle.clone()).filter(Cycle::is_complete);
        let history = form.into_record(cycle, intake_signer, None)?;

        let id = self.repository.promote_basic(basic_id, &history).await?;
        counter!(HISTORIES_PROMOTED_TOTAL).increment(1);

        info!(target: LIFECYCLE, msg = "Basic intake promoted", basic_id, id, user = identity.id);
        Ok(id)
    }

    ///
    /// Closes pending history `pending_id` and records the pharmacy order.
    ///
    /// The intake signature is carried over from the pending history. The physician signature is
    /// set when a medico attends.
    ///
    pub async fn attend(
        &self,
        pending_id: i64,
        form: AttendForm,
        identity: &Identity,
    ) -> Result<i64, Error> {
        if form.history.visit_date.is_none() {
            return Err(ValidationError::MissingVisitDate.into());
        }

        let pending = self
            .repository
            .find_history(pending_id)
            .await?
            .ok_or(Error::NotFound {
                entity: "Clinical history",
                id: pending_id,
            })?;

        let physician_signer = if identity.role.is_medico() {
            Some(identity.name.clone())
        } else {
            None
        };

        let plan = treatment_plan(&form.prescriptions);
        debug!(target: LIFECYCLE, msg = "Treatment plan", pending_id, plan = ?plan);

        let cycle = Some(form.history.cycle.clone());
        let history = form.history.into_record(
            cycle,
            pending.record.intake_signer,
            physician_signer,
        )?;

        let attended = AttendedRecord {
            history,
            diagnosis: form.diagnosis,
            treatment_plan: plan,
        };
        let order = NewPharmacyOrder::from(&attended);

        let id = self
            .repository
            .attend_history(pending_id, &attended, &order)
            .await?;
        counter!(HISTORIES_ATTENDED_TOTAL).increment(1);

        info!(target: LIFECYCLE, msg = "Clinical history attended", pending_id, id, user = identity.id);
        Ok(id)
    }
}
