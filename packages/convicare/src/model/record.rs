use super::{Attention, Cycle, Selection, Service};
use chrono::{NaiveDate, NaiveDateTime};

///
/// Identification and contact block shared by every visit record.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Patient {
    pub identification_type: Option<String>,
    pub name: String,
    pub identification: String,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<i32>,
    pub sex: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub bathroom: Option<String>,
    pub guardian: Option<String>,
    pub kinship: Option<String>,
    pub guardian_phone: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vitals {
    pub heart_rate: Option<String>,
    pub respiratory_rate: Option<String>,
    pub blood_pressure: Option<String>,
    pub temperature: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
}

/// Gynecological and obstetric history
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Obstetrics {
    pub last_period: Option<NaiveDate>,
    pub pregnancies: Option<i32>,
    pub abortions: Option<i32>,
    pub births: Option<i32>,
    pub living_children: Option<i32>,
    pub cesareans: Option<i32>,
    pub cycle: Option<Cycle>,
}

/// Simplified intake, `consultas_basicas`
#[derive(Clone, Debug, PartialEq)]
pub struct IntakeRecord {
    pub visit_date: NaiveDate,
    pub patient: Patient,
    pub reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BasicConsultation {
    pub id: i64,
    pub record: IntakeRecord,
}

/// Full clinical history, `historias_clinicas`
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRecord {
    pub visit_date: NaiveDate,
    pub patient: Patient,
    pub reason: Option<String>,
    pub background: Option<String>,
    pub vitals: Vitals,
    pub obstetrics: Obstetrics,
    pub physical_exam: Option<String>,
    pub services: Selection<Service>,
    pub attention: Selection<Attention>,
    pub intake_signer: Option<String>,
    pub physician_signer: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClinicalHistory {
    pub id: i64,
    pub record: HistoryRecord,
}

/// Closed clinical history, `historias_clinicas_atendidas`
#[derive(Clone, Debug, PartialEq)]
pub struct AttendedRecord {
    pub history: HistoryRecord,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttendedHistory {
    pub id: i64,
    pub record: AttendedRecord,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewPharmacyOrder {
    pub patient_name: String,
    pub identification: String,
    pub treatment_plan: Option<String>,
    pub diagnosis: Option<String>,
    pub physician_signer: Option<String>,
}

impl From<&AttendedRecord> for NewPharmacyOrder {
    fn from(attended: &AttendedRecord) -> Self {
        NewPharmacyOrder {
            patient_name: attended.history.patient.name.clone(),
            identification: attended.history.patient.identification.clone(),
            treatment_plan: attended.treatment_plan.clone(),
            diagnosis: attended.diagnosis.clone(),
            physician_signer: attended.history.physician_signer.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PharmacyOrder {
    pub id: i64,
    pub order: NewPharmacyOrder,
    pub created_at: NaiveDateTime,
}
