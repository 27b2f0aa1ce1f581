mod cycle;
mod prescription;
mod record;
mod selection;
mod user;

pub use cycle::Cycle;
pub use prescription::{treatment_plan, Prescription};
pub use record::{
    AttendedHistory, AttendedRecord, BasicConsultation, ClinicalHistory, HistoryRecord,
    IntakeRecord, NewPharmacyOrder, Obstetrics, Patient, PharmacyOrder, Vitals,
};
pub use selection::{Attention, Choice, Selection, Service};
pub use user::{Identity, NewUser, Role, User, UserUpdate};
