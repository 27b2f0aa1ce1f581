mod memory;
mod postgres;

use crate::error::Error;
use crate::model::{
    AttendedHistory, AttendedRecord, BasicConsultation, ClinicalHistory, HistoryRecord,
    IntakeRecord, NewPharmacyOrder, NewUser, PharmacyOrder, User, UserUpdate,
};

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// Database schema, applied by the `migrate` command
pub const SCHEMA: &str = include_str!("./sql/schema.sql");

///
/// Storage for every record category.
///
/// Lookups return `Ok(None)` for missing rows. The two stage transitions, `promote_basic` and
/// `attend_history`, are a single unit of work: either every statement applies or none does.
///
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<Option<User>, Error>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Error>;

    async fn list_users(&self) -> Result<Vec<User>, Error>;

    async fn insert_user(&self, user: &NewUser) -> Result<i64, Error>;

    /// Returns false when no user has the id
    async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<bool, Error>;

    /// Returns false when no user has the id
    async fn delete_user(&self, id: i64) -> Result<bool, Error>;

    async fn insert_basic(&self, intake: &IntakeRecord) -> Result<i64, Error>;

    async fn find_basic(&self, id: i64) -> Result<Option<BasicConsultation>, Error>;

    async fn list_basic(&self) -> Result<Vec<BasicConsultation>, Error>;

    async fn insert_history(&self, history: &HistoryRecord) -> Result<i64, Error>;

    async fn find_history(&self, id: i64) -> Result<Option<ClinicalHistory>, Error>;

    async fn list_histories(&self) -> Result<Vec<ClinicalHistory>, Error>;

    ///
    /// Moves basic consultation `basic_id` into the pending histories as `history`.
    /// Returns the new history id, `Error::NotFound` if the consultation does not exist.
    ///
    async fn promote_basic(&self, basic_id: i64, history: &HistoryRecord) -> Result<i64, Error>;

    ///
    /// Moves pending history `pending_id` into the attended histories and records the pharmacy
    /// order. Returns the attended history id, `Error::NotFound` if the pending history does not
    /// exist.
    ///
    async fn attend_history(
        &self,
        pending_id: i64,
        attended: &AttendedRecord,
        order: &NewPharmacyOrder,
    ) -> Result<i64, Error>;

    async fn find_attended(&self, id: i64) -> Result<Option<AttendedHistory>, Error>;

    async fn list_attended(&self) -> Result<Vec<AttendedHistory>, Error>;

    async fn find_pharmacy_order(&self, id: i64) -> Result<Option<PharmacyOrder>, Error>;

    async fn list_pharmacy_orders(&self) -> Result<Vec<PharmacyOrder>, Error>;
}
