use super::Repository;
use crate::error::{AuthError, Error};
use crate::model::{
    AttendedHistory, AttendedRecord, BasicConsultation, ClinicalHistory, HistoryRecord,
    IntakeRecord, NewPharmacyOrder, NewUser, PharmacyOrder, User, UserUpdate,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

///
/// In-process `Repository`.
///
/// Used when running without a database, in tests and for local demos.
/// Every operation holds a single lock, so the stage transitions are atomic.
///
#[derive(Clone, Default)]
pub struct MemoryRepository {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    users: Table<User>,
    basic: Table<BasicConsultation>,
    pending: Table<ClinicalHistory>,
    attended: Table<AttendedHistory>,
    pharmacy: Table<PharmacyOrder>,
}

struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        MemoryRepository::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl State {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .rows
            .values()
            .any(|user| user.email == email && Some(user.id) != except)
    }
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    async fn find_user(&self, id: i64) -> Result<Option<User>, Error> {
        Ok(self.lock().users.get(id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        Ok(self
            .lock()
            .users
            .rows
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        Ok(self.lock().users.all())
    }

    async fn insert_user(&self, user: &NewUser) -> Result<i64, Error> {
        let mut state = self.lock();

        if state.email_taken(&user.email, None) {
            return Err(AuthError::DuplicateEmail {
                email: user.email.clone(),
            }
            .into());
        }

        let id = state.users.next_id();
        state.users.rows.insert(
            id,
            User {
                id,
                name: user.name.clone(),
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
                role: user.role.clone(),
            },
        );
        Ok(id)
    }

    async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<bool, Error> {
        let mut state = self.lock();

        if !state.users.rows.contains_key(&id) {
            return Ok(false);
        }

        if state.email_taken(&update.email, Some(id)) {
            return Err(AuthError::DuplicateEmail {
                email: update.email.clone(),
            }
            .into());
        }

        match state.users.rows.get_mut(&id) {
            Some(user) => {
                user.name = update.name.clone();
                user.email = update.email.clone();
                user.role = update.role.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: i64) -> Result<bool, Error> {
        Ok(self.lock().users.rows.remove(&id).is_some())
    }

    async fn insert_basic(&self, intake: &IntakeRecord) -> Result<i64, Error> {
        let mut state = self.lock();
        let id = state.basic.next_id();
        state.basic.rows.insert(
            id,
            BasicConsultation {
                id,
                record: intake.clone(),
            },
        );
        Ok(id)
    }

    async fn find_basic(&self, id: i64) -> Result<Option<BasicConsultation>, Error> {
        Ok(self.lock().basic.get(id))
    }

    async fn list_basic(&self) -> Result<Vec<BasicConsultation>, Error> {
        Ok(self.lock().basic.all())
    }

    async fn insert_history(&self, history: &HistoryRecord) -> Result<i64, Error> {
        let mut state = self.lock();
        let id = state.pending.next_id();
        state.pending.rows.insert(
            id,
            ClinicalHistory {
                id,
                record: history.clone(),
            },
        );
        Ok(id)
    }

    async fn find_history(&self, id: i64) -> Result<Option<ClinicalHistory>, Error> {
        Ok(self.lock().pending.get(id))
    }

    async fn list_histories(&self) -> Result<Vec<ClinicalHistory>, Error> {
        Ok(self.lock().pending.all())
    }

    async fn promote_basic(&self, basic_id: i64, history: &HistoryRecord) -> Result<i64, Error> {
        let mut state = self.lock();

        if state.basic.rows.remove(&basic_id).is_none() {
            return Err(Error::NotFound {
                entity: "Basic consultation",
                id: basic_id,
            });
        }

        let id = state.pending.next_id();
        state.pending.rows.insert(
            id,
            ClinicalHistory {
                id,
                record: history.clone(),
            },
        );
        Ok(id)
    }

    async fn attend_history(
        &self,
        pending_id: i64,
        attended: &AttendedRecord,
        order: &NewPharmacyOrder,
    ) -> Result<i64, Error> {
        let mut state = self.lock();

        if state.pending.rows.remove(&pending_id).is_none() {
            return Err(Error::NotFound {
                entity: "Clinical history",
                id: pending_id,
            });
        }

        let id = state.attended.next_id();
        state.attended.rows.insert(
            id,
            AttendedHistory {
                id,
                record: attended.clone(),
            },
        );

        let order_id = state.pharmacy.next_id();
        state.pharmacy.rows.insert(
            order_id,
            PharmacyOrder {
                id: order_id,
                order: order.clone(),
                created_at: chrono::Local::now().naive_local(),
            },
        );
        Ok(id)
    }

    async fn find_attended(&self, id: i64) -> Result<Option<AttendedHistory>, Error> {
        Ok(self.lock().attended.get(id))
    }

    async fn list_attended(&self) -> Result<Vec<AttendedHistory>, Error> {
        Ok(self.lock().attended.all())
    }

    async fn find_pharmacy_order(&self, id: i64) -> Result<Option<PharmacyOrder>, Error> {
        Ok(self.lock().pharmacy.get(id))
    }

    async fn list_pharmacy_orders(&self) -> Result<Vec<PharmacyOrder>, Error> {
        Ok(self.lock().pharmacy.all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Patient, Role};
    use chrono::NaiveDate;

    fn intake(name: &str) -> IntakeRecord {
        IntakeRecord {
            visit_date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
            patient: Patient {
                name: name.to_string(),
                identification: "1001".to_string(),
                ..Default::default()
            },
            reason: Some("Dolor de cabeza".to_string()),
        }
    }

    fn history(name: &str) -> HistoryRecord {
        let intake = intake(name);
        HistoryRecord {
            visit_date: intake.visit_date,
            patient: intake.patient,
            reason: intake.reason,
            background: None,
            vitals: Default::default(),
            obstetrics: Default::default(),
            physical_exam: None,
            services: Default::default(),
            attention: Default::default(),
            intake_signer: Some("Ana".to_string()),
            physician_signer: None,
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ana".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repository = MemoryRepository::new();
        repository.insert_user(&new_user("ana@x.co")).await.unwrap();

        let err = repository
            .insert_user(&new_user("ana@x.co"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Auth(AuthError::DuplicateEmail { .. })
        ));
        assert_eq!(repository.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_users() {
        let repository = MemoryRepository::new();
        let id = repository.insert_user(&new_user("ana@x.co")).await.unwrap();

        let update = UserUpdate {
            name: "Ana María".to_string(),
            email: "ana@x.co".to_string(),
            role: Role::Medico,
        };
        assert!(repository.update_user(id, &update).await.unwrap());
        assert!(!repository.update_user(99, &update).await.unwrap());

        let user = repository.find_user(id).await.unwrap().unwrap();
        assert_eq!(user.role, Role::Medico);

        assert!(repository.delete_user(id).await.unwrap());
        assert!(!repository.delete_user(id).await.unwrap());
    }

    #[tokio::test]
    async fn missing_user_is_reported_before_email_conflict() {
        let repository = MemoryRepository::new();
        repository.insert_user(&new_user("ana@x.co")).await.unwrap();
        let eva = repository.insert_user(&new_user("eva@x.co")).await.unwrap();

        let update = UserUpdate {
            name: "Otra".to_string(),
            email: "ana@x.co".to_string(),
            role: Role::Medico,
        };
        assert!(!repository.update_user(99, &update).await.unwrap());
        assert!(matches!(
            repository.update_user(eva, &update).await,
            Err(Error::Auth(AuthError::DuplicateEmail { .. }))
        ));
    }

    #[tokio::test]
    async fn promote_moves_basic_into_pending() {
        let repository = MemoryRepository::new();
        let basic_id = repository.insert_basic(&intake("Luis")).await.unwrap();

        let id = repository
            .promote_basic(basic_id, &history("Luis"))
            .await
            .unwrap();

        assert!(repository.find_basic(basic_id).await.unwrap().is_none());
        assert!(repository.find_history(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn promote_of_missing_basic_changes_nothing() {
        let repository = MemoryRepository::new();

        let err = repository
            .promote_basic(7, &history("Luis"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound { id: 7, .. }));
        assert!(repository.list_histories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn attend_moves_pending_and_records_order() {
        let repository = MemoryRepository::new();
        let pending_id = repository.insert_history(&history("Luis")).await.unwrap();

        let attended = AttendedRecord {
            history: history("Luis"),
            diagnosis: Some("Migraña".to_string()),
            treatment_plan: Some("A cada 8 horas por 5 días.".to_string()),
        };
        let order = NewPharmacyOrder::from(&attended);

        repository
            .attend_history(pending_id, &attended, &order)
            .await
            .unwrap();

        assert!(repository.list_histories().await.unwrap().is_empty());
        assert_eq!(repository.list_attended().await.unwrap().len(), 1);

        let orders = repository.list_pharmacy_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order.patient_name, "Luis");

        let err = repository
            .attend_history(pending_id, &attended, &order)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(repository.list_pharmacy_orders().await.unwrap().len(), 1);
    }
}
