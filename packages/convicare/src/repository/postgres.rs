use super::Repository;
use crate::connect::Pool;
use crate::error::{AuthError, Error};
use crate::log::DATABASE;
use crate::model::{
    Attention, AttendedHistory, AttendedRecord, BasicConsultation, ClinicalHistory, Cycle,
    HistoryRecord, IntakeRecord, NewPharmacyOrder, NewUser, Obstetrics, Patient, PharmacyOrder,
    Role, Selection, Service, User, UserUpdate, Vitals,
};
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;
use tracing::debug;

type Param<'a> = &'a (dyn ToSql + Sync);

const USER_COLUMNS: &str = "id, nombre, email, password, rol";

const PATIENT_COLUMNS: &str = "tipo_identificacion, nombre, identificacion, fecha_nacimiento, \
     edad, sexo, direccion, telefono, bano, responsable, parentesco, telefono_responsable";

const CLINICAL_COLUMNS: &str = "motivo_consulta, antecedentes, fc, fr, ta, temperatura, peso, \
     talla, firma_ingreso, firma_medico, fum, g, a, p, v, c, ciclos, fisico, servicios, atencion";

const PHARMACY_COLUMNS: &str = "nombre, identificacion, conducta, diagnostico, firma_medico";

///
/// `Repository` over the PostgreSQL schema in `sql/schema.sql`.
///
#[derive(Clone)]
pub struct PgRepository {
    pool: Pool,
}

impl PgRepository {
    pub fn new(pool: Pool) -> Self {
        PgRepository { pool }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

/// `$start, $start+1, ...` for `count` parameters
fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn intake_columns() -> String {
    format!("fecha, {PATIENT_COLUMNS}, motivo_consulta")
}

fn history_columns() -> String {
    format!("fecha, {PATIENT_COLUMNS}, {CLINICAL_COLUMNS}")
}

fn attended_columns() -> String {
    format!("{}, diagnostico, conducta", history_columns())
}

fn patient_params(patient: &Patient) -> Vec<Param<'_>> {
    vec![
        &patient.identification_type,
        &patient.name,
        &patient.identification,
        &patient.birth_date,
        &patient.age,
        &patient.sex,
        &patient.address,
        &patient.phone,
        &patient.bathroom,
        &patient.guardian,
        &patient.kinship,
        &patient.guardian_phone,
    ]
}

///
/// Multi-value fields serialized for storage
///
struct StoredFields {
    cycle: Option<String>,
    services: Option<String>,
    attention: Option<String>,
}

impl StoredFields {
    fn from(history: &HistoryRecord) -> Self {
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
        StoredFields {
            cycle: history.obstetrics.cycle.as_ref().map(Cycle::to_stored),
            services: non_empty(history.services.to_stored()),
            attention: non_empty(history.attention.to_stored()),
        }
    }
}

fn history_params<'a>(history: &'a HistoryRecord, stored: &'a StoredFields) -> Vec<Param<'a>> {
    let mut params: Vec<Param<'a>> = vec![&history.visit_date];
    params.extend(patient_params(&history.patient));
    params.extend::<[Param<'a>; 20]>([
        &history.reason,
        &history.background,
        &history.vitals.heart_rate,
        &history.vitals.respiratory_rate,
        &history.vitals.blood_pressure,
        &history.vitals.temperature,
        &history.vitals.weight,
        &history.vitals.height,
        &history.intake_signer,
        &history.physician_signer,
        &history.obstetrics.last_period,
        &history.obstetrics.pregnancies,
        &history.obstetrics.abortions,
        &history.obstetrics.births,
        &history.obstetrics.living_children,
        &history.obstetrics.cesareans,
        &stored.cycle,
        &history.physical_exam,
        &stored.services,
        &stored.attention,
    ]);
    params
}

fn user_from_row(row: &Row) -> Result<User, tokio_postgres::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("nombre")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password")?,
        role: Role::parse(row.try_get::<_, &str>("rol")?),
    })
}

fn patient_from_row(row: &Row) -> Result<Patient, tokio_postgres::Error> {
    Ok(Patient {
        identification_type: row.try_get("tipo_identificacion")?,
        name: row.try_get("nombre")?,
        identification: row.try_get("identificacion")?,
        birth_date: row.try_get("fecha_nacimiento")?,
        age: row.try_get("edad")?,
        sex: row.try_get("sexo")?,
        address: row.try_get("direccion")?,
        phone: row.try_get("telefono")?,
        bathroom: row.try_get("bano")?,
        guardian: row.try_get("responsable")?,
        kinship: row.try_get("parentesco")?,
        guardian_phone: row.try_get("telefono_responsable")?,
    })
}

fn intake_from_row(row: &Row) -> Result<BasicConsultation, tokio_postgres::Error> {
    Ok(BasicConsultation {
        id: row.try_get("id")?,
        record: IntakeRecord {
            visit_date: row.try_get("fecha")?,
            patient: patient_from_row(row)?,
            reason: row.try_get("motivo_consulta")?,
        },
    })
}

fn history_record_from_row(row: &Row) -> Result<HistoryRecord, tokio_postgres::Error> {
    Ok(HistoryRecord {
        visit_date: row.try_get("fecha")?,
        patient: patient_from_row(row)?,
        reason: row.try_get("motivo_consulta")?,
        background: row.try_get("antecedentes")?,
        vitals: Vitals {
            heart_rate: row.try_get("fc")?,
            respiratory_rate: row.try_get("fr")?,
            blood_pressure: row.try_get("ta")?,
            temperature: row.try_get("temperatura")?,
            weight: row.try_get("peso")?,
            height: row.try_get("talla")?,
        },
        obstetrics: Obstetrics {
            last_period: row.try_get("fum")?,
            pregnancies: row.try_get("g")?,
            abortions: row.try_get("a")?,
            births: row.try_get("p")?,
            living_children: row.try_get("v")?,
            cesareans: row.try_get("c")?,
            cycle: Cycle::from_stored(row.try_get("ciclos")?),
        },
        physical_exam: row.try_get("fisico")?,
        services: Selection::<Service>::from_stored(row.try_get("servicios")?),
        attention: Selection::<Attention>::from_stored(row.try_get("atencion")?),
        intake_signer: row.try_get("firma_ingreso")?,
        physician_signer: row.try_get("firma_medico")?,
    })
}

fn history_from_row(row: &Row) -> Result<ClinicalHistory, tokio_postgres::Error> {
    Ok(ClinicalHistory {
        id: row.try_get("id")?,
        record: history_record_from_row(row)?,
    })
}

fn attended_from_row(row: &Row) -> Result<AttendedHistory, tokio_postgres::Error> {
    Ok(AttendedHistory {
        id: row.try_get("id")?,
        record: AttendedRecord {
            history: history_record_from_row(row)?,
            diagnosis: row.try_get("diagnostico")?,
            treatment_plan: row.try_get("conducta")?,
        },
    })
}

fn pharmacy_from_row(row: &Row) -> Result<PharmacyOrder, tokio_postgres::Error> {
    Ok(PharmacyOrder {
        id: row.try_get("id")?,
        order: NewPharmacyOrder {
            patient_name: row.try_get("nombre")?,
            identification: row.try_get("identificacion")?,
            treatment_plan: row.try_get("conducta")?,
            diagnosis: row.try_get("diagnostico")?,
            physician_signer: row.try_get("firma_medico")?,
        },
        created_at: row.try_get("fecha")?,
    })
}

fn collect<T>(
    rows: Vec<Row>,
    from_row: fn(&Row) -> Result<T, tokio_postgres::Error>,
) -> Result<Vec<T>, Error> {
    rows.iter()
        .map(|row| from_row(row).map_err(Error::from))
        .collect()
}

fn insert_history_sql(table: &str) -> String {
    format!(
        "INSERT INTO {table} ({}) VALUES ({}) RETURNING id",
        history_columns(),
        placeholders(1, 33)
    )
}

fn insert_attended_sql() -> String {
    format!(
        "INSERT INTO historias_clinicas_atendidas ({}) VALUES ({}) RETURNING id",
        attended_columns(),
        placeholders(1, 35)
    )
}

#[async_trait::async_trait]
impl Repository for PgRepository {
    async fn find_user(&self, id: i64) -> Result<Option<User>, Error> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {USER_COLUMNS} FROM usuarios WHERE id = $1");
        let row = client.query_opt(&sql, &[&id]).await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {USER_COLUMNS} FROM usuarios WHERE email = $1");
        let row = client.query_opt(&sql, &[&email]).await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {USER_COLUMNS} FROM usuarios ORDER BY id");
        let rows = client.query(&sql, &[]).await?;
        collect(rows, user_from_row)
    }

    async fn insert_user(&self, user: &NewUser) -> Result<i64, Error> {
        let client = self.pool.get().await?;
        let role = user.role.as_str();
        let row = client
            .query_one(
                "INSERT INTO usuarios (nombre, email, password, rol) VALUES ($1, $2, $3, $4) RETURNING id",
                &[&user.name, &user.email, &user.password_hash, &role],
            )
            .await
            .map_err(|err| match err.code() {
                // The email check before insert is not atomic, the unique index is the backstop
                Some(code) if *code == SqlState::UNIQUE_VIOLATION => {
                    Error::Auth(AuthError::DuplicateEmail {
                        email: user.email.clone(),
                    })
                }
                _ => Error::Database(err),
            })?;
        Ok(row.try_get(0)?)
    }

    async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<bool, Error> {
        let client = self.pool.get().await?;
        let role = update.role.as_str();
        let count = client
            .execute(
                "UPDATE usuarios SET nombre = $1, email = $2, rol = $3 WHERE id = $4",
                &[&update.name, &update.email, &role, &id],
            )
            .await
            .map_err(|err| match err.code() {
                Some(code) if *code == SqlState::UNIQUE_VIOLATION => {
                    Error::Auth(AuthError::DuplicateEmail {
                        email: update.email.clone(),
                    })
                }
                _ => Error::Database(err),
            })?;
        Ok(count > 0)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, Error> {
        let client = self.pool.get().await?;
        let count = client
            .execute("DELETE FROM usuarios WHERE id = $1", &[&id])
            .await?;
        Ok(count > 0)
    }

    async fn insert_basic(&self, intake: &IntakeRecord) -> Result<i64, Error> {
        let client = self.pool.get().await?;
        let sql = format!(
            "INSERT INTO consultas_basicas ({}) VALUES ({}) RETURNING id",
            intake_columns(),
            placeholders(1, 14)
        );
        let mut params: Vec<Param<'_>> = vec![&intake.visit_date];
        params.extend(patient_params(&intake.patient));
        params.push(&intake.reason);

        let row = client.query_one(&sql, &params).await?;
        Ok(row.try_get(0)?)
    }

    async fn find_basic(&self, id: i64) -> Result<Option<BasicConsultation>, Error> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT id, {} FROM consultas_basicas WHERE id = $1",
            intake_columns()
        );
        let row = client.query_opt(&sql, &[&id]).await?;
        Ok(row.as_ref().map(intake_from_row).transpose()?)
    }

    async fn list_basic(&self) -> Result<Vec<BasicConsultation>, Error> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT id, {} FROM consultas_basicas ORDER BY id",
            intake_columns()
        );
        let rows = client.query(&sql, &[]).await?;
        collect(rows, intake_from_row)
    }

    async fn insert_history(&self, history: &HistoryRecord) -> Result<i64, Error> {
        let client = self.pool.get().await?;
        let stored = StoredFields::from(history);
        let params = history_params(history, &stored);

        let row = client
            .query_one(&insert_history_sql("historias_clinicas"), &params)
            .await?;
        Ok(row.try_get(0)?)
    }

    async fn find_history(&self, id: i64) -> Result<Option<ClinicalHistory>, Error> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT id, {} FROM historias_clinicas WHERE id = $1",
            history_columns()
        );
        let row = client.query_opt(&sql, &[&id]).await?;
        Ok(row.as_ref().map(history_from_row).transpose()?)
    }

    async fn list_histories(&self) -> Result<Vec<ClinicalHistory>, Error> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT id, {} FROM historias_clinicas ORDER BY id",
            history_columns()
        );
        let rows = client.query(&sql, &[]).await?;
        collect(rows, history_from_row)
    }

    async fn promote_basic(&self, basic_id: i64, history: &HistoryRecord) -> Result<i64, Error> {
        let mut client = self.pool.get().await?;
        let stored = StoredFields::from(history);
        let params = history_params(history, &stored);

        let transaction = client.transaction().await?;

        let row = transaction
            .query_one(&insert_history_sql("historias_clinicas"), &params)
            .await?;
        let id: i64 = row.try_get(0)?;

        let deleted = transaction
            .execute("DELETE FROM consultas_basicas WHERE id = $1", &[&basic_id])
            .await?;

        if deleted == 0 {
            // Dropping the transaction rolls back the insert
            return Err(Error::NotFound {
                entity: "Basic consultation",
                id: basic_id,
            });
        }

        transaction.commit().await?;
        debug!(target: DATABASE, msg = "Promoted basic consultation", basic_id, history_id = id);
        Ok(id)
    }

    async fn attend_history(
        &self,
        pending_id: i64,
        attended: &AttendedRecord,
        order: &NewPharmacyOrder,
    ) -> Result<i64, Error> {
        let mut client = self.pool.get().await?;
        let stored = StoredFields::from(&attended.history);
        let mut params = history_params(&attended.history, &stored);
        params.push(&attended.diagnosis);
        params.push(&attended.treatment_plan);

        let transaction = client.transaction().await?;

        let row = transaction.query_one(&insert_attended_sql(), &params).await?;
        let id: i64 = row.try_get(0)?;

        let deleted = transaction
            .execute("DELETE FROM historias_clinicas WHERE id = $1", &[&pending_id])
            .await?;

        if deleted == 0 {
            return Err(Error::NotFound {
                entity: "Clinical history",
                id: pending_id,
            });
        }

        let sql = format!(
            "INSERT INTO farmacia ({PHARMACY_COLUMNS}) VALUES ({})",
            placeholders(1, 5)
        );
        transaction
            .execute(
                &sql,
                &[
                    &order.patient_name,
                    &order.identification,
                    &order.treatment_plan,
                    &order.diagnosis,
                    &order.physician_signer,
                ],
            )
            .await?;

        transaction.commit().await?;
        debug!(target: DATABASE, msg = "Attended clinical history", pending_id, attended_id = id);
        Ok(id)
    }

    async fn find_attended(&self, id: i64) -> Result<Option<AttendedHistory>, Error> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT id, {} FROM historias_clinicas_atendidas WHERE id = $1",
            attended_columns()
        );
        let row = client.query_opt(&sql, &[&id]).await?;
        Ok(row.as_ref().map(attended_from_row).transpose()?)
    }

    async fn list_attended(&self) -> Result<Vec<AttendedHistory>, Error> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT id, {} FROM historias_clinicas_atendidas ORDER BY id",
            attended_columns()
        );
        let rows = client.query(&sql, &[]).await?;
        collect(rows, attended_from_row)
    }

    async fn find_pharmacy_order(&self, id: i64) -> Result<Option<PharmacyOrder>, Error> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT id, {PHARMACY_COLUMNS}, fecha FROM farmacia WHERE id = $1");
        let row = client.query_opt(&sql, &[&id]).await?;
        Ok(row.as_ref().map(pharmacy_from_row).transpose()?)
    }

    async fn list_pharmacy_orders(&self) -> Result<Vec<PharmacyOrder>, Error> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT id, {PHARMACY_COLUMNS}, fecha FROM farmacia ORDER BY id");
        let rows = client.query(&sql, &[]).await?;
        collect(rows, pharmacy_from_row)
    }
}
