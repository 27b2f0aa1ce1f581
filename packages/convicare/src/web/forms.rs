use crate::auth::Registration;
use crate::error::ValidationError;
use crate::lifecycle::{AttendForm, HistoryForm, IntakeForm};
use crate::model::{Cycle, Obstetrics, Patient, Prescription, Role, Selection, UserUpdate, Vitals};
use axum::extract::{FromRequest, Request};
use axum::extract::rejection::FormRejection;
use axum::Form;
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

///
/// A form-encoded body as submitted, repeated keys included.
///
/// Multi-value fields arrive either as `name` or as `name[]`, both are read.
///
#[derive(Clone, Debug, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

#[axum::async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = FormRejection;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, state).await?;
        Ok(FormData::new(pairs))
    }
}

impl FormData {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        FormData { pairs }
    }

    /// Every submitted value for `name` or `name[]`, in order
    pub fn all(&self, name: &str) -> Vec<&str> {
        let array = format!("{name}[]");
        self.pairs
            .iter()
            .filter(|(key, _)| key == name || *key == array)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// First value, trimmed. Blank is `None`.
    pub fn text(&self, name: &str) -> Option<String> {
        self.all(name)
            .first()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub fn required(&self, name: &'static str) -> Result<String, ValidationError> {
        self.text(name)
            .ok_or(ValidationError::MissingField { name })
    }

    /// Raw first value, untrimmed, for passwords
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.all(name).first().copied()
    }

    pub fn date(&self, name: &'static str) -> Result<Option<NaiveDate>, ValidationError> {
        self.text(name)
            .map(|value| {
                NaiveDate::parse_from_str(&value, DATE_FORMAT)
                    .map_err(|_| ValidationError::InvalidDate { name, value })
            })
            .transpose()
    }

    pub fn int(&self, name: &'static str) -> Result<Option<i32>, ValidationError> {
        self.text(name)
            .map(|value| {
                value
                    .parse::<i32>()
                    .map_err(|_| ValidationError::InvalidNumber { name, value })
            })
            .transpose()
    }
}

pub fn login(form: &FormData) -> (String, String) {
    (
        form.text("email").unwrap_or_default(),
        form.raw("password").unwrap_or_default().to_string(),
    )
}

pub fn registration(form: &FormData) -> Result<Registration, ValidationError> {
    Ok(Registration {
        name: form.required("nombre")?,
        email: form.required("email")?,
        password: form
            .raw("password")
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::MissingField { name: "password" })?
            .to_string(),
        role: Role::parse(&form.text("rol").unwrap_or_default()),
    })
}

pub fn user_update(form: &FormData) -> Result<UserUpdate, ValidationError> {
    Ok(UserUpdate {
        name: form.required("nombre")?,
        email: form.required("email")?,
        role: Role::parse(&form.text("rol").unwrap_or_default()),
    })
}

fn patient(form: &FormData) -> Result<Patient, ValidationError> {
    Ok(Patient {
        identification_type: form.text("tipo_identificacion"),
        name: form.text("nombre").unwrap_or_default(),
        identification: form.text("identificacion").unwrap_or_default(),
        birth_date: form.date("fecha_nacimiento")?,
        age: form.int("edad")?,
        sex: form.text("sexo"),
        address: form.text("direccion"),
        phone: form.text("telefono"),
        bathroom: form.text("bano"),
        guardian: form.text("responsable"),
        kinship: form.text("parentesco"),
        guardian_phone: form.text("telefono_responsable"),
    })
}

pub fn intake(form: &FormData) -> Result<IntakeForm, ValidationError> {
    Ok(IntakeForm {
        visit_date: form.date("fecha")?,
        patient: patient(form)?,
        reason: form.text("motivo_consulta"),
    })
}

pub fn history(form: &FormData) -> Result<HistoryForm, ValidationError> {
    Ok(HistoryForm {
        visit_date: form.date("fecha")?,
        patient: patient(form)?,
        reason: form.text("motivo_consulta"),
        background: form.text("antecedentes"),
        vitals: Vitals {
            heart_rate: form.text("fc"),
            respiratory_rate: form.text("fr"),
            blood_pressure: form.text("ta"),
            temperature: form.text("temperatura"),
            weight: form.text("peso"),
            height: form.text("talla"),
        },
        obstetrics: Obstetrics {
            last_period: form.date("fum")?,
            pregnancies: form.int("g")?,
            abortions: form.int("a")?,
            births: form.int("p")?,
            living_children: form.int("v")?,
            cesareans: form.int("c")?,
            cycle: None,
        },
        cycle: Cycle::new(form.text("ciclo1"), form.text("ciclo2")),
        physical_exam: form.text("fisico"),
        services: Selection::from_values(form.all("servicios")),
        attention: Selection::from_values(form.all("atencion")),
    })
}

pub fn attend(form: &FormData) -> Result<AttendForm, ValidationError> {
    Ok(AttendForm {
        history: history(form)?,
        diagnosis: form.text("diagnostico"),
        prescriptions: Prescription::from_columns(
            &form.all("medicamento"),
            &form.all("horas"),
            &form.all("dias"),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attention, Service};

    fn form(pairs: &[(&str, &str)]) -> FormData {
        FormData::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn single_and_array_names_are_read() {
        let data = form(&[
            ("servicios[]", "odontologia"),
            ("servicios", "nutricion"),
            ("atencion", "Prioritaria"),
            ("fecha", "2025-03-05"),
        ]);

        let history = history(&data).unwrap();
        assert_eq!(
            history.services.as_slice(),
            &[Service::Odontologia, Service::Nutricion]
        );
        assert_eq!(history.attention.as_slice(), &[Attention::Prioritaria]);
        assert_eq!(history.visit_date, NaiveDate::from_ymd_opt(2025, 3, 5));
    }

    #[test]
    fn blank_fields_are_none() {
        let data = form(&[("fecha", ""), ("g", " "), ("sexo", "")]);

        let history = history(&data).unwrap();
        assert_eq!(history.visit_date, None);
        assert_eq!(history.obstetrics.pregnancies, None);
        assert_eq!(history.patient.sex, None);
        assert!(!history.cycle.is_complete());
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert_eq!(
            history(&form(&[("g", "dos")])).unwrap_err(),
            ValidationError::InvalidNumber {
                name: "g",
                value: "dos".to_string()
            }
        );
        assert_eq!(
            intake(&form(&[("fecha", "05/03/2025")])).unwrap_err(),
            ValidationError::InvalidDate {
                name: "fecha",
                value: "05/03/2025".to_string()
            }
        );
    }

    #[test]
    fn prescriptions_are_paired_by_position() {
        let data = form(&[
            ("medicamento[]", "A"),
            ("horas[]", "8"),
            ("dias[]", "5"),
            ("medicamento[]", "B"),
            ("horas[]", "12"),
            ("dias[]", ""),
        ]);

        let attend = attend(&data).unwrap();
        assert_eq!(
            crate::model::treatment_plan(&attend.prescriptions),
            Some("A cada 8 horas por 5 días.".to_string())
        );
    }

    #[test]
    fn single_medication_is_accepted() {
        let data = form(&[("medicamento", "A"), ("horas", "8"), ("dias", "5")]);
        assert_eq!(attend(&data).unwrap().prescriptions.len(), 1);
    }

    #[test]
    fn registration_requires_fields() {
        let data = form(&[("nombre", "Ana"), ("email", "ana@x.co"), ("rol", "Médico")]);
        assert_eq!(
            registration(&data).unwrap_err(),
            ValidationError::MissingField { name: "password" }
        );

        let data = form(&[
            ("nombre", "Ana"),
            ("email", "ana@x.co"),
            ("password", " pw "),
            ("rol", "Médico"),
        ]);
        let registration = registration(&data).unwrap();
        assert_eq!(registration.password, " pw ");
        assert_eq!(registration.role, Role::Medico);
    }
}
