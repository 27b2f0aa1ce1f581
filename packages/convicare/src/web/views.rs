//!
//! HTML pages.
//!
//! Pages are Tera templates compiled into the binary from `templates/`. Every template name
//! ends in `.html`, so every interpolated value is escaped on output.
//!
use crate::error::Error;
use crate::model::{
    Attention, AttendedHistory, BasicConsultation, Choice, ClinicalHistory, HistoryRecord,
    Identity, Patient, PharmacyOrder, Role, Selection, Service, User,
};
use crate::report::{
    long_date, GeneralReport, HistoryLists, HistoryRow, IntakeRow, ServiceReport,
};
use axum::response::Html;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tera::{Context, Tera};

pub const DENIED: &str = "🚫 No tienes permiso para acceder a esta página.";

const TEMPLATES: [(&str, &str); 14] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("macros.html", include_str!("../../templates/macros.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("account.html", include_str!("../../templates/account.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("message.html", include_str!("../../templates/message.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    ("users.html", include_str!("../../templates/users.html")),
    ("record_form.html", include_str!("../../templates/record_form.html")),
    ("intakes.html", include_str!("../../templates/intakes.html")),
    ("histories.html", include_str!("../../templates/histories.html")),
    ("pharmacy.html", include_str!("../../templates/pharmacy.html")),
    ("detail.html", include_str!("../../templates/detail.html")),
    ("reports.html", include_str!("../../templates/reports.html")),
];

const ROLES: [(&str, &str); 3] = [
    ("admin", "Administrador"),
    ("medico", "Médico"),
    ("enfermero", "Enfermero"),
];

#[derive(Serialize)]
struct Nav<'a> {
    name: &'a str,
    role: &'a str,
}

/// A labelled form control. `kind` is an input type or `textarea`.
#[derive(Serialize)]
struct Field {
    label: &'static str,
    name: &'static str,
    kind: &'static str,
    value: String,
}

impl Field {
    fn new(label: &'static str, name: &'static str, kind: &'static str, value: String) -> Self {
        Field {
            label,
            name,
            kind,
            value,
        }
    }

    fn text(label: &'static str, name: &'static str, value: &Option<String>) -> Self {
        Field::new(label, name, "text", value.clone().unwrap_or_default())
    }

    fn textarea(label: &'static str, name: &'static str, value: &Option<String>) -> Self {
        Field::new(label, name, "textarea", value.clone().unwrap_or_default())
    }

    fn number(label: &'static str, name: &'static str, value: Option<i32>) -> Self {
        let value = value.map(|v| v.to_string()).unwrap_or_default();
        Field::new(label, name, "number", value)
    }

    fn date(label: &'static str, name: &'static str, value: Option<NaiveDate>) -> Self {
        let value = value
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        Field::new(label, name, "date", value)
    }
}

/// Checkbox, radio button or select option
#[derive(Serialize)]
struct Toggle {
    value: String,
    label: String,
    checked: bool,
}

#[derive(Serialize)]
struct Link {
    href: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct Section<'a> {
    heading: String,
    rows: &'a [HistoryRow],
    link: Option<&'static str>,
}

#[derive(Serialize)]
struct UserRow<'a> {
    id: i64,
    name: &'a str,
    email: &'a str,
    role: &'a str,
}

#[derive(Serialize)]
struct OrderRow<'a> {
    id: i64,
    date: String,
    name: &'a str,
    identification: &'a str,
}

#[derive(Serialize)]
struct Detail {
    label: &'static str,
    value: String,
}

fn detail(label: &'static str, value: &Option<String>) -> Detail {
    Detail {
        label,
        value: value.clone().unwrap_or_default(),
    }
}

fn order_date(order: &PharmacyOrder) -> String {
    order.created_at.format("%Y-%m-%d %H:%M").to_string()
}

fn roles(selected: Option<&Role>) -> Vec<Toggle> {
    ROLES
        .iter()
        .map(|(value, label)| Toggle {
            value: value.to_string(),
            label: label.to_string(),
            checked: selected.is_some_and(|role| role.as_str() == *value),
        })
        .collect()
}

fn services(selected: &Selection<Service>) -> Vec<Toggle> {
    Service::known()
        .iter()
        .map(|service| Toggle {
            value: service.key().to_string(),
            label: service.label().to_string(),
            checked: selected.contains(service),
        })
        .collect()
}

fn attention(selected: &Selection<Attention>) -> Vec<Toggle> {
    [Attention::Prioritaria, Attention::General]
        .iter()
        .map(|attention| Toggle {
            value: attention.label().to_string(),
            label: attention.label().to_string(),
            checked: selected.contains(attention),
        })
        .collect()
}

fn patient_fields(visit_date: Option<NaiveDate>, patient: &Patient, reason: &Option<String>) -> Vec<Field> {
    vec![
        Field::date("Fecha", "fecha", visit_date),
        Field::text("Tipo de identificación", "tipo_identificacion", &patient.identification_type),
        Field::new("Nombre", "nombre", "text", patient.name.clone()),
        Field::new("Identificación", "identificacion", "text", patient.identification.clone()),
        Field::date("Fecha de nacimiento", "fecha_nacimiento", patient.birth_date),
        Field::number("Edad", "edad", patient.age),
        Field::text("Sexo", "sexo", &patient.sex),
        Field::text("Dirección", "direccion", &patient.address),
        Field::text("Teléfono", "telefono", &patient.phone),
        Field::text("Baño", "bano", &patient.bathroom),
        Field::text("Responsable", "responsable", &patient.guardian),
        Field::text("Parentesco", "parentesco", &patient.kinship),
        Field::text("Teléfono del responsable", "telefono_responsable", &patient.guardian_phone),
        Field::textarea("Motivo de consulta", "motivo_consulta", reason),
    ]
}

fn clinical_fields(record: Option<&HistoryRecord>) -> Vec<Field> {
    let vitals = record.map(|r| r.vitals.clone()).unwrap_or_default();
    let obstetrics = record.map(|r| r.obstetrics.clone()).unwrap_or_default();
    let cycle = obstetrics.cycle.clone().unwrap_or_default();
    let background = record.and_then(|r| r.background.clone());
    let physical_exam = record.and_then(|r| r.physical_exam.clone());

    vec![
        Field::textarea("Antecedentes", "antecedentes", &background),
        Field::text("FC", "fc", &vitals.heart_rate),
        Field::text("FR", "fr", &vitals.respiratory_rate),
        Field::text("TA", "ta", &vitals.blood_pressure),
        Field::text("Temperatura", "temperatura", &vitals.temperature),
        Field::text("Peso", "peso", &vitals.weight),
        Field::text("Talla", "talla", &vitals.height),
        Field::date("FUM", "fum", obstetrics.last_period),
        Field::number("G", "g", obstetrics.pregnancies),
        Field::number("A", "a", obstetrics.abortions),
        Field::number("P", "p", obstetrics.births),
        Field::number("V", "v", obstetrics.living_children),
        Field::number("C", "c", obstetrics.cesareans),
        Field::text("Ciclo", "ciclo1", &cycle.first),
        Field::text("X", "ciclo2", &cycle.second),
        Field::textarea("Examen físico", "fisico", &physical_exam),
    ]
}

fn prescription_rows() -> Vec<Vec<Field>> {
    (0..3)
        .map(|_| {
            vec![
                Field::new("Medicamento", "medicamento[]", "text", String::new()),
                Field::new("Cada (horas)", "horas[]", "text", String::new()),
                Field::new("Por (días)", "dias[]", "text", String::new()),
            ]
        })
        .collect()
}

fn account_fields(user: Option<&User>) -> Vec<Field> {
    let mut fields = vec![
        Field::new("Nombre", "nombre", "text", user.map(|u| u.name.clone()).unwrap_or_default()),
        Field::new("Correo", "email", "email", user.map(|u| u.email.clone()).unwrap_or_default()),
    ];
    if user.is_none() {
        fields.push(Field::new("Contraseña", "password", "password", String::new()));
    }
    fields
}

///
/// The compiled page templates.
///
#[derive(Clone)]
pub struct Views {
    tera: Arc<Tera>,
}

impl Views {
    pub fn new() -> Result<Self, Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Views {
            tera: Arc::new(tera),
        })
    }

    fn render(&self, name: &str, context: &Context) -> Result<Html<String>, Error> {
        Ok(Html(self.tera.render(name, context)?))
    }

    /// Context every page starts from
    fn page(title: &str, identity: Option<&Identity>, error: Option<&str>) -> Context {
        let nav = identity.map(|identity| Nav {
            name: &identity.name,
            role: identity.role.as_str(),
        });

        let mut context = Context::new();
        context.insert("title", title);
        context.insert("user", &nav);
        context.insert("error", &error);
        context
    }

    fn message(
        &self,
        title: &str,
        identity: Option<&Identity>,
        message: &str,
        link: Option<Link>,
    ) -> Result<Html<String>, Error> {
        let mut context = Views::page(title, identity, None);
        context.insert("message", message);
        context.insert("link", &link);
        context.insert("back", &false);
        self.render("message.html", &context)
    }

    pub fn index(&self, identity: Option<&Identity>) -> Result<Html<String>, Error> {
        let context = Views::page("Bienvenido a ConviCare", identity, None);
        self.render("index.html", &context)
    }

    pub fn register(&self, error: Option<&str>) -> Result<Html<String>, Error> {
        let mut context = Views::page("Registro", None, error);
        context.insert("action", "/register");
        context.insert("submit", "Registrarse");
        context.insert("fields", &account_fields(None));
        context.insert("roles", &roles(None));
        self.render("account.html", &context)
    }

    pub fn registration_success(&self) -> Result<Html<String>, Error> {
        let link = Link {
            href: "/login",
            label: "Iniciar sesión",
        };
        self.message("Registro exitoso", None, "✅ Usuario registrado.", Some(link))
    }

    pub fn login(&self, error: Option<&str>) -> Result<Html<String>, Error> {
        let context = Views::page("Iniciar sesión", None, error);
        self.render("login.html", &context)
    }

    pub fn dashboard(&self, identity: &Identity) -> Result<Html<String>, Error> {
        let mut context = Views::page("Panel", Some(identity), None);
        context.insert("medical", &(identity.role.is_medico() || identity.role.is_admin()));
        context.insert("admin", &identity.role.is_admin());
        self.render("dashboard.html", &context)
    }

    pub fn users(&self, identity: &Identity, users: &[User]) -> Result<Html<String>, Error> {
        let rows = users
            .iter()
            .map(|user| UserRow {
                id: user.id,
                name: &user.name,
                email: &user.email,
                role: user.role.as_str(),
            })
            .collect::<Vec<_>>();

        let mut context = Views::page("Usuarios", Some(identity), None);
        context.insert("users", &rows);
        self.render("users.html", &context)
    }

    pub fn new_user(&self, identity: &Identity, error: Option<&str>) -> Result<Html<String>, Error> {
        let mut context = Views::page("Nuevo usuario", Some(identity), error);
        context.insert("action", "/usuarios/nuevo");
        context.insert("submit", "Guardar");
        context.insert("fields", &account_fields(None));
        context.insert("roles", &roles(None));
        self.render("account.html", &context)
    }

    pub fn user_created(&self, identity: &Identity) -> Result<Html<String>, Error> {
        let link = Link {
            href: "/usuarios",
            label: "Volver",
        };
        self.message(
            "Usuario registrado",
            Some(identity),
            "✅ Usuario registrado exitosamente.",
            Some(link),
        )
    }

    pub fn edit_user(
        &self,
        identity: &Identity,
        user: &User,
        error: Option<&str>,
    ) -> Result<Html<String>, Error> {
        let mut context = Views::page("Editar usuario", Some(identity), error);
        context.insert("action", &format!("/usuarios/editar/{}", user.id));
        context.insert("submit", "Guardar");
        context.insert("fields", &account_fields(Some(user)));
        context.insert("roles", &roles(Some(&user.role)));
        self.render("account.html", &context)
    }

    pub fn user_updated(&self, identity: &Identity) -> Result<Html<String>, Error> {
        let link = Link {
            href: "/usuarios",
            label: "Volver",
        };
        self.message("Usuario actualizado", Some(identity), "✅ Usuario actualizado.", Some(link))
    }

    /// Record form context without the clinical sections
    fn record_form(
        title: &str,
        identity: Option<&Identity>,
        error: Option<&str>,
        action: &str,
        fields: Vec<Field>,
    ) -> Context {
        let mut context = Views::page(title, identity, error);
        context.insert("action", action);
        context.insert("fields", &fields);
        context.insert("signer", &None::<String>);
        context.insert("services", &None::<Vec<Toggle>>);
        context.insert("attention", &None::<Vec<Toggle>>);
        context.insert("diagnosis", &None::<Vec<Field>>);
        context.insert("prescriptions", &None::<Vec<Vec<Field>>>);
        context.insert("submit", "Guardar");
        context
    }

    fn clinical_context(
        title: &str,
        identity: &Identity,
        error: Option<&str>,
        action: &str,
        mut fields: Vec<Field>,
        record: Option<&HistoryRecord>,
    ) -> Context {
        fields.extend(clinical_fields(record));

        let mut context = Views::record_form(title, Some(identity), error, action, fields);
        let (selected_services, selected_attention) = record
            .map(|r| (r.services.clone(), r.attention.clone()))
            .unwrap_or_else(|| (Selection::new(), Selection::new()));
        context.insert("services", &Some(services(&selected_services)));
        context.insert("attention", &Some(attention(&selected_attention)));
        context
    }

    pub fn clinical_form(&self, identity: &Identity, error: Option<&str>) -> Result<Html<String>, Error> {
        let fields = patient_fields(None, &Patient::default(), &None);
        let context =
            Views::clinical_context("Registro clínico", identity, error, "/registro", fields, None);
        self.render("record_form.html", &context)
    }

    pub fn intake_form(
        &self,
        identity: Option<&Identity>,
        error: Option<&str>,
    ) -> Result<Html<String>, Error> {
        let fields = patient_fields(None, &Patient::default(), &None);
        let context =
            Views::record_form("Registro de ingreso", identity, error, "/registro_simple", fields);
        self.render("record_form.html", &context)
    }

    pub fn record_saved(&self, identity: Option<&Identity>) -> Result<Html<String>, Error> {
        let link = Link {
            href: "/",
            label: "Volver",
        };
        self.message("Registro guardado", identity, "✅ Registro clínico guardado.", Some(link))
    }

    pub fn record_updated(&self, identity: &Identity) -> Result<Html<String>, Error> {
        let link = Link {
            href: "/dashboard",
            label: "Volver",
        };
        self.message(
            "Historia actualizada",
            Some(identity),
            "✅ Historia clínica actualizada.",
            Some(link),
        )
    }

    pub fn basic_list(&self, identity: &Identity, rows: &[IntakeRow]) -> Result<Html<String>, Error> {
        let mut context = Views::page("Ingresos pendientes", Some(identity), None);
        context.insert("rows", rows);
        self.render("intakes.html", &context)
    }

    pub fn basic_edit(
        &self,
        identity: &Identity,
        consultation: &BasicConsultation,
        error: Option<&str>,
    ) -> Result<Html<String>, Error> {
        let record = &consultation.record;
        let fields = patient_fields(Some(record.visit_date), &record.patient, &record.reason);
        let context = Views::clinical_context(
            "Completar historia clínica",
            identity,
            error,
            &format!("/historias_basicas/editar/{}", consultation.id),
            fields,
            None,
        );
        self.render("record_form.html", &context)
    }

    pub fn history_edit(
        &self,
        identity: &Identity,
        history: &ClinicalHistory,
        error: Option<&str>,
    ) -> Result<Html<String>, Error> {
        let record = &history.record;
        let fields = patient_fields(Some(record.visit_date), &record.patient, &record.reason);
        let mut context = Views::clinical_context(
            "Atender historia clínica",
            identity,
            error,
            &format!("/historias_clinicas/editar/{}", history.id),
            fields,
            Some(record),
        );
        context.insert("signer", &record.intake_signer);
        context.insert(
            "diagnosis",
            &Some(vec![Field::textarea("Diagnóstico", "diagnostico", &None)]),
        );
        context.insert("prescriptions", &Some(prescription_rows()));
        context.insert("submit", "Atender");
        self.render("record_form.html", &context)
    }

    fn histories(
        &self,
        title: &str,
        identity: &Identity,
        sections: &[Section],
    ) -> Result<Html<String>, Error> {
        let mut context = Views::page(title, Some(identity), None);
        context.insert("sections", sections);
        self.render("histories.html", &context)
    }

    pub fn history_lists(&self, identity: &Identity, lists: &HistoryLists) -> Result<Html<String>, Error> {
        let sections = [
            Section {
                heading: "Registradas".to_string(),
                rows: &lists.pending,
                link: Some("/historias_clinicas/editar"),
            },
            Section {
                heading: "Atendidas".to_string(),
                rows: &lists.attended,
                link: Some("/historias_clinicas_atendidas/ver"),
            },
        ];
        self.histories("Historias clínicas", identity, &sections)
    }

    pub fn attended_detail(&self, identity: &Identity, attended: &AttendedHistory) -> Result<Html<String>, Error> {
        let record = &attended.record;
        let h = &record.history;
        let cycle = h.obstetrics.cycle.as_ref().map(|c| c.to_stored());

        let rows = vec![
            detail("Fecha", &Some(long_date(h.visit_date))),
            detail("Nombre", &Some(h.patient.name.clone())),
            detail("Identificación", &Some(h.patient.identification.clone())),
            detail("Edad", &h.patient.age.map(|age| age.to_string())),
            detail("Sexo", &h.patient.sex),
            detail("Motivo de consulta", &h.reason),
            detail("Antecedentes", &h.background),
            detail("Examen físico", &h.physical_exam),
            detail("Ciclos", &cycle),
            detail("Servicios", &Some(h.services.to_stored())),
            detail("Atención", &Some(h.attention.to_stored())),
            detail("Diagnóstico", &record.diagnosis),
            detail("Conducta", &record.treatment_plan),
            detail("Firma de ingreso", &h.intake_signer),
            detail("Firma del médico", &h.physician_signer),
        ];

        let mut context = Views::page("Historia clínica atendida", Some(identity), None);
        context.insert("rows", &rows);
        self.render("detail.html", &context)
    }

    pub fn pharmacy_list(&self, identity: &Identity, orders: &[PharmacyOrder]) -> Result<Html<String>, Error> {
        let rows = orders
            .iter()
            .map(|order| OrderRow {
                id: order.id,
                date: order_date(order),
                name: &order.order.patient_name,
                identification: &order.order.identification,
            })
            .collect::<Vec<_>>();

        let mut context = Views::page("Farmacia", Some(identity), None);
        context.insert("orders", &rows);
        self.render("pharmacy.html", &context)
    }

    pub fn pharmacy_detail(&self, identity: &Identity, order: &PharmacyOrder) -> Result<Html<String>, Error> {
        let rows = vec![
            detail("Fecha", &Some(order_date(order))),
            detail("Nombre", &Some(order.order.patient_name.clone())),
            detail("Identificación", &Some(order.order.identification.clone())),
            detail("Diagnóstico", &order.order.diagnosis),
            detail("Conducta", &order.order.treatment_plan),
            detail("Firma del médico", &order.order.physician_signer),
        ];

        let mut context = Views::page("Receta", Some(identity), None);
        context.insert("rows", &rows);
        self.render("detail.html", &context)
    }

    pub fn reports_summary(&self, identity: &Identity) -> Result<Html<String>, Error> {
        let mut context = Views::page("Reportes", Some(identity), None);
        context.insert("services", &services(&Selection::new()));
        self.render("reports.html", &context)
    }

    fn report(
        &self,
        title: &str,
        identity: &Identity,
        pending: &[HistoryRow],
        attended: &[HistoryRow],
    ) -> Result<Html<String>, Error> {
        let sections = [
            Section {
                heading: format!("Registradas ({})", pending.len()),
                rows: pending,
                link: None,
            },
            Section {
                heading: format!("Atendidas ({})", attended.len()),
                rows: attended,
                link: None,
            },
        ];
        self.histories(title, identity, &sections)
    }

    pub fn general_report(&self, identity: &Identity, report: &GeneralReport) -> Result<Html<String>, Error> {
        self.report("Reporte general", identity, &report.pending, &report.attended)
    }

    pub fn service_report(&self, identity: &Identity, report: &ServiceReport) -> Result<Html<String>, Error> {
        let title = format!("Reporte: {}", report.service);
        self.report(&title, identity, &report.pending, &report.attended)
    }

    pub fn patients(&self, identity: &Identity) -> Result<Html<String>, Error> {
        self.message(
            "Pacientes",
            Some(identity),
            "🩺 Listado de pacientes (solo médicos pueden ver esto)",
            None,
        )
    }

    ///
    /// Page for a failed request. `back` adds a link to the previous page.
    ///
    pub fn failure(
        &self,
        title: &str,
        identity: Option<&Identity>,
        message: &str,
        back: bool,
    ) -> Result<Html<String>, Error> {
        let mut context = Views::page(title, identity, None);
        context.insert("message", message);
        context.insert("link", &None::<Link>);
        context.insert("back", &back);
        self.render("message.html", &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Obstetrics, Vitals};

    fn identity(name: &str) -> Identity {
        Identity {
            id: 1,
            name: name.to_string(),
            role: Role::Medico,
        }
    }

    fn history(patient: &str, services: &str) -> ClinicalHistory {
        ClinicalHistory {
            id: 7,
            record: HistoryRecord {
                visit_date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
                patient: Patient {
                    name: patient.to_string(),
                    identification: "1001".to_string(),
                    ..Default::default()
                },
                reason: Some("Dolor".to_string()),
                background: None,
                vitals: Vitals::default(),
                obstetrics: Obstetrics::default(),
                physical_exam: None,
                services: Selection::from_stored(Some(services)),
                attention: Selection::from_stored(Some("General")),
                intake_signer: Some("Ana".to_string()),
                physician_signer: None,
            },
        }
    }

    #[test]
    fn every_template_compiles() {
        let views = Views::new().unwrap();
        for (name, _) in TEMPLATES {
            assert!(views.tera.get_template_names().any(|n| n == name), "{name}");
        }
    }

    #[test]
    fn interpolated_values_are_escaped() {
        let views = Views::new().unwrap();
        let html = views
            .history_edit(
                &identity("<b>Ruiz</b>"),
                &history(r#"<script>alert("x")</script>"#, "Odontología"),
                Some("<i>aviso</i>"),
            )
            .unwrap()
            .0;

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>Ruiz</b>"));
        assert!(html.contains("&lt;b&gt;Ruiz&lt;"));
        assert!(!html.contains("<i>aviso</i>"));
    }

    #[test]
    fn stored_services_are_checked() {
        let views = Views::new().unwrap();
        let html = views
            .history_edit(
                &identity("Dra. Ruiz"),
                &history("Luis Perez", "Odontología, Nutrición"),
                None,
            )
            .unwrap()
            .0;

        assert!(html.contains(r#"value="odontologia" checked"#));
        assert!(html.contains(r#"value="nutricion" checked"#));
        assert!(html.contains(r#"value="psicologia">"#));
        assert!(html.contains(r#"value="General" checked"#));
        assert!(html.contains("Firma de ingreso: Ana"));
        assert_eq!(html.matches(r#"name="medicamento[]""#).count(), 3);
    }

    #[test]
    fn dashboard_links_follow_the_role() {
        let views = Views::new().unwrap();

        let medico = views.dashboard(&identity("Dra. Ruiz")).unwrap().0;
        assert!(medico.contains(r#"href="/historias""#));
        assert!(!medico.contains(r#"href="/usuarios""#));

        let nurse = Identity {
            role: Role::Other("enfermero".to_string()),
            ..identity("Ana")
        };
        let nurse = views.dashboard(&nurse).unwrap().0;
        assert!(!nurse.contains(r#"href="/historias""#));
        assert!(nurse.contains("Ana (enfermero)"));
    }

    #[test]
    fn failure_page_shows_the_identity() {
        let views = Views::new().unwrap();
        let html = views
            .failure("Acceso denegado", Some(&identity("Dra. Ruiz")), DENIED, false)
            .unwrap()
            .0;

        assert!(html.contains("Dra. Ruiz (medico)"));
        assert!(html.contains(DENIED));
        assert!(!html.contains("Iniciar sesión"));
    }
}
