///
/// One line of a treatment plan: take `medication` every `hours` hours for `days` days.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Prescription {
    pub medication: String,
    pub hours: String,
    pub days: String,
}

impl Prescription {
    pub fn new(medication: &str, hours: &str, days: &str) -> Self {
        Prescription {
            medication: medication.trim().to_string(),
            hours: hours.trim().to_string(),
            days: days.trim().to_string(),
        }
    }

    ///
    /// Pairs the three submitted columns by position.
    /// Missing cells are empty, so a short column only makes its rows incomplete.
    ///
    pub fn from_columns(medications: &[&str], hours: &[&str], days: &[&str]) -> Vec<Prescription> {
        let rows = medications.len().max(hours.len()).max(days.len());
        (0..rows)
            .map(|i| {
                Prescription::new(
                    medications.get(i).copied().unwrap_or_default(),
                    hours.get(i).copied().unwrap_or_default(),
                    days.get(i).copied().unwrap_or_default(),
                )
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        !self.medication.is_empty() && !self.hours.is_empty() && !self.days.is_empty()
    }

    pub fn sentence(&self) -> String {
        format!(
            "{} cada {} horas por {} días.",
            self.medication, self.hours, self.days
        )
    }
}

///
/// Treatment plan sentence, one clause per complete prescription joined with `" | "`.
/// `None` when no prescription is complete.
///
pub fn treatment_plan(prescriptions: &[Prescription]) -> Option<String> {
    let plan = prescriptions
        .iter()
        .filter(|p| p.is_complete())
        .map(Prescription::sentence)
        .collect::<Vec<_>>()
        .join(" | ");

    if plan.is_empty() {
        None
    } else {
        Some(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_rows_are_dropped() {
        let prescriptions = Prescription::from_columns(&["A", "B"], &["8", "12"], &["5", ""]);
        assert_eq!(
            treatment_plan(&prescriptions),
            Some("A cada 8 horas por 5 días.".to_string())
        );
    }

    #[test]
    fn complete_rows_are_joined_in_order() {
        let prescriptions = Prescription::from_columns(
            &["Amoxicilina 500mg", "Ibuprofeno"],
            &["8", "12"],
            &["7", "3"],
        );
        assert_eq!(
            treatment_plan(&prescriptions),
            Some(
                "Amoxicilina 500mg cada 8 horas por 7 días. | Ibuprofeno cada 12 horas por 3 días."
                    .to_string()
            )
        );
    }

    #[test]
    fn mismatched_columns_never_shift_rows() {
        let prescriptions = Prescription::from_columns(&["A", "B", "C"], &["8"], &["5", "2", "1"]);
        assert_eq!(prescriptions.len(), 3);
        assert!(prescriptions[0].is_complete());
        assert!(!prescriptions[1].is_complete());
        assert!(!prescriptions[2].is_complete());
        assert_eq!(
            treatment_plan(&prescriptions),
            Some("A cada 8 horas por 5 días.".to_string())
        );
    }

    #[test]
    fn empty_plan_is_none() {
        assert_eq!(treatment_plan(&[]), None);
        assert_eq!(
            treatment_plan(&Prescription::from_columns(&["A"], &[""], &["3"])),
            None
        );
    }
}
