use std::fmt::Display;

const STORED_SEPARATOR: &str = ", ";

///
/// A value that can be chosen in a multi-value form field.
///
pub trait Choice: Clone + PartialEq {
    /// Parse a submitted or stored value
    fn parse(value: &str) -> Self;

    /// Text written to the database and shown to users
    fn label(&self) -> &str;
}

///
/// Ordered set of choices.
///
/// Forms submit one value or many, the database stores a single `", "`-joined string.
/// The joined string only exists at the persistence edge.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Selection<T> {
    items: Vec<T>,
}

impl<T: Choice> Selection<T> {
    pub fn new() -> Self {
        Selection { items: Vec::new() }
    }

    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut selection = Selection::new();
        for value in values {
            let value = value.trim();
            if !value.is_empty() {
                selection.insert(T::parse(value));
            }
        }
        selection
    }

    /// Parses the joined database form. `None` and empty strings are an empty selection.
    pub fn from_stored(stored: Option<&str>) -> Self {
        match stored {
            Some(stored) => Selection::from_values(stored.split(',')),
            None => Selection::new(),
        }
    }

    pub fn to_stored(&self) -> String {
        self.items
            .iter()
            .map(|item| item.label())
            .collect::<Vec<_>>()
            .join(STORED_SEPARATOR)
    }

    /// Inserts the choice unless already present, keeping first-seen order
    pub fn insert(&mut self, item: T) {
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Choice> Default for Selection<T> {
    fn default() -> Self {
        Selection::new()
    }
}

impl<T: Choice> Display for Selection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_stored())
    }
}

///
/// Clinic services a visit can be assigned to.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Service {
    MedicinaGeneral,
    Odontologia,
    Optometria,
    HigieneOral,
    Nutricion,
    Psicologia,
    Other(String),
}

impl Service {
    pub fn known() -> [Service; 6] {
        [
            Service::MedicinaGeneral,
            Service::Odontologia,
            Service::Optometria,
            Service::HigieneOral,
            Service::Nutricion,
            Service::Psicologia,
        ]
    }

    /// Key used in report URLs, eg `/reporte/higiene_oral`
    pub fn key(&self) -> &str {
        match self {
            Service::MedicinaGeneral => "medicina_general",
            Service::Odontologia => "odontologia",
            Service::Optometria => "optometria",
            Service::HigieneOral => "higiene_oral",
            Service::Nutricion => "nutricion",
            Service::Psicologia => "psicologia",
            Service::Other(other) => other,
        }
    }

    pub fn from_key(key: &str) -> Option<Service> {
        Service::known().into_iter().find(|s| s.key() == key)
    }

    /// Display label for a report key, falling back to the key itself
    pub fn label_for_key(key: &str) -> String {
        match Service::from_key(key) {
            Some(service) => service.label().to_string(),
            None => key.to_string(),
        }
    }
}

impl Choice for Service {
    fn parse(value: &str) -> Self {
        let value = value.trim();
        Service::known()
            .into_iter()
            .find(|s| s.key() == value || s.label().eq_ignore_ascii_case(value))
            .unwrap_or_else(|| Service::Other(value.to_string()))
    }

    fn label(&self) -> &str {
        match self {
            Service::MedicinaGeneral => "Medicina General",
            Service::Odontologia => "Odontología",
            Service::Optometria => "Optometría",
            Service::HigieneOral => "Higiene Oral",
            Service::Nutricion => "Nutrición",
            Service::Psicologia => "Psicología",
            Service::Other(other) => other,
        }
    }
}

impl Selection<Service> {
    /// Report filter: case-insensitive substring of the stored `", "`-joined labels
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        !needle.is_empty() && self.to_stored().to_lowercase().contains(&needle)
    }
}

///
/// Attention level of a pending visit.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attention {
    Prioritaria,
    General,
    Other(String),
}

impl Choice for Attention {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "Prioritaria" => Attention::Prioritaria,
            "General" => Attention::General,
            other => Attention::Other(other.to_string()),
        }
    }

    fn label(&self) -> &str {
        match self {
            Attention::Prioritaria => "Prioritaria",
            Attention::General => "General",
            Attention::Other(other) => other,
        }
    }
}

impl Selection<Attention> {
    ///
    /// Sort tier: a single `Prioritaria` first, a single `General` second, anything else last.
    ///
    pub fn tier(&self) -> u8 {
        match self.as_slice() {
            [Attention::Prioritaria] => 1,
            [Attention::General] => 2,
            _ => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn services_accept_keys_and_labels() {
        let services = Selection::<Service>::from_values(["odontologia", "Nutrición", "yoga"]);

        assert_eq!(
            services.as_slice(),
            &[
                Service::Odontologia,
                Service::Nutricion,
                Service::Other("yoga".to_string())
            ]
        );
        assert_eq!(services.to_stored(), "Odontología, Nutrición, yoga");
    }

    #[test]
    fn selection_ignores_blanks_and_duplicates() {
        let services = Selection::<Service>::from_values(["", "psicologia", " ", "psicologia"]);
        assert_eq!(services.len(), 1);
        assert_eq!(services.to_stored(), "Psicología");
    }

    #[test]
    fn stored_selection_round_trips_through_labels() {
        let stored = Some("Odontología, Nutrición");
        let services = Selection::<Service>::from_stored(stored);

        assert!(services.contains(&Service::Odontologia));
        assert!(services.contains(&Service::Nutricion));
        assert_eq!(services.to_stored(), "Odontología, Nutrición");

        assert!(Selection::<Service>::from_stored(None).is_empty());
        assert!(Selection::<Service>::from_stored(Some("")).is_empty());
    }

    #[test]
    fn service_match_is_case_insensitive_substring() {
        let services = Selection::<Service>::from_stored(Some("Odontología, Nutrición"));

        assert!(services.matches("odonto"));
        assert!(services.matches("NUTRI"));
        assert!(services.matches("Odontología"));
        assert!(!services.matches("psico"));
        assert!(!services.matches(""));
        assert!(services.matches("ía, nut"));
    }

    #[test]
    fn report_keys_map_to_labels() {
        assert_eq!(Service::label_for_key("higiene_oral"), "Higiene Oral");
        assert_eq!(Service::label_for_key("medicina_general"), "Medicina General");
        assert_eq!(Service::label_for_key("urgencias"), "urgencias");
    }

    #[test]
    fn attention_tiers() {
        let tier = |values: &[&str]| Selection::<Attention>::from_values(values.iter().copied()).tier();

        assert_eq!(tier(&["Prioritaria"]), 1);
        assert_eq!(tier(&["General"]), 2);
        assert_eq!(tier(&["Urgencias"]), 3);
        assert_eq!(tier(&[]), 3);
        assert_eq!(tier(&["Prioritaria", "General"]), 3);
    }
}
