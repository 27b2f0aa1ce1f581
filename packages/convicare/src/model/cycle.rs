use std::fmt::Display;

const SEPARATOR: char = 'X';

///
/// Menstrual cycle, stored as `"<c1>X<c2>"`
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cycle {
    pub first: Option<String>,
    pub second: Option<String>,
}

impl Cycle {
    pub fn new(first: Option<String>, second: Option<String>) -> Self {
        Cycle {
            first: first.filter(|s| !s.trim().is_empty()),
            second: second.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }

    pub fn to_stored(&self) -> String {
        format!(
            "{}{SEPARATOR}{}",
            self.first.as_deref().unwrap_or(""),
            self.second.as_deref().unwrap_or("")
        )
    }

    pub fn from_stored(stored: Option<&str>) -> Option<Cycle> {
        let stored = stored?;
        let (first, second) = stored.split_once(SEPARATOR)?;
        Some(Cycle::new(Some(first.to_string()), Some(second.to_string())))
    }
}

impl Display for Cycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_stored())
    }
}
