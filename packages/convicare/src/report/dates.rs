use chrono::{Datelike, NaiveDate, Weekday};

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

fn weekday(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// `5 de marzo de 2025`
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// `miércoles, 5 de marzo de 2025`
pub fn long_date_with_weekday(date: NaiveDate) -> String {
    format!("{}, {}", weekday(date.weekday()), long_date(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_are_spelled_in_spanish() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(long_date(date), "5 de marzo de 2025");
        assert_eq!(long_date_with_weekday(date), "miércoles, 5 de marzo de 2025");

        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(long_date_with_weekday(date), "domingo, 1 de diciembre de 2024");
    }
}
