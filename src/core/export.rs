//! CSV rendering for the participant export.
//!
//! Semicolon-delimited on purpose: the target audience opens these files in
//! German-locale spreadsheet software, where `;` is the expected separator.

use chrono::{DateTime, Utc};

use crate::core::participants::Participant;

pub const DELIMITER: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportField {
    Name,
    Email,
    Date,
    Test,
}

/// Parses the `fields` query parameter. Unknown names are ignored,
/// duplicates collapse; an absent or empty parameter means name + email.
pub fn parse_fields(raw: Option<&str>) -> Vec<ExportField> {
    let mut fields = Vec::new();
    if let Some(raw) = raw {
        for name in raw.split(',') {
            let field = match name.trim() {
                "name" => Some(ExportField::Name),
                "email" => Some(ExportField::Email),
                "date" => Some(ExportField::Date),
                "test" => Some(ExportField::Test),
                _ => None,
            };
            if let Some(f) = field {
                if !fields.contains(&f) {
                    fields.push(f);
                }
            }
        }
    }
    if fields.is_empty() {
        fields = vec![ExportField::Name, ExportField::Email];
    }
    fields
}

pub fn render_csv(rows: &[Participant], fields: &[ExportField]) -> String {
    let headers: Vec<&str> = fields
        .iter()
        .map(|f| match f {
            ExportField::Name => "Name",
            ExportField::Email => "Email",
            ExportField::Date => "Datum",
            ExportField::Test => "Testdaten",
        })
        .collect();
    let mut csv = headers.join(&DELIMITER.to_string());
    csv.push('\n');

    let body: Vec<String> = rows
        .iter()
        .map(|p| {
            let values: Vec<String> = fields
                .iter()
                .map(|f| match f {
                    ExportField::Name => format!("{} {}", p.firstname, p.lastname),
                    ExportField::Email => p.email.clone(),
                    ExportField::Date => p.created_at.format("%Y-%m-%d").to_string(),
                    ExportField::Test => if p.is_test { "Ja" } else { "Nein" }.to_string(),
                })
                .collect();
            values.join(&DELIMITER.to_string())
        })
        .collect();
    csv.push_str(&body.join("\n"));
    csv
}

/// A pure name+email export is an address list; everything else is a plain
/// participant dump.
pub fn filename(fields: &[ExportField], now: DateTime<Utc>) -> String {
    let base = if fields.contains(&ExportField::Name) && fields.contains(&ExportField::Email) {
        "email-kontakte"
    } else {
        "teilnehmer"
    };
    format!("{}-{}.csv", base, now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn participant(first: &str, last: &str, email: &str, is_test: bool) -> Participant {
        Participant {
            id: "x".to_string(),
            firstname: first.to_string(),
            lastname: last.to_string(),
            email: email.to_string(),
            is_test,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn header_only_on_empty_store() {
        let csv = render_csv(&[], &parse_fields(None));
        assert_eq!(csv, "Name;Email\n");
    }

    #[test]
    fn n_rows_give_n_plus_one_lines() {
        let rows = vec![
            participant("Anna", "Becker", "anna@example.com", false),
            participant("Bernd", "Adler", "bernd@example.com", true),
        ];
        let csv = render_csv(&rows, &parse_fields(Some("name,email,date,test")));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Name;Email;Datum;Testdaten");
        assert_eq!(lines[1], "Anna Becker;anna@example.com;2026-03-01;Nein");
        assert_eq!(lines[2], "Bernd Adler;bernd@example.com;2026-03-01;Ja");
    }

    #[test]
    fn delimiter_stays_semicolon_with_comma_content() {
        let rows = vec![participant("Anna, Maria", "Becker", "anna@example.com", false)];
        let csv = render_csv(&rows, &parse_fields(Some("name,email")));
        assert!(csv.lines().nth(1).unwrap().contains("Anna, Maria Becker;"));
    }

    #[test]
    fn unknown_fields_ignored_and_default_applied() {
        assert_eq!(
            parse_fields(Some("bogus,email")),
            vec![ExportField::Email]
        );
        assert_eq!(
            parse_fields(Some("")),
            vec![ExportField::Name, ExportField::Email]
        );
    }

    #[test]
    fn filename_depends_on_fields() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(
            filename(&[ExportField::Name, ExportField::Email], now),
            "email-kontakte-2026-03-01.csv"
        );
        assert_eq!(
            filename(&[ExportField::Email], now),
            "teilnehmer-2026-03-01.csv"
        );
    }
}
