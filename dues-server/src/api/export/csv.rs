//! CSV report builders
//!
//! Spreadsheet-facing output: every document starts with a UTF-8 BOM so
//! Excel detects the encoding, headers and labels are accented French, and
//! the derived totals are recomputed from the raw months rather than read
//! from the stored record.

use shared::{Adherent, Cotisation, CotisationMensuelle, Month, calculations};

/// UTF-8 byte order mark, required for Excel to open accented text.
const BOM: char = '\u{FEFF}';

/// Amounts print like plain numbers: no trailing `.0` on whole values.
fn fmt_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount}")
    }
}

/// Quote a free-text cell (names can contain commas).
fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn month_header() -> String {
    Month::ALL
        .iter()
        .map(|m| m.label())
        .collect::<Vec<_>>()
        .join(",")
}

fn month_cells(record: &CotisationMensuelle) -> String {
    record
        .mois
        .values()
        .iter()
        .map(|&v| fmt_amount(v))
        .collect::<Vec<_>>()
        .join(",")
}

/// One member's yearly report: per-due-type totals, the monthly breakdown,
/// then a grand-total summary. `records` pairs each monthly record with its
/// due type name and must already be sorted by that name.
pub fn adherent_csv(
    adherent: &Adherent,
    annee: i32,
    records: &[(String, CotisationMensuelle)],
) -> String {
    let mut out = String::new();
    out.push(BOM);
    out.push_str(&format!(
        "Récapitulatif des Cotisations - {} {} - Année {}\n\n",
        adherent.prenom, adherent.nom, annee
    ));

    if records.is_empty() {
        out.push_str("Aucune cotisation trouvée pour cette année.\n");
        return out;
    }

    out.push_str("Cotisation,Moyenne Mensuelle,Total Attendu,Total Versé,Retard,Avance\n");
    for (nom, record) in records {
        let attendu = calculations::total_attendu(record.moyenne_cotisation);
        let versee = calculations::total_versee(&record.mois);
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            quote(nom),
            fmt_amount(record.moyenne_cotisation),
            fmt_amount(attendu),
            fmt_amount(versee),
            fmt_amount(calculations::retard(attendu, versee)),
            fmt_amount(calculations::avance(attendu, versee)),
        ));
    }

    out.push_str("\n\nDétail Mensuel\n");
    out.push_str(&format!("Cotisation,{}\n", month_header()));
    for (nom, record) in records {
        out.push_str(&format!("{},{}\n", quote(nom), month_cells(record)));
    }

    let mut total_attendu = 0.0;
    let mut total_versee = 0.0;
    let mut total_retard = 0.0;
    let mut total_avance = 0.0;
    for (_, record) in records {
        let attendu = calculations::total_attendu(record.moyenne_cotisation);
        let versee = calculations::total_versee(&record.mois);
        total_attendu += attendu;
        total_versee += versee;
        total_retard += calculations::retard(attendu, versee);
        total_avance += calculations::avance(attendu, versee);
    }

    out.push_str("\n\nRécapitulatif Total\n");
    out.push_str("Indicateur,Montant\n");
    out.push_str(&format!("Total Attendu,{}\n", fmt_amount(total_attendu)));
    out.push_str(&format!("Total Versé,{}\n", fmt_amount(total_versee)));
    out.push_str(&format!("Total Retard,{}\n", fmt_amount(total_retard)));
    out.push_str(&format!("Total Avance,{}\n", fmt_amount(total_avance)));
    out
}

/// One due type's yearly report: one row per member with totals and all
/// twelve months. `records` pairs each monthly record with the member's
/// "Prenom Nom" display name and must already be sorted by member name.
pub fn cotisation_csv(
    cotisation: &Cotisation,
    annee: i32,
    records: &[(String, CotisationMensuelle)],
) -> String {
    let mut out = String::new();
    out.push(BOM);
    out.push_str(&format!(
        "Cotisations {} - Année {}\n\n",
        cotisation.nom, annee
    ));

    if records.is_empty() {
        out.push_str("Aucun adhérent trouvé pour cette cotisation cette année.\n");
        return out;
    }

    out.push_str(&format!(
        "Adhérent,Moyenne de cotisation,Total attendu,Total versé,Retard,Avance,{}\n",
        month_header()
    ));
    for (adherent_nom, record) in records {
        let attendu = calculations::total_attendu(record.moyenne_cotisation);
        let versee = calculations::total_versee(&record.mois);
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            quote(adherent_nom),
            fmt_amount(record.moyenne_cotisation),
            fmt_amount(attendu),
            fmt_amount(versee),
            fmt_amount(calculations::retard(attendu, versee)),
            fmt_amount(calculations::avance(attendu, versee)),
            month_cells(record),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Mois;
    use uuid::Uuid;

    fn record(moyenne: f64, janvier: f64) -> CotisationMensuelle {
        CotisationMensuelle::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            2024,
            moyenne,
            Mois {
                janvier,
                ..Default::default()
            },
        )
    }

    #[test]
    fn amounts_drop_trailing_zero_decimals() {
        assert_eq!(fmt_amount(25.0), "25");
        assert_eq!(fmt_amount(12.5), "12.5");
        assert_eq!(fmt_amount(0.0), "0");
    }

    #[test]
    fn adherent_report_starts_with_bom_and_title() {
        let adherent = Adherent::new("Durand", "Marie");
        let csv = adherent_csv(&adherent, 2024, &[("Annuelle".into(), record(100.0, 50.0))]);
        assert!(csv.starts_with('\u{FEFF}'));
        assert!(csv.contains("Récapitulatif des Cotisations - Marie Durand - Année 2024"));
        assert!(csv.contains("\"Annuelle\",100,1200,50,1150,0\n"));
        assert!(csv.contains("Détail Mensuel"));
        assert!(csv.contains("Total Retard,1150\n"));
    }

    #[test]
    fn adherent_report_without_records_says_so() {
        let adherent = Adherent::new("Durand", "Marie");
        let csv = adherent_csv(&adherent, 2024, &[]);
        assert!(csv.contains("Aucune cotisation trouvée pour cette année."));
        assert!(!csv.contains("Récapitulatif Total"));
    }

    #[test]
    fn cotisation_report_lists_one_row_per_member() {
        let cotisation = Cotisation::new("Caisse commune", None);
        let csv = cotisation_csv(
            &cotisation,
            2024,
            &[("Marie Durand".into(), record(50.0, 50.0))],
        );
        assert!(csv.starts_with('\u{FEFF}'));
        assert!(csv.contains("Cotisations Caisse commune - Année 2024"));
        assert!(csv.contains("\"Marie Durand\",50,600,50,550,0,50,0,0,0,0,0,0,0,0,0,0,0\n"));
    }
}
