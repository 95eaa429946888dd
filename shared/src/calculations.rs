//! Dues arithmetic.
//!
//! Pure functions computing the expected annual total, the amount actually
//! paid, the shortfall (retard) and the surplus (avance) for one monthly
//! payment record, plus the accounting-identity validation applied before
//! any record is persisted.

use thiserror::Error;

use crate::models::{CotisationMensuelle, Mois, Month};

/// Tolerance for the accounting identity check, in currency units.
pub const IDENTITY_TOLERANCE: f64 = 0.01;

/// Validation failure carrying one human-readable message per broken rule.
#[derive(Debug, Clone, Error)]
#[error("invalid monthly record: {}", errors.join("; "))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

/// Expected annual total for a given monthly average contribution.
pub fn total_attendu(moyenne_cotisation: f64) -> f64 {
    moyenne_cotisation * 12.0
}

/// Total actually paid over the twelve months.
pub fn total_versee(mois: &Mois) -> f64 {
    mois.values().iter().sum()
}

/// Amount still owed: `max(0, attendu - versee)`.
pub fn retard(total_attendu: f64, total_versee: f64) -> f64 {
    (total_attendu - total_versee).max(0.0)
}

/// Amount overpaid: `max(0, versee - attendu)`.
pub fn avance(total_attendu: f64, total_versee: f64) -> f64 {
    (total_versee - total_attendu).max(0.0)
}

/// Check a record against the business rules.
///
/// Collects every broken rule rather than stopping at the first:
/// - each monthly amount must be >= 0,
/// - `totalVersee + retard - avance` must equal `totalAttendu` within
///   [`IDENTITY_TOLERANCE`],
/// - `retard` and `avance` must not both be positive (structurally impossible
///   when the totals come from [`CotisationMensuelle::recompute`], checked
///   anyway).
pub fn validate(record: &CotisationMensuelle) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    for month in Month::ALL {
        if record.mois.get(month) < 0.0 {
            errors.push(format!(
                "Le montant pour {} ne peut pas être négatif",
                month.key()
            ));
        }
    }

    let identite = record.total_versee + record.retard - record.avance;
    if (identite - record.total_attendu).abs() > IDENTITY_TOLERANCE {
        errors.push(
            "Identité comptable non respectée : totalVersee + retard - avance ≠ totalAttendu"
                .to_string(),
        );
    }

    if record.retard > 0.0 && record.avance > 0.0 {
        errors.push("Retard et avance ne peuvent pas être tous les deux positifs".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { errors })
    }
}

/// Best-effort guess of the monthly average from the non-zero payments.
///
/// Heuristic only, not used when computing totals: the GCD of the non-zero
/// amounts (reduced over cents to stay exact on f64 inputs). Returns 0 when
/// nothing was paid and the single amount when only one month was paid.
pub fn deduce_moyenne(mois: &Mois) -> f64 {
    let cents: Vec<i64> = mois
        .values()
        .iter()
        .filter(|amount| **amount > 0.0)
        .map(|amount| (amount * 100.0).round() as i64)
        .collect();

    match cents.as_slice() {
        [] => 0.0,
        [single] => *single as f64 / 100.0,
        [first, rest @ ..] => {
            let g = rest.iter().fold(*first, |acc, c| gcd(acc, *c));
            g as f64 / 100.0
        }
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(moyenne: f64, mois: Mois) -> CotisationMensuelle {
        CotisationMensuelle::new(Uuid::new_v4(), Uuid::new_v4(), 2024, moyenne, mois)
    }

    #[test]
    fn nothing_paid_means_full_shortfall() {
        let r = record(100.0, Mois::default());
        assert_eq!(r.total_attendu, 1200.0);
        assert_eq!(r.total_versee, 0.0);
        assert_eq!(r.retard, 1200.0);
        assert_eq!(r.avance, 0.0);
        assert!(validate(&r).is_ok());
    }

    #[test]
    fn overpayment_becomes_surplus() {
        let mois = Mois {
            janvier: 700.0,
            ..Default::default()
        };
        let r = record(50.0, mois);
        assert_eq!(r.total_attendu, 600.0);
        assert_eq!(r.total_versee, 700.0);
        assert_eq!(r.retard, 0.0);
        assert_eq!(r.avance, 100.0);
        assert!(validate(&r).is_ok());
    }

    #[test]
    fn accounting_identity_holds_for_computed_totals() {
        let cases = [
            (0.0, Mois::default()),
            (33.33, Mois { mars: 12.5, aout: 99.99, ..Default::default() }),
            (
                75.0,
                Mois {
                    janvier: 75.0,
                    fevrier: 75.0,
                    mars: 75.0,
                    avril: 75.0,
                    mai: 75.0,
                    juin: 75.0,
                    juillet: 75.0,
                    aout: 75.0,
                    septembre: 75.0,
                    octobre: 75.0,
                    novembre: 75.0,
                    decembre: 75.0,
                },
            ),
        ];
        for (moyenne, mois) in cases {
            let r = record(moyenne, mois);
            let identite = r.total_versee + r.retard - r.avance;
            assert!(
                (identite - r.total_attendu).abs() <= IDENTITY_TOLERANCE,
                "identity broken for moyenne {moyenne}"
            );
            // Shortfall and surplus are mutually exclusive.
            assert!(!(r.retard > 0.0 && r.avance > 0.0));
        }
    }

    #[test]
    fn negative_month_is_rejected_naming_the_month() {
        let mois = Mois {
            fevrier: -10.0,
            ..Default::default()
        };
        let r = record(50.0, mois);
        let err = validate(&r).unwrap_err();
        assert!(err.errors.iter().any(|m| m.contains("fevrier")));
    }

    #[test]
    fn tampered_totals_break_the_identity() {
        let mut r = record(100.0, Mois::default());
        r.total_versee = 500.0;
        let err = validate(&r).unwrap_err();
        assert!(err.errors.iter().any(|m| m.contains("Identité comptable")));
    }

    #[test]
    fn both_positive_is_rejected() {
        let mut r = record(100.0, Mois::default());
        r.retard = 10.0;
        r.avance = 10.0;
        r.total_versee = r.total_attendu;
        let err = validate(&r).unwrap_err();
        assert!(
            err.errors
                .iter()
                .any(|m| m.contains("tous les deux positifs"))
        );
    }

    #[test]
    fn deduced_average_is_gcd_of_nonzero_amounts() {
        assert_eq!(deduce_moyenne(&Mois::default()), 0.0);

        let single = Mois {
            mai: 75.0,
            ..Default::default()
        };
        assert_eq!(deduce_moyenne(&single), 75.0);

        let multiple = Mois {
            janvier: 30.0,
            juin: 45.0,
            decembre: 15.0,
            ..Default::default()
        };
        assert_eq!(deduce_moyenne(&multiple), 15.0);

        let cents = Mois {
            janvier: 12.5,
            fevrier: 25.0,
            ..Default::default()
        };
        assert_eq!(deduce_moyenne(&cents), 12.5);
    }
}
