//! Reglas puras de reservas
//!
//! Solapamiento de rangos de fechas y cálculo de precio total.
//! La consulta SQL de disponibilidad en `BookingRepository` implementa
//! exactamente el mismo predicado que `ranges_overlap`.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Dos rangos inclusivos `[a_start, a_end]` y `[b_start, b_end]` se solapan
/// iff `a_start <= b_end && a_end >= b_start`.
///
/// Ambos extremos cuentan como días ocupados: una reserva que termina el
/// día D bloquea otra que empieza el día D.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Cantidad de días de un rango inclusivo: `(end - start) + 1`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Precio total de una reserva: `price_per_day * días inclusivos + deposit`.
pub fn compute_total_price(
    price_per_day: Decimal,
    deposit: Decimal,
    start: NaiveDate,
    end: NaiveDate,
) -> Decimal {
    price_per_day * Decimal::from(inclusive_days(start, end)) + deposit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_disjoint_ranges_do_not_overlap() {
        assert!(!ranges_overlap(d(2025, 1, 10), d(2025, 1, 15), d(2025, 1, 16), d(2025, 1, 18)));
        assert!(!ranges_overlap(d(2025, 1, 16), d(2025, 1, 18), d(2025, 1, 10), d(2025, 1, 15)));
    }

    #[test]
    fn test_contained_range_overlaps() {
        assert!(ranges_overlap(d(2025, 1, 10), d(2025, 1, 15), d(2025, 1, 12), d(2025, 1, 13)));
    }

    #[test]
    fn test_identical_range_overlaps() {
        assert!(ranges_overlap(d(2025, 1, 10), d(2025, 1, 15), d(2025, 1, 10), d(2025, 1, 15)));
    }

    #[test]
    fn test_adjacent_boundary_is_a_conflict() {
        // Reserva que termina el 15 bloquea una que empieza el 15
        assert!(ranges_overlap(d(2025, 1, 10), d(2025, 1, 15), d(2025, 1, 15), d(2025, 1, 17)));
        // El día siguiente ya está libre
        assert!(!ranges_overlap(d(2025, 1, 10), d(2025, 1, 15), d(2025, 1, 16), d(2025, 1, 18)));
    }

    #[test]
    fn test_inclusive_days() {
        assert_eq!(inclusive_days(d(2025, 2, 1), d(2025, 2, 3)), 3);
        assert_eq!(inclusive_days(d(2025, 2, 1), d(2025, 2, 1)), 1);
    }

    #[test]
    fn test_total_price_without_deposit() {
        // 10/día, sin depósito, 3 días inclusivos -> 30
        let total = compute_total_price(
            Decimal::from(10),
            Decimal::ZERO,
            d(2025, 2, 1),
            d(2025, 2, 3),
        );
        assert_eq!(total, Decimal::from(30));
    }

    #[test]
    fn test_total_price_with_deposit() {
        // 20/día + 10 de depósito, 3 días -> 70
        let total = compute_total_price(
            Decimal::from(20),
            Decimal::from(10),
            d(2025, 2, 1),
            d(2025, 2, 3),
        );
        assert_eq!(total, Decimal::from(70));
    }

    #[test]
    fn test_total_price_single_day() {
        let total = compute_total_price(
            Decimal::new(1550, 2), // 15.50
            Decimal::from(5),
            d(2025, 3, 1),
            d(2025, 3, 1),
        );
        assert_eq!(total, Decimal::new(2050, 2));
    }
}
