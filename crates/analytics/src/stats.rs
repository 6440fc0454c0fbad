use crate::error::AnalyticsError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// The `q`-th quantile of `values`, interpolating linearly between the two
/// nearest ranks. Returns `Ok(None)` for an empty sample.
pub fn quantile(values: &[Decimal], q: Decimal) -> Result<Option<Decimal>, AnalyticsError> {
    if q < Decimal::ZERO || q > Decimal::ONE {
        return Err(AnalyticsError::invalid("quantile", format!("{q} is outside [0, 1]")));
    }
    if values.is_empty() {
        return Ok(None);
    }

    let mut sorted = values.to_vec();
    sorted.sort();

    let position = q * Decimal::from(sorted.len() - 1);
    let lower = position.floor();
    let fraction = position - lower;
    let index = lower
        .to_usize()
        .ok_or_else(|| AnalyticsError::invalid("quantile", "rank does not fit in usize"))?;

    let value = match sorted.get(index + 1) {
        Some(upper) if !fraction.is_zero() => upper
            .checked_sub(sorted[index])
            .and_then(|step| step.checked_mul(fraction))
            .and_then(|offset| sorted[index].checked_add(offset))
            .ok_or_else(|| AnalyticsError::overflow("quantile"))?,
        _ => sorted[index],
    };
    Ok(Some(value))
}

/// The median of `values`, or `None` for an empty sample.
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let (low, high) = (sorted[mid - 1], sorted[mid]);
        // The sum only overflows when both share a sign, and then the
        // difference cannot.
        Some(
            low.checked_add(high)
                .map_or_else(|| low + (high - low) / Decimal::TWO, |sum| sum / Decimal::TWO),
        )
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn median_of_odd_and_even_samples() {
        assert_eq!(median(&[dec!(3), dec!(1), dec!(2)]), Some(dec!(2)));
        assert_eq!(median(&[dec!(4), dec!(1), dec!(3), dec!(2)]), Some(dec!(2.5)));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn quantile_interpolates_between_ranks() {
        let values = [dec!(10), dec!(20), dec!(30), dec!(40)];
        assert_eq!(quantile(&values, dec!(0)).unwrap(), Some(dec!(10)));
        assert_eq!(quantile(&values, dec!(1)).unwrap(), Some(dec!(40)));
        assert_eq!(quantile(&values, dec!(0.25)).unwrap(), Some(dec!(17.5)));
        assert_eq!(quantile(&values, dec!(0.5)).unwrap(), median(&values));
        assert_eq!(quantile(&values, dec!(0.75)).unwrap(), Some(dec!(32.5)));
    }

    #[test]
    fn median_of_extreme_values_does_not_overflow() {
        assert_eq!(median(&[Decimal::MAX, Decimal::MAX]), Some(Decimal::MAX));
    }

    #[test]
    fn quantile_across_the_full_decimal_range_is_rejected() {
        assert!(matches!(
            quantile(&[Decimal::MIN, Decimal::MAX], dec!(0.5)),
            Err(AnalyticsError::InvalidInput(..))
        ));
    }

    #[test]
    fn quantile_of_single_value_and_empty_sample() {
        assert_eq!(quantile(&[dec!(7)], dec!(0.9)).unwrap(), Some(dec!(7)));
        assert_eq!(quantile(&[], dec!(0.5)).unwrap(), None);
    }

    #[test]
    fn quantile_outside_unit_interval_is_rejected() {
        assert!(matches!(
            quantile(&[dec!(1)], dec!(1.5)),
            Err(AnalyticsError::InvalidInput(..))
        ));
    }
}
