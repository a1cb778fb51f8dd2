//! The water-balance combination.

use demeter_grid::Grid;

use crate::error::DemandError;

/// Daily crop water requirement: the sum of `kc x et0 x area` over crop
/// types.
///
/// # Errors
///
/// Returns [`DemandError::Shape`] if any input disagrees on the domain
/// shape, or [`DemandError::NegativeArea`] if an area grid holds a negative
/// value.
pub fn crop_requirement(et0: &Grid, terms: &[(&Grid, &Grid)]) -> Result<Grid, DemandError> {
    let mut total = Grid::constant_like(et0, 0.0);
    for (kc, area) in terms {
        ensure_nonnegative_area(area)?;
        let term = kc.mul(et0)?.mul(area)?;
        total = total.add(&term)?;
    }
    Ok(total)
}

/// Irrigation water requirement: the crop requirement corrected for the
/// field application efficiency.
///
/// # Errors
///
/// Returns [`DemandError::NonPositiveEfficiency`] if any cell of
/// `efficiency` that meets a valid requirement cell is not strictly
/// positive, or [`DemandError::Shape`] on shape disagreement.
pub fn irrigation_requirement(
    crop_requirement: &Grid,
    efficiency: &Grid,
) -> Result<Grid, DemandError> {
    check_positive_efficiency(crop_requirement, efficiency)?;
    Ok(crop_requirement.div(efficiency)?)
}

/// The unmet part of the requirement: `max(0, requirement - supply)`.
///
/// The floor at zero is intentional: supply exceeding the requirement is
/// expected physical noise, not an error.
pub fn demand_gap(requirement: &Grid, supply: &Grid) -> Result<Grid, DemandError> {
    Ok(requirement.sub(supply)?.clamp_min(0.0))
}

/// The estimated total demand: what was withdrawn plus what was still
/// missing.
pub fn estimate_demand(withdrawal: &Grid, gap: &Grid) -> Result<Grid, DemandError> {
    Ok(withdrawal.add(gap)?)
}

/// A 0/1 mask marking cells inside the growing season, where the crop
/// coefficient exceeds `kc_min`.
///
/// Masks for several crop types combine with [`Grid::maximum`].
pub fn growing_season_mask(kc: &Grid, kc_min: f64) -> Grid {
    kc.map(|v| if v > kc_min { 1.0 } else { 0.0 })
}

/// Checks that an area grid holds no negative value.
///
/// # Errors
///
/// Returns [`DemandError::NegativeArea`] naming the first offending cell.
pub fn ensure_nonnegative_area(area: &Grid) -> Result<(), DemandError> {
    for row in 0..area.nrows() {
        for col in 0..area.ncols() {
            let v = area.raw(row, col);
            if !Grid::is_missing(v) && v < 0.0 {
                return Err(DemandError::NegativeArea { row, col, value: v });
            }
        }
    }
    Ok(())
}

fn check_positive_efficiency(requirement: &Grid, efficiency: &Grid) -> Result<(), DemandError> {
    if requirement.shape() != efficiency.shape() {
        // let the division surface the shape error with full context
        return Ok(());
    }
    for row in 0..efficiency.nrows() {
        for col in 0..efficiency.ncols() {
            if requirement.get(row, col).is_none() {
                continue;
            }
            let v = efficiency.raw(row, col);
            if !Grid::is_missing(v) && v <= 0.0 {
                return Err(DemandError::NonPositiveEfficiency { row, col, value: v });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_requirement_sums_types() {
        let et0 = Grid::constant(1, 2, 2.0);
        let kc_a = Grid::constant(1, 2, 0.5);
        let area_a = Grid::constant(1, 2, 10.0);
        let kc_b = Grid::constant(1, 2, 1.0);
        let area_b = Grid::constant(1, 2, 3.0);

        let req = crop_requirement(&et0, &[(&kc_a, &area_a), (&kc_b, &area_b)]).unwrap();
        // 0.5*2*10 + 1*2*3 = 16
        assert_eq!(req.get(0, 0), Some(16.0));
    }

    #[test]
    fn crop_requirement_no_types_is_zero() {
        let et0 = Grid::constant(2, 2, 3.0);
        let req = crop_requirement(&et0, &[]).unwrap();
        assert_eq!(req.get(1, 1), Some(0.0));
    }

    #[test]
    fn crop_requirement_rejects_negative_area() {
        let et0 = Grid::constant(1, 2, 2.0);
        let kc = Grid::constant(1, 2, 0.5);
        let area = Grid::new(1, 2, vec![10.0, -1.0]).unwrap();
        let err = crop_requirement(&et0, &[(&kc, &area)]).unwrap_err();
        assert_eq!(
            err,
            DemandError::NegativeArea {
                row: 0,
                col: 1,
                value: -1.0
            }
        );
    }

    #[test]
    fn irrigation_requirement_divides() {
        let req = Grid::constant(1, 2, 10.0);
        let eff = Grid::constant(1, 2, 0.5);
        let irr = irrigation_requirement(&req, &eff).unwrap();
        assert_eq!(irr.get(0, 0), Some(20.0));
    }

    #[test]
    fn irrigation_requirement_rejects_zero_efficiency() {
        let req = Grid::constant(1, 2, 10.0);
        let eff = Grid::new(1, 2, vec![0.5, 0.0]).unwrap();
        let err = irrigation_requirement(&req, &eff).unwrap_err();
        assert_eq!(
            err,
            DemandError::NonPositiveEfficiency {
                row: 0,
                col: 1,
                value: 0.0
            }
        );
    }

    #[test]
    fn irrigation_requirement_rejects_negative_efficiency() {
        let req = Grid::constant(1, 1, 10.0);
        let eff = Grid::constant(1, 1, -0.2);
        assert!(matches!(
            irrigation_requirement(&req, &eff),
            Err(DemandError::NonPositiveEfficiency { .. })
        ));
    }

    #[test]
    fn zero_efficiency_outside_requirement_mask_is_tolerated() {
        // the requirement is missing over the ocean; a zero there is not a
        // data-integrity violation
        let req = Grid::new(1, 2, vec![10.0, f64::NAN]).unwrap();
        let eff = Grid::new(1, 2, vec![0.5, 0.0]).unwrap();
        let irr = irrigation_requirement(&req, &eff).unwrap();
        assert_eq!(irr.get(0, 0), Some(20.0));
        assert_eq!(irr.get(0, 1), None);
    }

    #[test]
    fn demand_gap_floors_at_zero() {
        let req = Grid::new(1, 2, vec![10.0, 5.0]).unwrap();
        let supply = Grid::new(1, 2, vec![4.0, 8.0]).unwrap();
        let gap = demand_gap(&req, &supply).unwrap();
        assert_eq!(gap.get(0, 0), Some(6.0));
        assert_eq!(gap.get(0, 1), Some(0.0));
    }

    #[test]
    fn estimate_demand_adds_withdrawal_and_gap() {
        let withdrawal = Grid::constant(1, 1, 7.0);
        let gap = Grid::constant(1, 1, 2.0);
        let demand = estimate_demand(&withdrawal, &gap).unwrap();
        assert_eq!(demand.get(0, 0), Some(9.0));
    }

    #[test]
    fn growing_season_mask_thresholds() {
        let kc = Grid::new(1, 3, vec![0.1, 0.2, 0.9]).unwrap();
        let mask = growing_season_mask(&kc, 0.2);
        assert_eq!(mask.get(0, 0), Some(0.0));
        // exactly kc_min is not growing
        assert_eq!(mask.get(0, 1), Some(0.0));
        assert_eq!(mask.get(0, 2), Some(1.0));
    }

    #[test]
    fn growing_season_masks_combine_with_maximum() {
        let paddy = Grid::new(1, 2, vec![0.9, 0.1]).unwrap();
        let nonpaddy = Grid::new(1, 2, vec![0.1, 0.1]).unwrap();
        let combined = growing_season_mask(&paddy, 0.2)
            .maximum(&growing_season_mask(&nonpaddy, 0.2))
            .unwrap();
        assert_eq!(combined.get(0, 0), Some(1.0));
        assert_eq!(combined.get(0, 1), Some(0.0));
    }
}
