//! Consistency rules for sectoral gross/net demand pairs.

use demeter_grid::Grid;

use crate::error::DemandError;

/// Applies the sectoral consistency rules to a (gross, net) demand pair:
/// net demand is floored at zero, and gross demand is at least the net
/// demand.
///
/// Applied after every read and after every splice of a sectoral pair, so a
/// delta correction can never push net below zero or gross below net.
///
/// # Errors
///
/// Returns [`DemandError::Shape`] if the two grids disagree on the domain
/// shape.
pub fn sectoral_pair(gross: &Grid, net: &Grid) -> Result<(Grid, Grid), DemandError> {
    let net = net.clamp_min(0.0);
    let gross = gross.maximum(&net)?;
    Ok((gross, net))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_floored_at_zero() {
        let gross = Grid::constant(1, 2, 1.0);
        let net = Grid::new(1, 2, vec![-0.5, 0.3]).unwrap();
        let (_, net) = sectoral_pair(&gross, &net).unwrap();
        assert_eq!(net.get(0, 0), Some(0.0));
        assert_eq!(net.get(0, 1), Some(0.3));
    }

    #[test]
    fn gross_lifted_to_net() {
        let gross = Grid::new(1, 2, vec![0.2, 1.0]).unwrap();
        let net = Grid::new(1, 2, vec![0.5, 0.5]).unwrap();
        let (gross, net) = sectoral_pair(&gross, &net).unwrap();
        assert_eq!(gross.get(0, 0), Some(0.5));
        assert_eq!(gross.get(0, 1), Some(1.0));
        assert_eq!(net.get(0, 0), Some(0.5));
    }

    #[test]
    fn invariant_holds_after_application() {
        let gross = Grid::new(1, 3, vec![-1.0, 0.1, 2.0]).unwrap();
        let net = Grid::new(1, 3, vec![-2.0, 0.4, 1.0]).unwrap();
        let (gross, net) = sectoral_pair(&gross, &net).unwrap();
        for col in 0..3 {
            let g = gross.get(0, col).unwrap();
            let n = net.get(0, col).unwrap();
            assert!(g >= n, "gross {g} < net {n} at col {col}");
            assert!(n >= 0.0);
        }
    }

    #[test]
    fn shape_mismatch_rejected() {
        let gross = Grid::constant(1, 2, 1.0);
        let net = Grid::constant(2, 1, 1.0);
        assert!(matches!(
            sectoral_pair(&gross, &net),
            Err(DemandError::Shape { .. })
        ));
    }
}
