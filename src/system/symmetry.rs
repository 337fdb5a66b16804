//! Discrete translational symmetry of a lead.

use crate::errors::ModelError;

use super::Site;

/// One-dimensional translational symmetry, expressed in tag space.
///
/// `act(n, s)` translates `s` by `n` periods, `which(s)` tells which period
/// (fundamental-domain copy) `s` lies in. Together they satisfy
/// `which(act(n, s)) == which(s) + n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationalSymmetry {
    period: Vec<i64>,
    norm: i64,
}

impl TranslationalSymmetry {
    pub fn new(period: impl Into<Vec<i64>>) -> Result<Self, ModelError> {
        let period = period.into();
        let norm: i64 = period.iter().map(|p| p * p).sum();
        if norm == 0 {
            return Err(ModelError::ZeroPeriod);
        }
        Ok(TranslationalSymmetry { period, norm })
    }

    pub fn period(&self) -> &[i64] {
        &self.period
    }

    /// Reject sites whose tags cannot be translated by this period
    pub fn check(&self, site: &Site) -> Result<(), ModelError> {
        if site.tag().len() != self.period.len() {
            return Err(ModelError::DimensionMismatch {
                tag: site.tag().len(),
                period: self.period.len(),
            });
        }
        Ok(())
    }

    /// Index of the period `site` falls in.
    ///
    /// Period `n` is the half-open band `n <= tag·p / p·p < n + 1`.
    pub fn which(&self, site: &Site) -> i64 {
        let projection: i64 = site.tag().iter().zip(&self.period).map(|(t, p)| t * p).sum();
        projection.div_euclid(self.norm)
    }

    /// Translate `site` by `n` periods
    pub fn act(&self, n: i64, site: &Site) -> Site {
        let tag = site
            .tag()
            .iter()
            .zip(&self.period)
            .map(|(t, p)| t + n * p)
            .collect();
        site.with_tag(tag)
    }

    /// The image of `site` in the fundamental domain (`which == 0`)
    pub fn to_fundamental(&self, site: &Site) -> Site {
        self.act(-self.which(site), site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::Group;

    #[test]
    fn zero_period_is_rejected() {
        assert_eq!(TranslationalSymmetry::new([0, 0]), Err(ModelError::ZeroPeriod));
    }

    #[test]
    fn which_after_act_shifts_by_n() {
        let a = Group::square("a", 1.0);
        let sym = TranslationalSymmetry::new([-1, 0]).unwrap();
        for tag in [[0, 0], [3, 5], [-2, 1], [7, -4]] {
            let site = a.site(tag);
            for n in -3..=3 {
                assert_eq!(sym.which(&sym.act(n, &site)), sym.which(&site) + n);
            }
        }
    }

    #[test]
    fn which_uses_half_open_bands() {
        let a = Group::square("a", 1.0);
        let sym = TranslationalSymmetry::new([2, 0]).unwrap();
        assert_eq!(sym.which(&a.site([0, 9])), 0);
        assert_eq!(sym.which(&a.site([1, 9])), 0);
        assert_eq!(sym.which(&a.site([2, 9])), 1);
        assert_eq!(sym.which(&a.site([-1, 9])), -1);
    }

    #[test]
    fn to_fundamental_lands_in_period_zero() {
        let a = Group::square("a", 1.0);
        let sym = TranslationalSymmetry::new([0, 1]).unwrap();
        let site = sym.to_fundamental(&a.site([4, -7]));
        assert_eq!(site, a.site([4, 0]));
        assert_eq!(sym.which(&site), 0);
    }

    #[test]
    fn check_rejects_mismatched_dimension() {
        let a = Group::square("a", 1.0);
        let sym = TranslationalSymmetry::new([1, 0, 0]).unwrap();
        assert_eq!(
            sym.check(&a.site([0, 0])),
            Err(ModelError::DimensionMismatch { tag: 2, period: 3 })
        );
    }
}
