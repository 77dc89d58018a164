/// Contains functions for calculating distances between membership vectors
use crate::error::ClusterError;
use crate::membership::MembershipVector;

/// counts the positions where `a` and `b` differ
/// the count is not normalized by length
///
/// # Arguments
/// * `a` the first membership vector
/// * `b` the second membership vector, must have the same length as `a`
pub fn hamming_distance(a: &MembershipVector, b: &MembershipVector) -> Result<usize, ClusterError> {
    if a.len() != b.len() {
        return Err(ClusterError::LengthMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a.view()
        .iter()
        .zip(b.view().iter())
        .filter(|(x, y)| x != y)
        .count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_differing_positions() {
        let a = MembershipVector::from(vec![true, true, false, false]);
        let b = MembershipVector::from(vec![true, false, true, false]);
        assert_eq!(hamming_distance(&a, &b), Ok(2));
        assert_eq!(hamming_distance(&a, &a), Ok(0));
    }

    #[test]
    fn test_length_mismatch() {
        let a = MembershipVector::from(vec![true, false, true]);
        let b = MembershipVector::from(vec![true, false]);
        assert_eq!(
            hamming_distance(&a, &b),
            Err(ClusterError::LengthMismatch {
                expected: 3,
                found: 2
            })
        );
    }
}
