use crate::error::ClusterError;
use crate::vocabulary::CardId;
use ndarray::prelude::*;

/// Fixed-length boolean vector over the vocabulary
/// position `i` is set iff card identity `i` is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipVector(Array1<bool>);

impl MembershipVector {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// number of set positions
    pub fn count_ones(&self) -> usize {
        self.0.iter().filter(|bit| **bit).count()
    }
    /// identities of the set positions in increasing order
    pub fn identities(&self) -> Vec<CardId> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, bit)| **bit)
            .map(|(i, _)| i)
            .collect()
    }
    pub fn view(&self) -> ArrayView1<bool> {
        self.0.view()
    }
}

impl From<Vec<bool>> for MembershipVector {
    fn from(bits: Vec<bool>) -> Self {
        MembershipVector(Array1::from(bits))
    }
}

/// Builds the membership vector of a set of card identities
///
/// Duplicates in `cards` are harmless, they mark the same position twice.
/// Fails if any identity does not fit in `vocabulary_size`.
///
/// # Arguments
/// * `cards` card identities to mark
/// * `vocabulary_size` size of the frozen vocabulary
pub fn to_membership_vector<'a, I>(
    cards: I,
    vocabulary_size: usize,
) -> Result<MembershipVector, ClusterError>
where
    I: IntoIterator<Item = &'a CardId>,
{
    let mut bits = Array1::from_elem(vocabulary_size, false);
    for &card in cards {
        if card >= vocabulary_size {
            return Err(ClusterError::IdentityOutOfRange {
                identity: card,
                vocabulary_size,
            });
        }
        bits[card] = true;
    }
    Ok(MembershipVector(bits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_exactly_the_given_cards() {
        let v = to_membership_vector(&[3, 4, 9], 10).unwrap();
        assert_eq!(v.len(), 10);
        assert_eq!(v.count_ones(), 3);
        assert_eq!(v.identities(), vec![3, 4, 9]);
    }

    #[test]
    fn test_duplicates_mark_once() {
        let v = to_membership_vector(&[1, 1, 1, 0], 4).unwrap();
        assert_eq!(v, MembershipVector::from(vec![true, true, false, false]));
    }

    #[test]
    fn test_out_of_range_identity_fails() {
        let err = to_membership_vector(&[0, 5], 5).unwrap_err();
        assert_eq!(
            err,
            ClusterError::IdentityOutOfRange {
                identity: 5,
                vocabulary_size: 5
            }
        );
    }
}
