use crate::deck::Deck;
use crate::error::ClusterError;
use crate::kmeans::ClusterAssignment;
use serde::Serialize;

/// Most frequent label among a cluster's decks
///
/// Ties go to the label whose first occurrence comes earliest in the cluster.
/// Returns `None` for an empty cluster.
pub fn majority_label<'a>(decks: &[&'a Deck]) -> Option<&'a str> {
    // (label, count) in order of first occurrence
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for deck in decks {
        match counts.iter_mut().find(|(label, _)| *label == deck.label()) {
            Some((_, count)) => *count += 1,
            None => counts.push((deck.label(), 1)),
        }
    }
    let mut best: Option<(&'a str, usize)> = None;
    for (label, count) in counts {
        match best {
            Some((_, max)) if count <= max => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label)
}

/// Fraction of decks whose label equals their cluster's majority label
///
/// # Arguments
/// * `assignment` the final cluster assignment
/// * `majority_labels` majority label of each cluster, by cluster index
pub fn accuracy(
    assignment: &ClusterAssignment,
    majority_labels: &[Option<&str>],
) -> Result<f64, ClusterError> {
    if assignment.is_empty() {
        return Err(ClusterError::NoClusters);
    }
    if majority_labels.len() != assignment.len() {
        return Err(ClusterError::LengthMismatch {
            expected: assignment.len(),
            found: majority_labels.len(),
        });
    }
    let total = assignment.deck_count();
    if total == 0 {
        return Err(ClusterError::NoDecks);
    }
    let correct = count_correct(assignment, majority_labels);
    Ok(correct as f64 / total as f64)
}

fn count_correct(assignment: &ClusterAssignment, majority_labels: &[Option<&str>]) -> usize {
    assignment
        .clusters()
        .iter()
        .zip(majority_labels)
        .map(|(decks, majority)| {
            decks
                .iter()
                .filter(|deck| Some(deck.label()) == *majority)
                .count()
        })
        .sum()
}

/// Scoring of one cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub index: usize,
    /// `None` when the cluster ended up empty
    pub majority_label: Option<String>,
    pub size: usize,
    /// decks carrying the majority label
    pub correct: usize,
}

/// Scoring of a whole assignment against the ground-truth labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub clusters: Vec<ClusterSummary>,
    pub correct: usize,
    pub total: usize,
    pub accuracy: f64,
}

impl Evaluation {
    /// Scores `assignment`, fails on an assignment with no clusters or no decks
    pub fn evaluate(assignment: &ClusterAssignment) -> Result<Self, ClusterError> {
        let majority_labels: Vec<Option<&str>> = assignment
            .clusters()
            .iter()
            .map(|decks| majority_label(decks))
            .collect();
        let accuracy = accuracy(assignment, &majority_labels)?;

        let clusters: Vec<ClusterSummary> = assignment
            .clusters()
            .iter()
            .zip(&majority_labels)
            .enumerate()
            .map(|(index, (decks, majority))| ClusterSummary {
                index,
                majority_label: majority.map(String::from),
                size: decks.len(),
                correct: decks
                    .iter()
                    .filter(|deck| Some(deck.label()) == *majority)
                    .count(),
            })
            .collect();
        Ok(Evaluation {
            correct: clusters.iter().map(|c| c.correct).sum(),
            total: assignment.deck_count(),
            clusters,
            accuracy,
        })
    }
}
