use crate::constants::{DECK_SIZE, FIRST_CARD_COLUMN, LABEL_COLUMN};
use crate::deck::DeckDefinition;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckReaderError {
    #[error("could not open deck file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed deck csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("header has no `{0}` column")]
    MissingLabelColumn(String),
}

/// Where decks live in a row of the deck csv
#[derive(Debug, Clone)]
pub struct DeckLayout {
    /// header name of the label column
    pub label_column: String,
    /// index of the first of up to `DECK_SIZE` card columns
    pub first_card_column: usize,
}

impl Default for DeckLayout {
    fn default() -> Self {
        DeckLayout {
            label_column: LABEL_COLUMN.to_string(),
            first_card_column: FIRST_CARD_COLUMN,
        }
    }
}

/// Reads deck definitions from a csv file with a header row
///
/// # Example
/// ```no_run
/// use deck_clustering::deck_reader::{read_decks, DeckLayout};
/// let definitions = read_decks("hearthstone_decks.csv", &DeckLayout::default()).unwrap();
/// ```
pub fn read_decks<P: AsRef<Path>>(
    path: P,
    layout: &DeckLayout,
) -> Result<Vec<DeckDefinition>, DeckReaderError> {
    let file = File::open(path)?;
    read_decks_from_reader(file, layout)
}

/// Reads deck definitions from any csv source
/// empty card cells are skipped, rows may be shorter than the header
pub fn read_decks_from_reader<R: Read>(
    reader: R,
    layout: &DeckLayout,
) -> Result<Vec<DeckDefinition>, DeckReaderError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let label_index = csv_reader
        .headers()?
        .iter()
        .position(|h| h.trim() == layout.label_column)
        .ok_or_else(|| DeckReaderError::MissingLabelColumn(layout.label_column.clone()))?;

    let mut definitions = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let label = record.get(label_index).unwrap_or("").trim().to_string();
        let cards = record
            .iter()
            .skip(layout.first_card_column)
            .take(DECK_SIZE)
            .map(str::trim)
            .filter(|card| !card.is_empty())
            .map(String::from)
            .collect();
        definitions.push(DeckDefinition { label, cards });
    }
    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
deck_id,type,deck_class,deck_format,date,card_0,card_1,card_2
1,Tempo,Mage,W,2016-01-01,Fireball,Frostbolt,
2,Control,Mage,W,2016-01-02,\"Ragnaros, Lightlord\",Fireball,Fireball
3,Tempo,Mage,W,2016-01-03,Mana Wyrm
";

    fn layout() -> DeckLayout {
        DeckLayout {
            label_column: "type".to_string(),
            first_card_column: 5,
        }
    }

    #[test]
    fn test_reads_labels_and_cards() {
        let definitions = read_decks_from_reader(SAMPLE.as_bytes(), &layout()).unwrap();
        assert_eq!(definitions.len(), 3);
        assert_eq!(definitions[0].label, "Tempo");
        assert_eq!(definitions[0].cards, vec!["Fireball", "Frostbolt"]);
        assert_eq!(definitions[1].label, "Control");
        assert_eq!(
            definitions[1].cards,
            vec!["Ragnaros, Lightlord", "Fireball", "Fireball"]
        );
        assert_eq!(definitions[2].cards, vec!["Mana Wyrm"]);
    }

    #[test]
    fn test_missing_label_column() {
        let layout = DeckLayout {
            label_column: "archetype".to_string(),
            first_card_column: 5,
        };
        match read_decks_from_reader(SAMPLE.as_bytes(), &layout) {
            Err(DeckReaderError::MissingLabelColumn(name)) => assert_eq!(name, "archetype"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
