//! Soil-type vocabulary
//!
//! Derives the ordered, deduplicated list of soil-type labels offered to the
//! user from the reference dataset. The dataset is comma-delimited text whose
//! first line is the header. Rows are split positionally without any quoting
//! support, which matches the fixed shape of the reference dataset; a cell
//! containing a comma shifts every later column of that row.
//!
//! A failed fetch or a header without the `Soil Type` column leaves the
//! vocabulary empty. The form then offers no soil-type options but stays
//! usable, so [`VocabularyLoader::load`] never returns an error.

use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

/// Header cell naming the soil-type column
pub const SOIL_TYPE_COLUMN: &str = "Soil Type";

const DELIMITER: char = ',';
const USER_AGENT: &str = concat!("soilcrop/", env!("CARGO_PKG_VERSION"));

/// Reasons the vocabulary could not be derived
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Dataset fetch failed: {0}")]
    Fetch(String),

    #[error("Dataset server returned status {0}")]
    Status(u16),

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Dataset header has no '{0}' column")]
    MissingColumn(String),
}

/// One line of the dataset split into cells, positionally aligned to the
/// header. Cells are not validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDatasetRow<'a> {
    cells: Vec<&'a str>,
}

impl<'a> RawDatasetRow<'a> {
    pub fn parse(line: &'a str) -> Self {
        Self {
            cells: line.split(DELIMITER).collect(),
        }
    }

    pub fn cell(&self, index: usize) -> Option<&'a str> {
        self.cells.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Distinct, trimmed, non-empty soil-type labels in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SoilTypeVocabulary {
    labels: Vec<String>,
}

impl SoilTypeVocabulary {
    /// Build from candidate labels, trimming each and dropping blanks and
    /// repeats
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();

        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                continue;
            }
            if seen.insert(label.to_string()) {
                ordered.push(label.to_string());
            }
        }

        Self { labels: ordered }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Extract the soil-type vocabulary from dataset text
///
/// Header cells are trimmed before matching, so a CRLF dataset or a padded
/// header still resolves the column. Blank lines, rows too short to reach
/// the column, and whitespace-only cells are skipped.
pub fn parse_soil_types(body: &str) -> Result<SoilTypeVocabulary, VocabularyError> {
    let mut lines = body.split('\n');

    let header = match lines.next() {
        Some(line) if !line.trim().is_empty() => RawDatasetRow::parse(line),
        _ => return Err(VocabularyError::EmptyDataset),
    };

    let column = header
        .cells
        .iter()
        .position(|cell| cell.trim() == SOIL_TYPE_COLUMN)
        .ok_or_else(|| VocabularyError::MissingColumn(SOIL_TYPE_COLUMN.to_string()))?;

    let labels = lines
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| RawDatasetRow::parse(line).cell(column));

    Ok(SoilTypeVocabulary::from_labels(labels))
}

/// Fetches the reference dataset and derives the vocabulary
pub struct VocabularyLoader {
    http_client: reqwest::Client,
    dataset_url: String,
}

impl VocabularyLoader {
    pub fn new(dataset_url: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            dataset_url: dataset_url.into(),
        })
    }

    /// Fetch and parse, reporting why the vocabulary is unavailable
    pub async fn try_load(&self) -> Result<SoilTypeVocabulary, VocabularyError> {
        tracing::debug!(url = %self.dataset_url, "Fetching soil-type dataset");

        let response = self
            .http_client
            .get(&self.dataset_url)
            .send()
            .await
            .map_err(|e| VocabularyError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VocabularyError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| VocabularyError::Fetch(e.to_string()))?;

        parse_soil_types(&body)
    }

    /// Fetch and parse, degrading to an empty vocabulary on any failure
    pub async fn load(&self) -> SoilTypeVocabulary {
        match self.try_load().await {
            Ok(vocabulary) => {
                tracing::info!(
                    url = %self.dataset_url,
                    soil_types = vocabulary.len(),
                    "Soil-type vocabulary loaded"
                );
                vocabulary
            }
            Err(e) => {
                tracing::warn!(
                    url = %self.dataset_url,
                    error = %e,
                    "Soil-type vocabulary unavailable, offering no soil types"
                );
                SoilTypeVocabulary::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_keep_first_occurrence_order() {
        let vocabulary = parse_soil_types("Soil Type,X\nClay,1\nSand,2\nClay,3\n").unwrap();
        assert_eq!(vocabulary.labels(), ["Clay", "Sand"]);
    }

    #[test]
    fn test_column_located_by_header_position() {
        let body = "pH,Soil Type,Crop\n6.5,Loamy,Rice\n7.0, Black ,Wheat\n5.5,Loamy,Maize\n";
        let vocabulary = parse_soil_types(body).unwrap();
        assert_eq!(vocabulary.labels(), ["Loamy", "Black"]);
    }

    #[test]
    fn test_missing_column() {
        let result = parse_soil_types("pH,Crop\n6.5,Rice\n");
        assert!(matches!(result, Err(VocabularyError::MissingColumn(_))));
    }

    #[test]
    fn test_empty_body() {
        assert!(matches!(parse_soil_types(""), Err(VocabularyError::EmptyDataset)));
        assert!(matches!(parse_soil_types("\n\n"), Err(VocabularyError::EmptyDataset)));
    }

    #[test]
    fn test_skips_blank_short_and_whitespace_rows() {
        let body = "X,Soil Type\n\n1,Red\n2\n3,   \n   \n4,Alluvial\n";
        let vocabulary = parse_soil_types(body).unwrap();
        assert_eq!(vocabulary.labels(), ["Red", "Alluvial"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let body = "X,Soil Type\r\n1,Clay\r\n2,Sand\r\n3,Clay\r\n";
        let vocabulary = parse_soil_types(body).unwrap();
        assert_eq!(vocabulary.labels(), ["Clay", "Sand"]);
    }

    #[test]
    fn test_header_only() {
        let vocabulary = parse_soil_types("Soil Type,X\n").unwrap();
        assert!(vocabulary.is_empty());
    }

    #[test]
    fn test_embedded_delimiter_shifts_columns() {
        // "Clay, heavy" splits into two cells; the soil-type cell becomes "Clay"
        let body = "Soil Type,X\nClay, heavy,1\n";
        let vocabulary = parse_soil_types(body).unwrap();
        assert_eq!(vocabulary.labels(), ["Clay"]);
    }

    #[test]
    fn test_from_labels_drops_blanks_and_repeats() {
        let vocabulary = SoilTypeVocabulary::from_labels(["Red", " Red ", "", "  ", "Black"]);
        assert_eq!(vocabulary.labels(), ["Red", "Black"]);
        assert!(vocabulary.contains("Black"));
        assert!(!vocabulary.contains(" Red "));
    }

    #[test]
    fn test_raw_row_cells() {
        let row = RawDatasetRow::parse("a,,c");
        assert_eq!(row.len(), 3);
        assert_eq!(row.cell(1), Some(""));
        assert_eq!(row.cell(3), None);
    }

    #[test]
    fn test_serializes_as_list() {
        let vocabulary = SoilTypeVocabulary::from_labels(["Clay", "Sand"]);
        assert_eq!(serde_json::to_string(&vocabulary).unwrap(), r#"["Clay","Sand"]"#);
    }
}
