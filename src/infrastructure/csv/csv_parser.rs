// ============================================================
// EMBEDDINGS CSV PARSER
// ============================================================
// Reads `embeddings_<build>.csv`: a `dcid` column plus numeric columns

use std::path::Path;
use csv::{ReaderBuilder, StringRecord, Trim};
use crate::domain::error::AppError;
use crate::domain::nl::BuildEmbeddings;

const DCID_COLUMN: &str = "dcid";

/// Parser for precomputed embeddings files
#[derive(Debug, Default)]
pub struct EmbeddingsCsvParser;

impl EmbeddingsCsvParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an embeddings file from disk
    pub fn parse_file(&self, path: &Path) -> Result<BuildEmbeddings, AppError> {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(path)
            .map_err(|e| {
                AppError::IoError(format!("Failed to open {}: {}", path.display(), e))
            })?;
        self.parse_reader(reader)
    }

    /// Parse embeddings from in-memory CSV content
    pub fn parse_content(&self, content: &str) -> Result<BuildEmbeddings, AppError> {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(content.as_bytes());
        self.parse_reader(reader)
    }

    fn parse_reader<R: std::io::Read>(
        &self,
        mut reader: csv::Reader<R>,
    ) -> Result<BuildEmbeddings, AppError> {
        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        let id_index = headers
            .iter()
            .position(|h| h == DCID_COLUMN)
            .ok_or_else(|| {
                AppError::ParseError(format!("Missing '{}' column", DCID_COLUMN))
            })?;

        let mut dcids = Vec::new();
        let mut vectors = Vec::new();

        for (index, result) in reader.records().enumerate() {
            // Header is line 1
            let line = index + 2;
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", line, e))
            })?;
            let (dcid, vector) = self.parse_row(line, id_index, &headers, &record)?;
            dcids.push(dcid);
            vectors.push(vector);
        }

        BuildEmbeddings::new(dcids, vectors)
    }

    /// Split one record into its id string and embedding vector
    fn parse_row(
        &self,
        line: usize,
        id_index: usize,
        headers: &StringRecord,
        record: &StringRecord,
    ) -> Result<(String, Vec<f32>), AppError> {
        let dcid = record.get(id_index).unwrap_or("").to_string();
        if dcid.is_empty() {
            return Err(AppError::ParseError(format!("Empty dcid on row {}", line)));
        }

        let mut vector = Vec::with_capacity(record.len().saturating_sub(1));
        for (idx, value) in record.iter().enumerate() {
            if idx == id_index {
                continue;
            }
            let parsed = value
                .parse::<f32>()
                .ok()
                .filter(|parsed| parsed.is_finite())
                .ok_or_else(|| {
                    AppError::ParseError(format!(
                        "Non-numeric value '{}' in column '{}' on row {}",
                        value,
                        headers.get(idx).unwrap_or("?"),
                        line
                    ))
                })?;
            vector.push(parsed);
        }

        Ok((dcid, vector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_embeddings_csv() {
        let content = "dcid,0,1,2\nCount_Person,0.1,0.2,0.3\n\"Count_Household,Count_HousingUnit\",1,0,0";
        let build = EmbeddingsCsvParser::new().parse_content(content).unwrap();

        assert_eq!(build.dim, 3);
        assert_eq!(build.dcids, vec!["Count_Person", "Count_Household,Count_HousingUnit"]);
        assert_eq!(build.vectors[1], vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_dcid_column_may_be_anywhere() {
        let content = "0,dcid,1\n0.5,Median_Age_Person,0.25";
        let build = EmbeddingsCsvParser::new().parse_content(content).unwrap();
        assert_eq!(build.dcids, vec!["Median_Age_Person"]);
        assert_eq!(build.vectors[0], vec![0.5, 0.25]);
    }

    #[test]
    fn test_missing_dcid_column() {
        let err = EmbeddingsCsvParser::new()
            .parse_content("id,0\nx,1.0")
            .unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_non_numeric_cell_names_row() {
        let err = EmbeddingsCsvParser::new()
            .parse_content("dcid,0\nA,0.1\nB,oops")
            .unwrap_err();
        assert!(err.to_string().contains("row 3"));
    }

    #[test]
    fn test_non_finite_cells_rejected() {
        for cell in ["NaN", "nan", "inf", "-infinity"] {
            let content = format!("dcid,0,1\nA,0.1,0.2\nB,0.3,{}", cell);
            let err = EmbeddingsCsvParser::new().parse_content(&content).unwrap_err();
            assert!(matches!(err, AppError::ParseError(_)));
            let message = err.to_string();
            assert!(message.contains("row 3"), "{}", message);
            assert!(message.contains("column '1'"), "{}", message);
        }
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = EmbeddingsCsvParser::new()
            .parse_content("dcid,0,1\nA,0.1,0.2\nB,0.3")
            .unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_header_only_is_error() {
        assert!(EmbeddingsCsvParser::new().parse_content("dcid,0,1\n").is_err());
    }
}
