use anyhow::{anyhow, bail, Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn read_csv_from_path(path: &Path) -> Result<CsvData> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open data file '{}'", path.display()))?;
    read_csv(file).with_context(|| format!("Failed to read data file '{}'", path.display()))
}

pub fn read_csv<R: Read>(source: R) -> Result<CsvData> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(anyhow!("CSV must contain at least one data row"));
    }

    Ok(CsvData { headers, rows })
}

/// Position of a header, matched case-insensitively
pub fn column_index(data: &CsvData, name: &str) -> Result<usize> {
    data.headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            anyhow!(
                "Column '{}' not found. Available columns: {}",
                name,
                data.headers.join(", ")
            )
        })
}

fn cell<'a>(data: &'a CsvData, row_idx: usize, column_index: usize) -> Result<&'a str> {
    let row = &data.rows[row_idx];
    row.get(column_index).map(|s| s.as_str()).ok_or_else(|| {
        anyhow!(
            "Row {} has only {} columns, expected at least {}",
            row_idx + 1,
            row.len(),
            column_index + 1
        )
    })
}

pub fn extract_column(data: &CsvData, name: &str) -> Result<Vec<f64>> {
    let column_index = column_index(data, name)?;
    let column_name = &data.headers[column_index];

    let mut values = Vec::with_capacity(data.rows.len());
    for row_idx in 0..data.rows.len() {
        let value_str = cell(data, row_idx, column_index)?;
        let value = value_str.trim().parse::<f64>().with_context(|| {
            format!(
                "Failed to parse value '{}' as number in column '{}' at row {}",
                value_str,
                column_name,
                row_idx + 1
            )
        })?;
        if !value.is_finite() {
            bail!(
                "Failed to parse value '{}' as number in column '{}' at row {}: not a finite number",
                value_str,
                column_name,
                row_idx + 1
            );
        }
        values.push(value);
    }

    Ok(values)
}

pub fn extract_column_as_string(data: &CsvData, name: &str) -> Result<Vec<String>> {
    let column_index = column_index(data, name)?;

    let mut values = Vec::with_capacity(data.rows.len());
    for row_idx in 0..data.rows.len() {
        values.push(cell(data, row_idx, column_index)?.to_string());
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn csv_from_string(content: &str) -> Result<CsvData> {
        read_csv(Cursor::new(content))
    }

    // extract_column happy path

    #[test]
    fn test_extract_column_by_name() {
        let csv = csv_from_string("x,y,z\n1,10,100\n2,20,200\n3,30,300").unwrap();
        let values = extract_column(&csv, "y").unwrap();
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_extract_column_case_insensitive() {
        let csv = csv_from_string("Poverty,Age\n18.6,38.1\n11.2,33.6").unwrap();
        let values = extract_column(&csv, "poverty").unwrap();
        assert_eq!(values, vec![18.6, 11.2]);
    }

    #[test]
    fn test_extract_column_tolerates_padding() {
        let csv = csv_from_string("abbr, income\nAL, 43253\nAK,61286 ").unwrap();
        let values = extract_column(&csv, "income").unwrap();
        assert_eq!(values, vec![43253.0, 61286.0]);
    }

    #[test]
    fn test_extract_column_as_string() {
        let csv = csv_from_string("state,abbr\nAlabama,AL\nAlaska,AK").unwrap();
        let values = extract_column_as_string(&csv, "abbr").unwrap();
        assert_eq!(values, vec!["AL", "AK"]);
    }

    // extract_column error cases

    #[test]
    fn test_extract_column_not_found() {
        let csv = csv_from_string("x,y\n1,10").unwrap();
        let result = extract_column(&csv, "smokes");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_extract_column_non_numeric() {
        let csv = csv_from_string("abbr,poverty\nAL,18.6\nAK,n/a").unwrap();
        let err = extract_column(&csv, "poverty").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Failed to parse"));
        assert!(message.contains("'n/a'"));
        assert!(message.contains("row 2"));
    }

    #[test]
    fn test_extract_column_rejects_non_finite() {
        for bad in ["NaN", "inf", "-Infinity"] {
            let csv = csv_from_string(&format!("state,poverty\nAL,18.6\nAK,{}", bad)).unwrap();
            let message = extract_column(&csv, "poverty").unwrap_err().to_string();
            assert!(message.contains("Failed to parse"), "{}", message);
            assert!(message.contains("at row 2"), "{}", message);
        }
    }

    #[test]
    fn test_extract_column_missing_value() {
        let csv = csv_from_string("x,y\n1,10\n2,\n3,30").unwrap();
        let result = extract_column(&csv, "y");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_extract_column_short_row() {
        // the csv crate rejects ragged rows while reading
        let result = csv_from_string("x,y,z\n1,10,100\n2,20");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("record"));
    }

    // read_csv

    #[test]
    fn test_read_csv_basic() {
        let csv = csv_from_string("a,b,c\n1,2,3\n4,5,6").unwrap();
        assert_eq!(csv.headers, vec!["a", "b", "c"]);
        assert_eq!(csv.rows.len(), 2);
        assert_eq!(csv.rows[1], vec!["4", "5", "6"]);
    }

    #[test]
    fn test_read_csv_empty_data() {
        let result = csv_from_string("x,y\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at least one data row"));
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv_from_path(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open data file"));
    }
}
