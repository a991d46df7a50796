use crate::{DataLoader, DataLoaderError, RawRecord, RawValue};

/// Reads comma-separated tables with a header row.
///
/// Whitespace around cells is trimmed, a leading byte-order mark is ignored, and rows
/// with too few or too many cells are accepted: missing cells are simply absent from the
/// record, surplus cells are dropped.
pub struct CsvLoader;

impl DataLoader for CsvLoader {
    #[inline]
    fn name(&self) -> &'static str {
        "datacurve.data_loaders.Csv"
    }

    fn supports_extension(&self, extension: &str) -> bool {
        extension == "csv"
    }

    fn load_records(&self, contents: &[u8]) -> Result<Vec<RawRecord>, DataLoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(contents);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|header| header.trim_start_matches('\u{feff}').to_owned())
            .collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            if row.iter().all(str::is_empty) {
                continue; // blank line
            }

            if row.len() > headers.len() {
                dc_log::debug_once!(
                    "CSV row {:?} has {} cells but there are only {} headers",
                    row.position().map(|p| p.line()),
                    row.len(),
                    headers.len()
                );
            }

            records.push(
                headers
                    .iter()
                    .zip(row.iter())
                    .map(|(header, cell)| (header.clone(), RawValue::from(cell)))
                    .collect(),
            );
        }

        Ok(records)
    }
}
