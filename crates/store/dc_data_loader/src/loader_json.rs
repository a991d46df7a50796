use crate::{DataLoader, DataLoaderError, RawRecord, RawValue};

/// Reads a JSON array of flat objects, one object per row.
///
/// A document that is not an array yields no rows; array elements that are not objects
/// are skipped.
pub struct JsonLoader;

impl DataLoader for JsonLoader {
    #[inline]
    fn name(&self) -> &'static str {
        "datacurve.data_loaders.Json"
    }

    fn supports_extension(&self, extension: &str) -> bool {
        extension == "json"
    }

    fn load_records(&self, contents: &[u8]) -> Result<Vec<RawRecord>, DataLoaderError> {
        let document: serde_json::Value = serde_json::from_slice(contents)?;

        let serde_json::Value::Array(elements) = document else {
            dc_log::debug!("JSON document is not an array of rows, ignoring it");
            return Ok(Vec::new());
        };

        let records = elements
            .into_iter()
            .filter_map(|element| match element {
                serde_json::Value::Object(fields) => Some(
                    fields
                        .into_iter()
                        .map(|(name, value)| (name, RawValue::from_json(value)))
                        .collect::<RawRecord>(),
                ),
                other => {
                    dc_log::trace!("Skipping non-object JSON row: {other}");
                    None
                }
            })
            .collect();

        Ok(records)
    }
}
