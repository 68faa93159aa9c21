use std::fs::File;
use std::path::Path;

use crate::Error;

/// Deserializes every row of a CSV file with headers.
///
/// # Errors
///
/// Fails if the file cannot be opened or any row is malformed.
pub fn deserialize_csv_file<T>(path: &Path) -> Result<Vec<T>, Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;

    Ok(csv::Reader::from_reader(file)
        .deserialize()
        .collect::<Result<Vec<T>, _>>()?)
}
