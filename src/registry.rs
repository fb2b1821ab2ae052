use std::{collections::BTreeMap, fs::File, io::Read, path::Path};

use log::{debug, warn};

use crate::{
    data::stock::StockRef,
    error::{SdError, SdResult},
    utils::text::is_ascii_digits,
};

/// Loads `code -> name` pairs from a delimited file where column 2 holds the code
/// and column 3 the display name. A later row with the same code replaces the earlier one.
pub fn load_registry(path: &Path) -> SdResult<Vec<StockRef>> {
    let file = File::open(path).map_err(|err| {
        SdError::RegistryError(format!("Unable to open '{}': {err}", path.display()))
    })?;

    read_registry(file)
}

pub fn read_registry<R: Read>(reader: R) -> SdResult<Vec<StockRef>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut stocks: BTreeMap<String, String> = BTreeMap::new();
    for (i, result) in csv_reader.byte_records().enumerate() {
        let record = result.map_err(|err| SdError::RegistryError(err.to_string()))?;

        let (Some(code), Some(name)) = (record.get(1), record.get(2)) else {
            warn!("[Registry] Row {} has fewer than 3 columns, skipped", i + 1);
            continue;
        };

        let code = String::from_utf8_lossy(code);
        let code = code.trim();
        if !is_ascii_digits(code) {
            warn!("[Registry] Row {} has invalid code '{code}', skipped", i + 1);
            continue;
        }

        let stock = StockRef::new(code, &String::from_utf8_lossy(name));
        if let Some(previous) = stocks.insert(stock.code.clone(), stock.name) {
            debug!("[Registry] Code {} redefined, replaces '{previous}'", stock.code);
        }
    }

    Ok(stocks
        .into_iter()
        .map(|(code, name)| StockRef { code, name })
        .collect())
}
