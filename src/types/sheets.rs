use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A spreadsheet discovered in the Drive folder. Identity is `id`; `name` may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetFile {
    pub id: String,
    pub name: String,
}

/// Raw cell range of one spreadsheet, first row being the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSheet {
    pub file: SheetFile,
    pub values: Vec<Vec<String>>,
}

impl FetchedSheet {
    pub fn name(&self) -> &str {
        &self.file.name
    }

    /// True when the range returned at least the header row.
    pub fn has_rows(&self) -> bool {
        !self.values.is_empty()
    }
}

/// Header-keyed view of a sheet, consumed by chart widgets.
/// Row keys keep header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetTable {
    pub name: String,
    pub headers: Vec<String>,
    pub data: Vec<Map<String, Value>>,
}

impl SheetTable {
    /// Build from a raw range. Cells missing from short rows become `""`;
    /// cells beyond the header width are dropped. A repeated header keeps its
    /// first position and the value of its last column.
    pub fn from_values(name: impl Into<String>, values: &[Vec<String>]) -> Self {
        let headers = values.first().cloned().unwrap_or_default();
        let data = values
            .iter()
            .skip(1)
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(idx, header)| {
                        let cell = row.get(idx).cloned().unwrap_or_default();
                        (header.clone(), Value::String(cell))
                    })
                    .collect()
            })
            .collect();

        Self {
            name: name.into(),
            headers,
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SheetsResponse {
    pub sheets: Vec<SheetTable>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SheetsErrorResponse {
    pub error: String,
    pub sheets: Vec<SheetTable>,
}
