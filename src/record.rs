//! Positional mapping of table rows onto named log fields
//!
//! Cells are assigned to field names by column position only. No types are
//! inferred and nothing is validated: every value is sent as the cell text.

use serde_json::{Map, Value};

/// Field names of the SMAX ticket export, in column order
pub const SMAX_FIELDS: [&str; 25] = [
    "smax.ticketid",
    "smax.timestamp",
    "smax.closedtime",
    "smax.category",
    "smax.solution",
    "content",
    "smax.requestforid",
    "smax.requestedforname",
    "smax.title",
    "smax.requeststatus",
    "smax.completioncode",
    "smax.priority",
    "smax.ownedbyid",
    "smax.ownedbyname",
    "smax..closedbyid",
    "smax.closedbyname",
    "smax.closedbyignid",
    "smax.currentassignment",
    "smax.assignedtogroupid",
    "smax.assignedtogroupname",
    "smax.categoryfirstlevelparent",
    "smax.categorysecondlevelparent",
    "smax.categorytitle",
    "smax.isclosedsameday",
    "log.source",
];

/// Default field that tags every record with its origin
pub const DEFAULT_SOURCE_FIELD: &str = "log.source";

/// Default value written into the source field
pub const DEFAULT_SOURCE_TAG: &str = "SMAXTickets";

/// One log record, keyed by field name
///
/// `serde_json` is built with `preserve_order`, so keys serialize in the
/// order they were first inserted.
pub type Record = Map<String, Value>;

/// Maps table rows onto records
#[derive(Debug, Clone)]
pub struct RecordMapper {
    fields: Vec<String>,
    source_field: String,
    source_tag: String,
}

impl RecordMapper {
    /// Create a mapper for the given column names
    pub fn new(
        fields: Vec<String>,
        source_field: impl Into<String>,
        source_tag: impl Into<String>,
    ) -> Self {
        Self {
            fields,
            source_field: source_field.into(),
            source_tag: source_tag.into(),
        }
    }

    /// Mapper for the SMAX ticket export
    pub fn smax() -> Self {
        Self::new(
            SMAX_FIELDS.iter().map(ToString::to_string).collect(),
            DEFAULT_SOURCE_FIELD,
            DEFAULT_SOURCE_TAG,
        )
    }

    /// Map one row. Fields past the row's width stay unset, cells past the
    /// field list are dropped, and the source field is always overwritten.
    pub fn map_row(&self, row: &[String]) -> Record {
        let mut record: Record = self
            .fields
            .iter()
            .zip(row)
            .map(|(key, cell)| (key.clone(), Value::String(cell.clone())))
            .collect();
        record.insert(
            self.source_field.clone(),
            Value::String(self.source_tag.clone()),
        );
        record
    }

    /// Map a slice of rows
    pub fn map_rows(&self, rows: &[Vec<String>]) -> Vec<Record> {
        rows.iter().map(|row| self.map_row(row)).collect()
    }
}

impl Default for RecordMapper {
    fn default() -> Self {
        Self::smax()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(ToString::to_string).collect()
    }

    fn keys(record: &Record) -> Vec<&str> {
        record.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_positional_mapping() {
        let mapper = RecordMapper::smax();
        let record = mapper.map_row(&row(&["T-1", "2024-01-01", "", "Hardware"]));

        assert_eq!(record["smax.ticketid"], "T-1");
        assert_eq!(record["smax.timestamp"], "2024-01-01");
        assert_eq!(record["smax.closedtime"], "");
        assert_eq!(record["smax.category"], "Hardware");
        assert!(!record.contains_key("smax.solution"));
        assert_eq!(record["log.source"], "SMAXTickets");
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn test_source_field_overrides_cell() {
        let mapper = RecordMapper::smax();
        let cells: Vec<String> = (0..25).map(|i| format!("c{i}")).collect();
        let record = mapper.map_row(&cells);

        assert_eq!(record.len(), 25);
        assert_eq!(record["smax.isclosedsameday"], "c23");
        assert_eq!(record["log.source"], "SMAXTickets");
        assert_eq!(keys(&record).last(), Some(&"log.source"));
    }

    #[test]
    fn test_extra_cells_dropped() {
        let mapper = RecordMapper::new(row(&["a", "b"]), "src", "tag");
        let record = mapper.map_row(&row(&["1", "2", "3", "4"]));
        assert_eq!(keys(&record), vec!["a", "b", "src"]);
    }

    #[test]
    fn test_serializes_in_column_order() {
        let mapper = RecordMapper::new(row(&["z", "a", "m"]), "log.source", "test");
        let records = mapper.map_rows(&[row(&["1", "2", "3"]), row(&["4"])]);

        let json = serde_json::to_string(&records).unwrap();
        assert_eq!(
            json,
            r#"[{"z":"1","a":"2","m":"3","log.source":"test"},{"z":"4","log.source":"test"}]"#
        );
    }

    #[test]
    fn test_source_field_in_column_list_keeps_its_position() {
        let mapper = RecordMapper::new(row(&["a", "src", "b"]), "src", "tag");
        let record = mapper.map_row(&row(&["1", "2", "3"]));

        assert_eq!(keys(&record), vec!["a", "src", "b"]);
        assert_eq!(record["src"], "tag");
    }
}
