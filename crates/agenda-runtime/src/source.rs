use agenda_types::AgendaRow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::Result;

/// Ordered agenda rows read from a CSV export of the agenda's first sheet.
///
/// The export has no header record; the first `header_rows` records are the
/// sheet's title region and are skipped. Records may be ragged.
pub struct CsvRowSource<R: Read> {
    reader: csv::Reader<R>,
    header_rows: usize,
}

impl CsvRowSource<File> {
    pub fn open(path: &Path, header_rows: usize) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file, header_rows))
    }
}

impl<R: Read> CsvRowSource<R> {
    pub fn from_reader(reader: R, header_rows: usize) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        Self {
            reader,
            header_rows,
        }
    }

    /// 1-based sheet row number of the first data row.
    pub fn first_row(&self) -> usize {
        self.header_rows + 1
    }

    /// Data rows in sheet order. The header region is measured in physical
    /// lines, so blank lines the reader drops still count towards it.
    pub fn rows(self) -> impl Iterator<Item = Result<AgendaRow>> {
        let header_rows = self.header_rows as u64;
        self.reader
            .into_records()
            .filter_map(move |record| match record {
                Ok(record) if record.position().is_some_and(|p| p.line() <= header_rows) => None,
                Ok(record) => Some(Ok(AgendaRow::from_fields(record.iter()))),
                Err(err) => Some(Err(err.into())),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_header_region() {
        let data = "Agenda,,\nConference 2024,,\n\
                    2024-01-01,09:00,10:00,Session,Keynote,Hall A,Opening,Alice; Bob\n\
                    2024-01-01,09:15,09:45,Sub,Talk,Hall A,,Carol\n";
        let source = CsvRowSource::from_reader(data.as_bytes(), 2);
        assert_eq!(source.first_row(), 3);

        let rows = source.rows().collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Keynote");
        assert_eq!(rows[0].speakers, "Alice; Bob");
        assert_eq!(rows[1].kind, "Sub");
        assert_eq!(rows[1].description, "");
    }

    #[test]
    fn test_blank_line_in_header_region_counts_as_row() {
        let data = "Agenda\n\n\
                    2024-01-01,09:00,10:00,Session,Keynote,Hall A,,Alice\n\
                    2024-01-01,09:15,09:45,Sub,Talk,Hall A,,Bob\n";
        let rows = CsvRowSource::from_reader(data.as_bytes(), 2)
            .rows()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Keynote");
        assert_eq!(rows[1].title, "Talk");
    }

    #[test]
    fn test_short_records_are_padded() {
        let data = "2024-01-01,09:00,10:00,Session,Lunch\n";
        let rows = CsvRowSource::from_reader(data.as_bytes(), 0)
            .rows()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(rows[0].title, "Lunch");
        assert_eq!(rows[0].location, "");
        assert_eq!(rows[0].speakers, "");
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let data = "2024-01-01,09:00,10:00,Session,\"Rust, in depth\",Hall A,,\n";
        let rows = CsvRowSource::from_reader(data.as_bytes(), 0)
            .rows()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(rows[0].title, "Rust, in depth");
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let data = "Agenda\nConference\n";
        let rows = CsvRowSource::from_reader(data.as_bytes(), 15)
            .rows()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert!(rows.is_empty());
    }
}
