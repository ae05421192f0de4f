use csv::StringRecord;

use crate::error::{Result, TrackerError};

/// Columns the tracker understands. Anything else in the header is carried
/// through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    Year,
    Genres,
    Actors,
    Director,
    Plot,
    PosterUrl,
    InfoUrl,
    Watched,
    Rating,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Title,
        Column::Year,
        Column::Genres,
        Column::Actors,
        Column::Director,
        Column::Plot,
        Column::PosterUrl,
        Column::InfoUrl,
        Column::Watched,
        Column::Rating,
    ];

    pub fn header_name(&self) -> &'static str {
        match self {
            Column::Title => "Title",
            Column::Year => "Year",
            Column::Genres => "Genres",
            Column::Actors => "Actors",
            Column::Director => "Director",
            Column::Plot => "Plot",
            Column::PosterUrl => "Poster_URL",
            Column::InfoUrl => "OMDb_URL",
            Column::Watched => "Watched",
            Column::Rating => "Rating",
        }
    }

    fn from_header(header: &str) -> Option<Column> {
        let trimmed = header.trim_start_matches('\u{feff}').trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.header_name() == trimmed)
    }
}

/// Header layout of a loaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    headers: Vec<String>,
    positions: [Option<usize>; Column::ALL.len()],
}

impl Schema {
    pub fn from_headers(headers: &StringRecord) -> Result<Schema> {
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(TrackerError::DataFormat(
                "the file has no header row".to_string(),
            ));
        }

        let mut positions = [None; Column::ALL.len()];
        for (idx, header) in headers.iter().enumerate() {
            if let Some(column) = Column::from_header(header) {
                let slot = &mut positions[column as usize];
                // First occurrence wins for duplicated headers.
                if slot.is_none() {
                    *slot = Some(idx);
                } else {
                    log::warn!("Duplicated column '{}' is ignored", header.trim());
                }
            }
        }

        if positions[Column::Title as usize].is_none() {
            return Err(TrackerError::DataFormat(
                "required column 'Title' is missing".to_string(),
            ));
        }

        Ok(Schema {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            positions,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn position(&self, column: Column) -> Option<usize> {
        self.positions[column as usize]
    }

    pub fn has(&self, column: Column) -> bool {
        self.position(column).is_some()
    }

    /// Adds a column at the end of the header, returning its position.
    ///
    /// Rows may carry cells past the end of the header; the new column goes
    /// after all of them, with blank headers in between.
    pub(crate) fn append(&mut self, column: Column, widest_row: usize) -> usize {
        if let Some(idx) = self.position(column) {
            return idx;
        }
        if self.headers.len() < widest_row {
            self.headers.resize(widest_row, String::new());
        }
        self.headers.push(column.header_name().to_string());
        let idx = self.headers.len() - 1;
        self.positions[column as usize] = Some(idx);
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_matched_after_trimming() {
        let headers = StringRecord::from(vec![" Title ", "Year", "Notes", "Rating"]);
        let schema = Schema::from_headers(&headers).unwrap();

        assert_eq!(schema.position(Column::Title), Some(0));
        assert_eq!(schema.position(Column::Year), Some(1));
        assert_eq!(schema.position(Column::Rating), Some(3));
        assert_eq!(schema.position(Column::Watched), None);
        assert_eq!(schema.headers()[0], " Title ");
    }

    #[test]
    fn missing_title_is_a_data_format_error() {
        let headers = StringRecord::from(vec!["Year", "Director"]);
        let err = Schema::from_headers(&headers).unwrap_err();
        assert!(matches!(err, TrackerError::DataFormat(_)));
    }

    #[test]
    fn append_adds_columns_once() {
        let headers = StringRecord::from(vec!["Title"]);
        let mut schema = Schema::from_headers(&headers).unwrap();

        assert_eq!(schema.append(Column::Rating, 1), 1);
        assert_eq!(schema.append(Column::Rating, 1), 1);
        assert_eq!(schema.headers(), &["Title".to_string(), "Rating".to_string()]);
    }

    #[test]
    fn append_goes_past_cells_beyond_the_header() {
        let headers = StringRecord::from(vec!["Title"]);
        let mut schema = Schema::from_headers(&headers).unwrap();

        assert_eq!(schema.append(Column::Watched, 3), 3);
        assert_eq!(schema.headers(), &["Title", "", "", "Watched"]);
    }
}
