//! Raw sample windows and the text matrix they arrive in.

use crate::error::DecodeError;

const USEC_PER_SEC: f64 = 1_000_000.0;

/// A window of raw samples in microvolts.
///
/// Rows are time samples in ascending order; columns are the requested
/// channels in the order they were requested. Storage is row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct RawSampleBlock {
    start_usec: u64,
    duration_usec: u64,
    channel_indices: Vec<usize>,
    rows: usize,
    values: Vec<f64>,
}

impl RawSampleBlock {
    /// Build a block from row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::SampleShape`] if `values` is not a whole number
    /// of rows of `channel_indices.len()` columns.
    pub fn new(
        start_usec: u64,
        duration_usec: u64,
        channel_indices: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self, DecodeError> {
        let columns = channel_indices.len();
        let rows = if columns == 0 { 0 } else { values.len() / columns };
        if rows * columns != values.len() {
            return Err(DecodeError::SampleShape {
                row: rows,
                expected: columns,
                found: values.len() - rows * columns,
            });
        }

        Ok(Self {
            start_usec,
            duration_usec,
            channel_indices,
            rows,
            values,
        })
    }

    pub fn start_usec(&self) -> u64 {
        self.start_usec
    }

    pub fn duration_usec(&self) -> u64 {
        self.duration_usec
    }

    /// Dataset channel index of each column.
    pub fn channel_indices(&self) -> &[usize] {
        &self.channel_indices
    }

    /// Number of time samples.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of channels.
    pub fn columns(&self) -> usize {
        self.channel_indices.len()
    }

    /// All values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The samples of every requested channel at one instant.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        let columns = self.columns();
        let start = index.checked_mul(columns)?;
        let end = start.checked_add(columns)?;
        self.values.get(start..end)
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.columns().max(1))
    }

    /// One channel's samples over the window.
    pub fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        let columns = self.columns();
        let in_range = index < columns;
        self.values
            .iter()
            .skip(index)
            .step_by(columns.max(1))
            .take(if in_range { self.rows } else { 0 })
            .copied()
    }

    /// Average sampling rate of this window in Hz: rows / duration in seconds.
    ///
    /// Computed per request, so it can differ slightly between windows.
    pub fn sample_rate(&self) -> f64 {
        self.rows as f64 / (self.duration_usec as f64 / USEC_PER_SEC)
    }
}

/// Parse a text sample matrix: one line per sample, `,`-separated values,
/// exactly `columns` per line. Gaps are `NaN`, never an empty field; a
/// single trailing `,` is tolerated. Blank lines are skipped.
pub fn parse_sample_matrix(body: &str, columns: usize) -> Result<Vec<f64>, DecodeError> {
    let mut values = Vec::new();

    for (row, line) in body.lines().filter(|l| !l.trim().is_empty()).enumerate() {
        let mut fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() > 1 && fields.last() == Some(&"") {
            fields.pop();
        }

        if fields.len() != columns {
            return Err(DecodeError::SampleShape {
                row,
                expected: columns,
                found: fields.len(),
            });
        }

        for field in fields {
            let value = field.parse::<f64>().map_err(|_| DecodeError::InvalidNumber {
                field: format!("sample row {}", row),
                value: field.to_string(),
            })?;
            values.push(value);
        }
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_order() {
        let values = parse_sample_matrix("1.5,2\n-3, 4.25\n\n", 2).unwrap();
        assert_eq!(values, vec![1.5, 2.0, -3.0, 4.25]);
    }

    #[test]
    fn accepts_nan_gaps() {
        let values = parse_sample_matrix("NaN,1\n", 2).unwrap();
        assert!(values[0].is_nan());
    }

    #[test]
    fn ragged_row_is_rejected() {
        let err = parse_sample_matrix("1,2\n3\n", 2).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::SampleShape {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn empty_field_does_not_shift_later_columns() {
        let err = parse_sample_matrix("1,,2\n3,4\n", 2).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::SampleShape {
                row: 0,
                expected: 2,
                found: 3
            }
        ));

        let err = parse_sample_matrix("1,,\n", 2).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { .. }));

        let err = parse_sample_matrix(",5\n", 2).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { .. }));
    }

    #[test]
    fn trailing_comma_is_tolerated() {
        let values = parse_sample_matrix("1,2,\n3,NaN,\n", 2).unwrap();
        assert_eq!(values[..3], [1.0, 2.0, 3.0]);
        assert!(values[3].is_nan());
    }

    #[test]
    fn huge_row_index_is_none() {
        let block = RawSampleBlock::new(0, 1_000, vec![0, 1], vec![1.0, 2.0]).unwrap();
        assert_eq!(block.row(usize::MAX / 2), None);
        assert_eq!(block.row(usize::MAX), None);
    }

    #[test]
    fn block_accessors() {
        let block =
            RawSampleBlock::new(0, 2_000, vec![3, 1], vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0])
                .unwrap();
        assert_eq!(block.rows(), 3);
        assert_eq!(block.columns(), 2);
        assert_eq!(block.row(1), Some(&[2.0, 20.0][..]));
        assert_eq!(block.row(3), None);
        assert_eq!(block.column(1).collect::<Vec<_>>(), vec![10.0, 20.0, 30.0]);
        assert_eq!(block.column(2).count(), 0);
        assert_eq!(block.channel_indices(), &[3, 1]);
    }

    #[test]
    fn sample_rate_is_rows_per_second() {
        let block = RawSampleBlock::new(0, 1_000_000, vec![0], vec![0.0; 512]).unwrap();
        assert_eq!(block.sample_rate(), 512.0);

        let block = RawSampleBlock::new(0, 500_000, vec![0, 1], vec![0.0; 500]).unwrap();
        assert_eq!(block.sample_rate(), 500.0);
    }
}
