// Parsed table: header plus rows of the same arity, looked up by index.

use std::collections::HashMap;
use std::fmt;

use crate::core::RowBuffer;
use crate::error::{ArityError, Error, Result};

/// One owned row of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(Box<[String]>);

impl Row {
    /// Copy the fields currently held by `fields` (scanned from `line`) out of
    /// the reusable buffer.
    pub fn from_buffer(fields: &RowBuffer, line: &str) -> Self {
        Row(fields.fields(line).map(str::to_owned).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn fields(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Row(iter.into_iter().map(Into::into).collect())
    }
}

/// Header plus data rows, all of one arity. Immutable once built.
#[derive(Debug, Clone)]
pub struct Table {
    header: Row,
    rows: Vec<Row>,
}

impl Table {
    /// Take ownership of the header and rows. Every row must have the
    /// header's arity.
    pub fn new(header: Row, rows: Vec<Row>) -> Result<Self> {
        let arity = header.len();
        if arity == 0 {
            return Err(Error::InvalidArity(0));
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != arity) {
            return Err(Error::RowArity {
                index,
                source: ArityError {
                    expected: arity,
                    found: row.len(),
                },
            });
        }
        Ok(Table { header, rows })
    }

    #[inline]
    pub fn header(&self) -> &Row {
        &self.header
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column name → value view of the row at `index`.
    pub fn get_row(&self, index: usize) -> Result<RowMap<'_>> {
        let row = self.rows.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.rows.len(),
        })?;
        Ok(RowMap {
            names: self.header.fields(),
            values: row.fields(),
        })
    }
}

/// A row paired with the header. Iterates in column order.
#[derive(Debug, Clone, Copy)]
pub struct RowMap<'a> {
    names: &'a [String],
    values: &'a [String],
}

impl<'a> RowMap<'a> {
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'a str, &'a str)> + 'a {
        self.names
            .iter()
            .zip(self.values)
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Value of the first column called `name`.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.iter().find(|&(n, _)| n == name).map(|(_, v)| v)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Unordered map. Duplicate column names keep the last value.
    pub fn to_hash_map(&self) -> HashMap<&'a str, &'a str> {
        self.iter().collect()
    }
}

impl fmt::Display for RowMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
