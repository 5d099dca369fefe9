//! Explicit column-to-field binding

use crate::utils::error::{PipelineError, Result};
use std::fmt;
use std::str::FromStr;

/// Renders one field as a cell
pub type FieldReader<R> = fn(&R) -> String;

/// Parses one cell into a field
pub type FieldWriter<R> = fn(&mut R, &str) -> std::result::Result<(), String>;

/// One bound column
pub struct FieldBinding<R> {
    pub name: String,
    pub read: FieldReader<R>,
    pub write: FieldWriter<R>,
}

impl<R> Clone for FieldBinding<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            read: self.read,
            write: self.write,
        }
    }
}

impl<R> fmt::Debug for FieldBinding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered list of bound fields; declaration order is column order
///
/// Name the record type on the constructor so the field closures can see it:
///
/// ```
/// use imexport_rs::core::codec::{RecordBinding, TabularRecord, parse_cell};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Part {
///     code: String,
///     stock: u32,
/// }
///
/// impl TabularRecord for Part {
///     fn binding() -> RecordBinding<Self> {
///         RecordBinding::<Self>::new()
///             .field("Code", |p| p.code.clone(), |p, v| {
///                 p.code = v.to_string();
///                 Ok(())
///             })
///             .field("Stock", |p| p.stock.to_string(), |p, v| {
///                 p.stock = parse_cell(v)?;
///                 Ok(())
///             })
///     }
/// }
///
/// let binding = Part::binding();
/// assert_eq!(binding.headers(), vec!["Code", "Stock"]);
/// let cells = vec![" bolt ".to_string(), " 7 ".to_string()];
/// let part = binding.from_cells(&cells, 1).unwrap();
/// assert_eq!(part, Part { code: " bolt ".to_string(), stock: 7 });
/// ```
pub struct RecordBinding<R> {
    fields: Vec<FieldBinding<R>>,
}

impl<R> RecordBinding<R> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field
    pub fn field(
        mut self,
        name: impl Into<String>,
        read: FieldReader<R>,
        write: FieldWriter<R>,
    ) -> Self {
        self.fields.push(FieldBinding {
            name: name.into(),
            read,
            write,
        });
        self
    }

    pub fn fields(&self) -> &[FieldBinding<R>] {
        &self.fields
    }

    /// Field names in column order
    pub fn headers(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render a record as one cell per field
    pub fn to_cells(&self, record: &R) -> Vec<String> {
        self.fields.iter().map(|f| (f.read)(record)).collect()
    }

    /// Build a record from a row of cells
    ///
    /// Blank or missing cells leave the field at its default; extra cells are
    /// ignored. Non-blank cells reach the writer verbatim. `row_index` is the
    /// 1-based data row, used in error messages.
    pub fn from_cells(&self, cells: &[String], row_index: usize) -> Result<R>
    where
        R: Default,
    {
        let mut record = R::default();
        for (col, (field, cell)) in self.fields.iter().zip(cells).enumerate() {
            if cell.trim().is_empty() {
                continue;
            }
            (field.write)(&mut record, cell).map_err(|e| {
                PipelineError::codec(format!(
                    "row {} column {} ({}): {}",
                    row_index,
                    col + 1,
                    field.name,
                    e
                ))
            })?;
        }
        Ok(record)
    }
}

impl<R> Default for RecordBinding<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for RecordBinding<R> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<R> fmt::Debug for RecordBinding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.fields.iter().map(|field| &field.name))
            .finish()
    }
}

/// A business record that can be read from and written to a table
pub trait TabularRecord: Default + Clone + Send + Sync + 'static {
    fn binding() -> RecordBinding<Self>;
}

/// Parse a cell with `FromStr`, turning the error into a message
///
/// Surrounding whitespace is ignored.
pub fn parse_cell<T>(value: &str) -> std::result::Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = value.trim();
    value
        .parse::<T>()
        .map_err(|e| format!("cannot parse '{}': {}", value, e))
}
