//! Structure arrays
//!
//! A structure array shares one ordered field-name set across all of its
//! `M * N` instances. Field names are append-only in first-seen order;
//! that order is the on-disk order. The parallel name-list/value-row
//! layout keeps every instance covering exactly the declared field set.

use mat5_core::Attributes;

use super::{ArrayMeta, EmptyArray, MatArray};

/// Structure array with an ordered, shared field-name set
#[derive(Debug, Clone, PartialEq)]
pub struct StructArray {
    meta: ArrayMeta,
    fields: Vec<String>,
    /// One value row per instance, each parallel to `fields`
    instances: Vec<Vec<MatArray>>,
}

impl StructArray {
    /// Create a structure array with no fields yet
    pub fn new(name: &str, dims: Vec<usize>) -> Self {
        Self::with_attributes(name, dims, Attributes::none())
    }

    /// Create a fieldless structure array with explicit attributes
    pub fn with_attributes(name: &str, dims: Vec<usize>, attributes: Attributes) -> Self {
        let meta = ArrayMeta::new(name, dims, attributes);
        let instances = vec![Vec::new(); meta.size()];
        StructArray {
            meta,
            fields: Vec::new(),
            instances,
        }
    }

    /// Shared metadata
    pub fn meta(&self) -> &ArrayMeta {
        &self.meta
    }

    /// Declared field names in on-disk order
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// Stride of the on-disk field-name table: the longest name plus the
    /// terminating zero
    pub fn max_field_len(&self) -> usize {
        self.fields.iter().map(|f| f.len()).max().unwrap_or(0) + 1
    }

    /// Assign a field of the instance at a column-packed index.
    ///
    /// A new field name joins the set in first-seen order and every
    /// instance gains an empty placeholder for it.
    ///
    /// Panics when the index is outside `[0, size)`.
    pub fn set_field(&mut self, name: &str, index: usize, value: MatArray) {
        let slot = match self.fields.iter().position(|f| f == name) {
            Some(slot) => slot,
            None => {
                self.fields.push(String::from(name));
                for instance in &mut self.instances {
                    instance.push(MatArray::Empty(EmptyArray::new()));
                }
                self.fields.len() - 1
            }
        };
        self.instances[index][slot] = value;
    }

    /// Assign a field of the instance at `(m, n)`
    pub fn set_field_rc(&mut self, name: &str, m: usize, n: usize, value: MatArray) {
        let index = self.meta.index_of(m, n);
        self.set_field(name, index, value);
    }

    /// Assign a field of the first instance (convenience for 1x1
    /// structures)
    pub fn set(&mut self, name: &str, value: MatArray) {
        self.set_field(name, 0, value);
    }

    /// The value of `name` in the instance at a column-packed index
    pub fn field(&self, name: &str, index: usize) -> Option<&MatArray> {
        let slot = self.fields.iter().position(|f| f == name)?;
        self.instances.get(index)?.get(slot)
    }

    /// The value of `name` in the instance at `(m, n)`
    pub fn field_rc(&self, name: &str, m: usize, n: usize) -> Option<&MatArray> {
        self.field(name, self.meta.index_of(m, n))
    }

    /// All field values of one instance, in field order
    pub fn instance(&self, index: usize) -> &[MatArray] {
        &self.instances[index]
    }

    /// Every field value of every instance: instances in column-major
    /// order, fields in declared order within each
    pub fn all_fields(&self) -> impl Iterator<Item = &MatArray> {
        self.instances.iter().flatten()
    }

    /// Render the contents: field values for a scalar struct, the field
    /// list otherwise
    pub fn content_to_string(&self) -> String {
        let mut out = format!("{} = \n", self.meta.name());
        if self.meta.size() == 1 {
            for (slot, name) in self.fields.iter().enumerate() {
                out.push_str(&format!(
                    "\t{} : {}\n",
                    name,
                    self.instances[0][slot].content_to_string()
                ));
            }
        } else {
            out.push_str(&format!(
                "\n{}x{} struct array with fields: \n",
                self.meta.m(),
                self.meta.n()
            ));
            for name in &self.fields {
                out.push_str(&format!("\t{name}\n"));
            }
        }
        out
    }
}
