//! Sparse arrays
//!
//! A sparse array keeps an insertion-ordered list of occupied
//! coordinates next to coordinate-to-value maps. The on-disk `IR`/`JC`
//! export is derived from that insertion order, not from a sorted order;
//! readers that assume ascending row-major-within-column data get the
//! coordinates the producer assigned, in the order it assigned them.

use hashbrown::HashMap;
use mat5_core::Attributes;

use super::ArrayMeta;

/// Sparse double-precision array with coordinate storage
#[derive(Debug, Clone, PartialEq)]
pub struct SparseArray {
    meta: ArrayMeta,
    nz_max: usize,
    /// Occupied coordinates in insertion order
    keys: Vec<(usize, usize)>,
    real: HashMap<(usize, usize), f64>,
    imaginary: HashMap<(usize, usize), f64>,
}

impl SparseArray {
    /// Create a sparse array with capacity for `nz_max` non-zero entries
    pub fn new(name: &str, dims: Vec<usize>, nz_max: usize) -> Self {
        Self::with_attributes(name, dims, Attributes::none(), nz_max)
    }

    /// Create a sparse array with explicit attributes
    pub fn with_attributes(
        name: &str,
        dims: Vec<usize>,
        attributes: Attributes,
        nz_max: usize,
    ) -> Self {
        SparseArray {
            meta: ArrayMeta::new(name, dims, attributes),
            nz_max,
            keys: Vec::new(),
            real: HashMap::new(),
            imaginary: HashMap::new(),
        }
    }

    /// Shared metadata
    pub fn meta(&self) -> &ArrayMeta {
        &self.meta
    }

    /// Declared maximum number of non-zero entries
    pub fn nz_max(&self) -> usize {
        self.nz_max
    }

    /// Number of occupied coordinates
    pub fn nnz(&self) -> usize {
        self.keys.len()
    }

    /// Store a real value at `(m, n)`, registering the coordinate on
    /// first assignment
    pub fn set_real(&mut self, m: usize, n: usize, value: f64) {
        self.touch((m, n));
        self.real.insert((m, n), value);
    }

    /// The real value at `(m, n)`; unoccupied coordinates read as zero
    pub fn get_real(&self, m: usize, n: usize) -> f64 {
        self.real.get(&(m, n)).copied().unwrap_or(0.0)
    }

    /// Store an imaginary value at `(m, n)`.
    ///
    /// Silently ignored unless the complex attribute is set.
    pub fn set_imaginary(&mut self, m: usize, n: usize, value: f64) {
        if !self.meta.is_complex() {
            return;
        }
        self.touch((m, n));
        self.imaginary.insert((m, n), value);
    }

    /// The imaginary value at `(m, n)`; zero when unoccupied or real
    pub fn get_imaginary(&self, m: usize, n: usize) -> f64 {
        self.imaginary.get(&(m, n)).copied().unwrap_or(0.0)
    }

    /// Occupied coordinates in insertion order
    pub fn coordinates(&self) -> &[(usize, usize)] {
        &self.keys
    }

    /// Occupied entries as `(row, col, real, imaginary)` in insertion
    /// order
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64, f64)> + '_ {
        self.keys
            .iter()
            .map(|&(m, n)| (m, n, self.get_real(m, n), self.get_imaginary(m, n)))
    }

    /// Row index export (`IR`): one entry per occupied coordinate in
    /// insertion order, zero-padded to `nz_max`
    pub fn row_indices(&self) -> Vec<usize> {
        let mut ir = vec![0; self.nz_max];
        for (i, &(m, _)) in self.keys.iter().enumerate().take(self.nz_max) {
            ir[i] = m;
        }
        ir
    }

    /// Column pointer export (`JC`): `N + 1` entries where slot `k`
    /// holds the column of the `k`-th occupied coordinate (clamped to
    /// the last assigned value past the end) and the final slot holds
    /// `nz_max`
    pub fn col_pointers(&self) -> Vec<usize> {
        let cols: Vec<usize> = self.keys.iter().map(|&(_, n)| n).collect();
        let mut jc = vec![0; self.meta.n() + 1];
        let mut current = 0;
        for (k, slot) in jc.iter_mut().take(self.meta.n()).enumerate() {
            if k < cols.len() {
                current = cols[k];
            }
            *slot = current;
        }
        jc[self.meta.n()] = self.nz_max;
        jc
    }

    /// Real value export (`PR`): values in insertion order, zero-padded
    /// to `nz_max`
    pub fn export_real(&self) -> Vec<f64> {
        let mut pr = vec![0.0; self.nz_max];
        for (i, &key) in self.keys.iter().enumerate().take(self.nz_max) {
            pr[i] = self.real.get(&key).copied().unwrap_or(0.0);
        }
        pr
    }

    /// Imaginary value export (`PI`): values in insertion order,
    /// zero-padded to `nz_max`
    pub fn export_imaginary(&self) -> Vec<f64> {
        let mut pi = vec![0.0; self.nz_max];
        for (i, &key) in self.keys.iter().enumerate().take(self.nz_max) {
            pi[i] = self.imaginary.get(&key).copied().unwrap_or(0.0);
        }
        pi
    }

    /// Render the occupied entries as `(m,n)\tvalue` lines
    pub fn content_to_string(&self) -> String {
        let mut out = format!("{} = \n", self.meta.name());
        for (m, n, re, im) in self.entries() {
            out.push_str(&format!("\t({m},{n})\t{re}"));
            if self.meta.is_complex() {
                out.push_str(&format!("+{im}"));
            }
            out.push('\n');
        }
        out
    }

    fn touch(&mut self, key: (usize, usize)) {
        if !self.real.contains_key(&key) && !self.imaginary.contains_key(&key) {
            self.keys.push(key);
        }
    }
}
