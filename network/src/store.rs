use crate::{
    config::Configuration,
    error::{NetworkError, Result},
};

/// Address of one word of the ping-pong store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreCell {
    /// Butterfly unit of the cluster the bank is attached to, in `[0, PSI)`.
    pub cluster: usize,
    /// Bank, i.e. BU port, in `[0, R)`.
    pub bank: usize,
    pub parity: usize,
    pub level: usize,
    /// Word address inside the bank, a stage iteration.
    pub address: usize,
}

/// `PSI x R` banks, each split in two parity halves holding `levels x depth`
/// words.
pub struct DoubleBufferedStore<T> {
    psi: usize,
    radix: usize,
    levels: usize,
    depth: usize,
    cells: Vec<Option<T>>,
}

impl<T: Clone> DoubleBufferedStore<T> {
    pub fn new(cfg: &Configuration) -> Self {
        Self::alloc(cfg.psi(), cfg.radix(), cfg.levels(), cfg.stage_iters())
    }

    /// # Panics
    ///
    /// If the number of words overflows `usize`. [Configuration::new] rejects
    /// such configurations.
    pub fn alloc(psi: usize, radix: usize, levels: usize, depth: usize) -> Self {
        let size: usize = [radix, levels, depth]
            .into_iter()
            .try_fold(psi, |acc, x| acc.checked_mul(x))
            .and_then(|words| crate::config::store_words(1, words))
            .unwrap_or_else(|| {
                panic!(
                    "invalid argument: store of psi={} radix={} levels={} depth={} overflows usize",
                    psi, radix, levels, depth
                )
            });
        DoubleBufferedStore {
            psi,
            radix,
            levels,
            depth,
            cells: vec![None; size],
        }
    }

    #[inline]
    pub fn psi(&self) -> usize {
        self.psi
    }

    #[inline]
    pub fn radix(&self) -> usize {
        self.radix
    }

    #[inline]
    pub fn levels(&self) -> usize {
        self.levels
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total number of words.
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Number of words holding a value.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    fn index(&self, cell: &StoreCell) -> Result<usize> {
        let bounds: [(&'static str, usize, usize); 5] = [
            ("cluster", cell.cluster, self.psi),
            ("bank", cell.bank, self.radix),
            ("parity", cell.parity, 2),
            ("level", cell.level, self.levels),
            ("address", cell.address, self.depth),
        ];
        if let Some((what, value, bound)) = bounds.into_iter().find(|(_, v, b)| v >= b) {
            return Err(NetworkError::bounds(what, value, bound));
        }
        Ok((((cell.cluster * self.radix + cell.bank) * 2 + cell.parity) * self.levels + cell.level) * self.depth
            + cell.address)
    }

    pub fn peek(&self, cell: &StoreCell) -> Result<Option<&T>> {
        let idx: usize = self.index(cell)?;
        Ok(self.cells[idx].as_ref())
    }

    pub fn get(&self, cell: &StoreCell) -> Result<&T> {
        self.peek(cell)?
            .ok_or_else(|| NetworkError::violation(format!("read of unwritten cell {:?}", cell)))
    }

    /// Reads `cells` in order.
    pub fn gather(&self, cells: &[StoreCell]) -> Result<Vec<T>> {
        cells.iter().map(|c| self.get(c).cloned()).collect()
    }

    /// Writes a batch of words in one step. Either every word is written or,
    /// if a cell is out of range or targeted twice, none is.
    pub fn write_batch<I>(&mut self, batch: I) -> Result<()>
    where
        I: IntoIterator<Item = (StoreCell, T)>,
    {
        let batch: Vec<(StoreCell, T)> = batch.into_iter().collect();
        let indices: Vec<usize> = batch
            .iter()
            .map(|(cell, _)| self.index(cell))
            .collect::<Result<Vec<usize>>>()?;
        if let Some(i) = utils::first_duplicate(indices.iter()) {
            return Err(NetworkError::violation(format!(
                "write conflict: cell {:?} targeted twice in one batch",
                batch[i].0
            )));
        }
        indices
            .into_iter()
            .zip(batch)
            .for_each(|(idx, (_, value))| self.cells[idx] = Some(value));
        Ok(())
    }

    /// Content of one parity half of one level, ordered by address, then
    /// cluster, then bank.
    pub fn snapshot(&self, parity: usize, level: usize) -> Result<Vec<Option<T>>> {
        let mut words: Vec<Option<T>> = Vec::with_capacity(self.psi * self.radix * self.depth);
        for address in 0..self.depth {
            for cluster in 0..self.psi {
                for bank in 0..self.radix {
                    let cell: StoreCell = StoreCell {
                        cluster,
                        bank,
                        parity,
                        level,
                        address,
                    };
                    words.push(self.peek(&cell)?.cloned());
                }
            }
        }
        Ok(words)
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }
}
