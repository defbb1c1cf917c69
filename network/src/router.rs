//! Read and write address generation of the ping-pong store.
//!
//! Each stage iteration, the `PSI` butterfly units of the cluster read `PSI*R`
//! words and write `PSI*R` words, one per (cluster, bank) pair, so that a
//! whole batch is a single clock cycle of the hardware.
//!
//! Within a stage (`stage > 0`), the units with ids in
//! `[b*R^(S-2), (b+1)*R^(S-2))` all produce input port `b` of the next stage,
//! and their output `i` targets next-stage unit `i`. At stage iteration `it`
//! the cluster therefore produces the input port `it*PSI / R^(S-2)` of the
//! next-stage units starting at `(it*PSI*R) mod R^(S-1)`. The outputs are
//! dispatched in next-stage cluster order and rotated over the banks so that
//! all of them can be written at once; the reader rotates them back.
//!
//! During the last stage (`stage == 0`) the outputs are reordered for the next
//! pass. The outputs of one unit are already in next-pass input order, so the
//! reordering is done on unit granularity: unit `b` feeds next-pass unit
//! `rev(b)`, and the units are spread over the clusters with the rotation of
//! [crate::dispatch_rot_shift]. The first stage of the next pass undoes it.

use itertools::iproduct;
use tracing::trace;

use crate::{
    config::{Access, Configuration, Pass},
    error::{NetworkError, Result},
    store::{DoubleBufferedStore, StoreCell},
};

pub struct AddressRouter {
    cfg: Configuration,
    /// Output index feeding each (cluster, slot) pair before the bank rotation
    /// of a non-terminal stage.
    dispatch: Vec<usize>,
}

impl AddressRouter {
    pub fn new(cfg: Configuration) -> Self {
        let dispatch: Vec<usize> = dispatch_order(&cfg);
        AddressRouter { cfg, dispatch }
    }

    #[inline]
    pub fn config(&self) -> &Configuration {
        &self.cfg
    }

    /// Cluster rotation undone when the first stage reads the hand-off of the
    /// previous pass.
    pub fn first_stage_rotation(&self, stage_iter: usize) -> usize {
        let (rot_shift, rot_inc) = self.cfg.dispatch_rot_shift();
        let psi: usize = self.cfg.psi();
        (((stage_iter * psi) >> rot_shift) + stage_iter * rot_inc) % psi
    }

    /// Bank rotation undone by the reader of a non-first stage.
    pub fn bank_rotation(&self, stage_iter: usize) -> usize {
        (stage_iter * self.cfg.write_inputs()) % self.cfg.radix()
    }

    /// Next-stage input port produced first during `stage_iter`; also the bank
    /// rotation applied by the writer of a non-terminal stage.
    pub fn next_unit_input(&self, stage_iter: usize) -> usize {
        (stage_iter * self.cfg.psi()) / (self.cfg.stage_units() / self.cfg.radix())
    }

    fn check(&self, stage: usize, stage_iter: usize, level: usize, pass: Pass) -> Result<()> {
        if stage >= self.cfg.stages() {
            return Err(NetworkError::bounds("stage", stage, self.cfg.stages()));
        }
        if stage_iter >= self.cfg.stage_iters() {
            return Err(NetworkError::bounds("stage_iter", stage_iter, self.cfg.stage_iters()));
        }
        if level >= self.cfg.active_levels(pass) {
            return Err(NetworkError::bounds("level", level, self.cfg.active_levels(pass)));
        }
        Ok(())
    }

    /// Cells read by the cluster at (`stage`, `stage_iter`), in cluster-major,
    /// bank-minor order: entry `cl*R + i` feeds input `i` of cluster unit `cl`.
    pub fn read_cells(&self, stage: usize, stage_iter: usize, level: usize, pass: Pass) -> Result<Vec<StoreCell>> {
        self.check(stage, stage_iter, level, pass)?;

        let psi: usize = self.cfg.psi();
        let radix: usize = self.cfg.radix();
        let parity: usize = self.cfg.parity(stage, pass, Access::Read);

        let cells: Vec<StoreCell> = if stage == self.cfg.stages() - 1 {
            let rot: usize = self.first_stage_rotation(stage_iter);
            trace!(?pass, stage, stage_iter, level, rot, "read first stage");
            iproduct!(0..psi, 0..radix)
                .map(|(cluster, bank)| StoreCell {
                    cluster: (rot + cluster) % psi,
                    bank,
                    parity,
                    level,
                    address: stage_iter,
                })
                .collect()
        } else {
            let rot: usize = self.bank_rotation(stage_iter);
            trace!(?pass, stage, stage_iter, level, rot, "read");
            iproduct!(0..psi, 0..radix)
                .map(|(cluster, i)| StoreCell {
                    cluster,
                    bank: (rot + i) % radix,
                    parity,
                    level,
                    address: stage_iter,
                })
                .collect()
        };

        Ok(cells)
    }

    pub fn read<T: Clone>(
        &self,
        store: &DoubleBufferedStore<T>,
        stage: usize,
        stage_iter: usize,
        level: usize,
        pass: Pass,
    ) -> Result<Vec<T>> {
        store.gather(&self.read_cells(stage, stage_iter, level, pass)?)
    }

    /// Destination of every output of the cluster at (`stage`, `stage_iter`):
    /// entry `k` is where output `k` (output `k mod R` of cluster unit
    /// `k / R`) is written. The `PSI*R` cells are pairwise distinct.
    pub fn write_cells(&self, stage: usize, stage_iter: usize, level: usize, pass: Pass) -> Result<Vec<StoreCell>> {
        self.check(stage, stage_iter, level, pass)?;

        let psi: usize = self.cfg.psi();
        let radix: usize = self.cfg.radix();
        let parity: usize = self.cfg.parity(stage, pass, Access::Write);

        let mut cells: Vec<StoreCell> = vec![StoreCell::default(); self.cfg.batch()];

        if stage > 0 {
            let rot: usize = self.next_unit_input(stage_iter);
            let next_stage_iter_0: usize = ((stage_iter * psi * radix) % self.cfg.stage_units()) / psi;
            trace!(?pass, stage, stage_iter, level, rot, next_stage_iter_0, "write");

            for (cluster, bank) in iproduct!(0..psi, 0..radix) {
                let slot: usize = (bank + radix - rot) % radix;
                cells[self.dispatch[cluster * radix + slot]] = StoreCell {
                    cluster,
                    bank,
                    parity,
                    level,
                    address: next_stage_iter_0 + slot / self.cfg.write_inputs(),
                };
            }
        } else {
            let targets: Vec<(usize, usize)> = last_stage_targets(&self.cfg, stage_iter);
            trace!(?pass, stage_iter, level, ?targets, "write last stage");

            for (cluster, (target, address)) in targets.into_iter().enumerate() {
                for bank in 0..radix {
                    cells[cluster * radix + bank] = StoreCell {
                        cluster: target,
                        bank,
                        parity,
                        level,
                        address,
                    };
                }
            }
        }

        if let Some(i) = utils::first_duplicate(cells.iter()) {
            return Err(NetworkError::violation(format!(
                "write conflict at stage {} iteration {}: {:?} targeted twice",
                stage, stage_iter, cells[i]
            )));
        }

        Ok(cells)
    }

    pub fn write<T: Clone>(
        &self,
        store: &mut DoubleBufferedStore<T>,
        stage: usize,
        stage_iter: usize,
        level: usize,
        pass: Pass,
        outputs: &[T],
    ) -> Result<()> {
        if outputs.len() != self.cfg.batch() {
            return Err(NetworkError::bounds("outputs", outputs.len(), self.cfg.batch()));
        }
        let cells: Vec<StoreCell> = self.write_cells(stage, stage_iter, level, pass)?;
        store.write_batch(cells.into_iter().zip(outputs.iter().cloned()))
    }
}

/// Stride dispatch of the outputs of a non-terminal stage into next-stage
/// cluster order. If a stage iteration produces several next-stage input
/// ports (`R^(S-1) < PSI*R`), the ports are interleaved within each cluster.
fn dispatch_order(cfg: &Configuration) -> Vec<usize> {
    let psi: usize = cfg.psi();
    let radix: usize = cfg.radix();
    let order: Vec<usize> = utils::inc_stride(psi * radix, psi, 1);

    if cfg.stage_units() >= psi * radix {
        return order;
    }

    let slots: Vec<usize> = utils::inc_stride(radix, cfg.stage_iters(), 1);
    iproduct!(0..psi, slots.iter())
        .map(|(cluster, slot)| order[cluster * radix + slot])
        .collect()
}

/// `(target cluster, address)` of each cluster unit during the last stage at
/// `stage_iter`.
pub(crate) fn last_stage_targets(cfg: &Configuration, stage_iter: usize) -> Vec<(usize, usize)> {
    let psi: usize = cfg.psi();
    let (rot_shift, rot_inc) = cfg.dispatch_rot_shift();
    (0..psi)
        .map(|cluster| {
            let rev: usize = utils::reverse_digits(stage_iter * psi + cluster, cfg.log_radix(), cfg.stages() - 1);
            let (next_stage_iter, next_cluster) = (rev / psi, rev % psi);
            let rot: usize = ((rev >> rot_shift) + next_stage_iter * rot_inc) % psi;
            ((next_cluster + rot) % psi, next_stage_iter)
        })
        .collect()
}
