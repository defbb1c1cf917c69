use tracing::debug;

use crate::{
    MAX_TRACKS,
    error::{ConfigError, Result},
    router::last_stage_targets,
    tags::Tag,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pass {
    Forward,
    Backward,
}

impl Pass {
    /// Tag carried by the data of this pass.
    pub fn tag(self) -> Tag {
        match self {
            Pass::Forward => Tag::Forward,
            Pass::Backward => Tag::Backward,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    Write,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassOrder {
    Forward,
    ForwardBackward,
}

impl PassOrder {
    pub fn passes(self) -> &'static [Pass] {
        match self {
            PassOrder::Forward => &[Pass::Forward],
            PassOrder::ForwardBackward => &[Pass::Forward, Pass::Backward],
        }
    }
}

/// Raw network parameters, validated by [Configuration::new].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parameters {
    /// Butterfly radix `R`.
    pub radix: usize,
    /// Number of stages `S`; the network transforms `R^S` points.
    pub stages: usize,
    /// Number of butterfly units working in parallel.
    pub psi: usize,
    /// Number of interleaved GLWE polynomials.
    pub glwe_k_plus_1: usize,
    /// Number of interleaved decomposition levels of the forward pass.
    pub pbs_l: usize,
    pub pass_order: PassOrder,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            radix: 8,
            stages: 3,
            psi: 2,
            glwe_k_plus_1: 3,
            pbs_l: 2,
            pass_order: PassOrder::ForwardBackward,
        }
    }
}

/// Validated parameters together with every derived constant of the schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Configuration {
    params: Parameters,
    log_radix: usize,
    coef_nb: usize,
    stage_units: usize,
    write_inputs: usize,
    stage_iters: usize,
    rot_shift: usize,
    rot_inc: usize,
}

impl Configuration {
    pub fn new(params: Parameters) -> Result<Self> {
        let Parameters {
            radix,
            stages,
            psi,
            glwe_k_plus_1,
            pbs_l,
            ..
        } = params;

        let log_radix: usize = match utils::exact_log2(radix) {
            Some(log_radix) if log_radix > 0 => log_radix,
            _ => return Err(ConfigError::InvalidRadix(radix).into()),
        };
        if stages < 2 {
            return Err(ConfigError::TooFewStages(stages).into());
        }
        if !psi.is_power_of_two() {
            return Err(ConfigError::InvalidPsi(psi).into());
        }
        let coef_nb: usize = match radix.checked_pow(stages as u32) {
            Some(n) => n,
            None => return Err(ConfigError::Overflow { radix, stages }.into()),
        };
        let stage_units: usize = coef_nb / radix;
        if psi > stage_units || stage_units % psi != 0 {
            return Err(ConfigError::PsiNotDividing { psi, stage_units }.into());
        }
        for (name, value) in [("glwe_k_plus_1", glwe_k_plus_1), ("pbs_l", pbs_l)] {
            if value == 0 || value > MAX_TRACKS {
                return Err(ConfigError::TrackCount { name, value }.into());
            }
        }

        let levels: usize = glwe_k_plus_1 * pbs_l;
        if store_words(levels, coef_nb).is_none() {
            return Err(ConfigError::StoreOverflow { levels, coef_nb }.into());
        }

        let (rot_shift, rot_inc) = dispatch_rot_shift(radix, stages, psi);

        let cfg: Configuration = Configuration {
            params,
            log_radix,
            coef_nb,
            stage_units,
            write_inputs: (psi * radix).div_ceil(stage_units),
            stage_iters: stage_units / psi,
            rot_shift,
            rot_inc,
        };

        for stage_iter in 0..cfg.stage_iters {
            let clusters = last_stage_targets(&cfg, stage_iter).into_iter().map(|(cluster, _)| cluster);
            if let Some(cluster) = utils::first_duplicate(clusters) {
                return Err(ConfigError::WriteConflict { stage_iter, cluster }.into());
            }
        }

        debug!(
            radix,
            stages,
            psi,
            stage_iters = cfg.stage_iters,
            write_inputs = cfg.write_inputs,
            rot_shift,
            rot_inc,
            "network configuration"
        );

        Ok(cfg)
    }

    #[inline]
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    #[inline]
    pub fn radix(&self) -> usize {
        self.params.radix
    }

    #[inline]
    pub fn log_radix(&self) -> usize {
        self.log_radix
    }

    #[inline]
    pub fn stages(&self) -> usize {
        self.params.stages
    }

    #[inline]
    pub fn psi(&self) -> usize {
        self.params.psi
    }

    #[inline]
    pub fn glwe_k_plus_1(&self) -> usize {
        self.params.glwe_k_plus_1
    }

    #[inline]
    pub fn pbs_l(&self) -> usize {
        self.params.pbs_l
    }

    #[inline]
    pub fn pass_order(&self) -> PassOrder {
        self.params.pass_order
    }

    /// Number of points `N = R^S`.
    #[inline]
    pub fn coef_nb(&self) -> usize {
        self.coef_nb
    }

    /// Butterfly invocations per stage, `R^(S-1)`.
    #[inline]
    pub fn stage_units(&self) -> usize {
        self.stage_units
    }

    /// Next-stage input positions produced per stage iteration, `ceil(PSI*R / R^(S-1))`.
    #[inline]
    pub fn write_inputs(&self) -> usize {
        self.write_inputs
    }

    /// Stage iterations per stage, `R^(S-1) / PSI`.
    #[inline]
    pub fn stage_iters(&self) -> usize {
        self.stage_iters
    }

    /// Points moved per stage iteration, `PSI*R`.
    #[inline]
    pub fn batch(&self) -> usize {
        self.params.psi * self.params.radix
    }

    /// Interleave levels the store holds: all tracks of the forward pass.
    #[inline]
    pub fn levels(&self) -> usize {
        self.params.glwe_k_plus_1 * self.params.pbs_l
    }

    pub fn active_levels(&self, pass: Pass) -> usize {
        match pass {
            Pass::Forward => self.levels(),
            Pass::Backward => self.params.glwe_k_plus_1,
        }
    }

    /// Decomposition levels interleaved per polynomial during `pass`.
    pub fn pass_pbs_l(&self, pass: Pass) -> usize {
        match pass {
            Pass::Forward => self.params.pbs_l,
            Pass::Backward => 1,
        }
    }

    /// Interleave level of track (`poly`, `dec`) during `pass`.
    pub fn level_of(&self, pass: Pass, poly: usize, dec: usize) -> usize {
        debug_assert!(dec < self.pass_pbs_l(pass));
        poly * self.pass_pbs_l(pass) + dec
    }

    #[inline]
    pub fn dispatch_rot_shift(&self) -> (usize, usize) {
        (self.rot_shift, self.rot_inc)
    }

    #[inline]
    pub fn parity(&self, stage: usize, pass: Pass, access: Access) -> usize {
        parity_of(self.params.stages, stage, pass, access)
    }
}

/// Words of a store holding both parity halves of `levels` interleaved
/// tracks of `coef_nb` points, if it fits in a `usize`.
pub fn store_words(levels: usize, coef_nb: usize) -> Option<usize> {
    coef_nb.checked_mul(levels)?.checked_mul(2)
}

/// Half of the ping-pong store accessed at `stage` of `pass`.
///
/// During the last stage of the forward pass the data is written in half 0,
/// which fixes the read parity of the first stage of the backward pass.
pub fn parity_of(stages: usize, stage: usize, pass: Pass, access: Access) -> usize {
    assert!(
        stage < stages,
        "invalid argument: stage={} >= stages={}",
        stage,
        stages
    );
    let offset: usize = match access {
        Access::Read => 1,
        Access::Write => 0,
    };
    match pass {
        Pass::Forward => (stage + offset) % 2,
        Pass::Backward => (stages - 1 - stage + 1 + offset) % 2,
    }
}

/// Rotation parameters of the pass hand-off, `(rot_shift, rot_inc)`.
///
/// At the last stage, every output of the BU `b` targets the single next-pass
/// BU `rev(b)` over `S-1` digits, whose index splits into
/// `{next stage iteration, next cluster}`. Several BUs of one stage iteration
/// may target the same cluster, so the clusters are rotated by the MSBs of
/// `rev(b)`: `rot_shift` selects them. When `log2(PSI)`, rounded up to whole
/// digits, covers the `S-1` digits, contiguous next-stage BUs occur within one
/// stage iteration and `rot_inc` adds a per-iteration spread.
pub fn dispatch_rot_shift(radix: usize, stages: usize, psi: usize) -> (usize, usize) {
    assert!(
        radix >= 2 && radix.is_power_of_two(),
        "invalid argument: radix={} is not a power of two",
        radix
    );
    assert!(psi.is_power_of_two(), "invalid argument: psi={} is not a power of two", psi);
    assert!(stages >= 2, "invalid argument: stages={} < 2", stages);

    let r_w: usize = radix.trailing_zeros() as usize;
    let psi_w: usize = psi.trailing_zeros() as usize;
    let psi_w_round_up: usize = psi_w.div_ceil(r_w) * r_w;
    let unit_w: usize = r_w * (stages - 1);

    let rot_shift: usize = if unit_w >= 2 * psi_w_round_up {
        unit_w - psi_w_round_up
    } else {
        psi_w_round_up
    };

    let rot_inc: usize = if psi_w_round_up == unit_w {
        1 << (psi_w % r_w)
    } else {
        0
    };

    (rot_shift, rot_inc)
}
