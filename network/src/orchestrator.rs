use tracing::debug;

use crate::{
    boundary::PassBoundaryTransform,
    butterfly::ButterflyUnit,
    config::{Configuration, Pass},
    coordinate::Coordinate,
    error::{NetworkError, Result},
    router::AddressRouter,
    store::DoubleBufferedStore,
    tags::{Tag, TagSet},
};

/// Input points of the forward pass: one track of `N` points per
/// (polynomial, decomposition level), in network input order.
#[derive(Clone, Debug)]
pub struct Stimulus {
    pbs_l: usize,
    tracks: Vec<Vec<Coordinate>>,
}

impl Stimulus {
    /// Reference input: every track lists the points in stride order
    /// `0, N/R, 2N/R, ...`, so that each group of `R` consecutive entries
    /// is the input of one first-stage unit, ports in order.
    pub fn reference(cfg: &Configuration) -> Result<Self> {
        let n: usize = cfg.coef_nb();
        let order: Vec<usize> = utils::inc_stride(n, n / cfg.radix(), 1);
        let mut tracks: Vec<Vec<Coordinate>> = Vec::with_capacity(cfg.levels());
        for poly in 0..cfg.glwe_k_plus_1() {
            for dec in 0..cfg.pbs_l() {
                let tags: TagSet = [Tag::Forward, Tag::Poly(poly), Tag::Level(dec)].into_iter().collect();
                let track: Vec<Coordinate> = order
                    .iter()
                    .map(|v| Coordinate::new(cfg.stages() as i32 - 1, cfg.stages(), *v, cfg.radix(), tags))
                    .collect::<Result<Vec<Coordinate>>>()?;
                tracks.push(track);
            }
        }
        Ok(Stimulus {
            pbs_l: cfg.pbs_l(),
            tracks,
        })
    }

    /// Tracks indexed by `poly * PBS_L + dec`.
    pub fn from_tracks(cfg: &Configuration, tracks: Vec<Vec<Coordinate>>) -> Result<Self> {
        if tracks.len() != cfg.levels() {
            return Err(NetworkError::bounds("tracks", tracks.len(), cfg.levels()));
        }
        if let Some(track) = tracks.iter().find(|t| t.len() != cfg.coef_nb()) {
            return Err(NetworkError::bounds("track length", track.len(), cfg.coef_nb()));
        }
        Ok(Stimulus {
            pbs_l: cfg.pbs_l(),
            tracks,
        })
    }

    pub fn track(&self, poly: usize, dec: usize) -> &[Coordinate] {
        &self.tracks[poly * self.pbs_l + dec]
    }
}

/// Terminal points of one pass, before the boundary transform, per level and
/// in natural output order.
#[derive(Clone, Debug)]
pub struct PassOutput {
    pub pass: Pass,
    pub levels: Vec<Vec<Coordinate>>,
}

pub struct NetworkOrchestrator<B: ButterflyUnit> {
    router: AddressRouter,
    boundary: PassBoundaryTransform,
    store: DoubleBufferedStore<Coordinate>,
    butterfly: B,
}

impl<B: ButterflyUnit> NetworkOrchestrator<B> {
    pub fn new(cfg: Configuration, butterfly: B) -> Self {
        NetworkOrchestrator {
            boundary: PassBoundaryTransform::new(&cfg),
            store: DoubleBufferedStore::new(&cfg),
            router: AddressRouter::new(cfg),
            butterfly,
        }
    }

    #[inline]
    pub fn config(&self) -> &Configuration {
        self.router.config()
    }

    #[inline]
    pub fn router(&self) -> &AddressRouter {
        &self.router
    }

    #[inline]
    pub fn store(&self) -> &DoubleBufferedStore<Coordinate> {
        &self.store
    }

    pub fn reset(&mut self) {
        self.store.clear();
    }

    /// Runs every pass of the configured pass order.
    pub fn run(&mut self, stimulus: &Stimulus) -> Result<Vec<PassOutput>> {
        self.config()
            .pass_order()
            .passes()
            .iter()
            .map(|pass| self.run_pass(*pass, stimulus))
            .collect()
    }

    /// Runs the `S` stages of one pass. The stimulus is only consumed by the
    /// first stage of the forward pass; every other stage reads the store.
    pub fn run_pass(&mut self, pass: Pass, stimulus: &Stimulus) -> Result<PassOutput> {
        let cfg: Configuration = self.router.config().clone();
        let stages: usize = cfg.stages();
        let psi: usize = cfg.psi();
        let radix: usize = cfg.radix();
        let batch: usize = cfg.batch();
        let pass_pbs_l: usize = cfg.pass_pbs_l(pass);

        let mut terminal: Vec<Vec<Coordinate>> = vec![Vec::with_capacity(cfg.coef_nb()); cfg.active_levels(pass)];

        for stage in (0..stages).rev() {
            debug!(?pass, stage, "stage");

            for stage_iter in 0..cfg.stage_iters() {
                let accumulate: bool = stage == 0 && pass == Pass::Forward;
                let mut registers: Vec<Vec<Option<Coordinate>>> = if accumulate {
                    vec![vec![None; batch]; cfg.glwe_k_plus_1()]
                } else {
                    Vec::new()
                };

                for poly in 0..cfg.glwe_k_plus_1() {
                    for dec in 0..pass_pbs_l {
                        let level: usize = cfg.level_of(pass, poly, dec);

                        let inputs: Vec<Coordinate> = if stage == stages - 1 && pass == Pass::Forward {
                            stimulus.track(poly, dec)[stage_iter * batch..(stage_iter + 1) * batch].to_vec()
                        } else {
                            self.router.read(&self.store, stage, stage_iter, level, pass)?
                        };

                        let mut outputs: Vec<Coordinate> = Vec::with_capacity(batch);
                        for (cluster, chunk) in inputs.chunks_exact(radix).enumerate() {
                            let unit: Coordinate = Coordinate::new(
                                stage as i32,
                                stages - 1,
                                stage_iter * psi + cluster,
                                radix,
                                TagSet::empty(),
                            )?;
                            outputs.extend(self.butterfly.compute(chunk, &unit)?);
                        }
                        if outputs.len() != batch {
                            return Err(NetworkError::bounds("outputs", outputs.len(), batch));
                        }

                        if stage > 0 {
                            self.router.write(&mut self.store, stage, stage_iter, level, pass, &outputs)?;
                            continue;
                        }

                        terminal[level].extend_from_slice(&outputs);

                        match pass {
                            Pass::Forward => {
                                for (i, point) in outputs.iter().enumerate() {
                                    for (fanout, rewound) in self.boundary.forward(point)?.into_iter().enumerate() {
                                        let slot: &mut Option<Coordinate> = &mut registers[fanout][i];
                                        *slot = Some(match slot.take() {
                                            Some(acc) => acc.merge(&rewound)?,
                                            None => rewound,
                                        });
                                    }
                                }
                            }
                            Pass::Backward => {
                                let done: Vec<Coordinate> = outputs
                                    .iter()
                                    .map(|point| self.boundary.backward(point))
                                    .collect::<Result<Vec<Coordinate>>>()?;
                                self.router.write(&mut self.store, 0, stage_iter, level, pass, &done)?;
                            }
                        }
                    }
                }

                // The hand-off is written once every forward level was accumulated.
                for (fanout, register) in registers.into_iter().enumerate() {
                    let register: Vec<Coordinate> = register
                        .into_iter()
                        .map(|slot| -> Result<Coordinate> {
                            let point: Coordinate = slot.ok_or_else(|| {
                                NetworkError::violation(format!(
                                    "accumulation register {} incomplete at stage iteration {}",
                                    fanout, stage_iter
                                ))
                            })?;
                            self.boundary.check_complete(&point)?;
                            Ok(point)
                        })
                        .collect::<Result<Vec<Coordinate>>>()?;
                    self.router.write(&mut self.store, 0, stage_iter, fanout, Pass::Forward, &register)?;
                }
            }
        }

        Ok(PassOutput {
            pass,
            levels: terminal,
        })
    }

    /// Reads the points handed off by the last pass of the pass order for
    /// polynomial `poly`, through the first-stage read path of the pass that
    /// would follow, in network input order.
    pub fn drain(&self, poly: usize) -> Result<Vec<Coordinate>> {
        let cfg: &Configuration = self.router.config();
        if poly >= cfg.glwe_k_plus_1() {
            return Err(NetworkError::bounds("poly", poly, cfg.glwe_k_plus_1()));
        }
        let next: Pass = match cfg.pass_order().passes().last() {
            Some(Pass::Forward) => Pass::Backward,
            _ => Pass::Forward,
        };
        let mut points: Vec<Coordinate> = Vec::with_capacity(cfg.coef_nb());
        for stage_iter in 0..cfg.stage_iters() {
            points.extend(self.router.read(&self.store, cfg.stages() - 1, stage_iter, poly, next)?);
        }
        Ok(points)
    }
}
