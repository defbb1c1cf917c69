use crate::{
    config::{Configuration, Pass},
    coordinate::Coordinate,
    error::{NetworkError, Result},
    tags::{Tag, TagSet},
};

/// Rewinds terminal points of a pass into input points of the next one.
///
/// The forward boundary fans each point out to `GLWE_K+1` backward tracks; the
/// backward boundary collapses the accumulated tracks into one finished point.
#[derive(Clone, Debug)]
pub struct PassBoundaryTransform {
    radix: usize,
    log_radix: usize,
    stages: usize,
    glwe_k_plus_1: usize,
    pbs_l: usize,
}

impl PassBoundaryTransform {
    pub fn new(cfg: &Configuration) -> Self {
        PassBoundaryTransform {
            radix: cfg.radix(),
            log_radix: cfg.log_radix(),
            stages: cfg.stages(),
            glwe_k_plus_1: cfg.glwe_k_plus_1(),
            pbs_l: cfg.pbs_l(),
        }
    }

    pub fn apply(&self, point: &Coordinate, pass: Pass) -> Result<Vec<Coordinate>> {
        match pass {
            Pass::Forward => self.forward(point),
            Pass::Backward => Ok(vec![self.backward(point)?]),
        }
    }

    /// One terminal forward point seeds `GLWE_K+1` backward tracks.
    pub fn forward(&self, point: &Coordinate) -> Result<Vec<Coordinate>> {
        let rewound: Coordinate = self.rewind(point, Pass::Forward)?;
        let tags: TagSet = point.tags().without(Tag::Forward).with(Tag::Backward);
        Ok((0..self.glwe_k_plus_1)
            .map(|i| rewound.with_tags(tags.with(Tag::Fanout(i))))
            .collect())
    }

    pub fn backward(&self, point: &Coordinate) -> Result<Coordinate> {
        let rewound: Coordinate = self.rewind(point, Pass::Backward)?;
        self.check_complete(point)?;
        Ok(rewound.with_tags(point.tags().without(Tag::Backward).with(Tag::Done)))
    }

    /// Checks that `point` accumulated every polynomial and decomposition level.
    pub fn check_complete(&self, point: &Coordinate) -> Result<()> {
        let missing: Option<Tag> = (0..self.glwe_k_plus_1)
            .map(Tag::Poly)
            .chain((0..self.pbs_l).map(Tag::Level))
            .find(|t| !point.tags().contains(*t));
        match missing {
            Some(tag) => Err(NetworkError::violation(format!(
                "incomplete accumulation: {:?} missing in {}",
                tag, point
            ))),
            None => Ok(()),
        }
    }

    fn rewind(&self, point: &Coordinate, pass: Pass) -> Result<Coordinate> {
        if point.stage() != -1 {
            return Err(NetworkError::violation(format!(
                "not a terminal coordinate: {}",
                point
            )));
        }
        if point.length() != self.stages || point.radix() != self.radix {
            return Err(NetworkError::violation(format!(
                "point {} does not match a radix-{} network of {} stages",
                point, self.radix, self.stages
            )));
        }
        if !point.tags().contains(pass.tag()) {
            return Err(NetworkError::violation(format!(
                "expected data from the {:?} pass: {}",
                pass, point
            )));
        }
        let value: usize = utils::reverse_digits(point.value(), self.log_radix, self.stages);
        Coordinate::new(self.stages as i32 - 1, self.stages, value, self.radix, point.tags())
    }
}
