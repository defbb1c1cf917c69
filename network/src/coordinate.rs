//! Coordinates of butterfly units and points inside the network.
//!
//! A network of `S` stages processes `R^S` points. Within each stage the
//! radix-`R` butterfly unit (BU) is used `R^(S-1)` times. Stages are numbered
//! from the input (`S-1`) down to the output (`0`); a point leaving stage `0`
//! carries stage `-1`.
//!
//! A coordinate of `S-1` digits names a BU of a stage, a coordinate of `S`
//! digits names a point. Seen as an input, a point sits on the port given by
//! its most significant digit; seen as an output, by its least significant one.

use std::fmt;

use crate::{
    error::{ConfigError, NetworkError, Result},
    tags::TagSet,
};

/// Side of a butterfly unit a point is looked at from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Port {
    Input,
    Output,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    stage: i32,
    length: usize,
    value: usize,
    log_radix: usize,
    tags: TagSet,
}

impl Coordinate {
    pub fn new(stage: i32, length: usize, value: usize, radix: usize, tags: TagSet) -> Result<Self> {
        if radix < 2 || !radix.is_power_of_two() {
            return Err(ConfigError::InvalidRadix(radix).into());
        }
        if stage < -1 {
            return Err(NetworkError::Bounds {
                what: "stage",
                value: stage as i64,
                bound: -1,
            });
        }
        let span: usize = match radix.checked_pow(length as u32) {
            Some(span) => span,
            None => return Err(NetworkError::bounds("length", length, usize::BITS as usize)),
        };
        if value >= span {
            return Err(NetworkError::bounds("value", value, span));
        }
        Ok(Coordinate {
            stage,
            length,
            value,
            log_radix: radix.trailing_zeros() as usize,
            tags,
        })
    }

    /// Builds a coordinate from its little-endian digits.
    pub fn from_digits(stage: i32, digits: &[usize], radix: usize, tags: TagSet) -> Result<Self> {
        if let Some(d) = digits.iter().find(|d| **d >= radix) {
            return Err(NetworkError::bounds("digit", *d, radix));
        }
        let log_radix: usize = radix.trailing_zeros() as usize;
        if radix.is_power_of_two() && digits.len() * log_radix >= usize::BITS as usize {
            return Err(NetworkError::bounds("length", digits.len(), usize::BITS as usize));
        }
        Coordinate::new(stage, digits.len(), utils::from_digits(digits, log_radix), radix, tags)
    }

    #[inline]
    pub fn stage(&self) -> i32 {
        self.stage
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn value(&self) -> usize {
        self.value
    }

    #[inline]
    pub fn radix(&self) -> usize {
        1 << self.log_radix
    }

    #[inline]
    pub fn log_radix(&self) -> usize {
        self.log_radix
    }

    #[inline]
    pub fn tags(&self) -> TagSet {
        self.tags
    }

    /// Number of distinct values: `radix^length`.
    #[inline]
    pub fn span(&self) -> usize {
        1 << (self.log_radix * self.length)
    }

    pub fn with_tags(self, tags: TagSet) -> Self {
        Coordinate { tags, ..self }
    }

    pub fn digits(&self) -> Vec<usize> {
        utils::digits_of(self.value, self.log_radix, self.length)
    }

    /// Increments the value, wrapping around `radix^length`.
    pub fn advance(&mut self, delta: usize) {
        let span: usize = self.span();
        self.value = (self.value + delta % span) % span;
    }

    /// Coordinate of output `position` of this BU.
    pub fn output(&self, position: usize, tags: TagSet) -> Result<Coordinate> {
        if position >= self.radix() {
            return Err(NetworkError::bounds("position", position, self.radix()));
        }
        if self.stage < 0 {
            return Err(NetworkError::violation(format!(
                "{} is past the last stage and has no outputs",
                self
            )));
        }
        let value: usize = match self.value.checked_mul(self.radix()) {
            Some(v) => v + position,
            None => return Err(NetworkError::bounds("length", self.length + 1, usize::BITS as usize)),
        };
        Coordinate::new(self.stage - 1, self.length + 1, value, self.radix(), tags)
    }

    /// Port this point occupies on its BU.
    pub fn position(&self, port: Port) -> Result<usize> {
        self.check_point()?;
        Ok(match port {
            Port::Input => self.value >> (self.log_radix * (self.length - 1)),
            Port::Output => self.value & (self.radix() - 1),
        })
    }

    /// Coordinate of the BU owning this point: the position digit is dropped.
    pub fn unit(&self, port: Port) -> Result<Coordinate> {
        self.check_point()?;
        let value: usize = match port {
            Port::Input => self.value & ((1 << (self.log_radix * (self.length - 1))) - 1),
            Port::Output => self.value >> self.log_radix,
        };
        Ok(Coordinate {
            length: self.length - 1,
            value,
            ..*self
        })
    }

    /// Checks whether `point`, seen as an input, feeds this BU.
    pub fn belongs_to(&self, point: &Coordinate) -> Result<bool> {
        if self.length + 1 != point.length || self.log_radix != point.log_radix {
            return Err(NetworkError::violation(format!(
                "unit {} and point {} are not compatible",
                self, point
            )));
        }
        Ok(point.unit(Port::Input)?.value == self.value && point.stage == self.stage)
    }

    /// Union of the tags of two coordinates naming the same point.
    pub fn merge(&self, other: &Coordinate) -> Result<Coordinate> {
        if self.stage != other.stage
            || self.length != other.length
            || self.value != other.value
            || self.log_radix != other.log_radix
        {
            return Err(NetworkError::violation(format!(
                "coordinates cannot be merged: {} {}",
                self, other
            )));
        }
        Ok(self.with_tags(self.tags | other.tags))
    }

    fn check_point(&self) -> Result<()> {
        if self.length < 2 {
            return Err(NetworkError::bounds("point length", self.length, 2));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}@{} {}",
            self.stage,
            self.length,
            self.value,
            self.radix(),
            self.tags
        )
    }
}
