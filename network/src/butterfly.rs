use crate::{
    coordinate::{Coordinate, Port},
    error::{NetworkError, Result},
};

/// A radix-`R` butterfly unit: `R` inputs in, `R` outputs out.
///
/// `unit` identifies the invocation within the network. Inputs must all
/// belong to `unit`, sit on ports `0..R` in order and carry identical tags.
pub trait ButterflyUnit {
    fn compute(&self, inputs: &[Coordinate], unit: &Coordinate) -> Result<Vec<Coordinate>>;
}

impl<F> ButterflyUnit for F
where
    F: Fn(&[Coordinate], &Coordinate) -> Result<Vec<Coordinate>>,
{
    fn compute(&self, inputs: &[Coordinate], unit: &Coordinate) -> Result<Vec<Coordinate>> {
        self(inputs, unit)
    }
}

/// Butterfly unit that checks the contract on its inputs and produces the
/// coordinates of its outputs instead of doing arithmetic.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidatingButterfly;

impl ButterflyUnit for ValidatingButterfly {
    fn compute(&self, inputs: &[Coordinate], unit: &Coordinate) -> Result<Vec<Coordinate>> {
        let radix: usize = unit.radix();

        if inputs.len() != radix {
            return Err(NetworkError::bounds("butterfly inputs", inputs.len(), radix));
        }

        let tags = inputs[0].tags();

        for (i, point) in inputs.iter().enumerate() {
            if !unit.belongs_to(point)? {
                return Err(NetworkError::violation(format!(
                    "point {} does not belong to unit {}",
                    point, unit
                )));
            }
            let position: usize = point.position(Port::Input)?;
            if position != i {
                return Err(NetworkError::violation(format!(
                    "wrong point position: expected {} got {}, point {}, unit {}",
                    i, position, point, unit
                )));
            }
            if point.tags() != tags {
                return Err(NetworkError::violation(format!(
                    "inhomogeneous tags: expected {} got {}, point {}, unit {}",
                    tags,
                    point.tags(),
                    point,
                    unit
                )));
            }
        }

        (0..radix).map(|i| unit.output(i, tags)).collect()
    }
}
