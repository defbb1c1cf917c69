mod butterfly;
mod config;

use crate::config::{Configuration, Parameters, PassOrder};

pub(crate) fn configuration(radix: usize, stages: usize, psi: usize, glwe_k_plus_1: usize, pbs_l: usize) -> Configuration {
    Configuration::new(Parameters {
        radix,
        stages,
        psi,
        glwe_k_plus_1,
        pbs_l,
        pass_order: PassOrder::ForwardBackward,
    })
    .unwrap()
}
