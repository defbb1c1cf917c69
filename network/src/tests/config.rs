use itertools::iproduct;

use crate::{
    config::{Access, Configuration, Parameters, Pass, PassOrder, dispatch_rot_shift, parity_of, store_words},
    error::{ConfigError, NetworkError},
};

fn params(radix: usize, stages: usize, psi: usize) -> Parameters {
    Parameters {
        radix,
        stages,
        psi,
        ..Default::default()
    }
}

#[test]
fn default_constants() {
    let cfg: Configuration = Configuration::new(Parameters::default()).unwrap();
    assert_eq!(cfg.radix(), 8);
    assert_eq!(cfg.log_radix(), 3);
    assert_eq!(cfg.stages(), 3);
    assert_eq!(cfg.psi(), 2);
    assert_eq!(cfg.coef_nb(), 512);
    assert_eq!(cfg.stage_units(), 64);
    assert_eq!(cfg.stage_iters(), 32);
    assert_eq!(cfg.write_inputs(), 1);
    assert_eq!(cfg.batch(), 16);
    assert_eq!(cfg.levels(), 6);
    assert_eq!(cfg.pass_order(), PassOrder::ForwardBackward);
}

#[test]
fn several_inputs_per_iteration() {
    let cfg: Configuration = Configuration::new(params(2, 3, 4)).unwrap();
    assert_eq!(cfg.stage_units(), 4);
    assert_eq!(cfg.stage_iters(), 1);
    assert_eq!(cfg.write_inputs(), 2);
}

#[test]
fn levels_per_pass() {
    let cfg: Configuration = Configuration::new(Parameters::default()).unwrap();
    assert_eq!(cfg.active_levels(Pass::Forward), 6);
    assert_eq!(cfg.active_levels(Pass::Backward), 3);
    assert_eq!(cfg.pass_pbs_l(Pass::Backward), 1);
    assert_eq!(cfg.level_of(Pass::Forward, 2, 1), 5);
    assert_eq!(cfg.level_of(Pass::Backward, 2, 0), 2);
}

#[test]
fn rot_shift_fixtures() {
    for (radix, stages, psi, want) in [
        (2, 11, 16, (6, 0)),
        (8, 3, 8, (3, 0)),
        (8, 3, 64, (6, 1)),
        (4, 5, 16, (4, 0)),
        (4, 4, 64, (6, 1)),
        (2, 6, 32, (5, 1)),
        (16, 3, 32, (8, 2)),
        (2, 4, 1, (3, 0)),
    ] {
        println!("test rot_shift radix: {} stages: {} psi: {}", radix, stages, psi);
        assert_eq!(dispatch_rot_shift(radix, stages, psi), want);
    }

    let cfg: Configuration = Configuration::new(params(2, 11, 16)).unwrap();
    assert_eq!(cfg.dispatch_rot_shift(), (6, 0));
}

#[test]
fn rejections() {
    let cases: Vec<(Parameters, ConfigError)> = vec![
        (params(6, 3, 2), ConfigError::InvalidRadix(6)),
        (params(1, 3, 1), ConfigError::InvalidRadix(1)),
        (params(8, 1, 1), ConfigError::TooFewStages(1)),
        (params(8, 3, 3), ConfigError::InvalidPsi(3)),
        (params(8, 3, 0), ConfigError::InvalidPsi(0)),
        (
            params(8, 3, 128),
            ConfigError::PsiNotDividing {
                psi: 128,
                stage_units: 64,
            },
        ),
        (params(16, 17, 1), ConfigError::Overflow { radix: 16, stages: 17 }),
        (
            params(2, 63, 1),
            ConfigError::StoreOverflow {
                levels: 6,
                coef_nb: 1 << 63,
            },
        ),
        (
            Parameters {
                glwe_k_plus_1: 0,
                ..Default::default()
            },
            ConfigError::TrackCount {
                name: "glwe_k_plus_1",
                value: 0,
            },
        ),
        (
            Parameters {
                pbs_l: 17,
                ..Default::default()
            },
            ConfigError::TrackCount { name: "pbs_l", value: 17 },
        ),
    ];
    for (p, want) in cases {
        assert_eq!(Configuration::new(p), Err(NetworkError::Configuration(want)));
    }
}

#[test]
fn write_conflict_rejected() {
    for (radix, stages, psi) in [(4, 5, 8), (4, 5, 32), (4, 6, 8), (4, 6, 128)] {
        println!("test write_conflict radix: {} stages: {} psi: {}", radix, stages, psi);
        assert!(matches!(
            Configuration::new(params(radix, stages, psi)),
            Err(NetworkError::Configuration(ConfigError::WriteConflict { .. }))
        ));
    }
    let err: NetworkError = Configuration::new(params(4, 5, 8)).unwrap_err();
    assert!(err.to_string().contains("write conflict"), "{}", err);
}

#[test]
fn store_size() {
    assert_eq!(store_words(6, 512), Some(6144));
    assert_eq!(store_words(1, 1 << 63), None);
    assert_eq!(store_words(3, usize::MAX / 4), None);
}

#[test]
fn parity_never_aliases() {
    for stages in 2..8 {
        for (stage, pass) in iproduct!(0..stages, [Pass::Forward, Pass::Backward]) {
            assert_ne!(
                parity_of(stages, stage, pass, Access::Read),
                parity_of(stages, stage, pass, Access::Write)
            );
            if stage + 1 < stages {
                assert_eq!(
                    parity_of(stages, stage, pass, Access::Read),
                    parity_of(stages, stage + 1, pass, Access::Write)
                );
            }
        }
        assert_eq!(
            parity_of(stages, stages - 1, Pass::Backward, Access::Read),
            parity_of(stages, 0, Pass::Forward, Access::Write)
        );
        assert_eq!(
            parity_of(stages, stages - 1, Pass::Forward, Access::Read),
            parity_of(stages, 0, Pass::Backward, Access::Write)
        );
    }
}

#[test]
#[should_panic]
fn parity_stage_out_of_range() {
    parity_of(3, 3, Pass::Forward, Access::Read);
}
