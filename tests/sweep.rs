use std::io::Write;
use std::sync::Arc;

use approx::assert_relative_eq;
use fsm_eigenvalue::error::{FsmError, LookupError, NumericalError};
use fsm_eigenvalue::integrals::IntegralRecord;
use fsm_eigenvalue::prelude::*;
use fsm_eigenvalue::store::Header;

fn channel() -> StripModel {
    StripModel::build(
        vec![
            NodalLine::new(1, 0.0, 50.0),
            NodalLine::new(2, 0.0, 0.0),
            NodalLine::new(3, 80.0, 0.0),
            NodalLine::new(4, 80.0, 50.0),
        ],
        &[
            StripSpec::new(1, 2, "steel"),
            StripSpec::new(2, 3, "steel"),
            StripSpec::new(3, 4, "steel"),
        ],
        vec![("steel".to_string(), Material::steel())],
        BeamType::SimplySupported,
    )
    .unwrap()
}

#[test]
fn sweep_yields_row_major_grid_points() {
    let space = SearchSpace::new(vec![100.0, 200.0], vec![1.0, 2.0], vec![1, 2]).unwrap();
    let integrals = Arc::new(IntegralTable::simply_supported(1..=2));
    let options = SweepOptions::default().with_workers(4);

    let points: Vec<GridPointResult> = sweep(&space, Arc::new(channel()), integrals, &options)
        .unwrap()
        .collect::<FsmResult<_>>()
        .unwrap();

    let order: Vec<_> = points.iter().map(|p| (p.a, p.t_b)).collect();
    assert_eq!(order, vec![(100.0, 1.0), (100.0, 2.0), (200.0, 1.0), (200.0, 2.0)]);

    for point in &points {
        let modes: Vec<_> = point.raw.iter().map(|r| r.m).collect();
        assert_eq!(modes, vec![1, 2]);

        let lowest = point.raw.iter().map(|r| r.sigma_cr).fold(f64::INFINITY, f64::min);
        assert_eq!(point.composite.result.sigma_cr, lowest);
        assert_eq!(point.composite.m_dominant, point.composite.result.m);
        assert_eq!(point.composite.result.phi_omega.len(), 16);
    }
}

#[test]
fn sweep_matches_single_iterations() {
    let model = channel();
    let integrals = IntegralTable::simply_supported(1..=3);
    let space = SearchSpace::new(vec![300.0, 900.0], vec![1.5], vec![1, 2, 3]).unwrap();

    let points: Vec<_> = sweep(
        &space,
        Arc::new(model.clone()),
        Arc::new(integrals.clone()),
        &SweepOptions::default().with_workers(2),
    )
    .unwrap()
    .collect::<FsmResult<_>>()
    .unwrap();

    for point in &points {
        for raw in &point.raw {
            let single = perform_iteration(&model, &integrals, raw.a, raw.t_b, raw.m, GoverningRule::MinSigned).unwrap();
            assert_relative_eq!(raw.omega, single.omega, max_relative = 1e-12);
            assert_relative_eq!(raw.sigma_cr, single.sigma_cr, max_relative = 1e-12);
        }
    }
}

#[test]
fn modal_composite_picks_lowest_critical_stress() {
    let template = perform_iteration(
        &channel(),
        &IntegralTable::simply_supported([1]),
        100.0,
        1.0,
        1,
        GoverningRule::MinSigned,
    )
    .unwrap();

    let results: Vec<_> = [(1, 50.0), (2, 30.0), (3, 40.0)]
        .into_iter()
        .map(|(m, sigma_cr)| IterationResult {
            m,
            sigma_cr,
            ..template.clone()
        })
        .collect();

    let composite = modal_composite(&results).unwrap();
    assert_eq!(composite.m_dominant, 2);
    assert_eq!(composite.result, results[1]);
}

#[test]
fn missing_integral_aborts_the_sweep() {
    let space = SearchSpace::new(vec![100.0, 200.0, 300.0], vec![1.0, 2.0], vec![1, 2]).unwrap();
    // m = 2 is missing
    let integrals = Arc::new(IntegralTable::simply_supported([1]));

    let outcomes: Vec<_> = sweep(&space, Arc::new(channel()), integrals, &SweepOptions::default().with_workers(2))
        .unwrap()
        .collect();

    let err = outcomes
        .into_iter()
        .find_map(Result::err)
        .expect("the sweep must fail");
    let (_, _, m) = err.grid_point().unwrap();
    assert_eq!(m, 2);

    match err {
        FsmError::GridPoint { source, .. } => {
            assert!(matches!(*source, FsmError::Lookup(LookupError::NotFound { integral: 1, .. })))
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn isolated_nodal_line_aborts_the_sweep() {
    // nodal line 3 belongs to no strip, so its rows of K_hat stay zero
    let model = StripModel::build(
        vec![
            NodalLine::new(1, 0.0, 0.0),
            NodalLine::new(2, 50.0, 0.0),
            NodalLine::new(3, 100.0, 0.0),
        ],
        &[StripSpec::new(1, 2, "steel")],
        vec![("steel".to_string(), Material::steel())],
        BeamType::SimplySupported,
    )
    .unwrap();
    let space = SearchSpace::new(vec![100.0, 200.0], vec![1.0], vec![1]).unwrap();
    let integrals = Arc::new(IntegralTable::simply_supported([1]));

    let mut outcomes = sweep(&space, Arc::new(model), integrals, &SweepOptions::default().with_workers(1)).unwrap();

    match outcomes.next() {
        Some(Err(FsmError::GridPoint { source, .. })) => {
            assert!(matches!(*source, FsmError::Numerical(NumericalError::NotPositiveDefinite)))
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(outcomes.next().is_none());
}

#[test]
fn integral_db_file_is_opened_per_worker() {
    let table = IntegralTable::simply_supported(1..=2);
    let records: Vec<IntegralRecord> = (1..=2)
        .flat_map(|m| [1u8, 2, 3, 5, 7].map(|i| (i, m)))
        .map(|(integral, m)| {
            let key = fsm_eigenvalue::integrals::IntegralKey::diagonal(integral, m);
            let normalized = table.lookup(&key).unwrap();
            IntegralRecord {
                key,
                value: normalized.value,
                scale_factor: normalized.scale_factor,
            }
        })
        .collect();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    serde_json::to_writer(&mut file, &serde_json::json!({ "integrals": records })).unwrap();
    file.flush().unwrap();

    let db = IntegralDbFile::new(file.path());
    assert_eq!(db.path(), file.path());

    let space = SearchSpace::new(vec![150.0, 450.0], vec![1.0], vec![1, 2]).unwrap();
    let from_file: Vec<_> = sweep(
        &space,
        Arc::new(channel()),
        db,
        &SweepOptions::default().with_workers(3),
    )
    .unwrap()
    .collect::<FsmResult<_>>()
    .unwrap();
    let in_memory: Vec<_> = sweep(&space, Arc::new(channel()), Arc::new(table), &SweepOptions::default())
        .unwrap()
        .collect::<FsmResult<_>>()
        .unwrap();

    for (file_point, memory_point) in from_file.iter().zip(&in_memory) {
        assert_eq!(file_point.composite.m_dominant, memory_point.composite.m_dominant);
        assert_relative_eq!(file_point.composite.result.sigma_cr, memory_point.composite.result.sigma_cr);
    }
}

#[test]
fn missing_integral_db_file_fails() {
    let space = SearchSpace::new(vec![150.0], vec![1.0], vec![1]).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut outcomes = sweep(
        &space,
        Arc::new(channel()),
        IntegralDbFile::new(dir.path().join("missing.json")),
        &SweepOptions::default().with_workers(2),
    )
    .unwrap();

    assert!(matches!(outcomes.next(), Some(Err(FsmError::IoError(_)))));
    assert!(outcomes.next().is_none());
}

#[test]
fn data_file_to_results_file() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("plate.yaml");
    std::fs::write(
        &data_path,
        r#"
geometry:
  beam_type_id: 1
  nodal_lines: {1: [0, 0], 2: [50, 0], 3: [100, 0]}
  finite_strips: [[1, 2, steel], [2, 3, steel]]
materials:
  steel: {E_x: 210000, E_y: 210000, mu_x: 0.3, mu_y: 0.3, G_xy: 80769.23, ro: 7850}
search_space:
  a: [100, 300, 100]
  t_b: [1, 1, 1]
  m: [1, 2, 1]
"#,
    )
    .unwrap();

    let data = load_data_file(&data_path).unwrap();
    let results_path = dir.path().join("plate.jsonl");
    let mut writer = ResultsWriter::create(&results_path, 1).unwrap();
    writer
        .write_header(Header::new(&data.contents, data.model.dof_count(), &data.search_space))
        .unwrap();

    let total = data.search_space.grid_size();
    let integrals = Arc::new(IntegralTable::simply_supported(data.search_space.m.iter().copied()));
    let results = sweep(&data.search_space, Arc::new(data.model), integrals, &SweepOptions::default()).unwrap();
    assert_eq!(writer.store(results, total).unwrap(), 3);
    writer.into_inner().unwrap();

    let contents = std::fs::read_to_string(&results_path).unwrap();
    let records: Vec<serde_json::Value> = contents.lines().map(|l| serde_json::from_str(l).unwrap()).collect();

    // header + 3 grid points x (2 modes + 1 composite)
    assert_eq!(records.len(), 10);
    assert_eq!(records[0]["dof_count"], 12);
    let composites: Vec<f64> = records
        .iter()
        .filter(|r| r["record"] == "modal_composite")
        .map(|r| r["a"].as_f64().unwrap())
        .collect();
    assert_eq!(composites, vec![100.0, 200.0, 300.0]);
}
