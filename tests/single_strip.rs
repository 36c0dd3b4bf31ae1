use approx::assert_relative_eq;
use fsm_eigenvalue::prelude::*;

/// A flat steel plate strip of `width` split into `parts` collinear strips
fn plate(width: f64, parts: u32) -> StripModel {
    let nodal_lines = (0..=parts)
        .map(|i| NodalLine::new(i + 1, width * i as f64 / parts as f64, 0.0))
        .collect();
    let strips: Vec<_> = (1..=parts).map(|i| StripSpec::new(i, i + 1, "steel")).collect();

    StripModel::build(
        nodal_lines,
        &strips,
        vec![("steel".to_string(), Material::steel())],
        BeamType::SimplySupported,
    )
    .unwrap()
}

#[test]
fn single_strip_golden_baseline() {
    // b = 100mm, t_b = 1mm, E = 210000 MPa, nu = 0.3, ro = 7850 kg/m3
    let model = plate(100.0, 1);
    let integrals = IntegralTable::simply_supported(1..=2);

    let global = model.assemble_global_matrices(&integrals, 100.0, 1.0, 1).unwrap();
    assert!(global.k_hat.clone().cholesky().is_some(), "K_hat must be positive definite");

    let result = perform_iteration(&model, &integrals, 100.0, 1.0, 1, GoverningRule::MinSigned).unwrap();

    assert_relative_eq!(result.omega, 47.81991973557858, max_relative = 1e-6);
    assert_relative_eq!(result.sigma_cr, 18.188111042858537, max_relative = 1e-6);

    // a plate strip under uniform stress matches its closed form
    assert_relative_eq!(result.omega, result.omega_approx, max_relative = 0.01);
    assert_relative_eq!(result.sigma_cr, result.sigma_cr_approx, max_relative = 0.01);
    assert!(result.omega_rel_err < 0.01);
    assert!(result.sigma_cr_rel_err < 0.01);
}

#[test]
fn single_strip_long_plate() {
    let model = plate(100.0, 1);
    let integrals = IntegralTable::simply_supported([1]);

    let result = perform_iteration(&model, &integrals, 1000.0, 1.0, 1, GoverningRule::MinSigned).unwrap();

    assert_relative_eq!(result.omega, 0.46626015260173936, max_relative = 1e-6);
    assert_relative_eq!(result.sigma_cr, 0.17291254952017984, max_relative = 1e-6);
}

#[test]
fn governing_rules_agree_for_a_plate_strip() {
    let model = plate(100.0, 1);
    let integrals = IntegralTable::simply_supported([1]);

    let signed = perform_iteration(&model, &integrals, 250.0, 1.5, 1, GoverningRule::MinSigned).unwrap();
    let closest = perform_iteration(&model, &integrals, 250.0, 1.5, 1, GoverningRule::ClosestToZero).unwrap();

    assert_relative_eq!(signed.omega, closest.omega);
    assert_relative_eq!(signed.sigma_cr, closest.sigma_cr);
}

#[test]
fn refining_the_strip_never_stiffens_it() {
    let integrals = IntegralTable::simply_supported([1]);
    let coarse = perform_iteration(&plate(100.0, 1), &integrals, 300.0, 1.0, 1, GoverningRule::MinSigned).unwrap();

    for parts in [2, 4] {
        let fine = perform_iteration(&plate(100.0, parts), &integrals, 300.0, 1.0, 1, GoverningRule::MinSigned).unwrap();

        assert_eq!(fine.phi_omega.len(), 4 * (parts as usize + 1));
        assert!(fine.omega <= coarse.omega * (1.0 + 1e-9));
        assert!(fine.sigma_cr <= coarse.sigma_cr * (1.0 + 1e-9));
        assert!(fine.omega > 0.0 && fine.sigma_cr > 0.0);
    }
}

#[test]
fn vertical_strip_matches_horizontal_strip() {
    let horizontal = plate(100.0, 1);
    let vertical = StripModel::build(
        vec![NodalLine::new(1, 0.0, 0.0), NodalLine::new(2, 0.0, 100.0)],
        &[StripSpec::new(1, 2, "steel")],
        vec![("steel".to_string(), Material::steel())],
        BeamType::SimplySupported,
    )
    .unwrap();
    let integrals = IntegralTable::simply_supported([1]);

    let h = perform_iteration(&horizontal, &integrals, 400.0, 2.0, 1, GoverningRule::MinSigned).unwrap();
    let v = perform_iteration(&vertical, &integrals, 400.0, 2.0, 1, GoverningRule::MinSigned).unwrap();

    assert_relative_eq!(h.omega, v.omega, max_relative = 1e-9);
    assert_relative_eq!(h.sigma_cr, v.sigma_cr, max_relative = 1e-9);
}
