//! FSM Eigenvalue Example - Plate Strip and Lipped Channel

use std::sync::Arc;

use fsm_eigenvalue::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== FSM Eigenvalue Example: Simply Supported Plate Strip ===\n");

    // A single 100mm wide strip
    //
    //     N1 ---------- N2     (z = 0)
    //     x = 0       x = 100
    //
    let plate = StripModel::build(
        vec![NodalLine::new(1, 0.0, 0.0), NodalLine::new(2, 100.0, 0.0)],
        &[StripSpec::new(1, 2, "steel")],
        vec![("steel".to_string(), Material::steel())],
        BeamType::SimplySupported,
    )?;

    let integrals = IntegralTable::simply_supported(1..=3);

    println!("{:>8} {:>4} {:>14} {:>14} {:>14} {:>14}", "a", "m", "omega", "omega~", "sigma_cr", "sigma_cr~");
    for (a, m) in [(100.0, 1), (200.0, 1), (200.0, 2), (300.0, 3), (1000.0, 1)] {
        let result = perform_iteration(&plate, &integrals, a, 1.0, m, GoverningRule::default())?;
        println!(
            "{:>8.1} {:>4} {:>14.6} {:>14.6} {:>14.6} {:>14.6}",
            a, m, result.omega, result.omega_approx, result.sigma_cr, result.sigma_cr_approx
        );
    }

    println!("\n=== Lipped Channel Sweep ===\n");

    //   N2 -- N1        N6 -- N5
    //   |                      |
    //   |                      |
    //   N3 ------------------ N4
    //
    let channel = StripModel::build(
        vec![
            NodalLine::new(1, 15.0, 60.0),
            NodalLine::new(2, 0.0, 60.0),
            NodalLine::new(3, 0.0, 0.0),
            NodalLine::new(4, 100.0, 0.0),
            NodalLine::new(5, 100.0, 60.0),
            NodalLine::new(6, 85.0, 60.0),
        ],
        &[
            StripSpec::new(1, 2, "steel"),
            StripSpec::new(2, 3, "steel"),
            StripSpec::new(3, 4, "steel"),
            StripSpec::new(4, 5, "steel"),
            StripSpec::new(5, 6, "steel"),
        ],
        vec![("steel".to_string(), Material::steel())],
        BeamType::SimplySupported,
    )?;
    println!("Nodal lines: {}, strips: {}, DOFs: {}", channel.nodal_lines().len(), channel.strips().len(), channel.dof_count());

    let space = SearchSpace::from_ranges([200.0, 1000.0, 200.0], [1.0, 2.0, 0.5], [1.0, 4.0, 1.0])?;
    let integrals = Arc::new(IntegralTable::simply_supported(space.m.iter().copied()));

    println!("\n{:>8} {:>6} {:>4} {:>14} {:>14}", "a", "t_b", "m", "omega", "sigma_cr");
    for point in sweep(&space, Arc::new(channel), integrals, &SweepOptions::default())? {
        let point = point?;
        let dominant = &point.composite;
        println!(
            "{:>8.1} {:>6.2} {:>4} {:>14.6} {:>14.6}",
            point.a, point.t_b, dominant.m_dominant, dominant.result.omega, dominant.result.sigma_cr
        );
    }

    Ok(())
}
