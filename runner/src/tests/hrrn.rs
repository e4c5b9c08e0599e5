use core::module_path;
use function_name::named;
use scheduler::hrrn;

use super::{run, simulate};

#[test]
#[named]
pub fn lowest_ratio_goes_first() {
    let report = simulate(1, hrrn(), "CPU(4)\nCPU(8)\nCPU(2)", 1);

    assert_eq!(report.stats[2].ready_or_blocked_ticks, 10);
    assert_eq!(report.stats[2].exit_tick, 14);
    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &report,
    );
}
