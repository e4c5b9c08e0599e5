use core::module_path;
use function_name::named;
use scheduler::spn;

use super::{run, simulate};

#[test]
#[named]
pub fn shortest_goes_first() {
    let report = simulate(1, spn(), "CPU(4)\nCPU(8)\nCPU(2)", 1);

    run(
        module_path!().split("::").last().unwrap(),
        function_name!(),
        &report,
    );
}
