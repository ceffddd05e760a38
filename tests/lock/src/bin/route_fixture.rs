//! Binary that runs every built-in scenario through the harness and prints
//! deterministic output lines for cross-process verification.
//!
//! Usage: `route_fixture`
//!
//! Output: one block of key=value lines per scenario, in built-in order.

use gridwalk_harness::bundle::verify_bundle;
use gridwalk_harness::runner::execute;
use gridwalk_harness::scenarios::builtin;

fn main() {
    for scenario in builtin() {
        let run = execute(&scenario).expect("scenario run failed");
        verify_bundle(&run.bundle).expect("bundle failed verification");
        let report_digest = run.report.digest().expect("report digest");

        println!("scenario={}", scenario.id);
        println!("bundle_digest={}", run.bundle.digest.as_str());
        println!("report_digest={}", report_digest.as_str());
        println!("termination_reason={}", run.report.termination.as_str());
        println!("expansions={}", run.report.stats.expansions);
        println!("path_len={}", run.report.path.len());
        println!("compressed_len={}", run.compressed.len());
        println!("artifact_count={}", run.bundle.artifacts.len());
    }
}
